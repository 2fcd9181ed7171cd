use std::process::ExitCode;

use configs::{AppConfig, LogFormat};
use dotenvy::dotenv;
use tracing::{error, info};
use uuid::Uuid;

fn main() -> ExitCode {
    // 提前加载 .env，使得 RUST_LOG / DATABASE_URL 等环境变量生效
    dotenv().ok();

    let cfg = match AppConfig::load_or_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            common::utils::logging::init_logging_default();
            error!(service = "venue_booking", event = "config_invalid", error = %e, "failed to load configuration");
            return ExitCode::FAILURE;
        }
    };
    match cfg.log.format {
        LogFormat::Json => common::utils::logging::init_logging("json"),
        LogFormat::Compact => common::utils::logging::init_logging("compact"),
    }

    let service_id = Uuid::new_v4();
    let pid = std::process::id();
    let version = env!("CARGO_PKG_VERSION");

    // Panic 钩子
    std::panic::set_hook(Box::new(move |info| {
        error!(service = "venue_booking", event = "panic", %service_id, pid, message = %info, "unhandled panic occurred");
    }));

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(w) = cfg.server.worker_threads {
        builder.worker_threads(w);
    }
    let rt = match builder.build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = "venue_booking", event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    info!(
        service = "venue_booking",
        event = "start",
        %service_id,
        pid,
        version,
        threads = cfg.server.worker_threads.unwrap_or_default(),
        "venue booking server starting"
    );

    rt.block_on(async move {
        let server_task = tokio::spawn(async move {
            let res = server::run_with_config(cfg).await;
            if let Err(e) = &res {
                error!(service = "venue_booking", event = "run_failed", error = %e, "server returned error");
            }
            res
        });

        tokio::select! {
            res = server_task => match res {
                Ok(Ok(())) => {
                    info!(service = "venue_booking", event = "stop", %service_id, pid, "server stopped normally");
                    ExitCode::SUCCESS
                }
                // 错误已记录
                Ok(Err(_)) => ExitCode::FAILURE,
                Err(e) => {
                    error!(service = "venue_booking", event = "task_join_error", error = %e, "server task join error");
                    ExitCode::FAILURE
                }
            },
            _ = tokio::signal::ctrl_c() => {
                // 会话只保存在内存中，停机即全部失效
                info!(service = "venue_booking", event = "shutdown_signal", %service_id, pid, "received Ctrl+C, shutting down");
                ExitCode::SUCCESS
            }
        }
    })
}
