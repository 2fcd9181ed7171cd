#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use configs::{AdminBootstrap, AppConfig};
use tower::Service;
use uuid::Uuid;

pub const ADMIN_PASSWORD: &str = "Adm1nPass";
pub const USER_PASSWORD: &str = "Secret123";

pub struct TestApp {
    pub app: Router,
    pub admin_id: String,
    pub upload_dir: std::path::PathBuf,
}

pub fn unique(prefix: &str) -> String {
    format!("{prefix}_{}", &Uuid::new_v4().simple().to_string()[..10])
}

/// A fresh app over an in-memory SQLite database (or `DATABASE_URL` when set).
pub async fn build_app() -> anyhow::Result<TestApp> {
    let admin_id = unique("admin");
    let mut cfg = AppConfig::default();
    cfg.database = models::db::config_from_env();
    let upload_dir = std::env::temp_dir().join(format!("venue-upload-{}", Uuid::new_v4()));
    cfg.upload.dir = upload_dir.to_string_lossy().into_owned();
    cfg.admin = Some(AdminBootstrap {
        user_id: admin_id.clone(),
        user_name: "Admin".into(),
        password: ADMIN_PASSWORD.into(),
    });
    let app = server::build_app(&cfg).await?;
    Ok(TestApp { app, admin_id, upload_dir })
}

impl TestApp {
    pub async fn send(&self, req: Request<Body>) -> anyhow::Result<Response<Body>> {
        Ok(self.app.clone().call(req).await?)
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> anyhow::Result<Response<Body>> {
        let mut b = Request::builder().method("GET").uri(uri);
        if let Some(c) = cookie {
            b = b.header(header::COOKIE, c);
        }
        self.send(b.body(Body::empty())?).await
    }

    pub async fn post_form(&self, uri: &str, form: &str, cookie: Option<&str>) -> anyhow::Result<Response<Body>> {
        let mut b = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(c) = cookie {
            b = b.header(header::COOKIE, c);
        }
        self.send(b.body(Body::from(form.to_string()))?).await
    }

    pub async fn post_multipart(
        &self,
        uri: &str,
        fields: &[(&str, &str)],
        picture: Option<(&str, &[u8])>,
        cookie: Option<&str>,
    ) -> anyhow::Result<Response<Body>> {
        let (content_type, body) = multipart(fields, picture);
        let mut b = Request::builder().method("POST").uri(uri).header(header::CONTENT_TYPE, content_type);
        if let Some(c) = cookie {
            b = b.header(header::COOKIE, c);
        }
        self.send(b.body(Body::from(body))?).await
    }

    pub async fn register(&self, user_id: &str) -> anyhow::Result<()> {
        let form = format!(
            "userID={user_id}&userName=Tester&password={USER_PASSWORD}&email=tester%40example.com&phone=13800138000"
        );
        let resp = self.post_form("/register.do", &form, None).await?;
        assert_eq!(resp.status(), StatusCode::FOUND);
        Ok(())
    }

    /// Log in and return the `name=value` session cookie.
    pub async fn login(&self, user_id: &str, password: &str) -> anyhow::Result<String> {
        let resp = self
            .post_form("/loginCheck.do", &format!("userID={user_id}&password={password}"), None)
            .await?;
        assert_eq!(resp.status(), StatusCode::OK);
        let cookie = session_cookie(&resp).ok_or_else(|| anyhow::anyhow!("no session cookie"))?;
        Ok(cookie)
    }

    /// Number of files currently in the upload directory.
    pub fn uploaded_files(&self) -> usize {
        std::fs::read_dir(&self.upload_dir).map(|d| d.count()).unwrap_or(0)
    }

    pub async fn admin_cookie(&self) -> anyhow::Result<String> {
        self.login(&self.admin_id, ADMIN_PASSWORD).await
    }

    pub async fn user_cookie(&self) -> anyhow::Result<(String, String)> {
        let user_id = unique("user");
        self.register(&user_id).await?;
        let cookie = self.login(&user_id, USER_PASSWORD).await?;
        Ok((user_id, cookie))
    }
}

pub fn session_cookie(resp: &Response<Body>) -> Option<String> {
    resp.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("VENUESESSION="))
        .and_then(|v| v.split(';').next())
        .map(str::to_string)
}

pub fn location(resp: &Response<Body>) -> Option<String> {
    resp.headers().get(header::LOCATION).and_then(|v| v.to_str().ok()).map(str::to_string)
}

pub async fn body_text(resp: Response<Body>) -> anyhow::Result<String> {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await?;
    Ok(String::from_utf8(bytes.to_vec())?)
}

pub async fn body_json(resp: Response<Body>) -> anyhow::Result<serde_json::Value> {
    Ok(serde_json::from_str(&body_text(resp).await?)?)
}

fn multipart(fields: &[(&str, &str)], picture: Option<(&str, &[u8])>) -> (String, Vec<u8>) {
    let boundary = "venue-test-boundary";
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!("--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n").as_bytes(),
        );
    }
    if let Some((file_name, bytes)) = picture {
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"picture\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
    (format!("multipart/form-data; boundary={boundary}"), body)
}
