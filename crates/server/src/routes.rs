use axum::extract::DefaultBodyLimit;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::Health;

use crate::openapi::ApiDoc;
use crate::state::AppState;

pub mod admin_user;
pub mod index;
pub mod message;
pub mod news;
pub mod order;
pub mod user;
pub mod venue;

/// Multipart overhead allowed on top of the picture size limit.
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

pub async fn metrics() -> impl IntoResponse {
    common::metrics::encode_metrics()
}

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the full application router: public pages, user routes, admin console and operational endpoints.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let uploads = ServeDir::new(state.uploads.dir());
    let body_limit = state.uploads.max_bytes() + FORM_OVERHEAD_BYTES;

    // 公共页面与首页
    let public = Router::new()
        .route("/index", get(index::index))
        .route("/signup", get(user::signup))
        .route("/login", get(user::login_page))
        .route("/loginCheck.do", post(user::login_check))
        .route("/register.do", post(user::register))
        .route("/logout.do", get(user::logout))
        .route("/quit.do", get(user::quit))
        .route("/venue", get(venue::venue_detail))
        .route("/venue_list", get(venue::venue_list_page))
        .route("/venuelist/getVenueList", get(venue::venue_page).post(venue::venue_page))
        .route("/news", get(news::news_detail))
        .route("/news_list", get(news::news_list_page))
        .route("/news/getNewsList", get(news::news_page))
        .route("/message/getMessageList", get(message::approved_list))
        .route("/order/getOrderList.do", get(order::day_orders));

    // 需登录的用户路由（CurrentUser 提取器校验）
    let user_routes = Router::new()
        .route("/updateUser.do", post(user::update_user))
        .route("/checkPassword.do", get(user::check_password))
        .route("/user_info", get(user::user_info))
        .route("/message_list", get(message::message_list_page))
        .route("/message/findUserList", get(message::own_list))
        .route("/sendMessage", post(message::send_message))
        .route("/modifyMessage.do", post(message::modify_message))
        .route("/delMessage.do", post(message::del_message))
        .route("/order_manage", get(order::order_manage))
        .route("/order_place.do", get(order::order_place_for))
        .route("/order_place", get(order::order_place))
        .route("/getOrderList.do", get(order::own_list))
        .route("/addOrder.do", post(order::add_order))
        .route("/modifyOrder.do", get(order::order_edit))
        .route("/modifyOrder", post(order::modify_order))
        .route("/delOrder.do", post(order::del_order))
        .route("/finishOrder.do", post(order::finish_order));

    // 管理后台（CurrentAdmin 提取器校验）
    let admin_routes = Router::new()
        .route("/admin_index", get(index::admin_index))
        .route("/message_manage", get(message::message_manage))
        .route("/messageList.do", get(message::pending_list))
        .route("/passMessage.do", post(message::pass_message))
        .route("/rejectMessage.do", post(message::reject_message))
        .route("/reservation_manage", get(order::reservation_manage))
        .route("/admin/getOrderList.do", get(order::pending_list))
        .route("/passOrder.do", post(order::pass_order))
        .route("/rejectOrder.do", post(order::reject_order))
        .route("/venue_manage", get(venue::venue_manage))
        .route("/venue_edit", get(venue::venue_edit))
        .route("/venue_add", get(venue::venue_add))
        .route("/venueList.do", get(venue::admin_venue_list))
        .route("/addVenue.do", post(venue::add_venue))
        .route("/modifyVenue.do", post(venue::modify_venue))
        .route("/delVenue.do", post(venue::del_venue))
        .route("/checkVenueName.do", post(venue::check_venue_name))
        .route("/news_manage", get(news::news_manage))
        .route("/news_add", get(news::news_add))
        .route("/news_edit", get(news::news_edit))
        .route("/newsList.do", get(news::admin_news_list))
        .route("/delNews.do", post(news::del_news))
        .route("/modifyNews.do", post(news::modify_news))
        .route("/addNews.do", post(news::add_news))
        .route("/user_manage", get(admin_user::user_manage))
        .route("/userList.do", get(admin_user::user_list))
        .route("/user_add", get(admin_user::user_add))
        .route("/addUser.do", post(admin_user::add_user))
        .route("/user_edit", get(admin_user::user_edit))
        .route("/modifyUser.do", post(admin_user::modify_user))
        .route("/delUser.do", post(admin_user::del_user))
        .route("/checkUserID.do", post(admin_user::check_user_id));

    // 运维端点
    let ops = Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .route("/api-docs/openapi.json", get(openapi_json));

    public
        .merge(user_routes)
        .merge(admin_routes)
        .merge(ops)
        .nest_service("/upload", uploads)
        .with_state(state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // 每次请求创建 span，包含方法和路径等，日志级别为 INFO
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                // 响应返回时打点，包含状态码与耗时
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 失败（5xx 等）时以 ERROR 记录
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
