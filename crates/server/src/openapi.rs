use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

/// Urlencoded body of `/loginCheck.do`.
#[derive(ToSchema)]
pub struct LoginFormDoc {
    #[schema(rename = "userID")]
    pub user_id: String,
    pub password: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::user::login_check,
        crate::routes::user::check_password,
        crate::routes::message::approved_list,
        crate::routes::message::own_list,
        crate::routes::message::pending_list,
        crate::routes::order::own_list,
        crate::routes::order::day_orders,
        crate::routes::order::pending_list,
        crate::routes::venue::venue_page,
        crate::routes::venue::admin_venue_list,
        crate::routes::venue::check_venue_name,
        crate::routes::news::news_page,
        crate::routes::news::admin_news_list,
        crate::routes::admin_user::user_list,
        crate::routes::admin_user::check_user_id,
    ),
    components(
        schemas(
            HealthResponse,
            LoginFormDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "user"),
        (name = "message"),
        (name = "order"),
        (name = "venue"),
        (name = "news"),
        (name = "admin")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_json_endpoints() {
        let doc = ApiDoc::openapi();
        for path in ["/health", "/loginCheck.do", "/venuelist/getVenueList", "/order/getOrderList.do", "/checkUserID.do"] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }

    #[test]
    fn form_checks_document_their_params() {
        let json = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let names = |path: &str, method: &str| -> Vec<String> {
            json["paths"][path][method]["parameters"]
                .as_array()
                .map(|ps| ps.iter().filter_map(|p| p["name"].as_str().map(str::to_string)).collect())
                .unwrap_or_default()
        };
        assert_eq!(names("/checkPassword.do", "get"), vec!["userID", "password"]);
        assert_eq!(names("/checkUserID.do", "post"), vec!["userID"]);
        assert_eq!(names("/checkVenueName.do", "post"), vec!["venueName"]);
    }
}
