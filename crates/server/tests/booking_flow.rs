mod support;

use axum::http::StatusCode;
use serde_json::Value;
use support::{body_json, body_text, build_app, location, unique, TestApp};

async fn add_venue(t: &TestApp, admin: &str, price: &str) -> anyhow::Result<(String, i64)> {
    let name = unique("court");
    let fields = [
        ("venueName", name.as_str()),
        ("description", "Indoor court"),
        ("price", price),
        ("address", "1 Sports Road"),
        ("open_time", "08:00"),
        ("close_time", "22:00"),
    ];
    let resp = t.post_multipart("/addVenue.do", &fields, Some(("court.jpg", b"jpeg bytes")), Some(admin)).await?;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp).as_deref(), Some("venue_manage"));

    let list = body_json(t.get("/venueList.do", Some(admin)).await?).await?;
    let id = find_by(&list, "venue_name", &name)["id"].as_i64().unwrap_or_default();
    Ok((name, id))
}

fn find_by<'a>(list: &'a Value, key: &str, value: &str) -> &'a Value {
    list.as_array()
        .and_then(|l| l.iter().find(|v| v[key] == value))
        .unwrap_or(&Value::Null)
}

#[tokio::test]
async fn venue_management() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
    let t = build_app().await?;
    let admin = t.admin_cookie().await?;
    let (name, id) = add_venue(&t, &admin, "40").await?;
    assert!(id > 0);

    let taken = t.post_form("/checkVenueName.do", &format!("venueName={name}"), Some(&admin)).await?;
    assert_eq!(body_text(taken).await?, "false");
    let dup = [("venueName", name.as_str()), ("price", "10"), ("address", "x"), ("open_time", "08:00"), ("close_time", "20:00")];
    assert_eq!(t.post_multipart("/addVenue.do", &dup, None, Some(&admin)).await?.status(), StatusCode::CONFLICT);
    let bad_price = [("venueName", "other"), ("price", "cheap"), ("address", "x"), ("open_time", "08:00"), ("close_time", "20:00")];
    assert_eq!(t.post_multipart("/addVenue.do", &bad_price, None, Some(&admin)).await?.status(), StatusCode::BAD_REQUEST);

    let detail = body_json(t.get(&format!("/venue?venueID={id}"), None).await?).await?;
    assert_eq!(detail["model"]["venue"]["price"], 40);
    assert!(detail["model"]["venue"]["picture"].as_str().unwrap_or_default().ends_with(".jpg"));

    let id_s = id.to_string();
    let edit = [
        ("venueID", id_s.as_str()),
        ("venueName", name.as_str()),
        ("description", "Renovated"),
        ("price", "55"),
        ("address", "1 Sports Road"),
        ("open_time", "07:00"),
        ("close_time", "23:00"),
    ];
    assert_eq!(t.post_multipart("/modifyVenue.do", &edit, None, Some(&admin)).await?.status(), StatusCode::FOUND);
    let page = body_json(t.get("/venuelist/getVenueList?page=1", None).await?).await?;
    let listed = find_by(&page["content"], "venue_name", &name);
    assert_eq!(listed["price"], 55);
    assert!(listed["picture"].as_str().unwrap_or_default().ends_with(".jpg"));

    let del = t.post_form("/delVenue.do", &format!("venueID={id}"), Some(&admin)).await?;
    assert_eq!(body_text(del).await?, "true");
    assert_eq!(t.get(&format!("/venue?venueID={id}"), None).await?.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn order_lifecycle() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
    let t = build_app().await?;
    let admin = t.admin_cookie().await?;
    let (venue, venue_id) = add_venue(&t, &admin, "30").await?;
    let (user_id, cookie) = t.user_cookie().await?;
    let (_, stranger) = t.user_cookie().await?;

    let form = format!("venueName={venue}&date=2024-05-01&startTime=08:00&hours=2");
    let resp = t.post_form("/addOrder.do", &form, Some(&cookie)).await?;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp).as_deref(), Some("order_manage"));

    let bad_hours = format!("venueName={venue}&date=2024-05-01&startTime=08:00&hours=0");
    assert_eq!(t.post_form("/addOrder.do", &bad_hours, Some(&cookie)).await?.status(), StatusCode::BAD_REQUEST);
    let bad_date = format!("venueName={venue}&date=01/05/2024&startTime=08:00&hours=1");
    assert_eq!(t.post_form("/addOrder.do", &bad_date, Some(&cookie)).await?.status(), StatusCode::BAD_REQUEST);
    let no_venue = "venueName=nowhere&date=2024-05-01&startTime=08:00&hours=1";
    assert_eq!(t.post_form("/addOrder.do", no_venue, Some(&cookie)).await?.status(), StatusCode::NOT_FOUND);

    let own = body_json(t.get("/getOrderList.do?page=1", Some(&cookie)).await?).await?;
    let order = find_by(&own, "venue_name", &venue).clone();
    assert_eq!(order["user_id"], user_id.as_str());
    assert_eq!(order["total"], 60);
    assert_eq!(order["state"], "pending");
    assert_eq!(order["start_time"], "2024-05-01 08:00:00");
    let id = order["id"].as_i64().unwrap_or_default();

    let place = body_json(t.get(&format!("/order_place.do?venueID={venue_id}"), Some(&cookie)).await?).await?;
    assert_eq!(place["model"]["venue"]["venue_name"], venue.as_str());
    let day = body_json(t.get(&format!("/order/getOrderList.do?venueName={venue}&date=2024-05-01"), None).await?).await?;
    assert_eq!(day["orders"].as_array().map(Vec::len), Some(1));
    let other_day = body_json(t.get(&format!("/order/getOrderList.do?venueName={venue}&date=2024-05-02"), None).await?).await?;
    assert_eq!(other_day["orders"].as_array().map(Vec::len), Some(0));

    // 他人订单
    assert_eq!(t.post_form("/delOrder.do", &format!("orderID={id}"), Some(&stranger)).await?.status(), StatusCode::FORBIDDEN);
    assert_eq!(t.get(&format!("/modifyOrder.do?orderID={id}"), Some(&stranger)).await?.status(), StatusCode::FORBIDDEN);

    let modify = format!("orderID={id}&venueName={venue}&date=2024-05-01&startTime=10:00&hours=3");
    assert_eq!(t.post_form("/modifyOrder", &modify, Some(&cookie)).await?.status(), StatusCode::FOUND);

    assert_eq!(t.get("/admin/getOrderList.do?page=0", Some(&admin)).await?.status(), StatusCode::BAD_REQUEST);
    assert_eq!(t.get("/admin/getOrderList.do?page=abc", Some(&admin)).await?.status(), StatusCode::BAD_REQUEST);
    let pending = body_json(t.get("/admin/getOrderList.do", Some(&admin)).await?).await?;
    let listed = find_by(&pending, "venue_name", &venue);
    assert_eq!(listed["total"], 90);

    let pass = t.post_form("/passOrder.do", &format!("orderID={id}"), Some(&admin)).await?;
    assert_eq!(body_text(pass).await?, "true");
    let missing = t.post_form("/passOrder.do", "orderID=999999", Some(&admin)).await?;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_text(missing).await?, "false");

    let manage = body_json(t.get("/reservation_manage", Some(&admin)).await?).await?;
    assert_eq!(find_by(&manage["model"]["order_list"], "venue_name", &venue)["state"], "approved");

    let finish = t.post_form("/finishOrder.do", &format!("orderID={id}"), Some(&cookie)).await?;
    assert_eq!(body_text(finish).await?, "true");
    let del = t.post_form("/delOrder.do", &format!("orderID={id}"), Some(&cookie)).await?;
    assert_eq!(body_text(del).await?, "true");
    assert_eq!(t.post_form("/delOrder.do", &format!("orderID={id}"), Some(&cookie)).await?.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn message_moderation() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
    let t = build_app().await?;
    let admin = t.admin_cookie().await?;
    let (user_id, cookie) = t.user_cookie().await?;
    let (_, stranger) = t.user_cookie().await?;
    let content = unique("hello");

    let resp = t.post_form("/sendMessage", &format!("content={content}"), Some(&cookie)).await?;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp).as_deref(), Some("/message_list"));

    let own = body_json(t.get("/message/findUserList", Some(&cookie)).await?).await?;
    let msg = find_by(&own, "content", &content).clone();
    assert_eq!(msg["state"], "pending");
    assert_eq!(msg["user_id"], user_id.as_str());
    let id = msg["id"].as_i64().unwrap_or_default();

    let public = body_json(t.get("/message/getMessageList", None).await?).await?;
    assert!(find_by(&public, "content", &content).is_null());

    assert_eq!(t.post_form("/delMessage.do", &format!("messageID={id}"), Some(&stranger)).await?.status(), StatusCode::FORBIDDEN);
    let edit = t.post_form("/modifyMessage.do", &format!("messageID={id}&content={content}"), Some(&stranger)).await?;
    assert_eq!(edit.status(), StatusCode::FORBIDDEN);

    let pending = body_json(t.get("/messageList.do", Some(&admin)).await?).await?;
    assert_eq!(find_by(&pending, "content", &content)["user_name"], "Tester");
    let pass = t.post_form("/passMessage.do", &format!("messageID={id}"), Some(&admin)).await?;
    assert_eq!(body_text(pass).await?, "true");
    assert_eq!(t.post_form("/passMessage.do", "messageID=999999", Some(&admin)).await?.status(), StatusCode::NOT_FOUND);

    let public = body_json(t.get("/message/getMessageList?page=1", None).await?).await?;
    let shown = find_by(&public, "content", &content);
    assert_eq!(shown["user_name"], "Tester");
    assert_eq!(shown["state"], "approved");

    let page = body_json(t.get("/message_list", Some(&cookie)).await?).await?;
    assert_eq!(page["model"]["user_total"], 1);

    let del = t.post_form("/delMessage.do", &format!("messageID={id}"), Some(&admin)).await?;
    assert_eq!(body_text(del).await?, "true");
    let again = t.post_form("/delMessage.do", &format!("messageID={id}"), Some(&cookie)).await?;
    assert_eq!(again.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn rejected_order_and_message() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
    let t = build_app().await?;
    let admin = t.admin_cookie().await?;
    let (venue, _) = add_venue(&t, &admin, "20").await?;
    let (_, cookie) = t.user_cookie().await?;

    let form = format!("venueName={venue}&date=2024-06-01&startTime=18:00&hours=1");
    assert_eq!(t.post_form("/addOrder.do", &form, Some(&cookie)).await?.status(), StatusCode::FOUND);
    let own = body_json(t.get("/getOrderList.do", Some(&cookie)).await?).await?;
    let order_id = find_by(&own, "venue_name", &venue)["id"].as_i64().unwrap_or_default();

    let reject = t.post_form("/rejectOrder.do", &format!("orderID={order_id}"), Some(&admin)).await?;
    assert_eq!(body_text(reject).await?, "true");
    let missing = t.post_form("/rejectOrder.do", "orderID=999999", Some(&admin)).await?;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_text(missing).await?, "false");
    let own = body_json(t.get("/getOrderList.do", Some(&cookie)).await?).await?;
    assert_eq!(find_by(&own, "venue_name", &venue)["state"], "rejected");
    let pending = body_json(t.get("/admin/getOrderList.do", Some(&admin)).await?).await?;
    assert!(find_by(&pending, "venue_name", &venue).is_null());

    let content = unique("spam");
    t.post_form("/sendMessage", &format!("content={content}"), Some(&cookie)).await?;
    let mine = body_json(t.get("/message/findUserList", Some(&cookie)).await?).await?;
    let message_id = find_by(&mine, "content", &content)["id"].as_i64().unwrap_or_default();

    let reject = t.post_form("/rejectMessage.do", &format!("messageID={message_id}"), Some(&admin)).await?;
    assert_eq!(body_text(reject).await?, "true");
    let missing = t.post_form("/rejectMessage.do", "messageID=999999", Some(&admin)).await?;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    assert_eq!(t.post_form("/rejectMessage.do", "messageID=0", Some(&admin)).await?.status(), StatusCode::BAD_REQUEST);

    let mine = body_json(t.get("/message/findUserList", Some(&cookie)).await?).await?;
    assert_eq!(find_by(&mine, "content", &content)["state"], "rejected");
    let public = body_json(t.get("/message/getMessageList", None).await?).await?;
    assert!(find_by(&public, "content", &content).is_null());
    let queue = body_json(t.get("/messageList.do", Some(&admin)).await?).await?;
    assert!(find_by(&queue, "content", &content).is_null());
    Ok(())
}

#[tokio::test]
async fn failed_venue_writes_leave_no_upload_behind() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
    let t = build_app().await?;
    let admin = t.admin_cookie().await?;
    let (name, _) = add_venue(&t, &admin, "25").await?;
    let before = t.uploaded_files();
    assert_eq!(before, 1);

    let dup = [("venueName", name.as_str()), ("price", "10"), ("address", "x"), ("open_time", "08:00"), ("close_time", "20:00")];
    let resp = t.post_multipart("/addVenue.do", &dup, Some(("dup.png", b"png bytes")), Some(&admin)).await?;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    assert_eq!(t.uploaded_files(), before);

    let gone = [
        ("venueID", "999999"),
        ("venueName", "ghost"),
        ("price", "10"),
        ("address", "x"),
        ("open_time", "08:00"),
        ("close_time", "20:00"),
    ];
    let resp = t.post_multipart("/modifyVenue.do", &gone, Some(("ghost.png", b"png bytes")), Some(&admin)).await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(t.uploaded_files(), before);
    Ok(())
}
