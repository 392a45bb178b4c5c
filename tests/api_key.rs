mod common;

use axum::http::StatusCode;
use chrono::Utc;

use common::{API_KEY, API_SECRET, PING_CODE, TestApp, get, signed_get};

const PING: &str = "/user/v1/open/ping";

#[tokio::test]
async fn signed_request_reaches_handler() {
    let app = TestApp::new().await;
    app.register_api_key(&[PING_CODE]).await;

    let (status, body) = app
        .send(signed_get(PING, API_KEY, API_SECRET, Utc::now().timestamp()))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["resp_data"]["api_key"], API_KEY);
    assert_eq!(body["resp_data"]["scene"], "ApiCall");
}

#[tokio::test]
async fn stale_timestamp_is_rejected() {
    let app = TestApp::new().await;
    app.register_api_key(&["UserCenter:*"]).await;

    // 留出请求耗时的余量
    let now = Utc::now().timestamp();
    let (status, _) = app.send(signed_get(PING, API_KEY, API_SECRET, now - 25)).await;
    assert_eq!(status, StatusCode::OK);

    for ts in [now - 40, now + 40] {
        let (status, body) = app.send(signed_get(PING, API_KEY, API_SECRET, ts)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], 40110);
        assert_eq!(body["msg"], "无效的ApiKey");
    }
}

#[tokio::test]
async fn key_failures_look_identical() {
    let app = TestApp::new().await;
    app.register_api_key(&["UserCenter:*"]).await;
    let now = Utc::now().timestamp();

    let cases = [
        signed_get(PING, "unknown", API_SECRET, now),
        signed_get(PING, API_KEY, "forged", now),
        signed_get(PING, API_KEY, API_SECRET, now - 3600),
        get(PING, None),
    ];
    for req in cases {
        let (status, body) = app.send(req).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], 40110);
        assert_eq!(body["msg"], "无效的ApiKey");
    }
}

#[tokio::test]
async fn global_wildcard_does_not_apply_to_api_keys() {
    let app = TestApp::new().await;
    app.register_api_key(&["*", "Other:*"]).await;

    let (status, _) = app
        .send(signed_get(PING, API_KEY, API_SECRET, Utc::now().timestamp()))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
