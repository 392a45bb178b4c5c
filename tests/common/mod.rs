#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use chrono::Utc;
use serde_json::Value;
use tower::ServiceExt;
use user_center::{
    AppState,
    cache::{CacheOp, KvCache, MemoryCache, operations::SessionCacheOperations},
    config::Config,
    database::{
        MemoryCredentialStore,
        models::{Account, Resource, ResourceSubType, ResourceType, Role, Status, TokenScene},
    },
    router::create_router,
    utils::hmac_sha256_hex,
};

pub const PASSWORD: &str = "Abcdef12";

pub const SUPER_ADMIN_ID: i64 = 1;
pub const STAFF_ID: i64 = 2;
pub const MEMBER_ID: i64 = 3;
pub const ROLE_ID: i64 = 10;
pub const DETAIL_RESOURCE_ID: i64 = 100;

pub const DETAIL_CODE: &str = "UserCenter:GET:/user/v1/accounts/{id}";
pub const PING_CODE: &str = "UserCenter:GET:/user/v1/open/ping";

pub const API_KEY: &str = "svc-order";
pub const API_SECRET: &str = "order-secret";

fn account(id: i64, username: &str, phone: &str) -> Account {
    Account {
        id,
        username: username.to_string(),
        phone: phone.to_string(),
        email: Some(format!("{}@example.com", username)),
        password: bcrypt::hash(PASSWORD, 4).unwrap(),
        is_staff: false,
        is_super_admin: false,
        status: Status::Enable,
        role_id: ROLE_ID,
        last_login_at: None,
        remark: String::new(),
        created_at: Utc::now(),
        deleted_at: None,
    }
}

pub struct TestApp {
    pub cache: Arc<MemoryCache>,
    pub store: Arc<MemoryCredentialStore>,
    pub router: Router,
}

impl TestApp {
    pub async fn new() -> Self {
        let store = MemoryCredentialStore::new();

        let mut admin = account(SUPER_ADMIN_ID, "admin", "13900000001");
        admin.is_super_admin = true;
        admin.is_staff = true;
        let mut staff = account(STAFF_ID, "staff", "13900000002");
        staff.is_staff = true;
        store.insert_account(admin).await;
        store.insert_account(staff).await;
        store.insert_account(account(MEMBER_ID, "member", "13900000003")).await;

        store
            .insert_role(Role {
                id: ROLE_ID,
                label: "客服".into(),
                remark: None,
                deleted_at: None,
            })
            .await;
        store
            .insert_resource(
                Resource {
                    id: DETAIL_RESOURCE_ID,
                    code: "account:detail".into(),
                    label: "账户详情".into(),
                    front_route: None,
                    resource_type: ResourceType::Api,
                    sub_resource_type: ResourceSubType::Ajax,
                    order_num: 0,
                    enabled: true,
                    assignable: true,
                    parent_id: None,
                    scene: TokenScene::General,
                },
                &[ROLE_ID],
                &[DETAIL_CODE],
            )
            .await;

        let cache = Arc::new(MemoryCache::new());
        let store = Arc::new(store);
        let state = AppState::new(Config::default(), cache.clone(), store.clone());

        Self {
            cache,
            store,
            router: create_router(state),
        }
    }

    pub async fn send(&self, req: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    /// 走登录接口，返回 token
    pub async fn login(&self, identifier: &str, scene: &str) -> String {
        let (status, body) = self
            .send(post_json(
                "/user/v1/auth/login/pwd",
                serde_json::json!({
                    "identifier": identifier,
                    "password": PASSWORD,
                    "scene": scene,
                }),
            ))
            .await;
        assert_eq!(status, StatusCode::OK, "{}", body);
        assert_eq!(body["code"], 0, "{}", body);
        body["resp_data"]["token"].as_str().unwrap().to_string()
    }

    /// 直接写入会话，不经过密码校验
    pub async fn issue_token(&self, account_id: i64, scene: TokenScene, token: &str) {
        SessionCacheOperations::issue(self.cache.as_ref(), account_id, scene, token, 3600)
            .await
            .unwrap();
    }

    pub async fn register_api_key(&self, codes: &[&str]) {
        self.cache
            .execute(vec![
                CacheOp::SetEx {
                    key: format!("ApiKey:SecretKey:{}", API_KEY),
                    value: API_SECRET.into(),
                    ttl_secs: 3600,
                },
                CacheOp::SAdd {
                    key: format!("ApiKey:Apis:{}", API_KEY),
                    members: codes.iter().map(|c| c.to_string()).collect(),
                },
            ])
            .await
            .unwrap();
    }
}

pub fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("POST").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn signed_get(uri: &str, api_key: &str, secret: &str, timestamp: i64) -> Request<Body> {
    let sign = hmac_sha256_hex(secret, &format!("{}&{}", api_key, timestamp));
    Request::builder()
        .method("GET")
        .uri(uri)
        .header("x-api-key", api_key)
        .header("x-timestamp", timestamp.to_string())
        .header("x-sign", sign)
        .body(Body::empty())
        .unwrap()
}
