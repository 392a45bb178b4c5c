use axum::{Json, extract::Extension};
use serde::Serialize;

use crate::{
    auth::ApiCaller,
    result::ApiResponse,
    utils::success_to_api_response,
};

#[derive(Debug, Serialize)]
pub struct PingResponse {
    pub api_key: String,
    pub scene: &'static str,
}

/// 服务间调用连通性探测
#[axum::debug_handler]
pub async fn ping(Extension(caller): Extension<ApiCaller>) -> Json<ApiResponse<PingResponse>> {
    success_to_api_response(PingResponse {
        api_key: caller.api_key,
        scene: ApiCaller::SCENE,
    })
}
