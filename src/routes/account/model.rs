use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct PermissionCodesResponse {
    pub account_id: i64,
    pub codes: Vec<String>,
}
