mod auth;
mod error_handler;
mod rate_limit;

pub use auth::{
    api_key_permission_check, api_permission_check, staff_admin_required, super_admin_required,
    token_required,
};
pub use error_handler::log_errors;
pub use rate_limit::{RateLimiter, rate_limit};
