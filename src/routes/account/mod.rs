mod handler;
mod model;

pub use handler::{account_detail, permission_codes, refresh_permissions};
