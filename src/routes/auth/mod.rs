mod handler;
mod model;

pub use handler::{
    change_password, login_with_code, login_with_password, logout, myself, reset_password,
};
pub use model::{AccountDetail, LoginResponse};
