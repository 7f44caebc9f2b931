pub mod admin_handlers;
pub mod service;
pub mod user_handlers;

pub use service::UserService;
