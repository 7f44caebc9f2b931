//! Authentication and authorization: the access gate, the declarative path
//! policy, the per-request identity, and the login/logout handlers.

pub mod current_user;
pub mod handlers;
pub mod middleware;
pub mod policy;

pub use current_user::CurrentUser;
pub use middleware::access_gate;
