//! Portico server library.
//!
//! HTTP surface for the user-account service: configuration, application
//! state, the access-gate middleware, and the auth / user / admin handlers.
//! Domain types and the session store live in `portico-core`.

pub mod auth;
pub mod infra;
pub mod routes;
pub mod users;

#[cfg(test)]
mod tests;

pub use infra::app_state::AppState;
pub use infra::config::Config;
