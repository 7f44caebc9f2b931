//! # Portico Core
//!
//! Domain layer for the Portico user-account service.
//!
//! This crate owns everything the HTTP layer builds on:
//!
//! - **User model**: the persisted [`user::User`] row, the sanitized
//!   [`user::UserProfile`] snapshot, and [`user::Role`].
//! - **Repositories**: the [`repository::UserRepository`] port with a
//!   Postgres adapter plus an in-memory adapter for tests.
//! - **Sessions**: opaque token issuance and the [`session::SessionStore`]
//!   port backed by a TTL-capable key-value store (Redis in production).

pub mod api;
pub mod error;
pub mod repository;
pub mod session;
pub mod user;

pub use error::{CoreError, Result};
pub use user::{Role, User, UserProfile};
