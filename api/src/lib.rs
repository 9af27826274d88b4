//! Chirpy: a small social-posting backend.
//!
//! - File-backed snapshot store with serialized writes
//! - User, chirp and revoked-token repositories on top of it
//! - JWT access/refresh tokens and bcrypt password hashing
//! - A thin axum HTTP layer

pub mod auth;
pub mod bootstrap;
pub mod config;
pub mod content;
pub mod dto;
pub mod errors;
pub mod metrics;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod states;
pub mod store;

pub use states::AppState;
