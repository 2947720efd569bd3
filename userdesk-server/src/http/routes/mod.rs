//! Route handlers
//!
//! - health: liveness endpoint
//! - users: JSON API for user records
//! - views: HTML pages over the same users model

pub mod health;
pub mod users;
pub mod views;
