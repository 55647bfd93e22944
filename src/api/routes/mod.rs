//! API route handlers

pub mod daily;
pub mod health;
pub mod instant;
pub mod stats;
