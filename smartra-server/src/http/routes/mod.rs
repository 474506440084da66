//! Route handlers organized by resource

pub mod health;
pub mod root;
pub mod users;
pub mod patterns;
pub mod posts;
pub mod calculator;
