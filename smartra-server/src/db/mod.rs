//! Database layer - connection pool, schema, and repositories
//!
//! The pool is the only storage handle. Handlers borrow it from request
//! state and build a repository per request; there is no global session.
//! Reads join the author row in the same query.

pub mod migrations;
pub mod pool;
pub mod repos;

pub use pool::{create_pool, pool_options};
pub use repos::*;
