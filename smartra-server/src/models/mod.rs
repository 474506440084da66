//! Request-side domain models
//!
//! Inputs are taken as given: the only checks are the ones needed to coerce
//! form and query values into their types.

pub mod validation;
pub mod user;
pub mod pattern;
pub mod post;
pub mod window;

pub use validation::ValidationError;
pub use user::NewUser;
pub use pattern::{NewPattern, PatternFields, PatternFilter};
pub use post::{NewPost, PostFilter};
pub use window::{Window, WindowParams};
