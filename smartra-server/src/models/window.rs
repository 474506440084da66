//! Offset/limit windows for list endpoints

use serde::Deserialize;

/// Upper bound for `limit`
pub const MAX_LIMIT: i64 = 100;

/// Default `limit` when none is given
pub const DEFAULT_LIMIT: i64 = 100;

/// Slice of a result set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    /// Rows to skip
    pub skip: i64,
    /// Rows to return (1..=100)
    pub limit: i64,
}

impl Window {
    /// Create a window, clamping `skip` to >= 0 and `limit` to 1..=100.
    pub fn new(skip: i64, limit: i64) -> Self {
        Self {
            skip: skip.max(0),
            limit: limit.clamp(1, MAX_LIMIT),
        }
    }
}

impl Default for Window {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// Query parameters for a window
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WindowParams {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

impl From<WindowParams> for Window {
    fn from(params: WindowParams) -> Self {
        Self::new(
            params.skip.unwrap_or(0),
            params.limit.unwrap_or(DEFAULT_LIMIT),
        )
    }
}
