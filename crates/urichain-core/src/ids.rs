//! Numeric identifiers that cross the host boundary.
//!
//! Both are 64-bit signed integers on the host side, so they stay `i64`
//! here rather than being re-encoded.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies one runtime session. Assigned by whoever creates the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub i64);

/// Correlation token for one outstanding async request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(pub i64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for SessionId {
    fn from(v: i64) -> Self {
        SessionId(v)
    }
}

impl From<i64> for RequestId {
    fn from(v: i64) -> Self {
        RequestId(v)
    }
}
