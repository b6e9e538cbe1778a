//! Outcome codes for content requests.
//!
//! Every completion, sync or async, carries exactly one `RetCode`. The host
//! side sends outcomes as ordinals in declaration order, so the order of the
//! variants below is part of the boundary contract.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How a content request concluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetCode {
    Success,
    Failed,
    DelegateError,
    UriError,
    SchemeError,
    /// No handler in the chain claimed the request.
    SchemeNotRegister,
    PathNotMatch,
    PathError,
    ResourceNotFound,
    Timeout,
}

const ALL: [RetCode; 10] = [
    RetCode::Success,
    RetCode::Failed,
    RetCode::DelegateError,
    RetCode::UriError,
    RetCode::SchemeError,
    RetCode::SchemeNotRegister,
    RetCode::PathNotMatch,
    RetCode::PathError,
    RetCode::ResourceNotFound,
    RetCode::Timeout,
];

impl RetCode {
    /// Map a host ordinal to an outcome. Anything out of range is `Failed`.
    pub fn from_host(code: i32) -> Self {
        usize::try_from(code)
            .ok()
            .and_then(|i| ALL.get(i).copied())
            .unwrap_or(RetCode::Failed)
    }

    /// The ordinal the host uses for this outcome.
    pub fn host_code(self) -> i32 {
        self as i32
    }

    pub fn is_success(self) -> bool {
        self == RetCode::Success
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RetCode::Success => "success",
            RetCode::Failed => "failed",
            RetCode::DelegateError => "delegate_error",
            RetCode::UriError => "uri_error",
            RetCode::SchemeError => "scheme_error",
            RetCode::SchemeNotRegister => "scheme_not_register",
            RetCode::PathNotMatch => "path_not_match",
            RetCode::PathError => "path_error",
            RetCode::ResourceNotFound => "resource_not_found",
            RetCode::Timeout => "timeout",
        }
    }
}

impl fmt::Display for RetCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown outcome code: {0}")]
pub struct UnknownRetCode(pub String);

impl FromStr for RetCode {
    type Err = UnknownRetCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL.iter()
            .copied()
            .find(|code| code.as_str() == s)
            .ok_or_else(|| UnknownRetCode(s.to_string()))
    }
}
