//! urichain-core — outcome codes, cross-boundary resource shapes, ids and
//! configuration. Every other urichain crate depends on this one.

pub mod config;
pub mod ids;
pub mod resource;
pub mod ret_code;

pub use ids::{RequestId, SessionId};
pub use resource::{parse_resource, DirectBuffer, RawUriResource, UriResource};
pub use ret_code::RetCode;
