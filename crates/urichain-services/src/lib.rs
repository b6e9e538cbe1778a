//! urichain-services — the delegation chain that sits between a native
//! content engine and its embedding host.
//!
//! Requests enter through a session's [`HostDelegate`]. When the host has
//! announced a delegate of its own, the request crosses the boundary;
//! otherwise it continues down the session's [`UriChain`]. Async answers
//! come back through [`Boundary::deliver_async_result`] and are matched to
//! their callback by the session's [`RequestTable`].

pub mod boundary;
pub mod context;
pub mod delegate;
pub mod handler;
pub mod host;
pub mod memory_loader;
pub mod request_table;
pub mod session;

pub use boundary::Boundary;
pub use context::{AsyncContext, CompletionCallback, SyncContext};
pub use delegate::HostDelegate;
pub use handler::{AsyncDisposition, Disposition, UriChain, UriHandler};
pub use host::{AsyncContentHost, BoundaryError, HostMethods, RegistrationListener, SyncContentHost};
pub use memory_loader::MemoryLoader;
pub use request_table::RequestTable;
pub use session::{Session, SessionRegistry};
