//! Native → host calls, and which of them the host has actually wired.
//!
//! Each host entry point is its own trait. A session is built with a
//! [`HostMethods`] value that says, once, which ones are present; the
//! delegate never probes for a missing method per call.

use std::fmt;
use std::sync::Arc;

use urichain_core::{RequestId, SessionId, UriResource};

/// A host call that could not be completed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoundaryError {
    #[error("host is detached")]
    Detached,
    #[error("host call failed: {0}")]
    CallFailed(String),
}

/// Blocking resolution on the host side.
pub trait SyncContentHost: Send + Sync {
    /// Resolve `uri` before returning. `Ok(None)` means the host produced no
    /// resource object.
    fn fetch_sync(&self, session: SessionId, uri: &str)
        -> Result<Option<UriResource>, BoundaryError>;
}

/// Non-blocking resolution on the host side.
pub trait AsyncContentHost: Send + Sync {
    /// Start resolving `uri`. The host answers later through
    /// [`Boundary::deliver_async_result`](crate::Boundary::deliver_async_result)
    /// with the same `request_id`.
    fn fetch_async(
        &self,
        session: SessionId,
        uri: &str,
        request_id: RequestId,
    ) -> Result<(), BoundaryError>;
}

/// Told when a native delegate chain exists for a session.
pub trait RegistrationListener: Send + Sync {
    fn core_delegate_registered(&self, session: SessionId) -> Result<(), BoundaryError>;
}

/// Host entry points bound for a session. `None` means the host did not wire
/// that method.
#[derive(Clone, Default)]
pub struct HostMethods {
    pub sync_fetch: Option<Arc<dyn SyncContentHost>>,
    pub async_fetch: Option<Arc<dyn AsyncContentHost>>,
    pub registration: Option<Arc<dyn RegistrationListener>>,
}

impl HostMethods {
    /// Nothing wired.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_sync(mut self, host: Arc<dyn SyncContentHost>) -> Self {
        self.sync_fetch = Some(host);
        self
    }

    pub fn with_async(mut self, host: Arc<dyn AsyncContentHost>) -> Self {
        self.async_fetch = Some(host);
        self
    }

    pub fn with_registration(mut self, listener: Arc<dyn RegistrationListener>) -> Self {
        self.registration = Some(listener);
        self
    }

    /// Bind every method to one object implementing all three.
    pub fn all<H>(host: Arc<H>) -> Self
    where
        H: SyncContentHost + AsyncContentHost + RegistrationListener + 'static,
    {
        Self {
            sync_fetch: Some(host.clone()),
            async_fetch: Some(host.clone()),
            registration: Some(host),
        }
    }
}

impl fmt::Debug for HostMethods {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostMethods")
            .field("sync_fetch", &self.sync_fetch.is_some())
            .field("async_fetch", &self.async_fetch.is_some())
            .field("registration", &self.registration.is_some())
            .finish()
    }
}
