//! Host → native entry points.
//!
//! Everything the host can call lives here. Each entry point looks the
//! session up by id first; an unknown session is logged and the call does
//! nothing. None of these calls can fail the process: bad input degrades to
//! an outcome code or a logged drop.

use urichain_core::{parse_resource, RawUriResource, RequestId, SessionId, UriResource};

use crate::session::{Session, SessionRegistry};

#[derive(Clone)]
pub struct Boundary {
    sessions: SessionRegistry,
}

impl Boundary {
    pub fn new(sessions: SessionRegistry) -> Self {
        Self { sessions }
    }

    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    fn session(&self, id: SessionId, entry: &'static str) -> Option<std::sync::Arc<Session>> {
        let session = self.sessions.find(id);
        if session.is_none() {
            tracing::warn!(session_id = %id, entry, "session id invalid");
        }
        session
    }

    /// The host now has a delegate of its own for `session_id`.
    pub fn notify_native_delegate_registered(&self, session_id: SessionId) {
        tracing::debug!(session_id = %session_id, "notify_native_delegate_registered");
        if let Some(session) = self.session(session_id, "notify_native_delegate_registered") {
            session.delegate().set_external_delegate();
        }
    }

    /// Deliver the host's answer for one async request.
    ///
    /// The pending entry is consumed whatever shape `resource` has. Content
    /// is copied before the callback runs; the host may free it as soon as
    /// this returns.
    pub fn deliver_async_result(
        &self,
        session_id: SessionId,
        resource: Option<RawUriResource<'_>>,
        request_id: RequestId,
    ) {
        tracing::debug!(session_id = %session_id, request_id = %request_id, "deliver_async_result");
        let Some(session) = self.session(session_id, "deliver_async_result") else {
            return;
        };
        let Some(cb) = session.requests().take(request_id) else {
            tracing::warn!(session_id = %session_id, request_id = %request_id, "no pending request for id");
            return;
        };
        if resource.is_none() {
            tracing::debug!(request_id = %request_id, "host delivered no resource");
        }
        let UriResource { ret_code, content } = parse_resource(resource);
        cb(ret_code, content);
    }

    /// Let the host ask what the native loader chain returns for `uri`,
    /// bypassing the host delegate. `None` if the session or its loader is
    /// unavailable.
    pub fn fetch_next_sync(&self, session_id: SessionId, uri: &str) -> Option<UriResource> {
        tracing::debug!(session_id = %session_id, uri, "fetch_next_sync");
        let session = self.session(session_id, "fetch_next_sync")?;
        let resource = session.fetch_next_sync(uri);
        if resource.is_none() {
            tracing::warn!(session_id = %session_id, "fetch_next_sync, loader invalid");
        }
        resource
    }

    /// Async counterpart of [`fetch_next_sync`](Self::fetch_next_sync). If
    /// the session or its loader is unavailable the request is dropped, `cb`
    /// is never called and this returns false.
    pub fn fetch_next_async<F>(&self, session_id: SessionId, uri: &str, cb: F) -> bool
    where
        F: FnOnce(UriResource) + Send + 'static,
    {
        tracing::debug!(session_id = %session_id, uri, "fetch_next_async");
        let Some(session) = self.session(session_id, "fetch_next_async") else {
            return false;
        };
        let dispatched = session.fetch_next_async(uri, cb);
        if !dispatched {
            tracing::warn!(session_id = %session_id, "fetch_next_async, loader invalid");
        }
        dispatched
    }
}
