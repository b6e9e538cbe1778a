//! Session management — one delegate, loader chain and request table per
//! runtime session, looked up by id.

use std::sync::Arc;

use dashmap::DashMap;
use urichain_core::{RetCode, SessionId, UriResource};

use crate::context::{AsyncContext, SyncContext};
use crate::delegate::HostDelegate;
use crate::handler::UriChain;
use crate::host::HostMethods;
use crate::request_table::RequestTable;

/// A runtime session as seen by the delegation chain.
pub struct Session {
    id: SessionId,
    delegate: Arc<HostDelegate>,
    /// Everything behind the host delegate. `None` if no loader is attached.
    loader: Option<UriChain>,
    requests: Arc<RequestTable>,
}

impl Session {
    /// A session with its own request table.
    pub fn new(id: SessionId, methods: HostMethods, loader: Option<UriChain>) -> Self {
        Self::with_requests(id, methods, loader, Arc::new(RequestTable::new()))
    }

    /// A session using an injected request table.
    pub fn with_requests(
        id: SessionId,
        methods: HostMethods,
        loader: Option<UriChain>,
        requests: Arc<RequestTable>,
    ) -> Self {
        let delegate = Arc::new(HostDelegate::new(id, methods, requests.clone()));
        Self {
            id,
            delegate,
            loader,
            requests,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn delegate(&self) -> &Arc<HostDelegate> {
        &self.delegate
    }

    pub fn loader(&self) -> Option<&UriChain> {
        self.loader.as_ref()
    }

    pub fn requests(&self) -> &Arc<RequestTable> {
        &self.requests
    }

    /// Resolve through the whole chain, host delegate first. Blocks while
    /// the host answers.
    pub fn request_sync(&self, uri: &str) -> UriResource {
        let mut ctx = SyncContext::new(uri);
        self.delegate.resolve_sync(&mut ctx, self.loader.as_ref());
        ctx.into_resource()
    }

    /// Resolve through the whole chain without blocking.
    pub fn request_async<F>(&self, uri: &str, cb: F)
    where
        F: FnOnce(RetCode, bytes::Bytes) + Send + 'static,
    {
        self.delegate
            .resolve_async(AsyncContext::new(uri, cb), self.loader.as_ref());
    }

    /// What the loader chain alone returns for `uri`, skipping the host
    /// delegate. `None` if no loader is attached.
    pub fn fetch_next_sync(&self, uri: &str) -> Option<UriResource> {
        let loader = self.loader.as_ref()?;
        let mut ctx = SyncContext::new(uri);
        loader.resolve_sync(&mut ctx);
        Some(ctx.into_resource())
    }

    /// Async counterpart of [`fetch_next_sync`](Self::fetch_next_sync).
    /// Returns false, without calling `cb`, if no loader is attached.
    pub fn fetch_next_async<F>(&self, uri: &str, cb: F) -> bool
    where
        F: FnOnce(UriResource) + Send + 'static,
    {
        let Some(loader) = self.loader.as_ref() else {
            return false;
        };
        loader.resolve_async(AsyncContext::new(uri, move |ret_code, content| {
            cb(UriResource { ret_code, content })
        }));
        true
    }

    /// Fail every request still waiting on the host. A table shared with
    /// other sessions is drained for all of them.
    pub fn close(&self) -> usize {
        let cancelled = self.requests.cancel_all(RetCode::Failed);
        if cancelled > 0 {
            tracing::info!(session_id = %self.id, cancelled, "pending host requests cancelled");
        }
        cancelled
    }
}

/// Live sessions, shared across threads.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<DashMap<SessionId, Arc<Session>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a session. A previous session under the same id is closed and
    /// returned.
    pub fn insert(&self, session: Arc<Session>) -> Option<Arc<Session>> {
        let id = session.id();
        let replaced = self.sessions.insert(id, session);
        if let Some(old) = &replaced {
            tracing::warn!(session_id = %id, "session replaced");
            old.close();
        }
        replaced
    }

    pub fn find(&self, id: SessionId) -> Option<Arc<Session>> {
        self.sessions.get(&id).map(|s| s.value().clone())
    }

    /// Remove and close a session.
    pub fn remove(&self, id: SessionId) -> Option<Arc<Session>> {
        let (_, session) = self.sessions.remove(&id)?;
        session.close();
        Some(session)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
