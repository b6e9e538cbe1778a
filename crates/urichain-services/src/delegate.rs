//! Host delegate — the chain link that lets the host intercept requests.
//!
//! Until the host announces a delegate of its own, every request passes
//! straight through to the rest of the chain. Once announced, sync requests
//! are answered by the host before returning and async requests are parked in
//! the session's [`RequestTable`] while the host works on them. The host's
//! answer is authoritative: the rest of the chain is not consulted, even when
//! the host call fails.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use bytes::Bytes;
use urichain_core::{RetCode, SessionId};

use crate::context::{AsyncContext, SyncContext};
use crate::handler::{AsyncDisposition, Disposition, UriChain, UriHandler};
use crate::host::HostMethods;
use crate::request_table::RequestTable;

pub struct HostDelegate {
    session: SessionId,
    methods: HostMethods,
    requests: Arc<RequestTable>,
    has_external_delegate: AtomicBool,
}

impl HostDelegate {
    pub fn new(session: SessionId, methods: HostMethods, requests: Arc<RequestTable>) -> Self {
        Self {
            session,
            methods,
            requests,
            has_external_delegate: AtomicBool::new(false),
        }
    }

    pub fn session(&self) -> SessionId {
        self.session
    }

    pub fn methods(&self) -> &HostMethods {
        &self.methods
    }

    pub fn requests(&self) -> &Arc<RequestTable> {
        &self.requests
    }

    /// Record that the host has a delegate. Idempotent and sticky.
    pub fn set_external_delegate(&self) {
        if !self.has_external_delegate.swap(true, Ordering::AcqRel) {
            tracing::info!(session_id = %self.session, "host delegate registered");
        }
    }

    pub fn has_external_delegate(&self) -> bool {
        self.has_external_delegate.load(Ordering::Acquire)
    }

    /// Tell the host that a native delegate chain exists for this session.
    /// Returns false if the host has no listener wired or the call failed.
    pub fn notify_host_delegate_registered(&self) -> bool {
        let Some(listener) = &self.methods.registration else {
            tracing::debug!(session_id = %self.session, "host registration listener not bound");
            return false;
        };
        match listener.core_delegate_registered(self.session) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(session_id = %self.session, error = %e, "host registration notify failed");
                false
            }
        }
    }

    /// Resolve a blocking request: host first if it has a delegate, else
    /// `next`, else `SchemeNotRegister`.
    pub fn resolve_sync(&self, ctx: &mut SyncContext, next: Option<&UriChain>) {
        if self.attempt_sync(ctx) == Disposition::Handled {
            return;
        }
        match next {
            Some(chain) => chain.resolve_sync(ctx),
            None => ctx.set(RetCode::SchemeNotRegister, Bytes::new()),
        }
    }

    /// Resolve a callback request. Never blocks on the host; the callback
    /// fires exactly once on whichever thread produces the answer.
    pub fn resolve_async(&self, ctx: AsyncContext, next: Option<&UriChain>) {
        let AsyncDisposition::Passthrough(ctx) = self.attempt_async(ctx) else {
            return;
        };
        match next {
            Some(chain) => chain.resolve_async(ctx),
            None => ctx.complete(RetCode::SchemeNotRegister, Bytes::new()),
        }
    }
}

impl UriHandler for HostDelegate {
    fn name(&self) -> &str {
        "host-delegate"
    }

    fn attempt_sync(&self, ctx: &mut SyncContext) -> Disposition {
        if !self.has_external_delegate() {
            return Disposition::Passthrough;
        }
        let Some(host) = &self.methods.sync_fetch else {
            tracing::debug!(session_id = %self.session, "host sync handler not bound, passing through");
            return Disposition::Passthrough;
        };

        match host.fetch_sync(self.session, &ctx.uri) {
            Ok(Some(resource)) => ctx.set(resource.ret_code, resource.content),
            Ok(None) => {
                tracing::debug!(session_id = %self.session, uri = %ctx.uri, "host returned no resource");
                ctx.set(RetCode::Failed, Bytes::new());
            }
            Err(e) => {
                tracing::warn!(session_id = %self.session, uri = %ctx.uri, error = %e, "host sync fetch failed");
                ctx.set(RetCode::Failed, Bytes::new());
            }
        }
        Disposition::Handled
    }

    fn attempt_async(&self, ctx: AsyncContext) -> AsyncDisposition {
        if !self.has_external_delegate() {
            return AsyncDisposition::Passthrough(ctx);
        }
        let Some(host) = &self.methods.async_fetch else {
            tracing::debug!(session_id = %self.session, "host async handler not bound, passing through");
            return AsyncDisposition::Passthrough(ctx);
        };

        let (uri, cb) = ctx.into_parts();
        // Registration must precede dispatch: the host may answer before
        // fetch_async even returns.
        let request_id = self.requests.register(cb);
        tracing::debug!(session_id = %self.session, request_id = %request_id, uri = %uri, "async request sent to host");

        if let Err(e) = host.fetch_async(self.session, &uri, request_id) {
            tracing::warn!(session_id = %self.session, request_id = %request_id, error = %e, "host async fetch failed");
            self.requests.cancel(request_id, RetCode::Failed);
        }
        AsyncDisposition::Handled
    }
}
