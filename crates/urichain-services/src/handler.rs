//! Handler chain — an ordered list of handlers, each able to answer a
//! request or pass it on.
//!
//! Async passthrough hands the context back to the chain, so the completion
//! callback always has exactly one owner and fires at most once.

use std::sync::Arc;

use bytes::Bytes;
use urichain_core::RetCode;

use crate::context::{AsyncContext, SyncContext};

/// Result of offering a sync request to one handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// The handler populated the context. Stop here.
    Handled,
    /// Not ours; the context is untouched.
    Passthrough,
}

/// Result of offering an async request to one handler.
#[derive(Debug)]
pub enum AsyncDisposition {
    /// The handler took ownership and will fire the callback.
    Handled,
    /// Not ours; the context comes back unchanged.
    Passthrough(AsyncContext),
}

/// One link in a [`UriChain`].
pub trait UriHandler: Send + Sync {
    /// Name used in logs and [`UriChain::names`].
    fn name(&self) -> &str;

    fn attempt_sync(&self, ctx: &mut SyncContext) -> Disposition;

    fn attempt_async(&self, ctx: AsyncContext) -> AsyncDisposition;
}

/// Ordered handlers. A request nobody claims ends as `SchemeNotRegister`.
#[derive(Clone, Default)]
pub struct UriChain {
    handlers: Vec<Arc<dyn UriHandler>>,
}

impl UriChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a handler; it runs after every handler already present.
    pub fn push(&mut self, handler: Arc<dyn UriHandler>) {
        self.handlers.push(handler);
    }

    /// Builder form of [`push`](Self::push).
    pub fn with(mut self, handler: Arc<dyn UriHandler>) -> Self {
        self.push(handler);
        self
    }

    /// Insert at `index`, clamped to the end of the chain.
    pub fn insert(&mut self, index: usize, handler: Arc<dyn UriHandler>) {
        let index = index.min(self.handlers.len());
        self.handlers.insert(index, handler);
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.handlers.iter().map(|h| h.name()).collect()
    }

    /// Offer `ctx` to each handler in order until one handles it.
    pub fn resolve_sync(&self, ctx: &mut SyncContext) {
        for handler in &self.handlers {
            if handler.attempt_sync(ctx) == Disposition::Handled {
                tracing::trace!(handler = handler.name(), uri = %ctx.uri, "sync request handled");
                return;
            }
        }
        tracing::debug!(uri = %ctx.uri, "no handler claimed sync request");
        ctx.set(RetCode::SchemeNotRegister, Bytes::new());
    }

    /// Async counterpart of [`resolve_sync`](Self::resolve_sync). If no
    /// handler claims the request, the callback fires before returning.
    pub fn resolve_async(&self, mut ctx: AsyncContext) {
        for handler in &self.handlers {
            match handler.attempt_async(ctx) {
                AsyncDisposition::Handled => {
                    tracing::trace!(handler = handler.name(), "async request handled");
                    return;
                }
                AsyncDisposition::Passthrough(back) => ctx = back,
            }
        }
        tracing::debug!(uri = %ctx.uri, "no handler claimed async request");
        ctx.complete(RetCode::SchemeNotRegister, Bytes::new());
    }
}
