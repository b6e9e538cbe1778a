//! Correlation table — matches async completions to their callbacks.
//!
//! An async request that crosses the boundary leaves its callback here under
//! a fresh `RequestId`. The host later delivers a result carrying that id and
//! the callback is taken out and fired. Ids come from a per-table atomic
//! counter: strictly increasing, never reset, never reused.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Mutex, PoisonError};

use bytes::Bytes;
use dashmap::DashMap;
use urichain_core::{RequestId, RetCode};

use crate::context::CompletionCallback;

// Callbacks are `Send` but not `Sync`; the mutex makes the map shareable.
struct Pending(Mutex<CompletionCallback>);

impl Pending {
    fn into_callback(self) -> CompletionCallback {
        self.0.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Pending async requests, shared by every thread that issues or completes
/// them.
pub struct RequestTable {
    next_id: AtomicI64,
    pending: DashMap<RequestId, Pending>,
}

impl Default for RequestTable {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestTable {
    pub fn new() -> Self {
        Self {
            next_id: AtomicI64::new(0),
            pending: DashMap::new(),
        }
    }

    /// Allocate the next id and park `cb` under it.
    pub fn register(&self, cb: CompletionCallback) -> RequestId {
        let id = RequestId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.pending.insert(id, Pending(Mutex::new(cb)));
        tracing::trace!(request_id = %id, "request registered");
        id
    }

    /// Remove and return the callback for `id`. `None` means the id is
    /// unknown, stale or already taken.
    pub fn take(&self, id: RequestId) -> Option<CompletionCallback> {
        self.pending
            .remove(&id)
            .map(|(_, pending)| pending.into_callback())
    }

    pub fn contains(&self, id: RequestId) -> bool {
        self.pending.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Take `id` and fire it with `ret_code` and no content.
    pub fn cancel(&self, id: RequestId, ret_code: RetCode) -> bool {
        match self.take(id) {
            Some(cb) => {
                cb(ret_code, Bytes::new());
                true
            }
            None => false,
        }
    }

    /// Fire every pending callback with `ret_code`. Returns how many fired.
    pub fn cancel_all(&self, ret_code: RetCode) -> usize {
        let ids: Vec<RequestId> = self.pending.iter().map(|e| *e.key()).collect();
        ids.into_iter()
            .filter(|id| self.cancel(*id, ret_code))
            .count()
    }
}
