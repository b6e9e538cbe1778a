//! urichain integration test harness.
//!
//! Drives full sessions through the public boundary: a test host stands in
//! for the embedding runtime, records what the native side asks of it, and
//! answers async requests by calling back through `Boundary` from whatever
//! thread the test chooses.

use std::sync::{Arc, Mutex};

use bytes::Bytes;
use urichain_core::{RequestId, RetCode, SessionId, UriResource};
use urichain_services::{
    AsyncContentHost, Boundary, BoundaryError, HostMethods, MemoryLoader, RegistrationListener,
    Session, SessionRegistry, SyncContentHost, UriChain,
};

mod concurrency;
mod scenarios;

// ── Harness ───────────────────────────────────────────────────────────────────

pub const SESSION: SessionId = SessionId(7);

/// Host that answers sync calls with a fixed resource and queues async ones.
#[derive(Default)]
pub struct TestHost {
    pub sync_answer: Mutex<Option<UriResource>>,
    pub sync_calls: Mutex<Vec<String>>,
    pub async_calls: Mutex<Vec<(String, RequestId)>>,
    pub registrations: Mutex<Vec<SessionId>>,
}

impl SyncContentHost for TestHost {
    fn fetch_sync(&self, _: SessionId, uri: &str) -> Result<Option<UriResource>, BoundaryError> {
        self.sync_calls.lock().unwrap().push(uri.to_string());
        Ok(self.sync_answer.lock().unwrap().clone())
    }
}

impl AsyncContentHost for TestHost {
    fn fetch_async(&self, _: SessionId, uri: &str, id: RequestId) -> Result<(), BoundaryError> {
        self.async_calls.lock().unwrap().push((uri.to_string(), id));
        Ok(())
    }
}

impl RegistrationListener for TestHost {
    fn core_delegate_registered(&self, session: SessionId) -> Result<(), BoundaryError> {
        self.registrations.lock().unwrap().push(session);
        Ok(())
    }
}

impl TestHost {
    pub fn pending_ids(&self) -> Vec<RequestId> {
        self.async_calls.lock().unwrap().iter().map(|(_, id)| *id).collect()
    }
}

pub struct Harness {
    pub boundary: Boundary,
    pub session: Arc<Session>,
    pub host: Arc<TestHost>,
}

/// The underlying loader every scenario sits in front of.
pub fn underlying_loader() -> UriChain {
    UriChain::new().with(Arc::new(
        MemoryLoader::new("underlying")
            .with_resource("a.js", "loader:a")
            .with_resource("b.js", "loader:b"),
    ))
}

pub fn harness(loader: Option<UriChain>) -> Harness {
    let host = Arc::new(TestHost::default());
    let registry = SessionRegistry::new();
    let session = Arc::new(Session::new(SESSION, HostMethods::all(host.clone()), loader));
    registry.insert(session.clone());
    Harness {
        boundary: Boundary::new(registry),
        session,
        host,
    }
}

pub type Received = Arc<Mutex<Vec<(RetCode, Bytes)>>>;

/// Callback that appends every invocation to the returned log.
pub fn recorder() -> (Received, impl FnOnce(RetCode, Bytes) + Send + 'static) {
    let log: Received = Arc::default();
    let sink = log.clone();
    (log, move |code, body| sink.lock().unwrap().push((code, body)))
}
