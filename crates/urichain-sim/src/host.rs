//! Scripted host — plays the embedding host from the `[host]` config section.
//!
//! Scripted uris are answered from config. Anything else is forwarded back
//! to the native loader through the boundary, the way a host-side delegate
//! that only overrides a few resources would behave. Async answers are
//! delivered from a tokio task after `async_delay_ms`.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;

use urichain_core::config::{HostConfig, ScriptedResource, UriChainConfig};
use urichain_core::{RawUriResource, RequestId, SessionId, UriResource};
use urichain_services::{
    AsyncContentHost, Boundary, BoundaryError, HostMethods, MemoryLoader, RegistrationListener,
    Session, SessionRegistry, SyncContentHost, UriChain,
};

pub struct ScriptedHost {
    resources: Arc<BTreeMap<String, ScriptedResource>>,
    delay: Duration,
    boundary: Boundary,
    runtime: Handle,
    core_registered: AtomicBool,
}

impl ScriptedHost {
    pub fn new(config: &HostConfig, boundary: Boundary, runtime: Handle) -> Self {
        Self {
            resources: Arc::new(config.resources.clone()),
            delay: Duration::from_millis(config.async_delay_ms),
            boundary,
            runtime,
            core_registered: AtomicBool::new(false),
        }
    }

    /// Whether the native side has announced its delegate chain.
    pub fn core_registered(&self) -> bool {
        self.core_registered.load(Ordering::Acquire)
    }
}

fn deliver_scripted(
    boundary: &Boundary,
    session: SessionId,
    request_id: RequestId,
    scripted: &ScriptedResource,
) {
    let raw = match &scripted.text {
        Some(text) => RawUriResource::new(scripted.ret_code, text.as_bytes()),
        None => RawUriResource::without_content(scripted.ret_code),
    };
    boundary.deliver_async_result(session, Some(raw), request_id);
}

impl SyncContentHost for ScriptedHost {
    fn fetch_sync(
        &self,
        session: SessionId,
        uri: &str,
    ) -> Result<Option<UriResource>, BoundaryError> {
        if let Some(scripted) = self.resources.get(uri) {
            let content = scripted.text.clone().unwrap_or_default();
            return Ok(Some(UriResource::new(scripted.ret_code, content)));
        }
        Ok(self.boundary.fetch_next_sync(session, uri))
    }
}

impl AsyncContentHost for ScriptedHost {
    fn fetch_async(
        &self,
        session: SessionId,
        uri: &str,
        request_id: RequestId,
    ) -> Result<(), BoundaryError> {
        let resources = self.resources.clone();
        let boundary = self.boundary.clone();
        let delay = self.delay;
        let uri = uri.to_string();
        self.runtime.spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            if let Some(scripted) = resources.get(&uri) {
                deliver_scripted(&boundary, session, request_id, scripted);
                return;
            }
            let forward = boundary.clone();
            let forwarded = boundary.fetch_next_async(session, &uri, move |res| {
                forward.deliver_async_result(
                    session,
                    Some(RawUriResource::new(res.ret_code, &res.content)),
                    request_id,
                );
            });
            if !forwarded {
                boundary.deliver_async_result(session, None, request_id);
            }
        });
        Ok(())
    }
}

impl RegistrationListener for ScriptedHost {
    fn core_delegate_registered(&self, session: SessionId) -> Result<(), BoundaryError> {
        tracing::info!(session_id = %session, "native delegate chain announced to host");
        self.core_registered.store(true, Ordering::Release);
        Ok(())
    }
}

/// A wired session plus the pieces the caller needs to drive it.
pub struct Sim {
    pub boundary: Boundary,
    pub session: Arc<Session>,
    pub host: Arc<ScriptedHost>,
}

/// Build one session from config: scripted host in front, memory loader
/// behind.
pub fn wire(config: &UriChainConfig, runtime: Handle) -> Sim {
    let registry = SessionRegistry::new();
    let boundary = Boundary::new(registry.clone());
    let host = Arc::new(ScriptedHost::new(&config.host, boundary.clone(), runtime));

    let mut methods = HostMethods::none();
    if config.host.sync_handler {
        methods = methods.with_sync(host.clone());
    }
    if config.host.async_handler {
        methods = methods.with_async(host.clone());
    }
    if config.host.registration_listener {
        methods = methods.with_registration(host.clone());
    }
    tracing::debug!(?methods, "host methods bound");

    let loader = config.loader.enabled.then(|| {
        let mut memory = MemoryLoader::new("memory");
        for (uri, text) in &config.loader.resources {
            memory.insert(uri.clone(), text.clone());
        }
        UriChain::new().with(Arc::new(memory))
    });

    let id = SessionId(config.session.id);
    let session = Arc::new(Session::new(id, methods, loader));
    registry.insert(session.clone());

    if config.host.register_on_start {
        boundary.notify_native_delegate_registered(id);
    }
    session.delegate().notify_host_delegate_registered();

    Sim {
        boundary,
        session,
        host,
    }
}
