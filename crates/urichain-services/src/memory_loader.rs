//! In-memory handler: answers a fixed set of uris, passes everything else on.

use std::collections::HashMap;

use bytes::Bytes;
use urichain_core::RetCode;

use crate::context::{AsyncContext, SyncContext};
use crate::handler::{AsyncDisposition, Disposition, UriHandler};

#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    name: String,
    resources: HashMap<String, Bytes>,
}

impl MemoryLoader {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            resources: HashMap::new(),
        }
    }

    pub fn with_resource(mut self, uri: impl Into<String>, content: impl Into<Bytes>) -> Self {
        self.insert(uri, content);
        self
    }

    pub fn insert(&mut self, uri: impl Into<String>, content: impl Into<Bytes>) {
        self.resources.insert(uri.into(), content.into());
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

impl UriHandler for MemoryLoader {
    fn name(&self) -> &str {
        &self.name
    }

    fn attempt_sync(&self, ctx: &mut SyncContext) -> Disposition {
        match self.resources.get(&ctx.uri) {
            Some(content) => {
                ctx.set(RetCode::Success, content.clone());
                Disposition::Handled
            }
            None => Disposition::Passthrough,
        }
    }

    fn attempt_async(&self, ctx: AsyncContext) -> AsyncDisposition {
        match self.resources.get(&ctx.uri) {
            Some(content) => {
                ctx.complete(RetCode::Success, content.clone());
                AsyncDisposition::Handled
            }
            None => AsyncDisposition::Passthrough(ctx),
        }
    }
}
