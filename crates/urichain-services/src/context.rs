//! Request contexts for the two calling conventions.

use std::fmt;

use bytes::Bytes;
use urichain_core::{RetCode, UriResource};

/// Completion callback for an async request. Fires exactly once.
pub type CompletionCallback = Box<dyn FnOnce(RetCode, Bytes) + Send + 'static>;

/// A blocking request. Handlers fill `ret_code` and `content` in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncContext {
    pub uri: String,
    /// `None` until some handler answers.
    pub ret_code: Option<RetCode>,
    pub content: Bytes,
}

impl SyncContext {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            ret_code: None,
            content: Bytes::new(),
        }
    }

    pub fn set(&mut self, ret_code: RetCode, content: Bytes) {
        self.ret_code = Some(ret_code);
        self.content = content;
    }

    /// Final result. An unanswered context reads as `SchemeNotRegister`.
    pub fn into_resource(self) -> UriResource {
        UriResource {
            ret_code: self.ret_code.unwrap_or(RetCode::SchemeNotRegister),
            content: self.content,
        }
    }
}

/// A fire-and-callback request. Owns its callback until dispatched.
pub struct AsyncContext {
    pub uri: String,
    pub cb: CompletionCallback,
}

impl AsyncContext {
    pub fn new<F>(uri: impl Into<String>, cb: F) -> Self
    where
        F: FnOnce(RetCode, Bytes) + Send + 'static,
    {
        Self {
            uri: uri.into(),
            cb: Box::new(cb),
        }
    }

    /// Consume the context and fire its callback.
    pub fn complete(self, ret_code: RetCode, content: Bytes) {
        (self.cb)(ret_code, content)
    }

    /// Split off the callback, e.g. to park it in a request table.
    pub fn into_parts(self) -> (String, CompletionCallback) {
        (self.uri, self.cb)
    }
}

impl fmt::Debug for AsyncContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncContext")
            .field("uri", &self.uri)
            .finish_non_exhaustive()
    }
}
