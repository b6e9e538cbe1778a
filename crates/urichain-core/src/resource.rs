//! Resource shapes exchanged with the host.
//!
//! `UriResource` is the owned form the core hands to callers. The host hands
//! results to the core as a `RawUriResource`, whose content is a
//! `DirectBuffer` borrowed from host memory and valid only for the duration
//! of the delivering call. `parse_resource` is the single place where the
//! borrowed form becomes owned.

use std::marker::PhantomData;
use std::ptr::NonNull;

use bytes::Bytes;

use crate::ret_code::RetCode;

/// Owned result of a content request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UriResource {
    pub ret_code: RetCode,
    pub content: Bytes,
}

impl UriResource {
    pub fn new(ret_code: RetCode, content: impl Into<Bytes>) -> Self {
        Self {
            ret_code,
            content: content.into(),
        }
    }

    /// An outcome with no content.
    pub fn empty(ret_code: RetCode) -> Self {
        Self {
            ret_code,
            content: Bytes::new(),
        }
    }
}

/// A host-owned byte region.
///
/// Mirrors what a direct buffer looks like from native code: a capacity that
/// may be reported as negative when the host cannot determine it, and a base
/// address that may be unavailable.
#[derive(Debug, Clone, Copy)]
pub struct DirectBuffer<'a> {
    address: Option<NonNull<u8>>,
    capacity: i64,
    _region: PhantomData<&'a [u8]>,
}

impl<'a> DirectBuffer<'a> {
    pub fn from_slice(data: &'a [u8]) -> Self {
        Self {
            address: NonNull::new(data.as_ptr() as *mut u8),
            capacity: data.len() as i64,
            _region: PhantomData,
        }
    }

    /// Wrap a raw host region.
    ///
    /// # Safety
    ///
    /// If `ptr` is non-null and `capacity` is positive, `ptr` must be valid
    /// for reads of `capacity` bytes for the whole lifetime `'a`.
    pub unsafe fn from_raw(ptr: *const u8, capacity: i64) -> Self {
        Self {
            address: NonNull::new(ptr as *mut u8),
            capacity,
            _region: PhantomData,
        }
    }

    /// Reported length, or `None` if the host could not determine it.
    pub fn capacity(&self) -> Option<usize> {
        usize::try_from(self.capacity).ok()
    }

    pub fn has_address(&self) -> bool {
        self.address.is_some()
    }

    /// Copy the described range into an owned buffer.
    ///
    /// Returns `None` if the length is undeterminable or the address is
    /// missing.
    pub fn copy_to_bytes(&self) -> Option<Bytes> {
        let len = self.capacity()?;
        let ptr = self.address?;
        if len == 0 {
            return Some(Bytes::new());
        }
        // Safety: `from_slice` derives both fields from a live slice, and
        // `from_raw` callers guarantee `len` readable bytes at `ptr` for 'a.
        let region = unsafe { std::slice::from_raw_parts(ptr.as_ptr() as *const u8, len) };
        Some(Bytes::copy_from_slice(region))
    }
}

/// A result as the host delivers it.
#[derive(Debug, Clone, Copy)]
pub struct RawUriResource<'a> {
    pub ret_code: RetCode,
    pub content: Option<DirectBuffer<'a>>,
}

impl<'a> RawUriResource<'a> {
    pub fn new(ret_code: RetCode, content: &'a [u8]) -> Self {
        Self {
            ret_code,
            content: Some(DirectBuffer::from_slice(content)),
        }
    }

    pub fn without_content(ret_code: RetCode) -> Self {
        Self {
            ret_code,
            content: None,
        }
    }
}

/// Turn a host delivery into an owned result.
///
/// An absent resource is `Failed`. A present resource always keeps its
/// outcome code, even when the content cannot be extracted.
pub fn parse_resource(raw: Option<RawUriResource<'_>>) -> UriResource {
    let Some(raw) = raw else {
        return UriResource::empty(RetCode::Failed);
    };
    let content = raw
        .content
        .and_then(|buf| buf.copy_to_bytes())
        .unwrap_or_default();
    UriResource {
        ret_code: raw.ret_code,
        content,
    }
}
