//! Purpose: Foreign-call adapter for the netif tool library boundary.
//! Exports: `NetifTool`, `ToolApi`, `ToolReply`, `ToolBuf`, entry-point signatures.
//! Role: Owns the buffer-lifetime contract for data crossing the boundary.
//! Invariants: A callee-owned buffer is released exactly once, via its free function.
//! Invariants: An inconsistent ptr/len pair is treated as "no data" and never released.
//! Invariants: The i32 status is opaque here; JSON-level `ok` is the success signal.

pub mod loader;

use std::ptr;
use std::slice;

use crate::core::error::Error;

/// `tool_netif_list_json(out_ptr, out_len) -> status`
pub type ListJsonFn = unsafe extern "C" fn(*mut *mut u8, *mut usize) -> i32;
/// `tool_netif_apply_json(req_ptr, req_len, out_ptr, out_len) -> status`
pub type ApplyJsonFn = unsafe extern "C" fn(*const u8, usize, *mut *mut u8, *mut usize) -> i32;
/// `tool_free(ptr, len)`
pub type FreeFn = unsafe extern "C" fn(*mut u8, usize);

/// The three resolved entry points of one tool library.
#[derive(Clone, Copy, Debug)]
pub struct ToolApi {
    pub list: ListJsonFn,
    pub apply: ApplyJsonFn,
    pub free: FreeFn,
}

/// One boundary round-trip: the raw status plus a copied-out body.
///
/// An empty body means the callee produced no data; the status alone does not
/// distinguish success from failure for callers that need response fields.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ToolReply {
    pub status: i32,
    pub body: Vec<u8>,
}

/// The injected capability the client core consumes. The loaded library is
/// one implementation; tests substitute in-process mocks.
pub trait NetifTool {
    fn list_json(&self) -> Result<ToolReply, Error>;
    fn apply_json(&self, request: &[u8]) -> Result<ToolReply, Error>;
}

/// RAII guard over a callee-owned buffer; releases exactly once on drop.
pub struct ToolBuf {
    ptr: *mut u8,
    len: usize,
    free: FreeFn,
}

impl ToolBuf {
    /// Adopts a buffer returned across the boundary.
    ///
    /// `None` when there is no data to own: a null pointer, a zero length, or
    /// the inconsistent combination of the two. An inconsistent pair is never
    /// released; its declared length cannot be trusted by the free function.
    pub fn adopt(ptr: *mut u8, len: usize, free: FreeFn) -> Option<Self> {
        if ptr.is_null() || len == 0 {
            return None;
        }
        Some(Self { ptr, len, free })
    }

    pub fn as_bytes(&self) -> &[u8] {
        unsafe { slice::from_raw_parts(self.ptr, self.len) }
    }
}

impl Drop for ToolBuf {
    fn drop(&mut self) {
        unsafe {
            (self.free)(self.ptr, self.len);
        }
    }
}

impl NetifTool for ToolApi {
    fn list_json(&self) -> Result<ToolReply, Error> {
        let mut out_ptr: *mut u8 = ptr::null_mut();
        let mut out_len: usize = 0;
        let status = unsafe { (self.list)(&mut out_ptr, &mut out_len) };
        let body = copy_out(out_ptr, out_len, self.free);
        tracing::debug!(status, len = body.len(), "tool_netif_list_json");
        Ok(ToolReply { status, body })
    }

    fn apply_json(&self, request: &[u8]) -> Result<ToolReply, Error> {
        let mut out_ptr: *mut u8 = ptr::null_mut();
        let mut out_len: usize = 0;
        let status = unsafe {
            (self.apply)(request.as_ptr(), request.len(), &mut out_ptr, &mut out_len)
        };
        let body = copy_out(out_ptr, out_len, self.free);
        tracing::debug!(status, len = body.len(), "tool_netif_apply_json");
        Ok(ToolReply { status, body })
    }
}

/// Copies the callee-owned span out and releases it before returning, so no
/// raw reference to released memory can escape this module.
fn copy_out(ptr: *mut u8, len: usize, free: FreeFn) -> Vec<u8> {
    match ToolBuf::adopt(ptr, len, free) {
        Some(buf) => buf.as_bytes().to_vec(),
        None => Vec::new(),
    }
}
