//! C API mirroring §6's function-level surface.
//!
//! Opaque handles, integer return codes, explicit null checks on every
//! pointer argument — the same shape as the teacher's `c_api::matchy`
//! module, scaled down to this crate's surface. Patterns here are raw
//! byte buffers with an explicit length rather than null-terminated C
//! strings, since pattern bytes may contain `\0`.
//!
//! # Safety
//!
//! Every `unsafe extern "C" fn` below assumes its pointer arguments are
//! either null or valid for the documented lifetime; callers are
//! responsible for upholding that contract, as with any C FFI boundary.

use crate::context::{Mpm, ThreadContext};
use crate::pattern::PatternFlags;
use crate::sink::MatchSink;
use std::os::raw::c_int;
use std::slice;

/// Success.
pub const PFAC_MPM_SUCCESS: c_int = 0;
/// Generic failure (allocation failure during construction, or a null
/// argument where one was required).
pub const PFAC_MPM_ERROR: c_int = -1;

/// Opaque matcher context handle.
#[repr(C)]
pub struct pfac_mpm_ctx_t {
    _private: [u8; 0],
}

/// Opaque per-thread scan context handle.
#[repr(C)]
pub struct pfac_mpm_thread_ctx_t {
    _private: [u8; 0],
}

/// Opaque match-set sink handle.
#[repr(C)]
pub struct pfac_mpm_sink_t {
    _private: [u8; 0],
}

/// `context_init` (§6). Returns NULL only on allocation failure.
#[no_mangle]
pub extern "C" fn pfac_mpm_context_init() -> *mut pfac_mpm_ctx_t {
    Box::into_raw(Box::new(Mpm::new())) as *mut pfac_mpm_ctx_t
}

/// `destroy_context` (§6). `ctx` may be NULL (no-op).
///
/// # Safety
/// `ctx` must be NULL or a pointer previously returned by
/// [`pfac_mpm_context_init`], not already destroyed.
#[no_mangle]
pub unsafe extern "C" fn pfac_mpm_destroy_context(ctx: *mut pfac_mpm_ctx_t) {
    if ctx.is_null() {
        return;
    }
    drop(Box::from_raw(ctx as *mut Mpm));
}

/// `thread_context_init` (§6). The `reserved` argument matches the
/// reference's signature and is unused.
#[no_mangle]
pub extern "C" fn pfac_mpm_thread_context_init(_reserved: *mut std::ffi::c_void) -> *mut pfac_mpm_thread_ctx_t {
    Box::into_raw(Box::new(ThreadContext::new())) as *mut pfac_mpm_thread_ctx_t
}

/// `destroy_thread_context` (§6).
///
/// # Safety
/// `thread_ctx` must be NULL or a pointer previously returned by
/// [`pfac_mpm_thread_context_init`], not already destroyed.
#[no_mangle]
pub unsafe extern "C" fn pfac_mpm_destroy_thread_context(thread_ctx: *mut pfac_mpm_thread_ctx_t) {
    if thread_ctx.is_null() {
        return;
    }
    drop(Box::from_raw(thread_ctx as *mut ThreadContext));
}

/// Allocate a sink sized to cover ids in `0..capacity`.
#[no_mangle]
pub extern "C" fn pfac_mpm_sink_new(capacity: u32) -> *mut pfac_mpm_sink_t {
    Box::into_raw(Box::new(MatchSink::new(capacity))) as *mut pfac_mpm_sink_t
}

/// # Safety
/// `sink` must be NULL or a pointer previously returned by
/// [`pfac_mpm_sink_new`], not already destroyed.
#[no_mangle]
pub unsafe extern "C" fn pfac_mpm_sink_free(sink: *mut pfac_mpm_sink_t) {
    if sink.is_null() {
        return;
    }
    drop(Box::from_raw(sink as *mut MatchSink));
}

/// Borrow the sink's matched-id list. `out_len` receives the element
/// count; the returned pointer is valid until the next mutating call on
/// this sink or until it is freed.
///
/// # Safety
/// `sink` and `out_len` must be non-null and valid.
#[no_mangle]
pub unsafe extern "C" fn pfac_mpm_sink_ids(sink: *const pfac_mpm_sink_t, out_len: *mut usize) -> *const u32 {
    if sink.is_null() || out_len.is_null() {
        return std::ptr::null();
    }
    let sink = &*(sink as *const MatchSink);
    *out_len = sink.len();
    sink.ids().as_ptr()
}

unsafe fn add_pattern(
    ctx: *mut pfac_mpm_ctx_t,
    bytes: *const u8,
    len: usize,
    id: u32,
    flags: u8,
    case_insensitive: bool,
) -> c_int {
    if ctx.is_null() || (bytes.is_null() && len != 0) {
        return PFAC_MPM_ERROR;
    }
    let ctx = &mut *(ctx as *mut Mpm);
    let slice = if len == 0 { &[] } else { slice::from_raw_parts(bytes, len) };
    let flags = PatternFlags(flags);
    let result = if case_insensitive {
        ctx.add_pattern_case_insensitive(slice, id, flags)
    } else {
        ctx.add_pattern_case_sensitive(slice, id, flags)
    };
    match result {
        Ok(()) => PFAC_MPM_SUCCESS,
        Err(_) => PFAC_MPM_ERROR,
    }
}

/// `add_pattern_case_sensitive` (§6). `offset`, `depth`, and `sid` are
/// accepted and ignored, matching the reference surface exactly.
///
/// # Safety
/// `ctx` must be a live context from [`pfac_mpm_context_init`]. `bytes`
/// must point to at least `len` readable bytes (or be NULL iff `len == 0`).
#[no_mangle]
#[allow(clippy::too_many_arguments)]
pub unsafe extern "C" fn pfac_mpm_add_pattern_case_sensitive(
    ctx: *mut pfac_mpm_ctx_t,
    bytes: *const u8,
    len: usize,
    _offset: u32,
    _depth: u32,
    id: u32,
    _sid: u32,
    flags: u8,
) -> c_int {
    add_pattern(ctx, bytes, len, id, flags, false)
}

/// `add_pattern_case_insensitive` (§6).
///
/// # Safety
/// Same contract as [`pfac_mpm_add_pattern_case_sensitive`].
#[no_mangle]
#[allow(clippy::too_many_arguments)]
pub unsafe extern "C" fn pfac_mpm_add_pattern_case_insensitive(
    ctx: *mut pfac_mpm_ctx_t,
    bytes: *const u8,
    len: usize,
    _offset: u32,
    _depth: u32,
    id: u32,
    _sid: u32,
    flags: u8,
) -> c_int {
    add_pattern(ctx, bytes, len, id, flags, true)
}

/// `prepare` (§6).
///
/// # Safety
/// `ctx` must be a live context from [`pfac_mpm_context_init`].
#[no_mangle]
pub unsafe extern "C" fn pfac_mpm_prepare(ctx: *mut pfac_mpm_ctx_t) -> c_int {
    if ctx.is_null() {
        return PFAC_MPM_ERROR;
    }
    let ctx = &mut *(ctx as *mut Mpm);
    match ctx.prepare() {
        Ok(()) => PFAC_MPM_SUCCESS,
        Err(_) => PFAC_MPM_ERROR,
    }
}

/// `search` (§6). Returns the raw match-event count; 0 on any null
/// argument (mirroring the "search is total" guarantee of §7).
///
/// # Safety
/// All pointer arguments must be non-null and live; `buf` must point to
/// at least `buflen` readable bytes.
#[no_mangle]
pub unsafe extern "C" fn pfac_mpm_search(
    ctx: *const pfac_mpm_ctx_t,
    thread_ctx: *mut pfac_mpm_thread_ctx_t,
    sink: *mut pfac_mpm_sink_t,
    buf: *const u8,
    buflen: usize,
) -> u32 {
    if ctx.is_null() || thread_ctx.is_null() || sink.is_null() || (buf.is_null() && buflen != 0) {
        return 0;
    }
    let ctx = &*(ctx as *const Mpm);
    let thread_ctx = &mut *(thread_ctx as *mut ThreadContext);
    let sink = &mut *(sink as *mut MatchSink);
    let buf = if buflen == 0 { &[] } else { slice::from_raw_parts(buf, buflen) };
    ctx.search(thread_ctx, sink, buf)
}

/// `print_info` (§6): diagnostic dump to stderr.
///
/// # Safety
/// `ctx` must be NULL or a live context from [`pfac_mpm_context_init`].
#[no_mangle]
pub unsafe extern "C" fn pfac_mpm_print_info(ctx: *const pfac_mpm_ctx_t) {
    if ctx.is_null() {
        return;
    }
    (&*(ctx as *const Mpm)).print_info();
}

/// `print_search_stats` (§6): diagnostic dump to stdout.
///
/// # Safety
/// `thread_ctx` must be NULL or a live thread context from
/// [`pfac_mpm_thread_context_init`].
#[no_mangle]
pub unsafe extern "C" fn pfac_mpm_print_search_stats(thread_ctx: *const pfac_mpm_thread_ctx_t) {
    if thread_ctx.is_null() {
        return;
    }
    (&*(thread_ctx as *const ThreadContext)).print_search_stats();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_through_ffi_handles() {
        unsafe {
            let ctx = pfac_mpm_context_init();
            assert_eq!(
                pfac_mpm_add_pattern_case_sensitive(ctx, b"abcd".as_ptr(), 4, 0, 0, 0, 0, 0),
                PFAC_MPM_SUCCESS
            );
            assert_eq!(pfac_mpm_prepare(ctx), PFAC_MPM_SUCCESS);

            let thread_ctx = pfac_mpm_thread_context_init(std::ptr::null_mut());
            let sink = pfac_mpm_sink_new(16);

            let buf = b"xxabcdxx";
            let raw = pfac_mpm_search(ctx, thread_ctx, sink, buf.as_ptr(), buf.len());
            assert_eq!(raw, 1);

            let mut len = 0usize;
            let ids_ptr = pfac_mpm_sink_ids(sink, &mut len);
            assert_eq!(len, 1);
            assert_eq!(*ids_ptr, 0);

            pfac_mpm_sink_free(sink);
            pfac_mpm_destroy_thread_context(thread_ctx);
            pfac_mpm_destroy_context(ctx);
        }
    }

    #[test]
    fn null_pointers_are_rejected_not_fatal() {
        unsafe {
            assert_eq!(
                pfac_mpm_add_pattern_case_sensitive(std::ptr::null_mut(), b"x".as_ptr(), 1, 0, 0, 0, 0, 0),
                PFAC_MPM_ERROR
            );
            assert_eq!(pfac_mpm_prepare(std::ptr::null_mut()), PFAC_MPM_ERROR);
            assert_eq!(
                pfac_mpm_search(std::ptr::null(), std::ptr::null_mut(), std::ptr::null_mut(), std::ptr::null(), 0),
                0
            );
        }
    }
}
