//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type with C-compatible representations:
//! `*mut c_char` instead of `String`, raw pointer + length instead of `Vec`,
//! explicit discriminants for enums. Inputs that select an enum arrive as
//! plain integers and are validated here, so an out-of-range value from C
//! is an error rather than undefined behavior.

use std::ffi::CString;
use std::os::raw::c_char;
use std::time::Instant;

use listings_core::{Command, HttpMethod, HttpRequest, ListingsSyncController, PropertyTypeTab, QuickFilter, Screen};

/// Opaque handle to a `ListingsSyncController`.
///
/// `epoch` anchors the host's millisecond timestamps; only differences
/// between them matter, so any monotonic origin works.
pub struct FfiListingsController {
    pub(crate) inner: ListingsSyncController,
    pub(crate) epoch: Instant,
}

/// Copy `s` into a heap C string, dropping interior NULs.
pub(crate) fn to_c_string(s: &str) -> *mut c_char {
    CString::new(s.replace('\0', ""))
        .unwrap_or_default()
        .into_raw()
}

pub(crate) fn screen_from_code(code: u32) -> Option<Screen> {
    match code {
        0 => Some(Screen::General),
        1 => Some(Screen::MyListings),
        _ => None,
    }
}

pub(crate) fn tab_from_code(code: u32) -> Option<PropertyTypeTab> {
    match code {
        0 => Some(PropertyTypeTab::Plots),
        1 => Some(PropertyTypeTab::Houses),
        2 => Some(PropertyTypeTab::CommercialPlots),
        _ => None,
    }
}

pub(crate) fn quick_filter_from_code(code: u32) -> Option<QuickFilter> {
    match code {
        0 => Some(QuickFilter::All),
        1 => Some(QuickFilter::Cash),
        2 => Some(QuickFilter::Installments),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

#[repr(C)]
#[derive(Debug, PartialEq, Eq)]
pub enum FfiHttpMethod {
    Get = 0,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
        }
    }
}

#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// A request the host must execute, owned by the enclosing command list.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub url: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
}

impl FfiHttpRequest {
    pub(crate) fn from_core(req: HttpRequest) -> *mut Self {
        let headers_len = req.headers.len() as u32;
        let headers = if req.headers.is_empty() {
            std::ptr::null_mut()
        } else {
            let ffi_headers: Vec<FfiHeader> = req
                .headers
                .iter()
                .map(|(k, v)| FfiHeader {
                    key: to_c_string(k),
                    value: to_c_string(v),
                })
                .collect();
            Box::into_raw(ffi_headers.into_boxed_slice()) as *mut FfiHeader
        };

        Box::into_raw(Box::new(FfiHttpRequest {
            method: req.method.into(),
            url: to_c_string(&req.url),
            headers,
            headers_len,
        }))
    }

    /// Release a request built by `from_core`.
    ///
    /// # Safety
    /// `req` must come from `from_core` and not have been freed.
    pub(crate) unsafe fn free(req: *mut Self) {
        if req.is_null() {
            return;
        }
        let req = Box::from_raw(req);
        if !req.url.is_null() {
            drop(CString::from_raw(req.url));
        }
        if !req.headers.is_null() && req.headers_len > 0 {
            let slice = std::ptr::slice_from_raw_parts_mut(req.headers, req.headers_len as usize);
            let headers = Box::from_raw(slice);
            for h in headers.iter() {
                if !h.key.is_null() {
                    drop(CString::from_raw(h.key));
                }
                if !h.value.is_null() {
                    drop(CString::from_raw(h.value));
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Response input (caller-provided, not heap-allocated by us)
// ---------------------------------------------------------------------------

/// An HTTP response the host received. Read, never freed, by this crate.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const c_char,
}

/// What happened to a fetch on the host side, passed to `complete`.
pub const TRANSPORT_OK: u32 = 0;
pub const TRANSPORT_UNREACHABLE: u32 = 1;
pub const TRANSPORT_TIMEOUT: u32 = 2;

// ---------------------------------------------------------------------------
// Command list
// ---------------------------------------------------------------------------

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    NullArg = 1,
    InvalidArg = 2,
    InvalidJson = 3,
    Panic = 4,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiCommandKind {
    /// Execute `request`, then call `listings_controller_complete` with `ticket_id`.
    Fetch = 0,
    /// Show `message` as a transient notification.
    Notify = 1,
    /// Hand over to the sign-in flow.
    SignOut = 2,
}

#[repr(C)]
pub struct FfiCommand {
    pub kind: FfiCommandKind,
    pub ticket_id: u64,
    pub page: u32,
    pub request: *mut FfiHttpRequest,
    pub message: *mut c_char,
}

/// Result of every mutating controller call.
///
/// On success `error_code` is `Ok` and `items`/`len` hold zero or more
/// commands. On failure `error_message` is set and `len` is 0.
#[repr(C)]
pub struct FfiCommandList {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub items: *mut FfiCommand,
    pub len: u32,
}

impl FfiCommandList {
    pub(crate) fn from_commands(commands: Vec<Command>) -> *mut Self {
        let ffi_commands: Vec<FfiCommand> = commands
            .into_iter()
            .map(|command| match command {
                Command::Fetch(ticket) => FfiCommand {
                    kind: FfiCommandKind::Fetch,
                    ticket_id: ticket.id,
                    page: ticket.page,
                    request: FfiHttpRequest::from_core(ticket.request),
                    message: std::ptr::null_mut(),
                },
                Command::Notify(message) => FfiCommand {
                    kind: FfiCommandKind::Notify,
                    ticket_id: 0,
                    page: 0,
                    request: std::ptr::null_mut(),
                    message: to_c_string(&message),
                },
                Command::SignOut => FfiCommand {
                    kind: FfiCommandKind::SignOut,
                    ticket_id: 0,
                    page: 0,
                    request: std::ptr::null_mut(),
                    message: std::ptr::null_mut(),
                },
            })
            .collect();

        let len = ffi_commands.len() as u32;
        let items = if ffi_commands.is_empty() {
            std::ptr::null_mut()
        } else {
            Box::into_raw(ffi_commands.into_boxed_slice()) as *mut FfiCommand
        };
        Box::into_raw(Box::new(FfiCommandList {
            error_code: FfiErrorCode::Ok,
            error_message: std::ptr::null_mut(),
            items,
            len,
        }))
    }

    pub(crate) fn error(code: FfiErrorCode, msg: &str) -> *mut Self {
        Box::into_raw(Box::new(FfiCommandList {
            error_code: code,
            error_message: to_c_string(msg),
            items: std::ptr::null_mut(),
            len: 0,
        }))
    }

    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::error(FfiErrorCode::NullArg, &format!("null argument: {name}"))
    }

    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::error(FfiErrorCode::Panic, msg)
    }

    /// Release a list built by this module.
    ///
    /// # Safety
    /// `list` must come from `from_commands`/`error` and not have been freed.
    pub(crate) unsafe fn free(list: *mut Self) {
        if list.is_null() {
            return;
        }
        let list = Box::from_raw(list);
        if !list.error_message.is_null() {
            drop(CString::from_raw(list.error_message));
        }
        if !list.items.is_null() && list.len > 0 {
            let slice = std::ptr::slice_from_raw_parts_mut(list.items, list.len as usize);
            let items = Box::from_raw(slice);
            for item in items.iter() {
                FfiHttpRequest::free(item.request);
                if !item.message.is_null() {
                    drop(CString::from_raw(item.message));
                }
            }
        }
    }
}
