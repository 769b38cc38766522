//! C-ABI wrapper around `listings-core`.
//!
//! # Overview
//! Exposes the listings feed controller through `extern "C"` functions so a
//! mobile host (Swift, Kotlin, React Native native module) can drive it
//! without linking serde or knowing Rust types.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - Every mutating call returns an owned `FfiCommandList`; the host runs
//!   each `Fetch` command and answers with `listings_controller_complete`.
//! - Structured inputs (`Query`, filter maps) and the rendered feed travel as
//!   JSON strings; everything else is plain C data.
//! - The caller owns all returned pointers and must free them with the
//!   matching `listings_free_*` function.

pub mod types;

use std::collections::BTreeMap;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::{Duration, Instant};

use listings_core::{
    Command, ControllerConfig, FilterValue, HttpResponse, ListingsClient, ListingsSyncController,
    Query, TransportError,
};

use types::*;

/// Borrow a C string as `&str`; `None` for null or invalid UTF-8.
fn c_str<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(ptr) }.to_str().ok()
}

/// Run `f` against the controller behind `ctrl`, converting null handles,
/// argument errors and panics into error lists.
fn with_controller<F>(ctrl: *mut FfiListingsController, name: &str, f: F) -> *mut FfiCommandList
where
    F: FnOnce(&mut FfiListingsController) -> Result<Vec<Command>, *mut FfiCommandList>,
{
    if ctrl.is_null() {
        return FfiCommandList::null_arg("controller");
    }
    catch_unwind(AssertUnwindSafe(|| {
        let ctrl = unsafe { &mut *ctrl };
        match f(ctrl) {
            Ok(commands) => FfiCommandList::from_commands(commands),
            Err(list) => list,
        }
    }))
    .unwrap_or_else(|_| FfiCommandList::panic(&format!("panic in {name}")))
}

fn host_instant(ctrl: &FfiListingsController, now_ms: u64) -> Instant {
    ctrl.epoch + Duration::from_millis(now_ms)
}

// ---------------------------------------------------------------------------
// Controller lifecycle
// ---------------------------------------------------------------------------

/// Create a controller for `screen` (0 = general feed, 1 = my listings).
///
/// `page_size` of 0 selects the default. Returns null if `base_url` is null
/// or `screen` is out of range. Free with `listings_controller_free`.
#[unsafe(no_mangle)]
pub extern "C" fn listings_controller_new(
    base_url: *const c_char,
    screen: u32,
    page_size: u32,
) -> *mut FfiListingsController {
    catch_unwind(|| {
        let (Some(url), Some(screen)) = (c_str(base_url), screen_from_code(screen)) else {
            return std::ptr::null_mut();
        };
        let mut config = ControllerConfig::for_screen(screen);
        if page_size > 0 {
            config.page_size = page_size;
        }
        let inner = ListingsSyncController::new(ListingsClient::new(url), config);
        Box::into_raw(Box::new(FfiListingsController {
            inner,
            epoch: Instant::now(),
        }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a controller. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn listings_controller_free(ctrl: *mut FfiListingsController) {
    if !ctrl.is_null() {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            drop(unsafe { Box::from_raw(ctrl) });
        }));
    }
}

/// Set or clear the session. Either pointer may be null.
#[unsafe(no_mangle)]
pub extern "C" fn listings_controller_set_credentials(
    ctrl: *mut FfiListingsController,
    token: *const c_char,
    user_id: *const c_char,
) {
    if ctrl.is_null() {
        return;
    }
    let _ = catch_unwind(AssertUnwindSafe(|| {
        let ctrl = unsafe { &mut *ctrl };
        ctrl.inner.set_credentials(
            c_str(token).map(str::to_string),
            c_str(user_id).map(str::to_string),
        );
    }));
}

// ---------------------------------------------------------------------------
// Query changes
// ---------------------------------------------------------------------------

/// Replace the whole query from its JSON form, e.g.
/// `{"freeTextQuery":"","propertyTypeTab":"Houses","quickFilter":"For cash","advancedFilters":{}}`.
#[unsafe(no_mangle)]
pub extern "C" fn listings_controller_set_query_json(
    ctrl: *mut FfiListingsController,
    query_json: *const c_char,
) -> *mut FfiCommandList {
    with_controller(ctrl, "listings_controller_set_query_json", |ctrl| {
        let json = c_str(query_json).ok_or_else(|| FfiCommandList::null_arg("query_json"))?;
        let query: Query = serde_json::from_str(json)
            .map_err(|e| FfiCommandList::error(FfiErrorCode::InvalidJson, &e.to_string()))?;
        Ok(ctrl.inner.set_query(query))
    })
}

/// Re-run the current query; call on mount and pull-to-refresh.
#[unsafe(no_mangle)]
pub extern "C" fn listings_controller_refresh(ctrl: *mut FfiListingsController) -> *mut FfiCommandList {
    with_controller(ctrl, "listings_controller_refresh", |ctrl| Ok(ctrl.inner.refresh()))
}

/// `tab`: 0 = plots, 1 = houses, 2 = commercial plots.
#[unsafe(no_mangle)]
pub extern "C" fn listings_controller_select_property_tab(
    ctrl: *mut FfiListingsController,
    tab: u32,
) -> *mut FfiCommandList {
    with_controller(ctrl, "listings_controller_select_property_tab", |ctrl| {
        let tab = tab_from_code(tab)
            .ok_or_else(|| FfiCommandList::error(FfiErrorCode::InvalidArg, "unknown property tab"))?;
        Ok(ctrl.inner.select_property_tab(tab))
    })
}

/// `filter`: 0 = all listings, 1 = for cash, 2 = installments.
#[unsafe(no_mangle)]
pub extern "C" fn listings_controller_select_quick_filter(
    ctrl: *mut FfiListingsController,
    filter: u32,
) -> *mut FfiCommandList {
    with_controller(ctrl, "listings_controller_select_quick_filter", |ctrl| {
        let filter = quick_filter_from_code(filter)
            .ok_or_else(|| FfiCommandList::error(FfiErrorCode::InvalidArg, "unknown quick filter"))?;
        Ok(ctrl.inner.select_quick_filter(filter))
    })
}

/// Apply the filter modal: a JSON object of string or number values.
#[unsafe(no_mangle)]
pub extern "C" fn listings_controller_apply_filters_json(
    ctrl: *mut FfiListingsController,
    filters_json: *const c_char,
) -> *mut FfiCommandList {
    with_controller(ctrl, "listings_controller_apply_filters_json", |ctrl| {
        let json = c_str(filters_json).ok_or_else(|| FfiCommandList::null_arg("filters_json"))?;
        let filters: BTreeMap<String, FilterValue> = serde_json::from_str(json)
            .map_err(|e| FfiCommandList::error(FfiErrorCode::InvalidJson, &e.to_string()))?;
        Ok(ctrl.inner.apply_filters(filters))
    })
}

/// Search-box change at host time `now_ms`.
#[unsafe(no_mangle)]
pub extern "C" fn listings_controller_search_input(
    ctrl: *mut FfiListingsController,
    text: *const c_char,
    now_ms: u64,
) -> *mut FfiCommandList {
    with_controller(ctrl, "listings_controller_search_input", |ctrl| {
        let text = c_str(text).ok_or_else(|| FfiCommandList::null_arg("text"))?;
        let now = host_instant(ctrl, now_ms);
        Ok(ctrl.inner.on_search_input(text, now))
    })
}

/// Timer callback that releases debounced search text.
#[unsafe(no_mangle)]
pub extern "C" fn listings_controller_tick(
    ctrl: *mut FfiListingsController,
    now_ms: u64,
) -> *mut FfiCommandList {
    with_controller(ctrl, "listings_controller_tick", |ctrl| {
        let now = host_instant(ctrl, now_ms);
        Ok(ctrl.inner.tick(now))
    })
}

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

/// Scroll event with the distance to the end of the list in logical pixels.
#[unsafe(no_mangle)]
pub extern "C" fn listings_controller_on_scroll(
    ctrl: *mut FfiListingsController,
    distance_from_bottom: f64,
) -> *mut FfiCommandList {
    with_controller(ctrl, "listings_controller_on_scroll", |ctrl| {
        Ok(ctrl.inner.on_scroll(distance_from_bottom))
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn listings_controller_load_more(ctrl: *mut FfiListingsController) -> *mut FfiCommandList {
    with_controller(ctrl, "listings_controller_load_more", |ctrl| Ok(ctrl.inner.load_more()))
}

/// Answer the fetch `ticket_id`.
///
/// `transport` is one of `TRANSPORT_OK` (then `response` must be non-null),
/// `TRANSPORT_UNREACHABLE` or `TRANSPORT_TIMEOUT`.
#[unsafe(no_mangle)]
pub extern "C" fn listings_controller_complete(
    ctrl: *mut FfiListingsController,
    ticket_id: u64,
    transport: u32,
    response: *const FfiHttpResponse,
) -> *mut FfiCommandList {
    with_controller(ctrl, "listings_controller_complete", |ctrl| {
        let outcome = match transport {
            TRANSPORT_OK => {
                if response.is_null() {
                    return Err(FfiCommandList::null_arg("response"));
                }
                let resp = unsafe { &*response };
                let body = if resp.body.is_null() {
                    String::new()
                } else {
                    unsafe { CStr::from_ptr(resp.body) }.to_string_lossy().into_owned()
                };
                Ok(HttpResponse::new(resp.status, body))
            }
            TRANSPORT_UNREACHABLE => Err(TransportError::Unreachable("host reported no connectivity".into())),
            TRANSPORT_TIMEOUT => Err(TransportError::Timeout),
            _ => {
                return Err(FfiCommandList::error(
                    FfiErrorCode::InvalidArg,
                    "unknown transport status",
                ))
            }
        };
        Ok(ctrl.inner.complete(ticket_id, outcome))
    })
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// The feed as JSON: state, listings, paging and the active query.
///
/// Returns null if `ctrl` is null. Free with `listings_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn listings_controller_snapshot_json(ctrl: *const FfiListingsController) -> *mut c_char {
    if ctrl.is_null() {
        return std::ptr::null_mut();
    }
    catch_unwind(AssertUnwindSafe(|| {
        let ctrl = unsafe { &*ctrl };
        match serde_json::to_string(&ctrl.inner.snapshot()) {
            Ok(json) => to_c_string(&json),
            Err(_) => std::ptr::null_mut(),
        }
    }))
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free a command list returned by any controller call. Safe with null.
#[unsafe(no_mangle)]
pub extern "C" fn listings_free_commands(list: *mut FfiCommandList) {
    if list.is_null() {
        return;
    }
    let _ = catch_unwind(|| unsafe { FfiCommandList::free(list) });
}

/// Free a string returned by this library. Safe with null.
#[unsafe(no_mangle)]
pub extern "C" fn listings_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { CString::from_raw(s) });
        });
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
