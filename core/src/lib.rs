//! Listings feed core for the real-estate mobile client.
//!
//! # Overview
//! Owns the state behind the listings screens (search text, property-type
//! tab, quick filter, filter modal, paginated results) and turns user events
//! into HTTP requests described as plain data. The mobile host executes the
//! requests and feeds the responses back (host-does-IO pattern), so the core
//! stays deterministic and testable.
//!
//! # Design
//! - `query` maps a `Query` to an endpoint and parameters with a pure function.
//! - `ListingsClient` is stateless: `build_*` produces requests, `parse_*`
//!   consumes responses.
//! - `ListingsSyncController` holds the per-screen state machine; all state
//!   lives on the instance, so independent screens and tests never interfere.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod controller;
pub mod debounce;
pub mod error;
pub mod http;
pub mod query;
pub mod session;
pub mod types;

pub use client::ListingsClient;
pub use controller::{
    Command, ControllerConfig, FeedSnapshot, FetchKind, FetchState, FetchTicket,
    ListingsSyncController, ResultSet,
};
pub use debounce::{DebouncePolicy, SearchDebouncer};
pub use error::ApiError;
pub use http::{FetchOutcome, HttpMethod, HttpRequest, HttpResponse, TransportError};
pub use query::{
    parse_price, resolve_query_params, Endpoint, FilterValue, ParamMap, ParamValue,
    PropertyTypeTab, Query, QuickFilter, ResolvedQuery, Screen,
};
pub use session::VerificationPrompt;
pub use types::{Listing, ListingsPage, Pagination, UserProfile};
