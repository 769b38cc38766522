//! Pagination, search and filter synchronization for a listings feed.
//!
//! # Design
//! `ListingsSyncController` is a synchronous state machine. Every user event
//! returns a list of `Command`s; a `Command::Fetch` carries a `FetchTicket`
//! whose request the host executes before calling `complete` with the ticket
//! id. There is exactly one in-flight slot:
//!
//! - a load-more arriving while the slot is occupied is dropped;
//! - a query change always issues a new reset fetch and takes over the slot,
//!   bumping the query generation so the superseded response is discarded
//!   when it eventually arrives.

use std::collections::{BTreeMap, HashSet};
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, warn};

use crate::client::ListingsClient;
use crate::debounce::{DebouncePolicy, SearchDebouncer};
use crate::error::ApiError;
use crate::http::{FetchOutcome, HttpRequest};
use crate::query::{resolve_query_params, FilterValue, PropertyTypeTab, Query, QuickFilter, Screen};
use crate::types::{Listing, ListingsPage};

pub const DEFAULT_PAGE_SIZE: u32 = 10;
/// Distance from the bottom of the list, in logical pixels, at which the
/// next page is requested.
pub const DEFAULT_SCROLL_THRESHOLD: f64 = 400.0;

#[derive(Debug, Clone, PartialEq)]
pub struct ControllerConfig {
    pub screen: Screen,
    pub page_size: u32,
    pub scroll_threshold: f64,
    pub debounce: DebouncePolicy,
}

impl ControllerConfig {
    /// Defaults per screen: the general feed debounces search input, the
    /// my-listings screen applies it immediately.
    pub fn for_screen(screen: Screen) -> Self {
        let debounce = match screen {
            Screen::General => DebouncePolicy::GENERAL_FEED,
            Screen::MyListings => DebouncePolicy::Immediate,
        };
        Self {
            screen,
            page_size: DEFAULT_PAGE_SIZE,
            scroll_threshold: DEFAULT_SCROLL_THRESHOLD,
            debounce,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FetchState {
    Idle,
    Loading,
    LoadingMore,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FetchKind {
    Reset,
    LoadMore,
}

/// A fetch the host must execute and answer through `complete`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub id: u64,
    pub generation: u64,
    pub kind: FetchKind,
    pub page: u32,
    pub request: HttpRequest,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Fetch(FetchTicket),
    /// Show a transient, non-blocking notification.
    Notify(String),
    /// Hand over to the auth flow; the session is unusable.
    SignOut,
}

/// Listings merged so far for the current query, in server order.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    listings: Vec<Listing>,
    seen: HashSet<String>,
    current_page: u32,
    total_pages: u32,
}

impl ResultSet {
    pub fn listings(&self) -> &[Listing] {
        &self.listings
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    fn clear(&mut self) {
        *self = Self::default();
    }

    /// Append listings not seen before; returns how many were added.
    fn append(&mut self, listings: Vec<Listing>) -> usize {
        let before = self.listings.len();
        for listing in listings {
            if self.seen.insert(listing.id.clone()) {
                self.listings.push(listing);
            }
        }
        self.listings.len() - before
    }
}

#[derive(Debug, Clone, Default)]
struct Credentials {
    token: Option<String>,
    user_id: Option<String>,
}

#[derive(Debug, Clone, Copy)]
struct InFlight {
    ticket: u64,
    generation: u64,
    kind: FetchKind,
    page: u32,
}

/// Serializable view handed to the host for rendering.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedSnapshot<'a> {
    pub state: FetchState,
    pub listings: &'a [Listing],
    pub current_page: u32,
    pub total_pages: u32,
    pub has_more: bool,
    pub query: &'a Query,
}

pub struct ListingsSyncController {
    client: ListingsClient,
    config: ControllerConfig,
    credentials: Credentials,
    query: Query,
    debouncer: SearchDebouncer,
    generation: u64,
    next_ticket: u64,
    in_flight: Option<InFlight>,
    state: FetchState,
    results: ResultSet,
    has_more: bool,
    initial_loaded: bool,
    user_scrolled: bool,
}

impl ListingsSyncController {
    pub fn new(client: ListingsClient, config: ControllerConfig) -> Self {
        let debouncer = SearchDebouncer::new(config.debounce);
        Self {
            client,
            config,
            credentials: Credentials::default(),
            query: Query::default(),
            debouncer,
            generation: 0,
            next_ticket: 0,
            in_flight: None,
            state: FetchState::Idle,
            results: ResultSet::default(),
            has_more: true,
            initial_loaded: false,
            user_scrolled: false,
        }
    }

    pub fn set_credentials(&mut self, token: Option<String>, user_id: Option<String>) {
        self.credentials = Credentials { token, user_id };
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Replace the whole query and start over from page 1.
    ///
    /// Any pending debounced search text is dropped: the caller supplied the
    /// text it wants.
    pub fn set_query(&mut self, query: Query) -> Vec<Command> {
        self.debouncer.cancel();
        self.reset_with(query)
    }

    /// Re-run the current query, e.g. on mount or pull-to-refresh.
    pub fn refresh(&mut self) -> Vec<Command> {
        self.reset_with(self.query.clone())
    }

    pub fn select_property_tab(&mut self, tab: PropertyTypeTab) -> Vec<Command> {
        if self.query.property_type_tab == tab {
            return Vec::new();
        }
        self.reset_with(self.query.clone().with_tab(tab))
    }

    pub fn select_quick_filter(&mut self, filter: QuickFilter) -> Vec<Command> {
        if self.query.quick_filter == filter {
            return Vec::new();
        }
        self.reset_with(self.query.clone().with_quick_filter(filter))
    }

    /// Apply the filter modal; always refetches.
    pub fn apply_filters(&mut self, filters: BTreeMap<String, FilterValue>) -> Vec<Command> {
        let mut query = self.query.clone();
        query.advanced_filters = filters;
        self.reset_with(query)
    }

    /// Feed a search-box change through the debounce policy.
    pub fn on_search_input(&mut self, text: &str, now: Instant) -> Vec<Command> {
        match self.debouncer.input(text.to_string(), now) {
            Some(text) => self.apply_search_text(text),
            None => Vec::new(),
        }
    }

    /// Let a debounce window expire; hosts call this from a timer.
    pub fn tick(&mut self, now: Instant) -> Vec<Command> {
        match self.debouncer.poll(now) {
            Some(text) => self.apply_search_text(text),
            None => Vec::new(),
        }
    }

    fn apply_search_text(&mut self, text: String) -> Vec<Command> {
        if self.query.free_text_query.trim() == text.trim() {
            debug!("search text unchanged, not refetching");
            return Vec::new();
        }
        self.reset_with(self.query.clone().with_text(text))
    }

    fn reset_with(&mut self, query: Query) -> Vec<Command> {
        self.query = query;
        self.generation += 1;
        self.results.clear();
        self.has_more = true;
        self.initial_loaded = false;
        self.user_scrolled = false;
        if let Some(previous) = self.in_flight.take() {
            debug!(ticket = previous.ticket, "superseding in-flight fetch");
        }
        self.issue(FetchKind::Reset, 1)
    }

    // -----------------------------------------------------------------------
    // Pagination
    // -----------------------------------------------------------------------

    /// Request the next page if the feed is ready for it; otherwise no-op.
    pub fn load_more(&mut self) -> Vec<Command> {
        let ready = self.in_flight.is_none()
            && self.state == FetchState::Idle
            && self.has_more
            && self.initial_loaded
            && self.user_scrolled;
        if !ready {
            return Vec::new();
        }
        self.issue(FetchKind::LoadMore, self.results.current_page + 1)
    }

    /// The list reached the end-of-list threshold.
    pub fn on_scroll_near_end(&mut self) -> Vec<Command> {
        self.user_scrolled = true;
        self.load_more()
    }

    /// Raw scroll hook: `distance_from_bottom` in logical pixels. Non-finite
    /// distances are ignored.
    pub fn on_scroll(&mut self, distance_from_bottom: f64) -> Vec<Command> {
        if !distance_from_bottom.is_finite() || distance_from_bottom > self.config.scroll_threshold {
            return Vec::new();
        }
        self.on_scroll_near_end()
    }

    fn issue(&mut self, kind: FetchKind, page: u32) -> Vec<Command> {
        // A missing session fails like a reset, whatever was requested.
        let Some(token) = self.credentials.token.clone() else {
            return self.fail(FetchKind::Reset, ApiError::MissingCredential);
        };
        let user_id = self.credentials.user_id.clone();
        if self.config.screen == Screen::MyListings && user_id.is_none() {
            return self.fail(FetchKind::Reset, ApiError::MissingCredential);
        }

        let resolved = resolve_query_params(&self.query, self.config.screen, user_id.as_deref());
        let request = self
            .client
            .build_listings_page(&resolved, page, self.config.page_size, &token);

        self.next_ticket += 1;
        let ticket = self.next_ticket;
        self.in_flight = Some(InFlight {
            ticket,
            generation: self.generation,
            kind,
            page,
        });
        self.state = match kind {
            FetchKind::Reset => FetchState::Loading,
            FetchKind::LoadMore => FetchState::LoadingMore,
        };
        debug!(ticket, page, ?kind, endpoint = resolved.endpoint.path(), "issuing fetch");

        vec![Command::Fetch(FetchTicket {
            id: ticket,
            generation: self.generation,
            kind,
            page,
            request,
        })]
    }

    // -----------------------------------------------------------------------
    // Completion
    // -----------------------------------------------------------------------

    /// Merge the host's answer for `ticket_id`.
    ///
    /// Answers for anything but the current in-flight ticket are stale and
    /// dropped without touching state.
    pub fn complete(&mut self, ticket_id: u64, outcome: FetchOutcome) -> Vec<Command> {
        let in_flight = match self.in_flight {
            Some(f) if f.ticket == ticket_id && f.generation == self.generation => f,
            _ => {
                debug!(ticket = ticket_id, "discarding stale response");
                return Vec::new();
            }
        };
        self.in_flight = None;

        let result = outcome
            .map_err(ApiError::from)
            .and_then(|response| self.client.parse_listings_page(response));
        match result {
            Ok(page) => {
                self.merge(in_flight, page);
                Vec::new()
            }
            Err(err) => self.fail(in_flight.kind, err),
        }
    }

    fn merge(&mut self, in_flight: InFlight, page: ListingsPage) {
        if in_flight.kind == FetchKind::Reset {
            self.results.clear();
            self.initial_loaded = true;
        }
        let added = self.results.append(page.properties);
        self.results.current_page = in_flight.page;
        self.results.total_pages = page.pagination.total_pages;
        self.has_more = self.results.current_page < self.results.total_pages;
        self.state = FetchState::Idle;
        debug!(
            ticket = in_flight.ticket,
            added,
            total = self.results.len(),
            has_more = self.has_more,
            "merged page"
        );
    }

    fn fail(&mut self, kind: FetchKind, err: ApiError) -> Vec<Command> {
        let mut commands = Vec::new();
        match kind {
            FetchKind::Reset => {
                warn!(error = %err, "listings fetch failed");
                self.results.clear();
                self.state = FetchState::Error;
                commands.push(Command::Notify(err.user_message()));
            }
            // Swallowed so scrolling is not interrupted; scrolling again retries.
            FetchKind::LoadMore => {
                debug!(error = %err, "load-more failed");
                self.state = FetchState::Idle;
            }
        }
        if err.requires_sign_out() {
            commands.push(Command::SignOut);
        }
        commands
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn state(&self) -> FetchState {
        self.state
    }

    pub fn results(&self) -> &ResultSet {
        &self.results
    }

    pub fn listings(&self) -> &[Listing] {
        self.results.listings()
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Id of the ticket whose answer is currently awaited.
    pub fn in_flight_ticket(&self) -> Option<u64> {
        self.in_flight.map(|f| f.ticket)
    }

    /// The feed loaded and the query matched nothing.
    pub fn is_empty_result(&self) -> bool {
        self.initial_loaded && self.state == FetchState::Idle && self.results.is_empty()
    }

    /// Show the end-of-list marker.
    pub fn reached_end(&self) -> bool {
        self.initial_loaded && !self.has_more && !self.results.is_empty()
    }

    pub fn snapshot(&self) -> FeedSnapshot<'_> {
        FeedSnapshot {
            state: self.state,
            listings: self.results.listings(),
            current_page: self.results.current_page,
            total_pages: self.results.total_pages,
            has_more: self.has_more,
            query: &self.query,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::http::{HttpResponse, TransportError};

    fn controller(screen: Screen) -> ListingsSyncController {
        let mut c = ListingsSyncController::new(
            ListingsClient::new("http://localhost:3000"),
            ControllerConfig::for_screen(screen),
        );
        c.set_credentials(Some("tok".into()), Some("u1".into()));
        c
    }

    fn page(ids: &[&str], page: u32, total_pages: u32) -> FetchOutcome {
        let properties: Vec<_> = ids.iter().map(|id| serde_json::json!({"_id": id})).collect();
        let body = serde_json::json!({
            "success": true,
            "data": {"properties": properties, "pagination": {"page": page, "totalPages": total_pages}}
        });
        Ok(HttpResponse::new(200, body.to_string()))
    }

    fn only_fetch(commands: Vec<Command>) -> FetchTicket {
        assert_eq!(commands.len(), 1, "expected one command, got {commands:?}");
        match commands.into_iter().next() {
            Some(Command::Fetch(ticket)) => ticket,
            other => panic!("expected fetch, got {other:?}"),
        }
    }

    fn ids(c: &ListingsSyncController) -> Vec<&str> {
        c.listings().iter().map(|l| l.id.as_str()).collect()
    }

    /// Controller with page 1 of `total_pages` already merged.
    fn loaded(ids_page1: &[&str], total_pages: u32) -> ListingsSyncController {
        let mut c = controller(Screen::General);
        let t = only_fetch(c.refresh());
        assert!(c.complete(t.id, page(ids_page1, 1, total_pages)).is_empty());
        c
    }

    #[test]
    fn set_query_issues_single_reset_for_page_one() {
        let mut c = controller(Screen::General);
        let query = Query::default().with_tab(PropertyTypeTab::Houses);
        let ticket = only_fetch(c.set_query(query));

        assert_eq!(ticket.kind, FetchKind::Reset);
        assert_eq!(ticket.page, 1);
        assert!(ticket.request.url.contains("page=1&limit=10"));
        assert!(ticket.request.url.contains("propertyType=house"));
        assert_eq!(c.state(), FetchState::Loading);
        assert_eq!(c.in_flight_ticket(), Some(ticket.id));
    }

    #[test]
    fn reset_completion_populates_results() {
        let c = loaded(&["a", "b"], 3);
        assert_eq!(ids(&c), vec!["a", "b"]);
        assert_eq!(c.state(), FetchState::Idle);
        assert_eq!(c.results().current_page(), 1);
        assert_eq!(c.results().total_pages(), 3);
        assert!(c.has_more());
    }

    // Deviation from the shipped app, where a late response for a superseded
    // query overwrote the newer feed.
    #[test]
    fn superseded_reset_response_is_discarded() {
        let mut c = controller(Screen::General);
        let plots = only_fetch(c.set_query(Query::default()));
        let houses = only_fetch(c.set_query(Query::default().with_tab(PropertyTypeTab::Houses)));
        assert_ne!(plots.generation, houses.generation);

        assert!(c.complete(houses.id, page(&["h1", "h2"], 1, 1)).is_empty());
        assert!(c.complete(plots.id, page(&["p1"], 1, 1)).is_empty());
        assert_eq!(ids(&c), vec!["h1", "h2"]);
    }

    #[test]
    fn stale_response_arriving_first_leaves_loading_state() {
        let mut c = controller(Screen::General);
        let first = only_fetch(c.set_query(Query::default().with_text("dha")));
        let second = only_fetch(c.set_query(Query::default().with_text("bahria")));

        assert!(c.complete(first.id, page(&["stale"], 1, 1)).is_empty());
        assert_eq!(c.state(), FetchState::Loading);
        assert!(c.listings().is_empty());

        c.complete(second.id, page(&["fresh"], 1, 1));
        assert_eq!(ids(&c), vec!["fresh"]);
    }

    #[test]
    fn load_more_waits_for_user_scroll() {
        let mut c = loaded(&["a"], 2);
        assert!(c.load_more().is_empty());

        let ticket = only_fetch(c.on_scroll_near_end());
        assert_eq!(ticket.kind, FetchKind::LoadMore);
        assert_eq!(ticket.page, 2);
        assert_eq!(c.state(), FetchState::LoadingMore);
    }

    #[test]
    fn load_more_before_initial_fetch_is_noop() {
        let mut c = controller(Screen::General);
        only_fetch(c.refresh());
        assert!(c.on_scroll_near_end().is_empty());
    }

    #[test]
    fn rapid_load_more_issues_one_fetch() {
        let mut c = loaded(&["a"], 3);
        let first = c.on_scroll_near_end();
        let second = c.load_more();
        let third = c.on_scroll(0.0);

        let fetches = [first, second, third]
            .into_iter()
            .flatten()
            .filter(|cmd| matches!(cmd, Command::Fetch(_)))
            .count();
        assert_eq!(fetches, 1);
    }

    #[test]
    fn overlapping_page_is_deduplicated() {
        let mut c = loaded(&["a", "b", "c"], 3);
        let ticket = only_fetch(c.on_scroll_near_end());
        c.complete(ticket.id, page(&["c", "d", "a", "e"], 2, 3));

        assert_eq!(ids(&c), vec!["a", "b", "c", "d", "e"]);
        assert_eq!(c.results().current_page(), 2);
    }

    #[test]
    fn duplicates_within_first_page_are_dropped() {
        let c = loaded(&["a", "a", "b"], 1);
        assert_eq!(ids(&c), vec!["a", "b"]);
    }

    #[test]
    fn has_more_ends_at_last_page() {
        let mut c = loaded(&["a"], 2);
        let ticket = only_fetch(c.on_scroll_near_end());
        c.complete(ticket.id, page(&["b"], 2, 2));

        assert!(!c.has_more());
        assert!(c.reached_end());
        assert!(c.on_scroll_near_end().is_empty());
        assert!(c.load_more().is_empty());
    }

    #[test]
    fn single_page_result_has_no_more() {
        let c = loaded(&["a"], 1);
        assert!(!c.has_more());
    }

    #[test]
    fn empty_result_is_reported() {
        let c = loaded(&[], 0);
        assert!(c.is_empty_result());
        assert!(!c.has_more());
    }

    #[test]
    fn load_more_failure_is_silent_and_retryable() {
        let mut c = loaded(&["a", "b"], 3);
        let ticket = only_fetch(c.on_scroll_near_end());

        let commands = c.complete(ticket.id, Err(TransportError::Timeout));
        assert!(commands.is_empty());
        assert_eq!(ids(&c), vec!["a", "b"]);
        assert_eq!(c.state(), FetchState::Idle);
        assert!(c.has_more());

        let retry = only_fetch(c.on_scroll(120.0));
        assert_eq!(retry.page, 2);
    }

    #[test]
    fn load_more_server_error_is_silent() {
        let mut c = loaded(&["a"], 3);
        let ticket = only_fetch(c.on_scroll_near_end());
        let body = r#"{"success":false,"error":{"message":"boom"}}"#;
        let commands = c.complete(ticket.id, Ok(HttpResponse::new(500, body)));
        assert!(commands.is_empty());
        assert_eq!(ids(&c), vec!["a"]);
    }

    #[test]
    fn reset_failure_notifies_and_empties() {
        let mut c = loaded(&["a"], 3);
        let ticket = only_fetch(c.set_query(Query::default().with_text("x")));
        let commands = c.complete(
            ticket.id,
            Err(TransportError::Unreachable("offline".into())),
        );

        assert_eq!(commands, vec![Command::Notify("No internet connection".into())]);
        assert!(c.listings().is_empty());
        assert_eq!(c.state(), FetchState::Error);
        assert!(c.on_scroll_near_end().is_empty());
    }

    #[test]
    fn missing_token_short_circuits_reset() {
        let mut c = controller(Screen::General);
        c.set_credentials(None, None);
        let commands = c.refresh();

        assert_eq!(
            commands,
            vec![Command::Notify("Please sign in again".into()), Command::SignOut]
        );
        assert_eq!(c.state(), FetchState::Error);
        assert_eq!(c.in_flight_ticket(), None);
    }

    #[test]
    fn missing_token_on_load_more_is_reset_failure() {
        let mut c = loaded(&["a", "b"], 3);
        c.set_credentials(None, None);
        let commands = c.on_scroll_near_end();

        assert_eq!(
            commands,
            vec![Command::Notify("Please sign in again".into()), Command::SignOut]
        );
        assert!(c.listings().is_empty());
        assert_eq!(c.state(), FetchState::Error);
        assert_eq!(c.in_flight_ticket(), None);
    }

    #[test]
    fn my_listings_requires_user_id() {
        let mut c = controller(Screen::MyListings);
        c.set_credentials(Some("tok".into()), None);
        assert!(c.refresh().contains(&Command::SignOut));
    }

    #[test]
    fn unauthenticated_response_signs_out() {
        let mut c = controller(Screen::General);
        let ticket = only_fetch(c.refresh());
        let commands = c.complete(ticket.id, Ok(HttpResponse::new(401, "")));
        assert!(commands.contains(&Command::SignOut));
    }

    #[test]
    fn my_listings_defaults_to_my_properties() {
        let mut c = controller(Screen::MyListings);
        let ticket = only_fetch(c.refresh());
        assert!(ticket
            .request
            .url
            .starts_with("http://localhost:3000/api/properties/my-properties?"));
        assert!(ticket.request.url.ends_with("userId=u1"));
    }

    #[test]
    fn general_feed_debounces_search_input() {
        let mut c = loaded(&["a"], 1);
        let t0 = Instant::now();
        assert!(c.on_search_input("d", t0).is_empty());
        assert!(c.on_search_input("dh", t0 + Duration::from_millis(200)).is_empty());
        assert!(c.tick(t0 + Duration::from_millis(600)).is_empty());

        let ticket = only_fetch(c.tick(t0 + Duration::from_millis(700)));
        assert!(ticket.request.url.contains("searchString=dh"));
        assert_eq!(c.query().free_text_query, "dh");
    }

    #[test]
    fn my_listings_applies_search_immediately() {
        let mut c = controller(Screen::MyListings);
        let ticket = only_fetch(c.on_search_input("villa", Instant::now()));
        assert!(ticket.request.url.contains("/api/properties/search?"));
        assert!(ticket.request.url.contains("searchString=villa"));
    }

    #[test]
    fn whitespace_only_search_change_does_not_refetch() {
        let mut c = controller(Screen::MyListings);
        let now = Instant::now();
        only_fetch(c.on_search_input("dha", now));
        let generation = c.generation();

        assert!(c.on_search_input("dha ", now).is_empty());
        assert!(c.on_search_input(" dha", now).is_empty());
        assert_eq!(c.generation(), generation);
        assert_eq!(c.state(), FetchState::Loading);

        let ticket = only_fetch(c.on_search_input("dhaa", now));
        assert!(ticket.request.url.contains("searchString=dhaa"));
    }

    #[test]
    fn set_query_drops_pending_search_text() {
        let mut c = controller(Screen::General);
        let t0 = Instant::now();
        c.on_search_input("typed", t0);
        only_fetch(c.set_query(Query::default().with_tab(PropertyTypeTab::Houses)));
        assert!(c.tick(t0 + Duration::from_secs(1)).is_empty());
        assert_eq!(c.query().free_text_query, "");
    }

    #[test]
    fn scroll_outside_threshold_does_nothing() {
        let mut c = loaded(&["a"], 2);
        assert!(c.on_scroll(401.0).is_empty());
        assert!(!c.on_scroll(400.0).is_empty());
    }

    #[test]
    fn non_finite_scroll_distance_is_ignored() {
        let mut c = loaded(&["a"], 2);
        assert!(c.on_scroll(f64::NAN).is_empty());
        assert!(c.on_scroll(f64::INFINITY).is_empty());
        assert!(c.on_scroll(f64::NEG_INFINITY).is_empty());
        assert_eq!(c.state(), FetchState::Idle);
        assert!(!c.on_scroll(0.0).is_empty());
    }

    #[test]
    fn reselecting_same_tab_or_filter_is_noop() {
        let mut c = loaded(&["a"], 1);
        assert!(c.select_property_tab(PropertyTypeTab::Plots).is_empty());
        assert!(c.select_quick_filter(QuickFilter::All).is_empty());

        let ticket = only_fetch(c.select_quick_filter(QuickFilter::Installments));
        assert!(ticket.request.url.contains("listingType=installments"));
        assert!(c.listings().is_empty());
    }

    #[test]
    fn apply_filters_replaces_filter_set() {
        let mut c = controller(Screen::General);
        let mut filters = BTreeMap::new();
        filters.insert("minPrice".to_string(), FilterValue::from("2,500,000"));
        let ticket = only_fetch(c.apply_filters(filters));
        assert!(ticket.request.url.contains("minPrice=2500000"));

        let ticket = only_fetch(c.apply_filters(BTreeMap::new()));
        assert!(!ticket.request.url.contains("minPrice"));
    }

    #[test]
    fn snapshot_serializes_for_host() {
        let c = loaded(&["a"], 2);
        let json = serde_json::to_value(c.snapshot()).unwrap();
        assert_eq!(json["state"], "Idle");
        assert_eq!(json["listings"][0]["_id"], "a");
        assert_eq!(json["hasMore"], true);
        assert_eq!(json["query"]["propertyTypeTab"], "Plots");
    }
}
