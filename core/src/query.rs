//! Feed query model and its translation into backend request parameters.
//!
//! # Design
//! `Query` is what the user has selected; `ResolvedQuery` is what goes on
//! the wire. The mapping is a pure function so the conditional rules
//! (which endpoint, which params survive, how prices are parsed) are unit
//! testable without a controller or a network.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// Placeholder the filter modal shows in the min-price field.
pub const MIN_PRICE_PLACEHOLDER: &str = "Rs.1 Crore";
/// Placeholder the filter modal shows in the max-price field.
pub const MAX_PRICE_PLACEHOLDER: &str = "Rs.10 Crore";

/// Property-type tab above the general feed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropertyTypeTab {
    #[default]
    Plots,
    Houses,
    #[serde(alias = "Commercial Plots")]
    CommercialPlots,
}

impl PropertyTypeTab {
    pub fn api_value(self) -> &'static str {
        match self {
            PropertyTypeTab::Plots => "plot",
            PropertyTypeTab::Houses => "house",
            PropertyTypeTab::CommercialPlots => "commercial plot",
        }
    }
}

/// The three-way quick filter shown above the feed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuickFilter {
    #[default]
    #[serde(rename = "All Listings", alias = "All")]
    All,
    #[serde(rename = "For cash", alias = "Cash")]
    Cash,
    #[serde(rename = "Installments")]
    Installments,
}

impl QuickFilter {
    /// Parse the label used by the tab bar and the filter modal.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "all listings" | "all" => Some(QuickFilter::All),
            "for cash" | "cash" => Some(QuickFilter::Cash),
            "installments" => Some(QuickFilter::Installments),
            _ => None,
        }
    }

    /// `listingType` parameter; `None` means "do not send".
    pub fn listing_type(self) -> Option<&'static str> {
        match self {
            QuickFilter::All => None,
            QuickFilter::Cash => Some("cash"),
            QuickFilter::Installments => Some("installments"),
        }
    }
}

/// A filter-modal value: the modal mixes free text and numeric inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Text(String),
    Number(Number),
}

impl FilterValue {
    /// Trimmed textual form; numbers render without quotes.
    pub fn as_text(&self) -> String {
        match self {
            FilterValue::Text(s) => s.trim().to_string(),
            FilterValue::Number(n) => n.to_string(),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        FilterValue::Text(s.to_string())
    }
}

impl From<i64> for FilterValue {
    fn from(n: i64) -> Self {
        FilterValue::Number(n.into())
    }
}

/// Everything the user has selected for the feed. Always replaced whole.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Query {
    pub free_text_query: String,
    pub property_type_tab: PropertyTypeTab,
    pub quick_filter: QuickFilter,
    pub advanced_filters: BTreeMap<String, FilterValue>,
}

impl Query {
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.free_text_query = text.into();
        self
    }

    pub fn with_tab(mut self, tab: PropertyTypeTab) -> Self {
        self.property_type_tab = tab;
        self
    }

    pub fn with_quick_filter(mut self, filter: QuickFilter) -> Self {
        self.quick_filter = filter;
        self
    }

    pub fn with_filter(mut self, key: &str, value: impl Into<FilterValue>) -> Self {
        self.advanced_filters.insert(key.to_string(), value.into());
        self
    }

    fn filter_text(&self, key: &str) -> Option<String> {
        self.advanced_filters
            .get(key)
            .map(FilterValue::as_text)
            .filter(|s| !s.is_empty())
    }
}

/// Which listings screen the query belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Screen {
    /// The public feed with property-type tabs.
    General,
    /// The signed-in user's own listings.
    MyListings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    AllProperties,
    Search,
    AdvancedSearch,
    MyProperties,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::AllProperties => "/api/properties",
            Endpoint::Search => "/api/properties/search",
            Endpoint::AdvancedSearch => "/api/properties/search/advanced",
            Endpoint::MyProperties => "/api/properties/my-properties",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Text(String),
    Int(i64),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Text(s) => f.write_str(s),
            ParamValue::Int(n) => write!(f, "{n}"),
        }
    }
}

/// Ordered query parameters, excluding `page` and `limit`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamMap(Vec<(&'static str, ParamValue)>);

impl ParamMap {
    fn push_text(&mut self, key: &'static str, value: impl Into<String>) {
        self.0.push((key, ParamValue::Text(value.into())));
    }

    fn push_int(&mut self, key: &'static str, value: i64) {
        self.0.push((key, ParamValue::Int(value)));
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &ParamValue)> {
        self.0.iter().map(|(k, v)| (*k, v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// JSON object view, integers kept as numbers.
    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .0
            .iter()
            .map(|(k, v)| {
                let value = match v {
                    ParamValue::Text(s) => Value::String(s.clone()),
                    ParamValue::Int(n) => Value::Number((*n).into()),
                };
                (k.to_string(), value)
            })
            .collect();
        Value::Object(map)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedQuery {
    pub endpoint: Endpoint,
    pub params: ParamMap,
}

/// Parse a currency-formatted price typed into the filter modal.
///
/// Returns `None` when the field still shows its placeholder or does not
/// reduce to an integer once the `Rs.` prefix, commas and spaces are removed.
pub fn parse_price(raw: &str, placeholder: &str) -> Option<i64> {
    let raw = raw.trim();
    if raw.is_empty() || raw == placeholder {
        return None;
    }
    let lowered = raw.to_ascii_lowercase();
    let digits = if lowered.starts_with("rs.") {
        &raw[3..]
    } else if lowered.starts_with("rs") {
        &raw[2..]
    } else {
        raw
    };
    let cleaned: String = digits
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();
    cleaned.parse::<i64>().ok()
}

fn price_filter(query: &Query, key: &str, placeholder: &str) -> Option<i64> {
    match query.advanced_filters.get(key)? {
        FilterValue::Number(n) => n.as_i64(),
        FilterValue::Text(s) => parse_price(s, placeholder),
    }
}

/// `listingType` with the filter modal's `typeOfPlot` taking over when the
/// quick filter is "All Listings".
fn resolved_listing_type(query: &Query) -> Option<String> {
    if let Some(lt) = query.quick_filter.listing_type() {
        return Some(lt.to_string());
    }
    let type_of_plot = query.filter_text("typeOfPlot")?;
    match QuickFilter::from_label(&type_of_plot) {
        Some(filter) => filter.listing_type().map(str::to_string),
        None => Some(type_of_plot),
    }
}

/// Appends the filter-modal params; returns true if any was added.
fn push_filter_set(query: &Query, params: &mut ParamMap) -> bool {
    let before = params.len();
    if let Some(lt) = resolved_listing_type(query) {
        params.push_text("listingType", lt);
    }
    if let Some(phase) = query.filter_text("phase") {
        params.push_text("phase", phase);
    }
    if let Some(block) = query.filter_text("block") {
        params.push_text("block", block);
    }
    if let Some(area) = query.filter_text("area") {
        if !area.eq_ignore_ascii_case("all") {
            params.push_text("area", area);
        }
    }
    if let Some(min) = price_filter(query, "minPrice", MIN_PRICE_PLACEHOLDER) {
        params.push_int("minPrice", min);
    }
    if let Some(max) = price_filter(query, "maxPrice", MAX_PRICE_PLACEHOLDER) {
        params.push_int("maxPrice", max);
    }
    params.len() > before
}

/// Choose the endpoint and build its parameters for `query` on `screen`.
///
/// `user_id` is only consulted on [`Screen::MyListings`].
pub fn resolve_query_params(query: &Query, screen: Screen, user_id: Option<&str>) -> ResolvedQuery {
    let mut params = ParamMap::default();
    let text = query.free_text_query.trim();

    let endpoint = match screen {
        Screen::General if !text.is_empty() => {
            params.push_text("searchString", text);
            params.push_text("propertyType", query.property_type_tab.api_value());
            if let Some(lt) = query.quick_filter.listing_type() {
                params.push_text("listingType", lt);
            }
            Endpoint::Search
        }
        // The tab is always a filter on the general feed.
        Screen::General => {
            params.push_text("propertyType", query.property_type_tab.api_value());
            push_filter_set(query, &mut params);
            Endpoint::AdvancedSearch
        }
        Screen::MyListings => {
            let endpoint = if !text.is_empty() {
                params.push_text("searchString", text);
                push_filter_set(query, &mut params);
                Endpoint::Search
            } else if push_filter_set(query, &mut params) {
                Endpoint::AdvancedSearch
            } else {
                Endpoint::MyProperties
            };
            if let Some(uid) = user_id {
                params.push_text("userId", uid);
            }
            endpoint
        }
    };

    ResolvedQuery { endpoint, params }
}
