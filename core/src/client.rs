//! Stateless HTTP request builder and response parser for the listings API.
//!
//! # Design
//! `ListingsClient` holds only a `base_url`. Each operation is split into a
//! `build_*` method that produces an `HttpRequest` and a `parse_*` method
//! that consumes an `HttpResponse`; the host executes the round-trip in
//! between. Every endpoint wraps its payload in the same envelope, so all
//! parsers share `unwrap_envelope`.

use serde::de::DeserializeOwned;
use url::form_urlencoded;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::query::{Endpoint, ResolvedQuery};
use crate::types::{Envelope, ListingsPage, UserProfile};

#[derive(Debug, Clone)]
pub struct ListingsClient {
    base_url: String,
}

impl ListingsClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// One page of `resolved`, `page` starting at 1.
    pub fn build_listings_page(
        &self,
        resolved: &ResolvedQuery,
        page: u32,
        limit: u32,
        token: &str,
    ) -> HttpRequest {
        let mut query = form_urlencoded::Serializer::new(String::new());
        query.append_pair("page", &page.to_string());
        query.append_pair("limit", &limit.to_string());
        for (key, value) in resolved.params.iter() {
            query.append_pair(key, &value.to_string());
        }
        self.get(resolved.endpoint.path(), Some(query.finish()), token)
    }

    /// Unfiltered feed, `GET /api/properties`.
    pub fn build_all_listings(&self, page: u32, limit: u32, token: &str) -> HttpRequest {
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("page", &page.to_string())
            .append_pair("limit", &limit.to_string())
            .finish();
        self.get(Endpoint::AllProperties.path(), Some(query), token)
    }

    pub fn build_get_me(&self, token: &str) -> HttpRequest {
        self.get("/api/users/me", None, token)
    }

    pub fn parse_listings_page(&self, response: HttpResponse) -> Result<ListingsPage, ApiError> {
        unwrap_envelope(response)
    }

    pub fn parse_get_me(&self, response: HttpResponse) -> Result<UserProfile, ApiError> {
        unwrap_envelope(response)
    }

    fn get(&self, path: &str, query: Option<String>, token: &str) -> HttpRequest {
        let url = match query {
            Some(q) if !q.is_empty() => format!("{}{path}?{q}", self.base_url),
            _ => format!("{}{path}", self.base_url),
        };
        HttpRequest {
            method: HttpMethod::Get,
            url,
            headers: vec![
                ("accept".to_string(), "application/json".to_string()),
                ("authorization".to_string(), format!("Bearer {token}")),
            ],
        }
    }
}

/// Map status and envelope to either the typed `data` or an `ApiError`.
fn unwrap_envelope<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    if response.status == 401 {
        return Err(ApiError::Unauthenticated);
    }
    let envelope: Option<Envelope> = serde_json::from_str(&response.body).ok();
    let ok_status = (200..300).contains(&response.status);

    match envelope {
        Some(Envelope {
            success: true,
            data: Some(data),
            ..
        }) if ok_status => {
            serde_json::from_value(data).map_err(|e| ApiError::Deserialization(e.to_string()))
        }
        Some(Envelope {
            error: Some(error), ..
        }) if !ok_status || !error.message.is_empty() => Err(ApiError::ServerRejected(error.message)),
        Some(Envelope { success: true, .. }) if ok_status => {
            Err(ApiError::Deserialization("missing data".to_string()))
        }
        None if ok_status => Err(ApiError::Deserialization(
            "response is not a JSON envelope".to_string(),
        )),
        _ => Err(ApiError::ServerRejected(format!(
            "Request failed with status {}",
            response.status
        ))),
    }
}
