//! In-memory stand-in for the listings backend.
//!
//! Serves the same routes and `{ success, data, error }` envelope as the real
//! API so the core can be exercised end to end without a database.

pub mod config;
pub mod store;
pub mod telemetry;

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};

pub use store::{Property, PropertyDraft, PropertyFilter, Store, User};

pub const DEFAULT_LIMIT: u32 = 10;
pub const MAX_LIMIT: u32 = 50;

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    app_with(Store::seeded())
}

pub fn app_with(store: Store) -> Router {
    let db: Db = Arc::new(RwLock::new(store));
    Router::new()
        .route("/api/properties", get(list_properties))
        .route("/api/properties/search", get(search_properties))
        .route("/api/properties/search/advanced", get(advanced_search))
        .route("/api/properties/my-properties", get(my_properties))
        .route("/api/users/me", get(me))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Error reply in the API envelope.
#[derive(Debug)]
pub struct ApiFailure {
    status: StatusCode,
    message: String,
}

impl ApiFailure {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        let body = json!({ "success": false, "error": { "message": self.message } });
        (self.status, Json(body)).into_response()
    }
}

fn success(data: Value) -> Json<Value> {
    Json(json!({ "success": true, "data": data }))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search_string: Option<String>,
    pub property_type: Option<String>,
    pub listing_type: Option<String>,
    pub phase: Option<String>,
    pub block: Option<String>,
    pub area: Option<String>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub user_id: Option<String>,
}

impl ListingParams {
    fn filter(&self) -> PropertyFilter {
        PropertyFilter {
            search: self.search_string.clone(),
            property_type: self.property_type.clone(),
            listing_type: self.listing_type.clone(),
            phase: self.phase.clone(),
            block: self.block.clone(),
            area: self.area.clone(),
            min_price: self.min_price,
            max_price: self.max_price,
            owner: self.user_id.clone(),
        }
    }
}

async fn authenticate(db: &Db, headers: &HeaderMap) -> Result<User, ApiFailure> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| ApiFailure::new(StatusCode::UNAUTHORIZED, "Missing bearer token"))?;
    db.read()
        .await
        .user_for_token(token)
        .cloned()
        .ok_or_else(|| ApiFailure::new(StatusCode::UNAUTHORIZED, "Invalid or expired token"))
}

async fn paginate(db: &Db, params: &ListingParams, filter: &PropertyFilter) -> Result<Json<Value>, ApiFailure> {
    let page = params.page.unwrap_or(1);
    if page == 0 {
        return Err(ApiFailure::new(StatusCode::BAD_REQUEST, "Invalid page"));
    }
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);

    let store = db.read().await;
    let matched = store.filtered(filter);
    let total = matched.len() as u32;
    let total_pages = total.div_ceil(limit);
    let start = (page - 1).saturating_mul(limit) as usize;
    let properties: Vec<&Property> = matched.into_iter().skip(start).take(limit as usize).collect();

    tracing::debug!(page, limit, total, "serving listings page");
    Ok(success(json!({
        "properties": properties,
        "pagination": { "page": page, "limit": limit, "total": total, "totalPages": total_pages }
    })))
}

async fn list_properties(
    State(db): State<Db>,
    headers: HeaderMap,
    Query(params): Query<ListingParams>,
) -> Result<Json<Value>, ApiFailure> {
    authenticate(&db, &headers).await?;
    paginate(&db, &params, &PropertyFilter::default()).await
}

async fn search_properties(
    State(db): State<Db>,
    headers: HeaderMap,
    Query(params): Query<ListingParams>,
) -> Result<Json<Value>, ApiFailure> {
    authenticate(&db, &headers).await?;
    if params.search_string.as_deref().map_or(true, |s| s.trim().is_empty()) {
        return Err(ApiFailure::new(StatusCode::BAD_REQUEST, "searchString is required"));
    }
    paginate(&db, &params, &params.filter()).await
}

async fn advanced_search(
    State(db): State<Db>,
    headers: HeaderMap,
    Query(params): Query<ListingParams>,
) -> Result<Json<Value>, ApiFailure> {
    authenticate(&db, &headers).await?;
    let mut filter = params.filter();
    filter.search = None;
    paginate(&db, &params, &filter).await
}

async fn my_properties(
    State(db): State<Db>,
    headers: HeaderMap,
    Query(params): Query<ListingParams>,
) -> Result<Json<Value>, ApiFailure> {
    let user = authenticate(&db, &headers).await?;
    match params.user_id.as_deref() {
        None => Err(ApiFailure::new(StatusCode::BAD_REQUEST, "userId is required")),
        Some(id) if id != user.id => Err(ApiFailure::new(
            StatusCode::FORBIDDEN,
            "You can only list your own properties",
        )),
        Some(id) => {
            let filter = PropertyFilter {
                owner: Some(id.to_string()),
                ..Default::default()
            };
            paginate(&db, &params, &filter).await
        }
    }
}

async fn me(State(db): State<Db>, headers: HeaderMap) -> Result<Json<Value>, ApiFailure> {
    let user = authenticate(&db, &headers).await?;
    Ok(success(json!(user)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_envelope_shape() {
        let failure = ApiFailure::new(StatusCode::BAD_REQUEST, "Invalid page");
        assert_eq!(failure.status, StatusCode::BAD_REQUEST);
        assert_eq!(failure.message, "Invalid page");
    }

    #[test]
    fn listing_params_accept_camel_case() {
        let params: ListingParams =
            serde_json::from_str(r#"{"searchString":"dha","minPrice":100,"userId":"u1"}"#).unwrap();
        assert_eq!(params.search_string.as_deref(), Some("dha"));
        assert_eq!(params.min_price, Some(100));
        assert_eq!(params.filter().owner.as_deref(), Some("u1"));
    }

    #[test]
    fn listing_params_all_optional() {
        let params: ListingParams = serde_json::from_str("{}").unwrap();
        assert!(params.page.is_none());
        assert!(params.filter().search.is_none());
    }
}
