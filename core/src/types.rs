//! Wire DTOs for the listings backend.
//!
//! # Design
//! Defined independently from the mock-server crate; the integration tests
//! catch schema drift. `Listing` is deliberately opaque: only `_id` is
//! interpreted, every other field is carried through untouched for the host
//! to render.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A property listing as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Listing {
    /// Convenience accessor for a string field, used by tests and logging.
    pub fn field_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub total_pages: u32,
}

/// The `data` payload of every listings endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingsPage {
    pub properties: Vec<Listing>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

/// Uniform response envelope: `{ success, data, error? }`.
///
/// `data` stays a raw `Value` until `success` has been checked, because
/// failed responses put arbitrary shapes there.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    pub success: bool,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub error: Option<ErrorBody>,
}

/// The signed-in user, from `GET /users/me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub verification_status: String,
}

impl UserProfile {
    pub fn is_verified(&self) -> bool {
        self.verification_status.eq_ignore_ascii_case("verified")
    }

    /// Posting a listing is only offered to verified accounts.
    pub fn can_create_listings(&self) -> bool {
        self.is_verified()
    }
}
