use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEMO_TOKEN_VERIFIED: &str = "demo-token-verified";
pub const DEMO_TOKEN_PENDING: &str = "demo-token-pending";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub description: String,
    pub property_type: String,
    pub listing_type: String,
    pub phase: String,
    pub block: String,
    pub area: String,
    pub price: i64,
    pub owner: String,
}

/// Everything but the server-assigned id.
#[derive(Clone, Debug)]
pub struct PropertyDraft {
    pub title: String,
    pub description: String,
    pub property_type: String,
    pub listing_type: String,
    pub phase: String,
    pub block: String,
    pub area: String,
    pub price: i64,
    pub owner: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub verification_status: String,
}

/// Filters shared by every listings endpoint; `None` means "any".
#[derive(Clone, Debug, Default)]
pub struct PropertyFilter {
    pub search: Option<String>,
    pub property_type: Option<String>,
    pub listing_type: Option<String>,
    pub phase: Option<String>,
    pub block: Option<String>,
    pub area: Option<String>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub owner: Option<String>,
}

fn same(expected: &Option<String>, actual: &str) -> bool {
    expected
        .as_deref()
        .map_or(true, |e| e.eq_ignore_ascii_case(actual))
}

impl PropertyFilter {
    pub fn matches(&self, p: &Property) -> bool {
        let text_ok = self.search.as_deref().map_or(true, |needle| {
            let needle = needle.to_lowercase();
            [&p.title, &p.description, &p.area, &p.block]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
        });
        text_ok
            && same(&self.property_type, &p.property_type)
            && same(&self.listing_type, &p.listing_type)
            && same(&self.phase, &p.phase)
            && same(&self.block, &p.block)
            && same(&self.area, &p.area)
            && self.min_price.map_or(true, |min| p.price >= min)
            && self.max_price.map_or(true, |max| p.price <= max)
            && self.owner.as_deref().map_or(true, |o| o == p.owner)
    }
}

#[derive(Debug, Default)]
pub struct Store {
    properties: Vec<Property>,
    users: HashMap<String, User>,
    sessions: HashMap<String, String>,
}

impl Store {
    /// Register `user` and let `token` authenticate as them.
    pub fn insert_user(&mut self, user: User, token: &str) {
        self.sessions.insert(token.to_string(), user.id.clone());
        self.users.insert(user.id.clone(), user);
    }

    pub fn insert_property(&mut self, draft: PropertyDraft) -> Property {
        let property = Property {
            id: Uuid::new_v4().simple().to_string(),
            title: draft.title,
            description: draft.description,
            property_type: draft.property_type,
            listing_type: draft.listing_type,
            phase: draft.phase,
            block: draft.block,
            area: draft.area,
            price: draft.price,
            owner: draft.owner,
        };
        self.properties.push(property.clone());
        property
    }

    pub fn user_for_token(&self, token: &str) -> Option<&User> {
        self.sessions.get(token).and_then(|id| self.users.get(id))
    }

    pub fn filtered(&self, filter: &PropertyFilter) -> Vec<&Property> {
        self.properties.iter().filter(|p| filter.matches(p)).collect()
    }

    /// Two users and a spread of listings across every tab and filter.
    pub fn seeded() -> Self {
        let mut store = Store::default();
        store.insert_user(
            User {
                id: "user-verified".to_string(),
                name: "Ayesha Khan".to_string(),
                email: "ayesha@example.com".to_string(),
                verification_status: "verified".to_string(),
            },
            DEMO_TOKEN_VERIFIED,
        );
        store.insert_user(
            User {
                id: "user-pending".to_string(),
                name: "Bilal Ahmed".to_string(),
                email: "bilal@example.com".to_string(),
                verification_status: "pending".to_string(),
            },
            DEMO_TOKEN_PENDING,
        );

        let types = ["plot", "house", "commercial plot"];
        let listing_types = ["cash", "installments"];
        let areas = ["5 Marla", "10 Marla", "1 Kanal"];
        for i in 0..30i64 {
            let idx = i as usize;
            let property_type = types[idx % types.len()];
            let area = areas[idx % areas.len()];
            let phase = (idx % 4 + 5).to_string();
            let block = ["A", "B", "C"][idx % 3].to_string();
            let owner = if i % 5 == 0 { "user-pending" } else { "user-verified" };
            store.insert_property(PropertyDraft {
                title: format!("{area} {property_type} in Phase {phase}"),
                description: format!("Listing #{i}, block {block}"),
                property_type: property_type.to_string(),
                listing_type: listing_types[idx % listing_types.len()].to_string(),
                phase,
                block,
                area: area.to_string(),
                price: 1_500_000 + i * 250_000,
                owner: owner.to_string(),
            });
        }
        store
    }
}
