use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::criteria::SearchCriteria;
use crate::marketplace::directory::UserId;

/// Identifier wrapper for saved searches.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SavedSearchId(pub String);

/// A persisted filter owned by a premium tenant. `last_notified_at` records
/// the most recent dispatched alert and, once set, never moves backwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedSearch {
    pub id: SavedSearchId,
    pub owner: UserId,
    pub name: String,
    pub criteria: SearchCriteria,
    pub is_active: bool,
    pub last_notified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl SavedSearch {
    pub fn view(&self) -> SavedSearchView {
        SavedSearchView {
            id: self.id.clone(),
            name: self.name.clone(),
            criteria: self.criteria.clone(),
            is_active: self.is_active,
            last_notified_at: self.last_notified_at,
        }
    }
}

/// Sanitized representation returned by the HTTP surface; the owner id stays
/// internal.
#[derive(Debug, Clone, Serialize)]
pub struct SavedSearchView {
    pub id: SavedSearchId,
    pub name: String,
    pub criteria: SearchCriteria,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_notified_at: Option<DateTime<Utc>>,
}
