use serde::{Deserialize, Serialize};

use crate::marketplace::listings::domain::{Amenity, AmenitySet, Listing};

/// Structured listing predicate stored on a saved search.
///
/// Every field defaults to "no constraint", so a default criteria matches any
/// listing. Wire input arrives as a [`CriteriaForm`] and is normalized into
/// this shape once, when the search is created; match passes consume it
/// as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCriteria {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_rent: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_rent: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_bedrooms: Option<u8>,
    #[serde(default)]
    pub amenities: AmenitySet,
}

impl SearchCriteria {
    /// Evaluate the predicate against a listing snapshot.
    ///
    /// Clauses short-circuit in a fixed order: location, rent lower bound,
    /// rent upper bound, bedrooms, amenities. Rent and bedroom bounds are
    /// inclusive; location is a case-insensitive substring check.
    pub fn matches(&self, listing: &Listing) -> bool {
        if let Some(location) = &self.location {
            let haystack = listing.location.to_lowercase();
            if !haystack.contains(&location.to_lowercase()) {
                return false;
            }
        }

        if let Some(min_rent) = self.min_rent {
            if listing.monthly_rent < min_rent {
                return false;
            }
        }

        if let Some(max_rent) = self.max_rent {
            if listing.monthly_rent > max_rent {
                return false;
            }
        }

        if let Some(min_bedrooms) = self.min_bedrooms {
            if listing.bedrooms < min_bedrooms {
                return false;
            }
        }

        // Only requested amenities constrain; a listing is never rejected
        // for having extras.
        for amenity in Amenity::ALL {
            if self.amenities.get(amenity) && !listing.amenities.get(amenity) {
                return false;
            }
        }

        true
    }

    /// True when no clause constrains matching.
    pub fn is_unconstrained(&self) -> bool {
        self.location.is_none()
            && self.min_rent.is_none()
            && self.max_rent.is_none()
            && self.min_bedrooms.is_none()
            && self.amenities == AmenitySet::default()
    }
}

/// Loosely-typed criteria payload accepted at saved-search creation.
///
/// Clients treat zero, absent, and malformed numeric fields as "no
/// constraint", so the numeric fields here tolerate junk instead of failing
/// the request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CriteriaForm {
    pub location: String,
    #[serde(deserialize_with = "lenient_u32")]
    pub min_rent: u32,
    #[serde(deserialize_with = "lenient_u32")]
    pub max_rent: u32,
    #[serde(deserialize_with = "lenient_u8")]
    pub min_bedrooms: u8,
    pub amenities: AmenitySet,
}

impl CriteriaForm {
    /// Normalize into the structured predicate: a blank location and zero
    /// bounds become unconstrained.
    pub fn normalize(self) -> SearchCriteria {
        let location = {
            let trimmed = self.location.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        };

        SearchCriteria {
            location,
            min_rent: (self.min_rent > 0).then_some(self.min_rent),
            max_rent: (self.max_rent > 0).then_some(self.max_rent),
            min_bedrooms: (self.min_bedrooms > 0).then_some(self.min_bedrooms),
            amenities: self.amenities,
        }
    }
}

fn coerce_u64(value: &serde_json::Value) -> u64 {
    match value {
        serde_json::Value::Number(number) => number.as_u64().unwrap_or_else(|| {
            number
                .as_f64()
                .filter(|n| n.is_finite() && *n > 0.0)
                .map(|n| n as u64)
                .unwrap_or(0)
        }),
        serde_json::Value::String(raw) => raw.trim().parse::<u64>().unwrap_or(0),
        _ => 0,
    }
}

fn lenient_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(u32::try_from(coerce_u64(&value)).unwrap_or(u32::MAX))
}

fn lenient_u8<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(u8::try_from(coerce_u64(&value)).unwrap_or(u8::MAX))
}
