use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::marketplace::directory::UserId;

/// Identifier wrapper for published listings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListingId(pub String);

/// The fixed amenity flags shared by listings and search criteria.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmenitySet {
    pub solar: bool,
    pub borehole: bool,
    pub security: bool,
    pub parking: bool,
    pub internet: bool,
}

/// Amenity keys, used for iteration and display labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Amenity {
    Solar,
    Borehole,
    Security,
    Parking,
    Internet,
}

impl Amenity {
    pub const ALL: [Amenity; 5] = [
        Amenity::Solar,
        Amenity::Borehole,
        Amenity::Security,
        Amenity::Parking,
        Amenity::Internet,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Amenity::Solar => "solar",
            Amenity::Borehole => "borehole",
            Amenity::Security => "security",
            Amenity::Parking => "parking",
            Amenity::Internet => "internet",
        }
    }
}

impl AmenitySet {
    pub const fn get(&self, amenity: Amenity) -> bool {
        match amenity {
            Amenity::Solar => self.solar,
            Amenity::Borehole => self.borehole,
            Amenity::Security => self.security,
            Amenity::Parking => self.parking,
            Amenity::Internet => self.internet,
        }
    }

    pub fn set(&mut self, amenity: Amenity, value: bool) {
        match amenity {
            Amenity::Solar => self.solar = value,
            Amenity::Borehole => self.borehole = value,
            Amenity::Security => self.security = value,
            Amenity::Parking => self.parking = value,
            Amenity::Internet => self.internet = value,
        }
    }

    /// Amenities flagged on, in declaration order.
    pub fn enabled(&self) -> impl Iterator<Item = Amenity> + '_ {
        Amenity::ALL.into_iter().filter(|amenity| self.get(*amenity))
    }
}

/// Published listing snapshot. Immutable as far as the alert pipeline is
/// concerned; only the listing-management surface may change it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    pub id: ListingId,
    pub landlord: UserId,
    pub name: String,
    pub location: String,
    pub monthly_rent: u32,
    pub bedrooms: u8,
    pub amenities: AmenitySet,
    pub created_at: DateTime<Utc>,
}

/// Intake payload for a new listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingDraft {
    pub landlord: UserId,
    pub name: String,
    pub location: String,
    pub monthly_rent: u32,
    #[serde(default)]
    pub bedrooms: u8,
    #[serde(default)]
    pub amenities: AmenitySet,
}
