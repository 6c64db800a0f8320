//! Domain types for the store discovery and enrichment pipeline.
//!
//! The output schema is consumed positionally by the map UI, so every field
//! of [`StoreRecord`] is always populated — unknown values are filled with
//! the sentinel strings below rather than left optional.

use serde::{Deserialize, Serialize};

/// Sentinel address for businesses whose detail lookup yielded nothing.
pub const ADDRESS_NOT_FOUND: &str = "Address not found";

/// Sentinel website for businesses whose detail lookup yielded nothing.
pub const WEBSITE_NOT_FOUND: &str = "Website not found";

/// Sentinel phone number for candidates the search API returned without one.
pub const PHONE_NOT_PROVIDED: &str = "Not provided";

/// Immutable input for one pipeline run: what to search for, and where.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Business category or keyword (e.g., `"Secondhand Stores"`).
    pub description: String,
    /// Free-text city name (e.g., `"Malmö"`).
    pub location: String,
}

impl SearchQuery {
    #[must_use]
    pub fn new(description: &str, location: &str) -> Self {
        Self {
            description: description.to_owned(),
            location: location.to_owned(),
        }
    }
}

/// A business returned by the initial location search, pending enrichment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateResult {
    /// Display name from the search result.
    pub title: String,
    /// Link to the business's listing page.
    pub yelp_page: String,
    /// Phone number, when the search result carried one.
    pub phone: Option<String>,
    /// Place identifier for the detail lookup. Absent when the search result
    /// carried no place IDs; enrichment must not attempt a detail call then.
    pub place_id: Option<String>,
}

/// Canonical postal address and website for a business.
///
/// Both fields are always populated: absent upstream values resolve to
/// [`ADDRESS_NOT_FOUND`] / [`WEBSITE_NOT_FOUND`] so consumers can render
/// unconditionally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessDetails {
    pub address: String,
    pub website: String,
}

impl BusinessDetails {
    /// Details for a business that could not be resolved.
    #[must_use]
    pub fn unresolved() -> Self {
        Self {
            address: ADDRESS_NOT_FOUND.to_owned(),
            website: WEBSITE_NOT_FOUND.to_owned(),
        }
    }

    /// Builds details from optional upstream fields, substituting sentinels
    /// for anything absent.
    #[must_use]
    pub fn from_parts(address: Option<String>, website: Option<String>) -> Self {
        Self {
            address: address.unwrap_or_else(|| ADDRESS_NOT_FOUND.to_owned()),
            website: website.unwrap_or_else(|| WEBSITE_NOT_FOUND.to_owned()),
        }
    }

    /// Returns `true` when the address is the unresolved sentinel.
    #[must_use]
    pub fn address_is_unresolved(&self) -> bool {
        self.address == ADDRESS_NOT_FOUND
    }
}

/// Geographic coordinates of a store.
///
/// `(0.0, 0.0)` is the wire-compatible "unresolved" sentinel, kept for the
/// existing map UI. Use [`Coordinates::is_unresolved`] rather than comparing
/// floats at call sites.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Sentinel for an address that could not be geocoded.
    pub const UNRESOLVED: Self = Self {
        latitude: 0.0,
        longitude: 0.0,
    };

    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Returns `true` when these coordinates are the unresolved sentinel.
    /// Consumers must treat the sentinel as "unknown", not a real location.
    #[must_use]
    pub fn is_unresolved(&self) -> bool {
        self.latitude == 0.0 && self.longitude == 0.0
    }
}

/// The ordered output of one pipeline run: one record per search candidate,
/// in the search's original order.
pub type EnrichedCollection = Vec<StoreRecord>;

/// One fully enriched store, ready for persistence.
///
/// Field order is the output contract: the map UI indexes fields
/// positionally, so serialization must emit exactly this order —
/// `name, address, latitude, longitude, website, yelp_page, phone`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreRecord {
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub website: String,
    pub yelp_page: String,
    pub phone: String,
}

impl StoreRecord {
    /// Assembles a record from a search candidate and its resolved
    /// enrichment data. Every field ends up populated: the phone falls back
    /// to [`PHONE_NOT_PROVIDED`], and `details`/`coordinates` carry their
    /// own sentinels when unresolved.
    #[must_use]
    pub fn assemble(
        candidate: &CandidateResult,
        details: BusinessDetails,
        coordinates: Coordinates,
    ) -> Self {
        Self {
            name: candidate.title.clone(),
            address: details.address,
            latitude: coordinates.latitude,
            longitude: coordinates.longitude,
            website: details.website,
            yelp_page: candidate.yelp_page.clone(),
            phone: candidate
                .phone
                .clone()
                .unwrap_or_else(|| PHONE_NOT_PROVIDED.to_owned()),
        }
    }
}
