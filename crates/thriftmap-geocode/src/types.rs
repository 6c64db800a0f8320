//! Nominatim search API response types.

use serde::Deserialize;

use thriftmap_core::Coordinates;

/// One match from Nominatim's `/search?format=json` endpoint.
///
/// Nominatim serializes coordinates as decimal *strings*, not numbers, so
/// the fields stay `String` here and are validated by
/// [`NominatimPlace::coordinates`].
#[derive(Debug, Deserialize)]
pub struct NominatimPlace {
    pub lat: String,
    pub lon: String,
}

impl NominatimPlace {
    /// Parses the string coordinates into a [`Coordinates`] value, or `None`
    /// when either field is not a valid decimal number.
    #[must_use]
    pub fn coordinates(&self) -> Option<Coordinates> {
        let latitude = self.lat.trim().parse::<f64>().ok()?;
        let longitude = self.lon.trim().parse::<f64>().ok()?;
        Some(Coordinates::new(latitude, longitude))
    }
}
