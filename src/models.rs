use crate::error::LookupError;
use crate::language::LanguageCode;
use serde::Deserialize;
use std::fmt;

/// A point picked on the map, in decimal degrees (WGS84).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, LookupError> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);
        if !valid {
            return Err(LookupError::InvalidCoordinate {
                lat: latitude,
                lon: longitude,
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Builds a coordinate from cursor arithmetic: latitude is clamped at the
    /// poles, longitude wraps around the antimeridian.
    pub fn clamped(latitude: f64, longitude: f64) -> Self {
        let latitude = latitude.clamp(-90.0, 90.0);
        let mut longitude = longitude;
        if longitude > 180.0 || longitude < -180.0 {
            longitude = (longitude + 180.0).rem_euclid(360.0) - 180.0;
        }
        Self {
            latitude,
            longitude,
        }
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Location key for the nearby-cities lookup: three decimals each, with an
    /// explicit `+` in front of a non-negative longitude (`12.345+67.890`).
    pub fn nearby_key(&self) -> String {
        let lat = fixed3(self.latitude);
        if self.longitude >= 0.0 {
            format!("{}+{}", lat, fixed3(self.longitude))
        } else {
            format!("{}{}", lat, fixed3(self.longitude))
        }
    }
}

// Negative zero would otherwise render as "-0.000".
fn fixed3(value: f64) -> String {
    let value = if value == 0.0 { 0.0 } else { value };
    format!("{:.3}", value)
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ns = if self.latitude >= 0.0 { 'N' } else { 'S' };
        let ew = if self.longitude >= 0.0 { 'E' } else { 'W' };
        write!(
            f,
            "{:.4}°{} {:.4}°{}",
            self.latitude.abs(),
            ns,
            self.longitude.abs(),
            ew
        )
    }
}

/// Human-readable name of the place nearest to a coordinate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaceName {
    Named(String),
    /// Both geocoding sources came up empty. Still a valid resolution.
    Unknown,
}

impl PlaceName {
    pub const UNKNOWN_LABEL: &'static str = "Unknown location";

    pub fn as_str(&self) -> &str {
        match self {
            PlaceName::Named(name) => name,
            PlaceName::Unknown => Self::UNKNOWN_LABEL,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, PlaceName::Unknown)
    }
}

impl fmt::Display for PlaceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Nominatim /reverse

#[derive(Debug, Deserialize)]
pub struct ReverseResponse {
    pub address: Option<Address>,
    /// Set instead of `address` when nothing is there (e.g. open ocean).
    pub error: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Address {
    pub city: Option<String>,
    pub town: Option<String>,
    pub village: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}

impl Address {
    /// First non-blank field in order city, town, village, state, country.
    pub fn best_name(&self) -> Option<&str> {
        [
            &self.city,
            &self.town,
            &self.village,
            &self.state,
            &self.country,
        ]
        .into_iter()
        .filter_map(|field| field.as_deref())
        .map(str::trim)
        .find(|name| !name.is_empty())
    }
}

// GeoDB nearbyCities

#[derive(Debug, Default, Deserialize)]
pub struct NearbyCitiesResponse {
    #[serde(default)]
    pub data: Vec<NearbyCity>,
}

#[derive(Debug, Deserialize)]
pub struct NearbyCity {
    pub city: Option<String>,
    pub country: Option<String>,
    pub distance: Option<f64>,
}

impl NearbyCitiesResponse {
    /// City names in the order the service ranked them, blanks skipped.
    pub fn candidates(self) -> impl Iterator<Item = String> {
        self.data
            .into_iter()
            .filter_map(|c| c.city)
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
    }
}

// REST page summary

#[derive(Debug, Deserialize)]
pub struct SummaryResponse {
    pub title: Option<String>,
    pub extract: Option<String>,
    pub description: Option<String>,
    pub content_urls: Option<ContentUrls>,
}

#[derive(Debug, Deserialize)]
pub struct ContentUrls {
    pub desktop: Option<PageUrl>,
}

#[derive(Debug, Deserialize)]
pub struct PageUrl {
    pub page: Option<String>,
}

/// A localized article summary ready for display.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub title: String,
    pub extract: String,
    pub description: Option<String>,
    pub article_url: String,
    pub language: LanguageCode,
}

impl Summary {
    /// Converts a service response, or returns `None` when the extract is
    /// empty, i.e. there is no article in that language.
    pub fn from_response(resp: SummaryResponse, place: &PlaceName, language: LanguageCode) -> Option<Self> {
        let extract = resp.extract.map(|e| e.trim().to_string()).filter(|e| !e.is_empty())?;
        let article_url = resp
            .content_urls
            .and_then(|urls| urls.desktop)
            .and_then(|desktop| desktop.page)
            .unwrap_or_default();

        Some(Self {
            title: resp
                .title
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| place.to_string()),
            extract,
            description: resp.description.filter(|d| !d.trim().is_empty()),
            article_url,
            language,
        })
    }

    /// The extract cut at `max_chars` characters, with `...` appended when cut.
    pub fn excerpt(&self, max_chars: usize) -> String {
        match self.extract.char_indices().nth(max_chars) {
            Some((byte_idx, _)) => format!("{}...", &self.extract[..byte_idx]),
            None => self.extract.clone(),
        }
    }
}
