use crate::language::LanguageCode;
use serde::{Deserialize, Serialize};
use std::fs;
use tracing::{info, warn};

const CONFIG_PATH: &str = "config.toml";

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub services: ServiceConfig,
    pub language: LanguageConfig,
    pub map: MapConfig,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ServiceConfig {
    pub nominatim_url: String,  // Primary reverse geocoder
    pub geodb_url: String,      // Secondary nearby-city lookup
    pub summary_url: String,    // `{lang}` is replaced with the language code
    pub user_agent: String,
    pub request_timeout_secs: u64,
    pub reverse_zoom: u8,       // 10 = city granularity
    pub nearby_radius: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct LanguageConfig {
    pub initial: LanguageCode,
    pub max_extract_chars: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct MapConfig {
    pub auto_locate: bool,       // Center the cursor via IP geolocation if true
    pub home_ip: Option<String>, // IP to geolocate; empty means our own
    pub start_lat: f64,          // Used if auto_locate is false or fails
    pub start_lon: f64,
    pub cursor_step: f64,        // Degrees per arrow key press
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            nominatim_url: "https://nominatim.openstreetmap.org".to_string(),
            geodb_url: "https://geodb-free-service.wirefreethought.com".to_string(),
            summary_url: "https://{lang}.wikipedia.org/api/rest_v1/page/summary".to_string(),
            user_agent: concat!("WikiLoc/", env!("CARGO_PKG_VERSION")).to_string(),
            request_timeout_secs: 8,
            reverse_zoom: 10,
            nearby_radius: 50,
        }
    }
}

impl Default for LanguageConfig {
    fn default() -> Self {
        Self {
            initial: LanguageCode::default(),
            max_extract_chars: 1500,
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            auto_locate: false,
            home_ip: None,
            start_lat: 20.0,
            start_lon: 0.0,
            cursor_step: 5.0,
        }
    }
}

impl Config {
    /// Loads config.toml from the working directory.
    /// If it doesn't exist, writes the defaults there first.
    pub fn load() -> Self {
        match fs::read_to_string(CONFIG_PATH) {
            Ok(content) => match Self::from_toml(&content) {
                Ok(config) => return config,
                Err(e) => {
                    warn!("Failed to parse {}: {}. Using defaults.", CONFIG_PATH, e);
                    return Self::default();
                }
            },
            Err(e) => info!("No {} found ({}), creating one.", CONFIG_PATH, e),
        }

        let default_config = Self::default();

        // Save default config to disk for the user to edit later
        match toml::to_string_pretty(&default_config) {
            Ok(toml_string) => {
                if fs::write(CONFIG_PATH, toml_string).is_err() {
                    warn!("Could not write default {} to disk.", CONFIG_PATH);
                }
            }
            Err(e) => warn!("Could not serialize default config: {}", e),
        }

        info!("Loaded default configuration.");
        default_config
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.services.reverse_zoom, 10);
        assert_eq!(config.services.nearby_radius, 50);
        assert_eq!(config.language.initial.code(), "en");
        assert_eq!(config.language.max_extract_chars, 1500);
        assert!(!config.map.auto_locate);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = Config::from_toml(
            r#"
            [services]
            request_timeout_secs = 3

            [language]
            initial = "hi"
            "#,
        )
        .unwrap();
        assert_eq!(config.services.request_timeout_secs, 3);
        assert_eq!(config.services.nominatim_url, "https://nominatim.openstreetmap.org");
        assert_eq!(config.language.initial.code(), "hi");
        assert_eq!(config.map.cursor_step, 5.0);
    }

    #[test]
    fn defaults_round_trip_through_toml() {
        let text = toml::to_string_pretty(&Config::default()).unwrap();
        let back = Config::from_toml(&text).unwrap();
        assert_eq!(back.services.summary_url, Config::default().services.summary_url);
        assert_eq!(back.language.initial, LanguageCode::default());
    }
}
