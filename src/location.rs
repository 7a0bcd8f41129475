//! Starting position of the map crosshair.
//!
//! This module provides a single public function, [`locate_home`], which
//! returns the coordinate the cursor starts on. With `map.auto_locate` set it
//! asks IP geolocation (IpApi) where the user is; otherwise, or when that
//! lookup fails, it uses the configured start coordinates.

use crate::config::MapConfig;
use crate::models::Coordinate;
use ipgeolocate::{Locator, Service};
use tracing::{error, info, warn};

/// Resolves the initial crosshair position.
///
/// # Returns
///
/// A [`Coordinate`] in decimal degrees (WGS84). On network or service
/// failure the configured `start_lat`/`start_lon` pair is returned instead,
/// clamped into range.
///
/// # Panics
///
/// Does not panic. Unparseable or out-of-range latitude/longitude in the
/// response fall back to the configured start as well.
pub async fn locate_home(config: &MapConfig) -> Coordinate {
    let fallback = Coordinate::clamped(config.start_lat, config.start_lon);
    if !config.auto_locate {
        return fallback;
    }

    // An empty IP asks the service about the caller's own address.
    let ip = config.home_ip.as_deref().unwrap_or("");
    match Locator::get(ip, Service::IpApi).await {
        Ok(loc) => match (loc.latitude.parse::<f64>(), loc.longitude.parse::<f64>()) {
            (Ok(lat), Ok(lon)) => match Coordinate::new(lat, lon) {
                Ok(home) => {
                    info!("Geolocation successful - {} ({})", home, loc.city);
                    home
                }
                Err(e) => {
                    warn!("Geolocation returned {}. Using configured start.", e);
                    fallback
                }
            },
            _ => {
                warn!(
                    "Unparseable geolocation ({:?}, {:?}). Using configured start.",
                    loc.latitude, loc.longitude
                );
                fallback
            }
        },
        Err(e) => {
            error!(
                "Error using geolocation service: {}. Using configured start {}.",
                e, fallback
            );
            fallback
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn manual_start_skips_lookup() {
        let config = MapConfig {
            auto_locate: false,
            start_lat: 48.8566,
            start_lon: 2.3522,
            ..Default::default()
        };
        let home = locate_home(&config).await;
        assert_eq!(home, Coordinate::new(48.8566, 2.3522).unwrap());
    }

    #[tokio::test]
    async fn out_of_range_start_is_clamped() {
        let config = MapConfig {
            auto_locate: false,
            start_lat: 120.0,
            start_lon: 0.0,
            ..Default::default()
        };
        assert_eq!(locate_home(&config).await.latitude(), 90.0);
    }
}
