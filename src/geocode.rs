//! Coordinate to place-name resolution.
//!
//! [`GeocodeResolver::resolve`] always yields a [`PlaceName`]: the primary
//! reverse geocoder is asked first, the nearby-cities lookup second, and if
//! both come up empty the result is [`PlaceName::Unknown`]. Failures are
//! logged here and never reach the caller.

use crate::api::{NearbyCities, ReverseGeocoder};
use crate::error::{LookupError, LookupResult};
use crate::models::{Coordinate, PlaceName};
use tracing::{info, warn};

#[derive(Clone)]
pub struct GeocodeResolver {
    primary: ReverseGeocoder,
    secondary: NearbyCities,
}

impl GeocodeResolver {
    pub fn new(primary: ReverseGeocoder, secondary: NearbyCities) -> Self {
        Self { primary, secondary }
    }

    pub async fn resolve(&self, at: Coordinate) -> PlaceName {
        match self.try_resolve(at).await {
            Ok(name) => PlaceName::Named(name),
            Err(e) => {
                warn!("Could not name {}: {}", at, e);
                PlaceName::Unknown
            }
        }
    }

    async fn try_resolve(&self, at: Coordinate) -> LookupResult<String> {
        match self.primary.place_name(at).await {
            Ok(name) => {
                info!("Reverse geocoder named {} as {:?}", at, name);
                return Ok(name);
            }
            Err(e) => warn!("Reverse geocoder failed for {}: {}. Trying nearby cities.", at, e),
        }

        match self.secondary.nearest_city(at).await {
            Ok(name) => {
                info!("Nearby-city lookup named {} as {:?}", at, name);
                Ok(name)
            }
            Err(e) => {
                warn!("Nearby-city lookup failed for {} (key {}): {}", at, at.nearby_key(), e);
                Err(LookupError::Unresolvable)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::build_client;
    use crate::config::ServiceConfig;
    use mockito::{Matcher, Server, ServerGuard};
    use std::io::Write;
    use std::time::{Duration, Instant};

    fn resolver_for(server: &ServerGuard) -> GeocodeResolver {
        let config = ServiceConfig {
            nominatim_url: server.url(),
            geodb_url: server.url(),
            request_timeout_secs: 2,
            ..Default::default()
        };
        let client = build_client(&config).unwrap();
        GeocodeResolver::new(
            ReverseGeocoder::new(client.clone(), &config),
            NearbyCities::new(client, &config),
        )
    }

    #[tokio::test]
    async fn primary_hit_skips_secondary() {
        let mut server = Server::new_async().await;
        let primary = server
            .mock("GET", "/reverse")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"address":{"town":"Keswick","country":"United Kingdom"}}"#)
            .create_async()
            .await;
        let secondary = server
            .mock("GET", Matcher::Regex("^/v1/geo/locations/.*".into()))
            .match_query(Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let place = resolver_for(&server)
            .resolve(Coordinate::new(54.6, -3.13).unwrap())
            .await;

        assert_eq!(place, PlaceName::Named("Keswick".into()));
        primary.assert_async().await;
        secondary.assert_async().await;
    }

    #[tokio::test]
    async fn primary_failure_falls_back_to_nearby_city() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/reverse")
            .match_query(Matcher::Any)
            .with_status(500)
            .create_async()
            .await;
        let secondary = server
            .mock("GET", "/v1/geo/locations/-1.286+36.817/nearbyCities")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"data":[{"city":"Nairobi","country":"Kenya"}]}"#)
            .expect(1)
            .create_async()
            .await;

        let place = resolver_for(&server)
            .resolve(Coordinate::new(-1.2864, 36.8172).unwrap())
            .await;

        assert_eq!(place, PlaceName::Named("Nairobi".into()));
        secondary.assert_async().await;
    }

    #[tokio::test]
    async fn empty_address_counts_as_primary_failure() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/reverse")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"address":{"road":"A1"}}"#)
            .create_async()
            .await;
        let secondary = server
            .mock("GET", "/v1/geo/locations/10.000-20.000/nearbyCities")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"data":[{"city":"Fallbackville"}]}"#)
            .create_async()
            .await;

        let place = resolver_for(&server)
            .resolve(Coordinate::new(10.0, -20.0).unwrap())
            .await;

        assert_eq!(place.as_str(), "Fallbackville");
        secondary.assert_async().await;
    }

    #[tokio::test]
    async fn ocean_resolves_to_unknown() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/reverse")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"error":"Unable to geocode"}"#)
            .create_async()
            .await;
        let secondary = server
            .mock("GET", "/v1/geo/locations/0.000+0.000/nearbyCities")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"data":[]}"#)
            .create_async()
            .await;

        let place = resolver_for(&server)
            .resolve(Coordinate::new(0.0, 0.0).unwrap())
            .await;

        assert_eq!(place, PlaceName::Unknown);
        assert_eq!(place.to_string(), "Unknown location");
        secondary.assert_async().await;
    }

    #[tokio::test]
    async fn unreachable_services_resolve_to_unknown() {
        let config = ServiceConfig {
            // Nothing listens on port 9 locally; both requests fail to connect.
            nominatim_url: "http://127.0.0.1:9".into(),
            geodb_url: "http://127.0.0.1:9".into(),
            request_timeout_secs: 1,
            ..Default::default()
        };
        let client = build_client(&config).unwrap();
        let resolver = GeocodeResolver::new(
            ReverseGeocoder::new(client.clone(), &config),
            NearbyCities::new(client, &config),
        );

        let place = resolver.resolve(Coordinate::new(48.85, 2.35).unwrap()).await;
        assert!(place.is_unknown());
    }

    #[tokio::test]
    async fn stalled_services_time_out_to_unknown() {
        let mut server = Server::new_async().await;
        for path in [Matcher::Exact("/reverse".into()), Matcher::Regex("^/v1/".into())] {
            server
                .mock("GET", path)
                .match_query(Matcher::Any)
                .with_status(200)
                .with_chunked_body(|w| {
                    std::thread::sleep(Duration::from_secs(3));
                    w.write_all(br#"{"address":{"city":"Too late"}}"#)
                })
                .create_async()
                .await;
        }
        let config = ServiceConfig {
            nominatim_url: server.url(),
            geodb_url: server.url(),
            request_timeout_secs: 1,
            ..Default::default()
        };
        let client = build_client(&config).unwrap();
        let resolver = GeocodeResolver::new(
            ReverseGeocoder::new(client.clone(), &config),
            NearbyCities::new(client, &config),
        );

        let started = Instant::now();
        let place = resolver.resolve(Coordinate::new(48.85, 2.35).unwrap()).await;

        assert_eq!(place, PlaceName::Unknown);
        assert!(started.elapsed() < Duration::from_secs(6), "took {:?}", started.elapsed());
    }
}
