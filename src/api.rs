//! HTTP clients for the three external services: the primary reverse
//! geocoder, the secondary nearby-city lookup and the per-language summary
//! endpoint. All of them share one `reqwest::Client` with a bounded timeout.

use crate::config::ServiceConfig;
use crate::error::{LookupError, LookupResult};
use crate::language::LanguageCode;
use crate::models::{Coordinate, NearbyCitiesResponse, PlaceName, ReverseResponse, Summary, SummaryResponse};
use reqwest::{Client, Response};
use std::time::Duration;
use tracing::debug;

/// Builds the shared client every provider talks through.
pub fn build_client(config: &ServiceConfig) -> LookupResult<Client> {
    let client = Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .user_agent(config.user_agent.as_str())
        .build()?;
    Ok(client)
}

fn check_status(res: Response) -> LookupResult<Response> {
    let status = res.status();
    if status.is_success() {
        Ok(res)
    } else {
        Err(LookupError::Status(status))
    }
}

/// Primary source: Nominatim reverse geocoding.
#[derive(Clone)]
pub struct ReverseGeocoder {
    client: Client,
    base_url: String,
    zoom: u8,
}

impl ReverseGeocoder {
    pub fn new(client: Client, config: &ServiceConfig) -> Self {
        Self {
            client,
            base_url: config.nominatim_url.trim_end_matches('/').to_string(),
            zoom: config.reverse_zoom,
        }
    }

    /// Name of the settlement or region at `at`, by address priority.
    pub async fn place_name(&self, at: Coordinate) -> LookupResult<String> {
        let url = format!("{}/reverse", self.base_url);
        debug!("Reverse geocoding {} via {}", at, url);

        let res = self
            .client
            .get(url)
            .query(&[
                ("lat", at.latitude().to_string()),
                ("lon", at.longitude().to_string()),
                ("format", "json".to_string()),
                ("zoom", self.zoom.to_string()),
            ])
            .send()
            .await?;
        let body = check_status(res)?.json::<ReverseResponse>().await?;

        if let Some(reason) = &body.error {
            debug!("Reverse geocoder reported: {}", reason);
        }
        body.address
            .as_ref()
            .and_then(|addr| addr.best_name())
            .map(str::to_string)
            .ok_or(LookupError::NoData)
    }
}

/// Secondary source: GeoDB nearby cities.
#[derive(Clone)]
pub struct NearbyCities {
    client: Client,
    base_url: String,
    radius: u32,
}

impl NearbyCities {
    pub fn new(client: Client, config: &ServiceConfig) -> Self {
        Self {
            client,
            base_url: config.geodb_url.trim_end_matches('/').to_string(),
            radius: config.nearby_radius,
        }
    }

    /// Closest city within the configured radius, if any.
    pub async fn nearest_city(&self, at: Coordinate) -> LookupResult<String> {
        let url = format!(
            "{}/v1/geo/locations/{}/nearbyCities",
            self.base_url,
            at.nearby_key()
        );
        debug!("Looking up nearby cities via {}", url);

        let res = self
            .client
            .get(url)
            .query(&[("limit", "1".to_string()), ("radius", self.radius.to_string())])
            .send()
            .await?;
        let body = check_status(res)?.json::<NearbyCitiesResponse>().await?;

        body.candidates().next().ok_or(LookupError::NoData)
    }
}

/// Per-language article summaries.
#[derive(Clone)]
pub struct SummaryClient {
    client: Client,
    url_template: String,
}

impl SummaryClient {
    pub fn new(client: Client, config: &ServiceConfig) -> Self {
        Self {
            client,
            url_template: config.summary_url.trim_end_matches('/').to_string(),
        }
    }

    fn summary_url(&self, place: &PlaceName, language: LanguageCode) -> String {
        format!(
            "{}/{}",
            self.url_template.replace("{lang}", language.code()),
            urlencoding::encode(place.as_str())
        )
    }

    /// One attempt, no fallback. An empty extract is reported as
    /// [`LookupError::NoData`].
    pub async fn summary(&self, place: &PlaceName, language: LanguageCode) -> LookupResult<Summary> {
        let url = self.summary_url(place, language);
        debug!("Fetching summary {}", url);

        let res = self.client.get(url).send().await?;
        let body = check_status(res)?.json::<SummaryResponse>().await?;

        Summary::from_response(body, place, language).ok_or(LookupError::NoData)
    }
}
