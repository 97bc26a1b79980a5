//! Remote name-search fallback against the campus map website.
//!
//! The map's search page is server-rendered; its results are embedded as
//! Drupal settings JSON rather than exposed through an API:
//!
//! ```html
//! <script type="application/json" data-drupal-selector="drupal-settings-json">
//!   {"pois": [{"title": "Hancock Library", "lat": -35.2763, "lng": 149.1182}]}
//! </script>
//! ```

use std::future::Future;
use std::time::Duration;

use reqwest::{Client, Url};
use scraper::Html;
use serde::Deserialize;

use super::cache::GeoPoint;
use crate::error::GeocodeError;
use crate::markup::{self, DRUPAL_SETTINGS};

const DEFAULT_BASE_URL: &str = "https://www.anu.edu.au/";

/// Free-text location search returning the best matching point.
pub trait LocationSearch {
    fn search(&self, query: &str) -> impl Future<Output = Result<GeoPoint, GeocodeError>>;
}

/// HTTP client for the campus map's name search.
///
/// Use [`MapSearchClient::new`] for the production site or
/// [`MapSearchClient::with_base_url`] to point at a mock server in tests.
pub struct MapSearchClient {
    client: Client,
    base_url: Url,
}

impl MapSearchClient {
    /// Creates a client for the production campus map.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, GeocodeError> {
        Self::with_base_url(timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the `reqwest::Client` cannot be
    /// constructed, or [`GeocodeError::InvalidBaseUrl`] if `base_url` does
    /// not parse.
    pub fn with_base_url(
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash, so joining "maps" appends a segment
        // instead of replacing the last one.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| GeocodeError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self { client, base_url })
    }

    /// Builds `<base>/maps?campus=&type=&search=<query>`.
    fn search_url(&self, query: &str) -> Result<Url, GeocodeError> {
        let mut url = self
            .base_url
            .join("maps")
            .map_err(|e| GeocodeError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;
        url.query_pairs_mut()
            .append_pair("campus", "")
            .append_pair("type", "")
            .append_pair("search", query);
        Ok(url)
    }
}

impl LocationSearch for MapSearchClient {
    async fn search(&self, query: &str) -> Result<GeoPoint, GeocodeError> {
        let url = self.search_url(query)?;
        let response = self
            .client
            .get(url.clone())
            .header(reqwest::header::ACCEPT, "text/html,application/xhtml+xml")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeocodeError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        parse_search_page(&body)
    }
}

#[derive(Debug, Deserialize)]
struct DrupalSettings {
    #[serde(default)]
    pois: Vec<Poi>,
}

#[derive(Debug, Deserialize)]
struct Poi {
    lat: serde_json::Value,
    lng: serde_json::Value,
}

/// Extracts the first point of interest from a rendered search page.
pub(crate) fn parse_search_page(html: &str) -> Result<GeoPoint, GeocodeError> {
    let settings_json = {
        let document = Html::parse_document(html);
        let script = document
            .select(&DRUPAL_SETTINGS)
            .next()
            .ok_or(GeocodeError::MissingSettingsScript)?;
        markup::text_of(script)
    };

    let settings: DrupalSettings =
        serde_json::from_str(&settings_json).map_err(|e| GeocodeError::Deserialize {
            context: "map search settings".to_owned(),
            source: e,
        })?;

    let poi = settings
        .pois
        .into_iter()
        .next()
        .ok_or(GeocodeError::NoResults)?;

    Ok(GeoPoint::new(
        coordinate_string("lat", &poi.lat)?,
        coordinate_string("lng", &poi.lng)?,
    ))
}

/// Renders a JSON number in its shortest round-trip form; numeric strings
/// pass through unchanged.
fn coordinate_string(
    field: &'static str,
    value: &serde_json::Value,
) -> Result<String, GeocodeError> {
    match value {
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::String(s) if s.trim().parse::<f64>().is_ok() => Ok(s.clone()),
        other => Err(GeocodeError::InvalidCoordinate {
            field,
            value: other.to_string(),
        }),
    }
}
