//! Backend HTTP client.
//!
//! One client serves all four provider contracts against the merchant,
//! place, route and geocoding endpoints of the backend API. A semaphore
//! bounds concurrent requests so course composition cannot flood it.

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use tokio::sync::Semaphore;

use crate::domain::{Coordinate, PlaceDetails, RouteLeg, RouteMode, RouteResult, Stop};

use super::convert::{
    convert_leg, convert_merchant_search, convert_point, convert_route_detail,
};
use super::error::ProviderError;
use super::types::{
    CourseBody, CourseDto, CourseStopDto, GeocodeDto, MerchantSearchBody, MerchantSearchDto,
    PlaceDetailsDto, RouteDetailDto,
};
use super::{
    Geocoder, MerchantProvider, MerchantSearchRequest, MerchantSearchResponse,
    PlaceDetailsProvider, RouteProvider,
};

/// Default base URL for the backend API.
const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080/api/v1";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 5;

/// Characters of an unparseable body kept in error messages.
const BODY_EXCERPT_LEN: usize = 500;

/// Configuration for the backend client.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// API key sent in the `x-apikey` header
    pub api_key: String,
    /// Base URL including the API version prefix
    pub base_url: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl BackendConfig {
    /// Create a new config with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// HTTP client for the backend API.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
    semaphore: Arc<Semaphore>,
}

impl BackendClient {
    /// Create a new client with the given configuration.
    pub fn new(config: BackendConfig) -> Result<Self, ProviderError> {
        let mut headers = HeaderMap::new();

        let api_key =
            HeaderValue::from_str(&config.api_key).map_err(|_| ProviderError::Api {
                status: 0,
                message: "Invalid API key format".to_string(),
            })?;
        headers.insert("x-apikey", api_key);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            semaphore: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// URL of one place resource.
    ///
    /// The id is pushed as a single escaped path segment; ids that would
    /// name a different resource are rejected.
    fn place_url(&self, place_id: &str) -> Result<reqwest::Url, ProviderError> {
        if place_id.is_empty() || place_id == "." || place_id == ".." {
            return Err(ProviderError::NotFound);
        }

        let invalid_base = || ProviderError::Api {
            status: 0,
            message: format!("Invalid base URL: {}", self.base_url),
        };
        let mut url = reqwest::Url::parse(&self.url("places")).map_err(|_| invalid_base())?;
        url.path_segments_mut()
            .map_err(|_| invalid_base())?
            .push(place_id);
        Ok(url)
    }

    /// Send a request and parse a JSON body, mapping status codes to errors.
    async fn send_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ProviderError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| ProviderError::Api {
                status: 0,
                message: "Semaphore closed".to_string(),
            })?;

        let response = request.send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(ProviderError::Unauthorized);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimited);
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ProviderError::NotFound);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| ProviderError::Json {
            message: e.to_string(),
            body: Some(body.chars().take(BODY_EXCERPT_LEN).collect()),
        })
    }
}

impl MerchantProvider for BackendClient {
    async fn search(
        &self,
        request: &MerchantSearchRequest,
    ) -> Result<MerchantSearchResponse, ProviderError> {
        let body = MerchantSearchBody {
            latitude: request.center.latitude,
            longitude: request.center.longitude,
            radius: request.radius_meters,
            user_lat: request.user_location.latitude,
            user_lng: request.user_location.longitude,
            card_names: request.card_names.clone(),
            gps_accuracy: request.gps_accuracy_meters,
            staying_duration: request.staying_duration_seconds,
        };

        let dto: MerchantSearchDto = self
            .send_json(self.http.post(self.url("merchants/search")).json(&body))
            .await?;

        Ok(convert_merchant_search(dto))
    }
}

impl PlaceDetailsProvider for BackendClient {
    async fn details(&self, place_id: &str) -> Result<PlaceDetails, ProviderError> {
        let url = self.place_url(place_id)?;
        let dto: PlaceDetailsDto = self.send_json(self.http.get(url)).await?;
        Ok(dto)
    }
}

impl RouteProvider for BackendClient {
    async fn route_detail(
        &self,
        start: Coordinate,
        end: Coordinate,
        mode: RouteMode,
    ) -> Result<RouteResult, ProviderError> {
        let request = self.http.get(self.url("routes")).query(&[
            ("startLat", start.latitude.to_string()),
            ("startLng", start.longitude.to_string()),
            ("endLat", end.latitude.to_string()),
            ("endLng", end.longitude.to_string()),
            ("mode", mode.as_str().to_string()),
        ]);

        let dto: RouteDetailDto = self.send_json(request).await?;

        convert_route_detail(dto, mode).map_err(|e| ProviderError::Json {
            message: e.to_string(),
            body: None,
        })
    }

    async fn course_leg(&self, from: &Stop, to: &Stop) -> Result<RouteLeg, ProviderError> {
        let body = CourseBody {
            stops: [from, to]
                .into_iter()
                .map(|stop| CourseStopDto {
                    name: stop.name.clone(),
                    lat: stop.location.latitude,
                    lng: stop.location.longitude,
                })
                .collect(),
        };

        let dto: CourseDto = self
            .send_json(self.http.post(self.url("routes/course")).json(&body))
            .await?;

        let leg = dto
            .legs
            .into_iter()
            .next()
            .flatten()
            .ok_or(ProviderError::NotFound)?;

        convert_leg(leg).map_err(|e| ProviderError::Json {
            message: e.to_string(),
            body: None,
        })
    }
}

impl Geocoder for BackendClient {
    async fn geocode(&self, address: &str) -> Result<Option<Coordinate>, ProviderError> {
        let request = self
            .http
            .get(self.url("geocode"))
            .query(&[("address", address)]);

        let dto: GeocodeDto = match self.send_json(request).await {
            Ok(dto) => dto,
            Err(ProviderError::NotFound) => return Ok(None),
            Err(e) => return Err(e),
        };

        dto.results
            .into_iter()
            .next()
            .map(convert_point)
            .transpose()
            .map_err(|e| ProviderError::Json {
                message: e.to_string(),
                body: None,
            })
    }
}
