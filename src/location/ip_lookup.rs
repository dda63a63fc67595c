//! IP-based geolocation via ip-api.com - free, no API key required.
//! Resolution is city-level; good enough for a weather widget.

use std::sync::Mutex;
use std::time::Instant;

use async_trait::async_trait;
use log::{debug, info};
use serde::Deserialize;

use crate::NimbusError;

use super::{
    AuthorizationScope, AuthorizationStatus, Coordinates, LocationProvider, Position,
    PositionRequest,
};

const IP_API_URL: &str = "http://ip-api.com/json";
const USER_AGENT: &str = concat!("nimbus/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    message: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
}

/// Resolves the machine position from its public IP address.
///
/// There is no OS permission prompt to defer to on the desktop, so the
/// user's `share_location` consent flag from the config file acts as the
/// authorization grant.
pub struct IpLookupProvider {
    client: reqwest::Client,
    endpoint: String,
    consented: bool,
    last_position: Mutex<Option<(Instant, Position)>>,
}

impl IpLookupProvider {
    pub fn new(consented: bool) -> Result<Self, NimbusError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| NimbusError::HttpClientError { source: e })?;

        Ok(Self {
            client,
            endpoint: IP_API_URL.to_string(),
            consented,
            last_position: Mutex::new(None),
        })
    }

    /// Point the provider at a different endpoint. Used by tests.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl LocationProvider for IpLookupProvider {
    async fn request_authorization(
        &self,
        _scope: AuthorizationScope,
    ) -> Result<AuthorizationStatus, NimbusError> {
        if self.consented {
            Ok(AuthorizationStatus::Granted)
        } else {
            Ok(AuthorizationStatus::Denied)
        }
    }

    async fn current_position(
        &self,
        request: &PositionRequest,
    ) -> Result<Position, NimbusError> {
        if let Some((read_at, position)) = self.last_position.lock().unwrap().clone() {
            if read_at.elapsed() <= request.max_age {
                debug!("Reusing position read {:?} ago", read_at.elapsed());
                return Ok(position);
            }
        }

        // IP resolution is city-level no matter what accuracy was asked for.
        let url = format!("{}?fields=status,message,lat,lon", self.endpoint);
        let response = self
            .client
            .get(&url)
            .timeout(request.timeout)
            .send()
            .await
            .map_err(|e| NimbusError::LocationUnavailable { source: e })?
            .error_for_status()
            .map_err(|e| NimbusError::LocationUnavailable { source: e })?;

        let body: IpApiResponse = response
            .json()
            .await
            .map_err(|e| NimbusError::LocationUnavailable { source: e })?;

        if body.status != "success" {
            return Err(NimbusError::LocationLookupRejected {
                reason: body.message.unwrap_or_else(|| "unspecified".to_string()),
            });
        }
        let (Some(lat), Some(lon)) = (body.lat, body.lon) else {
            return Err(NimbusError::LocationLookupRejected {
                reason: "response missing coordinates".to_string(),
            });
        };

        info!("Resolved position: {:.4}, {:.4}", lat, lon);
        let position = Position {
            coordinates: Coordinates {
                latitude: lat,
                longitude: lon,
            },
            accuracy_m: None,
        };
        *self.last_position.lock().unwrap() = Some((Instant::now(), position.clone()));
        Ok(position)
    }
}
