//! Location resolution: a single best-effort read of the machine's position.

pub mod ip_lookup;

pub use ip_lookup::IpLookupProvider;

use std::time::Duration;

use async_trait::async_trait;

use crate::NimbusError;

/// A latitude/longitude pair identifying the device position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// A resolved position. IP-based providers are city-level, so the accuracy
/// radius is optional.
#[derive(Debug, Clone)]
pub struct Position {
    pub coordinates: Coordinates,
    pub accuracy_m: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationScope {
    WhileInUse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationStatus {
    Granted,
    Denied,
}

const POSITION_TIMEOUT_S: u64 = 15;
const POSITION_MAX_AGE_S: u64 = 10;

/// Options for a single position read.
#[derive(Debug, Clone)]
pub struct PositionRequest {
    /// Ask the provider for the best accuracy it can deliver.
    pub high_accuracy: bool,
    /// Give up on the read after this long.
    pub timeout: Duration,
    /// A position cached no longer than this ago may be returned as-is.
    pub max_age: Duration,
}

impl Default for PositionRequest {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout: Duration::from_secs(POSITION_TIMEOUT_S),
            max_age: Duration::from_secs(POSITION_MAX_AGE_S),
        }
    }
}

/// A source of device positions.
///
/// The forecast pipeline only consumes this contract: request authorization
/// first, then read a single position. Providers decide what "authorization"
/// means for their platform.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// Ask for permission to read the device position.
    async fn request_authorization(
        &self,
        scope: AuthorizationScope,
    ) -> Result<AuthorizationStatus, NimbusError>;

    /// A single point-in-time position read. No polling, no watch semantics.
    async fn current_position(
        &self,
        request: &PositionRequest,
    ) -> Result<Position, NimbusError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_request_matches_resolver_contract() {
        let request = PositionRequest::default();
        assert!(request.high_accuracy);
        assert_eq!(request.timeout, Duration::from_secs(15));
        assert_eq!(request.max_age, Duration::from_secs(10));
    }
}
