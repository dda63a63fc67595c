// Error types for nimbus

use crate::forecast::ForecastUpdate;
use snafu::Snafu;
use std::{io, sync::mpsc::SendError};

#[derive(Debug, Snafu)]
pub enum NimbusError {
    // Errors for the location resolver
    #[snafu(display("Location permission denied"))]
    LocationPermissionDenied,
    #[snafu(display("Location service unavailable"))]
    LocationUnavailable { source: reqwest::Error },
    #[snafu(display("Location lookup rejected: {reason}"))]
    LocationLookupRejected { reason: String },

    // Errors for the weather API client
    #[snafu(display("Error building HTTP client"))]
    HttpClientError { source: reqwest::Error },
    #[snafu(display("Forecast request failed"))]
    ForecastRequestError { source: reqwest::Error },
    #[snafu(display("Current conditions request failed"))]
    CityRequestError { source: reqwest::Error },
    #[snafu(display("Malformed weather API response"))]
    MalformedResponseError { source: reqwest::Error },

    // Errors for the fetch pipeline
    #[snafu(display("Error starting async runtime"))]
    RuntimeError { source: io::Error },

    // Errors while broadcasting forecast updates to the UI
    #[snafu(display("Error broadcasting forecast update"))]
    UpdateBroadcastError {
        source: Box<SendError<ForecastUpdate>>,
    },

    // Config management errors
    #[snafu(display("Could not find application data directory to save config file"))]
    NoConfigDir,
    #[snafu(display("Error writing config file"))]
    ConfigIOError { source: io::Error },
    #[snafu(display("Error serializing config file"))]
    ConfigSerializeError { source: serde_json::Error },
}

impl From<SendError<ForecastUpdate>> for NimbusError {
    fn from(value: SendError<ForecastUpdate>) -> Self {
        NimbusError::UpdateBroadcastError {
            source: Box::new(value),
        }
    }
}
