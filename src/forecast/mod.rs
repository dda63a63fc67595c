//! The forecast pipeline: resolve a position, fetch weather data, and
//! broadcast the results to the UI as they arrive.

pub mod client;

use std::sync::mpsc::Sender;

pub use client::OwmClient;
use clap::ValueEnum;
use log::{error, info, warn};
use serde::{Deserialize, Serialize};

use crate::NimbusError;
use crate::location::{AuthorizationScope, AuthorizationStatus, LocationProvider, PositionRequest};

/// OpenWeatherMap unit system applied to the forecast request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
    Standard,
}

impl Units {
    pub fn as_query_value(&self) -> &'static str {
        match self {
            Self::Metric => "metric",
            Self::Imperial => "imperial",
            Self::Standard => "standard",
        }
    }
}

/// One day of the forecast, in the order the provider returned it.
///
/// The weather detail fields are optional: an entry without them still
/// renders as a card, just without the category and description lines.
#[derive(Debug, Clone, PartialEq)]
pub struct DayForecast {
    pub day_temp: f64,
    pub category: Option<String>,
    pub description: Option<String>,
}

impl DayForecast {
    /// Temperature as shown on a day card, exactly one decimal place.
    pub fn display_temp(&self) -> String {
        format!("{:.1}", self.day_temp)
    }

    /// The icon glyph for this day's weather category, if the category is
    /// present and mapped.
    pub fn icon(&self) -> Option<&'static str> {
        self.category.as_deref().and_then(weather_icon)
    }
}

/// Fixed mapping from the provider's weather group strings to display
/// glyphs. Categories not listed here render without an icon.
pub const WEATHER_ICONS: [(&str, &str); 7] = [
    ("Clouds", "☁"),
    ("Clear", "☀"),
    ("Atmosphere", "🌫"),
    ("Snow", "❄"),
    ("Rain", "☔"),
    ("Drizzle", "☂"),
    ("Thunderstorm", "⚡"),
];

pub fn weather_icon(category: &str) -> Option<&'static str> {
    WEATHER_ICONS
        .iter()
        .find(|(key, _)| *key == category)
        .map(|(_, glyph)| *glyph)
}

/// Messages broadcast from the fetch pipeline to the UI. The two variants
/// are produced by independent requests and may arrive in either order, or
/// not at all.
#[derive(Debug, Clone, PartialEq)]
pub enum ForecastUpdate {
    /// The full multi-day forecast, replacing any previous sequence.
    Daily(Vec<DayForecast>),
    /// The resolved city label.
    City(String),
}

/// Runs the one-shot pipeline: authorization, position read, then the two
/// weather requests concurrently. Each request broadcasts its own result
/// the moment it resolves; a failure in one is logged and never blocks the
/// other.
pub async fn run_forecast_pipeline<P: LocationProvider + ?Sized>(
    provider: &P,
    client: &OwmClient,
    updates: &Sender<ForecastUpdate>,
) -> Result<(), NimbusError> {
    let status = provider
        .request_authorization(AuthorizationScope::WhileInUse)
        .await?;
    if status != AuthorizationStatus::Granted {
        return Err(NimbusError::LocationPermissionDenied);
    }

    let position = provider.current_position(&PositionRequest::default()).await?;
    let coords = position.coordinates;
    info!(
        "Fetching weather for {:.4}, {:.4}",
        coords.latitude, coords.longitude
    );

    let daily = async {
        match client.daily_forecast(&coords).await {
            Ok(days) => {
                info!("Received {} forecast days", days.len());
                if let Err(e) = updates.send(ForecastUpdate::Daily(days)) {
                    warn!("Dropping forecast update, UI is gone: {}", e);
                }
            }
            Err(e) => error!("Forecast request failed: {}", e),
        }
    };
    let city = async {
        match client.current_city(&coords).await {
            Ok(name) => {
                info!("Resolved city label: {}", name);
                if let Err(e) = updates.send(ForecastUpdate::City(name)) {
                    warn!("Dropping city update, UI is gone: {}", e);
                }
            }
            Err(e) => error!("Current conditions request failed: {}", e),
        }
    };
    tokio::join!(daily, city);

    Ok(())
}

/// Blocking entry point for the fetch thread: owns the async runtime for
/// the lifetime of the pipeline.
pub fn collect_forecast(
    provider: impl LocationProvider,
    client: OwmClient,
    updates: Sender<ForecastUpdate>,
) -> Result<(), NimbusError> {
    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| NimbusError::RuntimeError { source: e })?;
    runtime.block_on(run_forecast_pipeline(&provider, &client, &updates))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn mapped_category_resolves_to_table_glyph() {
        assert_eq!(weather_icon("Rain"), Some("☔"));
        assert_eq!(weather_icon("Clear"), Some("☀"));
        assert_eq!(weather_icon("Thunderstorm"), Some("⚡"));
    }

    #[test]
    fn unmapped_category_resolves_to_no_icon() {
        assert_eq!(weather_icon("Tornado"), None);
        assert_eq!(weather_icon(""), None);
        // lookup is case-sensitive, like the provider's group strings
        assert_eq!(weather_icon("rain"), None);
    }

    #[test]
    fn day_without_category_has_no_icon() {
        let day = DayForecast {
            day_temp: 3.0,
            category: None,
            description: None,
        };
        assert_eq!(day.icon(), None);
    }

    #[test]
    fn temperature_renders_with_one_decimal_place() {
        let day = DayForecast {
            day_temp: 21.456,
            category: Some("Clear".to_string()),
            description: Some("clear sky".to_string()),
        };
        assert_eq!(day.display_temp(), "21.5");
    }

    #[test]
    fn whole_temperatures_keep_the_decimal() {
        let day = DayForecast {
            day_temp: -2.0,
            category: None,
            description: None,
        };
        assert_eq!(day.display_temp(), "-2.0");
    }

    #[test]
    fn units_query_values() {
        assert_eq!(Units::Metric.as_query_value(), "metric");
        assert_eq!(Units::Imperial.as_query_value(), "imperial");
        assert_eq!(Units::Standard.as_query_value(), "standard");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_display_temp_always_one_decimal(temp in -100.0f64..150.0f64) {
            let day = DayForecast {
                day_temp: temp,
                category: None,
                description: None,
            };
            let shown = day.display_temp();
            let (_, decimals) = shown.split_once('.').expect("no decimal point");
            prop_assert_eq!(decimals.len(), 1);
        }

        #[test]
        fn prop_icon_lookup_never_panics(category in ".*") {
            let _ = weather_icon(&category);
        }
    }
}
