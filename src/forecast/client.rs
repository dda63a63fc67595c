//! OpenWeatherMap client.
//!
//! Two independent GET endpoints keyed by the API credential and a
//! coordinate pair: the One Call daily forecast and the current-conditions
//! report, of which only the resolved place name is used.

use std::time::Duration;

use log::debug;
use serde::Deserialize;

use crate::NimbusError;
use crate::location::Coordinates;

use super::{DayForecast, Units};

const OWM_API_URL: &str = "https://api.openweathermap.org/data/2.5";
const REQUEST_TIMEOUT_SECS: u64 = 10;
const USER_AGENT: &str = concat!("nimbus/", env!("CARGO_PKG_VERSION"));

/// Client for the OpenWeatherMap API.
#[derive(Debug, Clone)]
pub struct OwmClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    units: Units,
}

// --- OpenWeatherMap JSON response types ---

#[derive(Debug, Deserialize)]
struct OneCallResponse {
    #[serde(default)]
    daily: Vec<DailyEntry>,
}

#[derive(Debug, Deserialize)]
struct DailyEntry {
    temp: DailyTemperature,
    #[serde(default)]
    weather: Vec<WeatherDetail>,
}

#[derive(Debug, Deserialize)]
struct DailyTemperature {
    day: f64,
}

#[derive(Debug, Deserialize)]
struct WeatherDetail {
    main: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CurrentConditionsResponse {
    name: String,
}

impl From<DailyEntry> for DayForecast {
    fn from(entry: DailyEntry) -> Self {
        let (category, description) = match entry.weather.into_iter().next() {
            Some(detail) => (detail.main, detail.description),
            None => (None, None),
        };
        Self {
            day_temp: entry.temp.day,
            category,
            description,
        }
    }
}

impl OwmClient {
    pub fn new(api_key: impl Into<String>, units: Units) -> Result<Self, NimbusError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| NimbusError::HttpClientError { source: e })?;

        Ok(Self {
            client,
            base_url: OWM_API_URL.to_string(),
            api_key: api_key.into(),
            units,
        })
    }

    /// Point the client at a different base URL. Used by tests.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// The multi-day forecast for the given coordinates, in provider order.
    /// Alert data is excluded; the unit system comes from the client.
    pub async fn daily_forecast(
        &self,
        coords: &Coordinates,
    ) -> Result<Vec<DayForecast>, NimbusError> {
        debug!(
            "GET /onecall for {:.4}, {:.4}",
            coords.latitude, coords.longitude
        );
        let url = format!(
            "{}/onecall?lat={}&lon={}&exclude=alerts&units={}&appid={}",
            self.base_url,
            coords.latitude,
            coords.longitude,
            self.units.as_query_value(),
            self.api_key
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| NimbusError::ForecastRequestError { source: e })?
            .error_for_status()
            .map_err(|e| NimbusError::ForecastRequestError { source: e })?;

        let body: OneCallResponse = response
            .json()
            .await
            .map_err(|e| NimbusError::MalformedResponseError { source: e })?;

        Ok(body.daily.into_iter().map(DayForecast::from).collect())
    }

    /// The resolvable place name for the given coordinates.
    pub async fn current_city(&self, coords: &Coordinates) -> Result<String, NimbusError> {
        debug!(
            "GET /weather for {:.4}, {:.4}",
            coords.latitude, coords.longitude
        );
        let url = format!(
            "{}/weather?lat={}&lon={}&appid={}",
            self.base_url, coords.latitude, coords.longitude, self.api_key
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| NimbusError::CityRequestError { source: e })?
            .error_for_status()
            .map_err(|e| NimbusError::CityRequestError { source: e })?;

        let body: CurrentConditionsResponse = response
            .json()
            .await
            .map_err(|e| NimbusError::MalformedResponseError { source: e })?;

        Ok(body.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONECALL_SAMPLE: &str = r#"{
        "lat": 47.3769,
        "lon": 8.5417,
        "timezone": "Europe/Zurich",
        "daily": [
            {"temp": {"day": 21.456, "min": 12.1, "max": 23.9},
             "weather": [{"id": 500, "main": "Rain", "description": "light rain"}]},
            {"temp": {"day": 18.0},
             "weather": [{"main": "Clear", "description": "clear sky"}]},
            {"temp": {"day": 15.3},
             "weather": []}
        ]
    }"#;

    #[test]
    fn daily_entries_parse_in_provider_order() {
        let body: OneCallResponse = serde_json::from_str(ONECALL_SAMPLE).unwrap();
        let days: Vec<DayForecast> = body.daily.into_iter().map(DayForecast::from).collect();

        assert_eq!(days.len(), 3);
        assert_eq!(days[0].day_temp, 21.456);
        assert_eq!(days[0].category.as_deref(), Some("Rain"));
        assert_eq!(days[0].description.as_deref(), Some("light rain"));
        assert_eq!(days[1].category.as_deref(), Some("Clear"));
        assert_eq!(days[2].day_temp, 15.3);
    }

    #[test]
    fn entry_without_weather_detail_still_parses() {
        let body: OneCallResponse =
            serde_json::from_str(r#"{"daily": [{"temp": {"day": 7.25}}]}"#).unwrap();
        let day = DayForecast::from(body.daily.into_iter().next().unwrap());

        assert_eq!(day.day_temp, 7.25);
        assert_eq!(day.category, None);
        assert_eq!(day.description, None);
        assert_eq!(day.icon(), None);
    }

    #[test]
    fn empty_weather_array_degrades_to_blank_fields() {
        let body: OneCallResponse = serde_json::from_str(ONECALL_SAMPLE).unwrap();
        let day = DayForecast::from(body.daily.into_iter().nth(2).unwrap());

        assert_eq!(day.category, None);
        assert_eq!(day.description, None);
    }

    #[test]
    fn missing_daily_array_degrades_to_empty_sequence() {
        let body: OneCallResponse =
            serde_json::from_str(r#"{"lat": 47.3769, "lon": 8.5417}"#).unwrap();
        assert!(body.daily.is_empty());
    }

    #[test]
    fn current_conditions_require_a_name() {
        let body: CurrentConditionsResponse =
            serde_json::from_str(r#"{"name": "Zurich", "cod": 200}"#).unwrap();
        assert_eq!(body.name, "Zurich");

        let missing = serde_json::from_str::<CurrentConditionsResponse>(r#"{"cod": 200}"#);
        assert!(missing.is_err());
    }
}
