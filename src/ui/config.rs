use egui::Pos2;
use serde::{Deserialize, Serialize};

use nimbus::NimbusError;
use nimbus::forecast::Units;

const CONFIG_DIR_NAME: &str = "nimbus";
const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Serialize, Deserialize, Debug, Clone)]
pub(crate) struct WindowPosition {
    pub(crate) x: f32,
    pub(crate) y: f32,
}

impl Default for WindowPosition {
    fn default() -> Self {
        Self { x: 0., y: 0. }
    }
}

impl From<WindowPosition> for Pos2 {
    fn from(value: WindowPosition) -> Self {
        Pos2::new(value.x, value.y)
    }
}

impl From<Pos2> for WindowPosition {
    fn from(value: Pos2) -> Self {
        Self {
            x: value.x,
            y: value.y,
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(default)]
pub(crate) struct AppConfig {
    /// OpenWeatherMap credential. There is no default; without it the app
    /// stays on its loading screen.
    pub(crate) api_key: Option<String>,
    pub(crate) units: Units,
    /// Consent to resolve the machine position from its public IP.
    pub(crate) share_location: bool,
    pub(crate) window_position: WindowPosition,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            units: Units::default(),
            share_location: true,
            window_position: WindowPosition::default(),
        }
    }
}

impl AppConfig {
    pub(crate) fn from_local_file() -> Option<Self> {
        let config_path = dirs::config_dir()?
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME);

        if config_path.exists() {
            let file = std::fs::File::open(config_path).expect("Could not open config file");
            Some(serde_json::from_reader(file).expect("Could not parse config file"))
        } else {
            None
        }
    }

    pub(crate) fn save(&self) -> Result<(), NimbusError> {
        let config_path = dirs::config_dir()
            .ok_or(NimbusError::NoConfigDir)?
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            std::fs::create_dir_all(config_path.parent().unwrap())
                .map_err(|e| NimbusError::ConfigIOError { source: e })?;
        }

        let file = std::fs::File::create(config_path)
            .map_err(|e| NimbusError::ConfigIOError { source: e })?;
        serde_json::to_writer(file, self).map_err(|e| NimbusError::ConfigSerializeError { source: e })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_file_falls_back_to_defaults() {
        let config: AppConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.api_key, None);
        assert_eq!(config.units, Units::Metric);
        assert!(config.share_location);
        assert_eq!(config.window_position.x, 0.);
        assert_eq!(config.window_position.y, 0.);
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = AppConfig {
            api_key: Some("abc123".to_string()),
            units: Units::Imperial,
            share_location: false,
            window_position: WindowPosition { x: 120., y: 42. },
        };
        let serialized = serde_json::to_string(&config).unwrap();
        let parsed: AppConfig = serde_json::from_str(&serialized).unwrap();

        assert_eq!(parsed.api_key.as_deref(), Some("abc123"));
        assert_eq!(parsed.units, Units::Imperial);
        assert!(!parsed.share_location);
        assert_eq!(parsed.window_position.x, 120.);
    }

    #[test]
    fn window_position_converts_to_pos2_and_back() {
        let position = WindowPosition { x: 15., y: 30. };
        let pos2: Pos2 = position.into();
        assert_eq!(pos2, Pos2::new(15., 30.));

        let back: WindowPosition = pos2.into();
        assert_eq!(back.x, 15.);
        assert_eq!(back.y, 30.);
    }
}
