// Library interface for nimbus
// This allows integration tests to access internal modules

pub mod errors;
pub mod forecast;
pub mod location;

// Re-export commonly used types
pub use errors::NimbusError;
pub use forecast::{
    DayForecast, ForecastUpdate, OwmClient, Units, collect_forecast, run_forecast_pipeline,
};
pub use location::{
    AuthorizationScope, AuthorizationStatus, Coordinates, LocationProvider, Position,
    PositionRequest,
};
