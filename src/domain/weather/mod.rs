pub mod error;
pub mod model;
pub mod parser;
pub mod service;

pub use error::WeatherServiceError;
pub use model::{CityReading, WeatherKind, WeatherSnapshot};
pub use parser::parse_readings;
pub use service::{RefreshOutcome, WeatherService, WeatherServiceApi};
