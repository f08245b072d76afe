use crate::domain::generation::Source;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Coarse condition bucket the widget maps to an icon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeatherKind {
    Rain,
    Clear,
    Storm,
    Cloudy,
    Unknown,
}

impl WeatherKind {
    /// Classify a free-text Portuguese condition. First match wins, in the
    /// order rain, clear, storm, cloudy.
    pub fn classify(condition: &str) -> Self {
        let condition = condition.to_lowercase();
        let has = |words: &[&str]| words.iter().any(|w| condition.contains(w));

        if has(&["chuva"]) {
            WeatherKind::Rain
        } else if has(&["sol", "limpo"]) {
            WeatherKind::Clear
        } else if has(&["raio", "tempestade"]) {
            WeatherKind::Storm
        } else if has(&["nublado", "nuvens"]) {
            WeatherKind::Cloudy
        } else {
            WeatherKind::Unknown
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityReading {
    pub city: String,
    pub state: String,
    pub temperature: String,
    pub condition: String,
    pub kind: WeatherKind,
}

/// Latest weather board. Replaced wholesale by a successful refresh and
/// never partially updated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub readings: Vec<CityReading>,
    pub sources: Vec<Source>,
    pub last_updated_at: Option<DateTime<Utc>>,
}

impl WeatherSnapshot {
    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }
}
