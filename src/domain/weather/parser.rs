use super::model::{CityReading, WeatherKind};

const MIN_FIELDS: usize = 4;

/// Best-effort parse of the model's CSV-ish answer.
///
/// Each line is split on commas and trimmed; lines with at least four
/// fields become readings (extra fields are ignored), everything else is
/// dropped silently. The upstream format is not guaranteed, so a header row
/// that happens to have four fields is accepted like any other line.
pub fn parse_readings(text: &str) -> Vec<CityReading> {
    text.lines().filter_map(parse_line).collect()
}

fn parse_line(line: &str) -> Option<CityReading> {
    if !line.contains(',') {
        return None;
    }

    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() < MIN_FIELDS {
        return None;
    }

    let condition = fields[3].to_string();
    Some(CityReading {
        city: fields[0].to_string(),
        state: fields[1].to_string(),
        temperature: fields[2].to_string(),
        kind: WeatherKind::classify(&condition),
        condition,
    })
}
