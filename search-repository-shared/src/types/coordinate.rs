//! Geographic coordinate attached to an item.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A validated latitude/longitude pair.
///
/// Both values are finite and inside their geographic range. A `Coordinate` can
/// only be obtained through [`Coordinate::new`] or [`Coordinate::from_value`], so
/// an item carrying one always has a usable pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CoordinateFields")]
pub struct Coordinate {
    lat: f64,
    lon: f64,
}

#[derive(Deserialize)]
struct CoordinateFields {
    lat: f64,
    lon: f64,
}

impl TryFrom<CoordinateFields> for Coordinate {
    type Error = String;

    fn try_from(fields: CoordinateFields) -> Result<Self, Self::Error> {
        Coordinate::new(fields.lat, fields.lon)
            .ok_or_else(|| format!("invalid coordinate ({}, {})", fields.lat, fields.lon))
    }
}

impl Coordinate {
    /// Build a coordinate, returning `None` when either value is out of range or not finite.
    pub fn new(lat: f64, lon: f64) -> Option<Self> {
        let valid = lat.is_finite()
            && lon.is_finite()
            && (-90.0..=90.0).contains(&lat)
            && (-180.0..=180.0).contains(&lon);

        valid.then_some(Self { lat, lon })
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }

    /// Extract a coordinate from a loosely shaped JSON value.
    ///
    /// Accepted shapes are `{"lat": .., "lon": ..}`, `[lat, lon]` and the string
    /// `"lat,lon"`. Numbers may also be given as numeric strings. Anything else,
    /// including a pair with a missing or non-numeric side, yields `None`.
    pub fn from_value(value: &Value) -> Option<Self> {
        let (lat, lon) = match value {
            Value::Object(map) => (map.get("lat")?, map.get("lon")?),
            Value::Array(values) if values.len() == 2 => (&values[0], &values[1]),
            Value::String(text) => {
                let (lat, lon) = text.split_once(',')?;
                return Self::new(lat.trim().parse().ok()?, lon.trim().parse().ok()?);
            }
            _ => return None,
        };

        Self::new(numeric(lat)?, numeric(lon)?)
    }
}

fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
