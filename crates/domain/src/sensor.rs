//! Sensor reading: the latest values reported by the plant device.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// The `sensors` node, read-only to plantwatch.
///
/// Every field is optional: the device may publish a partial node, and the
/// dashboard shows `--` for anything missing. Fields decode independently,
/// so a malformed reading only blanks its own field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    /// Soil moisture, percent (0–100).
    #[serde(default, deserialize_with = "lenient")]
    pub moisture: Option<f64>,
    /// Air temperature, degrees Celsius.
    #[serde(default, deserialize_with = "lenient")]
    pub temperature: Option<f64>,
    /// Relative air humidity, percent.
    #[serde(default, deserialize_with = "lenient")]
    pub humidity: Option<f64>,
    /// Light sensor, encoded by the device as `0` / `1`.
    #[serde(default, deserialize_with = "lenient")]
    pub light: Option<LightLevel>,
}

/// Decode a field, mapping a value of the wrong type to `None`.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(Option::<T>::deserialize(raw).ok().flatten())
}

/// Two-valued light sensor state.
///
/// The device sends a number; anything non-zero counts as bright. Booleans
/// are accepted too.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightLevel {
    Dark,
    Bright,
}

impl LightLevel {
    /// Label shown on the light card.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Dark => "Dark",
            Self::Bright => "Bright",
        }
    }
}

impl From<bool> for LightLevel {
    fn from(bright: bool) -> Self {
        if bright { Self::Bright } else { Self::Dark }
    }
}

impl Serialize for LightLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(match self {
            Self::Dark => 0,
            Self::Bright => 1,
        })
    }
}

impl<'de> Deserialize<'de> for LightLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Flag(bool),
            Number(f64),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Flag(flag) => Self::from(flag),
            Raw::Number(value) => Self::from(value != 0.0),
        })
    }
}
