use serde_json::Value;

use crate::error::Result;
use crate::model::path::{number, text};

/// Current and next map of the battle royale rotation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MapSnapshot {
    pub current_map: String,
    pub current_duration_mins: f64,
    pub current_remaining_mins: f64,
    pub next_map: String,
    pub next_start: f64,
    pub next_duration_mins: f64,
}

impl MapSnapshot {
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        let v: Value = serde_json::from_slice(body)?;
        Self::from_json(&v)
    }

    pub fn from_json(v: &Value) -> Result<Self> {
        Ok(Self {
            current_map: text(v, &["current", "map"])?,
            current_duration_mins: number(v, &["current", "DurationInMinutes"])?,
            current_remaining_mins: number(v, &["current", "remainingMins"])?,
            next_map: text(v, &["next", "map"])?,
            next_start: number(v, &["next", "start"])?,
            next_duration_mins: number(v, &["next", "DurationInMinutes"])?,
        })
    }
}
