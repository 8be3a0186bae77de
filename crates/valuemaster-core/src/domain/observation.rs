use time::macros::format_description;
use time::Date;

use crate::ValidationError;

/// Placeholder FRED writes for days without a published value.
pub const MISSING_VALUE_MARKER: &str = ".";

/// Single dated observation. `value` is `None` for placeholder or unparsable entries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub date: Date,
    pub value: Option<f64>,
}

impl Observation {
    pub fn new(date: Date, value: Option<f64>) -> Self {
        Self { date, value }
    }

    /// Parse a `YYYY-MM-DD` date and a raw value string.
    pub fn parse(date: &str, value: &str) -> Result<Self, ValidationError> {
        let date = Date::parse(date.trim(), format_description!("[year]-[month]-[day]"))
            .map_err(|_| ValidationError::InvalidDate {
                value: date.to_owned(),
            })?;
        Ok(Self::new(date, parse_observation_value(value)))
    }
}

/// Ordered observation series, oldest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObservationSeries {
    observations: Vec<Observation>,
}

impl ObservationSeries {
    pub fn new(mut observations: Vec<Observation>) -> Self {
        observations.sort_by_key(|observation| observation.date);
        Self { observations }
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Values of the observations that carry a finite number, in date order.
    pub fn valid_values(&self) -> Vec<f64> {
        self.observations
            .iter()
            .filter_map(|observation| observation.value)
            .filter(|value| value.is_finite())
            .collect()
    }

    /// The most recent `size` observations, or `None` when the series is shorter.
    pub fn trailing(&self, size: usize) -> Option<Self> {
        let start = self.observations.len().checked_sub(size)?;
        Some(Self {
            observations: self.observations[start..].to_vec(),
        })
    }
}

impl FromIterator<Observation> for ObservationSeries {
    fn from_iter<I: IntoIterator<Item = Observation>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// `"."`, blanks and other non-numeric strings map to `None`.
pub fn parse_observation_value(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == MISSING_VALUE_MARKER {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|value| value.is_finite())
}
