use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Average 10-year risk-free rate, decimal fraction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskFreeRate {
    pub rate: f64,
}

impl RiskFreeRate {
    pub fn new(rate: f64) -> Result<Self, ValidationError> {
        validate_finite("rate", rate)?;
        Ok(Self { rate })
    }
}

/// Annualized broad market return, decimal fraction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketReturn {
    pub rate: f64,
}

impl MarketReturn {
    pub fn new(rate: f64) -> Result<Self, ValidationError> {
        validate_finite("rate", rate)?;
        Ok(Self { rate })
    }
}

/// Industry unlevered beta.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnleveredBeta {
    pub beta: f64,
}

impl UnleveredBeta {
    pub fn new(beta: f64) -> Result<Self, ValidationError> {
        validate_finite("beta", beta)?;
        Ok(Self { beta })
    }
}

/// Country risk premium, decimal fraction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CountryRiskPremium {
    pub risk: f64,
}

impl CountryRiskPremium {
    pub fn new(risk: f64) -> Result<Self, ValidationError> {
        validate_finite("risk", risk)?;
        Ok(Self { risk })
    }
}

/// Batch lookup result keyed by country name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CountryRiskPremiums {
    pub risks: BTreeMap<String, f64>,
}

impl CountryRiskPremiums {
    pub fn insert(
        &mut self,
        country: impl Into<String>,
        premium: CountryRiskPremium,
    ) -> Option<f64> {
        self.risks.insert(country.into(), premium.risk)
    }

    pub fn get(&self, country: &str) -> Option<f64> {
        self.risks.get(country).copied()
    }

    pub fn len(&self) -> usize {
        self.risks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.risks.is_empty()
    }
}

fn validate_finite(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    Ok(())
}
