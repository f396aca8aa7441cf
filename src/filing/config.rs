use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::core::{PajakError, Result, ValidationError};

/// Settings for filing identifiers and settlement entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilingConfig {
    /// PPN rate in percent, used to back out the adjustment tax base.
    pub vat_rate: Decimal,
    /// Prefix for payment entry references ("PE-2024-00001").
    pub payment_reference_prefix: String,
    /// Prefix for tax adjustment entry references.
    pub adjustment_reference_prefix: String,
    /// Prefix for filing ids ("TFS-2024-00001").
    pub filing_prefix: String,
}

impl Default for FilingConfig {
    fn default() -> Self {
        Self {
            vat_rate: dec!(11),
            payment_reference_prefix: "PE-".into(),
            adjustment_reference_prefix: "TAE-".into(),
            filing_prefix: "TFS-".into(),
        }
    }
}

impl FilingConfig {
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        if self.vat_rate <= Decimal::ZERO || self.vat_rate > Decimal::ONE_HUNDRED {
            errors.push(ValidationError::new(
                "vat_rate",
                format!("must be above 0 and at most 100, got {}", self.vat_rate),
            ));
        }
        for (field, prefix) in [
            ("payment_reference_prefix", &self.payment_reference_prefix),
            ("adjustment_reference_prefix", &self.adjustment_reference_prefix),
            ("filing_prefix", &self.filing_prefix),
        ] {
            if prefix.trim().is_empty() {
                errors.push(ValidationError::new(field, "must not be blank"));
            }
        }
        errors
    }
}

/// Builder for [`FilingConfig`].
///
/// ```
/// use pajak::filing::FilingConfigBuilder;
/// use rust_decimal_macros::dec;
///
/// let config = FilingConfigBuilder::new()
///     .vat_rate(dec!(12))
///     .payment_reference_prefix("PAY-")
///     .build()
///     .unwrap();
/// assert_eq!(config.adjustment_reference_prefix, "TAE-");
/// ```
#[derive(Debug, Default)]
pub struct FilingConfigBuilder {
    config: FilingConfig,
}

impl FilingConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vat_rate(mut self, rate: Decimal) -> Self {
        self.config.vat_rate = rate;
        self
    }

    pub fn payment_reference_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.payment_reference_prefix = prefix.into();
        self
    }

    pub fn adjustment_reference_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.adjustment_reference_prefix = prefix.into();
        self
    }

    pub fn filing_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.filing_prefix = prefix.into();
        self
    }

    /// Validate and build the configuration.
    pub fn build(self) -> Result<FilingConfig> {
        let errors = self.config.validate();
        if !errors.is_empty() {
            return Err(PajakError::from_validation(&errors));
        }
        Ok(self.config)
    }
}
