//! Typed split configuration.
//!
//! The platform percentage is validated once, when the configuration is
//! built, and the merchant percentage is always derived from it.

use std::sync::{Arc, PoisonError, RwLock};

use pdv_shared::SplitSettings;
use pdv_shared::types::Currency;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::error::SplitError;

/// Maximum number of decimal places accepted for a platform percentage.
pub const MAX_PERCENT_SCALE: u32 = 4;

/// Platform percentage in `[0, 100]` with at most `MAX_PERCENT_SCALE`
/// decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct PlatformPercent(Decimal);

impl PlatformPercent {
    /// Validates and wraps a percentage.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is outside `[0, 100]` or too precise.
    pub fn new(value: Decimal) -> Result<Self, SplitError> {
        if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
            return Err(SplitError::PercentOutOfRange(value));
        }
        let normalized = value.normalize();
        if normalized.scale() > MAX_PERCENT_SCALE {
            return Err(SplitError::PercentTooPrecise {
                value,
                max_scale: MAX_PERCENT_SCALE,
            });
        }
        Ok(Self(normalized))
    }

    /// Returns the percentage as a decimal.
    #[must_use]
    pub const fn value(self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for PlatformPercent {
    type Error = SplitError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PlatformPercent> for Decimal {
    fn from(percent: PlatformPercent) -> Self {
        percent.0
    }
}

impl std::fmt::Display for PlatformPercent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// How approved payments are divided between merchant and platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitConfiguration {
    /// Share of each payment owed to the platform.
    pub platform_percent: PlatformPercent,
    /// Currency payments are denominated in.
    pub currency: Currency,
}

impl SplitConfiguration {
    /// Builds a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the percentage is out of range or too precise.
    pub fn new(platform_percent: Decimal, currency: Currency) -> Result<Self, SplitError> {
        Ok(Self {
            platform_percent: PlatformPercent::new(platform_percent)?,
            currency,
        })
    }

    /// Merchant share, always `100 - platform_percent`.
    #[must_use]
    pub fn merchant_percent(&self) -> Decimal {
        Decimal::ONE_HUNDRED - self.platform_percent.value()
    }
}

impl TryFrom<&SplitSettings> for SplitConfiguration {
    type Error = SplitError;

    fn try_from(settings: &SplitSettings) -> Result<Self, Self::Error> {
        Self::new(settings.platform_percent, settings.currency)
    }
}

/// Shared handle to the live split configuration.
///
/// Readers take a snapshot per split, so an update only affects splits
/// computed after it. Entries already recorded keep the percentage they
/// were computed with.
#[derive(Debug, Clone)]
pub struct SplitConfigHandle {
    inner: Arc<RwLock<SplitConfiguration>>,
}

impl SplitConfigHandle {
    /// Creates a handle holding `initial`.
    #[must_use]
    pub fn new(initial: SplitConfiguration) -> Self {
        Self {
            inner: Arc::new(RwLock::new(initial)),
        }
    }

    /// Returns a snapshot of the current configuration.
    #[must_use]
    pub fn current(&self) -> SplitConfiguration {
        // The guarded value is plain data; a poisoned lock still holds a
        // fully written configuration.
        *self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replaces the configuration, returning the previous one.
    pub fn replace(&self, next: SplitConfiguration) -> SplitConfiguration {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let previous = std::mem::replace(&mut *guard, next);
        info!(
            previous_percent = %previous.platform_percent,
            platform_percent = %next.platform_percent,
            currency = %next.currency,
            "Split configuration updated"
        );
        previous
    }

    /// Validates and applies a new platform percentage, keeping the currency.
    ///
    /// # Errors
    ///
    /// Returns an error if the percentage is out of range or too precise;
    /// the configuration is left unchanged in that case.
    pub fn set_platform_percent(&self, percent: Decimal) -> Result<SplitConfiguration, SplitError> {
        let platform_percent = PlatformPercent::new(percent)?;
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let previous = guard.platform_percent;
        guard.platform_percent = platform_percent;
        info!(
            previous_percent = %previous,
            platform_percent = %platform_percent,
            "Platform percentage updated"
        );
        Ok(*guard)
    }
}
