//! Fare rules applied to estimated trip durations.

/// Rate used by [`PerMinutePricing::default`], in currency units per minute.
pub const DEFAULT_RATE_PER_MINUTE: f64 = 0.5;

/// Derive a fare from a trip's estimated duration.
///
/// Implementations must be `Send + Sync` so an estimator can be shared
/// between tasks.
pub trait PricingStrategy: Send + Sync {
    /// Fare for a trip lasting `estimated_minutes`.
    fn price(&self, estimated_minutes: f64) -> f64;
}

/// Linear fare: `estimated_minutes * rate_per_minute`.
///
/// # Examples
/// ```
/// use ride_core::{format_price, PerMinutePricing, PricingStrategy};
///
/// let pricing = PerMinutePricing::default();
/// assert_eq!(format_price(pricing.price(20.0)), "10.00");
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerMinutePricing {
    /// Currency units charged per minute of travel.
    pub rate_per_minute: f64,
}

impl PerMinutePricing {
    /// Pricing at `rate_per_minute`.
    #[must_use]
    pub const fn new(rate_per_minute: f64) -> Self {
        Self { rate_per_minute }
    }
}

impl Default for PerMinutePricing {
    fn default() -> Self {
        Self::new(DEFAULT_RATE_PER_MINUTE)
    }
}

impl PricingStrategy for PerMinutePricing {
    #[expect(clippy::float_arithmetic, reason = "fares scale with minutes")]
    fn price(&self, estimated_minutes: f64) -> f64 {
        estimated_minutes * self.rate_per_minute
    }
}

/// Render `amount` with exactly two decimal places.
#[must_use]
pub fn format_price(amount: f64) -> String {
    format!("{amount:.2}")
}
