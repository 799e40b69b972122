//! Store currency and price formatting.
//!
//! The admin picks a single display currency for the whole store, persisted
//! in the `settings/store` Firestore document as either an ISO code
//! ("USD") or a bare symbol ("$"). Unknown values are displayed verbatim so
//! a merchant can configure a currency we have no mapping for.

use core::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// The store display currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Currency(String);

impl Currency {
    /// Parse a currency from a stored setting value.
    ///
    /// Accepts ISO 4217 codes and bare symbols; anything unrecognized is
    /// kept as-is and rendered verbatim.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        Self(value.trim().to_owned())
    }

    /// The symbol used in front of formatted prices.
    #[must_use]
    pub fn symbol(&self) -> &str {
        match self.0.as_str() {
            "USD" | "$" => "$",
            "EUR" | "\u{20ac}" => "\u{20ac}",
            "GBP" | "\u{a3}" => "\u{a3}",
            "INR" | "\u{20b9}" => "\u{20b9}",
            "SAR" | "\u{fdfc}" => "\u{fdfc}",
            other => other,
        }
    }

    /// Format an amount as `{symbol}{amount:.2}`, e.g. `$19.99`.
    ///
    /// Rounds to two decimal places, midpoints away from zero; `{:.2}` on a
    /// `Decimal` alone would truncate.
    #[must_use]
    pub fn format(&self, amount: Decimal) -> String {
        let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        format!("{}{rounded:.2}", self.symbol())
    }
}

impl Default for Currency {
    /// Dollar, the fallback when no store settings exist.
    fn default() -> Self {
        Self("$".to_owned())
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
