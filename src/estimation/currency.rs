//! Supported currencies, exchange rates, and money formatting.

use std::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::EstimateError;

/// Currency an estimate is priced in.
///
/// ZAR is the base currency: tier base prices and the screen unit price are
/// authored in rand and converted through [`CurrencyCode::rate`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum CurrencyCode {
    #[default]
    Zar,
    Usd,
    Gbp,
}

impl CurrencyCode {
    /// Every supported currency, in display order.
    pub const ALL: [CurrencyCode; 3] = [CurrencyCode::Zar, CurrencyCode::Usd, CurrencyCode::Gbp];

    /// The base currency all exchange rates are relative to.
    pub const BASE: CurrencyCode = CurrencyCode::Zar;

    /// ISO 4217 code.
    pub fn code(&self) -> &'static str {
        match self {
            CurrencyCode::Zar => "ZAR",
            CurrencyCode::Usd => "USD",
            CurrencyCode::Gbp => "GBP",
        }
    }

    /// Display symbol.
    pub fn symbol(&self) -> &'static str {
        match self {
            CurrencyCode::Zar => "R",
            CurrencyCode::Usd => "$",
            CurrencyCode::Gbp => "£",
        }
    }

    /// Units of this currency per unit of the base currency.
    pub fn rate(&self) -> Decimal {
        match self {
            CurrencyCode::Zar => dec!(1),
            CurrencyCode::Usd => dec!(0.1),
            CurrencyCode::Gbp => dec!(0.08),
        }
    }

    /// Convert `amount` of this currency into `to`, rounded to whole units.
    pub fn convert(&self, amount: Decimal, to: CurrencyCode) -> Decimal {
        if *self == to {
            return amount;
        }
        round_whole(amount / self.rate() * to.rate())
    }

    /// Render an amount with the currency symbol and thousands separators.
    ///
    /// Whole amounts print without decimals (`R 30,500`); fractional amounts
    /// keep up to two places (`$12.50`).
    pub fn format(&self, amount: Decimal) -> String {
        let rounded = amount
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
            .normalize();
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };

        let digits = rounded.abs().to_string();
        let (whole, fraction) = match digits.split_once('.') {
            Some((whole, fraction)) => (whole, Some(fraction)),
            None => (digits.as_str(), None),
        };

        let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
        for (i, ch) in whole.chars().enumerate() {
            if i > 0 && (whole.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        if let Some(fraction) = fraction {
            grouped.push('.');
            grouped.push_str(fraction);
            if fraction.len() == 1 {
                grouped.push('0');
            }
        }

        // Rand is conventionally written with a space after the symbol.
        let separator = if *self == CurrencyCode::Zar { " " } else { "" };
        format!("{}{}{}{}", sign, self.symbol(), separator, grouped)
    }
}

/// Round to whole units, halves away from zero.
pub(crate) fn round_whole(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for CurrencyCode {
    type Err = EstimateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ZAR" => Ok(CurrencyCode::Zar),
            "USD" => Ok(CurrencyCode::Usd),
            "GBP" => Ok(CurrencyCode::Gbp),
            _ => Err(EstimateError::InvalidCurrency(s.to_string())),
        }
    }
}
