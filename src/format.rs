//! Currency display for calculator output.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::Market;

/// Renders raw amounts for a market.
pub trait CurrencyFormatter {
    fn format(&self, amount: Decimal, market: Market) -> String;
}

/// Symbol prefix, thousands separators, two decimals.
pub struct MarketCurrencyFormatter;

impl CurrencyFormatter for MarketCurrencyFormatter {
    fn format(&self, amount: Decimal, market: Market) -> String {
        let symbol = market.rule().currency_symbol;
        let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        let sign = if rounded < Decimal::ZERO { "-" } else { "" };

        let digits = format!("{:.2}", rounded.abs());
        let (whole, cents) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

        // "RM 10.00" but "S$10.00"
        let gap = if symbol.ends_with(|c: char| c.is_ascii_alphabetic()) {
            " "
        } else {
            ""
        };

        format!("{}{}{}{}.{}", sign, symbol, gap, group_thousands(whole), cents)
    }
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn fmt(amount: Decimal, market: Market) -> String {
        MarketCurrencyFormatter.format(amount, market)
    }

    #[test]
    fn test_symbols_and_spacing() {
        assert_eq!(fmt(dec!(2000), Market::My), "RM 2,000.00");
        assert_eq!(fmt(dec!(1000), Market::Us), "$1,000.00");
        assert_eq!(fmt(dec!(12.5), Market::Hk), "HK$12.50");
        assert_eq!(fmt(dec!(3.2), Market::Sg), "S$3.20");
        assert_eq!(fmt(dec!(88), Market::Cn), "¥88.00");
    }

    #[test]
    fn test_grouping() {
        assert_eq!(fmt(dec!(0), Market::Us), "$0.00");
        assert_eq!(fmt(dec!(999.99), Market::Us), "$999.99");
        assert_eq!(fmt(dec!(1234567.891), Market::Us), "$1,234,567.89");
        assert_eq!(fmt(dec!(100000), Market::Us), "$100,000.00");
    }

    #[test]
    fn test_rounding_and_sign() {
        assert_eq!(fmt(dec!(0.005), Market::Us), "$0.01");
        assert_eq!(fmt(dec!(-1500.5), Market::My), "-RM 1,500.50");
        assert_eq!(fmt(dec!(-0.001), Market::Us), "$0.00");
    }
}
