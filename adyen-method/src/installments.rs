//! Installment options for card payments.

use adyen_types::{Currency, InstallmentsConfig};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

/// Rule card type matching every card.
pub const ALL_CARD_TYPES: &str = "all";

/// One selectable installment plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InstallmentOption {
    pub count: u32,
    /// Amount charged per installment, in the order currency.
    pub amount: Decimal,
}

/// Highest installment count the rules allow for this card and total.
///
/// A rule applies when its card type matches (or is `all`) and the total
/// reaches its minimum amount.
pub fn max_installments(
    config: &InstallmentsConfig,
    cc_type: Option<&str>,
    grand_total: Decimal,
) -> Option<u32> {
    if !config.enabled {
        return None;
    }
    config
        .rules
        .iter()
        .filter(|rule| {
            rule.cc_type.eq_ignore_ascii_case(ALL_CARD_TYPES)
                || cc_type.is_some_and(|t| rule.cc_type.eq_ignore_ascii_case(t))
        })
        .filter(|rule| grand_total >= rule.minimum_amount)
        .map(|rule| rule.max_installments)
        .max()
        .filter(|max| *max > 0)
}

/// Lists the plans from a single payment up to the allowed maximum.
pub fn possible_installments(
    config: &InstallmentsConfig,
    cc_type: Option<&str>,
    grand_total: Decimal,
    currency: &Currency,
) -> Vec<InstallmentOption> {
    let Some(max) = max_installments(config, cc_type, grand_total) else {
        return Vec::new();
    };
    (1..=max)
        .map(|count| InstallmentOption {
            count,
            amount: (grand_total / Decimal::from(count)).round_dp_with_strategy(
                currency.decimals(),
                RoundingStrategy::MidpointAwayFromZero,
            ),
        })
        .collect()
}
