use rust_decimal::{Decimal, RoundingStrategy};

/// Fractional digits carried by every monetary amount.
pub const DECIMALS: u32 = 2;

/// Round to currency precision with round-half-to-even.
pub fn round(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMALS, RoundingStrategy::MidpointNearestEven)
}

/// Whether a value is already representable at currency precision.
pub fn is_canonical(value: Decimal) -> bool {
    round(value) == value
}

/// Round and rescale so stored amounts always display with two
/// fractional digits ("900.00", never "900").
pub fn canonical(value: Decimal) -> Decimal {
    let mut rounded = round(value);
    rounded.rescale(DECIMALS);
    rounded
}

/// Parse a decimal amount, rejecting anything finer than currency
/// precision.
pub fn parse(s: &str) -> Option<Decimal> {
    let value: Decimal = s.trim().parse().ok()?;
    if !is_canonical(value) {
        return None;
    }
    Some(canonical(value))
}
