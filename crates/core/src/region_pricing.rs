//! Multi-region subscription pricing.
//!
//! A user's main subscription can be extended with per-region add-ons.
//! Every region add-on is discounted by a single tiered percentage chosen
//! from the total number of regions the user subscribes to.

use serde::Serialize;

use crate::error::CoreError;
use crate::types::{Cents, DbId, Percent};

/// One discount tier: `discount_percent` applies from `min_regions` up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscountTier {
    pub min_regions: i32,
    pub discount_percent: Percent,
    pub is_active: bool,
}

/// A region plan price entering a quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionPrice {
    pub region_plan_id: DbId,
    pub price_cents: Cents,
}

/// One priced line of a quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuoteLine {
    pub region_plan_id: DbId,
    pub price_cents: Cents,
    pub discounted_cents: Cents,
}

/// A complete multi-region quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionQuote {
    pub region_count: i32,
    pub discount_percent: Percent,
    pub lines: Vec<QuoteLine>,
    pub subtotal_cents: Cents,
    pub discount_cents: Cents,
    pub total_cents: Cents,
}

/// Validate a tier definition.
pub fn validate_tier(min_regions: i32, discount_percent: Percent) -> Result<(), CoreError> {
    if min_regions < 1 {
        return Err(CoreError::Validation(format!(
            "min_regions must be at least 1, got {min_regions}"
        )));
    }
    if !(0..=100).contains(&discount_percent) {
        return Err(CoreError::Validation(format!(
            "discount_percent must be between 0 and 100, got {discount_percent}"
        )));
    }
    Ok(())
}

/// Pick the discount for a region count: the active tier with the largest
/// `min_regions` not exceeding `region_count`, or 0 when none applies.
pub fn discount_for_region_count(tiers: &[DiscountTier], region_count: i32) -> Percent {
    tiers
        .iter()
        .filter(|t| t.is_active && t.min_regions <= region_count)
        .max_by_key(|t| t.min_regions)
        .map(|t| t.discount_percent)
        .unwrap_or(0)
}

/// Apply a percentage discount, rounding half up to the minor unit.
pub fn apply_discount(price_cents: Cents, discount_percent: Percent) -> Cents {
    let keep = i64::from(100 - discount_percent.clamp(0, 100));
    (price_cents * keep + 50).div_euclid(100)
}

/// Price a set of region plans together.
pub fn quote(prices: &[RegionPrice], tiers: &[DiscountTier]) -> RegionQuote {
    let region_count = prices.len() as i32;
    let discount_percent = discount_for_region_count(tiers, region_count);

    let lines: Vec<QuoteLine> = prices
        .iter()
        .map(|p| QuoteLine {
            region_plan_id: p.region_plan_id,
            price_cents: p.price_cents,
            discounted_cents: apply_discount(p.price_cents, discount_percent),
        })
        .collect();

    let subtotal_cents: Cents = lines.iter().map(|l| l.price_cents).sum();
    let total_cents: Cents = lines.iter().map(|l| l.discounted_cents).sum();

    RegionQuote {
        region_count,
        discount_percent,
        lines,
        subtotal_cents,
        discount_cents: subtotal_cents - total_cents,
        total_cents,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tier(min_regions: i32, discount_percent: Percent, is_active: bool) -> DiscountTier {
        DiscountTier {
            min_regions,
            discount_percent,
            is_active,
        }
    }

    fn price(region_plan_id: DbId, price_cents: Cents) -> RegionPrice {
        RegionPrice {
            region_plan_id,
            price_cents,
        }
    }

    fn tiers() -> Vec<DiscountTier> {
        vec![
            tier(2, 10, true),
            tier(3, 15, true),
            tier(5, 25, true),
            tier(4, 50, false),
        ]
    }

    #[test]
    fn tier_selection() {
        let tiers = tiers();
        assert_eq!(discount_for_region_count(&tiers, 0), 0);
        assert_eq!(discount_for_region_count(&tiers, 1), 0);
        assert_eq!(discount_for_region_count(&tiers, 2), 10);
        assert_eq!(discount_for_region_count(&tiers, 3), 15);
        // Inactive 4-region tier is skipped.
        assert_eq!(discount_for_region_count(&tiers, 4), 15);
        assert_eq!(discount_for_region_count(&tiers, 12), 25);
        assert_eq!(discount_for_region_count(&[], 12), 0);
    }

    #[test]
    fn rounding_half_up() {
        assert_eq!(apply_discount(1000, 10), 900);
        assert_eq!(apply_discount(999, 15), 849); // 849.15
        assert_eq!(apply_discount(1, 50), 1); // 0.5 rounds up
        assert_eq!(apply_discount(1999, 0), 1999);
        assert_eq!(apply_discount(1999, 100), 0);
    }

    #[test]
    fn quote_totals() {
        let prices = [price(1, 1000), price(2, 2000), price(3, 1500)];
        let q = quote(&prices, &tiers());
        assert_eq!(q.region_count, 3);
        assert_eq!(q.discount_percent, 15);
        assert_eq!(q.subtotal_cents, 4500);
        assert_eq!(q.total_cents, 850 + 1700 + 1275);
        assert_eq!(q.discount_cents, 4500 - q.total_cents);
    }

    #[test]
    fn tier_validation() {
        assert!(validate_tier(1, 0).is_ok());
        assert!(validate_tier(0, 10).is_err());
        assert!(validate_tier(2, 101).is_err());
        assert!(validate_tier(2, -1).is_err());
    }
}
