// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Household Finance Simulation - Expense Resolver

use crate::catalog::Catalog;
use crate::types::{ExpenseBreakdown, ExpenseLine, ExpensePlan, LifeStage};

/// Price every catalog item the plan owns and total the month's outflow.
///
/// Lines follow catalog order. Items with zero quantity are left off the
/// itemized list; plan keys the catalog does not know are ignored.
pub fn resolve_expenses(catalog: &Catalog, life: &LifeStage, plan: &ExpensePlan) -> ExpenseBreakdown {
    let multiplier = catalog.location_multiplier(life.location);
    let mut lines = Vec::new();
    let mut variable_total = 0.0;

    for item in &catalog.expense_items {
        let Some(entry) = plan.get(&item.key) else { continue };
        if entry.quantity == 0 {
            continue;
        }
        let unit_price = entry.tier.unit_price(item.min_price, item.max_price) * multiplier;
        let cost = unit_price * entry.quantity as f64;
        variable_total += cost;
        lines.push(ExpenseLine {
            key: item.key.clone(),
            label: item.label.clone(),
            quantity: entry.quantity,
            tier: entry.tier,
            unit_price,
            cost,
        });
    }

    let fixed_total = life.fixed_costs();
    ExpenseBreakdown {
        lines,
        variable_total,
        fixed_total,
        total: variable_total + fixed_total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{LocationTier, PriceTier, StabilityTier};

    fn life(location: LocationTier) -> LifeStage {
        LifeStage {
            id: 1,
            age: 30,
            stability: StabilityTier::Medium,
            location,
            dependents: 0,
            monthly_income: 5000.0,
            housing: 1500.0,
            utilities: 200.0,
            starting_cash: 3000.0,
            debts: Vec::new(),
        }
    }

    #[test]
    fn tiers_and_location_scale_prices() {
        let catalog = Catalog::default();
        let mut plan = ExpensePlan::default();
        plan.set("groceries", 2, PriceTier::Low);
        plan.set("phone", 1, PriceTier::High);

        let b = resolve_expenses(&catalog, &life(LocationTier::High), &plan);
        // groceries 320 * 1.35 * 2, phone 85 * 1.35
        let expected = 320.0 * 1.35 * 2.0 + 85.0 * 1.35;
        assert!((b.variable_total - expected).abs() < 1e-9);
        assert_eq!(b.fixed_total, 1700.0);
        assert!((b.total - (expected + 1700.0)).abs() < 1e-9);
        assert_eq!(b.lines.len(), 2);
        assert_eq!(b.lines[0].key, "groceries");
    }

    #[test]
    fn typical_tier_uses_midpoint() {
        let catalog = Catalog::default();
        let mut plan = ExpensePlan::default();
        plan.set("internet", 1, PriceTier::Typical);
        let b = resolve_expenses(&catalog, &life(LocationTier::Mid), &plan);
        assert_eq!(b.lines[0].unit_price, 65.0);
    }

    #[test]
    fn zero_quantity_and_unknown_keys_are_omitted() {
        let catalog = Catalog::default();
        let mut plan = ExpensePlan::default();
        plan.set("gym", 0, PriceTier::High);
        plan.set("yacht", 3, PriceTier::High);
        let b = resolve_expenses(&catalog, &life(LocationTier::Mid), &plan);
        assert!(b.lines.is_empty());
        assert_eq!(b.variable_total, 0.0);
        assert_eq!(b.total, 1700.0);
    }

    #[test]
    fn resolution_is_repeatable() {
        let catalog = Catalog::default();
        let stage = life(LocationTier::Low);
        let mut plan = ExpensePlan::default();
        plan.set("groceries", 1, PriceTier::Typical);
        plan.set("dining", 2, PriceTier::High);
        let before = plan.clone();

        let first = resolve_expenses(&catalog, &stage, &plan);
        let second = resolve_expenses(&catalog, &stage, &plan);
        assert_eq!(first, second);
        assert_eq!(plan, before);
    }
}
