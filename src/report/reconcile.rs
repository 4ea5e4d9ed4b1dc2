use rust_decimal::Decimal;
use std::collections::HashMap;

use super::models::{BudgetComparison, CategorySpend};
use crate::budget::models::Budget;

/// Merge a user's budgets with per-category expense sums for one month.
///
/// Budgets keep their first-appearance order; two budgets for the same category
/// are summed into one row. Categories with spending but no budget follow in the
/// order of `spend`, with `budgeted = 0`.
pub fn reconcile(budgets: &[Budget], spend: &[CategorySpend]) -> Vec<BudgetComparison> {
    let actuals: HashMap<&str, Decimal> = spend
        .iter()
        .map(|s| (s.category.as_str(), s.total))
        .collect();

    let mut rows: Vec<BudgetComparison> = Vec::with_capacity(budgets.len() + spend.len());
    let mut index: HashMap<&str, usize> = HashMap::new();

    for budget in budgets {
        match index.get(budget.category.as_str()) {
            Some(&i) => {
                let row = &mut rows[i];
                row.budgeted += budget.amount;
                row.difference = row.budgeted - row.actual;
            }
            None => {
                let actual = actuals
                    .get(budget.category.as_str())
                    .copied()
                    .unwrap_or(Decimal::ZERO);
                index.insert(budget.category.as_str(), rows.len());
                rows.push(BudgetComparison {
                    category: budget.category.clone(),
                    budgeted: budget.amount,
                    actual,
                    difference: budget.amount - actual,
                });
            }
        }
    }

    for s in spend {
        if index.contains_key(s.category.as_str()) {
            continue;
        }
        index.insert(s.category.as_str(), rows.len());
        rows.push(BudgetComparison {
            category: s.category.clone(),
            budgeted: Decimal::ZERO,
            actual: s.total,
            difference: -s.total,
        });
    }

    rows
}
