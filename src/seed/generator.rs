use chrono::{DateTime, Duration, Months, Utc};
use rand::Rng;
use rust_decimal::Decimal;

use crate::budget::models::BudgetPeriod;
use crate::transaction::models::TransactionType;

pub const MOCK_CATEGORIES: [&str; 5] = [
    "Food",
    "Transportation",
    "Entertainment",
    "Utilities",
    "Shopping",
];
pub const MOCK_TRANSACTION_COUNT: usize = 200;

#[derive(Debug, Clone)]
pub struct MockTransaction {
    pub amount: Decimal,
    pub transaction_type: TransactionType,
    pub category: &'static str,
    pub description: String,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct MockBudget {
    pub category: &'static str,
    pub amount: Decimal,
    pub period: BudgetPeriod,
}

#[derive(Debug, Clone)]
pub struct MockData {
    pub transactions: Vec<MockTransaction>,
    pub budgets: Vec<MockBudget>,
}

/// A year of random transactions ending at `now`, plus one monthly budget per category.
pub fn generate<R: Rng>(rng: &mut R, now: DateTime<Utc>) -> MockData {
    let start = now
        .checked_sub_months(Months::new(12))
        .unwrap_or(now - Duration::days(365));
    let span_ms = (now - start).num_milliseconds().max(1);

    let transactions = (1..=MOCK_TRANSACTION_COUNT)
        .map(|n| MockTransaction {
            amount: Decimal::from(rng.gen_range(1..=1000i64)),
            transaction_type: if rng.gen_bool(0.5) {
                TransactionType::Income
            } else {
                TransactionType::Expense
            },
            category: MOCK_CATEGORIES[rng.gen_range(0..MOCK_CATEGORIES.len())],
            description: format!("Mock transaction {n}"),
            date: start + Duration::milliseconds(rng.gen_range(0..span_ms)),
        })
        .collect();

    let budgets = MOCK_CATEGORIES
        .iter()
        .map(|&category| MockBudget {
            category,
            amount: Decimal::from(rng.gen_range(500..1500i64)),
            period: BudgetPeriod::Monthly,
        })
        .collect();

    MockData {
        transactions,
        budgets,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_counts_and_ranges() {
        let data = generate(&mut StdRng::seed_from_u64(7), now());
        let year_ago = Utc.with_ymd_and_hms(2023, 6, 15, 12, 0, 0).unwrap();

        assert_eq!(data.transactions.len(), MOCK_TRANSACTION_COUNT);
        for t in &data.transactions {
            assert!(t.amount >= Decimal::ONE && t.amount <= Decimal::from(1000));
            assert!(t.date >= year_ago && t.date < now());
            assert!(MOCK_CATEGORIES.contains(&t.category));
        }

        assert_eq!(data.budgets.len(), MOCK_CATEGORIES.len());
        for b in &data.budgets {
            assert!(b.amount >= Decimal::from(500) && b.amount <= Decimal::from(1499));
            assert_eq!(b.period, BudgetPeriod::Monthly);
        }
    }

    #[test]
    fn test_descriptions_are_numbered_from_one() {
        let data = generate(&mut StdRng::seed_from_u64(1), now());
        assert_eq!(data.transactions[0].description, "Mock transaction 1");
        assert_eq!(data.transactions[199].description, "Mock transaction 200");
    }

    #[test]
    fn test_same_seed_same_data() {
        let a = generate(&mut StdRng::seed_from_u64(42), now());
        let b = generate(&mut StdRng::seed_from_u64(42), now());
        let amounts = |d: &MockData| d.transactions.iter().map(|t| t.amount).collect::<Vec<_>>();
        assert_eq!(amounts(&a), amounts(&b));
    }

    #[test]
    fn test_both_types_appear() {
        let data = generate(&mut StdRng::seed_from_u64(3), now());
        let incomes = data
            .transactions
            .iter()
            .filter(|t| t.transaction_type == TransactionType::Income)
            .count();
        assert!(incomes > 0 && incomes < MOCK_TRANSACTION_COUNT);
    }
}
