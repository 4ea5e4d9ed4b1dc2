use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

use super::client::TextGenerator;
use super::models::{
    Advice, AdviceKind, AdviceRequest, CreditSnapshot, GoalsSnapshot, InsightsSnapshot,
    InvestmentSnapshot, TransactionLine,
};
use super::repair::{parse_model_json, JsonShape};
use crate::dates::DateRange;
use crate::errors::AppError;
use crate::report::service::ReportService;
use crate::transaction::models::TransactionType;
use crate::transaction::service::TransactionService;

pub const TOP_CATEGORY_COUNT: i64 = 3;
pub const SAVINGS_CATEGORY: &str = "Savings";
pub const DEBT_PAYMENT_CATEGORY: &str = "Debt Payment";

/// Turn raw model text into the advice shape `kind` expects.
pub fn decode(kind: AdviceKind, raw: &str) -> Result<Advice, AppError> {
    let fail = |detail: String| AppError::upstream(kind.failure_context(), detail);
    let json = |shape: JsonShape| parse_model_json(raw, shape).map_err(|e| fail(e.to_string()));

    let advice = match kind {
        AdviceKind::Insights => return Ok(Advice::Insights(raw.trim().to_string())),
        AdviceKind::CreditScore => typed(json(JsonShape::Object)?).map(Advice::CreditScore),
        AdviceKind::Goals => typed(json(JsonShape::Object)?).map(Advice::Goals),
        AdviceKind::Investments => typed(json(JsonShape::Object)?).map(Advice::Investments),
        AdviceKind::Anomalies => typed(json(JsonShape::Array)?).map(Advice::Anomalies),
    };

    advice.map_err(fail)
}

fn typed<T: DeserializeOwned>(value: serde_json::Value) -> Result<T, String> {
    serde_json::from_value(value)
        .map_err(|e| format!("AI response is not in the expected format: {e}"))
}

/// Orchestrates snapshot gathering and model calls for the advice endpoints.
pub struct AdvisorService;

impl AdvisorService {
    /// One model round trip: prompt, generate, repair, decode.
    pub async fn advise<G: TextGenerator>(
        generator: &G,
        request: &AdviceRequest,
    ) -> Result<Advice, AppError> {
        let kind = request.kind();
        let raw = generator.generate(&request.prompt()).await.map_err(|e| {
            warn!(?kind, error = %e, "Model call failed");
            AppError::upstream(kind.failure_context(), e)
        })?;

        decode(kind, &raw)
    }

    /// This month's totals and its three biggest expense categories.
    pub async fn insights_snapshot(
        pool: &PgPool,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<InsightsSnapshot, AppError> {
        let month = DateRange::current_month(now);

        let income =
            ReportService::total_by_type(pool, user_id, TransactionType::Income, Some(&month));
        let expenses =
            ReportService::total_by_type(pool, user_id, TransactionType::Expense, Some(&month));
        let top =
            ReportService::top_expense_categories(pool, user_id, TOP_CATEGORY_COUNT, Some(&month));

        let (income, expenses, top) = futures::try_join!(income, expenses, top)?;

        Ok(InsightsSnapshot {
            income,
            expenses,
            savings: income - expenses,
            top_expense_categories: top.into_iter().map(|c| c.category).collect(),
        })
    }

    /// All-time totals plus debt payments.
    pub async fn credit_snapshot(
        pool: &PgPool,
        user_id: Uuid,
    ) -> Result<CreditSnapshot, AppError> {
        let income = ReportService::total_by_type(pool, user_id, TransactionType::Income, None);
        let expenses = ReportService::total_by_type(pool, user_id, TransactionType::Expense, None);
        let debt = ReportService::total_by_category(pool, user_id, DEBT_PAYMENT_CATEGORY, None);

        let (income, expenses, debt) = futures::try_join!(income, expenses, debt)?;

        Ok(CreditSnapshot::new(income, expenses, debt))
    }

    /// All-time totals, the "Savings" category and a freshly generated credit score.
    pub async fn goals_snapshot<G: TextGenerator>(
        pool: &PgPool,
        generator: &G,
        user_id: Uuid,
    ) -> Result<GoalsSnapshot, AppError> {
        let credit = Self::credit_snapshot(pool, user_id);
        let savings = ReportService::total_by_category(pool, user_id, SAVINGS_CATEGORY, None);
        let top = ReportService::top_expense_categories(pool, user_id, TOP_CATEGORY_COUNT, None);

        let (credit, savings, top) = futures::try_join!(credit, savings, top)?;

        let request = AdviceRequest::CreditScore(credit.clone());
        let credit_score = match Self::advise(generator, &request).await? {
            Advice::CreditScore(advice) => advice.score,
            other => {
                return Err(AppError::Internal(format!(
                    "Expected a credit score, got {:?}",
                    other.kind()
                )))
            }
        };

        Ok(GoalsSnapshot {
            income: credit.income,
            expenses: credit.expenses,
            savings,
            // TODO: use credit.debt_to_income_ratio once debt payments are tracked as their own type
            debt_to_income_ratio: Decimal::ZERO,
            credit_score,
            top_expense_categories: top.into_iter().map(|c| c.category).collect(),
        })
    }

    pub async fn investment_snapshot<G: TextGenerator>(
        pool: &PgPool,
        generator: &G,
        user_id: Uuid,
    ) -> Result<InvestmentSnapshot, AppError> {
        let goals = Self::goals_snapshot(pool, generator, user_id).await?;
        Ok(InvestmentSnapshot::from_goals(goals))
    }

    /// Transactions of the last `days` days, newest first.
    pub async fn recent_transactions(
        pool: &PgPool,
        user_id: Uuid,
        days: i64,
        now: DateTime<Utc>,
    ) -> Result<Vec<TransactionLine>, AppError> {
        let range = DateRange::lookback(now, days);
        let transactions = TransactionService::list_in_range(pool, user_id, &range).await?;

        Ok(transactions
            .into_iter()
            .map(|t| TransactionLine {
                date: t.transaction_date,
                transaction_type: t.transaction_type,
                amount: t.amount,
                category: t.category,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisor::client::GenerateError;
    use crate::advisor::models::RiskLevel;
    use std::sync::Mutex;

    /// Replays a canned reply and remembers the prompt it was given.
    struct Canned {
        reply: Result<&'static str, ()>,
        last_prompt: Mutex<Option<String>>,
    }

    impl Canned {
        fn ok(reply: &'static str) -> Self {
            Self {
                reply: Ok(reply),
                last_prompt: Mutex::new(None),
            }
        }

        fn failing() -> Self {
            Self {
                reply: Err(()),
                last_prompt: Mutex::new(None),
            }
        }
    }

    impl TextGenerator for Canned {
        async fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
            *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
            self.reply
                .map(str::to_string)
                .map_err(|_| GenerateError::Empty)
        }
    }

    fn credit_request() -> AdviceRequest {
        AdviceRequest::CreditScore(CreditSnapshot::new(
            Decimal::from(4000),
            Decimal::from(2500),
            Decimal::from(400),
        ))
    }

    #[actix_rt::test]
    async fn test_credit_score_from_fenced_reply() {
        let generator = Canned::ok(
            "```json\n{'score': 712, 'assessment': 'Good', 'factors': ['Low debt',], 'recommendations': ['Pay on time'],}\n```",
        );

        let advice = AdvisorService::advise(&generator, &credit_request()).await.unwrap();
        match advice {
            Advice::CreditScore(c) => {
                assert_eq!(c.score, 712);
                assert_eq!(c.assessment, "Good");
            }
            other => panic!("unexpected advice: {other:?}"),
        }

        let prompt = generator.last_prompt.lock().unwrap().clone().unwrap();
        assert!(prompt.contains("Debt-to-Income Ratio: 0.1"));
    }

    #[actix_rt::test]
    async fn test_generator_failure_is_upstream_error() {
        let err = AdvisorService::advise(&Canned::failing(), &credit_request())
            .await
            .unwrap_err();
        match err {
            AppError::Upstream { context, .. } => {
                assert_eq!(context, AdviceKind::CreditScore.failure_context())
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[actix_rt::test]
    async fn test_insights_are_prose() {
        let generator = Canned::ok("- Spend less on takeout\n- Automate savings\n");
        let request = AdviceRequest::Insights(InsightsSnapshot {
            income: Decimal::from(100),
            expenses: Decimal::from(50),
            savings: Decimal::from(50),
            top_expense_categories: vec!["Food".into()],
        });

        let advice = AdvisorService::advise(&generator, &request).await.unwrap();
        assert!(matches!(
            advice,
            Advice::Insights(ref text) if text == "- Spend less on takeout\n- Automate savings"
        ));
    }

    #[test]
    fn test_anomalies_recovered_from_prose() {
        let raw = "I found one issue:\n[{\"date\": \"2024-03-01\", \"details\": \"expense $950 - Shopping\", \"explanation\": \"Far above average\", \"riskLevel\": \"MEDIUM\", \"recommendation\": \"Verify it\"}]";
        match decode(AdviceKind::Anomalies, raw).unwrap() {
            Advice::Anomalies(list) => {
                assert_eq!(list.len(), 1);
                assert_eq!(list[0].risk_level, RiskLevel::Medium);
            }
            other => panic!("unexpected advice: {other:?}"),
        }
    }

    #[test]
    fn test_anomalies_must_be_an_array() {
        let err = decode(AdviceKind::Anomalies, "{\"anomalies\": []}").unwrap_err();
        assert!(matches!(err, AppError::Upstream { .. }));
    }

    #[test]
    fn test_empty_anomaly_list_is_fine() {
        let advice = decode(AdviceKind::Anomalies, "[]").unwrap();
        assert!(matches!(advice, Advice::Anomalies(ref list) if list.is_empty()));
    }

    #[test]
    fn test_investments_require_all_sections() {
        let partial = r#"{"assetAllocation": {"stocks": 60}, "recommendedInvestments": []}"#;
        assert!(decode(AdviceKind::Investments, partial).is_err());

        let full = r#"{
            "assetAllocation": {"stocks": 60, "bonds": 40},
            "recommendedInvestments": ["Index funds"],
            "estimatedReturns": "5-7% annually",
            "diversificationStrategy": "Spread across regions",
            "monitoringStrategy": "Rebalance yearly"
        }"#;
        assert!(matches!(
            decode(AdviceKind::Investments, full).unwrap(),
            Advice::Investments(_)
        ));
    }

    #[test]
    fn test_out_of_range_score_is_rejected() {
        let raw = r#"{"score": 120, "assessment": "Poor", "factors": [], "recommendations": []}"#;
        let err = decode(AdviceKind::CreditScore, raw).unwrap_err();
        match err {
            AppError::Upstream { detail, .. } => assert!(detail.contains("outside 300-850")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
