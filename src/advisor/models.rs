use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

pub const DEFAULT_LOOKBACK_DAYS: i64 = 30;

/// Query parameters for anomaly detection
#[derive(Debug, Deserialize, Validate, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct AnomalyQuery {
    /// Days of history to analyze (default 30)
    #[validate(range(min = 1, max = 3650, message = "lookbackDays must be between 1 and 3650"))]
    #[param(example = 30)]
    pub lookback_days: Option<i64>,
}

impl AnomalyQuery {
    pub fn days(&self) -> i64 {
        self.lookback_days.unwrap_or(DEFAULT_LOOKBACK_DAYS)
    }
}

// Snapshots: the aggregated numbers each prompt is built from.

/// Current-month figures behind the free-text insights
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InsightsSnapshot {
    #[schema(example = 3200.00)]
    pub income: Decimal,
    #[schema(example = 2100.00)]
    pub expenses: Decimal,
    /// income - expenses
    #[schema(example = 1100.00)]
    pub savings: Decimal,
    pub top_expense_categories: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditSnapshot {
    pub income: Decimal,
    pub expenses: Decimal,
    pub savings: Decimal,
    pub debt_to_income_ratio: Decimal,
    pub payment_history: String,
    pub credit_utilization: u32,
    pub credit_history_length: u32,
}

impl CreditSnapshot {
    /// Placeholder credit history until a bureau integration exists.
    pub fn new(income: Decimal, expenses: Decimal, debt_payments: Decimal) -> Self {
        Self {
            income,
            expenses,
            savings: income - expenses,
            debt_to_income_ratio: debt_to_income(debt_payments, income),
            payment_history: "Good".to_string(),
            credit_utilization: 30,
            credit_history_length: 5,
        }
    }
}

/// `debt / income` to two places; zero when there is no income.
pub fn debt_to_income(debt_payments: Decimal, income: Decimal) -> Decimal {
    if income.is_zero() {
        return Decimal::ZERO;
    }
    (debt_payments / income).round_dp(2)
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalsSnapshot {
    pub income: Decimal,
    pub expenses: Decimal,
    pub savings: Decimal,
    pub debt_to_income_ratio: Decimal,
    pub credit_score: u16,
    pub top_expense_categories: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentSnapshot {
    pub income: Decimal,
    pub expenses: Decimal,
    pub savings: Decimal,
    pub debt_to_income_ratio: Decimal,
    pub credit_score: u16,
    pub risk_tolerance: String,
    pub investment_horizon: u32,
    pub investment_goals: Vec<String>,
    pub current_investments: Vec<String>,
}

impl InvestmentSnapshot {
    /// Placeholder investor profile until users can store one.
    pub fn from_goals(goals: GoalsSnapshot) -> Self {
        Self {
            income: goals.income,
            expenses: goals.expenses,
            savings: goals.savings,
            debt_to_income_ratio: goals.debt_to_income_ratio,
            credit_score: goals.credit_score,
            risk_tolerance: "Moderate".to_string(),
            investment_horizon: 10,
            investment_goals: vec!["Retirement".to_string(), "Wealth Accumulation".to_string()],
            current_investments: vec!["Stocks".to_string(), "Bonds".to_string()],
        }
    }
}

/// One transaction as shown to the anomaly detector
#[derive(Debug, Clone)]
pub struct TransactionLine {
    pub date: DateTime<Utc>,
    pub transaction_type: String,
    pub amount: Decimal,
    pub category: String,
}

// Advice shapes: what the model must send back.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl<'de> Deserialize<'de> for RiskLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        match raw.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(RiskLevel::Low),
            "medium" => Ok(RiskLevel::Medium),
            "high" => Ok(RiskLevel::High),
            _ => Err(serde::de::Error::custom(format!("unknown risk level: {raw}"))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Anomaly {
    #[schema(example = "2024-01-15T03:12:00.000Z")]
    pub date: String,
    /// Usually a sentence, sometimes a structured object
    #[schema(value_type = Object)]
    pub details: Value,
    pub explanation: String,
    pub risk_level: RiskLevel,
    pub recommendation: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AnomalyReport {
    pub anomalies: Vec<Anomaly>,
    #[schema(example = "Fraud and anomaly detection completed.")]
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreditScoreAdvice {
    #[serde(deserialize_with = "deserialize_score")]
    #[schema(minimum = 300, maximum = 850, example = 720)]
    pub score: u16,
    #[schema(example = "Good")]
    pub assessment: String,
    #[schema(value_type = Object)]
    pub factors: Value,
    #[schema(value_type = Object)]
    pub recommendations: Value,
}

pub const MIN_CREDIT_SCORE: u16 = 300;
pub const MAX_CREDIT_SCORE: u16 = 850;

/// Any JSON number, rounded, inside 300..=850.
fn deserialize_score<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u16, D::Error> {
    let raw = f64::deserialize(deserializer)?;
    let rounded = raw.round();
    if !(f64::from(MIN_CREDIT_SCORE)..=f64::from(MAX_CREDIT_SCORE)).contains(&rounded) {
        return Err(serde::de::Error::custom(format!(
            "credit score {raw} outside {MIN_CREDIT_SCORE}-{MAX_CREDIT_SCORE}"
        )));
    }
    Ok(rounded as u16)
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FinancialGoals {
    #[schema(value_type = Vec<Object>)]
    pub short_term_goals: Vec<Map<String, Value>>,
    #[schema(value_type = Vec<Object>)]
    pub medium_term_goals: Vec<Map<String, Value>>,
    #[schema(value_type = Vec<Object>)]
    pub long_term_goals: Vec<Map<String, Value>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentPlan {
    #[schema(value_type = Object)]
    pub asset_allocation: Value,
    #[schema(value_type = Object)]
    pub recommended_investments: Value,
    #[schema(value_type = Object)]
    pub estimated_returns: Value,
    #[schema(value_type = Object)]
    pub diversification_strategy: Value,
    #[schema(value_type = Object)]
    pub monitoring_strategy: Value,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InsightsResponse {
    pub financial_summary: InsightsSnapshot,
    /// Bullet-point prose from the model
    pub ai_advice: String,
}

/// The five things the advisor can be asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdviceKind {
    Insights,
    CreditScore,
    Goals,
    Investments,
    Anomalies,
}

impl AdviceKind {
    /// Message used as the `error` of a failed call.
    pub fn failure_context(&self) -> &'static str {
        match self {
            AdviceKind::Insights => "Failed to generate AI insights",
            AdviceKind::CreditScore => "An error occurred while generating the credit score.",
            AdviceKind::Goals => "An error occurred while generating financial goals.",
            AdviceKind::Investments => {
                "An error occurred while generating investment recommendations."
            }
            AdviceKind::Anomalies => "An error occurred during anomaly detection.",
        }
    }
}

/// Decoded model reply.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Advice {
    Insights(String),
    CreditScore(CreditScoreAdvice),
    Goals(FinancialGoals),
    Investments(InvestmentPlan),
    Anomalies(Vec<Anomaly>),
}

impl Advice {
    pub fn kind(&self) -> AdviceKind {
        match self {
            Advice::Insights(_) => AdviceKind::Insights,
            Advice::CreditScore(_) => AdviceKind::CreditScore,
            Advice::Goals(_) => AdviceKind::Goals,
            Advice::Investments(_) => AdviceKind::Investments,
            Advice::Anomalies(_) => AdviceKind::Anomalies,
        }
    }
}

/// What to ask the model, with the data to ask it about.
#[derive(Debug, Clone)]
pub enum AdviceRequest {
    Insights(InsightsSnapshot),
    CreditScore(CreditSnapshot),
    Goals(GoalsSnapshot),
    Investments(InvestmentSnapshot),
    Anomalies(Vec<TransactionLine>),
}

impl AdviceRequest {
    pub fn kind(&self) -> AdviceKind {
        match self {
            AdviceRequest::Insights(_) => AdviceKind::Insights,
            AdviceRequest::CreditScore(_) => AdviceKind::CreditScore,
            AdviceRequest::Goals(_) => AdviceKind::Goals,
            AdviceRequest::Investments(_) => AdviceKind::Investments,
            AdviceRequest::Anomalies(_) => AdviceKind::Anomalies,
        }
    }
}
