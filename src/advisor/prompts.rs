use chrono::SecondsFormat;

use super::models::{
    AdviceRequest, CreditSnapshot, GoalsSnapshot, InsightsSnapshot, InvestmentSnapshot,
    TransactionLine,
};

const JSON_ONLY: &str = "Do not include any markdown formatting or additional text outside of the JSON structure.";
const DOUBLE_QUOTES: &str = "Ensure all JSON property names and string values are enclosed in double quotes. Do not use single quotes for strings.";

impl AdviceRequest {
    pub fn prompt(&self) -> String {
        match self {
            AdviceRequest::Insights(s) => insights_prompt(s),
            AdviceRequest::CreditScore(s) => credit_score_prompt(s),
            AdviceRequest::Goals(s) => goals_prompt(s),
            AdviceRequest::Investments(s) => investment_prompt(s),
            AdviceRequest::Anomalies(lines) => anomaly_prompt(lines),
        }
    }
}

fn insights_prompt(s: &InsightsSnapshot) -> String {
    format!(
        r#"As an AI financial advisor, provide personalized advice based on the following financial data:

Monthly Income: ${income}
Monthly Expenses: ${expenses}
Savings: ${savings}
Top Expense Categories: {top}

Please provide advice on:
1. Budgeting strategies
2. Saving opportunities
3. Potential areas to reduce expenses
4. Investment suggestions (if applicable)
5. General financial health assessment

Format the response in clear, concise bullet points."#,
        income = s.income,
        expenses = s.expenses,
        savings = s.savings,
        top = s.top_expense_categories.join(", "),
    )
}

fn credit_score_prompt(s: &CreditSnapshot) -> String {
    format!(
        r#"As an AI credit scoring system, analyze the following financial data and provide a credit score and assessment:

Monthly Income: ${income}
Monthly Expenses: ${expenses}
Savings: ${savings}
Debt-to-Income Ratio: {dti}
Payment History: {history} (e.g., "Excellent", "Good", "Fair", "Poor")
Credit Utilization: {utilization}%
Length of Credit History: {length} years

Please provide:
1. A credit score between 300 and 850
2. An assessment of the credit score (e.g., Excellent, Good, Fair, Poor)
3. Key factors influencing the score
4. Recommendations for improving the credit score

Format the response as a JSON object with the fields: score, assessment, factors, and recommendations.
{JSON_ONLY}"#,
        income = s.income,
        expenses = s.expenses,
        savings = s.savings,
        dti = s.debt_to_income_ratio,
        history = s.payment_history,
        utilization = s.credit_utilization,
        length = s.credit_history_length,
    )
}

fn goals_prompt(s: &GoalsSnapshot) -> String {
    format!(
        r#"As an AI financial advisor, analyze the following financial data and suggest personalized financial goals:

Monthly Income: ${income}
Monthly Expenses: ${expenses}
Current Savings: ${savings}
Debt-to-Income Ratio: {dti}
Credit Score: {score}
Top Expense Categories: {top}

Based on this information, please suggest:
1. Short-term goals (achievable within 3-6 months)
2. Medium-term goals (achievable within 1-2 years)
3. Long-term goals (achievable in 3-5 years or more)

For each goal, provide:
1. A clear description of the goal
2. The timeframe for achieving the goal
3. Specific steps or strategies to reach the goal
4. Potential challenges and how to overcome them

Format the response as a JSON object with the fields: shortTermGoals, mediumTermGoals, and longTermGoals. Each of these should be an array of goal objects.
{JSON_ONLY}"#,
        income = s.income,
        expenses = s.expenses,
        savings = s.savings,
        dti = s.debt_to_income_ratio,
        score = s.credit_score,
        top = s.top_expense_categories.join(", "),
    )
}

fn investment_prompt(s: &InvestmentSnapshot) -> String {
    format!(
        r#"As an AI financial advisor, provide personalized investment recommendations based on the following user data:

Monthly Income: ${income}
Monthly Expenses: ${expenses}
Current Savings: ${savings}
Debt-to-Income Ratio: {dti}
Credit Score: {score}
Risk Tolerance: {risk}
Investment Horizon: {horizon} years
Investment Goals: {goals}
Current Investments: {current}

Based on this information, please provide:
1. Asset allocation recommendation (e.g., stocks, bonds, real estate, cash)
2. Specific investment vehicles or products to consider
3. Estimated returns and associated risks
4. Diversification strategies
5. Recommendations for rebalancing and monitoring the portfolio

For each recommendation, include:
1. A clear description of the investment strategy
2. The rationale behind the recommendation
3. Potential risks and how to mitigate them
4. Any tax implications to consider

Format the response as a JSON object with the fields: assetAllocation, recommendedInvestments, estimatedReturns, diversificationStrategy, and monitoringStrategy.
{DOUBLE_QUOTES}
{JSON_ONLY}"#,
        income = s.income,
        expenses = s.expenses,
        savings = s.savings,
        dti = s.debt_to_income_ratio,
        score = s.credit_score,
        risk = s.risk_tolerance,
        horizon = s.investment_horizon,
        goals = s.investment_goals.join(", "),
        current = s.current_investments.join(", "),
    )
}

/// `2024-01-15T03:12:00.000Z: expense $950.00 - Shopping`
pub fn transaction_line(line: &TransactionLine) -> String {
    format!(
        "{}: {} ${} - {}",
        line.date.to_rfc3339_opts(SecondsFormat::Millis, true),
        line.transaction_type,
        line.amount,
        line.category
    )
}

fn anomaly_prompt(lines: &[TransactionLine]) -> String {
    let history = lines
        .iter()
        .map(transaction_line)
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"Analyze the following transaction history for any unusual patterns or potential fraudulent activities:

{history}

Please identify any anomalies or suspicious transactions, considering factors such as:
1. Unusually large transactions
2. Frequent small transactions from the same category
3. Transactions at odd hours
4. Sudden changes in spending patterns
5. Transactions from unusual locations (if location data is available)

For each anomaly detected, provide:
1. The date and details of the suspicious transaction
2. An explanation of why it's considered anomalous
3. A risk level (low, medium, high)
4. A recommendation for the user

Format the response as a JSON array of objects, each containing the fields: date, details, explanation, riskLevel, and recommendation.
{DOUBLE_QUOTES}
{JSON_ONLY}"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;

    #[test]
    fn test_transaction_line_format() {
        let line = TransactionLine {
            date: Utc.with_ymd_and_hms(2024, 1, 15, 3, 12, 0).unwrap(),
            transaction_type: "expense".to_string(),
            amount: Decimal::new(95000, 2),
            category: "Shopping".to_string(),
        };
        assert_eq!(
            transaction_line(&line),
            "2024-01-15T03:12:00.000Z: expense $950.00 - Shopping"
        );
    }

    #[test]
    fn test_insights_prompt_lists_figures() {
        let prompt = AdviceRequest::Insights(InsightsSnapshot {
            income: Decimal::from(3200),
            expenses: Decimal::from(2100),
            savings: Decimal::from(1100),
            top_expense_categories: vec!["Rent".into(), "Food".into()],
        })
        .prompt();

        assert!(prompt.contains("Monthly Income: $3200"));
        assert!(prompt.contains("Savings: $1100"));
        assert!(prompt.contains("Top Expense Categories: Rent, Food"));
        assert!(prompt.contains("bullet points"));
    }

    #[test]
    fn test_credit_prompt_asks_for_json_fields() {
        let prompt = AdviceRequest::CreditScore(CreditSnapshot::new(
            Decimal::from(1000),
            Decimal::from(400),
            Decimal::from(100),
        ))
        .prompt();

        assert!(prompt.contains("Debt-to-Income Ratio: 0.1"));
        assert!(prompt.contains("Credit Utilization: 30%"));
        assert!(prompt.contains("score, assessment, factors, and recommendations"));
        assert!(prompt.contains("Do not include any markdown"));
    }

    #[test]
    fn test_investment_prompt_includes_profile() {
        let goals = GoalsSnapshot {
            income: Decimal::from(5000),
            expenses: Decimal::from(3000),
            savings: Decimal::from(800),
            debt_to_income_ratio: Decimal::ZERO,
            credit_score: 710,
            top_expense_categories: vec![],
        };
        let prompt = AdviceRequest::Investments(InvestmentSnapshot::from_goals(goals)).prompt();

        assert!(prompt.contains("Credit Score: 710"));
        assert!(prompt.contains("Risk Tolerance: Moderate"));
        assert!(prompt.contains("Investment Horizon: 10 years"));
        assert!(prompt.contains("Investment Goals: Retirement, Wealth Accumulation"));
        assert!(prompt.contains("Current Investments: Stocks, Bonds"));
    }

    #[test]
    fn test_anomaly_prompt_has_one_line_per_transaction() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let lines = vec![
            TransactionLine {
                date: at,
                transaction_type: "income".into(),
                amount: Decimal::from(2000),
                category: "Salary".into(),
            },
            TransactionLine {
                date: at,
                transaction_type: "expense".into(),
                amount: Decimal::from(15),
                category: "Food".into(),
            },
        ];
        let prompt = AdviceRequest::Anomalies(lines).prompt();

        assert!(prompt.contains("2024-03-01T12:00:00.000Z: income $2000 - Salary\n2024-03-01T12:00:00.000Z: expense $15 - Food"));
        assert!(prompt.contains("riskLevel"));
    }
}
