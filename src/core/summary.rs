//! Per-cohort financial summaries.
//!
//! A summary is a point-in-time snapshot computed from the current students,
//! cohorts and expenses. Nothing here is stored; callers recompute whenever one
//! of those collections changes. Amounts are plain `f64` and are never rounded
//! here; only the ratios on [`DashboardOverview`] are rounded for display.

use crate::models::{Expense, ExpenseCategory, Fac, PaymentInstallment, PaymentStatus, Student};
use chrono::{DateTime, NaiveTime, Utc};
use std::collections::{BTreeMap, BTreeSet};

/// Financial snapshot of one cohort.
#[derive(Debug, Clone, PartialEq)]
pub struct FacFinancialSummary {
    /// Cohort code the snapshot belongs to
    pub fac_code: String,
    /// Students whose `fac_code` matches
    pub total_students: usize,
    /// Sum of the students' course fees
    pub gross_revenue_budgeted: f64,
    /// Sum of PAID installments
    pub gross_revenue_realized: f64,
    /// Sum of PENDING installments already past due
    pub delinquency: f64,
    /// Sum of expenses charged to the cohort
    pub total_expenses: f64,
    /// `realized - expenses - delinquency`
    pub net_result_realized: f64,
}

/// True when an installment is still PENDING and its due date is before `now`.
///
/// A due date is taken as midnight UTC of that day. The OVERDUE status is never
/// written by this check; it only exists in the stored data when set by hand.
#[must_use]
pub fn is_delinquent(installment: &PaymentInstallment, now: DateTime<Utc>) -> bool {
    installment.status == PaymentStatus::Pending
        && installment.due_date.and_time(NaiveTime::MIN).and_utc() < now
}

/// Computes the snapshot of a single cohort.
#[must_use]
pub fn summarize_fac(
    fac: &Fac,
    students: &[Student],
    expenses: &[Expense],
    now: DateTime<Utc>,
) -> FacFinancialSummary {
    let fac_students: Vec<&Student> = students
        .iter()
        .filter(|s| s.fac_code == fac.code)
        .collect();

    let gross_revenue_realized: f64 = fac_students
        .iter()
        .copied()
        .flat_map(|s| &s.payment_installments)
        .filter(|p| p.status == PaymentStatus::Paid)
        .map(|p| p.amount)
        .sum();

    let gross_revenue_budgeted: f64 = fac_students.iter().map(|s| s.course_fee).sum();

    let delinquency: f64 = fac_students
        .iter()
        .copied()
        .flat_map(|s| &s.payment_installments)
        .filter(|p| is_delinquent(p, now))
        .map(|p| p.amount)
        .sum();

    let total_expenses: f64 = expenses
        .iter()
        .filter(|e| e.fac_code == fac.code)
        .map(|e| e.amount)
        .sum();

    FacFinancialSummary {
        fac_code: fac.code.clone(),
        total_students: fac_students.len(),
        gross_revenue_budgeted,
        gross_revenue_realized,
        delinquency,
        total_expenses,
        // Delinquency is deducted on top of being unrealized.
        net_result_realized: gross_revenue_realized - total_expenses - delinquency,
    }
}

/// One snapshot per cohort, in cohort order.
#[must_use]
pub fn compute_financial_summaries(
    students: &[Student],
    facs: &[Fac],
    expenses: &[Expense],
    now: DateTime<Utc>,
) -> Vec<FacFinancialSummary> {
    facs.iter()
        .map(|fac| summarize_fac(fac, students, expenses, now))
        .collect()
}

/// Totals across all cohorts plus the dashboard ratios.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardOverview {
    /// Number of cohorts summarized
    pub total_facs: usize,
    /// Students across all cohorts
    pub total_students: usize,
    /// Sum of budgeted revenue
    pub gross_revenue_budgeted: f64,
    /// Sum of realized revenue
    pub gross_revenue_realized: f64,
    /// Sum of delinquency
    pub delinquency: f64,
    /// Sum of expenses
    pub total_expenses: f64,
    /// Sum of net results
    pub net_result_realized: f64,
    /// Realized as a percentage of budgeted
    pub conversion_rate: f64,
    /// Delinquency as a percentage of budgeted
    pub default_rate: f64,
    /// Net result as a percentage of realized
    pub profit_margin: f64,
    /// Realized revenue per student
    pub average_ticket: f64,
    /// Share of each category in the expenses given, in percent
    pub expense_distribution: BTreeMap<ExpenseCategory, f64>,
}

/// Rounds to two decimal places.
#[must_use]
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `numerator / denominator * 100`, rounded to cents; zero when the
/// denominator is zero.
#[must_use]
pub fn percentage(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        return 0.0;
    }
    round_cents(numerator / denominator * 100.0)
}

/// Aggregates cohort snapshots into the dashboard view.
///
/// `expenses` feeds only the category distribution, and only expenses charged
/// to a summarized cohort count, so the distribution covers the same amount as
/// `total_expenses`.
#[must_use]
pub fn dashboard_overview(
    summaries: &[FacFinancialSummary],
    expenses: &[Expense],
) -> DashboardOverview {
    let total_students: usize = summaries.iter().map(|s| s.total_students).sum();
    let gross_revenue_budgeted: f64 = summaries.iter().map(|s| s.gross_revenue_budgeted).sum();
    let gross_revenue_realized: f64 = summaries.iter().map(|s| s.gross_revenue_realized).sum();
    let delinquency: f64 = summaries.iter().map(|s| s.delinquency).sum();
    let total_expenses: f64 = summaries.iter().map(|s| s.total_expenses).sum();
    let net_result_realized: f64 = summaries.iter().map(|s| s.net_result_realized).sum();

    let fac_codes: BTreeSet<&str> = summaries.iter().map(|s| s.fac_code.as_str()).collect();
    let fac_expenses = expenses
        .iter()
        .filter(|e| fac_codes.contains(e.fac_code.as_str()));

    // Cast safety: student counts are far below 2^52.
    #[allow(clippy::cast_precision_loss)]
    let average_ticket = if total_students == 0 {
        0.0
    } else {
        round_cents(gross_revenue_realized / total_students as f64)
    };

    DashboardOverview {
        total_facs: summaries.len(),
        total_students,
        gross_revenue_budgeted,
        gross_revenue_realized,
        delinquency,
        total_expenses,
        net_result_realized,
        conversion_rate: percentage(gross_revenue_realized, gross_revenue_budgeted),
        default_rate: percentage(delinquency, gross_revenue_budgeted),
        profit_margin: percentage(net_result_realized, gross_revenue_realized),
        average_ticket,
        expense_distribution: expense_distribution(fac_expenses),
    }
}

/// Share of each category in `expenses`, in percent. Categories with no
/// expense are absent.
#[must_use]
pub fn expense_distribution<'a>(
    expenses: impl IntoIterator<Item = &'a Expense>,
) -> BTreeMap<ExpenseCategory, f64> {
    let mut by_category: BTreeMap<ExpenseCategory, f64> = BTreeMap::new();
    for expense in expenses {
        *by_category.entry(expense.category).or_insert(0.0) += expense.amount;
    }

    let total: f64 = by_category.values().sum();
    by_category
        .into_iter()
        .map(|(category, amount)| (category, percentage(amount, total)))
        .collect()
}
