//! Text rendering for the console dashboard.
//!
//! Amounts are kept at full precision everywhere else; rounding to two
//! decimals happens only here.

use crate::{
    core::{
        installments::InstallmentRow,
        reconciliation::Reconciliation,
        summary::{DashboardOverview, FacFinancialSummary},
    },
    models::Fac,
};

/// Formats an amount in reais, e.g. `R$ 1234.56` or `-R$ 10.00`.
#[must_use]
pub fn format_brl(amount: f64) -> String {
    if amount < 0.0 {
        format!("-R$ {:.2}", amount.abs())
    } else {
        format!("R$ {amount:.2}")
    }
}

/// Renders one cohort card.
///
/// `fac` adds the name and status line when the cohort is known.
#[must_use]
pub fn format_fac_card(summary: &FacFinancialSummary, fac: Option<&Fac>) -> String {
    let header = match fac {
        Some(fac) => format!("{} - {} [{}]", summary.fac_code, fac.name, fac.status.as_str()),
        None => summary.fac_code.clone(),
    };

    [
        header,
        format!("  Alunos: {}", summary.total_students),
        format!("  Receita Realizada: {}", format_brl(summary.gross_revenue_realized)),
        format!("  Receita Orçada: {}", format_brl(summary.gross_revenue_budgeted)),
        format!("  Inadimplência: {}", format_brl(summary.delinquency)),
        format!("  Despesas: {}", format_brl(summary.total_expenses)),
        format!("  Resultado Líquido: {}", format_brl(summary.net_result_realized)),
    ]
    .join("\n")
}

/// Renders the totals block of the dashboard.
#[must_use]
pub fn format_overview(overview: &DashboardOverview) -> String {
    let mut lines = vec![
        format!(
            "Turmas: {} | Alunos: {}",
            overview.total_facs, overview.total_students
        ),
        format!(
            "Receita: {} de {} ({:.2}%)",
            format_brl(overview.gross_revenue_realized),
            format_brl(overview.gross_revenue_budgeted),
            overview.conversion_rate
        ),
        format!(
            "Inadimplência: {} ({:.2}%)",
            format_brl(overview.delinquency),
            overview.default_rate
        ),
        format!("Despesas: {}", format_brl(overview.total_expenses)),
        format!(
            "Resultado: {} (margem {:.2}%)",
            format_brl(overview.net_result_realized),
            overview.profit_margin
        ),
        format!("Ticket médio: {}", format_brl(overview.average_ticket)),
    ];
    lines.extend(
        overview
            .expense_distribution
            .iter()
            .map(|(category, share)| format!("  {}: {share:.2}%", category.as_str())),
    );
    lines.join("\n")
}

/// One line of the payments listing.
#[must_use]
pub fn format_installment_row(row: &InstallmentRow<'_>) -> String {
    let paid_on = row
        .installment
        .payment_date
        .map_or_else(|| "-".to_string(), |d| d.format("%d/%m/%Y").to_string());
    format!(
        "{} | {} | #{} | {} | {} | {} | {}",
        row.student_name,
        row.fac_code,
        row.installment.installment_number,
        row.installment.due_date.format("%d/%m/%Y"),
        format_brl(row.installment.amount),
        row.installment.status.as_str(),
        paid_on
    )
}

/// Renders a reconciliation: matched payments, overdue installments, credits
/// nobody claimed, then the totals.
#[must_use]
pub fn format_reconciliation(result: &Reconciliation) -> String {
    let mut lines: Vec<String> = result
        .matches
        .iter()
        .map(|m| {
            format!(
                "Pago | {} | #{} | venc. {} | pago {} | {} | {:.0}%",
                m.installment.student_name,
                m.installment.installment_number,
                m.installment.due_date.format("%d/%m/%Y"),
                m.transaction.date.format("%d/%m/%Y"),
                format_brl(m.transaction.amount),
                m.score * 100.0
            )
        })
        .collect();

    lines.extend(result.unpaid.iter().filter_map(|o| {
        o.days_overdue.map(|days| {
            format!(
                "Atraso ({days}d) | {} | #{} | venc. {} | {}",
                o.student_name,
                o.installment_number,
                o.due_date.format("%d/%m/%Y"),
                format_brl(o.amount)
            )
        })
    }));

    lines.extend(result.unmatched.iter().map(|t| {
        format!(
            "Não identificado | {} | {} | {}",
            t.date.format("%d/%m/%Y"),
            format_brl(t.amount),
            t.description
        )
    }));

    let metrics = &result.metrics;
    lines.push(format!(
        "Adimplência: {}/{} ({:.2}%) | Inadimplência: {} ({:.2}%) {}",
        metrics.total_paid,
        metrics.total_expected,
        metrics.compliance_rate,
        metrics.total_overdue,
        metrics.default_rate,
        format_brl(metrics.amount_overdue)
    ));
    lines.push(format!(
        "Recebido: {} de {} esperado ({:.2}%) | Identificação: {:.2}%",
        format_brl(metrics.amount_received),
        format_brl(metrics.amount_expected),
        metrics.collection_efficiency,
        metrics.identification_rate
    ));
    lines.join("\n")
}
