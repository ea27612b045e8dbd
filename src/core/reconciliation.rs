//! Bank statement reconciliation.
//!
//! Credits from a bank statement are matched against installments that are
//! still open (PENDING or OVERDUE). Each credit goes to the open installment
//! with the best score above the threshold, and an installment takes at most
//! one credit. Nothing here changes stored data; see
//! [`crate::core::context::AppContext::apply_reconciliation`].

use crate::{
    config::settings::ReconciliationSettings,
    core::summary::{is_delinquent, percentage},
    errors::{Error, Result},
    models::{PaymentStatus, Student},
};
use chrono::{DateTime, NaiveDate, Utc};
use tracing::{info, warn};

const AMOUNT_WEIGHT: f64 = 0.4;
const DATE_WEIGHT: f64 = 0.3;
const NAME_WEIGHT: f64 = 0.3;

const DATE_COLUMNS: &[&str] = &["data", "date"];
const AMOUNT_COLUMNS: &[&str] = &["valor", "amount"];
const DESCRIPTION_COLUMNS: &[&str] = &["descricao", "descrição", "description"];
const DOCUMENT_COLUMNS: &[&str] = &["documento", "document"];
const ACCOUNT_COLUMNS: &[&str] = &["conta", "account"];

/// Direction of a bank movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    /// Money received
    Credit,
    /// Money spent
    Debit,
}

/// One line of a bank statement.
#[derive(Debug, Clone, PartialEq)]
pub struct BankTransaction {
    /// Booking date
    pub date: NaiveDate,
    /// Absolute amount; the sign lives in `kind`
    pub amount: f64,
    /// Free text from the bank, usually naming the payer
    pub description: String,
    /// Bank document number
    pub document: String,
    /// Account the movement was booked on
    pub account: String,
    /// Credit or debit
    pub kind: TransactionKind,
}

/// Parses a statement amount such as `R$ 1.234,56`, `-150.00` or `R$ -200,00`.
#[must_use]
pub fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .replace("R$", "")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    let normalized = if cleaned.contains(',') {
        cleaned.replace('.', "").replace(',', ".")
    } else {
        cleaned
    };
    normalized.parse().ok()
}

/// Parses `YYYY-MM-DD` or `DD/MM/YYYY`.
#[must_use]
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%d/%m/%Y"))
        .ok()
}

fn find_column(headers: &csv::StringRecord, names: &[&str]) -> Option<usize> {
    headers
        .iter()
        .position(|h| names.contains(&h.trim().to_lowercase().as_str()))
}

/// Reads a CSV bank statement.
///
/// Headers are matched case-insensitively, in Portuguese or English. Lines
/// whose date or amount cannot be read are logged and skipped.
///
/// # Errors
/// `BankStatement` if the date or amount column is missing; `Csv` if the
/// header line cannot be read.
pub fn parse_bank_statement(raw: &str) -> Result<Vec<BankTransaction>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(raw.as_bytes());
    let headers = reader.headers()?.clone();

    let date_col = find_column(&headers, DATE_COLUMNS).ok_or_else(|| Error::BankStatement {
        message: "missing date column (data/date)".to_string(),
    })?;
    let amount_col = find_column(&headers, AMOUNT_COLUMNS).ok_or_else(|| Error::BankStatement {
        message: "missing amount column (valor/amount)".to_string(),
    })?;
    let description_col = find_column(&headers, DESCRIPTION_COLUMNS);
    let document_col = find_column(&headers, DOCUMENT_COLUMNS);
    let account_col = find_column(&headers, ACCOUNT_COLUMNS);

    let mut transactions = Vec::new();
    for (index, result) in reader.records().enumerate() {
        let line = index + 2;
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                warn!(line, "Skipping unreadable statement line: {e}");
                continue;
            }
        };
        let text = |col: Option<usize>| {
            col.and_then(|c| record.get(c))
                .unwrap_or_default()
                .to_string()
        };

        let date = record.get(date_col).and_then(parse_date);
        let amount = record.get(amount_col).and_then(parse_amount);
        let (Some(date), Some(amount)) = (date, amount) else {
            warn!(line, "Skipping statement line without a valid date and amount");
            continue;
        };

        transactions.push(BankTransaction {
            date,
            amount: amount.abs(),
            description: text(description_col),
            document: text(document_col),
            account: text(account_col),
            kind: if amount > 0.0 {
                TransactionKind::Credit
            } else {
                TransactionKind::Debit
            },
        });
    }

    info!(count = transactions.len(), "Loaded bank statement");
    Ok(transactions)
}

/// An installment still waiting for money.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenInstallment {
    /// Owning student
    pub student_id: String,
    /// Owner's full name, matched against statement descriptions
    pub student_name: String,
    /// Installment id within the student
    pub installment_id: String,
    /// 1-based position in the schedule
    pub installment_number: u32,
    /// Due date
    pub due_date: NaiveDate,
    /// Expected amount
    pub amount: f64,
    /// Days past due when the installment is overdue
    pub days_overdue: Option<i64>,
}

/// Every PENDING or OVERDUE installment, in student then schedule order.
///
/// An installment is overdue when marked so, or when still PENDING after its
/// due date.
#[must_use]
pub fn open_installments(students: &[Student], now: DateTime<Utc>) -> Vec<OpenInstallment> {
    students
        .iter()
        .flat_map(|student| {
            student
                .payment_installments
                .iter()
                .filter(|p| matches!(p.status, PaymentStatus::Pending | PaymentStatus::Overdue))
                .map(move |p| {
                    let overdue = p.status == PaymentStatus::Overdue || is_delinquent(p, now);
                    OpenInstallment {
                        student_id: student.id.clone(),
                        student_name: student.full_name.clone(),
                        installment_id: p.id.clone(),
                        installment_number: p.installment_number,
                        due_date: p.due_date,
                        amount: p.amount,
                        days_overdue: overdue
                            .then(|| (now.date_naive() - p.due_date).num_days().max(0)),
                    }
                })
        })
        .collect()
}

/// Scores how well `transaction` pays `installment`, from 0 to 1.
///
/// Amount closeness weighs 0.4, date closeness 0.3 and the share of the
/// student's name words found in the description 0.3. Outside a tolerance the
/// corresponding part scores nothing.
#[must_use]
pub fn match_score(
    transaction: &BankTransaction,
    installment: &OpenInstallment,
    settings: &ReconciliationSettings,
) -> f64 {
    let mut score = 0.0;

    let amount_diff = (transaction.amount - installment.amount).abs();
    if amount_diff <= settings.amount_tolerance {
        score += AMOUNT_WEIGHT * closeness(amount_diff, settings.amount_tolerance);
    }

    let days = (transaction.date - installment.due_date).num_days().abs();
    if days <= settings.date_tolerance_days {
        // Cast safety: day gaps within the tolerance are small integers.
        #[allow(clippy::cast_precision_loss)]
        let nearness = closeness(days as f64, settings.date_tolerance_days as f64);
        score += DATE_WEIGHT * nearness;
    }

    let description = transaction.description.to_uppercase();
    let name = installment.student_name.to_uppercase();
    let words: Vec<&str> = name.split_whitespace().collect();
    let hits = words.iter().filter(|w| description.contains(*w)).count();
    if hits > 0 {
        // Cast safety: word counts are tiny.
        #[allow(clippy::cast_precision_loss)]
        let share = hits as f64 / words.len() as f64;
        score += NAME_WEIGHT * share;
    }

    f64::min(score, 1.0)
}

/// `1 - gap / tolerance`; a zero tolerance only accepts an exact match.
fn closeness(gap: f64, tolerance: f64) -> f64 {
    if tolerance > 0.0 {
        1.0 - gap / tolerance
    } else {
        1.0
    }
}

/// A credit matched to the installment it pays.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentMatch {
    /// The bank credit
    pub transaction: BankTransaction,
    /// The installment it pays
    pub installment: OpenInstallment,
    /// Match score, above the threshold
    pub score: f64,
}

/// Totals of one reconciliation run.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconciliationMetrics {
    /// Open installments considered
    pub total_expected: usize,
    /// Installments matched to a credit
    pub total_paid: usize,
    /// Unmatched installments that are overdue
    pub total_overdue: usize,
    /// Matched installments as a percentage of open ones
    pub compliance_rate: f64,
    /// Unmatched overdue installments as a percentage of open ones
    pub default_rate: f64,
    /// Matched credits as a percentage of all credits
    pub identification_rate: f64,
    /// Sum of every credit on the statement
    pub amount_received: f64,
    /// Sum of every open installment
    pub amount_expected: f64,
    /// Sum of unmatched overdue installments
    pub amount_overdue: f64,
    /// Received as a percentage of expected
    pub collection_efficiency: f64,
}

/// Outcome of matching a statement against open installments.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    /// Credits with the installment each one pays
    pub matches: Vec<PaymentMatch>,
    /// Credits no installment scored high enough for
    pub unmatched: Vec<BankTransaction>,
    /// Open installments no credit was matched to
    pub unpaid: Vec<OpenInstallment>,
    /// Totals
    pub metrics: ReconciliationMetrics,
}

/// Matches the statement's credits against the students' open installments.
///
/// Credits are taken in statement order. On equal scores the installment
/// listed first wins.
#[must_use]
pub fn reconcile(
    transactions: &[BankTransaction],
    students: &[Student],
    settings: &ReconciliationSettings,
    now: DateTime<Utc>,
) -> Reconciliation {
    let open = open_installments(students, now);
    let mut taken = vec![false; open.len()];
    let mut matches = Vec::new();
    let mut unmatched = Vec::new();

    let credits: Vec<&BankTransaction> = transactions
        .iter()
        .filter(|t| t.kind == TransactionKind::Credit)
        .collect();

    for transaction in &credits {
        let mut best: Option<(usize, f64)> = None;
        for (index, installment) in open.iter().enumerate() {
            if taken[index] {
                continue;
            }
            let score = match_score(transaction, installment, settings);
            if score > settings.match_threshold && best.is_none_or(|(_, b)| score > b) {
                best = Some((index, score));
            }
        }

        match best {
            Some((index, score)) => {
                taken[index] = true;
                matches.push(PaymentMatch {
                    transaction: (*transaction).clone(),
                    installment: open[index].clone(),
                    score,
                });
            }
            None => unmatched.push((*transaction).clone()),
        }
    }

    let total_expected = open.len();
    let amount_expected: f64 = open.iter().map(|o| o.amount).sum();
    let unpaid: Vec<OpenInstallment> = open
        .into_iter()
        .zip(taken)
        .filter_map(|(installment, taken)| (!taken).then_some(installment))
        .collect();

    let overdue: Vec<&OpenInstallment> =
        unpaid.iter().filter(|o| o.days_overdue.is_some()).collect();
    let amount_received: f64 = credits.iter().map(|t| t.amount).sum();
    let amount_overdue: f64 = overdue.iter().map(|o| o.amount).sum();

    // Cast safety: counts are far below 2^52.
    #[allow(clippy::cast_precision_loss)]
    let metrics = ReconciliationMetrics {
        total_expected,
        total_paid: matches.len(),
        total_overdue: overdue.len(),
        compliance_rate: percentage(matches.len() as f64, total_expected as f64),
        default_rate: percentage(overdue.len() as f64, total_expected as f64),
        identification_rate: percentage(matches.len() as f64, credits.len() as f64),
        amount_received,
        amount_expected,
        amount_overdue,
        collection_efficiency: percentage(amount_received, amount_expected),
    };

    info!(
        matched = metrics.total_paid,
        expected = metrics.total_expected,
        unmatched = unmatched.len(),
        "Reconciled bank statement"
    );

    Reconciliation {
        matches,
        unmatched,
        unpaid,
        metrics,
    }
}
