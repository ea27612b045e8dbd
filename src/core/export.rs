//! Exports of the application document.
//!
//! The whole document exports as JSON in the same shape it is stored in, so an
//! export can be written back under the storage key. Students, installments and
//! expenses export as CSV with Portuguese headers for spreadsheet use.

use crate::{
    core::{installments::InstallmentRow, persistence::AppData},
    errors::{Error, Result},
    models::{EnrollmentStatus, Expense, PaymentStatus, Student},
};
use serde::Serialize;

/// The whole document as indented JSON.
pub fn export_document(data: &AppData) -> Result<String> {
    serde_json::to_string_pretty(data).map_err(Into::into)
}

#[derive(Serialize)]
struct StudentRecord<'a> {
    #[serde(rename = "ID")]
    id: &'a str,
    #[serde(rename = "Nome")]
    full_name: &'a str,
    #[serde(rename = "Email")]
    email: &'a str,
    #[serde(rename = "Telefone")]
    phone: &'a str,
    #[serde(rename = "Turma")]
    fac_code: &'a str,
    #[serde(rename = "Situação")]
    enrollment_status: &'a str,
    #[serde(rename = "Valor do Curso")]
    course_fee: f64,
    #[serde(rename = "Parcelas")]
    installments: usize,
    #[serde(rename = "Valor Pago")]
    paid: f64,
}

#[derive(Serialize)]
struct InstallmentRecord<'a> {
    #[serde(rename = "Aluno")]
    student_name: &'a str,
    #[serde(rename = "Email")]
    email: &'a str,
    #[serde(rename = "Turma")]
    fac_code: &'a str,
    #[serde(rename = "Parcela")]
    number: u32,
    #[serde(rename = "Vencimento")]
    due_date: String,
    #[serde(rename = "Valor")]
    amount: f64,
    #[serde(rename = "Status")]
    status: &'a str,
    #[serde(rename = "Pagamento")]
    payment_date: Option<String>,
    #[serde(rename = "Observações")]
    notes: Option<&'a str>,
}

#[derive(Serialize)]
struct ExpenseRecord<'a> {
    #[serde(rename = "Turma")]
    fac_code: &'a str,
    #[serde(rename = "Data")]
    date: String,
    #[serde(rename = "Categoria")]
    category: &'a str,
    #[serde(rename = "Descrição")]
    description: &'a str,
    #[serde(rename = "Valor")]
    amount: f64,
}

fn write_csv<T: Serialize>(records: impl IntoIterator<Item = T>) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for record in records {
        writer.serialize(record)?;
    }
    let bytes = writer.into_inner().map_err(|e| Error::Io(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// One row per student with the amount already paid.
pub fn export_students_csv(students: &[Student]) -> Result<String> {
    write_csv(students.iter().map(|s| StudentRecord {
        id: &s.id,
        full_name: &s.full_name,
        email: &s.email,
        phone: &s.phone,
        fac_code: &s.fac_code,
        enrollment_status: s.enrollment_status.as_ref().map_or("", EnrollmentStatus::as_str),
        course_fee: s.course_fee,
        installments: s.payment_installments.len(),
        paid: s
            .payment_installments
            .iter()
            .filter(|p| p.status == PaymentStatus::Paid)
            .map(|p| p.amount)
            .sum(),
    }))
}

/// One row per installment of the payments listing, in listing order.
pub fn export_installments_csv(rows: &[InstallmentRow<'_>]) -> Result<String> {
    write_csv(rows.iter().map(|row| InstallmentRecord {
        student_name: row.student_name,
        email: row.student_email,
        fac_code: row.fac_code,
        number: row.installment.installment_number,
        due_date: row.installment.due_date.format("%d/%m/%Y").to_string(),
        amount: row.installment.amount,
        status: row.installment.status.as_str(),
        payment_date: row
            .installment
            .payment_date
            .map(|d| d.format("%d/%m/%Y").to_string()),
        notes: row.installment.notes.as_deref(),
    }))
}

/// One row per expense.
pub fn export_expenses_csv(expenses: &[Expense]) -> Result<String> {
    write_csv(expenses.iter().map(|e| ExpenseRecord {
        fac_code: &e.fac_code,
        date: e.date.format("%d/%m/%Y").to_string(),
        category: e.category.as_str(),
        description: &e.description,
        amount: e.amount,
    }))
}
