//! Shared test utilities.
//!
//! Helpers for setting up in-memory stores and building records with sensible
//! defaults.

use crate::{
    config::database::create_tables,
    core::{context::AppContext, persistence::AppData, storage::LocalStorage},
    errors::Result,
    models::{
        Course, EnrollmentStatus, Expense, ExpenseCategory, Fac, FacStatus, Payment,
        PaymentInstallment, PaymentStatus, Student,
    },
};
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::DatabaseConnection;
use tracing_subscriber::EnvFilter;

/// Storage key used by every test.
pub const TEST_KEY: &str = "metaforma_app_data";

/// Installs a test-writer subscriber once; later calls are no-ops.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Creates an in-memory `SQLite` database with all tables initialized.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    init_test_tracing();
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    create_tables(&db).await?;
    Ok(db)
}

/// Local storage over a fresh in-memory database.
pub async fn setup_test_storage() -> Result<LocalStorage> {
    Ok(LocalStorage::new(setup_test_db().await?))
}

/// An empty context over a fresh in-memory database.
pub async fn setup_test_context() -> Result<AppContext> {
    AppContext::load(setup_test_storage().await?, TEST_KEY).await
}

/// Shorthand for a calendar date.
#[must_use]
pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

/// Builds a pending installment.
#[must_use]
pub fn installment(
    id: &str,
    student_id: &str,
    number: u32,
    due_date: NaiveDate,
    amount: f64,
    status: PaymentStatus,
) -> PaymentInstallment {
    PaymentInstallment {
        id: id.to_string(),
        student_id: student_id.to_string(),
        installment_number: number,
        due_date,
        amount,
        status,
        payment_date: None,
        notes: None,
    }
}

/// Builds an enrolled student with no installments.
///
/// # Defaults
/// * `email`: derived from the id
/// * `course_fee`: 1000.0
#[must_use]
pub fn student(id: &str, full_name: &str, fac_code: &str) -> Student {
    Student {
        id: id.to_string(),
        full_name: full_name.to_string(),
        email: format!("{id}@example.com"),
        phone: String::new(),
        fac_code: fac_code.to_string(),
        course_fee: 1000.0,
        enrollment_status: Some(EnrollmentStatus::Enrolled),
        payment_installments: Vec::new(),
    }
}

/// Builds a course with code `C1`.
#[must_use]
pub fn course(id: &str, name: &str) -> Course {
    Course {
        id: id.to_string(),
        name: name.to_string(),
        code: Some("C1".to_string()),
        default_fee: 1200.0,
        installment_count: Some(12),
        description: None,
    }
}

/// Builds a cohort in progress.
#[must_use]
pub fn fac(id: &str, code: &str, course_id: &str) -> Fac {
    Fac {
        id: id.to_string(),
        code: code.to_string(),
        course_id: course_id.to_string(),
        name: format!("Turma {code}"),
        start_date: date(2024, 2, 1),
        status: FacStatus::InProgress,
        description: String::new(),
    }
}

/// Builds an expense in the `Other` category.
#[must_use]
pub fn expense(id: &str, fac_code: &str, amount: f64) -> Expense {
    Expense {
        id: id.to_string(),
        fac_code: fac_code.to_string(),
        description: "Test expense".to_string(),
        amount,
        date: date(2024, 2, 15),
        category: ExpenseCategory::Other,
    }
}

/// A small document touching every collection and every optional field.
#[must_use]
pub fn sample_data() -> AppData {
    let mut ana = student("s1", "Ana Souza", "FAC_C1_T18");
    ana.phone = "+55 11 99999-0000".to_string();
    ana.payment_installments = vec![
        PaymentInstallment {
            payment_date: Some(date(2024, 3, 9)),
            notes: Some("pix".to_string()),
            ..installment("i1", "s1", 1, date(2024, 3, 10), 333.33, PaymentStatus::Paid)
        },
        installment("i2", "s1", 2, date(2024, 4, 10), 333.33, PaymentStatus::Pending),
        installment("i3", "s1", 3, date(2024, 5, 10), 333.34, PaymentStatus::Overdue),
    ];

    let mut bruno = student("s2", "Bruno Lima", "FAC_C1_T19");
    bruno.enrollment_status = Some(EnrollmentStatus::Other("Trancado".to_string()));

    AppData {
        students: vec![ana, bruno],
        courses: vec![course("c1", "Formação em Coaching")],
        facs: vec![fac("f1", "FAC_C1_T18", "c1"), fac("f2", "FAC_C1_T19", "c1")],
        payments: vec![Payment {
            id: "p1".to_string(),
            student_id: "s2".to_string(),
            amount: 150.5,
            due_date: date(2024, 6, 1),
            status: PaymentStatus::Canceled,
            payment_date: None,
            notes: Some("estornado".to_string()),
        }],
        expenses: vec![Expense {
            category: ExpenseCategory::FacebookAds,
            ..expense("e1", "FAC_C1_T18", 250.0)
        }],
    }
}

/// Noon UTC on the given day, used as "now" in view tests.
#[must_use]
pub fn noon(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    date(y, m, d)
        .and_hms_opt(12, 0, 0)
        .unwrap_or_default()
        .and_utc()
}
