//! Application state container.
//!
//! [`AppContext`] owns the in-memory copy of the five collections and the
//! storage it mirrors. It is the single writer: every mutation changes memory
//! synchronously, then flushes the entire document under one key. There is no
//! dirty tracking and no per-entity persistence.
//!
//! Mutators never validate. Forms in [`crate::core::forms`] do that before a
//! mutator is called; anything that reaches the container is stored as given.

use crate::{
    config::{Settings, database, settings::ReconciliationSettings},
    core::{
        forms::{ExpenseForm, FacForm, StudentForm},
        installments::{
            InstallmentFilter, InstallmentRow, build_installment_schedule, filter_installments,
        },
        persistence::{self, AppData},
        reconciliation::{self, BankTransaction, Reconciliation},
        record::{Record, new_id},
        storage::LocalStorage,
        summary::{
            DashboardOverview, FacFinancialSummary, compute_financial_summaries,
            dashboard_overview,
        },
    },
    errors::{Error, Result},
    models::{Course, Expense, Fac, PaymentStatus, Student},
};
use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, info, instrument};

/// Changes applied by the installment edit form.
#[derive(Debug, Clone, PartialEq)]
pub struct InstallmentUpdate {
    /// New status; any status may follow any other
    pub status: PaymentStatus,
    /// Payment date, kept only when `status` is PAID
    pub payment_date: Option<NaiveDate>,
    /// Notes, replacing the previous ones
    pub notes: Option<String>,
}

/// Builds a cohort code from the course code and a suffix.
///
/// `FAC_{course code}_T{suffix}`, or `FAC_T{suffix}` when the course is unknown
/// or has no code.
#[must_use]
pub fn fac_code(course: Option<&Course>, suffix: &str) -> String {
    let suffix = suffix.trim();
    match course.and_then(|c| c.code.as_deref()).map(str::trim) {
        Some(code) if !code.is_empty() => format!("FAC_{code}_T{suffix}"),
        _ => format!("FAC_T{suffix}"),
    }
}

/// The single owner of application state.
#[derive(Debug)]
pub struct AppContext {
    data: AppData,
    storage: LocalStorage,
    key: String,
    code_suffix_offset: usize,
    default_installment_count: u32,
    reconciliation: ReconciliationSettings,
}

impl AppContext {
    /// Connects to the configured database, creates the table if needed and
    /// loads the stored document.
    pub async fn open(settings: &Settings) -> Result<Self> {
        let url = database::resolve_database_url(settings.storage.database_url.as_deref());
        let db = database::create_connection(&url).await?;
        database::create_tables(&db).await?;

        let mut context = Self::load(LocalStorage::new(db), &settings.storage.key).await?;
        context.code_suffix_offset = settings.facs.code_suffix_offset;
        context.default_installment_count = settings.installments.default_count;
        context.reconciliation = settings.reconciliation;
        Ok(context)
    }

    /// Seeds a context from whatever is stored under `key`.
    ///
    /// A missing or corrupt document yields empty collections.
    pub async fn load(storage: LocalStorage, key: &str) -> Result<Self> {
        let data = persistence::load(&storage, key).await?;
        let defaults = Settings::default();
        Ok(Self {
            data,
            storage,
            key: key.to_string(),
            code_suffix_offset: defaults.facs.code_suffix_offset,
            default_installment_count: defaults.installments.default_count,
            reconciliation: defaults.reconciliation,
        })
    }

    /// Read-only view of every collection.
    #[must_use]
    pub const fn data(&self) -> &AppData {
        &self.data
    }

    /// Students, in insertion order.
    #[must_use]
    pub fn students(&self) -> &[Student] {
        &self.data.students
    }

    /// Courses, in insertion order.
    #[must_use]
    pub fn courses(&self) -> &[Course] {
        &self.data.courses
    }

    /// Cohorts, in insertion order.
    #[must_use]
    pub fn facs(&self) -> &[Fac] {
        &self.data.facs
    }

    /// Expenses, in insertion order.
    #[must_use]
    pub fn expenses(&self) -> &[Expense] {
        &self.data.expenses
    }

    /// Writes the whole document back to storage.
    #[instrument(skip(self), fields(key = %self.key))]
    pub async fn flush(&self) -> Result<()> {
        persistence::save(&self.storage, &self.key, &self.data).await
    }

    /// Appends a record to its collection.
    pub async fn add<R: Record>(&mut self, record: R) -> Result<()> {
        debug!(kind = R::KIND, id = record.id(), "Adding record");
        self.data.add(record);
        self.flush().await
    }

    /// Replaces every record with the same id. An unknown id changes nothing.
    pub async fn update<R: Record>(&mut self, record: R) -> Result<()> {
        let id = record.id().to_string();
        let replaced = self.data.update(record);
        debug!(kind = R::KIND, %id, replaced, "Updated record");
        self.flush().await
    }

    /// Removes every record with `id`. An unknown id changes nothing.
    ///
    /// Cohorts and expenses stored without an id all share the empty id;
    /// remove cohorts with [`Self::delete_fac`] instead.
    pub async fn delete<R: Record>(&mut self, id: &str) -> Result<()> {
        let removed = self.data.delete::<R>(id);
        debug!(kind = R::KIND, id, removed, "Deleted record");
        self.flush().await
    }

    /// Looks a student up by id.
    #[must_use]
    pub fn student_by_id(&self, id: &str) -> Option<&Student> {
        self.data.get(id)
    }

    /// Looks a course up by id.
    #[must_use]
    pub fn course_by_id(&self, id: &str) -> Option<&Course> {
        self.data.get(id)
    }

    /// Looks a cohort up by its code.
    #[must_use]
    pub fn fac_by_code(&self, code: &str) -> Option<&Fac> {
        self.data.facs.iter().find(|f| f.code == code)
    }

    /// Suffix offered for the next new cohort.
    #[must_use]
    pub fn suggested_fac_suffix(&self) -> String {
        (self.data.facs.len() + self.code_suffix_offset).to_string()
    }

    /// Creates a cohort from a validated form, assigning its id and code.
    ///
    /// # Errors
    /// `MissingField` if the form is incomplete; storage errors on flush.
    pub async fn add_fac(&mut self, form: FacForm) -> Result<Fac> {
        form.validate_new()?;

        let code = fac_code(self.course_by_id(&form.course_id), &form.code_suffix);
        let fac = Fac {
            id: new_id(),
            code,
            course_id: form.course_id,
            name: form.name,
            start_date: form.start_date,
            status: form.status,
            description: form.description,
        };

        info!(code = %fac.code, "Creating cohort");
        self.add(fac.clone()).await?;
        Ok(fac)
    }

    /// Edits the cohort with `code`, keeping its id and code.
    ///
    /// Cohorts are matched by code, since stored cohorts may have no id.
    /// Returns whether a cohort was found.
    pub async fn edit_fac(&mut self, code: &str, form: FacForm) -> Result<bool> {
        form.validate_edit()?;

        let Some(existing) = self.data.facs.iter_mut().find(|f| f.code == code) else {
            debug!(code, "No cohort to edit");
            return Ok(false);
        };
        existing.course_id = form.course_id;
        existing.name = form.name;
        existing.start_date = form.start_date;
        existing.status = form.status;
        existing.description = form.description;

        info!(code, "Edited cohort");
        self.flush().await?;
        Ok(true)
    }

    /// Removes the cohort with `code`. Students and expenses that reference it
    /// are kept.
    ///
    /// Returns whether a cohort was removed.
    pub async fn delete_fac(&mut self, code: &str) -> Result<bool> {
        let before = self.data.facs.len();
        self.data.facs.retain(|f| f.code != code);
        let removed = before - self.data.facs.len();
        debug!(code, removed, "Deleted cohort");
        self.flush().await?;
        Ok(removed > 0)
    }

    /// Enrolls a student from a validated form and generates the schedule.
    ///
    /// Without an explicit fee, the fee comes from the course of the student's
    /// cohort.
    ///
    /// # Errors
    /// `MissingField`/`InvalidAmount` if the form is invalid, `CourseNotFound`
    /// if no fee was given and none can be resolved; storage errors on flush.
    pub async fn enroll_student(&mut self, form: StudentForm) -> Result<Student> {
        form.validate()?;

        let course = self
            .fac_by_code(&form.fac_code)
            .and_then(|fac| self.course_by_id(&fac.course_id));

        let course_fee = match (form.course_fee, course) {
            (Some(fee), _) => fee,
            (None, Some(course)) => course.default_fee,
            (None, None) => {
                return Err(Error::CourseNotFound {
                    id: form.fac_code.clone(),
                });
            }
        };
        let installment_count = form
            .installment_count
            .or_else(|| course.and_then(|c| c.installment_count))
            .unwrap_or(self.default_installment_count);

        let id = new_id();
        let student = Student {
            payment_installments: build_installment_schedule(
                &id,
                course_fee,
                installment_count,
                form.first_due_date,
            ),
            id,
            full_name: form.full_name.trim().to_string(),
            email: form.email.trim().to_string(),
            phone: form.phone,
            fac_code: form.fac_code,
            course_fee,
            enrollment_status: form.enrollment_status,
        };

        info!(id = %student.id, fac = %student.fac_code, "Enrolling student");
        self.add(student.clone()).await?;
        Ok(student)
    }

    /// Records an expense from a validated form.
    pub async fn add_expense(&mut self, form: ExpenseForm) -> Result<Expense> {
        form.validate()?;

        let expense = Expense {
            id: new_id(),
            fac_code: form.fac_code,
            description: form.description,
            amount: form.amount,
            date: form.date,
            category: form.category,
        };

        self.add(expense.clone()).await?;
        Ok(expense)
    }

    /// Applies the installment edit form to one embedded installment.
    ///
    /// Returns whether the installment was found. The student's other fields
    /// and installments are left untouched.
    pub async fn update_payment_installment(
        &mut self,
        student_id: &str,
        installment_id: &str,
        update: InstallmentUpdate,
    ) -> Result<bool> {
        let status = update.status;
        if !self.apply_installment_update(student_id, installment_id, update) {
            debug!(student_id, installment_id, "No installment to update");
            return Ok(false);
        }

        info!(
            student_id,
            installment_id,
            status = status.as_str(),
            "Updated installment"
        );
        self.flush().await?;
        Ok(true)
    }

    fn apply_installment_update(
        &mut self,
        student_id: &str,
        installment_id: &str,
        update: InstallmentUpdate,
    ) -> bool {
        let Some(installment) = self
            .data
            .students
            .iter_mut()
            .filter(|s| s.id == student_id)
            .flat_map(|s| s.payment_installments.iter_mut())
            .find(|p| p.id == installment_id)
        else {
            return false;
        };

        installment.payment_date = if update.status == PaymentStatus::Paid {
            update.payment_date
        } else {
            None
        };
        installment.status = update.status;
        installment.notes = update.notes;
        true
    }

    /// Matches a bank statement against the open installments at `now`.
    #[must_use]
    pub fn reconcile(
        &self,
        transactions: &[BankTransaction],
        now: DateTime<Utc>,
    ) -> Reconciliation {
        reconciliation::reconcile(transactions, &self.data.students, &self.reconciliation, now)
    }

    /// Marks every matched installment PAID on its credit's date, noting the
    /// bank description, and flushes once.
    ///
    /// Returns how many installments were updated; matches whose installment
    /// has since disappeared are skipped.
    pub async fn apply_reconciliation(&mut self, result: &Reconciliation) -> Result<usize> {
        let mut applied = 0;
        for matched in &result.matches {
            let update = InstallmentUpdate {
                status: PaymentStatus::Paid,
                payment_date: Some(matched.transaction.date),
                notes: Some(format!("Conciliado: {}", matched.transaction.description)),
            };
            if self.apply_installment_update(
                &matched.installment.student_id,
                &matched.installment.installment_id,
                update,
            ) {
                applied += 1;
            }
        }

        info!(applied, "Applied reconciliation");
        self.flush().await?;
        Ok(applied)
    }

    /// Per-cohort financial snapshots at `now`.
    #[must_use]
    pub fn financial_summaries(&self, now: DateTime<Utc>) -> Vec<FacFinancialSummary> {
        compute_financial_summaries(
            &self.data.students,
            &self.data.facs,
            &self.data.expenses,
            now,
        )
    }

    /// Dashboard totals and ratios at `now`.
    #[must_use]
    pub fn dashboard(&self, now: DateTime<Utc>) -> DashboardOverview {
        dashboard_overview(&self.financial_summaries(now), &self.data.expenses)
    }

    /// The payments listing for `filter`.
    #[must_use]
    pub fn installments(&self, filter: &InstallmentFilter) -> Vec<InstallmentRow<'_>> {
        filter_installments(&self.data.students, filter)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::{
        models::{ExpenseCategory, FacStatus, Payment},
        test_utils::{
            TEST_KEY, course, date, expense, fac, installment, noon, sample_data,
            setup_test_context, setup_test_storage, student,
        },
    };

    async fn reload(context: &AppContext) -> Result<AppContext> {
        AppContext::load(context.storage.clone(), TEST_KEY).await
    }

    #[tokio::test]
    async fn test_add_round_trips_through_storage() -> Result<()> {
        let mut context = setup_test_context().await?;
        let data = sample_data();

        for s in data.students.clone() {
            context.add(s).await?;
        }
        for c in data.courses.clone() {
            context.add(c).await?;
        }
        for f in data.facs.clone() {
            context.add(f).await?;
        }
        for p in data.payments.clone() {
            context.add(p).await?;
        }
        for e in data.expenses.clone() {
            context.add(e).await?;
        }

        let reloaded = reload(&context).await?;
        assert_eq!(reloaded.data(), &data);
        assert_eq!(reloaded.student_by_id("s1"), data.students.first());
        Ok(())
    }

    #[tokio::test]
    async fn test_update_and_delete_persist() -> Result<()> {
        let mut context = setup_test_context().await?;
        context.add(fac("f1", "FAC_A", "c1")).await?;
        context.add(fac("f2", "FAC_B", "c1")).await?;

        let mut renamed = fac("f1", "FAC_A", "c1");
        renamed.name = "Renamed".to_string();
        context.update(renamed.clone()).await?;
        context.delete::<Fac>("f2").await?;
        context.delete::<Fac>("f2").await?;

        let reloaded = reload(&context).await?;
        assert_eq!(reloaded.facs(), &[renamed]);
        Ok(())
    }

    #[tokio::test]
    async fn test_every_mutation_writes_all_collections() -> Result<()> {
        let mut context = setup_test_context().await?;
        context.add(course("c1", "Curso")).await?;
        context
            .add(Payment {
                id: "p1".to_string(),
                student_id: "s1".to_string(),
                amount: 10.0,
                due_date: date(2024, 1, 1),
                status: PaymentStatus::Pending,
                payment_date: None,
                notes: None,
            })
            .await?;

        let raw = context.storage.get_item(TEST_KEY).await?;
        let value: serde_json::Value = serde_json::from_str(raw.as_deref().unwrap_or("null"))?;
        assert_eq!(value["courses"].as_array().map(Vec::len), Some(1));
        assert_eq!(value["payments"].as_array().map(Vec::len), Some(1));
        assert_eq!(value["students"].as_array().map(Vec::len), Some(0));
        Ok(())
    }

    #[tokio::test]
    async fn test_corrupt_document_loads_empty() -> Result<()> {
        let storage = setup_test_storage().await?;
        storage.set_item(TEST_KEY, "{\"students\": oops").await?;

        let context = AppContext::load(storage, TEST_KEY).await?;
        assert!(context.data().is_empty());
        Ok(())
    }

    #[test]
    fn test_fac_code_format() {
        let c1 = course("c1", "Curso");
        assert_eq!(fac_code(Some(&c1), "18"), "FAC_C1_T18");
        assert_eq!(fac_code(None, " 7 "), "FAC_T7");

        let uncoded = Course { code: None, ..c1 };
        assert_eq!(fac_code(Some(&uncoded), "3"), "FAC_T3");
    }

    fn fac_form(suffix: &str) -> FacForm {
        FacForm {
            course_id: "c1".to_string(),
            name: "Turma".to_string(),
            start_date: date(2024, 2, 1),
            status: FacStatus::Planned,
            description: String::new(),
            code_suffix: suffix.to_string(),
        }
    }

    #[tokio::test]
    async fn test_add_and_edit_fac() -> Result<()> {
        let mut context = setup_test_context().await?;
        context.add(course("c1", "Curso")).await?;
        assert_eq!(context.suggested_fac_suffix(), "18");

        let created = context.add_fac(fac_form("18")).await?;
        assert_eq!(created.code, "FAC_C1_T18");
        assert_eq!(context.suggested_fac_suffix(), "19");

        let edit = FacForm {
            name: "Turma 18 - noite".to_string(),
            status: FacStatus::InProgress,
            code_suffix: String::new(),
            ..fac_form("")
        };
        assert!(context.edit_fac("FAC_C1_T18", edit).await?);

        let reloaded = reload(&context).await?;
        let stored = reloaded.fac_by_code("FAC_C1_T18");
        assert_eq!(stored.map(|f| f.id.as_str()), Some(created.id.as_str()));
        assert_eq!(stored.map(|f| f.status), Some(FacStatus::InProgress));
        assert_eq!(stored.map(|f| f.name.as_str()), Some("Turma 18 - noite"));

        assert!(!context.edit_fac("FAC_NOPE", fac_form("")).await?);
        Ok(())
    }

    #[tokio::test]
    async fn test_edit_fac_without_ids_touches_only_that_code() -> Result<()> {
        let storage = setup_test_storage().await?;
        let stored = AppData {
            facs: vec![fac("", "FAC_A", "c1"), fac("", "FAC_B", "c1")],
            ..AppData::default()
        };
        persistence::save(&storage, TEST_KEY, &stored).await?;
        let mut context = AppContext::load(storage, TEST_KEY).await?;

        let edit = FacForm {
            name: "A edited".to_string(),
            ..fac_form("")
        };
        assert!(context.edit_fac("FAC_A", edit).await?);

        let reloaded = reload(&context).await?;
        let names: Vec<(&str, &str)> = reloaded
            .facs()
            .iter()
            .map(|f| (f.code.as_str(), f.name.as_str()))
            .collect();
        assert_eq!(names, vec![("FAC_A", "A edited"), ("FAC_B", "Turma FAC_B")]);
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_fac_by_code_keeps_other_id_less_facs() -> Result<()> {
        let mut context = setup_test_context().await?;
        context.add(fac("", "FAC_A", "c1")).await?;
        context.add(fac("", "FAC_B", "c1")).await?;
        context.add(student("s1", "Ana", "FAC_A")).await?;

        assert!(context.delete_fac("FAC_A").await?);
        assert!(!context.delete_fac("FAC_A").await?);

        let reloaded = reload(&context).await?;
        let codes: Vec<&str> = reloaded.facs().iter().map(|f| f.code.as_str()).collect();
        assert_eq!(codes, vec!["FAC_B"]);
        assert_eq!(reloaded.students().len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_form_leaves_state_unchanged() -> Result<()> {
        let mut context = setup_test_context().await?;

        let result = context.add_fac(fac_form("  ")).await;
        assert!(matches!(result, Err(Error::MissingField { .. })));
        assert!(context.facs().is_empty());
        assert!(context.storage.get_item(TEST_KEY).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_enroll_student_uses_course_defaults() -> Result<()> {
        let mut context = setup_test_context().await?;
        context.add(course("c1", "Curso")).await?;
        context.add(fac("f1", "FAC_C1_T18", "c1")).await?;

        let student = context
            .enroll_student(StudentForm {
                full_name: " Ana Souza ".to_string(),
                email: "ana@example.com".to_string(),
                phone: String::new(),
                fac_code: "FAC_C1_T18".to_string(),
                course_fee: None,
                installment_count: None,
                first_due_date: date(2024, 3, 10),
                enrollment_status: None,
            })
            .await?;

        assert_eq!(student.full_name, "Ana Souza");
        assert_eq!(student.course_fee, 1200.0);
        assert_eq!(student.payment_installments.len(), 12);
        assert!(student.payment_installments.iter().all(|p| p.student_id == student.id));
        assert_eq!(context.students().len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_enroll_without_fee_or_course_fails() -> Result<()> {
        let mut context = setup_test_context().await?;
        let result = context
            .enroll_student(StudentForm {
                full_name: "Ana".to_string(),
                email: "ana@example.com".to_string(),
                phone: String::new(),
                fac_code: "FAC_UNKNOWN".to_string(),
                course_fee: None,
                installment_count: Some(2),
                first_due_date: date(2024, 3, 10),
                enrollment_status: None,
            })
            .await;
        assert!(matches!(result, Err(Error::CourseNotFound { .. })));
        assert!(context.students().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_add_expense_from_form() -> Result<()> {
        let mut context = setup_test_context().await?;
        let created = context
            .add_expense(ExpenseForm {
                fac_code: "FAC_A".to_string(),
                description: "Anúncios".to_string(),
                amount: 99.9,
                date: date(2024, 2, 15),
                category: ExpenseCategory::FacebookAds,
            })
            .await?;

        let reloaded = reload(&context).await?;
        assert_eq!(reloaded.expenses(), &[created]);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_payment_installment() -> Result<()> {
        let mut context = setup_test_context().await?;
        let mut ana = student("s1", "Ana", "FAC_A");
        ana.payment_installments = vec![
            installment("i1", "s1", 1, date(2024, 3, 10), 500.0, PaymentStatus::Pending),
            installment("i2", "s1", 2, date(2024, 4, 10), 500.0, PaymentStatus::Pending),
        ];
        context.add(ana).await?;

        let paid = InstallmentUpdate {
            status: PaymentStatus::Paid,
            payment_date: Some(date(2024, 3, 8)),
            notes: Some("pix".to_string()),
        };
        assert!(context.update_payment_installment("s1", "i1", paid).await?);

        // A non-PAID status drops the payment date even if one is supplied
        let canceled = InstallmentUpdate {
            status: PaymentStatus::Canceled,
            payment_date: Some(date(2024, 4, 1)),
            notes: None,
        };
        assert!(context.update_payment_installment("s1", "i2", canceled).await?);

        let missing = InstallmentUpdate {
            status: PaymentStatus::Paid,
            payment_date: None,
            notes: None,
        };
        assert!(!context.update_payment_installment("s2", "i1", missing).await?);

        let reloaded = reload(&context).await?;
        let stored = reloaded
            .student_by_id("s1")
            .map(|s| s.payment_installments.clone())
            .unwrap_or_default();
        assert_eq!(stored[0].status, PaymentStatus::Paid);
        assert_eq!(stored[0].payment_date, Some(date(2024, 3, 8)));
        assert_eq!(stored[0].notes.as_deref(), Some("pix"));
        assert_eq!(stored[1].status, PaymentStatus::Canceled);
        assert_eq!(stored[1].payment_date, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_apply_reconciliation_marks_matches_paid() -> Result<()> {
        let mut context = setup_test_context().await?;
        let mut ana = student("s1", "Ana Souza", "FAC_A");
        ana.payment_installments = vec![
            installment("i1", "s1", 1, date(2024, 3, 10), 500.0, PaymentStatus::Pending),
            installment("i2", "s1", 2, date(2024, 4, 10), 500.0, PaymentStatus::Pending),
        ];
        context.add(ana).await?;

        let statement = reconciliation::parse_bank_statement(
            "data,valor,descricao\n2024-03-11,R$ 500.00,PIX RECEBIDO - ANA SOUZA\n",
        )?;
        let result = context.reconcile(&statement, noon(2024, 3, 20));
        assert_eq!(result.matches.len(), 1);

        assert_eq!(context.apply_reconciliation(&result).await?, 1);

        let reloaded = reload(&context).await?;
        let stored = reloaded
            .student_by_id("s1")
            .map(|s| s.payment_installments.clone())
            .unwrap_or_default();
        assert_eq!(stored[0].status, PaymentStatus::Paid);
        assert_eq!(stored[0].payment_date, Some(date(2024, 3, 11)));
        assert_eq!(
            stored[0].notes.as_deref(),
            Some("Conciliado: PIX RECEBIDO - ANA SOUZA")
        );
        assert_eq!(stored[1].status, PaymentStatus::Pending);

        // The paid installment is no longer open
        let again = context.reconcile(&statement, noon(2024, 3, 20));
        let ids: Vec<&str> = again
            .matches
            .iter()
            .map(|m| m.installment.installment_id.as_str())
            .collect();
        assert_eq!(ids, vec!["i2"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_views_follow_mutations() -> Result<()> {
        let mut context = setup_test_context().await?;
        context.add(fac("f1", "FAC_A", "c1")).await?;
        let now = noon(2024, 6, 1);
        assert_eq!(context.financial_summaries(now)[0].total_students, 0);

        let mut ana = student("s1", "Ana", "FAC_A");
        ana.payment_installments = vec![
            installment("i1", "s1", 1, date(2024, 1, 10), 500.0, PaymentStatus::Paid),
            installment("i2", "s1", 2, date(2024, 2, 10), 500.0, PaymentStatus::Pending),
        ];
        context.add(ana).await?;
        context.add(expense("e1", "FAC_A", 100.0)).await?;

        let summary = &context.financial_summaries(now)[0];
        assert_eq!(summary.total_students, 1);
        assert_eq!(summary.net_result_realized, -100.0);
        assert_eq!(context.dashboard(now).total_expenses, 100.0);
        assert_eq!(context.installments(&InstallmentFilter::search("ana")).len(), 2);
        Ok(())
    }
}
