//! Generic collection operations over the application document.
//!
//! Every entity type implements [`Record`], which names its collection inside
//! [`AppData`]. The add/update/delete contract is then written once and holds
//! identically for students, courses, cohorts, payments and expenses.
//!
//! None of these operations validate anything. Duplicate ids and dangling
//! references are accepted as given.

use crate::{
    core::persistence::AppData,
    models::{Course, Expense, Fac, Payment, Student},
};
use uuid::Uuid;

/// Generates a fresh client-side identifier.
#[must_use]
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// An entity stored in one of the five collections.
pub trait Record: Clone {
    /// Collection name, used in logs
    const KIND: &'static str;

    /// Opaque unique identifier.
    fn id(&self) -> &str;

    /// The collection this type lives in.
    fn collection(data: &AppData) -> &Vec<Self>;

    /// Mutable access to the collection this type lives in.
    fn collection_mut(data: &mut AppData) -> &mut Vec<Self>;
}

impl Record for Student {
    const KIND: &'static str = "students";

    fn id(&self) -> &str {
        &self.id
    }

    fn collection(data: &AppData) -> &Vec<Self> {
        &data.students
    }

    fn collection_mut(data: &mut AppData) -> &mut Vec<Self> {
        &mut data.students
    }
}

impl Record for Course {
    const KIND: &'static str = "courses";

    fn id(&self) -> &str {
        &self.id
    }

    fn collection(data: &AppData) -> &Vec<Self> {
        &data.courses
    }

    fn collection_mut(data: &mut AppData) -> &mut Vec<Self> {
        &mut data.courses
    }
}

impl Record for Fac {
    const KIND: &'static str = "facs";

    fn id(&self) -> &str {
        &self.id
    }

    fn collection(data: &AppData) -> &Vec<Self> {
        &data.facs
    }

    fn collection_mut(data: &mut AppData) -> &mut Vec<Self> {
        &mut data.facs
    }
}

impl Record for Payment {
    const KIND: &'static str = "payments";

    fn id(&self) -> &str {
        &self.id
    }

    fn collection(data: &AppData) -> &Vec<Self> {
        &data.payments
    }

    fn collection_mut(data: &mut AppData) -> &mut Vec<Self> {
        &mut data.payments
    }
}

impl Record for Expense {
    const KIND: &'static str = "expenses";

    fn id(&self) -> &str {
        &self.id
    }

    fn collection(data: &AppData) -> &Vec<Self> {
        &data.expenses
    }

    fn collection_mut(data: &mut AppData) -> &mut Vec<Self> {
        &mut data.expenses
    }
}

impl AppData {
    /// All records of one type, in insertion order.
    #[must_use]
    pub fn all<R: Record>(&self) -> &[R] {
        R::collection(self)
    }

    /// First record of one type with the given id.
    #[must_use]
    pub fn get<R: Record>(&self, id: &str) -> Option<&R> {
        R::collection(self).iter().find(|r| r.id() == id)
    }

    /// Appends `record` to the end of its collection.
    pub fn add<R: Record>(&mut self, record: R) {
        R::collection_mut(self).push(record);
    }

    /// Replaces every record whose id matches `record`'s and returns how many
    /// were replaced. All other records are left untouched.
    pub fn update<R: Record>(&mut self, record: R) -> usize {
        let mut replaced = 0;
        for item in R::collection_mut(self)
            .iter_mut()
            .filter(|item| item.id() == record.id())
        {
            *item = record.clone();
            replaced += 1;
        }
        replaced
    }

    /// Removes every record with `id` and returns how many were removed.
    /// Deleting an unknown id leaves the collection unchanged.
    pub fn delete<R: Record>(&mut self, id: &str) -> usize {
        let collection = R::collection_mut(self);
        let before = collection.len();
        collection.retain(|item| item.id() != id);
        before - collection.len()
    }
}
