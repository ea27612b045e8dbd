//! Entity module - SeaORM entity definitions for the backing database.
//! The application state itself is a JSON document, so the only table is the
//! key/value store that holds it.

pub mod local_storage;

pub use local_storage::{
    Column as LocalStorageColumn, Entity as LocalStorage, Model as LocalStorageModel,
};
