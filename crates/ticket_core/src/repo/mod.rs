//! Repository layer: synchronous record store and cascade engine.
//!
//! # Responsibility
//! - Define the `Record` contract and generic CRUD over it.
//! - Compose primitives into referential-integrity preserving deletes.
//!
//! # Invariants
//! - Repository writes validate before persistence.
//! - Repository functions run inside a transaction owned by the caller.

pub mod cascade;
pub mod record_repo;
pub mod summary;
mod tables;

pub use cascade::{delete_feature_cascade, delete_project_cascade, CascadeReport};
pub use record_repo::{
    delete_row, get_record, insert_record, list_ids_by_index, list_records,
    list_records_by_index, modify_record, record_exists, update_record, Record, RepoError,
    RepoResult,
};
pub use summary::summarize_project;
