//! Case records for IurisData: storage, search, editing, backups and reports.

pub mod backup;
pub mod confirm;
pub mod demo;
pub mod export;
pub mod factory;
pub mod form;
pub mod query;
pub mod records;
pub mod store;
pub mod types;

pub use records::RecordStore;
pub use types::CaseFields;
pub use types::CaseRecord;
pub use types::Medium;
