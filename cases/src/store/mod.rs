/// Key under which the whole case collection is persisted.
pub const SLOT_KEY: &str = "iurisdata_cases";

/// Durable key-value slot holding the serialized case collection.
///
/// Read once when a [`crate::records::RecordStore`] is opened and overwritten
/// after every mutation. Implementations make no transactional promises; the
/// last writer wins.
pub trait CaseSlot: Send + Sync {
    /// Returns `None` when nothing has been stored yet.
    fn read(&self) -> anyhow::Result<Option<String>>;
    fn write(&self, payload: &str) -> anyhow::Result<()>;
}

impl<T: CaseSlot + ?Sized> CaseSlot for Box<T> {
    fn read(&self) -> anyhow::Result<Option<String>> {
        (**self).read()
    }

    fn write(&self, payload: &str) -> anyhow::Result<()> {
        (**self).write(payload)
    }
}

pub mod json;
pub mod memory;
#[cfg(feature = "sqlite")]
pub mod sqlite;
