use crate::records::RecordStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemState {
    Idle,
    PendingConfirm,
}

/// Two-step delete for a list of cases. At most one item awaits confirmation.
#[derive(Debug, Default, Clone)]
pub struct DeleteConfirmation {
    pending: Option<String>,
}

impl DeleteConfirmation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, id: &str) -> ItemState {
        match &self.pending {
            Some(p) if p == id => ItemState::PendingConfirm,
            _ => ItemState::Idle,
        }
    }

    pub fn pending(&self) -> Option<&str> {
        self.pending.as_deref()
    }

    pub fn request(&mut self, id: impl Into<String>) {
        self.pending = Some(id.into());
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Delete the pending item. Returns whether a case was removed; with
    /// nothing pending this does nothing.
    pub fn confirm(&mut self, store: &mut RecordStore) -> anyhow::Result<bool> {
        let Some(id) = self.pending.take() else {
            return Ok(false);
        };
        store.delete(&id)
    }
}
