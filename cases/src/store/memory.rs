use super::*;
use std::sync::Mutex;

/// Process-local slot. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemorySlot {
    value: Mutex<Option<String>>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_payload(payload: impl Into<String>) -> Self {
        Self {
            value: Mutex::new(Some(payload.into())),
        }
    }
}

impl CaseSlot for MemorySlot {
    fn read(&self) -> anyhow::Result<Option<String>> {
        let guard = self
            .value
            .lock()
            .map_err(|_| anyhow::anyhow!("memory slot poisoned"))?;
        Ok(guard.clone())
    }

    fn write(&self, payload: &str) -> anyhow::Result<()> {
        let mut guard = self
            .value
            .lock()
            .map_err(|_| anyhow::anyhow!("memory slot poisoned"))?;
        *guard = Some(payload.to_string());
        Ok(())
    }
}
