//! In-memory slot

use super::{Slot, StorageError, StorageResult};

/// A slot held in process memory
///
/// Can be switched into a failing mode to simulate a full or read-only
/// storage area.
#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
    name: String,
    payload: Option<String>,
    fail_writes: bool,
    writes: usize,
}

impl MemorySlot {
    /// Create an empty slot
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Create a slot that already holds a payload
    pub fn with_payload(name: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            payload: Some(payload.into()),
            ..Self::default()
        }
    }

    /// Make subsequent writes fail (or succeed again)
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// The currently stored payload
    pub fn payload(&self) -> Option<&str> {
        self.payload.as_deref()
    }

    /// Number of successful writes
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl Slot for MemorySlot {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self) -> StorageResult<Option<String>> {
        Ok(self.payload.clone())
    }

    fn save(&mut self, payload: &str) -> StorageResult<()> {
        if self.fail_writes {
            return Err(StorageError::Rejected {
                slot: self.name.clone(),
            });
        }
        self.payload = Some(payload.to_string());
        self.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failing_writes_keep_old_payload() {
        let mut slot = MemorySlot::with_payload("books", "[]");
        slot.set_fail_writes(true);

        assert!(slot.save("[1]").is_err());
        assert_eq!(slot.payload(), Some("[]"));
        assert_eq!(slot.writes(), 0);

        slot.set_fail_writes(false);
        slot.save("[1]").unwrap();
        assert_eq!(slot.payload(), Some("[1]"));
        assert_eq!(slot.writes(), 1);
    }
}
