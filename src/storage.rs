//! Where the serialized save lives.
//!
//! The browser build writes to `localStorage` under `STORAGE_KEY`; tests and
//! native hosts use `MemoryStore`.

use thiserror::Error;

/// localStorage のキー。ブラウザ版と同じキーを使い、既存のセーブを引き継ぐ。
pub const STORAGE_KEY: &str = "collidleState";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage is not available")]
    Unavailable,
    #[error("storage rejected the write: {0}")]
    WriteRejected(String),
}

/// A single save slot.
pub trait SaveStore {
    /// Raw saved text, or `None` when nothing has been stored.
    fn read(&self) -> Result<Option<String>, StoreError>;
    fn write(&mut self, data: &str) -> Result<(), StoreError>;
    fn clear(&mut self) -> Result<(), StoreError>;
}

/// In-memory slot. Counts writes so callers can observe save cadence.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    data: Option<String>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(data: impl Into<String>) -> Self {
        Self {
            data: Some(data.into()),
            writes: 0,
        }
    }

    pub fn data(&self) -> Option<&str> {
        self.data.as_deref()
    }

    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl SaveStore for MemoryStore {
    fn read(&self) -> Result<Option<String>, StoreError> {
        Ok(self.data.clone())
    }

    fn write(&mut self, data: &str) -> Result<(), StoreError> {
        self.data = Some(data.to_string());
        self.writes += 1;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.data = None;
        Ok(())
    }
}

/// Browser `localStorage` slot.
#[cfg(target_arch = "wasm32")]
#[derive(Clone, Debug, Default)]
pub struct LocalStorage;

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    fn storage() -> Result<web_sys::Storage, StoreError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .ok_or(StoreError::Unavailable)
    }
}

#[cfg(target_arch = "wasm32")]
impl SaveStore for LocalStorage {
    fn read(&self) -> Result<Option<String>, StoreError> {
        Self::storage()?
            .get_item(STORAGE_KEY)
            .map_err(|_| StoreError::Unavailable)
    }

    fn write(&mut self, data: &str) -> Result<(), StoreError> {
        Self::storage()?
            .set_item(STORAGE_KEY, data)
            .map_err(|e| StoreError::WriteRejected(format!("{e:?}")))
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        Self::storage()?
            .remove_item(STORAGE_KEY)
            .map_err(|e| StoreError::WriteRejected(format!("{e:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_starts_empty() {
        let store = MemoryStore::new();
        assert_eq!(store.read().unwrap(), None);
        assert_eq!(store.writes(), 0);
    }

    #[test]
    fn memory_store_write_then_read() {
        let mut store = MemoryStore::new();
        store.write("{\"mass\":1}").unwrap();
        assert_eq!(store.read().unwrap().as_deref(), Some("{\"mass\":1}"));
        assert_eq!(store.writes(), 1);
    }

    #[test]
    fn memory_store_clear() {
        let mut store = MemoryStore::with_data("x");
        store.clear().unwrap();
        assert_eq!(store.data(), None);
    }
}
