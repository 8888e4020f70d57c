//! RAM cache in front of slow calibration storage
//!
//! Tasks save calibration from inside a scheduler pass, where flash erase
//! and program cycles cannot run. The cache accepts the write at once and
//! marks the record dirty; the main loop commits dirty records between
//! passes with [`RecordCache::take_dirty`].

use core::cell::RefCell;

use heapless::Vec;
use teeter_hal::storage::MAX_RECORD_LEN;
use teeter_hal::{CalibrationStore, StorageError, StorageKey};

/// Bytes of one cached record
pub type RecordBytes = Vec<u8, MAX_RECORD_LEN>;

#[derive(Default)]
struct Entry {
    data: Option<RecordBytes>,
    dirty: bool,
}

/// Shared record cache; tasks hold `&RecordCache` as their store
pub struct RecordCache {
    entries: RefCell<[Entry; StorageKey::ALL.len()]>,
}

impl Default for RecordCache {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordCache {
    pub const fn new() -> Self {
        const EMPTY: Entry = Entry {
            data: None,
            dirty: false,
        };
        Self {
            entries: RefCell::new([EMPTY; StorageKey::ALL.len()]),
        }
    }

    /// Seed a record read from flash at start-up (not dirty)
    pub fn preload(&self, key: StorageKey, data: &[u8]) -> Result<(), StorageError> {
        let bytes = RecordBytes::from_slice(data).map_err(|_| StorageError::TooLarge)?;
        let mut entries = self.entries.borrow_mut();
        let entry = &mut entries[key.as_u8() as usize];
        entry.data = Some(bytes);
        entry.dirty = false;
        Ok(())
    }

    /// Whether any record is waiting to be committed
    pub fn is_dirty(&self) -> bool {
        self.entries.borrow().iter().any(|e| e.dirty)
    }

    /// Hand out one dirty record and clear its flag
    ///
    /// Call [`RecordCache::mark_dirty`] if the commit fails so the record
    /// is retried on the next flush.
    pub fn take_dirty(&self) -> Option<(StorageKey, RecordBytes)> {
        let mut entries = self.entries.borrow_mut();
        for key in StorageKey::ALL {
            let entry = &mut entries[key.as_u8() as usize];
            if !entry.dirty {
                continue;
            }
            entry.dirty = false;
            if let Some(data) = &entry.data {
                return Some((key, data.clone()));
            }
        }
        None
    }

    pub fn mark_dirty(&self, key: StorageKey) {
        let mut entries = self.entries.borrow_mut();
        let entry = &mut entries[key.as_u8() as usize];
        entry.dirty = entry.data.is_some();
    }
}

impl CalibrationStore for &RecordCache {
    fn load(&mut self, key: StorageKey, buffer: &mut [u8]) -> Result<usize, StorageError> {
        let entries = self.entries.borrow();
        let data = entries[key.as_u8() as usize]
            .data
            .as_ref()
            .ok_or(StorageError::NotFound)?;
        if buffer.len() < data.len() {
            return Err(StorageError::BufferTooSmall);
        }
        buffer[..data.len()].copy_from_slice(data);
        Ok(data.len())
    }

    fn store(&mut self, key: StorageKey, data: &[u8]) -> Result<(), StorageError> {
        let bytes = RecordBytes::from_slice(data).map_err(|_| StorageError::TooLarge)?;
        let mut entries = self.entries.borrow_mut();
        let entry = &mut entries[key.as_u8() as usize];
        entry.data = Some(bytes);
        entry.dirty = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_record() {
        let cache = RecordCache::new();
        let mut store = &cache;
        let mut buf = [0u8; 8];
        assert_eq!(
            store.load(StorageKey::ImuCalibration, &mut buf),
            Err(StorageError::NotFound)
        );
        assert_eq!(
            store.load(StorageKey::PanelCalibration, &mut buf),
            Err(StorageError::NotFound)
        );
    }

    #[test]
    fn test_preloaded_record_is_clean() {
        let cache = RecordCache::new();
        cache.preload(StorageKey::PanelCalibration, b"1,0,0,1,0,0").unwrap();
        assert!(!cache.is_dirty());
        assert!(cache.take_dirty().is_none());

        let mut store = &cache;
        let mut buf = [0u8; MAX_RECORD_LEN];
        let n = store.load(StorageKey::PanelCalibration, &mut buf).unwrap();
        assert_eq!(&buf[..n], b"1,0,0,1,0,0");
    }

    #[test]
    fn test_store_then_flush() {
        let cache = RecordCache::new();
        let mut store = &cache;
        store.store(StorageKey::ImuCalibration, b"0x01").unwrap();
        store.store(StorageKey::PanelCalibration, b"2").unwrap();
        assert!(cache.is_dirty());

        let (key, data) = cache.take_dirty().unwrap();
        assert_eq!(key, StorageKey::ImuCalibration);
        assert_eq!(data.as_slice(), b"0x01");
        let (key, _) = cache.take_dirty().unwrap();
        assert_eq!(key, StorageKey::PanelCalibration);
        assert!(cache.take_dirty().is_none());

        // Failed commit goes back in the queue
        cache.mark_dirty(StorageKey::PanelCalibration);
        assert_eq!(cache.take_dirty().map(|(k, _)| k), Some(StorageKey::PanelCalibration));
    }

    #[test]
    fn test_record_too_large() {
        let cache = RecordCache::new();
        let mut store = &cache;
        let big = [b'0'; MAX_RECORD_LEN + 1];
        assert_eq!(
            store.store(StorageKey::ImuCalibration, &big),
            Err(StorageError::TooLarge)
        );
        assert!(!cache.is_dirty());
    }

    #[test]
    fn test_small_buffer() {
        let cache = RecordCache::new();
        cache.preload(StorageKey::ImuCalibration, b"0123456789").unwrap();
        let mut store = &cache;
        let mut buf = [0u8; 4];
        assert_eq!(
            store.load(StorageKey::ImuCalibration, &mut buf),
            Err(StorageError::BufferTooSmall)
        );
    }
}
