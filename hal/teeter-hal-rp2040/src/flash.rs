//! Flash storage driver for RP2040
//!
//! Uses sequential-storage for wear-leveled key-value storage
//! in the last 64KB of flash.
//!
//! Tasks never touch flash directly. They save into the core
//! [`RecordCache`], and the main loop calls [`Rp2040FlashStorage::flush`]
//! between scheduler passes.

use embassy_rp::dma::Channel;
use embassy_rp::flash::{Async, Flash};
use embassy_rp::peripherals::FLASH;
use embassy_rp::Peri;
use sequential_storage::cache::NoCache;
use sequential_storage::map;
use teeter_core::config::RecordCache;
use teeter_hal::storage::MAX_RECORD_LEN;

pub use teeter_hal::{StorageError, StorageKey};

/// Flash storage configuration
pub const FLASH_SIZE: usize = 2 * 1024 * 1024; // 2MB flash on the Pico
pub const CONFIG_PARTITION_SIZE: usize = 64 * 1024;
pub const CONFIG_PARTITION_START: usize = FLASH_SIZE - CONFIG_PARTITION_SIZE;

/// Flash range for the calibration partition
pub const CONFIG_RANGE: core::ops::Range<u32> =
    (CONFIG_PARTITION_START as u32)..(FLASH_SIZE as u32);

/// Scratch buffer for one item (record plus key and header)
const ITEM_BUFFER: usize = MAX_RECORD_LEN + 32;

/// RP2040 flash storage implementation
pub struct Rp2040FlashStorage<'d> {
    flash: Flash<'d, FLASH, Async, FLASH_SIZE>,
}

impl<'d> Rp2040FlashStorage<'d> {
    /// Create a new flash storage instance
    pub fn new(flash: Peri<'d, FLASH>, dma: Peri<'d, impl Channel>) -> Self {
        Self {
            flash: Flash::new(flash, dma),
        }
    }

    /// Read one record into `buffer`, returning its length
    pub async fn read(&mut self, key: StorageKey, buffer: &mut [u8]) -> Result<usize, StorageError> {
        let mut data_buffer = [0u8; ITEM_BUFFER];

        let result = map::fetch_item::<StorageKey, &[u8], _>(
            &mut self.flash,
            CONFIG_RANGE,
            &mut NoCache::new(),
            &mut data_buffer,
            &key,
        )
        .await;

        match result {
            Ok(Some(data)) => {
                let len = data.len();
                if buffer.len() < len {
                    return Err(StorageError::BufferTooSmall);
                }
                buffer[..len].copy_from_slice(data);
                Ok(len)
            }
            Ok(None) => Err(StorageError::NotFound),
            Err(_) => Err(StorageError::Flash),
        }
    }

    /// Replace one record
    pub async fn write(&mut self, key: StorageKey, data: &[u8]) -> Result<(), StorageError> {
        let mut data_buffer = [0u8; ITEM_BUFFER];

        map::store_item(
            &mut self.flash,
            CONFIG_RANGE,
            &mut NoCache::new(),
            &mut data_buffer,
            &key,
            &data,
        )
        .await
        .map_err(|_| StorageError::Flash)
    }

    /// Copy every stored record into the cache
    ///
    /// Returns the number of records found.
    pub async fn preload(&mut self, cache: &RecordCache) -> usize {
        let mut found = 0;
        let mut buf = [0u8; MAX_RECORD_LEN];

        for key in StorageKey::ALL {
            // Unreadable records are treated as missing
            if let Ok(len) = self.read(key, &mut buf).await {
                if cache.preload(key, &buf[..len]).is_ok() {
                    found += 1;
                }
            }
        }
        found
    }

    /// Commit dirty cache records to flash
    ///
    /// A record that fails to commit stays dirty and is retried on the
    /// next call.
    pub async fn flush(&mut self, cache: &RecordCache) -> Result<(), StorageError> {
        while let Some((key, data)) = cache.take_dirty() {
            if let Err(e) = self.write(key, &data).await {
                cache.mark_dirty(key);
                return Err(e);
            }
        }
        Ok(())
    }
}
