//! Calibration storage abstractions
//!
//! Provides a small key-value store for the calibration records that
//! survive a power cycle. Each record is one line of text; parsing and
//! formatting live in the application.

/// Longest record accepted by a store, in bytes
pub const MAX_RECORD_LEN: usize = 160;

/// Storage keys for persisted data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum StorageKey {
    /// IMU calibration profile (22 hexadecimal byte tokens)
    ImuCalibration = 0,
    /// Touch panel affine coefficients (6 decimal tokens)
    PanelCalibration = 1,
}

impl StorageKey {
    /// All keys, in storage order
    pub const ALL: [StorageKey; 2] = [StorageKey::ImuCalibration, StorageKey::PanelCalibration];

    /// Get the key as a byte value
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Create a key from a byte value
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(StorageKey::ImuCalibration),
            1 => Some(StorageKey::PanelCalibration),
            _ => None,
        }
    }
}

/// Errors from calibration storage operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageError {
    /// Underlying flash operation failed
    Flash,
    /// Key not found
    NotFound,
    /// Buffer too small for the data
    BufferTooSmall,
    /// Record exceeds [`MAX_RECORD_LEN`]
    TooLarge,
}

/// Synchronous calibration store
///
/// Tasks run to completion inside one scheduler pass, so the interface is
/// blocking. Implementations backed by slow media may accept the write
/// into RAM and commit it to flash later.
pub trait CalibrationStore {
    /// Read a record into `buffer`, returning its length
    fn load(&mut self, key: StorageKey, buffer: &mut [u8]) -> Result<usize, StorageError>;

    /// Replace a record
    fn store(&mut self, key: StorageKey, data: &[u8]) -> Result<(), StorageError>;
}

// Implement the sequential-storage Key trait when the feature is enabled
#[cfg(feature = "sequential-storage")]
impl sequential_storage::map::Key for StorageKey {
    fn serialize_into(
        &self,
        buffer: &mut [u8],
    ) -> Result<usize, sequential_storage::map::SerializationError> {
        if buffer.is_empty() {
            return Err(sequential_storage::map::SerializationError::BufferTooSmall);
        }
        buffer[0] = self.as_u8();
        Ok(1)
    }

    fn deserialize_from(
        buffer: &[u8],
    ) -> Result<(Self, usize), sequential_storage::map::SerializationError> {
        if buffer.is_empty() {
            return Err(sequential_storage::map::SerializationError::BufferTooSmall);
        }
        match StorageKey::from_u8(buffer[0]) {
            Some(key) => Ok((key, 1)),
            None => Err(sequential_storage::map::SerializationError::InvalidFormat),
        }
    }
}
