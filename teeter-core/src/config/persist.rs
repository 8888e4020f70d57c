//! Calibration record persistence
//!
//! Each calibration is stored as one line of comma-separated tokens:
//!
//! ```text
//! IMU:    0xe8,0xff,0x00,0x00,... (22 bytes, hex, "0x" optional on read)
//! Panel:  -0.0478,0.0012,0.0009,0.0251,97.7,-51.3 (6 decimals)
//! ```
//!
//! A record that exists is trusted; there is no checksum. A record that
//! does not parse is reported and treated as missing, which sends the
//! owning task back to interactive calibration.

use core::fmt::Write;

use heapless::String;
use teeter_hal::storage::MAX_RECORD_LEN;
use teeter_hal::{CalibrationStore, StorageError, StorageKey};

use crate::touch::Beta;

/// Length of a BNO055 calibration profile in bytes
pub const IMU_PROFILE_LEN: usize = 22;

/// Text form of one record
pub type Record = String<MAX_RECORD_LEN>;

/// Errors from loading or saving calibration records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PersistError {
    /// Storage operation failed
    Storage(StorageError),
    /// Record is not UTF-8 text
    Encoding,
    /// Wrong number of comma-separated tokens
    TokenCount { expected: usize, found: usize },
    /// A token is not a valid number
    Number { index: usize },
    /// Formatted record does not fit in [`MAX_RECORD_LEN`]
    Overflow,
}

impl From<StorageError> for PersistError {
    fn from(e: StorageError) -> Self {
        PersistError::Storage(e)
    }
}

/// Split a record into exactly `N` trimmed tokens
fn tokens<const N: usize>(line: &str) -> Result<[&str; N], PersistError> {
    let mut out = [""; N];
    let mut found = 0;

    for token in line.trim().split(',') {
        if found < N {
            out[found] = token.trim();
        }
        found += 1;
    }

    if found != N {
        return Err(PersistError::TokenCount { expected: N, found });
    }
    Ok(out)
}

/// Parse an IMU profile record
pub fn parse_imu_profile(line: &str) -> Result<[u8; IMU_PROFILE_LEN], PersistError> {
    let fields = tokens::<IMU_PROFILE_LEN>(line)?;
    let mut profile = [0u8; IMU_PROFILE_LEN];

    for (index, (field, byte)) in fields.into_iter().zip(profile.iter_mut()).enumerate() {
        let digits = field
            .strip_prefix("0x")
            .or_else(|| field.strip_prefix("0X"))
            .unwrap_or(field);
        *byte = u8::from_str_radix(digits, 16).map_err(|_| PersistError::Number { index })?;
    }

    Ok(profile)
}

/// Format an IMU profile record
pub fn format_imu_profile(profile: &[u8; IMU_PROFILE_LEN]) -> Result<Record, PersistError> {
    let mut line = Record::new();
    for (i, byte) in profile.iter().enumerate() {
        if i > 0 {
            line.push(',').map_err(|_| PersistError::Overflow)?;
        }
        write!(line, "{:#04x}", byte).map_err(|_| PersistError::Overflow)?;
    }
    Ok(line)
}

/// Parse a panel calibration record
pub fn parse_panel_beta(line: &str) -> Result<Beta, PersistError> {
    let fields = tokens::<6>(line)?;
    let mut coefficients = [0.0f32; 6];

    for (index, (field, c)) in fields.into_iter().zip(coefficients.iter_mut()).enumerate() {
        *c = field
            .parse::<f32>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or(PersistError::Number { index })?;
    }

    Ok(Beta::from_coefficients(coefficients))
}

/// Format a panel calibration record
///
/// Uses the shortest decimal form that reads back to the same `f32`.
pub fn format_panel_beta(beta: &Beta) -> Result<Record, PersistError> {
    let mut line = Record::new();
    for (i, c) in beta.coefficients().iter().enumerate() {
        if i > 0 {
            line.push(',').map_err(|_| PersistError::Overflow)?;
        }
        write!(line, "{}", c).map_err(|_| PersistError::Overflow)?;
    }
    Ok(line)
}

fn load_record<'b, S: CalibrationStore>(
    store: &mut S,
    key: StorageKey,
    buffer: &'b mut [u8; MAX_RECORD_LEN],
) -> Result<&'b str, PersistError> {
    let len = store.load(key, buffer)?;
    core::str::from_utf8(&buffer[..len]).map_err(|_| PersistError::Encoding)
}

/// Load the IMU profile, if a valid one is stored
pub fn load_imu_profile<S: CalibrationStore>(store: &mut S) -> Option<[u8; IMU_PROFILE_LEN]> {
    let mut buffer = [0u8; MAX_RECORD_LEN];
    let result = load_record(store, StorageKey::ImuCalibration, &mut buffer)
        .and_then(parse_imu_profile);

    match result {
        Ok(profile) => {
            info!("Loaded IMU calibration profile");
            Some(profile)
        }
        Err(PersistError::Storage(StorageError::NotFound)) => {
            debug!("No IMU calibration stored");
            None
        }
        Err(e) => {
            warn!("Ignoring stored IMU calibration: {}", e);
            None
        }
    }
}

/// Load the panel coefficients, if a valid record is stored
pub fn load_panel_beta<S: CalibrationStore>(store: &mut S) -> Option<Beta> {
    let mut buffer = [0u8; MAX_RECORD_LEN];
    let result = load_record(store, StorageKey::PanelCalibration, &mut buffer)
        .and_then(parse_panel_beta);

    match result {
        Ok(beta) => {
            info!("Loaded panel calibration");
            Some(beta)
        }
        Err(PersistError::Storage(StorageError::NotFound)) => {
            debug!("No panel calibration stored");
            None
        }
        Err(e) => {
            warn!("Ignoring stored panel calibration: {}", e);
            None
        }
    }
}

/// Save the IMU profile
pub fn save_imu_profile<S: CalibrationStore>(
    store: &mut S,
    profile: &[u8; IMU_PROFILE_LEN],
) -> Result<(), PersistError> {
    let line = format_imu_profile(profile)?;
    store.store(StorageKey::ImuCalibration, line.as_bytes())?;
    info!("Saved IMU calibration profile");
    Ok(())
}

/// Save the panel coefficients
pub fn save_panel_beta<S: CalibrationStore>(store: &mut S, beta: &Beta) -> Result<(), PersistError> {
    let line = format_panel_beta(beta)?;
    store.store(StorageKey::PanelCalibration, line.as_bytes())?;
    info!("Saved panel calibration");
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// In-memory store for task tests
    #[derive(Default)]
    pub(crate) struct MemoryStore {
        pub imu: Option<Record>,
        pub panel: Option<Record>,
        pub writes: usize,
    }

    impl MemoryStore {
        fn slot(&mut self, key: StorageKey) -> &mut Option<Record> {
            match key {
                StorageKey::ImuCalibration => &mut self.imu,
                StorageKey::PanelCalibration => &mut self.panel,
            }
        }
    }

    impl CalibrationStore for MemoryStore {
        fn load(&mut self, key: StorageKey, buffer: &mut [u8]) -> Result<usize, StorageError> {
            let record = self.slot(key).as_ref().ok_or(StorageError::NotFound)?;
            let bytes = record.as_bytes();
            if buffer.len() < bytes.len() {
                return Err(StorageError::BufferTooSmall);
            }
            buffer[..bytes.len()].copy_from_slice(bytes);
            Ok(bytes.len())
        }

        fn store(&mut self, key: StorageKey, data: &[u8]) -> Result<(), StorageError> {
            let text = core::str::from_utf8(data).map_err(|_| StorageError::Flash)?;
            let mut record = Record::new();
            record.push_str(text).map_err(|_| StorageError::TooLarge)?;
            *self.slot(key) = Some(record);
            self.writes += 1;
            Ok(())
        }
    }

    const PROFILE: [u8; IMU_PROFILE_LEN] = [
        0xe8, 0xff, 0x00, 0x00, 0x1f, 0x00, 0x10, 0x02, 0x7a, 0xfe, 0x33, 0x01, 0xff, 0xff, 0x00,
        0x00, 0x01, 0x00, 0xe8, 0x03, 0x4a, 0x02,
    ];

    #[test]
    fn test_imu_record_format() {
        let line = format_imu_profile(&PROFILE).unwrap();
        assert!(line.starts_with("0xe8,0xff,0x00,0x00,0x1f,"));
        assert!(line.ends_with(",0xe8,0x03,0x4a,0x02"));
    }

    #[test]
    fn test_imu_record_accepts_unprefixed_and_spaces() {
        let line = "e8, 0xff,0,0,1F,0,10,2,7a,fe,33,1,ff,ff,0,0,1,0,e8,3,4a,2\n";
        assert_eq!(parse_imu_profile(line).unwrap(), PROFILE);
    }

    #[test]
    fn test_imu_record_errors() {
        assert_eq!(
            parse_imu_profile("0x01,0x02"),
            Err(PersistError::TokenCount {
                expected: IMU_PROFILE_LEN,
                found: 2
            })
        );
        let mut bad = format_imu_profile(&PROFILE).unwrap();
        bad.push_str(",0x01").unwrap();
        assert!(matches!(
            parse_imu_profile(&bad),
            Err(PersistError::TokenCount { found: 23, .. })
        ));
        let line = "0x1g,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0";
        assert_eq!(parse_imu_profile(line), Err(PersistError::Number { index: 0 }));
        let line = "0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0x100";
        assert_eq!(parse_imu_profile(line), Err(PersistError::Number { index: 21 }));
    }

    #[test]
    fn test_panel_record_exact_readback() {
        let beta = Beta::from_coefficients([-0.047_812_3, 0.001_2, 0.000_9, 0.025_1, 97.7, -51.3]);
        let line = format_panel_beta(&beta).unwrap();
        assert_eq!(parse_panel_beta(&line).unwrap(), beta);
    }

    #[test]
    fn test_panel_record_rejects_garbage() {
        assert_eq!(
            parse_panel_beta("1,2,3,4,5,x"),
            Err(PersistError::Number { index: 5 })
        );
        assert_eq!(
            parse_panel_beta("1,2,3,4,5,inf"),
            Err(PersistError::Number { index: 5 })
        );
        assert!(matches!(
            parse_panel_beta(""),
            Err(PersistError::TokenCount { found: 1, .. })
        ));
    }

    #[test]
    fn test_store_load_cycle() {
        let mut store = MemoryStore::default();
        assert!(load_panel_beta(&mut store).is_none());
        assert!(load_imu_profile(&mut store).is_none());

        let beta = Beta::from_coefficients([1.0, 0.0, 0.0, 1.0, -2.5, 3.5]);
        save_panel_beta(&mut store, &beta).unwrap();
        save_imu_profile(&mut store, &PROFILE).unwrap();

        assert_eq!(load_panel_beta(&mut store), Some(beta));
        assert_eq!(load_imu_profile(&mut store), Some(PROFILE));
        assert_eq!(store.writes, 2);
    }

    #[test]
    fn test_malformed_record_is_missing() {
        let mut store = MemoryStore::default();
        store.store(StorageKey::PanelCalibration, b"1.0,2.0").unwrap();
        assert!(load_panel_beta(&mut store).is_none());
    }
}
