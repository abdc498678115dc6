//! The checksum sidecar (spec §4.7, §6.3): `control.dat` / `contrlN.dat`.
//! Three 500-slot sections (ship, planet, base) plus a host-999 ship
//! extension (slots 501-999), each slot a little-endian 32-bit checksum.

use crate::CoreError;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};

const SHIP_SLOTS: usize = 500;
const PLANET_SLOTS: usize = 500;
const BASE_SLOTS: usize = 500;
/// Host-999 extends ship slots 501-1500 (1000 additional entries):
/// 1500 ship + 500 planet + 500 base = 2500 entries total (spec §6.3).
const HOST_999_SHIP_SLOTS: usize = 1000;
const TRUNCATED_LEN: usize = 6002;
const FULL_LEN: usize = (SHIP_SLOTS + PLANET_SLOTS + BASE_SLOTS + HOST_999_SHIP_SLOTS) * 4;

/// Per-owner filename mapping (spec §4.7): `control.dat` for owner 0,
/// `contrlN.dat` for owner N, no file (`None`) for owner −1.
pub fn filename_for_owner(owner: i32) -> Option<String> {
    match owner {
        0 => Some("control.dat".to_string()),
        -1 => None,
        n if n > 0 => Some(format!("contrl{n}.dat")),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlFile {
    pub ships: Vec<u32>,
    pub planets: Vec<u32>,
    pub bases: Vec<u32>,
    pub ships_999: Vec<u32>,
}

impl Default for ControlFile {
    fn default() -> Self {
        Self {
            ships: vec![0; SHIP_SLOTS],
            planets: vec![0; PLANET_SLOTS],
            bases: vec![0; BASE_SLOTS],
            ships_999: vec![0; HOST_999_SHIP_SLOTS],
        }
    }
}

impl ControlFile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Out-of-range slot writes are silently discarded (spec §4.7).
    pub fn set_ship(&mut self, slot: usize, value: u32) {
        if (1..=SHIP_SLOTS).contains(&slot) {
            self.ships[slot - 1] = value;
        } else if (SHIP_SLOTS + 1..=SHIP_SLOTS + HOST_999_SHIP_SLOTS).contains(&slot) {
            self.ships_999[slot - SHIP_SLOTS - 1] = value;
        }
    }

    pub fn ship(&self, slot: usize) -> u32 {
        if (1..=SHIP_SLOTS).contains(&slot) {
            self.ships[slot - 1]
        } else if (SHIP_SLOTS + 1..=SHIP_SLOTS + HOST_999_SHIP_SLOTS).contains(&slot) {
            self.ships_999[slot - SHIP_SLOTS - 1]
        } else {
            0
        }
    }

    pub fn set_planet(&mut self, slot: usize, value: u32) {
        if (1..=PLANET_SLOTS).contains(&slot) {
            self.planets[slot - 1] = value;
        }
    }

    pub fn planet(&self, slot: usize) -> u32 {
        if (1..=PLANET_SLOTS).contains(&slot) { self.planets[slot - 1] } else { 0 }
    }

    pub fn set_base(&mut self, slot: usize, value: u32) {
        if (1..=BASE_SLOTS).contains(&slot) {
            self.bases[slot - 1] = value;
        }
    }

    pub fn base(&self, slot: usize) -> u32 {
        if (1..=BASE_SLOTS).contains(&slot) { self.bases[slot - 1] } else { 0 }
    }

    fn has_host_999_data(&self) -> bool {
        self.ships_999.iter().any(|&v| v != 0)
    }

    /// Loads from `dir`'s file for `owner` (per `filename_for_owner`).
    /// Short files are zero-padded; a missing file or `owner == -1`
    /// yields the all-zero default, not an error.
    pub fn load(dir: &Path, owner: i32) -> Result<Self, CoreError> {
        let Some(name) = filename_for_owner(owner) else {
            return Ok(Self::default());
        };
        let path = dir.join(name);
        let bytes = match std::fs::read(&path) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(CoreError::FileFormat(format!("{}: {e}", path.display()))),
        };
        Self::decode(&bytes)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, CoreError> {
        let mut padded = bytes.to_vec();
        padded.resize(FULL_LEN, 0);
        let mut cursor = Cursor::new(&padded);
        let mut file = Self::default();
        for slot in &mut file.ships {
            *slot = read_u32(&mut cursor)?;
        }
        for slot in &mut file.planets {
            *slot = read_u32(&mut cursor)?;
        }
        for slot in &mut file.bases {
            *slot = read_u32(&mut cursor)?;
        }
        for slot in &mut file.ships_999 {
            *slot = read_u32(&mut cursor)?;
        }
        Ok(file)
    }

    /// Saves to `dir` for `owner`; a no-op when `owner == -1` (spec §4.7).
    pub fn save(&self, dir: &Path, owner: i32) -> Result<(), CoreError> {
        let Some(name) = filename_for_owner(owner) else {
            return Ok(());
        };
        let path: PathBuf = dir.join(name);
        let bytes = self.encode();
        std::fs::write(&path, bytes).map_err(|e| CoreError::FileFormat(format!("{}: {e}", path.display())))
    }

    /// Truncates to `TRUNCATED_LEN` bytes whenever every host-999 slot is
    /// zero; writes the full 10000 bytes only when at least one such slot
    /// is nonzero (spec §9 Open Question, legacy-bug compatibility).
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(FULL_LEN);
        for &v in &self.ships {
            out.write_u32::<LittleEndian>(v).expect("Vec write never fails");
        }
        for &v in &self.planets {
            out.write_u32::<LittleEndian>(v).expect("Vec write never fails");
        }
        for &v in &self.bases {
            out.write_u32::<LittleEndian>(v).expect("Vec write never fails");
        }
        for &v in &self.ships_999 {
            out.write_u32::<LittleEndian>(v).expect("Vec write never fails");
        }
        if !self.has_host_999_data() {
            out.truncate(TRUNCATED_LEN);
        }
        out
    }
}

fn read_u32(cursor: &mut Cursor<&Vec<u8>>) -> Result<u32, CoreError> {
    cursor.read_u32::<LittleEndian>().map_err(|e| CoreError::FileFormat(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn filename_mapping_matches_owner_convention() {
        assert_eq!(filename_for_owner(0), Some("control.dat".to_string()));
        assert_eq!(filename_for_owner(3), Some("contrl3.dat".to_string()));
        assert_eq!(filename_for_owner(-1), None);
    }

    #[test]
    fn out_of_range_slot_write_is_discarded() {
        let mut file = ControlFile::new();
        file.set_planet(0, 7);
        file.set_planet(600, 9);
        assert_eq!(file.planet(0), 0);
        assert_eq!(file.planet(600), 0);
        assert_eq!(file.planets.iter().all(|&v| v == 0), true);
    }

    #[test]
    fn s6_control_file_round_trip_truncates_without_host_999_data() {
        let dir = tempdir().unwrap();
        let pattern: [u8; 16] = [1, 2, 3, 4, 5, 6, 7, 8, 1, 2, 3, 4, 5, 6, 7, 8];
        std::fs::write(dir.path().join("contrl3.dat"), pattern).unwrap();

        let loaded = ControlFile::load(dir.path(), 3).unwrap();
        assert_eq!(loaded.ship(1), u32::from_le_bytes([1, 2, 3, 4]));
        assert_eq!(loaded.ship(2), u32::from_le_bytes([5, 6, 7, 8]));
        assert_eq!(loaded.ship(3), u32::from_le_bytes([1, 2, 3, 4]));
        assert_eq!(loaded.ship(4), u32::from_le_bytes([5, 6, 7, 8]));

        let out_dir = tempdir().unwrap();
        loaded.save(out_dir.path(), 3).unwrap();
        let saved = std::fs::read(out_dir.path().join("contrl3.dat")).unwrap();
        assert_eq!(saved.len(), TRUNCATED_LEN);
        assert_eq!(&saved[..16], &pattern[..]);
        assert!(saved[16..].iter().all(|&b| b == 0));
    }

    #[test]
    fn host_999_data_forces_full_length_encode() {
        let mut file = ControlFile::new();
        file.set_ship(600, 42);
        assert_eq!(file.encode().len(), FULL_LEN);
    }
}
