//! Registry of BIOS and special-cartridge image paths.
//!
//! One fixed-capacity slot per [`Role`]. The registry only stores strings;
//! whether a path points at a readable file is checked by whoever loads it.

use gxhost_hw::limits::{MAX_PATH_LEN, PATH_CAPACITY};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised by the path registry and by BIOS loading
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("unknown path role `{0}`")]
    InvalidRole(String),

    #[error("path for {role} is {len} bytes, at most {max} allowed")]
    PathTooLong { role: Role, len: usize, max: usize },

    #[error("no path configured for {0}")]
    Unset(Role),

    #[error("{role} image at `{path}` could not be loaded")]
    Unavailable { role: Role, path: String },
}

/// Purpose a registered path serves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    /// Game Genie cartridge ROM
    GameGenieRom,
    /// Action Replay cartridge ROM
    ActionReplayRom,
    /// Sonic & Knuckles cartridge ROM
    SonicKnucklesRom,
    /// Sonic & Knuckles upper-memory (Sonic 2 patch) ROM
    SonicKnucklesUpmem,
    /// Game Gear boot ROM
    GameGearBios,
    /// Mega-CD boot ROMs
    CdBiosEu,
    CdBiosUs,
    CdBiosJp,
    /// Master System boot ROMs
    MsBiosUs,
    MsBiosEu,
    MsBiosJp,
}

impl Role {
    pub const COUNT: usize = 11;

    pub const ALL: [Role; Role::COUNT] = [
        Role::GameGenieRom,
        Role::ActionReplayRom,
        Role::SonicKnucklesRom,
        Role::SonicKnucklesUpmem,
        Role::GameGearBios,
        Role::CdBiosEu,
        Role::CdBiosUs,
        Role::CdBiosJp,
        Role::MsBiosUs,
        Role::MsBiosEu,
        Role::MsBiosJp,
    ];

    /// Name used on the command line and in the settings blob
    pub fn name(self) -> &'static str {
        match self {
            Role::GameGenieRom => "GG_ROM",
            Role::ActionReplayRom => "AR_ROM",
            Role::SonicKnucklesRom => "SK_ROM",
            Role::SonicKnucklesUpmem => "SK_UPMEM",
            Role::GameGearBios => "GG_BIOS",
            Role::CdBiosEu => "CD_BIOS_EU",
            Role::CdBiosUs => "CD_BIOS_US",
            Role::CdBiosJp => "CD_BIOS_JP",
            Role::MsBiosUs => "MS_BIOS_US",
            Role::MsBiosEu => "MS_BIOS_EU",
            Role::MsBiosJp => "MS_BIOS_JP",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Role {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.name() == s)
            .ok_or_else(|| PathError::InvalidRole(s.to_string()))
    }
}

/// Inline path buffer that never allocates
#[derive(Clone, Copy, PartialEq, Eq)]
struct PathSlot {
    buf: [u8; PATH_CAPACITY],
    len: usize,
}

impl PathSlot {
    const EMPTY: PathSlot = PathSlot {
        buf: [0; PATH_CAPACITY],
        len: 0,
    };

    fn as_str(&self) -> &str {
        // Only ever filled from a `&str`, so the prefix is valid UTF-8.
        std::str::from_utf8(&self.buf[..self.len]).unwrap_or_default()
    }

    fn store(&mut self, path: &str) {
        self.buf = [0; PATH_CAPACITY];
        self.buf[..path.len()].copy_from_slice(path.as_bytes());
        self.len = path.len();
    }
}

impl fmt::Debug for PathSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

/// Fixed set of path slots, one per [`Role`]
///
/// An empty slot means "not configured": the feature is disabled or the core
/// falls back to its built-in behaviour.
#[derive(Clone, PartialEq, Eq)]
pub struct PathRegistry {
    slots: [PathSlot; Role::COUNT],
}

impl Default for PathRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl PathRegistry {
    pub const fn new() -> Self {
        Self {
            slots: [PathSlot::EMPTY; Role::COUNT],
        }
    }

    /// Store `path` for `role`, replacing any previous value.
    ///
    /// Paths longer than [`MAX_PATH_LEN`] bytes are rejected, never truncated.
    /// An empty path clears the slot.
    pub fn set(&mut self, role: Role, path: &str) -> Result<(), PathError> {
        if path.len() > MAX_PATH_LEN {
            return Err(PathError::PathTooLong {
                role,
                len: path.len(),
                max: MAX_PATH_LEN,
            });
        }
        self.slots[role.index()].store(path);
        Ok(())
    }

    /// Like [`PathRegistry::set`], with the role given by name (`"CD_BIOS_JP"`)
    pub fn set_path(&mut self, role: &str, path: &str) -> Result<(), PathError> {
        self.set(role.parse()?, path)
    }

    /// Stored path, or `""` when the slot is empty
    pub fn get(&self, role: Role) -> &str {
        self.slots[role.index()].as_str()
    }

    /// Like [`PathRegistry::get`], with the role given by name
    pub fn get_path(&self, role: &str) -> Result<&str, PathError> {
        Ok(self.get(role.parse()?))
    }

    pub fn clear(&mut self, role: Role) {
        self.slots[role.index()] = PathSlot::EMPTY;
    }

    pub fn is_set(&self, role: Role) -> bool {
        self.slots[role.index()].len != 0
    }

    /// Non-empty slots in role order
    pub fn iter(&self) -> impl Iterator<Item = (Role, &str)> + '_ {
        Role::ALL
            .into_iter()
            .filter(|role| self.is_set(*role))
            .map(|role| (role, self.get(role)))
    }
}

impl fmt::Debug for PathRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
