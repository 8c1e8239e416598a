//! Logical input port mapping and the shared per-frame input state.
//!
//! The [`InputTable`] says which host device feeds each of the
//! [`MAX_INPUTS`] logical ports. The platform fills an [`InputState`] from
//! those devices once per frame, and the core reads it afterwards.

use bitflags::bitflags;
use gxhost_hw::codes::{device, pad};
use gxhost_hw::limits::MAX_INPUTS;
use std::ops::Index;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("input port {0} out of range (max {max})", max = MAX_INPUTS - 1)]
    PortOutOfRange(usize),
}

/// Host peripheral feeding a logical port
///
/// The payload is the host device index (first joypad is `Joypad(0)`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeviceKind {
    #[default]
    None,
    Keyboard,
    Joypad(u8),
    Mouse(u8),
    Lightgun(u8),
}

impl DeviceKind {
    /// Wire representation: `(device code, host device index)`
    pub fn to_raw(self) -> (i8, u8) {
        match self {
            DeviceKind::None => (device::NONE, 0),
            DeviceKind::Keyboard => (device::KEYBOARD, 0),
            DeviceKind::Joypad(n) => (device::JOYPAD, n),
            DeviceKind::Mouse(n) => (device::MOUSE, n),
            DeviceKind::Lightgun(n) => (device::LIGHTGUN, n),
        }
    }

    /// Inverse of [`DeviceKind::to_raw`]
    ///
    /// `None` for unknown device codes, and for a non-zero host index on a
    /// kind that has no index (keyboard, no device).
    pub fn from_raw(code: i8, index: u8) -> Option<Self> {
        match (code, index) {
            (device::NONE, 0) => Some(DeviceKind::None),
            (device::KEYBOARD, 0) => Some(DeviceKind::Keyboard),
            (device::JOYPAD, n) => Some(DeviceKind::Joypad(n)),
            (device::MOUSE, n) => Some(DeviceKind::Mouse(n)),
            (device::LIGHTGUN, n) => Some(DeviceKind::Lightgun(n)),
            _ => None,
        }
    }
}

/// Control pad flavour presented to the emulated console
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PadVariant {
    TwoButton,
    #[default]
    ThreeButton,
    SixButton,
}

impl PadVariant {
    pub fn code(self) -> u8 {
        match self {
            PadVariant::TwoButton => pad::TWO_BUTTON,
            PadVariant::ThreeButton => pad::THREE_BUTTON,
            PadVariant::SixButton => pad::SIX_BUTTON,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            pad::TWO_BUTTON => Some(PadVariant::TwoButton),
            pad::THREE_BUTTON => Some(PadVariant::ThreeButton),
            pad::SIX_BUTTON => Some(PadVariant::SixButton),
            _ => None,
        }
    }
}

/// Assignment for one logical port
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputEntry {
    pub device: DeviceKind,
    pub pad: PadVariant,
}

impl InputEntry {
    /// Unassigned port
    pub const NO_DEVICE: InputEntry = InputEntry {
        device: DeviceKind::None,
        pad: PadVariant::ThreeButton,
    };

    pub fn is_assigned(&self) -> bool {
        self.device != DeviceKind::None
    }
}

/// Logical port to device mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputTable {
    entries: [InputEntry; MAX_INPUTS],
}

impl Default for InputTable {
    /// Keyboard on port 0, first joypad on port 1, everything else unassigned
    fn default() -> Self {
        let mut entries = [InputEntry::NO_DEVICE; MAX_INPUTS];
        entries[0].device = DeviceKind::Keyboard;
        entries[1].device = DeviceKind::Joypad(0);
        Self { entries }
    }
}

impl InputTable {
    /// Table with every port unassigned
    pub const fn empty() -> Self {
        Self {
            entries: [InputEntry::NO_DEVICE; MAX_INPUTS],
        }
    }

    pub fn assign(
        &mut self,
        port: usize,
        device: DeviceKind,
        pad: PadVariant,
    ) -> Result<(), InputError> {
        let entry = self
            .entries
            .get_mut(port)
            .ok_or(InputError::PortOutOfRange(port))?;
        *entry = InputEntry { device, pad };
        Ok(())
    }

    pub fn clear(&mut self, port: usize) -> Result<(), InputError> {
        let entry = self
            .entries
            .get_mut(port)
            .ok_or(InputError::PortOutOfRange(port))?;
        *entry = InputEntry::NO_DEVICE;
        Ok(())
    }

    pub fn get(&self, port: usize) -> Result<&InputEntry, InputError> {
        self.entries
            .get(port)
            .ok_or(InputError::PortOutOfRange(port))
    }

    /// All ports in order, assigned or not
    pub fn iter(&self) -> impl Iterator<Item = (usize, &InputEntry)> + '_ {
        self.entries.iter().enumerate()
    }

    /// Ports that have a device attached
    pub fn assigned(&self) -> impl Iterator<Item = (usize, &InputEntry)> + '_ {
        self.iter().filter(|(_, entry)| entry.is_assigned())
    }
}

/// Panics when `port >= MAX_INPUTS`; callers hold a validated port.
impl Index<usize> for InputTable {
    type Output = InputEntry;

    fn index(&self, port: usize) -> &InputEntry {
        &self.entries[port]
    }
}

bitflags! {
    /// Pad buttons, in the bit layout the core samples
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Buttons: u16 {
        const UP = 1 << 0;
        const DOWN = 1 << 1;
        const LEFT = 1 << 2;
        const RIGHT = 1 << 3;
        const B = 1 << 4;
        const C = 1 << 5;
        const A = 1 << 6;
        const START = 1 << 7;
        const Z = 1 << 8;
        const Y = 1 << 9;
        const X = 1 << 10;
        const MODE = 1 << 11;
    }
}

/// Sampled state of one logical port
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PadState {
    pub buttons: Buttons,
    /// Pointer position or paddle axis (mouse, lightgun, paddle)
    pub analog: [i16; 2],
}

/// Input state shared between the platform and the core
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputState {
    pub pads: [PadState; MAX_INPUTS],
}

impl InputState {
    pub fn release_all(&mut self) {
        self.pads = [PadState::default(); MAX_INPUTS];
    }
}
