//! Numeric codes as stored in the settings blob and consumed by the core.

/// Console system identifiers (`0` selects auto-detection)
pub mod system {
    pub const AUTO: u8 = 0x00;
    pub const SG1000: u8 = 0x10;
    pub const SG1000_II: u8 = 0x11;
    pub const MARK_III: u8 = 0x12;
    pub const SMS: u8 = 0x20;
    pub const SMS2: u8 = 0x21;
    pub const GG: u8 = 0x40;
    pub const GG_MS: u8 = 0x41;
    pub const MD: u8 = 0x80;
    pub const PICO: u8 = 0x82;
    pub const MCD: u8 = 0x84;
}

/// Console regions
pub mod region {
    pub const NTSC_USA: u8 = 0;
    pub const PAL_EUROPE: u8 = 1;
    pub const NTSC_JAPAN: u8 = 2;
    pub const PAL_JAPAN: u8 = 3;
}

/// Host input device kinds
pub mod device {
    /// Port has nothing attached
    pub const NONE: i8 = -1;
    pub const KEYBOARD: i8 = 0;
    pub const JOYPAD: i8 = 1;
    pub const MOUSE: i8 = 2;
    pub const LIGHTGUN: i8 = 3;
}

/// Control pad types
pub mod pad {
    pub const TWO_BUTTON: u8 = 0;
    pub const THREE_BUTTON: u8 = 1;
    pub const SIX_BUTTON: u8 = 2;
}

/// Lock-on / pass-through cartridges
pub mod lock_on {
    pub const NONE: u8 = 0;
    pub const GAME_GENIE: u8 = 1;
    pub const ACTION_REPLAY: u8 = 2;
    pub const SONIC_KNUCKLES: u8 = 3;
}

/// Add-on hardware selection
pub mod add_on {
    pub const AUTO: u8 = 0;
    pub const MEGA_CD: u8 = 1;
    pub const MEGA_SD: u8 = 2;
    pub const NONE: u8 = 3;
}

/// Alternate FM cores (`0` keeps the default core)
pub mod fm_core {
    pub const DEFAULT: u8 = 0;
    pub const YM3438: u8 = 1;
    pub const YM2612: u8 = 2;
}

/// Settings blob schema versions
pub mod schema {
    pub const BASELINE: u32 = 1;
    pub const EXTENDED: u32 = 2;
}
