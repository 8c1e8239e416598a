use super::ConfigError;
use gxhost_hw::codes::{lock_on, region, system};

wire_enum! {
    #[derive(Default)]
    pub enum ConsoleSystem in "system.system" {
        /// Pick from the loaded image
        #[default]
        Auto = system::AUTO,
        Sg1000 = system::SG1000,
        Sg1000II = system::SG1000_II,
        MarkIII = system::MARK_III,
        MasterSystem = system::SMS,
        MasterSystem2 = system::SMS2,
        GameGear = system::GG,
        /// Game Gear in Master System compatibility mode
        GameGearMs = system::GG_MS,
        MegaDrive = system::MD,
        Pico = system::PICO,
        MegaCd = system::MCD,
    }
}

wire_enum! {
    #[derive(Default)]
    pub enum Region in "system.region" {
        #[default]
        NtscUsa = region::NTSC_USA,
        PalEurope = region::PAL_EUROPE,
        NtscJapan = region::NTSC_JAPAN,
        PalJapan = region::PAL_JAPAN,
    }
}

impl Region {
    pub fn is_pal(self) -> bool {
        matches!(self, Region::PalEurope | Region::PalJapan)
    }
}

wire_enum! {
    /// Whether the cartridge header may override [`Region`]
    #[derive(Default)]
    pub enum RegionDetect in "system.region_detect" {
        #[default]
        Auto = 0,
        Forced = 1,
    }
}

wire_enum! {
    #[derive(Default)]
    pub enum ClockSource in "system.master_clock" {
        /// Follow the region
        #[default]
        Auto = 0,
        Ntsc = 1,
        Pal = 2,
    }
}

wire_enum! {
    /// VDP line count and frame rate
    #[derive(Default)]
    pub enum VdpMode in "system.vdp_mode" {
        /// Follow the region
        #[default]
        Auto = 0,
        Ntsc = 1,
        Pal = 2,
    }
}

wire_enum! {
    /// Cartridge plugged on top of the game
    #[derive(Default)]
    pub enum LockOn in "system.lock_on" {
        #[default]
        None = lock_on::NONE,
        GameGenie = lock_on::GAME_GENIE,
        ActionReplay = lock_on::ACTION_REPLAY,
        SonicKnuckles = lock_on::SONIC_KNUCKLES,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemConfig {
    pub system: ConsoleSystem,
    pub region: Region,
    pub region_detect: RegionDetect,
    pub master_clock: ClockSource,
    pub vdp_mode: VdpMode,
    /// Return DTACK on unmapped 68k accesses instead of locking up
    pub force_dtack: bool,
    /// Raise 68k address errors
    pub addr_error: bool,
    /// Boot through the configured console BIOS
    pub bios: bool,
    pub lock_on: LockOn,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            system: ConsoleSystem::default(),
            region: Region::default(),
            region_detect: RegionDetect::default(),
            master_clock: ClockSource::default(),
            vdp_mode: VdpMode::default(),
            force_dtack: false,
            addr_error: true,
            bios: false,
            lock_on: LockOn::default(),
        }
    }
}
