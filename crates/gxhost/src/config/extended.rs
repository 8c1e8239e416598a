//! Fields introduced with Mega-CD and add-on hardware support.

use super::{ConfigError, ValidationReport};
use gxhost_hw::codes::{add_on, fm_core};
use gxhost_hw::specs::audio::{VOLUME_MAX, VOLUME_MIN};
use gxhost_hw::specs::video::{VSCROLL_LIMIT_DEFAULT, VSCROLL_LIMIT_MAX, VSCROLL_LIMIT_MIN};

wire_enum! {
    /// Add-on hardware attached under the cartridge slot
    #[derive(Default)]
    pub enum AddOn in "extended.add_on" {
        #[default]
        Auto = add_on::AUTO,
        MegaCd = add_on::MEGA_CD,
        MegaSd = add_on::MEGA_SD,
        None = add_on::NONE,
    }
}

wire_enum! {
    /// Cycle-accurate FM core used instead of the default one
    pub enum FmCore in "extended.fm_core" {
        /// Emulate the integrated YM3438
        Ym3438 = fm_core::YM3438,
        /// Emulate the discrete YM2612
        Ym2612 = fm_core::YM2612,
    }
}

impl FmCore {
    /// Decode the optional selector, where `0` keeps the default core
    pub fn from_selector(code: u8) -> Result<Option<Self>, ConfigError> {
        match code {
            fm_core::DEFAULT => Ok(None),
            code => FmCore::try_from(code).map(Some),
        }
    }

    pub fn selector(core: Option<Self>) -> u8 {
        core.map_or(fm_core::DEFAULT, FmCore::code)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtendedConfig {
    /// Emulate CD drive access latency
    pub cd_latency: bool,
    pub cdda_volume: i16,
    pub pcm_volume: i16,
    pub add_on: AddOn,
    pub fm_core: Option<FmCore>,
    /// Per-column vertical scroll approximation for games that rely on it
    pub enhanced_vscroll: bool,
    pub vscroll_limit: u8,
}

impl Default for ExtendedConfig {
    fn default() -> Self {
        Self {
            cd_latency: true,
            cdda_volume: VOLUME_MAX,
            pcm_volume: VOLUME_MAX,
            add_on: AddOn::default(),
            fm_core: None,
            enhanced_vscroll: false,
            vscroll_limit: VSCROLL_LIMIT_DEFAULT,
        }
    }
}

impl ExtendedConfig {
    pub(super) fn clamp(&mut self, report: &mut ValidationReport) {
        report.clamp(
            "extended.cdda_volume",
            &mut self.cdda_volume,
            VOLUME_MIN,
            VOLUME_MAX,
        );
        report.clamp(
            "extended.pcm_volume",
            &mut self.pcm_volume,
            VOLUME_MIN,
            VOLUME_MAX,
        );
        report.clamp(
            "extended.vscroll_limit",
            &mut self.vscroll_limit,
            VSCROLL_LIMIT_MIN,
            VSCROLL_LIMIT_MAX,
        );
    }
}
