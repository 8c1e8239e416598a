//! Sound chip selection, mixer levels and output filtering.

use super::{ConfigError, ValidationReport};
use gxhost_hw::specs::audio::*;

wire_enum! {
    /// Post-mix output filter
    #[derive(Default)]
    pub enum FilterMode in "audio.filter" {
        None = 0,
        #[default]
        LowPass = 1,
        /// Three-band equalizer
        Equalizer = 2,
    }
}

wire_enum! {
    /// YM2612 DAC behaviour to emulate
    #[derive(Default)]
    pub enum Ym2612Variant in "audio.ym2612" {
        /// Discrete chip, with the ladder effect distortion
        #[default]
        Discrete = 0,
        /// ASIC-integrated chip (YM3438 in later models)
        Integrated = 1,
        /// No DAC distortion at all
        Enhanced = 2,
    }
}

wire_enum! {
    /// Master System FM unit (YM2413)
    #[derive(Default)]
    pub enum Ym2413Mode in "audio.ym2413" {
        Off = 0,
        On = 1,
        /// Enabled for Japanese Master System titles only
        #[default]
        Auto = 2,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioConfig {
    /// High-quality FM resampling
    pub hq_fm: bool,
    pub filter: FilterMode,
    /// High-quality PSG resampling
    pub hq_psg: bool,
    pub ym2612: Ym2612Variant,
    pub ym2413: Ym2413Mode,
    pub mono: bool,
    pub psg_preamp: i16,
    pub fm_preamp: i16,
    /// Low-pass filter strength
    pub lp_range: i16,
    /// Equalizer low/mid crossover
    pub low_freq: i16,
    /// Equalizer mid/high crossover
    pub high_freq: i16,
    /// Equalizer band gains
    pub lg: i16,
    pub mg: i16,
    pub hg: i16,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            hq_fm: true,
            filter: FilterMode::default(),
            hq_psg: true,
            ym2612: Ym2612Variant::default(),
            ym2413: Ym2413Mode::default(),
            mono: false,
            psg_preamp: PREAMP_UNITY,
            fm_preamp: PREAMP_UNITY,
            lp_range: LP_RANGE_DEFAULT,
            low_freq: LOW_FREQ_DEFAULT,
            high_freq: HIGH_FREQ_DEFAULT,
            lg: 0,
            mg: 0,
            hg: 0,
        }
    }
}

impl AudioConfig {
    pub(super) fn clamp(&mut self, report: &mut ValidationReport) {
        report.clamp(
            "audio.psg_preamp",
            &mut self.psg_preamp,
            PREAMP_MIN,
            PREAMP_MAX,
        );
        report.clamp(
            "audio.fm_preamp",
            &mut self.fm_preamp,
            PREAMP_MIN,
            PREAMP_MAX,
        );
        report.clamp(
            "audio.lp_range",
            &mut self.lp_range,
            LP_RANGE_MIN,
            LP_RANGE_MAX,
        );
        report.clamp(
            "audio.low_freq",
            &mut self.low_freq,
            EQ_FREQ_MIN,
            EQ_FREQ_MAX,
        );
        report.clamp(
            "audio.high_freq",
            &mut self.high_freq,
            EQ_FREQ_MIN,
            EQ_FREQ_MAX,
        );
        report.clamp("audio.lg", &mut self.lg, EQ_GAIN_MIN, EQ_GAIN_MAX);
        report.clamp("audio.mg", &mut self.mg, EQ_GAIN_MIN, EQ_GAIN_MAX);
        report.clamp("audio.hg", &mut self.hg, EQ_GAIN_MIN, EQ_GAIN_MAX);
    }
}
