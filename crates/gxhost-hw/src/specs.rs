/// Video timing specifications
pub mod timing {
    /// NTSC master clock (53.693175 MHz)
    pub const MCLOCK_NTSC: u32 = 53_693_175;

    /// PAL master clock (53.203424 MHz)
    pub const MCLOCK_PAL: u32 = 53_203_424;

    /// Master clock cycles per scanline (both standards)
    pub const MCYCLES_PER_LINE: u32 = 3420;

    /// Scanlines per NTSC frame
    pub const LINES_NTSC: u32 = 262;

    /// Scanlines per PAL frame
    pub const LINES_PAL: u32 = 313;
}

/// Audio tuning ranges and defaults
///
/// Preamp and volume values are percentages, equalizer gains are signed
/// percentages of boost/cut around a flat response.
pub mod audio {
    /// Preamp range, 100 is unity gain
    pub const PREAMP_MIN: i16 = 0;
    pub const PREAMP_MAX: i16 = 200;
    pub const PREAMP_UNITY: i16 = 100;

    /// Equalizer band gain range, 0 is flat
    pub const EQ_GAIN_MIN: i16 = -100;
    pub const EQ_GAIN_MAX: i16 = 100;

    /// Low-pass filter strength, in percent
    pub const LP_RANGE_MIN: i16 = 0;
    pub const LP_RANGE_MAX: i16 = 100;
    pub const LP_RANGE_DEFAULT: i16 = 60;

    /// Equalizer crossover frequencies, in Hz
    pub const EQ_FREQ_MIN: i16 = 20;
    pub const EQ_FREQ_MAX: i16 = 20_000;
    pub const LOW_FREQ_DEFAULT: i16 = 880;
    pub const HIGH_FREQ_DEFAULT: i16 = 5000;

    /// CD-DA and PCM channel volume, in percent
    pub const VOLUME_MIN: i16 = 0;
    pub const VOLUME_MAX: i16 = 100;
}

/// Video tuning ranges and defaults
pub mod video {
    /// Enhanced per-column vertical scroll limit, in cells
    pub const VSCROLL_LIMIT_MIN: u8 = 2;
    pub const VSCROLL_LIMIT_MAX: u8 = 16;
    pub const VSCROLL_LIMIT_DEFAULT: u8 = 8;
}
