use super::ConfigError;

wire_enum! {
    /// Which overscan borders are shown
    #[derive(Default)]
    pub enum Overscan in "video.overscan" {
        #[default]
        None = 0,
        Vertical = 1,
        Horizontal = 2,
        Full = 3,
    }
}

wire_enum! {
    /// NTSC composite artifact emulation preset
    #[derive(Default)]
    pub enum NtscFilter in "video.ntsc" {
        #[default]
        Off = 0,
        Composite = 1,
        SVideo = 2,
        Rgb = 3,
    }
}

wire_enum! {
    /// Interlaced mode 2 handling
    #[derive(Default)]
    pub enum RenderMode in "video.render" {
        /// Single field per frame
        #[default]
        Normal = 0,
        /// Both fields, doubled vertical resolution
        InterlacedDouble = 1,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VideoConfig {
    pub overscan: Overscan,
    /// Show the full Master System area in Game Gear mode
    pub gg_extra: bool,
    pub ntsc: NtscFilter,
    /// LCD ghosting strength, 0 disables it
    pub lcd: u8,
    pub render: RenderMode,
}
