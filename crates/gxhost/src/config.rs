//! The emulation configuration aggregate.
//!
//! A [`Config`] is the one record every emulated subsystem consults each
//! frame: sound chip and filter tuning, video options, system/region
//! selection and the input port table. Fields added with CD and add-on
//! support live in the separate [`ExtendedConfig`] record so the baseline
//! shape can still be read and written on its own (see [`crate::settings`]).
//!
//! Enumerated fields are typed, so an in-memory `Config` can never hold an
//! unknown code: unknown codes are rejected when raw values are converted
//! with `TryFrom<u8>`. Ranged numeric fields are plain integers and are
//! brought back into range by [`Config::validate`].

use crate::input::InputTable;
use crate::paths::PathError;
use gxhost_hw::limits::MAX_INPUTS;
use thiserror::Error;
use tracing::warn;

/// Declares a fieldless enum backed by a `u8` wire code.
///
/// Generates `code()` and a `TryFrom<u8>` that fails with
/// [`ConfigError::InvalidEnumValue`] naming the settings field.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident in $field:literal {
            $( $(#[$vmeta:meta])* $variant:ident = $code:expr, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant, )+
        }

        impl $name {
            pub const FIELD: &'static str = $field;

            pub fn code(self) -> u8 {
                match self {
                    $( $name::$variant => $code, )+
                }
            }
        }

        impl TryFrom<u8> for $name {
            type Error = ConfigError;

            fn try_from(code: u8) -> Result<Self, ConfigError> {
                $(
                    if code == $code {
                        return Ok($name::$variant);
                    }
                )+
                Err(ConfigError::InvalidEnumValue {
                    field: $field,
                    value: code.into(),
                })
            }
        }
    };
}

mod audio;
mod extended;
mod system;
mod video;

pub use audio::{AudioConfig, FilterMode, Ym2413Mode, Ym2612Variant};
pub use extended::{AddOn, ExtendedConfig, FmCore};
pub use system::{
    ClockSource, ConsoleSystem, LockOn, Region, RegionDetect, SystemConfig, VdpMode,
};
pub use video::{NtscFilter, Overscan, RenderMode, VideoConfig};

/// Errors raised while turning persisted values into a [`Config`]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value {value} for `{field}`")]
    InvalidEnumValue { field: &'static str, value: i64 },

    #[error("unsupported settings schema {0}")]
    UnsupportedSchema(u64),

    #[error("settings schema mismatch: {0}")]
    SchemaMismatch(&'static str),

    #[error("{0} input entries, at most {max} allowed", max = MAX_INPUTS)]
    TooManyInputs(usize),

    #[error(transparent)]
    Path(#[from] PathError),

    #[error("malformed settings: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("settings i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// A numeric field that [`Config::validate`] pulled back into range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clamped {
    pub field: &'static str,
    pub from: i32,
    pub to: i32,
}

/// Fields adjusted by [`Config::validate`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub clamped: Vec<Clamped>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.clamped.is_empty()
    }

    pub(crate) fn clamp<T>(&mut self, field: &'static str, value: &mut T, min: T, max: T)
    where
        T: Ord + Copy + Into<i32>,
    {
        let clamped = (*value).clamp(min, max);
        if clamped != *value {
            warn!(
                field,
                from = (*value).into(),
                to = clamped.into(),
                "config value out of range, clamped"
            );
            self.clamped.push(Clamped {
                field,
                from: (*value).into(),
                to: clamped.into(),
            });
            *value = clamped;
        }
    }
}

/// Complete emulation configuration
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Config {
    pub audio: AudioConfig,
    pub video: VideoConfig,
    pub system: SystemConfig,
    pub input: InputTable,
    pub extended: ExtendedConfig,
}

impl Config {
    /// Reset every field to its documented default.
    pub fn load_defaults(&mut self) {
        *self = Config::default();
    }

    /// Clamp ranged numeric fields into their documented range.
    ///
    /// Nothing is rejected here: gains, filter settings and volumes are
    /// aesthetic, so a bad value degrades to the nearest legal one.
    pub fn validate(&mut self) -> ValidationReport {
        let mut report = ValidationReport::default();
        self.audio.clamp(&mut report);
        self.extended.clamp(&mut report);
        report
    }
}
