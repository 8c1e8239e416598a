use crate::config::ConfigError;
use crate::paths::Role;
use crate::settings::{self, Schema, Settings};
use clap::{Parser, Subcommand, ValueEnum};
use gxhost_hw::limits::{MAX_PATH_LEN, MAX_ROM_SIZE};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "gxhost",
    version,
    about = "Host shell for a multi-console emulator core"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Write the default settings to a file
    Defaults {
        #[arg(long)]
        out: PathBuf,

        #[arg(long, value_enum, default_value_t = SchemaArg::Extended)]
        schema: SchemaArg,
    },

    /// Load and validate a settings file
    Check { file: PathBuf },

    /// Extract one entry of an archive (zip, FAT image or plain file)
    Extract {
        archive: PathBuf,

        #[arg(long)]
        out: PathBuf,

        /// Only consider entries with this extension (".bin" or "bin")
        #[arg(long)]
        ext: Option<String>,

        /// Largest accepted entry (hex: 0x1234 or decimal: 1234)
        #[arg(long, value_parser = parse_hex_or_dec, default_value_t = MAX_ROM_SIZE as u64)]
        max_size: u64,
    },

    /// Load a ROM and run the headless frame loop
    Run(RunArgs),
}

#[derive(clap::Args, Debug, Clone)]
pub struct RunArgs {
    /// ROM image, optionally inside a zip or FAT image
    #[arg(long)]
    pub rom: PathBuf,

    /// Settings file. Defaults are used when omitted.
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Override a BIOS/cartridge path, e.g. --bios CD_BIOS_JP=/roms/jp.bin
    #[arg(long = "bios", value_parser = parse_bios)]
    pub bios: Vec<BiosOverride>,

    /// Number of frames to run
    #[arg(long, default_value_t = 600)]
    pub frames: u64,

    /// Extension filter applied when extracting the ROM
    #[arg(long)]
    pub ext: Option<String>,

    /// JSON input script of timed button presses
    #[arg(long)]
    pub script: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaArg {
    Baseline,
    Extended,
}

impl From<SchemaArg> for Schema {
    fn from(arg: SchemaArg) -> Self {
        match arg {
            SchemaArg::Baseline => Schema::Baseline,
            SchemaArg::Extended => Schema::Extended,
        }
    }
}

/// `ROLE=PATH` pair from the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BiosOverride {
    pub role: Role,
    pub path: String,
}

impl Args {
    /// Validate that the arguments are consistent
    pub fn validate(&self) -> Result<(), String> {
        match &self.command {
            Command::Extract { max_size, .. } if *max_size == 0 => {
                Err("--max-size must be greater than 0".to_string())
            }
            Command::Extract { max_size, .. } if *max_size > usize::MAX as u64 => {
                Err(format!("--max-size {max_size} does not fit in memory"))
            }
            Command::Run(run) => run.validate(),
            _ => Ok(()),
        }
    }
}

impl RunArgs {
    pub fn validate(&self) -> Result<(), String> {
        if self.frames == 0 {
            return Err("--frames must be greater than 0".to_string());
        }
        for (i, over) in self.bios.iter().enumerate() {
            if self.bios[..i].iter().any(|prev| prev.role == over.role) {
                return Err(format!("--bios {} given more than once", over.role));
            }
        }
        Ok(())
    }

    /// Settings for this run: the settings file (or defaults) with the
    /// `--bios` overrides applied.
    pub fn load_settings(&self) -> Result<Settings, ConfigError> {
        let mut settings = match &self.settings {
            Some(path) => settings::load_file(path)?,
            None => {
                info!("no settings file given, using defaults");
                Settings::defaults()
            }
        };
        for over in &self.bios {
            settings.paths.set(over.role, &over.path)?;
        }
        Ok(settings)
    }
}

pub fn parse_hex_or_dec(s: &str) -> Result<u64, std::num::ParseIntError> {
    if let Some(hex) = s.strip_prefix("0x") {
        u64::from_str_radix(hex, 16)
    } else {
        s.parse()
    }
}

pub fn parse_bios(s: &str) -> Result<BiosOverride, String> {
    let (role, path) = s
        .split_once('=')
        .ok_or_else(|| format!("expected ROLE=PATH, got `{s}`"))?;
    let role: Role = role.parse().map_err(|e| format!("{e}"))?;
    if path.is_empty() {
        return Err(format!("empty path for {role}"));
    }
    if path.len() > MAX_PATH_LEN {
        return Err(format!(
            "path for {role} is {} bytes, at most {MAX_PATH_LEN} allowed",
            path.len()
        ));
    }
    Ok(BiosOverride {
        role,
        path: path.to_string(),
    })
}
