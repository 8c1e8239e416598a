//! Emulation session: the explicit owner of the live configuration.
//!
//! There is no global configuration. A [`Session`] holds the one live
//! [`Config`] along with the path registry, the shared input state and the
//! host platform, and hands read-only views to the core every frame.
//!
//! Configuration changes are queued with [`Session::queue_config`] and only
//! installed at the start of the next [`Session::step`], so the core never
//! sees a configuration change half-way through a frame.

use crate::config::{AddOn, Config, ConsoleSystem, LockOn, Region, ValidationReport, VdpMode};
use crate::input::{InputState, InputTable};
use crate::paths::{PathError, PathRegistry, Role};
use crate::platform::Platform;
use crate::settings::Settings;
use gxhost_hw::specs::timing;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

/// Read-only view handed to the core for one frame
#[derive(Debug, Clone, Copy)]
pub struct FrameContext<'a> {
    pub config: &'a Config,
    pub inputs: &'a InputState,
    /// Number of the frame being run, starting at 0
    pub frame: u64,
}

impl FrameContext<'_> {
    /// Port mapping the inputs were sampled with
    pub fn input_table(&self) -> &InputTable {
        &self.config.input
    }
}

/// The emulated machine, driven one frame at a time
pub trait EmulationCore {
    fn run_frame(&mut self, ctx: &FrameContext<'_>);
}

/// Frame loop bookkeeping
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub frames: u64,
    /// Input refreshes that overran the frame budget
    pub slow_input_refreshes: u64,
    pub longest_input_refresh: Duration,
    /// Queued configurations installed at a frame boundary
    pub config_swaps: u64,
}

pub struct Session<P: Platform> {
    config: Config,
    pending: Option<Config>,
    paths: PathRegistry,
    inputs: InputState,
    platform: P,
    stats: FrameStats,
}

impl<P: Platform> Session<P> {
    /// Start a session. `config` is validated (clamped) before install.
    pub fn new(mut config: Config, paths: PathRegistry, platform: P) -> Self {
        let report = config.validate();
        if !report.is_clean() {
            warn!(
                clamped = report.clamped.len(),
                "initial config needed clamping"
            );
        }
        info!(
            system = ?config.system.system,
            region = ?config.system.region,
            "session created"
        );
        Self {
            config,
            pending: None,
            paths,
            inputs: InputState::default(),
            platform,
            stats: FrameStats::default(),
        }
    }

    pub fn from_settings(settings: Settings, platform: P) -> Self {
        Self::new(settings.config, settings.paths, platform)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn paths(&self) -> &PathRegistry {
        &self.paths
    }

    /// Paths only change on explicit user action, never from the core.
    pub fn paths_mut(&mut self) -> &mut PathRegistry {
        &mut self.paths
    }

    pub fn inputs(&self) -> &InputState {
        &self.inputs
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    pub fn frame(&self) -> u64 {
        self.stats.frames
    }

    /// Queue `config` for installation at the next frame boundary.
    ///
    /// A later call before that boundary replaces the earlier one.
    pub fn queue_config(&mut self, mut config: Config) -> ValidationReport {
        let report = config.validate();
        if self.pending.replace(config).is_some() {
            debug!("replaced a queued config that was never installed");
        }
        report
    }

    pub fn has_pending_config(&self) -> bool {
        self.pending.is_some()
    }

    /// Wall-clock time one frame may take at the configured video standard:
    /// a full frame of scanlines at that standard's master clock.
    pub fn frame_budget(&self) -> Duration {
        let pal = match self.config.system.vdp_mode {
            VdpMode::Ntsc => false,
            VdpMode::Pal => true,
            VdpMode::Auto => self.config.system.region.is_pal(),
        };
        let (mclock, lines) = if pal {
            (timing::MCLOCK_PAL, timing::LINES_PAL)
        } else {
            (timing::MCLOCK_NTSC, timing::LINES_NTSC)
        };
        let cycles = u64::from(timing::MCYCLES_PER_LINE) * u64::from(lines);
        Duration::from_nanos(cycles * 1_000_000_000 / u64::from(mclock))
    }

    /// Run one frame: install queued config, poll input, run the core,
    /// apply cheats.
    pub fn step<C: EmulationCore + ?Sized>(&mut self, core: &mut C) {
        if let Some(config) = self.pending.take() {
            self.config = config;
            self.stats.config_swaps += 1;
            debug!(frame = self.stats.frames, "installed queued config");
        }

        let started = Instant::now();
        self.platform
            .refresh_inputs(&self.config.input, &mut self.inputs);
        let elapsed = started.elapsed();
        self.stats.longest_input_refresh = self.stats.longest_input_refresh.max(elapsed);
        if elapsed > self.frame_budget() {
            self.stats.slow_input_refreshes += 1;
            warn!(
                frame = self.stats.frames,
                elapsed = ?elapsed,
                budget = ?self.frame_budget(),
                "input refresh overran the frame budget"
            );
        }

        let ctx = FrameContext {
            config: &self.config,
            inputs: &self.inputs,
            frame: self.stats.frames,
        };
        core.run_frame(&ctx);

        self.platform.cheat_update();
        self.stats.frames += 1;
    }

    pub fn run<C: EmulationCore + ?Sized>(&mut self, core: &mut C, frames: u64) {
        for _ in 0..frames {
            self.step(core);
        }
    }

    /// Load a game image. Any failure means "ROM unavailable".
    #[instrument(skip(self, buffer))]
    pub fn load_rom(
        &mut self,
        filename: &Path,
        buffer: &mut [u8],
        extension: Option<&str>,
    ) -> Option<usize> {
        match self.platform.load_archive(filename, buffer, extension) {
            Ok(len) => {
                info!(len, "ROM loaded");
                Some(len)
            }
            Err(e) => {
                warn!(error = %e, "ROM unavailable");
                None
            }
        }
    }

    /// Load the image registered for `role`.
    ///
    /// An empty slot or an unreadable file disables the feature; it is not
    /// an error for the session.
    #[instrument(skip(self, buffer))]
    pub fn load_bios(&mut self, role: Role, buffer: &mut [u8]) -> Option<usize> {
        if !self.paths.is_set(role) {
            debug!("{}", PathError::Unset(role));
            return None;
        }
        let path = self.paths.get(role);
        match self.platform.load_archive(Path::new(path), buffer, None) {
            Ok(len) => {
                info!(len, path, "image loaded");
                Some(len)
            }
            Err(e) => {
                let err = PathError::Unavailable {
                    role,
                    path: path.to_string(),
                };
                warn!(error = %e, "{err}, feature disabled");
                None
            }
        }
    }

    /// Boot ROM role the current configuration asks for, if any
    pub fn bios_role(&self) -> Option<Role> {
        let system = &self.config.system;
        let add_on_cd = self.config.extended.add_on == AddOn::MegaCd;
        if system.system == ConsoleSystem::MegaCd || add_on_cd {
            // The Mega-CD cannot boot without its BIOS.
            return Some(match system.region {
                Region::NtscUsa => Role::CdBiosUs,
                Region::PalEurope => Role::CdBiosEu,
                Region::NtscJapan | Region::PalJapan => Role::CdBiosJp,
            });
        }
        if !system.bios {
            return None;
        }
        let ms_bios = match system.region {
            Region::NtscUsa => Role::MsBiosUs,
            Region::PalEurope => Role::MsBiosEu,
            Region::NtscJapan | Region::PalJapan => Role::MsBiosJp,
        };
        match system.system {
            ConsoleSystem::GameGear | ConsoleSystem::GameGearMs => Some(Role::GameGearBios),
            ConsoleSystem::MarkIII
            | ConsoleSystem::MasterSystem
            | ConsoleSystem::MasterSystem2 => Some(ms_bios),
            _ => None,
        }
    }

    /// Cartridge images needed by the configured lock-on device, in load
    /// order. Sonic & Knuckles also maps its upper-memory ROM.
    pub fn lock_on_roles(&self) -> &'static [Role] {
        match self.config.system.lock_on {
            LockOn::None => &[],
            LockOn::GameGenie => &[Role::GameGenieRom],
            LockOn::ActionReplay => &[Role::ActionReplayRom],
            LockOn::SonicKnuckles => &[Role::SonicKnucklesRom, Role::SonicKnucklesUpmem],
        }
    }
}
