use clap::Parser;
use gxhost::config::Config;
use gxhost::settings::{self, Schema};
use gxhost::{
    Args, Buttons, Command, EmulationCore, FrameContext, HostPlatform, InputScript, PathRegistry,
    RunArgs, Session, archive,
};
use gxhost_hw::limits::{MAX_BIOS_SIZE, MAX_INPUTS, MAX_ROM_SIZE};
use std::path::Path;
use tracing::{info, warn};

/// Stand-in core: records what it is fed each frame
#[derive(Default)]
struct HeadlessCore {
    frames: u64,
    last_buttons: [Buttons; MAX_INPUTS],
    input_changes: u64,
}

impl EmulationCore for HeadlessCore {
    fn run_frame(&mut self, ctx: &FrameContext<'_>) {
        for (port, _) in ctx.input_table().assigned() {
            let pad = &ctx.inputs.pads[port];
            if pad.buttons != self.last_buttons[port] {
                info!(frame = ctx.frame, port, buttons = ?pad.buttons, "input changed");
                self.last_buttons[port] = pad.buttons;
                self.input_changes += 1;
            }
        }
        self.frames += 1;
    }
}

fn main() {
    // Parse command-line arguments
    let args = Args::parse();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(2);
    }

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let exit_code = match args.command {
        Command::Defaults { out, schema } => write_defaults(&out, schema.into()),
        Command::Check { file } => check(&file),
        Command::Extract {
            archive,
            out,
            ext,
            max_size,
        } => extract(&archive, &out, ext.as_deref(), max_size as usize),
        Command::Run(run_args) => run(&run_args),
    };

    std::process::exit(exit_code);
}

fn write_defaults(out: &Path, schema: Schema) -> i32 {
    let mut config = Config::default();
    config.load_defaults();
    match settings::save_file(out, &config, &PathRegistry::new(), schema) {
        Ok(()) => {
            info!("Wrote default settings to {:?}", out);
            0
        }
        Err(e) => {
            eprintln!("Failed to write settings: {}", e);
            1
        }
    }
}

fn check(file: &Path) -> i32 {
    let settings = match settings::load_file(file) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Invalid settings file: {}", e);
            return 2;
        }
    };

    info!("=== Settings ===");
    info!(
        "Version: {} (schema {})",
        settings.version,
        settings.schema.number()
    );
    info!("Audio: {:?}", settings.config.audio);
    info!("Video: {:?}", settings.config.video);
    info!("System: {:?}", settings.config.system);
    info!("Extended: {:?}", settings.config.extended);
    for (port, entry) in settings.config.input.assigned() {
        info!("Port {}: {:?} {:?}", port, entry.device, entry.pad);
    }
    for (role, path) in settings.paths.iter() {
        info!("{}: {}", role, path);
    }

    for clamped in &settings.report.clamped {
        println!("{}: {} -> {}", clamped.field, clamped.from, clamped.to);
    }
    if settings.report.is_clean() {
        println!("ok");
    }
    0
}

fn extract(source: &Path, out: &Path, ext: Option<&str>, max_size: usize) -> i32 {
    let mut buffer = vec![0u8; max_size];
    let len = match archive::load_archive(source, &mut buffer, ext) {
        Ok(len) => len,
        Err(e) => {
            eprintln!("Failed to extract {:?}: {}", source, e);
            return 1;
        }
    };

    if let Err(e) = std::fs::write(out, &buffer[..len]) {
        eprintln!("Failed to write {:?}: {}", out, e);
        return 1;
    }
    info!("Extracted {} bytes to {:?}", len, out);
    0
}

fn run(args: &RunArgs) -> i32 {
    let settings = match args.load_settings() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Failed to load settings: {}", e);
            return 2;
        }
    };

    let platform = match &args.script {
        Some(path) => match InputScript::load_file(path) {
            Ok(script) => HostPlatform::with_script(script),
            Err(e) => {
                eprintln!("Failed to load input script: {}", e);
                return 2;
            }
        },
        None => HostPlatform::new(),
    };

    info!("=== Creating Session ===");
    let mut session = Session::from_settings(settings, platform);

    let mut rom = vec![0u8; MAX_ROM_SIZE];
    let Some(rom_len) = session.load_rom(&args.rom, &mut rom, args.ext.as_deref()) else {
        eprintln!("ROM unavailable: {:?}", args.rom);
        return 1;
    };
    info!("ROM: {} bytes", rom_len);

    let bios = session.bios_role().map(|role| (role, MAX_BIOS_SIZE));
    let lock_on = session
        .lock_on_roles()
        .iter()
        .map(|&role| (role, MAX_ROM_SIZE));
    for (role, max_size) in bios.into_iter().chain(lock_on) {
        let mut image = vec![0u8; max_size];
        match session.load_bios(role, &mut image) {
            Some(len) => info!("{}: {} bytes", role, len),
            None => warn!("{} unavailable, continuing without it", role),
        }
    }

    info!("=== Running Session (Headless) ===");
    let mut core = HeadlessCore::default();
    session.run(&mut core, args.frames);

    let stats = session.stats();
    info!("=== Session Complete ===");
    info!("Frames: {}", stats.frames);
    info!("Frame budget: {:?}", session.frame_budget());
    info!("Longest input refresh: {:?}", stats.longest_input_refresh);
    info!("Slow input refreshes: {}", stats.slow_input_refreshes);
    info!("Input changes: {}", core.input_changes);
    let polled = session.platform().frames_polled();
    info!("Frames polled by host: {}", polled);

    if core.frames != args.frames {
        eprintln!("Core ran {} of {} frames", core.frames, args.frames);
        return 1;
    }
    0
}
