use gxhost::config::{LockOn, Region};
use gxhost::host::ScriptEvent;
use gxhost::{
    ArchiveError, Buttons, Config, EmulationCore, FrameContext, HostPlatform, InputScript,
    InputState, InputTable, PathRegistry, Platform, Role, Session,
};
use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;
use tempfile::TempDir;

type Log = Rc<RefCell<Vec<String>>>;

/// Platform that records every call into a shared log
struct RecordingPlatform {
    log: Log,
    image: Vec<u8>,
}

impl Platform for RecordingPlatform {
    fn load_archive(
        &mut self,
        filename: &Path,
        buffer: &mut [u8],
        _extension: Option<&str>,
    ) -> Result<usize, ArchiveError> {
        self.log
            .borrow_mut()
            .push(format!("load {}", filename.display()));
        if self.image.len() > buffer.len() {
            return Err(ArchiveError::BufferTooSmall {
                needed: self.image.len() as u64,
                capacity: buffer.len(),
            });
        }
        buffer[..self.image.len()].copy_from_slice(&self.image);
        Ok(self.image.len())
    }

    fn refresh_inputs(&mut self, _table: &InputTable, state: &mut InputState) {
        self.log.borrow_mut().push("refresh".to_string());
        state.pads[0].buttons = Buttons::START;
    }

    fn cheat_update(&mut self) {
        self.log.borrow_mut().push("cheats".to_string());
    }
}

struct RecordingCore {
    log: Log,
    regions: Vec<Region>,
}

impl EmulationCore for RecordingCore {
    fn run_frame(&mut self, ctx: &FrameContext<'_>) {
        self.log.borrow_mut().push(format!(
            "frame {} start={}",
            ctx.frame,
            ctx.inputs.pads[0].buttons.contains(Buttons::START)
        ));
        self.regions.push(ctx.config.system.region);
    }
}

fn recording_session(image: &[u8]) -> (Session<RecordingPlatform>, RecordingCore, Log) {
    let log = Log::default();
    let platform = RecordingPlatform {
        log: log.clone(),
        image: image.to_vec(),
    };
    let core = RecordingCore {
        log: log.clone(),
        regions: Vec::new(),
    };
    (
        Session::new(Config::default(), PathRegistry::new(), platform),
        core,
        log,
    )
}

#[test]
fn step_polls_input_then_runs_core_then_applies_cheats() {
    let (mut session, mut core, log) = recording_session(&[]);

    session.run(&mut core, 2);

    assert_eq!(
        *log.borrow(),
        [
            "refresh",
            "frame 0 start=true",
            "cheats",
            "refresh",
            "frame 1 start=true",
            "cheats",
        ]
    );
    assert_eq!(session.frame(), 2);
    assert_eq!(session.stats().frames, 2);
}

#[test]
fn queued_config_is_installed_at_the_next_frame_boundary() {
    let (mut session, mut core, _log) = recording_session(&[]);

    session.step(&mut core);

    let mut pal = Config::default();
    pal.system.region = Region::PalEurope;
    pal.audio.fm_preamp = 500;
    let report = session.queue_config(pal);

    assert_eq!(report.clamped.len(), 1);
    assert!(session.has_pending_config());
    assert_eq!(session.config().system.region, Region::NtscUsa);

    session.step(&mut core);

    assert!(!session.has_pending_config());
    assert_eq!(session.config().audio.fm_preamp, 200);
    assert_eq!(core.regions, [Region::NtscUsa, Region::PalEurope]);
    assert_eq!(session.stats().config_swaps, 1);
}

#[test]
fn later_queue_replaces_earlier_one() {
    let (mut session, mut core, _log) = recording_session(&[]);

    let mut jp = Config::default();
    jp.system.region = Region::NtscJapan;
    session.queue_config(jp);
    let mut eu = Config::default();
    eu.system.region = Region::PalEurope;
    session.queue_config(eu);

    session.step(&mut core);

    assert_eq!(core.regions, [Region::PalEurope]);
    assert_eq!(session.stats().config_swaps, 1);
}

#[test]
fn rom_failures_collapse_to_none() {
    let (mut session, _core, _log) = recording_session(&[1, 2, 3, 4]);

    let mut small = [0u8; 2];
    let rom = Path::new("game.md");
    assert_eq!(session.load_rom(rom, &mut small, None), None);
    assert_eq!(small, [0, 0]);

    let mut buffer = [0u8; 8];
    assert_eq!(session.load_rom(rom, &mut buffer, Some(".md")), Some(4));
    assert_eq!(&buffer[..4], &[1, 2, 3, 4]);
}

#[test]
fn bios_loads_from_registered_path_only() {
    let (mut session, _core, log) = recording_session(b"BIOS");
    let mut buffer = [0u8; 16];

    assert_eq!(session.load_bios(Role::CdBiosUs, &mut buffer), None);
    assert!(log.borrow().is_empty());

    session
        .paths_mut()
        .set(Role::CdBiosUs, "/bios/us_scd.bin")
        .unwrap();
    assert_eq!(session.load_bios(Role::CdBiosUs, &mut buffer), Some(4));
    assert_eq!(*log.borrow(), ["load /bios/us_scd.bin"]);
}

#[test]
fn sonic_and_knuckles_lock_on_loads_both_cartridge_images() {
    let log = Log::default();
    let platform = RecordingPlatform {
        log: log.clone(),
        image: b"SK".to_vec(),
    };
    let mut config = Config::default();
    config.system.lock_on = LockOn::SonicKnuckles;
    let mut paths = PathRegistry::new();
    paths.set(Role::SonicKnucklesRom, "/carts/sk.bin").unwrap();
    paths
        .set(Role::SonicKnucklesUpmem, "/carts/sk2.bin")
        .unwrap();
    let mut session = Session::new(config, paths, platform);

    let mut loaded = Vec::new();
    for &role in session.lock_on_roles() {
        let mut buffer = [0u8; 4];
        loaded.push(session.load_bios(role, &mut buffer));
    }

    assert_eq!(loaded, [Some(2), Some(2)]);
    assert_eq!(*log.borrow(), ["load /carts/sk.bin", "load /carts/sk2.bin"]);
}

#[test]
fn host_platform_runs_a_scripted_session() {
    let dir = TempDir::new().unwrap();
    let rom = dir.path().join("game.sms");
    std::fs::write(&rom, [0xF3, 0xED, 0x56]).unwrap();

    let script = InputScript::new(vec![
        ScriptEvent {
            frame: 2,
            port: 0,
            buttons: Buttons::START,
        },
        ScriptEvent {
            frame: 4,
            port: 0,
            buttons: Buttons::empty(),
        },
    ])
    .unwrap();
    let mut session = Session::new(
        Config::default(),
        PathRegistry::new(),
        HostPlatform::with_script(script),
    );

    let mut buffer = vec![0u8; 1024];
    assert_eq!(session.load_rom(&rom, &mut buffer, Some("sms")), Some(3));

    struct StartCounter(u64);
    impl EmulationCore for StartCounter {
        fn run_frame(&mut self, ctx: &FrameContext<'_>) {
            if ctx.inputs.pads[0].buttons.contains(Buttons::START) {
                self.0 += 1;
            }
        }
    }

    let mut core = StartCounter(0);
    session.run(&mut core, 6);

    assert_eq!(core.0, 2);
    assert_eq!(session.platform().frames_polled(), 6);
    assert_eq!(session.inputs().pads[0].buttons, Buttons::empty());
}
