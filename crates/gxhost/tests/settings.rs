use gxhost::config::{
    AddOn, ConsoleSystem, ExtendedConfig, FilterMode, FmCore, LockOn, NtscFilter, Overscan,
    Region, RenderMode, VdpMode, Ym2413Mode, Ym2612Variant,
};
use gxhost::settings::{self, Schema};
use gxhost::{Config, ConfigError, DeviceKind, PadVariant, PathRegistry, Role};
use tempfile::TempDir;

/// Every field moved off its default
fn tuned_config() -> Config {
    let mut config = Config::default();

    config.audio.hq_fm = false;
    config.audio.filter = FilterMode::Equalizer;
    config.audio.hq_psg = false;
    config.audio.ym2612 = Ym2612Variant::Enhanced;
    config.audio.ym2413 = Ym2413Mode::On;
    config.audio.mono = true;
    config.audio.psg_preamp = 150;
    config.audio.fm_preamp = 80;
    config.audio.lp_range = 35;
    config.audio.low_freq = 200;
    config.audio.high_freq = 8000;
    config.audio.lg = -40;
    config.audio.mg = 10;
    config.audio.hg = 75;

    config.video.overscan = Overscan::Full;
    config.video.gg_extra = true;
    config.video.ntsc = NtscFilter::SVideo;
    config.video.lcd = 128;
    config.video.render = RenderMode::InterlacedDouble;

    config.system.system = ConsoleSystem::MegaCd;
    config.system.region = Region::NtscJapan;
    config.system.vdp_mode = VdpMode::Pal;
    config.system.force_dtack = true;
    config.system.addr_error = false;
    config.system.bios = true;
    config.system.lock_on = LockOn::ActionReplay;

    config.input.clear(0).unwrap();
    config
        .input
        .assign(5, DeviceKind::Lightgun(1), PadVariant::TwoButton)
        .unwrap();
    config
        .input
        .assign(7, DeviceKind::Mouse(0), PadVariant::SixButton)
        .unwrap();

    config.extended = ExtendedConfig {
        cd_latency: false,
        cdda_volume: 40,
        pcm_volume: 65,
        add_on: AddOn::MegaSd,
        fm_core: Some(FmCore::Ym3438),
        enhanced_vscroll: true,
        vscroll_limit: 12,
    };
    config
}

fn tuned_paths() -> PathRegistry {
    let mut paths = PathRegistry::new();
    paths
        .set(Role::CdBiosJp, "/bios/[BIOS] Mega-CD (Japan).bin")
        .unwrap();
    paths.set(Role::SonicKnucklesRom, "/carts/sk.bin").unwrap();
    paths
}

#[test]
fn extended_round_trip_reproduces_every_field() {
    let config = tuned_config();
    let paths = tuned_paths();

    let mut blob = Vec::new();
    settings::save(&mut blob, &config, &paths, Schema::Extended).unwrap();
    let loaded = settings::load(blob.as_slice()).unwrap();

    assert_eq!(loaded.schema, Schema::Extended);
    assert_eq!(loaded.config, config);
    assert_eq!(loaded.paths, paths);
    assert_eq!(loaded.version, settings::VERSION);
    assert!(loaded.report.is_clean());
}

#[test]
fn baseline_blob_leaves_extended_fields_at_defaults() {
    let config = tuned_config();

    let mut blob = Vec::new();
    settings::save(&mut blob, &config, &PathRegistry::new(), Schema::Baseline).unwrap();
    let loaded = settings::load(blob.as_slice()).unwrap();

    assert_eq!(loaded.schema, Schema::Baseline);
    assert_eq!(loaded.config.extended, ExtendedConfig::default());
    assert_eq!(loaded.config.audio, config.audio);
    assert_eq!(loaded.config.video, config.video);
    assert_eq!(loaded.config.system, config.system);
    assert_eq!(loaded.config.input, config.input);
}

#[test]
fn hand_written_baseline_blob_loads() {
    let blob = r#"{
        "version": "GENPLUS-GX 1.7.4",
        "schema": 1,
        "audio": {
            "hq_fm": true, "filter": 2, "hq_psg": true, "ym2612": 0, "ym2413": 2,
            "mono": false, "psg_preamp": 100, "fm_preamp": 100, "lp_range": 60,
            "low_freq": 880, "high_freq": 5000, "lg": 0, "mg": 0, "hg": 0
        },
        "video": { "overscan": 3, "gg_extra": false, "ntsc": 0, "lcd": 0, "render": 0 },
        "system": {
            "system": 32, "region": 1, "region_detect": 1, "master_clock": 0,
            "vdp_mode": 0, "force_dtack": false, "addr_error": true, "bios": true,
            "lock_on": 0
        },
        "input": [
            { "device": 1, "port": 0, "padtype": 2 },
            { "device": -1, "port": 0, "padtype": 1 }
        ],
        "paths": { "MS_BIOS_EU": "/bios/sms_eu.bin" }
    }"#;

    let loaded = settings::load(blob.as_bytes()).unwrap();

    assert_eq!(loaded.version, "GENPLUS-GX 1.7.4");
    assert_eq!(loaded.config.audio.filter, FilterMode::Equalizer);
    assert_eq!(loaded.config.system.system, ConsoleSystem::MasterSystem);
    assert_eq!(loaded.config.system.region, Region::PalEurope);
    assert_eq!(loaded.config.input[0].device, DeviceKind::Joypad(0));
    assert_eq!(loaded.config.input[0].pad, PadVariant::SixButton);
    assert_eq!(loaded.config.input.assigned().count(), 1);
    assert_eq!(loaded.paths.get(Role::MsBiosEu), "/bios/sms_eu.bin");
    assert_eq!(loaded.config.extended, ExtendedConfig::default());
}

#[test]
fn file_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    let config = tuned_config();

    settings::save_file(&path, &config, &tuned_paths(), Schema::Extended).unwrap();
    let loaded = settings::load_file(&path).unwrap();

    assert_eq!(loaded.config, config);
    assert_eq!(loaded.paths.get(Role::SonicKnucklesRom), "/carts/sk.bin");
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = TempDir::new().unwrap();
    assert!(matches!(
        settings::load_file(dir.path().join("absent.json")),
        Err(ConfigError::Io(_))
    ));
}

#[test]
fn truncated_blob_is_malformed() {
    let config = Config::default();
    let mut blob = Vec::new();
    settings::save(&mut blob, &config, &PathRegistry::new(), Schema::Extended).unwrap();
    blob.truncate(blob.len() / 2);

    assert!(matches!(
        settings::load(blob.as_slice()),
        Err(ConfigError::Malformed(_))
    ));
}

#[test]
fn out_of_range_extended_fields_are_clamped() {
    let mut value =
        settings::to_value(&Config::default(), &PathRegistry::new(), Schema::Extended).unwrap();
    value["extended"]["cdda_volume"] = serde_json::json!(250);
    value["extended"]["vscroll_limit"] = serde_json::json!(1);

    let loaded = settings::from_value(value).unwrap();

    assert_eq!(loaded.config.extended.cdda_volume, 100);
    assert_eq!(loaded.config.extended.vscroll_limit, 2);
    let fields: Vec<_> = loaded.report.clamped.iter().map(|c| c.field).collect();
    assert_eq!(fields, ["extended.cdda_volume", "extended.vscroll_limit"]);
}

#[test]
fn unknown_fm_core_selector_is_rejected() {
    let mut value =
        settings::to_value(&Config::default(), &PathRegistry::new(), Schema::Extended).unwrap();
    value["extended"]["fm_core"] = serde_json::json!(3);

    assert!(matches!(
        settings::from_value(value),
        Err(ConfigError::InvalidEnumValue {
            field: "extended.fm_core",
            value: 3
        })
    ));
}

#[test]
fn host_index_on_keyboard_or_empty_port_is_rejected() {
    let paths = PathRegistry::new();
    let mut value = settings::to_value(&Config::default(), &paths, Schema::Baseline).unwrap();
    value["input"][0] = serde_json::json!({ "device": 0, "port": 3, "padtype": 1 });
    assert!(matches!(
        settings::from_value(value.clone()),
        Err(ConfigError::InvalidEnumValue {
            field: "input.port",
            value: 3
        })
    ));

    value["input"][0] = serde_json::json!({ "device": 0, "port": 0, "padtype": 1 });
    value["input"][2] = serde_json::json!({ "device": -1, "port": 5, "padtype": 1 });
    assert!(matches!(
        settings::from_value(value),
        Err(ConfigError::InvalidEnumValue {
            field: "input.port",
            value: 5
        })
    ));
}

#[test]
fn joypad_index_survives_a_round_trip() {
    let mut config = Config::default();
    config
        .input
        .assign(3, DeviceKind::Joypad(3), PadVariant::SixButton)
        .unwrap();

    let mut blob = Vec::new();
    settings::save(&mut blob, &config, &PathRegistry::new(), Schema::Extended).unwrap();
    let value: serde_json::Value = serde_json::from_slice(&blob).unwrap();
    assert_eq!(value["input"][3]["port"], 3);

    let loaded = settings::load(blob.as_slice()).unwrap();
    assert_eq!(loaded.config.input[3].device, DeviceKind::Joypad(3));
}
