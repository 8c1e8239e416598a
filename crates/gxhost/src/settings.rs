//! Versioned settings persistence.
//!
//! Settings are stored as a JSON object carrying raw wire codes, tagged with
//! a `schema` number:
//!
//! - schema 1 (baseline): audio, video, system, input and paths.
//! - schema 2 (extended): everything above plus an `extended` object.
//!
//! The loader dispatches on `schema` before decoding anything else, so a
//! blob is never interpreted with the other schema's shape. Baseline blobs
//! are migrated by filling [`ExtendedConfig`] with its defaults. Decoding
//! rejects unknown enum codes and clamps ranged numbers, so what comes out
//! of [`load`] is ready to install.

use crate::config::{
    AddOn, AudioConfig, ClockSource, Config, ConfigError, ConsoleSystem, ExtendedConfig,
    FilterMode, FmCore, LockOn, NtscFilter, Overscan, Region, RegionDetect, RenderMode,
    SystemConfig, ValidationReport, VdpMode, VideoConfig, Ym2413Mode, Ym2612Variant,
};
use crate::input::{DeviceKind, InputEntry, InputTable, PadVariant};
use crate::paths::PathRegistry;
use gxhost_hw::codes::schema;
use gxhost_hw::limits::MAX_INPUTS;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Version string written into new blobs
pub const VERSION: &str = concat!("GXHOST ", env!("CARGO_PKG_VERSION"));

/// Settings blob layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Schema {
    Baseline,
    #[default]
    Extended,
}

impl Schema {
    pub fn number(self) -> u32 {
        match self {
            Schema::Baseline => schema::BASELINE,
            Schema::Extended => schema::EXTENDED,
        }
    }
}

/// Result of loading a settings blob
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub config: Config,
    pub paths: PathRegistry,
    /// Schema the blob was written with
    pub schema: Schema,
    /// Version string found in the blob
    pub version: String,
    /// Numeric fields that had to be clamped while loading
    pub report: ValidationReport,
}

impl Settings {
    /// Settings used when no blob is available
    pub fn defaults() -> Self {
        Self {
            config: Config::default(),
            paths: PathRegistry::new(),
            schema: Schema::default(),
            version: VERSION.to_string(),
            report: ValidationReport::default(),
        }
    }
}

// ================================================================================================
// Persisted shapes
// ================================================================================================

#[derive(Debug, Serialize, Deserialize)]
struct StoredAudio {
    hq_fm: bool,
    filter: u8,
    hq_psg: bool,
    ym2612: u8,
    ym2413: u8,
    mono: bool,
    psg_preamp: i16,
    fm_preamp: i16,
    lp_range: i16,
    low_freq: i16,
    high_freq: i16,
    lg: i16,
    mg: i16,
    hg: i16,
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredVideo {
    overscan: u8,
    gg_extra: bool,
    ntsc: u8,
    lcd: u8,
    render: u8,
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredSystem {
    system: u8,
    region: u8,
    region_detect: u8,
    master_clock: u8,
    vdp_mode: u8,
    force_dtack: bool,
    addr_error: bool,
    bios: bool,
    lock_on: u8,
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredInput {
    device: i8,
    port: u8,
    padtype: u8,
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredExtended {
    cd_latency: bool,
    cdda_volume: i16,
    pcm_volume: i16,
    add_on: u8,
    fm_core: u8,
    enhanced_vscroll: bool,
    vscroll_limit: u8,
}

#[derive(Debug, Serialize, Deserialize)]
struct BaselineBlob {
    version: String,
    schema: u32,
    audio: StoredAudio,
    video: StoredVideo,
    system: StoredSystem,
    input: Vec<StoredInput>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    paths: BTreeMap<String, String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ExtendedBlob {
    #[serde(flatten)]
    base: BaselineBlob,
    extended: StoredExtended,
}

// ================================================================================================
// Typed -> stored
// ================================================================================================

impl From<&AudioConfig> for StoredAudio {
    fn from(audio: &AudioConfig) -> Self {
        Self {
            hq_fm: audio.hq_fm,
            filter: audio.filter.code(),
            hq_psg: audio.hq_psg,
            ym2612: audio.ym2612.code(),
            ym2413: audio.ym2413.code(),
            mono: audio.mono,
            psg_preamp: audio.psg_preamp,
            fm_preamp: audio.fm_preamp,
            lp_range: audio.lp_range,
            low_freq: audio.low_freq,
            high_freq: audio.high_freq,
            lg: audio.lg,
            mg: audio.mg,
            hg: audio.hg,
        }
    }
}

impl From<&VideoConfig> for StoredVideo {
    fn from(video: &VideoConfig) -> Self {
        Self {
            overscan: video.overscan.code(),
            gg_extra: video.gg_extra,
            ntsc: video.ntsc.code(),
            lcd: video.lcd,
            render: video.render.code(),
        }
    }
}

impl From<&SystemConfig> for StoredSystem {
    fn from(system: &SystemConfig) -> Self {
        Self {
            system: system.system.code(),
            region: system.region.code(),
            region_detect: system.region_detect.code(),
            master_clock: system.master_clock.code(),
            vdp_mode: system.vdp_mode.code(),
            force_dtack: system.force_dtack,
            addr_error: system.addr_error,
            bios: system.bios,
            lock_on: system.lock_on.code(),
        }
    }
}

impl From<&InputEntry> for StoredInput {
    fn from(entry: &InputEntry) -> Self {
        let (device, port) = entry.device.to_raw();
        Self {
            device,
            port,
            padtype: entry.pad.code(),
        }
    }
}

impl From<&ExtendedConfig> for StoredExtended {
    fn from(extended: &ExtendedConfig) -> Self {
        Self {
            cd_latency: extended.cd_latency,
            cdda_volume: extended.cdda_volume,
            pcm_volume: extended.pcm_volume,
            add_on: extended.add_on.code(),
            fm_core: FmCore::selector(extended.fm_core),
            enhanced_vscroll: extended.enhanced_vscroll,
            vscroll_limit: extended.vscroll_limit,
        }
    }
}

// ================================================================================================
// Stored -> typed
// ================================================================================================

impl TryFrom<StoredAudio> for AudioConfig {
    type Error = ConfigError;

    fn try_from(raw: StoredAudio) -> Result<Self, ConfigError> {
        Ok(Self {
            hq_fm: raw.hq_fm,
            filter: FilterMode::try_from(raw.filter)?,
            hq_psg: raw.hq_psg,
            ym2612: Ym2612Variant::try_from(raw.ym2612)?,
            ym2413: Ym2413Mode::try_from(raw.ym2413)?,
            mono: raw.mono,
            psg_preamp: raw.psg_preamp,
            fm_preamp: raw.fm_preamp,
            lp_range: raw.lp_range,
            low_freq: raw.low_freq,
            high_freq: raw.high_freq,
            lg: raw.lg,
            mg: raw.mg,
            hg: raw.hg,
        })
    }
}

impl TryFrom<StoredVideo> for VideoConfig {
    type Error = ConfigError;

    fn try_from(raw: StoredVideo) -> Result<Self, ConfigError> {
        Ok(Self {
            overscan: Overscan::try_from(raw.overscan)?,
            gg_extra: raw.gg_extra,
            ntsc: NtscFilter::try_from(raw.ntsc)?,
            lcd: raw.lcd,
            render: RenderMode::try_from(raw.render)?,
        })
    }
}

impl TryFrom<StoredSystem> for SystemConfig {
    type Error = ConfigError;

    fn try_from(raw: StoredSystem) -> Result<Self, ConfigError> {
        Ok(Self {
            system: ConsoleSystem::try_from(raw.system)?,
            region: Region::try_from(raw.region)?,
            region_detect: RegionDetect::try_from(raw.region_detect)?,
            master_clock: ClockSource::try_from(raw.master_clock)?,
            vdp_mode: VdpMode::try_from(raw.vdp_mode)?,
            force_dtack: raw.force_dtack,
            addr_error: raw.addr_error,
            bios: raw.bios,
            lock_on: LockOn::try_from(raw.lock_on)?,
        })
    }
}

impl TryFrom<StoredExtended> for ExtendedConfig {
    type Error = ConfigError;

    fn try_from(raw: StoredExtended) -> Result<Self, ConfigError> {
        Ok(Self {
            cd_latency: raw.cd_latency,
            cdda_volume: raw.cdda_volume,
            pcm_volume: raw.pcm_volume,
            add_on: AddOn::try_from(raw.add_on)?,
            fm_core: FmCore::from_selector(raw.fm_core)?,
            enhanced_vscroll: raw.enhanced_vscroll,
            vscroll_limit: raw.vscroll_limit,
        })
    }
}

fn decode_inputs(raw: Vec<StoredInput>) -> Result<InputTable, ConfigError> {
    if raw.len() > MAX_INPUTS {
        return Err(ConfigError::TooManyInputs(raw.len()));
    }

    let mut table = InputTable::empty();
    for (port, entry) in raw.iter().enumerate() {
        let device = DeviceKind::from_raw(entry.device, entry.port)
            .ok_or_else(|| invalid_device(entry))?;
        let pad = PadVariant::from_code(entry.padtype)
            .ok_or_else(|| invalid("input.padtype", entry.padtype))?;
        // `port` < MAX_INPUTS, checked above
        table
            .assign(port, device, pad)
            .map_err(|_| ConfigError::TooManyInputs(port + 1))?;
    }
    Ok(table)
}

fn invalid_device(entry: &StoredInput) -> ConfigError {
    // Keyboard and "no device" carry no host index.
    if DeviceKind::from_raw(entry.device, 0).is_some() {
        invalid("input.port", entry.port)
    } else {
        invalid("input.device", entry.device)
    }
}

fn invalid(field: &'static str, value: impl Into<i64>) -> ConfigError {
    ConfigError::InvalidEnumValue {
        field,
        value: value.into(),
    }
}

fn decode_paths(raw: BTreeMap<String, String>) -> Result<PathRegistry, ConfigError> {
    let mut paths = PathRegistry::new();
    for (role, path) in &raw {
        paths.set_path(role, path)?;
    }
    Ok(paths)
}

fn decode_base(blob: BaselineBlob) -> Result<(Config, PathRegistry, String), ConfigError> {
    let config = Config {
        audio: blob.audio.try_into()?,
        video: blob.video.try_into()?,
        system: blob.system.try_into()?,
        input: decode_inputs(blob.input)?,
        extended: ExtendedConfig::default(),
    };
    let paths = decode_paths(blob.paths)?;
    Ok((config, paths, blob.version))
}

fn encode_base(config: &Config, paths: &PathRegistry, schema: Schema) -> BaselineBlob {
    BaselineBlob {
        version: VERSION.to_string(),
        schema: schema.number(),
        audio: (&config.audio).into(),
        video: (&config.video).into(),
        system: (&config.system).into(),
        input: config
            .input
            .iter()
            .map(|(_, entry)| StoredInput::from(entry))
            .collect(),
        paths: paths
            .iter()
            .map(|(role, path)| (role.name().to_string(), path.to_string()))
            .collect(),
    }
}

// ================================================================================================
// Public API
// ================================================================================================

/// Decode a settings blob from `reader`.
pub fn load<R: Read>(reader: R) -> Result<Settings, ConfigError> {
    let value: serde_json::Value = serde_json::from_reader(reader)?;
    from_value(value)
}

/// Decode a settings blob from an already-parsed JSON value.
pub fn from_value(value: serde_json::Value) -> Result<Settings, ConfigError> {
    let schema_number = value
        .get("schema")
        .and_then(serde_json::Value::as_u64)
        .ok_or(ConfigError::SchemaMismatch("missing `schema` tag"))?;
    let has_extended = value.get("extended").is_some();

    let (mut config, paths, version, schema) = match schema_number {
        n if n == u64::from(schema::BASELINE) => {
            if has_extended {
                return Err(ConfigError::SchemaMismatch(
                    "baseline blob carries an `extended` section",
                ));
            }
            let blob: BaselineBlob = serde_json::from_value(value)?;
            let (config, paths, version) = decode_base(blob)?;
            debug!("migrated baseline settings, extended fields at defaults");
            (config, paths, version, Schema::Baseline)
        }
        n if n == u64::from(schema::EXTENDED) => {
            if !has_extended {
                return Err(ConfigError::SchemaMismatch(
                    "extended blob lacks its `extended` section",
                ));
            }
            let blob: ExtendedBlob = serde_json::from_value(value)?;
            let extended = blob.extended.try_into()?;
            let (mut config, paths, version) = decode_base(blob.base)?;
            config.extended = extended;
            (config, paths, version, Schema::Extended)
        }
        other => return Err(ConfigError::UnsupportedSchema(other)),
    };

    let report = config.validate();
    Ok(Settings {
        config,
        paths,
        schema,
        version,
        report,
    })
}

/// Encode `config` and `paths` with the given schema.
///
/// Writing [`Schema::Baseline`] drops the extended fields.
pub fn to_value(
    config: &Config,
    paths: &PathRegistry,
    schema: Schema,
) -> Result<serde_json::Value, ConfigError> {
    let base = encode_base(config, paths, schema);
    let value = match schema {
        Schema::Baseline => serde_json::to_value(base)?,
        Schema::Extended => serde_json::to_value(ExtendedBlob {
            base,
            extended: (&config.extended).into(),
        })?,
    };
    Ok(value)
}

/// Encode settings into `writer` as pretty-printed JSON.
pub fn save<W: Write>(
    writer: W,
    config: &Config,
    paths: &PathRegistry,
    schema: Schema,
) -> Result<(), ConfigError> {
    let value = to_value(config, paths, schema)?;
    serde_json::to_writer_pretty(writer, &value)?;
    Ok(())
}

#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn load_file(path: impl AsRef<Path>) -> Result<Settings, ConfigError> {
    let file = File::open(path.as_ref())?;
    let settings = load(BufReader::new(file))?;
    info!(
        schema = settings.schema.number(),
        version = %settings.version,
        clamped = settings.report.clamped.len(),
        "loaded settings"
    );
    Ok(settings)
}

#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn save_file(
    path: impl AsRef<Path>,
    config: &Config,
    paths: &PathRegistry,
    schema: Schema,
) -> Result<(), ConfigError> {
    let mut writer = BufWriter::new(File::create(path.as_ref())?);
    save(&mut writer, config, paths, schema)?;
    writer.flush()?;
    info!(schema = schema.number(), "saved settings");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn baseline_json() -> serde_json::Value {
        let config = Config::default();
        to_value(&config, &PathRegistry::new(), Schema::Baseline).unwrap()
    }

    #[test]
    fn baseline_writer_omits_extended_section() {
        let value = baseline_json();
        assert_eq!(value["schema"], json!(1));
        assert!(value.get("extended").is_none());
        assert_eq!(value["input"].as_array().unwrap().len(), MAX_INPUTS);
        assert!(value.get("paths").is_none());
    }

    #[test]
    fn missing_schema_tag_is_rejected() {
        let mut value = baseline_json();
        value.as_object_mut().unwrap().remove("schema");
        assert!(matches!(
            from_value(value),
            Err(ConfigError::SchemaMismatch(_))
        ));
    }

    #[test]
    fn unknown_schema_is_rejected() {
        let mut value = baseline_json();
        value["schema"] = json!(7);
        assert!(matches!(
            from_value(value),
            Err(ConfigError::UnsupportedSchema(7))
        ));
    }

    #[test]
    fn baseline_tag_with_extended_section_is_rejected() {
        let paths = PathRegistry::new();
        let mut value = to_value(&Config::default(), &paths, Schema::Extended).unwrap();
        value["schema"] = json!(1);
        assert!(matches!(
            from_value(value),
            Err(ConfigError::SchemaMismatch(_))
        ));
    }

    #[test]
    fn extended_tag_without_section_is_rejected() {
        let mut value = baseline_json();
        value["schema"] = json!(2);
        assert!(matches!(
            from_value(value),
            Err(ConfigError::SchemaMismatch(_))
        ));
    }

    #[test]
    fn unknown_enum_code_names_the_field() {
        let mut value = baseline_json();
        value["video"]["render"] = json!(5);
        match from_value(value) {
            Err(ConfigError::InvalidEnumValue { field, value }) => {
                assert_eq!(field, "video.render");
                assert_eq!(value, 5);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn unknown_device_code_is_rejected() {
        let mut value = baseline_json();
        value["input"][3]["device"] = json!(9);
        assert!(matches!(
            from_value(value),
            Err(ConfigError::InvalidEnumValue {
                field: "input.device",
                value: 9
            })
        ));
    }

    #[test]
    fn too_many_inputs_are_rejected() {
        let mut value = baseline_json();
        let extra = value["input"][0].clone();
        value["input"].as_array_mut().unwrap().push(extra);
        assert!(matches!(
            from_value(value),
            Err(ConfigError::TooManyInputs(9))
        ));
    }

    #[test]
    fn short_input_list_leaves_remaining_ports_unassigned() {
        let mut value = baseline_json();
        value["input"].as_array_mut().unwrap().truncate(1);
        let settings = from_value(value).unwrap();
        assert_eq!(settings.config.input[0].device, DeviceKind::Keyboard);
        assert_eq!(settings.config.input.assigned().count(), 1);
    }

    #[test]
    fn out_of_range_numbers_are_clamped_on_load() {
        let mut value = baseline_json();
        value["audio"]["fm_preamp"] = json!(1000);
        value["audio"]["lg"] = json!(-101);
        let settings = from_value(value).unwrap();
        assert_eq!(settings.config.audio.fm_preamp, 200);
        assert_eq!(settings.config.audio.lg, -100);
        assert_eq!(settings.report.clamped.len(), 2);
    }

    #[test]
    fn numbers_outside_the_storage_type_are_malformed() {
        let mut value = baseline_json();
        value["audio"]["hg"] = json!(70000);
        assert!(matches!(from_value(value), Err(ConfigError::Malformed(_))));
    }

    #[test]
    fn unknown_path_role_is_rejected() {
        let mut value = baseline_json();
        value["paths"] = json!({ "N64_BIOS": "/bios/pif.bin" });
        assert!(matches!(from_value(value), Err(ConfigError::Path(_))));
    }
}
