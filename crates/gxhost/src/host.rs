//! Reference host platform.
//!
//! Loads images through [`crate::archive`] and feeds input from an optional
//! script of timed button presses, which makes runs reproducible without any
//! physical device. Without a script every pad stays released.

use crate::archive;
use crate::input::{Buttons, InputError, InputState, InputTable};
use crate::platform::{ArchiveError, Platform};
use gxhost_hw::limits::MAX_INPUTS;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, trace};

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("input script i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed input script: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("unknown button `{0}`")]
    UnknownButton(String),

    #[error(transparent)]
    Port(#[from] InputError),
}

#[derive(Debug, Deserialize)]
struct RawEvent {
    frame: u64,
    port: usize,
    #[serde(default)]
    press: Vec<String>,
}

/// From `frame` on, `port` holds exactly `buttons`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptEvent {
    pub frame: u64,
    pub port: usize,
    pub buttons: Buttons,
}

/// Timed button presses, sorted by frame
///
/// Stored as a JSON array:
/// `[{"frame": 30, "port": 0, "press": ["START"]}, {"frame": 32, "port": 0}]`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputScript {
    events: Vec<ScriptEvent>,
}

impl InputScript {
    pub fn new(mut events: Vec<ScriptEvent>) -> Result<Self, ScriptError> {
        if let Some(event) = events.iter().find(|event| event.port >= MAX_INPUTS) {
            return Err(InputError::PortOutOfRange(event.port).into());
        }
        // Stable, so same-frame events keep file order.
        events.sort_by_key(|event| event.frame);
        Ok(Self { events })
    }

    pub fn load<R: Read>(reader: R) -> Result<Self, ScriptError> {
        let raw: Vec<RawEvent> = serde_json::from_reader(reader)?;
        let events = raw
            .into_iter()
            .map(|event| {
                let mut buttons = Buttons::empty();
                for name in &event.press {
                    let button = Buttons::from_name(&name.to_ascii_uppercase())
                        .ok_or_else(|| ScriptError::UnknownButton(name.clone()))?;
                    buttons |= button;
                }
                Ok(ScriptEvent {
                    frame: event.frame,
                    port: event.port,
                    buttons,
                })
            })
            .collect::<Result<Vec<_>, ScriptError>>()?;
        Self::new(events)
    }

    pub fn load_file(path: impl AsRef<Path>) -> Result<Self, ScriptError> {
        let script = Self::load(BufReader::new(File::open(path.as_ref())?))?;
        debug!(events = script.events.len(), "loaded input script");
        Ok(script)
    }

    pub fn events(&self) -> &[ScriptEvent] {
        &self.events
    }
}

/// Platform backed by the local filesystem and an optional input script
#[derive(Debug, Default)]
pub struct HostPlatform {
    script: InputScript,
    /// Index of the next unapplied script event
    cursor: usize,
    /// Latest scripted state per logical port
    held: [Buttons; MAX_INPUTS],
    frame: u64,
}

impl HostPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_script(script: InputScript) -> Self {
        Self {
            script,
            ..Self::default()
        }
    }

    /// Number of input refreshes served so far
    pub fn frames_polled(&self) -> u64 {
        self.frame
    }
}

impl Platform for HostPlatform {
    fn load_archive(
        &mut self,
        filename: &Path,
        buffer: &mut [u8],
        extension: Option<&str>,
    ) -> Result<usize, ArchiveError> {
        archive::load_archive(filename, buffer, extension)
    }

    fn refresh_inputs(&mut self, table: &InputTable, state: &mut InputState) {
        let events = self.script.events();
        while let Some(event) = events.get(self.cursor) {
            if event.frame > self.frame {
                break;
            }
            trace!(frame = self.frame, port = event.port, buttons = ?event.buttons, "script event");
            self.held[event.port] = event.buttons;
            self.cursor += 1;
        }

        for (port, entry) in table.iter() {
            let pad = &mut state.pads[port];
            pad.buttons = if entry.is_assigned() {
                self.held[port]
            } else {
                Buttons::empty()
            };
        }
        self.frame += 1;
    }

    fn cheat_update(&mut self) {
        trace!(frame = self.frame, "no cheats active");
    }
}
