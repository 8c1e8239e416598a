//! Services the portable core needs from the host.
//!
//! The core never touches the filesystem or input devices itself. It calls
//! [`Platform::load_archive`] to fetch ROM and BIOS images, and once per
//! frame [`Platform::refresh_inputs`] and [`Platform::cheat_update`].
//! Every call is synchronous and happens on the emulation thread.

use crate::input::{InputState, InputTable};
use std::path::Path;
use thiserror::Error;

/// Why an archive entry could not be loaded.
///
/// Callers in the core treat every variant the same way: the image is
/// unavailable. The distinction only matters for logging.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArchiveError {
    #[error("no matching entry in `{0}`")]
    NotFound(String),

    #[error("entry is {needed} bytes, buffer holds {capacity}")]
    BufferTooSmall { needed: u64, capacity: usize },

    #[error("corrupt archive: {0}")]
    Corrupt(String),
}

pub trait Platform {
    /// Copy one entry of `filename` into `buffer` and return its length.
    ///
    /// `filename` may be a container (zip, disk image) or a plain file.
    /// With `extension` set, only entries whose name ends with it are
    /// considered. `buffer.len()` is the largest accepted entry. On error
    /// `buffer` is left untouched.
    fn load_archive(
        &mut self,
        filename: &Path,
        buffer: &mut [u8],
        extension: Option<&str>,
    ) -> Result<usize, ArchiveError>;

    /// Sample host devices into `state` for the ports mapped in `table`.
    ///
    /// Called at the start of every frame. Must not block: the frame has a
    /// real-time deadline.
    fn refresh_inputs(&mut self, table: &InputTable, state: &mut InputState);

    /// Apply active memory patches. Best-effort, failures stay in the host.
    fn cheat_update(&mut self) {}
}

impl<P: Platform + ?Sized> Platform for &mut P {
    fn load_archive(
        &mut self,
        filename: &Path,
        buffer: &mut [u8],
        extension: Option<&str>,
    ) -> Result<usize, ArchiveError> {
        (**self).load_archive(filename, buffer, extension)
    }

    fn refresh_inputs(&mut self, table: &InputTable, state: &mut InputState) {
        (**self).refresh_inputs(table, state)
    }

    fn cheat_update(&mut self) {
        (**self).cheat_update()
    }
}
