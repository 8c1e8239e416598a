//! Host-side archive extraction.
//!
//! Supported containers, picked from the file extension:
//! - `.zip`: first file entry matching the extension filter
//! - `.img`: FAT disk image, first root-directory file matching the filter
//! - anything else: the file itself, if its name matches the filter
//!
//! Entries are read completely before anything is copied, so the caller's
//! buffer is only written on success. Entries larger than the buffer are
//! rejected rather than truncated.

use crate::platform::ArchiveError;
use fscommon::BufStream;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Container {
    Zip,
    FatImage,
    Plain,
}

impl Container {
    fn of(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("zip") => Container::Zip,
            Some(ext) if ext.eq_ignore_ascii_case("img") => Container::FatImage,
            _ => Container::Plain,
        }
    }
}

/// Whether `name` passes the extension filter.
///
/// The filter is case-insensitive and may be given with or without the
/// leading dot. No filter, or an empty one, accepts everything.
pub fn matches_extension(name: &str, filter: Option<&str>) -> bool {
    let Some(filter) = filter.map(|f| f.trim_start_matches('.')) else {
        return true;
    };
    if filter.is_empty() {
        return true;
    }
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(filter))
}

/// Extract one entry of `filename` into `buffer`, returning its length.
#[instrument(skip(buffer), fields(capacity = buffer.len()))]
pub fn load_archive(
    filename: &Path,
    buffer: &mut [u8],
    extension: Option<&str>,
) -> Result<usize, ArchiveError> {
    let capacity = buffer.len();
    let data = match Container::of(filename) {
        Container::Zip => read_zip(filename, capacity, extension)?,
        Container::FatImage => read_fat_image(filename, capacity, extension)?,
        Container::Plain => read_plain(filename, capacity, extension)?,
    };

    // Declared sizes were checked up front; the actual byte count is what counts.
    check_size(data.len() as u64, capacity)?;
    buffer[..data.len()].copy_from_slice(&data);
    debug!(len = data.len(), "loaded archive entry");
    Ok(data.len())
}

fn check_size(needed: u64, capacity: usize) -> Result<(), ArchiveError> {
    if needed > capacity as u64 {
        return Err(ArchiveError::BufferTooSmall { needed, capacity });
    }
    Ok(())
}

fn open(path: &Path) -> Result<File, ArchiveError> {
    File::open(path).map_err(|e| ArchiveError::NotFound(format!("{}: {e}", path.display())))
}

fn corrupt(err: impl std::fmt::Display) -> ArchiveError {
    ArchiveError::Corrupt(err.to_string())
}

fn not_found(path: &Path) -> ArchiveError {
    ArchiveError::NotFound(path.display().to_string())
}

fn read_zip(
    path: &Path,
    capacity: usize,
    extension: Option<&str>,
) -> Result<Vec<u8>, ArchiveError> {
    let reader = BufReader::new(open(path)?);
    let mut archive = zip::ZipArchive::new(reader).map_err(corrupt)?;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).map_err(corrupt)?;
        if entry.is_dir() || !matches_extension(entry.name(), extension) {
            continue;
        }

        check_size(entry.size(), capacity)?;
        let mut data = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut data).map_err(corrupt)?;
        debug!(entry = entry.name(), "extracted zip entry");
        return Ok(data);
    }

    Err(not_found(path))
}

fn read_fat_image(
    path: &Path,
    capacity: usize,
    extension: Option<&str>,
) -> Result<Vec<u8>, ArchiveError> {
    let file = open(path)?;
    let fs = fatfs::FileSystem::new(BufStream::new(file), fatfs::FsOptions::new())
        .map_err(corrupt)?;
    let root_dir = fs.root_dir();

    for entry in root_dir.iter() {
        let entry = entry.map_err(corrupt)?;
        let name = entry.file_name();
        if !entry.is_file() || !matches_extension(&name, extension) {
            continue;
        }

        check_size(entry.len(), capacity)?;
        let mut data = Vec::new();
        entry.to_file().read_to_end(&mut data).map_err(corrupt)?;
        debug!(entry = %name, "extracted file from disk image");
        return Ok(data);
    }

    Err(not_found(path))
}

fn read_plain(
    path: &Path,
    capacity: usize,
    extension: Option<&str>,
) -> Result<Vec<u8>, ArchiveError> {
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default();
    if !matches_extension(name, extension) {
        return Err(not_found(path));
    }

    let mut file = open(path)?;
    let len = file.metadata().map_err(corrupt)?.len();
    check_size(len, capacity)?;

    let mut data = Vec::with_capacity(len as usize);
    file.read_to_end(&mut data).map_err(corrupt)?;
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_filter_rules() {
        assert!(matches_extension("sonic.bin", Some(".bin")));
        assert!(matches_extension("SONIC.BIN", Some("bin")));
        assert!(matches_extension("roms/sonic.md", None));
        assert!(matches_extension("sonic.md", Some("")));
        assert!(!matches_extension("sonic.md", Some(".bin")));
        assert!(!matches_extension("readme", Some(".bin")));
        assert!(!matches_extension("sonic.bin.txt", Some(".bin")));
    }

    #[test]
    fn container_follows_file_extension() {
        assert_eq!(Container::of(Path::new("a/b/game.ZIP")), Container::Zip);
        assert_eq!(Container::of(Path::new("sd.img")), Container::FatImage);
        assert_eq!(Container::of(Path::new("game.bin")), Container::Plain);
        assert_eq!(Container::of(Path::new("game")), Container::Plain);
    }
}
