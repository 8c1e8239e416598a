/// Number of logical input ports the core can route (two physical ports,
/// each expandable to four pads through a multitap).
pub const MAX_INPUTS: usize = 8;

/// Size of a path slot in bytes, terminator included.
///
/// The longest storable path is `PATH_CAPACITY - 1` bytes.
pub const PATH_CAPACITY: usize = 256;

/// Longest path accepted by a path slot
pub const MAX_PATH_LEN: usize = PATH_CAPACITY - 1;

/// Maximum cartridge image size the core maps (10 MB, SSF2 mapper + lock-on)
pub const MAX_ROM_SIZE: usize = 10 * 1024 * 1024;

/// Largest BIOS image of any role (Mega-CD boot ROM, 128 KB)
pub const MAX_BIOS_SIZE: usize = 128 * 1024;
