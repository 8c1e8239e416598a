//! Hardware and persisted-format constants shared by the host layer.
//!
//! Nothing in here has behaviour. Wire codes match the numeric values the
//! emulation core and the settings blob use.

pub mod codes;
pub mod limits;
pub mod specs;
