pub mod archive;
pub mod args;
pub mod config;
pub mod host;
pub mod input;
pub mod paths;
pub mod platform;
pub mod session;
pub mod settings;

// Re-export commonly used types
pub use args::{Args, Command, RunArgs};
pub use config::{Config, ConfigError, ValidationReport};
pub use host::{HostPlatform, InputScript};
pub use input::{Buttons, DeviceKind, InputState, InputTable, PadVariant};
pub use paths::{PathError, PathRegistry, Role};
pub use platform::{ArchiveError, Platform};
pub use session::{EmulationCore, FrameContext, FrameStats, Session};
pub use settings::{Schema, Settings};
