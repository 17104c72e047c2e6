//! Host side of the HYPO machine: program files, event scripts and the
//! control loop that feeds interrupts to the kernel.

pub mod control;
pub mod events;
pub mod loader;
pub mod logger;
pub mod report;

pub use control::{ControlLoop, ProcessOutput, RunSummary};
pub use events::parse_script;
pub use loader::FileLoader;
pub use report::Report;
