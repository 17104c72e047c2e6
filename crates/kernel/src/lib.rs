pub mod allocator;
pub mod config;
pub mod interrupt;
pub mod kernel;
pub mod loader;
pub mod pcb;
pub mod queue;
pub mod snapshot;
pub mod syscall;
pub mod task;

pub use allocator::{FreeBlock, FreeList, Pool};
pub use config::Config;
pub use interrupt::{Interrupt, InterruptOutcome};
pub use kernel::Kernel;
pub use loader::{ProgramImage, ProgramLoader, StaticLoader};
pub use pcb::{PCB_SIZE, Pcb, PcbSnapshot, ProcessState, WaitReason};
pub use snapshot::Snapshot;
pub use task::{CycleOutcome, CycleReport};
