use serde::{Deserialize, Serialize};
use types::{HypoError, MemoryLayout, Result, Word};

/// Machine and scheduler tunables.
///
/// The associated constants are the stock values; a `Config` read from a file
/// may override any field and falls back to the stock value for missing ones.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub layout: MemoryLayout,
    /// Clock units a process may run before it is preempted.
    pub time_slice: u64,
    /// Words of user pool given to each process as its stack.
    pub stack_size: Word,
    /// Priority used when an interrupt does not name one.
    pub default_priority: Word,
}

impl Config {
    pub const TIME_SLICE: u64 = 200;
    pub const STACK_SIZE: Word = 10;
    pub const DEFAULT_PRIORITY: Word = 128;

    pub fn validate(&self) -> Result<()> {
        self.layout.validate()?;
        if self.time_slice == 0 {
            return Err(HypoError::InvalidSizeOrMemoryAddress);
        }
        if self.stack_size < 1 || self.stack_size > self.layout.user_pool.len() as Word {
            return Err(HypoError::InvalidMemorySize);
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            layout: MemoryLayout::default(),
            time_slice: Self::TIME_SLICE,
            stack_size: Self::STACK_SIZE,
            default_priority: Self::DEFAULT_PRIORITY,
        }
    }
}
