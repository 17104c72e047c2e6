use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::result::HypoError;
use crate::Word;

/// Number of words in main memory.
pub const MEMORY_SIZE: usize = 10_000;

/// Inclusive range of memory words.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub start: usize,
    pub end: usize,
}

impl Region {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub const fn len(&self) -> usize {
        (self.end + 1).saturating_sub(self.start)
    }

    pub const fn is_empty(&self) -> bool {
        self.end < self.start
    }

    pub fn contains(&self, word: Word) -> bool {
        word >= self.start as Word && word <= self.end as Word
    }

    /// True when all of `start..start + len` lies inside the region.
    pub fn contains_span(&self, start: Word, len: Word) -> bool {
        if len < 1 || !self.contains(start) {
            return false;
        }
        match start.checked_add(len - 1) {
            Some(last) => self.contains(last),
            None => false,
        }
    }

    pub fn first(&self) -> Option<Address> {
        Address::new(self.start as Word)
    }
}

/// How the flat memory array is split between user programs and the two
/// allocator pools.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryLayout {
    /// Where program images are loaded. PC must stay inside this area.
    pub user_program: Region,
    /// Free pool for process stacks and user memory-allocate calls.
    pub user_pool: Region,
    /// Free pool for PCBs.
    pub os_pool: Region,
}

impl MemoryLayout {
    pub const DEFAULT: Self = Self {
        user_program: Region::new(0, 2499),
        user_pool: Region::new(2500, 4499),
        os_pool: Region::new(4500, 9999),
    };

    /// Memory a user program may touch through operand addresses: its own
    /// program area plus the user pool.
    pub const fn operand_range(&self) -> Region {
        Region::new(self.user_program.start, self.user_pool.end)
    }

    /// Checks that the regions fit in memory, appear in program / user pool /
    /// OS pool order without overlapping, and that each pool can hold a node.
    pub fn validate(&self) -> Result<(), HypoError> {
        let regions = [self.user_program, self.user_pool, self.os_pool];
        if regions.iter().any(|r| r.is_empty() || r.end >= MEMORY_SIZE) {
            return Err(HypoError::InvalidAddress);
        }
        if self.user_program.end >= self.user_pool.start
            || self.user_pool.end >= self.os_pool.start
        {
            return Err(HypoError::InvalidAddress);
        }
        if self.user_pool.len() < 2 || self.os_pool.len() < 2 {
            return Err(HypoError::InvalidMemorySize);
        }
        Ok(())
    }
}

impl Default for MemoryLayout {
    fn default() -> Self {
        Self::DEFAULT
    }
}
