#![no_std]

pub mod address;
pub use address::{Address, END_OF_LIST, Link};

pub mod layout;
pub use layout::{MEMORY_SIZE, MemoryLayout, Region};

pub mod result;
pub use result::{HypoError, Result, Status};

/// One machine word. The machine is decimal, so a word is a plain signed integer
/// and every value (instruction, address, data) shares this representation.
pub type Word = i64;
