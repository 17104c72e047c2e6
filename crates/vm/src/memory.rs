use core::fmt;

use types::{Address, HypoError, Result, Word, MEMORY_SIZE};

/// Main memory: a flat array of [`MEMORY_SIZE`] words.
///
/// Programs, free-list nodes, process stacks and PCBs all live in this one
/// array. Access through an [`Address`] is infallible because the address was
/// bounds-checked when it was built; access through a raw word is checked here.
#[derive(Clone, PartialEq, Eq)]
pub struct Memory {
    words: Vec<Word>,
}

impl Memory {
    pub fn new() -> Self {
        Self {
            words: vec![0; MEMORY_SIZE],
        }
    }

    pub fn size(&self) -> usize {
        self.words.len()
    }

    pub fn read(&self, addr: Address) -> Word {
        self.words[addr.index()]
    }

    pub fn write(&mut self, addr: Address, value: Word) {
        self.words[addr.index()] = value;
    }

    /// Reads through an untrusted word.
    pub fn load(&self, addr: Word) -> Result<Word> {
        let addr = Address::new(addr).ok_or(HypoError::InvalidMemoryAddress)?;
        Ok(self.read(addr))
    }

    /// Writes through an untrusted word.
    pub fn store(&mut self, addr: Word, value: Word) -> Result<()> {
        let addr = Address::new(addr).ok_or(HypoError::InvalidMemoryAddress)?;
        self.write(addr, value);
        Ok(())
    }

    /// Copies `words` into memory starting at `start`.
    pub fn write_block(&mut self, start: Address, words: &[Word]) -> Result<()> {
        let end = start.index() + words.len();
        if end > self.words.len() {
            return Err(HypoError::InvalidMemoryAddress);
        }
        self.words[start.index()..end].copy_from_slice(words);
        Ok(())
    }

    pub fn slice(&self, start: Address, len: usize) -> Option<&[Word]> {
        self.words.get(start.index()..start.index().checked_add(len)?)
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn clear(&mut self) {
        self.words.fill(0);
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Memory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let used = self.words.iter().filter(|w| **w != 0).count();
        f.debug_struct("Memory")
            .field("size", &self.words.len())
            .field("non_zero", &used)
            .finish()
    }
}
