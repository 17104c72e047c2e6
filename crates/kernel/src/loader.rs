//! Program images and the loader seam used by process creation.

use std::collections::HashMap;
use std::fmt::Debug;

use log::{debug, warn};
use types::{Address, END_OF_LIST, HypoError, MemoryLayout, Result, Word};
use vm::Memory;

/// Puts a named program into memory and reports its entry PC.
pub trait ProgramLoader: Debug {
    fn load(
        &mut self,
        program: &str,
        memory: &mut Memory,
        layout: &MemoryLayout,
    ) -> Result<Address>;
}

/// An absolute program: words at fixed addresses plus an entry point.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProgramImage {
    pub words: Vec<(Word, Word)>,
    pub entry: Word,
}

impl ProgramImage {
    /// `code` placed contiguously from `start`, entered at `start`.
    pub fn contiguous(start: Word, code: &[Word]) -> Self {
        Self {
            words: (start..).zip(code.iter().copied()).collect(),
            entry: start,
        }
    }

    /// Parses the absolute loader text format.
    ///
    /// One `address content` pair per line. The pair whose address is -1 ends
    /// the program and its content is the entry PC; anything after it is
    /// ignored. Blank lines and `#` comments are skipped.
    pub fn parse(text: &str) -> Result<Self> {
        let mut words = Vec::new();
        for (n, line) in text.lines().enumerate() {
            let line = line.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }
            let mut fields = line.split_whitespace().map(str::parse::<Word>);
            let (Some(Ok(address)), Some(Ok(content)), None) =
                (fields.next(), fields.next(), fields.next())
            else {
                warn!("program line {}: expected `address content`, got {:?}", n + 1, line);
                return Err(HypoError::FileOpen);
            };
            if address == END_OF_LIST {
                return Ok(Self { words, entry: content });
            }
            words.push((address, content));
        }
        Err(HypoError::NoEndOfProgram)
    }

    /// Writes the image into the user program area.
    ///
    /// Every address is checked before anything is written, so a rejected
    /// image leaves memory untouched.
    pub fn load_into(&self, memory: &mut Memory, layout: &MemoryLayout) -> Result<Address> {
        let area = layout.user_program;
        let mut resolved = Vec::with_capacity(self.words.len());
        for &(address, content) in &self.words {
            if !area.contains(address) {
                warn!("program word at {} outside program area", address);
                return Err(HypoError::InvalidAddress);
            }
            let address = Address::new(address).ok_or(HypoError::InvalidAddress)?;
            resolved.push((address, content));
        }
        if !area.contains(self.entry) {
            warn!("program entry {} outside program area", self.entry);
            return Err(HypoError::InvalidPcValue);
        }
        let entry = Address::new(self.entry).ok_or(HypoError::InvalidPcValue)?;

        for (address, content) in resolved {
            memory.write(address, content);
        }
        debug!("loaded {} words, entry {}", self.words.len(), entry);
        Ok(entry)
    }
}

/// Loader over images registered in memory ahead of time.
#[derive(Clone, Debug, Default)]
pub struct StaticLoader {
    programs: HashMap<String, ProgramImage>,
}

impl StaticLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_program(mut self, name: impl Into<String>, image: ProgramImage) -> Self {
        self.insert(name, image);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, image: ProgramImage) {
        self.programs.insert(name.into(), image);
    }
}

impl ProgramLoader for StaticLoader {
    fn load(
        &mut self,
        program: &str,
        memory: &mut Memory,
        layout: &MemoryLayout,
    ) -> Result<Address> {
        match self.programs.get(program) {
            Some(image) => image.load_into(memory, layout),
            None => {
                warn!("no program named {:?}", program);
                Err(HypoError::FileOpen)
            }
        }
    }
}
