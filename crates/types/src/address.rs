use core::fmt;

use serde::{Deserialize, Serialize};

use crate::layout::MEMORY_SIZE;
use crate::result::HypoError;
use crate::Word;

/// In-memory encoding of "no next node". Only ever appears inside memory words;
/// Rust code sees it as [`Link::End`].
pub const END_OF_LIST: Word = -1;

/// Index of a word in main memory.
///
/// An `Address` is always inside `0..MEMORY_SIZE`, so reading or writing through
/// one can never go out of bounds. Raw words coming from registers or memory are
/// turned into addresses with [`Address::new`], which is where bounds are checked.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Address(usize);

impl Address {
    /// Builds an address from a known-good index. Intended for constants;
    /// panics if `index` is outside memory.
    pub const fn from_index(index: usize) -> Self {
        assert!(index < MEMORY_SIZE, "address outside memory");
        Self(index)
    }

    /// Checked conversion from a raw word.
    pub fn new(word: Word) -> Option<Self> {
        if (0..MEMORY_SIZE as Word).contains(&word) {
            Some(Self(word as usize))
        } else {
            None
        }
    }

    pub const fn index(self) -> usize {
        self.0
    }

    pub const fn as_word(self) -> Word {
        self.0 as Word
    }

    /// Address `delta` words away, if that is still inside memory.
    pub fn offset(self, delta: Word) -> Option<Self> {
        self.as_word().checked_add(delta).and_then(Self::new)
    }
}

impl TryFrom<Word> for Address {
    type Error = HypoError;

    fn try_from(word: Word) -> Result<Self, Self::Error> {
        Self::new(word).ok_or(HypoError::InvalidMemoryAddress)
    }
}

impl From<Address> for Word {
    fn from(address: Address) -> Self {
        address.as_word()
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A "next" pointer as stored in free-list nodes and PCBs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Link {
    #[default]
    End,
    To(Address),
}

impl Link {
    /// Decodes a stored pointer word. Anything that is neither the sentinel nor
    /// a valid address is a corrupted link.
    pub fn from_word(word: Word) -> Result<Self, HypoError> {
        if word == END_OF_LIST {
            return Ok(Link::End);
        }
        Address::new(word)
            .map(Link::To)
            .ok_or(HypoError::InvalidMemoryAddress)
    }

    pub const fn to_word(self) -> Word {
        match self {
            Link::End => END_OF_LIST,
            Link::To(address) => address.as_word(),
        }
    }

    pub const fn address(self) -> Option<Address> {
        match self {
            Link::End => None,
            Link::To(address) => Some(address),
        }
    }

    pub const fn is_end(self) -> bool {
        matches!(self, Link::End)
    }
}

impl From<Option<Address>> for Link {
    fn from(address: Option<Address>) -> Self {
        address.map_or(Link::End, Link::To)
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Link::End => f.write_str("END"),
            Link::To(address) => write!(f, "{}", address),
        }
    }
}
