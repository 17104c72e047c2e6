//! First-fit free-list allocator threaded through main memory.
//!
//! Each free block starts with a two-word node: word 0 links to the next free
//! block (or END_OF_LIST) and word 1 holds the block's size. Freed blocks go
//! back on the front of the list and are never merged with their neighbours.

use log::{debug, warn};
use serde::Serialize;
use types::{Address, END_OF_LIST, HypoError, Link, Region, Result, Word};
use vm::Memory;

/// Smallest block that can carry a free-list node.
pub const MIN_BLOCK_SIZE: Word = 2;

const NEXT: Word = 0;
const SIZE: Word = 1;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Pool {
    Os,
    User,
}

/// One free block as seen by introspection.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FreeBlock {
    pub address: Address,
    pub size: Word,
}

#[derive(Clone, Debug)]
pub struct FreeList {
    pool: Pool,
    region: Region,
    head: Link,
}

impl FreeList {
    /// An empty list over `region`. Call [`FreeList::init`] to hand the whole
    /// region out as one block.
    pub fn new(pool: Pool, region: Region) -> Self {
        Self {
            pool,
            region,
            head: Link::End,
        }
    }

    pub fn init(&mut self, memory: &mut Memory) -> Result<()> {
        let start = self.region.first().ok_or(HypoError::InvalidMemoryAddress)?;
        let size = self.region.len() as Word;
        self.write_node(memory, start, Link::End, size)?;
        self.head = Link::To(start);
        debug!("{:?} pool: {} words at {}", self.pool, size, start);
        Ok(())
    }

    pub fn pool(&self) -> Pool {
        self.pool
    }

    pub fn region(&self) -> Region {
        self.region
    }

    pub fn head(&self) -> Link {
        self.head
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_end()
    }

    /// First-fit allocation of `requested` words.
    ///
    /// An exact fit is unlinked. A bigger block is split: the caller gets the
    /// front, and the rest stays in the same list position as a smaller block.
    /// A block that would leave a one-word remainder cannot hold a node and is
    /// passed over.
    ///
    /// Nodes live in memory user code can write, so a node with a bad size or
    /// a list longer than the pool can hold is reported as corruption.
    pub fn allocate(&mut self, memory: &mut Memory, requested: Word) -> Result<Address> {
        let Link::To(first) = self.head else {
            warn!("{:?} pool: no free memory", self.pool);
            return Err(HypoError::NoFreeMemory);
        };
        if requested < 1 {
            warn!("{:?} pool: invalid allocation size {}", self.pool, requested);
            return Err(HypoError::InvalidMemorySize);
        }
        let size = requested.max(MIN_BLOCK_SIZE);

        let mut previous: Option<Address> = None;
        let mut current = first;
        let mut visited = 0;
        loop {
            visited += 1;
            if visited > self.max_nodes() {
                warn!("{:?} pool: free list does not end", self.pool);
                return Err(HypoError::InvalidMemoryAddress);
            }
            let (next, block_size) = self.read_node(memory, current)?;
            let remainder = block_size.checked_sub(size).ok_or(HypoError::InvalidMemoryAddress)?;

            if remainder == 0 {
                self.relink(memory, previous, next);
                memory.write(current, END_OF_LIST);
                debug!("{:?} pool: allocated {} words at {} (exact)", self.pool, size, current);
                return Ok(current);
            }

            if remainder >= MIN_BLOCK_SIZE {
                let rest = current.offset(size).ok_or(HypoError::InvalidMemoryAddress)?;
                self.write_node(memory, rest, next, remainder)?;
                self.relink(memory, previous, Link::To(rest));
                memory.write(current, END_OF_LIST);
                debug!("{:?} pool: allocated {} words at {} (split)", self.pool, size, current);
                return Ok(current);
            }

            match next {
                Link::To(addr) => {
                    previous = Some(current);
                    current = addr;
                }
                Link::End => break,
            }
        }

        warn!("{:?} pool: no block fits {} words", self.pool, size);
        Err(HypoError::NoFreeMemory)
    }

    /// Returns `size` words at `address` to the front of the list.
    ///
    /// A block that overlaps one already on the list is refused, which also
    /// catches freeing the same block twice.
    pub fn free(&mut self, memory: &mut Memory, address: Word, size: Word) -> Result<()> {
        if !self.region.contains(address) {
            warn!("{:?} pool: free of {} outside pool", self.pool, address);
            return Err(HypoError::InvalidMemoryAddress);
        }
        let size = if size == 1 { MIN_BLOCK_SIZE } else { size };
        if size < 1 || !self.region.contains_span(address, size) {
            warn!("{:?} pool: invalid free of {} words at {}", self.pool, size, address);
            return Err(HypoError::InvalidSizeOrMemoryAddress);
        }
        let end = address + size;
        if self
            .blocks(memory)?
            .iter()
            .any(|b| address < b.address.as_word() + b.size && b.address.as_word() < end)
        {
            warn!("{:?} pool: {} words at {} are already free", self.pool, size, address);
            return Err(HypoError::InvalidSizeOrMemoryAddress);
        }
        let block = Address::new(address).ok_or(HypoError::InvalidMemoryAddress)?;
        self.write_node(memory, block, self.head, size)?;
        self.head = Link::To(block);
        debug!("{:?} pool: freed {} words at {}", self.pool, size, block);
        Ok(())
    }

    /// Free blocks in list order.
    pub fn blocks(&self, memory: &Memory) -> Result<Vec<FreeBlock>> {
        let mut blocks = Vec::new();
        let mut link = self.head;
        while let Link::To(address) = link {
            if blocks.len() >= self.max_nodes() {
                return Err(HypoError::InvalidMemoryAddress);
            }
            let (next, size) = self.read_node(memory, address)?;
            blocks.push(FreeBlock { address, size });
            link = next;
        }
        Ok(blocks)
    }

    /// Total words currently on the list.
    pub fn free_words(&self, memory: &Memory) -> Result<Word> {
        Ok(self.blocks(memory)?.iter().map(|b| b.size).sum())
    }

    /// A well-formed list never has more nodes than half the pool.
    fn max_nodes(&self) -> usize {
        self.region.len() / MIN_BLOCK_SIZE as usize
    }

    /// Reads a node and checks that the block it describes lies inside the pool.
    fn read_node(&self, memory: &Memory, node: Address) -> Result<(Link, Word)> {
        let next = Link::from_word(memory.read(node))?;
        let size_addr = node.offset(SIZE).ok_or(HypoError::InvalidMemoryAddress)?;
        let size = memory.read(size_addr);
        if size < MIN_BLOCK_SIZE || !self.region.contains_span(node.as_word(), size) {
            warn!("{:?} pool: corrupted node at {} (size {})", self.pool, node, size);
            return Err(HypoError::InvalidMemoryAddress);
        }
        Ok((next, size))
    }

    fn write_node(&self, memory: &mut Memory, node: Address, next: Link, size: Word) -> Result<()> {
        let next_addr = node.offset(NEXT).ok_or(HypoError::InvalidMemoryAddress)?;
        let size_addr = node.offset(SIZE).ok_or(HypoError::InvalidMemoryAddress)?;
        memory.write(next_addr, next.to_word());
        memory.write(size_addr, size);
        Ok(())
    }

    fn relink(&mut self, memory: &mut Memory, previous: Option<Address>, next: Link) {
        match previous {
            None => self.head = next,
            Some(prev) => memory.write(prev, next.to_word()),
        }
    }
}
