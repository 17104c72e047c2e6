//! Ready and wait queues, linked through each PCB's next pointer.

use log::{debug, warn};
use types::{HypoError, Link, Region, Result, Word};
use vm::Memory;

use crate::pcb::{PCB_SIZE, Pcb, ProcessState};

/// Collects the PCBs reachable from `head`, failing on a link that leaves
/// `region` or on a cycle.
fn walk(head: Link, region: &Region, memory: &Memory) -> Result<Vec<Pcb>> {
    let max = region.len() / PCB_SIZE as usize;
    let mut pcbs = Vec::new();
    let mut link = head;
    while let Link::To(address) = link {
        if pcbs.len() >= max {
            return Err(HypoError::InvalidMemoryAddress);
        }
        let pcb = Pcb::at(address, region)?;
        pcbs.push(pcb);
        link = pcb.next(memory)?;
    }
    Ok(pcbs)
}

fn check(pcb: Pcb, region: &Region) -> Result<()> {
    Pcb::at(pcb.address(), region).map(|_| ()).map_err(|e| {
        warn!("rejected PCB at {} outside {:?}", pcb.address(), region);
        e
    })
}

/// Processes ready to run, highest priority first. Equal priorities keep
/// arrival order.
#[derive(Clone, Debug)]
pub struct ReadyQueue {
    head: Link,
    region: Region,
}

impl ReadyQueue {
    /// Empty queue accepting PCBs that lie inside `region`.
    pub fn new(region: Region) -> Self {
        Self {
            head: Link::End,
            region,
        }
    }

    pub fn head(&self) -> Link {
        self.head
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_end()
    }

    /// Marks `pcb` ready and links it in before the first entry with a
    /// strictly lower priority.
    pub fn insert(&mut self, memory: &mut Memory, pcb: Pcb) -> Result<()> {
        check(pcb, &self.region)?;
        let priority = pcb.priority(memory);

        let mut previous: Option<Pcb> = None;
        let mut link = self.head;
        while let Link::To(address) = link {
            let current = Pcb::at(address, &self.region)?;
            if priority > current.priority(memory) {
                break;
            }
            previous = Some(current);
            link = current.next(memory)?;
        }

        pcb.set_state(memory, ProcessState::Ready);
        pcb.set_next(memory, link);
        match previous {
            None => self.head = Link::To(pcb.address()),
            Some(prev) => prev.set_next(memory, Link::To(pcb.address())),
        }
        debug!("ready queue: pid {} priority {}", pcb.pid(memory), priority);
        Ok(())
    }

    /// Detaches and returns the head, if any.
    pub fn select(&mut self, memory: &mut Memory) -> Result<Option<Pcb>> {
        let Link::To(address) = self.head else {
            return Ok(None);
        };
        let pcb = Pcb::at(address, &self.region)?;
        self.head = pcb.next(memory)?;
        pcb.set_next(memory, Link::End);
        Ok(Some(pcb))
    }

    pub fn pcbs(&self, memory: &Memory) -> Result<Vec<Pcb>> {
        walk(self.head, &self.region, memory)
    }
}

/// Processes blocked on I/O. Newest first; removal is by PID.
#[derive(Clone, Debug)]
pub struct WaitQueue {
    head: Link,
    region: Region,
}

impl WaitQueue {
    pub fn new(region: Region) -> Self {
        Self {
            head: Link::End,
            region,
        }
    }

    pub fn head(&self) -> Link {
        self.head
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_end()
    }

    /// Marks `pcb` waiting and pushes it on the front.
    pub fn insert(&mut self, memory: &mut Memory, pcb: Pcb) -> Result<()> {
        check(pcb, &self.region)?;
        pcb.set_state(memory, ProcessState::Waiting);
        pcb.set_next(memory, self.head);
        self.head = Link::To(pcb.address());
        debug!("wait queue: pid {}", pcb.pid(memory));
        Ok(())
    }

    /// Unlinks the first PCB whose PID is `pid`.
    pub fn search_and_remove(&mut self, memory: &mut Memory, pid: Word) -> Result<Pcb> {
        let mut previous: Option<Pcb> = None;
        let mut link = self.head;
        while let Link::To(address) = link {
            let current = Pcb::at(address, &self.region)?;
            let next = current.next(memory)?;
            if current.pid(memory) == pid {
                match previous {
                    None => self.head = next,
                    Some(prev) => prev.set_next(memory, next),
                }
                current.set_next(memory, Link::End);
                return Ok(current);
            }
            previous = Some(current);
            link = next;
        }
        Err(HypoError::PidNotFound)
    }

    /// Detaches and returns the head, if any.
    pub fn pop(&mut self, memory: &mut Memory) -> Result<Option<Pcb>> {
        let Link::To(address) = self.head else {
            return Ok(None);
        };
        let pcb = Pcb::at(address, &self.region)?;
        self.head = pcb.next(memory)?;
        pcb.set_next(memory, Link::End);
        Ok(Some(pcb))
    }

    pub fn pcbs(&self, memory: &Memory) -> Result<Vec<Pcb>> {
        walk(self.head, &self.region, memory)
    }
}
