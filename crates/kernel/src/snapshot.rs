use serde::Serialize;
use types::{Result, Word};
use vm::Registers;

use crate::allocator::FreeBlock;
use crate::kernel::Kernel;
use crate::pcb::PcbSnapshot;

/// Read-only picture of the whole machine at one instant.
#[derive(Clone, Debug, Serialize)]
pub struct Snapshot {
    pub clock: u64,
    pub next_pid: Word,
    pub shut_down: bool,
    pub registers: Registers,
    pub running: Option<PcbSnapshot>,
    pub ready: Vec<PcbSnapshot>,
    pub waiting: Vec<PcbSnapshot>,
    pub os_free: Vec<FreeBlock>,
    pub user_free: Vec<FreeBlock>,
}

impl Snapshot {
    pub fn capture(kernel: &Kernel) -> Result<Self> {
        let memory = kernel.memory();
        Ok(Self {
            clock: kernel.clock(),
            next_pid: kernel.next_pid(),
            shut_down: kernel.is_shut_down(),
            registers: kernel.registers().clone(),
            running: kernel.running().map(|pcb| pcb.snapshot(memory)),
            ready: kernel.ready_pcbs()?.into_iter().map(|pcb| pcb.snapshot(memory)).collect(),
            waiting: kernel.waiting_pcbs()?.into_iter().map(|pcb| pcb.snapshot(memory)).collect(),
            os_free: kernel.os_pool().blocks(memory)?,
            user_free: kernel.user_pool().blocks(memory)?,
        })
    }
}
