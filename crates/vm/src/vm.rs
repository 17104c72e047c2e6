use log::debug;
use types::{Address, MemoryLayout, Result, Status, Word};

use crate::cpu::Cpu;
use crate::memory::Memory;
use crate::metering::{Metering, TimeSlice};
use crate::sys_call::SyscallHandler;

/// The whole machine: one CPU wired to one memory.
#[derive(Debug, Clone)]
pub struct VM {
    pub cpu: Cpu,
    pub memory: Memory,
}

impl VM {
    pub fn new(layout: MemoryLayout) -> Self {
        Self {
            cpu: Cpu::new(layout),
            memory: Memory::new(),
        }
    }

    pub fn layout(&self) -> &MemoryLayout {
        self.cpu.layout()
    }

    /// Writes a contiguous program at `addr` and points PC at it.
    pub fn set_code(&mut self, addr: Address, code: &[Word]) -> Result<()> {
        self.memory.write_block(addr, code)?;
        self.cpu.regs.pc = addr.as_word();
        debug!("loaded {} words at {}", code.len(), addr);
        Ok(())
    }

    pub fn run(
        &mut self,
        meter: &mut dyn Metering,
        syscalls: &mut dyn SyscallHandler,
    ) -> Result<Status> {
        self.cpu.run(&mut self.memory, meter, syscalls)
    }

    /// Runs under a fresh [`TimeSlice`] of `budget` clock units.
    pub fn run_time_slice(
        &mut self,
        budget: u64,
        syscalls: &mut dyn SyscallHandler,
    ) -> Result<Status> {
        let mut meter = TimeSlice::new(budget);
        self.run(&mut meter, syscalls)
    }

    /// Zeroes memory and every register, clock included.
    pub fn reset(&mut self) {
        self.memory.clear();
        self.cpu.reset();
    }
}
