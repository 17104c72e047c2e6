use log::trace;
use types::{Address, HypoError, MemoryLayout, Result, Status, Word};

use crate::decoder::decode;
use crate::instruction::Instruction;
use crate::memory::Memory;
use crate::metering::{MeterResult, Metering};
use crate::registers::Registers;
use crate::sys_call::SyscallHandler;

/// Inclusive stack window of the dispatched process.
///
/// The stack grows upward: an empty stack has `SP == base - 1` and a full one
/// has `SP == limit`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct StackBounds {
    pub base: Word,
    pub limit: Word,
}

impl StackBounds {
    pub fn new(start: Word, size: Word) -> Self {
        Self {
            base: start,
            limit: start + size - 1,
        }
    }
}

/// What the CPU should do after one instruction.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Step {
    Continue,
    Halt,
    /// A system call asked to suspend the process with this status.
    Block(Status),
}

/// Represents the Central Processing Unit (CPU) of the HYPO machine.
///
/// EDUCATIONAL PURPOSE: the CPU owns the register file and drives the classic
/// fetch-decode-execute cycle against main memory. It has no cache, no
/// pipeline and no interrupts of its own; the operating system regains control
/// only when a run returns.
///
/// WHEN A RUN RETURNS:
/// - the program executes HALT (`Status::Halted`)
/// - the time-slice meter runs out (`Status::TimeSliceExpired`)
/// - a system call blocks on I/O (`Status::WaitingForInput` / `WaitingForOutput`)
/// - any instruction fails (`Err(HypoError)`), which is fatal to the process
///
/// MEMORY PROTECTION: the layout tells the CPU which words user code may
/// reach. PC must stay inside the program area and operand addresses inside
/// the program area plus the user pool; the OS pool, where the kernel keeps
/// PCBs, is unreachable from user code.
#[derive(Clone, Debug)]
pub struct Cpu {
    pub regs: Registers,

    /// Stack window of the dispatched process. `None` when running bare code,
    /// in which case SP is only checked against the operand range.
    pub stack: Option<StackBounds>,

    layout: MemoryLayout,
}

impl Cpu {
    /// Creates a CPU with every register zeroed and PSR in OS mode.
    pub fn new(layout: MemoryLayout) -> Self {
        Self {
            regs: Registers::default(),
            stack: None,
            layout,
        }
    }

    pub fn layout(&self) -> &MemoryLayout {
        &self.layout
    }

    pub fn reset(&mut self) {
        self.regs.reset();
        self.stack = None;
    }

    /// Runs from the current PC until halt, block, error or the meter says stop.
    ///
    /// EDUCATIONAL: each instruction's cost goes to the clock and to the meter
    /// after it executes. A halt or blocking system call on the same instruction
    /// that drains the meter still reports halt or block, since the process has
    /// to leave the CPU anyway.
    pub fn run(
        &mut self,
        memory: &mut Memory,
        meter: &mut dyn Metering,
        syscalls: &mut dyn SyscallHandler,
    ) -> Result<Status> {
        loop {
            let pc = self.regs.pc;
            let (instr, step) = self.step(memory, syscalls)?;
            let cost = instr.opcode.clock_cost();
            self.regs.clock += cost;
            let metered = meter.on_instruction(pc, &instr, cost);

            match step {
                Step::Halt => return Ok(Status::Halted),
                Step::Block(status) => return Ok(status),
                Step::Continue => {}
            }
            if metered == MeterResult::Halt {
                trace!("time slice expired at pc={}", self.regs.pc);
                return Ok(Status::TimeSliceExpired);
            }
        }
    }

    /// Executes exactly one instruction without charging the clock.
    pub fn step(
        &mut self,
        memory: &mut Memory,
        syscalls: &mut dyn SyscallHandler,
    ) -> Result<(Instruction, Step)> {
        let pc = self.regs.pc;
        let instr = self.fetch(memory)?;
        trace!("pc={:04} ir={:06} {}", pc, self.regs.ir, instr);
        let step = self.execute(&instr, memory, syscalls)?;
        Ok((instr, step))
    }

    /// Fetch + decode. Loads MAR, MBR and IR and advances PC past the
    /// instruction word.
    fn fetch(&mut self, memory: &Memory) -> Result<Instruction> {
        let addr = self.pc_address()?;
        self.regs.mar = addr.as_word();
        self.regs.mbr = memory.read(addr);
        self.regs.ir = self.regs.mbr;
        self.regs.pc += 1;
        decode(self.regs.ir)
    }

    /// Reads the word at PC (direct address, immediate value or branch target)
    /// and advances PC.
    pub(crate) fn next_word(&mut self, memory: &Memory) -> Result<Word> {
        let addr = self.pc_address()?;
        self.regs.pc += 1;
        Ok(memory.read(addr))
    }

    fn pc_address(&self) -> Result<Address> {
        if !self.layout.user_program.contains(self.regs.pc) {
            return Err(HypoError::InvalidPcValue);
        }
        Address::new(self.regs.pc).ok_or(HypoError::InvalidPcValue)
    }

    /// Checks that `word` is an address user code may touch.
    pub(crate) fn operand_address(&self, word: Word) -> Result<Address> {
        if !self.layout.operand_range().contains(word) {
            return Err(HypoError::InvalidAddress);
        }
        Address::new(word).ok_or(HypoError::InvalidAddress)
    }
}
