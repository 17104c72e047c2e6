use types::{Result, Status, Word};

use crate::memory::Memory;
use crate::registers::Registers;

/// System call IDs, passed as the operand of the `sys` instruction.
pub const SYSCALL_CREATE_PROCESS: Word = 1;
pub const SYSCALL_DELETE_PROCESS: Word = 2;
pub const SYSCALL_PROCESS_INQUIRY: Word = 3;
pub const SYSCALL_MEM_ALLOC: Word = 4;
pub const SYSCALL_MEM_FREE: Word = 5;
pub const SYSCALL_MSG_SEND: Word = 6;
pub const SYSCALL_MSG_RECEIVE: Word = 7;
pub const SYSCALL_IO_GETC: Word = 8;
pub const SYSCALL_IO_PUTC: Word = 9;

/// What the CPU does once a system call handler returns.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SyscallOutcome {
    /// Resume the process at the next instruction.
    Continue,
    /// Leave the CPU and report this status to the scheduler.
    Block(Status),
}

/// Trait implemented by syscall handlers consumed by the VM.
///
/// Handlers exchange arguments and results through the register file; by
/// convention GPR0 carries the status code back to the program.
pub trait SyscallHandler: std::fmt::Debug {
    fn handle_syscall(
        &mut self,
        call_id: Word,
        regs: &mut Registers,
        memory: &mut Memory,
    ) -> Result<SyscallOutcome>;
}

/// Handler for running programs without an operating system: every call
/// succeeds without doing anything.
#[derive(Debug, Default)]
pub struct NoopSyscallHandler;

impl SyscallHandler for NoopSyscallHandler {
    fn handle_syscall(
        &mut self,
        _call_id: Word,
        regs: &mut Registers,
        _memory: &mut Memory,
    ) -> Result<SyscallOutcome> {
        regs.gpr[0] = Status::Ok.code();
        Ok(SyscallOutcome::Continue)
    }
}
