//! System calls made by user programs through the `sys` instruction.
//! Arguments and results travel in the registers; GPR0 carries the status.

use log::{debug, warn};
use types::{HypoError, Result, Status, Word};
use vm::registers::Registers;
use vm::sys_call::*;
use vm::Memory;

use crate::allocator::FreeList;
use crate::pcb::Pcb;

pub mod alloc;
pub mod io;
pub mod process;

use self::alloc::{sys_mem_alloc, sys_mem_free};
use self::io::{sys_io_getc, sys_io_putc};
use self::process::sys_process_inquiry;

/// Syscall handler installed for one dispatch of one process.
#[derive(Debug)]
pub struct KernelSyscalls<'a> {
    user_pool: &'a mut FreeList,
    current: Pcb,
}

impl<'a> KernelSyscalls<'a> {
    pub fn new(user_pool: &'a mut FreeList, current: Pcb) -> Self {
        Self { user_pool, current }
    }
}

impl SyscallHandler for KernelSyscalls<'_> {
    fn handle_syscall(
        &mut self,
        call_id: Word,
        regs: &mut Registers,
        memory: &mut Memory,
    ) -> Result<SyscallOutcome> {
        debug!("syscall {} gpr={:?}", call_id, regs.gpr);
        let outcome = match call_id {
            SYSCALL_MEM_ALLOC => sys_mem_alloc(self.user_pool, regs, memory),
            SYSCALL_MEM_FREE => sys_mem_free(self.user_pool, regs, memory),
            SYSCALL_IO_GETC => sys_io_getc(regs),
            SYSCALL_IO_PUTC => sys_io_putc(regs),
            SYSCALL_PROCESS_INQUIRY => sys_process_inquiry(self.current, regs, memory),
            SYSCALL_CREATE_PROCESS
            | SYSCALL_DELETE_PROCESS
            | SYSCALL_MSG_SEND
            | SYSCALL_MSG_RECEIVE => {
                warn!("syscall {}: not implemented", call_id);
                regs.gpr[0] = Status::Ok.code();
                SyscallOutcome::Continue
            }
            _ => {
                warn!("unknown syscall id {}", call_id);
                regs.gpr[0] = HypoError::InvalidId.code();
                SyscallOutcome::Continue
            }
        };
        Ok(outcome)
    }
}
