use log::debug;
use types::{HypoError, Status};
use vm::registers::Registers;
use vm::sys_call::SyscallOutcome;
use vm::Memory;

use crate::allocator::FreeList;

/// Allocates GPR2 words from the user pool. GPR1 gets the address, or the
/// error code on failure; GPR0 gets the status.
pub(crate) fn sys_mem_alloc(
    user_pool: &mut FreeList,
    regs: &mut Registers,
    memory: &mut Memory,
) -> SyscallOutcome {
    let size = regs.gpr[2];
    if size < 1 {
        debug!("sys_mem_alloc: invalid size {}", size);
        regs.gpr[0] = HypoError::InvalidMemorySize.code();
        return SyscallOutcome::Continue;
    }

    match user_pool.allocate(memory, size) {
        Ok(addr) => {
            debug!("sys_mem_alloc: size={} addr={}", size, addr);
            regs.gpr[1] = addr.as_word();
            regs.gpr[0] = Status::Ok.code();
        }
        Err(e) => {
            regs.gpr[1] = e.code();
            regs.gpr[0] = e.code();
        }
    }
    SyscallOutcome::Continue
}

/// Returns GPR2 words at GPR1 to the user pool. GPR0 gets the status.
pub(crate) fn sys_mem_free(
    user_pool: &mut FreeList,
    regs: &mut Registers,
    memory: &mut Memory,
) -> SyscallOutcome {
    let (address, size) = (regs.gpr[1], regs.gpr[2]);
    regs.gpr[0] = match user_pool.free(memory, address, size) {
        Ok(()) => {
            debug!("sys_mem_free: size={} addr={}", size, address);
            Status::Ok.code()
        }
        Err(e) => e.code(),
    };
    SyscallOutcome::Continue
}
