use types::Status;
use vm::registers::Registers;
use vm::sys_call::SyscallOutcome;
use vm::Memory;

use crate::pcb::{Pcb, ProcessState};

/// Reports the caller's PID in GPR1, priority in GPR2 and state in GPR3.
pub(crate) fn sys_process_inquiry(
    current: Pcb,
    regs: &mut Registers,
    memory: &Memory,
) -> SyscallOutcome {
    regs.gpr[1] = current.pid(memory);
    regs.gpr[2] = current.priority(memory);
    regs.gpr[3] = current
        .state(memory)
        .unwrap_or(ProcessState::Running)
        .code();
    regs.gpr[0] = Status::Ok.code();
    SyscallOutcome::Continue
}
