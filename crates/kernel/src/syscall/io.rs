use types::Status;
use vm::registers::Registers;
use vm::sys_call::SyscallOutcome;

/// Blocks until an input-completion interrupt delivers a character into GPR1.
pub(crate) fn sys_io_getc(regs: &mut Registers) -> SyscallOutcome {
    regs.gpr[0] = Status::Ok.code();
    SyscallOutcome::Block(Status::WaitingForInput)
}

/// Blocks until an output-completion interrupt has shown the character in GPR1.
pub(crate) fn sys_io_putc(regs: &mut Registers) -> SyscallOutcome {
    regs.gpr[0] = Status::Ok.code();
    SyscallOutcome::Block(Status::WaitingForOutput)
}
