use std::collections::HashMap;

use types::{Result, Status, Word};
use vm::memory::Memory;
use vm::registers::Registers;
use vm::sys_call::{SyscallHandler, SyscallOutcome};

/// Records every call with a copy of the GPRs at call time. Calls listed in
/// `blocking` suspend the run with the configured status.
#[derive(Debug, Default)]
pub struct RecordingSyscallHandler {
    pub calls: Vec<(Word, [Word; 8])>,
    pub blocking: HashMap<Word, Status>,
}

impl RecordingSyscallHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn block_on(mut self, call_id: Word, status: Status) -> Self {
        self.blocking.insert(call_id, status);
        self
    }
}

impl SyscallHandler for RecordingSyscallHandler {
    fn handle_syscall(
        &mut self,
        call_id: Word,
        regs: &mut Registers,
        _memory: &mut Memory,
    ) -> Result<SyscallOutcome> {
        self.calls.push((call_id, regs.gpr));
        regs.gpr[0] = Status::Ok.code();
        Ok(match self.blocking.get(&call_id) {
            Some(status) => SyscallOutcome::Block(*status),
            None => SyscallOutcome::Continue,
        })
    }
}
