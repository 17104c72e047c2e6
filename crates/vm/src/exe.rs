use log::debug;
use types::{HypoError, Result, Word};

use crate::cpu::{Cpu, Step};
use crate::instruction::Instruction;
use crate::isa::Opcode;
use crate::memory::Memory;
use crate::registers::Psr;
use crate::sys_call::{SyscallHandler, SyscallOutcome};

impl Cpu {
    /// Executes a decoded instruction. PC already points past the instruction word.
    pub(crate) fn execute(
        &mut self,
        instr: &Instruction,
        memory: &mut Memory,
        syscalls: &mut dyn SyscallHandler,
    ) -> Result<Step> {
        match instr.opcode {
            Opcode::Halt => Ok(Step::Halt),

            Opcode::Add | Opcode::Subtract | Opcode::Multiply | Opcode::Divide | Opcode::Move => {
                let op1 = self.fetch_operand(memory, instr.op1)?;
                let op2 = self.fetch_operand(memory, instr.op2)?;
                let result = match instr.opcode {
                    Opcode::Add => op1.value.wrapping_add(op2.value),
                    Opcode::Subtract => op1.value.wrapping_sub(op2.value),
                    Opcode::Multiply => op1.value.wrapping_mul(op2.value),
                    Opcode::Divide => {
                        if op2.value == 0 {
                            return Err(HypoError::DivideByZero);
                        }
                        op1.value.wrapping_div(op2.value)
                    }
                    _ => op2.value,
                };
                self.store_operand(memory, &op1, result)?;
                Ok(Step::Continue)
            }

            Opcode::Branch => {
                self.regs.pc = self.next_word(memory)?;
                Ok(Step::Continue)
            }

            Opcode::BranchOnMinus | Opcode::BranchOnPlus | Opcode::BranchOnZero => {
                let op1 = self.fetch_operand(memory, instr.op1)?;
                let target = self.next_word(memory)?;
                let taken = match instr.opcode {
                    Opcode::BranchOnMinus => op1.value < 0,
                    Opcode::BranchOnPlus => op1.value > 0,
                    _ => op1.value == 0,
                };
                if taken {
                    self.regs.pc = target;
                }
                Ok(Step::Continue)
            }

            Opcode::Push => {
                let op1 = self.fetch_operand(memory, instr.op1)?;
                let sp = self.regs.sp.wrapping_add(1);
                if let Some(bounds) = self.stack {
                    if sp > bounds.limit {
                        return Err(HypoError::StackOverflow);
                    }
                }
                let addr = self.operand_address(sp)?;
                memory.write(addr, op1.value);
                self.regs.sp = sp;
                Ok(Step::Continue)
            }

            Opcode::Pop => {
                let op1 = self.fetch_operand(memory, instr.op1)?;
                let sp = self.regs.sp;
                if let Some(bounds) = self.stack {
                    if sp < bounds.base {
                        return Err(HypoError::StackUnderflow);
                    }
                }
                let addr = self.operand_address(sp)?;
                let value = memory.read(addr);
                self.store_operand(memory, &op1, value)?;
                self.regs.sp = sp - 1;
                Ok(Step::Continue)
            }

            Opcode::SystemCall => {
                let call_id: Word = self.fetch_operand(memory, instr.op1)?.value;
                debug!("system call {} from pc={}", call_id, self.regs.pc);
                self.regs.psr = Psr::OsMode;
                let outcome = syscalls.handle_syscall(call_id, &mut self.regs, memory);
                self.regs.psr = Psr::UserMode;
                match outcome? {
                    SyscallOutcome::Continue => Ok(Step::Continue),
                    SyscallOutcome::Block(status) => Ok(Step::Block(status)),
                }
            }
        }
    }
}
