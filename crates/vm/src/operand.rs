use types::{Address, HypoError, Result, Word};

use crate::cpu::Cpu;
use crate::instruction::OperandSpec;
use crate::isa::AddressingMode;
use crate::memory::Memory;
use crate::registers::Register;

/// Where a resolved operand lives, which decides how a result is written back.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Location {
    Register(Register),
    Memory(Address),
    /// Value came from the instruction stream; there is nowhere to write.
    Immediate,
}

/// A resolved operand: its value now and where it came from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Operand {
    pub location: Location,
    pub value: Word,
}

impl Cpu {
    /// Resolves one operand, applying the mode's side effects (auto
    /// increment/decrement, PC advance for direct and immediate words).
    pub(crate) fn fetch_operand(&mut self, memory: &Memory, spec: OperandSpec) -> Result<Operand> {
        let reg = spec.reg;
        match spec.mode {
            AddressingMode::Unused => Err(HypoError::InvalidMode),
            AddressingMode::Register => Ok(Operand {
                location: Location::Register(reg),
                value: self.regs.get(reg),
            }),
            AddressingMode::RegisterDeferred => {
                let addr = self.operand_address(self.regs.get(reg))?;
                Ok(self.memory_operand(memory, addr))
            }
            AddressingMode::AutoIncrement => {
                let addr = self.operand_address(self.regs.get(reg))?;
                let operand = self.memory_operand(memory, addr);
                self.regs.set(reg, addr.as_word() + 1);
                Ok(operand)
            }
            AddressingMode::AutoDecrement => {
                let decremented = self.regs.get(reg).wrapping_sub(1);
                self.regs.set(reg, decremented);
                let addr = self.operand_address(decremented)?;
                Ok(self.memory_operand(memory, addr))
            }
            AddressingMode::Direct => {
                let raw = self.next_word(memory)?;
                let addr = self.operand_address(raw)?;
                Ok(self.memory_operand(memory, addr))
            }
            AddressingMode::Immediate => Ok(Operand {
                location: Location::Immediate,
                value: self.next_word(memory)?,
            }),
        }
    }

    /// Writes `value` back to where `operand` was resolved from.
    pub(crate) fn store_operand(
        &mut self,
        memory: &mut Memory,
        operand: &Operand,
        value: Word,
    ) -> Result<()> {
        match operand.location {
            Location::Register(reg) => self.regs.set(reg, value),
            Location::Memory(addr) => memory.write(addr, value),
            Location::Immediate => return Err(HypoError::InvalidMode),
        }
        Ok(())
    }

    fn memory_operand(&self, memory: &Memory, addr: Address) -> Operand {
        Operand {
            location: Location::Memory(addr),
            value: memory.read(addr),
        }
    }
}
