use core::fmt;

use crate::isa::{AddressingMode, Opcode};
use crate::registers::Register;

/// One operand slot of a decoded instruction: a mode and a register digit.
///
/// The register digit is always present in the encoding, even for modes that
/// ignore it, so it is kept here to make decoding lossless.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct OperandSpec {
    pub mode: AddressingMode,
    pub reg: Register,
}

impl OperandSpec {
    pub const UNUSED: Self = Self::new(AddressingMode::Unused, Register::R0);

    pub const fn new(mode: AddressingMode, reg: Register) -> Self {
        Self { mode, reg }
    }

    pub const fn register(reg: Register) -> Self {
        Self::new(AddressingMode::Register, reg)
    }

    pub const fn deferred(reg: Register) -> Self {
        Self::new(AddressingMode::RegisterDeferred, reg)
    }

    pub const fn auto_increment(reg: Register) -> Self {
        Self::new(AddressingMode::AutoIncrement, reg)
    }

    pub const fn auto_decrement(reg: Register) -> Self {
        Self::new(AddressingMode::AutoDecrement, reg)
    }

    pub const fn direct() -> Self {
        Self::new(AddressingMode::Direct, Register::R0)
    }

    pub const fn immediate() -> Self {
        Self::new(AddressingMode::Immediate, Register::R0)
    }
}

impl fmt::Display for OperandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.reg.index();
        match self.mode {
            AddressingMode::Unused => f.write_str("-"),
            AddressingMode::Register => write!(f, "R{}", r),
            AddressingMode::RegisterDeferred => write!(f, "(R{})", r),
            AddressingMode::AutoIncrement => write!(f, "(R{})+", r),
            AddressingMode::AutoDecrement => write!(f, "-(R{})", r),
            AddressingMode::Direct => f.write_str("[addr]"),
            AddressingMode::Immediate => f.write_str("#imm"),
        }
    }
}

/// A decoded instruction word.
///
/// Extra words (direct addresses, immediates, branch targets) are not part of
/// the instruction itself; the CPU reads them from PC while executing.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Instruction {
    pub opcode: Opcode,
    pub op1: OperandSpec,
    pub op2: OperandSpec,
}

impl Instruction {
    pub const HALT: Self = Self::new(Opcode::Halt, OperandSpec::UNUSED, OperandSpec::UNUSED);

    pub const fn new(opcode: Opcode, op1: OperandSpec, op2: OperandSpec) -> Self {
        Self { opcode, op1, op2 }
    }

    /// Instruction that only uses its first operand (branch-on-*, push, pop, sys).
    pub const fn unary(opcode: Opcode, op1: OperandSpec) -> Self {
        Self::new(opcode, op1, OperandSpec::UNUSED)
    }

    pub fn pretty_print(&self) -> String {
        match self.opcode {
            Opcode::Halt | Opcode::Branch => self.opcode.mnemonic().to_string(),
            Opcode::BranchOnMinus
            | Opcode::BranchOnPlus
            | Opcode::BranchOnZero
            | Opcode::Push
            | Opcode::Pop
            | Opcode::SystemCall => format!("{} {}", self.opcode.mnemonic(), self.op1),
            _ => format!("{} {}, {}", self.opcode.mnemonic(), self.op1, self.op2),
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pretty_print())
    }
}
