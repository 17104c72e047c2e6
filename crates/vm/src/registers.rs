use serde::{Deserialize, Serialize};
use types::Word;

/// Number of general-purpose registers.
pub const GPR_COUNT: usize = 8;

/// General-purpose register index, as encoded in the register digit of an operand.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Register {
    R0 = 0,
    R1 = 1,
    R2 = 2,
    R3 = 3,
    R4 = 4,
    R5 = 5,
    R6 = 6,
    R7 = 7,
}

impl Register {
    pub const ALL: [Register; GPR_COUNT] = [
        Register::R0,
        Register::R1,
        Register::R2,
        Register::R3,
        Register::R4,
        Register::R5,
        Register::R6,
        Register::R7,
    ];

    pub fn from_digit(digit: Word) -> Option<Self> {
        usize::try_from(digit)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
    }

    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Processor status register: which privilege mode the CPU is in.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Psr {
    #[default]
    OsMode,
    UserMode,
}

impl Psr {
    pub const fn code(self) -> Word {
        match self {
            Psr::OsMode => 1,
            Psr::UserMode => 2,
        }
    }

    pub fn from_code(code: Word) -> Option<Self> {
        match code {
            1 => Some(Psr::OsMode),
            2 => Some(Psr::UserMode),
            _ => None,
        }
    }
}

/// The machine's single register file.
///
/// MAR, MBR and IR are kept for observability: fetch loads them the way the
/// hardware would, but nothing reads them back during execution.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registers {
    pub gpr: [Word; GPR_COUNT],
    pub pc: Word,
    pub sp: Word,
    pub psr: Psr,
    pub mar: Word,
    pub mbr: Word,
    pub ir: Word,
    /// Total clock units consumed since boot. Never reset by a context switch.
    pub clock: u64,
}

impl Registers {
    pub fn get(&self, reg: Register) -> Word {
        self.gpr[reg.index()]
    }

    pub fn set(&mut self, reg: Register, value: Word) {
        self.gpr[reg.index()] = value;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
