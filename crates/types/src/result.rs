use core::fmt;

use serde::{Deserialize, Serialize};

use crate::Word;

/// Every failure the machine or the kernel can report.
///
/// Each variant has a fixed negative code. Codes only matter where a failure
/// has to be written into a register (system call status in GPR0) or shown to
/// a user; inside Rust the enum is passed around as-is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HypoError {
    /// Program could not be opened or read.
    FileOpen,
    /// Operand or load address outside the legal range.
    InvalidAddress,
    /// Program image ended without an end-of-program marker.
    NoEndOfProgram,
    /// PC outside the user program area.
    InvalidPcValue,
    InvalidOpcode,
    /// Register digit 8 or 9.
    InvalidRegister,
    /// Unknown addressing mode, mode 0 used as an operand, or an immediate destination.
    InvalidMode,
    /// Address outside the pool or queue region it was handed to.
    InvalidMemoryAddress,
    /// Unknown system call or interrupt id.
    InvalidId,
    NoFreeMemory,
    InvalidMemorySize,
    InvalidSizeOrMemoryAddress,
    StackOverflow,
    StackUnderflow,
    DivideByZero,
    PidNotFound,
}

impl HypoError {
    pub const ALL: [HypoError; 16] = [
        HypoError::FileOpen,
        HypoError::InvalidAddress,
        HypoError::NoEndOfProgram,
        HypoError::InvalidPcValue,
        HypoError::InvalidOpcode,
        HypoError::InvalidRegister,
        HypoError::InvalidMode,
        HypoError::InvalidMemoryAddress,
        HypoError::InvalidId,
        HypoError::NoFreeMemory,
        HypoError::InvalidMemorySize,
        HypoError::InvalidSizeOrMemoryAddress,
        HypoError::StackOverflow,
        HypoError::StackUnderflow,
        HypoError::DivideByZero,
        HypoError::PidNotFound,
    ];

    pub const fn code(self) -> Word {
        match self {
            HypoError::FileOpen => -3,
            HypoError::InvalidAddress => -4,
            HypoError::NoEndOfProgram => -5,
            HypoError::InvalidPcValue => -6,
            HypoError::InvalidOpcode => -7,
            HypoError::InvalidRegister => -8,
            HypoError::InvalidMode => -10,
            HypoError::InvalidMemoryAddress => -11,
            HypoError::InvalidId => -12,
            HypoError::NoFreeMemory => -13,
            HypoError::InvalidMemorySize => -14,
            HypoError::InvalidSizeOrMemoryAddress => -15,
            HypoError::StackOverflow => -16,
            HypoError::StackUnderflow => -17,
            HypoError::DivideByZero => -18,
            HypoError::PidNotFound => -19,
        }
    }

    pub fn from_code(code: Word) -> Option<Self> {
        Self::ALL.iter().copied().find(|e| e.code() == code)
    }

    pub const fn description(self) -> &'static str {
        match self {
            HypoError::FileOpen => "unable to open program",
            HypoError::InvalidAddress => "invalid address",
            HypoError::NoEndOfProgram => "missing end of program",
            HypoError::InvalidPcValue => "invalid PC value",
            HypoError::InvalidOpcode => "invalid opcode",
            HypoError::InvalidRegister => "invalid register",
            HypoError::InvalidMode => "invalid addressing mode",
            HypoError::InvalidMemoryAddress => "invalid memory address",
            HypoError::InvalidId => "invalid id",
            HypoError::NoFreeMemory => "no free memory",
            HypoError::InvalidMemorySize => "invalid memory size",
            HypoError::InvalidSizeOrMemoryAddress => "invalid size or memory address",
            HypoError::StackOverflow => "stack overflow",
            HypoError::StackUnderflow => "stack underflow",
            HypoError::DivideByZero => "divide by zero",
            HypoError::PidNotFound => "pid not found",
        }
    }
}

impl fmt::Display for HypoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.description(), self.code())
    }
}

impl core::error::Error for HypoError {}

pub type Result<T> = core::result::Result<T, HypoError>;

/// Non-error outcome of a run, as returned by the interpreter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    Ok,
    Halted,
    TimeSliceExpired,
    /// The process asked for a character and must wait for input completion.
    WaitingForInput,
    /// The process handed a character to output and must wait for output completion.
    WaitingForOutput,
}

impl Status {
    pub const fn code(self) -> Word {
        match self {
            Status::Ok => 0,
            Status::Halted => 1,
            Status::TimeSliceExpired => 2,
            Status::WaitingForInput => 3,
            Status::WaitingForOutput => 4,
        }
    }

    pub fn from_code(code: Word) -> Option<Self> {
        match code {
            0 => Some(Status::Ok),
            1 => Some(Status::Halted),
            2 => Some(Status::TimeSliceExpired),
            3 => Some(Status::WaitingForInput),
            4 => Some(Status::WaitingForOutput),
            _ => None,
        }
    }

    pub const fn is_blocking(self) -> bool {
        matches!(self, Status::WaitingForInput | Status::WaitingForOutput)
    }
}
