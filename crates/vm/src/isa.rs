use serde::{Deserialize, Serialize};
use types::Word;

/// EDUCATIONAL: the HYPO instruction set.
///
/// The machine is decimal, so an opcode is simply the leading digits of an
/// instruction word (`word / 10000`). There are thirteen of them, covering
/// arithmetic, data movement, control flow, a small stack and the trap into
/// the operating system.
///
/// INSTRUCTION TIMING: every opcode has a fixed cost in clock units. The cost is
/// added to the system clock and charged against the running process's time
/// slice, which is how the scheduler decides when to preempt.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Opcode {
    /// HALT (0): stop the running process.
    Halt = 0,

    /// ADD (1): op1 = op1 + op2.
    Add = 1,

    /// SUBTRACT (2): op1 = op1 - op2.
    Subtract = 2,

    /// MULTIPLY (3): op1 = op1 * op2.
    Multiply = 3,

    /// DIVIDE (4): op1 = op1 / op2. A zero divisor is a fatal error.
    Divide = 4,

    /// MOVE (5): op1 = op2.
    Move = 5,

    /// BRANCH (6): PC = the word following the instruction.
    Branch = 6,

    /// BRANCH ON MINUS (7): branch if op1 < 0.
    BranchOnMinus = 7,

    /// BRANCH ON PLUS (8): branch if op1 > 0.
    BranchOnPlus = 8,

    /// BRANCH ON ZERO (9): branch if op1 == 0.
    BranchOnZero = 9,

    /// PUSH (10): SP += 1, memory[SP] = op1.
    Push = 10,

    /// POP (11): op1 = memory[SP], SP -= 1.
    Pop = 11,

    /// SYSTEM CALL (12): trap into the OS with call id = op1.
    SystemCall = 12,
}

impl Opcode {
    pub const ALL: [Opcode; 13] = [
        Opcode::Halt,
        Opcode::Add,
        Opcode::Subtract,
        Opcode::Multiply,
        Opcode::Divide,
        Opcode::Move,
        Opcode::Branch,
        Opcode::BranchOnMinus,
        Opcode::BranchOnPlus,
        Opcode::BranchOnZero,
        Opcode::Push,
        Opcode::Pop,
        Opcode::SystemCall,
    ];

    pub fn from_word(word: Word) -> Option<Self> {
        usize::try_from(word)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
    }

    pub const fn code(self) -> Word {
        self as Word
    }

    /// Clock units consumed by one execution of this opcode.
    pub const fn clock_cost(self) -> u64 {
        match self {
            Opcode::Halt | Opcode::SystemCall => 12,
            Opcode::Multiply | Opcode::Divide => 6,
            Opcode::Add | Opcode::Subtract => 3,
            Opcode::BranchOnMinus | Opcode::BranchOnPlus | Opcode::BranchOnZero => 4,
            Opcode::Move | Opcode::Branch | Opcode::Push | Opcode::Pop => 2,
        }
    }

    pub const fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Halt => "halt",
            Opcode::Add => "add",
            Opcode::Subtract => "sub",
            Opcode::Multiply => "mul",
            Opcode::Divide => "div",
            Opcode::Move => "move",
            Opcode::Branch => "br",
            Opcode::BranchOnMinus => "brm",
            Opcode::BranchOnPlus => "brp",
            Opcode::BranchOnZero => "brz",
            Opcode::Push => "push",
            Opcode::Pop => "pop",
            Opcode::SystemCall => "sys",
        }
    }
}

/// EDUCATIONAL: how an operand finds its value.
///
/// Register-based modes (1..=4) name a general-purpose register in the
/// operand's register digit. Direct and immediate modes (5, 6) read an extra
/// word that follows the instruction, advancing PC. Mode 0 marks an operand
/// slot the opcode does not use.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AddressingMode {
    /// Operand slot not used by the opcode.
    Unused = 0,
    /// The operand is the register itself.
    Register = 1,
    /// The register holds the operand's address.
    RegisterDeferred = 2,
    /// As register-deferred, then the register is incremented.
    AutoIncrement = 3,
    /// The register is decremented, then used as register-deferred.
    AutoDecrement = 4,
    /// The next word holds the operand's address.
    Direct = 5,
    /// The next word is the operand value. Never a valid destination.
    Immediate = 6,
}

impl AddressingMode {
    pub const ALL: [AddressingMode; 7] = [
        AddressingMode::Unused,
        AddressingMode::Register,
        AddressingMode::RegisterDeferred,
        AddressingMode::AutoIncrement,
        AddressingMode::AutoDecrement,
        AddressingMode::Direct,
        AddressingMode::Immediate,
    ];

    pub fn from_word(word: Word) -> Option<Self> {
        usize::try_from(word)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
    }

    pub const fn code(self) -> Word {
        self as Word
    }

    /// Whether the register digit takes part in operand resolution.
    pub const fn uses_register(self) -> bool {
        matches!(
            self,
            AddressingMode::Register
                | AddressingMode::RegisterDeferred
                | AddressingMode::AutoIncrement
                | AddressingMode::AutoDecrement
        )
    }
}
