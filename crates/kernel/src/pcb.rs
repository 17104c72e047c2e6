//! Process control blocks, stored as 22-word records in the OS pool.

use serde::Serialize;
use types::{Address, END_OF_LIST, HypoError, Link, Region, Result, Word};
use vm::registers::{GPR_COUNT, Register};
use vm::Memory;

pub const PCB_SIZE: Word = 22;

/// Word offsets inside a PCB.
pub mod offset {
    use types::Word;

    pub const NEXT: Word = 0;
    pub const PID: Word = 1;
    pub const STATE: Word = 2;
    pub const REASON: Word = 3;
    pub const PRIORITY: Word = 4;
    pub const STACK_START: Word = 5;
    pub const STACK_SIZE: Word = 6;
    pub const MSG_QUEUE_START: Word = 7;
    pub const MSG_QUEUE_SIZE: Word = 8;
    pub const MSG_COUNT: Word = 9;
    pub const RESERVED: Word = 10;
    pub const GPR0: Word = 11;
    pub const SP: Word = 19;
    pub const PC: Word = 20;
    pub const PSR: Word = 21;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum ProcessState {
    Ready,
    Waiting,
    Running,
}

impl ProcessState {
    pub const fn code(self) -> Word {
        match self {
            ProcessState::Ready => 1,
            ProcessState::Waiting => 2,
            ProcessState::Running => 3,
        }
    }

    pub fn from_code(code: Word) -> Option<Self> {
        match code {
            1 => Some(ProcessState::Ready),
            2 => Some(ProcessState::Waiting),
            3 => Some(ProcessState::Running),
            _ => None,
        }
    }
}

/// Why a process sits in the wait queue. Codes match the interrupt that
/// releases it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum WaitReason {
    None,
    InputCompletion,
    OutputCompletion,
}

impl WaitReason {
    pub const fn code(self) -> Word {
        match self {
            WaitReason::None => 0,
            WaitReason::InputCompletion => 3,
            WaitReason::OutputCompletion => 4,
        }
    }

    pub fn from_code(code: Word) -> Option<Self> {
        match code {
            0 => Some(WaitReason::None),
            3 => Some(WaitReason::InputCompletion),
            4 => Some(WaitReason::OutputCompletion),
            _ => None,
        }
    }
}

/// Handle to a PCB in memory, identified by its first word.
///
/// A `Pcb` can only be built for a record that lies entirely inside the
/// region it was checked against (the OS pool), so field access never leaves
/// memory.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Pcb(Address);

impl Pcb {
    pub fn at(address: Address, region: &Region) -> Result<Self> {
        Self::from_word(address.as_word(), region)
    }

    pub fn from_word(word: Word, region: &Region) -> Result<Self> {
        if !region.contains_span(word, PCB_SIZE) {
            return Err(HypoError::InvalidMemoryAddress);
        }
        Address::new(word)
            .map(Pcb)
            .ok_or(HypoError::InvalidMemoryAddress)
    }

    pub fn address(self) -> Address {
        self.0
    }

    fn field(self, offset: Word) -> Address {
        // In range by construction: the whole record was checked in `from_word`.
        Address::from_index(self.0.index() + offset as usize)
    }

    pub fn get(self, memory: &Memory, offset: Word) -> Word {
        memory.read(self.field(offset))
    }

    pub fn set(self, memory: &mut Memory, offset: Word, value: Word) {
        memory.write(self.field(offset), value);
    }

    /// Zeroes the record and fills in identity and scheduling fields.
    pub fn init(self, memory: &mut Memory, pid: Word, priority: Word) {
        for i in 0..PCB_SIZE {
            self.set(memory, i, 0);
        }
        self.set(memory, offset::NEXT, END_OF_LIST);
        self.set(memory, offset::PID, pid);
        self.set_state(memory, ProcessState::Ready);
        self.set_reason(memory, WaitReason::None);
        self.set(memory, offset::PRIORITY, priority);
    }

    pub fn next(self, memory: &Memory) -> Result<Link> {
        Link::from_word(self.get(memory, offset::NEXT))
    }

    pub fn set_next(self, memory: &mut Memory, next: Link) {
        self.set(memory, offset::NEXT, next.to_word());
    }

    pub fn pid(self, memory: &Memory) -> Word {
        self.get(memory, offset::PID)
    }

    pub fn state(self, memory: &Memory) -> Option<ProcessState> {
        ProcessState::from_code(self.get(memory, offset::STATE))
    }

    pub fn set_state(self, memory: &mut Memory, state: ProcessState) {
        self.set(memory, offset::STATE, state.code());
    }

    pub fn reason(self, memory: &Memory) -> Option<WaitReason> {
        WaitReason::from_code(self.get(memory, offset::REASON))
    }

    pub fn set_reason(self, memory: &mut Memory, reason: WaitReason) {
        self.set(memory, offset::REASON, reason.code());
    }

    pub fn priority(self, memory: &Memory) -> Word {
        self.get(memory, offset::PRIORITY)
    }

    pub fn stack_start(self, memory: &Memory) -> Word {
        self.get(memory, offset::STACK_START)
    }

    pub fn stack_size(self, memory: &Memory) -> Word {
        self.get(memory, offset::STACK_SIZE)
    }

    pub fn set_stack(self, memory: &mut Memory, start: Address, size: Word) {
        self.set(memory, offset::STACK_START, start.as_word());
        self.set(memory, offset::STACK_SIZE, size);
    }

    pub fn gpr(self, memory: &Memory, reg: Register) -> Word {
        self.get(memory, offset::GPR0 + reg.index() as Word)
    }

    pub fn set_gpr(self, memory: &mut Memory, reg: Register, value: Word) {
        self.set(memory, offset::GPR0 + reg.index() as Word, value);
    }

    pub fn gprs(self, memory: &Memory) -> [Word; GPR_COUNT] {
        let mut gpr = [0; GPR_COUNT];
        for reg in Register::ALL {
            gpr[reg.index()] = self.gpr(memory, reg);
        }
        gpr
    }

    pub fn sp(self, memory: &Memory) -> Word {
        self.get(memory, offset::SP)
    }

    pub fn set_sp(self, memory: &mut Memory, sp: Word) {
        self.set(memory, offset::SP, sp);
    }

    pub fn pc(self, memory: &Memory) -> Word {
        self.get(memory, offset::PC)
    }

    pub fn set_pc(self, memory: &mut Memory, pc: Word) {
        self.set(memory, offset::PC, pc);
    }

    pub fn psr(self, memory: &Memory) -> Word {
        self.get(memory, offset::PSR)
    }

    pub fn set_psr(self, memory: &mut Memory, psr: Word) {
        self.set(memory, offset::PSR, psr);
    }

    pub fn snapshot(self, memory: &Memory) -> PcbSnapshot {
        PcbSnapshot {
            address: self.0,
            pid: self.pid(memory),
            state: self.state(memory),
            reason: self.reason(memory),
            priority: self.priority(memory),
            next: self.get(memory, offset::NEXT),
            stack_start: self.stack_start(memory),
            stack_size: self.stack_size(memory),
            gpr: self.gprs(memory),
            sp: self.sp(memory),
            pc: self.pc(memory),
            psr: self.psr(memory),
        }
    }
}

/// Copy of every meaningful PCB field, for introspection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PcbSnapshot {
    pub address: Address,
    pub pid: Word,
    pub state: Option<ProcessState>,
    pub reason: Option<WaitReason>,
    pub priority: Word,
    pub next: Word,
    pub stack_start: Word,
    pub stack_size: Word,
    pub gpr: [Word; GPR_COUNT],
    pub sp: Word,
    pub pc: Word,
    pub psr: Word,
}
