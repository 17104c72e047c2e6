pub mod cpu;
pub mod decoder;
pub mod exe;
pub mod instruction;
pub mod isa;
pub mod memory;
pub mod metering;
pub mod operand;
pub mod registers;
pub mod sys_call;
pub mod vm;

pub use cpu::{Cpu, StackBounds, Step};
pub use memory::Memory;
pub use registers::{Psr, Register, Registers};
pub use vm::VM;
