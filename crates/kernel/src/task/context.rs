use vm::registers::{Psr, Register};
use vm::{Cpu, Memory, StackBounds};

use crate::pcb::Pcb;

/// Copies the live CPU context into `pcb`.
pub fn save_context(cpu: &Cpu, memory: &mut Memory, pcb: Pcb) {
    for reg in Register::ALL {
        pcb.set_gpr(memory, reg, cpu.regs.get(reg));
    }
    pcb.set_sp(memory, cpu.regs.sp);
    pcb.set_pc(memory, cpu.regs.pc);
    pcb.set_psr(memory, cpu.regs.psr.code());
}

/// Loads `pcb`'s saved context onto the CPU and drops it to user mode.
pub fn dispatch(cpu: &mut Cpu, memory: &Memory, pcb: Pcb) {
    for reg in Register::ALL {
        cpu.regs.set(reg, pcb.gpr(memory, reg));
    }
    cpu.regs.sp = pcb.sp(memory);
    cpu.regs.pc = pcb.pc(memory);
    cpu.regs.psr = Psr::UserMode;
    cpu.stack = Some(StackBounds::new(pcb.stack_start(memory), pcb.stack_size(memory)));
}
