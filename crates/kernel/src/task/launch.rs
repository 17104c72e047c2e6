use log::{info, warn};
use types::{Result, Word};
use vm::registers::Psr;

use crate::kernel::Kernel;
use crate::pcb::{PCB_SIZE, Pcb};

impl Kernel {
    /// Creates a process for `program` and queues it as ready.
    ///
    /// A failure after the program was loaded rolls back the PCB and stack, but
    /// the image stays in the program area. That area belongs to no pool, and
    /// the next load over it simply overwrites it.
    pub fn create_process(&mut self, program: &str, priority: Word) -> Result<Pcb> {
        let layout = self.config.layout;
        let memory = &mut self.vm.memory;

        let pcb_addr = self.os_pool.allocate(memory, PCB_SIZE)?;
        let pcb = match Pcb::at(pcb_addr, &layout.os_pool) {
            Ok(pcb) => pcb,
            Err(e) => {
                self.os_pool.free(memory, pcb_addr.as_word(), PCB_SIZE)?;
                return Err(e);
            }
        };
        let pid = self.next_pid;
        pcb.init(memory, pid, priority);

        let entry = match self.loader.load(program, memory, &layout) {
            Ok(entry) => entry,
            Err(e) => {
                warn!("create {:?}: load failed: {}", program, e);
                self.os_pool.free(memory, pcb_addr.as_word(), PCB_SIZE)?;
                return Err(e);
            }
        };

        let stack_size = self.config.stack_size;
        let stack = match self.user_pool.allocate(memory, stack_size) {
            Ok(stack) => stack,
            Err(e) => {
                warn!("create {:?}: no stack: {}", program, e);
                self.os_pool.free(memory, pcb_addr.as_word(), PCB_SIZE)?;
                return Err(e);
            }
        };
        pcb.set_stack(memory, stack, stack_size);
        pcb.set_sp(memory, stack.as_word() - 1);
        pcb.set_pc(memory, entry.as_word());
        pcb.set_psr(memory, Psr::UserMode.code());

        if let Err(e) = self.ready.insert(memory, pcb) {
            self.user_pool.free(memory, stack.as_word(), stack_size)?;
            self.os_pool.free(memory, pcb_addr.as_word(), PCB_SIZE)?;
            return Err(e);
        }
        self.next_pid += 1;
        info!(
            "created pid {} from {:?}: priority {}, entry {}, stack {}+{}",
            pid, program, priority, entry, stack, stack_size
        );
        Ok(pcb)
    }

    /// Gives the process's stack and PCB back to their pools.
    ///
    /// User code can write the user pool's free list, so a stack the pool
    /// refuses (already freed by the process, or a corrupted list) is logged
    /// and left out. The OS pool is out of user reach and must accept the PCB.
    pub fn terminate_process(&mut self, pcb: Pcb) -> Result<()> {
        let memory = &mut self.vm.memory;
        let pid = pcb.pid(memory);
        let stack_start = pcb.stack_start(memory);
        let stack_size = pcb.stack_size(memory);

        if let Err(e) = self.user_pool.free(memory, stack_start, stack_size) {
            warn!("pid {}: stack at {} not returned to the user pool: {}", pid, stack_start, e);
        }
        self.os_pool.free(memory, pcb.address().as_word(), PCB_SIZE)?;
        if self.running == Some(pcb) {
            self.running = None;
        }
        info!("terminated pid {}", pid);
        Ok(())
    }
}
