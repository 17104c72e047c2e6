use log::info;
use types::{Result, Word};
use vm::{Memory, Registers, VM};

use crate::allocator::{FreeList, Pool};
use crate::config::Config;
use crate::loader::ProgramLoader;
use crate::pcb::{Pcb, PcbSnapshot};
use crate::queue::{ReadyQueue, WaitQueue};
use crate::snapshot::Snapshot;

/// Everything the operating system knows, in one place.
///
/// The machine (memory and registers), both allocator pools, both queues,
/// the PID counter and the program loader all live here and are reached only
/// through `&mut Kernel`.
#[derive(Debug)]
pub struct Kernel {
    pub(crate) config: Config,
    pub(crate) vm: VM,
    pub(crate) os_pool: FreeList,
    pub(crate) user_pool: FreeList,
    pub(crate) ready: ReadyQueue,
    pub(crate) waiting: WaitQueue,
    pub(crate) running: Option<Pcb>,
    pub(crate) next_pid: Word,
    pub(crate) loader: Box<dyn ProgramLoader>,
    pub(crate) shut_down: bool,
}

impl Kernel {
    /// Brings the machine up: zeroed memory and registers, both pools as
    /// single free blocks, empty queues, PIDs from 1.
    pub fn boot(config: Config, loader: Box<dyn ProgramLoader>) -> Result<Self> {
        config.validate()?;
        let layout = config.layout;

        let mut vm = VM::new(layout);
        let mut os_pool = FreeList::new(Pool::Os, layout.os_pool);
        let mut user_pool = FreeList::new(Pool::User, layout.user_pool);
        os_pool.init(&mut vm.memory)?;
        user_pool.init(&mut vm.memory)?;

        info!(
            "boot: time slice {}, stack {} words, OS pool {} words, user pool {} words",
            config.time_slice,
            config.stack_size,
            layout.os_pool.len(),
            layout.user_pool.len()
        );

        Ok(Self {
            ready: ReadyQueue::new(layout.os_pool),
            waiting: WaitQueue::new(layout.os_pool),
            config,
            vm,
            os_pool,
            user_pool,
            running: None,
            next_pid: 1,
            loader,
            shut_down: false,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn vm(&self) -> &VM {
        &self.vm
    }

    pub fn memory(&self) -> &Memory {
        &self.vm.memory
    }

    pub fn registers(&self) -> &Registers {
        &self.vm.cpu.regs
    }

    pub fn clock(&self) -> u64 {
        self.vm.cpu.regs.clock
    }

    pub fn os_pool(&self) -> &FreeList {
        &self.os_pool
    }

    pub fn user_pool(&self) -> &FreeList {
        &self.user_pool
    }

    pub fn ready_queue(&self) -> &ReadyQueue {
        &self.ready
    }

    pub fn wait_queue(&self) -> &WaitQueue {
        &self.waiting
    }

    /// Ready PCBs in scheduling order.
    pub fn ready_pcbs(&self) -> Result<Vec<Pcb>> {
        self.ready.pcbs(&self.vm.memory)
    }

    /// Waiting PCBs, newest first.
    pub fn waiting_pcbs(&self) -> Result<Vec<Pcb>> {
        self.waiting.pcbs(&self.vm.memory)
    }

    /// The PCB on the CPU. Only set while a scheduling cycle is running.
    pub fn running(&self) -> Option<Pcb> {
        self.running
    }

    /// PID the next successful process creation will get.
    pub fn next_pid(&self) -> Word {
        self.next_pid
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    pub fn pcb_snapshot(&self, pcb: Pcb) -> PcbSnapshot {
        pcb.snapshot(&self.vm.memory)
    }

    /// Finds a queued PCB by PID, looking in the ready queue first.
    pub fn find_pcb(&self, pid: Word) -> Result<Option<Pcb>> {
        let memory = &self.vm.memory;
        let mut pcbs = self.ready_pcbs()?;
        pcbs.extend(self.waiting_pcbs()?);
        Ok(pcbs.into_iter().find(|pcb| pcb.pid(memory) == pid))
    }

    pub fn snapshot(&self) -> Result<Snapshot> {
        Snapshot::capture(self)
    }
}
