//! The cycle-stepped 6502/65C02.
//!
//! The CPU never runs on its own: ANTIC is the bus master and advances it
//! explicitly, at most one cycle per free DMA slot. An instruction is a
//! prebuilt sequence of micro-steps (see `units`); the per-cycle work here
//! is only "is this slot mine, and which step comes next".

use super::structs::*;
use super::table;
use super::units::{BusTap, ExecutionSequence, MicroOp, Step};
use crate::devices::bus::{MonitorEvent, Motherboard};
use crate::devices::dma::{DmaSlot, SlotMap, CLOCKS_PER_LINE};

/// Trait for a device that owns a CPU, such as the machine or a test
/// harness.
pub trait WithCpu {
    fn cpu(&self) -> &Cpu6502;
    fn cpu_mut(&mut self) -> &mut Cpu6502;
}

pub struct Cpu6502 {
    /// The architectural registers.
    pub regs: CpuState,
    pub flavor: CpuFlavor,

    //#region micro-program state
    /// The operand byte/word flowing between the micro-steps of the
    /// current instruction.
    pub(super) operand: u16,
    /// The effective address latched by the indirection steps.
    pub(super) ea: u16,
    /// Index of the sequence currently executing (opcode, or one of the
    /// pseudo slots).
    pub(super) cur_instr: usize,
    /// Index of the step after `next_step`.
    pub(super) step_idx: usize,
    /// The step the next free cycle will execute.
    pub(super) next_step: Step,
    //#endregion

    //#region interrupt latches
    pub(super) nmi: bool,
    /// Device-level IRQ lines, one bit per source. Zero means released.
    pub(super) irq_mask: u8,
    /// The one-instruction IRQ delay the silicon has.
    pub(super) irq_pending: bool,
    /// Stop at the next instruction boundary (see `sync`).
    pub(super) isync: bool,
    //#endregion

    //#region timing
    pub slots: SlotMap,
    pub(super) cur_cycle: usize,
    /// Free-running cycle counter, debugging and tests only.
    pub cycle_counter: u64,
    /// Slot at which a WSYNC halt releases, 80..=114.
    pub wsync_position: usize,
    //#endregion

    //#region dispatch tables
    /// `[plain, watchpoint-instrumented]`, both built at cold start and
    /// immutable afterwards. Only the selector below ever changes, and
    /// only at instruction boundaries.
    tables: [Vec<ExecutionSequence>; 2],
    pub(super) watch_enabled: bool,
    //#endregion

    //#region monitor support
    pub(super) breakpoints: [BreakPoint; NUM_BREAKPOINTS],
    pub(super) watchpoints: [WatchPoint; NUM_WATCHPOINTS],
    enable_break: bool,
    enable_trace: bool,
    enable_stack_trace: bool,
    trace_s: u8,
    pub(super) hit_watch: Option<(usize, u16)>,
    prev_pc: u16,
    /// Suppresses re-firing the breakpoint we just resumed from.
    break_resume: Option<u16>,
    /// The monitor asked us to stop; `go` idles until `resume`.
    pub(super) halted: bool,
    //#endregion
    #[cfg(feature = "profiling")]
    profile: Option<Box<Profile>>,
}

#[cfg(feature = "profiling")]
pub struct Profile {
    /// Executions per PC value.
    pub pc_counts: Vec<u32>,
    /// Cycles attributed to subroutines by walking the return stack.
    pub cumulative: Vec<u32>,
    pub(super) pending_cycles: u32,
}

impl Cpu6502 {
    pub fn new(flavor: CpuFlavor) -> Cpu6502 {
        Cpu6502 {
            regs: POWERON_CPU_STATE,
            flavor,
            operand: 0,
            ea: 0,
            cur_instr: 0xea,
            step_idx: 0,
            next_step: Step::one(MicroOp::Decode),
            nmi: false,
            irq_mask: 0,
            irq_pending: false,
            isync: false,
            slots: SlotMap::new(),
            cur_cycle: 0,
            cycle_counter: 0,
            // must be at least 103 for Encounter
            wsync_position: 105,
            tables: [Vec::new(), Vec::new()],
            watch_enabled: false,
            breakpoints: [FREE_BREAKPOINT; NUM_BREAKPOINTS],
            watchpoints: [FREE_WATCHPOINT; NUM_WATCHPOINTS],
            enable_break: false,
            enable_trace: false,
            enable_stack_trace: false,
            trace_s: 0xff,
            hit_watch: None,
            prev_pc: 0,
            break_resume: None,
            halted: false,
            #[cfg(feature = "profiling")]
            profile: None,
        }
    }

    /// Rebuild both dispatch tables and reset into the RESET sequence.
    pub fn cold_start(&mut self) {
        self.tables = [
            table::build_instructions(self.flavor, BusTap::Plain),
            table::build_instructions(self.flavor, BusTap::Watched),
        ];
        self.warm_start();
    }

    /// Reset registers and latch the reset micro-program, keeping the
    /// dispatch tables.
    pub fn warm_start(&mut self) {
        self.regs = POWERON_CPU_STATE;
        self.irq_mask = 0;
        self.nmi = false;
        self.irq_pending = false;
        self.isync = false;
        self.halted = false;
        self.hit_watch = None;
        self.break_resume = None;
        self.operand = 0;
        self.ea = 0;
        self.cycle_counter = 0;
        self.slots.halt_start = CLOCKS_PER_LINE;
        // a warm start before the first cold start has no tables yet; the
        // cold start will come back through here
        if !self.tables[0].is_empty() {
            self.install(OP_RESET);
        }
        self.hbi();
    }

    pub(super) fn active_table(&self) -> &[ExecutionSequence] {
        &self.tables[self.watch_enabled as usize]
    }

    /// Published cycle count of an opcode's sequence; test support.
    pub fn sequence_cycles(&self, opcode: usize) -> usize {
        self.active_table()[opcode].cycles()
    }

    /// Aim the pipeline at the start of a sequence.
    pub(super) fn install(&mut self, instr: usize) {
        let first = self.active_table()[instr].steps[0];
        self.cur_instr = instr;
        self.next_step = first;
        self.step_idx = 1;
    }

    pub(super) fn fetch_step(&self, idx: usize) -> Step {
        let seq = &self.active_table()[self.cur_instr];
        if idx < seq.steps.len() {
            seq.steps[idx]
        } else {
            Step::NONE
        }
    }

    /// Insert an extra cycle in front of whatever would have run next.
    pub(super) fn insert(&mut self, op: MicroOp) {
        self.next_step = Step::one(op);
        self.step_idx = self.step_idx.wrapping_sub(1);
    }

    /// Re-arm the decoder so the boundary is retried on the next cycle.
    pub(super) fn rearm_decode(&mut self) {
        self.next_step = Step::one(MicroOp::Decode);
        self.step_idx = self.step_idx.wrapping_sub(1);
    }

    //#region interrupts

    /// Raise the NMI edge; serviced at the next instruction boundary.
    pub fn generate_nmi(&mut self) {
        self.nmi = true;
    }

    /// Pull one of the device IRQ lines low.
    pub fn set_irq(&mut self, bit: u8) {
        self.irq_mask |= bit;
    }

    /// Release a device IRQ line.
    pub fn release_irq(&mut self, bit: u8) {
        self.irq_mask &= !bit;
    }

    pub fn irq_pending(&self) -> bool {
        self.irq_pending
    }

    //#endregion

    //#region DMA interface, delegated to the slot map

    pub fn steal_cycles(&mut self, slot: &DmaSlot) {
        self.slots.steal(slot);
    }

    pub fn steal_mem_cycles(&mut self, slot: &DmaSlot) {
        self.slots.steal_mem(slot);
    }

    pub fn is_busy(&self, cycle: usize) -> bool {
        self.slots.is_busy(cycle)
    }

    /// The CPU wrote $D40A: freeze until the WSYNC release slot.
    pub fn wsync_stop(&mut self) {
        let cur = self.cur_cycle;
        self.slots.wsync_stop(cur, self.wsync_position);
    }

    /// New scan line: rewind the horizontal position and the slot map.
    pub fn hbi(&mut self) {
        self.cur_cycle = 0;
        self.slots.hbi(self.wsync_position);
    }

    /// Current horizontal position in cycles since the line start.
    pub fn current_x_pos(&self) -> usize {
        self.cur_cycle
    }

    //#endregion

    //#region breakpoints and watchpoints

    /// Install a breakpoint, returning its slot id, or `None` if all 16
    /// slots are taken.
    pub fn set_breakpoint(&mut self, pc: u16) -> Option<usize> {
        for (i, bp) in self.breakpoints.iter_mut().enumerate() {
            if bp.free {
                *bp = BreakPoint {
                    free: false,
                    enabled: true,
                    pc,
                };
                self.enable_break = true;
                return Some(i);
            }
        }
        None
    }

    pub fn clear_breakpoint(&mut self, id: usize) {
        self.breakpoints[id] = FREE_BREAKPOINT;
        self.recompute_break_enable();
    }

    pub fn enable_breakpoint(&mut self, id: usize) {
        if !self.breakpoints[id].free {
            self.breakpoints[id].enabled = true;
        }
    }

    pub fn disable_breakpoint(&mut self, id: usize) {
        if !self.breakpoints[id].free {
            self.breakpoints[id].enabled = false;
        }
    }

    pub fn if_breakpoint(&self, pc: u16) -> bool {
        self.breakpoints
            .iter()
            .any(|bp| bp.enabled && !bp.free && bp.pc == pc)
    }

    pub(super) fn find_breakpoint(&self, pc: u16) -> Option<usize> {
        self.breakpoints
            .iter()
            .position(|bp| bp.enabled && !bp.free && bp.pc == pc)
    }

    pub fn set_watchpoint(&mut self, addr: u16) -> Option<usize> {
        for (i, wp) in self.watchpoints.iter_mut().enumerate() {
            if wp.free {
                *wp = WatchPoint {
                    free: false,
                    enabled: true,
                    addr,
                };
                return Some(i);
            }
        }
        None
    }

    pub fn clear_watchpoint(&mut self, id: usize) {
        self.watchpoints[id] = FREE_WATCHPOINT;
    }

    /// Switch to the instrumented dispatch table. Only ever called at an
    /// instruction boundary; the pipeline is re-aimed through the NOP
    /// sequence of the new table, which leaves the registers alone.
    pub fn enable_watch_points(&mut self) {
        if !self.watch_enabled {
            self.watch_enabled = true;
            self.install(0xea);
        }
        self.enable_break = true;
    }

    pub fn disable_watch_points(&mut self) {
        if self.watch_enabled {
            self.watch_enabled = false;
            self.install(0xea);
        }
        self.recompute_break_enable();
    }

    fn recompute_break_enable(&mut self) {
        self.enable_break = self.enable_trace
            || self.enable_stack_trace
            || self.watch_enabled
            || self.breakpoints.iter().any(|bp| !bp.free);
    }

    pub fn enable_trace(&mut self) {
        self.enable_trace = true;
        self.enable_break = true;
    }

    pub fn disable_trace(&mut self) {
        self.enable_trace = false;
        self.recompute_break_enable();
    }

    /// Trace as soon as the stack unwinds back to the current frame.
    pub fn enable_stack_trace(&mut self) {
        self.enable_stack_trace = true;
        self.enable_break = true;
        self.trace_s = self.regs.s;
    }

    pub fn disable_stack_trace(&mut self) {
        self.enable_stack_trace = false;
        self.recompute_break_enable();
    }

    pub fn halted(&self) -> bool {
        self.halted
    }

    /// Park the CPU until the host resumes it; the clock keeps running.
    pub fn halt(&mut self) {
        self.halted = true;
    }

    /// Let a monitor-stopped CPU run again.
    pub fn resume(&mut self) {
        self.halted = false;
    }

    //#endregion

    //#region profiling

    #[cfg(feature = "profiling")]
    pub fn start_profiling(&mut self) {
        self.profile = Some(Box::new(Profile {
            pc_counts: vec![0; 1 << 16],
            cumulative: vec![0; 1 << 16],
            pending_cycles: 0,
        }));
    }

    #[cfg(feature = "profiling")]
    pub fn stop_profiling(&mut self) -> Option<Box<Profile>> {
        self.profile.take()
    }

    //#endregion

    pub fn to_snapshot(&self) -> CpuSnapshot {
        CpuSnapshot {
            a: self.regs.a,
            x: self.regs.x,
            y: self.regs.y,
            p: self.regs.p,
            s: self.regs.s,
            pc: self.regs.pc,
        }
    }

    pub fn load_snapshot(&mut self, sn: &CpuSnapshot) {
        self.regs = CpuState {
            a: sn.a,
            x: sn.x,
            y: sn.y,
            p: sn.p,
            s: sn.s,
            pc: sn.pc,
        };
    }
}

/// Advance the machine by one CPU clock. A blocked slot burns the cycle
/// without executing anything.
pub fn step<T: WithCpu + Motherboard>(mb: &mut T) {
    let free = {
        let cpu = mb.cpu();
        cpu.slots.at(cpu.cur_cycle) == 0
    };
    if free {
        let unit = {
            let cpu = mb.cpu_mut();
            let unit = cpu.next_step;
            cpu.next_step = cpu.fetch_step(cpu.step_idx);
            cpu.step_idx += 1;
            unit
        };
        super::units::execute_step(mb, unit);
    }
    let cpu = mb.cpu_mut();
    cpu.cur_cycle += 1;
    cpu.cycle_counter += 1;
    #[cfg(feature = "profiling")]
    if let Some(profile) = cpu.profile.as_mut() {
        profile.pending_cycles = profile.pending_cycles.saturating_add(1);
    }
}

/// Advance the CPU by at most `cycles` clocks. A monitor-halted CPU keeps
/// the clock ticking so the display timing stays intact, it just does not
/// execute.
pub fn go<T: WithCpu + Motherboard>(mb: &mut T, cycles: usize) {
    for _ in 0..cycles {
        if mb.cpu().halted {
            let cpu = mb.cpu_mut();
            cpu.cur_cycle += 1;
            cpu.cycle_counter += 1;
        } else {
            step(mb);
        }
    }
}

/// Run to the next instruction boundary. Required before snapshots and
/// before entering the monitor; idempotent once there.
pub fn sync<T: WithCpu + Motherboard>(mb: &mut T) {
    {
        let cpu = mb.cpu_mut();
        cpu.isync = true;
        // rewind to the line start so the run below cannot fall off the
        // slot map
        cpu.hbi();
        cpu.halted = false;
    }
    while mb.cpu().isync {
        if mb.cpu().cur_cycle >= CLOCKS_PER_LINE {
            // a carried WSYNC halt can eat the whole first line
            mb.cpu_mut().hbi();
        }
        step(mb);
    }
    mb.cpu_mut().hbi();
}

/// The instruction boundary. Everything that may divert the instruction
/// stream happens here, in this order: sync, monitor traps, NMI, delayed
/// IRQ, and finally the plain opcode fetch.
pub(super) fn decode_instruction<T: WithCpu + Motherboard>(mb: &mut T) {
    if mb.cpu().isync {
        let cpu = mb.cpu_mut();
        cpu.isync = false;
        cpu.rearm_decode();
        return;
    }
    if mb.cpu().enable_break {
        let pc = mb.cpu().regs.pc;
        let resumed_from = mb.cpu_mut().break_resume.take();
        if resumed_from != Some(pc) {
            if let Some(id) = mb.cpu().find_breakpoint(pc) {
                let cpu = mb.cpu_mut();
                cpu.break_resume = Some(pc);
                cpu.halted = true;
                cpu.rearm_decode();
                mb.monitor_signal(MonitorEvent::BreakPoint { id, pc });
                return;
            }
        }
        // a watchpoint fires after the instruction that touched it has
        // completed
        if mb.cpu().watch_enabled {
            if let Some((id, addr)) = mb.cpu_mut().hit_watch.take() {
                let prev = mb.cpu().prev_pc;
                let cpu = mb.cpu_mut();
                cpu.halted = true;
                cpu.rearm_decode();
                mb.monitor_signal(MonitorEvent::WatchPoint { id, addr, pc: prev });
                return;
            }
            mb.cpu_mut().prev_pc = pc;
        }
        let trace = {
            let cpu = mb.cpu();
            if cpu.enable_stack_trace {
                cpu.regs.s >= cpu.trace_s
            } else {
                cpu.enable_trace
            }
        };
        if trace {
            let cpu = mb.cpu_mut();
            cpu.halted = true;
            cpu.rearm_decode();
            mb.monitor_signal(MonitorEvent::Trace { pc });
            return;
        }
    }
    if mb.cpu().nmi {
        dispatch_interrupt(mb, OP_NMI);
        return;
    }
    if mb.cpu().irq_pending {
        mb.cpu_mut().irq_pending = false;
        dispatch_interrupt(mb, OP_IRQ);
        return;
    }
    if mb.cpu().irq_mask != 0 && mb.cpu().regs.p & I_MASK == 0 {
        // the silicon delays the IRQ by one more instruction
        mb.cpu_mut().irq_pending = true;
    }
    #[cfg(feature = "profiling")]
    profile_tick(mb);
    let pc = mb.cpu().regs.pc;
    let opcode = mb.read(pc);
    let cpu = mb.cpu_mut();
    cpu.regs.pc = pc.wrapping_add(1);
    cpu.install(opcode as usize);
}

/// Replace the decode cycle with the first cycle of an interrupt
/// micro-program.
fn dispatch_interrupt<T: WithCpu + Motherboard>(mb: &mut T, slot: usize) {
    let first = {
        let cpu = mb.cpu_mut();
        let seq = &cpu.active_table()[slot];
        let first = seq.steps[0];
        let second = seq.steps[1];
        cpu.cur_instr = slot;
        cpu.next_step = second;
        cpu.step_idx = 2;
        cpu.operand = 0;
        first
    };
    super::units::execute_step(mb, first);
}

#[cfg(feature = "profiling")]
fn profile_tick<T: WithCpu + Motherboard>(mb: &mut T) {
    let pc = mb.cpu().regs.pc;
    let pending = match mb.cpu_mut().profile.as_mut() {
        Some(profile) => {
            let idx = pc as usize;
            profile.pc_counts[idx] = profile.pc_counts[idx].saturating_add(1);
            let pending = profile.pending_cycles;
            profile.pending_cycles = 0;
            pending
        }
        None => return,
    };
    // attribute the cycles since the last boundary to every subroutine on
    // the return stack
    let s = mb.cpu().regs.s;
    let mut addr = u16::from(s).wrapping_add(0x101);
    let mut targets = Vec::new();
    while addr <= 0x1fe {
        let back = match mb.peek(addr).zip(mb.peek(addr + 1)) {
            Some((lo, hi)) => (u16::from(hi) << 8 | u16::from(lo)).wrapping_sub(2),
            None => break,
        };
        if back < 0xfffa && !mb.is_io_space(back) && mb.peek(back) == Some(0x20) {
            if let Some((lo, hi)) = mb.peek(back + 1).zip(mb.peek(back + 2)) {
                targets.push(u16::from(hi) << 8 | u16::from(lo));
                addr += 2;
                continue;
            }
        }
        addr += 1;
    }
    if let Some(profile) = mb.cpu_mut().profile.as_mut() {
        profile.cumulative[0xffff] = profile.cumulative[0xffff].saturating_add(pending);
        for target in targets {
            profile.cumulative[target as usize] =
                profile.cumulative[target as usize].saturating_add(pending);
        }
    }
}
