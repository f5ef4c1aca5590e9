//! The machine: chip ownership, the bus protocol, and the frame loop.
//!
//! The `Atari` struct owns every chip and the address space and implements
//! the `Motherboard` trait they all talk through; there is no other wiring
//! between chips. One `run_display_list` call produces one frame, the
//! emulation loop adds the host pacing around it.

use std::thread;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use super::antic::{self, structs::AnticSnapshot, Antic, WithAntic};
use super::bus::{AdrSpace, IoRegion, MonitorEvent, Motherboard, PageKind, View};
use super::cpu::{self, structs::CpuSnapshot, Cpu6502, WithCpu};
use super::gtia::{Gtia, WithGtia};
use super::patch::{Patch, PatchBay};
use super::pia::Pia;
use super::pokey::Pokey;
use crate::config::{ConfigError, MachineConfig, VideoSystem};

/// Cooperative machine signals; the frame loop consumes them between
/// frames.
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum Signal {
    Quit,
    ColdReset,
    WarmReset,
    Monitor,
    Menu,
}

#[derive(Debug, Default, Copy, Clone)]
struct Signals {
    quit: bool,
    cold: bool,
    warm: bool,
    monitor: bool,
    menu: bool,
    pause: bool,
}

/// Everything a snapshot carries for the core; the RAM image is saved
/// verbatim by the surrounding code.
#[derive(Debug, Eq, PartialEq, Copy, Clone, Serialize, Deserialize)]
pub struct MachineSnapshot {
    pub cpu: CpuSnapshot,
    pub antic: AnticSnapshot,
}

pub struct Atari {
    pub cpu: Cpu6502,
    pub antic: Antic,
    pub gtia: Gtia,
    pub pokey: Pokey,
    pub pia: Pia,
    pub mem: AdrSpace,
    patches: PatchBay,
    pub config: MachineConfig,
    signals: Signals,
    /// Monitor events recorded since the last drain; the out-of-scope
    /// monitor UI reads these.
    pub monitor_log: Vec<MonitorEvent>,
}

impl Atari {
    pub fn new(config: MachineConfig) -> Result<Atari, ConfigError> {
        config.validate()?;
        let mut mem = AdrSpace::new();
        // The base memory map of the machine. RAM below the hardware
        // window, OS ROM above it; the unused register pages float high.
        mem.map_shared(0x0000, 0xc000, PageKind::Ram)
            .expect("aligned");
        mem.map_shared(0xc000, 0x1000, PageKind::Rom)
            .expect("aligned");
        mem.map(View::Cpu, 0xd000, 0x100, PageKind::Io(IoRegion::Gtia))
            .expect("aligned");
        mem.map(View::Cpu, 0xd100, 0x100, PageKind::Rom).expect("aligned");
        mem.map(View::Cpu, 0xd200, 0x100, PageKind::Io(IoRegion::Pokey))
            .expect("aligned");
        mem.map(View::Cpu, 0xd300, 0x100, PageKind::Io(IoRegion::Pia))
            .expect("aligned");
        mem.map(View::Cpu, 0xd400, 0x100, PageKind::Io(IoRegion::Antic))
            .expect("aligned");
        mem.map(View::Cpu, 0xd500, 0x300, PageKind::Rom).expect("aligned");
        // ANTIC's own view never sees registers; its fetches from the
        // hardware window read the backing store without side effects.
        mem.map(View::Antic, 0xd000, 0x800, PageKind::Rom)
            .expect("aligned");
        mem.map_shared(0xd800, 0x2800, PageKind::Rom).expect("aligned");
        // unprogrammed ROM floats high
        mem.fill(0xc000, 0x4000, 0xff);

        let mut cpu = Cpu6502::new(config.cpu_flavor);
        cpu.wsync_position = config.wsync_position;
        let mut antic = Antic::new();
        antic.ntsc = config.video == VideoSystem::Ntsc;
        antic.before_dli_cycles = config.before_dli_cycles;
        antic.before_display_clocks = config.before_display_clocks;
        antic.ypos_inc_slot = config.ypos_inc_slot;

        Ok(Atari {
            cpu,
            antic,
            gtia: Gtia::new(),
            pokey: Pokey::new(),
            pia: Pia::new(),
            mem,
            patches: PatchBay::new(),
            config,
            signals: Signals::default(),
            monitor_log: Vec::new(),
        })
    }

    /// Full power-on reset: rebuild the CPU dispatch tables, reset every
    /// chip, reinstall the ROM patches.
    pub fn cold_start(&mut self) {
        self.cpu.flavor = self.config.cpu_flavor;
        self.cpu.wsync_position = self.config.wsync_position;
        self.cpu.cold_start();
        self.antic.cold_start();
        self.gtia.cold_start();
        self.pokey.cold_start();
        self.pia.cold_start();
        self.patches.reset_all();
        let mut patches = std::mem::take(&mut self.patches);
        patches.install_all(&mut self.mem);
        self.patches = patches;
    }

    /// Register reset only; wiring and dispatch tables survive.
    pub fn warm_start(&mut self) {
        self.cpu.warm_start();
        self.antic.warm_start();
        self.gtia.warm_start();
        self.pokey.warm_start();
        self.pia.warm_start();
        self.patches.reset_all();
    }

    /// Install a ROM image into the backing store.
    pub fn install_rom(&mut self, base: u16, data: &[u8]) {
        self.mem.load(base, data);
    }

    /// Add a ROM patch; it takes effect at the next cold start.
    pub fn register_patch(&mut self, patch: Box<dyn Patch>) {
        self.patches.register(patch);
    }

    /// Produce exactly one frame.
    pub fn run_display_list(&mut self) {
        antic::run_display_list(self);
    }

    /// Run the CPU to the next instruction boundary.
    pub fn sync_cpu(&mut self) {
        cpu::sync(self);
    }

    /// The console RESET key of the 400/800.
    pub fn reset_key(&mut self) {
        antic::antic::reset_nmi(self);
    }

    //#region signals

    pub fn request(&mut self, signal: Signal) {
        match signal {
            Signal::Quit => self.signals.quit = true,
            Signal::ColdReset => self.signals.cold = true,
            Signal::WarmReset => self.signals.warm = true,
            Signal::Monitor => self.signals.monitor = true,
            Signal::Menu => self.signals.menu = true,
        }
    }

    pub fn set_pause(&mut self, pause: bool) {
        self.signals.pause = pause;
    }

    pub fn quit_requested(&self) -> bool {
        self.signals.quit
    }

    //#endregion

    //#region snapshots

    pub fn save_state(&self) -> MachineSnapshot {
        MachineSnapshot {
            cpu: self.cpu.to_snapshot(),
            antic: self.antic.to_snapshot(),
        }
    }

    pub fn load_state(&mut self, sn: &MachineSnapshot) {
        self.cpu.load_snapshot(&sn.cpu);
        self.antic.load_snapshot(&sn.antic);
    }

    //#endregion

    fn bus_noise(&self, addr: u16) -> u8 {
        self.antic.bus_noise[usize::from(addr) % self.antic.bus_noise.len()]
    }

    /// The emulator main loop: one iteration is one frame plus the host
    /// VBI work, paced by the configured refresh rate. The callback runs
    /// once per frame with `true` when the frame deadline was missed and
    /// the host should skip its display push.
    pub fn emulation_loop(&mut self, vbi: &mut dyn FnMut(&mut Atari, bool)) {
        let period = self.config.refresh_delay();
        let max_miss = self.config.max_miss;
        let mut timer = FrameTimer::start(period);
        let mut missed: u32 = 0;
        while !self.signals.quit {
            loop {
                let mut events = false;
                if std::mem::take(&mut self.signals.cold) {
                    self.cold_start();
                    events = true;
                }
                if std::mem::take(&mut self.signals.warm) {
                    self.warm_start();
                    events = true;
                }
                if std::mem::take(&mut self.signals.monitor) {
                    // land on an instruction boundary before the host
                    // pokes at the CPU
                    cpu::sync(self);
                    timer = FrameTimer::start(period);
                    missed = 0;
                    events = true;
                }
                if std::mem::take(&mut self.signals.menu) {
                    cpu::sync(self);
                    timer = FrameTimer::start(period);
                    missed = 0;
                    events = true;
                }
                if !events {
                    break;
                }
            }
            if self.signals.quit {
                break;
            }
            if !self.signals.pause {
                self.run_display_list();
            }
            if !timer.event_is_over() || missed >= max_miss {
                // still on schedule (or forced): full host VBI with the
                // display push
                vbi(self, false);
                timer.wait();
                if missed >= max_miss {
                    log::debug!("re-basing frame timer after {} missed frames", missed);
                    timer = FrameTimer::start(period);
                    missed = 0;
                }
            } else {
                // late; drop the frame but keep input and audio alive
                missed += 1;
                vbi(self, true);
            }
            timer.trigger_next_event();
        }
    }
}

/// The periodic frame timer of the emulation loop.
struct FrameTimer {
    period: Duration,
    deadline: Instant,
}

impl FrameTimer {
    fn start(period: Duration) -> FrameTimer {
        FrameTimer {
            period,
            deadline: Instant::now() + period,
        }
    }

    fn event_is_over(&self) -> bool {
        Instant::now() >= self.deadline
    }

    fn wait(&self) {
        let now = Instant::now();
        if self.deadline > now {
            thread::sleep(self.deadline - now);
        }
    }

    fn trigger_next_event(&mut self) {
        self.deadline += self.period;
    }
}

impl Motherboard for Atari {
    fn read(&mut self, addr: u16) -> u8 {
        match self.mem.kind(View::Cpu, addr) {
            PageKind::Io(IoRegion::Gtia) => self.gtia.read(addr),
            PageKind::Io(IoRegion::Pokey) => self.pokey.read(addr),
            PageKind::Io(IoRegion::Pia) => self.pia.read(addr),
            PageKind::Io(IoRegion::Antic) => antic::antic::read_register(self, addr),
            _ => match self.mem.read_byte(View::Cpu, addr) {
                Ok(data) => data,
                Err(err) => {
                    debug_assert!(false, "{}", err);
                    log::warn!("{}", err);
                    self.bus_noise(addr)
                }
            },
        }
    }

    fn write(&mut self, addr: u16, data: u8) {
        match self.mem.kind(View::Cpu, addr) {
            PageKind::Io(IoRegion::Gtia) => self.gtia.write(addr, data),
            PageKind::Io(IoRegion::Pokey) => self.pokey.write(addr, data),
            PageKind::Io(IoRegion::Pia) => self.pia.write(addr, data),
            PageKind::Io(IoRegion::Antic) => antic::antic::write_register(self, addr, data),
            _ => {
                if let Err(err) = self.mem.write_byte(View::Cpu, addr, data) {
                    debug_assert!(false, "{}", err);
                    log::warn!("{}", err);
                }
            }
        }
    }

    fn patch(&mut self, addr: u16, data: u8) {
        self.mem.patch_byte(addr, data);
    }

    fn peek(&self, addr: u16) -> Option<u8> {
        match self.mem.kind(View::Cpu, addr) {
            PageKind::Io(_) | PageKind::Unmapped => None,
            _ => self.mem.read_byte(View::Cpu, addr).ok(),
        }
    }

    fn is_io_space(&self, addr: u16) -> bool {
        self.mem.is_io_space(View::Cpu, addr)
    }

    fn antic_read(&mut self, addr: u16) -> u8 {
        match self.mem.read_byte(View::Antic, addr) {
            Ok(data) => data,
            Err(_) => self.bus_noise(addr),
        }
    }

    fn monitor_signal(&mut self, ev: MonitorEvent) {
        log::debug!("monitor: {:?}", ev);
        self.monitor_log.push(ev);
        self.signals.monitor = true;
    }

    fn escape(&mut self, code: u8) {
        let mut patches = std::mem::take(&mut self.patches);
        let handled = patches.dispatch(self, code);
        self.patches = patches;
        if !handled {
            let pc = self.cpu.regs.pc;
            log::warn!("unclaimed escape code {:02x} at {:04x}", code, pc);
            self.cpu.halt();
            self.monitor_signal(MonitorEvent::UnknownEscape { code, pc });
        }
    }

    fn hbi(&mut self) {
        self.cpu.hbi();
        self.antic.hbi();
    }
}

impl WithCpu for Atari {
    fn cpu(&self) -> &Cpu6502 {
        &self.cpu
    }

    fn cpu_mut(&mut self) -> &mut Cpu6502 {
        &mut self.cpu
    }
}

impl WithAntic for Atari {
    fn antic(&self) -> &Antic {
        &self.antic
    }

    fn antic_mut(&mut self) -> &mut Antic {
        &mut self.antic
    }
}

impl WithGtia for Atari {
    fn gtia(&self) -> &Gtia {
        &self.gtia
    }

    fn gtia_mut(&mut self) -> &mut Gtia {
        &mut self.gtia
    }
}
