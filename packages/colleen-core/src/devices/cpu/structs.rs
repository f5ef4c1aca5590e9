use serde::{Deserialize, Serialize};

// P register bits. The micro-ops juggle the status register as a plain
// byte, these masks are the vocabulary for that.
pub const C_MASK: u8 = 0x01;
pub const Z_MASK: u8 = 0x02;
pub const I_MASK: u8 = 0x04;
pub const D_MASK: u8 = 0x08;
pub const B_MASK: u8 = 0x10;
pub const X_MASK: u8 = 0x20;
pub const V_MASK: u8 = 0x40;
pub const N_MASK: u8 = 0x80;

bitflags! {
    /// The same bits, for code that wants names instead of masks.
    pub struct Status: u8 {
        const CARRY = 0x01;
        const ZERO = 0x02;
        const IRQ_DISABLE = 0x04;
        const DECIMAL = 0x08;
        const BREAK = 0x10;
        const UNUSED = 0x20;
        const OVERFLOW = 0x40;
        const NEGATIVE = 0x80;
    }
}

/// Which silicon we are pretending to be. The WDC part fixes a couple of
/// famous bugs and grows the Rockwell bit instructions; both variants are
/// baked into the dispatch tables at cold start.
#[derive(Debug, Eq, PartialEq, Copy, Clone, Serialize, Deserialize)]
pub enum CpuFlavor {
    Nmos6502,
    Wdc65C02,
}

impl Default for CpuFlavor {
    fn default() -> Self {
        CpuFlavor::Nmos6502
    }
}

/// The architectural registers. Everything else in `Cpu6502` is emulator
/// plumbing; this struct is what a snapshot carries.
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub struct CpuState {
    /// The accumulator
    pub a: u8,
    /// X index register
    pub x: u8,
    /// Y index register
    pub y: u8,
    /// Processor status, N V - B D I Z C
    pub p: u8,
    /// Stack pointer into page one
    pub s: u8,
    /// The program counter
    pub pc: u16,
}

impl CpuState {
    /// The status register with named bits, for display and tests.
    pub fn status(&self) -> Status {
        Status::from_bits_truncate(self.p)
    }
}

pub const POWERON_CPU_STATE: CpuState = CpuState {
    a: 0,
    x: 0,
    y: 0,
    // the unused bit reads back as set
    p: X_MASK,
    s: 0xff,
    pc: 0,
};

/// A PC-match breakpoint slot.
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub struct BreakPoint {
    pub free: bool,
    pub enabled: bool,
    pub pc: u16,
}

pub const FREE_BREAKPOINT: BreakPoint = BreakPoint {
    free: true,
    enabled: false,
    pc: 0,
};

/// An address-match watchpoint slot; read-sensitive.
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub struct WatchPoint {
    pub free: bool,
    pub enabled: bool,
    pub addr: u16,
}

pub const FREE_WATCHPOINT: WatchPoint = WatchPoint {
    free: true,
    enabled: false,
    addr: 0,
};

pub const NUM_BREAKPOINTS: usize = 16;
pub const NUM_WATCHPOINTS: usize = 16;

/// Pseudo-opcode slots behind the 256 real ones.
pub const OP_RESET: usize = 0x100;
pub const OP_NMI: usize = 0x101;
pub const OP_IRQ: usize = 0x102;
pub const NUM_SEQUENCES: usize = 256 + 3;

/// Serialized CPU registers for machine snapshots.
#[derive(Debug, Eq, PartialEq, Copy, Clone, Serialize, Deserialize)]
pub struct CpuSnapshot {
    pub a: u8,
    pub x: u8,
    pub y: u8,
    pub p: u8,
    pub s: u8,
    pub pc: u16,
}
