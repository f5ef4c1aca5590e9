use serde::{Deserialize, Serialize};

use crate::devices::dma::DmaSlot;

//#region Display geometry
/// Data fill-in displacement in half colour clocks, for convenient
/// horizontal scrolling.
pub const FILL_IN_OFFSET: usize = 32;
/// Another displacement to fill in player/missile graphics conveniently.
pub const PLAYER_MISSILE_OFFSET: usize = 64;
/// The visible width of the display in half colour clocks.
pub const DISPLAY_WIDTH: usize = 384;
/// The total modulo from one row to the next.
pub const DISPLAY_MODULO: usize = DISPLAY_WIDTH + FILL_IN_OFFSET + PLAYER_MISSILE_OFFSET;
/// The first generated scan line.
pub const DISPLAY_START: usize = 8;
/// The total height of the generated display in rows.
pub const DISPLAY_HEIGHT: usize = 249;
/// The line the VBI fires on.
pub const VBI_START: usize = 248;
/// Total lines of an NTSC frame.
pub const NTSC_TOTAL: usize = 262;
/// Total lines of a PAL frame.
pub const PAL_TOTAL: usize = 312;
//#endregion

bitflags! {
    /// DMACTL ($D400)
    pub struct DmaCtrl: u8 {
        const PLAYFIELD_WIDTH = 0x03;
        const MISSILE_DMA = 0x04;
        const PLAYER_DMA = 0x08;
        const PM_HIRES = 0x10;
        const DLIST_DMA = 0x20;
    }
}

bitflags! {
    /// NMIEN/NMIST bit assignments.
    pub struct NmiBits: u8 {
        const RESET_KEY = 0x20;
        const VBI = 0x40;
        const DLI = 0x80;
    }
}

bitflags! {
    /// CHACTL ($D401)
    pub struct ChCtrl: u8 {
        const BLANK_INVERSE = 0x01;
        const INVERT_INVERSE = 0x02;
        const UPSIDE_DOWN = 0x04;
    }
}

//#region DMA fetch patterns
const fn strided_fetch(stride: usize) -> [u8; 103] {
    let mut table = [0u8; 103];
    // the first seven slots of every pattern stay clear, the strided
    // allocation starts behind them
    let mut i = 7;
    while i < 103 {
        table[i] = 1;
        i += stride;
    }
    table
}

/// Slot pattern for modes fetching at most 12 bytes per line.
pub static PLAYFIELD_12_FETCH: [u8; 103] = strided_fetch(8);
/// Slot pattern for modes fetching at most 24 bytes per line.
pub static PLAYFIELD_24_FETCH: [u8; 103] = strided_fetch(4);
/// Slot pattern for modes fetching at most 48 bytes per line.
pub static PLAYFIELD_48_FETCH: [u8; 103] = strided_fetch(2);

static ONES: [u8; 9] = [1; 9];

/// Memory refresh: nine accesses, every fourth cycle from slot 25 on.
pub fn mem_refresh_slot() -> DmaSlot<'static> {
    DmaSlot {
        first_cycle: 25,
        num_cycles: 36,
        last_cycle: 107,
        cycle_mask: &PLAYFIELD_24_FETCH[7..],
    }
}

/// The display list instruction fetch.
pub fn dlist_fetch_slot() -> DmaSlot<'static> {
    DmaSlot {
        first_cycle: 0,
        num_cycles: 1,
        last_cycle: 107,
        cycle_mask: &ONES,
    }
}

/// The two-byte operand fetch of jump and load-memory-scan instructions.
pub fn dl_scan_fetch_slot() -> DmaSlot<'static> {
    DmaSlot {
        first_cycle: 5,
        num_cycles: 2,
        last_cycle: 107,
        cycle_mask: &ONES,
    }
}

/// Player graphics fetches.
pub fn player_fetch_slot() -> DmaSlot<'static> {
    DmaSlot {
        first_cycle: 1,
        num_cycles: 4,
        last_cycle: 107,
        cycle_mask: &ONES,
    }
}

/// The missile graphics fetch at the end of the line.
pub fn missile_fetch_slot() -> DmaSlot<'static> {
    DmaSlot {
        first_cycle: 112,
        num_cycles: 1,
        last_cycle: 107,
        cycle_mask: &ONES,
    }
}
//#endregion

/// Descriptor of one of the sixteen mode line types: how many scan lines a
/// mode line spans, how many bytes it fetches per width unit, which slot
/// patterns the fetches use, and whether the output is the hi-res
/// "fiddled" kind GTIA treats specially.
pub struct ModeLine {
    pub scan_lines: i32,
    /// Bytes per line = DMA width unit << this; 0 for blank/jump lines.
    pub dma_shift: u8,
    /// Font cell fetches, required on every scan line of the mode line.
    pub font_cycles: Option<&'static [u8; 103]>,
    /// Screen data fetches, first scan line of the mode line only.
    pub dma_cycles: Option<&'static [u8; 103]>,
    pub fiddling: bool,
}

pub static MODE_LINES: [ModeLine; 16] = [
    // 0: blank lines
    ModeLine {
        scan_lines: 1,
        dma_shift: 0,
        font_cycles: None,
        dma_cycles: None,
        fiddling: false,
    },
    // 1: jumps, displayed as one blank line
    ModeLine {
        scan_lines: 1,
        dma_shift: 0,
        font_cycles: None,
        dma_cycles: None,
        fiddling: false,
    },
    // 2: 40 character text, hi-res
    ModeLine {
        scan_lines: 8,
        dma_shift: 3,
        font_cycles: Some(&PLAYFIELD_48_FETCH),
        dma_cycles: Some(&PLAYFIELD_48_FETCH),
        fiddling: true,
    },
    // 3: 40 character text with lowercase descenders
    ModeLine {
        scan_lines: 10,
        dma_shift: 3,
        font_cycles: Some(&PLAYFIELD_48_FETCH),
        dma_cycles: Some(&PLAYFIELD_48_FETCH),
        fiddling: true,
    },
    // 4: 40 character five colour text
    ModeLine {
        scan_lines: 8,
        dma_shift: 3,
        font_cycles: Some(&PLAYFIELD_48_FETCH),
        dma_cycles: Some(&PLAYFIELD_48_FETCH),
        fiddling: false,
    },
    // 5: same, double height
    ModeLine {
        scan_lines: 16,
        dma_shift: 3,
        font_cycles: Some(&PLAYFIELD_48_FETCH),
        dma_cycles: Some(&PLAYFIELD_48_FETCH),
        fiddling: false,
    },
    // 6: 20 character text
    ModeLine {
        scan_lines: 8,
        dma_shift: 2,
        font_cycles: Some(&PLAYFIELD_24_FETCH),
        dma_cycles: Some(&PLAYFIELD_24_FETCH),
        fiddling: false,
    },
    // 7: 20 character text, double height
    ModeLine {
        scan_lines: 16,
        dma_shift: 2,
        font_cycles: Some(&PLAYFIELD_24_FETCH),
        dma_cycles: Some(&PLAYFIELD_24_FETCH),
        fiddling: false,
    },
    // 8: four colour graphics, 4 colour clocks per pixel
    ModeLine {
        scan_lines: 8,
        dma_shift: 1,
        font_cycles: None,
        dma_cycles: Some(&PLAYFIELD_12_FETCH),
        fiddling: false,
    },
    // 9: two colour graphics, 4 colour clocks per pixel
    ModeLine {
        scan_lines: 4,
        dma_shift: 1,
        font_cycles: None,
        dma_cycles: Some(&PLAYFIELD_12_FETCH),
        fiddling: false,
    },
    // a: four colour graphics, 2 colour clocks per pixel
    ModeLine {
        scan_lines: 4,
        dma_shift: 2,
        font_cycles: None,
        dma_cycles: Some(&PLAYFIELD_24_FETCH),
        fiddling: false,
    },
    // b: two colour graphics, 1 colour clock per pixel
    ModeLine {
        scan_lines: 2,
        dma_shift: 2,
        font_cycles: None,
        dma_cycles: Some(&PLAYFIELD_24_FETCH),
        fiddling: false,
    },
    // c: as b, single scan line
    ModeLine {
        scan_lines: 1,
        dma_shift: 2,
        font_cycles: None,
        dma_cycles: Some(&PLAYFIELD_24_FETCH),
        fiddling: false,
    },
    // d: four colour graphics, 1 colour clock per pixel
    ModeLine {
        scan_lines: 2,
        dma_shift: 3,
        font_cycles: None,
        dma_cycles: Some(&PLAYFIELD_48_FETCH),
        fiddling: false,
    },
    // e: as d, single scan line
    ModeLine {
        scan_lines: 1,
        dma_shift: 3,
        font_cycles: None,
        dma_cycles: Some(&PLAYFIELD_48_FETCH),
        fiddling: false,
    },
    // f: hi-res graphics
    ModeLine {
        scan_lines: 1,
        dma_shift: 3,
        font_cycles: None,
        dma_cycles: Some(&PLAYFIELD_48_FETCH),
        fiddling: true,
    },
];

/// One of the two character generators (40 and 20 column modes keep
/// separate base alignments).
#[derive(Debug, Copy, Clone)]
pub struct CharGenerator {
    pub char_base: u16,
    pub upside_down: bool,
    pub invert_mask: u8,
    pub blank_mask: u8,
}

pub const CHAR_GENERATOR_OFF: CharGenerator = CharGenerator {
    char_base: 0,
    upside_down: false,
    invert_mask: 0,
    blank_mask: 0,
};

/// Serialized ANTIC registers for machine snapshots. Derived state (DMA
/// geometry, character generators) is rebuilt through the register write
/// paths on load.
#[derive(Debug, Eq, PartialEq, Copy, Clone, Serialize, Deserialize)]
pub struct AnticSnapshot {
    pub dlist: u16,
    pub pmbase: u16,
    pub chbase: u16,
    pub chactl: u8,
    pub pfbase: u16,
    pub nmien: u8,
    pub nmist: u8,
    pub dmactl: u8,
    pub hscrol: u8,
    pub vscrol: u8,
}
