//! The display list processor.
//!
//! ANTIC is the bus master of this machine: it owns the frame, walks the
//! display list one mode line at a time, books its screen/font/refresh
//! fetches into the CPU's slot map and advances the CPU for whatever is
//! left of each scan line. The per-line output is a buffer of colour
//! register tokens handed to GTIA.
//!
//! The emulation is scan line oriented: screen data is fetched into an
//! internal scan buffer once per mode line, the way the silicon latches
//! it, and the mode generators re-expand that buffer for every scan line.

use super::modes;
use super::structs::*;
use crate::devices::bus::Motherboard;
use crate::devices::cpu::{self, WithCpu};
use crate::devices::dma::{DmaSlot, CLOCKS_PER_LINE};
use crate::devices::gtia::{WithGtia, BACKGROUND};

/// Trait for a device that owns an ANTIC.
pub trait WithAntic {
    fn antic(&self) -> &Antic;
    fn antic_mut(&mut self) -> &mut Antic;
}

pub struct Antic {
    //#region hardware registers
    pub dmactl: u8,
    pub chactl: u8,
    /// The display list program counter. Increments wrap within 1 KiB.
    pub dlist: u16,
    /// DLIST as last written by the CPU.
    pub dlist_shadow: u16,
    /// Address of the instruction currently interpreted.
    pub dlist_cur: u16,
    pub hscrol: u8,
    pub vscrol: u8,
    pub pmbase: u16,
    pub chbase: u16,
    pub nmien: u8,
    pub nmist: u8,
    /// The playfield pointer: a 12 bit counter plus a 4 bit register, so
    /// screen data never crosses a 4 KiB boundary.
    pub pf_base: u16,
    /// Current vertical position.
    pub ypos: usize,
    /// DMACTL as it was at the last horizontal blank.
    pub dmactl_shadow: u8,
    //#endregion

    //#region character generators
    pub char40: CharGenerator,
    pub char20: CharGenerator,
    //#endregion

    //#region DMA geometry, derived from DMACTL bits 0..1
    pub(super) xmin_no_scroll: usize,
    pub(super) xmax_no_scroll: usize,
    pub(super) xmin_scroll: usize,
    pub(super) xmax_scroll: usize,
    pub(super) dma_width_no_scroll: usize,
    pub(super) dma_width_scroll: usize,
    pub(super) first_dma_no_scroll: usize,
    pub(super) last_dma_no_scroll: usize,
    pub(super) first_dma_scroll: usize,
    pub(super) last_dma_scroll: usize,
    /// Single or double resolution player/missile DMA.
    pub pm_hires: bool,
    //#endregion

    //#region scan line state
    /// Screen bytes latched at the start of the mode line.
    pub scan_buffer: [u8; Antic::SCAN_BUFFER_SIZE],
    /// The token output row, `DISPLAY_MODULO` wide.
    pub(super) line_buffer: Vec<u8>,
    /// What the current mode line looks like, kept so a mid-line register
    /// write can re-run the generator over the latched scan buffer.
    pub(super) current_mode: Option<usize>,
    pub(super) fill_in: usize,
    pub(super) width: usize,
    pub(super) hshift: usize,
    pub(super) display_line: i32,
    /// Garbage returned on bus conflict reads.
    pub bus_noise: [u8; 5],
    noise_state: u32,
    //#endregion

    //#region configuration
    pub ntsc: bool,
    /// CPU cycles run before a DLI fires.
    pub before_dli_cycles: usize,
    /// CPU clocks run before display generation of a line.
    pub before_display_clocks: usize,
    /// Horizontal slot at which VCOUNT ticks over.
    pub ypos_inc_slot: usize,
    //#endregion
}

impl Antic {
    pub const SCAN_BUFFER_SIZE: usize = 64;

    pub fn new() -> Antic {
        let mut antic = Antic {
            dmactl: 0,
            chactl: 0,
            dlist: 0,
            dlist_shadow: 0,
            dlist_cur: 0,
            hscrol: 0,
            vscrol: 0,
            pmbase: 0,
            chbase: 0,
            nmien: 0,
            nmist: 0,
            pf_base: 0,
            ypos: 0,
            dmactl_shadow: 0,
            char40: CHAR_GENERATOR_OFF,
            char20: CHAR_GENERATOR_OFF,
            xmin_no_scroll: 0,
            xmax_no_scroll: 0,
            xmin_scroll: 0,
            xmax_scroll: 0,
            dma_width_no_scroll: 0,
            dma_width_scroll: 0,
            first_dma_no_scroll: 0,
            last_dma_no_scroll: 0,
            first_dma_scroll: 0,
            last_dma_scroll: 0,
            pm_hires: false,
            scan_buffer: [0; Antic::SCAN_BUFFER_SIZE],
            line_buffer: vec![BACKGROUND; DISPLAY_MODULO],
            current_mode: None,
            fill_in: 0,
            width: 0,
            hshift: 0,
            display_line: 0,
            bus_noise: [0; 5],
            noise_state: 0x2545_f491,
            ntsc: false,
            // between 6 and 12 for Atlantis and Decathlon, 12 makes Robot
            // look correct
            before_dli_cycles: 12,
            before_display_clocks: 16,
            ypos_inc_slot: 108,
        };
        antic.warm_start();
        antic
    }

    pub fn cold_start(&mut self) {
        self.warm_start();
    }

    pub fn warm_start(&mut self) {
        self.set_dmactl(0x00);
        self.set_chactl(0x00);
        self.set_chbase(0x00);
        self.set_pmbase(0x00);
        self.roll_noise();
        self.dlist = 0;
        self.dlist_shadow = 0;
        self.dlist_cur = 0;
        self.pf_base = 0;
        self.ypos = 0;
        self.nmien = 0;
        self.nmist = 0;
        self.hscrol = 0;
        self.vscrol = 0;
        self.dmactl_shadow = 0;
        self.current_mode = None;
        self.fill_in = 0;
        self.width = 0;
        self.display_line = 0;
        self.scan_buffer = [0; Antic::SCAN_BUFFER_SIZE];
    }

    /// End of scan line: latch DMACTL for the player/missile DMA of the
    /// next line.
    pub fn hbi(&mut self) {
        self.dmactl_shadow = self.dmactl;
    }

    fn roll_noise(&mut self) {
        for b in self.bus_noise.iter_mut() {
            // xorshift is plenty for bus garbage and keeps runs
            // reproducible
            self.noise_state ^= self.noise_state << 13;
            self.noise_state ^= self.noise_state >> 17;
            self.noise_state ^= self.noise_state << 5;
            *b = (self.noise_state >> 8) as u8;
        }
    }

    /// Advance the display list counter without crossing a 1 KiB border.
    fn inc_dlist(&mut self, by: u16) {
        self.dlist = (self.dlist.wrapping_add(by) & 0x03ff) | (self.dlist & 0xfc00);
    }

    pub fn set_dmactl(&mut self, val: u8) {
        self.dmactl = val;
        match val & 0x03 {
            0x00 => {
                // no playfield DMA at all
                self.xmin_no_scroll = 0;
                self.xmax_no_scroll = 0;
                self.xmin_scroll = 0;
                self.xmax_scroll = 0;
                self.dma_width_no_scroll = 0;
                self.dma_width_scroll = 0;
                self.first_dma_no_scroll = 0;
                self.last_dma_no_scroll = 0;
                self.first_dma_scroll = 0;
                self.last_dma_scroll = 0;
            }
            0x01 => {
                // narrow playfield
                self.xmin_no_scroll = 64;
                self.xmax_no_scroll = 320;
                self.xmin_scroll = 32;
                self.xmax_scroll = 352;
                self.dma_width_no_scroll = 4;
                self.dma_width_scroll = 5;
                self.first_dma_no_scroll = 28;
                self.last_dma_no_scroll = 92;
                self.first_dma_scroll = 20;
                self.last_dma_scroll = 100;
            }
            0x02 => {
                // medium playfield
                self.xmin_no_scroll = 32;
                self.xmax_no_scroll = 352;
                self.xmin_scroll = 0;
                self.xmax_scroll = 384;
                self.dma_width_no_scroll = 5;
                self.dma_width_scroll = 6;
                self.first_dma_no_scroll = 20;
                self.last_dma_no_scroll = 100;
                self.first_dma_scroll = 12;
                self.last_dma_scroll = 106;
            }
            _ => {
                // wide playfield
                self.xmin_no_scroll = 0;
                self.xmax_no_scroll = 384;
                self.xmin_scroll = 0;
                self.xmax_scroll = 384;
                self.dma_width_no_scroll = 6;
                self.dma_width_scroll = 6;
                self.first_dma_no_scroll = 12;
                self.last_dma_no_scroll = 106;
                self.first_dma_scroll = 12;
                self.last_dma_scroll = 106;
            }
        }
        self.pm_hires = val & 0x10 != 0;
    }

    pub fn set_chactl(&mut self, val: u8) {
        self.chactl = val;
        let flags = ChCtrl::from_bits_truncate(val);
        let upside_down = flags.contains(ChCtrl::UPSIDE_DOWN);
        let invert_mask = if flags.contains(ChCtrl::INVERT_INVERSE) {
            0x80
        } else {
            0x00
        };
        let blank_mask = if flags.contains(ChCtrl::BLANK_INVERSE) {
            0x80
        } else {
            0x00
        };
        for gen in [&mut self.char20, &mut self.char40] {
            gen.upside_down = upside_down;
            gen.invert_mask = invert_mask;
            gen.blank_mask = blank_mask;
        }
    }

    pub fn set_chbase(&mut self, val: u8) {
        self.chbase = u16::from(val) << 8;
        // mind the alignment restrictions of the two generators
        self.char20.char_base = self.chbase & 0xfe00;
        self.char40.char_base = self.chbase & 0xfc00;
    }

    pub fn set_pmbase(&mut self, val: u8) {
        self.pmbase = u16::from(val) << 8;
    }

    /// Whether display list DMA is switched on at all.
    pub fn dlist_dma_enabled(&self) -> bool {
        DmaCtrl::from_bits_truncate(self.dmactl).contains(DmaCtrl::DLIST_DMA)
    }

    pub fn to_snapshot(&self) -> AnticSnapshot {
        AnticSnapshot {
            dlist: self.dlist,
            pmbase: self.pmbase,
            chbase: self.chbase,
            chactl: self.chactl,
            pfbase: self.pf_base,
            nmien: self.nmien,
            nmist: self.nmist,
            dmactl: self.dmactl,
            hscrol: self.hscrol,
            vscrol: self.vscrol,
        }
    }

    /// Restore registers from a snapshot, rebuilding the derived state
    /// through the regular write paths.
    pub fn load_snapshot(&mut self, sn: &AnticSnapshot) {
        self.set_pmbase((sn.pmbase >> 8) as u8);
        self.set_chbase((sn.chbase >> 8) as u8);
        self.set_chactl(sn.chactl);
        self.set_dmactl(sn.dmactl);
        self.dlist = sn.dlist;
        self.dlist_shadow = sn.dlist;
        self.pf_base = sn.pfbase;
        self.nmien = sn.nmien;
        self.nmist = sn.nmist;
        self.hscrol = sn.hscrol & 0x0f;
        self.vscrol = sn.vscrol & 0x0f;
    }
}

impl Default for Antic {
    fn default() -> Self {
        Antic::new()
    }
}

/// Trigger the console-key NMI of the 400/800. It cannot be disabled.
pub fn reset_nmi<T: WithAntic + WithCpu>(mb: &mut T) {
    mb.antic_mut().nmist |= NmiBits::RESET_KEY.bits();
    mb.cpu_mut().generate_nmi();
}

/// Read an ANTIC register. There are not many readable ones.
pub fn read_register<T: WithAntic + WithCpu>(mb: &mut T, addr: u16) -> u8 {
    match addr & 0x0f {
        // VCOUNT; the vertical position ticks over at a fixed slot
        0x0b => {
            let antic = mb.antic();
            let mut ypos = antic.ypos;
            if mb.cpu().current_x_pos() >= antic.ypos_inc_slot {
                ypos += 1;
            }
            (ypos >> 1) as u8
        }
        // NMIST
        0x0f => mb.antic().nmist | 0x1f,
        _ => 0xff,
    }
}

/// Write an ANTIC register. WSYNC lands here too and stalls the CPU.
pub fn write_register<T: WithAntic + WithCpu + Motherboard>(mb: &mut T, addr: u16, val: u8) {
    match addr & 0x0f {
        0x00 => mb.antic_mut().set_dmactl(val),
        0x01 => {
            mb.antic_mut().set_chactl(val);
            regenerate_if_early(mb);
        }
        0x02 => {
            let antic = mb.antic_mut();
            antic.dlist = (antic.dlist & 0xff00) | u16::from(val);
            antic.dlist_shadow = antic.dlist;
        }
        0x03 => {
            let antic = mb.antic_mut();
            antic.dlist = (antic.dlist & 0x00ff) | (u16::from(val) << 8);
            antic.dlist_shadow = antic.dlist;
        }
        0x04 => mb.antic_mut().hscrol = val & 0x0f,
        0x05 => mb.antic_mut().vscrol = val & 0x0f,
        0x07 => mb.antic_mut().set_pmbase(val),
        0x09 => {
            mb.antic_mut().set_chbase(val);
            regenerate_if_early(mb);
        }
        0x0a => mb.cpu_mut().wsync_stop(),
        // the low NMIEN bits are forced on
        0x0e => mb.antic_mut().nmien = val | 0x1f,
        // NMIRES clears all pending NMI status
        0x0f => mb.antic_mut().nmist = 0x1f,
        _ => {}
    }
}

/// A CHBASE/CHACTL write that lands before the character DMA of the
/// current line re-runs the generator; the scan buffer is latched per mode
/// line, so this is safe.
fn regenerate_if_early<T: WithAntic + WithCpu + Motherboard>(mb: &mut T) {
    if mb.cpu().current_x_pos() >= 24 {
        return;
    }
    let is_char_mode = mb
        .antic()
        .current_mode
        .map_or(false, |m| MODE_LINES[m].font_cycles.is_some());
    if is_char_mode && mb.antic().width > 0 {
        regenerate_modeline(mb);
    }
}

/// Re-run the current generator over the latched scan buffer.
pub fn regenerate_modeline<T: WithAntic + Motherboard>(mb: &mut T) {
    let (mode, fill, width, shift, displayline) = match mb.antic().current_mode {
        Some(mode) => {
            let antic = mb.antic();
            (
                mode,
                antic.fill_in,
                antic.width,
                antic.hshift,
                antic.display_line,
            )
        }
        None => return,
    };
    if width == 0 {
        return;
    }
    let (xmin, xmax) = {
        let antic = mb.antic();
        (
            (antic.xmin_no_scroll + shift).max(FILL_IN_OFFSET),
            antic.xmax_no_scroll + shift,
        )
    };
    let mut line = std::mem::take(&mut mb.antic_mut().line_buffer);
    modes::generate(mb, mode, &mut line[fill..], width, displayline);
    for px in line[..xmin].iter_mut() {
        *px = BACKGROUND;
    }
    for px in line[xmax..].iter_mut() {
        *px = BACKGROUND;
    }
    mb.antic_mut().line_buffer = line;
}

/// Generate one scan line: book the P/M DMA, advance the CPU to the DLI
/// point, fire VBI/DLI, render, advance the CPU over the rest of the line
/// and hand the tokens to GTIA.
pub(super) fn scanline<T: WithAntic + WithCpu + WithGtia + Motherboard>(
    mb: &mut T,
    nmi: bool,
    mode: usize,
    fill_at: usize,
    width: usize,
    xscroll: bool,
    displayline: i32,
    first: i32,
) {
    let dma = mb.antic().dmactl;
    // Player/missile DMA. The cycle count does not depend on the P/M
    // resolution; missile DMA is for free once player DMA is on.
    match dma & 0x0c {
        0x08 | 0x0c => {
            mb.cpu_mut().steal_cycles(&player_fetch_slot());
            mb.cpu_mut().steal_cycles(&missile_fetch_slot());
        }
        0x04 => {
            mb.cpu_mut().steal_cycles(&missile_fetch_slot());
        }
        _ => {}
    }
    // Advance the CPU a couple of cycles before the DLI triggers
    // (Jetboot Jack depends on this window).
    let before_dli = mb.antic().before_dli_cycles;
    cpu::go(mb, before_dli);
    // The CPU may have changed the display width under our feet. If it
    // shrank, fix up the playfield pointer for the fetches ANTIC no longer
    // performs at the end of the line.
    if displayline == first {
        let antic = mb.antic_mut();
        if (dma ^ antic.dmactl) & 0x03 != 0 {
            let delta = (i32::from(antic.dmactl & 0x03) - i32::from(dma & 0x03))
                * ((1i32 << MODE_LINES[mode].dma_shift) >> 1);
            antic.pf_base = (antic.pf_base & 0xf000)
                | (antic.pf_base.wrapping_add(delta as u16) & 0x0fff);
        }
    }
    // shift is the displacement between where the data went and where it
    // should have gone; GTIA corrects for it on handoff
    let (shift, xmin, xmax) = {
        let antic = mb.antic();
        let shift = if xscroll {
            FILL_IN_OFFSET - (usize::from(antic.hscrol) << 1)
        } else {
            FILL_IN_OFFSET
        };
        (
            shift,
            antic.xmin_no_scroll + shift,
            antic.xmax_no_scroll + shift,
        )
    };
    // VBI on the fixed line, DLI on the last scan of a flagged mode line
    let ypos = mb.antic().ypos;
    if nmi || ypos == VBI_START {
        let antic = mb.antic_mut();
        if ypos == VBI_START {
            antic.nmist = NmiBits::VBI.bits();
        } else {
            antic.nmist = NmiBits::DLI.bits();
        }
        if antic.nmien & antic.nmist & (NmiBits::VBI | NmiBits::DLI).bits() != 0 {
            mb.cpu_mut().generate_nmi();
        }
    }
    // keep what we are doing so a horizontal kernel poking at the
    // character generator can regenerate this very line
    {
        let antic = mb.antic_mut();
        antic.current_mode = Some(mode);
        antic.fill_in = fill_at;
        antic.width = width;
        antic.hshift = shift;
        antic.display_line = displayline;
    }
    let mut line = std::mem::take(&mut mb.antic_mut().line_buffer);
    if width > 0 {
        modes::generate(mb, mode, &mut line[fill_at..], width, displayline);
        // erase whatever got shifted out of the frame
        let xmin = xmin.max(FILL_IN_OFFSET);
        for px in line[..xmin].iter_mut() {
            *px = BACKGROUND;
        }
        for px in line[xmax..].iter_mut() {
            *px = BACKGROUND;
        }
    } else {
        for px in line.iter_mut() {
            *px = BACKGROUND;
        }
    }
    // advance the CPU to the display window, then across the rest of the
    // line
    let xpos = mb.cpu().current_x_pos();
    let before_display = mb.antic().before_display_clocks;
    if before_display > xpos {
        cpu::go(mb, before_display - xpos);
    }
    let xpos = mb.cpu().current_x_pos();
    if CLOCKS_PER_LINE > xpos {
        cpu::go(mb, CLOCKS_PER_LINE - xpos);
    }
    // hand the line over; GTIA mixes in the player/missile graphics
    let row = mb.antic().ypos;
    let fiddling = MODE_LINES[mode].fiddling;
    mb.gtia_mut().trigger_gtia_scanline(
        row,
        &line[shift..],
        0,
        DISPLAY_MODULO - FILL_IN_OFFSET,
        fiddling,
    );
    mb.antic_mut().line_buffer = line;
    mb.antic_mut().ypos += 1;
    mb.hbi();
}

/// Generate one mode line. `first` may be negative and `last` may exceed
/// the natural count; both come from the vertical scroll artifacts, and
/// the edge scan lines simply repeat.
fn modeline<T: WithAntic + WithCpu + WithGtia + Motherboard>(
    mb: &mut T,
    ir: u8,
    first: i32,
    last: i32,
    nlines: i32,
    mode: usize,
) {
    let nlines = nlines - 1;
    let mut nmi = false;
    let mut scan = first;
    while scan <= last && mb.antic().ypos < DISPLAY_HEIGHT {
        let displayline = scan.clamp(0, nlines);
        let hscroll = ir & 0x10 != 0;
        // One DMA cycle is two colour clocks; with horizontal scrolling
        // the allocation window shifts by half the scroll value and an
        // extra byte of graphics is fetched.
        let (width, fill, gfx_first, gfx_num, lastref) = {
            let antic = mb.antic();
            if hscroll {
                let dmadelta = usize::from(antic.hscrol >> 1);
                (
                    antic.dma_width_scroll << 6,
                    FILL_IN_OFFSET + antic.xmin_scroll,
                    antic.first_dma_scroll + dmadelta,
                    antic.last_dma_scroll.saturating_sub(antic.first_dma_scroll),
                    if antic.last_dma_scroll == 106 {
                        106
                    } else {
                        (antic.last_dma_scroll + dmadelta).saturating_sub(2)
                    },
                )
            } else {
                (
                    antic.dma_width_no_scroll << 6,
                    FILL_IN_OFFSET + antic.xmin_no_scroll,
                    antic.first_dma_no_scroll,
                    antic
                        .last_dma_no_scroll
                        .saturating_sub(antic.first_dma_no_scroll),
                    if antic.last_dma_no_scroll == 106 {
                        106
                    } else {
                        antic.last_dma_no_scroll.saturating_sub(2)
                    },
                )
            }
        };
        let desc = &MODE_LINES[mode];
        let mut mem = mem_refresh_slot();
        if mb.antic().dlist_dma_enabled() {
            if let Some(font_mask) = desc.font_cycles {
                // font cell fetches happen on every scan line since the
                // glyph row depends on it; they start one cycle late to
                // avoid colliding with the screen data fetches
                let slot = DmaSlot {
                    first_cycle: gfx_first + 1,
                    num_cycles: gfx_num,
                    last_cycle: 106,
                    cycle_mask: font_mask,
                };
                mb.cpu_mut().steal_cycles(&slot);
                if scan == first {
                    // character cell DMA runs three cycles ahead of the
                    // shape DMA, and only on the first scan line
                    let slot = DmaSlot {
                        first_cycle: (gfx_first + 1).saturating_sub(3),
                        num_cycles: gfx_num,
                        last_cycle: 106,
                        cycle_mask: desc.dma_cycles.unwrap_or(font_mask),
                    };
                    mb.cpu_mut().steal_cycles(&slot);
                }
            } else if let Some(dma_mask) = desc.dma_cycles {
                if scan == first {
                    let slot = DmaSlot {
                        first_cycle: gfx_first,
                        num_cycles: gfx_num,
                        last_cycle: 106,
                        cycle_mask: dma_mask,
                    };
                    mb.cpu_mut().steal_cycles(&slot);
                }
            }
            // memory refresh is elastic: postpone by up to two cycles,
            // then fall through to the last free slot of the line
            if mb.cpu().is_busy(mem.first_cycle) {
                mem.first_cycle += 1;
            }
            if mb.cpu().is_busy(mem.first_cycle) {
                mem.first_cycle += 1;
            }
            if mb.cpu().is_busy(mem.first_cycle) {
                mem.num_cycles = 1;
                mem.first_cycle = lastref;
            }
        }
        mb.cpu_mut().steal_cycles(&mem);
        if scan == last && ir & 0x80 != 0 {
            nmi = true;
        }
        scanline(mb, nmi, mode, fill, width, hscroll, scan, first);
        scan += 1;
    }
}

/// Interpret the display list and generate one complete frame.
pub fn run_display_list<T: WithAntic + WithCpu + WithGtia + Motherboard>(mb: &mut T) {
    let mut jvb = false;
    // a 2-bit rolling window: bit 1 is the scroll flag of this mode line,
    // bit 0 the one of the previous line
    let mut vertscroll = 0i32;
    let mut currentir: u8 = 0x10;
    {
        let antic = mb.antic_mut();
        antic.ypos = 0;
        antic.dlist_shadow = antic.dlist;
        antic.dlist_cur = antic.dlist;
        // nothing is displayed up here, character generator pokes have no
        // visible consequences
        antic.current_mode = None;
    }
    // VCOUNT has to pass 0..3 before the display starts
    while mb.antic().ypos < DISPLAY_START {
        mb.cpu_mut().steal_cycles(&mem_refresh_slot());
        cpu::go(mb, CLOCKS_PER_LINE);
        mb.antic_mut().ypos += 1;
        mb.hbi();
    }
    mb.antic_mut().nmist = 0x00;
    while mb.antic().ypos < DISPLAY_HEIGHT {
        vertscroll >>= 1;
        if jvb {
            // waiting for the vertical blank: blank lines, refresh only
            mb.antic_mut().current_mode = None;
            mb.cpu_mut().steal_cycles(&mem_refresh_slot());
            scanline(mb, false, 0, 0, DISPLAY_MODULO, true, 0, 1);
            continue;
        }
        mb.antic_mut().roll_noise();
        // with display DMA off the last instruction is replayed with the
        // scroll flags masked out
        if mb.antic().dlist_dma_enabled() {
            let pc = mb.antic().dlist;
            mb.antic_mut().dlist_cur = pc;
            currentir = mb.antic_read(pc);
            mb.antic_mut().inc_dlist(1);
            mb.cpu_mut().steal_cycles(&dlist_fetch_slot());
        } else {
            currentir &= 0x7f;
        }
        let mut ir = currentir;
        let nlines;
        let mut mode = 0usize;
        if ir & 0x0f == 0x00 {
            // blank line instruction
            nlines = i32::from((ir >> 4) & 0x07) + 1;
            ir &= 0x81;
        } else if ir & 0x0f == 0x01 {
            // jump, one blank line; bit 6 waits for the vertical blank
            nlines = 1;
            if ir & 0x40 != 0 {
                jvb = true;
            }
            ir &= 0x81;
            if mb.antic().dlist_dma_enabled() {
                let pc = mb.antic().dlist;
                let target = mb.antic_read_word(pc);
                mb.antic_mut().dlist = target;
                mb.cpu_mut().steal_cycles(&dl_scan_fetch_slot());
            }
        } else {
            // a regular mode line
            if ir & 0x40 != 0 && mb.antic().dlist_dma_enabled() {
                // load memory scan: reload the playfield pointer
                let pc = mb.antic().dlist;
                let base = mb.antic_read_word(pc);
                let antic = mb.antic_mut();
                antic.pf_base = base;
                antic.inc_dlist(2);
                mb.cpu_mut().steal_cycles(&dl_scan_fetch_slot());
            }
            if ir & 0x20 != 0 {
                vertscroll |= 2;
            }
            let mut dmawidth = mb.antic().dma_width_no_scroll;
            if ir & 0x10 != 0 && dmawidth < 6 {
                // horizontal scrolling fetches one extra byte unit
                dmawidth += 1;
            }
            mode = usize::from(ir & 0x0f);
            let desc = &MODE_LINES[mode];
            nlines = desc.scan_lines;
            if mb.antic().dlist_dma_enabled() && desc.dma_shift > 0 && dmawidth > 0 {
                // latch the screen data for this mode line
                let nbytes = dmawidth << desc.dma_shift;
                let mut pf = mb.antic().pf_base;
                for i in 0..nbytes {
                    let byte = mb.antic_read(pf);
                    mb.antic_mut().scan_buffer[i] = byte;
                    pf = (pf & 0xf000) | (pf.wrapping_add(1) & 0x0fff);
                }
                mb.antic_mut().pf_base = pf;
            }
        }
        if nlines > 0 {
            let mut first = 0i32;
            let mut last = nlines - 1;
            match vertscroll {
                2 => {
                    // first line of a vertical scroll region: delay entry
                    first = i32::from(mb.antic().vscrol);
                    if first > last {
                        first -= 16;
                    }
                }
                1 => {
                    // last line of the region: leave early
                    last = i32::from(mb.antic().vscrol);
                }
                _ => {}
            }
            modeline(mb, ir, first, last, nlines, mode);
        }
    }
    // the vertical blank: blank lines down to the frame total
    mb.antic_mut().current_mode = None;
    let total = if mb.antic().ntsc { NTSC_TOTAL } else { PAL_TOTAL };
    while mb.antic().ypos < total {
        mb.cpu_mut().steal_cycles(&mem_refresh_slot());
        cpu::go(mb, CLOCKS_PER_LINE);
        mb.antic_mut().ypos += 1;
        mb.hbi();
    }
}
