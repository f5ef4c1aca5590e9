//! ANTIC integration tests: whole frames driven through the display list
//! interpreter, with the CPU spinning on a jump loop unless a test wants
//! it to do something more interesting.

mod util;

use colleen_core::devices::antic::structs::{DISPLAY_WIDTH, NTSC_TOTAL, PAL_TOTAL};
use colleen_core::devices::bus::Motherboard;
use colleen_core::devices::gtia::{BACKGROUND, PLAYFIELD_1_FIDDLED, PLAYFIELD_2};

use util::{boot_at, machine};

/// Three blank-8 instructions, one standard-width mode 2 line with a load
/// memory scan, then jump-and-wait-for-vertical-blank back to the start.
fn single_line_display_list(at: &mut colleen_core::devices::atari::Atari, mode_byte: u8) {
    boot_at(at, 0x0600, &[0x4c, 0x00, 0x06]); // the CPU just spins
    let dl = [
        0x70,
        0x70,
        0x70,
        mode_byte,
        0x00,
        0x40,
        0x41,
        0x00,
        0x08,
    ];
    at.mem.load(0x0800, &dl);
    at.write(0xd402, 0x00);
    at.write(0xd403, 0x08);
}

#[test]
fn single_mode_line_frame() {
    let mut at = machine();
    single_line_display_list(&mut at, 0x42);
    // standard playfield width plus display list DMA
    at.write(0xd400, 0x22);
    at.run_display_list();

    // a full PAL frame was generated
    assert_eq!(at.antic.ypos, PAL_TOTAL);
    // the LMS loaded $4000 and the mode line consumed 40 bytes
    assert_eq!(at.antic.pf_base, 0x4028);
    // the three blank-8 mode lines cover rows 8..31, the first visible
    // playfield row is 32
    assert!(at.gtia.row(31).iter().all(|&px| px == BACKGROUND));
    let row = at.gtia.row(32);
    assert!(row[..32].iter().all(|&px| px == BACKGROUND));
    assert!(row[32..352].iter().all(|&px| px == PLAYFIELD_2));
    assert!(row[352..].iter().all(|&px| px == BACKGROUND));
    // rows 32..39 belong to the mode line, everything after is the
    // jump-and-wait region
    assert!(at.gtia.row(39)[32..352].iter().all(|&px| px == PLAYFIELD_2));
    assert!(at.gtia.row(40).iter().all(|&px| px == BACKGROUND));
}

#[test]
fn ntsc_frame_total() {
    let mut at = machine();
    at.antic.ntsc = true;
    single_line_display_list(&mut at, 0x42);
    at.write(0xd400, 0x22);
    at.run_display_list();
    assert_eq!(at.antic.ypos, NTSC_TOTAL);
}

#[test]
fn dma_disabled_still_advances_and_runs_hbi() {
    let mut at = machine();
    boot_at(&mut at, 0x0600, &[0x4c, 0x00, 0x06]);
    // DMACTL stays zero: no fetches, but the frame still happens
    at.run_display_list();
    assert_eq!(at.antic.ypos, PAL_TOTAL);
    // every display line was produced and handed over
    assert_eq!(at.gtia.rows_seen(), 249);
}

#[test]
fn display_list_jump_to_self_does_not_hang() {
    let mut at = machine();
    boot_at(&mut at, 0x0600, &[0x4c, 0x00, 0x06]);
    // a plain jump (not JVB) to itself: one blank line per iteration
    at.mem.load(0x0800, &[0x01, 0x00, 0x08]);
    at.write(0xd402, 0x00);
    at.write(0xd403, 0x08);
    at.write(0xd400, 0x22);
    at.run_display_list();
    assert_eq!(at.antic.ypos, PAL_TOTAL);
}

#[test]
fn hscrol_zero_matches_scroll_disabled_on_wide_playfield() {
    let font: Vec<u8> = (0..1024).map(|i| (i as u8).wrapping_mul(7) ^ 0x35).collect();
    let screen: Vec<u8> = (0..48).map(|i| i as u8).collect();

    let run = |mode_byte: u8| {
        let mut at = machine();
        single_line_display_list(&mut at, mode_byte);
        at.mem.load(0x2000, &font);
        at.mem.load(0x4000, &screen);
        at.write(0xd409, 0x20); // CHBASE $2000
        at.write(0xd404, 0x00); // HSCROL = 0
        at.write(0xd400, 0x23); // wide playfield + DMA
        at.run_display_list();
        at.gtia.row(34).to_vec()
    };

    let scrolled = run(0x52); // mode 2 + LMS + horizontal scroll enable
    let plain = run(0x42); // mode 2 + LMS
    assert_eq!(scrolled.len(), DISPLAY_WIDTH);
    assert_eq!(scrolled, plain);
    // and the row is an actual text row, not just background
    assert!(scrolled.contains(&PLAYFIELD_1_FIDDLED));
    assert!(scrolled.contains(&PLAYFIELD_2));
}

#[test]
fn dli_fires_on_last_scan_line_of_flagged_mode_line() {
    let mut at = machine();
    // the NMI handler counts into $10 and returns
    boot_at(&mut at, 0x0600, &[0x4c, 0x00, 0x06]);
    at.mem.load(0x0700, &[0xe6, 0x10, 0x40]); // INC $10 / RTI
    at.mem.load(0xfffa, &[0x00, 0x07]);
    let dl = [
        0x70, 0x70, 0x70, // blanks
        0xc2, 0x00, 0x40, // mode 2 + LMS + DLI on the last scan line
        0x41, 0x00, 0x08, // jump and wait
    ];
    at.mem.load(0x0800, &dl);
    at.write(0xd402, 0x00);
    at.write(0xd403, 0x08);
    at.write(0xd40e, 0x80); // DLI enabled, VBI not
    at.write(0xd400, 0x22);
    at.run_display_list();
    // exactly one DLI for the one flagged mode line
    assert_eq!(at.peek(0x0010), Some(1));
}

#[test]
fn vbi_fires_at_line_248() {
    let mut at = machine();
    boot_at(&mut at, 0x0600, &[0x4c, 0x00, 0x06]);
    at.mem.load(0x0700, &[0xe6, 0x10, 0x40]); // INC $10 / RTI
    at.mem.load(0xfffa, &[0x00, 0x07]);
    single_line_display_list(&mut at, 0x42);
    at.write(0xd40e, 0x40); // VBI enabled
    at.write(0xd400, 0x22);
    at.run_display_list();
    assert_eq!(at.peek(0x0010), Some(1));
    // the status register keeps the VBI bit
    assert_eq!(at.antic.nmist & 0xc0, 0x40);
}

#[test]
fn vcount_reads_half_lines() {
    let mut at = machine();
    boot_at(&mut at, 0x0600, &[0x4c, 0x00, 0x06]);
    assert_eq!(at.read(0xd40b), 0);
    single_line_display_list(&mut at, 0x42);
    at.write(0xd400, 0x22);
    at.run_display_list();
    assert_eq!(at.read(0xd40b), (PAL_TOTAL >> 1) as u8);
}

#[test]
fn nmist_reads_with_low_bits_set() {
    let mut at = machine();
    boot_at(&mut at, 0x0600, &[0x4c, 0x00, 0x06]);
    assert_eq!(at.read(0xd40f) & 0x1f, 0x1f);
    // NMIRES clears pending status
    at.write(0xd40f, 0x00);
    assert_eq!(at.read(0xd40f), 0x1f);
}
