//! CPU integration tests: instruction semantics, cycle placement,
//! interrupts and the monitor hooks, driven through the full machine.

mod util;

use colleen_core::devices::bus::MonitorEvent;
use colleen_core::devices::cpu::structs::{
    CpuFlavor, Status, C_MASK, I_MASK, N_MASK, V_MASK, Z_MASK,
};
use colleen_core::devices::cpu::{self};
use colleen_core::devices::dma::CLOCKS_PER_LINE;
use colleen_core::devices::pokey::POKEY_IRQ_BIT;

use util::{boot_at, machine, machine_with, run_cycles};

#[test]
fn lda_immediate() {
    let mut at = machine();
    boot_at(&mut at, 0x0600, &[0xa9, 0x42]);
    assert_eq!(at.cpu.regs.a, 0);
    // opcode fetch plus the operand/ALU cycle
    cpu::go(&mut at, 2);
    assert_eq!(at.cpu.regs.a, 0x42);
    assert_eq!(at.cpu.regs.p & Z_MASK, 0);
    assert_eq!(at.cpu.regs.p & N_MASK, 0);
    assert!(!at.cpu.regs.status().contains(Status::ZERO));
    assert_eq!(at.cpu.regs.pc, 0x0602);
}

#[test]
fn adc_immediate_binary() {
    let mut at = machine();
    boot_at(&mut at, 0x0600, &[0x69, 0xff]);
    at.cpu.regs.a = 0x01;
    at.cpu.regs.p |= C_MASK;
    cpu::go(&mut at, 2);
    assert_eq!(at.cpu.regs.a, 0x01);
    assert_ne!(at.cpu.regs.p & C_MASK, 0);
    assert_eq!(at.cpu.regs.p & Z_MASK, 0);
    assert_eq!(at.cpu.regs.p & N_MASK, 0);
    assert_eq!(at.cpu.regs.p & V_MASK, 0);
}

#[test]
fn adc_decimal_nmos() {
    let mut at = machine();
    boot_at(&mut at, 0x0600, &[0xf8, 0x69, 0x09, 0xa2, 0x55]);
    at.cpu.regs.a = 0x01;
    // SED, then ADC #$09 in decimal mode
    cpu::go(&mut at, 4);
    assert_eq!(at.cpu.regs.a, 0x10);
    // Z reflects the binary result 0x0a on the NMOS part
    assert_eq!(at.cpu.regs.p & Z_MASK, 0);
    // no extra cycle: the LDX lands right behind
    cpu::go(&mut at, 2);
    assert_eq!(at.cpu.regs.x, 0x55);
}

#[test]
fn adc_decimal_cmos_costs_a_cycle() {
    let mut at = machine_with(CpuFlavor::Wdc65C02);
    boot_at(&mut at, 0x0600, &[0xf8, 0x69, 0x09, 0xa2, 0x55]);
    at.cpu.regs.a = 0x01;
    cpu::go(&mut at, 4);
    assert_eq!(at.cpu.regs.a, 0x10);
    // the decimal fix-up buys one wait state, so the LDX is late by one
    cpu::go(&mut at, 2);
    assert_eq!(at.cpu.regs.x, 0x00);
    cpu::go(&mut at, 1);
    assert_eq!(at.cpu.regs.x, 0x55);
}

#[test]
fn jmp_indirect_page_wrap_nmos() {
    let mut at = machine();
    boot_at(&mut at, 0x0600, &[0x6c, 0xff, 0x02]);
    at.mem.load(0x02ff, &[0x34]);
    at.mem.load(0x0200, &[0x12]);
    at.mem.load(0x0300, &[0x56]);
    cpu::go(&mut at, 5);
    // the high byte comes from $0200, not $0300
    assert_eq!(at.cpu.regs.pc, 0x1234);
}

#[test]
fn jmp_indirect_page_wrap_fixed_on_cmos() {
    let mut at = machine_with(CpuFlavor::Wdc65C02);
    boot_at(&mut at, 0x0600, &[0x6c, 0xff, 0x02]);
    at.mem.load(0x02ff, &[0x34]);
    at.mem.load(0x0200, &[0x12]);
    at.mem.load(0x0300, &[0x56]);
    cpu::go(&mut at, 5);
    assert_eq!(at.cpu.regs.pc, 0x5634);
}

#[test]
fn branch_cycle_penalties() {
    // taken branch: one extra cycle; taken across a page: two
    let mut at = machine();
    // BNE +1 (taken, same page), then LDX #$11
    boot_at(&mut at, 0x0600, &[0xd0, 0x00, 0xa2, 0x11]);
    at.cpu.regs.p &= !Z_MASK;
    cpu::go(&mut at, 3); // 2 + 1 taken
    assert_eq!(at.cpu.regs.pc, 0x0602);
    cpu::go(&mut at, 2);
    assert_eq!(at.cpu.regs.x, 0x11);

    // the same branch crossing into the next page
    let mut at = machine();
    boot_at(&mut at, 0x06fd, &[0xd0, 0x01, 0xea, 0xa2, 0x22]);
    at.cpu.regs.p &= !Z_MASK;
    cpu::go(&mut at, 4); // 2 + 1 taken + 1 page crossed
    assert_eq!(at.cpu.regs.pc, 0x0700);
    cpu::go(&mut at, 2);
    assert_eq!(at.cpu.regs.x, 0x22);
}

#[test]
fn brk_vector_hijacked_by_nmi() {
    let mut at = machine();
    boot_at(&mut at, 0x0600, &[0x00, 0x00]);
    at.mem.load(0xfffe, &[0x00, 0x80]);
    at.mem.load(0xfffa, &[0x00, 0x90]);
    // run into the middle of the BRK sequence, then let the NMI arrive
    cpu::go(&mut at, 4);
    at.cpu.generate_nmi();
    cpu::go(&mut at, 3);
    // the IRQ vector fetch got hijacked
    assert_eq!(at.cpu.regs.pc, 0x9000);
    assert_ne!(at.cpu.regs.p & I_MASK, 0);
}

#[test]
fn irq_is_delayed_one_instruction_and_serviced() {
    let mut at = machine();
    // CLI first: the reset micro-program leaves interrupts masked
    let mut code = [0xea; 16];
    code[0] = 0x58;
    boot_at(&mut at, 0x0600, &code);
    at.mem.load(0xfffe, &[0x00, 0x07]);
    at.mem.load(0x0700, &[0xea; 16]);
    at.cpu.set_irq(POKEY_IRQ_BIT);
    run_cycles(&mut at, 30);
    assert_eq!(at.cpu.regs.pc & 0xff00, 0x0700);
    assert_ne!(at.cpu.regs.p & I_MASK, 0);
}

#[test]
fn wsync_halts_until_release_slot() {
    let mut at = machine();
    boot_at(&mut at, 0x0600, &[0xa2, 0x00, 0x8d, 0x0a, 0xd4, 0xe8, 0xe8]);
    cpu::go(&mut at, 2); // LDX #0
    assert_eq!(at.cpu.regs.x, 0);
    cpu::go(&mut at, 4); // STA $D40A retires on its write cycle
                         // one slot is still free for the next opcode fetch
    cpu::go(&mut at, 1);
    assert_eq!(at.cpu.regs.x, 0);
    // from here to the release slot nothing executes
    while at.cpu.current_x_pos() < 105 {
        cpu::go(&mut at, 1);
        if at.cpu.current_x_pos() <= 105 {
            assert_eq!(at.cpu.regs.x, 0);
        }
    }
    cpu::go(&mut at, 1);
    assert_eq!(at.cpu.regs.x, 1);
}

#[test]
fn double_wsync_write_does_not_stall_forever() {
    let mut at = machine();
    // INC $D40A performs two back-to-back writes to WSYNC
    boot_at(&mut at, 0x0600, &[0xee, 0x0a, 0xd4, 0xe8]);
    run_cycles(&mut at, CLOCKS_PER_LINE);
    // the halt released within the same line and did not carry over
    assert_eq!(at.cpu.regs.x, 1);
    assert_eq!(at.cpu.slots.halt_start, CLOCKS_PER_LINE);
}

#[test]
fn breakpoint_notifies_once_and_resumes() {
    let mut at = machine();
    boot_at(&mut at, 0x0600, &[0xea, 0xea, 0xea, 0xea]);
    at.cpu.set_breakpoint(0x0602).expect("a free slot");
    run_cycles(&mut at, 40);
    assert!(at.cpu.halted());
    assert_eq!(at.cpu.regs.pc, 0x0602);
    assert_eq!(
        at.monitor_log,
        vec![MonitorEvent::BreakPoint { id: 0, pc: 0x0602 }]
    );
    // the CPU state is observable and the machine resumable
    at.cpu.resume();
    run_cycles(&mut at, 4);
    assert!(at.cpu.regs.pc > 0x0602);
    // no re-trigger on resume
    assert_eq!(at.monitor_log.len(), 1);
}

#[test]
fn watchpoint_fires_after_the_touching_instruction() {
    let mut at = machine();
    boot_at(&mut at, 0x0600, &[0xa5, 0xf0, 0xea, 0xea]);
    at.mem.load(0x00f0, &[0x99]);
    at.cpu.set_watchpoint(0x00f0).expect("a free slot");
    at.cpu.enable_watch_points();
    run_cycles(&mut at, 20);
    assert!(at.cpu.halted());
    // the load completed before the monitor got told
    assert_eq!(at.cpu.regs.a, 0x99);
    assert_eq!(
        at.monitor_log,
        vec![MonitorEvent::WatchPoint {
            id: 0,
            addr: 0x00f0,
            pc: 0x0600
        }]
    );
}

#[test]
fn jam_opcode_surfaces_and_pauses() {
    let mut at = machine();
    boot_at(&mut at, 0x0600, &[0x02]);
    run_cycles(&mut at, 10);
    assert!(at.cpu.halted());
    assert_eq!(
        at.monitor_log,
        vec![MonitorEvent::Jam {
            opcode: 0x02,
            pc: 0x0600
        }]
    );
}

#[test]
fn unstable_opcode_surfaces_as_crash() {
    let mut at = machine();
    boot_at(&mut at, 0x0600, &[0x2b]);
    run_cycles(&mut at, 10);
    assert!(at.cpu.halted());
    assert_eq!(
        at.monitor_log,
        vec![MonitorEvent::Crash {
            opcode: 0x2b,
            pc: 0x0600
        }]
    );
}

#[test]
fn sync_is_idempotent() {
    let mut at = machine();
    boot_at(&mut at, 0x0600, &[0xa9, 0x42, 0xea, 0xea]);
    cpu::go(&mut at, 1);
    cpu::sync(&mut at);
    let regs = at.cpu.regs;
    cpu::sync(&mut at);
    assert_eq!(at.cpu.regs, regs);
    cpu::sync(&mut at);
    assert_eq!(at.cpu.regs, regs);
}

#[test]
fn wai_wakes_on_interrupt() {
    let mut at = machine_with(CpuFlavor::Wdc65C02);
    boot_at(&mut at, 0x0600, &[0xcb, 0xa2, 0x33]);
    at.mem.load(0xfffa, &[0x00, 0x07]);
    at.mem.load(0x0700, &[0xea; 4]);
    run_cycles(&mut at, 50);
    // still parked
    assert_eq!(at.cpu.regs.x, 0);
    at.cpu.generate_nmi();
    run_cycles(&mut at, 20);
    // woke up, took the NMI
    assert_eq!(at.cpu.regs.pc & 0xff00, 0x0700);
}
