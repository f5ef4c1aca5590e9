//! Shared scaffolding for the integration tests.
#![allow(dead_code)]

use colleen_core::config::MachineConfig;
use colleen_core::devices::atari::Atari;
use colleen_core::devices::bus::Motherboard;
use colleen_core::devices::cpu::structs::CpuFlavor;
use colleen_core::devices::cpu::{self};
use colleen_core::devices::dma::CLOCKS_PER_LINE;

pub fn machine() -> Atari {
    machine_with(CpuFlavor::Nmos6502)
}

pub fn machine_with(flavor: CpuFlavor) -> Atari {
    let config = MachineConfig {
        cpu_flavor: flavor,
        ..MachineConfig::default()
    };
    let mut atari = Atari::new(config).expect("default config is valid");
    atari.cold_start();
    atari
}

/// Install `code` at `org`, point the reset vector at it and run the
/// machine through the reset micro-program. On return the next CPU cycle
/// is the opcode fetch of the first instruction.
pub fn boot_at(atari: &mut Atari, org: u16, code: &[u8]) {
    atari.mem.load(org, code);
    atari.mem.load(0xfffc, &[org as u8, (org >> 8) as u8]);
    atari.warm_start();
    // LoadVector, LoadVectorExtend, Jmp; the decode is left pending
    cpu::go(atari, 3);
    assert_eq!(atari.cpu.regs.pc, org);
}

/// Advance the CPU while feeding it fresh scan lines, the way ANTIC would.
pub fn run_cycles(atari: &mut Atari, cycles: usize) {
    let mut left = cycles;
    while left > 0 {
        let x = atari.cpu.current_x_pos();
        if x >= CLOCKS_PER_LINE {
            Motherboard::hbi(atari);
            continue;
        }
        let chunk = left.min(CLOCKS_PER_LINE - x);
        cpu::go(atari, chunk);
        left -= chunk;
    }
}
