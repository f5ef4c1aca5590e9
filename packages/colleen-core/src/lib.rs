//! Emulator core for the Atari 8-bit home computer line (400/800/XL/XE).
//!
//! The interesting parts live in `devices`: a cycle-stepped 6502/65C02, the
//! ANTIC display list processor that doubles as the bus DMA master, and the
//! machine glue that arbitrates the 114 cycle slots of every scan line
//! between the two.

#[macro_use]
extern crate bitflags;

pub mod bindings;
pub mod config;
pub mod devices;
