pub mod cpu;
pub mod structs;
pub mod table;
pub mod units;
#[macro_use]
pub mod utils;

pub use cpu::{go, step, sync, Cpu6502, WithCpu};
