pub mod antic;
pub mod atari;
pub mod bus;
pub mod cpu;
pub mod dma;
pub mod gtia;
pub mod patch;
pub mod pia;
pub mod pokey;
