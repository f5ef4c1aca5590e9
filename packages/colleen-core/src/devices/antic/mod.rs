pub mod antic;
pub mod modes;
pub mod structs;

pub use antic::{run_display_list, Antic, WithAntic};
