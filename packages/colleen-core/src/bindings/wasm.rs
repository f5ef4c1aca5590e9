/// WASM front end for the emulator core.
use std::panic;

use js_sys::Uint8Array;
use wasm_bindgen::prelude::*;

use crate::config::MachineConfig;
use crate::devices::atari::{Atari, Signal};

#[wasm_bindgen]
pub struct AtariEmulator {
    atari: Atari,
}

#[wasm_bindgen]
impl AtariEmulator {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<AtariEmulator, JsValue> {
        let mut atari = Atari::new(MachineConfig::default())
            .map_err(|err| JsValue::from_str(&err.to_string()))?;
        atari.cold_start();
        Ok(AtariEmulator { atari })
    }

    /// Load an OS ROM image at the given base address.
    #[wasm_bindgen]
    pub fn install_rom(&mut self, base: u16, data: &[u8]) {
        self.atari.install_rom(base, data);
    }

    #[wasm_bindgen]
    pub fn cold_start(&mut self) {
        self.atari.cold_start();
    }

    #[wasm_bindgen]
    pub fn warm_start(&mut self) {
        self.atari.warm_start();
    }

    /// Generate one frame and return the colour-register token buffer;
    /// the JS side maps tokens to palette entries.
    #[wasm_bindgen]
    pub fn step_frame(&mut self) -> Uint8Array {
        self.atari.run_display_list();
        Uint8Array::from(self.atari.gtia.frame())
    }

    #[wasm_bindgen]
    pub fn request_warm_reset(&mut self) {
        self.atari.request(Signal::WarmReset);
    }
}

/// Installs a global panic handler to make debugging easier
#[wasm_bindgen]
pub fn init_debug_hooks() {
    panic::set_hook(Box::new(console_error_panic_hook::hook));
}
