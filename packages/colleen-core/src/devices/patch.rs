//! ROM patches and escape code dispatch.
//!
//! A patch replaces ROM code with `[0x22, code]`: the CPU's escape opcode
//! followed by an 8-bit identifier. Executing it hands control to the
//! owning patch, which observes and mutates machine state like the ROM
//! routine would have, and returns through the RTS baked into the escape
//! sequence. Providers claim contiguous code ranges at install time; the
//! dispatch itself is a flat 256-entry table.

use super::atari::Atari;
use super::bus::AdrSpace;

/// The CPU opcode the escape sequence starts with.
pub const ESC_OPCODE: u8 = 0x22;

/// Write an escape sequence into ROM. No-op if the target is RAM.
pub fn insert_esc(mem: &mut AdrSpace, addr: u16, code: u8) {
    mem.patch_byte(addr, ESC_OPCODE);
    mem.patch_byte(addr.wrapping_add(1), code);
}

/// One ROM patch, claiming one or more consecutive escape codes.
pub trait Patch {
    /// How many escape codes this patch needs.
    fn num_codes(&self) -> u8 {
        1
    }

    /// Called whenever a ROM image is (re)installed: patch the escape
    /// sequences in, starting at the assigned base code.
    fn install(&mut self, mem: &mut AdrSpace, base_code: u8);

    /// Run the host routine for a code relative to this patch's base.
    fn run(&mut self, machine: &mut Atari, code: u8);

    /// Cold/warm start notification for stateful patches.
    fn reset(&mut self) {}
}

/// The machine-wide collection of patches and the flat code table the
/// escape unit dispatches through.
pub struct PatchBay {
    patches: Vec<Box<dyn Patch>>,
    bases: Vec<u8>,
    table: [Option<usize>; 256],
    installed: bool,
}

impl PatchBay {
    pub fn new() -> PatchBay {
        PatchBay {
            patches: Vec::new(),
            bases: Vec::new(),
            table: [None; 256],
            installed: false,
        }
    }

    /// Add a patch. Codes are assigned at install time, in registration
    /// order.
    pub fn register(&mut self, patch: Box<dyn Patch>) {
        self.patches.push(patch);
        self.installed = false;
    }

    /// Assign escape codes and write every patch into ROM.
    pub fn install_all(&mut self, mem: &mut AdrSpace) {
        let mut code: usize = 0;
        self.bases.clear();
        self.table = [None; 256];
        for (idx, patch) in self.patches.iter_mut().enumerate() {
            let count = usize::from(patch.num_codes());
            assert!(code + count <= 256, "out of escape codes");
            self.bases.push(code as u8);
            for entry in self.table[code..code + count].iter_mut() {
                *entry = Some(idx);
            }
            patch.install(mem, code as u8);
            code += count;
        }
        self.installed = true;
    }

    pub fn reset_all(&mut self) {
        for patch in self.patches.iter_mut() {
            patch.reset();
        }
    }

    /// Dispatch an escape code; `false` if nobody claimed it.
    pub fn dispatch(&mut self, machine: &mut Atari, code: u8) -> bool {
        match self.table[usize::from(code)] {
            Some(idx) => {
                let rel = code - self.bases[idx];
                self.patches[idx].run(machine, rel);
                true
            }
            None => false,
        }
    }

    pub fn is_installed(&self) -> bool {
        self.installed
    }
}

impl Default for PatchBay {
    fn default() -> Self {
        PatchBay::new()
    }
}
