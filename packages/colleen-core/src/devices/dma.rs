//! Per-scan-line DMA slot bookkeeping.
//!
//! A scan line is 114 machine cycles. Every cycle is a slot that either
//! belongs to the CPU or got stolen by a chip; ANTIC requests its screen,
//! font, player/missile and refresh fetches here and the CPU steps only
//! through slots that stayed free.

/// Machine cycles per scan line.
pub const CLOCKS_PER_LINE: usize = 114;

// A few slots of slack past the end of the line. They stay permanently
// allocated so the stepper and the WSYNC logic need no bound checks.
const SLOT_SLACK: usize = 8;

/// A slot stolen by chip DMA.
pub const SLOT_STOLEN: u8 = 0x01;
/// A slot blocked because the CPU wrote WSYNC.
pub const SLOT_WSYNC: u8 = 0x02;

/// One DMA request: allocate `num_cycles` slots starting at `first_cycle`,
/// copying the allocation pattern from `cycle_mask`, never touching
/// anything at or past `last_cycle`. The masks are typically sparse
/// (every 2nd, 4th or 8th cycle) to model the strided screen fetches.
#[derive(Copy, Clone)]
pub struct DmaSlot<'a> {
    pub first_cycle: usize,
    pub num_cycles: usize,
    pub last_cycle: usize,
    pub cycle_mask: &'a [u8],
}

/// The slot map of the current scan line. Owned by the CPU, mutated by the
/// CPU (WSYNC, HBI) and by ANTIC (cycle stealing).
pub struct SlotMap {
    slots: [u8; CLOCKS_PER_LINE + SLOT_SLACK],
    /// Slot at which a WSYNC halt carried over from the previous line
    /// resumes blocking; `CLOCKS_PER_LINE` means no carry.
    pub halt_start: usize,
}

impl SlotMap {
    pub fn new() -> SlotMap {
        let mut map = SlotMap {
            slots: [SLOT_STOLEN; CLOCKS_PER_LINE + SLOT_SLACK],
            halt_start: CLOCKS_PER_LINE,
        };
        map.hbi(CLOCKS_PER_LINE);
        map
    }

    #[inline]
    pub fn at(&self, cycle: usize) -> u8 {
        // everything past the line end stays allocated, so a runaway
        // horizontal position reads "blocked" instead of falling off
        self.slots[cycle.min(CLOCKS_PER_LINE + SLOT_SLACK - 1)]
    }

    /// Cheap peek used by ANTIC when colliding requests need rescheduling.
    #[inline]
    pub fn is_busy(&self, cycle: usize) -> bool {
        self.at(cycle) != 0
    }

    /// Allocate slots for a chip. Slots already stolen stay stolen; the
    /// mask is ORed in. The first slot is always taken, even when it sits
    /// past `last_cycle` (the missile fetch lives out there).
    pub fn steal(&mut self, slot: &DmaSlot) {
        let mut cnt = slot.num_cycles;
        if cnt == 0 {
            return;
        }
        let mut out = slot.first_cycle;
        let last = slot.last_cycle;
        let mut mask = slot.cycle_mask.iter();
        loop {
            match mask.next() {
                Some(&bit) => self.slots[out] |= bit,
                None => break,
            }
            out += 1;
            cnt -= 1;
            if out >= last || cnt == 0 {
                break;
            }
        }
    }

    /// The soft variant used for memory refresh: a request that lands on an
    /// occupied slot is postponed and retried on the following slots, one
    /// pending request at a time. A refresh access is never lost, only
    /// delayed.
    pub fn steal_mem(&mut self, slot: &DmaSlot) {
        let mut cnt = slot.num_cycles;
        if cnt == 0 {
            return;
        }
        let mut mask = slot.cycle_mask.iter();
        let mut out = slot.first_cycle;
        let last = slot.last_cycle;
        let mut pending: u8 = 0;
        loop {
            if cnt > 0 {
                if let Some(&bit) = mask.next() {
                    pending |= bit;
                    cnt -= 1;
                } else {
                    cnt = 0;
                }
            }
            if self.slots[out] & SLOT_STOLEN == 0 {
                self.slots[out] |= pending;
                pending = 0;
            }
            out += 1;
            if out >= last || (pending == 0 && cnt == 0) {
                break;
            }
        }
    }

    /// Block the CPU from `current_cycle + 2` up to the WSYNC release slot.
    /// Past the release slot the block runs to the end of the line and the
    /// halt carries into the next line through `halt_start`; this keeps
    /// back-to-back WSYNC writes (INC $D40A and friends) from stalling
    /// forever.
    pub fn wsync_stop(&mut self, current_cycle: usize, wsync_release: usize) {
        // The cycle currently executing is `current_cycle` and the next one
        // must stay free for the write to retire; blocking starts at +2.
        let mut cycle = current_cycle + 2;
        let last = wsync_release;
        if cycle > last {
            if cycle < CLOCKS_PER_LINE {
                while cycle < CLOCKS_PER_LINE {
                    self.slots[cycle] |= SLOT_WSYNC;
                    cycle += 1;
                }
                self.halt_start = 0;
            } else {
                self.halt_start = cycle - CLOCKS_PER_LINE;
            }
        } else {
            while cycle < last {
                self.slots[cycle] |= SLOT_WSYNC;
                cycle += 1;
            }
        }
    }

    /// Start of a new scan line: release everything, then replay a WSYNC
    /// halt carried over from the previous line.
    pub fn hbi(&mut self, wsync_release: usize) {
        for slot in self.slots[..CLOCKS_PER_LINE].iter_mut() {
            *slot = 0;
        }
        if self.halt_start < wsync_release {
            for slot in self.slots[self.halt_start..wsync_release].iter_mut() {
                *slot |= SLOT_WSYNC;
            }
            self.halt_start = CLOCKS_PER_LINE;
        }
    }

    /// Number of stolen slots in a half-open range; test support.
    pub fn count_stolen(&self, from: usize, to: usize) -> usize {
        self.slots[from..to]
            .iter()
            .filter(|&&s| s & SLOT_STOLEN != 0)
            .count()
    }
}

impl Default for SlotMap {
    fn default() -> Self {
        SlotMap::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONES: [u8; 9] = [1; 9];

    #[test]
    fn steal_is_bounded_by_last_cycle() {
        let mut map = SlotMap::new();
        map.steal(&DmaSlot {
            first_cycle: 110,
            num_cycles: 9,
            last_cycle: 113,
            cycle_mask: &ONES,
        });
        assert_eq!(map.count_stolen(0, CLOCKS_PER_LINE), 3);
        assert!(map.is_busy(112));
        assert!(!map.is_busy(113));
    }

    #[test]
    fn steal_mem_postpones_into_free_slots() {
        let mut map = SlotMap::new();
        // Occupy slots 25 and 26.
        map.steal(&DmaSlot {
            first_cycle: 25,
            num_cycles: 2,
            last_cycle: 107,
            cycle_mask: &ONES,
        });
        // A refresh request of one cycle at 25 slides to 27.
        map.steal_mem(&DmaSlot {
            first_cycle: 25,
            num_cycles: 1,
            last_cycle: 107,
            cycle_mask: &ONES,
        });
        assert!(map.is_busy(27));
        assert_eq!(map.count_stolen(25, 107), 3);
    }

    #[test]
    fn steal_mem_falls_through_to_last_slot() {
        let mut map = SlotMap::new();
        map.steal(&DmaSlot {
            first_cycle: 0,
            num_cycles: CLOCKS_PER_LINE,
            last_cycle: 106,
            cycle_mask: &[1; CLOCKS_PER_LINE],
        });
        map.steal_mem(&DmaSlot {
            first_cycle: 25,
            num_cycles: 1,
            last_cycle: 107,
            cycle_mask: &ONES,
        });
        // Everything up to 106 was taken, so the pending request lands on
        // the final allowed slot.
        assert!(map.is_busy(106));
    }

    #[test]
    fn wsync_carries_to_next_line() {
        let mut map = SlotMap::new();
        map.wsync_stop(110, 105);
        assert!(map.at(112) & SLOT_WSYNC != 0);
        assert_eq!(map.halt_start, 0);
        map.hbi(105);
        assert!(map.at(0) & SLOT_WSYNC != 0);
        assert!(map.at(104) & SLOT_WSYNC != 0);
        assert!(map.at(105) & SLOT_WSYNC == 0);
        // consumed, the line after that is clean
        map.hbi(105);
        assert!(map.at(0) == 0);
    }
}
