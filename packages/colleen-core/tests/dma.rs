//! Slot allocator properties: steal accounting, refresh elasticity and
//! the WSYNC halt window.

use colleen_core::devices::antic::structs::{
    mem_refresh_slot, PLAYFIELD_12_FETCH, PLAYFIELD_24_FETCH, PLAYFIELD_48_FETCH,
};
use colleen_core::devices::dma::{DmaSlot, SlotMap, CLOCKS_PER_LINE};

fn popcount(mask: &[u8], n: usize) -> usize {
    mask[..n].iter().filter(|&&b| b != 0).count()
}

#[test]
fn steal_accounts_exactly_for_the_mask() {
    for (mask, first, num) in [
        (&PLAYFIELD_48_FETCH, 12usize, 64usize),
        (&PLAYFIELD_24_FETCH, 20, 48),
        (&PLAYFIELD_12_FETCH, 28, 32),
    ] {
        let mut map = SlotMap::new();
        map.steal(&DmaSlot {
            first_cycle: first,
            num_cycles: num,
            last_cycle: 106,
            cycle_mask: mask,
        });
        assert_eq!(
            map.count_stolen(first, 106),
            popcount(mask, num),
            "pattern starting at {}",
            first
        );
    }
}

#[test]
fn refresh_allocates_all_nine_accesses() {
    let mut map = SlotMap::new();
    map.steal(&mem_refresh_slot());
    assert_eq!(map.count_stolen(0, CLOCKS_PER_LINE), 9);
}

#[test]
fn refresh_elasticity_keeps_the_count() {
    // block the first two refresh slots, the elastic variant must still
    // place every access
    let mut map = SlotMap::new();
    map.steal(&DmaSlot {
        first_cycle: 25,
        num_cycles: 2,
        last_cycle: 107,
        cycle_mask: &[1, 1],
    });
    map.steal_mem(&mem_refresh_slot());
    // 2 blockers + 9 refresh accesses
    assert_eq!(map.count_stolen(0, CLOCKS_PER_LINE), 11);
}

#[test]
fn wsync_blocks_from_two_past_current_to_release() {
    let mut map = SlotMap::new();
    map.wsync_stop(40, 105);
    assert!(!map.is_busy(41));
    assert!(map.is_busy(42));
    assert!(map.is_busy(104));
    assert!(!map.is_busy(105));
}

#[test]
fn wsync_double_write_is_idempotent() {
    let mut map1 = SlotMap::new();
    map1.wsync_stop(40, 105);
    let mut map2 = SlotMap::new();
    map2.wsync_stop(40, 105);
    // the second write happens one cycle later, as INC $D40A would
    map2.wsync_stop(41, 105);
    for cycle in 42..CLOCKS_PER_LINE {
        assert_eq!(map1.at(cycle), map2.at(cycle), "slot {}", cycle);
    }
    assert_eq!(map1.halt_start, map2.halt_start);
}

#[test]
fn hbi_releases_everything_without_a_carry() {
    let mut map = SlotMap::new();
    map.steal(&mem_refresh_slot());
    map.wsync_stop(10, 105);
    map.hbi(105);
    assert_eq!(map.count_stolen(0, CLOCKS_PER_LINE), 0);
    assert!(!map.is_busy(50));
}
