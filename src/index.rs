//! Index Allocator (§4.B): maps each option occurrence in the current
//! packet to a stable index in `0..=15`.

use crate::constants::{GENERIC_INDEX_MAX, GENERIC_INDEX_MIN};
use crate::context::OptionsContext;
use crate::option_kind::OptionKind;

/// The reserved index for a well-known kind, or `None` if `kind` must go
/// through a generic slot (§3.1).
#[inline]
pub const fn reserved_index_for_kind(kind: OptionKind) -> Option<u8> {
    use crate::constants::*;
    match kind {
        OptionKind::Nop => Some(INDEX_NOP),
        OptionKind::Eol => Some(INDEX_EOL),
        OptionKind::Mss => Some(INDEX_MSS),
        OptionKind::Ws => Some(INDEX_WS),
        OptionKind::Ts => Some(INDEX_TS),
        OptionKind::SackPermitted => Some(INDEX_SACK_PERMITTED),
        OptionKind::Sack => Some(INDEX_SACK),
        OptionKind::Generic(_) => None,
    }
}

/// Result of [`get_index`]: the allocated index, and whether allocating
/// it meant evicting (recycling) an older generic slot.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Allocation {
    pub index: u8,
    pub recycled: bool,
}

/// Allocates the index a single option occurrence should use this packet
/// (§4.B). `indexes_in_use_mask` has bit `i` set for every index already
/// handed out earlier in the same packet; the allocator never returns an
/// index already set in the mask, and the caller must OR the returned
/// index into the mask before the next call.
#[cfg_attr(feature = "tracing", tracing::instrument(level = "trace", skip(ctx)))]
pub fn get_index<W>(
    ctx: &OptionsContext<W>,
    kind: OptionKind,
    raw_kind: u8,
    indexes_in_use_mask: u16,
) -> Allocation {
    if let Some(index) = reserved_index_for_kind(kind) {
        #[cfg(feature = "tracing")]
        tracing::trace!(index, "reserved index");
        return Allocation {
            index,
            recycled: false,
        };
    }

    // (a) reuse the index already used for the same generic kind.
    for i in GENERIC_INDEX_MIN..=GENERIC_INDEX_MAX {
        let slot = &ctx.slots[i as usize];
        if slot.used && slot.kind == raw_kind {
            #[cfg(feature = "tracing")]
            tracing::trace!(index = i, "reuse index for same generic kind");
            return Allocation {
                index: i,
                recycled: false,
            };
        }
    }

    // (b) first free index not already claimed this packet.
    for i in GENERIC_INDEX_MIN..=GENERIC_INDEX_MAX {
        let slot = &ctx.slots[i as usize];
        if !slot.used && (indexes_in_use_mask & (1 << i)) == 0 {
            #[cfg(feature = "tracing")]
            tracing::trace!(index = i, "fresh generic index");
            return Allocation {
                index: i,
                recycled: false,
            };
        }
    }

    // (c) recycle the oldest slot not already claimed this packet;
    // ties broken by lowest index (loop runs ascending, strict `>`).
    let mut oldest_index = GENERIC_INDEX_MIN;
    let mut oldest_age = 0u64;
    let mut found = false;
    for i in GENERIC_INDEX_MIN..=GENERIC_INDEX_MAX {
        let slot = &ctx.slots[i as usize];
        if (indexes_in_use_mask & (1 << i)) == 0 && slot.used && slot.age > oldest_age {
            oldest_age = slot.age;
            oldest_index = i;
            found = true;
        }
    }
    debug_assert!(found, "no index available to recycle: caller exceeded ROHC_TCP_OPTS_MAX occurrences");
    #[cfg(feature = "tracing")]
    tracing::trace!(index = oldest_index, "recycled oldest index");
    Allocation {
        index: oldest_index,
        recycled: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::option_kind::OptionKind;

    fn ctx() -> OptionsContext<()> {
        OptionsContext::default()
    }

    #[test]
    fn reserved_kinds_never_use_generic_slots() {
        for kind in [
            OptionKind::Nop,
            OptionKind::Eol,
            OptionKind::Mss,
            OptionKind::Ws,
            OptionKind::Ts,
            OptionKind::SackPermitted,
            OptionKind::Sack,
        ] {
            let alloc = get_index(&ctx(), kind, kind.raw(), 0);
            assert!(alloc.index <= 6);
            assert!(!alloc.recycled);
        }
    }

    #[test]
    fn fresh_generic_gets_lowest_free_slot() {
        let c = ctx();
        let alloc = get_index(&c, OptionKind::Generic(19), 19, 0);
        assert_eq!(alloc.index, 7);
        assert!(!alloc.recycled);
    }

    #[test]
    fn mask_skips_claimed_slots() {
        let c = ctx();
        let mask = 1 << 7;
        let alloc = get_index(&c, OptionKind::Generic(19), 19, mask);
        assert_eq!(alloc.index, 8);
    }

    #[test]
    fn reuses_slot_already_holding_same_kind() {
        let mut c = ctx();
        c.slots[9].used = true;
        c.slots[9].kind = 19;
        let alloc = get_index(&c, OptionKind::Generic(19), 19, 0);
        assert_eq!(alloc.index, 9);
        assert!(!alloc.recycled);
    }

    #[test]
    fn recycles_oldest_unused_free_slot() {
        let mut c = ctx();
        for i in 7..=15u8 {
            c.slots[i as usize].used = true;
            c.slots[i as usize].kind = 100 + i;
            c.slots[i as usize].age = i as u64;
        }
        // slot 15 is oldest (age 15 is numerically largest == oldest tick)
        let alloc = get_index(&c, OptionKind::Generic(200), 200, 0);
        assert_eq!(alloc.index, 15);
        assert!(alloc.recycled);
    }

    #[test]
    fn recycle_tie_break_prefers_lowest_index() {
        let mut c = ctx();
        for i in 7..=15u8 {
            c.slots[i as usize].used = true;
            c.slots[i as usize].kind = 100 + i;
            c.slots[i as usize].age = 3;
        }
        let alloc = get_index(&c, OptionKind::Generic(200), 200, 0);
        assert_eq!(alloc.index, 7);
        assert!(alloc.recycled);
    }

    #[test]
    fn recycle_skips_indexes_already_claimed_this_packet() {
        let mut c = ctx();
        for i in 7..=15u8 {
            c.slots[i as usize].used = true;
            c.slots[i as usize].kind = 100 + i;
            c.slots[i as usize].age = i as u64;
        }
        // slot 15 is oldest but already claimed this packet.
        let mask = 1 << 15;
        let alloc = get_index(&c, OptionKind::Generic(200), 200, mask);
        assert_eq!(alloc.index, 14);
        assert!(alloc.recycled);
    }
}
