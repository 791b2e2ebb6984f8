//! Orchestration: ties the Options Acceptor, Index Allocator, Change
//! Detector, and Wire Encoder together for one packet, and commits the
//! context once the caller has successfully emitted that packet.

use crate::acceptor::{accept, AcceptedOptions};
use crate::change::{canonical_value, detect_changes, DetectedChanges};
use crate::collab::{SackEncoder, TsLsbEncoder, WlsbOracle};
use crate::constants::TCP_LIST_ITEM_MAP_LEN;
use crate::context::OptionsContext;
use crate::err::CompressionError;
use crate::wire::{code_irregular, code_list_item};

/// Everything produced by compressing one packet's options: the parsed
/// view, the change-detection result, and how many bytes of each wire
/// form were written.
pub struct CompressedOptions<'a> {
    pub accepted: AcceptedOptions<'a>,
    pub changes: DetectedChanges,
    pub list_item_len: usize,
    pub irregular_len: usize,
}

/// Runs the full compression pipeline for one packet's raw TCP options
/// against a persistent context (§2 "Data flow per packet").
///
/// The context is not mutated; call [`commit`] afterwards once the caller
/// has successfully emitted the packet built from this result (§5
/// "Ordering").
#[cfg_attr(feature = "tracing", tracing::instrument(level = "trace", skip_all))]
#[allow(clippy::too_many_arguments)]
pub fn compress_options<'a, W: WlsbOracle>(
    ctx: &OptionsContext<W>,
    options: &'a [u8],
    tcp_ack_num_changed: bool,
    oa_repetitions_nr: u8,
    ack_num: u32,
    sack: &impl SackEncoder,
    ts: &impl TsLsbEncoder,
    list_item_out: &mut [u8],
    irregular_out: &mut [u8],
) -> Result<CompressedOptions<'a>, CompressionError> {
    let accepted = accept(options)?;
    let changes = detect_changes(ctx, &accepted, tcp_ack_num_changed, oa_repetitions_nr);

    let list_item_len = if changes.is_list_needed {
        code_list_item(&accepted, &changes, sack, ack_num, list_item_out)?
    } else {
        0
    };
    let irregular_len = code_irregular(
        &accepted,
        ctx,
        &changes,
        oa_repetitions_nr,
        sack,
        ts,
        ack_num,
        irregular_out,
    )?;

    Ok(CompressedOptions {
        accepted,
        changes,
        list_item_len,
        irregular_len,
    })
}

/// Applies the §4.E per-slot state transitions and the §3.2 structure
/// bookkeeping to the context, once the packet built from `result` has
/// been successfully emitted by the caller.
pub fn commit<W>(ctx: &mut OptionsContext<W>, result: &CompressedOptions<'_>) {
    let mut participated = [false; TCP_LIST_ITEM_MAP_LEN];

    for (pos, descriptor) in result.accepted.descriptors.iter().enumerate() {
        let idx = result.changes.position2index[pos] as usize;
        let change = result.changes.changes[idx];
        participated[idx] = true;

        if change.is_index_recycled {
            ctx.slots[idx].reset();
        }

        if change.static_changed {
            ctx.slots[idx].on_static_change();
        } else if change.dyn_changed {
            ctx.slots[idx].on_dynamic_change();
        } else {
            ctx.slots[idx].on_no_change();
        }

        let value = canonical_value(descriptor.kind, descriptor.length, descriptor.slice);
        ctx.slots[idx].observe(descriptor.kind.raw(), &value);
    }

    // LRU-style aging (§4.B.c): every slot that didn't participate in this
    // packet sat idle one packet longer; the allocator recycles whichever
    // slot's age grows largest.
    for (idx, slot) in ctx.slots.iter_mut().enumerate() {
        slot.age_tick(participated[idx]);
    }

    let new_structure = result.accepted.kind_sequence();
    if result.changes.do_list_struct_changed {
        ctx.structure_nr_trans = 1;
    } else {
        ctx.structure_nr_trans = ctx.structure_nr_trans.saturating_add(1);
    }
    ctx.old_structure = new_structure;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collab::test_support::FakeCodec;

    #[test]
    fn fresh_syn_then_commit_then_repeat_drops_list() {
        let mut ctx: OptionsContext<()> = OptionsContext::default();
        let bytes = [0x02, 0x04, 0x05, 0xb4, 0x01, 0x03, 0x03, 0x07];

        let mut list_out = [0u8; 64];
        let mut irregular_out = [0u8; 64];

        let first = compress_options(
            &ctx, &bytes, false, 3, 0, &FakeCodec, &FakeCodec, &mut list_out, &mut irregular_out,
        )
        .unwrap();
        assert!(first.changes.is_list_needed);
        commit(&mut ctx, &first);

        assert!(ctx.slots[2].used);
        assert_eq!(ctx.slots[2].full_trans_nr, 1);

        for _ in 0..3 {
            let result = compress_options(
                &ctx, &bytes, false, 3, 0, &FakeCodec, &FakeCodec, &mut list_out, &mut irregular_out,
            )
            .unwrap();
            commit(&mut ctx, &result);
        }

        let stable = compress_options(
            &ctx, &bytes, false, 3, 0, &FakeCodec, &FakeCodec, &mut list_out, &mut irregular_out,
        )
        .unwrap();
        assert!(!stable.changes.is_list_needed);
        assert_eq!(stable.list_item_len, 0);
    }

    #[test]
    fn malformed_options_short_circuit_before_detection() {
        let ctx: OptionsContext<()> = OptionsContext::default();
        let bytes = [2u8];
        let mut list_out = [0u8; 16];
        let mut irregular_out = [0u8; 16];
        let err = compress_options(
            &ctx, &bytes, false, 3, 0, &FakeCodec, &FakeCodec, &mut list_out, &mut irregular_out,
        )
        .unwrap_err();
        assert!(matches!(err, CompressionError::MalformedOptions(_)));
    }
}
