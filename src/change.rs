//! Change Detector (§4.C) and the temporary per-packet state (§3.4).
//!
//! The detector walks the options [`crate::acceptor::accept`] produced for
//! the current packet, allocates each occurrence an index via
//! [`crate::index::get_index`], classifies how the option's value changed
//! with respect to the context, and decides which options need a list
//! item transmitted this packet. The result is a value ([`DetectedChanges`])
//! that the wire encoder consumes; nothing here mutates the persistent
//! context directly (per the out-parameter design note carried from §9).

use arrayvec::ArrayVec;

use crate::acceptor::AcceptedOptions;
use crate::collab::WlsbOracle;
use crate::constants::{ROHC_TCP_OPT_MAX_LEN, ROHC_TCP_OPTS_MAX, TCP_LIST_ITEM_MAP_LEN};
use crate::context::OptionsContext;
use crate::option_kind::OptionKind;

/// The bytes this crate compares/stores to decide whether an option's
/// value changed (§3.2, §4.C). For most kinds this is the option payload
/// after the kind and length bytes; EOL carries no meaningful payload (it
/// is zero padding, already validated by the acceptor) so its canonical
/// value is a single synthetic byte holding the option's length instead —
/// that's the only thing `c_tcp_build_eol_list_item` actually depends on.
pub(crate) fn canonical_value(
    kind: OptionKind,
    length: u8,
    slice: &[u8],
) -> ArrayVec<u8, ROHC_TCP_OPT_MAX_LEN> {
    let mut v = ArrayVec::new();
    match kind {
        OptionKind::Nop | OptionKind::SackPermitted => {}
        OptionKind::Eol => v.push(length),
        _ => v.try_extend_from_slice(&slice[2..]).expect("fits ROHC_TCP_OPT_MAX_LEN"),
    }
    v
}

/// How an option's value changed with respect to the context (§3.3/§4.C).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ChangeKind {
    /// The option is unchanged since the last time it was observed.
    None,
    /// The option changed but the change can be carried in the irregular
    /// chain once the decompressor has latched the new value (e.g. SACK,
    /// generic content, or a TS value still within W-LSB range).
    Dynamic,
    /// The option changed in a way that can only be carried by
    /// retransmitting its list item (e.g. first use, MSS/WS/EOL value
    /// change, a generic option's length change, or a TS value outside
    /// W-LSB range).
    Static,
}

/// Per-index change bookkeeping for one packet (§3.4 `changes[16]`).
#[derive(Clone, Copy, Debug, Default)]
pub struct IndexChange {
    pub used: bool,
    pub is_index_recycled: bool,
    pub static_changed: bool,
    pub dyn_changed: bool,
}

/// The temporary, per-packet state produced by [`detect_changes`] (§3.4).
///
/// Indexed by the same `0..=15` index space as [`OptionsContext`]; consumed
/// by the wire encoder and then discarded.
pub struct DetectedChanges {
    pub changes: [IndexChange; TCP_LIST_ITEM_MAP_LEN],
    pub list_item_needed: [bool; TCP_LIST_ITEM_MAP_LEN],
    pub position2index: ArrayVec<u8, ROHC_TCP_OPTS_MAX>,
    pub idx_max: u8,
    pub do_list_struct_changed: bool,
    pub is_list_needed: bool,
    pub ts_req: u32,
    pub ts_req_bytes_nr: u8,
    pub ts_reply: u32,
    pub ts_reply_bytes_nr: u8,
}

/// How many bytes (`1..=4`, or `0` meaning "cannot be encoded, must be a
/// list item") a 32-bit TS field needs under W-LSB, given the oracle.
///
/// Tries the narrowest encoding first, matching `tcp_opt_ts_one_can_be_encoded`
/// trying 1 then 2 then 3 then 4 bytes before giving up.
fn ts_bytes_needed(oracle: &impl WlsbOracle, value: u32) -> u8 {
    const WIDTHS: [(u8, u8, i8); 4] = [(1, 7, 0), (2, 14, 0), (3, 21, 0), (4, 28, 0)];
    for (bytes, k_bits, shift) in WIDTHS {
        if oracle.is_kp_possible_32bits(value, k_bits, shift) {
            return bytes;
        }
    }
    0
}

/// Detects changes for the TS option (§4.C "Timestamps"), also filling in
/// the TS fields of [`DetectedChanges`] that the wire encoder needs later.
#[allow(clippy::too_many_arguments)]
fn detect_ts_changes<W: WlsbOracle>(
    ctx: &OptionsContext<W>,
    slot_used: bool,
    opt_data: &[u8],
    out: &mut DetectedChanges,
) -> ChangeKind {
    let ts_req = u32::from_be_bytes(opt_data[2..6].try_into().unwrap());
    let ts_reply = u32::from_be_bytes(opt_data[6..10].try_into().unwrap());
    out.ts_req = ts_req;
    out.ts_reply = ts_reply;
    out.ts_req_bytes_nr = ts_bytes_needed(&ctx.ts_req_wlsb.inner, ts_req);
    out.ts_reply_bytes_nr = ts_bytes_needed(&ctx.ts_reply_wlsb.inner, ts_reply);

    if !slot_used {
        ChangeKind::Static
    } else if out.ts_req_bytes_nr == 0 || out.ts_reply_bytes_nr == 0 {
        ChangeKind::Static
    } else {
        ChangeKind::Dynamic
    }
}

/// Detects the change kind for a single option occurrence (§4.C per-kind
/// detectors), not including TS which also needs the W-LSB oracle and is
/// handled by [`detect_ts_changes`]. `value` is `canonical_value` for this
/// descriptor.
fn detect_kind_changes(
    kind: OptionKind,
    slot_used: bool,
    slot_data: &[u8],
    tcp_ack_num_changed: bool,
    value: &[u8],
) -> ChangeKind {
    match kind {
        OptionKind::Nop | OptionKind::SackPermitted => {
            if !slot_used {
                ChangeKind::Static
            } else {
                ChangeKind::None
            }
        }
        OptionKind::Eol | OptionKind::Mss | OptionKind::Ws => {
            if !slot_used {
                ChangeKind::Static
            } else if slot_data != value {
                ChangeKind::Static
            } else {
                ChangeKind::None
            }
        }
        OptionKind::Sack => {
            if !slot_used {
                ChangeKind::Static
            } else if tcp_ack_num_changed {
                ChangeKind::Dynamic
            } else if slot_data != value {
                ChangeKind::Dynamic
            } else {
                ChangeKind::None
            }
        }
        OptionKind::Generic(_) => {
            if !slot_used {
                ChangeKind::Static
            } else if slot_data.len() != value.len() {
                ChangeKind::Static
            } else if slot_data != value {
                ChangeKind::Dynamic
            } else {
                ChangeKind::None
            }
        }
        OptionKind::Ts => unreachable!("TS is handled by detect_ts_changes"),
    }
}

/// Whether the list item for this option needs to ride the CO chain this
/// packet (§4.C "list-item-needed decision table",
/// `c_tcp_is_list_item_needed`).
fn is_list_item_needed(
    kind: OptionKind,
    static_changed: bool,
    full_trans_nr: u8,
    oa_repetitions_nr: u8,
) -> bool {
    if matches!(kind, OptionKind::Nop | OptionKind::SackPermitted) {
        false
    } else if static_changed {
        true
    } else if full_trans_nr == 0 {
        true
    } else {
        full_trans_nr < oa_repetitions_nr
    }
}

/// Runs the change detector over one packet's accepted options (§4.C).
///
/// `tcp_ack_num_changed` reflects whether the TCP ACK number changed
/// relative to the previous packet (an external signal, computed by the
/// enclosing profile from the base TCP header, not by this crate).
/// `oa_repetitions_nr` is the configured optimistic-acknowledgment
/// repetition count (§6 "Configuration knobs").
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(level = "trace", skip_all, fields(nr = accepted.len()))
)]
pub fn detect_changes<W: WlsbOracle>(
    ctx: &OptionsContext<W>,
    accepted: &AcceptedOptions<'_>,
    tcp_ack_num_changed: bool,
    oa_repetitions_nr: u8,
) -> DetectedChanges {
    let mut out = DetectedChanges {
        changes: [IndexChange::default(); TCP_LIST_ITEM_MAP_LEN],
        list_item_needed: [false; TCP_LIST_ITEM_MAP_LEN],
        position2index: ArrayVec::new(),
        idx_max: 0,
        do_list_struct_changed: false,
        is_list_needed: false,
        ts_req: 0,
        ts_req_bytes_nr: 0,
        ts_reply: 0,
        ts_reply_bytes_nr: 0,
    };

    let new_structure = accepted.kind_sequence();
    out.do_list_struct_changed = new_structure.len() != ctx.old_structure.len()
        || new_structure.as_slice() != ctx.old_structure.as_slice();

    let mut indexes_in_use_mask: u16 = 0;
    let mut co_chain_at_least_one_item_needed = false;

    for descriptor in &accepted.descriptors {
        let raw_kind = descriptor.kind.raw();
        let allocation = crate::index::get_index(ctx, descriptor.kind, raw_kind, indexes_in_use_mask);
        let idx = allocation.index as usize;
        let slot = &ctx.slots[idx];

        let was_used = !allocation.recycled && slot.used;
        out.changes[idx].is_index_recycled = allocation.recycled;

        let change_kind = if descriptor.kind == OptionKind::Ts {
            detect_ts_changes(ctx, was_used, descriptor.slice, &mut out)
        } else {
            let value = canonical_value(descriptor.kind, descriptor.length, descriptor.slice);
            detect_kind_changes(descriptor.kind, was_used, slot.data(), tcp_ack_num_changed, value.as_slice())
        };

        match change_kind {
            ChangeKind::Static => {
                out.changes[idx].static_changed = true;
                out.changes[idx].dyn_changed = true;
            }
            ChangeKind::Dynamic => {
                out.changes[idx].dyn_changed = true;
            }
            ChangeKind::None => {}
        }
        out.changes[idx].used = true;

        indexes_in_use_mask |= 1 << allocation.index;
        out.position2index.push(allocation.index);
        if allocation.index > out.idx_max {
            out.idx_max = allocation.index;
        }

        let item_needed = is_list_item_needed(
            descriptor.kind,
            out.changes[idx].static_changed,
            slot.full_trans_nr,
            oa_repetitions_nr,
        );
        out.list_item_needed[idx] = item_needed;
        co_chain_at_least_one_item_needed |= item_needed;

        #[cfg(feature = "tracing")]
        tracing::trace!(
            index = allocation.index,
            kind = raw_kind,
            static_changed = out.changes[idx].static_changed,
            dyn_changed = out.changes[idx].dyn_changed,
            item_needed,
            "option change detected"
        );
    }

    out.is_list_needed = if out.do_list_struct_changed {
        true
    } else if ctx.structure_nr_trans < oa_repetitions_nr {
        true
    } else {
        co_chain_at_least_one_item_needed
    };

    out
}
