//! Persistent per-flow compression context (§3.2) and its per-index slot
//! state machine (§4.E).

use arrayvec::ArrayVec;

use crate::constants::{ROHC_TCP_OPT_MAX_LEN, ROHC_TCP_OPTS_MAX, TCP_LIST_ITEM_MAP_LEN};

/// Per-index persistent state (§3.2).
///
/// Indices `0..=6` are reserved for well-known kinds and their `kind`
/// field is unused (the kind is implied by the index, see
/// [`crate::index::reserved_index_for_kind`]); indices `7..=15` are
/// generic slots whose `kind` tracks whichever option currently occupies
/// them.
#[derive(Clone, Debug)]
pub struct IndexSlot {
    pub used: bool,
    pub kind: u8,
    pub payload: [u8; ROHC_TCP_OPT_MAX_LEN],
    pub data_len: u8,
    pub full_trans_nr: u8,
    pub dyn_trans_nr: u8,
    pub age: u64,
}

impl Default for IndexSlot {
    fn default() -> Self {
        IndexSlot {
            used: false,
            kind: 0,
            payload: [0; ROHC_TCP_OPT_MAX_LEN],
            data_len: 0,
            full_trans_nr: 0,
            dyn_trans_nr: 0,
            age: 0,
        }
    }
}

impl IndexSlot {
    /// The previously observed option content, i.e. `payload[..data_len]`.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.payload[..self.data_len as usize]
    }

    /// Overwrites the slot's observed content and marks it `used`.
    pub fn observe(&mut self, kind: u8, data: &[u8]) {
        self.used = true;
        self.kind = kind;
        self.data_len = data.len() as u8;
        self.payload[..data.len()].copy_from_slice(data);
    }

    /// Applies the §4.E state transition for a static change: resets both
    /// transmission counters to 1 (this packet counts as the first
    /// transmission of the new value).
    #[inline]
    pub fn on_static_change(&mut self) {
        self.full_trans_nr = 1;
        self.dyn_trans_nr = 1;
    }

    /// Applies the §4.E state transition for a dynamic change: resets
    /// only the dynamic counter.
    #[inline]
    pub fn on_dynamic_change(&mut self) {
        self.dyn_trans_nr = 1;
    }

    /// Applies the §4.E "no change" self-loop: both counters advance,
    /// saturating rather than wrapping.
    #[inline]
    pub fn on_no_change(&mut self) {
        self.full_trans_nr = self.full_trans_nr.saturating_add(1);
        self.dyn_trans_nr = self.dyn_trans_nr.saturating_add(1);
    }

    /// Resets the slot to its never-used state, as happens when the
    /// index allocator recycles it for a different option (§4.B, §4.C).
    pub fn reset(&mut self) {
        *self = IndexSlot::default();
    }

    /// Updates the slot's idle counter once per committed packet (§4.B.c):
    /// a slot that participated in the packet just committed is fully
    /// fresh again, so its age drops back to 0; every other slot sat idle
    /// for one more packet, so its age advances by one (saturating rather
    /// than wrapping). The allocator recycles whichever slot has the
    /// largest age, i.e. the one that has gone longest without being used.
    #[inline]
    pub fn age_tick(&mut self, participated: bool) {
        if participated {
            self.age = 0;
        } else {
            self.age = self.age.saturating_add(1);
        }
    }
}

/// A sliding window over recent 32-bit values, used by the W-LSB
/// feasibility oracle for the TS option's two fields. The window itself
/// is an external collaborator (§1); this crate only stores the handle
/// the caller gives it and threads it through to
/// [`crate::collab::WlsbOracle`].
#[derive(Clone, Debug, Default)]
pub struct TsWindow<W> {
    pub inner: W,
}

/// The full persistent per-flow options context (§3.2).
pub struct OptionsContext<W> {
    pub slots: [IndexSlot; TCP_LIST_ITEM_MAP_LEN],
    pub ts_req_wlsb: TsWindow<W>,
    pub ts_reply_wlsb: TsWindow<W>,
    pub old_structure: ArrayVec<u8, ROHC_TCP_OPTS_MAX>,
    pub structure_nr_trans: u8,
}

impl<W: Default> Default for OptionsContext<W> {
    fn default() -> Self {
        OptionsContext {
            slots: core::array::from_fn(|_| IndexSlot::default()),
            ts_req_wlsb: TsWindow::default(),
            ts_reply_wlsb: TsWindow::default(),
            old_structure: ArrayVec::new(),
            structure_nr_trans: 0,
        }
    }
}
