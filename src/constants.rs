//! Wire-format constants shared across the core (§6 "Wire format constants").

/// Maximum number of bytes a single TCP option's `payload` may occupy
/// (the whole TCP options area is at most this long too, per the
/// standard `data_offset` constraint).
pub const ROHC_TCP_OPT_MAX_LEN: usize = 40;

/// Maximum number of options accepted in one packet.
pub const ROHC_TCP_OPTS_MAX: usize = 15;

/// Maximum number of SACK blocks accepted in one SACK option.
pub const ROHC_TCP_SACK_BLOCKS_MAX: usize = 4;

/// Number of index slots in the per-index persistent state table (§3.1).
pub const TCP_LIST_ITEM_MAP_LEN: usize = 16;

/// First generic (non-reserved) index.
pub const GENERIC_INDEX_MIN: u8 = 7;

/// Last valid index.
pub const GENERIC_INDEX_MAX: u8 = 15;

/// Reserved index assigned to NOP.
pub const INDEX_NOP: u8 = 0;
/// Reserved index assigned to EOL.
pub const INDEX_EOL: u8 = 1;
/// Reserved index assigned to MSS.
pub const INDEX_MSS: u8 = 2;
/// Reserved index assigned to WS.
pub const INDEX_WS: u8 = 3;
/// Reserved index assigned to TS.
pub const INDEX_TS: u8 = 4;
/// Reserved index assigned to SACK-Permitted.
pub const INDEX_SACK_PERMITTED: u8 = 5;
/// Reserved index assigned to SACK.
pub const INDEX_SACK: u8 = 6;

/// Largest EOL option length the profile can represent: the item
/// encoding packs `(length-1)*8` into a single unsigned byte
/// (`(32-1)*8 == 248`, while `33` would overflow it at `256`).
pub const EOL_MAX_LEN: u8 = 32;
