//! End-to-end scenarios exercising the full acceptor → change detector →
//! wire encoder pipeline through [`rohc_tcp_opts::compressor`].

use rohc_tcp_opts::collab::{SackEncoder, TsLsbEncoder, WlsbOracle};
use rohc_tcp_opts::compressor::{commit, compress_options};
use rohc_tcp_opts::context::OptionsContext;
use rohc_tcp_opts::err::CompressionError;

/// An oracle that always reports the narrowest W-LSB width as feasible,
/// and a SACK/TS codec with a simple, self-consistent wire layout (not
/// RFC 6846's real SDVL/SACK bit encodings, which are out of this crate's
/// scope).
#[derive(Clone, Copy, Default)]
struct AlwaysFeasible;

impl WlsbOracle for AlwaysFeasible {
    fn is_kp_possible_32bits(&self, _value: u32, _k_bits: u8, _shift: i8) -> bool {
        true
    }
}

impl SackEncoder for AlwaysFeasible {
    fn sack_code(
        &self,
        ack_num: u32,
        blocks: &[(u32, u32)],
        unchanged: bool,
        out: &mut [u8],
    ) -> Result<usize, rohc_tcp_opts::err::BufferTooSmallError> {
        let needed = if unchanged { 1 } else { 5 + 8 * blocks.len() };
        if out.len() < needed {
            return Err(rohc_tcp_opts::err::BufferTooSmallError {
                what: "SACK irregular",
                required_len: needed,
                available_len: out.len(),
            });
        }
        if unchanged {
            out[0] = 0xaa;
            return Ok(1);
        }
        out[0] = 0x01;
        out[1..5].copy_from_slice(&ack_num.to_be_bytes());
        let mut pos = 5;
        for (l, r) in blocks {
            out[pos..pos + 4].copy_from_slice(&l.to_be_bytes());
            out[pos + 4..pos + 8].copy_from_slice(&r.to_be_bytes());
            pos += 8;
        }
        Ok(pos)
    }
}

impl TsLsbEncoder for AlwaysFeasible {
    fn ts_lsb_code(
        &self,
        value: u32,
        byte_budget: u8,
        out: &mut [u8],
    ) -> Result<usize, rohc_tcp_opts::err::BufferTooSmallError> {
        let n = byte_budget as usize;
        if out.len() < n {
            return Err(rohc_tcp_opts::err::BufferTooSmallError {
                what: "TS irregular",
                required_len: n,
                available_len: out.len(),
            });
        }
        let be = value.to_be_bytes();
        out[..n].copy_from_slice(&be[4 - n..]);
        Ok(n)
    }
}

const OA_REPETITIONS_NR: u8 = 3;

fn run<'a>(
    ctx: &OptionsContext<AlwaysFeasible>,
    options: &'a [u8],
    ack_changed: bool,
) -> Result<(rohc_tcp_opts::CompressedOptions<'a>, [u8; 128], [u8; 128]), CompressionError> {
    let mut list_out = [0u8; 128];
    let mut irregular_out = [0u8; 128];
    let codec = AlwaysFeasible;
    let result = compress_options(
        ctx,
        options,
        ack_changed,
        OA_REPETITIONS_NR,
        0,
        &codec,
        &codec,
        &mut list_out,
        &mut irregular_out,
    )?;
    Ok((result, list_out, irregular_out))
}

#[test]
fn fresh_syn_options() {
    let ctx: OptionsContext<AlwaysFeasible> = OptionsContext::default();
    let bytes = [0x02, 0x04, 0x05, 0xb4, 0x01, 0x03, 0x03, 0x07];
    let mut list_out = [0u8; 128];
    let mut irregular_out = [0u8; 128];
    let codec = AlwaysFeasible;

    let result = compress_options(
        &ctx,
        &bytes,
        false,
        OA_REPETITIONS_NR,
        0,
        &codec,
        &codec,
        &mut list_out,
        &mut irregular_out,
    )
    .unwrap();

    assert_eq!(result.accepted.len(), 3);
    assert!(result.changes.do_list_struct_changed);
    assert!(result.changes.is_list_needed);
    assert!(result.list_item_len > 0);
}

#[test]
fn second_identical_packet() {
    let mut ctx: OptionsContext<AlwaysFeasible> = OptionsContext::default();
    let bytes = [0x02, 0x04, 0x05, 0xb4];

    let (first, _, _) = run(&ctx, &bytes, false).unwrap();
    commit(&mut ctx, &first);

    let (second, _, _) = run(&ctx, &bytes, false).unwrap();
    // full_trans_nr is 1 after the first packet, still below oa_repetitions_nr.
    assert!(second.changes.is_list_needed);
    assert!(!second.changes.do_list_struct_changed);
}

#[test]
fn fourth_identical_packet_drops_items() {
    let mut ctx: OptionsContext<AlwaysFeasible> = OptionsContext::default();
    let bytes = [0x02, 0x04, 0x05, 0xb4];

    for _ in 0..OA_REPETITIONS_NR {
        let (result, _, _) = run(&ctx, &bytes, false).unwrap();
        commit(&mut ctx, &result);
    }

    let (fourth, _, _) = run(&ctx, &bytes, false).unwrap();
    assert!(!fourth.changes.is_list_needed);
    assert_eq!(fourth.list_item_len, 0);
    // MSS never rides the irregular chain (it's a static option).
    assert_eq!(fourth.irregular_len, 0);
}

#[test]
fn mss_change_forces_full_item() {
    let mut ctx: OptionsContext<AlwaysFeasible> = OptionsContext::default();
    let original = [0x02, 0x04, 0x05, 0xb4];
    for _ in 0..OA_REPETITIONS_NR {
        let (result, _, _) = run(&ctx, &original, false).unwrap();
        commit(&mut ctx, &result);
    }

    let changed = [0x02, 0x04, 0x06, 0x00];
    let (result, _, _) = run(&ctx, &changed, false).unwrap();
    assert!(result.changes.is_list_needed);
    assert!(result.list_item_len > 0);
}

#[test]
fn timestamp_first_packet_is_static() {
    let ctx: OptionsContext<AlwaysFeasible> = OptionsContext::default();
    let mut bytes = [8u8, 10, 0, 0, 0, 0, 0, 0, 0, 0];
    bytes[2..6].copy_from_slice(&1000u32.to_be_bytes());
    bytes[6..10].copy_from_slice(&2000u32.to_be_bytes());

    let (result, _, _) = run(&ctx, &bytes, false).unwrap();
    assert!(result.changes.is_list_needed);
    assert_eq!(result.changes.ts_req, 1000);
    assert_eq!(result.changes.ts_reply, 2000);
}

#[test]
fn sack_unchanged_after_repetitions() {
    let mut ctx: OptionsContext<AlwaysFeasible> = OptionsContext::default();
    let mut bytes = vec![5u8, 10];
    bytes.extend_from_slice(&[0u8; 8]);

    for _ in 0..OA_REPETITIONS_NR {
        let (result, _, _) = run(&ctx, &bytes, false).unwrap();
        commit(&mut ctx, &result);
    }

    let (stable, _, irregular_out) = run(&ctx, &bytes, false).unwrap();
    assert!(!stable.changes.is_list_needed);
    assert_eq!(irregular_out[0], 0xaa);
    assert_eq!(stable.irregular_len, 1);
}

#[test]
fn generic_slot_recycling_evicts_the_least_recently_used_slot() {
    let mut ctx: OptionsContext<AlwaysFeasible> = OptionsContext::default();

    // One packet per distinct generic kind fills slots 7..=15 in order;
    // kind 30 lands in slot 7 and is the first to go idle, kind 38 lands
    // in slot 15 and is committed most recently.
    for kind in 30u8..=38 {
        let bytes = [kind, 4, 0, 0];
        let (result, _, _) = run(&ctx, &bytes, false).unwrap();
        commit(&mut ctx, &result);
    }
    assert_eq!(ctx.slots[7].kind, 30);
    assert_eq!(ctx.slots[15].kind, 38);
    assert_eq!(ctx.slots[7].age, 8);
    assert_eq!(ctx.slots[15].age, 0);

    // A tenth, brand new generic kind must recycle slot 7 (age 8, idled
    // the longest), not slot 15 (age 0, touched most recently).
    let bytes = [99u8, 4, 0, 0];
    let (result, _, _) = run(&ctx, &bytes, false).unwrap();
    let idx = result.changes.position2index[0] as usize;
    assert_eq!(idx, 7);
    assert!(result.changes.changes[idx].is_index_recycled);
}
