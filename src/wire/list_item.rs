//! Compressed list encoding (§4.D.1): the XI header/array followed by the
//! item bodies for options whose item must be (re)transmitted.

use arrayvec::ArrayVec;

use crate::acceptor::AcceptedOptions;
use crate::change::DetectedChanges;
use crate::collab::SackEncoder;
use crate::constants::ROHC_TCP_SACK_BLOCKS_MAX;
use crate::err::{BufferTooSmallError, CompressionError, EncodingUnrepresentableError};
use crate::option_kind::OptionKind;

/// Writes the compressed options list (XI header, XI array, item bodies)
/// for the dynamic, replicate, or CO chain.
///
/// `ack_num` is the current packet's TCP ACK number (network-order host
/// value), needed by the SACK item body. Returns the number of bytes
/// written into `out`.
#[cfg_attr(feature = "tracing", tracing::instrument(level = "trace", skip_all))]
pub fn code_list_item(
    accepted: &AcceptedOptions<'_>,
    tmp: &DetectedChanges,
    sack: &impl SackEncoder,
    ack_num: u32,
    out: &mut [u8],
) -> Result<usize, CompressionError> {
    let m = accepted.len();
    let ps = tmp.idx_max > 7;
    let xi_bytes = if ps { m } else { (m + 1) / 2 };
    let xis_len = 1 + xi_bytes;

    if out.len() < xis_len {
        return Err(BufferTooSmallError {
            what: "XI list header+array",
            required_len: xis_len,
            available_len: out.len(),
        }
        .into());
    }

    out[0] = ((ps as u8) << 4) | (m as u8);

    for (pos, &idx) in tmp.position2index.iter().enumerate() {
        let needed = tmp.list_item_needed[idx as usize];
        if ps {
            out[1 + pos] = ((needed as u8) << 7) | idx;
        } else {
            let byte_pos = 1 + pos / 2;
            let nibble = idx | ((needed as u8) << 3);
            if pos % 2 == 0 {
                out[byte_pos] = nibble << 4;
            } else {
                out[byte_pos] |= nibble;
            }
        }
    }

    let mut cursor = xis_len;
    for (pos, descriptor) in accepted.descriptors.iter().enumerate() {
        let idx = tmp.position2index[pos];
        if !tmp.list_item_needed[idx as usize] {
            continue;
        }
        cursor += write_item_body(descriptor.kind, descriptor.length, descriptor.slice, sack, ack_num, &mut out[cursor..])?;
    }

    Ok(cursor)
}

fn write_item_body(
    kind: OptionKind,
    length: u8,
    slice: &[u8],
    sack: &impl SackEncoder,
    ack_num: u32,
    out: &mut [u8],
) -> Result<usize, CompressionError> {
    match kind {
        OptionKind::Nop | OptionKind::SackPermitted => Ok(0),
        OptionKind::Eol => {
            let pad_len_bits = (length as usize - 1) * 8;
            if pad_len_bits > 0xff {
                return Err(EncodingUnrepresentableError::EolTooLong { length }.into());
            }
            require(out, 1, "EOL item")?;
            out[0] = pad_len_bits as u8;
            Ok(1)
        }
        OptionKind::Mss => {
            require(out, 2, "MSS item")?;
            out[..2].copy_from_slice(&slice[2..4]);
            Ok(2)
        }
        OptionKind::Ws => {
            require(out, 1, "WS item")?;
            out[0] = slice[2];
            Ok(1)
        }
        OptionKind::Ts => {
            require(out, 8, "TS item")?;
            out[..8].copy_from_slice(&slice[2..10]);
            Ok(8)
        }
        OptionKind::Sack => {
            let blocks = parse_sack_blocks(&slice[2..]);
            let written = sack
                .sack_code(ack_num, &blocks, false, out)
                .map_err(CompressionError::from)?;
            Ok(written)
        }
        OptionKind::Generic(raw_kind) => {
            if length > 127 {
                return Err(EncodingUnrepresentableError::GenericOptionTooLong {
                    kind: raw_kind,
                    length,
                }
                .into());
            }
            require(out, length as usize, "generic item")?;
            out[0] = raw_kind;
            out[1] = length & 0x7f;
            out[2..length as usize].copy_from_slice(&slice[2..length as usize]);
            Ok(length as usize)
        }
    }
}

pub(crate) fn parse_sack_blocks(body: &[u8]) -> ArrayVec<(u32, u32), ROHC_TCP_SACK_BLOCKS_MAX> {
    let mut blocks = ArrayVec::new();
    for chunk in body.chunks_exact(8) {
        let left = u32::from_be_bytes(chunk[0..4].try_into().unwrap());
        let right = u32::from_be_bytes(chunk[4..8].try_into().unwrap());
        let _ = blocks.try_push((left, right));
    }
    blocks
}

#[inline]
pub(crate) fn require(out: &[u8], needed: usize, what: &'static str) -> Result<(), BufferTooSmallError> {
    if out.len() < needed {
        Err(BufferTooSmallError {
            what,
            required_len: needed,
            available_len: out.len(),
        })
    } else {
        Ok(())
    }
}
