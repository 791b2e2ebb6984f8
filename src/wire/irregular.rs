//! Irregular-chain encoding (§4.D.2): compact per-option deltas for
//! options whose full item is not being retransmitted this packet.

use crate::acceptor::AcceptedOptions;
use crate::change::DetectedChanges;
use crate::collab::{SackEncoder, TsLsbEncoder};
use crate::context::OptionsContext;
use crate::err::CompressionError;
use crate::option_kind::OptionKind;
use crate::wire::list_item::require;

/// Writes the irregular-chain deltas for every option whose list item was
/// not (re)transmitted this packet. Returns the number of bytes written.
#[cfg_attr(feature = "tracing", tracing::instrument(level = "trace", skip_all))]
pub fn code_irregular<W>(
    accepted: &AcceptedOptions<'_>,
    ctx: &OptionsContext<W>,
    tmp: &DetectedChanges,
    oa_repetitions_nr: u8,
    sack: &impl SackEncoder,
    ts: &impl TsLsbEncoder,
    ack_num: u32,
    out: &mut [u8],
) -> Result<usize, CompressionError> {
    let mut cursor = 0usize;

    for (pos, descriptor) in accepted.descriptors.iter().enumerate() {
        let idx = tmp.position2index[pos];
        if tmp.list_item_needed[idx as usize] {
            continue;
        }
        let slot = &ctx.slots[idx as usize];
        let change = &tmp.changes[idx as usize];

        cursor += match descriptor.kind {
            OptionKind::Nop
            | OptionKind::Eol
            | OptionKind::Mss
            | OptionKind::Ws
            | OptionKind::SackPermitted => 0,

            OptionKind::Ts => {
                let req_n = ts
                    .ts_lsb_code(tmp.ts_req, tmp.ts_req_bytes_nr, &mut out[cursor..])
                    .map_err(CompressionError::from)?;
                let reply_n = ts
                    .ts_lsb_code(tmp.ts_reply, tmp.ts_reply_bytes_nr, &mut out[cursor + req_n..])
                    .map_err(CompressionError::from)?;
                req_n + reply_n
            }

            OptionKind::Sack => {
                let blocks = crate::wire::list_item::parse_sack_blocks(&descriptor.slice[2..]);
                let is_unchanged =
                    !(change.dyn_changed || slot.dyn_trans_nr < oa_repetitions_nr);
                sack.sack_code(ack_num, &blocks, is_unchanged, &mut out[cursor..])
                    .map_err(CompressionError::from)?
            }

            OptionKind::Generic(_) => {
                let send_full = change.dyn_changed || slot.dyn_trans_nr < oa_repetitions_nr;
                if send_full {
                    let body_len = descriptor.length as usize - 2;
                    require(&out[cursor..], 1 + body_len, "generic irregular")?;
                    out[cursor] = 0x00;
                    out[cursor + 1..cursor + 1 + body_len]
                        .copy_from_slice(&descriptor.slice[2..2 + body_len]);
                    1 + body_len
                } else {
                    require(&out[cursor..], 1, "generic irregular")?;
                    out[cursor] = 0xff;
                    1
                }
            }
        };
    }

    Ok(cursor)
}
