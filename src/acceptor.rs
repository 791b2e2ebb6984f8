//! Options Acceptor (§4.A): parses and validates a raw TCP options block
//! into a position-indexed view of kinds, lengths and slices.

use arrayvec::ArrayVec;

use crate::constants::{EOL_MAX_LEN, ROHC_TCP_OPT_MAX_LEN, ROHC_TCP_OPTS_MAX};
use crate::err::MalformedOptionsError;
use crate::option_kind::{raw, OptionKind};

/// One parsed option occurrence.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct OptionDescriptor<'a> {
    pub kind: OptionKind,
    pub length: u8,
    pub slice: &'a [u8],
}

/// The ordered, validated view of a packet's options produced by
/// [`accept`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AcceptedOptions<'a> {
    pub descriptors: ArrayVec<OptionDescriptor<'a>, ROHC_TCP_OPTS_MAX>,
    pub total_len: usize,
}

impl<'a> AcceptedOptions<'a> {
    #[inline]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Ordered sequence of raw option kind bytes, used to detect
    /// structural change against the previous packet (§4.C).
    pub fn kind_sequence(&self) -> ArrayVec<u8, ROHC_TCP_OPTS_MAX> {
        self.descriptors.iter().map(|d| d.kind.raw()).collect()
    }
}

/// Parses and validates a raw TCP options block.
///
/// `options` must be exactly the options area of the TCP header (i.e.
/// `data_offset*4 - 20` bytes). Fails with [`MalformedOptionsError`] if
/// any acceptance rule in §4.A is violated.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(level = "trace", skip_all, fields(len = options.len()))
)]
pub fn accept(options: &[u8]) -> Result<AcceptedOptions<'_>, MalformedOptionsError> {
    let total_len = options.len();
    if total_len > ROHC_TCP_OPT_MAX_LEN {
        return Err(MalformedOptionsError::OptionsAreaTooLong { length: total_len });
    }
    let mut descriptors = ArrayVec::new();
    let mut cursor = 0usize;
    let mut seen_kinds: ArrayVec<u8, ROHC_TCP_OPTS_MAX> = ArrayVec::new();

    while cursor < total_len {
        let kind_byte = options[cursor];
        let kind = OptionKind::from_raw(kind_byte);

        let length = match kind {
            OptionKind::Nop => 1u8,
            OptionKind::Eol => (total_len - cursor) as u8,
            _ => {
                if total_len - cursor < 2 {
                    return Err(MalformedOptionsError::TruncatedOption {
                        offset: cursor,
                        kind: kind_byte,
                    });
                }
                let length = options[cursor + 1];
                let remaining = total_len - cursor;
                if length < 2 || (length as usize) > remaining {
                    return Err(MalformedOptionsError::LengthOutOfRange {
                        offset: cursor,
                        kind: kind_byte,
                        length,
                        remaining,
                    });
                }
                length
            }
        };

        well_formed(kind, kind_byte, cursor, length, &options[cursor..cursor + length as usize])?;

        if !kind.may_repeat() {
            if seen_kinds.contains(&kind_byte) {
                return Err(MalformedOptionsError::DuplicateOption { kind: kind_byte });
            }
            if seen_kinds.try_push(kind_byte).is_err() {
                return Err(MalformedOptionsError::TooManyOptions {
                    limit: ROHC_TCP_OPTS_MAX,
                });
            }
        }

        if descriptors.len() == ROHC_TCP_OPTS_MAX {
            return Err(MalformedOptionsError::TooManyOptions {
                limit: ROHC_TCP_OPTS_MAX,
            });
        }
        descriptors.push(OptionDescriptor {
            kind,
            length,
            slice: &options[cursor..cursor + length as usize],
        });

        #[cfg(feature = "tracing")]
        tracing::trace!(offset = cursor, kind = kind_byte, length, "accepted option");

        cursor += length as usize;

        if kind == OptionKind::Eol {
            break;
        }
    }

    Ok(AcceptedOptions {
        descriptors,
        total_len,
    })
}

fn well_formed(
    kind: OptionKind,
    kind_byte: u8,
    offset: usize,
    length: u8,
    slice: &[u8],
) -> Result<(), MalformedOptionsError> {
    match kind {
        OptionKind::Nop => Ok(()),
        OptionKind::Eol => {
            if length > EOL_MAX_LEN || slice.iter().any(|&b| b != raw::EOL) {
                return Err(MalformedOptionsError::MalformedEol { offset, length });
            }
            Ok(())
        }
        OptionKind::Mss => expect_len(kind_byte, offset, length, 4),
        OptionKind::Ws => expect_len(kind_byte, offset, length, 3),
        OptionKind::SackPermitted => expect_len(kind_byte, offset, length, 2),
        OptionKind::Ts => expect_len(kind_byte, offset, length, 10),
        OptionKind::Sack => {
            if length < 2 || (length - 2) % 8 != 0 {
                return Err(MalformedOptionsError::BadSackLength { offset, length });
            }
            let n = (length - 2) / 8;
            if !(1..=4).contains(&n) {
                return Err(MalformedOptionsError::BadSackLength { offset, length });
            }
            Ok(())
        }
        OptionKind::Generic(_) => {
            if length as usize > ROHC_TCP_OPT_MAX_LEN {
                return Err(MalformedOptionsError::GenericOptionTooLong {
                    offset,
                    kind: kind_byte,
                    length,
                });
            }
            Ok(())
        }
    }
}

#[inline]
fn expect_len(kind: u8, offset: usize, actual: u8, expected: u8) -> Result<(), MalformedOptionsError> {
    if actual != expected {
        Err(MalformedOptionsError::WrongFixedLength {
            offset,
            kind,
            expected,
            actual,
        })
    } else {
        Ok(())
    }
}
