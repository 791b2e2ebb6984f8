/// Errors that can occur while the Options Acceptor (§4.A) validates a raw
/// TCP options block.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum MalformedOptionsError {
    /// A non-NOP, non-EOL option claimed a length but fewer than 2 bytes
    /// were left in the options area to hold the `kind, length` prefix.
    TruncatedOption { offset: usize, kind: u8 },

    /// The `length` byte of an option was smaller than 2 or larger than
    /// the number of bytes remaining in the options area.
    LengthOutOfRange {
        offset: usize,
        kind: u8,
        length: u8,
        remaining: usize,
    },

    /// `EOL`'s length exceeded 32 bytes (so that `(len-1)*8` would not fit
    /// in the item's 8-bit bit-length encoding), or one of its padding
    /// bytes was non-zero.
    MalformedEol { offset: usize, length: u8 },

    /// A fixed-length option (`MSS`, `WS`, `SACK-Permitted`, `TS`) did not
    /// have its required length.
    WrongFixedLength {
        offset: usize,
        kind: u8,
        expected: u8,
        actual: u8,
    },

    /// `SACK`'s length was not `2 + 8*N` for `N` in `1..=4`.
    BadSackLength { offset: usize, length: u8 },

    /// More than `ROHC_TCP_OPTS_MAX` (15) options were present.
    TooManyOptions { limit: usize },

    /// A kind other than NOP/EOL appeared more than once in the same
    /// packet.
    DuplicateOption { kind: u8 },

    /// A generic option's length exceeded `ROHC_TCP_OPT_MAX_LEN` (40),
    /// the largest single option this profile can hold in a slot.
    GenericOptionTooLong { offset: usize, kind: u8, length: u8 },

    /// The whole options area exceeded `ROHC_TCP_OPT_MAX_LEN` (40) bytes,
    /// which the standard TCP header format never allows (§3.1).
    OptionsAreaTooLong { length: usize },
}

impl core::fmt::Display for MalformedOptionsError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        use MalformedOptionsError::*;
        match self {
            TruncatedOption { offset, kind } => write!(
                f,
                "Malformed TCP options: option of kind {kind} at offset {offset} has no room for its length byte."
            ),
            LengthOutOfRange { offset, kind, length, remaining } => write!(
                f,
                "Malformed TCP options: option of kind {kind} at offset {offset} declares length {length}, but only {remaining} byte(s) remain."
            ),
            MalformedEol { offset, length } => write!(
                f,
                "Malformed TCP options: EOL option at offset {offset} has length {length}, which is either over 32 bytes or contains non-zero padding."
            ),
            WrongFixedLength { offset, kind, expected, actual } => write!(
                f,
                "Malformed TCP options: option of kind {kind} at offset {offset} must have length {expected}, found {actual}."
            ),
            BadSackLength { offset, length } => write!(
                f,
                "Malformed TCP options: SACK option at offset {offset} has length {length}, which is not `2 + 8*N` for N in 1..=4."
            ),
            TooManyOptions { limit } => write!(
                f,
                "Malformed TCP options: more than {limit} options present in one packet."
            ),
            DuplicateOption { kind } => write!(
                f,
                "Malformed TCP options: option of kind {kind} appeared more than once (only NOP and EOL may repeat)."
            ),
            GenericOptionTooLong { offset, kind, length } => write!(
                f,
                "Malformed TCP options: option of kind {kind} at offset {offset} has length {length}, which exceeds the 40-byte maximum for a single option."
            ),
            OptionsAreaTooLong { length } => write!(
                f,
                "Malformed TCP options: options area is {length} bytes, which exceeds the 40-byte maximum a TCP header can carry."
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for MalformedOptionsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}
