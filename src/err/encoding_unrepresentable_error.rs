/// Returned when a value cannot be represented in the wire encoding the
/// profile defines for it (§7).
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum EncodingUnrepresentableError {
    /// An EOL option's padding length in bits, `(len-1)*8`, exceeded 255
    /// and so does not fit the item's 8-bit length-in-bits field.
    EolTooLong { length: u8 },

    /// A generic option's content length exceeded 127 bytes, which does
    /// not fit the 7-bit length field of the generic item's second byte.
    GenericOptionTooLong { kind: u8, length: u8 },
}

impl core::fmt::Display for EncodingUnrepresentableError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        use EncodingUnrepresentableError::*;
        match self {
            EolTooLong { length } => write!(
                f,
                "Cannot encode EOL option of length {length}: (length-1)*8 exceeds 255 and does not fit the item's 8-bit bit-length field."
            ),
            GenericOptionTooLong { kind, length } => write!(
                f,
                "Cannot encode generic option of kind {kind} and length {length}: exceeds the 127-byte maximum of the generic item encoding."
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for EncodingUnrepresentableError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}
