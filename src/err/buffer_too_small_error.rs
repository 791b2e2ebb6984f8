/// Returned by the wire encoder (§4.D) when a caller-supplied output
/// buffer cannot hold the required bytes.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct BufferTooSmallError {
    /// What was being written when the buffer ran out (e.g. "XI block",
    /// "MSS item", "SACK irregular").
    pub what: &'static str,
    /// Number of bytes that would have been required.
    pub required_len: usize,
    /// Number of bytes actually available in the caller's buffer.
    pub available_len: usize,
}

impl core::fmt::Display for BufferTooSmallError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "Buffer too small while encoding {}: {} byte(s) required, {} byte(s) available.",
            self.what, self.required_len, self.available_len
        )
    }
}

#[cfg(feature = "std")]
impl std::error::Error for BufferTooSmallError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}
