//! External collaborators this core depends on but does not implement
//! (§1 "Out of scope", §6). Modeling them as traits keeps the core
//! decoupled from the enclosing ROHC engine and lets tests supply
//! deterministic fakes, per the "out-parameter style" design note in
//! the specification (multi-valued returns over in/out pointers).

/// The W-LSB feasibility oracle: can `value`'s least-significant `k_bits`
/// bits, interpreted with the given `shift`, be losslessly reconstructed
/// from `window`?
pub trait WlsbOracle {
    fn is_kp_possible_32bits(&self, value: u32, k_bits: u8, shift: i8) -> bool;
}

/// No-op oracle useful for tests that don't care about W-LSB feasibility:
/// always reports the smallest width as possible.
impl WlsbOracle for () {
    fn is_kp_possible_32bits(&self, _value: u32, _k_bits: u8, _shift: i8) -> bool {
        true
    }
}

/// The SACK block encoder (`sack_code` in §1).
pub trait SackEncoder {
    /// Encodes `blocks` (ack-relative), returning the number of bytes
    /// written into `out`, or an error if `out` is too small.
    fn sack_code(
        &self,
        ack_num: u32,
        blocks: &[(u32, u32)],
        unchanged: bool,
        out: &mut [u8],
    ) -> Result<usize, crate::err::BufferTooSmallError>;
}

/// The TS LSB encoder (`ts_lsb_code` in §1).
pub trait TsLsbEncoder {
    /// Encodes `value` using at most `byte_budget` bytes (`1..=4`),
    /// returning the number of bytes written.
    fn ts_lsb_code(
        &self,
        value: u32,
        byte_budget: u8,
        out: &mut [u8],
    ) -> Result<usize, crate::err::BufferTooSmallError>;
}
