/// The TCP option kinds this profile knows how to compress.
///
/// This is a closed sum type over the option kinds enumerated in the
/// profile's acceptance rules. The original implementation dispatched
/// per-kind behavior (change detection, item encoding) through a static
/// table of function pointers; `OptionKind` replaces that table so the
/// compiler checks that every kind is handled everywhere it matters.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum OptionKind {
    /// "No operation" padding option. Always 1 byte, content never varies.
    Nop,
    /// "End of option list". Consumes all remaining option bytes.
    Eol,
    /// Maximum segment size. Fixed length 4.
    Mss,
    /// Window scale. Fixed length 3.
    Ws,
    /// Timestamps (TSval/TSecho). Fixed length 10.
    Ts,
    /// SACK permitted. Fixed length 2, content never varies.
    SackPermitted,
    /// SACK blocks. Length `2 + 8*N`, `N` in `1..=4`.
    Sack,
    /// Any other option kind, keyed by its raw TCP option kind byte.
    Generic(u8),
}

impl OptionKind {
    /// Classifies a raw TCP option kind byte.
    #[inline]
    pub const fn from_raw(kind: u8) -> OptionKind {
        match kind {
            raw::EOL => OptionKind::Eol,
            raw::NOP => OptionKind::Nop,
            raw::MSS => OptionKind::Mss,
            raw::WS => OptionKind::Ws,
            raw::SACK_PERMITTED => OptionKind::SackPermitted,
            raw::SACK => OptionKind::Sack,
            raw::TS => OptionKind::Ts,
            other => OptionKind::Generic(other),
        }
    }

    /// The raw TCP option kind byte this value was parsed from or would
    /// serialize as.
    #[inline]
    pub const fn raw(&self) -> u8 {
        match self {
            OptionKind::Eol => raw::EOL,
            OptionKind::Nop => raw::NOP,
            OptionKind::Mss => raw::MSS,
            OptionKind::Ws => raw::WS,
            OptionKind::SackPermitted => raw::SACK_PERMITTED,
            OptionKind::Sack => raw::SACK,
            OptionKind::Ts => raw::TS,
            OptionKind::Generic(kind) => *kind,
        }
    }

    /// True for the two kinds that may legally repeat within one packet
    /// (NOP and EOL); every other kind may appear at most once (§3.3).
    #[inline]
    pub const fn may_repeat(&self) -> bool {
        matches!(self, OptionKind::Nop | OptionKind::Eol)
    }

    /// True for NOP and SACK-Permitted, whose list items are always empty
    /// and therefore useless to transmit in the CO chain (§4.C).
    #[inline]
    pub const fn item_always_empty(&self) -> bool {
        matches!(self, OptionKind::Nop | OptionKind::SackPermitted)
    }
}

/// Raw TCP option kind byte constants, named the way
/// `etherparse::tcp_option` names its `KIND_*` constants.
pub mod raw {
    /// `u8` identifying the "end of options list" TCP option.
    pub const EOL: u8 = 0;
    /// `u8` identifying the "no operation" TCP option.
    pub const NOP: u8 = 1;
    /// `u8` identifying the "maximum segment size" TCP option.
    pub const MSS: u8 = 2;
    /// `u8` identifying the "window scale" TCP option.
    pub const WS: u8 = 3;
    /// `u8` identifying the "SACK permitted" TCP option.
    pub const SACK_PERMITTED: u8 = 4;
    /// `u8` identifying the "SACK" TCP option.
    pub const SACK: u8 = 5;
    /// `u8` identifying the "timestamps" TCP option.
    pub const TS: u8 = 8;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_raw_reserved_kinds() {
        assert_eq!(OptionKind::from_raw(0), OptionKind::Eol);
        assert_eq!(OptionKind::from_raw(1), OptionKind::Nop);
        assert_eq!(OptionKind::from_raw(2), OptionKind::Mss);
        assert_eq!(OptionKind::from_raw(3), OptionKind::Ws);
        assert_eq!(OptionKind::from_raw(4), OptionKind::SackPermitted);
        assert_eq!(OptionKind::from_raw(5), OptionKind::Sack);
        assert_eq!(OptionKind::from_raw(8), OptionKind::Ts);
    }

    #[test]
    fn from_raw_generic() {
        for kind in [6u8, 7, 9, 19, 253, 255] {
            assert_eq!(OptionKind::from_raw(kind), OptionKind::Generic(kind));
        }
    }

    #[test]
    fn raw_round_trip() {
        for kind in 0u8..=255 {
            assert_eq!(OptionKind::from_raw(kind).raw(), kind);
        }
    }

    #[test]
    fn may_repeat() {
        assert!(OptionKind::Nop.may_repeat());
        assert!(OptionKind::Eol.may_repeat());
        assert!(!OptionKind::Mss.may_repeat());
        assert!(!OptionKind::Generic(19).may_repeat());
    }

    #[test]
    fn item_always_empty() {
        assert!(OptionKind::Nop.item_always_empty());
        assert!(OptionKind::SackPermitted.item_always_empty());
        assert!(!OptionKind::Ws.item_always_empty());
    }
}
