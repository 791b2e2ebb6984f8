//! TCP-options compression core for the compressor side of a ROHC-TCP
//! (RFC 6846) profile.
//!
//! Given a TCP header's raw options block and a per-flow compression
//! context, this crate:
//!
//! 1. Validates the options against the profile's acceptance rules
//!    ([`acceptor::accept`]).
//! 2. Assigns each option a stable small index and classifies what kind
//!    of change, if any, occurred relative to the previous packet
//!    ([`index::get_index`], [`change::detect_changes`]).
//! 3. Emits the compressed list-item encoding and the irregular-chain
//!    encoding ([`wire::code_list_item`], [`wire::code_irregular`]).
//!
//! [`compressor::compress_options`] ties the pipeline together for one
//! packet; [`compressor::commit`] applies the resulting state transitions
//! to the context once the caller has successfully emitted the packet.
//!
//! # Usage
//!
//! Add the following to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! rohc-tcp-opts = "0.1"
//! ```
//!
//! This crate does not parse the outer TCP/IP headers, perform W-LSB
//! feasibility analysis, or encode SACK blocks and TS LSB values on the
//! wire: those are external collaborators, modeled here as the
//! [`collab::WlsbOracle`], [`collab::SackEncoder`], and
//! [`collab::TsLsbEncoder`] traits so the enclosing ROHC engine can supply
//! its own implementations.
//!
//! # References
//!
//! * RObust Header Compression (ROHC): A Profile for TCP/IP [RFC 6846](https://datatracker.ietf.org/doc/html/rfc6846)
//! * Transmission Control Protocol [RFC 793](https://datatracker.ietf.org/doc/html/rfc793)
//! * TCP Extensions for High Performance [RFC 7323](https://datatracker.ietf.org/doc/html/rfc7323)
//! * TCP Selective Acknowledgment Options [RFC 2018](https://datatracker.ietf.org/doc/html/rfc2018)

// Removes all std and alloc default imports & enables "non std" support.
#![no_std]

#[cfg(test)]
extern crate alloc;
#[cfg(test)]
extern crate proptest;
#[cfg(any(feature = "std", test))]
extern crate std;

/// Error types surfaced by the core.
pub mod err;

pub mod acceptor;
pub mod change;
pub mod collab;
pub mod compressor;
pub mod constants;
pub mod context;
pub mod index;
pub mod option_kind;
pub mod wire;

pub use acceptor::{accept, AcceptedOptions, OptionDescriptor};
pub use change::{detect_changes, ChangeKind, DetectedChanges, IndexChange};
pub use compressor::{commit, compress_options, CompressedOptions};
pub use context::{IndexSlot, OptionsContext, TsWindow};
pub use index::{get_index, Allocation};
pub use option_kind::OptionKind;
