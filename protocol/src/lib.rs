//! Wire protocol shared by the cloud controller and its bridges.
//!
//! Every datagram starts with a one-byte packet tag followed by the
//! bincode-encoded payload of that packet kind. See [`registry`] for the
//! tag table and the decoder.

pub mod address;
pub mod packet;
pub mod registry;

pub use address::Address;
pub use packet::*;
pub use registry::{decode, encode, EncodeError, PacketKind, INVALID_TAG, MAX_DATAGRAM_SIZE};

/// Default UDP port the controller listens on.
pub const DEFAULT_PORT: u16 = 3656;

/// Player name used for requests issued from a server console.
pub const CONSOLE_PLAYER: &str = "CONSOLE";
