//! # Cloud Bridge Library
//!
//! Peer side of the cloud control plane. A bridge runs next to (or inside) one
//! game server or proxy, logs in to the controller under that server's name
//! and relays requests to it.
//!
//! ## Session Model
//!
//! The controller trusts a bridge by its source address. After a successful
//! login the bridge keeps the same socket for every later request; a new
//! socket would be an unknown sender and its packets would be dropped. A
//! second login under a name that already has a session is answered but does
//! not move the session.
//!
//! ## Module Organization
//!
//! ### Client Module (`client`)
//! The UDP socket towards the controller: login handshake, fire-and-forget
//! sends and request/reply with a timeout.
//!
//! ### Action Module (`action`)
//! Command-line subcommands and the packet each one maps to.
//!
//! ### Format Module (`format`)
//! Turns replies into plain terminal text, colour codes removed.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use bridge::client::BridgeClient;
//! use protocol::{ListServersRequest, Packet, PacketKind};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = BridgeClient::connect("127.0.0.1:3656", "Lobby-1", Duration::from_secs(2)).await?;
//!     client.login().await?;
//!
//!     let request = Packet::ListServersRequest(ListServersRequest {
//!         player: "CONSOLE".to_string(),
//!     });
//!     let reply = client.request(&request, PacketKind::ListServersResponse).await?;
//!     println!("{}", bridge::format::format_reply(&reply));
//!     Ok(())
//! }
//! ```

pub mod action;
pub mod client;
pub mod error;
pub mod format;

pub use error::BridgeError;
