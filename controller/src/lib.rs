//! # Cloud Controller Library
//!
//! This library provides the control plane of the cloud fleet manager. Game
//! servers and proxies of the fleet run as separate processes; each one talks
//! to the controller through a bridge over UDP. The controller authenticates
//! those bridges and turns their packets into fleet and player operations.
//!
//! ## Core Responsibilities
//!
//! ### Peer Authentication
//! A bridge proves nothing about itself except the server name it claims. A
//! login is accepted only if that name belongs to a known server, and the
//! sender address is then bound to the name. Every later packet is trusted
//! by its source address alone.
//!
//! ### Dispatch
//! Authenticated packets are routed to the fleet (start, stop, list, command,
//! save), to the player directory (join, quit, notify toggles), to the log, or
//! fanned out to every connected bridge (chat, kicks).
//!
//! ## Architecture Design
//!
//! ### Single Poll Path
//! All state lives in one [`engine::ControlPlane`]. A tokio interval calls
//! [`engine::ControlPlane::poll`] once per tick; each call handles at most one
//! datagram from receive to reply. There are no locks and no background
//! tasks touching the registry.
//!
//! ### Collaborators
//! Fleet inventory and player presence sit behind the [`fleet::Fleet`] and
//! [`players::Players`] traits. The crate ships in-memory versions of both.
//!
//! ## Module Organization
//!
//! - `engine`: poll step, trust gate, dispatch table, send and broadcast
//! - `sessions`: server name to address bindings
//! - `transport`: non-blocking UDP socket handle
//! - `perimeter`: host allow-list checked before decoding
//! - `fleet`, `players`: collaborator traits and in-memory implementations
//! - `config`: TOML configuration with defaults
//! - `runtime`: the tick scheduler
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use controller::config::Config;
//! use controller::engine::ControlPlane;
//! use controller::fleet::LocalFleet;
//! use controller::perimeter::AllowList;
//! use controller::players::PlayerDirectory;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load(None)?;
//!     let fleet = LocalFleet::new(config.templates.clone())?;
//!     let perimeter = AllowList::new(&config.host, config.trusted_hosts.clone());
//!
//!     let mut engine = ControlPlane::bind(
//!         &config.bind_addr(),
//!         perimeter,
//!         fleet,
//!         PlayerDirectory::new(),
//!     )?;
//!
//!     let shutdown = async {
//!         let _ = tokio::signal::ctrl_c().await;
//!     };
//!     controller::runtime::run(&mut engine, Duration::from_millis(config.tick_ms), shutdown).await;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod fleet;
pub mod perimeter;
pub mod players;
pub mod runtime;
pub mod sessions;
pub mod transport;

pub use error::ControlError;
