//! Player presence bookkeeping consumed by the control plane.

use log::info;
use protocol::Address;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub name: String,
    pub address: Address,
    pub uuid: String,
    pub xuid: String,
    /// Empty when the player is not on a game server.
    pub current_server: String,
    /// Empty when the player is not behind a proxy.
    pub current_proxy: String,
}

/// Player registry operations the dispatch step needs. All lookups are by
/// player name; operations on unknown players are no-ops.
pub trait Players {
    fn find_player(&self, name: &str) -> Option<&Player>;
    fn on_login(&mut self, player: Player);
    fn on_logout(&mut self, name: &str);
    fn track_on_server(&mut self, name: &str);
    fn untrack_on_server(&mut self, name: &str);
    fn track_on_proxy(&mut self, name: &str);
    fn untrack_on_proxy(&mut self, name: &str);
    fn last_known_proxy(&self, name: &str) -> Option<&str>;
    fn forget_last_proxy(&mut self, name: &str);
    fn set_current_server(&mut self, name: &str, server: &str);
    fn set_current_proxy(&mut self, name: &str, proxy: &str);
    fn set_notify(&mut self, name: &str, enabled: bool);
}

/// In-memory player registry.
///
/// A logout drops the player record but keeps the last proxy the player was
/// seen on, so a player hopping between game servers behind the same proxy
/// keeps its proxy association when it rejoins.
#[derive(Debug, Default)]
pub struct PlayerDirectory {
    players: HashMap<String, Player>,
    on_server: HashSet<String>,
    on_proxy: HashSet<String>,
    last_proxy: HashMap<String, String>,
    notify: HashMap<String, bool>,
}

impl PlayerDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_on_server(&self, name: &str) -> bool {
        self.on_server.contains(name)
    }

    pub fn is_on_proxy(&self, name: &str) -> bool {
        self.on_proxy.contains(name)
    }

    pub fn notify_enabled(&self, name: &str) -> bool {
        self.notify.get(name).copied().unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

impl Players for PlayerDirectory {
    fn find_player(&self, name: &str) -> Option<&Player> {
        self.players.get(name)
    }

    fn on_login(&mut self, player: Player) {
        info!("Player {} logged in from {}", player.name, player.address);
        if !player.current_proxy.is_empty() {
            self.last_proxy
                .insert(player.name.clone(), player.current_proxy.clone());
        }
        self.players.insert(player.name.clone(), player);
    }

    fn on_logout(&mut self, name: &str) {
        if self.players.remove(name).is_some() {
            info!("Player {} logged out", name);
        }
    }

    fn track_on_server(&mut self, name: &str) {
        self.on_server.insert(name.to_string());
    }

    fn untrack_on_server(&mut self, name: &str) {
        self.on_server.remove(name);
    }

    fn track_on_proxy(&mut self, name: &str) {
        self.on_proxy.insert(name.to_string());
    }

    fn untrack_on_proxy(&mut self, name: &str) {
        self.on_proxy.remove(name);
    }

    fn last_known_proxy(&self, name: &str) -> Option<&str> {
        self.last_proxy.get(name).map(String::as_str)
    }

    fn forget_last_proxy(&mut self, name: &str) {
        self.last_proxy.remove(name);
    }

    fn set_current_server(&mut self, name: &str, server: &str) {
        if let Some(player) = self.players.get_mut(name) {
            player.current_server = server.to_string();
        }
    }

    fn set_current_proxy(&mut self, name: &str, proxy: &str) {
        if let Some(player) = self.players.get_mut(name) {
            player.current_proxy = proxy.to_string();
        }
    }

    fn set_notify(&mut self, name: &str, enabled: bool) {
        self.notify.insert(name.to_string(), enabled);
    }
}
