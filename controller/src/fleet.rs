//! Fleet inventory consumed by the control plane.
//!
//! The engine only talks to the [`Fleet`] trait. [`LocalFleet`] is an
//! in-memory inventory driven by the configured templates; it records
//! lifecycle transitions but does not spawn server processes.

use log::{info, warn};
use serde::Deserialize;
use std::collections::BTreeMap;

use crate::error::ControlError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateKind {
    Server,
    Proxy,
}

fn default_kind() -> TemplateKind {
    TemplateKind::Server
}

/// How to provision one class of server instances.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Template {
    pub name: String,
    #[serde(default = "default_kind")]
    pub kind: TemplateKind,
    /// Upper bound on concurrently running instances.
    pub max_servers: u32,
    /// Instances started when the fleet is created.
    #[serde(default)]
    pub min_servers: u32,
    pub max_players: u32,
    /// First port handed out to instances of this template.
    pub start_port: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerStatus {
    Starting,
    Started,
    Stopping,
    Stopped,
    Offline,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Server {
    pub name: String,
    pub port: u16,
    pub template: Template,
    pub status: ServerStatus,
    pub player_count: u32,
    pub got_connection_response: bool,
}

/// Fleet operations the dispatch step needs.
pub trait Fleet {
    fn find_server(&self, name: &str) -> Option<&Server>;
    fn find_template(&self, name: &str) -> Option<&Template>;
    fn running_instances(&self, template: &Template) -> usize;
    fn start_instances(&mut self, template: &Template, count: u32);
    /// Stops one server. Returns false if it does not exist.
    fn stop_server(&mut self, name: &str) -> bool;
    /// Stops every instance of a template and returns the stopped names.
    fn stop_template(&mut self, template: &Template) -> Vec<String>;
    fn dispatch_command(&mut self, server: &str, command_line: &str);
    fn save_server(&mut self, server: &str);
    fn list_servers(&self) -> Vec<&Server>;
    fn mark_connection_response(&mut self, server: &str);
}

/// In-memory fleet inventory.
#[derive(Debug, Default)]
pub struct LocalFleet {
    templates: BTreeMap<String, Template>,
    servers: BTreeMap<String, Server>,
}

impl LocalFleet {
    /// Builds the inventory and starts `min_servers` of every template.
    pub fn new(templates: Vec<Template>) -> Result<Self, ControlError> {
        let mut fleet = Self::default();
        for template in templates {
            if fleet.templates.contains_key(&template.name) {
                return Err(ControlError::DuplicateTemplate(template.name));
            }
            fleet.templates.insert(template.name.clone(), template);
        }

        let initial: Vec<Template> = fleet
            .templates
            .values()
            .filter(|t| t.min_servers > 0)
            .cloned()
            .collect();
        for template in initial {
            fleet.start_instances(&template, template.min_servers);
        }
        Ok(fleet)
    }

    pub fn set_status(&mut self, server: &str, status: ServerStatus) {
        if let Some(server) = self.servers.get_mut(server) {
            server.status = status;
        }
    }

    pub fn set_player_count(&mut self, server: &str, count: u32) {
        if let Some(server) = self.servers.get_mut(server) {
            server.player_count = count;
        }
    }

    pub fn templates(&self) -> impl Iterator<Item = &Template> {
        self.templates.values()
    }

    fn next_free_name(&self, template: &Template) -> String {
        (1..)
            .map(|n| format!("{}-{}", template.name, n))
            .find(|name| !self.servers.contains_key(name))
            .unwrap_or_else(|| template.name.clone())
    }

    fn next_free_port(&self, template: &Template) -> Option<u16> {
        (template.start_port..=u16::MAX).find(|port| self.servers.values().all(|s| s.port != *port))
    }
}

impl Fleet for LocalFleet {
    fn find_server(&self, name: &str) -> Option<&Server> {
        self.servers.get(name)
    }

    fn find_template(&self, name: &str) -> Option<&Template> {
        self.templates.get(name)
    }

    fn running_instances(&self, template: &Template) -> usize {
        self.servers
            .values()
            .filter(|s| s.template.name == template.name)
            .count()
    }

    fn start_instances(&mut self, template: &Template, count: u32) {
        let room = (template.max_servers as usize).saturating_sub(self.running_instances(template));
        let count = (count as usize).min(room);

        for _ in 0..count {
            let Some(port) = self.next_free_port(template) else {
                warn!("No free port left for template {}", template.name);
                return;
            };
            let name = self.next_free_name(template);
            info!("Starting server {} on port {}", name, port);
            self.servers.insert(
                name.clone(),
                Server {
                    name,
                    port,
                    template: template.clone(),
                    status: ServerStatus::Starting,
                    player_count: 0,
                    got_connection_response: false,
                },
            );
        }
    }

    fn stop_server(&mut self, name: &str) -> bool {
        match self.servers.remove(name) {
            Some(server) => {
                info!("Stopped server {} (port {})", server.name, server.port);
                true
            }
            None => false,
        }
    }

    fn stop_template(&mut self, template: &Template) -> Vec<String> {
        let names: Vec<String> = self
            .servers
            .values()
            .filter(|s| s.template.name == template.name)
            .map(|s| s.name.clone())
            .collect();
        for name in &names {
            self.stop_server(name);
        }
        names
    }

    fn dispatch_command(&mut self, server: &str, command_line: &str) {
        if self.servers.contains_key(server) {
            info!("Dispatching command to {}: {}", server, command_line);
        }
    }

    fn save_server(&mut self, server: &str) {
        if self.servers.contains_key(server) {
            info!("Saving server {}", server);
        }
    }

    fn list_servers(&self) -> Vec<&Server> {
        self.servers.values().collect()
    }

    fn mark_connection_response(&mut self, server: &str) {
        if let Some(server) = self.servers.get_mut(server) {
            server.got_connection_response = true;
            if server.status == ServerStatus::Starting {
                server.status = ServerStatus::Started;
            }
        }
    }
}

#[cfg(test)]
pub(crate) fn template(name: &str, kind: TemplateKind, max_servers: u32, max_players: u32) -> Template {
    Template {
        name: name.to_string(),
        kind,
        max_servers,
        min_servers: 0,
        max_players,
        start_port: 19133,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_duplicate_templates() {
        let result = LocalFleet::new(vec![
            template("Lobby", TemplateKind::Server, 2, 20),
            template("Lobby", TemplateKind::Server, 3, 20),
        ]);
        assert!(matches!(result, Err(ControlError::DuplicateTemplate(name)) if name == "Lobby"));
    }

    #[test]
    fn test_min_servers_started_on_creation() {
        let mut lobby = template("Lobby", TemplateKind::Server, 3, 20);
        lobby.min_servers = 2;
        let fleet = LocalFleet::new(vec![lobby.clone()]).unwrap();

        assert_eq!(fleet.running_instances(&lobby), 2);
        assert!(fleet.find_server("Lobby-1").is_some());
        assert!(fleet.find_server("Lobby-2").is_some());
    }

    #[test]
    fn test_start_assigns_names_and_ports() {
        let game = template("Game", TemplateKind::Server, 5, 10);
        let mut fleet = LocalFleet::new(vec![game.clone()]).unwrap();
        fleet.start_instances(&game, 2);

        let first = fleet.find_server("Game-1").unwrap();
        let second = fleet.find_server("Game-2").unwrap();
        assert_eq!(first.port, 19133);
        assert_eq!(second.port, 19134);
        assert_eq!(first.status, ServerStatus::Starting);
    }

    #[test]
    fn test_start_is_capped_by_max_servers() {
        let game = template("Game", TemplateKind::Server, 2, 10);
        let mut fleet = LocalFleet::new(vec![game.clone()]).unwrap();
        fleet.start_instances(&game, 5);
        assert_eq!(fleet.running_instances(&game), 2);
    }

    #[test]
    fn test_stopped_names_are_reused() {
        let game = template("Game", TemplateKind::Server, 3, 10);
        let mut fleet = LocalFleet::new(vec![game.clone()]).unwrap();
        fleet.start_instances(&game, 2);
        assert!(fleet.stop_server("Game-1"));
        fleet.start_instances(&game, 1);

        let restarted = fleet.find_server("Game-1").unwrap();
        assert_eq!(restarted.port, 19133);
    }

    #[test]
    fn test_stop_template_returns_stopped_names() {
        let game = template("Game", TemplateKind::Server, 3, 10);
        let lobby = template("Lobby", TemplateKind::Server, 1, 10);
        let mut fleet = LocalFleet::new(vec![game.clone(), lobby.clone()]).unwrap();
        fleet.start_instances(&game, 2);
        fleet.start_instances(&lobby, 1);

        let stopped = fleet.stop_template(&game);
        assert_eq!(stopped, vec!["Game-1".to_string(), "Game-2".to_string()]);
        assert_eq!(fleet.running_instances(&game), 0);
        assert_eq!(fleet.running_instances(&lobby), 1);
    }

    #[test]
    fn test_stop_unknown_server() {
        let mut fleet = LocalFleet::new(Vec::new()).unwrap();
        assert!(!fleet.stop_server("ghost"));
    }

    #[test]
    fn test_connection_response_marks_started() {
        let game = template("Game", TemplateKind::Server, 1, 10);
        let mut fleet = LocalFleet::new(vec![game.clone()]).unwrap();
        fleet.start_instances(&game, 1);
        fleet.mark_connection_response("Game-1");

        let server = fleet.find_server("Game-1").unwrap();
        assert!(server.got_connection_response);
        assert_eq!(server.status, ServerStatus::Started);
    }

    #[test]
    fn test_template_from_toml() {
        let parsed: Template = toml::from_str(
            r#"
            name = "Proxy"
            kind = "proxy"
            max_servers = 1
            max_players = 100
            start_port = 19132
            "#,
        )
        .unwrap();
        assert_eq!(parsed.kind, TemplateKind::Proxy);
        assert_eq!(parsed.min_servers, 0);
    }
}
