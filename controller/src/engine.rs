//! Control-plane engine: one poll step per scheduler tick.
//!
//! Each step takes at most one datagram off the socket and runs it through
//! perimeter check, decode, trust gate and dispatch. Nothing here blocks and
//! nothing is queued; every side effect happens inside the step.

use crate::error::ControlError;
use crate::fleet::{Fleet, ServerStatus, Template, TemplateKind};
use crate::perimeter::AllowList;
use crate::players::{Player, Players};
use crate::sessions::SessionRegistry;
use crate::transport::{Datagram, Transport};
use log::{debug, error, info, warn};
use protocol::{
    decode, encode, Address, ListServersResponse, LoginResult, Packet, PacketKind, PlayerJoin,
    ProxyPlayerJoin, ResponseCode, ServerSummary, StartServerRequest, StopServerRequest,
};
use std::io;
use std::net::SocketAddr;

/// Log target for console lines forwarded by peers.
pub const FORWARD_TARGET: &str = "cloud::forward";

/// What a single poll step did with the socket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// No datagram was queued.
    Idle,
    /// Sender is outside the perimeter allow-list.
    Rejected(Address),
    Dropped(DropReason),
    /// Login accepted for the named server.
    Authenticated(String),
    /// Login refused for the named server.
    Denied(String),
    /// Packet from a verified peer went through the dispatch table.
    Dispatched(PacketKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// Unknown tag or malformed payload.
    Undecodable,
    /// Non-login packet from a sender without a session.
    Unauthenticated,
}

/// Owns the control-plane socket and the session registry and dispatches
/// authenticated packets to the fleet and player collaborators.
pub struct ControlPlane<F: Fleet, P: Players> {
    transport: Transport,
    sessions: SessionRegistry,
    perimeter: AllowList,
    fleet: F,
    players: P,
}

impl<F: Fleet, P: Players> ControlPlane<F, P> {
    /// Binds the control-plane socket. Failing to bind is fatal.
    pub fn bind(
        addr: &str,
        perimeter: AllowList,
        fleet: F,
        players: P,
    ) -> Result<Self, ControlError> {
        info!("Binding to {}...", addr);
        let transport = Transport::bind(addr).map_err(|source| ControlError::Bind {
            addr: addr.to_string(),
            source,
        })?;
        info!("Successfully bound to {}", addr);

        Ok(Self {
            transport,
            sessions: SessionRegistry::new(),
            perimeter,
            fleet,
            players,
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.transport.local_addr()
    }

    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    pub fn fleet(&self) -> &F {
        &self.fleet
    }

    pub fn fleet_mut(&mut self) -> &mut F {
        &mut self.fleet
    }

    pub fn players(&self) -> &P {
        &self.players
    }

    pub fn is_verified(&self, address: &Address) -> bool {
        self.sessions.is_verified(address)
    }

    pub fn is_server_verified(&self, server: &str) -> bool {
        self.sessions.is_server_verified(server)
    }

    pub fn session_name_for(&self, address: &Address) -> Option<&str> {
        self.sessions.session_name_for(address)
    }

    pub fn client_for(&self, server: &str) -> Option<&Address> {
        self.sessions.client_for(server)
    }

    pub fn verify(&mut self, server: &str, address: Address) -> bool {
        self.sessions.verify(server, address)
    }

    /// Revokes the session of `server`. Used when a server goes away.
    pub fn unverify(&mut self, server: &str) -> Option<Address> {
        self.sessions.unverify(server)
    }

    /// Processes at most one inbound datagram end to end.
    pub fn poll(&mut self) -> PollOutcome {
        let Datagram { payload, from } = match self.transport.try_recv() {
            Ok(Some(datagram)) => datagram,
            Ok(None) => return PollOutcome::Idle,
            Err(e) => {
                warn!("Error receiving datagram: {}", e);
                return PollOutcome::Idle;
            }
        };

        if !self.perimeter.permits(&from.host) {
            warn!("Received a packet from an external client ({})", from);
            return PollOutcome::Rejected(from);
        }

        let packet = decode(&payload);
        let Some(kind) = packet.kind() else {
            debug!("Dropping {} undecodable bytes from {}", payload.len(), from);
            return PollOutcome::Dropped(DropReason::Undecodable);
        };

        if !self.sessions.is_verified(&from) {
            return self.handle_unverified(packet, from);
        }

        self.dispatch(packet, &from);
        PollOutcome::Dispatched(kind)
    }

    fn handle_unverified(&mut self, packet: Packet, client: Address) -> PollOutcome {
        let request = match packet {
            Packet::LoginRequest(request) => request,
            other => {
                debug!("Dropping {:?} from unverified sender {}", other.kind(), client);
                return PollOutcome::Dropped(DropReason::Unauthenticated);
            }
        };

        if self.fleet.find_server(&request.server).is_none() {
            warn!(
                "Received a login request from a not existing server! ({})",
                request.server
            );
            self.send_packet(&Packet::login_response(LoginResult::Denied), &client);
            return PollOutcome::Denied(request.server);
        }

        if self.sessions.verify(&request.server, client.clone()) {
            info!("The server {} was verified", request.server);
        } else {
            warn!(
                "The server {} is already verified, keeping its existing session",
                request.server
            );
        }
        self.send_packet(&Packet::login_response(LoginResult::Success), &client);
        PollOutcome::Authenticated(request.server)
    }

    fn dispatch(&mut self, packet: Packet, client: &Address) {
        match packet {
            Packet::Connection(ack) => {
                if self.fleet.find_server(&ack.server).is_some() {
                    self.fleet.mark_connection_response(&ack.server);
                }
            }
            Packet::DispatchCommand(command) => {
                if self.fleet.find_server(&command.server).is_some() {
                    self.fleet
                        .dispatch_command(&command.server, &command.command_line);
                }
            }
            Packet::SaveServer(save) => {
                if self.fleet.find_server(&save.server).is_some() {
                    self.fleet.save_server(&save.server);
                }
            }
            Packet::NotifyStatusUpdate(update) => {
                self.players.set_notify(&update.player, update.enabled);
            }
            Packet::PlayerJoin(join) => self.handle_player_join(join),
            // Presence is cleared even when the record is already gone: the
            // server and proxy quits for one player arrive in either order.
            Packet::PlayerQuit(quit) => {
                if self.players.find_player(&quit.name).is_some() {
                    self.players.set_current_server(&quit.name, "");
                    self.players.on_logout(&quit.name);
                }
                self.players.untrack_on_server(&quit.name);
            }
            Packet::ProxyPlayerJoin(join) => self.handle_proxy_player_join(join),
            Packet::ProxyPlayerQuit(quit) => {
                if self.players.find_player(&quit.name).is_some() {
                    self.players.set_current_proxy(&quit.name, "");
                    self.players.on_logout(&quit.name);
                }
                self.players.forget_last_proxy(&quit.name);
                self.players.untrack_on_proxy(&quit.name);
            }
            Packet::LogForward(log) => {
                if let Some(server) = self.sessions.session_name_for(client) {
                    info!(target: FORWARD_TARGET, "{}: {}", server, log.message);
                }
            }
            packet @ (Packet::Text(_) | Packet::PlayerKick(_)) => {
                self.broadcast_packet(&packet);
            }
            Packet::StartServerRequest(request) => self.handle_start_server(request, client),
            Packet::StopServerRequest(request) => self.handle_stop_server(request, client),
            Packet::ListServersRequest(request) => {
                let servers = self
                    .fleet
                    .list_servers()
                    .into_iter()
                    .map(|server| ServerSummary {
                        name: server.name.clone(),
                        port: server.port,
                        players: server.player_count,
                        max_players: server.template.max_players,
                        template: template_label(&server.template),
                        status: status_label(server.status).to_string(),
                    })
                    .collect();
                let response = Packet::ListServersResponse(ListServersResponse {
                    player: request.player,
                    servers,
                });
                self.send_packet(&response, client);
            }
            ignored @ (Packet::LoginRequest(_)
            | Packet::LoginResponse(_)
            | Packet::Log(_)
            | Packet::StartServerResponse(_)
            | Packet::StopServerResponse(_)
            | Packet::ListServersResponse(_)
            | Packet::Test(_)
            | Packet::Invalid) => {
                debug!("Ignoring {:?} from {}", ignored.kind(), client);
            }
        }
    }

    fn handle_player_join(&mut self, join: PlayerJoin) {
        if let Some(player) = self.players.find_player(&join.name) {
            if player.current_server.is_empty() {
                self.players
                    .set_current_server(&join.name, &join.current_server);
            }
            self.players.track_on_server(&join.name);
            return;
        }

        let current_proxy = self
            .players
            .last_known_proxy(&join.name)
            .map(str::to_string)
            .unwrap_or_default();
        let player = Player {
            name: join.name.clone(),
            address: join.address,
            uuid: join.uuid,
            xuid: join.xuid,
            current_server: join.current_server,
            current_proxy,
        };
        let behind_proxy = !player.current_proxy.is_empty();

        self.players.on_login(player);
        self.players.track_on_server(&join.name);
        if behind_proxy {
            self.players.track_on_proxy(&join.name);
        }
    }

    fn handle_proxy_player_join(&mut self, join: ProxyPlayerJoin) {
        let name = join.name.clone();
        self.players.on_login(Player {
            name: join.name,
            address: join.address,
            uuid: join.uuid,
            xuid: join.xuid,
            current_server: String::new(),
            current_proxy: join.current_proxy,
        });
        self.players.track_on_proxy(&name);
    }

    fn handle_start_server(&mut self, request: StartServerRequest, client: &Address) {
        let Some(template) = self.fleet.find_template(&request.template).cloned() else {
            let message = format!("§cThe template §e{} §cdoesn't exist!", request.template);
            let response = Packet::start_server_response(request.player, message, ResponseCode::Error);
            self.send_packet(&response, client);
            return;
        };

        if self.fleet.running_instances(&template) >= template.max_servers as usize {
            let message = format!(
                "§cNo servers from the template §e{} §ccan be started anymore because the limit was reached!",
                template.name
            );
            let response = Packet::start_server_response(request.player, message, ResponseCode::Error);
            self.send_packet(&response, client);
            return;
        }

        let response = Packet::start_server_response(request.player, "", ResponseCode::Success);
        self.send_packet(&response, client);
        self.fleet.start_instances(&template, request.count);
    }

    fn handle_stop_server(&mut self, request: StopServerRequest, client: &Address) {
        // "all" is acknowledged but nothing is stopped here.
        if request.server == "all" || request.server == "*" {
            let response = Packet::stop_server_response(request.player, "", ResponseCode::Success);
            self.send_packet(&response, client);
            return;
        }

        if let Some(template) = self.fleet.find_template(&request.server).cloned() {
            let response = Packet::stop_server_response(request.player, "", ResponseCode::Success);
            self.send_packet(&response, client);
            for name in self.fleet.stop_template(&template) {
                self.sessions.unverify(&name);
            }
        } else if self.fleet.find_server(&request.server).is_some() {
            let response = Packet::stop_server_response(request.player, "", ResponseCode::Success);
            self.send_packet(&response, client);
            self.fleet.stop_server(&request.server);
            self.sessions.unverify(&request.server);
        } else {
            let message = format!("§cThe server §e{} §cdoesn't exist!", request.server);
            let response = Packet::stop_server_response(request.player, message, ResponseCode::Error);
            self.send_packet(&response, client);
        }
    }

    /// Encodes `packet` and sends it to one peer.
    pub fn send_packet(&self, packet: &Packet, client: &Address) {
        let bytes = match encode(packet) {
            Ok(bytes) => bytes,
            Err(e) => {
                error!("Failed to encode {:?} for {}: {}", packet.kind(), client, e);
                return;
            }
        };
        if let Err(e) = self.transport.send_to(&bytes, client) {
            error!("Failed to send packet to {}: {}", client, e);
        }
    }

    /// Sends `packet` to the session bound to `server`, if there is one.
    pub fn send_to_server(&self, server: &str, packet: &Packet) -> bool {
        match self.sessions.client_for(server) {
            Some(client) => {
                self.send_packet(packet, client);
                true
            }
            None => false,
        }
    }

    /// Sends the same encoded bytes to every verified peer and returns the
    /// number of sends attempted.
    pub fn broadcast_packet(&self, packet: &Packet) -> usize {
        let bytes = match encode(packet) {
            Ok(bytes) => bytes,
            Err(e) => {
                error!("Failed to encode broadcast {:?}: {}", packet.kind(), e);
                return 0;
            }
        };

        let mut sent = 0;
        for (server, client) in self.sessions.iter() {
            sent += 1;
            if let Err(e) = self.transport.send_to(&bytes, client) {
                error!("Failed to send to server {}: {}", server, e);
            }
        }
        sent
    }
}

/// Template name colour-coded by kind.
pub fn template_label(template: &Template) -> String {
    match template.kind {
        TemplateKind::Server => format!("§e{}", template.name),
        TemplateKind::Proxy => format!("§c{}", template.name),
    }
}

/// Display label of a server status; empty for states without one.
pub fn status_label(status: ServerStatus) -> &'static str {
    match status {
        ServerStatus::Starting => "§2STARTING",
        ServerStatus::Started => "§aSTARTED",
        ServerStatus::Stopping => "§4STOPPING",
        ServerStatus::Stopped => "§cSTOPPED",
        _ => "",
    }
}
