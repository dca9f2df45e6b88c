//! Packet payload records.
//!
//! Each wire kind has its own payload struct; [`Packet`] is the closed union
//! over all of them. Payloads carry only names, ids, counts and text.

use crate::Address;
use serde::{Deserialize, Serialize};

/// Outcome of a login handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoginResult {
    Success,
    Denied,
}

/// Outcome code of a start/stop request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseCode {
    Success,
    Error,
}

/// How a peer should display a broadcast text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextKind {
    Message,
    Popup,
    Tip,
    Title,
    ActionBar,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub server: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub result: LoginResult,
}

/// Sent by a server once it has received the controller's login response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub server: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchCommand {
    pub server: String,
    pub command_line: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveServer {
    pub server: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotifyStatusUpdate {
    pub player: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerJoin {
    pub name: String,
    pub address: Address,
    pub uuid: String,
    pub xuid: String,
    pub current_server: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerQuit {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyPlayerJoin {
    pub name: String,
    pub address: Address,
    pub uuid: String,
    pub xuid: String,
    pub current_proxy: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyPlayerQuit {
    pub name: String,
}

/// Log line pushed from the controller to a peer console.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Log {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Text {
    pub message: String,
    pub kind: TextKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerKick {
    pub player: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartServerRequest {
    pub player: String,
    pub template: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartServerResponse {
    pub player: String,
    pub message: String,
    pub code: ResponseCode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopServerRequest {
    pub player: String,
    pub server: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopServerResponse {
    pub player: String,
    pub message: String,
    pub code: ResponseCode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListServersRequest {
    pub player: String,
}

/// One row of a list-servers response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSummary {
    pub name: String,
    pub port: u16,
    pub players: u32,
    pub max_players: u32,
    /// Template name prefixed with a colour code for its kind.
    pub template: String,
    /// Colour-coded status label, empty for unknown states.
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListServersResponse {
    pub player: String,
    pub servers: Vec<ServerSummary>,
}

/// Console line a peer forwards to the controller's log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogForward {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Test {
    pub payload: String,
}

/// Every message that can travel over the control plane.
///
/// `Invalid` is what the decoder yields for bytes it cannot map to a kind.
/// It carries nothing and is never dispatched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Packet {
    LoginRequest(LoginRequest),
    LoginResponse(LoginResponse),
    Connection(Connection),
    DispatchCommand(DispatchCommand),
    SaveServer(SaveServer),
    NotifyStatusUpdate(NotifyStatusUpdate),
    PlayerJoin(PlayerJoin),
    PlayerQuit(PlayerQuit),
    ProxyPlayerJoin(ProxyPlayerJoin),
    ProxyPlayerQuit(ProxyPlayerQuit),
    Log(Log),
    Text(Text),
    PlayerKick(PlayerKick),
    StartServerRequest(StartServerRequest),
    StartServerResponse(StartServerResponse),
    StopServerRequest(StopServerRequest),
    StopServerResponse(StopServerResponse),
    ListServersRequest(ListServersRequest),
    ListServersResponse(ListServersResponse),
    LogForward(LogForward),
    Test(Test),
    Invalid,
}

impl Packet {
    pub fn login_request(server: impl Into<String>) -> Self {
        Packet::LoginRequest(LoginRequest {
            server: server.into(),
        })
    }

    pub fn login_response(result: LoginResult) -> Self {
        Packet::LoginResponse(LoginResponse { result })
    }

    pub fn start_server_response(
        player: impl Into<String>,
        message: impl Into<String>,
        code: ResponseCode,
    ) -> Self {
        Packet::StartServerResponse(StartServerResponse {
            player: player.into(),
            message: message.into(),
            code,
        })
    }

    pub fn stop_server_response(
        player: impl Into<String>,
        message: impl Into<String>,
        code: ResponseCode,
    ) -> Self {
        Packet::StopServerResponse(StopServerResponse {
            player: player.into(),
            message: message.into(),
            code,
        })
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, Packet::Invalid)
    }
}
