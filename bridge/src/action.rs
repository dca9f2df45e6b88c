//! Control requests a bridge can issue, as command-line subcommands.

use clap::Subcommand;
use protocol::{
    DispatchCommand, ListServersRequest, LogForward, Packet, PacketKind, SaveServer,
    StartServerRequest, StopServerRequest, Text, TextKind,
};

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Only perform the login handshake
    Login,
    /// Start servers from a template
    Start {
        template: String,
        /// Number of instances to start
        #[arg(short, long, default_value_t = 1)]
        count: u32,
    },
    /// Stop a server, every server of a template, or "all"
    Stop { target: String },
    /// List every server of the fleet
    List,
    /// Run a console command on a server
    Command {
        server: String,
        #[arg(required = true, trailing_var_arg = true)]
        line: Vec<String>,
    },
    /// Save a server
    Save { server: String },
    /// Broadcast a chat message to every connected server
    Say {
        #[arg(required = true, trailing_var_arg = true)]
        message: Vec<String>,
    },
    /// Forward a console line to the controller log
    Log {
        #[arg(required = true, trailing_var_arg = true)]
        line: Vec<String>,
    },
}

impl Action {
    /// Packet sent for this action. `None` for `Login`, which is just the
    /// handshake.
    pub fn to_packet(&self, player: &str) -> Option<Packet> {
        let packet = match self {
            Action::Login => return None,
            Action::Start { template, count } => Packet::StartServerRequest(StartServerRequest {
                player: player.to_string(),
                template: template.clone(),
                count: *count,
            }),
            Action::Stop { target } => Packet::StopServerRequest(StopServerRequest {
                player: player.to_string(),
                server: target.clone(),
            }),
            Action::List => Packet::ListServersRequest(ListServersRequest {
                player: player.to_string(),
            }),
            Action::Command { server, line } => Packet::DispatchCommand(DispatchCommand {
                server: server.clone(),
                command_line: line.join(" "),
            }),
            Action::Save { server } => Packet::SaveServer(SaveServer {
                server: server.clone(),
            }),
            Action::Say { message } => Packet::Text(Text {
                message: message.join(" "),
                kind: TextKind::Message,
            }),
            Action::Log { line } => Packet::LogForward(LogForward {
                message: line.join(" "),
            }),
        };
        Some(packet)
    }

    /// Reply the controller sends back for this action, if any.
    pub fn expected_reply(&self) -> Option<PacketKind> {
        match self {
            Action::Start { .. } => Some(PacketKind::StartServerResponse),
            Action::Stop { .. } => Some(PacketKind::StopServerResponse),
            Action::List => Some(PacketKind::ListServersResponse),
            // chat comes back to us as part of the broadcast
            Action::Say { .. } => Some(PacketKind::Text),
            Action::Login | Action::Command { .. } | Action::Save { .. } | Action::Log { .. } => None,
        }
    }
}
