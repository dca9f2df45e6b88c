//! Human-readable rendering of controller replies.

use protocol::{Packet, ResponseCode};

/// Removes `§x` colour codes.
pub fn strip_colors(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '§' {
            chars.next();
        } else {
            out.push(c);
        }
    }
    out
}

pub fn format_reply(packet: &Packet) -> String {
    match packet {
        Packet::StartServerResponse(response) => {
            outcome(response.code, &response.message, "Start requested")
        }
        Packet::StopServerResponse(response) => {
            outcome(response.code, &response.message, "Stop requested")
        }
        Packet::ListServersResponse(response) => {
            if response.servers.is_empty() {
                return "No servers running".to_string();
            }
            let mut lines = vec![format!(
                "{:<20} {:>6} {:>9} {:<16} {}",
                "NAME", "PORT", "PLAYERS", "TEMPLATE", "STATUS"
            )];
            for server in &response.servers {
                lines.push(format!(
                    "{:<20} {:>6} {:>9} {:<16} {}",
                    server.name,
                    server.port,
                    format!("{}/{}", server.players, server.max_players),
                    strip_colors(&server.template),
                    strip_colors(&server.status),
                ));
            }
            lines.join("\n")
        }
        Packet::Text(text) => strip_colors(&text.message),
        other => format!("{:?}", other),
    }
}

fn outcome(code: ResponseCode, message: &str, success: &str) -> String {
    match code {
        ResponseCode::Success if message.is_empty() => success.to_string(),
        _ => strip_colors(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use protocol::{ListServersResponse, ServerSummary};

    #[test]
    fn test_strip_colors() {
        assert_eq!(
            strip_colors("§cThe template §eLobby §cdoesn't exist!"),
            "The template Lobby doesn't exist!"
        );
        assert_eq!(strip_colors("plain"), "plain");
        assert_eq!(strip_colors("trailing§"), "trailing");
    }

    #[test]
    fn test_format_success_and_error() {
        let ok = Packet::start_server_response("CONSOLE", "", ResponseCode::Success);
        assert_eq!(format_reply(&ok), "Start requested");

        let err = Packet::stop_server_response(
            "CONSOLE",
            "§cThe server §eghost §cdoesn't exist!",
            ResponseCode::Error,
        );
        assert_eq!(format_reply(&err), "The server ghost doesn't exist!");
    }

    #[test]
    fn test_format_server_list() {
        let list = Packet::ListServersResponse(ListServersResponse {
            player: "CONSOLE".to_string(),
            servers: vec![ServerSummary {
                name: "Lobby-1".to_string(),
                port: 19133,
                players: 3,
                max_players: 20,
                template: "§eLobby".to_string(),
                status: "§aSTARTED".to_string(),
            }],
        });
        let rendered = format_reply(&list);
        let row = rendered.lines().nth(1).unwrap();
        assert!(row.starts_with("Lobby-1"));
        assert!(row.contains("3/20"));
        assert!(row.contains("Lobby"));
        assert!(row.ends_with("STARTED"));
        assert!(!rendered.contains('§'));
    }

    #[test]
    fn test_format_empty_list() {
        let list = Packet::ListServersResponse(ListServersResponse {
            player: "CONSOLE".to_string(),
            servers: Vec::new(),
        });
        assert_eq!(format_reply(&list), "No servers running");
    }
}
