//! UDP client speaking to the controller on behalf of one server.

use crate::error::BridgeError;
use log::{debug, info, warn};
use protocol::{decode, encode, Connection, LoginResult, Packet, PacketKind, MAX_DATAGRAM_SIZE};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::{lookup_host, UdpSocket};
use tokio::time::{timeout_at, Instant};

pub struct BridgeClient {
    socket: UdpSocket,
    controller: SocketAddr,
    name: String,
    reply_timeout: Duration,
}

impl BridgeClient {
    /// Opens a socket towards `controller` for the server called `name`.
    ///
    /// Nothing is sent yet; call [`BridgeClient::login`] before any request.
    pub async fn connect(
        controller: &str,
        name: impl Into<String>,
        reply_timeout: Duration,
    ) -> Result<Self, BridgeError> {
        let controller = lookup_host(controller)
            .await?
            .next()
            .ok_or_else(|| BridgeError::Resolve(controller.to_string()))?;

        let local = if controller.is_ipv4() {
            "0.0.0.0:0"
        } else {
            "[::]:0"
        };
        let socket = UdpSocket::bind(local).await?;
        socket.connect(controller).await?;

        Ok(Self {
            socket,
            controller,
            name: name.into(),
            reply_timeout,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn local_addr(&self) -> Result<SocketAddr, BridgeError> {
        Ok(self.socket.local_addr()?)
    }

    /// Runs the login handshake and acknowledges it with a `Connection`
    /// packet.
    pub async fn login(&self) -> Result<(), BridgeError> {
        info!("Logging in to {} as {}", self.controller, self.name);
        self.send(&Packet::login_request(self.name.clone())).await?;

        match self.wait_for(PacketKind::LoginResponse).await? {
            Packet::LoginResponse(response) if response.result == LoginResult::Success => {
                info!("Logged in as {}", self.name);
                let ack = Packet::Connection(Connection {
                    server: self.name.clone(),
                });
                self.send(&ack).await
            }
            _ => {
                warn!("Login as {} was denied", self.name);
                Err(BridgeError::Denied(self.name.clone()))
            }
        }
    }

    pub async fn send(&self, packet: &Packet) -> Result<(), BridgeError> {
        let bytes = encode(packet)?;
        self.socket.send(&bytes).await?;
        Ok(())
    }

    /// Sends `packet` and waits for the reply of kind `wanted`.
    pub async fn request(&self, packet: &Packet, wanted: PacketKind) -> Result<Packet, BridgeError> {
        self.send(packet).await?;
        self.wait_for(wanted).await
    }

    /// Waits for a packet of kind `wanted`, skipping broadcast traffic that
    /// may arrive in between.
    pub async fn wait_for(&self, wanted: PacketKind) -> Result<Packet, BridgeError> {
        let deadline = Instant::now() + self.reply_timeout;
        let mut buf = vec![0u8; MAX_DATAGRAM_SIZE];

        loop {
            let len = timeout_at(deadline, self.socket.recv(&mut buf))
                .await
                .map_err(|_| BridgeError::Timeout(self.reply_timeout))??;
            let packet = decode(&buf[..len]);

            match packet.kind() {
                Some(kind) if kind == wanted => return Ok(packet),
                Some(PacketKind::Text | PacketKind::PlayerKick | PacketKind::Log | PacketKind::Test) => {
                    debug!("Skipping {:?} while waiting for {:?}", packet.kind(), wanted);
                }
                got => return Err(BridgeError::UnexpectedReply { wanted, got }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use protocol::{Text, TextKind};

    async fn fake_controller() -> (UdpSocket, String) {
        let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let addr = socket.local_addr().unwrap().to_string();
        (socket, addr)
    }

    async fn recv_packet(socket: &UdpSocket) -> (Packet, SocketAddr) {
        let mut buf = vec![0u8; MAX_DATAGRAM_SIZE];
        let (len, from) = socket.recv_from(&mut buf).await.unwrap();
        (decode(&buf[..len]), from)
    }

    async fn reply(socket: &UdpSocket, packet: &Packet, to: SocketAddr) {
        socket.send_to(&encode(packet).unwrap(), to).await.unwrap();
    }

    #[tokio::test]
    async fn test_login_success_sends_ack() {
        let (controller, addr) = fake_controller().await;
        let client = BridgeClient::connect(&addr, "lobby-1", Duration::from_secs(1))
            .await
            .unwrap();

        let server = async {
            let (packet, from) = recv_packet(&controller).await;
            assert_eq!(packet, Packet::login_request("lobby-1"));
            reply(&controller, &Packet::login_response(LoginResult::Success), from).await;
            recv_packet(&controller).await.0
        };

        let (login, ack) = tokio::join!(client.login(), server);
        login.unwrap();
        assert_eq!(
            ack,
            Packet::Connection(Connection {
                server: "lobby-1".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_login_denied() {
        let (controller, addr) = fake_controller().await;
        let client = BridgeClient::connect(&addr, "ghost", Duration::from_secs(1))
            .await
            .unwrap();

        let server = async {
            let (_, from) = recv_packet(&controller).await;
            reply(&controller, &Packet::login_response(LoginResult::Denied), from).await;
        };

        let (login, _) = tokio::join!(client.login(), server);
        assert!(matches!(login, Err(BridgeError::Denied(name)) if name == "ghost"));
    }

    #[tokio::test]
    async fn test_login_times_out() {
        let (_controller, addr) = fake_controller().await;
        let client = BridgeClient::connect(&addr, "lobby-1", Duration::from_millis(50))
            .await
            .unwrap();

        assert!(matches!(client.login().await, Err(BridgeError::Timeout(_))));
    }

    #[tokio::test]
    async fn test_request_skips_broadcasts() {
        let (controller, addr) = fake_controller().await;
        let client = BridgeClient::connect(&addr, "lobby-1", Duration::from_secs(1))
            .await
            .unwrap();

        let chat = Packet::Text(Text {
            message: "hello".to_string(),
            kind: TextKind::Message,
        });
        let answer = Packet::stop_server_response("CONSOLE", "", protocol::ResponseCode::Success);

        let server = async {
            let (_, from) = recv_packet(&controller).await;
            reply(&controller, &chat, from).await;
            reply(&controller, &answer, from).await;
        };

        let request = Packet::StopServerRequest(protocol::StopServerRequest {
            player: "CONSOLE".to_string(),
            server: "all".to_string(),
        });
        let (result, _) = tokio::join!(
            client.request(&request, PacketKind::StopServerResponse),
            server
        );
        assert_eq!(result.unwrap(), answer);
    }

    #[tokio::test]
    async fn test_unexpected_reply() {
        let (controller, addr) = fake_controller().await;
        let client = BridgeClient::connect(&addr, "lobby-1", Duration::from_secs(1))
            .await
            .unwrap();

        let server = async {
            let (_, from) = recv_packet(&controller).await;
            controller.send_to(&[0xEE, 1, 2], from).await.unwrap();
        };

        let (result, _) = tokio::join!(client.login(), server);
        assert!(matches!(
            result,
            Err(BridgeError::UnexpectedReply {
                wanted: PacketKind::LoginResponse,
                got: None
            })
        ));
    }
}
