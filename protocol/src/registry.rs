//! Packet registry: the closed tag table plus the datagram codec.
//!
//! Layout of a datagram: `[tag: u8][payload: bincode, fixed-width ints]`.
//! Decoding never fails loudly; anything that does not map cleanly onto a
//! registered kind becomes [`Packet::Invalid`].

use crate::packet::*;
use bincode::Options;

/// Largest payload a single UDP datagram can carry over IPv4.
pub const MAX_DATAGRAM_SIZE: usize = 65_507;

/// Reserved tag written for [`Packet::Invalid`]. Never registered.
pub const INVALID_TAG: u8 = 0xFF;

/// Wire tag of every registered packet kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PacketKind {
    LoginRequest = 0x01,
    LoginResponse = 0x02,
    Connection = 0x03,
    DispatchCommand = 0x04,
    SaveServer = 0x05,
    NotifyStatusUpdate = 0x06,
    PlayerJoin = 0x07,
    PlayerQuit = 0x08,
    ProxyPlayerJoin = 0x09,
    ProxyPlayerQuit = 0x0A,
    Text = 0x0B,
    PlayerKick = 0x0C,
    StartServerRequest = 0x0D,
    StartServerResponse = 0x0E,
    StopServerRequest = 0x0F,
    StopServerResponse = 0x10,
    ListServersRequest = 0x11,
    ListServersResponse = 0x12,
    LogForward = 0x13,
    Test = 0x14,
    Log = 0x15,
}

impl PacketKind {
    pub const ALL: [PacketKind; 21] = [
        PacketKind::LoginRequest,
        PacketKind::LoginResponse,
        PacketKind::Connection,
        PacketKind::DispatchCommand,
        PacketKind::SaveServer,
        PacketKind::NotifyStatusUpdate,
        PacketKind::PlayerJoin,
        PacketKind::PlayerQuit,
        PacketKind::ProxyPlayerJoin,
        PacketKind::ProxyPlayerQuit,
        PacketKind::Text,
        PacketKind::PlayerKick,
        PacketKind::StartServerRequest,
        PacketKind::StartServerResponse,
        PacketKind::StopServerRequest,
        PacketKind::StopServerResponse,
        PacketKind::ListServersRequest,
        PacketKind::ListServersResponse,
        PacketKind::LogForward,
        PacketKind::Test,
        PacketKind::Log,
    ];
}

impl TryFrom<u8> for PacketKind {
    type Error = u8;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        PacketKind::ALL
            .iter()
            .copied()
            .find(|kind| *kind as u8 == tag)
            .ok_or(tag)
    }
}

/// Error encoding a packet into a datagram.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("encode error: {0}")]
    Encode(bincode::Error),
    #[error("packet exceeds the datagram size limit")]
    TooLarge,
}

impl From<bincode::Error> for EncodeError {
    fn from(e: bincode::Error) -> Self {
        if matches!(*e, bincode::ErrorKind::SizeLimit) {
            EncodeError::TooLarge
        } else {
            EncodeError::Encode(e)
        }
    }
}

fn options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_limit((MAX_DATAGRAM_SIZE - 1) as u64)
        .reject_trailing_bytes()
}

impl Packet {
    /// Registered kind of this packet, `None` for [`Packet::Invalid`].
    pub fn kind(&self) -> Option<PacketKind> {
        let kind = match self {
            Packet::LoginRequest(_) => PacketKind::LoginRequest,
            Packet::LoginResponse(_) => PacketKind::LoginResponse,
            Packet::Connection(_) => PacketKind::Connection,
            Packet::DispatchCommand(_) => PacketKind::DispatchCommand,
            Packet::SaveServer(_) => PacketKind::SaveServer,
            Packet::NotifyStatusUpdate(_) => PacketKind::NotifyStatusUpdate,
            Packet::PlayerJoin(_) => PacketKind::PlayerJoin,
            Packet::PlayerQuit(_) => PacketKind::PlayerQuit,
            Packet::ProxyPlayerJoin(_) => PacketKind::ProxyPlayerJoin,
            Packet::ProxyPlayerQuit(_) => PacketKind::ProxyPlayerQuit,
            Packet::Log(_) => PacketKind::Log,
            Packet::Text(_) => PacketKind::Text,
            Packet::PlayerKick(_) => PacketKind::PlayerKick,
            Packet::StartServerRequest(_) => PacketKind::StartServerRequest,
            Packet::StartServerResponse(_) => PacketKind::StartServerResponse,
            Packet::StopServerRequest(_) => PacketKind::StopServerRequest,
            Packet::StopServerResponse(_) => PacketKind::StopServerResponse,
            Packet::ListServersRequest(_) => PacketKind::ListServersRequest,
            Packet::ListServersResponse(_) => PacketKind::ListServersResponse,
            Packet::LogForward(_) => PacketKind::LogForward,
            Packet::Test(_) => PacketKind::Test,
            Packet::Invalid => return None,
        };
        Some(kind)
    }
}

/// Encode a packet into a single datagram: tag byte followed by the payload.
pub fn encode(packet: &Packet) -> Result<Vec<u8>, EncodeError> {
    let Some(kind) = packet.kind() else {
        return Ok(vec![INVALID_TAG]);
    };

    let payload = match packet {
        Packet::LoginRequest(p) => options().serialize(p),
        Packet::LoginResponse(p) => options().serialize(p),
        Packet::Connection(p) => options().serialize(p),
        Packet::DispatchCommand(p) => options().serialize(p),
        Packet::SaveServer(p) => options().serialize(p),
        Packet::NotifyStatusUpdate(p) => options().serialize(p),
        Packet::PlayerJoin(p) => options().serialize(p),
        Packet::PlayerQuit(p) => options().serialize(p),
        Packet::ProxyPlayerJoin(p) => options().serialize(p),
        Packet::ProxyPlayerQuit(p) => options().serialize(p),
        Packet::Log(p) => options().serialize(p),
        Packet::Text(p) => options().serialize(p),
        Packet::PlayerKick(p) => options().serialize(p),
        Packet::StartServerRequest(p) => options().serialize(p),
        Packet::StartServerResponse(p) => options().serialize(p),
        Packet::StopServerRequest(p) => options().serialize(p),
        Packet::StopServerResponse(p) => options().serialize(p),
        Packet::ListServersRequest(p) => options().serialize(p),
        Packet::ListServersResponse(p) => options().serialize(p),
        Packet::LogForward(p) => options().serialize(p),
        Packet::Test(p) => options().serialize(p),
        Packet::Invalid => return Ok(vec![INVALID_TAG]),
    }?;

    let mut out = Vec::with_capacity(1 + payload.len());
    out.push(kind as u8);
    out.extend_from_slice(&payload);
    Ok(out)
}

/// Decode one datagram. Unknown tags, empty or truncated buffers and
/// malformed payloads all yield [`Packet::Invalid`].
pub fn decode(bytes: &[u8]) -> Packet {
    let Some((&tag, body)) = bytes.split_first() else {
        return Packet::Invalid;
    };
    let Ok(kind) = PacketKind::try_from(tag) else {
        return Packet::Invalid;
    };
    decode_payload(kind, body).unwrap_or(Packet::Invalid)
}

fn decode_payload(kind: PacketKind, body: &[u8]) -> bincode::Result<Packet> {
    let packet = match kind {
        PacketKind::LoginRequest => Packet::LoginRequest(options().deserialize(body)?),
        PacketKind::LoginResponse => Packet::LoginResponse(options().deserialize(body)?),
        PacketKind::Connection => Packet::Connection(options().deserialize(body)?),
        PacketKind::DispatchCommand => Packet::DispatchCommand(options().deserialize(body)?),
        PacketKind::SaveServer => Packet::SaveServer(options().deserialize(body)?),
        PacketKind::NotifyStatusUpdate => {
            Packet::NotifyStatusUpdate(options().deserialize(body)?)
        }
        PacketKind::PlayerJoin => Packet::PlayerJoin(options().deserialize(body)?),
        PacketKind::PlayerQuit => Packet::PlayerQuit(options().deserialize(body)?),
        PacketKind::ProxyPlayerJoin => Packet::ProxyPlayerJoin(options().deserialize(body)?),
        PacketKind::ProxyPlayerQuit => Packet::ProxyPlayerQuit(options().deserialize(body)?),
        PacketKind::Log => Packet::Log(options().deserialize(body)?),
        PacketKind::Text => Packet::Text(options().deserialize(body)?),
        PacketKind::PlayerKick => Packet::PlayerKick(options().deserialize(body)?),
        PacketKind::StartServerRequest => {
            Packet::StartServerRequest(options().deserialize(body)?)
        }
        PacketKind::StartServerResponse => {
            Packet::StartServerResponse(options().deserialize(body)?)
        }
        PacketKind::StopServerRequest => Packet::StopServerRequest(options().deserialize(body)?),
        PacketKind::StopServerResponse => {
            Packet::StopServerResponse(options().deserialize(body)?)
        }
        PacketKind::ListServersRequest => {
            Packet::ListServersRequest(options().deserialize(body)?)
        }
        PacketKind::ListServersResponse => {
            Packet::ListServersResponse(options().deserialize(body)?)
        }
        PacketKind::LogForward => Packet::LogForward(options().deserialize(body)?),
        PacketKind::Test => Packet::Test(options().deserialize(body)?),
    };
    Ok(packet)
}
