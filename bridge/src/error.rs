use protocol::{EncodeError, PacketKind};
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("socket error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error("no reply from controller within {0:?}")]
    Timeout(Duration),
    #[error("controller refused login as {0}")]
    Denied(String),
    #[error("unexpected reply {got:?}, wanted {wanted:?}")]
    UnexpectedReply {
        wanted: PacketKind,
        got: Option<PacketKind>,
    },
    #[error("controller address {0} did not resolve")]
    Resolve(String),
}
