//! Admin passthrough request assembly and dispatch.

use std::path::Path;

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use crate::channel::{ChannelError, RpcChannel};
use crate::frame;
use crate::record::{AdminCommand, FixedRecord};

/// RPC method that carries raw controller commands to the daemon.
pub const SEND_CMD_METHOD: &str = "bdev_nvme_send_cmd";

#[derive(Error, Debug)]
pub enum AdminError {
    #[error("failed to read payload {path}: {source}")]
    PayloadRead {
        path: String,
        source: std::io::Error,
    },

    #[error("channel error: {0}")]
    Channel(#[from] ChannelError),
}

/// Data transfer direction for one command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    /// Controller to host.
    #[default]
    C2h,
    /// Host to controller.
    H2c,
}

impl Direction {
    pub fn tag(self) -> &'static str {
        match self {
            Direction::C2h => "c2h",
            Direction::H2c => "h2c",
        }
    }
}

/// A payload argument: raw bytes, or a string that is auto-detected as
/// either a file path (if it names an existing file) or literal text.
#[derive(Debug, Clone)]
pub enum PayloadSource {
    Bytes(Vec<u8>),
    Arg(String),
}

impl PayloadSource {
    fn resolve(&self) -> Result<Vec<u8>, AdminError> {
        match self {
            PayloadSource::Bytes(bytes) => Ok(bytes.clone()),
            PayloadSource::Arg(arg) => {
                if Path::new(arg).is_file() {
                    std::fs::read(arg).map_err(|source| AdminError::PayloadRead {
                        path: arg.clone(),
                        source,
                    })
                } else {
                    Ok(arg.as_bytes().to_vec())
                }
            }
        }
    }
}

/// One admin passthrough request.
///
/// Fields default to zero, matching the wire defaults; set only what the
/// command needs.
#[derive(Debug, Clone, Default)]
pub struct AdminPassthru {
    /// Name of the controller to operate on.
    pub name: String,
    pub opcode: u8,
    pub fuse: u8,
    pub rsvd: u8,
    pub nsid: u32,
    pub cdw2: u32,
    pub cdw3: u32,
    pub cdw10: u32,
    pub cdw11: u32,
    pub cdw12: u32,
    pub cdw13: u32,
    pub cdw14: u32,
    pub cdw15: u32,
    pub direction: Direction,
    pub data: Option<PayloadSource>,
    pub metadata: Option<PayloadSource>,
    /// Overrides the encoded payload length when set.
    pub data_len: Option<u32>,
    pub metadata_len: Option<u32>,
    /// Command execution timeout in milliseconds; if 0 or unset the
    /// channel does not track a timeout.
    pub timeout_ms: Option<u64>,
}

impl AdminPassthru {
    pub fn new(name: &str, opcode: u8) -> Self {
        Self {
            name: name.to_string(),
            opcode,
            ..Default::default()
        }
    }

    fn command(&self) -> AdminCommand {
        AdminCommand {
            opc: self.opcode,
            fuse: self.fuse,
            rsvd: self.rsvd,
            nsid: self.nsid,
            cdw2: self.cdw2,
            cdw3: self.cdw3,
            cdw10: self.cdw10,
            cdw11: self.cdw11,
            cdw12: self.cdw12,
            cdw13: self.cdw13,
            cdw14: self.cdw14,
            cdw15: self.cdw15,
            ..Default::default()
        }
    }

    /// Assemble the RPC params: framed 64-byte command buffer, direction
    /// tag, and framed payloads with their lengths.
    ///
    /// Payload sources resolve here; a failed file read yields an error
    /// instead of a request and is not fatal to the caller's process.
    pub fn build(&self) -> Result<Value, AdminError> {
        let mut params = Map::new();
        params.insert("name".into(), Value::from(self.name.clone()));
        params.insert("cmd_type".into(), Value::from("admin"));
        params.insert("data_direction".into(), Value::from(self.direction.tag()));
        params.insert(
            "cmdbuf".into(),
            Value::from(frame::encode(&self.command().to_bytes())),
        );

        let mut data_len = self.data_len;
        let mut metadata_len = self.metadata_len;
        if self.direction == Direction::H2c {
            if let Some(source) = &self.data {
                let bytes = source.resolve()?;
                data_len = data_len.or(Some(bytes.len() as u32));
                params.insert("data".into(), Value::from(frame::encode(&bytes)));
            }
            if let Some(source) = &self.metadata {
                let bytes = source.resolve()?;
                metadata_len = metadata_len.or(Some(bytes.len() as u32));
                params.insert("metadata".into(), Value::from(frame::encode(&bytes)));
            }
        }
        if let Some(len) = data_len {
            params.insert("data_len".into(), Value::from(len));
        }
        if let Some(len) = metadata_len {
            params.insert("metadata_len".into(), Value::from(len));
        }
        if let Some(timeout) = self.timeout_ms {
            params.insert("timeout_ms".into(), Value::from(timeout));
        }
        Ok(Value::Object(params))
    }

    /// Build and dispatch over the channel, returning the raw response.
    pub fn submit<C: RpcChannel + ?Sized>(&self, channel: &C) -> Result<Value, AdminError> {
        let params = self.build()?;
        debug!(
            opcode = format_args!("0x{:02x}", self.opcode),
            direction = self.direction.tag(),
            "admin passthrough"
        );
        Ok(channel.call(SEND_CMD_METHOD, params)?)
    }
}
