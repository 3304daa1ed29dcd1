use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info};

use nvmeadm_core::{
    AdminPassthru, CompletionOutcome, Direction, DownloadOutcome, FirmwareDownload, PayloadSource,
    RpcConfig, UnixChannel, firmware_commit, firmware_slot_info, hex_dump, response_data,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "NVMe admin passthrough and firmware update client", long_about = None)]
struct Args {
    /// Path of the daemon's JSON-RPC unix socket
    #[arg(short = 's', long)]
    socket: Option<String>,

    /// Path to a TOML config file
    #[arg(long)]
    config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Send one raw admin command
    AdminPassthru {
        /// Name of the operating controller (e.g. Nvme0)
        #[arg(long)]
        name: String,

        /// Admin command opcode
        #[arg(long, value_parser = parse_u8)]
        opcode: u8,

        /// Fused operation
        #[arg(long, default_value_t = 0, value_parser = parse_u8)]
        fuse: u8,

        /// Value for the reserved field
        #[arg(long, default_value_t = 0, value_parser = parse_u8)]
        rsvd: u8,

        /// Namespace id
        #[arg(long, default_value_t = 0, value_parser = parse_u32)]
        nsid: u32,

        #[arg(long, default_value_t = 0, value_parser = parse_u32)]
        cdw2: u32,

        #[arg(long, default_value_t = 0, value_parser = parse_u32)]
        cdw3: u32,

        #[arg(long, default_value_t = 0, value_parser = parse_u32)]
        cdw10: u32,

        #[arg(long, default_value_t = 0, value_parser = parse_u32)]
        cdw11: u32,

        #[arg(long, default_value_t = 0, value_parser = parse_u32)]
        cdw12: u32,

        #[arg(long, default_value_t = 0, value_parser = parse_u32)]
        cdw13: u32,

        #[arg(long, default_value_t = 0, value_parser = parse_u32)]
        cdw14: u32,

        #[arg(long, default_value_t = 0, value_parser = parse_u32)]
        cdw15: u32,

        /// Receive data from the controller
        #[arg(short = 'r', long)]
        read: bool,

        /// Send data to the controller
        #[arg(short = 'w', long)]
        write: bool,

        /// Data to send: a file path or literal text
        #[arg(long)]
        data: Option<String>,

        /// Metadata to send: a file path or literal text
        #[arg(long)]
        metadata: Option<String>,

        /// Data length to transfer from the controller
        #[arg(long, value_parser = parse_u32)]
        data_len: Option<u32>,

        /// Metadata length to transfer from the controller
        #[arg(long, value_parser = parse_u32)]
        metadata_len: Option<u32>,

        /// Command execution timeout in milliseconds
        #[arg(long, value_parser = parse_u64)]
        timeout_ms: Option<u64>,

        /// Write returned data to this file instead of dumping it
        #[arg(long)]
        output_file: Option<String>,
    },

    /// Download a firmware image in chunks
    FwDownload {
        /// Name of the operating controller
        #[arg(long)]
        name: String,

        /// Path of the firmware image file
        #[arg(long)]
        filename: String,

        /// Transfer chunk size limit in bytes
        #[arg(long, value_parser = parse_usize)]
        xfer: Option<usize>,

        /// Starting byte offset within the firmware slot
        #[arg(long, value_parser = parse_usize)]
        offset: Option<usize>,
    },

    /// Commit (activate) a downloaded firmware image
    FwCommit {
        /// Name of the operating controller
        #[arg(long)]
        name: String,

        /// Commit action [0-7]
        #[arg(long, default_value_t = 0, value_parser = parse_u8)]
        action: u8,

        /// Firmware slot for the commit action [0-7]
        #[arg(long, default_value_t = 0, value_parser = parse_u8)]
        slot: u8,

        /// Boot partition id [0-1]
        #[arg(long, default_value_t = 0, value_parser = parse_u8)]
        bpid: u8,
    },

    /// Read the Firmware Slot Information log page
    FwSlotInfo {
        /// Name of the operating controller
        #[arg(long)]
        name: String,
    },
}

/// Parse a decimal or 0x-prefixed hexadecimal number.
fn parse_u64(value: &str) -> Result<u64, String> {
    let parsed = if let Some(hex) = value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16)
    } else {
        value.parse()
    };
    parsed.map_err(|e| format!("invalid number {value:?}: {e}"))
}

fn parse_u32(value: &str) -> Result<u32, String> {
    parse_u64(value)?
        .try_into()
        .map_err(|_| format!("{value} out of range"))
}

fn parse_u8(value: &str) -> Result<u8, String> {
    parse_u64(value)?
        .try_into()
        .map_err(|_| format!("{value} out of range"))
}

fn parse_usize(value: &str) -> Result<usize, String> {
    parse_u64(value)?
        .try_into()
        .map_err(|_| format!("{value} out of range"))
}

fn main() {
    let args = Args::parse();

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(if args.verbose {
                    tracing::Level::DEBUG.into()
                } else {
                    tracing::Level::INFO.into()
                })
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    if let Err(e) = run(args) {
        error!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => RpcConfig::load_from_file(path)
            .with_context(|| format!("failed to load config {path}"))?,
        None => RpcConfig::default(),
    };
    if let Some(socket) = args.socket {
        config.socket_path = socket;
    }

    let channel = UnixChannel::connect(&config.socket_path, config.timeout())?;

    match args.command {
        Command::AdminPassthru {
            name,
            opcode,
            fuse,
            rsvd,
            nsid,
            cdw2,
            cdw3,
            cdw10,
            cdw11,
            cdw12,
            cdw13,
            cdw14,
            cdw15,
            read: _,
            write,
            data,
            metadata,
            data_len,
            metadata_len,
            timeout_ms,
            output_file,
        } => {
            let mut cmd = AdminPassthru::new(&name, opcode);
            cmd.fuse = fuse;
            cmd.rsvd = rsvd;
            cmd.nsid = nsid;
            cmd.cdw2 = cdw2;
            cmd.cdw3 = cdw3;
            cmd.cdw10 = cdw10;
            cmd.cdw11 = cdw11;
            cmd.cdw12 = cdw12;
            cmd.cdw13 = cdw13;
            cmd.cdw14 = cdw14;
            cmd.cdw15 = cdw15;
            cmd.direction = if write { Direction::H2c } else { Direction::C2h };
            cmd.data = data.map(PayloadSource::Arg);
            cmd.metadata = metadata.map(PayloadSource::Arg);
            cmd.data_len = data_len;
            cmd.metadata_len = metadata_len;
            cmd.timeout_ms = timeout_ms.or(config.timeout_ms);

            let response = cmd.submit(&channel)?;
            match CompletionOutcome::from_response(&response)? {
                CompletionOutcome::Completed(entry) => {
                    println!("{}", entry.status_line());
                    if entry.status() == 0 {
                        if let Some(bytes) = response_data(&response)? {
                            match &output_file {
                                Some(path) => {
                                    std::fs::write(path, &bytes)
                                        .with_context(|| format!("failed to write {path}"))?;
                                    info!(path, len = bytes.len(), "response data written");
                                }
                                None => println!("{}", hex_dump(&bytes)),
                            }
                        }
                    }
                }
                CompletionOutcome::Unknown(raw) => println!("Unknown error: {raw}"),
            }
        }

        Command::FwDownload {
            name,
            filename,
            xfer,
            offset,
        } => {
            let mut download = FirmwareDownload::new(&channel, &name);
            download.xfer = xfer.unwrap_or(config.xfer);
            download.base_offset = offset.unwrap_or(0);
            match download.run_file(&filename)? {
                DownloadOutcome::Success { chunks, bytes } => {
                    println!("Firmware download success ({bytes} bytes in {chunks} chunks)");
                }
                DownloadOutcome::OverlappingRange { offset } => {
                    println!("Firmware download error: Overlapping Range (at offset {offset})");
                    std::process::exit(1);
                }
                DownloadOutcome::Failed { status, offset } => {
                    println!(
                        "Firmware download failed with status 0x{status:x} at offset {offset}"
                    );
                    std::process::exit(1);
                }
                DownloadOutcome::NoCompletion { offset } => {
                    println!("Firmware download failed at offset {offset}: no completion returned");
                    std::process::exit(1);
                }
            }
        }

        Command::FwCommit {
            name,
            action,
            slot,
            bpid,
        } => {
            let status = firmware_commit(&channel, &name, action, slot, bpid)?;
            println!("Firmware commit action:{action} slot:{slot}: {status}");
        }

        Command::FwSlotInfo { name } => {
            let info = firmware_slot_info(&channel, &name)?;
            println!("{info}");
        }
    }

    Ok(())
}
