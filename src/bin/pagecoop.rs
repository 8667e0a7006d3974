//! pagecoop CLI
//!
//! Applies writes, zero fills and reads to one slot page and prints what
//! each read composes to.

use std::str::FromStr;

use clap::{Parser, Subcommand};
use pagecoop::cooperation::bit_width;
use pagecoop::{BitVector, Config, CoopError, Endness, ObjectCooperation, SlotPage};
use tracing_subscriber::{fmt, EnvFilter};

/// pagecoop CLI
#[derive(Parser, Debug)]
#[command(name = "pagecoop")]
#[command(about = "Store and compose values on a page of storage units")]
#[command(version)]
struct Args {
    /// Bits per byte
    #[arg(short = 'w', long, default_value = "8")]
    byte_width: u32,

    /// Page base address
    #[arg(short = 'b', long, default_value = "0x1000", value_parser = parse_u64)]
    page_base: u64,

    /// Page size in bytes
    #[arg(short = 's', long, default_value = "0x1000", value_parser = parse_u64)]
    page_size: u64,

    /// Bytes per slot when storing
    #[arg(short, long, default_value = "1")]
    chunk: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Apply operations in order
    ///
    /// w:ADDR:VALUE:SIZE[:be|le]  write VALUE (SIZE bytes)
    /// z:ADDR:SIZE                zero fill
    /// r:ADDR:SIZE[:be|le]        read and print
    Run {
        /// Operations, e.g. w:0x1000:0x12345678:4 r:0x1001:2
        #[arg(required = true)]
        ops: Vec<Op>,
    },
}

/// One page operation from the command line
#[derive(Debug, Clone)]
enum Op {
    Write {
        addr: u64,
        value: u128,
        size: usize,
        endness: Endness,
    },
    Zero {
        addr: u64,
        size: usize,
    },
    Read {
        addr: u64,
        size: usize,
        endness: Endness,
    },
}

impl FromStr for Op {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        let endness_at = |i: usize| -> Result<Endness, String> {
            parts
                .get(i)
                .map_or(Ok(Endness::Big), |e| {
                    e.parse::<Endness>().map_err(|e: CoopError| e.to_string())
                })
        };

        match parts.as_slice() {
            ["w", addr, value, size] | ["w", addr, value, size, _] => Ok(Op::Write {
                addr: parse_u64(addr)?,
                value: parse_u128(value)?,
                size: parse_usize(size)?,
                endness: endness_at(4)?,
            }),
            ["z", addr, size] => Ok(Op::Zero {
                addr: parse_u64(addr)?,
                size: parse_usize(size)?,
            }),
            ["r", addr, size] | ["r", addr, size, _] => Ok(Op::Read {
                addr: parse_u64(addr)?,
                size: parse_usize(size)?,
                endness: endness_at(3)?,
            }),
            _ => Err(format!("Unrecognized operation: {:?}", s)),
        }
    }
}

fn parse_u128(s: &str) -> Result<u128, String> {
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u128::from_str_radix(hex, 16),
        None => s.parse(),
    }
    .map_err(|e| format!("Invalid number {:?}: {}", s, e))
}

fn parse_u64(s: &str) -> Result<u64, String> {
    let value = parse_u128(s)?;
    u64::try_from(value).map_err(|_| format!("{} does not fit in 64 bits", s))
}

fn parse_usize(s: &str) -> Result<usize, String> {
    let value = parse_u128(s)?;
    usize::try_from(value).map_err(|_| format!("{} is too large", s))
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,pagecoop=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    tracing::info!("pagecoop v{}", pagecoop::VERSION);

    let config = Config::builder()
        .byte_width(args.byte_width)
        .page_size(args.page_size)
        .chunk_size(args.chunk)
        .build();

    let Commands::Run { ops } = args.command;

    if let Err(e) = run(&config, args.page_base, &ops) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(config: &Config, page_base: u64, ops: &[Op]) -> pagecoop::Result<()> {
    let coop = ObjectCooperation::new(config)?;
    let page = SlotPage::new(coop, page_base, config)?;

    for op in ops {
        match *op {
            Op::Write {
                addr,
                value,
                size,
                endness,
            } => {
                let width = bit_width(size, config.byte_width)?;
                if width < 128 && value >> width != 0 {
                    return Err(CoopError::MalformedInput(format!(
                        "{:#x} does not fit in {} bytes",
                        value, size
                    )));
                }
                page.store(addr, BitVector::from_u128(value, width), size, endness)?;
            }
            Op::Zero { addr, size } => page.store_zero(addr, size)?,
            Op::Read {
                addr,
                size,
                endness,
            } => {
                let value = page.read(addr, size, endness)?;
                println!("{:#x}+{} {} = {:#x}", addr, size, endness, value);
            }
        }
    }

    tracing::info!(
        "Page holds {} slots in {} segments",
        page.slot_count(),
        page.segment_count()
    );

    Ok(())
}
