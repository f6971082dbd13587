//! scrawl — terminal drawing client.
//!
//! ```text
//! scrawl                          Connect with defaults
//! scrawl --config <path>          Use custom config TOML
//! scrawl --snapshot out.ppm       Save the canvas on exit
//! scrawl --gen-config             Dump default config and exit
//! ```

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use scrawl_core::{ChannelEvent, Connection, DrawingContext};

use scrawl_client::config::ClientConfig;
use scrawl_client::connection;
use scrawl_client::display::RasterSurface;
use scrawl_client::input::{InputError, parse_command};

// ── CLI ──────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "scrawl", about = "Shared drawing canvas client")]
struct Cli {
    /// Path to configuration TOML file.
    #[arg(short, long, default_value = "scrawl.toml")]
    config: PathBuf,

    /// Relay URL (overrides config). Example: wss://relay.example
    #[arg(short, long)]
    server: Option<String>,

    /// Topic to join (overrides config).
    #[arg(short, long)]
    topic: Option<String>,

    /// Identity token (overrides config).
    #[arg(long)]
    token: Option<String>,

    /// Write the canvas as a PPM image on exit.
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Print the default configuration to stdout and exit.
    #[arg(long)]
    gen_config: bool,
}

// ── Main ─────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.gen_config {
        let text = toml::to_string_pretty(&ClientConfig::default())?;
        println!("{text}");
        return Ok(());
    }

    let (mut config, source) = ClientConfig::load(&cli.config);
    if let Some(server) = cli.server {
        config.network.server = server;
    }
    if let Some(topic) = cli.topic {
        config.network.topic = topic;
    }
    if let Some(token) = cli.token {
        config.network.token = token;
    }

    // Init tracing.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    info!("scrawl v{}", env!("CARGO_PKG_VERSION"));
    source.log(&cli.config);

    // ── 1. Session ──────────────────────────────────────────────

    let canvas = config.canvas;
    let mut ctx = DrawingContext::new(canvas).with_clear_policy(config.drawing.clear_policy);
    ctx.set_color(config.drawing.color);
    ctx.mount(RasterSurface::new(canvas.width, canvas.height));

    // ── 2. Connect ──────────────────────────────────────────────

    let mut conn: Option<Connection> = match connection::open(&config).await {
        Ok(conn) => Some(conn),
        Err(e) => {
            error!("could not connect: {e}; drawing offline");
            None
        }
    };

    // ── 3. Event loop ───────────────────────────────────────────

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            event = next_event(&mut conn) => match event {
                Some(event) => {
                    let closed = matches!(event, ChannelEvent::Close);
                    ctx.handle(event);
                    if closed {
                        warn!("relay connection closed; drawing offline");
                        conn = None;
                    }
                }
                None => conn = None,
            },
            line = lines.next_line() => match line {
                Ok(Some(line)) => match parse_command(&line) {
                    Ok(event) => ctx.apply_input(event),
                    Err(InputError::Empty) => {}
                    Err(e) => warn!("{e}"),
                },
                Ok(None) => break,
                Err(e) => {
                    error!("stdin error: {e}");
                    break;
                }
            },
        }
    }

    // ── 4. Shutdown ─────────────────────────────────────────────

    info!("shutting down");
    drop(conn);

    if let (Some(path), Some(surface)) = (cli.snapshot, ctx.surface()) {
        surface.write_ppm(BufWriter::new(File::create(&path)?))?;
        info!("snapshot written to {}", path.display());
    }

    Ok(())
}

/// Next event from the relay, or never when offline.
async fn next_event(conn: &mut Option<Connection>) -> Option<ChannelEvent> {
    match conn {
        Some(conn) => conn.recv().await,
        None => std::future::pending().await,
    }
}
