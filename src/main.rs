//! padsync - relay HID gamepad button transitions to an event sink.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::Parser;
use padsync::backends::probe_devices;
use padsync::{
    Config, Emitter, EventSink, JsonSink, LogSink, Manager, OscUdpSink, SinkKind, TableDecoder,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "padsync", version)]
#[command(about = "Poll HID gamepads and relay every button press/release to a sink")]
struct Cli {
    /// Config file (TOML)
    #[arg(short, long, env = "PADSYNC_CONFIG")]
    config: Option<PathBuf>,

    /// Device profile file (TOML); overrides the config file
    #[arg(short, long)]
    profile: Option<PathBuf>,

    /// Sink kind; overrides the config file
    #[arg(long, value_enum)]
    sink: Option<SinkKind>,

    /// OSC target host
    #[arg(long)]
    host: Option<String>,

    /// OSC target port
    #[arg(long)]
    port: Option<u16>,

    /// Milliseconds between polling passes
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Number of device slots
    #[arg(long)]
    max_devices: Option<usize>,

    /// Verbose logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn apply(&self, cfg: &mut Config) {
        if let Some(p) = &self.profile {
            cfg.profile = Some(p.clone());
        }
        if let Some(kind) = self.sink {
            cfg.sink.kind = kind;
        }
        if let Some(host) = &self.host {
            cfg.sink.host = host.clone();
        }
        if let Some(port) = self.port {
            cfg.sink.port = port;
        }
        if let Some(ms) = self.tick_ms {
            cfg.tick_interval_ms = ms;
        }
        if let Some(n) = self.max_devices {
            cfg.max_devices = n;
        }
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn build_sink(cfg: &Config) -> Result<Box<dyn EventSink>> {
    let sink: Box<dyn EventSink> = match cfg.sink.kind {
        SinkKind::Osc => {
            let sink = OscUdpSink::connect(&cfg.sink.host, cfg.sink.port)
                .with_context(|| format!("opening OSC sink {}:{}", cfg.sink.host, cfg.sink.port))?;
            info!(addr = %sink.target(), "sending OSC");
            Box::new(sink)
        }
        SinkKind::Log => Box::new(LogSink::new()),
        SinkKind::Json => Box::new(JsonSink::stdout()),
    };
    Ok(sink)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut cfg = match &cli.config {
        Some(path) => Config::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => Config::default(),
    };
    cli.apply(&mut cfg);
    cfg.validate()?;

    let profile = cfg.load_profile().context("loading device profile")?;
    let parser = TableDecoder::from_profile(&profile)
        .with_context(|| format!("invalid profile {:?}", profile.name))?;

    let emitter = Emitter::with_address(build_sink(&cfg)?, cfg.sink.address.clone());
    let mut manager = Manager::from_parts(Box::new(parser), emitter, cfg.max_devices);

    let api = hidapi::HidApi::new().context("initializing hidapi")?;
    let summary = probe_devices(&api, &profile, manager.slots_mut());
    if summary.registered.is_empty() {
        bail!(
            "no {} found (vid 0x{:04x}, pid 0x{:04x})",
            profile.name,
            profile.vendor_id,
            profile.product_id
        );
    }

    let interval = Duration::from_millis(cfg.tick_interval_ms);
    info!(devices = summary.registered.len(), interval_ms = cfg.tick_interval_ms, "polling");

    loop {
        let started = Instant::now();
        let stats = manager.tick();
        if stats.transitions > 0 || stats.read_errors > 0 {
            debug!(?stats, "tick");
        }
        if let Some(rest) = interval.checked_sub(started.elapsed()) {
            std::thread::sleep(rest);
        }
    }
}
