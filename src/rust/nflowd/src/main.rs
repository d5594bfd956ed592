use anyhow::{Context, Result};
use nflow_config::{load_config, load_config_from, Config, FieldMappings};
use nflow_utils::unix_time::unix_now;
use nflowd::accumulator::JsonLinesAccumulator;
use nflowd::decoder::{run_decoder, FlowDecoder};
use nflowd::field_registry::FieldRegistry;
use nflowd::listener::{bind, run_listener};
use nflowd::name_cache::name_cache_actor;
use nflowd::stats;
use nflowd::template_store::template_store_actor;
use signal_hook::{
    consts::{SIGINT, SIGTERM},
    iterator::Signals,
};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::level_filters::LevelFilter;
use tracing::{error, info, warn};

// Use JemAllocator only on supported platforms
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
use jemallocator::Jemalloc;

// Use JemAllocator only on supported platforms
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

/// Configure console logging. `log` records from the utility crates are
/// forwarded into the same subscriber.
pub fn set_console_logging() -> Result<()> {
    // install global collector configured based on RUST_LOG env var.
    let level = if let Ok(level) = std::env::var("RUST_LOG") {
        match level.to_lowercase().as_str() {
            "trace" => LevelFilter::TRACE,
            "debug" => LevelFilter::DEBUG,
            "info" => LevelFilter::INFO,
            "warn" => LevelFilter::WARN,
            "error" => LevelFilter::ERROR,
            _ => LevelFilter::WARN,
        }
    } else {
        LevelFilter::WARN
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        // Use a more compact, abbreviated log format
        .compact()
        // Display source code file paths
        .with_file(true)
        // Display source code line numbers
        .with_line_number(true)
        // Don't display the event's target (module path)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Unable to install log subscriber: {e}"))?;
    Ok(())
}

fn main() -> Result<()> {
    set_console_logging()?;
    info!("nflowd starting");

    // An explicit path on the command line wins over NFLOWD_CONFIG
    let config = match std::env::args().nth(1) {
        Some(path) => load_config_from(Path::new(&path))?,
        None => load_config()?,
    };
    let mappings = FieldMappings::load(&config.decoder)?;
    let registry = Arc::new(FieldRegistry::with_mappings(&mappings));

    let cancel = CancellationToken::new();
    let mut signals = Signals::new([SIGINT, SIGTERM])?;
    let signal_cancel = cancel.clone();
    std::thread::Builder::new()
        .name("Signal Handler".to_string())
        .spawn(move || {
            if let Some(sig) = signals.forever().next() {
                match sig {
                    SIGINT => warn!("Terminating on SIGINT"),
                    SIGTERM => warn!("Terminating on SIGTERM"),
                    _ => warn!("Terminating on signal {sig}"),
                }
                signal_cancel.cancel();
            }
        })?;

    let started = unix_now().unwrap_or(0);
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Unable to start the async runtime")?
        .block_on(run(config, registry, cancel))?;

    let counters = stats::snapshot();
    let uptime = unix_now().unwrap_or(started).saturating_sub(started);
    match serde_json::to_string(&counters) {
        Ok(json) => info!("nflowd stopped after {uptime} seconds: {json}"),
        Err(_) => info!("nflowd stopped after {uptime} seconds: {counters:?}"),
    }
    Ok(())
}

async fn run(config: Config, registry: Arc<FieldRegistry>, cancel: CancellationToken) -> Result<()> {
    let templates = template_store_actor(cancel.clone()).await;
    let mut decoder = FlowDecoder::new(registry, templates, Arc::new(JsonLinesAccumulator))
        .emit_option_records(config.decoder.emit_option_records)
        .dump_packets(config.decoder.dump_packets);
    if config.decoder.resolve_ifname_by_ifindex {
        decoder = decoder.with_interface_names(name_cache_actor("interface", cancel.clone()).await);
    }
    if config.decoder.resolve_application_name_by_id {
        decoder =
            decoder.with_application_names(name_cache_actor("application", cancel.clone()).await);
    }

    let socket = bind(&config.listener).await?;
    let (tx, rx) = mpsc::channel(config.listener.allowed_pending_messages);
    let listener = tokio::spawn(run_listener(
        socket,
        config.listener.read_buffer_size,
        tx,
        cancel.clone(),
    ));
    let dispatch = tokio::spawn(run_decoder(decoder, rx, cancel.clone()));

    if let Err(e) = dispatch.await {
        error!("Packet decoder task failed: {e:?}");
    }
    // The decoder only returns early when an actor is gone
    cancel.cancel();
    if let Err(e) = listener.await {
        error!("UDP listener task failed: {e:?}");
    }
    Ok(())
}
