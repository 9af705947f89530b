//! ROHO (RH) rand beacon node
//!
//! Runs the rand module over a sled database with a simulated validator set,
//! producing one block per interval and serving queries over JSON-RPC.

use anyhow::{Context, Result};
use clap::Parser;
use rh_rand::constants::BOND_DENOM;
use rh_rand::node::{build_keeper, NodeApp, NodeConfig, RandApp, Simulator};
use rh_rand::rpc::{start_rpc_server, RpcState};
use rh_rand::storage::SledStore;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "rh-rand-node", version)]
#[command(about = "Commit-reveal randomness beacon node")]
struct Cli {
    /// Path to JSON config
    #[arg(long, default_value = "rh_rand.json")]
    config: PathBuf,

    /// Override the data directory
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Override the RPC port
    #[arg(long)]
    rpc_port: Option<u16>,

    /// Override the block interval in milliseconds
    #[arg(long)]
    block_interval_ms: Option<u64>,

    /// Override the rand genesis file
    #[arg(long)]
    genesis: Option<PathBuf>,
}

impl Cli {
    fn into_config(self) -> Result<NodeConfig> {
        let mut config = NodeConfig::load_or_default(&self.config)?;
        if let Some(dir) = self.data_dir {
            config.data_dir = dir;
        }
        if let Some(port) = self.rpc_port {
            config.rpc_port = port;
        }
        if let Some(ms) = self.block_interval_ms {
            config.block_interval_ms = ms;
        }
        if self.genesis.is_some() {
            config.genesis_path = self.genesis;
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Cli::parse().into_config()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .with_target(false)
        .init();

    let genesis = config.load_genesis()?;
    let store = SledStore::open(&config.data_dir)
        .with_context(|| format!("opening database at {}", config.data_dir.display()))?;
    let app = RandApp::new(store, build_keeper(&config, BOND_DENOM), &genesis)
        .context("initializing rand state")?;

    info!(
        height = app.height(),
        validators = config.validators.len(),
        data_dir = %config.data_dir.display(),
        "rand node started"
    );

    let app = Arc::new(Mutex::new(app));
    let rpc_state = Arc::new(RpcState::new(app.clone()));
    let rpc_port = config.rpc_port;
    tokio::spawn(async move {
        if let Err(e) = start_rpc_server(rpc_state, rpc_port).await {
            error!(error = %e, "RPC server stopped");
        }
    });

    let mut simulator = Simulator::new(&config);
    let mut ticker = tokio::time::interval(Duration::from_millis(config.block_interval_ms));

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let mut guard = match app.lock() {
                    Ok(guard) => guard,
                    Err(_) => anyhow::bail!("node state lock poisoned"),
                };
                // a failed block has already been discarded by the app
                if let Err(e) = produce_block(&mut guard, &mut simulator) {
                    error!(height = guard.height() + 1, error = %e, "block production failed");
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown signal received, stopping node");
                break;
            }
        }
    }

    Ok(())
}

fn produce_block(app: &mut NodeApp<SledStore>, simulator: &mut Simulator) -> Result<()> {
    let time = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();
    app.begin_block(time)?;
    if let Err(e) = deliver_simulated(app, simulator) {
        app.discard_block();
        return Err(e);
    }

    app.end_block()?;
    let summary = app.commit()?;

    let seed = app.period()?.current_seed;
    info!(
        height = summary.header.height,
        hash = %summary.hash,
        events = summary.events.len(),
        txs = summary.tx_results.len(),
        seed = %seed.map(|s| s.to_hex()).unwrap_or_default(),
        "block committed"
    );
    Ok(())
}

fn deliver_simulated(app: &mut NodeApp<SledStore>, simulator: &mut Simulator) -> Result<()> {
    let period = app.period()?;
    let params = app.keeper().get_params(app.store())?;
    let height = app.height() + 1;
    let msgs = simulator.messages(&period, &params, height, |v| {
        app.keeper()
            .has_commitment(app.store(), period.current_period, v)
            .unwrap_or(false)
    });
    for msg in &msgs {
        let result = app.deliver(msg)?;
        if !result.is_ok() {
            warn!(height, code = result.code, log = %result.log, "simulated message rejected");
        }
    }
    Ok(())
}
