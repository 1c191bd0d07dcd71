// Lykos Miner - Free and Open Source Software Statement
//
// This project, lykos-miner, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/main.rs
// Version: 1.1.0
//
// Binary entry point: parses arguments and the config file, wires the
// compute domain (engine thread) to the control domain (node client task),
// and installs the cooperative interrupt handler.

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, LevelFilter};
use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Config as LogConfig, Root};
use log4rs::encode::pattern::PatternEncoder;
use lykos_miner::core::constants::N_LEN;
use lykos_miner::core::types::{Args, Config, PuzzleInstance};
use lykos_miner::core::PuzzleState;
use lykos_miner::miner::{EngineStats, MiningEngine, ThreadPoolBackend};
use lykos_miner::NodeClient;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

fn init_logging() -> Result<()> {
    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%H:%M:%S)} {h({l})} {t} - {m}{n}",
        )))
        .build();
    let config = LogConfig::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .build(Root::builder().appender("stdout").build(LevelFilter::Info))?;
    log4rs::init_config(config)?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging()?;

    let raw = std::fs::read_to_string(&args.config)
        .with_context(|| format!("reading config file {}", args.config))?;
    let config = Config::from_json(&raw).context("parsing config file")?;

    let node_address = args.node.clone().unwrap_or_else(|| config.node.clone());
    let keep_prehash = args.keep_prehash || config.keep_prehash;
    let workers = if args.threads == 0 {
        num_cpus::get()
    } else {
        args.threads
    };

    info!("Starting Lykos miner");
    info!("Node: {}", node_address);
    info!("Workers: {}", workers);
    info!("Batch: {} nonces", args.batch);
    info!("Keep prehash: {}", keep_prehash);

    let pk = config.public_key()?;
    let state = Arc::new(PuzzleState::new(PuzzleInstance::from_config(&config)?));
    let stats = Arc::new(EngineStats::new(workers));
    let interrupt = Arc::new(AtomicBool::new(false));

    // cooperative shutdown: observed at batch boundaries only
    {
        let interrupt = Arc::clone(&interrupt);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Shutdown requested, finishing current batch...");
                interrupt.store(true, Ordering::Relaxed);
            }
        });
    }

    // periodic one-line dashboard
    {
        let stats = Arc::clone(&stats);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(30));
            loop {
                interval.tick().await;
                stats.log_summary();
            }
        });
    }

    let (solution_tx, solution_rx) = tokio::sync::mpsc::unbounded_channel();

    // compute domain: dedicated OS thread, never blocks on the network
    let engine_handle = {
        let state = Arc::clone(&state);
        let stats = Arc::clone(&stats);
        let interrupt = Arc::clone(&interrupt);
        let batch = args.batch;
        std::thread::spawn(move || {
            let engine = MiningEngine::new(
                state,
                ThreadPoolBackend::new(workers),
                stats,
                interrupt,
                keep_prehash,
                N_LEN,
                batch,
                workers,
            );
            engine.run(solution_tx)
        })
    };

    // control domain: puzzle updates in, solutions out
    let client = NodeClient::new(node_address, Arc::clone(&state), args.pk_policy, stats);
    client.run(solution_rx, pk).await?;

    match engine_handle.join() {
        Ok(result) => result.context("engine terminated with error")?,
        Err(_) => anyhow::bail!("engine thread panicked"),
    }

    info!("Lykos miner stopped");
    Ok(())
}

// Changelog:
// - v1.1.0: Engine moved to a dedicated OS thread; ctrl-c handler flips the
//   cooperative interrupt instead of aborting mid-batch.
// - v1.0.0: Initial wiring.
