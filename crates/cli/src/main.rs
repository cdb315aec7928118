//! SoC fabric simulator CLI.
//!
//! This binary provides a single entry point for driving the fabric model.
//! It performs:
//! 1. **Run:** Compose the system, bring it out of reset, optionally drive
//!    the DMA loopback self-test through real transport requests, and print
//!    the run report.
//! 2. **Config:** Print the effective configuration as JSON-shaped defaults
//!    for editing.

use std::fs;
use std::process;

use clap::{Parser, Subcommand};
use tracing::info;

use fabsim_core::config::Config;
use fabsim_core::sim::Simulator;
use fabsim_core::soc::bridge::{AccessKind, TransportRequest};

#[derive(Parser, Debug)]
#[command(
    name = "fabsim",
    author,
    version,
    about = "Cycle-accurate SoC fabric simulator",
    long_about = "Compose the clock/reset fabric, registry, bridge, and devices, then run them \
                  through simulated time.\n\nExamples:\n  fabsim run\n  fabsim run --time-us 200 --selftest 16\n  fabsim run --config board.json"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compose and run the fabric.
    Run {
        /// JSON configuration file overriding the defaults.
        #[arg(short, long)]
        config: Option<String>,

        /// Simulated time to run, in microseconds.
        #[arg(long, default_value_t = 100)]
        time_us: u64,

        /// Words to push through the DMA loopback self-test (0 disables).
        #[arg(long, default_value_t = 8)]
        selftest: u32,
    },

    /// Print the effective configuration.
    Config {
        /// JSON configuration file overriding the defaults.
        #[arg(short, long)]
        config: Option<String>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            config,
            time_us,
            selftest,
        } => cmd_run(config.as_deref(), time_us, selftest),
        Commands::Config { config } => cmd_config(config.as_deref()),
    }
}

fn load_config(path: Option<&str>) -> Config {
    let Some(path) = path else {
        return Config::default();
    };
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) => {
            eprintln!("error: cannot read {path}: {err}");
            process::exit(1);
        }
    };
    match serde_json::from_str(&text) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: cannot parse {path}: {err}");
            process::exit(1);
        }
    }
}

/// Composes the system, runs it, and prints the report.
///
/// The self-test pushes words into the DMA source stream through genuine
/// transport write requests, so the path exercised is endpoint → crossing
/// queue → bus → DMA → loopback → MSI.
fn cmd_run(config_path: Option<&str>, time_us: u64, selftest: u32) {
    let config = load_config(config_path);

    let mut sim = match Simulator::new(&config) {
        Ok(sim) => sim,
        Err(err) => {
            eprintln!("composition error: {err}");
            process::exit(1);
        }
    };

    println!(
        "Composed: {} domains, {} CSR devices, {} interrupt vectors",
        sim.system.crg.domains().len(),
        sim.system.bus.device_count(),
        sim.system.msi.width()
    );

    if selftest > 0 {
        let dma_base =
            match sim.system.registry.csr_index("dma") {
                Ok(slot) => config.system.csr_base + slot as u64 * config.system.csr_slot_bytes,
                Err(err) => {
                    eprintln!("composition error: {err}");
                    process::exit(1);
                }
            };
        // CTRL enable, then one PUSH per word.
        sim.system.push_request(TransportRequest {
            tag: 0,
            addr: dma_base,
            kind: AccessKind::Write,
            data: 1,
            byte_enable: 0xF,
        });
        for i in 0..selftest {
            sim.system.push_request(TransportRequest {
                tag: (i + 1) as u16,
                addr: dma_base + 0x08,
                kind: AccessKind::Write,
                data: 0xA500_0000 | i,
                byte_enable: 0xF,
            });
        }
        info!(words = selftest, "loopback self-test queued");
    }

    sim.run_until_ps(time_us * 1_000_000);

    sim.system.sync_stats();
    println!();
    print!("{}", sim.system.stats.report());

    if selftest > 0 {
        let looped = sim.system.stats.dma_words_looped;
        let ok = looped == u64::from(selftest);
        println!(
            "selftest: {}/{} words looped — {}",
            looped,
            selftest,
            if ok { "PASS" } else { "FAIL" }
        );
        if !ok {
            process::exit(1);
        }
    }
}

fn cmd_config(config_path: Option<&str>) {
    let config = load_config(config_path);
    match serde_json::to_string_pretty(&config) {
        Ok(json) => println!("{json}"),
        Err(err) => {
            eprintln!("error: cannot serialize configuration: {err}");
            process::exit(1);
        }
    }
}
