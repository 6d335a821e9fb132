//! PoW Ledger Node CLI Application
//!
//! Starts a ledger node serving the HTTP API.

use clap::{Parser, Subcommand};
use pow_ledger_node::mining::DEFAULT_DIFFICULTY;
use pow_ledger_node::network::{Node, NodeConfig, DEFAULT_PEER_TIMEOUT};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "node")]
#[command(author = "Darshan")]
#[command(version = "0.1.0")]
#[command(about = "A proof-of-work ledger node with peer consensus", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the node and its REST API
    Start {
        /// Interface to bind to
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Port to listen on
        #[arg(short, long, default_value = "5000")]
        port: u16,

        /// Mining difficulty (number of leading zero hex characters)
        #[arg(short, long, default_value_t = DEFAULT_DIFFICULTY)]
        difficulty: usize,

        /// Initial peers to register (comma-separated)
        #[arg(long)]
        peers: Option<String>,

        /// Seconds to wait for each peer during consensus
        #[arg(long, default_value_t = DEFAULT_PEER_TIMEOUT.as_secs())]
        peer_timeout: u64,
    },

    /// Show the default node configuration
    Info,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Start {
            host,
            port,
            difficulty,
            peers,
            peer_timeout,
        } => {
            let bootstrap_peers: Vec<String> = peers
                .map(|p| {
                    p.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default();

            let config = NodeConfig {
                host,
                port,
                difficulty,
                bootstrap_peers,
                peer_timeout: Duration::from_secs(peer_timeout),
            };

            run_node(config)?;
        }

        Commands::Info => {
            let config = NodeConfig::default();
            println!("Default node configuration:");
            println!("   Bind address: {}", config.bind_addr());
            println!("   Difficulty:   {}", config.difficulty);
            println!("   Peer timeout: {}s", config.peer_timeout.as_secs());
        }
    }

    Ok(())
}

fn run_node(config: NodeConfig) -> Result<(), Box<dyn std::error::Error>> {
    let rt = tokio::runtime::Runtime::new()?;

    rt.block_on(async {
        let node = Node::new(config)?;
        println!("🌐 Starting node {} on {}...", node.node_id, node.config.bind_addr());

        // Handle Ctrl+C
        tokio::spawn(async move {
            tokio::signal::ctrl_c().await.ok();
            println!("\n📴 Shutting down node...");
            std::process::exit(0);
        });

        node.start().await
    })?;

    Ok(())
}
