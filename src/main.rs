use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::sync::mpsc;

use scatrack::chain::{ChainEvent, MissionChain};
use scatrack::config::Config;
use scatrack::tracking::{
    CompletionBus, ForegroundHost, LogForeground, RouteTracker, StatusHandle,
};
use scatrack::work::WorkQueue;
use scatrack::{sclog, Error, Result};

/// Scatrack - secret cat agent mission chain and route tracking demo
#[derive(Parser, Debug)]
#[command(name = "scatrack")]
#[command(version, about, long_about = None)]
#[command(after_help = "ENVIRONMENT:\n    SCATRACK_DEBUG=1     Enable debug logging (alternative to --debug)")]
pub struct Cli {
    /// Enable debug logging (writes to ~/.scatrack/scatrack.log)
    #[arg(short = 'd', long)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Dispatch the four-chore chain, then track the agent to destination
    Run {
        /// Agent identifier for the chore chain (default from config, then "CatAgent1")
        #[arg(long)]
        agent_id: Option<String>,

        /// Agent identifier for the tracking phase (default from config, then "007")
        #[arg(long)]
        tracking_id: Option<String>,

        /// Suppress progress output and print a JSON summary
        #[arg(long)]
        headless: bool,
    },

    /// Run only the tracking countdown
    Track {
        /// Agent identifier for the tracking phase (default from config, then "007")
        #[arg(long)]
        tracking_id: Option<String>,

        /// Suppress progress output and print a JSON summary
        #[arg(long)]
        headless: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    scatrack::log::init_with_debug(cli.debug);

    let config = Config::load()?;

    match cli.command {
        Some(Command::Run {
            agent_id,
            tracking_id,
            headless,
        }) => {
            let agent_id = agent_id.unwrap_or_else(|| config.effective_agent_id().to_string());
            let tracking_id =
                tracking_id.unwrap_or_else(|| config.effective_tracking_id().to_string());
            run_mission(agent_id, tracking_id, headless).await
        }
        Some(Command::Track {
            tracking_id,
            headless,
        }) => {
            let tracking_id =
                tracking_id.unwrap_or_else(|| config.effective_tracking_id().to_string());
            run_tracking_only(tracking_id, headless).await
        }
        None => {
            // No subcommand: run the full demo with configured defaults.
            run_mission(
                config.effective_agent_id().to_string(),
                config.effective_tracking_id().to_string(),
                false,
            )
            .await
        }
    }
}

/// Foreground host for interactive runs: status lines go to stdout.
struct ConsoleForeground;

impl ForegroundHost for ConsoleForeground {
    fn reserve(&self, initial: &str) -> Box<dyn StatusHandle> {
        println!("{}", initial);
        Box::new(ConsoleStatus)
    }
}

struct ConsoleStatus;

impl StatusHandle for ConsoleStatus {
    fn update(&mut self, text: &str) {
        println!("{}", text);
    }

    fn release(self: Box<Self>) {}
}

fn foreground_for(headless: bool) -> Arc<dyn ForegroundHost> {
    if headless {
        Arc::new(LogForeground)
    } else {
        Arc::new(ConsoleForeground)
    }
}

/// Dispatch the chore chain, hand off to tracking, and wait for arrival.
async fn run_mission(agent_id: String, tracking_id: String, headless: bool) -> Result<()> {
    sclog!(
        "Run command: agent_id={}, tracking_id={}, headless={}",
        agent_id,
        tracking_id,
        headless
    );

    let queue = WorkQueue::new();
    let (events_tx, mut events_rx) = mpsc::channel(16);
    let chain = MissionChain::new(Arc::clone(&queue), events_tx);
    chain.dispatch(&agent_id).await?;

    let bus = CompletionBus::new();
    let tracker = RouteTracker::new(foreground_for(headless), bus.clone());
    let mut arrivals = bus.subscribe();

    let mut notices = Vec::new();
    let mut run = None;
    while let Some(event) = events_rx.recv().await {
        match event {
            ChainEvent::ChoreFinished { message, .. } => {
                if !headless {
                    println!("{}", message);
                }
                notices.push(message);
            }
            ChainEvent::ChainComplete => {
                run = Some(tracker.start(&tracking_id)?);
                break;
            }
        }
    }
    let run = run.ok_or_else(|| Error::ChannelClosed("chain events".to_string()))?;

    let arrived = arrivals
        .recv()
        .await
        .map_err(|_| Error::ChannelClosed("completion bus".to_string()))?;
    run.join().await?;

    if headless {
        let json_output = serde_json::json!({
            "agent_id": agent_id,
            "chores": notices,
            "tracking_agent_id": tracking_id,
            "arrived": arrived,
        });
        println!("{}", serde_json::to_string_pretty(&json_output)?);
    } else {
        println!("Agent {} arrived!", arrived);
    }

    Ok(())
}

/// Run just the countdown phase, without the chore chain.
async fn run_tracking_only(tracking_id: String, headless: bool) -> Result<()> {
    sclog!(
        "Track command: tracking_id={}, headless={}",
        tracking_id,
        headless
    );

    let bus = CompletionBus::new();
    let tracker = RouteTracker::new(foreground_for(headless), bus.clone());
    let mut arrivals = bus.subscribe();

    let run = tracker.start(&tracking_id)?;
    let arrived = arrivals
        .recv()
        .await
        .map_err(|_| Error::ChannelClosed("completion bus".to_string()))?;
    run.join().await?;

    if headless {
        let json_output = serde_json::json!({
            "tracking_agent_id": tracking_id,
            "arrived": arrived,
        });
        println!("{}", serde_json::to_string_pretty(&json_output)?);
    } else {
        println!("Agent {} arrived!", arrived);
    }

    Ok(())
}
