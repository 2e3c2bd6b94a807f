//! Attention synthesizer CLI
//!
//! Usage:
//!   attention-synth                              # HTTP API server with live ticker
//!   attention-synth --interactive                # Console, manual ticks
//!   attention-synth --config attention.json      # Load configuration
//!   attention-synth --seed 42                    # Reproducible dwell timing

use clap::Parser;
use colored::Colorize;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use attention_synth::core::{
    run_server, AttentionController, AttentionService, Console, ConsoleCommand, ConsoleOutput,
    CoordinateTransformer, CounterBank, Region, RegionTable, RigidTransform, StaticTransforms,
};
use attention_synth::types::{AttentionConfig, AttentionResult, Point3};
use attention_synth::{OUTPUT_FRAME, PERCEPTION_FRAME, VERSION};

#[derive(Parser, Debug)]
#[command(
    name = "attention-synth",
    version = VERSION,
    about = "Attention synthesizer - decides where a robot head and eyes look",
    long_about = "Runs the attention control loop: selects faces, salient points or\n\
                  regions to attend, staggers gaze and head movement, mirrors facial\n\
                  expressions and injects spontaneous interruptions.\n\n\
                  Modes:\n  \
                  (default)      HTTP + WebSocket API with the periodic ticker\n  \
                  --interactive  Console; ticks only on the `tick` command"
)]
struct Args {
    /// Interactive console instead of the API server
    #[arg(short, long)]
    interactive: bool,

    /// Server address
    #[arg(long, default_value = "127.0.0.1:3000")]
    addr: String,

    /// Configuration file (JSON)
    #[arg(short, long)]
    config: Option<String>,

    /// Attention region table (JSON)
    #[arg(long)]
    regions: Option<String>,

    /// Static frame transforms (JSON)
    #[arg(long)]
    transforms: Option<String>,

    /// Seed for dwell timing and region sampling
    #[arg(long)]
    seed: Option<u64>,

    /// Override the synthesizer rate (Hz)
    #[arg(long)]
    rate: Option<f64>,

    /// Log as JSON
    #[arg(long)]
    log_json: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_tracing(args.log_json);

    let service = match build_service(&args) {
        Ok(service) => Arc::new(service),
        Err(e) => {
            error!("startup failed: {}", e);
            std::process::exit(1);
        }
    };

    if args.interactive {
        run_interactive(&service).await;
    } else {
        run_serve(&args, service).await;
    }
}

fn init_tracing(json: bool) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("attention_synth=info"));

    if json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(true).with_target(true).with_thread_ids(false))
            .with(env_filter)
            .init();
    }
}

/// Built-in regions, in the output frame
fn default_regions() -> RegionTable {
    RegionTable::new()
        .with_region(
            "audience",
            Region {
                center: Point3::new(2.0, 0.0, 0.0),
                width: 2.0,
                height: 0.4,
            },
        )
        .with_region("main", Region::point(Point3::new(1.5, 0.0, 0.2)))
        .with_region(
            "specific",
            Region {
                center: Point3::new(1.0, 0.5, 0.0),
                width: 0.2,
                height: 0.2,
            },
        )
}

fn build_service(args: &Args) -> AttentionResult<AttentionService> {
    let mut config = match &args.config {
        Some(path) => AttentionConfig::from_file(path)?,
        None => AttentionConfig::default(),
    };
    if let Some(rate) = args.rate {
        config.synthesizer_rate = rate;
    }

    let transforms = match &args.transforms {
        Some(path) => StaticTransforms::from_file(path)?,
        None => StaticTransforms::new().with(OUTPUT_FRAME, PERCEPTION_FRAME, RigidTransform::default()),
    };
    let mut regions = match &args.regions {
        Some(path) => RegionTable::from_file(path)?,
        None => default_regions(),
    };
    let bank = match args.seed {
        Some(seed) => {
            regions = regions.with_seed(seed);
            CounterBank::from_seed(seed)
        }
        None => CounterBank::from_entropy(),
    };

    let transformer = CoordinateTransformer::new(
        Box::new(transforms),
        OUTPUT_FRAME,
        Duration::from_millis(config.transform_timeout_ms),
    );
    let mut controller = AttentionController::new(transformer, Box::new(regions), bank);
    controller.apply_config(config)?;
    info!("controller configured: {}", controller.modes());
    Ok(AttentionService::new(controller))
}

/// Run the API server with the live ticker
async fn run_serve(args: &Args, service: Arc<AttentionService>) {
    println!();
    println!("{}", format!("Attention synthesizer v{}", VERSION).bold());
    println!();

    service.start().await;
    if let Err(e) = run_server(&args.addr, service).await {
        error!("server error: {}", e);
        std::process::exit(1);
    }
}

/// Run the interactive console
async fn run_interactive(service: &AttentionService) {
    println!("{}", format!("Attention synthesizer v{} - console", VERSION).bold());
    println!("Commands: eyecontact|lookat|mirroring|gaze <mode> [id], face <id> x y z,");
    println!("          salient x y z, clear, commit, tick [n], status, quit");
    println!();

    let mut console = Console::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        let prompt = format!("[{}] > ", service.modes().await);
        if stdout.write_all(prompt.cyan().to_string().as_bytes()).await.is_err() || stdout.flush().await.is_err() {
            break;
        }

        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) | Err(_) => break,
        };
        if line.trim().is_empty() {
            continue;
        }

        let result = match ConsoleCommand::parse(&line) {
            Ok(command) => console.execute(service, command).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(ConsoleOutput::Message(message)) => println!("{}", message),
            Ok(ConsoleOutput::Reports(reports)) => {
                for report in reports {
                    println!("{}", report.to_terminal_string());
                }
            }
            Ok(ConsoleOutput::Quit) => break,
            Err(e) => println!("{}", e.to_string().red()),
        }
    }

    println!("\nSession ended after {} ticks", service.status().await.tick);
}
