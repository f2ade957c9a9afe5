use std::{error::Error, path::Path};

use clap::Parser;
use clap_derive::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::{config::KilnConfig, state::KilnState};

pub mod api;
pub mod check;
pub mod config;
pub mod connection;
pub mod history;
pub mod registry;
pub mod state;

pub const VERSION: f32 = 0.1;
pub const CONFIG_VERSION: f32 = 0.1;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// path to the RON config file
    #[arg(long, default_value = "./config.ron")]
    config: String,
    /// address the api listens on
    #[arg(long, default_value = "0.0.0.0:3000")]
    listen: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    info!("kiln v{VERSION}");

    let cfg = if Path::new(&args.config).exists() {
        KilnConfig::from_file(&args.config)?
    } else {
        warn!("config {} not found, starting with defaults", args.config);
        KilnConfig::default()
    };
    if cfg.version != CONFIG_VERSION {
        panic!(
            "Wrong config version. Got {}, expected {}.",
            cfg.version, CONFIG_VERSION
        );
    }

    let state = KilnState::init(cfg);
    api::init(state, &args.listen).await?;

    Ok(())
}
