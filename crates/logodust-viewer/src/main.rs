//! logodust viewer: a window showing a logo made of particles that scatter
//! away from the pointer and drift back.
//!
//! Usage:
//!   logodust-viewer [LOGO] [--width <px>] [--height <px>] [--log <filter>] [--debug-cursor]
//!
//! Drop an image file on the window to switch logos.

mod app;
mod resolver;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use logodust_engine::device::GpuInit;
use logodust_engine::logging::{init_logging, LoggingConfig};
use logodust_engine::window::{Runtime, RuntimeConfig};
use logodust_engine::FieldConfig;
use winit::dpi::LogicalSize;

use app::ViewerApp;
use resolver::LogoResolver;

#[derive(Parser, Debug)]
#[command(name = "logodust-viewer")]
#[command(about = "Interactive logo particle field")]
struct Args {
    /// Logo to show: a file path, file:// URL or http(s):// URL
    #[arg(value_name = "LOGO")]
    logo_positional: Option<String>,

    /// Same as the positional LOGO argument
    #[arg(long, conflicts_with = "logo_positional")]
    logo: Option<String>,

    /// Initial window width in logical pixels
    #[arg(long, default_value_t = 1280.0)]
    width: f64,

    /// Initial window height in logical pixels
    #[arg(long, default_value_t = 720.0)]
    height: f64,

    /// Log filter in env_logger syntax (overrides RUST_LOG)
    #[arg(long)]
    log: Option<String>,

    /// Draw the cursor force mesh over the particles
    #[arg(long)]
    debug_cursor: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(LoggingConfig {
        env_filter: args.log.clone(),
        ..LoggingConfig::default()
    });

    let config = FieldConfig {
        debug_cursor: args.debug_cursor,
        ..FieldConfig::default()
    };

    let logo = args.logo.or(args.logo_positional);
    if logo.is_none() {
        log::info!("no logo given; drop an image on the window");
    }

    let app = ViewerApp::new(config, Arc::new(LogoResolver::new()), logo);

    Runtime::run(
        RuntimeConfig {
            initial_size: LogicalSize::new(args.width, args.height),
            ..RuntimeConfig::default()
        },
        GpuInit::default(),
        app,
    )
}
