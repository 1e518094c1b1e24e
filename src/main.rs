use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

// Declare modules
mod config;
mod error;
mod models;
mod parser;
mod render;
mod site;
mod slug;

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "listing_sitegen=info".into())) // Default to info if RUST_LOG not set
        .with(fmt::layer())
        .init();

    // Load configuration
    let settings = match config::Settings::new() {
        Ok(s) => {
            tracing::info!("Configuration loaded successfully.");
            s
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };
    tracing::debug!(?settings, "Effective settings");

    let report = site::generate(&settings).with_context(|| {
        format!(
            "Failed to generate site from {}",
            settings.input_path.display()
        )
    })?;

    println!(
        "Generated {} listing pages in {}/",
        report.listings,
        report.pages_dir.display()
    );
    Ok(())
}
