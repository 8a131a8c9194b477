use clap::Parser;
use form_prep::config::toml_config::TomlConfig;
use form_prep::domain::ports::ImageSource;
use form_prep::utils::monitor::SystemMonitor;
use form_prep::utils::{logger, validation::Validate};
use form_prep::{
    preview_url, CliConfig, ConsoleNotifier, FileInput, HttpSource, ImageOptimizer, LocalSource,
    PreviewPane, UploadEngine,
};
use std::path::Path;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);

    tracing::info!("🚀 Starting form-prep");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // Fold in the TOML file when one is given.
    if let Some(path) = config.config.clone() {
        match TomlConfig::from_file(&path) {
            Ok(file) => {
                file.validate()?;
                config.merge_toml(&file);
                tracing::info!("📁 Loaded configuration from: {}", path);
            }
            Err(e) => {
                eprintln!("❌ Failed to load config file '{}': {}", path, e);
                eprintln!("💡 Make sure the file exists and is valid TOML");
                std::process::exit(1);
            }
        }
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_message());
        std::process::exit(1);
    }

    let mut monitor = SystemMonitor::new(config.monitor);
    if monitor.is_enabled() {
        tracing::info!("🔍 System monitoring enabled");
    }

    // Pick the byte source from the input shape, like a picked file vs. a
    // server-stored one.
    let file = if config.input.starts_with("http://") || config.input.starts_with("https://") {
        HttpSource::new().fetch(&config.input).await?
    } else {
        LocalSource::new(".".to_string()).fetch(&config.input).await?
    };
    monitor.log_stats("Source loaded");

    let mut input = FileInput::new();
    input.select(file);
    let mut pane = PreviewPane::new("image-preview");

    let optimizer = ImageOptimizer::new(config.clone());
    let engine = UploadEngine::new(optimizer, config.clone(), ConsoleNotifier);

    match engine.submit(&mut input, &mut pane).await {
        Some(optimized) => {
            monitor.log_stats("Compression finished");

            std::fs::create_dir_all(&config.output_path)?;
            let destination = Path::new(&config.output_path).join(&optimized.name);
            std::fs::write(&destination, &optimized.bytes)?;

            let url = preview_url(&config.preview_base, &config.preview_path, &optimized.name)?;

            monitor.log_final_stats();
            println!("✅ Optimized image saved to: {}", destination.display());
            println!(
                "📐 {}x{}, {} bytes ({})",
                optimized.width,
                optimized.height,
                optimized.size(),
                optimized.kind.mime()
            );
            println!("🔍 Preview URL: {}", url);
        }
        None => {
            // The alert already told the user what went wrong.
            std::process::exit(1);
        }
    }

    Ok(())
}
