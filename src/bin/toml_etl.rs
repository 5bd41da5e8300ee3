use anyhow::Context;
use biomarker_etl::core::ConfigProvider;
use biomarker_etl::utils::{logger, validation::Validate};
use biomarker_etl::{DirectorySource, EtlEngine, LocalStorage, ReportPipeline, TomlConfig};
use clap::Parser;

#[derive(Parser)]
#[command(name = "toml-etl")]
#[command(about = "Biomarker extraction driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "biomarker-etl.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override the input directory from the config
    #[arg(long)]
    input_dir: Option<String>,

    /// Dry run - show what would be processed without executing
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = TomlConfig::from_file(&args.config)
        .with_context(|| format!("Failed to load config file '{}'", args.config))?;

    let verbose = args.verbose || config.log_level() == Some("debug");
    logger::init_logger(config.log_format().unwrap_or("text"), verbose);

    tracing::info!("📁 Loaded configuration from: {}", args.config);

    if let Some(input_dir) = args.input_dir {
        tracing::info!("🔧 Input directory overridden to: {}", input_dir);
        config.source.input_dir = Some(input_dir);
    }

    config.validate().context("Invalid configuration")?;

    if args.dry_run {
        print_plan(&config);
        return Ok(());
    }

    let source = DirectorySource::new(config.input_dir(), config.extensions());
    let storage = LocalStorage::new(".".to_string());
    let pipeline = ReportPipeline::new(storage, source, config)?;

    let summary = EtlEngine::new(pipeline)
        .run()
        .await
        .context("Biomarker extraction failed")?;

    println!(
        "✅ Extracted {} record(s), skipped {} report(s)",
        summary.result.dataset.len(),
        summary.result.skipped.len()
    );
    for output in &summary.outputs {
        println!("📁 Output saved to: {}", output);
    }

    Ok(())
}

fn print_plan(config: &TomlConfig) {
    println!("🔍 Dry run: {}", config.pipeline.name);
    if let Some(description) = &config.pipeline.description {
        println!("  {}", description);
    }
    println!("  Input: {} (*.{})", config.input_dir(), config.extensions().join(", *."));
    println!("  Date order: {:?}", config.date_order());
    println!("  Concurrency: {}", config.concurrency());
    println!("  Output: {}", config.output_path());
    for mirror in config.mirror_paths() {
        println!("  Mirror: {}", mirror);
    }
    println!("  Formats: {}", config.output_formats().join(", "));
}
