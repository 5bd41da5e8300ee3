use biomarker_etl::core::{clinical, export, Storage};
use biomarker_etl::utils::error::ErrorSeverity;
use biomarker_etl::utils::{logger, validation::Validate};
use biomarker_etl::{
    CliConfig, Dataset, DirectorySource, EtlEngine, EtlError, LocalStorage, ReportPipeline, Result,
};
use clap::Parser;

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    logger::init_logger(&config.log_format, config.verbose);

    tracing::info!("Starting biomarker-etl");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let storage = LocalStorage::new(".".to_string());

    if let Some(path) = &config.summarize {
        match load_dataset(&storage, path).await {
            Ok(dataset) => print_summary(&dataset),
            Err(e) => fail(&e),
        }
        return Ok(());
    }

    let source = DirectorySource::new(&config.input_dir, &config.extensions);
    let pipeline = match ReportPipeline::new(storage, source, config) {
        Ok(pipeline) => pipeline,
        Err(e) => fail(&e),
    };
    let engine = EtlEngine::new(pipeline);

    match engine.run().await {
        Ok(summary) => {
            for skipped in &summary.result.skipped {
                println!("⚠️  Skipped {}: {}", skipped.name, skipped.reason);
            }
            println!(
                "✅ Extracted {} record(s) from {} report(s)",
                summary.result.dataset.len(),
                summary.result.documents_seen()
            );
            for output in &summary.outputs {
                println!("📁 Output saved to: {}", output);
            }
            print_summary(&summary.result.dataset);
        }
        Err(e) => fail(&e),
    }

    Ok(())
}

async fn load_dataset(storage: &LocalStorage, path: &str) -> Result<Dataset> {
    let bytes = storage.read_file(path).await?;
    let content = String::from_utf8(bytes).map_err(|e| EtlError::ProcessingError {
        message: format!("{} is not UTF-8: {}", path, e),
    })?;
    export::decode_json(&content)
}

/// Latest value of every marker with its clinical reading.
fn print_summary(dataset: &Dataset) {
    let latest = dataset.latest_values();
    if latest.is_empty() {
        return;
    }

    println!("\nLatest values:");
    for (marker, (date, value)) in latest {
        let unit = clinical::unit(marker).unwrap_or("");
        match clinical::classify(marker, value) {
            Some(level) => println!(
                "  {:<18} {:>8} {:<6} {}  {:<10} {}",
                marker,
                value,
                unit,
                date,
                level.to_string(),
                clinical::interpretation(marker, value)
            ),
            None => println!("  {:<18} {:>8} {:<6} {}", marker, value, unit, date),
        }
    }
}

fn fail(e: &EtlError) -> ! {
    tracing::error!(
        "❌ Biomarker extraction failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
