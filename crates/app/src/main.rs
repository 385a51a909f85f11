use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use birrcheck_ocr::{MockRecognizer, OcrBackend};
use birrcheck_verify::{HttpGateway, ReceiptOutcome};

mod cli;
mod config;
mod processor;
mod watch;

use cli::{Cli, Command};
use config::AppConfig;
use processor::ReceiptProcessor;

fn build_recognizer(cli: &Cli, config: &AppConfig) -> anyhow::Result<Box<dyn OcrBackend>> {
    if let Some(text) = &cli.mock_text {
        tracing::warn!("using canned OCR text — no real recognition will run");
        return Ok(Box::new(MockRecognizer::from_text(text)));
    }

    #[cfg(feature = "tesseract")]
    {
        use birrcheck_ocr::recognizer::tesseract_backend::TesseractRecognizer;
        return Ok(Box::new(TesseractRecognizer::new(
            config.tessdata.clone(),
            &config.lang,
        )));
    }

    #[cfg(not(feature = "tesseract"))]
    {
        let _ = config;
        anyhow::bail!(
            "no OCR backend available: build with `--features tesseract` or pass --mock-text"
        )
    }
}

fn report(outcome: &ReceiptOutcome, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string(outcome)?);
    } else {
        println!("{}", outcome.user_message());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply_overrides(&cli);

    // One backend and one HTTP client for the lifetime of the process.
    let recognizer = build_recognizer(&cli, &config)?;
    let gateway = HttpGateway::new(config.verifier_config().timeout)?;
    let processor = ReceiptProcessor::new(recognizer, gateway, config.verifier_config());

    match cli.cmd {
        Command::Check { images } => {
            for image in &images {
                let outcome = processor.process_and_cleanup(image, cli.keep).await;
                report(&outcome, cli.json)?;
            }
        }
        Command::Watch { dir } => {
            anyhow::ensure!(dir.is_dir(), "watch target {} is not a directory", dir.display());

            // The channel bridges the notify watcher thread and the async
            // processing loop; the watcher must outlive the loop.
            let (tx, mut rx) = mpsc::channel::<PathBuf>(64);
            let _watcher = watch::spawn_intake_watcher(&dir, tx)
                .with_context(|| format!("watching {}", dir.display()))?;
            tracing::info!("watching intake folder: {}", dir.display());

            while let Some(path) = rx.recv().await {
                tracing::info!("processing receipt: {}", path.display());
                let outcome = processor.process_and_cleanup(&path, cli.keep).await;
                report(&outcome, cli.json)?;
            }
        }
    }

    Ok(())
}
