use std::{path::PathBuf, time::Instant};

use anyhow::{bail, Context, Result};
use clap::Parser;
use client_core::{load_settings, HttpClassificationTransport, PageView, UploadController};
use tracing_subscriber::EnvFilter;

/// Submit one EEG recording to the classification service and print the diagnosis.
#[derive(Parser, Debug)]
struct Args {
    /// Recording to upload (.raw or .npz as accepted by the service).
    #[arg(long)]
    file: Option<PathBuf>,
    #[arg(long)]
    server_url: Option<String>,
    #[arg(long)]
    endpoint_path: Option<String>,
    /// Print the normalized result as JSON instead of the summary.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings();
    if let Some(server_url) = args.server_url {
        settings.server_url = server_url;
    }
    if let Some(endpoint_path) = args.endpoint_path {
        settings.endpoint_path = endpoint_path;
    }
    let transport = HttpClassificationTransport::from_settings(&settings)
        .context("failed to configure classification endpoint")?;

    let mut controller = UploadController::new();
    controller.select(args.file);
    println!("{}", controller.selection().indicator());

    if let Err(err) = controller.submit(&transport).await {
        bail!("{}", err.alert_message());
    }

    if args.json {
        let result = controller
            .result()
            .context("classification finished without a result")?;
        println!("{}", serde_json::to_string_pretty(result)?);
    } else {
        print_summary(&controller.view(Instant::now()));
    }

    Ok(())
}

fn print_summary(view: &PageView) {
    let Some(result) = &view.result else {
        return;
    };
    println!("{}", result.badge_text);
    println!("Prediction: {}", result.label);
    println!("Confidence: {}%", result.percent);
    if let Some(subject) = &result.subject {
        println!("Subject: {subject}");
    }
    if !result.votes.is_empty() {
        let votes = result
            .votes
            .iter()
            .map(|(class, count)| format!("{class}={count}"))
            .collect::<Vec<_>>()
            .join(", ");
        println!("Votes: {votes}");
    }
    println!("{}", result.raw_json);
}
