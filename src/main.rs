mod cli;
mod ui;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};
use convert_buddy::api::{JobApi, JobClient, JobStatus};
use convert_buddy::artifact;
use convert_buddy::config::ConvertConfig;
use convert_buddy::error::ConvertError;
use convert_buddy::orchestrator::Orchestrator;
use convert_buddy::selection::{ConversionTarget, InputFile, InputSelection, SelectionMode, TARGETS};
use convert_buddy::status::StatusProjector;
use ui::{JobProgress, JobSummary};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = ConvertConfig::load().context("failed to load configuration")?;
    if let Some(base) = cli.api_base {
        config.api_base = base;
    }
    if let Some(ms) = cli.poll_interval_ms {
        config.poll_interval_ms = ms;
    }
    config.normalize()?;

    match cli.command {
        Command::Convert {
            files,
            target,
            options,
            output,
            json,
        } => convert(&config, files, target, &options, output, json).await,
        Command::Status { job_id, json } => status(&config, &job_id, json).await,
        Command::Targets => {
            ui::print_targets(TARGETS);
            Ok(())
        }
        Command::Health => health(&config).await,
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

async fn convert(
    config: &ConvertConfig,
    paths: Vec<PathBuf>,
    target: Option<String>,
    raw_options: &str,
    output: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let target = ConversionTarget::new(target.unwrap_or_else(|| config.default_target.clone()));
    if target.info().is_none() {
        warn!(conversion = %target, "unknown conversion, sending it anyway");
    }

    let mut incoming = Vec::with_capacity(paths.len());
    for path in &paths {
        incoming.push(InputFile::from_path(path).await?);
    }
    if target.mode() == SelectionMode::Single && incoming.len() > 1 {
        warn!(conversion = %target, "single-file conversion, only the first file is sent");
    }
    let mut selection = InputSelection::for_target(&target);
    selection.replace_with(incoming);

    let client = Arc::new(JobClient::with_base_url(&config.api_base));
    let orch = Orchestrator::from_config(Arc::clone(&client), config);

    if !json {
        println!("Converting with {target}");
        ui::print_selection(&selection);
    }

    let submission = orch
        .submit(&target, &selection, raw_options)
        .await
        .map_err(ConvertError::from)?;

    let progress = (!json).then(|| Arc::new(JobProgress::start(&submission.job_id)));
    let forwarder = progress.as_ref().map(|p| {
        p.update(&submission.initial_view);
        let p = Arc::clone(p);
        orch.on_update(move |view| p.update(view))
    });

    let view = tokio::select! {
        view = orch.wait() => view,
        _ = tokio::signal::ctrl_c() => {
            orch.cancel();
            orch.current_view()
        }
    };
    if let Some(forwarder) = forwarder {
        forwarder.abort();
    }
    let Some(view) = view else {
        return Err(ConvertError::Cancelled.into());
    };
    if let Some(p) = &progress {
        p.complete(&view);
    }

    if view.status == JobStatus::Done
        && let Some(dir) = &output
        && let Some(url) = &view.download_url
    {
        let path = artifact::save_artifact(&client, url, dir).await?;
        if !json {
            println!("  Saved to {}", path.display());
        }
    }

    if json {
        let summary = JobSummary::new(
            submission.job_id.clone(),
            target.to_string(),
            selection.files().iter().map(|f| f.name.clone()).collect(),
            view.clone(),
            submission.submitted_at,
        );
        println!("{}", summary.to_json()?);
    }

    match view.status {
        JobStatus::Done => Ok(()),
        JobStatus::Error => Err(ConvertError::JobFailed(view.error.unwrap_or_default()).into()),
        _ => Err(ConvertError::Cancelled.into()),
    }
}

async fn status(config: &ConvertConfig, job_id: &str, json: bool) -> Result<()> {
    let client = JobClient::with_base_url(&config.api_base);
    let snapshot = client
        .get_status(job_id)
        .await
        .map_err(ConvertError::from)?;
    let view = StatusProjector::new(&config.api_base).project(&snapshot);

    if json {
        let json = serde_json::to_string_pretty(&view).map_err(ConvertError::from)?;
        println!("{json}");
        return Ok(());
    }

    let label = if view.label.is_empty() {
        snapshot.status.to_string()
    } else {
        view.label.to_string()
    };
    println!("{job_id}: {label} ({}%)", view.progress);
    if let Some(url) = &view.download_url {
        println!("  Download: {url}");
    }
    if let Some(error) = &view.error {
        println!("  Error: {error}");
    }
    Ok(())
}

async fn health(config: &ConvertConfig) -> Result<()> {
    let client = JobClient::with_base_url(&config.api_base);
    let ready = client
        .health()
        .await
        .with_context(|| format!("API at {} is unreachable", config.api_base))?;
    if !ready {
        bail!("API at {} reported not ready", config.api_base);
    }
    println!("API ready at {}", config.api_base);
    Ok(())
}
