//! `fecfile` - file reports with the FEC webload service
//!
//! Uploads `.fec` reports, follows their validation status, and runs
//! filing jobs end to end.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod settings;
mod store;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fecfile_core::{
    DirectorySource, FilingJob, FilingProcessor, StatusPoller, SubmissionResponse, Submitter,
};
use fecfile_webload::WebloadClient;
use settings::ServiceArgs;
use std::path::PathBuf;
use std::sync::Arc;
use store::ConsoleStore;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "fecfile")]
#[command(about = "Submit reports to the FEC and track their status")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    service: ServiceArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a report and wait for the FEC to finish validating it
    Submit {
        /// Report file to upload
        file: PathBuf,

        /// Committee ID (e.g. C00363168)
        #[arg(long, env = "FEC_COMMITTEE_ID")]
        committee_id: String,

        /// Filing password for the committee
        #[arg(long, env = "FEC_ID_PASSWORD", hide_env_values = true)]
        password: String,

        /// Up to two notification addresses separated by `;`
        #[arg(long, default_value = "")]
        emails: String,

        /// Return the upload response without polling for status
        #[arg(long)]
        no_poll: bool,
    },

    /// Check the status of a submission once
    Status {
        /// Submission ID returned by the upload
        submission_id: String,
    },

    /// Run a filing job described by a JSON file
    Process {
        /// Filing job file
        job: PathBuf,

        /// Directory the job's report file is read from
        #[arg(long, default_value = ".")]
        source_dir: PathBuf,

        /// Directory report copies are staged in
        #[arg(long, default_value_os_t = std::env::temp_dir())]
        work_dir: PathBuf,

        /// Filing password, used when the job file has none
        #[arg(long, env = "FEC_ID_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fecfile=info,fecfile_core=info,fecfile_webload=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let client = Arc::new(WebloadClient::new(cli.service.client_config()?)?);
    let cancel = cancel_on_ctrl_c();

    match cli.command {
        Commands::Submit {
            file,
            committee_id,
            password,
            emails,
            no_poll,
        } => {
            let config = cli.service.core_config(true)?;
            let submitter = Submitter::new(client.clone(), config.clone());
            let response = submitter
                .submit(&file, &emails, &committee_id, &password)
                .await
                .with_context(|| format!("Failed to submit {}", file.display()))?;

            let response = if response.is_processing() && !no_poll {
                let response = response.with_processing_explanation();
                info!(message = response.message(), "Waiting for the FEC to validate the report");
                StatusPoller::new(client, &config)
                    .with_cancellation(cancel)
                    .poll_for_status(&response)
                    .await
            } else {
                response
            };
            print_response(&response)
        }
        Commands::Status { submission_id } => {
            let config = cli.service.core_config(false)?;
            let response = StatusPoller::new(client, &config)
                .check_status(&submission_id)
                .await
                .with_context(|| format!("Failed to fetch status of {submission_id}"))?;
            print_response(&response)
        }
        Commands::Process {
            job,
            source_dir,
            work_dir,
            password,
        } => {
            let config = cli.service.core_config(true)?;
            let text = tokio::fs::read_to_string(&job)
                .await
                .with_context(|| format!("Failed to read job file {}", job.display()))?;
            let mut job: FilingJob = serde_json::from_str(&text).context("Invalid job file")?;
            if job.fec_id_password.is_empty()
                && let Some(password) = password
            {
                job.fec_id_password = password;
            }

            let processor = FilingProcessor::new(
                Submitter::new(client.clone(), config.clone()),
                StatusPoller::new(client, &config).with_cancellation(cancel),
                Arc::new(DirectorySource::new(source_dir)),
                Arc::new(ConsoleStore),
                work_dir,
            );
            processor.process(&job).await?;
            Ok(())
        }
    }
}

fn print_response(response: &SubmissionResponse) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(response)?);
    Ok(())
}

/// Cancels the returned token on the first Ctrl-C.
fn cancel_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                warn!("Interrupted, stopping after the current status check");
                trigger.cancel();
            }
            Err(err) => warn!(error = %err, "Unable to listen for Ctrl-C"),
        }
    });
    token
}
