//! Status polling loop.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::submission::{ERROR_STATUS, SubmissionResponse};
use fecfile_webload::WebloadService;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Stand-in deadline for limits too large to add to the current instant.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

const POLLING_FAILURE_MESSAGE: &str =
    "An unhandled exception occurred while polling the status of the FEC submission.";

/// What a single wait-and-check step decided.
#[derive(Debug)]
pub enum TickOutcome {
    /// Still processing; keep polling.
    Continue(SubmissionResponse),
    /// A terminal status was observed.
    StopTerminal(SubmissionResponse),
    /// The polling deadline passed.
    StopTimeout,
    /// The caller cancelled polling.
    StopCancelled,
    /// The status call failed.
    StopFailure(Error),
}

/// Polls a submission until the FEC stops reporting it as processing.
pub struct StatusPoller<S: ?Sized> {
    service: Arc<S>,
    interval: Duration,
    deadline: Duration,
    cancel: CancellationToken,
}

impl<S: WebloadService + ?Sized> StatusPoller<S> {
    /// Creates a poller using the interval and deadline from `config`.
    #[must_use]
    pub fn new(service: Arc<S>, config: &Config) -> Self {
        Self {
            service,
            interval: config.poll_interval(),
            deadline: config.poll_deadline(),
            cancel: CancellationToken::new(),
        }
    }

    /// Stops polling when `token` is cancelled.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Polls until a terminal status, the deadline, cancellation, or a failed
    /// check. Never fails: every stop path produces a response.
    ///
    /// Checks are strictly sequential. The deadline and cancellation are only
    /// observed between checks, so a call in flight always completes.
    pub async fn poll_for_status(&self, initial: &SubmissionResponse) -> SubmissionResponse {
        let submission_id = initial.submission_id();
        let mut latest = SubmissionResponse::cancelled_before_first_check(submission_id);

        let start = Instant::now();
        let deadline = start
            .checked_add(self.deadline)
            .unwrap_or_else(|| start + FAR_FUTURE);
        let mut ticks = time::interval_at(start + self.interval, self.interval);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            match self.tick(&mut ticks, deadline, submission_id).await {
                TickOutcome::Continue(response) => latest = response,
                TickOutcome::StopTerminal(response) => return response,
                TickOutcome::StopTimeout => {
                    warn!(
                        submission_id,
                        status = latest.status(),
                        "Polling deadline reached"
                    );
                    return latest.with_message(timeout_message(self.deadline));
                }
                TickOutcome::StopCancelled => {
                    info!(submission_id, "Status polling cancelled");
                    return latest;
                }
                TickOutcome::StopFailure(err) => {
                    let failed = latest
                        .with_status(ERROR_STATUS)
                        .with_message(POLLING_FAILURE_MESSAGE);
                    error!(
                        error = %err,
                        submission_id,
                        response = ?failed,
                        "Error while polling submission status"
                    );
                    return failed;
                }
            }
        }
    }

    async fn tick(&self, ticks: &mut Interval, deadline: Instant, submission_id: &str) -> TickOutcome {
        tokio::select! {
            biased;
            () = self.cancel.cancelled() => return TickOutcome::StopCancelled,
            () = time::sleep_until(deadline) => return TickOutcome::StopTimeout,
            _ = ticks.tick() => {}
        }

        match self.check_status(submission_id).await {
            Ok(response) if response.is_processing() => TickOutcome::Continue(response),
            Ok(response) => TickOutcome::StopTerminal(response),
            Err(err) => TickOutcome::StopFailure(err),
        }
    }

    /// Fetches the current status once, with placeholder messages rewritten.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails or the reply is not a response object.
    pub async fn check_status(&self, submission_id: &str) -> Result<SubmissionResponse> {
        info!(submission_id, "Requesting submission status from fec.gov");
        let reply = self.service.status(submission_id).await?;
        let response =
            SubmissionResponse::from_wire(&reply)?.unwrap_or_else(SubmissionResponse::unknown_status);
        info!(submission_id, response = ?response, "fec.gov reported submission status");
        Ok(response.rewrite_placeholder())
    }
}

fn timeout_message(limit: Duration) -> String {
    format!(
        "Giving up checking the status of the FEC submission. fec.gov continued to report a \
         status of Processing after {}.",
        describe_limit(limit)
    )
}

/// Renders a duration in the largest whole unit (`8 hours`, `90 minutes`).
fn describe_limit(limit: Duration) -> String {
    let secs = limit.as_secs();
    let (count, unit) = if secs >= 3600 && secs % 3600 == 0 {
        (secs / 3600, "hour")
    } else if secs >= 60 && secs % 60 == 0 {
        (secs / 60, "minute")
    } else {
        (secs, "second")
    };

    if count == 1 {
        format!("1 {unit}")
    } else {
        format!("{count} {unit}s")
    }
}
