use std::path::Path;

use chrono::Utc;

use crate::events::{EventSource, GoogleApi};
use crate::oauth::ensure_credential;
use crate::report;

const PRIMARY_CALENDAR: &str = "primary";

/// The one thing this tool does: make sure a credential exists, fetch the
/// rest of today's events, print them.
pub async fn show_schedule(secrets_path: &Path, token_path: &Path) -> anyhow::Result<()> {
    show_schedule_from(&GoogleApi::new(), secrets_path, token_path).await
}

/// Command body, parameterized over the event source so tests can drive it
/// without the network.
///
/// Credential failures bubble up and kill the process; a failed event fetch
/// is logged once and the run still counts as a success.
pub async fn show_schedule_from(
    source: &impl EventSource,
    secrets_path: &Path,
    token_path: &Path,
) -> anyhow::Result<()> {
    let creds = ensure_credential(secrets_path, token_path).await?;

    let (start_time, end_time) = report::day_window(Utc::now());

    match source
        .list_events(&creds.access_token, PRIMARY_CALENDAR, start_time, end_time)
        .await
    {
        Ok(events) => {
            print!("{}", report::render_schedule(&events)?);
        }
        Err(err) => {
            tracing::error!("An error occurred: {err}");
        }
    }

    Ok(())
}
