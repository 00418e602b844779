//! One run of the watch job, end to end.

use calwatch_core::CalWatchResult;
use calwatch_core::config::Config;
use calwatch_core::diff::WeekDiff;
use calwatch_core::ics;
use calwatch_core::policy::RunPlan;
use calwatch_core::snapshot::WeekSnapshot;
use calwatch_core::store::SnapshotStore;
use calwatch_core::week::WeekWindow;
use chrono::NaiveDate;

use crate::notify::Notifier;
use crate::render::render_batch;
use crate::source::FeedSource;

/// Run the fetch -> diff -> notify -> persist pipeline for `today`.
///
/// The store is written strictly after delivery is attempted, so a crash
/// mid-run never marks unsent notifications as sent. Fetch and parse
/// failures log and return cleanly; the next scheduled run retries
/// implicitly.
pub async fn run(
    config: &Config,
    source: &impl FeedSource,
    notifier: &impl Notifier,
    today: NaiveDate,
    dry_run: bool,
) -> CalWatchResult<()> {
    let Some(window) = WeekWindow::resolve(today, config.preview_weekday) else {
        tracing::info!("rest day, nothing to send");
        return Ok(());
    };

    let week_id = window.week_id;
    tracing::debug!(week_id, start = %window.start, end = %window.end, "resolved week window");

    let raw = match source.fetch().await {
        Ok(raw) => raw,
        Err(e) => {
            tracing::error!(error = %e, "calendar fetch failed, aborting this run");
            return Ok(());
        }
    };

    let parsed = match ics::parse_feed(&raw) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::error!(error = %e, "calendar feed unparseable, aborting this run");
            return Ok(());
        }
    };

    let fresh = WeekSnapshot::build(&parsed, window, config.timezone);

    let store = SnapshotStore::new(&config.store_path, config.retained_weeks);
    let mut state = store.load();

    let diff = WeekDiff::compute(state.events_by_week.get(&week_id), &fresh);
    let plan = RunPlan::decide(&diff, &fresh, &mut state.notifications, config.renotify_changes);

    if plan.batches.is_empty() {
        tracing::info!(week_id, "no new changes to notify");
        return Ok(());
    }

    if dry_run {
        for batch in &plan.batches {
            let message = render_batch(batch, config.mention.as_deref(), config.username.as_deref());
            tracing::info!(
                content = %message.content,
                embeds = message.embeds.len(),
                "dry run, would deliver"
            );
        }
        return Ok(());
    }

    for batch in &plan.batches {
        let message = render_batch(batch, config.mention.as_deref(), config.username.as_deref());
        // One failed batch must not block the other batch or the save.
        match notifier.deliver(&message).await {
            Ok(()) => tracing::info!(week_id, content = %message.content, "notification delivered"),
            Err(e) => tracing::error!(week_id, error = %e, "notification delivery failed"),
        }
    }

    if plan.should_save {
        store.save(&fresh, &state.notifications)?;
    }

    Ok(())
}
