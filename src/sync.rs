use tracing::{error, info, instrument};

use crate::error::BotError;
use crate::espn::ScoreboardSource;
use crate::ledger::LedgerStore;
use crate::model::game::{FeedGame, GameRecord};
use crate::report::RunSummary;
use crate::schedule::ScheduleLedger;
use crate::standings::StandingsLedger;

/// Keeps the schedule ledger in step with the scoreboard feed.
pub struct ScheduleSync<'a> {
    source: &'a dyn ScoreboardSource,
    store: &'a dyn LedgerStore,
    weeks: Vec<u8>,
}

impl<'a> ScheduleSync<'a> {
    pub fn new(source: &'a dyn ScoreboardSource, store: &'a dyn LedgerStore, weeks: Vec<u8>) -> Self {
        Self { source, store, weeks }
    }

    /// Fetch every configured week, then merge into the ledger. Nothing is
    /// written unless every fetch succeeded.
    #[instrument(level = "info", skip(self), fields(weeks = self.weeks.len()))]
    pub fn run(&self) -> Result<RunSummary, BotError> {
        let mut feed: Vec<FeedGame> = Vec::new();
        for &week in &self.weeks {
            feed.extend(self.source.week_schedule(week)?);
        }
        info!(games = feed.len(), "Fetched schedule feed");

        let mut ledger = ScheduleLedger::load(self.store)?;
        let mut summary = RunSummary::new("schedule");
        summary.done = merge_feed(&mut ledger, feed);

        match ledger.save() {
            Ok(written) => summary.ledger_written = written,
            Err(e) => {
                error!(error = %e, "Failed to write schedule ledger");
                summary.ledger_error = Some(e.to_string());
            }
        }
        info!(summary = %summary, "Schedule sync finished");
        Ok(summary)
    }
}

/// Merge feed games into the ledger: known ids get fresh descriptive fields
/// and keep their state and thread, unknown ids arrive as scheduled.
/// Returns how many feed games were applied.
pub fn merge_feed(ledger: &mut ScheduleLedger<'_>, feed: Vec<FeedGame>) -> usize {
    let mut applied = 0;
    for game in feed {
        let record = match ledger.get_by_external_id(&game.external_id) {
            Some(existing) => {
                let mut updated = existing.clone();
                updated.refresh_from(game);
                updated
            }
            None => GameRecord::from_feed(game),
        };
        ledger.upsert(record);
        applied += 1;
    }
    applied
}

/// Replaces the standings ledger with the feed's current table.
pub struct StandingsSync<'a> {
    source: &'a dyn ScoreboardSource,
    store: &'a dyn LedgerStore,
}

impl<'a> StandingsSync<'a> {
    pub fn new(source: &'a dyn ScoreboardSource, store: &'a dyn LedgerStore) -> Self {
        Self { source, store }
    }

    #[instrument(level = "info", skip(self))]
    pub fn run(&self) -> Result<RunSummary, BotError> {
        let rows = self.source.standings()?;
        let mut summary = RunSummary::new("standings");
        summary.done = rows.len();
        match StandingsLedger::replace(self.store, rows) {
            Ok(_) => summary.ledger_written = true,
            Err(e) => {
                error!(error = %e, "Failed to write standings ledger");
                summary.ledger_error = Some(e.to_string());
            }
        }
        info!(summary = %summary, "Standings sync finished");
        Ok(summary)
    }
}
