use chrono::{DateTime, Utc};
use tracing::{info, instrument};

use crate::config::DigestConfig;
use crate::error::BotError;
use crate::ledger::LedgerStore;
use crate::model::game::GameRecord;
use crate::render;
use crate::report::RunSummary;
use crate::schedule::ScheduleLedger;
use crate::squabblr::ThreadPoster;
use crate::standings::StandingsLedger;

/// Posts one summary of the upcoming week's slate. Read-only on the ledgers.
pub struct Digest<'a> {
    config: DigestConfig,
    poster: &'a dyn ThreadPoster,
    schedule_store: &'a dyn LedgerStore,
    standings_store: &'a dyn LedgerStore,
}

/// Week label of the earliest game still in the future.
pub fn current_week(games: &[GameRecord], now_utc: DateTime<Utc>) -> Option<&str> {
    games
        .iter()
        .filter(|g| g.kickoff > now_utc)
        .min_by_key(|g| g.kickoff)
        .map(|g| g.week.as_str())
}

/// All games of a week, earliest first.
pub fn games_in_week<'g>(games: &'g [GameRecord], week: &str) -> Vec<&'g GameRecord> {
    let mut picked: Vec<&GameRecord> = games.iter().filter(|g| g.week == week).collect();
    picked.sort_by_key(|g| g.kickoff);
    picked
}

impl<'a> Digest<'a> {
    pub fn new(
        config: DigestConfig,
        poster: &'a dyn ThreadPoster,
        schedule_store: &'a dyn LedgerStore,
        standings_store: &'a dyn LedgerStore,
    ) -> Self {
        Self { config, poster, schedule_store, standings_store }
    }

    #[instrument(level = "info", skip(self), fields(community = %self.config.community))]
    pub fn run(&self, now_utc: DateTime<Utc>) -> Result<RunSummary, BotError> {
        let ledger = ScheduleLedger::load(self.schedule_store)?;
        let mut summary = RunSummary::new("digest");

        let Some(week) = current_week(ledger.list(), now_utc) else {
            info!("No upcoming games; skipping weekly digest");
            return Ok(summary);
        };
        let games = games_in_week(ledger.list(), week);
        let standings = StandingsLedger::load(self.standings_store)?;

        let (title, body) = render::digest_post(week, self.config.season, &games, &standings);
        let handle = self.poster.create(&self.config.community, &title, &body)?;
        info!(handle = %handle, week = %week, games = games.len(), "Weekly digest posted");
        summary.done = 1;
        Ok(summary)
    }
}
