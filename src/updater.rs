use chrono::{DateTime, Utc};
use tracing::{error, info, info_span, instrument, warn};

use crate::config::UpdaterConfig;
use crate::error::BotError;
use crate::espn::ScoreboardSource;
use crate::ledger::LedgerStore;
use crate::model::game::{GameRecord, GameState};
use crate::model::snapshot::LiveSnapshot;
use crate::render;
use crate::report::RunSummary;
use crate::schedule::ScheduleLedger;
use crate::squabblr::ThreadPoster;
use crate::standings::StandingsLedger;

/// Refreshes open gamethreads from the live scoreboard and finalizes
/// finished games.
pub struct Updater<'a> {
    config: UpdaterConfig,
    source: &'a dyn ScoreboardSource,
    poster: &'a dyn ThreadPoster,
    schedule_store: &'a dyn LedgerStore,
    standings_store: &'a dyn LedgerStore,
}

/// Find the snapshot for a tracked game by its ESPN id.
pub fn match_snapshot<'s>(game: &GameRecord, snapshots: &'s [LiveSnapshot]) -> Option<&'s LiveSnapshot> {
    snapshots.iter().find(|s| s.external_id == game.external_id())
}

impl<'a> Updater<'a> {
    pub fn new(
        config: UpdaterConfig,
        source: &'a dyn ScoreboardSource,
        poster: &'a dyn ThreadPoster,
        schedule_store: &'a dyn LedgerStore,
        standings_store: &'a dyn LedgerStore,
    ) -> Self {
        Self { config, source, poster, schedule_store, standings_store }
    }

    /// `now_utc` only feeds the "last update" line of the rendered body.
    #[instrument(level = "info", skip(self))]
    pub fn run(&self, now_utc: DateTime<Utc>) -> Result<RunSummary, BotError> {
        let mut ledger = ScheduleLedger::load(self.schedule_store)?;
        let mut summary = RunSummary::new("update");

        let active: Vec<GameRecord> = ledger
            .list()
            .iter()
            .filter(|g| matches!(g.state, GameState::InProgress(_)))
            .cloned()
            .collect();
        if active.is_empty() {
            info!("No games are in progress");
            return Ok(summary);
        }

        let standings = StandingsLedger::load(self.standings_store)?;
        let snapshots = self.source.live_snapshots()?;

        let mut patched_any = false;
        let mut finalized = 0;
        for game in &active {
            let GameState::InProgress(handle) = &game.state else {
                continue;
            };
            let _span = info_span!("update_game", game_id = %game.external_id(), matchup = %game.matchup()).entered();

            let Some(snapshot) = match_snapshot(game, &snapshots) else {
                warn!("No live snapshot for game; skipping");
                summary.skipped += 1;
                continue;
            };

            if patched_any && !self.config.delay.is_zero() {
                std::thread::sleep(self.config.delay);
            }
            patched_any = true;

            let body = render::live_thread_body(game, &standings, snapshot, now_utc);
            if let Err(e) = self.poster.patch(handle, &body) {
                error!(error = %e, handle = %handle, "Failed to update gamethread; will retry next run");
                summary.failed += 1;
                continue;
            }
            summary.done += 1;
            info!(handle = %handle, status = ?snapshot.status, "Gamethread updated");

            if snapshot.status.is_terminal() {
                info!(handle = %handle, "Game is final; closing it out in the ledger");
                ledger.set_state(game.external_id(), GameState::Final(handle.clone()));
                finalized += 1;
            }
        }

        if finalized > 0 {
            match ledger.save() {
                Ok(written) => summary.ledger_written = written,
                Err(e) => {
                    error!(error = %e, "Failed to write schedule ledger after updates");
                    summary.ledger_error = Some(e.to_string());
                }
            }
        }
        info!(summary = %summary, "Updater finished");
        Ok(summary)
    }
}
