use chrono::{DateTime, Utc};
use tracing::{error, info, info_span, instrument};

use crate::config::PublisherConfig;
use crate::error::BotError;
use crate::ledger::LedgerStore;
use crate::model::game::{GameRecord, GameState};
use crate::render;
use crate::report::RunSummary;
use crate::schedule::ScheduleLedger;
use crate::squabblr::ThreadPoster;
use crate::standings::StandingsLedger;

/// Opens a gamethread for every scheduled game about to kick off.
pub struct Publisher<'a> {
    config: PublisherConfig,
    poster: &'a dyn ThreadPoster,
    schedule_store: &'a dyn LedgerStore,
    standings_store: &'a dyn LedgerStore,
}

impl<'a> Publisher<'a> {
    pub fn new(
        config: PublisherConfig,
        poster: &'a dyn ThreadPoster,
        schedule_store: &'a dyn LedgerStore,
        standings_store: &'a dyn LedgerStore,
    ) -> Self {
        Self { config, poster, schedule_store, standings_store }
    }

    /// Scheduled games with `now <= kickoff <= now + lookahead`, earliest first.
    pub fn candidates<'r>(&self, games: &'r [GameRecord], now_utc: DateTime<Utc>) -> Vec<&'r GameRecord> {
        let window_end = now_utc.checked_add_signed(self.config.lookahead).unwrap_or(DateTime::<Utc>::MAX_UTC);
        let mut picked: Vec<&GameRecord> = games
            .iter()
            .filter(|g| g.state == GameState::Scheduled)
            .filter(|g| g.kickoff >= now_utc && g.kickoff <= window_end)
            .collect();
        picked.sort_by_key(|g| g.kickoff);
        picked
    }

    /// Accepts a specific current time `now_utc` to make this easier to test.
    #[instrument(level = "info", skip(self), fields(community = %self.config.community))]
    pub fn run(&self, now_utc: DateTime<Utc>) -> Result<RunSummary, BotError> {
        let mut ledger = ScheduleLedger::load(self.schedule_store)?;
        let standings = StandingsLedger::load(self.standings_store)?;
        let mut summary = RunSummary::new("publish");

        let candidates: Vec<GameRecord> = self.candidates(ledger.list(), now_utc).into_iter().cloned().collect();
        if candidates.is_empty() {
            info!("No games kicking off inside the lookahead window");
            return Ok(summary);
        }

        for (i, game) in candidates.iter().enumerate() {
            if i > 0 && !self.config.delay.is_zero() {
                std::thread::sleep(self.config.delay);
            }
            let _span = info_span!("publish_game", game_id = %game.external_id(), matchup = %game.matchup()).entered();
            let title = render::thread_title(game);
            let body = render::initial_thread_body(game, &standings);
            match self.poster.create(&self.config.community, &title, &body) {
                Ok(handle) => {
                    info!(handle = %handle, title = %title, "Gamethread posted");
                    ledger.set_state(game.external_id(), GameState::InProgress(handle));
                    summary.done += 1;
                }
                Err(e) => {
                    error!(error = %e, title = %title, "Failed to post gamethread; will retry next run");
                    summary.failed += 1;
                }
            }
        }

        if summary.done > 0 {
            match ledger.save() {
                Ok(written) => summary.ledger_written = written,
                Err(e) => {
                    error!(error = %e, "Failed to write schedule ledger after publishing");
                    summary.ledger_error = Some(e.to_string());
                }
            }
        }
        info!(summary = %summary, "Publisher finished");
        Ok(summary)
    }
}
