use std::collections::HashSet;

use tracing::{info, instrument};

use crate::csv::{self, cell, Columns};
use crate::error::BotError;
use crate::ledger::LedgerStore;
use crate::model::game::{format_kickoff_utc, parse_kickoff, GameRecord, GameState};

pub const SCHEDULE_FILENAME: &str = "nfl-schedule.csv";

const HEADER: [&str; 10] = [
    "Week",
    "Date & Time",
    "Stadium",
    "Home Team",
    "Away Team",
    "Home Team Short",
    "Away Team Short",
    "Gamecast Link",
    "Squabblr Hash ID",
    "Status",
];

/// Typed view of the schedule ledger. Reads the whole table on `load`,
/// mutates in memory, and writes the whole table back on `save`.
pub struct ScheduleLedger<'a> {
    store: &'a dyn LedgerStore,
    records: Vec<GameRecord>,
    loaded: String,
}

impl<'a> ScheduleLedger<'a> {
    #[instrument(level = "info", skip(store))]
    pub fn load(store: &'a dyn LedgerStore) -> Result<Self, BotError> {
        let loaded = store.read()?;
        let records = parse_schedule(&loaded)?;
        info!(games = records.len(), "Loaded schedule ledger");
        Ok(Self { store, records, loaded })
    }

    pub fn list(&self) -> &[GameRecord] {
        &self.records
    }

    pub fn get_by_external_id(&self, external_id: &str) -> Option<&GameRecord> {
        self.records.iter().find(|r| r.external_id() == external_id)
    }

    /// Insert the record, or replace the one with the same external id.
    pub fn upsert(&mut self, record: GameRecord) {
        match self.records.iter_mut().find(|r| r.external_id() == record.external_id()) {
            Some(existing) => *existing = record,
            None => self.records.push(record),
        }
    }

    /// Move a tracked game to a new state. Returns false for unknown ids.
    pub fn set_state(&mut self, external_id: &str, state: GameState) -> bool {
        match self.records.iter_mut().find(|r| r.external_id() == external_id) {
            Some(r) => {
                r.state = state;
                true
            }
            None => false,
        }
    }

    pub fn to_csv(&self) -> String {
        schedule_to_csv(&self.records)
    }

    /// Write the table back. Skips the remote write when nothing changed;
    /// returns whether a write happened.
    #[instrument(level = "info", skip(self), fields(games = self.records.len()))]
    pub fn save(&mut self) -> Result<bool, BotError> {
        let content = self.to_csv();
        if content == self.loaded {
            info!("Schedule ledger unchanged; skipping write");
            return Ok(false);
        }
        self.store.write(&content)?;
        self.loaded = content;
        Ok(true)
    }
}

/// Parse ledger text. An empty ledger is an empty schedule.
pub fn parse_schedule(text: &str) -> Result<Vec<GameRecord>, BotError> {
    let mut rows = csv::parse_rows(text).into_iter();
    let Some(header) = rows.next() else {
        return Ok(Vec::new());
    };
    let cols = Columns::new(&header);
    let idx = |name: &str| cols.index(name).map_err(BotError::Ledger);
    let week = idx("Week")?;
    let kickoff_col = idx("Date & Time")?;
    let stadium = idx("Stadium")?;
    let home = idx("Home Team")?;
    let away = idx("Away Team")?;
    let home_short = idx("Home Team Short")?;
    let away_short = idx("Away Team Short")?;
    let link = idx("Gamecast Link")?;
    let handle = idx("Squabblr Hash ID")?;
    let status = idx("Status")?;

    let mut seen = HashSet::new();
    let mut records = Vec::new();
    for (n, row) in rows.enumerate() {
        let line = n + 2;
        let raw_kickoff = cell(&row, kickoff_col);
        let kickoff = parse_kickoff(raw_kickoff)
            .ok_or_else(|| BotError::Ledger(format!("line {}: bad kickoff {:?}", line, raw_kickoff)))?;
        let state = GameState::from_columns(cell(&row, status), cell(&row, handle))
            .map_err(|e| BotError::Ledger(format!("line {}: {}", line, e)))?;
        let record = GameRecord {
            week: cell(&row, week).to_string(),
            kickoff,
            venue: cell(&row, stadium).to_string(),
            home_team: cell(&row, home).to_string(),
            away_team: cell(&row, away).to_string(),
            home_short: cell(&row, home_short).to_string(),
            away_short: cell(&row, away_short).to_string(),
            link: cell(&row, link).to_string(),
            state,
        };
        if record.external_id().is_empty() {
            return Err(BotError::Ledger(format!("line {}: no game id in link {:?}", line, record.link)));
        }
        if !seen.insert(record.external_id().to_string()) {
            return Err(BotError::Ledger(format!("line {}: duplicate game id {}", line, record.external_id())));
        }
        records.push(record);
    }
    Ok(records)
}

/// Serialize ledger rows, ordered by kickoff then game id so repeated runs
/// produce identical text.
pub fn schedule_to_csv(records: &[GameRecord]) -> String {
    let mut sorted: Vec<&GameRecord> = records.iter().collect();
    sorted.sort_by(|a, b| a.kickoff.cmp(&b.kickoff).then_with(|| a.external_id().cmp(b.external_id())));

    let mut out = String::new();
    csv::write_row(&mut out, &HEADER);
    for r in sorted {
        let kickoff = format_kickoff_utc(r.kickoff);
        let handle = r.state.thread().map(|h| h.as_str()).unwrap_or("");
        csv::write_row(
            &mut out,
            &[
                r.week.as_str(),
                kickoff.as_str(),
                r.venue.as_str(),
                r.home_team.as_str(),
                r.away_team.as_str(),
                r.home_short.as_str(),
                r.away_short.as_str(),
                r.link.as_str(),
                handle,
                r.state.status_name(),
            ],
        );
    }
    out
}
