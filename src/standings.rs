use std::collections::HashMap;

use tracing::{info, instrument, warn};

use crate::csv::{self, cell, Columns};
use crate::error::BotError;
use crate::ledger::LedgerStore;
use crate::model::standing::TeamStanding;

pub const STANDINGS_FILENAME: &str = "nfl-standings.csv";

const HEADER: [&str; 7] = ["Conference", "Division", "Team", "Wins", "Losses", "Ties", "Win %"];

/// Team records keyed by display name.
#[derive(Debug, Default)]
pub struct StandingsLedger {
    rows: Vec<TeamStanding>,
    by_team: HashMap<String, usize>,
}

impl StandingsLedger {
    pub fn new(rows: Vec<TeamStanding>) -> Self {
        let by_team = rows.iter().enumerate().map(|(i, r)| (r.team.clone(), i)).collect();
        Self { rows, by_team }
    }

    #[instrument(level = "info", skip(store))]
    pub fn load(store: &dyn LedgerStore) -> Result<Self, BotError> {
        let text = store.read()?;
        let ledger = Self::from_csv(&text)?;
        info!(teams = ledger.rows.len(), "Loaded standings ledger");
        Ok(ledger)
    }

    pub fn from_csv(text: &str) -> Result<Self, BotError> {
        let mut rows = csv::parse_rows(text).into_iter();
        let Some(header) = rows.next() else {
            return Ok(Self::default());
        };
        let cols = Columns::new(&header);
        let idx = |name: &str| cols.index(name).map_err(BotError::Ledger);
        let (conference, division, team) = (idx("Conference")?, idx("Division")?, idx("Team")?);
        let (wins, losses, ties, pct) = (idx("Wins")?, idx("Losses")?, idx("Ties")?, idx("Win %")?);

        let number = |row: &[String], col: usize, line: usize| -> Result<u16, BotError> {
            let raw = cell(row, col).trim();
            raw.parse::<u16>()
                .map_err(|_| BotError::Ledger(format!("line {}: not a number: {:?}", line, raw)))
        };

        let mut parsed = Vec::new();
        for (n, row) in rows.enumerate() {
            let line = n + 2;
            parsed.push(TeamStanding {
                conference: cell(&row, conference).to_string(),
                division: cell(&row, division).to_string(),
                team: cell(&row, team).to_string(),
                wins: number(&row, wins, line)?,
                losses: number(&row, losses, line)?,
                ties: number(&row, ties, line)?,
                win_pct: cell(&row, pct).to_string(),
            });
        }
        Ok(Self::new(parsed))
    }

    pub fn rows(&self) -> &[TeamStanding] {
        &self.rows
    }

    pub fn get(&self, team: &str) -> Option<&TeamStanding> {
        self.by_team.get(team).map(|&i| &self.rows[i])
    }

    /// Display record for a team; teams missing from the table show `0-0`.
    pub fn record_for(&self, team: &str) -> String {
        match self.get(team) {
            Some(s) => s.record(),
            None => {
                warn!(team = %team, "Team missing from standings; showing 0-0");
                "0-0".to_string()
            }
        }
    }

    pub fn to_csv(&self) -> String {
        let mut out = String::new();
        csv::write_row(&mut out, &HEADER);
        for r in &self.rows {
            csv::write_row(
                &mut out,
                &[
                    r.conference.clone(),
                    r.division.clone(),
                    r.team.clone(),
                    r.wins.to_string(),
                    r.losses.to_string(),
                    r.ties.to_string(),
                    r.win_pct.clone(),
                ],
            );
        }
        out
    }

    /// Overwrite the stored table with these rows.
    pub fn replace(store: &dyn LedgerStore, rows: Vec<TeamStanding>) -> Result<Self, BotError> {
        let ledger = Self::new(rows);
        store.write(&ledger.to_csv())?;
        Ok(ledger)
    }
}
