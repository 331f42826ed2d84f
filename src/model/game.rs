use std::fmt;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

/// Opaque post identifier handed back by the posting API.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ThreadHandle(String);

impl ThreadHandle {
    pub fn new(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ThreadHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle of a tracked game. A thread handle exists exactly when the
/// game has left `Scheduled`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameState {
    Scheduled,
    InProgress(ThreadHandle),
    Final(ThreadHandle),
}

impl GameState {
    pub const SCHEDULED: &'static str = "STATUS_SCHEDULED";
    pub const IN_PROGRESS: &'static str = "STATUS_IN_PROGRESS";
    pub const FINAL: &'static str = "STATUS_FINAL";

    pub fn status_name(&self) -> &'static str {
        match self {
            GameState::Scheduled => Self::SCHEDULED,
            GameState::InProgress(_) => Self::IN_PROGRESS,
            GameState::Final(_) => Self::FINAL,
        }
    }

    pub fn thread(&self) -> Option<&ThreadHandle> {
        match self {
            GameState::Scheduled => None,
            GameState::InProgress(h) | GameState::Final(h) => Some(h),
        }
    }

    /// Rebuild a state from its ledger columns, rejecting pairs that break
    /// the handle/status invariant.
    pub fn from_columns(status: &str, handle: &str) -> Result<Self, String> {
        let handle = handle.trim();
        match (status.trim(), handle.is_empty()) {
            (Self::SCHEDULED, true) => Ok(GameState::Scheduled),
            (Self::IN_PROGRESS, false) => Ok(GameState::InProgress(ThreadHandle::new(handle))),
            (Self::FINAL, false) => Ok(GameState::Final(ThreadHandle::new(handle))),
            (Self::SCHEDULED, false) => Err(format!("scheduled game already has thread {}", handle)),
            (Self::IN_PROGRESS | Self::FINAL, true) => Err(format!("{} game has no thread handle", status.trim())),
            (other, _) => Err(format!("unknown status {:?}", other)),
        }
    }
}

/// Descriptive fields of a game as reported by the scoreboard feed.
#[derive(Clone, Debug, PartialEq)]
pub struct FeedGame {
    pub external_id: String,
    pub week: String,
    pub kickoff: DateTime<Utc>,
    pub venue: String,
    pub home_team: String,
    pub away_team: String,
    pub home_short: String,
    pub away_short: String,
    pub link: String,
}

/// One row of the schedule ledger.
#[derive(Clone, Debug, PartialEq)]
pub struct GameRecord {
    pub week: String,
    pub kickoff: DateTime<Utc>,
    pub venue: String,
    pub home_team: String,
    pub away_team: String,
    pub home_short: String,
    pub away_short: String,
    pub link: String,
    pub state: GameState,
}

impl GameRecord {
    /// A newly seen game starts out scheduled without a thread.
    pub fn from_feed(game: FeedGame) -> Self {
        Self {
            week: game.week,
            kickoff: game.kickoff,
            venue: game.venue,
            home_team: game.home_team,
            away_team: game.away_team,
            home_short: game.home_short,
            away_short: game.away_short,
            link: game.link,
            state: GameState::Scheduled,
        }
    }

    /// Overwrite the descriptive fields from the feed, keeping state and thread.
    pub fn refresh_from(&mut self, game: FeedGame) {
        self.week = game.week;
        self.kickoff = game.kickoff;
        self.venue = game.venue;
        self.home_team = game.home_team;
        self.away_team = game.away_team;
        self.home_short = game.home_short;
        self.away_short = game.away_short;
        self.link = game.link;
    }

    pub fn external_id(&self) -> &str {
        external_id_from_link(&self.link)
    }

    pub fn matchup(&self) -> String {
        format!("{} at {}", self.away_team, self.home_team)
    }
}

const GAMECAST_BASE: &str = "https://www.espn.com/nfl/game/_/gameId";

/// Canonical gamecast URL for an ESPN game id.
pub fn gamecast_link(external_id: &str) -> String {
    format!("{}/{}", GAMECAST_BASE, external_id)
}

/// Pull the ESPN game id out of a gamecast link: the segment after `gameId/`
/// when present (empty if nothing follows it), the last non-empty path
/// segment otherwise.
pub fn external_id_from_link(link: &str) -> &str {
    let mut segments = link.split('/').filter(|s| !s.is_empty());
    let mut last = "";
    while let Some(seg) = segments.next() {
        if seg == "gameId" {
            return segments.next().unwrap_or("");
        }
        last = seg;
    }
    last
}

/// Ledger timestamp format, e.g. `2024-09-08T17:00Z`.
pub const KICKOFF_FORMAT: &str = "%Y-%m-%dT%H:%MZ";

pub fn format_kickoff_utc(dt: DateTime<Utc>) -> String {
    dt.format(KICKOFF_FORMAT).to_string()
}

/// Parse kickoff timestamps as ESPN and older ledgers wrote them.
pub fn parse_kickoff(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%:z") {
        return Some(dt.with_timezone(&Utc));
    }
    for pat in ["%Y-%m-%dT%H:%MZ", "%Y-%m-%dT%H:%M:%SZ"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, pat) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    None
}
