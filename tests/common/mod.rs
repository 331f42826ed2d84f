#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::time::Duration;

use chrono::{DateTime, Utc};

use nfl_gamethread_bot::config::{DigestConfig, PublisherConfig, UpdaterConfig};
use nfl_gamethread_bot::error::BotError;
use nfl_gamethread_bot::espn::{self, ScoreboardSource};
use nfl_gamethread_bot::ledger::LedgerStore;
use nfl_gamethread_bot::model::game::{gamecast_link, FeedGame, GameRecord, GameState, ThreadHandle};
use nfl_gamethread_bot::model::snapshot::LiveSnapshot;
use nfl_gamethread_bot::model::standing::TeamStanding;
use nfl_gamethread_bot::schedule::schedule_to_csv;
use nfl_gamethread_bot::squabblr::ThreadPoster;

pub fn fixture(name: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{}", name)).expect("failed to read fixture")
}

pub const SCHEDULE_HEADER: &str = "Week,Date & Time,Stadium,Home Team,Away Team,Home Team Short,Away Team Short,Gamecast Link,Squabblr Hash ID,Status\n";

pub fn standings_csv() -> String {
    let rows = espn::standings_from_json(&fixture("standings.json")).expect("standings fixture");
    nfl_gamethread_bot::standings::StandingsLedger::new(rows).to_csv()
}

/// Ledger store held in memory, counting writes.
#[derive(Default)]
pub struct MemoryStore {
    pub content: RefCell<String>,
    pub writes: Cell<usize>,
    pub fail_reads: bool,
    pub fail_writes: bool,
}

impl MemoryStore {
    pub fn with(content: &str) -> Self {
        Self { content: RefCell::new(content.to_string()), ..Self::default() }
    }

    pub fn text(&self) -> String {
        self.content.borrow().clone()
    }
}

impl LedgerStore for MemoryStore {
    fn read(&self) -> Result<String, BotError> {
        if self.fail_reads {
            return Err(BotError::Ledger("store offline".to_string()));
        }
        Ok(self.content.borrow().clone())
    }

    fn write(&self, content: &str) -> Result<(), BotError> {
        if self.fail_writes {
            return Err(BotError::Ledger("store rejected write".to_string()));
        }
        *self.content.borrow_mut() = content.to_string();
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PostCall {
    Create { community: String, title: String, body: String },
    Patch { handle: String, body: String },
}

/// Records every call; titles containing one of `fail_titles` are rejected.
#[derive(Default)]
pub struct FakePoster {
    pub calls: RefCell<Vec<PostCall>>,
    pub fail_titles: HashSet<String>,
    pub fail_patches: bool,
    pub next_id: Cell<u32>,
}

impl FakePoster {
    pub fn failing_on(title_fragment: &str) -> Self {
        Self { fail_titles: [title_fragment.to_string()].into_iter().collect(), ..Self::default() }
    }

    pub fn creates(&self) -> Vec<(String, String, String)> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                PostCall::Create { community, title, body } => Some((community.clone(), title.clone(), body.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn patches(&self) -> Vec<(String, String)> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                PostCall::Patch { handle, body } => Some((handle.clone(), body.clone())),
                _ => None,
            })
            .collect()
    }
}

impl ThreadPoster for FakePoster {
    fn create(&self, community: &str, title: &str, body: &str) -> Result<ThreadHandle, BotError> {
        self.calls.borrow_mut().push(PostCall::Create {
            community: community.to_string(),
            title: title.to_string(),
            body: body.to_string(),
        });
        if self.fail_titles.iter().any(|f| title.contains(f.as_str())) {
            return Err(BotError::Post { action: "create post", reason: "HTTP 500".to_string() });
        }
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        Ok(ThreadHandle::new(format!("post{}", id)))
    }

    fn patch(&self, handle: &ThreadHandle, body: &str) -> Result<(), BotError> {
        self.calls
            .borrow_mut()
            .push(PostCall::Patch { handle: handle.to_string(), body: body.to_string() });
        if self.fail_patches {
            return Err(BotError::Post { action: "patch post", reason: "HTTP 502".to_string() });
        }
        Ok(())
    }
}

/// Scoreboard feed served from memory.
#[derive(Default)]
pub struct FakeScoreboard {
    pub weeks: Vec<(u8, Vec<FeedGame>)>,
    pub snapshots: RefCell<Vec<LiveSnapshot>>,
    pub standings: Vec<TeamStanding>,
    pub offline: bool,
    pub offline_week: Option<u8>,
}

impl FakeScoreboard {
    pub fn set_snapshots(&self, snapshots: Vec<LiveSnapshot>) {
        *self.snapshots.borrow_mut() = snapshots;
    }
}

fn offline() -> BotError {
    BotError::Malformed("scoreboard unreachable".to_string())
}

impl ScoreboardSource for FakeScoreboard {
    fn week_schedule(&self, week: u8) -> Result<Vec<FeedGame>, BotError> {
        if self.offline || self.offline_week == Some(week) {
            return Err(offline());
        }
        Ok(self.weeks.iter().find(|(w, _)| *w == week).map(|(_, g)| g.clone()).unwrap_or_default())
    }

    fn live_snapshots(&self) -> Result<Vec<LiveSnapshot>, BotError> {
        if self.offline {
            return Err(offline());
        }
        Ok(self.snapshots.borrow().clone())
    }

    fn standings(&self) -> Result<Vec<TeamStanding>, BotError> {
        if self.offline {
            return Err(offline());
        }
        Ok(self.standings.clone())
    }
}

pub fn feed_game(id: &str, week: u8, kickoff: DateTime<Utc>, away: &str, home: &str) -> FeedGame {
    let short = |name: &str| name.rsplit(' ').next().unwrap_or(name).to_string();
    FeedGame {
        external_id: id.to_string(),
        week: format!("Week {}", week),
        kickoff,
        venue: format!("{} Stadium", short(home)),
        home_team: home.to_string(),
        away_team: away.to_string(),
        home_short: short(home),
        away_short: short(away),
        link: gamecast_link(id),
    }
}

pub fn publisher_config(lookahead_hours: i64) -> PublisherConfig {
    PublisherConfig {
        community: "test".to_string(),
        lookahead: chrono::Duration::hours(lookahead_hours),
        delay: Duration::ZERO,
    }
}

pub fn updater_config() -> UpdaterConfig {
    UpdaterConfig { delay: Duration::ZERO }
}

pub fn digest_config() -> DigestConfig {
    DigestConfig { community: "NFL".to_string(), season: 2024 }
}

pub fn record(feed: FeedGame, state: GameState) -> GameRecord {
    let mut game = GameRecord::from_feed(feed);
    game.state = state;
    game
}

pub fn schedule_store(games: &[GameRecord]) -> MemoryStore {
    MemoryStore::with(&schedule_to_csv(games))
}
