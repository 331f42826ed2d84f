use tracing::{error, info, info_span, instrument, warn};

use crate::error::BotError;
use crate::model::espn::{Competition, Competitor, Event, ScoreboardDocument};
use crate::model::game::{gamecast_link, parse_kickoff, FeedGame};
use crate::model::snapshot::{LiveSnapshot, LiveStatus, SideScore};
use crate::model::standing::TeamStanding;
use crate::model::standings_feed::StandingsDocument;

pub const ESPN_SITE_NFL: &str = "https://site.api.espn.com/apis/site/v2/sports/football/nfl";
pub const ESPN_STANDINGS: &str = "https://cdn.espn.com/core/nfl/standings?xhr=1";

/// Read side of the ESPN feed, as the bots need it.
pub trait ScoreboardSource {
    /// Every game of one regular-season week.
    fn week_schedule(&self, week: u8) -> Result<Vec<FeedGame>, BotError>;
    /// Current scoreboard, one snapshot per game.
    fn live_snapshots(&self) -> Result<Vec<LiveSnapshot>, BotError>;
    /// League standings, one row per team.
    fn standings(&self) -> Result<Vec<TeamStanding>, BotError>;
}

/// Blocking client for ESPN's public NFL endpoints.
#[derive(Debug, Clone)]
pub struct Espn {
    site_base: String,
    standings_url: String,
    season: i32,
    season_type: u8,
}

impl Espn {
    pub fn new(season: i32, season_type: u8) -> Self {
        Self::with_urls(ESPN_SITE_NFL.to_string(), ESPN_STANDINGS.to_string(), season, season_type)
    }

    pub fn with_urls(site_base: String, standings_url: String, season: i32, season_type: u8) -> Self {
        Self { site_base, standings_url, season, season_type }
    }

    fn get(&self, url: &str) -> Result<String, BotError> {
        let response = {
            let _span = info_span!("espn_fetch", url = %url).entered();
            ureq::get(url).call()
        };
        response
            .and_then(|resp| resp.into_body().read_to_string())
            .map_err(|e| {
                error!(error = %e, url = %url, "ESPN request failed");
                BotError::http(url, e)
            })
    }

    fn scoreboard(&self, url: &str) -> Result<ScoreboardDocument, BotError> {
        let body = self.get(url)?;
        serde_json::from_str(&body).map_err(|e| BotError::decode(url, e))
    }
}

impl ScoreboardSource for Espn {
    #[instrument(level = "info", skip(self), fields(season = self.season))]
    fn week_schedule(&self, week: u8) -> Result<Vec<FeedGame>, BotError> {
        let url = format!(
            "{}/scoreboard?dates={}&seasontype={}&week={}",
            self.site_base.trim_end_matches('/'),
            self.season,
            self.season_type,
            week
        );
        let doc = self.scoreboard(&url)?;
        let games = feed_games(doc);
        info!(week, games = games.len(), "Fetched week schedule");
        Ok(games)
    }

    #[instrument(level = "info", skip(self))]
    fn live_snapshots(&self) -> Result<Vec<LiveSnapshot>, BotError> {
        let url = format!("{}/scoreboard", self.site_base.trim_end_matches('/'));
        let doc = self.scoreboard(&url)?;
        let snapshots = live_snapshots(doc);
        info!(snapshots = snapshots.len(), "Fetched live scoreboard");
        Ok(snapshots)
    }

    #[instrument(level = "info", skip(self))]
    fn standings(&self) -> Result<Vec<TeamStanding>, BotError> {
        let body = self.get(&self.standings_url)?;
        let doc: StandingsDocument =
            serde_json::from_str(&body).map_err(|e| BotError::decode(&self.standings_url, e))?;
        let rows = team_standings(doc)?;
        info!(teams = rows.len(), "Fetched standings");
        Ok(rows)
    }
}

/// Parse a scoreboard body into schedule entries (no network).
pub fn feed_games_from_json(body: &str) -> Result<Vec<FeedGame>, serde_json::Error> {
    serde_json::from_str::<ScoreboardDocument>(body).map(feed_games)
}

/// Parse a scoreboard body into live snapshots (no network).
pub fn snapshots_from_json(body: &str) -> Result<Vec<LiveSnapshot>, serde_json::Error> {
    serde_json::from_str::<ScoreboardDocument>(body).map(live_snapshots)
}

/// Parse a standings body (no network).
pub fn standings_from_json(body: &str) -> Result<Vec<TeamStanding>, BotError> {
    let doc: StandingsDocument =
        serde_json::from_str(body).map_err(|e| BotError::Malformed(format!("standings document: {}", e)))?;
    team_standings(doc)
}

fn side<'a>(competition: &'a Competition, home_away: &str) -> Option<&'a Competitor> {
    competition.competitors.iter().find(|c| c.home_away == home_away)
}

fn short_name(c: &Competitor) -> String {
    c.team
        .short_display_name
        .clone()
        .or_else(|| c.team.abbreviation.clone())
        .unwrap_or_else(|| c.team.display_name.clone())
}

fn feed_games(doc: ScoreboardDocument) -> Vec<FeedGame> {
    doc.events.iter().filter_map(feed_game).collect()
}

fn feed_game(event: &Event) -> Option<FeedGame> {
    if event.id.trim().is_empty() {
        warn!(date = %event.date, "Skipping event without an id");
        return None;
    }
    let Some(kickoff) = parse_kickoff(&event.date) else {
        warn!(event_id = %event.id, date = %event.date, "Skipping event with unparseable date");
        return None;
    };
    let competition = event.competitions.first()?;
    let (Some(home), Some(away)) = (side(competition, "home"), side(competition, "away")) else {
        warn!(event_id = %event.id, "Skipping event without both competitors");
        return None;
    };
    let week = event
        .week
        .as_ref()
        .map(|w| format!("Week {}", w.number))
        .unwrap_or_else(|| "Week ?".to_string());
    let venue = competition
        .venue
        .as_ref()
        .and_then(|v| v.full_name.clone())
        .unwrap_or_default();

    Some(FeedGame {
        external_id: event.id.clone(),
        week,
        kickoff,
        venue,
        home_team: home.team.display_name.clone(),
        away_team: away.team.display_name.clone(),
        home_short: short_name(home),
        away_short: short_name(away),
        link: gamecast_link(&event.id),
    })
}

fn side_score(c: &Competitor) -> SideScore {
    SideScore {
        short_name: short_name(c),
        line_scores: c.linescores.iter().map(|l| l.value.max(0.0) as u16).collect(),
        total: c
            .score
            .as_deref()
            .and_then(|s| s.trim().parse::<u16>().ok())
            .unwrap_or(0),
    }
}

fn live_snapshots(doc: ScoreboardDocument) -> Vec<LiveSnapshot> {
    doc.events.iter().filter_map(live_snapshot).collect()
}

fn live_snapshot(event: &Event) -> Option<LiveSnapshot> {
    if event.id.trim().is_empty() {
        return None;
    }
    let competition = event.competitions.first()?;
    let status = competition.status.as_ref().or(event.status.as_ref())?;
    let (Some(home), Some(away)) = (side(competition, "home"), side(competition, "away")) else {
        warn!(event_id = %event.id, "Skipping snapshot without both competitors");
        return None;
    };
    Some(LiveSnapshot {
        external_id: event.id.clone(),
        status: LiveStatus::from_espn(&status.status_type),
        period: status.period,
        clock: status.display_clock.clone(),
        home: side_score(home),
        away: side_score(away),
    })
}

fn stat(values: &[String], idx: usize, team: &str, label: &str) -> Result<u16, BotError> {
    let raw = values
        .get(idx)
        .ok_or_else(|| BotError::Malformed(format!("{} has no {} stat", team, label)))?;
    raw.trim()
        .parse::<u16>()
        .map_err(|_| BotError::Malformed(format!("{} has non-numeric {}: {:?}", team, label, raw)))
}

fn team_standings(doc: StandingsDocument) -> Result<Vec<TeamStanding>, BotError> {
    let mut rows = Vec::new();
    for conference in doc.content.standings.groups {
        for division in conference.groups {
            for entry in division.standings.entries {
                let team = entry.team.display_name;
                let values: Vec<String> = entry.stats.into_iter().take(4).map(|s| s.display_value).collect();
                rows.push(TeamStanding {
                    conference: conference.name.clone(),
                    division: division.name.clone(),
                    wins: stat(&values, 0, &team, "wins")?,
                    losses: stat(&values, 1, &team, "losses")?,
                    ties: stat(&values, 2, &team, "ties")?,
                    win_pct: values.get(3).cloned().unwrap_or_default(),
                    team,
                });
            }
        }
    }
    Ok(rows)
}
