//! Markdown for gamethreads and the weekly digest.
//!
//! Every function here is pure: identical inputs give byte-identical output,
//! so the only moving part of an update is the explicit `now` passed in.

use chrono::{DateTime, Datelike, Utc};
use chrono_tz::America::New_York;

use crate::model::game::GameRecord;
use crate::model::snapshot::{LiveSnapshot, LiveStatus, SideScore};
use crate::standings::StandingsLedger;

pub const LIVE_CHAT_URL: &str = "https://squabblr.co/s/nfl/chat";
const FOOTER: &str = "I am a bot. Post your feedback to /s/ModBot";

/// `1st`, `2nd`, `3rd`, `4th`, `11th`, `22nd`, ...
pub fn ordinal(n: u32) -> String {
    let suffix = if (11..=13).contains(&(n % 100)) {
        "th"
    } else {
        match n % 10 {
            1 => "st",
            2 => "nd",
            3 => "rd",
            _ => "th",
        }
    };
    format!("{}{}", n, suffix)
}

/// Kickoff in US Eastern time, e.g. `September 8th, 2024 at 01:00PM ET`.
pub fn format_kickoff(dt: DateTime<Utc>) -> String {
    let local = dt.with_timezone(&New_York);
    format!(
        "{} {}, {} at {}",
        local.format("%B"),
        ordinal(local.day()),
        local.year(),
        local.format("%I:%M%p ET")
    )
}

/// Clock-only Eastern time for the "last update" line.
pub fn format_update_time(now: DateTime<Utc>) -> String {
    now.with_timezone(&New_York).format("%I:%M%p ET").to_string()
}

pub fn thread_title(game: &GameRecord) -> String {
    format!("[Gamethread] {} at {} - {}", game.away_team, game.home_team, game.week)
}

fn matchup_heading(game: &GameRecord, standings: &StandingsLedger) -> String {
    format!(
        "#### {} ({}) vs. {} ({})",
        game.away_team,
        standings.record_for(&game.away_team),
        game.home_team,
        standings.record_for(&game.home_team)
    )
}

fn period_cell(scores: &[u16], idx: usize) -> u16 {
    scores.get(idx).copied().unwrap_or(0)
}

fn score_row(side: &SideScore, overtime: bool) -> String {
    let q = &side.line_scores;
    let mut row = format!(
        "| **{}** | {} | {} | {} | {} |",
        side.short_name,
        period_cell(q, 0),
        period_cell(q, 1),
        period_cell(q, 2),
        period_cell(q, 3)
    );
    if overtime {
        let ot: u16 = q.iter().skip(4).sum();
        row.push_str(&format!(" {} |", ot));
    }
    row.push_str(&format!(" {} |", side.total));
    row
}

/// Line score table, home side first. The OT column only appears once a
/// game has gone to overtime.
pub fn score_table(home: &SideScore, away: &SideScore, overtime: bool) -> String {
    let (header, rule) = if overtime {
        ("| Team | 1Q | 2Q | 3Q | 4Q | OT | Total |", "|---|---|---|---|---|---|---|")
    } else {
        ("| Team | 1Q | 2Q | 3Q | 4Q | Total |", "|---|---|---|---|---|---|")
    };
    [header.to_string(), rule.to_string(), score_row(home, overtime), score_row(away, overtime)].join("\n")
}

/// Body of a freshly created gamethread, with an all-zero scoreboard.
pub fn initial_thread_body(game: &GameRecord, standings: &StandingsLedger) -> String {
    let home = SideScore { short_name: game.home_short.clone(), ..SideScore::default() };
    let away = SideScore { short_name: game.away_short.clone(), ..SideScore::default() };
    let lines = [
        matchup_heading(game, standings),
        format!("- **Kickoff**: {}", format_kickoff(game.kickoff)),
        format!("- **Location**: {}", game.venue),
        format!("- [Join The Live Chat!]({})", LIVE_CHAT_URL),
        format!("- [ESPN Gamecast]({})", game.link),
        "-----".to_string(),
        score_table(&home, &away, false),
        "-----".to_string(),
        FOOTER.to_string(),
    ];
    let mut body = lines.join("\n");
    body.push('\n');
    body
}

/// Human wording of where the game stands.
pub fn game_time_line(snapshot: &LiveSnapshot) -> String {
    let overtime = snapshot.period > 4;
    match snapshot.status {
        LiveStatus::Final if snapshot.has_overtime() => "Final/OT".to_string(),
        LiveStatus::Final => "Final".to_string(),
        LiveStatus::Halftime => "Halftime".to_string(),
        LiveStatus::Scheduled => "Pregame".to_string(),
        LiveStatus::EndOfPeriod if overtime => "End of Overtime.".to_string(),
        LiveStatus::EndOfPeriod => format!("End of the {} Quarter.", ordinal(u32::from(snapshot.period))),
        LiveStatus::InProgress if overtime => format!("{} left in Overtime.", snapshot.clock),
        LiveStatus::InProgress => {
            format!("{} left in the {} Quarter.", snapshot.clock, ordinal(u32::from(snapshot.period)))
        }
    }
}

/// Body of a gamethread refreshed from a live snapshot.
pub fn live_thread_body(
    game: &GameRecord,
    standings: &StandingsLedger,
    snapshot: &LiveSnapshot,
    now: DateTime<Utc>,
) -> String {
    let mut lines = vec![
        matchup_heading(game, standings),
        format!("- **Kickoff**: {}", format_kickoff(game.kickoff)),
        format!("- **Location**: {}", game.venue),
        format!("- [ESPN Gamecast]({})", game.link),
        format!("- Game Time: {}", game_time_line(snapshot)),
        format!("- Last Update: {}", format_update_time(now)),
        String::new(),
        format!("##### Join The Live Chat! {}", LIVE_CHAT_URL),
        String::new(),
        "-----".to_string(),
        String::new(),
        score_table(&snapshot.home, &snapshot.away, snapshot.has_overtime()),
        String::new(),
    ];
    if !snapshot.status.is_terminal() {
        lines.push("*Scoreboard will be updated every 5-minutes.*".to_string());
        lines.push(String::new());
    }
    lines.push("-----".to_string());
    lines.push(String::new());
    lines.push(FOOTER.to_string());
    let mut body = lines.join("\n");
    body.push('\n');
    body
}

/// Title and body of the weekly schedule post.
pub fn digest_post(week: &str, season: i32, games: &[&GameRecord], standings: &StandingsLedger) -> (String, String) {
    let title = format!("{} Schedule - NFL {} Season", week, season);
    let mut lines = vec![
        format!("Here's what's on tap for {} in the NFL {} Season!", week, season),
        String::new(),
        "| Date & Time | Match Up | Gamethread |".to_string(),
        "| --- | --- | --- |".to_string(),
    ];
    for game in games {
        lines.push(format!(
            "| {} | {} ({}) vs. {} ({}) | TBD |",
            format_kickoff(game.kickoff),
            game.away_team,
            standings.record_for(&game.away_team),
            game.home_team,
            standings.record_for(&game.home_team)
        ));
    }
    lines.extend([
        String::new(),
        format!("Join us in the live chat for every game! {}", LIVE_CHAT_URL),
        String::new(),
        "----".to_string(),
        FOOTER.to_string(),
    ]);
    (title, lines.join("\n"))
}
