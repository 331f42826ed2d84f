use serde::{Deserialize, Serialize};

/// Top level of the ESPN site API `scoreboard` document.
#[derive(Debug, Serialize, Deserialize)]
pub struct ScoreboardDocument {
    #[serde(default)]
    pub events: Vec<Event>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Event {
    #[serde(default)]
    pub id: String,
    /// Kickoff, e.g. `2024-09-06T00:20Z`.
    pub date: String,
    #[serde(default)]
    pub week: Option<Week>,
    #[serde(default)]
    pub status: Option<Status>,
    #[serde(default)]
    pub competitions: Vec<Competition>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Week {
    pub number: u8,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Competition {
    #[serde(default)]
    pub venue: Option<Venue>,
    #[serde(default)]
    pub status: Option<Status>,
    #[serde(default)]
    pub competitors: Vec<Competitor>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Venue {
    #[serde(rename = "fullName")]
    pub full_name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Status {
    #[serde(default)]
    pub period: u8,
    #[serde(rename = "displayClock", default)]
    pub display_clock: String,
    #[serde(rename = "type")]
    pub status_type: StatusType,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusType {
    /// "STATUS_SCHEDULED", "STATUS_IN_PROGRESS", "STATUS_HALFTIME", "STATUS_FINAL", ...
    pub name: String,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Competitor {
    #[serde(rename = "homeAway")]
    pub home_away: String,
    pub team: Team,
    // ESPN sends scores as strings
    #[serde(default)]
    pub score: Option<String>,
    #[serde(default)]
    pub linescores: Vec<LineScore>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Team {
    #[serde(rename = "displayName")]
    pub display_name: String,
    #[serde(rename = "shortDisplayName")]
    pub short_display_name: Option<String>,
    pub abbreviation: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LineScore {
    #[serde(default)]
    pub value: f64,
}
