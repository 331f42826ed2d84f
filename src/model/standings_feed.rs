use serde::{Deserialize, Serialize};

/// ESPN core standings document (`/core/nfl/standings?xhr=1`).
#[derive(Debug, Serialize, Deserialize)]
pub struct StandingsDocument {
    pub content: StandingsContent,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StandingsContent {
    pub standings: StandingsRoot,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StandingsRoot {
    #[serde(default)]
    pub groups: Vec<Conference>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Conference {
    pub name: String,
    #[serde(default)]
    pub groups: Vec<Division>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Division {
    pub name: String,
    pub standings: DivisionStandings,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DivisionStandings {
    #[serde(default)]
    pub entries: Vec<Entry>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Entry {
    pub team: EntryTeam,
    // Ordered: wins, losses, ties, win %, then everything else
    #[serde(default)]
    pub stats: Vec<Stat>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EntryTeam {
    #[serde(rename = "displayName")]
    pub display_name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Stat {
    #[serde(rename = "displayValue")]
    pub display_value: String,
}
