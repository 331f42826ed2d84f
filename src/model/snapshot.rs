use crate::model::espn;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LiveStatus {
    Scheduled,
    InProgress,
    Halftime,
    EndOfPeriod,
    Final,
}

impl LiveStatus {
    pub fn from_espn(status: &espn::StatusType) -> Self {
        if status.completed || status.name.starts_with("STATUS_FINAL") {
            return LiveStatus::Final;
        }
        match status.name.as_str() {
            "STATUS_HALFTIME" => LiveStatus::Halftime,
            "STATUS_END_PERIOD" => LiveStatus::EndOfPeriod,
            "STATUS_SCHEDULED" | "STATUS_POSTPONED" | "STATUS_DELAYED" => LiveStatus::Scheduled,
            _ => LiveStatus::InProgress,
        }
    }

    pub fn is_terminal(self) -> bool {
        self == LiveStatus::Final
    }
}

/// Score line for one side of a game.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct SideScore {
    pub short_name: String,
    /// Points per period; index 4 and beyond are overtime.
    pub line_scores: Vec<u16>,
    pub total: u16,
}

/// Point-in-time state of one game from the live scoreboard.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LiveSnapshot {
    pub external_id: String,
    pub status: LiveStatus,
    pub period: u8,
    pub clock: String,
    pub home: SideScore,
    pub away: SideScore,
}

impl LiveSnapshot {
    pub fn has_overtime(&self) -> bool {
        self.home.line_scores.len() > 4 || self.away.line_scores.len() > 4
    }
}
