/// One team's row in the standings ledger.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TeamStanding {
    pub conference: String,
    pub division: String,
    pub team: String,
    pub wins: u16,
    pub losses: u16,
    pub ties: u16,
    pub win_pct: String,
}

impl TeamStanding {
    /// `W-L`, or `W-L-T` once the team has a tie.
    pub fn record(&self) -> String {
        if self.ties == 0 {
            format!("{}-{}", self.wins, self.losses)
        } else {
            format!("{}-{}-{}", self.wins, self.losses, self.ties)
        }
    }
}
