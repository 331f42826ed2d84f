pub mod espn;
pub mod game;
pub mod snapshot;
pub mod standing;
pub mod standings_feed;
