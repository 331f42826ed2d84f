pub mod config;
pub mod csv;
pub mod digest;
pub mod error;
pub mod espn;
pub mod handler;
pub mod ledger;
pub mod model;
pub mod publisher;
pub mod render;
pub mod report;
pub mod schedule;
pub mod squabblr;
pub mod standings;
pub mod sync;
pub mod updater;
