mod common;

use chrono::{Duration, TimeZone, Utc};

use nfl_gamethread_bot::model::game::GameState;
use nfl_gamethread_bot::model::snapshot::{LiveSnapshot, LiveStatus, SideScore};
use nfl_gamethread_bot::publisher::Publisher;
use nfl_gamethread_bot::schedule::{parse_schedule, ScheduleLedger};
use nfl_gamethread_bot::sync::ScheduleSync;
use nfl_gamethread_bot::updater::Updater;

use common::{feed_game, publisher_config, standings_csv, updater_config, FakePoster, FakeScoreboard, MemoryStore};

fn live(status: LiveStatus, period: u8, home: Vec<u16>, away: Vec<u16>) -> LiveSnapshot {
    LiveSnapshot {
        external_id: "401".to_string(),
        status,
        period,
        clock: "4:20".to_string(),
        home: SideScore { short_name: "Falcons".to_string(), total: home.iter().sum(), line_scores: home },
        away: SideScore { short_name: "Steelers".to_string(), total: away.iter().sum(), line_scores: away },
    }
}

/// Invariant checked after every step: a thread exists iff the game left Scheduled.
fn assert_thread_invariant(store: &MemoryStore) {
    for game in parse_schedule(&store.text()).expect("ledger parses") {
        assert_eq!(game.state.thread().is_some(), game.state != GameState::Scheduled, "{:?}", game);
    }
}

#[test]
fn scheduled_game_goes_from_thread_creation_to_final() {
    let kickoff = Utc.with_ymd_and_hms(2024, 9, 8, 17, 0, 0).unwrap();
    let feed = FakeScoreboard {
        weeks: vec![(1, vec![feed_game("401", 1, kickoff, "Pittsburgh Steelers", "Atlanta Falcons")])],
        ..FakeScoreboard::default()
    };
    let schedule = MemoryStore::with("");
    let standings = MemoryStore::with(&standings_csv());
    let poster = FakePoster::default();

    ScheduleSync::new(&feed, &schedule, vec![1]).run().expect("sync");
    assert_thread_invariant(&schedule);

    // Two hours before kickoff the publisher opens the thread
    let summary = Publisher::new(publisher_config(3), &poster, &schedule, &standings)
        .run(kickoff - Duration::hours(2))
        .expect("publish");
    assert_eq!(summary.done, 1);
    let handle = {
        let ledger = ScheduleLedger::load(&schedule).expect("load");
        let game = ledger.get_by_external_id("401").expect("tracked");
        assert!(matches!(game.state, GameState::InProgress(_)));
        game.state.thread().expect("thread handle").clone()
    };
    assert_thread_invariant(&schedule);

    // Second quarter: thread patched, game stays in progress
    feed.set_snapshots(vec![live(LiveStatus::InProgress, 2, vec![3, 7], vec![0, 3])]);
    Updater::new(updater_config(), &feed, &poster, &schedule, &standings)
        .run(kickoff + Duration::minutes(50))
        .expect("update");
    {
        let ledger = ScheduleLedger::load(&schedule).expect("load");
        assert_eq!(ledger.get_by_external_id("401").expect("tracked").state, GameState::InProgress(handle.clone()));
    }

    // Final whistle: thread patched and game closed out
    feed.set_snapshots(vec![live(LiveStatus::Final, 4, vec![3, 7, 0, 0], vec![0, 3, 6, 9])]);
    Updater::new(updater_config(), &feed, &poster, &schedule, &standings)
        .run(kickoff + Duration::hours(3))
        .expect("update");
    {
        let ledger = ScheduleLedger::load(&schedule).expect("load");
        assert_eq!(ledger.get_by_external_id("401").expect("tracked").state, GameState::Final(handle.clone()));
    }
    assert_thread_invariant(&schedule);

    let patches = poster.patches();
    assert_eq!(patches.len(), 2);
    assert!(patches.iter().all(|(h, _)| h == handle.as_str()));
    assert!(patches[0].1.contains("4:20 left in the 2nd Quarter."));
    assert!(patches[1].1.contains("- Game Time: Final"));
    assert!(patches[1].1.contains("| **Steelers** | 0 | 3 | 6 | 9 | 18 |"));

    // A later resync keeps the finished game's thread and state
    ScheduleSync::new(&feed, &schedule, vec![1]).run().expect("resync");
    let ledger = ScheduleLedger::load(&schedule).expect("load");
    assert_eq!(ledger.get_by_external_id("401").expect("tracked").state, GameState::Final(handle));
    assert_eq!(poster.creates().len(), 1);
}
