//! Saving, listing, and resuming trained tables

mod common;

use chrono::{Local, TimeZone, Utc};
use common::seeded_agent;
use tempfile::TempDir;
use tictactoe_rl::{
    AgentConfig, Error, TicTacToeEnv,
    adapters::{InMemoryRepository, MsgPackRepository, list_saved_tables, timestamped_table_path},
    pipeline::{SelfPlayTrainer, TrainingConfig},
    ports::TableRepository,
    q_learning::{SavedQTable, TrainingMetadata},
};

fn trained(episodes: usize, seed: u64) -> tictactoe_rl::QLearningAgent {
    let mut env = TicTacToeEnv::new();
    let mut agent = seeded_agent(episodes, seed);
    SelfPlayTrainer::new(TrainingConfig {
        episodes,
        ..TrainingConfig::default()
    })
    .train(&mut env, &mut agent)
    .unwrap();
    agent
}

#[test]
fn test_msgpack_preserves_every_value() {
    let dir = TempDir::new().unwrap();
    let agent = trained(100, 1);
    let saved = SavedQTable::from_agent(&agent, TrainingMetadata::new(100).stamped(Utc::now()));

    let path = timestamped_table_path(dir.path(), Local::now());
    let repo = MsgPackRepository::new();
    repo.save(&saved, &path).unwrap();
    let restored = repo.load(&path).unwrap().to_agent().unwrap();

    assert_eq!(restored.q_values(), agent.q_values());
    assert_eq!(restored.epsilon(), agent.config().initial_epsilon);
    assert_eq!(restored.config(), agent.config());
}

#[test]
fn test_resume_with_same_schedule_explores_again() {
    let repo = InMemoryRepository::new();
    let path = std::path::Path::new("models/same.msgpack");
    let agent = trained(100, 3);
    assert_eq!(agent.epsilon(), agent.config().final_epsilon);
    repo.save(&SavedQTable::from_agent(&agent, TrainingMetadata::new(100)), path)
        .unwrap();

    let loaded = repo.load(path).unwrap();
    assert_eq!(loaded.epsilon, agent.epsilon());
    let resumed = loaded.to_agent_with_config(agent.config().clone()).unwrap();
    assert_eq!(resumed.epsilon(), agent.config().initial_epsilon);
}

#[test]
fn test_listing_orders_by_timestamp() {
    let dir = TempDir::new().unwrap();
    let repo = MsgPackRepository::new();
    let saved = SavedQTable::from_agent(&seeded_agent(10, 2), TrainingMetadata::new(0));

    let times = [
        Local.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap(),
        Local.with_ymd_and_hms(2024, 12, 31, 23, 59, 59).unwrap(),
        Local.with_ymd_and_hms(2025, 1, 15, 8, 30, 0).unwrap(),
    ];
    for at in times {
        repo.save(&saved, &timestamped_table_path(dir.path(), at)).unwrap();
    }
    std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

    let names: Vec<String> = list_saved_tables(dir.path())
        .unwrap()
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        [
            "q_table_20241231_235959.msgpack",
            "q_table_20250115_083000.msgpack",
            "q_table_20250301_120000.msgpack",
        ]
    );
}

#[test]
fn test_resume_with_new_schedule_resets_epsilon() {
    let repo = InMemoryRepository::new();
    let path = std::path::Path::new("models/resume.msgpack");
    let agent = trained(50, 3);
    repo.save(&SavedQTable::from_agent(&agent, TrainingMetadata::new(50)), path)
        .unwrap();

    let loaded = repo.load(path).unwrap();
    let fresh = AgentConfig::for_episodes(200).with_seed(3);
    let resumed = loaded.to_agent_with_config(fresh.clone()).unwrap();

    assert_eq!(resumed.epsilon(), fresh.initial_epsilon);
    assert_eq!(resumed.q_values(), agent.q_values());
}

#[test]
fn test_corrupt_file_is_reported() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("q_table_bad.msgpack");
    std::fs::write(&path, b"not msgpack at all").unwrap();

    let err = MsgPackRepository::new().load(&path).unwrap_err();
    assert!(matches!(err, Error::SerializationContext { .. }));
}

#[test]
fn test_wrong_version_is_rejected() {
    let mut saved = SavedQTable::from_agent(&seeded_agent(10, 4), TrainingMetadata::new(0));
    saved.version = SavedQTable::VERSION + 1;

    assert!(matches!(
        saved.to_agent(),
        Err(Error::UnsupportedVersion { .. })
    ));
}
