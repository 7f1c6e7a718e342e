use genepool::config::{AppConfig, ConfigManager, EvolutionConfig, PoolConfig};
use genepool::pool::GetPolicy;
use std::io::Write;
use tempfile::Builder;

#[test]
fn test_defaults_are_valid() {
    let config = AppConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.pool.initial_creatures, 1000);
    assert_eq!(config.evolution.thread_count, 10);
    assert_eq!(config.pool.get_policy, GetPolicy::Template);
}

#[test]
fn test_load_partial_toml_file() {
    let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(
        file,
        "[pool]\ninitial_creatures = 42\nget_policy = \"existing_species\"\n\n[evolution]\nthread_count = 3"
    )
    .unwrap();

    let manager = ConfigManager::new();
    manager.load_from_file(file.path()).unwrap();
    let config = manager.get();

    assert_eq!(config.pool.initial_creatures, 42);
    assert_eq!(config.pool.get_policy, GetPolicy::ExistingSpecies);
    assert_eq!(config.pool.maximum_depth, PoolConfig::default().maximum_depth);
    assert_eq!(config.evolution.thread_count, 3);
}

#[test]
fn test_invalid_file_keeps_previous_config() {
    let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(file, "[pool]\nrelative_complexity = 2.0").unwrap();

    let manager = ConfigManager::new();
    assert!(manager.load_from_file(file.path()).is_err());
    assert_eq!(manager.get(), AppConfig::default());
}

#[test]
fn test_save_and_reload() {
    let manager = ConfigManager::new();
    manager
        .update(|config| {
            config.pool.opcode_weights = Some(vec![1.0, 1.0, 1.0, 2.0, 1.0, 1.0, 1.0, 3.0]);
            config.evolution = EvolutionConfig {
                run_seconds: 5,
                ..EvolutionConfig::default()
            };
        })
        .unwrap();

    let file = Builder::new().suffix(".toml").tempfile().unwrap();
    manager.save_to_file(file.path()).unwrap();

    let reloaded = ConfigManager::new();
    reloaded.load_from_file(file.path()).unwrap();
    assert_eq!(reloaded.get(), manager.get());
}

#[test]
fn test_rejected_update_rolls_back() {
    let manager = ConfigManager::new();
    let result = manager.update(|config| config.evolution.thread_count = 0);

    assert!(result.is_err());
    assert_eq!(manager.get().evolution.thread_count, 10);
}
