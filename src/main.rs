use anyhow::Context;
use genepool::config::{AppConfig, ConfigManager};
use genepool::engines::progress::{self, ConsoleProgressCallback};
use genepool::engines::{EvolutionEngine, Evolver};
use genepool::pool::persistence;
use genepool::GenePool;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let manager = ConfigManager::new();
    match std::env::args().nth(1) {
        Some(path) => manager
            .load_from_file(&path)
            .with_context(|| format!("Failed to load configuration from {}", path))?,
        None => manager
            .load_from_env()
            .context("Failed to load configuration from the environment")?,
    }
    let config = manager.get();

    let pool = Arc::new(build_pool(&config)?);
    let engine = EvolutionEngine::from_config(pool.clone(), &config.evolution)?;
    engine.start_evolving(config.evolution.thread_count)?;

    let interval = Duration::from_millis(config.evolution.report_interval_millis);
    let mut console = ConsoleProgressCallback;
    if config.evolution.run_seconds > 0 {
        let until = progress::run_for(Duration::from_secs(config.evolution.run_seconds));
        progress::watch(&*pool, &engine, interval, until, &mut console);
    } else {
        let closed = eof_flag(io::stdin());
        progress::watch(
            &*pool,
            &engine,
            interval,
            || closed.load(Ordering::SeqCst),
            &mut console,
        );
    }

    engine.stop_evolving();

    if config.persistence.store_on_stop {
        if let Some(path) = &config.persistence.snapshot_path {
            persistence::store_to_file(&pool, path)
                .with_context(|| format!("Failed to store gene pool to {}", path.display()))?;
        }
    }
    Ok(())
}

fn build_pool(config: &AppConfig) -> anyhow::Result<GenePool> {
    if config.persistence.load_on_start {
        if let Some(path) = config.persistence.snapshot_path.as_ref().filter(|p| p.exists()) {
            return persistence::load_from_file(path)
                .with_context(|| format!("Failed to load gene pool from {}", path.display()));
        }
        log::warn!("No snapshot to load, seeding a fresh gene pool");
    }

    let pool = GenePool::new();
    pool.initialize_with(&config.pool)?;
    Ok(pool)
}

/// Flag raised once `input` reaches end of file. The input is discarded.
fn eof_flag<R: io::Read + Send + 'static>(mut input: R) -> Arc<AtomicBool> {
    let closed = Arc::new(AtomicBool::new(false));
    let flag = closed.clone();
    thread::spawn(move || {
        if let Err(e) = io::copy(&mut input, &mut io::sink()) {
            log::warn!("Reading standard input failed: {}", e);
        }
        flag.store(true, Ordering::SeqCst);
    });
    closed
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_eof_flag_rises_after_input_drains() {
        let input = Cursor::new(vec![b'x'; 4 * 1024 * 1024]);
        let closed = eof_flag(input);

        for _ in 0..500 {
            if closed.load(Ordering::SeqCst) {
                break;
            }
            thread::sleep(Duration::from_millis(10));
        }
        assert!(closed.load(Ordering::SeqCst));
    }
}
