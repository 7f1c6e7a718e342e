use super::worker::{ActiveGuard, Worker};
use crate::config::traits::ConfigSection;
use crate::config::EvolutionConfig;
use crate::error::{GenePoolError, Result};
use crate::pool::{Pool, SharedCounter};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

/// Worker threads recurse over gene trees, so they get a roomy stack.
pub const DEFAULT_STACK_SIZE: usize = 16 * 1024 * 1024;

/// Control surface for a running simulation.
pub trait Evolver: Send + Sync {
    /// Spawn `number_of_threads` workers. Does nothing when already evolving.
    fn start_evolving(&self, number_of_threads: usize) -> Result<()>;

    /// Cancel all workers and wait for each to finish its current creature.
    fn stop_evolving(&self);

    fn is_evolving(&self) -> bool;

    /// Creatures interpreted since the last start.
    fn number_of_generations(&self) -> i64;

    fn number_of_active_threads(&self) -> usize;
}

#[derive(Default)]
struct Lifecycle {
    cancel_flag: Arc<AtomicBool>,
    workers: Vec<JoinHandle<()>>,
}

pub struct EvolutionEngine {
    pool: Arc<dyn Pool>,
    stack_size: usize,
    generations: Arc<SharedCounter>,
    active_threads: Arc<AtomicUsize>,
    evolving: AtomicBool,
    lifecycle: Mutex<Lifecycle>,
}

impl EvolutionEngine {
    pub fn new(pool: Arc<dyn Pool>) -> Self {
        Self::with_stack_size(pool, DEFAULT_STACK_SIZE)
    }

    pub fn with_stack_size(pool: Arc<dyn Pool>, stack_size: usize) -> Self {
        Self {
            pool,
            stack_size,
            generations: Arc::new(SharedCounter::new()),
            active_threads: Arc::new(AtomicUsize::new(0)),
            evolving: AtomicBool::new(false),
            lifecycle: Mutex::new(Lifecycle::default()),
        }
    }

    pub fn from_config(pool: Arc<dyn Pool>, config: &EvolutionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_stack_size(pool, config.worker_stack_size))
    }

    pub fn pool(&self) -> &Arc<dyn Pool> {
        &self.pool
    }

    fn lock(&self) -> MutexGuard<'_, Lifecycle> {
        self.lifecycle.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn spawn_worker(&self, index: usize, cancel_flag: &Arc<AtomicBool>) -> Result<JoinHandle<()>> {
        let worker = Worker {
            pool: Arc::clone(&self.pool),
            generations: Arc::clone(&self.generations),
            cancel_flag: Arc::clone(cancel_flag),
            guard: ActiveGuard::register(&self.active_threads),
        };
        thread::Builder::new()
            .name(format!("processor-{}", index))
            .stack_size(self.stack_size)
            .spawn(move || worker.run())
            .map_err(|e| GenePoolError::Worker(format!("Failed to spawn processor-{}: {}", index, e)))
    }

    fn join_all(workers: Vec<JoinHandle<()>>) {
        for handle in workers {
            let name = handle.thread().name().unwrap_or("processor").to_string();
            if handle.join().is_err() {
                log::warn!("{} could not be joined cleanly", name);
            }
        }
    }
}

impl Evolver for EvolutionEngine {
    fn start_evolving(&self, number_of_threads: usize) -> Result<()> {
        if number_of_threads == 0 {
            return Err(GenePoolError::Configuration(
                "Number of threads must be at least 1".to_string(),
            ));
        }

        let mut lifecycle = self.lock();
        if self.evolving.load(Ordering::SeqCst) {
            return Ok(());
        }

        self.generations.reset_counter();
        let cancel_flag = Arc::new(AtomicBool::new(false));
        let mut workers = Vec::with_capacity(number_of_threads);
        for index in 0..number_of_threads {
            match self.spawn_worker(index, &cancel_flag) {
                Ok(handle) => workers.push(handle),
                Err(e) => {
                    cancel_flag.store(true, Ordering::SeqCst);
                    Self::join_all(workers);
                    return Err(e);
                }
            }
        }

        lifecycle.cancel_flag = cancel_flag;
        lifecycle.workers = workers;
        self.evolving.store(true, Ordering::SeqCst);
        log::info!("Evolution started with {} threads", number_of_threads);
        Ok(())
    }

    fn stop_evolving(&self) {
        let mut lifecycle = self.lock();
        if !self.evolving.load(Ordering::SeqCst) {
            return;
        }

        lifecycle.cancel_flag.store(true, Ordering::SeqCst);
        Self::join_all(std::mem::take(&mut lifecycle.workers));
        self.evolving.store(false, Ordering::SeqCst);
        log::info!(
            "Evolution stopped after {} generations",
            self.generations.current_value()
        );
    }

    fn is_evolving(&self) -> bool {
        self.evolving.load(Ordering::SeqCst)
    }

    fn number_of_generations(&self) -> i64 {
        self.generations.current_value()
    }

    fn number_of_active_threads(&self) -> usize {
        self.active_threads.load(Ordering::SeqCst)
    }
}

impl Drop for EvolutionEngine {
    fn drop(&mut self) {
        self.stop_evolving();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genes::Probability;
    use crate::pool::GenePool;
    use std::time::Duration;

    fn engine() -> EvolutionEngine {
        let pool = GenePool::new();
        pool.initialize(50, Probability::EVEN, 4, Probability::EVEN);
        EvolutionEngine::with_stack_size(Arc::new(pool), 4 * 1024 * 1024)
    }

    #[test]
    fn test_zero_threads_is_rejected() {
        let engine = engine();
        assert!(engine.start_evolving(0).is_err());
        assert!(!engine.is_evolving());
    }

    #[test]
    fn test_start_twice_keeps_first_workers() {
        let engine = engine();
        engine.start_evolving(2).unwrap();
        engine.start_evolving(5).unwrap();
        assert!(engine.is_evolving());
        assert_eq!(engine.number_of_active_threads(), 2);

        engine.stop_evolving();
        assert_eq!(engine.number_of_active_threads(), 0);
    }

    #[test]
    fn test_stop_when_idle_is_noop() {
        let engine = engine();
        engine.stop_evolving();
        assert!(!engine.is_evolving());
        assert_eq!(engine.number_of_generations(), 0);
    }

    #[test]
    fn test_generations_advance_while_evolving() {
        let engine = engine();
        engine.start_evolving(1).unwrap();
        for _ in 0..500 {
            if engine.number_of_generations() > 0 {
                break;
            }
            thread::sleep(Duration::from_millis(10));
        }
        engine.stop_evolving();

        assert!(engine.number_of_generations() > 0);
        assert!(!engine.is_evolving());
    }
}
