use super::evolution::Evolver;
use crate::pool::Pool;
use serde::{Deserialize, Serialize};
use std::sync::mpsc::Sender;
use std::thread;
use std::time::{Duration, Instant};

/// Current value and watermarks of one pool counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CounterReport {
    pub current: i64,
    pub lowest: i64,
    pub highest: i64,
}

/// Everything a dashboard shows, read at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolReport {
    pub genes: CounterReport,
    pub species: CounterReport,
    pub creatures: CounterReport,
    pub temperature: f64,
    pub evolving: bool,
    pub generations: i64,
    pub active_threads: usize,
}

impl PoolReport {
    pub fn capture(pool: &dyn Pool, evolver: &dyn Evolver) -> Self {
        Self {
            genes: CounterReport {
                current: pool.current_number_of_genes(),
                lowest: pool.lowest_number_of_genes(),
                highest: pool.highest_number_of_genes(),
            },
            species: CounterReport {
                current: pool.current_number_of_species(),
                lowest: pool.lowest_number_of_species(),
                highest: pool.highest_number_of_species(),
            },
            creatures: CounterReport {
                current: pool.current_number_of_creatures(),
                lowest: pool.lowest_number_of_creatures(),
                highest: pool.highest_number_of_creatures(),
            },
            temperature: pool.temperature().value(),
            evolving: evolver.is_evolving(),
            generations: evolver.number_of_generations(),
            active_threads: evolver.number_of_active_threads(),
        }
    }
}

pub trait ProgressCallback {
    fn on_report(&mut self, report: &PoolReport);
}

pub struct ConsoleProgressCallback;

impl ProgressCallback for ConsoleProgressCallback {
    fn on_report(&mut self, report: &PoolReport) {
        log::info!(
            "Generations: {}, threads: {}, temperature: {:.5}",
            report.generations,
            report.active_threads,
            report.temperature
        );
        log::info!(
            "  creatures {} [{}..{}], species {} [{}..{}], genes {} [{}..{}]",
            report.creatures.current,
            report.creatures.lowest,
            report.creatures.highest,
            report.species.current,
            report.species.lowest,
            report.species.highest,
            report.genes.current,
            report.genes.lowest,
            report.genes.highest
        );
    }
}

// For feeding a UI thread
pub struct ChannelProgressCallback {
    sender: Sender<PoolReport>,
}

impl ChannelProgressCallback {
    pub fn new(sender: Sender<PoolReport>) -> Self {
        Self { sender }
    }
}

impl ProgressCallback for ChannelProgressCallback {
    fn on_report(&mut self, report: &PoolReport) {
        let _ = self.sender.send(report.clone());
    }
}

/// Stop condition that turns true once `duration` has elapsed.
pub fn run_for(duration: Duration) -> impl FnMut() -> bool {
    let started = Instant::now();
    move || started.elapsed() >= duration
}

/// Report every `interval` until `until` returns true, resetting the pool
/// watermarks after each report. Returns the number of reports delivered.
pub fn watch<F>(
    pool: &dyn Pool,
    evolver: &dyn Evolver,
    interval: Duration,
    mut until: F,
    callback: &mut dyn ProgressCallback,
) -> usize
where
    F: FnMut() -> bool,
{
    let mut reports = 0;
    while !until() {
        thread::sleep(interval);
        callback.on_report(&PoolReport::capture(pool, evolver));
        pool.reset_water_marks();
        reports += 1;
    }
    reports
}
