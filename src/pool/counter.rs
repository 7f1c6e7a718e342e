use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicI64, Ordering};

/// Thread-safe counter that remembers its extremes since the last reset.
#[derive(Debug, Default)]
pub struct SharedCounter {
    current: AtomicI64,
    low: AtomicI64,
    high: AtomicI64,
}

/// Plain copy of a counter, used for reports and snapshots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterSnapshot {
    pub current: i64,
    pub low: i64,
    pub high: i64,
}

impl SharedCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(value: i64) -> Self {
        Self {
            current: AtomicI64::new(value),
            low: AtomicI64::new(value),
            high: AtomicI64::new(value),
        }
    }

    pub fn from_snapshot(snapshot: &CounterSnapshot) -> Self {
        Self {
            current: AtomicI64::new(snapshot.current),
            low: AtomicI64::new(snapshot.low),
            high: AtomicI64::new(snapshot.high),
        }
    }

    pub fn increment(&self) -> i64 {
        let value = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.high.fetch_max(value, Ordering::SeqCst);
        value
    }

    pub fn decrement(&self) -> i64 {
        let value = self.current.fetch_sub(1, Ordering::SeqCst) - 1;
        self.low.fetch_min(value, Ordering::SeqCst);
        value
    }

    /// Bulk increment for genes that arrive as a whole subtree.
    pub fn add(&self, amount: i64) -> i64 {
        let value = self.current.fetch_add(amount, Ordering::SeqCst) + amount;
        self.high.fetch_max(value, Ordering::SeqCst);
        self.low.fetch_min(value, Ordering::SeqCst);
        value
    }

    /// Back to zero, watermarks included.
    pub fn reset_counter(&self) {
        self.current.store(0, Ordering::SeqCst);
        self.reset_water_marks();
    }

    pub fn reset_water_marks(&self) {
        let value = self.current.load(Ordering::SeqCst);
        self.low.store(value, Ordering::SeqCst);
        self.high.store(value, Ordering::SeqCst);
    }

    pub fn current_value(&self) -> i64 {
        self.current.load(Ordering::SeqCst)
    }

    pub fn low_water_mark(&self) -> i64 {
        self.low.load(Ordering::SeqCst)
    }

    pub fn high_water_mark(&self) -> i64 {
        self.high.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            current: self.current_value(),
            low: self.low_water_mark(),
            high: self.high_water_mark(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_water_marks_track_extremes() {
        let counter = SharedCounter::new();
        counter.increment();
        counter.increment();
        counter.increment();
        counter.decrement();
        counter.decrement();
        counter.decrement();
        counter.decrement();

        assert_eq!(counter.current_value(), -1);
        assert_eq!(counter.high_water_mark(), 3);
        assert_eq!(counter.low_water_mark(), -1);
    }

    #[test]
    fn test_reset_water_marks_keeps_value() {
        let counter = SharedCounter::with_value(5);
        counter.increment();
        counter.decrement();
        counter.decrement();
        counter.reset_water_marks();

        assert_eq!(counter.current_value(), 4);
        assert_eq!(counter.low_water_mark(), 4);
        assert_eq!(counter.high_water_mark(), 4);

        counter.reset_counter();
        assert_eq!(counter.snapshot(), CounterSnapshot::default());
    }

    #[test]
    fn test_add_moves_water_marks() {
        let counter = SharedCounter::with_value(2);
        assert_eq!(counter.add(5), 7);
        assert_eq!(counter.high_water_mark(), 7);
        assert_eq!(counter.low_water_mark(), 2);
    }

    #[test]
    fn test_concurrent_increments() {
        let counter = Arc::new(SharedCounter::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let counter = Arc::clone(&counter);
                thread::spawn(move || {
                    for _ in 0..1000 {
                        counter.increment();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(counter.current_value(), 8000);
        assert_eq!(counter.high_water_mark(), 8000);
        assert_eq!(counter.low_water_mark(), 0);
    }
}
