use crate::engines::execution::Processor;
use crate::genes::SpeciesId;
use crate::pool::{Pool, SharedCounter};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

/// Counts a worker as active for as long as it is alive. Registered before
/// the thread is spawned so a failed spawn still balances the count.
pub(crate) struct ActiveGuard {
    active: Arc<AtomicUsize>,
}

impl ActiveGuard {
    pub(crate) fn register(active: &Arc<AtomicUsize>) -> Self {
        active.fetch_add(1, Ordering::SeqCst);
        Self {
            active: Arc::clone(active),
        }
    }
}

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
    }
}

/// One evolution loop, run on its own thread.
pub(crate) struct Worker {
    pub(crate) pool: Arc<dyn Pool>,
    pub(crate) generations: Arc<SharedCounter>,
    pub(crate) cancel_flag: Arc<AtomicBool>,
    pub(crate) guard: ActiveGuard,
}

impl Worker {
    /// Loop until cancelled. A panic inside the interpreter ends this worker
    /// only; it is logged and never reaches the engine.
    pub(crate) fn run(self) {
        let Worker {
            pool,
            generations,
            cancel_flag,
            guard,
        } = self;
        let name = thread::current().name().unwrap_or("processor").to_string();
        log::debug!("{} started", name);

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            Self::evolve(pool.as_ref(), &generations, &cancel_flag)
        }));

        match outcome {
            Ok(()) => log::debug!("{} stopped", name),
            Err(payload) => log::error!("{} died: {}", name, panic_message(payload.as_ref())),
        }
        drop(guard);
    }

    fn evolve(pool: &dyn Pool, generations: &SharedCounter, cancel_flag: &AtomicBool) {
        let mut processor = Processor::new(pool);
        while !cancel_flag.load(Ordering::SeqCst) {
            if let Some(creature) = pool.get_creature(SpeciesId::ANY) {
                processor.process(&creature);
                pool.put_creature(creature);
                generations.increment();
            }
            processor.reset();
            thread::yield_now();
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_balances_count() {
        let active = Arc::new(AtomicUsize::new(0));
        let first = ActiveGuard::register(&active);
        let second = ActiveGuard::register(&active);
        assert_eq!(active.load(Ordering::SeqCst), 2);

        drop(first);
        assert_eq!(active.load(Ordering::SeqCst), 1);
        drop(second);
        assert_eq!(active.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_panic_message_extraction() {
        let payload = panic::catch_unwind(|| panic!("boom {}", 7)).unwrap_err();
        assert_eq!(panic_message(payload.as_ref()), "boom 7");

        let payload = panic::catch_unwind(|| panic!("static")).unwrap_err();
        assert_eq!(panic_message(payload.as_ref()), "static");
    }
}
