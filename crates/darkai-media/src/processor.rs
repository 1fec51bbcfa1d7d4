//! Stateful wrapper around [`classify`](crate::normalize::classify) for one action's viewer.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::Value;

use darkai_types::MediaDescriptor;

use crate::normalize::{Classification, ClassifyError, try_classify};

type ProcessingObserver = Arc<dyn Fn(bool) + Send + Sync>;

/// Holds the descriptor currently shown for an action and a "processing"
/// flag for spinners.
#[derive(Default)]
pub struct MediaProcessor {
    current: Mutex<Option<MediaDescriptor>>,
    processing: AtomicBool,
    observers: Mutex<Vec<ProcessingObserver>>,
}

impl MediaProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback invoked on every processing flag transition.
    pub fn on_processing_change(&self, observer: impl Fn(bool) + Send + Sync + 'static) {
        lock(&self.observers).push(Arc::new(observer));
    }

    pub fn is_processing(&self) -> bool {
        self.processing.load(Ordering::SeqCst)
    }

    /// The descriptor from the last call to [`process`](Self::process), if any.
    pub fn current(&self) -> Option<MediaDescriptor> {
        lock(&self.current).clone()
    }

    /// Classify `response` and replace the current descriptor with the result.
    pub fn process(&self, response: &Value) -> Option<MediaDescriptor> {
        self.run(|| try_classify(response))
    }

    /// Drop the current descriptor.
    pub fn clear(&self) {
        *lock(&self.current) = None;
        self.set_processing(false);
    }

    fn run<F>(&self, classify: F) -> Option<MediaDescriptor>
    where
        F: FnOnce() -> Result<Classification, ClassifyError>,
    {
        let _guard = ProcessingGuard::start(self);

        let descriptor = match classify() {
            Ok(classification) => classification.into_descriptor(),
            Err(e) => {
                tracing::warn!("Error processing media response: {e}");
                None
            }
        };
        *lock(&self.current) = descriptor.clone();
        descriptor
    }

    fn set_processing(&self, value: bool) {
        if self.processing.swap(value, Ordering::SeqCst) != value {
            // Observers may register more observers or process again.
            let observers = lock(&self.observers).clone();
            for observer in observers {
                observer(value);
            }
        }
    }
}

/// Sets the flag on creation and clears it on drop, including while unwinding.
struct ProcessingGuard<'a> {
    processor: &'a MediaProcessor,
}

impl<'a> ProcessingGuard<'a> {
    fn start(processor: &'a MediaProcessor) -> Self {
        processor.set_processing(true);
        Self { processor }
    }
}

impl Drop for ProcessingGuard<'_> {
    fn drop(&mut self) {
        self.processor.set_processing(false);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
