use std::sync::Arc;

use crate::{
    config::Config,
    observers::{LogWriter, ObserverSet, Observe},
};

use super::dispatcher::Dispatcher;

/// Builder for constructing a [`Dispatcher`] with optional observers.
pub struct DispatcherBuilder {
    cfg: Config,
    observers: Vec<Arc<dyn Observe>>,
}

impl DispatcherBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            observers: Vec::new(),
        }
    }

    /// Sets the failure observers, replacing any added before.
    ///
    /// Observers receive a [`HandlerFailure`](crate::HandlerFailure) for every
    /// handler that panics or returns an error.
    pub fn with_observers(mut self, observers: Vec<Arc<dyn Observe>>) -> Self {
        self.observers = observers;
        self
    }

    /// Adds one failure observer.
    pub fn with_observer(mut self, observer: Arc<dyn Observe>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Builds and returns the dispatcher.
    ///
    /// With [`Config::log_failures`] set, the built-in [`LogWriter`] is installed
    /// ahead of the user observers.
    pub fn build(self) -> Dispatcher {
        let mut observers: Vec<Arc<dyn Observe>> = Vec::with_capacity(self.observers.len() + 1);
        if self.cfg.log_failures {
            observers.push(Arc::new(LogWriter::new()));
        }
        observers.extend(self.observers);

        Dispatcher::new_internal(self.cfg, ObserverSet::new(observers))
    }
}
