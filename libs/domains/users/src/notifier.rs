//! Fan-out of change events to in-process listeners.
//!
//! Every subscriber owns a bounded buffer. Delivery never waits: when a
//! subscriber's buffer is full the event is dropped for that subscriber
//! only, and `notify` reports the loss once every subscriber was tried.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{RwLock, mpsc};

use crate::models::ChangeEvent;

/// Buffered events per subscriber when no capacity is given
pub const DEFAULT_SUBSCRIBER_CAPACITY: usize = 500;

/// Receiving end handed to a subscriber
pub type ChangeEventReceiver = mpsc::Receiver<Arc<ChangeEvent>>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NotifyError {
    #[error("change event dropped for {dropped} of {subscribers} subscribers")]
    Dropped { dropped: usize, subscribers: usize },
}

/// Propagates change events about users.
///
/// Delivery is best effort: a failed notification never undoes the change
/// that triggered it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChangeNotifier: Send + Sync {
    async fn notify(&self, event: ChangeEvent) -> Result<(), NotifyError>;
}

/// In-process broadcast, standing in for a message broker
#[derive(Debug, Clone)]
pub struct InMemoryNotifier {
    capacity: usize,
    subscribers: Arc<RwLock<Vec<mpsc::Sender<Arc<ChangeEvent>>>>>,
}

impl InMemoryNotifier {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_SUBSCRIBER_CAPACITY)
    }

    /// `capacity` is clamped to at least one pending event.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            subscribers: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Register a new subscriber.
    ///
    /// It only sees events published after this call. Dropping the receiver
    /// is the only way to leave.
    pub async fn subscribe(&self) -> ChangeEventReceiver {
        let (tx, rx) = mpsc::channel(self.capacity);
        let mut subscribers = self.subscribers.write().await;
        subscribers.push(tx);
        tracing::debug!(subscribers = subscribers.len(), "New change event subscriber");
        rx
    }

    pub async fn subscriber_count(&self) -> usize {
        self.subscribers.read().await.len()
    }

    async fn prune_closed(&self) {
        let mut subscribers = self.subscribers.write().await;
        subscribers.retain(|tx| !tx.is_closed());
        tracing::debug!(subscribers = subscribers.len(), "Pruned closed subscribers");
    }
}

impl Default for InMemoryNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChangeNotifier for InMemoryNotifier {
    async fn notify(&self, event: ChangeEvent) -> Result<(), NotifyError> {
        let event = Arc::new(event);
        let mut dropped = 0;
        let mut closed = 0;

        let subscribers = {
            let subscribers = self.subscribers.read().await;
            for tx in subscribers.iter() {
                match tx.try_send(Arc::clone(&event)) {
                    Ok(()) => {}
                    Err(mpsc::error::TrySendError::Full(_)) => dropped += 1,
                    Err(mpsc::error::TrySendError::Closed(_)) => closed += 1,
                }
            }
            subscribers.len()
        };

        if closed > 0 {
            self.prune_closed().await;
        }

        if dropped > 0 {
            tracing::warn!(
                operation = %event.operation,
                user_id = %event.user_id(),
                dropped,
                subscribers,
                "Subscriber buffer full, change event dropped"
            );
            return Err(NotifyError::Dropped {
                dropped,
                subscribers: subscribers - closed,
            });
        }

        Ok(())
    }
}
