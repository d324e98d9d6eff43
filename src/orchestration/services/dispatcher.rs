//! Queue-fed worker pool running one session per admitted event.

use super::Orchestrator;
use crate::audit::{domain::SessionRecord, ports::SessionAuditRepository};
use crate::orchestration::domain::{Event, EventId, EventKind, SessionReport};
use crate::orchestration::ports::{OutcomeNotifier, ReasoningEngine};
use mockable::Clock;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{Mutex, OwnedSemaphorePermit, Semaphore, mpsc};
use tokio::task::{JoinHandle, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Sizing of the dispatcher queue and worker pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatcherSettings {
    /// Events that may wait in the queue before `submit` applies
    /// backpressure.
    pub queue_capacity: usize,
    /// Sessions that may run at the same time.
    pub max_concurrent_sessions: usize,
    /// Number of recent event fingerprints remembered to drop redeliveries.
    pub redelivery_window: usize,
}

impl Default for DispatcherSettings {
    fn default() -> Self {
        Self {
            queue_capacity: 64,
            max_concurrent_sessions: 4,
            redelivery_window: 1024,
        }
    }
}

/// Why an event was not queued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscardReason {
    /// The event kind does not start a session.
    IgnoredKind(EventKind),
    /// An identical event was already admitted.
    Redelivered,
}

/// Result of submitting an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// The event was queued for processing.
    Queued,
    /// The event was dropped without side effects.
    Discarded(DiscardReason),
}

/// Errors returned by the dispatcher.
#[derive(Debug, Clone, Error)]
pub enum DispatchError {
    /// The dispatcher no longer accepts events.
    #[error("session dispatcher is closed")]
    Closed,

    /// The consumer task failed.
    #[error("session dispatcher consumer failed: {0}")]
    Consumer(Arc<dyn std::error::Error + Send + Sync>),
}

#[derive(Debug, Default)]
struct RecentFingerprints {
    seen: HashSet<String>,
    order: VecDeque<String>,
}

impl RecentFingerprints {
    fn insert(&mut self, fingerprint: String, window: usize) -> bool {
        if self.seen.contains(&fingerprint) {
            return false;
        }
        if self.order.len() >= window
            && let Some(oldest) = self.order.pop_front()
        {
            self.seen.remove(&oldest);
        }
        self.order.push_back(fingerprint.clone());
        self.seen.insert(fingerprint);
        true
    }

    fn forget(&mut self, fingerprint: &str) {
        if self.seen.remove(fingerprint) {
            self.order.retain(|kept| kept != fingerprint);
        }
    }
}

struct ActiveSession {
    event_id: EventId,
    token: CancellationToken,
}

type ActiveSessions = Arc<Mutex<HashMap<String, ActiveSession>>>;

/// Consumer of admitted events.
///
/// Events are filtered and deduplicated on submission, queued on a bounded
/// channel, and run by a consumer task that starts at most
/// `max_concurrent_sessions` sessions at once. A newer event for a subject
/// cancels the session still running for that subject. Finished reports are
/// written to the audit repository.
pub struct SessionDispatcher {
    sender: mpsc::Sender<Event>,
    consumer: JoinHandle<()>,
    recent: Mutex<RecentFingerprints>,
    redelivery_window: usize,
}

impl SessionDispatcher {
    /// Spawns the consumer task on the current runtime.
    #[must_use]
    pub fn start<E, N, C, R>(
        orchestrator: Arc<Orchestrator<E, N, C>>,
        audit: Arc<R>,
        settings: DispatcherSettings,
    ) -> Self
    where
        E: ReasoningEngine + 'static,
        N: OutcomeNotifier + 'static,
        C: Clock + Send + Sync + 'static,
        R: SessionAuditRepository + 'static,
    {
        let (sender, receiver) = mpsc::channel(settings.queue_capacity.max(1));
        let semaphore = Arc::new(Semaphore::new(settings.max_concurrent_sessions.max(1)));
        let consumer = tokio::spawn(consume(receiver, orchestrator, audit, semaphore));
        Self {
            sender,
            consumer,
            recent: Mutex::new(RecentFingerprints::default()),
            redelivery_window: settings.redelivery_window.max(1),
        }
    }

    /// Offers `event` for processing.
    ///
    /// Inadmissible kinds and redelivered events are discarded. Waits for
    /// queue capacity when the queue is full.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Closed`] when the consumer has stopped.
    pub async fn submit(&self, event: Event) -> Result<Admission, DispatchError> {
        if !event.kind().is_admissible() {
            info!(kind = %event.kind(), subject = %event.subject(), "event discarded");
            return Ok(Admission::Discarded(DiscardReason::IgnoredKind(
                event.kind().clone(),
            )));
        }

        let fingerprint = event.fingerprint();
        let fresh = self
            .recent
            .lock()
            .await
            .insert(fingerprint.clone(), self.redelivery_window);
        if !fresh {
            info!(subject = %event.subject(), "redelivered event discarded");
            return Ok(Admission::Discarded(DiscardReason::Redelivered));
        }

        if self.sender.send(event).await.is_err() {
            // A refused event was never admitted.
            self.recent.lock().await.forget(&fingerprint);
            return Err(DispatchError::Closed);
        }
        Ok(Admission::Queued)
    }

    /// Stops accepting events and waits for every queued and running
    /// session to finish.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Consumer`] when the consumer task panicked.
    pub async fn shutdown(self) -> Result<(), DispatchError> {
        let Self {
            sender, consumer, ..
        } = self;
        drop(sender);
        consumer
            .await
            .map_err(|err| DispatchError::Consumer(Arc::new(err)))
    }
}

async fn consume<E, N, C, R>(
    mut receiver: mpsc::Receiver<Event>,
    orchestrator: Arc<Orchestrator<E, N, C>>,
    audit: Arc<R>,
    semaphore: Arc<Semaphore>,
) where
    E: ReasoningEngine + 'static,
    N: OutcomeNotifier + 'static,
    C: Clock + Send + Sync + 'static,
    R: SessionAuditRepository + 'static,
{
    let active: ActiveSessions = Arc::new(Mutex::new(HashMap::new()));
    let mut workers = JoinSet::new();

    while let Some(event) = receiver.recv().await {
        let key = event.subject().key();
        let token = CancellationToken::new();
        let superseded = active.lock().await.insert(
            key.clone(),
            ActiveSession {
                event_id: event.id(),
                token: token.clone(),
            },
        );
        if let Some(previous) = superseded {
            info!(subject = %key, superseded_event = %previous.event_id, "cancelling superseded session");
            previous.token.cancel();
        }

        let Ok(permit) = Arc::clone(&semaphore).acquire_owned().await else {
            break;
        };
        workers.spawn(run_session(
            Arc::clone(&orchestrator),
            Arc::clone(&audit),
            Arc::clone(&active),
            event,
            token,
            permit,
        ));

        while let Some(finished) = workers.try_join_next() {
            log_worker_panic(finished);
        }
    }

    while let Some(finished) = workers.join_next().await {
        log_worker_panic(finished);
    }
}

async fn run_session<E, N, C, R>(
    orchestrator: Arc<Orchestrator<E, N, C>>,
    audit: Arc<R>,
    active: ActiveSessions,
    event: Event,
    token: CancellationToken,
    permit: OwnedSemaphorePermit,
) where
    E: ReasoningEngine + 'static,
    N: OutcomeNotifier + 'static,
    C: Clock + Send + Sync + 'static,
    R: SessionAuditRepository + 'static,
{
    let key = event.subject().key();
    let event_id = event.id();

    match orchestrator.run(event, token).await {
        Ok(report) => store_report(audit.as_ref(), &report).await,
        Err(err) => error!(event_id = %event_id, error = %err, "session could not be completed"),
    }
    drop(permit);

    let mut sessions = active.lock().await;
    if sessions
        .get(&key)
        .is_some_and(|session| session.event_id == event_id)
    {
        sessions.remove(&key);
    }
}

async fn store_report<R>(audit: &R, report: &SessionReport)
where
    R: SessionAuditRepository,
{
    let record = match SessionRecord::from_report(report) {
        Ok(record) => record,
        Err(err) => {
            warn!(session_id = %report.session_id(), error = %err, "session report could not be encoded");
            return;
        }
    };
    if let Err(err) = audit.store(&record).await {
        warn!(session_id = %report.session_id(), error = %err, "session audit record not stored");
    }
}

fn log_worker_panic(result: Result<(), tokio::task::JoinError>) {
    if let Err(err) = result {
        error!(error = %err, "session worker panicked");
    }
}
