use std::{
    collections::{HashMap, HashSet},
    pin::Pin,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    task::{Context, Poll},
};

use ampere_proto::ports::battery::{
    BatteryCapability, BatteryChange, BatteryError, BatteryFuture, BatteryHandle,
    BatteryNotifications, BatteryPort, BatteryReading,
};
use futures::{
    Stream,
    channel::mpsc::{UnboundedReceiver, UnboundedSender, unbounded},
    future::pending,
};

#[derive(Debug, Clone)]
enum ProbeOutcome {
    Supported(Arc<MockBatteryHandle>),
    Unsupported,
    Fail(BatteryError),
    Never,
}

/// Scripted [`BatteryPort`] for tests.
#[derive(Debug)]
pub struct MockBatteryPort {
    outcome: ProbeOutcome,
    probe_calls: AtomicUsize,
}

impl MockBatteryPort {
    fn with_outcome(outcome: ProbeOutcome) -> Self {
        Self {
            outcome,
            probe_calls: AtomicUsize::new(0),
        }
    }

    pub fn supported(handle: Arc<MockBatteryHandle>) -> Self {
        Self::with_outcome(ProbeOutcome::Supported(handle))
    }

    pub fn unsupported() -> Self {
        Self::with_outcome(ProbeOutcome::Unsupported)
    }

    pub fn failing(error: BatteryError) -> Self {
        Self::with_outcome(ProbeOutcome::Fail(error))
    }

    /// Probe that never settles.
    pub fn never() -> Self {
        Self::with_outcome(ProbeOutcome::Never)
    }

    pub fn probe_calls(&self) -> usize {
        self.probe_calls.load(Ordering::SeqCst)
    }
}

impl BatteryPort for MockBatteryPort {
    fn probe(&self) -> BatteryFuture<'_, BatteryCapability> {
        self.probe_calls.fetch_add(1, Ordering::SeqCst);
        let outcome = self.outcome.clone();

        Box::pin(async move {
            match outcome {
                ProbeOutcome::Supported(handle) => Ok(BatteryCapability::Supported(handle)),
                ProbeOutcome::Unsupported => Ok(BatteryCapability::Unsupported),
                ProbeOutcome::Fail(error) => Err(error),
                ProbeOutcome::Never => pending().await,
            }
        })
    }
}

/// Live battery stand-in whose readings and notifications are driven by the
/// test.
#[derive(Debug)]
pub struct MockBatteryHandle {
    reading: Mutex<Result<BatteryReading, BatteryError>>,
    senders: Mutex<HashMap<BatteryChange, UnboundedSender<Result<(), BatteryError>>>>,
    rejected: Mutex<HashSet<BatteryChange>>,
    active: Arc<AtomicUsize>,
    read_calls: AtomicUsize,
}

impl MockBatteryHandle {
    pub fn new(reading: BatteryReading) -> Self {
        Self {
            reading: Mutex::new(Ok(reading)),
            senders: Mutex::new(HashMap::new()),
            rejected: Mutex::new(HashSet::new()),
            active: Arc::new(AtomicUsize::new(0)),
            read_calls: AtomicUsize::new(0),
        }
    }

    pub fn set_reading(&self, reading: BatteryReading) {
        *self.reading.lock().expect("poisoned reading lock") = Ok(reading);
    }

    pub fn fail_reads(&self, error: BatteryError) {
        *self.reading.lock().expect("poisoned reading lock") = Err(error);
    }

    pub fn reject_subscriptions(&self, change: BatteryChange) {
        self.rejected
            .lock()
            .expect("poisoned rejected lock")
            .insert(change);
    }

    /// Fire a notification; returns `false` when nobody is subscribed.
    pub fn notify(&self, change: BatteryChange) -> bool {
        self.senders
            .lock()
            .expect("poisoned senders lock")
            .get(&change)
            .is_some_and(|sender| sender.unbounded_send(Ok(())).is_ok())
    }

    /// End every open notification stream, as if the backend went away.
    pub fn close_notifications(&self) {
        self.senders.lock().expect("poisoned senders lock").clear();
    }

    pub fn active_subscriptions(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    pub fn read_calls(&self) -> usize {
        self.read_calls.load(Ordering::SeqCst)
    }
}

impl BatteryHandle for MockBatteryHandle {
    fn read(&self) -> BatteryFuture<'_, BatteryReading> {
        self.read_calls.fetch_add(1, Ordering::SeqCst);
        let reading = self.reading.lock().expect("poisoned reading lock").clone();

        Box::pin(async move { reading })
    }

    fn notifications(&self, change: BatteryChange) -> BatteryFuture<'_, BatteryNotifications> {
        let rejected = self
            .rejected
            .lock()
            .expect("poisoned rejected lock")
            .contains(&change);

        if rejected {
            return Box::pin(async move {
                Err(BatteryError::subscribe(change, "rejected by mock"))
            });
        }

        let (sender, receiver) = unbounded();
        self.senders
            .lock()
            .expect("poisoned senders lock")
            .insert(change, sender);
        self.active.fetch_add(1, Ordering::SeqCst);

        let stream = TrackedNotifications {
            inner: receiver,
            active: Arc::clone(&self.active),
        };

        Box::pin(async move { Ok(Box::pin(stream) as BatteryNotifications) })
    }
}

struct TrackedNotifications {
    inner: UnboundedReceiver<Result<(), BatteryError>>,
    active: Arc<AtomicUsize>,
}

impl Stream for TrackedNotifications {
    type Item = Result<(), BatteryError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}

impl Drop for TrackedNotifications {
    fn drop(&mut self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
    }
}
