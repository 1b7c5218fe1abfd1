use std::{any::TypeId, fmt, ops::Deref, sync::Arc, time::Duration};

use ampere_proto::ports::battery::{
    BatteryCapability, BatteryChange, BatteryError, BatteryHandle, BatteryPort, BatteryReading,
};
use futures::{
    StreamExt,
    stream::{self, pending},
};
use iced::{Subscription, stream::channel};
use log::{debug, error, info, warn};

use super::{ReadOnlyService, ServiceEvent, ServiceEventPublisher};

/// Everything the battery service needs to run its one-time probe.
#[derive(Clone)]
pub struct BatteryProbe {
    port: Arc<dyn BatteryPort>,
    timeout: Option<Duration>,
}

impl BatteryProbe {
    /// `timeout` bounds the probe and initial read; `None` waits forever.
    pub fn new(port: Arc<dyn BatteryPort>, timeout: Option<Duration>) -> Self {
        Self { port, timeout }
    }
}

impl fmt::Debug for BatteryProbe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatteryProbe")
            .field("port", &self.port)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// State delivered once the probe succeeds.
#[derive(Debug, Clone)]
pub struct BatteryService {
    reading: BatteryReading,
}

impl Deref for BatteryService {
    type Target = BatteryReading;

    fn deref(&self) -> &Self::Target {
        &self.reading
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BatteryEvent {
    /// Fresh reading taken after a change notification.
    Reading(BatteryReading),
}

enum State {
    Init,
    Active(Arc<dyn BatteryHandle>),
    Idle,
}

impl BatteryService {
    pub fn new(reading: BatteryReading) -> Self {
        Self { reading }
    }

    async fn connect(
        port: &dyn BatteryPort,
    ) -> Result<(Arc<dyn BatteryHandle>, BatteryReading), BatteryError> {
        match port.probe().await? {
            BatteryCapability::Unsupported => Err(BatteryError::unavailable(
                "host does not expose a battery device",
            )),
            BatteryCapability::Supported(handle) => {
                let reading = handle.read().await?;
                Ok((handle, reading))
            }
        }
    }

    async fn connect_with_timeout(
        probe: &BatteryProbe,
    ) -> Result<(Arc<dyn BatteryHandle>, BatteryReading), BatteryError> {
        let port = probe.port.as_ref();

        match probe.timeout {
            Some(timeout) => tokio::time::timeout(timeout, Self::connect(port))
                .await
                .map_err(|_| BatteryError::Timeout { timeout })?,
            None => Self::connect(port).await,
        }
    }

    async fn start_listening<P>(
        state: State,
        probe: &BatteryProbe,
        output: &mut P,
    ) -> Result<State, BatteryError>
    where
        P: ServiceEventPublisher<Self>,
    {
        match state {
            State::Init => {
                let (handle, reading) = Self::connect_with_timeout(probe).await?;
                debug!(
                    "Initial battery reading: {:.0}%, charging: {}",
                    reading.level(),
                    reading.charging
                );
                output.send(ServiceEvent::Init(BatteryService::new(reading))).await;

                Ok(State::Active(handle))
            }
            State::Active(handle) => {
                let mut subscriptions = Vec::with_capacity(BatteryChange::ALL.len());
                for change in BatteryChange::ALL {
                    subscriptions.push(handle.notifications(change).await?);
                }

                info!("Listening for battery status changes");
                let mut notifications = stream::select_all(subscriptions);

                while let Some(notification) = notifications.next().await {
                    notification?;

                    let reading = handle.read().await?;
                    debug!(
                        "Battery changed: {:.0}%, charging: {}",
                        reading.level(),
                        reading.charging
                    );
                    output
                        .send(ServiceEvent::Update(BatteryEvent::Reading(reading)))
                        .await;
                }

                warn!("Battery notification streams closed");
                Ok(State::Idle)
            }
            State::Idle => {
                let _ = pending::<()>().next().await;
                Ok(State::Idle)
            }
        }
    }

    /// Drive the probe and notification loop until the future is dropped.
    ///
    /// Any failure is published once as [`ServiceEvent::Error`]; the loop then
    /// parks without retrying. Dropping the future drops both subscriptions.
    pub async fn run<P>(probe: BatteryProbe, mut output: P)
    where
        P: ServiceEventPublisher<Self>,
    {
        let mut state = State::Init;

        loop {
            match Self::start_listening(state, &probe, &mut output).await {
                Ok(next_state) => {
                    state = next_state;
                }
                Err(err) => {
                    error!("Battery status is not supported: {err}");
                    output.send(ServiceEvent::Error(err)).await;
                    state = State::Idle;
                }
            }
        }
    }
}

impl ReadOnlyService for BatteryService {
    type UpdateEvent = BatteryEvent;
    type Error = BatteryError;
    type Source = BatteryProbe;

    fn update(&mut self, event: Self::UpdateEvent) {
        match event {
            BatteryEvent::Reading(reading) => self.reading = reading,
        }
    }

    fn subscribe(probe: BatteryProbe) -> Subscription<ServiceEvent<Self>> {
        let id = TypeId::of::<Self>();

        Subscription::run_with_id(
            id,
            channel(100, move |output| async move {
                BatteryService::run(probe, output).await;
            }),
        )
    }
}
