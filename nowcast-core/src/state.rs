//! Presentation state: the latest request outcome plus a busy flag.
//!
//! Every request runs as its own tokio task. Starting a request cancels the
//! one in flight, and a task only publishes while it is still the current
//! request, so the most recently started request always wins.

use std::{
    future::Future,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use parking_lot::Mutex;
use tokio::{sync::watch, task::JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::{
    WeatherError,
    location::{LocationPermission, Locator},
    model::{Coordinates, RequestOutcome, WeatherObservation, WeatherState},
    usecase::WeatherUseCase,
};

#[derive(Debug)]
struct InFlight {
    id: u64,
    cancel: CancellationToken,
}

#[derive(Debug)]
struct Inner {
    use_case: WeatherUseCase,
    state: watch::Sender<WeatherState>,
    in_flight: Mutex<Option<InFlight>>,
    next_id: AtomicU64,
}

#[derive(Debug, Clone)]
pub struct WeatherStore {
    inner: Arc<Inner>,
}

impl WeatherStore {
    pub fn new(use_case: WeatherUseCase) -> Self {
        let (state, _) = watch::channel(WeatherState::default());
        Self {
            inner: Arc::new(Inner {
                use_case,
                state,
                in_flight: Mutex::new(None),
                next_id: AtomicU64::new(0),
            }),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<WeatherState> {
        self.inner.state.subscribe()
    }

    pub fn snapshot(&self) -> WeatherState {
        self.inner.state.borrow().clone()
    }

    pub fn is_busy(&self) -> bool {
        self.inner.state.borrow().busy
    }

    /// Entry point for free-text city input. Blank input starts nothing.
    pub fn on_city_input(&self, text: &str) -> Option<JoinHandle<()>> {
        let city = text.trim();
        if city.is_empty() {
            return None;
        }
        Some(self.fetch_city(city.to_string()))
    }

    pub fn fetch_city(&self, city: String) -> JoinHandle<()> {
        let use_case = self.inner.use_case.clone();
        self.launch(async move { use_case.get_weather(&city).await })
    }

    pub fn fetch_coordinates(&self, coords: Coordinates) -> JoinHandle<()> {
        let use_case = self.inner.use_case.clone();
        self.launch(async move {
            use_case
                .get_weather_by_coordinates(coords.latitude, coords.longitude)
                .await
        })
    }

    /// Resolve the user's location, then look up the weather there.
    ///
    /// A denied permission fails the request without touching the locator.
    pub fn fetch_location(
        &self,
        permission: LocationPermission,
        locator: Arc<dyn Locator>,
    ) -> JoinHandle<()> {
        let use_case = self.inner.use_case.clone();
        self.launch(async move {
            if permission == LocationPermission::Denied {
                return Err(WeatherError::PermissionDenied);
            }
            let coords = locator.locate().await?;
            use_case
                .get_weather_by_coordinates(coords.latitude, coords.longitude)
                .await
        })
    }

    fn launch<F>(&self, request: F) -> JoinHandle<()>
    where
        F: Future<Output = Result<WeatherObservation, WeatherError>> + Send + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let cancel = CancellationToken::new();

        {
            let mut in_flight = self.inner.in_flight.lock();
            let current = InFlight {
                id,
                cancel: cancel.clone(),
            };
            if let Some(previous) = in_flight.replace(current) {
                debug!(superseded = previous.id, by = id, "cancelling in-flight request");
                previous.cancel.cancel();
            }
            self.inner.state.send_replace(WeatherState {
                outcome: RequestOutcome::Loading,
                busy: true,
            });
        }

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            let result = tokio::select! {
                _ = cancel.cancelled() => {
                    debug!(id, "request cancelled");
                    return;
                }
                result = request => result,
            };
            inner.publish(id, result);
        })
    }
}

impl Inner {
    fn publish(&self, id: u64, result: Result<WeatherObservation, WeatherError>) {
        let mut in_flight = self.in_flight.lock();
        if in_flight.as_ref().map(|f| f.id) != Some(id) {
            debug!(id, "dropping result of superseded request");
            return;
        }
        *in_flight = None;

        let outcome = match result {
            Ok(observation) => RequestOutcome::Success(observation),
            Err(e) => {
                debug!(id, error = %e, "request failed");
                RequestOutcome::Failure(e.user_message())
            }
        };

        self.state.send_replace(WeatherState {
            outcome,
            busy: false,
        });
    }
}
