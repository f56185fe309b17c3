use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

use crate::particles::ParticleRecord;

use super::pixels::extract_particles;
use super::resolver::{ImageResolver, ResolveError};

/// A logo request and the id that orders it against later ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoRequest {
    pub id: u64,
    pub url: String,
}

/// A finished request that is still the latest one.
#[derive(Debug)]
pub enum LogoOutcome {
    Ready {
        request: LogoRequest,
        particles: Vec<ParticleRecord>,
    },
    Failed {
        request: LogoRequest,
        error: ResolveError,
    },
}

struct Completion {
    request: LogoRequest,
    result: Result<Vec<ParticleRecord>, ResolveError>,
}

/// Resolves logos on worker threads and hands back only the latest result.
///
/// Every [`request`](Self::request) gets a larger id than the previous one.
/// Results are drained on the render thread by [`poll`](Self::poll); any
/// result whose id is not the latest is dropped there.
pub struct LogoLoader {
    resolver: Arc<dyn ImageResolver>,
    max_dimension: u32,

    latest: u64,
    in_flight: usize,

    tx: Sender<Completion>,
    rx: Receiver<Completion>,
}

impl LogoLoader {
    pub fn new(resolver: Arc<dyn ImageResolver>, max_dimension: u32) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            resolver,
            max_dimension,
            latest: 0,
            in_flight: 0,
            tx,
            rx,
        }
    }

    /// Starts resolving `url` and returns the new request.
    ///
    /// Never blocks; the work runs on its own thread.
    pub fn request(&mut self, url: impl Into<String>) -> LogoRequest {
        self.latest += 1;
        let request = LogoRequest {
            id: self.latest,
            url: url.into(),
        };
        self.in_flight += 1;

        let resolver = Arc::clone(&self.resolver);
        let tx = self.tx.clone();
        let max_dimension = self.max_dimension;
        let job = request.clone();

        let spawned = std::thread::Builder::new()
            .name(format!("logodust-logo-{}", request.id))
            .spawn(move || {
                // A fully transparent image is a valid, empty logo.
                let result = resolver
                    .resolve(&job.url, max_dimension)
                    .map(|pixels| extract_particles(&pixels));
                // The loader may be gone by now; nothing left to deliver to.
                let _ = tx.send(Completion { request: job, result });
            });

        if let Err(source) = spawned {
            let _ = self.tx.send(Completion {
                request: request.clone(),
                result: Err(ResolveError::Io {
                    path: request.url.clone(),
                    source,
                }),
            });
        }

        request
    }

    /// Id of the most recent request (0 before the first).
    pub fn latest(&self) -> u64 {
        self.latest
    }

    /// Requests started but not yet drained by [`poll`](Self::poll).
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Drains finished requests, keeping only those that are still current.
    pub fn poll(&mut self) -> Vec<LogoOutcome> {
        let mut out = Vec::new();

        while let Ok(done) = self.rx.try_recv() {
            self.in_flight = self.in_flight.saturating_sub(1);

            if done.request.id != self.latest {
                log::debug!(
                    "discarding stale logo result #{} for `{}` (latest is #{})",
                    done.request.id,
                    done.request.url,
                    self.latest
                );
                continue;
            }

            out.push(match done.result {
                Ok(particles) => LogoOutcome::Ready {
                    request: done.request,
                    particles,
                },
                Err(error) => LogoOutcome::Failed {
                    request: done.request,
                    error,
                },
            });
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logo::PixelBuffer;
    use std::time::{Duration, Instant};

    /// `"<delay_ms>:<width>"` resolves to an opaque `width`x1 image after the delay;
    /// anything else fails.
    struct ScriptedResolver;

    impl ImageResolver for ScriptedResolver {
        fn resolve(&self, url: &str, _max_dimension: u32) -> Result<PixelBuffer, ResolveError> {
            let Some((delay, width)) = url.split_once(':') else {
                return Err(ResolveError::Http {
                    url: url.to_string(),
                    reason: "404".to_string(),
                });
            };
            let delay: u64 = delay.parse().map_err(|_| ResolveError::Decode(url.to_string()))?;
            let width: u32 = width.parse().map_err(|_| ResolveError::Decode(url.to_string()))?;

            std::thread::sleep(Duration::from_millis(delay));
            PixelBuffer::new(width, 1, vec![255; width as usize * 4])
        }
    }

    fn drain(loader: &mut LogoLoader) -> Vec<LogoOutcome> {
        let deadline = Instant::now() + Duration::from_secs(10);
        let mut out = Vec::new();
        while loader.in_flight() > 0 {
            assert!(Instant::now() < deadline, "logo requests never finished");
            out.extend(loader.poll());
            std::thread::sleep(Duration::from_millis(5));
        }
        out
    }

    fn loader() -> LogoLoader {
        LogoLoader::new(Arc::new(ScriptedResolver), 250)
    }

    #[test]
    fn ids_increase_monotonically() {
        let mut l = loader();
        let a = l.request("0:1");
        let b = l.request("0:1");
        assert!(b.id > a.id);
        assert_eq!(l.latest(), b.id);
        drain(&mut l);
    }

    #[test]
    fn out_of_order_completion_applies_only_latest() {
        let mut l = loader();
        l.request("200:2"); // slow, finishes last
        let second = l.request("0:5");

        let outcomes = drain(&mut l);
        assert_eq!(outcomes.len(), 1);
        match &outcomes[0] {
            LogoOutcome::Ready { request, particles } => {
                assert_eq!(request, &second);
                assert_eq!(particles.len(), 5);
            }
            other => panic!("expected ready outcome, got {other:?}"),
        }
    }

    #[test]
    fn current_failure_is_reported() {
        let mut l = loader();
        let req = l.request("missing.png");
        let outcomes = drain(&mut l);
        assert!(matches!(
            outcomes.as_slice(),
            [LogoOutcome::Failed { request, error: ResolveError::Http { .. } }] if *request == req
        ));
    }

    #[test]
    fn stale_failure_is_silent() {
        let mut l = loader();
        l.request("missing.png");
        l.request("50:1");
        let outcomes = drain(&mut l);
        assert_eq!(outcomes.len(), 1);
        assert!(matches!(outcomes[0], LogoOutcome::Ready { .. }));
    }

    #[test]
    fn transparent_logo_applies_zero_particles() {
        struct Clear;
        impl ImageResolver for Clear {
            fn resolve(&self, _: &str, _: u32) -> Result<PixelBuffer, ResolveError> {
                PixelBuffer::new(2, 2, vec![0; 16])
            }
        }

        let mut l = LogoLoader::new(Arc::new(Clear), 250);
        l.request("clear.png");
        let outcomes = drain(&mut l);
        match outcomes.as_slice() {
            [LogoOutcome::Ready { request, particles }] => {
                assert_eq!(request.url, "clear.png");
                assert!(particles.is_empty());
            }
            other => panic!("expected an empty logo, got {other:?}"),
        }
    }
}
