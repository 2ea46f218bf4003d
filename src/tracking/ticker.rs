use rand::Rng;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use super::{GeofenceSession, MovementSimulator, PositionUpdate, Status};
use crate::domain::GeoPoint;
use crate::error::GeofenceError;

/// Longest single sleep while waiting for the next tick
const CANCEL_POLL: Duration = Duration::from_millis(50);

/// Shared flag used to stop a running [`TrackingLoop`]
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Totals for a finished tracking run
#[derive(Debug, Clone, PartialEq)]
pub struct TrackingSummary {
    pub ticks: u64,
    pub breaches: u64,
    pub recoveries: u64,
    pub final_status: Status,
    pub final_position: Option<GeoPoint>,
}

/// Repeating timer that feeds simulated movement into a session
///
/// The loop stops when the tick limit is reached, when the cancel token is
/// set, or when the session stops tracking (for example because the callback
/// cleared the fence). Cancellation is checked between ticks only, so a
/// position update is always applied in full.
#[derive(Debug, Clone)]
pub struct TrackingLoop {
    interval: Duration,
    max_ticks: Option<u64>,
}

impl TrackingLoop {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            max_ticks: None,
        }
    }

    pub fn with_max_ticks(mut self, max_ticks: u64) -> Self {
        self.max_ticks = Some(max_ticks);
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn run<R, F>(
        &self,
        session: &mut GeofenceSession,
        simulator: &MovementSimulator,
        rng: &mut R,
        cancel: &CancelToken,
        mut on_update: F,
    ) -> Result<TrackingSummary, GeofenceError>
    where
        R: Rng,
        F: FnMut(&mut GeofenceSession, &PositionUpdate),
    {
        let mut summary = TrackingSummary {
            ticks: 0,
            breaches: 0,
            recoveries: 0,
            final_status: session.status(),
            final_position: session.position(),
        };

        while self.max_ticks.is_none_or(|max| summary.ticks < max) {
            if !self.wait(cancel) || !session.is_tracking() {
                break;
            }

            let Some(current) = session.position() else {
                break;
            };

            let next = simulator.tick(current, rng)?;
            let update = session.update_position(next)?;

            summary.ticks += 1;
            match update.event {
                Some(e) if e.is_breach() => summary.breaches += 1,
                Some(_) => summary.recoveries += 1,
                None => {}
            }

            on_update(session, &update);
        }

        log::debug!(
            "Tracking loop finished after {} ticks ({} breaches, {} recoveries)",
            summary.ticks,
            summary.breaches,
            summary.recoveries
        );

        summary.final_status = session.status();
        summary.final_position = session.position();
        Ok(summary)
    }

    /// Sleep until the next tick; false if cancelled first
    fn wait(&self, cancel: &CancelToken) -> bool {
        let deadline = Instant::now() + self.interval;
        loop {
            if cancel.is_cancelled() {
                return false;
            }
            let now = Instant::now();
            if now >= deadline {
                return true;
            }
            thread::sleep((deadline - now).min(CANCEL_POLL));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Polygon;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn tracking_session() -> GeofenceSession {
        let fence = Polygon::new(vec![
            GeoPoint::new(40.710, -74.010),
            GeoPoint::new(40.710, -74.000),
            GeoPoint::new(40.716, -74.000),
            GeoPoint::new(40.716, -74.010),
        ])
        .unwrap();
        let mut session = GeofenceSession::new();
        session.set_fence(fence);
        session.start_tracking().unwrap();
        session
    }

    #[test]
    fn test_runs_bounded_ticks() {
        let mut session = tracking_session();
        let sim = MovementSimulator::default();
        let mut rng = StdRng::seed_from_u64(3);
        let mut seen = 0;

        let summary = TrackingLoop::new(Duration::ZERO)
            .with_max_ticks(200)
            .run(&mut session, &sim, &mut rng, &CancelToken::new(), |_, _| {
                seen += 1
            })
            .unwrap();

        assert_eq!(summary.ticks, 200);
        assert_eq!(seen, 200);
        assert_eq!(summary.final_position, session.position());
        // Events alternate, so counts differ by at most one
        assert!(summary.breaches.abs_diff(summary.recoveries) <= 1);
    }

    #[test]
    fn test_same_seed_same_summary() {
        let run = || {
            let mut session = tracking_session();
            let mut rng = StdRng::seed_from_u64(11);
            TrackingLoop::new(Duration::ZERO)
                .with_max_ticks(500)
                .run(
                    &mut session,
                    &MovementSimulator::default(),
                    &mut rng,
                    &CancelToken::new(),
                    |_, _| {},
                )
                .unwrap()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_cancelled_before_start() {
        let mut session = tracking_session();
        let start = session.position();
        let cancel = CancelToken::new();
        cancel.cancel();

        let summary = TrackingLoop::new(Duration::ZERO)
            .run(
                &mut session,
                &MovementSimulator::default(),
                &mut StdRng::seed_from_u64(1),
                &cancel,
                |_, _| {},
            )
            .unwrap();

        assert_eq!(summary.ticks, 0);
        assert_eq!(session.position(), start);
    }

    #[test]
    fn test_cancel_takes_effect_before_next_tick() {
        let mut session = tracking_session();
        let cancel = CancelToken::new();
        let token = cancel.clone();
        let mut count = 0;

        let summary = TrackingLoop::new(Duration::ZERO)
            .run(
                &mut session,
                &MovementSimulator::default(),
                &mut StdRng::seed_from_u64(1),
                &cancel,
                |_, _| {
                    count += 1;
                    if count == 3 {
                        token.cancel();
                    }
                },
            )
            .unwrap();

        assert_eq!(summary.ticks, 3);
    }

    #[test]
    fn test_clear_fence_halts_loop() {
        let mut session = tracking_session();

        let summary = TrackingLoop::new(Duration::ZERO)
            .with_max_ticks(100)
            .run(
                &mut session,
                &MovementSimulator::default(),
                &mut StdRng::seed_from_u64(1),
                &CancelToken::new(),
                |s, _| s.clear_fence(),
            )
            .unwrap();

        assert_eq!(summary.ticks, 1);
        assert_eq!(summary.final_status, Status::Unset);
    }

    #[test]
    fn test_not_tracking_does_nothing() {
        let mut session = tracking_session();
        session.stop_tracking();

        let summary = TrackingLoop::new(Duration::ZERO)
            .with_max_ticks(10)
            .run(
                &mut session,
                &MovementSimulator::default(),
                &mut StdRng::seed_from_u64(1),
                &CancelToken::new(),
                |_, _| {},
            )
            .unwrap();

        assert_eq!(summary.ticks, 0);
        assert_eq!(summary.final_status, Status::Ready);
    }

    #[test]
    fn test_cancel_from_another_thread() {
        let mut session = tracking_session();
        let cancel = CancelToken::new();
        let token = cancel.clone();

        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(30));
            token.cancel();
        });

        let summary = TrackingLoop::new(Duration::from_millis(5))
            .run(
                &mut session,
                &MovementSimulator::default(),
                &mut StdRng::seed_from_u64(1),
                &cancel,
                |_, _| {},
            )
            .unwrap();

        handle.join().unwrap();
        assert!(cancel.is_cancelled());
        assert!(summary.ticks < 1000);
    }
}
