//! Kitchen lifecycle simulator
//!
//! Stands in for a kitchen display feed: on every tick each open order may
//! move one step forward. The decision is delegated to an
//! [`AdvancementStrategy`], so a real event source can replace the random
//! one without touching table or order code.

use super::manager::FloorManager;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use shared::order::OrderStatus;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Decides the next status of an order
///
/// Returning `None` leaves the order untouched. Implementations must never
/// return `Paid` (checkout owns that transition) nor a status behind
/// `current`; the manager rejects both anyway.
pub trait AdvancementStrategy: Send + Sync {
    fn next_status(&self, current: OrderStatus, elapsed: Duration) -> Option<OrderStatus>;
}

/// Probabilistic kitchen
///
/// `pending → preparing` always; `preparing → ready` and `ready → served`
/// with probability `p` per tick.
pub struct RandomAdvancement {
    probability: f64,
    rng: Mutex<StdRng>,
}

impl RandomAdvancement {
    pub fn new(probability: f64) -> Self {
        Self {
            probability: probability.clamp(0.0, 1.0),
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Deterministic sequence (tests, replays)
    pub fn seeded(probability: f64, seed: u64) -> Self {
        Self {
            probability: probability.clamp(0.0, 1.0),
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }

    fn roll(&self) -> bool {
        self.rng.lock().gen_bool(self.probability)
    }
}

impl std::fmt::Debug for RandomAdvancement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RandomAdvancement")
            .field("probability", &self.probability)
            .finish_non_exhaustive()
    }
}

impl AdvancementStrategy for RandomAdvancement {
    fn next_status(&self, current: OrderStatus, _elapsed: Duration) -> Option<OrderStatus> {
        match current {
            OrderStatus::Pending => Some(OrderStatus::Preparing),
            OrderStatus::Preparing if self.roll() => Some(OrderStatus::Ready),
            OrderStatus::Ready if self.roll() => Some(OrderStatus::Served),
            _ => None,
        }
    }
}

/// Moves every open order one step per tick, stopping at `served`
#[derive(Debug, Default, Clone, Copy)]
pub struct ImmediateAdvancement;

impl AdvancementStrategy for ImmediateAdvancement {
    fn next_status(&self, current: OrderStatus, _elapsed: Duration) -> Option<OrderStatus> {
        current.next().filter(|next| *next != OrderStatus::Paid)
    }
}

/// Periodic driver around [`FloorManager::advance_orders`]
pub struct LifecycleSimulator {
    manager: Arc<FloorManager>,
    strategy: Arc<dyn AdvancementStrategy>,
    tick: Duration,
}

impl LifecycleSimulator {
    pub fn new(
        manager: Arc<FloorManager>,
        strategy: Arc<dyn AdvancementStrategy>,
        tick: Duration,
    ) -> Self {
        Self {
            manager,
            strategy,
            tick,
        }
    }

    /// One tick; returns the number of orders advanced
    ///
    /// Does nothing while no open order exists.
    pub fn tick_once(&self) -> usize {
        match self.manager.has_open_orders() {
            Ok(false) => 0,
            Ok(true) => match self.manager.advance_orders(self.strategy.as_ref()) {
                Ok(n) => n,
                Err(e) => {
                    tracing::error!(error = %e, "Simulator tick failed");
                    0
                }
            },
            Err(e) => {
                tracing::error!(error = %e, "Simulator could not read tables");
                0
            }
        }
    }

    /// Tick until `shutdown` is cancelled
    pub async fn run(self, shutdown: CancellationToken) {
        let mut interval = tokio::time::interval(self.tick);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // first tick of a tokio interval fires immediately
        interval.tick().await;

        tracing::info!(tick_ms = self.tick.as_millis() as u64, "Lifecycle simulator started");
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    tracing::info!("Lifecycle simulator stopped");
                    return;
                }
                _ = interval.tick() => {
                    let advanced = self.tick_once();
                    if advanced > 0 {
                        tracing::debug!(advanced, "Simulator tick");
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_pending_always_advances() {
        let strategy = RandomAdvancement::seeded(0.0, 1);
        assert_eq!(
            strategy.next_status(OrderStatus::Pending, Duration::ZERO),
            Some(OrderStatus::Preparing)
        );
    }

    #[test]
    fn test_random_probability_extremes() {
        let never = RandomAdvancement::seeded(0.0, 7);
        let always = RandomAdvancement::seeded(1.0, 7);
        for _ in 0..50 {
            assert_eq!(never.next_status(OrderStatus::Preparing, Duration::ZERO), None);
            assert_eq!(
                always.next_status(OrderStatus::Ready, Duration::ZERO),
                Some(OrderStatus::Served)
            );
        }
    }

    #[test]
    fn test_random_never_touches_served_or_paid() {
        let always = RandomAdvancement::seeded(1.0, 3);
        assert_eq!(always.next_status(OrderStatus::Served, Duration::ZERO), None);
        assert_eq!(always.next_status(OrderStatus::Paid, Duration::ZERO), None);
    }

    #[test]
    fn test_random_rate_is_roughly_p() {
        let strategy = RandomAdvancement::seeded(0.3, 42);
        let hits = (0..10_000)
            .filter(|_| {
                strategy
                    .next_status(OrderStatus::Preparing, Duration::ZERO)
                    .is_some()
            })
            .count();
        assert!((2_500..3_500).contains(&hits), "hits = {hits}");
    }

    #[test]
    fn test_immediate_stops_before_paid() {
        let s = ImmediateAdvancement;
        assert_eq!(
            s.next_status(OrderStatus::Ready, Duration::ZERO),
            Some(OrderStatus::Served)
        );
        assert_eq!(s.next_status(OrderStatus::Served, Duration::ZERO), None);
    }
}
