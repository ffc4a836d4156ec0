//! Auto-refresh session flag and its timer.
//!
//! While the flag is on, a background task bumps a generation counter once per
//! interval. Pages wait on that counter and re-render when it moves. Any render
//! reschedules the pending tick, and switching the flag off cancels it, so no
//! request ever blocks on the interval.

use serde::Serialize;
use std::{sync::Arc, time::Duration};
use tokio::{
    sync::{Mutex, watch},
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RefreshState {
    #[default]
    Off,
    On,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefreshStatus {
    pub enabled: bool,
    pub state: RefreshState,
    pub interval_secs: u64,
    pub generation: u64,
}

#[derive(Debug, Default)]
struct Inner {
    state: RefreshState,
    timer: Option<JoinHandle<()>>,
}

#[derive(Debug)]
pub struct RefreshController {
    interval: Duration,
    inner: Mutex<Inner>,
    ticks: Arc<watch::Sender<u64>>,
}

impl RefreshController {
    pub fn new(interval: Duration) -> Self {
        let (ticks, _) = watch::channel(0);
        Self {
            interval,
            inner: Mutex::new(Inner::default()),
            ticks: Arc::new(ticks),
        }
    }

    pub fn generation(&self) -> u64 {
        *self.ticks.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.ticks.subscribe()
    }

    pub async fn status(&self) -> RefreshStatus {
        let state = self.inner.lock().await.state;
        self.status_for(state)
    }

    pub async fn toggle(&self) -> RefreshStatus {
        let mut inner = self.inner.lock().await;
        let next = match inner.state {
            RefreshState::Off => RefreshState::On,
            RefreshState::On => RefreshState::Off,
        };
        self.apply(&mut inner, next)
    }

    pub async fn set(&self, next: RefreshState) -> RefreshStatus {
        let mut inner = self.inner.lock().await;
        self.apply(&mut inner, next)
    }

    // Caller holds the lock for the whole read-modify-write.
    fn apply(&self, inner: &mut Inner, next: RefreshState) -> RefreshStatus {
        if inner.state != next {
            info!(state = ?next, interval_secs = self.interval.as_secs(), "auto-refresh toggled");
        }
        inner.state = next;
        match next {
            RefreshState::On => self.reschedule(inner),
            RefreshState::Off => cancel(inner),
        }
        self.status_for(next)
    }

    /// Records a render. Restarts the countdown when auto-refresh is on.
    pub async fn touch(&self) {
        let mut inner = self.inner.lock().await;
        if inner.state == RefreshState::On {
            self.reschedule(&mut inner);
        }
    }

    fn reschedule(&self, inner: &mut Inner) {
        cancel(inner);
        let ticks = Arc::clone(&self.ticks);
        let period = self.interval;
        inner.timer = Some(tokio::spawn(async move {
            let mut interval = time::interval_at(time::Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                ticks.send_modify(|generation| *generation += 1);
                let generation = *ticks.borrow();
                debug!(generation, "auto-refresh tick");
            }
        }));
    }

    fn status_for(&self, state: RefreshState) -> RefreshStatus {
        RefreshStatus {
            enabled: state == RefreshState::On,
            state,
            interval_secs: self.interval.as_secs(),
            generation: self.generation(),
        }
    }
}

fn cancel(inner: &mut Inner) {
    if let Some(timer) = inner.timer.take() {
        timer.abort();
    }
}

impl Drop for RefreshController {
    fn drop(&mut self) {
        if let Some(timer) = self.inner.get_mut().timer.take() {
            timer.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INTERVAL: Duration = Duration::from_secs(60);

    #[tokio::test(start_paused = true)]
    async fn starts_off_and_toggles() {
        let controller = RefreshController::new(INTERVAL);
        assert_eq!(controller.status().await.state, RefreshState::Off);

        let status = controller.toggle().await;
        assert!(status.enabled);
        assert_eq!(status.interval_secs, 60);

        let status = controller.toggle().await;
        assert_eq!(status.state, RefreshState::Off);
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_once_per_interval_while_on() {
        let controller = RefreshController::new(INTERVAL);
        let mut rx = controller.subscribe();
        controller.set(RefreshState::On).await;

        let started = time::Instant::now();
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), 1);
        assert!(started.elapsed() >= INTERVAL);

        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn off_cancels_pending_tick() {
        let controller = RefreshController::new(INTERVAL);
        controller.set(RefreshState::On).await;
        time::sleep(Duration::from_secs(30)).await;
        controller.set(RefreshState::Off).await;

        time::sleep(INTERVAL * 3).await;
        assert_eq!(controller.generation(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn touch_restarts_the_countdown() {
        let controller = RefreshController::new(INTERVAL);
        controller.set(RefreshState::On).await;

        time::sleep(Duration::from_secs(45)).await;
        controller.touch().await;
        time::sleep(Duration::from_secs(45)).await;
        assert_eq!(controller.generation(), 0);

        time::sleep(Duration::from_secs(20)).await;
        assert_eq!(controller.generation(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_toggles_each_flip_the_flag() {
        let controller = Arc::new(RefreshController::new(INTERVAL));
        let tasks: Vec<_> = (0..64)
            .map(|_| {
                let controller = Arc::clone(&controller);
                tokio::spawn(async move { controller.toggle().await })
            })
            .collect();

        let mut enabled = 0;
        for task in tasks {
            if task.await.unwrap().enabled {
                enabled += 1;
            }
        }

        assert_eq!(enabled, 32);
        assert_eq!(controller.status().await.state, RefreshState::Off);
        assert!(controller.inner.lock().await.timer.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn touch_is_a_no_op_while_off() {
        let controller = RefreshController::new(INTERVAL);
        controller.touch().await;
        time::sleep(INTERVAL * 2).await;
        assert_eq!(controller.generation(), 0);
        assert!(!controller.status().await.enabled);
    }
}
