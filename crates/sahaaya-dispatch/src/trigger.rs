//! Covert-trigger detection: N rapid taps within a rolling window.
//!
//! The subject's device feeds discrete taps in; the detector emits one
//! [`Activation`] on its channel the moment the configured count lands
//! inside the window. The window is anchored to the latest tap, so each tap
//! refreshes a single pending expiry timer. Taps never carry over across an
//! expired window.
//!
//! Timing runs on the tokio clock, so tests drive it deterministically with
//! `start_paused` and [`tokio::time::advance`].

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use tokio::{
  sync::mpsc,
  task::JoinHandle,
  time::{Duration, Instant},
};

// ─── Configuration ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
pub struct TriggerConfig {
  /// Taps required for activation.
  pub taps_required: u32,
  /// Rolling window anchored to the latest tap.
  pub window:        Duration,
}

impl Default for TriggerConfig {
  fn default() -> Self {
    Self {
      taps_required: 6,
      window:        Duration::from_millis(2000),
    }
  }
}

// ─── Activation event ────────────────────────────────────────────────────────

/// Emitted exactly once per recognized gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Activation {
  /// Wall-clock stamp for the record; window math is monotonic-time only.
  pub at: DateTime<Utc>,
}

// ─── Detector ────────────────────────────────────────────────────────────────

struct TapState {
  count:    u32,
  last_tap: Option<Instant>,
  /// Bumped on every tap and reset. A pending expiry timer only fires if
  /// its captured epoch still matches, so a timer racing its own
  /// cancellation is harmless.
  epoch:    u64,
  expiry:   Option<JoinHandle<()>>,
}

pub struct TriggerDetector {
  config: TriggerConfig,
  state:  Arc<Mutex<TapState>>,
  tx:     mpsc::UnboundedSender<Activation>,
}

impl TriggerDetector {
  /// Build a detector and the receiving end of its activation channel.
  pub fn new(config: TriggerConfig) -> (Self, mpsc::UnboundedReceiver<Activation>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let detector = Self {
      config,
      state: Arc::new(Mutex::new(TapState {
        count:    0,
        last_tap: None,
        epoch:    0,
        expiry:   None,
      })),
      tx,
    };
    (detector, rx)
  }

  fn lock(&self) -> MutexGuard<'_, TapState> {
    self.state.lock().expect("tap state lock poisoned")
  }

  /// Register one tap at the current instant.
  ///
  /// Synchronously evaluates the count and replaces the pending expiry
  /// timer; no two timers are ever pending at once. A tap landing exactly
  /// on the window boundary is treated as expired — the reset takes
  /// precedence and the tap starts a fresh count of 1.
  pub fn register_tap(&self) {
    let mut st = self.lock();
    let now = Instant::now();

    if let Some(last) = st.last_tap
      && now.duration_since(last) >= self.config.window
    {
      st.count = 0;
    }

    st.count += 1;
    st.last_tap = Some(now);
    st.epoch += 1;
    if let Some(pending) = st.expiry.take() {
      pending.abort();
    }

    if st.count >= self.config.taps_required {
      st.count = 0;
      st.last_tap = None;
      tracing::info!("covert trigger recognized");
      // Receiver dropped means the session is gone; nothing to do.
      let _ = self.tx.send(Activation { at: Utc::now() });
      return;
    }

    tracing::debug!(count = st.count, "tap registered");
    st.expiry = Some(self.schedule_expiry(st.epoch));
  }

  /// Current tap count, for progress indicators.
  pub fn tap_count(&self) -> u32 { self.lock().count }

  /// Cancel the pending timer and zero the counter (session teardown).
  pub fn reset(&self) {
    let mut st = self.lock();
    st.epoch += 1;
    st.count = 0;
    st.last_tap = None;
    if let Some(pending) = st.expiry.take() {
      pending.abort();
    }
  }

  fn schedule_expiry(&self, epoch: u64) -> JoinHandle<()> {
    let state = Arc::clone(&self.state);
    let window = self.config.window;
    tokio::spawn(async move {
      tokio::time::sleep(window).await;
      let mut st = state.lock().expect("tap state lock poisoned");
      if st.epoch == epoch {
        // Suppressed activation: not an error, just a fresh start.
        tracing::debug!(count = st.count, "tap window expired");
        st.count = 0;
        st.last_tap = None;
        st.expiry = None;
      }
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tokio::time::advance;

  fn detector() -> (TriggerDetector, mpsc::UnboundedReceiver<Activation>) {
    TriggerDetector::new(TriggerConfig::default())
  }

  /// Let spawned expiry tasks run after a clock advance.
  async fn settle() {
    for _ in 0..4 {
      tokio::task::yield_now().await;
    }
  }

  #[tokio::test(start_paused = true)]
  async fn six_taps_within_window_activate_once() {
    let (d, mut rx) = detector();

    // Taps at t = 0, 200, 400, 600, 800, 1000 ms.
    for i in 0..6 {
      if i > 0 {
        advance(Duration::from_millis(200)).await;
      }
      d.register_tap();
    }

    assert!(rx.try_recv().is_ok());
    assert!(rx.try_recv().is_err(), "activation must fire exactly once");
    assert_eq!(d.tap_count(), 0);
  }

  #[tokio::test(start_paused = true)]
  async fn five_taps_never_activate() {
    let (d, mut rx) = detector();

    for _ in 0..5 {
      d.register_tap();
      advance(Duration::from_millis(100)).await;
    }
    settle().await;

    assert!(rx.try_recv().is_err());
  }

  #[tokio::test(start_paused = true)]
  async fn window_expiry_resets_counter() {
    let (d, mut rx) = detector();

    // Taps at t = 0, 200, 400, then silence.
    d.register_tap();
    advance(Duration::from_millis(200)).await;
    d.register_tap();
    advance(Duration::from_millis(200)).await;
    d.register_tap();
    assert_eq!(d.tap_count(), 3);
    // Arm the pending expiry timer before advancing the mock clock.
    settle().await;

    // Expiry lands 2000 ms after the last tap.
    advance(Duration::from_millis(2000)).await;
    settle().await;
    assert_eq!(d.tap_count(), 0);

    // A later tap starts a fresh count of 1.
    advance(Duration::from_millis(600)).await;
    d.register_tap();
    assert_eq!(d.tap_count(), 1);
    assert!(rx.try_recv().is_err());
  }

  #[tokio::test(start_paused = true)]
  async fn tap_on_exact_boundary_starts_fresh() {
    let (d, mut rx) = detector();

    for _ in 0..5 {
      d.register_tap();
    }
    assert_eq!(d.tap_count(), 5);

    // Exactly at the window boundary: expired, not counted as the sixth.
    advance(Duration::from_millis(2000)).await;
    d.register_tap();

    assert!(rx.try_recv().is_err());
    assert_eq!(d.tap_count(), 1);
  }

  #[tokio::test(start_paused = true)]
  async fn taps_never_carry_across_windows() {
    let (d, mut rx) = detector();

    // Two bursts of three, separated by an expired window. Six taps total,
    // but never six inside one window.
    for _ in 0..3 {
      d.register_tap();
      advance(Duration::from_millis(100)).await;
    }
    advance(Duration::from_millis(2500)).await;
    settle().await;
    for _ in 0..3 {
      d.register_tap();
      advance(Duration::from_millis(100)).await;
    }
    settle().await;

    assert!(rx.try_recv().is_err());
  }

  #[tokio::test(start_paused = true)]
  async fn counter_is_zero_after_activation_and_recounts() {
    let (d, mut rx) = detector();

    for _ in 0..6 {
      d.register_tap();
    }
    assert!(rx.try_recv().is_ok());

    // A seventh tap begins a new gesture, it does not re-fire.
    d.register_tap();
    assert_eq!(d.tap_count(), 1);
    assert!(rx.try_recv().is_err());
  }

  #[tokio::test(start_paused = true)]
  async fn reset_cancels_pending_window() {
    let (d, mut rx) = detector();

    for _ in 0..4 {
      d.register_tap();
    }
    d.reset();
    assert_eq!(d.tap_count(), 0);

    // The aborted timer must not fire late and clobber a new gesture.
    advance(Duration::from_millis(2000)).await;
    settle().await;
    for _ in 0..6 {
      d.register_tap();
    }
    assert!(rx.try_recv().is_ok());
  }
}
