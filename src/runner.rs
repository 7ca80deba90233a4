//! Capture → classify → report loop.
//!
//! The driver is single-threaded and fully sequential: one frame is in flight
//! at a time and nothing carries over between cycles except the classifier.
//! The only way out of the loop is the shutdown flag.

use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

use crate::classify::Classifier;
use crate::device::CameraDevice;
use crate::label::Label;

/// Loop driver state. `Stopped` is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Stopped,
}

/// What a single cycle managed to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CycleOutcome {
    /// No frame; classification and reporting were skipped.
    CaptureFailed,
    /// Frame captured but not classified; reporting was skipped.
    ClassifyFailed,
    /// Frame classified and both device calls attempted.
    Classified {
        label: Label,
        reported: bool,
        timer_ok: bool,
    },
}

/// Counters accumulated over the life of the loop.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoopStats {
    pub cycles: u64,
    pub frames_captured: u64,
    pub capture_failures: u64,
    pub classify_failures: u64,
    pub reports_sent: u64,
    pub report_failures: u64,
    pub timer_failures: u64,
}

/// Cross-thread stop request, raised from the Ctrl-C handler.
///
/// Sleeping on the flag wakes as soon as it is raised.
#[derive(Clone, Default)]
pub struct ShutdownFlag {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl ShutdownFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        let (lock, cvar) = &*self.inner;
        let mut raised = lock.lock().unwrap_or_else(|e| e.into_inner());
        *raised = true;
        cvar.notify_all();
    }

    pub fn is_raised(&self) -> bool {
        let (lock, _) = &*self.inner;
        *lock.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Sleep for `duration` or until raised. Returns true when raised.
    pub fn sleep(&self, duration: Duration) -> bool {
        let (lock, cvar) = &*self.inner;
        let guard = lock.lock().unwrap_or_else(|e| e.into_inner());
        let (guard, _) = cvar
            .wait_timeout_while(guard, duration, |raised| !*raised)
            .unwrap_or_else(|e| e.into_inner());
        *guard
    }
}

/// Loop timing.
#[derive(Clone, Copy, Debug)]
pub struct RunnerConfig {
    /// Pause after every cycle.
    pub interval: Duration,
    /// How often to log `LoopStats`.
    pub stats_interval: Duration,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            interval: crate::DEFAULT_CYCLE_INTERVAL,
            stats_interval: Duration::from_secs(60),
        }
    }
}

pub struct Runner<D, C> {
    device: D,
    classifier: C,
    config: RunnerConfig,
    state: LoopState,
    stats: LoopStats,
}

impl<D: CameraDevice, C: Classifier> Runner<D, C> {
    /// Build a driver around an initialized classifier. Starts in `Running`.
    pub fn new(device: D, classifier: C, config: RunnerConfig) -> Self {
        Self {
            device,
            classifier,
            config,
            state: LoopState::Running,
            stats: LoopStats::default(),
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn stats(&self) -> LoopStats {
        self.stats
    }

    /// Run one cycle without the trailing sleep.
    pub fn run_cycle(&mut self) -> CycleOutcome {
        self.stats.cycles += 1;

        let frame = match self.device.capture() {
            Ok(frame) => frame,
            Err(e) => {
                self.stats.capture_failures += 1;
                log::warn!("failed to capture image from device: {}", e);
                return CycleOutcome::CaptureFailed;
            }
        };
        self.stats.frames_captured += 1;

        let label = match self.classifier.classify(&frame) {
            Ok(label) => label,
            Err(e) => {
                self.stats.classify_failures += 1;
                log::warn!("classification failed: {}", e);
                return CycleOutcome::ClassifyFailed;
            }
        };
        drop(frame);
        log::info!("classification result: {}", label);

        let reported = match self.device.report_classification(label) {
            Ok(reply) if reply.is_success() => {
                self.stats.reports_sent += 1;
                log::info!("response from device: {}", reply.body.trim());
                true
            }
            Ok(reply) => {
                self.stats.report_failures += 1;
                log::warn!(
                    "device rejected classification (HTTP {}): {}",
                    reply.status,
                    reply.body.trim()
                );
                false
            }
            Err(e) => {
                self.stats.report_failures += 1;
                log::warn!("failed to report classification: {}", e);
                false
            }
        };

        let timer_ok = match self.device.fetch_timer() {
            Ok(reply) => {
                log::debug!("timer reply (HTTP {}): {}", reply.status, reply.body.trim());
                true
            }
            Err(e) => {
                self.stats.timer_failures += 1;
                log::warn!("failed to poll device timer: {}", e);
                false
            }
        };

        CycleOutcome::Classified {
            label,
            reported,
            timer_ok,
        }
    }

    /// Run cycles until `shutdown` is raised, then enter `Stopped`.
    pub fn run(&mut self, shutdown: &ShutdownFlag) -> LoopStats {
        let mut last_stats_log = Instant::now();

        while self.state == LoopState::Running {
            if shutdown.is_raised() {
                self.stop();
                break;
            }

            self.run_cycle();

            if last_stats_log.elapsed() >= self.config.stats_interval {
                self.log_stats();
                last_stats_log = Instant::now();
            }

            if shutdown.sleep(self.config.interval) {
                self.stop();
            }
        }
        self.stats
    }

    fn stop(&mut self) {
        self.state = LoopState::Stopped;
        log::info!("real-time classification stopped");
        self.log_stats();
    }

    fn log_stats(&self) {
        let s = &self.stats;
        log::info!(
            "cycles={} captured={} capture_failures={} classify_failures={} reported={} report_failures={} timer_failures={}",
            s.cycles,
            s.frames_captured,
            s.capture_failures,
            s.classify_failures,
            s.reports_sent,
            s.report_failures,
            s.timer_failures
        );
    }
}
