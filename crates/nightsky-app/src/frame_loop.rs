//! Paced frame loop.
//!
//! The sky advances by a fixed step per frame, so the loop does not hand out
//! delta times. It only paces frames to a target rate by sleeping off the
//! unused part of each frame budget.

use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Frames slower than this are reported.
pub const MAX_FRAME_TIME: Duration = Duration::from_millis(250);

/// Time available per frame at `target_fps`. `None` means unpaced.
pub fn frame_budget(target_fps: u32) -> Option<Duration> {
    (target_fps > 0).then(|| Duration::from_secs_f64(1.0 / f64::from(target_fps)))
}

/// How long to sleep after a frame whose work took `work`.
pub fn sleep_time(work: Duration, budget: Option<Duration>) -> Duration {
    budget.map_or(Duration::ZERO, |budget| budget.saturating_sub(work))
}

/// Frame loop state.
///
/// Call [`tick`](Self::tick) once per frame, or [`run`](Self::run) to loop
/// until the frame limit is reached.
pub struct FrameLoop {
    budget: Option<Duration>,
    frame_limit: Option<u64>,
    frame_count: u64,
    overruns: u64,
    slow_frames: u64,
    total_work: Duration,
}

impl FrameLoop {
    /// `target_fps` of 0 runs unpaced. Without a `frame_limit` the loop never
    /// finishes on its own.
    pub fn new(target_fps: u32, frame_limit: Option<u64>) -> Self {
        Self {
            budget: frame_budget(target_fps),
            frame_limit,
            frame_count: 0,
            overruns: 0,
            slow_frames: 0,
            total_work: Duration::ZERO,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.frame_limit
            .is_some_and(|limit| self.frame_count >= limit)
    }

    /// Run one frame, passing the zero-based frame index, then sleep off
    /// whatever remains of the budget.
    pub fn tick(&mut self, mut frame_fn: impl FnMut(u64)) {
        let start = Instant::now();
        frame_fn(self.frame_count);
        let work = start.elapsed();
        self.record(work);

        let sleep = sleep_time(work, self.budget);
        if !sleep.is_zero() {
            std::thread::sleep(sleep);
        }
    }

    /// Tick until [`is_finished`](Self::is_finished).
    pub fn run(&mut self, mut frame_fn: impl FnMut(u64)) {
        while !self.is_finished() {
            self.tick(&mut frame_fn);
        }
    }

    fn record(&mut self, work: Duration) {
        if let Some(budget) = self.budget
            && work > budget
        {
            self.overruns += 1;
            debug!(
                "Frame {} took {:.1}ms, budget {:.1}ms",
                self.frame_count,
                work.as_secs_f64() * 1000.0,
                budget.as_secs_f64() * 1000.0
            );
        }
        if work > MAX_FRAME_TIME {
            self.slow_frames += 1;
            warn!(
                "Frame {} took {:.1}ms, exceeds {:.1}ms",
                self.frame_count,
                work.as_secs_f64() * 1000.0,
                MAX_FRAME_TIME.as_secs_f64() * 1000.0
            );
        }
        self.total_work += work;
        self.frame_count += 1;
    }

    /// Frames run so far.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Frames whose work exceeded the budget.
    pub fn overruns(&self) -> u64 {
        self.overruns
    }

    /// Frames slower than [`MAX_FRAME_TIME`].
    pub fn slow_frames(&self) -> u64 {
        self.slow_frames
    }

    /// Mean work time per frame, excluding sleep.
    pub fn average_frame_time(&self) -> Duration {
        if self.frame_count == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.total_work.as_secs_f64() / self.frame_count as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_budget_at_sixty() {
        let budget = frame_budget(60).unwrap();
        assert!((budget.as_secs_f64() - 1.0 / 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_fps_is_unpaced() {
        assert_eq!(frame_budget(0), None);
        assert_eq!(sleep_time(Duration::from_millis(1), None), Duration::ZERO);
    }

    #[test]
    fn test_sleep_time_fills_budget() {
        let budget = Some(Duration::from_millis(16));
        assert_eq!(
            sleep_time(Duration::from_millis(6), budget),
            Duration::from_millis(10)
        );
    }

    #[test]
    fn test_sleep_time_never_negative() {
        let budget = Some(Duration::from_millis(16));
        assert_eq!(sleep_time(Duration::from_millis(40), budget), Duration::ZERO);
    }

    #[test]
    fn test_run_stops_at_frame_limit() {
        let mut frame_loop = FrameLoop::new(0, Some(25));
        let mut seen = Vec::new();
        frame_loop.run(|frame| seen.push(frame));
        assert_eq!(frame_loop.frame_count(), 25);
        assert_eq!(seen, (0..25).collect::<Vec<_>>());
        assert!(frame_loop.is_finished());
    }

    #[test]
    fn test_zero_frame_limit_runs_nothing() {
        let mut frame_loop = FrameLoop::new(0, Some(0));
        let mut calls = 0;
        frame_loop.run(|_| calls += 1);
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_unlimited_loop_is_never_finished() {
        let mut frame_loop = FrameLoop::new(0, None);
        for _ in 0..10 {
            frame_loop.tick(|_| {});
        }
        assert!(!frame_loop.is_finished());
    }

    #[test]
    fn test_paced_loop_takes_at_least_budget() {
        let mut frame_loop = FrameLoop::new(200, Some(5));
        let start = Instant::now();
        frame_loop.run(|_| {});
        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn test_record_counts_overruns_and_slow_frames() {
        let mut frame_loop = FrameLoop::new(60, None);
        frame_loop.record(Duration::from_millis(5));
        frame_loop.record(Duration::from_millis(30));
        frame_loop.record(Duration::from_millis(300));
        assert_eq!(frame_loop.frame_count(), 3);
        assert_eq!(frame_loop.overruns(), 2);
        assert_eq!(frame_loop.slow_frames(), 1);
    }

    #[test]
    fn test_average_frame_time() {
        let mut frame_loop = FrameLoop::new(0, None);
        assert_eq!(frame_loop.average_frame_time(), Duration::ZERO);
        frame_loop.record(Duration::from_millis(10));
        frame_loop.record(Duration::from_millis(30));
        let average = frame_loop.average_frame_time().as_secs_f64();
        assert!((average - 0.020).abs() < 1e-9, "average {average}");
        assert_eq!(frame_loop.overruns(), 0);
    }
}
