//! Fixed-rate tick scheduler.
//!
//! Scene animation advances in whole ticks at `tick_hz`, independent of how
//! often frames are presented. Elapsed wall time is banked in an accumulator
//! and drained one tick period at a time.

use std::time::Instant;
use tracing::warn;

/// Longest frame gap that is credited to the accumulator. A stall longer
/// than this (window drag, debugger pause) is dropped instead of replayed.
pub const MAX_FRAME_TIME: f64 = 0.25;

/// Tick rate used when the configured one is not a positive finite number.
pub const FALLBACK_TICK_HZ: f64 = 10.0;

/// Converts elapsed time into a number of fixed ticks.
#[derive(Debug)]
pub struct TickScheduler {
    tick_dt: f64,
    previous_time: Instant,
    accumulator: f64,
    frame_count: u64,
    tick_count: u64,
}

impl TickScheduler {
    /// Scheduler ticking `tick_hz` times per second, starting now.
    pub fn new(tick_hz: f64) -> Self {
        let tick_hz = if tick_hz.is_finite() && tick_hz > 0.0 {
            tick_hz
        } else {
            warn!("Invalid tick rate {tick_hz}, using {FALLBACK_TICK_HZ} Hz");
            FALLBACK_TICK_HZ
        };
        Self {
            tick_dt: 1.0 / tick_hz,
            previous_time: Instant::now(),
            accumulator: 0.0,
            frame_count: 0,
            tick_count: 0,
        }
    }

    /// Measure the wall time since the previous frame and run `on_tick` once
    /// for every whole tick period that has elapsed.
    pub fn frame(&mut self, on_tick: impl FnMut()) -> u32 {
        let now = Instant::now();
        let elapsed = now.duration_since(self.previous_time).as_secs_f64();
        self.previous_time = now;
        self.advance(elapsed, on_tick)
    }

    /// Credit `elapsed` seconds and run the ticks that are due. Returns the
    /// number of ticks run.
    pub fn advance(&mut self, elapsed: f64, mut on_tick: impl FnMut()) -> u32 {
        let mut elapsed = elapsed.max(0.0);
        if elapsed > MAX_FRAME_TIME {
            warn!(
                "Frame took {:.1}ms, clamping to {:.1}ms",
                elapsed * 1000.0,
                MAX_FRAME_TIME * 1000.0
            );
            elapsed = MAX_FRAME_TIME;
        }
        self.accumulator += elapsed;

        let mut ran = 0;
        while self.accumulator >= self.tick_dt {
            on_tick();
            self.accumulator -= self.tick_dt;
            self.tick_count += 1;
            ran += 1;
        }
        self.frame_count += 1;
        ran
    }

    /// Seconds per tick.
    pub fn tick_dt(&self) -> f64 {
        self.tick_dt
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_period_from_rate() {
        let scheduler = TickScheduler::new(10.0);
        assert!((scheduler.tick_dt() - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_rate_falls_back() {
        for hz in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let scheduler = TickScheduler::new(hz);
            assert!((scheduler.tick_dt() - 1.0 / FALLBACK_TICK_HZ).abs() < 1e-12);
        }
    }

    #[test]
    fn test_fast_frames_accumulate_into_one_tick() {
        let mut scheduler = TickScheduler::new(10.0);
        let mut ticks = 0;
        // Six 60 Hz frames are 0.1 s, but float error may leave the sixth
        // just short, so feed a seventh.
        for _ in 0..7 {
            scheduler.advance(1.0 / 60.0, || ticks += 1);
        }
        assert_eq!(ticks, 1);
        assert_eq!(scheduler.frame_count(), 7);
    }

    #[test]
    fn test_partial_frame_runs_no_tick() {
        let mut scheduler = TickScheduler::new(10.0);
        let ran = scheduler.advance(0.05, || panic!("tick ran early"));
        assert_eq!(ran, 0);
        assert_eq!(scheduler.advance(0.06, || {}), 1);
    }

    #[test]
    fn test_one_second_runs_tick_hz_ticks() {
        let mut scheduler = TickScheduler::new(20.0);
        let mut ticks = 0;
        for _ in 0..10 {
            scheduler.advance(0.1, || ticks += 1);
        }
        // 1.0 s at 20 Hz; allow the last tick to sit in the accumulator.
        assert!((19..=20).contains(&ticks), "ran {ticks} ticks");
        assert_eq!(scheduler.tick_count(), ticks as u64);
    }

    #[test]
    fn test_long_stall_is_clamped() {
        let mut scheduler = TickScheduler::new(10.0);
        let ran = scheduler.advance(5.0, || {});
        let max = (MAX_FRAME_TIME / scheduler.tick_dt()).ceil() as u32;
        assert!(ran <= max, "ran {ran} ticks, expected at most {max}");
        assert!(ran > 0);
    }

    #[test]
    fn test_negative_elapsed_is_ignored() {
        let mut scheduler = TickScheduler::new(10.0);
        assert_eq!(scheduler.advance(-1.0, || {}), 0);
        // Nothing was banked, so just under one period still runs no tick.
        assert_eq!(scheduler.advance(0.09, || {}), 0);
    }
}
