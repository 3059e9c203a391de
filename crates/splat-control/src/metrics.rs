// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Rolling frame-performance windows.

use splat_core::config::TargetFps;
use splat_core::telemetry::PerformanceSample;

/// Number of samples kept per window.
pub const WINDOW_SIZE: usize = 30;

/// A fixed-size circular buffer for storing numerical samples.
#[derive(Debug, Clone)]
pub struct RingBuffer<T, const N: usize> {
    data: [T; N],
    index: usize,
    count: usize,
}

impl<T: Default + Copy, const N: usize> RingBuffer<T, N> {
    /// Creates a new, empty ring buffer.
    pub fn new() -> Self {
        Self {
            data: [T::default(); N],
            index: 0,
            count: 0,
        }
    }

    /// Pushes a new value into the buffer, overwriting the oldest if full.
    pub fn push(&mut self, value: T) {
        self.data[self.index] = value;
        self.index = (self.index + 1) % N;
        if self.count < N {
            self.count += 1;
        }
    }

    /// Returns the number of elements currently in the buffer.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Returns `true` if no value has been pushed since creation or the last clear.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Drops every value.
    pub fn clear(&mut self) {
        self.index = 0;
        self.count = 0;
    }

    /// Returns an iterator over the values in chronological order (oldest to newest).
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        let start = if self.count < N { 0 } else { self.index };
        let (head, tail) = self.data.split_at(start);
        tail.iter().chain(head.iter()).take(self.count)
    }
}

impl<T: Default + Copy, const N: usize> Default for RingBuffer<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> RingBuffer<f32, N> {
    /// Calculates the arithmetic mean of the values in the buffer.
    pub fn average(&self) -> f32 {
        if self.count == 0 {
            return 0.0;
        }
        self.iter().sum::<f32>() / self.count as f32
    }

    /// Population variance of the values in the buffer.
    pub fn variance(&self) -> f32 {
        if self.count < 2 {
            return 0.0;
        }
        let avg = self.average();
        let sum_sq: f32 = self.iter().map(|v| (v - avg) * (v - avg)).sum();
        sum_sq / self.count as f32
    }

    /// Population standard deviation of the values in the buffer.
    pub fn std_dev(&self) -> f32 {
        self.variance().sqrt()
    }
}

/// Smoothed figures the controller reads on every tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerformanceSnapshot {
    /// Mean of the frame-rate window.
    pub avg_fps: f32,
    /// Mean of the frame-time window, in milliseconds.
    pub avg_frame_time_ms: f32,
    /// Most recent frame rate reported.
    pub latest_fps: f32,
}

impl PerformanceSnapshot {
    /// The snapshot before any sample arrives: performance is assumed on target.
    pub fn seeded(target: TargetFps) -> Self {
        Self {
            avg_fps: target.as_f32(),
            avg_frame_time_ms: target.frame_budget_ms(),
            latest_fps: target.as_f32(),
        }
    }
}

/// Ingests renderer samples into two independent windows of [`WINDOW_SIZE`]
/// (frame rate and frame time).
#[derive(Debug, Clone)]
pub struct PerformanceSampler {
    fps: RingBuffer<f32, WINDOW_SIZE>,
    frame_time: RingBuffer<f32, WINDOW_SIZE>,
    snapshot: PerformanceSnapshot,
}

impl PerformanceSampler {
    /// Creates an empty sampler seeded with `target`.
    pub fn new(target: TargetFps) -> Self {
        Self {
            fps: RingBuffer::new(),
            frame_time: RingBuffer::new(),
            snapshot: PerformanceSnapshot::seeded(target),
        }
    }

    /// Appends a sample and refreshes the snapshot.
    pub fn record(&mut self, sample: PerformanceSample) {
        self.fps.push(sample.fps);
        self.snapshot.avg_fps = self.fps.average();
        self.snapshot.latest_fps = sample.fps;

        if let Some(frame_time) = sample.frame_time_ms {
            self.frame_time.push(frame_time);
            self.snapshot.avg_frame_time_ms = self.frame_time.average();
        }
    }

    /// Current smoothed figures.
    pub fn snapshot(&self) -> PerformanceSnapshot {
        self.snapshot
    }

    /// Number of frame-rate samples currently held.
    pub fn sample_count(&self) -> usize {
        self.fps.count()
    }

    /// Population standard deviation of the frame-rate window.
    pub fn fps_std_dev(&self) -> f32 {
        self.fps.std_dev()
    }

    /// The frame-rate window.
    pub fn fps_window(&self) -> &RingBuffer<f32, WINDOW_SIZE> {
        &self.fps
    }

    /// The frame-time window.
    pub fn frame_time_window(&self) -> &RingBuffer<f32, WINDOW_SIZE> {
        &self.frame_time
    }

    /// Re-seeds the snapshot for a new target while no sample has been seen.
    pub fn reseed(&mut self, target: TargetFps) {
        if self.fps.is_empty() {
            self.snapshot = PerformanceSnapshot::seeded(target);
        }
    }

    /// Drops all samples, e.g. after the scene changed.
    pub fn reset(&mut self, target: TargetFps) {
        self.fps.clear();
        self.frame_time.clear();
        self.snapshot = PerformanceSnapshot::seeded(target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn target(fps: u32) -> TargetFps {
        TargetFps::new(fps).unwrap()
    }

    #[test]
    fn test_ring_buffer_push_and_iter() {
        let mut rb = RingBuffer::<f32, 3>::new();
        rb.push(1.0);
        rb.push(2.0);
        rb.push(3.0);
        rb.push(4.0); // Overwrites 1.0

        let values: Vec<f32> = rb.iter().copied().collect();
        assert_eq!(values, vec![2.0, 3.0, 4.0]);
        assert_eq!(rb.count(), 3);
    }

    #[test]
    fn test_ring_buffer_partial_iter_order() {
        let mut rb = RingBuffer::<f32, 4>::new();
        rb.push(7.0);
        rb.push(8.0);
        let values: Vec<f32> = rb.iter().copied().collect();
        assert_eq!(values, vec![7.0, 8.0]);
        assert_eq!(rb.count(), 2);
    }

    #[test]
    fn test_ring_buffer_average() {
        let mut rb = RingBuffer::<f32, 4>::new();
        rb.push(10.0);
        rb.push(20.0);
        assert_eq!(rb.average(), 15.0);
    }

    #[test]
    fn test_ring_buffer_variance_and_std_dev() {
        let mut rb = RingBuffer::<f32, 4>::new();
        for _ in 0..4 {
            rb.push(10.0);
        }
        assert_eq!(rb.variance(), 0.0);

        let mut rb2 = RingBuffer::<f32, 4>::new();
        rb2.push(5.0);
        rb2.push(15.0);
        rb2.push(5.0);
        rb2.push(15.0);
        assert_relative_eq!(rb2.variance(), 25.0, epsilon = 0.001);
        assert_relative_eq!(rb2.std_dev(), 5.0, epsilon = 0.001);
    }

    #[test]
    fn test_ring_buffer_empty_and_clear() {
        let mut rb = RingBuffer::<f32, 4>::new();
        assert_eq!(rb.average(), 0.0);
        assert_eq!(rb.variance(), 0.0);

        rb.push(1.0);
        rb.clear();
        assert!(rb.is_empty());
        assert_eq!(rb.iter().count(), 0);
    }

    #[test]
    fn test_sampler_seeded_from_target() {
        let sampler = PerformanceSampler::new(target(60));
        let snap = sampler.snapshot();
        assert_eq!(snap.avg_fps, 60.0);
        assert_relative_eq!(snap.avg_frame_time_ms, 16.666_666, epsilon = 0.001);
        assert_eq!(sampler.sample_count(), 0);
    }

    #[test]
    fn test_sampler_window_is_bounded_fifo() {
        let mut sampler = PerformanceSampler::new(target(60));
        for i in 0..45 {
            sampler.record(PerformanceSample::from_fps(i as f32 + 1.0));
        }
        assert_eq!(sampler.sample_count(), WINDOW_SIZE);
        // Samples 16..=45 remain.
        assert_relative_eq!(sampler.snapshot().avg_fps, 30.5);
        assert_eq!(sampler.fps_window().iter().next().copied(), Some(16.0));
        assert_eq!(sampler.snapshot().latest_fps, 45.0);
    }

    #[test]
    fn test_sampler_frame_time_only_fed_when_present() {
        let mut sampler = PerformanceSampler::new(target(60));
        sampler.record(PerformanceSample::fps(30.0));
        assert_eq!(sampler.frame_time_window().count(), 0);
        assert_relative_eq!(sampler.snapshot().avg_frame_time_ms, 16.666_666, epsilon = 0.001);

        sampler.record(PerformanceSample::from_fps(50.0));
        assert_eq!(sampler.frame_time_window().count(), 1);
        assert_relative_eq!(sampler.snapshot().avg_frame_time_ms, 20.0);
    }

    #[test]
    fn test_sampler_reseed_only_when_empty() {
        let mut sampler = PerformanceSampler::new(target(60));
        sampler.reseed(target(30));
        assert_eq!(sampler.snapshot().avg_fps, 30.0);

        sampler.record(PerformanceSample::from_fps(45.0));
        sampler.reseed(target(90));
        assert_eq!(sampler.snapshot().avg_fps, 45.0);

        sampler.reset(target(90));
        assert_eq!(sampler.sample_count(), 0);
        assert_eq!(sampler.snapshot().avg_fps, 90.0);
    }
}
