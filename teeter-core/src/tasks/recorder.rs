//! Fixed-capacity sample recorder with a chunked dump

use heapless::Vec;
use teeter_protocol::Sample;

use crate::config::RECORD_CAPACITY;
use crate::time::Instant;

/// Rows written to the console per tick while dumping
pub const DUMP_ROWS_PER_TICK: usize = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
enum Phase {
    Idle,
    Recording { started: Instant },
    /// Header written when `next` is zero
    Dumping { next: usize },
}

/// Records one [`Sample`] per tick and replays them as text rows
pub struct Recorder {
    samples: Vec<Sample, RECORD_CAPACITY>,
    phase: Phase,
}

impl Default for Recorder {
    fn default() -> Self {
        Self::new()
    }
}

impl Recorder {
    pub const fn new() -> Self {
        Self {
            samples: Vec::new(),
            phase: Phase::Idle,
        }
    }

    pub fn is_recording(&self) -> bool {
        matches!(self.phase, Phase::Recording { .. })
    }

    pub fn is_dumping(&self) -> bool {
        matches!(self.phase, Phase::Dumping { .. })
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Discard old samples and start recording at `now`
    ///
    /// Returns false while a dump is still in progress.
    pub fn start(&mut self, now: Instant) -> bool {
        if self.is_dumping() {
            return false;
        }
        self.samples.clear();
        self.phase = Phase::Recording { started: now };
        true
    }

    /// Stop recording; a dump follows if more than one sample was taken
    ///
    /// Returns true if a dump was scheduled.
    pub fn stop(&mut self) -> bool {
        if !self.is_recording() {
            return false;
        }
        if self.samples.len() > 1 {
            self.phase = Phase::Dumping { next: 0 };
            true
        } else {
            self.samples.clear();
            self.phase = Phase::Idle;
            false
        }
    }

    /// Append a sample taken at `now`
    ///
    /// Returns true when this sample filled the buffer, which stops the
    /// recording and schedules the dump.
    pub fn record(&mut self, now: Instant, mut sample: Sample) -> bool {
        let Phase::Recording { started } = self.phase else {
            return false;
        };

        sample.time_ms = now.ticks_since(started).max(0) as u32 / 1_000;
        // Capacity is checked below, so the push cannot fail
        let _ = self.samples.push(sample);

        if self.samples.is_full() {
            self.phase = Phase::Dumping { next: 0 };
            return true;
        }
        false
    }

    /// Next chunk of the dump
    ///
    /// Returns whether the header is due and the rows to write this tick.
    /// The recorder goes idle after the last chunk has been handed out.
    pub fn next_chunk(&mut self) -> Option<(bool, &[Sample])> {
        let Phase::Dumping { next } = self.phase else {
            return None;
        };

        let end = (next + DUMP_ROWS_PER_TICK).min(self.samples.len());
        self.phase = if end >= self.samples.len() {
            Phase::Idle
        } else {
            Phase::Dumping { next: end }
        };

        Some((next == 0, &self.samples[next..end]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(ms: u32) -> Instant {
        Instant::from_micros(ms * 1_000)
    }

    fn sample(x: f32) -> Sample {
        Sample {
            x_mm: x,
            ..Default::default()
        }
    }

    #[test]
    fn test_ignores_samples_when_idle() {
        let mut rec = Recorder::new();
        assert!(!rec.record(at(0), sample(1.0)));
        assert!(rec.is_empty());
    }

    #[test]
    fn test_timestamps_relative_to_start() {
        let mut rec = Recorder::new();
        rec.start(at(500));
        rec.record(at(500), sample(0.0));
        rec.record(at(510), sample(1.0));
        assert!(rec.stop());

        let (header, rows) = rec.next_chunk().unwrap();
        assert!(header);
        assert_eq!(rows[0].time_ms, 0);
        assert_eq!(rows[1].time_ms, 10);
        assert_eq!(rows[1].x_mm, 1.0);
        assert!(rec.next_chunk().is_none());
    }

    #[test]
    fn test_single_sample_not_dumped() {
        let mut rec = Recorder::new();
        rec.start(at(0));
        rec.record(at(0), sample(0.0));
        assert!(!rec.stop());
        assert!(rec.next_chunk().is_none());
    }

    #[test]
    fn test_full_buffer_stops_and_dumps_in_chunks() {
        let mut rec = Recorder::new();
        rec.start(at(0));
        for i in 0..RECORD_CAPACITY - 1 {
            assert!(!rec.record(at(i as u32 * 10), sample(0.0)));
        }
        assert!(rec.record(at(10_000), sample(0.0)));
        assert!(!rec.is_recording());
        assert!(!rec.start(at(0)));

        let mut rows = 0;
        let mut chunks = 0;
        while let Some((header, chunk)) = rec.next_chunk() {
            assert_eq!(header, chunks == 0);
            assert!(chunk.len() <= DUMP_ROWS_PER_TICK);
            rows += chunk.len();
            chunks += 1;
        }
        assert_eq!(rows, RECORD_CAPACITY);
        assert_eq!(chunks, RECORD_CAPACITY.div_ceil(DUMP_ROWS_PER_TICK));
        assert!(rec.start(at(0)));
    }
}
