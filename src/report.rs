use serde::Serialize;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    CountFrequencies,
    BuildTree,
    PackBits,
    UnpackBits,
}

/// Outcome of one encode or decode run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub input_bytes: u64,
    pub output_bytes: u64,
    pub distinct_symbols: usize,
    pub ratio: f64,
    /// CRC-32 of the uncompressed data.
    pub crc32: u32,
}

impl Summary {
    pub fn new(input_bytes: u64, output_bytes: u64, distinct_symbols: usize, crc32: u32) -> Self {
        let ratio = if input_bytes > 0 {
            output_bytes as f64 / input_bytes as f64
        } else {
            0.0
        };
        Self {
            input_bytes,
            output_bytes,
            distinct_symbols,
            ratio,
            crc32,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    StageStarted { stage: Stage },
    Encoded(Summary),
    Decoded(Summary),
}

/// Receives progress and summary events from the codec. Purely observational.
pub trait Reporter {
    fn report(&mut self, event: Event);
}

#[derive(Debug, Default)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn report(&mut self, _event: Event) {}
}

/// Forwards events to the tracing subscriber.
#[derive(Debug, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&mut self, event: Event) {
        match event {
            Event::StageStarted { stage } => debug!("stage {:?}", stage),
            Event::Encoded(s) => info!(
                "encoded {} bytes into {} ({:.1}%, {} symbols)",
                s.input_bytes, s.output_bytes, s.ratio * 100.0, s.distinct_symbols
            ),
            Event::Decoded(s) => info!(
                "decoded {} bytes into {} ({} symbols, crc32 {:08x})",
                s.input_bytes, s.output_bytes, s.distinct_symbols, s.crc32
            ),
        }
    }
}

/// Keeps every event, mostly for tests and callers that inspect runs afterwards.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    pub events: Vec<Event>,
}

impl Reporter for CollectingReporter {
    fn report(&mut self, event: Event) {
        self.events.push(event);
    }
}
