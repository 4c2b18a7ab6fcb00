//! Synthetic frame source for `framestream-serve` and local testing.
//!
//! Samples are a low-amplitude sine with uniform noise; headers carry a
//! monotonic `pkt_id` and the current wall-clock time.

use std::f64::consts::TAU;

use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use framestream_core::config::FrameLayout;
use framestream_core::framing::{Frame, Payload};
use framestream_core::headers::FrameHeader;

pub struct SyntheticSource {
    device_id: u16,
    next_pkt_id: i32,
    sample_count: usize,
    phase: f64,
    rng: StdRng,
}

impl SyntheticSource {
    pub fn new(device_id: u16, layout: &FrameLayout, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        Self {
            device_id,
            next_pkt_id: 0,
            sample_count: layout.sample_count(),
            phase: 0.0,
            rng,
        }
    }

    pub fn next_frame(&mut self) -> Frame {
        let now = Utc::now();
        let header = FrameHeader::new(
            self.device_id,
            now.timestamp() as u32,
            now.timestamp_subsec_millis() as u16,
            self.next_pkt_id,
        );
        self.next_pkt_id = self.next_pkt_id.wrapping_add(1);

        let step = TAU / 160.0;
        let mut samples = Vec::with_capacity(self.sample_count);
        for _ in 0..self.sample_count {
            let noise: i16 = self.rng.gen_range(-64..=64);
            let tone = (self.phase.sin() * 4096.0) as i16;
            samples.push(tone.saturating_add(noise));
            self.phase = (self.phase + step) % TAU;
        }

        Frame::new(header, Payload::from_samples(&samples))
    }
}
