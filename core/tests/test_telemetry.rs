mod support;

#[cfg(test)]
mod telemetry_snapshot_tests {
    use std::thread;
    use std::time::Duration;

    use framestream_core::framing::FrameDecoder;
    use framestream_core::telemetry::{Stage, StageTimes, TelemetryCounters, TelemetrySnapshot, TelemetryTimer};
    use framestream_core::transport::{CancelToken, Connection};

    use crate::support::{small_layout, wire, ChunkedReader};

    fn make_counters() -> TelemetryCounters {
        TelemetryCounters {
            frames_emitted: 4,
            bytes_header: 48,
            bytes_payload: 64,
            partial_frames_discarded: 1,
        }
    }

    fn make_timer() -> TelemetryTimer {
        let mut timer = TelemetryTimer::new();
        thread::sleep(Duration::from_millis(20)); // elapsed must exceed stage times
        timer.add_stage_time(Stage::ReadHeader, Duration::from_millis(2));
        timer.add_stage_time(Stage::ReadPayload, Duration::from_millis(5));
        timer.add_stage_time(Stage::ReadPayload, Duration::from_millis(1));
        timer.finish();
        timer
    }

    #[test]
    fn stage_times_accumulate() {
        let mut times = StageTimes::default();
        times.add(Stage::Emit, Duration::from_micros(300));
        times.add(Stage::Emit, Duration::from_micros(200));

        assert_eq!(times.get(Stage::Emit), Duration::from_micros(500));
        assert_eq!(times.get(Stage::Connect), Duration::ZERO);
        assert!((times.get_us(Stage::Emit) - 500.0).abs() < 1e-6);
        assert!(times.has_all(&[Stage::Emit]));
        assert!(!times.has_all(&[Stage::Emit, Stage::Decode]));
    }

    #[test]
    fn timer_time_charges_closure_to_stage() {
        let mut timer = TelemetryTimer::new();
        let v = timer.time(Stage::Decode, || {
            thread::sleep(Duration::from_millis(2));
            7
        });
        assert_eq!(v, 7);
        assert!(timer.stage_times.get(Stage::Decode) >= Duration::from_millis(2));
    }

    #[test]
    fn finished_timer_stops_elapsed() {
        let timer = make_timer();
        let a = timer.elapsed();
        thread::sleep(Duration::from_millis(5));
        assert_eq!(timer.elapsed(), a);
    }

    #[test]
    fn counters_merge() {
        let mut a = make_counters();
        a += make_counters();
        assert_eq!(a.frames_emitted, 8);
        assert_eq!(a.bytes_total(), 224);
        assert_eq!(a.partial_frames_discarded, 2);
    }

    #[test]
    fn snapshot_derives_rates_and_passes_sanity() {
        let counters = make_counters();
        let timer = make_timer();
        let snap = TelemetrySnapshot::from(&counters, &timer, 150);

        assert_eq!(snap.frames_emitted, 4);
        assert_eq!(snap.bytes_received, 150);
        assert!(snap.frames_per_sec > 0.0);
        assert!(snap.throughput_bytes_per_sec > snap.frames_per_sec);
        assert_eq!(snap.total_stage_time(), Duration::from_millis(8));
        assert!(snap.sanity_check());
    }

    #[test]
    fn snapshot_flags_more_frame_bytes_than_received() {
        let snap = TelemetrySnapshot::from(&make_counters(), &make_timer(), 100);
        assert!(!snap.sanity_check());
    }

    #[test]
    fn snapshot_json_round_trips() {
        let snap = TelemetrySnapshot::from(&make_counters(), &make_timer(), 150);
        let json = snap.to_json().unwrap();
        assert!(json.contains("\"frames_emitted\":4"));

        let back: TelemetrySnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.stage_times, snap.stage_times);
        assert_eq!(back.partial_frames_discarded, 1);
    }

    #[test]
    fn decode_loop_fills_every_read_stage() {
        let layout = small_layout();
        let conn = Connection::new(ChunkedReader::new(wire(&layout, 3), 5), CancelToken::new());
        let mut dec = FrameDecoder::new(conn, layout);

        let mut frames = Vec::new();
        let _ = dec.run(&mut frames);
        let snap = dec.telemetry();

        assert_eq!(snap.frames_emitted, 3);
        assert_eq!(snap.bytes_header, 36);
        assert_eq!(snap.bytes_payload, 48);
        assert_eq!(snap.bytes_received, 84);
        assert!(snap.stage_times.has_all(&[Stage::ReadHeader, Stage::ReadPayload, Stage::Decode, Stage::Emit]));
        assert!(snap.sanity_check());
    }
}
