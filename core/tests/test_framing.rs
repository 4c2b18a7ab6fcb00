// Covers the slice-level frame codec and the payload view:

// * `encode_frame` / `decode_frame`
// * `FrameWriter`
// * `Payload` sample access

#[cfg(test)]
mod tests {
    use framestream_core::config::FrameLayout;
    use framestream_core::constants::{DEFAULT_PACKET_LEN, HEADER_LEN};
    use framestream_core::framing::{decode_frame, encode_frame, Frame, FrameError, FrameWriter, Payload};
    use framestream_core::headers::FrameHeader;

    fn ramp(n: usize) -> Vec<i16> {
        (0..n).map(|i| (i as i16).wrapping_mul(3).wrapping_sub(100)).collect()
    }

// # 1. Encode → decode on the default layout

    #[test]
    fn encode_decode_default_layout() {
        let layout = FrameLayout::default();
        let header = FrameHeader::test_header(42);
        let payload = Payload::from_samples(&ramp(layout.sample_count()));

        let wire = encode_frame(&header, &payload, &layout).unwrap();
        assert_eq!(wire.len(), DEFAULT_PACKET_LEN);

        let frame = decode_frame(&wire, &layout).unwrap();
        assert_eq!(frame.header, header);
        assert_eq!(frame.payload, payload);
        assert_eq!(frame.pkt_id(), 42);
    }

    #[test]
    fn payload_follows_header_verbatim() {
        let layout = FrameLayout::new(HEADER_LEN + 6).unwrap();
        let payload = Payload::from_samples(&[1, -1, 0x1234]);

        let wire = encode_frame(&FrameHeader::default(), &payload, &layout).unwrap();
        assert_eq!(&wire[HEADER_LEN..], &[0x01, 0x00, 0xFF, 0xFF, 0x34, 0x12]);
    }

// # 2. Length mismatches

    #[test]
    fn encode_rejects_wrong_payload_size() {
        let layout = FrameLayout::default();
        let payload = Payload::from_samples(&[0; 10]);

        let err = encode_frame(&FrameHeader::default(), &payload, &layout).unwrap_err();
        assert!(matches!(
            err,
            FrameError::LengthMismatch { expected: 5440, actual: 20 }
        ));
    }

    #[test]
    fn decode_rejects_short_and_long_wire() {
        let layout = FrameLayout::new(HEADER_LEN + 4).unwrap();

        let short = vec![0u8; HEADER_LEN + 2];
        assert!(matches!(
            decode_frame(&short, &layout),
            Err(FrameError::LengthMismatch { expected: 16, actual: 14 })
        ));

        let long = vec![0u8; HEADER_LEN + 6];
        assert!(matches!(
            decode_frame(&long, &layout),
            Err(FrameError::LengthMismatch { expected: 16, actual: 18 })
        ));
    }

// # 3. Payload view

    #[test]
    fn payload_samples_are_little_endian() {
        let payload = Payload::from_samples(&[0x0102, -2]);
        assert_eq!(payload.as_bytes(), &[0x02, 0x01, 0xFE, 0xFF]);
        assert_eq!(payload.sample(0), Some(0x0102));
        assert_eq!(payload.sample(1), Some(-2));
        assert_eq!(payload.sample(2), None);
        assert_eq!(payload.sample(usize::MAX), None);
    }

    #[test]
    fn payload_counts_and_iterates() {
        let samples = ramp(2720);
        let payload = Payload::from_samples(&samples);

        assert_eq!(payload.byte_len(), 5440);
        assert_eq!(payload.sample_count(), 2720);
        assert_eq!(payload.samples().len(), 2720);
        assert!(payload.samples().eq(samples.iter().copied()));
        assert_eq!(payload.to_vec(), samples);
    }

// # 4. FrameWriter

    #[test]
    fn writer_concatenates_frames_without_separators() {
        let layout = FrameLayout::new(HEADER_LEN + 4).unwrap();
        let mut w = FrameWriter::new(Vec::new(), layout);

        w.write_parts(FrameHeader::test_header(1), &[10, 11]).unwrap();
        w.write_parts(FrameHeader::test_header(2), &[20, 21]).unwrap();
        w.flush().unwrap();
        assert_eq!(w.frames_written(), 2);

        let wire = w.into_inner();
        assert_eq!(wire.len(), 2 * layout.packet_len);

        let second = decode_frame(&wire[layout.packet_len..], &layout).unwrap();
        assert_eq!(second.pkt_id(), 2);
        assert_eq!(second.payload.to_vec(), vec![20, 21]);
    }

    #[test]
    fn writer_refuses_frame_of_wrong_size() {
        let layout = FrameLayout::new(HEADER_LEN + 4).unwrap();
        let mut w = FrameWriter::new(Vec::new(), layout);

        let frame = Frame::new(FrameHeader::default(), Payload::from_samples(&[1, 2, 3]));
        assert!(w.write_frame(&frame).is_err());
        assert_eq!(w.frames_written(), 0);
        assert!(w.get_ref().is_empty());
    }
}
