//! Property tests for the frame codec

use panelink_protocol::frame::{decode, encode, Decoded, FrameDecoder, HEADER_LEN};
use proptest::prelude::*;

proptest! {
    #[test]
    fn encoded_frames_decode_to_their_payload(payload in proptest::collection::vec(any::<u8>(), 0..2048)) {
        let frame = encode(&payload).unwrap();

        match decode(&frame) {
            Ok(Decoded::Complete { payload: decoded, consumed }) => {
                prop_assert_eq!(decoded, &payload[..]);
                prop_assert_eq!(consumed, frame.len());
            }
            other => prop_assert!(false, "unexpected {:?}", other),
        }
    }

    #[test]
    fn incremental_decode_matches_bulk(payload in proptest::collection::vec(any::<u8>(), 0..512)) {
        let frame = encode(&payload).unwrap();

        let mut decoder = FrameDecoder::new();
        let mut incremental = Vec::new();
        for &byte in &frame {
            if let Some(p) = decoder.feed(byte).unwrap() {
                incremental.push(p);
            }
        }

        let mut bulk = FrameDecoder::new();
        bulk.extend(&frame);
        let bulk_payload = bulk.poll().unwrap();

        prop_assert_eq!(incremental.len(), 1);
        prop_assert_eq!(Some(incremental.remove(0)), bulk_payload);
    }

    #[test]
    fn single_bit_flip_never_yields_payload(
        payload in proptest::collection::vec(any::<u8>(), 1..256),
        position in any::<prop::sample::Index>(),
        bit in 0u8..8,
    ) {
        let mut frame = encode(&payload).unwrap();
        // Leave the two CRC bytes alone
        let index = position.index(frame.len() - 2);
        frame[index] ^= 1 << bit;

        let mut decoder = FrameDecoder::new();
        let results: Vec<_> = decoder.feed_bytes(&frame).collect();

        prop_assert!(!results.iter().any(|r| r.as_ref() == Ok(&payload)));

        // Outside the length field a flip must surface as an error. A flip in
        // the length field can also just leave the decoder waiting.
        if !(2..HEADER_LEN).contains(&index) {
            prop_assert!(results.iter().any(|r| r.is_err()));
        }
    }

    #[test]
    fn decoder_survives_noise_before_frame(
        noise in proptest::collection::vec(any::<u8>().prop_filter("not a header", |b| *b != 0x55), 0..64),
        payload in proptest::collection::vec(any::<u8>(), 0..128),
    ) {
        let mut data = noise.clone();
        data.extend_from_slice(&encode(&payload).unwrap());

        let mut decoder = FrameDecoder::new();
        let payloads: Vec<_> = decoder.feed_bytes(&data).filter_map(Result::ok).collect();

        prop_assert_eq!(payloads, vec![payload]);
    }
}
