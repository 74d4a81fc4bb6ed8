//! Strict single-frame decoding must never panic, and anything it accepts
//! must encode back to the same bytes.

#![no_main]

use libfuzzer_sys::fuzz_target;
use sockframe_proto::Frame;

fuzz_target!(|data: &[u8]| {
    if let Ok(frame) = Frame::decode(data) {
        assert_eq!(frame.to_vec(), data);
    }
});
