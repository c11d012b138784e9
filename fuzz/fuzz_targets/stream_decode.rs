//! Fuzz target for the export stream decoder.
//!
//! This fuzzer feeds arbitrary byte sequences to the incremental stream
//! decoder, checking for panics, buffer overflows, or other undefined
//! behavior.
//!
//! Run with:
//!   cargo +nightly fuzz run stream_decode

#![no_main]

use libfuzzer_sys::fuzz_target;
use regionpoly::error::RegionpolyError;
use regionpoly::ir::{ObjectRecord, Scalar};
use regionpoly::stream::{decode_stream, RecordSink};

/// Accepts everything; the fuzzer only cares about crashes in the decoder.
struct NullSink;

impl RecordSink for NullSink {
    fn id(&mut self, _id: Scalar) -> Result<(), RegionpolyError> {
        Ok(())
    }

    fn object(&mut self, _record: ObjectRecord) -> Result<(), RegionpolyError> {
        Ok(())
    }

    fn row(&mut self, _row: Vec<Scalar>) -> Result<(), RegionpolyError> {
        Ok(())
    }

    fn headers(&mut self, _headers: Vec<String>) -> Result<(), RegionpolyError> {
        Ok(())
    }

    fn long_headers(&mut self, _headers: Vec<String>) -> Result<(), RegionpolyError> {
        Ok(())
    }
}

fuzz_target!(|data: &[u8]| {
    // Cap input size to avoid OOM on very large inputs.
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    // Try to decode the data. We don't care about errors—
    // we only care about panics, crashes, or hangs.
    let _ = decode_stream(data, &mut NullSink);
});
