// Response compression: gzip at the fastest level. Latency matters more
// than ratio here; the payloads are repetitive JSON and compress well
// regardless.

use std::io::Write;
use std::time::Instant;

use bytes::Bytes;
use flate2::Compression;
use flate2::write::GzEncoder;

use crate::error::ApiError;

/// Compressed body plus size metadata, produced and consumed within one
/// request/response cycle.
#[derive(Debug, Clone)]
pub struct CompressedPayload {
    pub data: Bytes,
    pub original_size: usize,
    pub compressed_size: usize,
}

impl CompressedPayload {
    /// compressed/original. Empty input reports 1.0.
    pub fn ratio(&self) -> f64 {
        if self.original_size == 0 {
            1.0
        } else {
            self.compressed_size as f64 / self.original_size as f64
        }
    }
}

pub fn compress(input: &[u8]) -> Result<CompressedPayload, ApiError> {
    let start = Instant::now();
    let mut encoder = GzEncoder::new(
        Vec::with_capacity(input.len() / 4 + 64),
        Compression::fast(),
    );
    encoder
        .write_all(input)
        .map_err(|e| ApiError::Encoding(format!("gzip write: {e}")))?;
    let data = encoder
        .finish()
        .map_err(|e| ApiError::Encoding(format!("gzip finish: {e}")))?;

    let payload = CompressedPayload {
        original_size: input.len(),
        compressed_size: data.len(),
        data: Bytes::from(data),
    };
    tracing::debug!(
        elapsed_ms = start.elapsed().as_millis() as u64,
        ratio_pct = format_args!("{:.1}", payload.ratio() * 100.0),
        size_bytes = payload.compressed_size,
        "compressed json payload"
    );
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::io::Read;

    fn decompress(data: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        GzDecoder::new(data).read_to_end(&mut out).unwrap();
        out
    }

    #[test]
    fn round_trips_exactly() {
        let inputs: [&[u8]; 4] = [
            b"",
            b"{}",
            b"{\"rent_ts\": [{\"machine_id\": 42, \"timestamp\": 1700000000}]}",
            &[0u8, 255, 1, 254, 2, 253],
        ];
        for input in inputs {
            let payload = compress(input).unwrap();
            assert_eq!(decompress(&payload.data), input);
            assert_eq!(payload.original_size, input.len());
            assert_eq!(payload.compressed_size, payload.data.len());
        }
    }

    #[test]
    fn repetitive_json_shrinks() {
        let input = "{\"timestamp\": 1700000000}".repeat(200);
        let payload = compress(input.as_bytes()).unwrap();
        assert!(payload.compressed_size < payload.original_size);
        assert!(payload.ratio() < 1.0);
    }

    #[test]
    fn empty_input_reports_unit_ratio() {
        let payload = compress(b"").unwrap();
        assert_eq!(payload.ratio(), 1.0);
        assert!(payload.compressed_size > 0); // gzip header + trailer
    }
}
