//! Streaming conversion engine.
//!
//! Drives a [`Primitive`] over one input span, growing the output buffer on
//! demand, then drains the trailing shift sequence and trims the buffer to
//! the bytes actually written.

use log::{debug, trace};

use crate::config::ConverterConfig;
use crate::error::{Error, Result};
use crate::primitive::{Primitive, Signal};

/// Read cursor over the caller's input.
#[derive(Debug)]
struct Request<'a> {
    input: &'a [u8],
    read: usize,
}

impl<'a> Request<'a> {
    fn new(input: &'a [u8]) -> Self {
        Self { input, read: 0 }
    }

    fn remaining(&self) -> &'a [u8] {
        &self.input[self.read..]
    }

    fn is_consumed(&self) -> bool {
        self.read == self.input.len()
    }

    fn advance(&mut self, n: usize) {
        debug_assert!(n <= self.input.len() - self.read);
        self.read += n;
    }

    fn position(&self) -> usize {
        self.read
    }
}

/// Growable output storage with a write cursor kept as an offset.
///
/// `storage.len()` is the capacity handed to the primitive; `written` is the
/// logical length. Growth may move the storage, the offset stays valid.
#[derive(Debug)]
pub(crate) struct ConversionBuffer {
    storage: Vec<u8>,
    written: usize,
    config: ConverterConfig,
}

impl ConversionBuffer {
    pub(crate) fn new(config: ConverterConfig) -> Self {
        Self {
            storage: Vec::new(),
            written: 0,
            config,
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.storage.len()
    }

    pub(crate) fn len(&self) -> usize {
        self.written
    }

    fn tail_len(&self) -> usize {
        self.storage.len() - self.written
    }

    fn tail_mut(&mut self) -> &mut [u8] {
        &mut self.storage[self.written..]
    }

    fn commit(&mut self, n: usize) {
        debug_assert!(n <= self.tail_len());
        self.written += n;
    }

    /// Double the capacity (or make the first allocation).
    pub(crate) fn grow(&mut self) -> Result<()> {
        let current = self.capacity();
        let mut target = self.config.next_capacity(current);
        if let Some(max) = self.config.max_capacity {
            if current >= max {
                debug!("output buffer reached its {max} byte ceiling");
                return Err(Error::OutOfMemory);
            }
            target = target.min(max);
        }

        self.storage
            .try_reserve_exact(target - current)
            .map_err(|_| Error::OutOfMemory)?;
        self.storage.resize(target, 0);
        trace!("grew output buffer {current} -> {target} ({} written)", self.written);
        Ok(())
    }

    /// Trim to the logical length and hand the bytes over.
    pub(crate) fn into_vec(mut self) -> Vec<u8> {
        self.storage.truncate(self.written);
        // Only ever releases memory; the contents are already final.
        self.storage.shrink_to_fit();
        self.storage
    }
}

fn classify(signal: Signal, position: usize) -> Error {
    match signal {
        Signal::IncompleteInput => Error::IncompleteSequence { position },
        Signal::IllegalInput => Error::IllegalSequence { position },
        Signal::OutOfMemory => Error::OutOfMemory,
        Signal::OutputTooSmall => Error::OtherSystemError { code: libc::E2BIG },
        Signal::Other(code) => Error::OtherSystemError { code },
    }
}

/// Convert `input` in full, returning exactly the bytes produced.
///
/// The primitive is reset first, so state left over from an earlier call
/// (including a failed one) does not leak into this conversion. On error the
/// partial output is dropped before returning.
pub(crate) fn convert<P: Primitive + ?Sized>(
    primitive: &mut P,
    input: &[u8],
    config: ConverterConfig,
) -> Result<Vec<u8>> {
    primitive.reset();

    let mut request = Request::new(input);
    let mut output = ConversionBuffer::new(config);

    while !request.is_consumed() {
        if output.tail_len() == 0 {
            output.grow()?;
        }

        let progress = primitive.step(request.remaining(), output.tail_mut());
        request.advance(progress.read);
        output.commit(progress.written);

        match progress.status {
            Ok(()) => {}
            Err(Signal::OutputTooSmall) => {
                trace!("output too small at input offset {}", request.position());
                output.grow()?;
            }
            Err(signal) => {
                debug!(
                    "conversion stopped at input offset {}: {signal:?}",
                    request.position()
                );
                return Err(classify(signal, request.position()));
            }
        }
    }

    // The trailing sequence is short, so one extra growth is enough.
    let progress = primitive.flush(output.tail_mut());
    output.commit(progress.written);
    match progress.status {
        Ok(()) => {}
        Err(Signal::OutputTooSmall) => {
            output.grow()?;
            let progress = primitive.flush(output.tail_mut());
            output.commit(progress.written);
            progress
                .status
                .map_err(|signal| classify(signal, input.len()))?;
        }
        Err(signal) => return Err(classify(signal, input.len())),
    }

    debug!(
        "converted {} bytes into {} bytes (capacity {})",
        input.len(),
        output.len(),
        output.capacity()
    );
    Ok(output.into_vec())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::primitive::Progress;

    /// Test primitive: every input byte becomes two output bytes, and a
    /// trailer is written on flush after any output (or always, if set).
    #[derive(Debug, Default)]
    pub(crate) struct Doubler {
        pub(crate) trailer: &'static [u8],
        pub(crate) always_flush_trailer: bool,
        pub(crate) fail_at: Option<(usize, Signal)>,
        pub(crate) flush_fail: Option<Signal>,
        pub(crate) resets: usize,
        pub(crate) steps: usize,
        pub(crate) flushes: usize,
        consumed: usize,
        shifted: bool,
    }

    impl Doubler {
        pub(crate) fn with_trailer(trailer: &'static [u8]) -> Self {
            Self {
                trailer,
                ..Default::default()
            }
        }
    }

    impl Primitive for Doubler {
        fn reset(&mut self) {
            self.resets += 1;
            self.consumed = 0;
            self.shifted = false;
        }

        fn step(&mut self, input: &[u8], output: &mut [u8]) -> Progress {
            self.steps += 1;
            let mut written = 0;
            for (read, &byte) in input.iter().enumerate() {
                if let Some((offset, signal)) = self.fail_at {
                    if offset == self.consumed {
                        return Progress::failed(read, written, signal);
                    }
                }
                if output.len() - written < 2 {
                    return Progress::failed(read, written, Signal::OutputTooSmall);
                }
                output[written] = byte;
                output[written + 1] = byte;
                written += 2;
                self.consumed += 1;
                self.shifted = true;
            }
            Progress::done(input.len(), written)
        }

        fn flush(&mut self, output: &mut [u8]) -> Progress {
            self.flushes += 1;
            if let Some(signal) = self.flush_fail {
                return Progress::failed(0, 0, signal);
            }
            if !(self.shifted || self.always_flush_trailer) {
                return Progress::done(0, 0);
            }
            if output.len() < self.trailer.len() {
                return Progress::failed(0, 0, Signal::OutputTooSmall);
            }
            output[..self.trailer.len()].copy_from_slice(self.trailer);
            self.shifted = false;
            Progress::done(0, self.trailer.len())
        }
    }

    fn doubled(input: &[u8]) -> Vec<u8> {
        input.iter().flat_map(|&b| [b, b]).collect()
    }

    #[test]
    fn test_growth_keeps_every_byte() {
        let input: Vec<u8> = (0..=255).collect();
        let mut primitive = Doubler::default();
        let output = convert(&mut primitive, &input, ConverterConfig::default()).unwrap();

        assert_eq!(output, doubled(&input));
        assert_eq!(primitive.resets, 1);
        assert_eq!(primitive.flushes, 1);
        assert!(primitive.steps > 1);
    }

    #[test]
    fn test_empty_input_skips_the_loop() {
        let mut primitive = Doubler::default();
        let output = convert(&mut primitive, &[], ConverterConfig::default()).unwrap();

        assert!(output.is_empty());
        assert_eq!(primitive.steps, 0);
        assert_eq!(primitive.flushes, 1);
    }

    #[test]
    fn test_empty_input_can_emit_shift_sequence() {
        let mut primitive = Doubler {
            trailer: b"\x1b(B",
            always_flush_trailer: true,
            ..Default::default()
        };
        let output = convert(&mut primitive, &[], ConverterConfig::default()).unwrap();

        assert_eq!(output, b"\x1b(B");
        assert_eq!(primitive.steps, 0);
        // zero capacity on the first flush forces the single retry
        assert_eq!(primitive.flushes, 2);
    }

    #[test]
    fn test_trailer_after_full_buffer() {
        let mut primitive = Doubler::with_trailer(b"\x1b(B");
        // 8 input bytes fill the 16 byte initial allocation exactly
        let output = convert(&mut primitive, b"abcdefgh", ConverterConfig::default()).unwrap();

        let mut expected = doubled(b"abcdefgh");
        expected.extend_from_slice(b"\x1b(B");
        assert_eq!(output, expected);
        assert_eq!(primitive.flushes, 2);
    }

    #[test]
    fn test_flush_retry_happens_once() {
        let mut primitive = Doubler {
            trailer: &[0u8; 40],
            always_flush_trailer: true,
            ..Default::default()
        };
        let err = convert(&mut primitive, &[], ConverterConfig::default()).unwrap_err();

        assert_eq!(err, Error::OtherSystemError { code: libc::E2BIG });
        assert_eq!(primitive.flushes, 2);
    }

    #[test]
    fn test_flush_growth_past_ceiling_is_out_of_memory() {
        let mut primitive = Doubler {
            trailer: b"\x1b(B",
            always_flush_trailer: true,
            ..Default::default()
        };
        let config = ConverterConfig::default().with_max_capacity(0);
        let err = convert(&mut primitive, &[], config).unwrap_err();
        assert_eq!(err, Error::OutOfMemory);
        assert_eq!(primitive.flushes, 1);

        // the loop fills all 16 bytes, so only the flush needs more room
        let mut primitive = Doubler::with_trailer(b"\x1b(B");
        let config = ConverterConfig::default().with_max_capacity(16);
        let err = convert(&mut primitive, b"abcdefgh", config).unwrap_err();
        assert_eq!(err, Error::OutOfMemory);
        assert_eq!(primitive.flushes, 1);
    }

    #[test]
    fn test_illegal_input_reports_position() {
        let mut primitive = Doubler {
            fail_at: Some((5, Signal::IllegalInput)),
            ..Default::default()
        };
        let err = convert(&mut primitive, b"0123456789", ConverterConfig::default()).unwrap_err();
        assert_eq!(err, Error::IllegalSequence { position: 5 });
    }

    #[test]
    fn test_incomplete_input_after_growth() {
        let input = vec![b'x'; 40];
        let mut primitive = Doubler {
            fail_at: Some((39, Signal::IncompleteInput)),
            ..Default::default()
        };
        let err = convert(&mut primitive, &input, ConverterConfig::default()).unwrap_err();
        assert_eq!(err, Error::IncompleteSequence { position: 39 });
    }

    #[test]
    fn test_primitive_failures_are_classified() {
        let cases = [
            (Signal::OutOfMemory, Error::OutOfMemory),
            (Signal::Other(libc::EBADF), Error::OtherSystemError { code: libc::EBADF }),
        ];
        for (signal, expected) in cases {
            let mut primitive = Doubler {
                fail_at: Some((0, signal)),
                ..Default::default()
            };
            let err = convert(&mut primitive, b"abc", ConverterConfig::default()).unwrap_err();
            assert_eq!(err, expected);
        }
    }

    #[test]
    fn test_flush_failure_reports_end_of_input() {
        let mut primitive = Doubler {
            flush_fail: Some(Signal::IncompleteInput),
            ..Default::default()
        };
        let err = convert(&mut primitive, b"abcd", ConverterConfig::default()).unwrap_err();
        assert_eq!(err, Error::IncompleteSequence { position: 4 });
    }

    #[test]
    fn test_capacity_ceiling_is_out_of_memory() {
        let input = vec![b'x'; 100];
        let config = ConverterConfig::default().with_max_capacity(64);
        let err = convert(&mut Doubler::default(), &input, config).unwrap_err();
        assert_eq!(err, Error::OutOfMemory);

        // 32 input bytes need exactly 64 output bytes
        let output = convert(&mut Doubler::default(), &input[..32], config).unwrap();
        assert_eq!(output.len(), 64);
    }

    #[test]
    fn test_ceiling_clamps_last_growth() {
        let input = vec![b'x'; 20];
        let config = ConverterConfig::default().with_max_capacity(40);
        let output = convert(&mut Doubler::default(), &input, config).unwrap();
        assert_eq!(output.len(), 40);
    }

    #[test]
    fn test_reset_discards_previous_state() {
        let mut primitive = Doubler {
            trailer: b"!",
            fail_at: Some((3, Signal::IllegalInput)),
            ..Default::default()
        };
        assert!(convert(&mut primitive, b"abcd", ConverterConfig::default()).is_err());

        // shift state from the failed call must not produce a trailer here
        primitive.fail_at = None;
        let output = convert(&mut primitive, &[], ConverterConfig::default()).unwrap();
        assert!(output.is_empty());
        assert_eq!(primitive.resets, 2);
    }

    #[test]
    fn test_buffer_growth_preserves_written_bytes() {
        let mut buffer = ConversionBuffer::new(ConverterConfig::default());
        assert_eq!(buffer.capacity(), 0);

        buffer.grow().unwrap();
        assert_eq!(buffer.capacity(), 16);
        buffer.tail_mut()[..3].copy_from_slice(b"abc");
        buffer.commit(3);

        buffer.grow().unwrap();
        assert_eq!(buffer.capacity(), 32);
        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.tail_len(), 29);

        let bytes = buffer.into_vec();
        assert_eq!(bytes, b"abc");
    }
}
