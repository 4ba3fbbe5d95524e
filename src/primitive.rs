//! The stateful conversion primitive driven by the engine.

/// Failure signal reported by a single primitive call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// The output slice ran out of room; retry with more space
    OutputTooSmall,
    /// Input ends in the middle of a multibyte sequence
    IncompleteInput,
    /// Input contains an invalid sequence
    IllegalInput,
    /// The primitive could not allocate internal state
    OutOfMemory,
    /// Anything else, with the raw error code
    Other(i32),
}

impl Signal {
    /// Classify an errno value returned by `iconv(3)`.
    pub fn from_errno(code: i32) -> Self {
        match code {
            libc::E2BIG => Signal::OutputTooSmall,
            libc::EINVAL => Signal::IncompleteInput,
            libc::EILSEQ => Signal::IllegalInput,
            libc::ENOMEM => Signal::OutOfMemory,
            other => Signal::Other(other),
        }
    }
}

/// How far one primitive call got before it returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// Input bytes consumed
    pub read: usize,
    /// Output bytes produced
    pub written: usize,
    /// `Ok` when the call completed, otherwise the failure signal
    pub status: Result<(), Signal>,
}

impl Progress {
    /// A completed call.
    pub fn done(read: usize, written: usize) -> Self {
        Self {
            read,
            written,
            status: Ok(()),
        }
    }

    /// A call that stopped with `signal` after partial progress.
    pub fn failed(read: usize, written: usize, signal: Signal) -> Self {
        Self {
            read,
            written,
            status: Err(signal),
        }
    }
}

/// An opaque, stateful converter bound to one encoding pair.
///
/// Implementations hold shift state between calls; the engine resets it
/// before every conversion and drains it with [`Primitive::flush`] at the end.
/// Releasing the underlying resource is the implementation's `Drop`.
pub trait Primitive {
    /// Return the shift state to its initial state.
    fn reset(&mut self);

    /// Convert as much of `input` into `output` as possible.
    ///
    /// A completed call has consumed all of `input`. On failure `read` and
    /// `written` describe the progress made before the signal.
    fn step(&mut self, input: &[u8], output: &mut [u8]) -> Progress;

    /// Write the sequence that returns the target encoding to its initial state.
    fn flush(&mut self, output: &mut [u8]) -> Progress;
}

impl<P: Primitive + ?Sized> Primitive for &mut P {
    fn reset(&mut self) {
        (**self).reset()
    }

    fn step(&mut self, input: &[u8], output: &mut [u8]) -> Progress {
        (**self).step(input, output)
    }

    fn flush(&mut self, output: &mut [u8]) -> Progress {
        (**self).flush(output)
    }
}

impl<P: Primitive + ?Sized> Primitive for Box<P> {
    fn reset(&mut self) {
        (**self).reset()
    }

    fn step(&mut self, input: &[u8], output: &mut [u8]) -> Progress {
        (**self).step(input, output)
    }

    fn flush(&mut self, output: &mut [u8]) -> Progress {
        (**self).flush(output)
    }
}
