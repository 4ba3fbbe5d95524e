//! Classified conversion errors.

use thiserror::Error;

/// Result type for conversion operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while opening a converter or converting data.
///
/// A conversion either returns a complete buffer or one of these errors,
/// never both: no variant carries partially converted output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The conversion primitive does not support the requested pair
    #[error("Conversion from {source_encoding} to {target_encoding} not supported (os error {code})")]
    UnsupportedConversion {
        /// Source encoding name, after alias fixup
        source_encoding: String,
        /// Target encoding name, after alias fixup
        target_encoding: String,
        /// Error code reported when opening the primitive
        code: i32,
    },
    /// Input ended in the middle of a multibyte character
    #[error("Incomplete character sequence at position {position}")]
    IncompleteSequence {
        /// Offset of the first byte of the incomplete sequence
        position: usize,
    },
    /// Input contains a byte sequence that is invalid in the source encoding
    #[error("Illegal character sequence at position {position}")]
    IllegalSequence {
        /// Offset of the first offending byte
        position: usize,
    },
    /// The output buffer could not be grown
    #[error("Out of memory")]
    OutOfMemory,
    /// Any other failure reported by the conversion primitive
    #[error("Conversion failed (os error {code})")]
    OtherSystemError {
        /// Raw error code
        code: i32,
    },
}

impl Error {
    /// The errno-style code describing this error.
    pub fn raw_os_error(&self) -> i32 {
        match self {
            Error::UnsupportedConversion { code, .. } => *code,
            Error::IncompleteSequence { .. } => libc::EINVAL,
            Error::IllegalSequence { .. } => libc::EILSEQ,
            Error::OutOfMemory => libc::ENOMEM,
            Error::OtherSystemError { code } => *code,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_os_error_codes() {
        assert_eq!(
            Error::IncompleteSequence { position: 3 }.raw_os_error(),
            libc::EINVAL
        );
        assert_eq!(
            Error::IllegalSequence { position: 0 }.raw_os_error(),
            libc::EILSEQ
        );
        assert_eq!(Error::OutOfMemory.raw_os_error(), libc::ENOMEM);
        assert_eq!(Error::OtherSystemError { code: 5 }.raw_os_error(), 5);
    }

    #[test]
    fn test_display_messages() {
        let err = Error::UnsupportedConversion {
            source_encoding: "UTF-8".to_string(),
            target_encoding: "NOPE".to_string(),
            code: libc::EINVAL,
        };
        assert!(err.to_string().starts_with("Conversion from UTF-8 to NOPE not supported"));
        assert_eq!(
            Error::IllegalSequence { position: 7 }.to_string(),
            "Illegal character sequence at position 7"
        );
    }
}
