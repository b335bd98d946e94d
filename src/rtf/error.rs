//! Error types for RTF conversion.

use std::fmt;
use thiserror::Error;

/// Result type for RTF operations.
pub type RtfResult<T> = Result<T, RtfError>;

/// Line number in the IR stream, rendered only when known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineNo(pub Option<usize>);

impl fmt::Display for LineNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(line) => write!(f, " (line {})", line),
            None => Ok(()),
        }
    }
}

/// RTF conversion errors.
#[derive(Error, Debug)]
pub enum RtfError {
    /// The input is not usable RTF (structural or lexical problem)
    #[error("Invalid RTF: {message}{line}")]
    InvalidRtf { message: String, line: LineNo },

    /// A pass reached a state it should never reach
    #[error("RTF invalid code: {message}{line}")]
    InvalidCode { message: String, line: LineNo },

    /// IO error while reading or writing a pass stream
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RtfError {
    /// Bad input without a known position.
    pub fn invalid_rtf(message: impl Into<String>) -> Self {
        RtfError::InvalidRtf {
            message: message.into(),
            line: LineNo(None),
        }
    }

    /// Bad input at a given IR line.
    pub fn invalid_rtf_at(message: impl Into<String>, line: usize) -> Self {
        RtfError::InvalidRtf {
            message: message.into(),
            line: LineNo(Some(line)),
        }
    }

    /// Internal state-machine failure.
    pub fn invalid_code(message: impl Into<String>, line: Option<usize>) -> Self {
        RtfError::InvalidCode {
            message: message.into(),
            line: LineNo(line),
        }
    }

    /// Whether this error was caused by the input document.
    #[inline]
    pub fn is_invalid_rtf(&self) -> bool {
        matches!(self, RtfError::InvalidRtf { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_with_line() {
        let err = RtfError::invalid_rtf_at("unmatched brace", 12);
        assert_eq!(err.to_string(), "Invalid RTF: unmatched brace (line 12)");
    }

    #[test]
    fn test_display_without_line() {
        let err = RtfError::invalid_rtf("file appears to be empty");
        assert_eq!(err.to_string(), "Invalid RTF: file appears to be empty");
        assert!(err.is_invalid_rtf());
    }
}
