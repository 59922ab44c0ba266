//! Two-phase driver queries.
//!
//! The driver cannot report a list without storage negotiated in advance, so
//! every list query is issued twice: once for the size, once for the data.

use crate::driver::Status;
use crate::error::Error;

/// Failure of a two-phase query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum QueryError {
    /// One of the two driver calls reported a non-success status.
    Driver(Status),
    /// The data call returned a different number of entries than negotiated.
    Mismatch { expected: usize, actual: usize },
}

impl QueryError {
    /// Converts into a pipeline error, using `on_status` for driver failures.
    pub(crate) fn into_error(self, query: &'static str, on_status: fn(Status) -> Error) -> Error {
        match self {
            QueryError::Driver(status) => on_status(status),
            QueryError::Mismatch { expected, actual } => Error::CountMismatch {
                query,
                expected,
                actual,
            },
        }
    }
}

/// Queries the size with `count`, then the data with `fill`.
///
/// `fill` is not called when `count` fails. The result has exactly the
/// negotiated length.
pub(crate) fn negotiate<T>(
    count: impl FnOnce() -> Result<usize, Status>,
    fill: impl FnOnce(usize) -> Result<Vec<T>, Status>,
) -> Result<Vec<T>, QueryError> {
    let expected = count().map_err(QueryError::Driver)?;
    let items = fill(expected).map_err(QueryError::Driver)?;
    if items.len() != expected {
        return Err(QueryError::Mismatch {
            expected,
            actual: items.len(),
        });
    }
    Ok(items)
}

/// Strips trailing NUL padding from a text attribute.
pub fn trim_padding(bytes: &[u8]) -> &[u8] {
    let end = bytes
        .iter()
        .rposition(|&b| b != 0)
        .map_or(0, |last| last + 1);
    &bytes[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::cell::Cell;

    #[test]
    fn test_negotiate_returns_negotiated_count() {
        let items = negotiate(|| Ok(3), |n| Ok((0..n).collect::<Vec<_>>())).unwrap();
        assert_eq!(items, vec![0, 1, 2]);
    }

    #[test]
    fn test_negotiate_passes_count_to_fill() {
        let seen = Cell::new(None);
        let _ = negotiate(
            || Ok(5),
            |n| {
                seen.set(Some(n));
                Ok(vec![0u8; n])
            },
        );
        assert_eq!(seen.get(), Some(5));
    }

    #[test]
    fn test_negotiate_count_failure_skips_fill() {
        let filled = Cell::new(false);
        let result: Result<Vec<u8>, _> = negotiate(
            || Err(-1001),
            |_| {
                filled.set(true);
                Ok(Vec::new())
            },
        );
        assert_eq!(result, Err(QueryError::Driver(-1001)));
        assert!(!filled.get());
    }

    #[test]
    fn test_negotiate_fill_failure() {
        let result: Result<Vec<u8>, _> = negotiate(|| Ok(2), |_| Err(-30));
        assert_eq!(result, Err(QueryError::Driver(-30)));
    }

    #[test]
    fn test_negotiate_detects_changed_count() {
        let result = negotiate(|| Ok(2), |_| Ok(vec![7]));
        assert_eq!(
            result,
            Err(QueryError::Mismatch {
                expected: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn test_mismatch_maps_to_count_mismatch() {
        let error = QueryError::Mismatch {
            expected: 2,
            actual: 1,
        }
        .into_error("platform list", |status| Error::PlatformQuery { status });
        assert!(matches!(
            error,
            Error::CountMismatch {
                query: "platform list",
                expected: 2,
                actual: 1
            }
        ));
    }

    #[rstest]
    #[case(b"Advanced Micro Devices, Inc.\0", b"Advanced Micro Devices, Inc.")]
    #[case(b"NVIDIA Corporation\0\0\0\0", b"NVIDIA Corporation")]
    #[case(b"Intel(R) Corporation", b"Intel(R) Corporation")]
    #[case(b"\0\0", b"")]
    #[case(b"", b"")]
    #[case(b"a\0b\0", b"a\0b")]
    fn test_trim_padding(#[case] raw: &[u8], #[case] expected: &[u8]) {
        assert_eq!(trim_padding(raw), expected);
    }
}
