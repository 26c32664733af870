//! Byte-range resolution for `Range` request headers.
//!
//! Parsing follows the RFC 7233 `byte-range-set` grammar with the same leniency as
//! Go's `net/http` parser: empty specs are skipped and end offsets past the object
//! are clamped. A spec starting past the end does not overlap and yields
//! [`RangeError::NotSatisfiable`].
//!
//! Only single ranges are served. A header naming two or more ranges is rejected
//! with [`RangeError::MultipleRanges`] before any member is validated, so a
//! malformed or non-overlapping member never turns it into a single range.
//!
//! Note that [`RangeSpec::content_range`] renders the *length* in the second field
//! (`bytes 0-100/1000` for the first hundred bytes). Existing players rely on it.

use serde::Serialize;

const BYTES_PREFIX: &str = "bytes=";

/// A resolved byte range inside an object of known size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RangeSpec {
    pub start: u64,
    pub length: u64,
}

impl RangeSpec {
    pub fn new(start: u64, length: u64) -> Self {
        Self { start, length }
    }

    /// Exclusive end offset.
    pub fn end(&self) -> u64 {
        self.start + self.length
    }

    /// Value for the `Content-Range` response header.
    pub fn content_range(&self, size: u64) -> String {
        format!("bytes {}-{}/{}", self.start, self.length, size)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RangeError {
    #[error("malformed Range header")]
    Malformed,

    #[error("multiple ranges are not supported")]
    MultipleRanges,

    #[error("range does not overlap the object")]
    NotSatisfiable,
}

/// Resolve an optional `Range` header against an object of `size` bytes.
///
/// `Ok(None)` means the whole object should be sent.
pub fn resolve_range(header: Option<&str>, size: u64) -> Result<Option<RangeSpec>, RangeError> {
    let ranges = match header {
        Some(value) => parse_ranges(value, size)?,
        None => Vec::new(),
    };

    match ranges.as_slice() {
        [] => Ok(None),
        [range] => {
            if range.start > size || range.end() > size {
                return Err(RangeError::NotSatisfiable);
            }
            Ok(Some(*range))
        }
        _ => Err(RangeError::MultipleRanges),
    }
}

fn parse_ranges(header: &str, size: u64) -> Result<Vec<RangeSpec>, RangeError> {
    if header.is_empty() {
        return Ok(Vec::new());
    }
    let set = header
        .strip_prefix(BYTES_PREFIX)
        .ok_or(RangeError::Malformed)?;

    let specs: Vec<&str> = set
        .split(',')
        .map(trim_ascii)
        .filter(|spec| !spec.is_empty())
        .collect();
    if specs.len() > 1 {
        return Err(RangeError::MultipleRanges);
    }

    let mut ranges = Vec::new();
    let mut no_overlap = false;

    for spec in specs {
        let (first, last) = spec.split_once('-').ok_or(RangeError::Malformed)?;
        let (first, last) = (trim_ascii(first), trim_ascii(last));

        if first.is_empty() {
            // Suffix form: the final `last` bytes.
            let suffix = parse_offset(last)?.min(size);
            let start = size - suffix;
            ranges.push(RangeSpec::new(start, size - start));
            continue;
        }

        let start = parse_offset(first)?;
        if start >= size {
            no_overlap = true;
            continue;
        }

        let length = if last.is_empty() {
            size - start
        } else {
            let end = parse_offset(last)?;
            if start > end {
                return Err(RangeError::Malformed);
            }
            end.min(size - 1) - start + 1
        };
        ranges.push(RangeSpec::new(start, length));
    }

    if no_overlap && ranges.is_empty() {
        return Err(RangeError::NotSatisfiable);
    }
    Ok(ranges)
}

fn parse_offset(value: &str) -> Result<u64, RangeError> {
    if value.is_empty() || value.starts_with('-') {
        return Err(RangeError::Malformed);
    }
    value.parse::<u64>().map_err(|_| RangeError::Malformed)
}

fn trim_ascii(value: &str) -> &str {
    value.trim_matches(|c: char| matches!(c, ' ' | '\t' | '\r' | '\n'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_or_empty_header_is_full_body() {
        assert_eq!(resolve_range(None, 1000), Ok(None));
        assert_eq!(resolve_range(Some(""), 1000), Ok(None));
        assert_eq!(resolve_range(Some("bytes="), 1000), Ok(None));
        assert_eq!(resolve_range(Some("bytes= , "), 1000), Ok(None));
    }

    #[test]
    fn test_first_hundred_bytes() {
        let range = resolve_range(Some("bytes=0-99"), 1000).unwrap().unwrap();
        assert_eq!(range, RangeSpec::new(0, 100));
        assert_eq!(range.content_range(1000), "bytes 0-100/1000");
    }

    #[test]
    fn test_open_ended_range() {
        let range = resolve_range(Some("bytes=900-"), 1000).unwrap().unwrap();
        assert_eq!(range, RangeSpec::new(900, 100));
    }

    #[test]
    fn test_suffix_range() {
        let range = resolve_range(Some("bytes=-200"), 1000).unwrap().unwrap();
        assert_eq!(range, RangeSpec::new(800, 200));

        let clamped = resolve_range(Some("bytes=-5000"), 1000).unwrap().unwrap();
        assert_eq!(clamped, RangeSpec::new(0, 1000));
    }

    #[test]
    fn test_end_past_size_is_clamped() {
        let range = resolve_range(Some("bytes=500-4999"), 1000).unwrap().unwrap();
        assert_eq!(range, RangeSpec::new(500, 500));
    }

    #[test]
    fn test_whitespace_around_specs_is_ignored() {
        let range = resolve_range(Some("bytes= 10 - 19 "), 1000).unwrap().unwrap();
        assert_eq!(range, RangeSpec::new(10, 10));
    }

    #[test]
    fn test_malformed_headers() {
        for header in [
            "items=0-10",
            "bytes=abc",
            "bytes=10",
            "bytes=20-10",
            "bytes=--5",
            "bytes=x-10",
            "bytes=0-y",
            "bytes=-",
        ] {
            assert_eq!(
                resolve_range(Some(header), 1000),
                Err(RangeError::Malformed),
                "header {header:?}"
            );
        }
    }

    #[test]
    fn test_start_past_size_is_not_satisfiable() {
        assert_eq!(
            resolve_range(Some("bytes=1000-"), 1000),
            Err(RangeError::NotSatisfiable)
        );
        assert_eq!(
            resolve_range(Some("bytes=2000-3000"), 1000),
            Err(RangeError::NotSatisfiable)
        );
        assert_eq!(
            resolve_range(Some("bytes=0-"), 0),
            Err(RangeError::NotSatisfiable)
        );
    }

    #[test]
    fn test_multiple_ranges_rejected() {
        assert_eq!(
            resolve_range(Some("bytes=0-9,20-29"), 1000),
            Err(RangeError::MultipleRanges)
        );
        assert_eq!(
            resolve_range(Some("bytes=0-9,-5"), 1000),
            Err(RangeError::MultipleRanges)
        );
    }

    #[test]
    fn test_multiple_ranges_rejected_regardless_of_member_validity() {
        for header in [
            "bytes=0-9,5000-6000",
            "bytes=5000-,0-9",
            "bytes=5000-,6000-",
            "bytes=0-9,abc",
            "bytes=0-9, ,20-29",
        ] {
            assert_eq!(
                resolve_range(Some(header), 1000),
                Err(RangeError::MultipleRanges),
                "header {header:?}"
            );
        }
    }

    #[test]
    fn test_empty_members_do_not_count_as_ranges() {
        let range = resolve_range(Some("bytes=, 0-9 ,"), 1000).unwrap().unwrap();
        assert_eq!(range, RangeSpec::new(0, 10));
    }

    #[test]
    fn test_range_never_exceeds_size() {
        for header in ["bytes=0-", "bytes=999-999", "bytes=-1", "bytes=1-100000"] {
            let range = resolve_range(Some(header), 1000).unwrap().unwrap();
            assert!(range.end() <= 1000, "header {header:?}");
            assert!(range.length > 0);
        }
    }
}
