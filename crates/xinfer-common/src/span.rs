//! Byte-offset source spans.

use serde::Serialize;

/// A half-open byte range `[start, end)` inside one source file.
///
/// Spans are attached to declarations and expressions by the front end and
/// are carried by every diagnostic so that the presentation layer can point
/// at the offending source element.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Span {
    pub file: u32,
    pub start: u32,
    pub end: u32,
}

impl Span {
    /// A span that does not point anywhere (synthetic elements).
    pub const DUMMY: Self = Self {
        file: u32::MAX,
        start: 0,
        end: 0,
    };

    #[inline]
    pub const fn new(file: u32, start: u32, end: u32) -> Self {
        Self { file, start, end }
    }

    #[inline]
    pub const fn len(self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub const fn is_dummy(self) -> bool {
        self.file == u32::MAX
    }

    /// Smallest span covering both `self` and `other`.
    ///
    /// Spans from different files cannot be joined; `self` is returned.
    pub fn cover(self, other: Self) -> Self {
        if self.file != other.file {
            return self;
        }
        Self {
            file: self.file,
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

#[cfg(test)]
#[path = "../tests/span_tests.rs"]
mod tests;
