//! Page-range resolution for split
//!
//! The two bound inputs are corrected as the user types: each value is
//! clamped into `[1, N]` and the opposite bound is dragged along so the range
//! never inverts. A final hard check runs before the document is touched.

use crate::error::PdfToolsError;
use std::ops::Range;

/// Inclusive, 1-based page range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRange {
    pub start: u32,
    pub end: u32,
}

impl PageRange {
    /// Validate a range against a page count.
    ///
    /// Rejects exactly when `start < 1`, `end > total_pages` or `start > end`.
    pub fn checked(start: i64, end: i64, total_pages: u32) -> Result<Self, PdfToolsError> {
        if start < 1 || end > total_pages as i64 || start > end {
            return Err(PdfToolsError::InvalidPageRange { total_pages });
        }
        Ok(Self {
            start: start as u32,
            end: end as u32,
        })
    }

    /// Page count; zero for an inverted range.
    pub fn len(&self) -> u32 {
        self.end.saturating_add(1).saturating_sub(self.start.max(1))
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 1-based page numbers in the range.
    pub fn pages(&self) -> Vec<u32> {
        (self.start..=self.end).collect()
    }

    /// Zero-based indices for the mutation library.
    pub fn indices(&self) -> Range<u32> {
        self.start.saturating_sub(1)..self.end
    }
}

/// `max(1, min(value, total_pages))`
pub fn clamp_page(value: i64, total_pages: u32) -> u32 {
    value.min(total_pages as i64).max(1) as u32
}

/// Read a page number the way a number input is read: leading integer,
/// with anything unparsable or zero becoming 1.
pub fn parse_page_input(raw: &str) -> i64 {
    let trimmed = raw.trim();
    let (sign, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let digits: String = digits.chars().take_while(|c| c.is_ascii_digit()).collect();
    match digits.parse::<i64>() {
        Ok(0) | Err(_) => 1,
        Ok(n) => sign * n,
    }
}

/// Start/end inputs for one loaded document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeSelector {
    total_pages: u32,
    start: u32,
    end: u32,
}

impl RangeSelector {
    /// Fresh selection covering the whole document.
    pub fn new(total_pages: u32) -> Self {
        Self {
            total_pages,
            start: 1,
            end: total_pages.max(1),
        }
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn start(&self) -> u32 {
        self.start
    }

    pub fn end(&self) -> u32 {
        self.end
    }

    /// Set the start bound; raises the end bound when it would fall behind.
    pub fn set_start(&mut self, value: i64) -> PageRange {
        self.start = clamp_page(value, self.total_pages);
        if self.start > self.end {
            self.end = self.start;
        }
        self.range()
    }

    /// Set the end bound; lowers the start bound when it would overtake.
    pub fn set_end(&mut self, value: i64) -> PageRange {
        self.end = clamp_page(value, self.total_pages);
        if self.end < self.start {
            self.start = self.end;
        }
        self.range()
    }

    pub fn set_start_input(&mut self, raw: &str) -> PageRange {
        self.set_start(parse_page_input(raw))
    }

    pub fn set_end_input(&mut self, raw: &str) -> PageRange {
        self.set_end(parse_page_input(raw))
    }

    pub fn range(&self) -> PageRange {
        PageRange {
            start: self.start,
            end: self.end,
        }
    }

    /// The hard check run right before splitting.
    pub fn checked(&self) -> Result<PageRange, PdfToolsError> {
        PageRange::checked(self.start as i64, self.end as i64, self.total_pages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_selector_covers_document() {
        let sel = RangeSelector::new(10);
        assert_eq!(sel.range(), PageRange { start: 1, end: 10 });
    }

    #[test]
    fn test_start_beyond_end_raises_end() {
        let mut sel = RangeSelector::new(10);
        sel.set_end(3);
        let range = sel.set_start(5);
        assert_eq!(range, PageRange { start: 5, end: 5 });
    }

    #[test]
    fn test_end_before_start_lowers_start() {
        let mut sel = RangeSelector::new(10);
        sel.set_start(5);
        let range = sel.set_end(3);
        assert_eq!(range, PageRange { start: 3, end: 3 });
    }

    #[test]
    fn test_values_are_clamped() {
        let mut sel = RangeSelector::new(10);
        assert_eq!(sel.set_start(-4).start, 1);
        assert_eq!(sel.set_end(99).end, 10);
        assert_eq!(sel.set_start(42), PageRange { start: 10, end: 10 });
    }

    #[test]
    fn test_parse_page_input() {
        assert_eq!(parse_page_input("7"), 7);
        assert_eq!(parse_page_input(" 12abc"), 12);
        assert_eq!(parse_page_input(""), 1);
        assert_eq!(parse_page_input("abc"), 1);
        assert_eq!(parse_page_input("0"), 1);
        assert_eq!(parse_page_input("-3"), -3);
    }

    #[test]
    fn test_text_inputs() {
        let mut sel = RangeSelector::new(4);
        assert_eq!(sel.set_start_input("x"), PageRange { start: 1, end: 4 });
        assert_eq!(sel.set_end_input("2"), PageRange { start: 1, end: 2 });
    }

    #[test]
    fn test_checked_rejects_bad_ranges() {
        assert!(PageRange::checked(0, 3, 5).is_err());
        assert!(PageRange::checked(1, 6, 5).is_err());
        assert!(PageRange::checked(4, 2, 5).is_err());
        assert_eq!(
            PageRange::checked(2, 4, 5).unwrap(),
            PageRange { start: 2, end: 4 }
        );
    }

    #[test]
    fn test_indices_are_zero_based() {
        let range = PageRange { start: 3, end: 5 };
        assert_eq!(range.indices().collect::<Vec<_>>(), vec![2, 3, 4]);
        assert_eq!(range.pages(), vec![3, 4, 5]);
        assert_eq!(range.len(), 3);
        assert!(!range.is_empty());
    }

    #[test]
    fn test_hand_built_inverted_range_is_empty() {
        let range = PageRange { start: 5, end: 2 };
        assert_eq!(range.len(), 0);
        assert!(range.is_empty());
        assert!(range.pages().is_empty());
        assert_eq!(range.indices().count(), 0);
    }
}
