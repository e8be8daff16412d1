use std::fmt;

use jiff::{civil::Date, ToSpan};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
#[error("start date {start} is after end date {end}")]
pub struct DateRangeError {
    pub start: Date,
    pub end: Date,
}

/// A sequence of calendar days, inclusive of both ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateRange {
    pub start: Date,
    pub end: Date,
}

impl DateRange {
    /// An inverted range (start > end) is allowed and contains no days.
    pub fn new(start: Date, end: Date) -> Self {
        DateRange { start, end }
    }

    /// Same as [`DateRange::new`] but fail if start is after end.
    pub fn checked(start: Date, end: Date) -> Result<Self, DateRangeError> {
        if start > end {
            return Err(DateRangeError { start, end });
        }
        Ok(DateRange::new(start, end))
    }

    /// All the days in the range, in increasing order.
    pub fn days(&self) -> Vec<Date> {
        let end = self.end;
        self.start
            .series(1.day())
            .take_while(|e| e <= &end)
            .collect()
    }

    pub fn len(&self) -> usize {
        if self.start > self.end {
            return 0;
        }
        // Both ends are civil dates so the difference is a whole number of days.
        match self.start.until(self.end) {
            Ok(span) => span.get_days() as usize + 1,
            Err(_) => self.days().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.start, self.end)
    }
}
