use chrono::{DateTime, Datelike, TimeZone, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Granularity / DateRange
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    Month,
    Year,
}

/// Half-open interval `[from, to)` in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Chunking
// ---------------------------------------------------------------------------

/// Split `[start, now)` into calendar-aligned ranges.
///
/// For `Month`, ranges start at `(start_year, start_month, 1, 00:00:00 UTC)`
/// and advance one calendar month at a time. For `Year`, ranges are whole
/// calendar years starting January 1 of `start_year`; `start_month` is
/// ignored. A start at or after "now" yields an empty sequence.
pub fn chunk(granularity: Granularity, start_year: i32, start_month: u32) -> Vec<DateRange> {
    chunk_until(granularity, start_year, start_month, Utc::now())
}

/// Deterministic core of [`chunk`]: same contract, explicit `now`.
pub fn chunk_until(
    granularity: Granularity,
    start_year: i32,
    start_month: u32,
    now: DateTime<Utc>,
) -> Vec<DateRange> {
    let mut current = match granularity {
        Granularity::Month => month_floor(start_year, start_month),
        Granularity::Year => month_floor(start_year, 1),
    };

    let mut ranges = Vec::new();
    // Terminates: `next` strictly exceeds `current` every iteration.
    while current < now {
        let next = match granularity {
            Granularity::Month => next_month(current),
            Granularity::Year => month_floor(current.year() + 1, 1),
        };
        ranges.push(DateRange { from: current, to: next });
        current = next;
    }
    ranges
}

fn month_floor(year: i32, month: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0)
        .single()
        .expect("first of a calendar month is always a valid UTC instant")
}

fn next_month(at: DateTime<Utc>) -> DateTime<Utc> {
    if at.month() == 12 {
        month_floor(at.year() + 1, 1)
    } else {
        month_floor(at.year(), at.month() + 1)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(y: i32, mo: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, 0, 0).unwrap()
    }

    #[test]
    fn monthly_ranges_are_contiguous_and_increasing() {
        let ranges = chunk_until(Granularity::Month, 2023, 11, utc(2024, 3, 15, 12));
        assert_eq!(ranges.len(), 5); // Nov, Dec, Jan, Feb, Mar
        assert_eq!(ranges[0].from, utc(2023, 11, 1, 0));
        for pair in ranges.windows(2) {
            assert_eq!(pair[0].to, pair[1].from);
            assert!(pair[0].from < pair[1].from);
        }
        for r in &ranges {
            assert!(r.from < r.to);
        }
    }

    #[test]
    fn monthly_ranges_cross_year_boundary() {
        let ranges = chunk_until(Granularity::Month, 2023, 12, utc(2024, 1, 10, 0));
        assert_eq!(ranges.len(), 2);
        assert_eq!(ranges[0].to, utc(2024, 1, 1, 0));
        assert_eq!(ranges[1].from, utc(2024, 1, 1, 0));
    }

    #[test]
    fn yearly_ranges_start_january_first() {
        let ranges = chunk_until(Granularity::Year, 2021, 7, utc(2023, 6, 1, 0));
        // start_month is ignored for yearly granularity
        assert_eq!(ranges[0].from, utc(2021, 1, 1, 0));
        assert_eq!(ranges[0].to, utc(2022, 1, 1, 0));
        assert_eq!(ranges.len(), 3); // 2021, 2022, 2023
        for pair in ranges.windows(2) {
            assert_eq!(pair[0].to, pair[1].from);
        }
    }

    #[test]
    fn future_start_yields_empty_sequence() {
        let now = utc(2024, 3, 1, 0);
        assert!(chunk_until(Granularity::Month, 2024, 4, now).is_empty());
        assert!(chunk_until(Granularity::Year, 2025, 1, now).is_empty());
    }

    #[test]
    fn now_exactly_on_boundary_is_excluded() {
        // current == now must not emit a further range
        let ranges = chunk_until(Granularity::Month, 2024, 1, utc(2024, 3, 1, 0));
        assert_eq!(ranges.len(), 2); // Jan, Feb
        assert_eq!(ranges.last().unwrap().to, utc(2024, 3, 1, 0));
    }

    #[test]
    fn final_range_end_may_exceed_now() {
        // Mid-month "now": the last emitted range still ends on the next
        // calendar boundary.
        let ranges = chunk_until(Granularity::Month, 2024, 2, utc(2024, 2, 10, 6));
        assert_eq!(ranges.len(), 1);
        assert_eq!(ranges[0].to, utc(2024, 3, 1, 0));
    }

    #[test]
    fn single_year_window() {
        let ranges = chunk_until(Granularity::Year, 2024, 1, utc(2024, 12, 31, 23));
        assert_eq!(ranges.len(), 1);
        assert_eq!(ranges[0].from, utc(2024, 1, 1, 0));
        assert_eq!(ranges[0].to, utc(2025, 1, 1, 0));
    }
}
