use jiff::ToSpan;
use jiff::civil::{Date, DateTime};
use serde::Serialize;

/// One row of the day grid, half-open over wall-clock time.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct TimeSlot {
    pub start: DateTime,
    pub end: DateTime,
}

impl TimeSlot {
    pub fn overlaps(&self, other: &TimeSlot) -> bool {
        self.start < other.end && self.end > other.start
    }
}

/// Generates the visible grid rows for one day: `[start_hour, end_hour)` cut
/// into `slot_minutes` pieces. The reference window is 08:00-18:00 in
/// 30-minute slots, i.e. 20 rows.
pub fn day_slots(date: Date, start_hour: i8, end_hour: i8, slot_minutes: i64) -> Vec<TimeSlot> {
    let mut slots = Vec::new();
    let mut start = date.at(start_hour, 0, 0, 0);
    let end_of_day = date.at(end_hour, 0, 0, 0);
    while start < end_of_day {
        let end = start.checked_add(slot_minutes.minutes()).unwrap();
        slots.push(TimeSlot { start, end });
        start = end;
    }
    slots
}

/// Monday of the week containing `date`.
pub fn start_of_week(date: Date) -> Date {
    let offset = date.weekday().to_monday_zero_offset() as i64;
    date.checked_sub(offset.days()).unwrap()
}

/// Monday through Sunday of the week containing `date`.
pub fn week_days(date: Date) -> [Date; 7] {
    let monday = start_of_week(date);
    std::array::from_fn(|i| monday.checked_add((i as i64).days()).unwrap())
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use super::*;

    #[test]
    fn test_day_slots_cover_the_reference_window() {
        let slots = day_slots(date(2025, 3, 10), 8, 18, 30);
        assert_eq!(slots.len(), 20);
        assert_eq!(slots[0].start, date(2025, 3, 10).at(8, 0, 0, 0));
        assert_eq!(slots[0].end, date(2025, 3, 10).at(8, 30, 0, 0));
        assert_eq!(slots[19].start, date(2025, 3, 10).at(17, 30, 0, 0));
        assert_eq!(slots[19].end, date(2025, 3, 10).at(18, 0, 0, 0));
    }

    #[test]
    fn test_consecutive_slots_do_not_overlap() {
        let slots = day_slots(date(2025, 3, 10), 8, 18, 30);
        for pair in slots.windows(2) {
            assert!(!pair[0].overlaps(&pair[1]));
        }
    }

    #[test]
    fn test_overlap_is_strict_on_shared_boundary() {
        let a = TimeSlot {
            start: date(2025, 3, 10).at(9, 0, 0, 0),
            end: date(2025, 3, 10).at(9, 30, 0, 0),
        };
        let b = TimeSlot {
            start: date(2025, 3, 10).at(9, 30, 0, 0),
            end: date(2025, 3, 10).at(10, 0, 0, 0),
        };
        let c = TimeSlot {
            start: date(2025, 3, 10).at(9, 15, 0, 0),
            end: date(2025, 3, 10).at(9, 45, 0, 0),
        };
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert!(c.overlaps(&b));
    }

    #[test]
    fn test_start_of_week_is_monday() {
        // 2025-03-13 is a Thursday.
        assert_eq!(start_of_week(date(2025, 3, 13)), date(2025, 3, 10));
        assert_eq!(start_of_week(date(2025, 3, 10)), date(2025, 3, 10));
        // Sunday still belongs to the week starting the previous Monday.
        assert_eq!(start_of_week(date(2025, 3, 16)), date(2025, 3, 10));
    }

    #[test]
    fn test_week_days_are_seven_consecutive_dates() {
        let days = week_days(date(2025, 3, 13));
        assert_eq!(days[0], date(2025, 3, 10));
        assert_eq!(days[6], date(2025, 3, 16));
        for pair in days.windows(2) {
            assert_eq!(pair[0].checked_add(1.days()).unwrap(), pair[1]);
        }
    }
}
