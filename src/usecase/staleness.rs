use time::{Date, OffsetDateTime, UtcOffset, Weekday};

/// Weekdays strictly after `from` up to and including `to`.
pub fn weekdays_between(from: Date, to: Date) -> u32 {
    let mut count = 0;
    let mut day = from;
    while day < to {
        let Some(next) = day.next_day() else {
            break;
        };
        day = next;
        if !matches!(day.weekday(), Weekday::Saturday | Weekday::Sunday) {
            count += 1;
        }
    }
    count
}

/// `"<N> days old"` once more than `threshold` weekdays have passed since the last update.
pub fn staleness_label(
    updated_at: OffsetDateTime,
    now: OffsetDateTime,
    threshold: u32,
) -> Option<String> {
    let from = updated_at.to_offset(UtcOffset::UTC).date();
    let to = now.to_offset(UtcOffset::UTC).date();
    let days = weekdays_between(from, to);
    (days > threshold).then(|| format!("{days} days old"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    #[test]
    fn monday_to_thursday_counts_three() {
        assert_eq!(weekdays_between(date!(2024-03-04), date!(2024-03-07)), 3);
    }

    #[test]
    fn friday_to_monday_counts_only_monday() {
        assert_eq!(weekdays_between(date!(2024-03-08), date!(2024-03-11)), 1);
    }

    #[test]
    fn same_day_and_past_dates_count_zero() {
        assert_eq!(weekdays_between(date!(2024-03-04), date!(2024-03-04)), 0);
        assert_eq!(weekdays_between(date!(2024-03-07), date!(2024-03-04)), 0);
    }

    #[test]
    fn two_full_weeks() {
        assert_eq!(weekdays_between(date!(2024-03-01), date!(2024-03-15)), 10);
    }

    #[test]
    fn label_only_above_threshold() {
        let updated = datetime!(2024-03-04 17:30 UTC);
        assert_eq!(
            staleness_label(updated, datetime!(2024-03-07 08:00 UTC), 2).as_deref(),
            Some("3 days old")
        );
        assert_eq!(staleness_label(updated, datetime!(2024-03-06 23:59 UTC), 2), None);
        assert_eq!(
            staleness_label(datetime!(2024-03-08 10:00 UTC), datetime!(2024-03-11 10:00 UTC), 2),
            None
        );
    }

    #[test]
    fn offsets_are_compared_as_utc_dates() {
        // 2024-03-05 01:00 +02:00 is still Monday in UTC.
        let updated = datetime!(2024-03-05 01:00 +2);
        assert_eq!(
            staleness_label(updated, datetime!(2024-03-07 12:00 UTC), 2).as_deref(),
            Some("3 days old")
        );
    }
}
