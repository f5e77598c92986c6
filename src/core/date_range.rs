//! Bounded date-range selection.
//!
//! The calendar widget emits either a single instant or a start/end pair.
//! Ranges longer than the configured span are rejected and must not be
//! committed; single dates always pass.

use crate::domain::model::DateSelection;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use thiserror::Error;

pub const DEFAULT_MAX_SPAN_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SelectionRejection {
    #[error("ranges are limited to {max_span_days} days (selected {span_days})")]
    RangeTooLong { max_span_days: i64, span_days: i64 },

    #[error("range ends ({end}) before it starts ({start})")]
    ReversedRange {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
}

/// Accepts `selection` unchanged, or says why it cannot be committed.
///
/// The span is elapsed time in whole days, truncated toward zero, and the
/// limit is inclusive: a span of exactly `max_span_days` is accepted.
pub fn validate(
    selection: DateSelection,
    max_span_days: i64,
) -> Result<DateSelection, SelectionRejection> {
    match selection {
        DateSelection::Single(_) => Ok(selection),
        DateSelection::Range { start, end } => {
            if end < start {
                return Err(SelectionRejection::ReversedRange { start, end });
            }

            let span_days = (end - start).num_days();
            if span_days <= max_span_days {
                Ok(selection)
            } else {
                Err(SelectionRejection::RangeTooLong {
                    max_span_days,
                    span_days,
                })
            }
        }
    }
}

/// Span policy configured for a particular picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRangePolicy {
    pub max_span_days: i64,
}

impl Default for DateRangePolicy {
    fn default() -> Self {
        Self {
            max_span_days: DEFAULT_MAX_SPAN_DAYS,
        }
    }
}

impl DateRangePolicy {
    pub fn new(max_span_days: i64) -> Self {
        Self { max_span_days }
    }

    pub fn validate(&self, selection: DateSelection) -> Result<DateSelection, SelectionRejection> {
        let outcome = validate(selection, self.max_span_days);
        if let Err(rejection) = &outcome {
            tracing::warn!("Date selection rejected: {}", rejection);
        }
        outcome
    }
}

impl DateSelection {
    /// A single calendar day, at midnight.
    pub fn day(date: NaiveDate) -> Self {
        DateSelection::Single(date.and_time(NaiveTime::MIN))
    }

    /// A day-granular range from the start of `start` to the start of `end`.
    pub fn days(start: NaiveDate, end: NaiveDate) -> Self {
        DateSelection::Range {
            start: start.and_time(NaiveTime::MIN),
            end: end.and_time(NaiveTime::MIN),
        }
    }
}

/// Raw widget emission with neither one nor two values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("calendar emitted {0} values; expected 1 or 2")]
pub struct UnexpectedEmission(pub usize);

impl TryFrom<&[NaiveDateTime]> for DateSelection {
    type Error = UnexpectedEmission;

    fn try_from(values: &[NaiveDateTime]) -> Result<Self, Self::Error> {
        match values {
            [single] => Ok(DateSelection::Single(*single)),
            [start, end] => Ok(DateSelection::Range {
                start: *start,
                end: *end,
            }),
            other => Err(UnexpectedEmission(other.len())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn may_first() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    #[test]
    fn test_seven_day_range_is_accepted() {
        let start = may_first();
        let selection = DateSelection::days(start, start + Duration::days(7));
        assert_eq!(validate(selection, 7), Ok(selection));
    }

    #[test]
    fn test_eight_day_range_is_rejected() {
        let start = may_first();
        let selection = DateSelection::days(start, start + Duration::days(8));
        assert_eq!(
            validate(selection, 7),
            Err(SelectionRejection::RangeTooLong {
                max_span_days: 7,
                span_days: 8
            })
        );
    }

    #[test]
    fn test_single_date_always_accepted() {
        let selection = DateSelection::day(may_first());
        assert_eq!(validate(selection, 7), Ok(selection));
        assert_eq!(validate(selection, 0), Ok(selection));
        assert_eq!(validate(selection, -3), Ok(selection));
    }

    #[test]
    fn test_partial_days_truncate_toward_zero() {
        let start = may_first().and_hms_opt(0, 0, 0).unwrap();
        // end-of-day on the 8th, the way range calendars report an end date
        let end = (may_first() + Duration::days(7))
            .and_hms_milli_opt(23, 59, 59, 999)
            .unwrap();

        let selection = DateSelection::Range { start, end };
        assert!(validate(selection, 7).is_ok());

        let too_far = DateSelection::Range {
            start,
            end: end + Duration::milliseconds(1),
        };
        assert!(matches!(
            validate(too_far, 7),
            Err(SelectionRejection::RangeTooLong { span_days: 8, .. })
        ));
    }

    #[test]
    fn test_same_day_range_is_accepted() {
        let selection = DateSelection::days(may_first(), may_first());
        assert!(validate(selection, 0).is_ok());
    }

    #[test]
    fn test_reversed_range_is_rejected() {
        let selection = DateSelection::days(may_first() + Duration::days(1), may_first());
        assert!(matches!(
            validate(selection, 7),
            Err(SelectionRejection::ReversedRange { .. })
        ));
    }

    #[test]
    fn test_policy_uses_configured_span() {
        let start = may_first();
        let selection = DateSelection::days(start, start + Duration::days(3));

        assert!(DateRangePolicy::default().validate(selection).is_ok());
        assert!(DateRangePolicy::new(2).validate(selection).is_err());
    }

    #[test]
    fn test_widget_emission_shapes() {
        let a = may_first().and_time(NaiveTime::MIN);
        let b = a + Duration::days(2);

        assert_eq!(
            DateSelection::try_from(&[a][..]),
            Ok(DateSelection::Single(a))
        );
        assert_eq!(
            DateSelection::try_from(&[a, b][..]),
            Ok(DateSelection::Range { start: a, end: b })
        );
        let nothing: &[NaiveDateTime] = &[];
        assert_eq!(DateSelection::try_from(nothing), Err(UnexpectedEmission(0)));
        assert_eq!(
            DateSelection::try_from(&[a, b, b][..]),
            Err(UnexpectedEmission(3))
        );
    }
}
