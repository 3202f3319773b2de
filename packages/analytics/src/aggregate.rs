//! Time-bucketed aggregations.
//!
//! [`fatalities_by_date`] and [`month_histogram`] run over a filtered
//! subset; [`monthly_counts`] runs over the full collection and feeds the
//! forecast.

use std::collections::BTreeMap;

use avy_dashboard_analytics_models::{FatalityPoint, MonthHistogramBucket, MonthlyCount};
use avy_dashboard_incident_models::Incident;
use chrono::{Datelike as _, Months, NaiveDate};

/// Sums `Killed` per calendar date, sorted by date ascending.
#[must_use]
pub fn fatalities_by_date<'a, I>(incidents: I) -> Vec<FatalityPoint>
where
    I: IntoIterator<Item = &'a Incident>,
{
    let mut totals: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    for incident in incidents {
        *totals.entry(incident.date).or_default() += u64::from(incident.killed);
    }

    totals
        .into_iter()
        .map(|(date, killed)| FatalityPoint { date, killed })
        .collect()
}

/// Counts incidents per month of the year (1-12).
///
/// Always returns twelve buckets in month order; months without incidents
/// have a zero count. Incidents with an out-of-range month are ignored.
#[must_use]
pub fn month_histogram<'a, I>(incidents: I) -> Vec<MonthHistogramBucket>
where
    I: IntoIterator<Item = &'a Incident>,
{
    let mut counts = [0u64; 12];
    for incident in incidents {
        if let Some(slot) = usize::from(incident.month)
            .checked_sub(1)
            .and_then(|idx| counts.get_mut(idx))
        {
            *slot += 1;
        }
    }

    (1u8..=12)
        .zip(counts)
        .map(|(month, count)| MonthHistogramBucket { month, count })
        .collect()
}

/// Counts incidents per calendar month, labelled by the month's last day.
///
/// Every month from the earliest to the latest incident gets a bucket;
/// months with no incidents are filled with a zero count so the series has
/// a regular monthly step.
#[must_use]
pub fn monthly_counts(incidents: &[Incident]) -> Vec<MonthlyCount> {
    let mut counts: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    for incident in incidents {
        *counts.entry(month_end(incident.date)).or_default() += 1;
    }

    let (Some(first), Some(last)) = (
        counts.keys().next().copied(),
        counts.keys().next_back().copied(),
    ) else {
        return Vec::new();
    };

    let mut result = Vec::new();
    let mut bucket = first;
    while bucket <= last {
        result.push(MonthlyCount {
            date: bucket,
            avalanche_count: counts.get(&bucket).copied().unwrap_or(0),
        });
        let Some(next) = next_month_end(bucket) else {
            break;
        };
        bucket = next;
    }

    log::debug!(
        "Bucketed {} incidents into {} months ({first} to {last})",
        incidents.len(),
        result.len()
    );

    result
}

/// Returns the last day of `date`'s month.
#[must_use]
pub fn month_end(date: NaiveDate) -> NaiveDate {
    date.with_day(1)
        .and_then(|first| first.checked_add_months(Months::new(1)))
        .and_then(|next_first| next_first.pred_opt())
        .unwrap_or(date)
}

/// Returns the last day of the month following `date`'s month.
#[must_use]
pub fn next_month_end(date: NaiveDate) -> Option<NaiveDate> {
    date.with_day(1)
        .and_then(|first| first.checked_add_months(Months::new(1)))
        .map(month_end)
}

#[cfg(test)]
mod tests {
    use avy_dashboard_incident_models::Coordinates;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn incident(date: NaiveDate, killed: u32) -> Incident {
        Incident::new(
            date,
            "Skiing",
            "CO",
            "Red Mountain Pass",
            Coordinates::new(37.9, -107.71),
            killed,
        )
    }

    #[test]
    fn single_skiing_incident_time_series() {
        let incidents = [incident(date(2020, 1, 5), 1)];
        assert_eq!(
            fatalities_by_date(&incidents),
            vec![FatalityPoint {
                date: date(2020, 1, 5),
                killed: 1
            }]
        );
    }

    #[test]
    fn fatalities_are_summed_per_date_and_sorted() {
        let incidents = [
            incident(date(2020, 3, 2), 2),
            incident(date(2020, 1, 5), 1),
            incident(date(2020, 3, 2), 3),
            incident(date(2020, 2, 9), 0),
        ];
        let series = fatalities_by_date(&incidents);

        assert_eq!(
            series,
            vec![
                FatalityPoint {
                    date: date(2020, 1, 5),
                    killed: 1
                },
                FatalityPoint {
                    date: date(2020, 2, 9),
                    killed: 0
                },
                FatalityPoint {
                    date: date(2020, 3, 2),
                    killed: 5
                },
            ]
        );
        assert!(series.windows(2).all(|w| w[0].date < w[1].date));
    }

    #[test]
    fn empty_input_yields_empty_series() {
        assert!(fatalities_by_date(std::iter::empty::<&Incident>()).is_empty());
        assert!(monthly_counts(&[]).is_empty());
    }

    #[test]
    fn histogram_has_all_twelve_months() {
        let incidents = [
            incident(date(2020, 1, 5), 1),
            incident(date(2021, 1, 9), 1),
            incident(date(2020, 12, 24), 1),
        ];
        let histogram = month_histogram(&incidents);

        assert_eq!(histogram.len(), 12);
        assert_eq!(histogram[0], MonthHistogramBucket { month: 1, count: 2 });
        assert_eq!(histogram[11], MonthHistogramBucket { month: 12, count: 1 });
        assert_eq!(histogram.iter().map(|b| b.count).sum::<u64>(), 3);
    }

    #[test]
    fn monthly_counts_backfill_empty_months() {
        let incidents = [
            incident(date(2020, 1, 5), 1),
            incident(date(2020, 1, 20), 0),
            incident(date(2020, 4, 2), 1),
        ];
        let counts = monthly_counts(&incidents);

        let expected: Vec<(NaiveDate, u64)> = vec![
            (date(2020, 1, 31), 2),
            (date(2020, 2, 29), 0),
            (date(2020, 3, 31), 0),
            (date(2020, 4, 30), 1),
        ];
        let actual: Vec<(NaiveDate, u64)> = counts
            .iter()
            .map(|c| (c.date, c.avalanche_count))
            .collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn monthly_counts_span_year_boundary() {
        let incidents = [
            incident(date(2020, 12, 31), 1),
            incident(date(2021, 2, 1), 1),
        ];
        let dates: Vec<NaiveDate> = monthly_counts(&incidents).iter().map(|c| c.date).collect();
        assert_eq!(
            dates,
            vec![date(2020, 12, 31), date(2021, 1, 31), date(2021, 2, 28)]
        );
    }

    #[test]
    fn month_end_handles_leap_years_and_december() {
        assert_eq!(month_end(date(2024, 2, 10)), date(2024, 2, 29));
        assert_eq!(month_end(date(2023, 2, 10)), date(2023, 2, 28));
        assert_eq!(month_end(date(2022, 12, 1)), date(2022, 12, 31));
        assert_eq!(next_month_end(date(2022, 12, 31)), Some(date(2023, 1, 31)));
        assert_eq!(next_month_end(date(2022, 1, 31)), Some(date(2022, 2, 28)));
    }
}
