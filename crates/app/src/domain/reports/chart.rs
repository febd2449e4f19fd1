//! Sales and profit chart series.

use std::collections::BTreeMap;

use jiff::{Span, Timestamp, civil::Date};

use crate::domain::reports::period::{ReportPeriod, ReportWindow};

/// One active sale as plotted on a chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SalePoint {
    pub total: u64,
    pub profit: i64,
    pub created_at: Timestamp,
}

/// Parallel label and value series.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub sales: Vec<u64>,
    pub profits: Vec<i64>,
}

impl ChartSeries {
    fn with_labels(labels: Vec<String>) -> Self {
        let len = labels.len();

        Self {
            labels,
            sales: vec![0; len],
            profits: vec![0; len],
        }
    }

    fn add(&mut self, index: usize, point: &SalePoint) {
        if let (Some(sales), Some(profit)) = (self.sales.get_mut(index), self.profits.get_mut(index))
        {
            *sales = sales.saturating_add(point.total);
            *profit = profit.saturating_add(point.profit);
        }
    }
}

/// Bucket sale points for the window's period.
///
/// - today: one bucket per hour that has sales
/// - week: seven days ending today, labelled by weekday
/// - month: four buckets covering the last thirty days, `Week 4` being the most recent
/// - year: twelve months ending this month, labelled by month
///
/// Points outside the plotted range are ignored.
#[must_use]
pub fn build_chart(window: &ReportWindow, points: &[SalePoint]) -> ChartSeries {
    let tz = window.now.time_zone();
    let today = window.now.date();

    let local_date = |point: &SalePoint| point.created_at.to_zoned(tz.clone()).date();

    match window.period {
        ReportPeriod::Today => {
            let mut hours: BTreeMap<i8, (u64, i64)> = BTreeMap::new();

            for point in points {
                let local = point.created_at.to_zoned(tz.clone());

                if local.date() != today {
                    continue;
                }

                let bucket = hours.entry(local.hour()).or_default();

                bucket.0 = bucket.0.saturating_add(point.total);
                bucket.1 = bucket.1.saturating_add(point.profit);
            }

            ChartSeries {
                labels: hours.keys().map(|hour| format!("{hour}:00")).collect(),
                sales: hours.values().map(|(sales, _)| *sales).collect(),
                profits: hours.values().map(|(_, profit)| *profit).collect(),
            }
        }
        ReportPeriod::Week => {
            let labels = (0..7)
                .rev()
                .map(|days_ago| {
                    today
                        .checked_sub(Span::new().days(days_ago))
                        .map(|date| date.strftime("%a").to_string())
                        .unwrap_or_default()
                })
                .collect();

            let mut series = ChartSeries::with_labels(labels);

            for point in points {
                if let Some(days_ago) = days_between(local_date(point), today)
                    && days_ago < 7
                {
                    series.add(6 - days_ago, point);
                }
            }

            series
        }
        ReportPeriod::Month => {
            let labels = (1..=4).map(|week| format!("Week {week}")).collect();

            let mut series = ChartSeries::with_labels(labels);

            for point in points {
                if let Some(days_ago) = days_between(local_date(point), today)
                    && days_ago < 30
                {
                    series.add(3 - (days_ago / 7).min(3), point);
                }
            }

            series
        }
        ReportPeriod::Year => {
            let this_month = today.first_of_month();

            let labels = (0..12)
                .rev()
                .map(|months_ago| {
                    this_month
                        .checked_sub(Span::new().months(months_ago))
                        .map(|date| date.strftime("%b").to_string())
                        .unwrap_or_default()
                })
                .collect();

            let mut series = ChartSeries::with_labels(labels);

            for point in points {
                if let Some(months_ago) = months_between(local_date(point), today)
                    && months_ago < 12
                {
                    series.add(11 - months_ago, point);
                }
            }

            series
        }
    }
}

/// Whole calendar days from `earlier` to `later`, `None` when `earlier` is in the future.
fn days_between(earlier: Date, later: Date) -> Option<usize> {
    let days = later.since(earlier).ok()?.get_days();

    usize::try_from(days).ok()
}

/// Calendar months from `earlier` to `later`, `None` when `earlier` is in the future.
fn months_between(earlier: Date, later: Date) -> Option<usize> {
    let months = (i32::from(later.year()) - i32::from(earlier.year())) * 12
        + (i32::from(later.month()) - i32::from(earlier.month()));

    usize::try_from(months).ok()
}

#[cfg(test)]
mod tests {
    use jiff::{Zoned, civil::date, tz::TimeZone};
    use testresult::TestResult;

    use super::*;

    fn window(period: ReportPeriod) -> Result<ReportWindow, jiff::Error> {
        // Thursday afternoon.
        let now: Zoned = date(2026, 3, 12).at(15, 30, 0, 0).to_zoned(TimeZone::UTC)?;

        ReportWindow::new(period, now)
    }

    fn point(at: Date, hour: i8, total: u64, profit: i64) -> Result<SalePoint, jiff::Error> {
        Ok(SalePoint {
            total,
            profit,
            created_at: at.at(hour, 0, 0, 0).to_zoned(TimeZone::UTC)?.timestamp(),
        })
    }

    #[test]
    fn today_has_one_point_per_active_hour() -> TestResult {
        let today = date(2026, 3, 12);

        let points = [
            point(today, 9, 100, 20)?,
            point(today, 9, 50, 10)?,
            point(today, 14, 300, -5)?,
            point(date(2026, 3, 11), 23, 999, 999)?,
        ];

        let chart = build_chart(&window(ReportPeriod::Today)?, &points);

        assert_eq!(chart.labels, vec!["9:00", "14:00"]);
        assert_eq!(chart.sales, vec![150, 300]);
        assert_eq!(chart.profits, vec![30, -5]);

        Ok(())
    }

    #[test]
    fn today_without_sales_is_empty() -> TestResult {
        let chart = build_chart(&window(ReportPeriod::Today)?, &[]);

        assert_eq!(chart, ChartSeries::default());

        Ok(())
    }

    #[test]
    fn week_has_seven_days_ending_today() -> TestResult {
        let points = [
            point(date(2026, 3, 12), 8, 100, 10)?,
            point(date(2026, 3, 6), 8, 40, 4)?,
            point(date(2026, 3, 5), 8, 999, 99)?,
        ];

        let chart = build_chart(&window(ReportPeriod::Week)?, &points);

        assert_eq!(
            chart.labels,
            vec!["Fri", "Sat", "Sun", "Mon", "Tue", "Wed", "Thu"]
        );
        assert_eq!(chart.sales, vec![40, 0, 0, 0, 0, 0, 100]);
        assert_eq!(chart.profits, vec![4, 0, 0, 0, 0, 0, 10]);

        Ok(())
    }

    #[test]
    fn month_groups_last_thirty_days_by_week() -> TestResult {
        let points = [
            point(date(2026, 3, 12), 8, 10, 1)?,
            point(date(2026, 3, 5), 8, 20, 2)?,
            point(date(2026, 2, 11), 8, 30, 3)?,
            point(date(2026, 2, 10), 8, 999, 99)?,
        ];

        let chart = build_chart(&window(ReportPeriod::Month)?, &points);

        assert_eq!(chart.labels, vec!["Week 1", "Week 2", "Week 3", "Week 4"]);
        assert_eq!(chart.sales, vec![30, 0, 20, 10]);

        Ok(())
    }

    #[test]
    fn year_has_twelve_months_ending_this_month() -> TestResult {
        let points = [
            point(date(2026, 3, 1), 8, 10, 1)?,
            point(date(2025, 4, 30), 8, 20, 2)?,
            point(date(2025, 3, 31), 8, 999, 99)?,
        ];

        let chart = build_chart(&window(ReportPeriod::Year)?, &points);

        assert_eq!(chart.labels.first().map(String::as_str), Some("Apr"));
        assert_eq!(chart.labels.last().map(String::as_str), Some("Mar"));
        assert_eq!(chart.labels.len(), 12);
        assert_eq!(chart.sales.first(), Some(&20));
        assert_eq!(chart.sales.last(), Some(&10));
        assert_eq!(chart.sales.iter().sum::<u64>(), 30);

        Ok(())
    }
}
