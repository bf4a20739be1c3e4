//! Daily forecast sampling
//!
//! Reduces a 3-hourly forecast to one representative temperature per local
//! calendar day: the sample whose local hour is closest to noon. The result
//! feeds the 5-day chart on the dashboard.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, Timelike};
use serde::{Deserialize, Serialize};

use crate::data::ForecastEntry;

/// Maximum number of days kept for the forecast chart
pub const MAX_DAYS: usize = 5;

/// Local hour the sampler aims for
const NOON_HOUR: u32 = 12;

/// Weekday abbreviation + zero-padded day of month, e.g. "Mon 05"
const LABEL_FORMAT: &str = "%a %d";

/// The representative forecast sample chosen for one local calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySample {
    /// Calendar date in the forecast location's local time
    pub local_date: NaiveDate,
    /// Short label for the chart axis
    pub label: String,
    /// Temperature in Celsius, rounded to one decimal place
    pub temperature: f64,
    /// Hours between the sample's local hour and noon
    pub noon_distance_hours: u32,
}

/// Chart-ready series: index-aligned labels and temperatures
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DailySeries {
    pub labels: Vec<String>,
    pub temperatures: Vec<f64>,
}

impl DailySeries {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Returns (min, max) temperature, or `None` for an empty series
    pub fn temperature_range(&self) -> Option<(f64, f64)> {
        let first = *self.temperatures.first()?;
        Some(
            self.temperatures
                .iter()
                .fold((first, first), |(lo, hi), t| (lo.min(*t), hi.max(*t))),
        )
    }
}

impl From<&[DailySample]> for DailySeries {
    fn from(samples: &[DailySample]) -> Self {
        Self {
            labels: samples.iter().map(|s| s.label.clone()).collect(),
            temperatures: samples.iter().map(|s| s.temperature).collect(),
        }
    }
}

/// Best entry seen so far for a date
struct Candidate {
    local: NaiveDateTime,
    temperature: f64,
    score: u32,
}

/// Shifts a UTC epoch timestamp into local wall-clock time.
///
/// Returns `None` when either the timestamp or the shifted result falls
/// outside the representable date range.
pub fn local_datetime(timestamp_utc: i64, tz_offset_seconds: i64) -> Option<NaiveDateTime> {
    let utc = DateTime::from_timestamp(timestamp_utc, 0)?.naive_utc();
    let offset = TimeDelta::try_seconds(tz_offset_seconds)?;
    utc.checked_add_signed(offset)
}

/// Absolute distance in hours between `hour` and noon
pub fn noon_distance(hour: u32) -> u32 {
    hour.abs_diff(NOON_HOUR)
}

/// Selects one sample per local calendar day, closest to local noon.
///
/// A stored candidate is only replaced by a strictly closer entry, so on equal
/// distance the entry that came first in `entries` wins. That holds for any
/// input order, not only chronological input.
///
/// The result is sorted by date and holds at most [`MAX_DAYS`] samples. An
/// empty result means no usable data and is for the caller to report.
pub fn select_daily_samples(entries: &[ForecastEntry], tz_offset_seconds: i64) -> Vec<DailySample> {
    let mut by_date: BTreeMap<NaiveDate, Candidate> = BTreeMap::new();

    for entry in entries {
        let Some(local) = local_datetime(entry.timestamp_utc, tz_offset_seconds) else {
            continue;
        };

        let candidate = Candidate {
            local,
            temperature: entry.temperature,
            score: noon_distance(local.hour()),
        };

        match by_date.entry(local.date()) {
            Entry::Vacant(slot) => {
                slot.insert(candidate);
            }
            Entry::Occupied(mut slot) => {
                if candidate.score < slot.get().score {
                    slot.insert(candidate);
                }
            }
        }
    }

    by_date
        .into_iter()
        .take(MAX_DAYS)
        .map(|(local_date, candidate)| DailySample {
            local_date,
            label: candidate.local.format(LABEL_FORMAT).to_string(),
            temperature: round_to_tenth(candidate.temperature),
            noon_distance_hours: candidate.score,
        })
        .collect()
}

/// Rounds to one decimal place based on the exact stored value
///
/// Scaling by ten first would round twice: 0.35 is stored as 0.34999...
/// but `0.35 * 10.0` is exactly 3.5.
fn round_to_tenth(value: f64) -> f64 {
    format!("{:.1}", value).parse().unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    const OFFSET_VANCOUVER: i64 = -25200;

    /// Builds an entry whose local time is `date` at `hour:minute` for `offset`
    fn entry_at(date: NaiveDate, hour: u32, minute: u32, offset: i64, temperature: f64) -> ForecastEntry {
        let local = date.and_hms_opt(hour, minute, 0).unwrap();
        ForecastEntry {
            timestamp_utc: local.and_utc().timestamp() - offset,
            temperature,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// A full 3-hourly forecast covering `days` local days
    fn three_hourly(start: NaiveDate, days: u32, offset: i64) -> Vec<ForecastEntry> {
        let mut entries = Vec::new();
        for day in 0..days {
            let d = start + TimeDelta::days(day as i64);
            for hour in (0..24).step_by(3) {
                entries.push(entry_at(d, hour, 0, offset, day as f64 * 10.0 + hour as f64));
            }
        }
        entries
    }

    #[test]
    fn test_empty_input_gives_empty_output() {
        assert!(select_daily_samples(&[], 0).is_empty());
        assert!(select_daily_samples(&[], OFFSET_VANCOUVER).is_empty());
    }

    #[test]
    fn test_noon_entry_beats_morning_and_afternoon() {
        let d = date(2024, 7, 15);
        let entries = vec![
            entry_at(d, 9, 0, 0, 10.0),
            entry_at(d, 12, 0, 0, 12.34),
            entry_at(d, 15, 0, 0, 14.0),
        ];

        let samples = select_daily_samples(&entries, 0);

        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].local_date, d);
        assert!((samples[0].temperature - 12.3).abs() < 1e-9);
        assert_eq!(samples[0].noon_distance_hours, 0);
    }

    #[test]
    fn test_tie_keeps_first_entry_in_input_order() {
        let d = date(2024, 7, 15);
        let entries = vec![entry_at(d, 11, 0, 0, 18.0), entry_at(d, 13, 0, 0, 21.0)];

        let samples = select_daily_samples(&entries, 0);

        assert_eq!(samples.len(), 1);
        assert!((samples[0].temperature - 18.0).abs() < 1e-9);
        assert_eq!(samples[0].noon_distance_hours, 1);
    }

    #[test]
    fn test_tie_follows_input_order_not_time_of_day() {
        let d = date(2024, 7, 15);
        let entries = vec![entry_at(d, 13, 0, 0, 21.0), entry_at(d, 11, 0, 0, 18.0)];

        let samples = select_daily_samples(&entries, 0);

        assert!((samples[0].temperature - 21.0).abs() < 1e-9);
    }

    #[test]
    fn test_seven_days_truncated_to_first_five() {
        let start = date(2024, 7, 15);
        let entries = three_hourly(start, 7, 0);

        let samples = select_daily_samples(&entries, 0);

        assert_eq!(samples.len(), MAX_DAYS);
        for (i, sample) in samples.iter().enumerate() {
            assert_eq!(sample.local_date, start + TimeDelta::days(i as i64));
            assert_eq!(sample.noon_distance_hours, 0);
            assert!((sample.temperature - (i as f64 * 10.0 + 12.0)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_positive_offset_crosses_midnight_forward() {
        // 2024-07-15 23:30 UTC is 2024-07-16 02:30 at UTC+3
        let utc = date(2024, 7, 15).and_hms_opt(23, 30, 0).unwrap().and_utc();
        let entries = vec![ForecastEntry {
            timestamp_utc: utc.timestamp(),
            temperature: 7.0,
        }];

        let samples = select_daily_samples(&entries, 3 * 3600);

        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].local_date, date(2024, 7, 16));
        assert_eq!(samples[0].label, "Tue 16");
        assert_eq!(samples[0].noon_distance_hours, 10);
    }

    #[test]
    fn test_negative_offset_crosses_midnight_backward() {
        // 2024-07-16 03:00 UTC is 2024-07-15 20:00 in Vancouver (UTC-7)
        let utc = date(2024, 7, 16).and_hms_opt(3, 0, 0).unwrap().and_utc();
        let entries = vec![ForecastEntry {
            timestamp_utc: utc.timestamp(),
            temperature: 16.0,
        }];

        let samples = select_daily_samples(&entries, OFFSET_VANCOUVER);

        assert_eq!(samples[0].local_date, date(2024, 7, 15));
        assert_eq!(samples[0].noon_distance_hours, 8);
    }

    #[test]
    fn test_score_uses_local_hour_only() {
        let d = date(2024, 7, 15);
        // 11:59 has hour 11 (distance 1); 12:59 has hour 12 (distance 0)
        let entries = vec![entry_at(d, 11, 59, 0, 1.0), entry_at(d, 12, 59, 0, 2.0)];

        let samples = select_daily_samples(&entries, 0);

        assert!((samples[0].temperature - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_unsorted_input_produces_sorted_output() {
        let mut entries = three_hourly(date(2024, 7, 15), 4, OFFSET_VANCOUVER);
        entries.reverse();

        let samples = select_daily_samples(&entries, OFFSET_VANCOUVER);

        assert_eq!(samples.len(), 4);
        assert!(samples.windows(2).all(|w| w[0].local_date < w[1].local_date));
    }

    #[test]
    fn test_label_format() {
        let entries = vec![entry_at(date(2024, 7, 5), 12, 0, 0, 20.0)];
        let samples = select_daily_samples(&entries, 0);
        assert_eq!(samples[0].label, "Fri 05");
    }

    #[test]
    fn test_temperature_rounding() {
        assert!((round_to_tenth(12.34) - 12.3).abs() < 1e-9);
        assert!((round_to_tenth(12.36) - 12.4).abs() < 1e-9);
        assert!((round_to_tenth(-3.46) - (-3.5)).abs() < 1e-9);
        assert!((round_to_tenth(0.0)).abs() < 1e-9);
    }

    #[test]
    fn test_rounding_uses_stored_value_not_scaled_value() {
        // Both are stored slightly below the decimal halfway point
        assert_eq!(round_to_tenth(0.35), 0.3);
        assert_eq!(round_to_tenth(1.15), 1.1);
        assert_eq!(round_to_tenth(-1.15), -1.1);
        // Stored slightly above
        assert_eq!(round_to_tenth(0.45), 0.5);
    }

    #[test]
    fn test_unrepresentable_offset_yields_no_samples() {
        let entries = vec![entry_at(date(2024, 7, 15), 12, 0, 0, 20.0)];
        assert!(select_daily_samples(&entries, i64::MAX).is_empty());
        assert!(select_daily_samples(&entries, i64::MIN).is_empty());
    }

    #[test]
    fn test_large_offset_is_applied_without_special_casing() {
        // Two days ahead: no range check on the offset
        let entries = vec![entry_at(date(2024, 7, 15), 12, 0, 0, 20.0)];
        let samples = select_daily_samples(&entries, 2 * 86_400);
        assert_eq!(samples[0].local_date, date(2024, 7, 17));
        assert_eq!(samples[0].noon_distance_hours, 0);
    }

    #[test]
    fn test_output_invariants_over_offsets_and_spans() {
        let offsets = [-43_200, -25_200, -16_200, 0, 3_600, 19_800, 20_700, 50_400];
        for offset in offsets {
            for days in 1..=7 {
                // Entries spaced 3h from an arbitrary UTC start, not aligned to local midnight
                let start = date(2024, 12, 30).and_hms_opt(1, 0, 0).unwrap().and_utc().timestamp();
                let entries: Vec<ForecastEntry> = (0..days * 8)
                    .map(|i| ForecastEntry {
                        timestamp_utc: start + i as i64 * 3 * 3600,
                        temperature: (i as f64 * 1.37) % 25.0 - 5.0,
                    })
                    .collect();

                let samples = select_daily_samples(&entries, offset);

                let mut distinct: Vec<NaiveDate> = entries
                    .iter()
                    .filter_map(|e| local_datetime(e.timestamp_utc, offset))
                    .map(|l| l.date())
                    .collect();
                distinct.sort();
                distinct.dedup();

                assert_eq!(samples.len(), distinct.len().min(MAX_DAYS));
                assert!(samples.windows(2).all(|w| w[0].local_date < w[1].local_date));

                for sample in &samples {
                    let group: Vec<(u32, f64)> = entries
                        .iter()
                        .filter_map(|e| {
                            let local = local_datetime(e.timestamp_utc, offset)?;
                            (local.date() == sample.local_date)
                                .then(|| (noon_distance(local.hour()), e.temperature))
                        })
                        .collect();
                    let best = group.iter().map(|(s, _)| *s).min().unwrap();
                    let first_best = group.iter().find(|(s, _)| *s == best).unwrap();

                    assert_eq!(sample.noon_distance_hours, best);
                    assert!((sample.temperature - round_to_tenth(first_best.1)).abs() < 1e-9);
                }
            }
        }
    }

    #[test]
    fn test_selection_is_deterministic() {
        let entries = three_hourly(date(2024, 3, 9), 6, 19_800);
        let first = select_daily_samples(&entries, 19_800);
        let second = select_daily_samples(&entries, 19_800);
        assert_eq!(first, second);
    }

    #[test]
    fn test_series_is_index_aligned() {
        let entries = three_hourly(date(2024, 7, 15), 3, 0);
        let samples = select_daily_samples(&entries, 0);
        let series = DailySeries::from(samples.as_slice());

        assert_eq!(series.len(), 3);
        assert_eq!(series.labels, vec!["Mon 15", "Tue 16", "Wed 17"]);
        assert_eq!(series.temperatures, vec![12.0, 22.0, 32.0]);
        assert_eq!(series.temperature_range(), Some((12.0, 32.0)));
    }

    #[test]
    fn test_empty_series() {
        let empty: &[DailySample] = &[];
        let series = DailySeries::from(empty);
        assert!(series.is_empty());
        assert_eq!(series.temperature_range(), None);
    }

    #[test]
    fn test_noon_distance() {
        assert_eq!(noon_distance(0), 12);
        assert_eq!(noon_distance(12), 0);
        assert_eq!(noon_distance(23), 11);
        assert_eq!(noon_distance(9), 3);
        assert_eq!(noon_distance(15), 3);
    }
}
