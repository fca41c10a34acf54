//! Scan history entries and the statistics derived from them.
//!
//! Day boundaries are taken in UTC.

use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use time::{Date, Duration, OffsetDateTime, UtcOffset};

use crate::{HealthScore, NutritionGrade, Product, UserId};

/// Number of scans per week that counts as 100% progress.
pub const WEEKLY_TARGET: u32 = 25;

const NOT_AVAILABLE: &str = "N/A";

/// One recorded scan.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScanEntry {
    /// User who scanned the product.
    pub user_id: UserId,
    /// Product barcode.
    pub barcode: String,
    /// Product name at scan time.
    pub product_name: Option<String>,
    /// Brand at scan time.
    pub brand: Option<String>,
    /// Image URL at scan time.
    pub image_url: Option<String>,
    /// Nutri-Score grade at scan time.
    pub nutrition_grade: Option<NutritionGrade>,
    /// NOVA group at scan time.
    pub nova_group: Option<u8>,
    /// Final (personalised when applicable) score.
    pub score: HealthScore,
    /// When the scan happened.
    #[cfg_attr(feature = "serde", serde(with = "time::serde::rfc3339"))]
    pub scanned_at: OffsetDateTime,
}

impl ScanEntry {
    /// Capture a scan of `product` with its final score.
    #[must_use]
    pub fn from_product(
        user_id: UserId,
        product: &Product,
        score: HealthScore,
        scanned_at: OffsetDateTime,
    ) -> Self {
        Self {
            user_id,
            barcode: product.code.clone(),
            product_name: product.name.clone(),
            brand: product.brand.clone(),
            image_url: product.image_url.clone(),
            nutrition_grade: product.record.nutrition_grade,
            nova_group: product.record.nova_group,
            score,
            scanned_at,
        }
    }

    fn utc_date(&self) -> Date {
        self.scanned_at.to_offset(UtcOffset::UTC).date()
    }
}

/// A labelled count in a distribution.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Bucket {
    /// Label, such as a grade letter or `N/A`.
    pub name: String,
    /// Number of scans in the bucket.
    pub value: u64,
}

impl Bucket {
    fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: 0,
        }
    }
}

/// Scan count for one day.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DayCount {
    /// Day label.
    pub day: String,
    /// Number of scans on that day.
    pub count: u64,
}

/// Summary over recent scans.
///
/// `total` is the all-time count supplied by the caller; every other field
/// is computed from the entries passed to [`HistoryStats::from_entries`],
/// which are normally the scans of the last seven days.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HistoryStats {
    /// All-time number of scans.
    pub total: u64,
    /// Mean score of the supplied entries, `0.0` when there are none.
    pub average_score: f64,
    /// Percentage of [`WEEKLY_TARGET`] reached, capped at 100.
    pub weekly_progress: u8,
    /// Seven daily buckets labelled `MM-DD`, oldest first, ending today.
    pub last_seven_days: Vec<DayCount>,
    /// Grade distribution: `A`–`E` then `N/A`.
    pub grades: Vec<Bucket>,
    /// NOVA distribution: `1`–`4` then `N/A`.
    pub nova: Vec<Bucket>,
}

impl HistoryStats {
    /// Compute statistics for `entries` relative to `now`.
    ///
    /// # Examples
    /// ```
    /// use prodhealth_core::HistoryStats;
    /// use time::macros::datetime;
    ///
    /// let stats = HistoryStats::from_entries(0, &[], datetime!(2026-03-10 12:00 UTC));
    /// assert_eq!(stats.average_score, 0.0);
    /// assert_eq!(stats.last_seven_days.len(), 7);
    /// assert_eq!(stats.last_seven_days.last().map(|d| d.day.as_str()), Some("03-10"));
    /// ```
    #[must_use]
    pub fn from_entries(total: u64, entries: &[ScanEntry], now: OffsetDateTime) -> Self {
        let (average_score, weekly_progress) = averages(entries);
        Self {
            total,
            average_score,
            weekly_progress,
            last_seven_days: last_seven_days(entries, now),
            grades: grade_distribution(entries),
            nova: nova_distribution(entries),
        }
    }
}

#[expect(
    clippy::float_arithmetic,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "progress is clamped into 0..=100 before the cast"
)]
fn averages(entries: &[ScanEntry]) -> (f64, u8) {
    let (sum, count) = entries
        .iter()
        .fold((0.0_f64, 0.0_f64), |(sum, count), entry| {
            (sum + entry.score.as_f64(), count + 1.0)
        });
    let average = if count > 0.0 { sum / count } else { 0.0 };
    let progress = (count / f64::from(WEEKLY_TARGET) * 100.0)
        .round()
        .clamp(0.0, 100.0);
    (average, progress as u8)
}

fn last_seven_days(entries: &[ScanEntry], now: OffsetDateTime) -> Vec<DayCount> {
    let today = now.to_offset(UtcOffset::UTC).date();
    let mut days: Vec<(Date, u64)> = (0..7_i64)
        .rev()
        .filter_map(|offset| today.checked_sub(Duration::days(offset)))
        .map(|date| (date, 0))
        .collect();
    for entry in entries {
        let date = entry.utc_date();
        if let Some((_, count)) = days.iter_mut().find(|(day, _)| *day == date) {
            *count += 1;
        }
    }
    days.into_iter()
        .map(|(date, count)| DayCount {
            day: format!("{:02}-{:02}", u8::from(date.month()), date.day()),
            count,
        })
        .collect()
}

fn increment(buckets: &mut [Bucket], name: &str) {
    if let Some(bucket) = buckets.iter_mut().find(|b| b.name == name) {
        bucket.value += 1;
    }
}

fn grade_distribution(entries: &[ScanEntry]) -> Vec<Bucket> {
    let mut buckets: Vec<Bucket> = NutritionGrade::ALL
        .iter()
        .map(|grade| Bucket::empty(grade.as_str()))
        .chain(std::iter::once(Bucket::empty(NOT_AVAILABLE)))
        .collect();
    for entry in entries {
        let name = entry.nutrition_grade.map_or(NOT_AVAILABLE, NutritionGrade::as_str);
        increment(&mut buckets, name);
    }
    buckets
}

fn nova_distribution(entries: &[ScanEntry]) -> Vec<Bucket> {
    let mut buckets: Vec<Bucket> = ["1", "2", "3", "4", NOT_AVAILABLE]
        .into_iter()
        .map(Bucket::empty)
        .collect();
    for entry in entries {
        let name = match entry.nova_group {
            Some(1) => "1",
            Some(2) => "2",
            Some(3) => "3",
            Some(4) => "4",
            _ => NOT_AVAILABLE,
        };
        increment(&mut buckets, name);
    }
    buckets
}

/// Count scans per UTC day, labelled `YYYY-MM-DD` in ascending order.
///
/// Days without scans are omitted.
#[must_use]
pub fn daily_series(entries: &[ScanEntry]) -> Vec<DayCount> {
    let mut counts: BTreeMap<Date, u64> = BTreeMap::new();
    for entry in entries {
        *counts.entry(entry.utc_date()).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(date, count)| DayCount {
            day: format!(
                "{:04}-{:02}-{:02}",
                date.year(),
                u8::from(date.month()),
                date.day()
            ),
            count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use time::macros::datetime;

    #[fixture]
    fn now() -> OffsetDateTime {
        datetime!(2026-03-10 12:00 UTC)
    }

    fn scan(score: u8, grade: Option<NutritionGrade>, nova: Option<u8>, at: OffsetDateTime) -> ScanEntry {
        ScanEntry {
            user_id: UserId::new("user-1").expect("valid user id"),
            barcode: "123".into(),
            product_name: None,
            brand: None,
            image_url: None,
            nutrition_grade: grade,
            nova_group: nova,
            score: HealthScore::new(score).expect("score in range"),
            scanned_at: at,
        }
    }

    fn values(buckets: &[Bucket]) -> Vec<(&str, u64)> {
        buckets.iter().map(|b| (b.name.as_str(), b.value)).collect()
    }

    #[rstest]
    fn empty_history_yields_zeroed_stats(now: OffsetDateTime) {
        let stats = HistoryStats::from_entries(0, &[], now);
        assert_eq!(stats.average_score.to_bits(), 0.0_f64.to_bits());
        assert_eq!(stats.weekly_progress, 0);
        assert!(stats.last_seven_days.iter().all(|d| d.count == 0));
        assert_eq!(
            stats.last_seven_days.first().map(|d| d.day.as_str()),
            Some("03-04")
        );
        assert!(stats.grades.iter().all(|b| b.value == 0));
        assert_eq!(stats.grades.len(), 6);
        assert_eq!(stats.nova.len(), 5);
    }

    #[rstest]
    fn averages_and_buckets_recent_scans(now: OffsetDateTime) {
        let entries = vec![
            scan(80, Some(NutritionGrade::A), Some(1), datetime!(2026-03-10 08:00 UTC)),
            scan(50, Some(NutritionGrade::D), Some(4), datetime!(2026-03-09 23:30 UTC)),
            scan(65, None, None, datetime!(2026-03-09 01:00 UTC)),
            scan(40, None, Some(7), datetime!(2026-03-01 10:00 UTC)),
        ];
        let stats = HistoryStats::from_entries(42, &entries, now);

        assert_eq!(stats.total, 42);
        assert_eq!(stats.average_score.to_bits(), 58.75_f64.to_bits());
        assert_eq!(stats.weekly_progress, 16);
        let last: Vec<_> = stats.last_seven_days.iter().map(|d| d.count).collect();
        assert_eq!(last, vec![0, 0, 0, 0, 0, 2, 1]);
        assert_eq!(
            values(&stats.grades),
            vec![("A", 1), ("B", 0), ("C", 0), ("D", 1), ("E", 0), ("N/A", 2)]
        );
        assert_eq!(
            values(&stats.nova),
            vec![("1", 1), ("2", 0), ("3", 0), ("4", 1), ("N/A", 2)]
        );
    }

    #[rstest]
    #[case(1, 4)]
    #[case(13, 52)]
    #[case(25, 100)]
    #[case(40, 100)]
    fn weekly_progress_caps_at_target(now: OffsetDateTime, #[case] scans: usize, #[case] expected: u8) {
        let entries: Vec<_> = (0..scans)
            .map(|_| scan(70, None, None, datetime!(2026-03-10 09:00 UTC)))
            .collect();
        assert_eq!(HistoryStats::from_entries(0, &entries, now).weekly_progress, expected);
    }

    #[test]
    fn daily_series_is_sorted_and_sparse() {
        let entries = vec![
            scan(70, None, None, datetime!(2026-03-10 09:00 UTC)),
            scan(70, None, None, datetime!(2025-12-31 23:59 UTC)),
            scan(70, None, None, datetime!(2026-03-10 18:00 UTC)),
            scan(70, None, None, datetime!(2026-03-11 01:00 +05:30)),
        ];
        let series = daily_series(&entries);
        let pairs: Vec<_> = series.iter().map(|d| (d.day.as_str(), d.count)).collect();
        assert_eq!(pairs, vec![("2025-12-31", 1), ("2026-03-10", 3)]);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn scan_entry_serialises_timestamp_as_rfc3339() {
        let entry = scan(70, Some(NutritionGrade::B), Some(2), datetime!(2026-03-10 09:00 UTC));
        let json = serde_json::to_value(&entry).expect("encode entry");
        assert_eq!(json["scanned_at"], "2026-03-10T09:00:00Z");
        assert_eq!(json["nutrition_grade"], "B");
        assert_eq!(json["score"], 70);
    }
}
