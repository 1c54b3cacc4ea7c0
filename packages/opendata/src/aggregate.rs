//! Client-side aggregation of the raw feed into per-date buckets.

use chrono::{Datelike as _, NaiveDate, NaiveDateTime};
use strum_macros::{AsRefStr, Display, EnumString};

use crate::RawTheftRecord;

/// Severity tier of a per-date bucket, derived from its summed count.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, AsRefStr,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum SeverityTier {
    /// Fewer than 50 reported incidents.
    Low,
    /// 50 to 99 reported incidents.
    Medium,
    /// 100 or more reported incidents.
    High,
}

impl SeverityTier {
    /// Tiers a summed count: `High` >= 100, `Medium` 50-99, `Low` < 50.
    #[must_use]
    pub const fn for_count(count: i64) -> Self {
        if count >= 100 {
            Self::High
        } else if count >= 50 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

/// A per-date sum of officially reported incident counts.
///
/// Derived on every fetch, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportBucket {
    /// Short-formatted date used as the grouping key, `M/D/YYYY`.
    pub date: String,
    /// Summed `cantidad` across the municipality's rows for that date.
    pub count: i64,
}

impl ReportBucket {
    /// Severity tier derived from this bucket's count.
    #[must_use]
    pub const fn tier(&self) -> SeverityTier {
        SeverityTier::for_count(self.count)
    }
}

/// Groups the municipality's rows by date and sums their counts.
///
/// Output order is the first-seen order of distinct dates in the input,
/// not chronological. Rows for other municipalities, or with unparsable
/// dates or counts, are dropped (the latter with a warning).
#[must_use]
pub fn aggregate(records: &[RawTheftRecord], municipality: &str) -> Vec<ReportBucket> {
    let mut buckets: Vec<ReportBucket> = Vec::new();

    for record in records {
        if record.municipio != municipality {
            continue;
        }

        let Some(date) = parse_feed_date(&record.fecha_hecho) else {
            log::warn!("Skipping feed row with unparsable date: {:?}", record.fecha_hecho);
            continue;
        };
        let Ok(count) = record.cantidad.trim().parse::<i64>() else {
            log::warn!("Skipping feed row with unparsable count: {:?}", record.cantidad);
            continue;
        };

        let key = format_short_date(date);
        // Linear scan keeps first-seen ordering; distinct dates stay small
        // under the fixed 1000-row cap.
        match buckets.iter_mut().find(|bucket| bucket.date == key) {
            Some(bucket) => bucket.count += count,
            None => buckets.push(ReportBucket { date: key, count }),
        }
    }

    buckets
}

/// Parses an upstream date, with or without a time component.
fn parse_feed_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|dt| dt.date())
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
        .ok()
}

/// Formats a date as the unpadded `M/D/YYYY` grouping key.
fn format_short_date(date: NaiveDate) -> String {
    format!("{}/{}/{}", date.month(), date.day(), date.year())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(municipio: &str, fecha: &str, cantidad: &str) -> RawTheftRecord {
        RawTheftRecord {
            municipio: municipio.to_string(),
            fecha_hecho: fecha.to_string(),
            cantidad: cantidad.to_string(),
        }
    }

    #[test]
    fn sums_counts_per_date_and_filters_municipality() {
        let records = vec![
            row("BOGOTA D.C.", "2024-01-01", "60"),
            row("BOGOTA D.C.", "2024-01-01", "50"),
            row("OTHER", "2024-01-01", "10"),
        ];
        let buckets = aggregate(&records, "BOGOTA D.C.");
        assert_eq!(
            buckets,
            vec![ReportBucket {
                date: "1/1/2024".to_string(),
                count: 110,
            }]
        );
        assert_eq!(buckets[0].tier(), SeverityTier::High);
    }

    #[test]
    fn preserves_first_seen_date_order() {
        let records = vec![
            row("BOGOTA D.C.", "2024-03-15", "5"),
            row("BOGOTA D.C.", "2024-01-02", "7"),
            row("BOGOTA D.C.", "2024-03-15", "3"),
            row("BOGOTA D.C.", "2024-02-20", "1"),
        ];
        let buckets = aggregate(&records, "BOGOTA D.C.");
        let dates: Vec<&str> = buckets.iter().map(|b| b.date.as_str()).collect();
        assert_eq!(dates, ["3/15/2024", "1/2/2024", "2/20/2024"]);
        assert_eq!(buckets[0].count, 8);
    }

    #[test]
    fn parses_dates_with_time_component() {
        let records = vec![row("BOGOTA D.C.", "2024-01-01T00:00:00.000", "4")];
        let buckets = aggregate(&records, "BOGOTA D.C.");
        assert_eq!(buckets[0].date, "1/1/2024");
    }

    #[test]
    fn skips_rows_with_unparsable_fields() {
        let records = vec![
            row("BOGOTA D.C.", "not-a-date", "4"),
            row("BOGOTA D.C.", "2024-01-01", "many"),
            row("BOGOTA D.C.", "2024-01-01", "2"),
        ];
        let buckets = aggregate(&records, "BOGOTA D.C.");
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].count, 2);
    }

    #[test]
    fn empty_input_produces_no_buckets() {
        assert!(aggregate(&[], "BOGOTA D.C.").is_empty());
    }

    #[test]
    fn tier_boundaries() {
        assert_eq!(SeverityTier::for_count(49), SeverityTier::Low);
        assert_eq!(SeverityTier::for_count(50), SeverityTier::Medium);
        assert_eq!(SeverityTier::for_count(99), SeverityTier::Medium);
        assert_eq!(SeverityTier::for_count(100), SeverityTier::High);
    }
}
