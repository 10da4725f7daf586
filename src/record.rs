//! Records as delivered by the biometrics API, already JSON-decoded.
//!
//! Field names follow the API's camelCase payloads. Conversions into chart
//! input drop anything the geometry cannot use: missing or non-finite
//! values and unparsable dates.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use log::trace;
use serde::Deserialize;

use crate::config::LayoutConfig;
use crate::error::{ChartError, Result};
use crate::range::{RangeBar, RangeKind, RangeSet, RangeView, ReferenceRange};

/// Parses an API date: RFC 3339, a naive ISO timestamp (taken as UTC) or a
/// plain `YYYY-MM-DD` date (midnight UTC).
///
/// ```
/// use bioscale::record::parse_date;
///
/// assert!(parse_date("2024-03-01").is_some());
/// assert!(parse_date("2024-03-01T10:30:00").is_some());
/// assert!(parse_date("2024-03-01T10:30:00.250+02:00").is_some());
/// assert!(parse_date("last tuesday").is_none());
/// ```
pub fn parse_date(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(date) = DateTime::parse_from_rfc3339(text) {
        return Some(date.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(date.and_utc());
    }
    if let Ok(date) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(date.and_utc());
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|date| date.and_utc())
}

/// Whole years between `dob` and `today`.
///
/// ```
/// use chrono::NaiveDate;
/// use bioscale::record::age_on;
///
/// let dob = NaiveDate::from_ymd_opt(1980, 6, 15).unwrap();
/// assert_eq!(age_on(dob, NaiveDate::from_ymd_opt(2024, 6, 14).unwrap()), 43);
/// assert_eq!(age_on(dob, NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()), 44);
/// ```
pub fn age_on(dob: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - dob.year();
    if (today.month(), today.day()) < (dob.month(), dob.day()) {
        age -= 1;
    }
    age
}

/// One point of a biomarker trend.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TrendPoint {
    pub date: String,
    pub value: Option<f64>,
}

impl TrendPoint {
    /// The usable `(date, value)` pair, if any.
    pub fn sample(&self) -> Option<(DateTime<Utc>, f64)> {
        let value = self.value.filter(|v| v.is_finite())?;
        let date = parse_date(&self.date)?;
        Some((date, value))
    }
}

/// One biological-age computation from the history endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    pub computed_at: String,
    pub model_name: String,
    pub bio_age_years: Option<f64>,
    pub age_gap: Option<f64>,
}

impl HistoryRecord {
    pub fn computed_at(&self) -> Option<DateTime<Utc>> {
        parse_date(&self.computed_at)
    }

    /// Chronological age at computation time, `bioAge - ageGap`.
    pub fn actual_age(&self) -> Option<f64> {
        let age = self.bio_age_years? - self.age_gap?;
        age.is_finite().then_some(age)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
struct Bounds {
    min: f64,
    max: f64,
}

/// One row of the reference-range comparison endpoint.
///
/// The range columns hold JSON documents such as `{"min": 70, "max": 100}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeComparison {
    pub name: String,
    pub value: Option<f64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub clinical_range: Option<String>,
    #[serde(default)]
    pub longevity_range: Option<String>,
}

impl RangeComparison {
    /// Decodes the range columns relevant to `view`.
    ///
    /// ```
    /// use bioscale::{RangeKind, RangeView, record::RangeComparison};
    ///
    /// let row: RangeComparison = serde_json::from_str(r#"{
    ///     "name": "Glucose", "value": 88.0, "status": "Normal",
    ///     "clinicalRange": "{\"min\": 74, \"max\": 106}",
    ///     "longevityRange": "{\"min\": 75, \"max\": 90}"
    /// }"#).unwrap();
    ///
    /// let ranges = row.ranges(RangeView::Clinical).unwrap();
    /// assert_eq!(ranges.get(RangeKind::Clinical).unwrap().max, 106.0);
    /// assert!(ranges.get(RangeKind::Longevity).is_none());
    /// ```
    pub fn ranges(&self, view: RangeView) -> Result<RangeSet> {
        let columns = [
            (RangeKind::Clinical, &self.clinical_range),
            (RangeKind::Longevity, &self.longevity_range),
        ];

        let mut ranges = Vec::with_capacity(columns.len());
        for (kind, column) in columns {
            if !view.required().contains(&kind) {
                continue;
            }
            if let Some(bounds) = decode_bounds(column.as_deref())? {
                ranges.push(ReferenceRange::new(kind, bounds.min, bounds.max));
            }
        }
        Ok(RangeSet::new(ranges))
    }

    /// Range bar for this row under `view`.
    pub fn bar(&self, view: RangeView, config: &LayoutConfig) -> Result<RangeBar> {
        RangeBar::compute(self.value, &self.ranges(view)?, view, config)
    }
}

fn decode_bounds(column: Option<&str>) -> Result<Option<Bounds>> {
    let Some(text) = column.map(str::trim) else {
        return Ok(None);
    };
    if text.is_empty() || text == "null" {
        return Ok(None);
    }
    Ok(serde_json::from_str(text)?)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum Sex {
    #[serde(rename = "M", alias = "Male")]
    Male,
    #[serde(rename = "F", alias = "Female")]
    Female,
    #[serde(rename = "All")]
    All,
}

/// One row of a biomarker's reference-range catalog.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeRecord {
    pub biomarker_id: u32,
    pub range_type: RangeKind,
    pub sex: Sex,
    pub age_min: u32,
    pub age_max: u32,
    pub min_val: f64,
    pub max_val: f64,
}

impl RangeRecord {
    fn applies_to(&self, biomarker_id: u32, kind: RangeKind, sex: Sex, age: u32) -> bool {
        self.biomarker_id == biomarker_id
            && self.range_type == kind
            && (self.sex == sex || self.sex == Sex::All)
            && (self.age_min..=self.age_max).contains(&age)
    }
}

/// Picks the catalog row applying to a person, preferring a sex-specific
/// row over one for `All`.
pub fn select_range(
    records: &[RangeRecord],
    biomarker_id: u32,
    kind: RangeKind,
    sex: Sex,
    age: u32,
) -> Option<ReferenceRange> {
    let mut candidates = records
        .iter()
        .filter(|record| record.applies_to(biomarker_id, kind, sex, age));

    let first = candidates.next()?;
    let chosen = if first.sex == Sex::All {
        candidates.find(|record| record.sex != Sex::All).unwrap_or(first)
    } else {
        first
    };

    trace!("biomarker {biomarker_id} {kind} range: {} - {}", chosen.min_val, chosen.max_val);
    Some(ReferenceRange::new(kind, chosen.min_val, chosen.max_val))
}

/// Every applicable range for a person, one per kind.
pub fn ranges_for(records: &[RangeRecord], biomarker_id: u32, sex: Sex, age: u32) -> RangeSet {
    RangeSet::new(
        [RangeKind::Clinical, RangeKind::Longevity]
            .into_iter()
            .filter_map(|kind| select_range(records, biomarker_id, kind, sex, age)),
    )
}

/// Decodes a JSON array of records.
pub fn from_json<T: for<'de> Deserialize<'de>>(text: &str) -> Result<Vec<T>> {
    serde_json::from_str(text).map_err(|err| ChartError::InvalidRecord(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(kind: RangeKind, sex: Sex, ages: (u32, u32), bounds: (f64, f64)) -> RangeRecord {
        RangeRecord {
            biomarker_id: 3,
            range_type: kind,
            sex,
            age_min: ages.0,
            age_max: ages.1,
            min_val: bounds.0,
            max_val: bounds.1,
        }
    }

    #[test]
    fn parses_python_isoformat() {
        let date = parse_date("2024-03-01T10:30:00.123456").unwrap();
        assert_eq!(date.timestamp_millis() % 1000, 123);
    }

    #[test]
    fn trend_point_drops_unusable_samples() {
        let ok = TrendPoint {
            date: "2024-01-02".into(),
            value: Some(5.5),
        };
        let missing = TrendPoint {
            date: "2024-01-02".into(),
            value: None,
        };
        let bad_date = TrendPoint {
            date: "02/01/2024".into(),
            value: Some(5.5),
        };
        let nan = TrendPoint {
            date: "2024-01-02".into(),
            value: Some(f64::NAN),
        };

        assert!(ok.sample().is_some());
        assert!(missing.sample().is_none());
        assert!(bad_date.sample().is_none());
        assert!(nan.sample().is_none());
    }

    #[test]
    fn history_record_decodes_camel_case() {
        let records: Vec<HistoryRecord> = from_json(
            r#"[{"computedAt": "2024-02-01T08:00:00", "modelName": "Phenotypic Age",
                 "bioAgeYears": 41.5, "ageGap": -2.5}]"#,
        )
        .unwrap();

        assert_eq!(records[0].model_name, "Phenotypic Age");
        assert_eq!(records[0].actual_age(), Some(44.0));
        assert!(records[0].computed_at().is_some());
    }

    #[test]
    fn malformed_records_are_invalid() {
        let result: Result<Vec<HistoryRecord>> = from_json("[{}]");
        assert!(matches!(result, Err(ChartError::InvalidRecord(_))));
    }

    #[test]
    fn comparison_ignores_null_columns() {
        let row = RangeComparison {
            name: "CRP".into(),
            value: Some(1.2),
            status: None,
            clinical_range: Some("{\"min\": 0.0, \"max\": 3.0}".into()),
            longevity_range: Some("null".into()),
        };

        let ranges = row.ranges(RangeView::Both).unwrap();
        assert!(ranges.get(RangeKind::Clinical).is_some());
        assert!(ranges.active(RangeView::Both).is_err());
    }

    #[test]
    fn comparison_with_broken_json_fails() {
        let row = RangeComparison {
            name: "CRP".into(),
            value: None,
            status: None,
            clinical_range: Some("{min: 0".into()),
            longevity_range: None,
        };

        assert!(matches!(row.ranges(RangeView::Clinical), Err(ChartError::Json(_))));
        // The broken column is not consulted for a longevity-only view.
        assert!(row.ranges(RangeView::Longevity).unwrap().is_empty());
    }

    #[test]
    fn select_prefers_sex_specific_rows() {
        let records = [
            record(RangeKind::Clinical, Sex::All, (18, 120), (0.6, 1.3)),
            record(RangeKind::Clinical, Sex::Male, (18, 120), (0.74, 1.35)),
            record(RangeKind::Clinical, Sex::Female, (18, 120), (0.59, 1.04)),
        ];

        let male = select_range(&records, 3, RangeKind::Clinical, Sex::Male, 40).unwrap();
        assert_eq!((male.min, male.max), (0.74, 1.35));

        let female = select_range(&records, 3, RangeKind::Clinical, Sex::Female, 40).unwrap();
        assert_eq!((female.min, female.max), (0.59, 1.04));
    }

    #[test]
    fn select_respects_age_and_biomarker() {
        let records = [record(RangeKind::Longevity, Sex::All, (18, 60), (0.7, 1.0))];

        assert!(select_range(&records, 3, RangeKind::Longevity, Sex::Female, 61).is_none());
        assert!(select_range(&records, 4, RangeKind::Longevity, Sex::Female, 30).is_none());
        assert!(select_range(&records, 3, RangeKind::Clinical, Sex::Female, 30).is_none());

        let set = ranges_for(&records, 3, Sex::Male, 60);
        assert!(set.get(RangeKind::Longevity).is_some());
        assert!(set.get(RangeKind::Clinical).is_none());
    }

    #[test]
    fn range_record_decodes_api_payload() {
        let records: Vec<RangeRecord> = from_json(
            r#"[{"biomarkerId": 3, "rangeType": "clinical", "sex": "M",
                 "ageMin": 18, "ageMax": 120, "minVal": 0.74, "maxVal": 1.35}]"#,
        )
        .unwrap();

        assert_eq!(records[0].sex, Sex::Male);
        assert_eq!(records[0].range_type, RangeKind::Clinical);
    }

    #[test]
    fn age_before_and_after_birthday() {
        let dob = NaiveDate::from_ymd_opt(2000, 2, 29).unwrap();
        assert_eq!(age_on(dob, NaiveDate::from_ymd_opt(2021, 2, 28).unwrap()), 20);
        assert_eq!(age_on(dob, NaiveDate::from_ymd_opt(2021, 3, 1).unwrap()), 21);
    }
}
