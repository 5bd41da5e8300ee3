use chrono::{Datelike, Local, Months, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// How an all-numeric `a/b/yyyy` date is read.
///
/// Either order falls back to the other when the leading field cannot be a
/// month (or day) respectively, e.g. `25/11/2023` is always 25 November.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum DateOrder {
    #[default]
    MonthFirst,
    DayFirst,
}

#[derive(Debug, Clone, Copy)]
enum DateShape {
    /// `12/Nov/2023`
    DayMonthName,
    /// `2023_11_12`
    YearMonthDay,
    /// `11/12/2023`, `11-12-23`
    Numeric,
}

struct DatePattern {
    label: &'static str,
    regex: Regex,
    shape: DateShape,
}

static DATE_PATTERNS: LazyLock<Vec<DatePattern>> = LazyLock::new(|| {
    [
        (
            "registration",
            r"Registration\s*:\s*(\d{2}/[A-Za-z]{3}/\d{4})",
            DateShape::DayMonthName,
        ),
        ("underscore", r"_(\d{4}_\d{2}_\d{2})_", DateShape::YearMonthDay),
        (
            "date label",
            r"Date\s*:\s*(\d{1,2}[-/]\d{1,2}[-/]\d{2,4})",
            DateShape::Numeric,
        ),
        (
            "date of report",
            r"Date\s*of\s*Report\s*:\s*(\d{1,2}[-/]\d{1,2}[-/]\d{2,4})",
            DateShape::Numeric,
        ),
    ]
    .into_iter()
    .map(|(label, pattern, shape)| DatePattern {
        label,
        regex: Regex::new(pattern).expect("date pattern literal is valid"),
        shape,
    })
    .collect()
});

/// Finds the report date in raw (un-normalized) text.
#[derive(Debug, Clone, Copy)]
pub struct DateExtractor {
    order: DateOrder,
    today: NaiveDate,
}

impl DateExtractor {
    pub fn new(order: DateOrder) -> Self {
        Self::with_today(order, Local::now().date_naive())
    }

    /// Pins "today", which anchors both the plausibility window and the
    /// two-digit year pivot.
    pub fn with_today(order: DateOrder, today: NaiveDate) -> Self {
        Self { order, today }
    }

    /// Tries each pattern in turn; a pattern whose date is unparsable or
    /// implausible hands over to the next one.
    pub fn extract(&self, text: &str) -> Option<NaiveDate> {
        for pattern in DATE_PATTERNS.iter() {
            let Some(caps) = pattern.regex.captures(text) else {
                continue;
            };
            let raw = &caps[1];

            let Some(date) = self.parse(raw, pattern.shape) else {
                tracing::debug!(pattern = pattern.label, raw, "Unparsable date");
                continue;
            };

            if self.is_plausible(date) {
                tracing::debug!(pattern = pattern.label, %date, "Report date found");
                return Some(date);
            }
            tracing::warn!(
                pattern = pattern.label,
                %date,
                "Date {} is outside the plausible range",
                date
            );
        }
        None
    }

    /// Not in the future and no more than ten years old.
    pub fn is_plausible(&self, date: NaiveDate) -> bool {
        let Some(earliest) = self.today.checked_sub_months(Months::new(12 * 10)) else {
            return false;
        };
        date <= self.today && date >= earliest
    }

    fn parse(&self, raw: &str, shape: DateShape) -> Option<NaiveDate> {
        let unified = raw.replace(['_', '-'], "/");
        match shape {
            DateShape::DayMonthName => NaiveDate::parse_from_str(&unified, "%d/%b/%Y").ok(),
            DateShape::YearMonthDay => NaiveDate::parse_from_str(&unified, "%Y/%m/%d").ok(),
            DateShape::Numeric => self.parse_numeric(&unified),
        }
    }

    fn parse_numeric(&self, unified: &str) -> Option<NaiveDate> {
        let mut fields = unified.split('/');
        let first: u32 = fields.next()?.parse().ok()?;
        let second: u32 = fields.next()?.parse().ok()?;
        let year_field = fields.next()?;
        let year = self.expand_year(year_field)?;

        let (month, day) = match self.order {
            DateOrder::MonthFirst if first > 12 => (second, first),
            DateOrder::MonthFirst => (first, second),
            DateOrder::DayFirst if second > 12 => (first, second),
            DateOrder::DayFirst => (second, first),
        };

        NaiveDate::from_ymd_opt(year, month, day)
    }

    /// Two-digit years land within fifty years of today.
    fn expand_year(&self, field: &str) -> Option<i32> {
        let year: i32 = field.parse().ok()?;
        if field.len() > 2 {
            return Some(year);
        }

        let this_year = self.today.year();
        let mut expanded = this_year - this_year % 100 + year;
        if expanded >= this_year + 50 {
            expanded -= 100;
        } else if expanded < this_year - 50 {
            expanded += 100;
        }
        Some(expanded)
    }
}
