//! The admin module declares how questions are presented to administrators:
//! which fields are edited, listed, filtered and searched.
use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Question;

#[derive(Debug, PartialEq, Serialize)]
pub struct InlineAdmin {
    pub model: &'static str,
    pub style: &'static str,
    pub extra: usize,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct ModelAdmin {
    pub model: &'static str,
    pub fields: &'static [&'static str],
    pub list_display: &'static [&'static str],
    pub list_filter: &'static [&'static str],
    pub search_fields: &'static [&'static str],
    pub inlines: &'static [InlineAdmin],
}

pub const CHOICE_INLINE: InlineAdmin = InlineAdmin {
    model: "choice",
    style: "stacked",
    extra: 3,
};

pub const QUESTION_ADMIN: ModelAdmin = ModelAdmin {
    model: "question",
    fields: &["pub_date", "question_text"],
    list_display: &["question_text", "pub_date", "was_published_recently"],
    list_filter: &["pub_date"],
    search_fields: &["question_text"],
    inlines: &[CHOICE_INLINE],
};

/**
 * Buckets offered by the `pub_date` list filter
 */
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum DateFilter {
    AnyDate,
    Today,
    PastSevenDays,
    ThisMonth,
    ThisYear,
}

impl Default for DateFilter {
    fn default() -> Self {
        DateFilter::AnyDate
    }
}

fn midnight(date: NaiveDate) -> Option<DateTime<Utc>> {
    date.and_hms_opt(0, 0, 0).map(|naive| Utc.from_utc_datetime(&naive))
}

impl DateFilter {
    /**
     * Half-open `[start, end)` window for this bucket, in UTC calendar terms
     * relative to `now`. `None` means unbounded.
     */
    pub fn bounds(&self, now: DateTime<Utc>) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let today = now.date_naive();
        let start_of_today = midnight(today)?;
        let tomorrow = start_of_today + Duration::days(1);

        match self {
            DateFilter::AnyDate => None,
            DateFilter::Today => Some((start_of_today, tomorrow)),
            DateFilter::PastSevenDays => Some((start_of_today - Duration::days(7), tomorrow)),
            DateFilter::ThisMonth => {
                let first = NaiveDate::from_ymd_opt(today.year(), today.month(), 1)?;
                let next = if today.month() == 12 {
                    NaiveDate::from_ymd_opt(today.year() + 1, 1, 1)?
                } else {
                    NaiveDate::from_ymd_opt(today.year(), today.month() + 1, 1)?
                };
                Some((midnight(first)?, midnight(next)?))
            }
            DateFilter::ThisYear => {
                let first = NaiveDate::from_ymd_opt(today.year(), 1, 1)?;
                let next = NaiveDate::from_ymd_opt(today.year() + 1, 1, 1)?;
                Some((midnight(first)?, midnight(next)?))
            }
        }
    }
}

/**
 * Query string accepted by the changelist
 */
#[derive(Debug, Default, Deserialize)]
pub struct ChangeListQuery {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub pub_date: DateFilter,
}

impl ChangeListQuery {
    /**
     * Search term with surrounding whitespace removed, if anything remains
     */
    pub fn search(&self) -> Option<&str> {
        self.q
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
    }
}

/**
 * One changelist row, carrying exactly the `list_display` columns
 */
#[derive(Debug, PartialEq, Serialize)]
pub struct ChangeListRow {
    pub id: i32,
    pub question_text: String,
    pub pub_date: DateTime<Utc>,
    pub was_published_recently: bool,
}

impl ChangeListRow {
    pub fn from_question(question: Question, now: DateTime<Utc>) -> Self {
        Self {
            id: question.id,
            was_published_recently: question.was_published_recently(now),
            question_text: question.text,
            pub_date: question.publish_time,
        }
    }
}

/**
 * Case-insensitive substring match used by `search_fields`
 */
pub fn matches_search(question: &Question, term: &str) -> bool {
    question.text.to_lowercase().contains(&term.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2021, 12, 14, 18, 45, 0).unwrap()
    }

    #[test]
    fn question_admin_registration() {
        assert_eq!(QUESTION_ADMIN.fields, &["pub_date", "question_text"]);
        assert_eq!(QUESTION_ADMIN.inlines[0].extra, 3);
        assert!(QUESTION_ADMIN.list_display.contains(&"was_published_recently"));
    }

    #[test]
    fn any_date_is_unbounded() {
        assert_eq!(DateFilter::AnyDate.bounds(now()), None);
    }

    #[test]
    fn today_bounds() {
        let (start, end) = DateFilter::Today.bounds(now()).unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2021, 12, 14, 0, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2021, 12, 15, 0, 0, 0).unwrap());
    }

    #[test]
    fn past_seven_days_bounds() {
        let (start, end) = DateFilter::PastSevenDays.bounds(now()).unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2021, 12, 7, 0, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2021, 12, 15, 0, 0, 0).unwrap());
    }

    #[test]
    fn this_month_wraps_in_december() {
        let (start, end) = DateFilter::ThisMonth.bounds(now()).unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2021, 12, 1, 0, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn this_year_bounds() {
        let (start, end) = DateFilter::ThisYear.bounds(now()).unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn parse_changelist_query() {
        let query: ChangeListQuery = serde_qs::from_str("q=%20curso%20&pub_date=past_seven_days").unwrap();
        assert_eq!(query.search(), Some("curso"));
        assert_eq!(query.pub_date, DateFilter::PastSevenDays);

        let query: ChangeListQuery = serde_qs::from_str("").unwrap();
        assert_eq!(query.search(), None);
        assert_eq!(query.pub_date, DateFilter::AnyDate);
    }

    #[test]
    fn search_ignores_case() {
        let question = Question {
            id: 1,
            text: "Cuál es tu Curso favorito?".to_string(),
            publish_time: now(),
        };
        assert!(matches_search(&question, "curso"));
        assert!(!matches_search(&question, "django"));
    }

    #[test]
    fn changelist_row_flags_recent() {
        let question = Question {
            id: 7,
            text: "Recent".to_string(),
            publish_time: now() - Duration::hours(2),
        };
        let row = ChangeListRow::from_question(question, now());
        assert!(row.was_published_recently);
        assert_eq!(row.question_text, "Recent");
    }
}
