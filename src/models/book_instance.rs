//! Book instance (loanable copy) model and related types

use chrono::{Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::{book::book_url, user::UserShort};

/// Availability of a copy, edited freely by staff
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LoanStatus {
    #[default]
    Maintenance,
    OnLoan,
    Available,
    Reserved,
}

impl LoanStatus {
    /// Single character storage code
    pub fn code(&self) -> &'static str {
        match self {
            LoanStatus::Maintenance => "m",
            LoanStatus::OnLoan => "o",
            LoanStatus::Available => "a",
            LoanStatus::Reserved => "r",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LoanStatus::Maintenance => "Maintenance",
            LoanStatus::OnLoan => "On loan",
            LoanStatus::Available => "Available",
            LoanStatus::Reserved => "Reserved",
        }
    }
}

impl std::fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for LoanStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "m" => Ok(LoanStatus::Maintenance),
            "o" => Ok(LoanStatus::OnLoan),
            "a" => Ok(LoanStatus::Available),
            "r" => Ok(LoanStatus::Reserved),
            other => Err(format!("Invalid loan status code: {}", other)),
        }
    }
}

// SQLx conversion for LoanStatus (stored as its one-letter code)
impl sqlx::Type<Postgres> for LoanStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<Postgres>>::compatible(ty)
    }
}

impl<'r> Decode<'r, Postgres> for LoanStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for LoanStatus {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <&str as Encode<Postgres>>::encode(self.code(), buf)
    }
}

/// Book instance row
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookInstance {
    /// Unique across the whole library
    pub id: Uuid,
    pub book_id: Option<i32>,
    pub imprint: String,
    pub due_back: Option<NaiveDate>,
    pub borrower_id: Option<i32>,
    pub status: LoanStatus,
}

/// True when a due date is set and lies strictly before `today`
pub fn is_overdue_on(due_back: Option<NaiveDate>, today: NaiveDate) -> bool {
    matches!(due_back, Some(due) if due < today)
}

/// Today's date as used for overdue checks and date filters
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

impl BookInstance {
    pub fn is_overdue_on(&self, today: NaiveDate) -> bool {
        is_overdue_on(self.due_back, today)
    }

    pub fn is_overdue(&self) -> bool {
        self.is_overdue_on(today())
    }
}

/// Book instance joined with the title of its book
#[derive(Debug, Clone, FromRow)]
pub struct BookInstanceRow {
    pub id: Uuid,
    pub book_id: Option<i32>,
    pub book_title: Option<String>,
    pub imprint: String,
    pub due_back: Option<NaiveDate>,
    pub borrower_id: Option<i32>,
    pub status: LoanStatus,
}

impl std::fmt::Display for BookInstanceRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.id, self.book_title.as_deref().unwrap_or("-"))
    }
}

/// Book instance list row (admin columns: status, due back, id)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookInstanceListEntry {
    pub id: Uuid,
    pub status: LoanStatus,
    pub status_label: String,
    pub due_back: Option<NaiveDate>,
    pub is_overdue: bool,
    pub imprint: String,
    pub book_id: Option<i32>,
    pub book_title: Option<String>,
    pub borrower_id: Option<i32>,
    /// "<id> (<book title>)"
    pub display: String,
}

impl BookInstanceListEntry {
    pub fn from_row(row: BookInstanceRow, today: NaiveDate) -> Self {
        Self {
            display: row.to_string(),
            status_label: row.status.label().to_string(),
            is_overdue: is_overdue_on(row.due_back, today),
            id: row.id,
            status: row.status,
            due_back: row.due_back,
            imprint: row.imprint,
            book_id: row.book_id,
            book_title: row.book_title,
            borrower_id: row.borrower_id,
        }
    }
}

/// Reference to the book a copy belongs to
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookRef {
    pub id: i32,
    pub title: String,
    pub url: String,
}

/// General fieldset of the instance edit form
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GeneralFieldset {
    pub book: Option<BookRef>,
    pub imprint: String,
    pub id: Uuid,
}

/// Availability fieldset of the instance edit form
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AvailabilityFieldset {
    pub status: LoanStatus,
    pub due_back: Option<NaiveDate>,
    pub borrower: Option<UserShort>,
}

/// Book instance detail grouped the way the edit form is laid out
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookInstanceDetail {
    pub general: GeneralFieldset,
    pub availability: AvailabilityFieldset,
    pub is_overdue: bool,
    pub display: String,
}

impl BookInstanceDetail {
    pub fn new(row: BookInstanceRow, borrower: Option<UserShort>, today: NaiveDate) -> Self {
        let display = row.to_string();
        let book = match (row.book_id, row.book_title) {
            (Some(id), Some(title)) => Some(BookRef {
                id,
                title,
                url: book_url(id),
            }),
            _ => None,
        };
        Self {
            is_overdue: is_overdue_on(row.due_back, today),
            display,
            general: GeneralFieldset {
                book,
                imprint: row.imprint,
                id: row.id,
            },
            availability: AvailabilityFieldset {
                status: row.status,
                due_back: row.due_back,
                borrower,
            },
        }
    }
}

/// Create or replace a book instance
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct BookInstanceInput {
    pub book_id: i32,
    #[validate(length(min = 1, max = 200, message = "Imprint must be 1-200 characters"))]
    pub imprint: String,
    pub due_back: Option<NaiveDate>,
    pub borrower_id: Option<i32>,
    /// Defaults to maintenance
    #[serde(default)]
    pub status: LoanStatus,
}

/// Inline instance form on a book: the book comes from the path
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct InlineBookInstanceInput {
    #[validate(length(min = 1, max = 200, message = "Imprint must be 1-200 characters"))]
    pub imprint: String,
    pub due_back: Option<NaiveDate>,
    pub borrower_id: Option<i32>,
    #[serde(default)]
    pub status: LoanStatus,
}

impl InlineBookInstanceInput {
    pub fn for_book(self, book_id: i32) -> BookInstanceInput {
        BookInstanceInput {
            book_id,
            imprint: self.imprint,
            due_back: self.due_back,
            borrower_id: self.borrower_id,
            status: self.status,
        }
    }
}

/// Due-back list filter choices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DueBackFilter {
    #[default]
    Any,
    Today,
    Past7Days,
    ThisMonth,
    ThisYear,
    NoDate,
    HasDate,
}

/// Date condition a due-back filter resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueBackRange {
    Any,
    /// `start <= due_back < end`
    Between(NaiveDate, NaiveDate),
    IsNull,
    NotNull,
}

impl DueBackFilter {
    pub fn range(&self, today: NaiveDate) -> DueBackRange {
        let tomorrow = today + Duration::days(1);
        match self {
            DueBackFilter::Any => DueBackRange::Any,
            DueBackFilter::Today => DueBackRange::Between(today, tomorrow),
            DueBackFilter::Past7Days => DueBackRange::Between(today - Duration::days(7), tomorrow),
            DueBackFilter::ThisMonth => {
                let start = today.with_day(1).unwrap_or(today);
                let end = if start.month() == 12 {
                    NaiveDate::from_ymd_opt(start.year() + 1, 1, 1)
                } else {
                    NaiveDate::from_ymd_opt(start.year(), start.month() + 1, 1)
                };
                DueBackRange::Between(start, end.unwrap_or(tomorrow))
            }
            DueBackFilter::ThisYear => {
                let start = NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today);
                let end = NaiveDate::from_ymd_opt(today.year() + 1, 1, 1).unwrap_or(tomorrow);
                DueBackRange::Between(start, end)
            }
            DueBackFilter::NoDate => DueBackRange::IsNull,
            DueBackFilter::HasDate => DueBackRange::NotNull,
        }
    }
}

/// Book instance list query
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct BookInstanceQuery {
    pub status: Option<LoanStatus>,
    pub due_back: Option<DueBackFilter>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn instance(due_back: Option<NaiveDate>) -> BookInstance {
        BookInstance {
            id: Uuid::new_v4(),
            book_id: Some(1),
            imprint: "Penguin, 1990".to_string(),
            due_back,
            borrower_id: None,
            status: LoanStatus::OnLoan,
        }
    }

    #[test]
    fn test_overdue_is_strict() {
        let today = date(2024, 5, 10);
        assert!(instance(Some(date(2024, 5, 9))).is_overdue_on(today));
        assert!(!instance(Some(today)).is_overdue_on(today));
        assert!(!instance(Some(date(2024, 5, 11))).is_overdue_on(today));
        assert!(!instance(None).is_overdue_on(today));
    }

    #[test]
    fn test_overdue_against_current_date() {
        let yesterday = today() - Duration::days(1);
        assert!(instance(Some(yesterday)).is_overdue());
        assert!(!instance(Some(today() + Duration::days(1))).is_overdue());
    }

    #[test]
    fn test_status_codes_and_labels() {
        for status in [
            LoanStatus::Maintenance,
            LoanStatus::OnLoan,
            LoanStatus::Available,
            LoanStatus::Reserved,
        ] {
            assert_eq!(status.code().parse::<LoanStatus>(), Ok(status));
        }
        assert_eq!(LoanStatus::OnLoan.label(), "On loan");
        assert_eq!(LoanStatus::default(), LoanStatus::Maintenance);
        assert!("x".parse::<LoanStatus>().is_err());
    }

    #[test]
    fn test_status_json_names() {
        assert_eq!(serde_json::to_string(&LoanStatus::OnLoan).unwrap(), "\"on_loan\"");
        let parsed: LoanStatus = serde_json::from_str("\"reserved\"").unwrap();
        assert_eq!(parsed, LoanStatus::Reserved);
    }

    #[test]
    fn test_input_status_defaults_to_maintenance() {
        let input: BookInstanceInput =
            serde_json::from_str(r#"{"book_id": 3, "imprint": "Gollancz"}"#).unwrap();
        assert_eq!(input.status, LoanStatus::Maintenance);
        assert!(input.due_back.is_none());
    }

    #[test]
    fn test_due_back_ranges() {
        let today = date(2024, 12, 15);
        assert_eq!(DueBackFilter::Any.range(today), DueBackRange::Any);
        assert_eq!(
            DueBackFilter::Today.range(today),
            DueBackRange::Between(today, date(2024, 12, 16))
        );
        assert_eq!(
            DueBackFilter::Past7Days.range(today),
            DueBackRange::Between(date(2024, 12, 8), date(2024, 12, 16))
        );
        assert_eq!(
            DueBackFilter::ThisMonth.range(today),
            DueBackRange::Between(date(2024, 12, 1), date(2025, 1, 1))
        );
        assert_eq!(
            DueBackFilter::ThisMonth.range(date(2024, 2, 29)),
            DueBackRange::Between(date(2024, 2, 1), date(2024, 3, 1))
        );
        assert_eq!(
            DueBackFilter::ThisYear.range(today),
            DueBackRange::Between(date(2024, 1, 1), date(2025, 1, 1))
        );
        assert_eq!(DueBackFilter::NoDate.range(today), DueBackRange::IsNull);
        assert_eq!(DueBackFilter::HasDate.range(today), DueBackRange::NotNull);
    }

    #[test]
    fn test_detail_fieldsets() {
        let id = Uuid::new_v4();
        let row = BookInstanceRow {
            id,
            book_id: Some(2),
            book_title: Some("Emma".to_string()),
            imprint: "Oxford".to_string(),
            due_back: Some(date(2024, 1, 1)),
            borrower_id: None,
            status: LoanStatus::OnLoan,
        };
        let detail = BookInstanceDetail::new(row, None, date(2024, 1, 2));
        assert!(detail.is_overdue);
        assert_eq!(detail.display, format!("{} (Emma)", id));
        assert_eq!(detail.general.book.as_ref().map(|b| b.url.as_str()), Some("/books/2"));
        assert_eq!(detail.availability.status, LoanStatus::OnLoan);
    }
}
