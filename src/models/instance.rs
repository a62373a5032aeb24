//! Book instance (circulating copy) model, lending status and renewal rules

use chrono::{Duration, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use super::{book::BookRef, links::CATALOG_PREFIX, user::UserRef};
use crate::error::field_error;

/// Weeks added to today when a renewal is proposed
pub const PROPOSED_RENEWAL_WEEKS: i64 = 3;
/// Latest acceptable renewal date, in weeks from today
pub const MAX_RENEWAL_WEEKS: i64 = 4;

/// Today's local calendar date
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn proposed_renewal_date(today: NaiveDate) -> NaiveDate {
    today + Duration::weeks(PROPOSED_RENEWAL_WEEKS)
}

pub fn max_renewal_date(today: NaiveDate) -> NaiveDate {
    today + Duration::weeks(MAX_RENEWAL_WEEKS)
}

/// Lending status of a copy, stored as a one letter code
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LoanStatus {
    #[default]
    Maintenance,
    OnLoan,
    Available,
    Reserved,
}

impl LoanStatus {
    pub const ALL: [LoanStatus; 4] = [
        LoanStatus::Maintenance,
        LoanStatus::OnLoan,
        LoanStatus::Available,
        LoanStatus::Reserved,
    ];

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
        LoanStatus::ALL
            .into_iter()
            .find(|status| status.code() == s)
            .ok_or_else(|| format!("Invalid loan status code: {}", s))
    }
}

// SQLx conversion for LoanStatus
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

/// Copy row from database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct BookInstance {
    pub id: Uuid,
    pub book_id: i32,
    pub imprint: String,
    pub due_back: Option<NaiveDate>,
    pub status: LoanStatus,
    pub borrower_id: Option<i32>,
}

impl BookInstance {
    /// Due date set and strictly before `today`
    pub fn is_overdue_on(&self, today: NaiveDate) -> bool {
        matches!(self.due_back, Some(due) if due < today)
    }

    pub fn is_overdue(&self) -> bool {
        self.is_overdue_on(today())
    }

    pub fn url(&self) -> String {
        format!("{}/bookinstance/{}", CATALOG_PREFIX, self.id)
    }

    pub fn renew_url(&self) -> String {
        format!("{}/book/{}/renew/", CATALOG_PREFIX, self.id)
    }
}

/// A copy with the title of its book and its borrower resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceRecord {
    pub instance: BookInstance,
    pub book_title: String,
    pub borrower: Option<UserRef>,
}

/// Copy as returned by the API; `is_overdue` is computed per response
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct InstanceView {
    pub id: Uuid,
    /// "{id} ({book title})"
    pub display: String,
    pub book: BookRef,
    pub imprint: String,
    pub status: LoanStatus,
    pub status_label: String,
    pub due_back: Option<NaiveDate>,
    pub borrower: Option<UserRef>,
    pub is_overdue: bool,
    pub url: String,
    pub renew_url: String,
}

impl InstanceView {
    pub fn new(record: InstanceRecord, today: NaiveDate) -> Self {
        let InstanceRecord {
            instance,
            book_title,
            borrower,
        } = record;

        Self {
            display: format!("{} ({})", instance.id, book_title),
            book: BookRef {
                id: instance.book_id,
                url: format!("{}/book/{}", CATALOG_PREFIX, instance.book_id),
                title: book_title,
            },
            is_overdue: instance.is_overdue_on(today),
            url: instance.url(),
            renew_url: instance.renew_url(),
            status_label: instance.status.label().to_string(),
            id: instance.id,
            imprint: instance.imprint,
            status: instance.status,
            due_back: instance.due_back,
            borrower,
        }
    }
}

/// Create / update copy form
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_loan_fields"))]
pub struct InstanceInput {
    pub book_id: i32,
    #[validate(length(min = 1, max = 200, message = "Imprint must be 1 to 200 characters"))]
    pub imprint: String,
    #[serde(default)]
    pub status: LoanStatus,
    pub due_back: Option<NaiveDate>,
    pub borrower_id: Option<i32>,
}

fn validate_loan_fields(input: &InstanceInput) -> Result<(), ValidationError> {
    if input.status != LoanStatus::OnLoan
        && (input.borrower_id.is_some() || input.due_back.is_some())
    {
        return Err(field_error(
            "loan_fields_without_loan",
            "Borrower and due date can only be set on a copy that is on loan",
        ));
    }
    Ok(())
}

impl From<BookInstance> for InstanceInput {
    fn from(instance: BookInstance) -> Self {
        Self {
            book_id: instance.book_id,
            imprint: instance.imprint,
            status: instance.status,
            due_back: instance.due_back,
            borrower_id: instance.borrower_id,
        }
    }
}

/// Renewal form: the librarian's proposed due date
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RenewalForm {
    pub renewal_date: NaiveDate,
}

/// Check a proposed due date against `[today, today + 4 weeks]`
pub fn check_due_date(
    field: &'static str,
    date: NaiveDate,
    today: NaiveDate,
) -> Result<NaiveDate, ValidationErrors> {
    let error = if date < today {
        Some(field_error("renewal_in_past", "Invalid date - renewal in past"))
    } else if date > max_renewal_date(today) {
        Some(field_error(
            "renewal_too_far",
            "Invalid date - renewal more than 4 weeks ahead",
        ))
    } else {
        None
    };

    match error {
        Some(error) => {
            let mut errors = ValidationErrors::new();
            errors.add(field, error);
            Err(errors)
        }
        None => Ok(date),
    }
}

impl RenewalForm {
    pub fn clean(&self, today: NaiveDate) -> Result<NaiveDate, ValidationErrors> {
        check_due_date("renewal_date", self.renewal_date, today)
    }
}

/// Renewal form as presented to the librarian
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RenewalFormView {
    pub instance: InstanceView,
    pub renewal_date: NaiveDate,
}

/// Lend a copy to a borrower
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LendForm {
    pub borrower_id: i32,
    /// Defaults to three weeks from today
    pub due_back: Option<NaiveDate>,
}
