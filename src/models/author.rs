//! Author model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use super::{book::BookRef, links::Links};

/// Full author model from database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Author {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    /// Born
    pub date_of_birth: Option<NaiveDate>,
    /// Died
    pub date_of_death: Option<NaiveDate>,
    pub biography: Option<String>,
}

impl Author {
    /// "Last, First"
    pub fn display_name(&self) -> String {
        format!("{}, {}", self.last_name, self.first_name)
    }

    pub fn links(&self) -> Links {
        Links::for_entity("author", self.id)
    }
}

impl std::fmt::Display for Author {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}", self.last_name, self.first_name)
    }
}

/// Create / update author form
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_lifespan"))]
pub struct AuthorInput {
    #[validate(length(min = 1, max = 100, message = "First name must be 1 to 100 characters"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "Last name must be 1 to 100 characters"))]
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
    #[validate(length(max = 1000, message = "Biography is limited to 1000 characters"))]
    pub biography: Option<String>,
}

fn validate_lifespan(input: &AuthorInput) -> Result<(), ValidationError> {
    if let (Some(born), Some(died)) = (input.date_of_birth, input.date_of_death) {
        if died < born {
            return Err(crate::error::field_error(
                "death_before_birth",
                "Date of death cannot precede date of birth",
            ));
        }
    }
    Ok(())
}

impl From<Author> for AuthorInput {
    fn from(author: Author) -> Self {
        Self {
            first_name: author.first_name,
            last_name: author.last_name,
            date_of_birth: author.date_of_birth,
            date_of_death: author.date_of_death,
            biography: author.biography,
        }
    }
}

/// Author as returned by list endpoints
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthorView {
    #[serde(flatten)]
    pub author: Author,
    pub display_name: String,
    pub links: Links,
}

impl From<Author> for AuthorView {
    fn from(author: Author) -> Self {
        Self {
            display_name: author.display_name(),
            links: author.links(),
            author,
        }
    }
}

/// Author with the books attributed to them
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthorDetail {
    #[serde(flatten)]
    pub author: AuthorView,
    pub books: Vec<BookRef>,
}

/// Short author reference embedded in book views
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct AuthorRef {
    pub id: i32,
    pub display_name: String,
    pub url: String,
}

impl From<&Author> for AuthorRef {
    fn from(author: &Author) -> Self {
        Self {
            id: author.id,
            display_name: author.display_name(),
            url: author.links().detail,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> AuthorInput {
        AuthorInput {
            first_name: "Big".to_string(),
            last_name: "Bob".to_string(),
            date_of_birth: None,
            date_of_death: None,
            biography: None,
        }
    }

    #[test]
    fn test_display_name_is_last_comma_first() {
        let author = Author {
            id: 1,
            first_name: "Big".to_string(),
            last_name: "Bob".to_string(),
            date_of_birth: None,
            date_of_death: None,
            biography: None,
        };
        assert_eq!(author.display_name(), "Bob, Big");
        assert_eq!(author.to_string(), "Bob, Big");
        assert_eq!(author.links().detail, "/catalog/author/1");
    }

    #[test]
    fn test_death_before_birth_is_rejected() {
        let mut form = input();
        form.date_of_birth = NaiveDate::from_ymd_opt(1950, 1, 1);
        form.date_of_death = NaiveDate::from_ymd_opt(1940, 1, 1);
        let errors = form.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("__all__"));

        form.date_of_death = NaiveDate::from_ymd_opt(1950, 1, 1);
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_partial_dates_are_accepted() {
        let mut form = input();
        form.date_of_death = NaiveDate::from_ymd_opt(1940, 1, 1);
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_names_are_bounded() {
        let mut form = input();
        form.first_name = "x".repeat(101);
        form.last_name = String::new();
        let errors = form.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("first_name"));
        assert!(fields.contains_key("last_name"));
    }
}
