//! Data models for the catalog

pub mod author;
pub mod book;
pub mod instance;
pub mod links;
pub mod listing;
pub mod reference;
pub mod session;
pub mod user;

// Re-export commonly used types
pub use author::{Author, AuthorDetail, AuthorInput, AuthorView};
pub use book::{Book, BookDetail, BookInput, BookRecord, BookView};
pub use instance::{BookInstance, InstanceInput, InstanceRecord, InstanceView, LoanStatus};
pub use listing::{ListConfig, Page, PageQuery, PageRequest};
pub use reference::{Genre, GenreInput, Language, LanguageInput};
pub use user::{Permission, User, UserClaims, UserRef};
