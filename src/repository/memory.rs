//! In-memory store
//!
//! Non-persistent implementation of every store trait, used by the test
//! suite and by `memory://` development runs. All tables live behind one
//! `RwLock` so the delete rules of the SQL schema (SET NULL, RESTRICT,
//! CASCADE) can be applied atomically.

use std::{
    cmp::Ordering,
    collections::{BTreeMap, BTreeSet, HashMap},
    sync::Arc,
};

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    books::duplicate_isbn, postgres::not_found, AuthorStore, BookStore, Circulation, GenreStore,
    InstanceFilter, InstanceStore, LanguageStore, MaintenanceStore, UserStore,
};
use crate::{
    error::{AppError, AppResult},
    models::{
        author::{Author, AuthorInput},
        book::{Book, BookInput, BookRecord},
        instance::{BookInstance, InstanceInput, InstanceRecord, LoanStatus},
        listing::{paginate, Page, PageRequest},
        reference::{Genre, GenreInput, Language, LanguageInput},
        user::{NewUser, User, UserRef},
    },
};

#[derive(Debug, Default)]
struct Sequences {
    genres: i32,
    languages: i32,
    authors: i32,
    books: i32,
    users: i32,
}

fn next(counter: &mut i32) -> i32 {
    *counter += 1;
    *counter
}

#[derive(Debug, Default)]
struct Tables {
    genres: BTreeMap<i32, Genre>,
    languages: BTreeMap<i32, Language>,
    authors: BTreeMap<i32, Author>,
    books: BTreeMap<i32, Book>,
    /// (book_id, genre_id)
    book_genres: BTreeSet<(i32, i32)>,
    instances: HashMap<Uuid, BookInstance>,
    users: BTreeMap<i32, User>,
    sequences: Sequences,
}

/// Due date ascending with undated copies last, then id
fn by_due_back(a: &BookInstance, b: &BookInstance) -> Ordering {
    let due = match (a.due_back, b.due_back) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    due.then_with(|| a.id.cmp(&b.id))
}

fn missing_reference(kind: &str, id: i32) -> AppError {
    AppError::BadRequest(format!("{} {} does not exist", kind, id))
}

impl Tables {
    fn book_record(&self, book: &Book) -> BookRecord {
        let mut genres: Vec<Genre> = self
            .book_genres
            .range((book.id, i32::MIN)..=(book.id, i32::MAX))
            .filter_map(|(_, genre_id)| self.genres.get(genre_id).cloned())
            .collect();
        genres.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));

        BookRecord {
            book: book.clone(),
            author: book.author_id.and_then(|id| self.authors.get(&id).cloned()),
            language: book.language_id.and_then(|id| self.languages.get(&id).cloned()),
            genres,
        }
    }

    fn instance_record(&self, instance: &BookInstance) -> InstanceRecord {
        InstanceRecord {
            book_title: self
                .books
                .get(&instance.book_id)
                .map(|b| b.title.clone())
                .unwrap_or_default(),
            borrower: instance
                .borrower_id
                .and_then(|id| self.users.get(&id))
                .map(|u| UserRef {
                    id: u.id,
                    username: u.username.clone(),
                }),
            instance: instance.clone(),
        }
    }

    /// Foreign keys of a book row must point at existing rows
    fn check_book_references(&self, input: &BookInput) -> AppResult<()> {
        if let Some(id) = input.author_id.filter(|id| !self.authors.contains_key(id)) {
            return Err(missing_reference("Author", id));
        }
        if let Some(id) = input.language_id.filter(|id| !self.languages.contains_key(id)) {
            return Err(missing_reference("Language", id));
        }
        if let Some(id) = input.genre_ids.iter().find(|id| !self.genres.contains_key(*id)) {
            return Err(missing_reference("Genre", *id));
        }
        Ok(())
    }

    fn check_instance_references(&self, book_id: i32, borrower_id: Option<i32>) -> AppResult<()> {
        if !self.books.contains_key(&book_id) {
            return Err(missing_reference("Book", book_id));
        }
        if let Some(id) = borrower_id.filter(|id| !self.users.contains_key(id)) {
            return Err(missing_reference("User", id));
        }
        Ok(())
    }

    fn isbn_taken(&self, isbn: &str, except: Option<i32>) -> bool {
        self.books
            .values()
            .any(|b| b.isbn == isbn && Some(b.id) != except)
    }

    fn set_book_genres(&mut self, book_id: i32, genre_ids: &[i32]) {
        self.book_genres.retain(|(b, _)| *b != book_id);
        self.book_genres
            .extend(genre_ids.iter().map(|genre_id| (book_id, *genre_id)));
    }

    fn sorted_instances(&self, filter: InstanceFilter) -> Vec<BookInstance> {
        let mut instances: Vec<BookInstance> = self
            .instances
            .values()
            .filter(|i| filter.status().map_or(true, |s| i.status == s))
            .filter(|i| filter.borrower_id().map_or(true, |b| i.borrower_id == Some(b)))
            .cloned()
            .collect();
        instances.sort_by(by_due_back);
        instances
    }
}

/// In-memory implementation of every store trait
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GenreStore for MemoryStore {
    async fn list_genres(&self, request: PageRequest) -> AppResult<Page<Genre>> {
        let tables = self.tables.read().await;
        let mut genres: Vec<Genre> = tables.genres.values().cloned().collect();
        genres.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(paginate(&genres, request))
    }

    async fn get_genre(&self, id: i32) -> AppResult<Genre> {
        let tables = self.tables.read().await;
        tables
            .genres
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found("Genre", id))
    }

    async fn find_genres(&self, ids: &[i32]) -> AppResult<Vec<Genre>> {
        let tables = self.tables.read().await;
        let mut genres: Vec<Genre> = ids
            .iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .filter_map(|id| tables.genres.get(id).cloned())
            .collect();
        genres.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(genres)
    }

    async fn create_genre(&self, input: &GenreInput) -> AppResult<Genre> {
        let mut tables = self.tables.write().await;
        let genre = Genre {
            id: next(&mut tables.sequences.genres),
            name: input.name.clone(),
        };
        tables.genres.insert(genre.id, genre.clone());
        Ok(genre)
    }

    async fn update_genre(&self, id: i32, input: &GenreInput) -> AppResult<Genre> {
        let mut tables = self.tables.write().await;
        let genre = tables
            .genres
            .get_mut(&id)
            .ok_or_else(|| not_found("Genre", id))?;
        genre.name = input.name.clone();
        Ok(genre.clone())
    }

    async fn delete_genre(&self, id: i32) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        tables
            .genres
            .remove(&id)
            .ok_or_else(|| not_found("Genre", id))?;
        // CASCADE
        tables.book_genres.retain(|(_, genre_id)| *genre_id != id);
        Ok(())
    }

    async fn count_genres(&self) -> AppResult<i64> {
        Ok(self.tables.read().await.genres.len() as i64)
    }
}

#[async_trait]
impl LanguageStore for MemoryStore {
    async fn list_languages(&self, request: PageRequest) -> AppResult<Page<Language>> {
        let tables = self.tables.read().await;
        let mut languages: Vec<Language> = tables.languages.values().cloned().collect();
        languages.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(paginate(&languages, request))
    }

    async fn get_language(&self, id: i32) -> AppResult<Language> {
        let tables = self.tables.read().await;
        tables
            .languages
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found("Language", id))
    }

    async fn create_language(&self, input: &LanguageInput) -> AppResult<Language> {
        let mut tables = self.tables.write().await;
        let language = Language {
            id: next(&mut tables.sequences.languages),
            name: input.name.clone(),
        };
        tables.languages.insert(language.id, language.clone());
        Ok(language)
    }

    async fn update_language(&self, id: i32, input: &LanguageInput) -> AppResult<Language> {
        let mut tables = self.tables.write().await;
        let language = tables
            .languages
            .get_mut(&id)
            .ok_or_else(|| not_found("Language", id))?;
        language.name = input.name.clone();
        Ok(language.clone())
    }

    async fn delete_language(&self, id: i32) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        tables
            .languages
            .remove(&id)
            .ok_or_else(|| not_found("Language", id))?;
        // SET NULL
        for book in tables.books.values_mut() {
            if book.language_id == Some(id) {
                book.language_id = None;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl AuthorStore for MemoryStore {
    async fn list_authors(&self, request: PageRequest) -> AppResult<Page<Author>> {
        let tables = self.tables.read().await;
        let mut authors: Vec<Author> = tables.authors.values().cloned().collect();
        authors.sort_by(|a, b| {
            a.last_name
                .cmp(&b.last_name)
                .then_with(|| a.first_name.cmp(&b.first_name))
                .then(a.id.cmp(&b.id))
        });
        Ok(paginate(&authors, request))
    }

    async fn get_author(&self, id: i32) -> AppResult<Author> {
        let tables = self.tables.read().await;
        tables
            .authors
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found("Author", id))
    }

    async fn create_author(&self, input: &AuthorInput) -> AppResult<Author> {
        let mut tables = self.tables.write().await;
        let author = Author {
            id: next(&mut tables.sequences.authors),
            first_name: input.first_name.clone(),
            last_name: input.last_name.clone(),
            date_of_birth: input.date_of_birth,
            date_of_death: input.date_of_death,
            biography: input.biography.clone(),
        };
        tables.authors.insert(author.id, author.clone());
        Ok(author)
    }

    async fn update_author(&self, id: i32, input: &AuthorInput) -> AppResult<Author> {
        let mut tables = self.tables.write().await;
        let author = tables
            .authors
            .get_mut(&id)
            .ok_or_else(|| not_found("Author", id))?;
        author.first_name = input.first_name.clone();
        author.last_name = input.last_name.clone();
        author.date_of_birth = input.date_of_birth;
        author.date_of_death = input.date_of_death;
        author.biography = input.biography.clone();
        Ok(author.clone())
    }

    async fn delete_author(&self, id: i32) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        tables
            .authors
            .remove(&id)
            .ok_or_else(|| not_found("Author", id))?;
        // SET NULL
        for book in tables.books.values_mut() {
            if book.author_id == Some(id) {
                book.author_id = None;
            }
        }
        Ok(())
    }

    async fn count_authors(&self) -> AppResult<i64> {
        Ok(self.tables.read().await.authors.len() as i64)
    }
}

#[async_trait]
impl BookStore for MemoryStore {
    async fn list_books(&self, request: PageRequest) -> AppResult<Page<BookRecord>> {
        let tables = self.tables.read().await;
        let mut books: Vec<&Book> = tables.books.values().collect();
        books.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id)));
        let records: Vec<BookRecord> = books.into_iter().map(|b| tables.book_record(b)).collect();
        Ok(paginate(&records, request))
    }

    async fn get_book(&self, id: i32) -> AppResult<BookRecord> {
        let tables = self.tables.read().await;
        tables
            .books
            .get(&id)
            .map(|b| tables.book_record(b))
            .ok_or_else(|| not_found("Book", id))
    }

    async fn find_by_isbn(&self, isbn: &str) -> AppResult<Option<Book>> {
        let tables = self.tables.read().await;
        Ok(tables.books.values().find(|b| b.isbn == isbn).cloned())
    }

    async fn books_by_author(&self, author_id: i32) -> AppResult<Vec<Book>> {
        let tables = self.tables.read().await;
        let mut books: Vec<Book> = tables
            .books
            .values()
            .filter(|b| b.author_id == Some(author_id))
            .cloned()
            .collect();
        books.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id)));
        Ok(books)
    }

    async fn create_book(&self, input: &BookInput) -> AppResult<BookRecord> {
        let mut tables = self.tables.write().await;
        tables.check_book_references(input)?;
        if tables.isbn_taken(&input.isbn, None) {
            return Err(duplicate_isbn());
        }

        let book = Book {
            id: next(&mut tables.sequences.books),
            title: input.title.clone(),
            summary: input.summary.clone(),
            isbn: input.isbn.clone(),
            author_id: input.author_id,
            language_id: input.language_id,
        };
        tables.books.insert(book.id, book.clone());
        tables.set_book_genres(book.id, &input.genre_ids);

        Ok(tables.book_record(&book))
    }

    async fn update_book(&self, id: i32, input: &BookInput) -> AppResult<BookRecord> {
        let mut tables = self.tables.write().await;
        if !tables.books.contains_key(&id) {
            return Err(not_found("Book", id));
        }
        tables.check_book_references(input)?;
        if tables.isbn_taken(&input.isbn, Some(id)) {
            return Err(duplicate_isbn());
        }

        let book = Book {
            id,
            title: input.title.clone(),
            summary: input.summary.clone(),
            isbn: input.isbn.clone(),
            author_id: input.author_id,
            language_id: input.language_id,
        };
        tables.books.insert(id, book.clone());
        tables.set_book_genres(id, &input.genre_ids);

        Ok(tables.book_record(&book))
    }

    async fn delete_book(&self, id: i32) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        if !tables.books.contains_key(&id) {
            return Err(not_found("Book", id));
        }
        // RESTRICT
        if tables.instances.values().any(|i| i.book_id == id) {
            return Err(AppError::Conflict(format!("Book {} still has copies", id)));
        }
        tables.books.remove(&id);
        tables.book_genres.retain(|(book_id, _)| *book_id != id);
        Ok(())
    }

    async fn count_books(&self) -> AppResult<i64> {
        Ok(self.tables.read().await.books.len() as i64)
    }

    async fn count_books_with_title_containing(&self, needle: &str) -> AppResult<i64> {
        let tables = self.tables.read().await;
        Ok(tables
            .books
            .values()
            .filter(|b| b.title.contains(needle))
            .count() as i64)
    }
}

#[async_trait]
impl InstanceStore for MemoryStore {
    async fn list_instances(
        &self,
        filter: InstanceFilter,
        request: PageRequest,
    ) -> AppResult<Page<InstanceRecord>> {
        let tables = self.tables.read().await;
        let instances = tables.sorted_instances(filter);
        Ok(paginate(&instances, request).map(|i| tables.instance_record(&i)))
    }

    async fn instances_of_book(&self, book_id: i32) -> AppResult<Vec<InstanceRecord>> {
        let tables = self.tables.read().await;
        Ok(tables
            .sorted_instances(InstanceFilter::All)
            .iter()
            .filter(|i| i.book_id == book_id)
            .map(|i| tables.instance_record(i))
            .collect())
    }

    async fn get_instance(&self, id: Uuid) -> AppResult<InstanceRecord> {
        let tables = self.tables.read().await;
        tables
            .instances
            .get(&id)
            .map(|i| tables.instance_record(i))
            .ok_or_else(|| not_found("Book instance", id))
    }

    async fn create_instance(&self, input: &InstanceInput) -> AppResult<InstanceRecord> {
        let mut tables = self.tables.write().await;
        tables.check_instance_references(input.book_id, input.borrower_id)?;

        let instance = BookInstance {
            id: Uuid::new_v4(),
            book_id: input.book_id,
            imprint: input.imprint.clone(),
            due_back: input.due_back,
            status: input.status,
            borrower_id: input.borrower_id,
        };
        tables.instances.insert(instance.id, instance.clone());
        Ok(tables.instance_record(&instance))
    }

    async fn update_instance(&self, id: Uuid, input: &InstanceInput) -> AppResult<InstanceRecord> {
        let mut tables = self.tables.write().await;
        if !tables.instances.contains_key(&id) {
            return Err(not_found("Book instance", id));
        }
        tables.check_instance_references(input.book_id, input.borrower_id)?;

        let instance = BookInstance {
            id,
            book_id: input.book_id,
            imprint: input.imprint.clone(),
            due_back: input.due_back,
            status: input.status,
            borrower_id: input.borrower_id,
        };
        tables.instances.insert(id, instance.clone());
        Ok(tables.instance_record(&instance))
    }

    async fn set_due_back(&self, id: Uuid, due_back: NaiveDate) -> AppResult<InstanceRecord> {
        let mut tables = self.tables.write().await;
        let instance = tables
            .instances
            .get_mut(&id)
            .ok_or_else(|| not_found("Book instance", id))?;
        instance.due_back = Some(due_back);
        let instance = instance.clone();
        Ok(tables.instance_record(&instance))
    }

    async fn set_circulation(
        &self,
        id: Uuid,
        circulation: Circulation,
    ) -> AppResult<InstanceRecord> {
        let mut tables = self.tables.write().await;
        if let Some(borrower_id) = circulation.borrower_id {
            if !tables.users.contains_key(&borrower_id) {
                return Err(missing_reference("User", borrower_id));
            }
        }
        let instance = tables
            .instances
            .get_mut(&id)
            .ok_or_else(|| not_found("Book instance", id))?;
        instance.status = circulation.status;
        instance.due_back = circulation.due_back;
        instance.borrower_id = circulation.borrower_id;
        let instance = instance.clone();
        Ok(tables.instance_record(&instance))
    }

    async fn delete_instance(&self, id: Uuid) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        tables
            .instances
            .remove(&id)
            .ok_or_else(|| not_found("Book instance", id))?;
        Ok(())
    }

    async fn count_instances(&self, status: Option<LoanStatus>) -> AppResult<i64> {
        let tables = self.tables.read().await;
        Ok(tables
            .instances
            .values()
            .filter(|i| status.map_or(true, |s| i.status == s))
            .count() as i64)
    }

    async fn count_for_book(&self, book_id: i32) -> AppResult<i64> {
        let tables = self.tables.read().await;
        Ok(tables
            .instances
            .values()
            .filter(|i| i.book_id == book_id)
            .count() as i64)
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn get_user(&self, id: i32) -> AppResult<User> {
        let tables = self.tables.read().await;
        tables
            .users
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found("User", id))
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn create_user(&self, user: &NewUser) -> AppResult<User> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.username == user.username) {
            return Err(AppError::field(
                "username",
                "unique",
                "A user with that username already exists.",
            ));
        }

        let user = User {
            id: next(&mut tables.sequences.users),
            username: user.username.clone(),
            password: user.password_hash.clone(),
            permissions: user.permissions.clone(),
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        Ok(self.tables.read().await.users.values().cloned().collect())
    }
}

#[async_trait]
impl MaintenanceStore for MemoryStore {
    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }

    async fn clear_catalog(&self) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        tables.instances.clear();
        tables.book_genres.clear();
        tables.books.clear();
        tables.authors.clear();
        tables.genres.clear();
        tables.languages.clear();
        let users = tables.sequences.users;
        tables.sequences = Sequences {
            users,
            ..Sequences::default()
        };
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::listing::PAGE_SIZE;

    fn first_page() -> PageRequest {
        PageRequest {
            page: 1,
            per_page: PAGE_SIZE,
        }
    }

    fn book_input(title: &str, isbn: &str) -> BookInput {
        BookInput {
            title: title.to_string(),
            summary: "Summary".to_string(),
            isbn: isbn.to_string(),
            author_id: None,
            language_id: None,
            genre_ids: vec![],
        }
    }

    fn copy_of(book_id: i32, due_back: Option<NaiveDate>) -> InstanceInput {
        InstanceInput {
            book_id,
            imprint: "Imprint".to_string(),
            status: if due_back.is_some() {
                LoanStatus::OnLoan
            } else {
                LoanStatus::Available
            },
            due_back,
            borrower_id: None,
        }
    }

    #[tokio::test]
    async fn test_deleting_author_clears_book_reference() {
        let store = MemoryStore::new();
        let author = store
            .create_author(&AuthorInput {
                first_name: "Frank".into(),
                last_name: "Herbert".into(),
                date_of_birth: None,
                date_of_death: None,
                biography: None,
            })
            .await
            .unwrap();

        let mut input = book_input("Dune", "9780441172719");
        input.author_id = Some(author.id);
        let book = store.create_book(&input).await.unwrap();
        assert_eq!(book.author.as_ref().map(|a| a.id), Some(author.id));

        store.delete_author(author.id).await.unwrap();
        let book = store.get_book(book.book.id).await.unwrap();
        assert_eq!(book.book.author_id, None);
        assert!(book.author.is_none());
    }

    #[tokio::test]
    async fn test_deleting_genre_cascades_to_books() {
        let store = MemoryStore::new();
        let genre = store
            .create_genre(&GenreInput {
                name: "Fantasy".into(),
            })
            .await
            .unwrap();

        let mut input = book_input("Earthsea", "9780547773742");
        input.genre_ids = vec![genre.id];
        let book = store.create_book(&input).await.unwrap();
        assert_eq!(book.genres.len(), 1);

        store.delete_genre(genre.id).await.unwrap();
        assert!(store.get_book(book.book.id).await.unwrap().genres.is_empty());
    }

    #[tokio::test]
    async fn test_book_with_copies_cannot_be_deleted() {
        let store = MemoryStore::new();
        let book = store
            .create_book(&book_input("Dune", "9780441172719"))
            .await
            .unwrap();
        store.create_instance(&copy_of(book.book.id, None)).await.unwrap();

        let result = store.delete_book(book.book.id).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
        assert_eq!(store.count_books().await.unwrap(), 1);
        assert_eq!(store.count_for_book(book.book.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_isbn_is_rejected() {
        let store = MemoryStore::new();
        store
            .create_book(&book_input("Dune", "9780441172719"))
            .await
            .unwrap();
        let result = store
            .create_book(&book_input("Dune again", "9780441172719"))
            .await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_instances_sort_undated_last() {
        let store = MemoryStore::new();
        let book = store
            .create_book(&book_input("Dune", "9780441172719"))
            .await
            .unwrap();
        let id = book.book.id;

        let undated = store.create_instance(&copy_of(id, None)).await.unwrap();
        let later = store
            .create_instance(&copy_of(id, NaiveDate::from_ymd_opt(2024, 6, 1)))
            .await
            .unwrap();
        let sooner = store
            .create_instance(&copy_of(id, NaiveDate::from_ymd_opt(2024, 5, 1)))
            .await
            .unwrap();

        let page = store
            .list_instances(InstanceFilter::All, first_page())
            .await
            .unwrap();
        let ids: Vec<Uuid> = page.items.iter().map(|r| r.instance.id).collect();
        assert_eq!(
            ids,
            vec![sooner.instance.id, later.instance.id, undated.instance.id]
        );

        let on_loan = store
            .list_instances(InstanceFilter::OnLoan, first_page())
            .await
            .unwrap();
        assert_eq!(on_loan.total, 2);
    }

    #[tokio::test]
    async fn test_title_substring_count_is_case_sensitive() {
        let store = MemoryStore::new();
        for (title, isbn) in [("Sand and Foam", "1"), ("And Then", "2"), ("Dune", "3")] {
            store.create_book(&book_input(title, isbn)).await.unwrap();
        }
        // "Sand and Foam" matches; "And Then" does not
        assert_eq!(
            store.count_books_with_title_containing("and").await.unwrap(),
            1
        );
    }
}
