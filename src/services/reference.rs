//! Reference data service: genres and languages

use validator::Validate;

use crate::{
    error::AppResult,
    models::{
        listing::{Page, PageQuery, PageRequest, GENRE_LIST, LANGUAGE_LIST},
        reference::{Genre, GenreInput, Language, LanguageInput},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct ReferenceService {
    repository: Repository,
}

impl ReferenceService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list_genres(&self, query: PageQuery) -> AppResult<Page<Genre>> {
        let request = PageRequest::new(query, &GENRE_LIST)?;
        let page = self.repository.genres.list_genres(request).await?;
        request.check_in_range(page.total)?;
        Ok(page)
    }

    pub async fn get_genre(&self, id: i32) -> AppResult<Genre> {
        self.repository.genres.get_genre(id).await
    }

    pub async fn create_genre(&self, input: GenreInput) -> AppResult<Genre> {
        input.validate()?;
        let genre = self.repository.genres.create_genre(&input).await?;
        tracing::info!("Created genre {} ({})", genre.name, genre.id);
        Ok(genre)
    }

    pub async fn update_genre(&self, id: i32, input: GenreInput) -> AppResult<Genre> {
        self.repository.genres.get_genre(id).await?;
        input.validate()?;
        let genre = self.repository.genres.update_genre(id, &input).await?;
        tracing::info!("Updated genre {}", id);
        Ok(genre)
    }

    /// Delete a genre and detach it from its books
    pub async fn delete_genre(&self, id: i32) -> AppResult<()> {
        self.repository.genres.delete_genre(id).await?;
        tracing::info!("Deleted genre {}", id);
        Ok(())
    }

    pub async fn list_languages(&self, query: PageQuery) -> AppResult<Page<Language>> {
        let request = PageRequest::new(query, &LANGUAGE_LIST)?;
        let page = self.repository.languages.list_languages(request).await?;
        request.check_in_range(page.total)?;
        Ok(page)
    }

    pub async fn get_language(&self, id: i32) -> AppResult<Language> {
        self.repository.languages.get_language(id).await
    }

    pub async fn create_language(&self, input: LanguageInput) -> AppResult<Language> {
        input.validate()?;
        let language = self.repository.languages.create_language(&input).await?;
        tracing::info!("Created language {} ({})", language.name, language.id);
        Ok(language)
    }

    pub async fn update_language(&self, id: i32, input: LanguageInput) -> AppResult<Language> {
        self.repository.languages.get_language(id).await?;
        input.validate()?;
        let language = self.repository.languages.update_language(id, &input).await?;
        tracing::info!("Updated language {}", id);
        Ok(language)
    }

    /// Delete a language; books written in it keep existing without one
    pub async fn delete_language(&self, id: i32) -> AppResult<()> {
        self.repository.languages.delete_language(id).await?;
        tracing::info!("Deleted language {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::AppError, models::book::BookInput};

    #[tokio::test]
    async fn test_language_delete_clears_books() {
        let repository = Repository::in_memory();
        let reference = ReferenceService::new(repository.clone());
        let french = reference
            .create_language(LanguageInput {
                name: "French".into(),
            })
            .await
            .unwrap();

        let book = repository
            .books
            .create_book(&BookInput {
                title: "Candide".into(),
                summary: "Optimism".into(),
                isbn: "9780140455106".into(),
                author_id: None,
                language_id: Some(french.id),
                genre_ids: vec![],
            })
            .await
            .unwrap();

        reference.delete_language(french.id).await.unwrap();
        let book = repository.books.get_book(book.book.id).await.unwrap();
        assert_eq!(book.book.language_id, None);

        let again = reference.delete_language(french.id).await;
        assert!(matches!(again, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_genres_are_listed_by_name() {
        let reference = ReferenceService::new(Repository::in_memory());
        for name in ["Thriller", "Fantasy", "Poetry"] {
            reference
                .create_genre(GenreInput { name: name.into() })
                .await
                .unwrap();
        }

        let page = reference.list_genres(PageQuery::default()).await.unwrap();
        let names: Vec<&str> = page.items.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["Fantasy", "Poetry", "Thriller"]);
    }

    #[tokio::test]
    async fn test_blank_genre_is_rejected() {
        let reference = ReferenceService::new(Repository::in_memory());
        let result = reference
            .create_genre(GenreInput {
                name: String::new(),
            })
            .await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }
}
