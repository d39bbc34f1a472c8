//! Book management service

use validator::Validate;

use super::referenced;
use crate::{
    error::{AppError, AppResult},
    models::{
        author::AuthorRef,
        book::{book_url, Book, BookDetail, BookInput, BookListEntry, BookListRow},
        book_instance::{today, BookInstanceListEntry},
    },
    repository::{PageRequest, Repository},
};

/// Attach genre columns to book list rows
pub(crate) async fn list_entries(
    repository: &Repository,
    rows: Vec<BookListRow>,
) -> AppResult<Vec<BookListEntry>> {
    let ids: Vec<i32> = rows.iter().map(|r| r.id).collect();
    let mut names = repository.books.genre_names(&ids).await?;

    Ok(rows
        .into_iter()
        .map(|row| {
            let genres = names.remove(&row.id).unwrap_or_default();
            BookListEntry::from_row(row, &genres)
        })
        .collect())
}

/// Trim text fields and drop duplicate genre ids
fn normalize(mut data: BookInput) -> BookInput {
    data.title = data.title.trim().to_string();
    data.summary = data.summary.trim().to_string();
    data.isbn = data.isbn.trim().to_string();
    data.genre_ids.sort_unstable();
    data.genre_ids.dedup();
    data
}

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List books ordered by title, then author
    pub async fn list(&self, page: PageRequest) -> AppResult<(Vec<BookListEntry>, i64)> {
        let (rows, total) = self.repository.books.list(page).await?;
        let entries = list_entries(&self.repository, rows).await?;
        Ok((entries, total))
    }

    /// Get a book with its author, language, genres and copies
    pub async fn get_detail(&self, id: i32) -> AppResult<BookDetail> {
        let book = self.repository.books.get_by_id(id).await?;
        self.detail(book).await
    }

    async fn detail(&self, book: Book) -> AppResult<BookDetail> {
        let author = match book.author_id {
            Some(author_id) => {
                let a = self.repository.authors.get_by_id(author_id).await?;
                Some(AuthorRef::new(a.id, &a.first_name, &a.last_name))
            }
            None => None,
        };
        let language = match book.language_id {
            Some(language_id) => Some(self.repository.languages.get_by_id(language_id).await?),
            None => None,
        };
        let genres = self.repository.books.get_genres(book.id).await?;

        let today = today();
        let instances = self
            .repository
            .book_instances
            .list_by_book(book.id)
            .await?
            .into_iter()
            .map(|row| BookInstanceListEntry::from_row(row, today))
            .collect();

        Ok(BookDetail {
            url: book_url(book.id),
            id: book.id,
            title: book.title,
            summary: book.summary,
            isbn: book.isbn,
            author,
            language,
            genres,
            instances,
        })
    }

    /// Make sure every row the form points at exists
    async fn check_references(&self, data: &BookInput) -> AppResult<()> {
        if let Some(author_id) = data.author_id {
            referenced(self.repository.authors.get_by_id(author_id).await)?;
        }
        if let Some(language_id) = data.language_id {
            referenced(self.repository.languages.get_by_id(language_id).await)?;
        }

        let existing = self.repository.genres.existing_ids(&data.genre_ids).await?;
        let missing: Vec<String> = data
            .genre_ids
            .iter()
            .filter(|id| !existing.contains(id))
            .map(|id| id.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(AppError::Validation(format!(
                "Unknown genre id(s): {}",
                missing.join(", ")
            )));
        }
        Ok(())
    }

    /// Create a book with its genres
    pub async fn create(&self, data: BookInput) -> AppResult<BookDetail> {
        let data = normalize(data);
        data.validate()?;
        self.check_references(&data).await?;

        if self.repository.books.isbn_exists(&data.isbn, None).await? {
            return Err(AppError::Conflict(format!(
                "Book with ISBN {} already exists",
                data.isbn
            )));
        }

        let book = self.repository.books.create(&data).await?;
        tracing::info!("Created book id={} title={}", book.id, book);
        self.detail(book).await
    }

    /// Replace a book and its genres; an assigned author cannot be removed
    pub async fn update(&self, id: i32, data: BookInput) -> AppResult<BookDetail> {
        let data = normalize(data);
        data.validate()?;

        let existing = self.repository.books.get_by_id(id).await?;
        if existing.author_id.is_some() && data.author_id.is_none() {
            return Err(AppError::Validation(
                "author_id: an author is required once set".to_string(),
            ));
        }
        self.check_references(&data).await?;

        if self.repository.books.isbn_exists(&data.isbn, Some(id)).await? {
            return Err(AppError::Conflict(format!(
                "Book with ISBN {} already exists",
                data.isbn
            )));
        }

        let book = self.repository.books.update(id, &data).await?;
        tracing::info!("Updated book id={} title={}", book.id, book);
        self.detail(book).await
    }

    /// Delete a book, refused while copies of it exist
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let book = self.repository.books.get_by_id(id).await?;

        let instances = self.repository.books.count_instances(id).await?;
        if instances > 0 {
            return Err(AppError::Restricted(format!(
                "Book \"{}\" still has {} instance(s)",
                book, instances
            )));
        }

        self.repository.books.delete(id).await?;
        tracing::info!("Deleted book id={} title={}", id, book);
        Ok(())
    }

    /// Books of one author (inline list on the author form)
    pub async fn list_by_author(&self, author_id: i32) -> AppResult<Vec<BookListEntry>> {
        self.repository.authors.get_by_id(author_id).await?;
        let rows = self.repository.books.list_by_author(author_id).await?;
        list_entries(&self.repository, rows).await
    }

    /// Create a book from the author form; the path decides the author
    pub async fn create_for_author(&self, author_id: i32, mut data: BookInput) -> AppResult<BookDetail> {
        self.repository.authors.get_by_id(author_id).await?;
        data.author_id = Some(author_id);
        self.create(data).await
    }

    /// Copies of one book (inline list on the book form)
    pub async fn list_instances(&self, book_id: i32) -> AppResult<Vec<BookInstanceListEntry>> {
        self.repository.books.get_by_id(book_id).await?;
        let today = today();
        Ok(self
            .repository
            .book_instances
            .list_by_book(book_id)
            .await?
            .into_iter()
            .map(|row| BookInstanceListEntry::from_row(row, today))
            .collect())
    }
}
