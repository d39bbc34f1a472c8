//! Service checks that reject input before any query runs
//!
//! Services are built over a lazily connected pool that is never used.

use chrono::Utc;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use catalog_server::{
    config::AppConfig,
    models::{
        author::AuthorInput,
        book::BookInput,
        book_instance::{BookInstanceInput, LoanStatus},
        genre::GenreInput,
        language::LanguageInput,
        user::{CreateUser, UserClaims},
    },
    repository::Repository,
    services::Services,
    AppError,
};

fn services() -> Services {
    let config = AppConfig::defaults().expect("default config");
    let pool = PgPoolOptions::new()
        .connect_lazy(&config.database.url)
        .expect("lazy pool");
    Services::new(Repository::new(pool), config.auth)
}

fn book() -> BookInput {
    BookInput {
        title: "The Left Hand of Darkness".to_string(),
        author_id: Some(1),
        summary: "An envoy visits the planet Gethen.".to_string(),
        isbn: "9780441478125".to_string(),
        language_id: None,
        genre_ids: vec![1],
    }
}

#[tokio::test]
async fn test_blank_genre_name_rejected() {
    let result = services()
        .genres
        .create(GenreInput { name: "   ".to_string() })
        .await;
    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn test_overlong_language_name_rejected() {
    let result = services()
        .languages
        .update(3, LanguageInput { name: "x".repeat(201) })
        .await;
    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn test_book_isbn_must_have_13_characters() {
    let mut data = book();
    data.isbn = " 044147812 ".to_string();

    match services().books.create(data).await {
        Err(AppError::Validation(msg)) => assert!(msg.contains("isbn")),
        other => panic!("expected validation error, got {:?}", other.map(|b| b.id)),
    }
}

#[tokio::test]
async fn test_book_requires_a_genre() {
    let mut data = book();
    data.genre_ids.clear();

    let result = services().books.update(3, data).await;
    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn test_author_requires_names() {
    let result = services()
        .authors
        .create(AuthorInput {
            first_name: " ".to_string(),
            last_name: "Le Guin".to_string(),
            date_of_birth: None,
            date_of_death: None,
        })
        .await;
    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn test_instance_requires_imprint() {
    let result = services()
        .book_instances
        .create(BookInstanceInput {
            book_id: 1,
            imprint: String::new(),
            due_back: None,
            borrower_id: None,
            status: LoanStatus::Available,
        })
        .await;
    assert!(matches!(result, Err(AppError::Validation(_))));

    let result = services()
        .book_instances
        .update(
            Uuid::new_v4(),
            BookInstanceInput {
                book_id: 1,
                imprint: "i".repeat(201),
                due_back: None,
                borrower_id: None,
                status: LoanStatus::Maintenance,
            },
        )
        .await;
    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn test_user_input_validated() {
    let result = services()
        .users
        .create_user(CreateUser {
            username: "ab".to_string(),
            password: "secret".to_string(),
            first_name: String::new(),
            last_name: String::new(),
            email: Some("not-an-email".to_string()),
            is_staff: false,
        })
        .await;
    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn test_staff_cannot_delete_own_account() {
    let result = services().users.delete_user(4, 4).await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));
}

#[tokio::test]
async fn test_non_staff_token_refused_before_lookup() {
    let now = Utc::now().timestamp();
    let claims = UserClaims {
        sub: "reader".to_string(),
        user_id: 9,
        is_staff: false,
        exp: now + 3600,
        iat: now,
    };
    let result = services().users.staff_account(&claims).await;
    assert!(matches!(result, Err(AppError::Authorization(_))));
}
