//! Catalog seeding utility
//!
//! Clears the catalog tables and fills them with random genres, languages,
//! authors, books and copies for development.
//!
//! ```bash
//! catalog-seed --mode refresh --authors 20 --books 50 --instances 120 --demo-users
//! catalog-seed --mode clear
//! ```

use anyhow::{bail, Context};
use chrono::{Duration, NaiveDate};
use clap::{Parser, ValueEnum};
use rand::{seq::SliceRandom, Rng};
use sqlx::postgres::PgPoolOptions;

use catalog_server::{
    config::AppConfig,
    models::{
        author::AuthorInput,
        book::BookInput,
        instance::{today, InstanceInput, LoanStatus},
        reference::{GenreInput, LanguageInput},
        user::Permission,
    },
    repository::Repository,
    services::users::UsersService,
};

const FIRST_NAMES: &[&str] = &[
    "Ada", "Boris", "Clara", "Dmitri", "Elena", "Farid", "Grace", "Hugo", "Ines", "Jonas",
    "Keiko", "Liam", "Marta", "Nadia", "Oscar", "Priya", "Quentin", "Rosa", "Sven", "Tamar",
];

const LAST_NAMES: &[&str] = &[
    "Abbott", "Bianchi", "Castillo", "Dubois", "Eriksen", "Fischer", "Gallagher", "Haddad",
    "Ivanova", "Jensen", "Kowalski", "Lindqvist", "Moreau", "Novak", "Okafor", "Petrov",
    "Quinn", "Rossi", "Sato", "Tanaka",
];

const LANGUAGES: &[&str] = &[
    "English", "French", "German", "Spanish", "Italian", "Portuguese", "Polish", "Russian",
    "Japanese", "Swahili", "Hindi", "Arabic", "Dutch", "Swedish", "Turkish", "Greek",
];

const WORDS: &[&str] = &[
    "river", "silent", "garden", "winter", "lantern", "harbor", "stone", "orchard", "mirror",
    "distant", "salt", "ember", "paper", "crown", "hollow", "night", "glass", "and", "thread",
    "quiet", "meadow", "storm", "letters", "iron",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Clear the catalog, then create fresh rows
    Refresh,
    /// Clear the catalog and stop
    Clear,
}

#[derive(Parser)]
#[command(name = "catalog-seed")]
#[command(about = "Seed the catalog database for testing and development", long_about = None)]
#[command(version)]
struct Cli {
    #[arg(long, value_enum, default_value_t = Mode::Refresh)]
    mode: Mode,

    /// Number of authors to create
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..=1000))]
    authors: u32,

    /// Number of genres to create
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..=1000))]
    genres: u32,

    /// Number of languages to create
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u32).range(1..=1000))]
    languages: u32,

    /// Number of books to create
    #[arg(long, default_value_t = 20, value_parser = clap::value_parser!(u32).range(1..=1000))]
    books: u32,

    /// Number of book copies to create
    #[arg(long, default_value_t = 50, value_parser = clap::value_parser!(u32).range(1..=1000))]
    instances: u32,

    /// Also create `librarian` (all permissions) and `patron` accounts
    #[arg(long)]
    demo_users: bool,

    /// Password for the demo accounts
    #[arg(long, default_value = "catalog")]
    demo_password: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = AppConfig::load().context("Failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("catalog_server={}", config.logging.level).into()),
        )
        .init();

    if config.database.is_in_memory() {
        bail!("Seeding needs a PostgreSQL database, the in-memory store does not persist");
    }

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await
        .context("Failed to connect to database")?;
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    let repository = Repository::postgres(pool);
    let users = UsersService::new(repository.clone(), config.auth.clone());

    println!("Clearing catalog tables...");
    repository.maintenance.clear_catalog().await?;
    if cli.mode == Mode::Clear {
        println!("done.");
        return Ok(());
    }

    if cli.demo_users {
        ensure_user(&users, &repository, "librarian", &cli.demo_password, Permission::ALL.to_vec())
            .await?;
        ensure_user(&users, &repository, "patron", &cli.demo_password, Vec::new()).await?;
    }

    println!("Seeding data...");
    let mut seeder = Seeder {
        repository,
        rng: rand::thread_rng(),
    };
    seeder.run(&cli).await?;
    println!("done.");

    Ok(())
}

async fn ensure_user(
    users: &UsersService,
    repository: &Repository,
    username: &str,
    password: &str,
    permissions: Vec<Permission>,
) -> anyhow::Result<()> {
    if repository.users.find_by_username(username).await?.is_some() {
        println!("User {} already exists, kept as is", username);
        return Ok(());
    }
    users.create_user(username, password, permissions).await?;
    println!("Created user {}", username);
    Ok(())
}

struct Seeder<R: Rng> {
    repository: Repository,
    rng: R,
}

impl<R: Rng> Seeder<R> {
    async fn run(&mut self, cli: &Cli) -> anyhow::Result<()> {
        let mut author_ids = Vec::new();
        for _ in 0..cli.authors {
            author_ids.push(self.create_author().await?);
        }

        let mut genre_ids = Vec::new();
        for _ in 0..cli.genres {
            let input = GenreInput {
                name: self.made_up_word(),
            };
            let genre = self.repository.genres.create_genre(&input).await?;
            println!("The {} genre created.", genre.name);
            genre_ids.push(genre.id);
        }

        let mut language_ids = Vec::new();
        for n in 0..cli.languages as usize {
            let base = LANGUAGES[n % LANGUAGES.len()];
            let name = match n / LANGUAGES.len() {
                0 => base.to_string(),
                round => format!("{} {}", base, round + 1),
            };
            let language = self
                .repository
                .languages
                .create_language(&LanguageInput { name })
                .await?;
            println!("The {} language created.", language.name);
            language_ids.push(language.id);
        }

        let mut book_ids = Vec::new();
        for _ in 0..cli.books {
            let input = BookInput {
                title: self.title(),
                summary: self.sentence(),
                isbn: self.unused_isbn().await?,
                author_id: author_ids.choose(&mut self.rng).copied(),
                language_id: language_ids.choose(&mut self.rng).copied(),
                genre_ids: genre_ids.choose(&mut self.rng).copied().into_iter().collect(),
            };
            let book = self.repository.books.create_book(&input).await?;
            println!("The book {} created.", book.book.title);
            book_ids.push(book.book.id);
        }

        let borrowers: Vec<i32> = self
            .repository
            .users
            .list_users()
            .await?
            .into_iter()
            .map(|user| user.id)
            .collect();
        let statuses = [
            LoanStatus::Maintenance,
            LoanStatus::OnLoan,
            LoanStatus::Available,
            LoanStatus::Reserved,
        ];
        for _ in 0..cli.instances {
            let Some(&book_id) = book_ids.choose(&mut self.rng) else {
                break;
            };
            let status = statuses.choose(&mut self.rng).copied().unwrap_or_default();
            let (due_back, borrower_id) = if status == LoanStatus::OnLoan {
                let days = self.rng.gen_range(7..=31);
                (
                    Some(today() + Duration::days(days)),
                    borrowers.choose(&mut self.rng).copied(),
                )
            } else {
                (None, None)
            };
            let input = InstanceInput {
                book_id,
                imprint: self.sentence(),
                status,
                due_back,
                borrower_id,
            };
            let instance = self.repository.instances.create_instance(&input).await?;
            println!(
                "The copy {} of {} created.",
                instance.instance.id, instance.book_title
            );
        }

        Ok(())
    }

    async fn create_author(&mut self) -> anyhow::Result<i32> {
        let birth = NaiveDate::from_ymd_opt(
            self.rng.gen_range(1700..=1990),
            self.rng.gen_range(1..=12),
            self.rng.gen_range(1..=28),
        )
        .context("Generated an invalid birth date")?;
        let death = birth + Duration::weeks(52 * self.rng.gen_range(20..=80));

        let input = AuthorInput {
            first_name: pick(&mut self.rng, FIRST_NAMES),
            last_name: pick(&mut self.rng, LAST_NAMES),
            date_of_birth: Some(birth),
            date_of_death: Some(death),
            biography: Some(self.sentence()),
        };
        let author = self.repository.authors.create_author(&input).await?;
        println!(
            "The author {} {}, born {}, died {} created.",
            author.first_name, author.last_name, birth, death
        );
        Ok(author.id)
    }

    /// 4 to 10 random letters, capitalized
    fn made_up_word(&mut self) -> String {
        let len = self.rng.gen_range(4..=10);
        let mut word: String = (0..len)
            .map(|_| self.rng.gen_range(b'a'..=b'z') as char)
            .collect();
        word[..1].make_ascii_uppercase();
        word
    }

    fn title(&mut self) -> String {
        let words = self.rng.gen_range(1..=4);
        let mut title: Vec<String> = (0..words).map(|_| pick(&mut self.rng, WORDS)).collect();
        if let Some(first) = title.first_mut() {
            first[..1].make_ascii_uppercase();
        }
        title.join(" ")
    }

    fn sentence(&mut self) -> String {
        let words = self.rng.gen_range(6..=14);
        let text: Vec<String> = (0..words).map(|_| pick(&mut self.rng, WORDS)).collect();
        format!("{}.", text.join(" "))
    }

    async fn unused_isbn(&mut self) -> anyhow::Result<String> {
        loop {
            let isbn = format!("978{:010}", self.rng.gen_range(0..10_000_000_000u64));
            if self.repository.books.find_by_isbn(&isbn).await?.is_none() {
                return Ok(isbn);
            }
        }
    }
}

fn pick<R: Rng>(rng: &mut R, words: &[&str]) -> String {
    words.choose(rng).copied().unwrap_or_default().to_string()
}
