//! Seed script for development — populates a fresh database with sample data.
//!
//! Usage: `cargo run --bin seed`
//!
//! Requires `DATABASE_URL` (reads .env).

use chrono::{Days, Utc};
use sqlx::PgPool;
use uuid::Uuid;

const TEST_EMAIL: &str = "test@example.com";
const TEST_PASSWORD: &str = "test123";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let db_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&db_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    println!("=== lifedash seed script ===");

    let user_id = seed_test_user(&pool).await?;
    if let Some(user_id) = user_id {
        seed_sample_records(&pool, user_id).await?;
    }

    println!("\n=== Seed complete! ===");
    println!("Login: {TEST_EMAIL} / {TEST_PASSWORD}");

    Ok(())
}

async fn seed_test_user(pool: &PgPool) -> anyhow::Result<Option<Uuid>> {
    let existing: Option<Uuid> =
        sqlx::query_scalar("SELECT id FROM users WHERE email = $1")
            .bind(TEST_EMAIL)
            .fetch_optional(pool)
            .await?;
    if existing.is_some() {
        println!("[skip] Test user already exists: {TEST_EMAIL}");
        return Ok(None);
    }

    let hash = lifedash::services::auth::hash_password(TEST_PASSWORD)?;
    let user_id: Uuid = sqlx::query_scalar(
        "INSERT INTO users (email, password_hash, name) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(TEST_EMAIL)
    .bind(&hash)
    .bind("Test")
    .fetch_one(pool)
    .await?;

    println!("[done] Created test user");
    Ok(Some(user_id))
}

async fn seed_sample_records(pool: &PgPool, user_id: Uuid) -> anyhow::Result<()> {
    sqlx::query(
        "INSERT INTO tasks (user_id, title, priority, completed) VALUES
         ($1, 'Plan the week', 'high', true),
         ($1, 'Buy groceries', 'medium', false),
         ($1, 'Book dentist appointment', 'low', false)",
    )
    .bind(user_id)
    .execute(pool)
    .await?;

    sqlx::query(
        "INSERT INTO goals (user_id, title, progress, status) VALUES
         ($1, 'Read 12 books this year', 25, 'active'),
         ($1, 'Save an emergency fund', 60, 'active')",
    )
    .bind(user_id)
    .execute(pool)
    .await?;

    let habit_id: Uuid = sqlx::query_scalar(
        "INSERT INTO habits (user_id, name) VALUES ($1, 'Morning exercise') RETURNING id",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    // A three-day streak ending today
    let today = Utc::now().date_naive();
    for offset in 0..3u64 {
        sqlx::query("INSERT INTO habit_logs (habit_id, date, completed) VALUES ($1, $2, true)")
            .bind(habit_id)
            .bind(today - Days::new(offset))
            .execute(pool)
            .await?;
    }

    sqlx::query(
        "INSERT INTO finance (user_id, entry_type, amount, category) VALUES
         ($1, 'income', 2500.00, 'Salary'),
         ($1, 'expense', 340.50, 'Groceries'),
         ($1, 'expense', 59.99, 'Entertainment')",
    )
    .bind(user_id)
    .execute(pool)
    .await?;

    sqlx::query(
        "INSERT INTO notes (user_id, title, content) VALUES
         ($1, 'Welcome', 'This is your scratchpad. Notes support plain text.')",
    )
    .bind(user_id)
    .execute(pool)
    .await?;

    sqlx::query(
        "INSERT INTO activity_log (user_id, action) VALUES
         ($1, 'task_created'), ($1, 'task_completed'), ($1, 'habit_logged')",
    )
    .bind(user_id)
    .execute(pool)
    .await?;

    println!("[done] Created sample records");
    Ok(())
}
