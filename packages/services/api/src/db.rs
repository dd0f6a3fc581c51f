use std::path::Path;
use std::str::FromStr;

use chrono::Utc;
use serde::Serialize;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use mealtrack_core::id;

#[derive(Clone)]
pub struct MealDb {
    pool: SqlitePool,
}

impl MealDb {
    pub async fn new(db_url: &str) -> anyhow::Result<Self> {
        if let Some(path) = db_url.strip_prefix("sqlite://") {
            if let Some(parent) = Path::new(path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
        }
        let options = SqliteConnectOptions::from_str(db_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        let db = Self { pool };
        db.init().await?;
        Ok(db)
    }

    #[cfg(test)]
    pub async fn in_memory() -> anyhow::Result<Self> {
        // in-memory SQLite는 커넥션마다 별도 DB이므로 커넥션을 1개로 고정
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;

        let db = Self { pool };
        db.init().await?;
        Ok(db)
    }

    async fn init(&self) -> anyhow::Result<()> {
        let queries = [
            r#"CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                username TEXT NOT NULL UNIQUE,
                email TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );"#,
            r#"CREATE TABLE IF NOT EXISTS meals (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                name TEXT NOT NULL,
                protein REAL NOT NULL,
                carb REAL NOT NULL,
                fat REAL NOT NULL,
                date TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );"#,
            r#"CREATE INDEX IF NOT EXISTS idx_meals_user_date ON meals(user_id, date);"#,
        ];

        for q in queries {
            sqlx::query(q).execute(&self.pool).await?;
        }

        Ok(())
    }

    pub async fn user_exists(&self, username: &str, email: &str) -> sqlx::Result<bool> {
        let row = sqlx::query("SELECT 1 FROM users WHERE username = ?1 OR email = ?2")
            .bind(username)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    pub async fn insert_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> sqlx::Result<UserRow> {
        let now = Utc::now().to_rfc3339();
        let user = UserRow {
            id: id::new_id(),
            username: username.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: now.clone(),
            updated_at: now,
        };

        sqlx::query(
            r#"INSERT INTO users (id, username, email, password_hash, created_at, updated_at)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6)"#,
        )
        .bind(&user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.created_at)
        .bind(&user.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn find_user_by_email(&self, email: &str) -> sqlx::Result<Option<UserRow>> {
        sqlx::query_as::<_, UserRow>(
            r#"SELECT id, username, email, password_hash, created_at, updated_at
               FROM users WHERE email = ?1"#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn insert_meal(
        &self,
        user_id: &str,
        name: &str,
        protein: f64,
        carb: f64,
        fat: f64,
        date: &str,
    ) -> sqlx::Result<MealRow> {
        let now = Utc::now().to_rfc3339();
        let meal = MealRow {
            id: id::new_id(),
            user_id: user_id.to_string(),
            name: name.to_string(),
            protein,
            carb,
            fat,
            date: date.to_string(),
            created_at: now.clone(),
            updated_at: now,
        };

        sqlx::query(
            r#"INSERT INTO meals (id, user_id, name, protein, carb, fat, date, created_at, updated_at)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"#,
        )
        .bind(&meal.id)
        .bind(&meal.user_id)
        .bind(&meal.name)
        .bind(meal.protein)
        .bind(meal.carb)
        .bind(meal.fat)
        .bind(&meal.date)
        .bind(&meal.created_at)
        .bind(&meal.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(meal)
    }

    pub async fn find_meal(&self, meal_id: &str) -> sqlx::Result<Option<MealRow>> {
        sqlx::query_as::<_, MealRow>(
            r#"SELECT id, user_id, name, protein, carb, fat, date, created_at, updated_at
               FROM meals WHERE id = ?1"#,
        )
        .bind(meal_id)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn list_meals(&self, user_id: &str, date: Option<&str>) -> sqlx::Result<Vec<MealRow>> {
        match date {
            Some(date) => {
                sqlx::query_as::<_, MealRow>(
                    r#"SELECT id, user_id, name, protein, carb, fat, date, created_at, updated_at
                       FROM meals WHERE user_id = ?1 AND date = ?2 ORDER BY created_at"#,
                )
                .bind(user_id)
                .bind(date)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, MealRow>(
                    r#"SELECT id, user_id, name, protein, carb, fat, date, created_at, updated_at
                       FROM meals WHERE user_id = ?1 ORDER BY created_at"#,
                )
                .bind(user_id)
                .fetch_all(&self.pool)
                .await
            }
        }
    }

    pub async fn update_meal(
        &self,
        meal_id: &str,
        name: &str,
        protein: f64,
        carb: f64,
        fat: f64,
        date: &str,
    ) -> sqlx::Result<Option<MealRow>> {
        sqlx::query(
            r#"UPDATE meals SET name = ?1, protein = ?2, carb = ?3, fat = ?4, date = ?5, updated_at = ?6
               WHERE id = ?7"#,
        )
        .bind(name)
        .bind(protein)
        .bind(carb)
        .bind(fat)
        .bind(date)
        .bind(Utc::now().to_rfc3339())
        .bind(meal_id)
        .execute(&self.pool)
        .await?;

        self.find_meal(meal_id).await
    }

    pub async fn delete_meal(&self, meal_id: &str) -> sqlx::Result<()> {
        sqlx::query("DELETE FROM meals WHERE id = ?1")
            .bind(meal_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MealRow {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub protein: f64,
    pub carb: f64,
    pub fat: f64,
    pub date: String,
    pub created_at: String,
    pub updated_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_user_insert_and_lookup() {
        let db = MealDb::in_memory().await.unwrap();

        let user = db
            .insert_user("alice", "alice@example.com", "hash")
            .await
            .unwrap();
        assert_eq!(user.id.len(), 26);

        let found = db.find_user_by_email("alice@example.com").await.unwrap();
        assert_eq!(found.unwrap().username, "alice");

        assert!(db.user_exists("alice", "other@example.com").await.unwrap());
        assert!(db.user_exists("other", "alice@example.com").await.unwrap());
        assert!(!db.user_exists("bob", "bob@example.com").await.unwrap());
    }

    #[tokio::test]
    async fn test_meal_crud() {
        let db = MealDb::in_memory().await.unwrap();

        let meal = db
            .insert_meal("user_1", "Chicken salad", 30.0, 10.0, 5.0, "2026-08-07")
            .await
            .unwrap();

        let found = db.find_meal(&meal.id).await.unwrap().unwrap();
        assert_eq!(found.name, "Chicken salad");
        assert_eq!(found.user_id, "user_1");

        let updated = db
            .update_meal(&meal.id, "Chicken wrap", 28.0, 25.0, 8.0, "2026-08-07")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.name, "Chicken wrap");
        assert_eq!(updated.carb, 25.0);
        assert_eq!(updated.created_at, meal.created_at);

        db.delete_meal(&meal.id).await.unwrap();
        assert!(db.find_meal(&meal.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_meals_scoped_to_user_and_date() {
        let db = MealDb::in_memory().await.unwrap();

        db.insert_meal("user_1", "Breakfast", 10.0, 40.0, 10.0, "2026-08-06")
            .await
            .unwrap();
        db.insert_meal("user_1", "Lunch", 25.0, 50.0, 15.0, "2026-08-07")
            .await
            .unwrap();
        db.insert_meal("user_2", "Dinner", 35.0, 30.0, 20.0, "2026-08-07")
            .await
            .unwrap();

        let all = db.list_meals("user_1", None).await.unwrap();
        assert_eq!(all.len(), 2);

        let today = db.list_meals("user_1", Some("2026-08-07")).await.unwrap();
        assert_eq!(today.len(), 1);
        assert_eq!(today[0].name, "Lunch");

        let other = db.list_meals("user_3", None).await.unwrap();
        assert!(other.is_empty());
    }
}
