use async_trait::async_trait;
use chrono::Utc;
use libsql::{Builder, Connection};
use uuid::Uuid;

use super::repository::{NewUser, User, UserRepository};
use crate::types::{AppError, Result};

/// Account store backed by libSQL: a local SQLite file, or a remote Turso
/// database behind the `turso` feature.
///
/// Uniqueness is enforced by the database itself through UNIQUE columns, so
/// concurrent creates resolve inside the engine and the losing insert comes
/// back as a constraint failure.
pub struct SqliteUserRepository {
    // Created once at init and cloned per operation. `:memory:` databases
    // exist per connection, so every operation must share this handle.
    conn: Connection,
}

impl SqliteUserRepository {
    /// Opens (or creates) a file-based SQLite database.
    pub async fn new_local(path: &str) -> Result<Self> {
        let db = Builder::new_local(path)
            .build()
            .await
            .map_err(|e| AppError::Store(format!("Failed to open database: {}", e)))?;

        Self::from_database(db).await
    }

    /// Opens an in-memory SQLite database, lost when the repository drops.
    pub async fn new_memory() -> Result<Self> {
        let db = Builder::new_local(":memory:")
            .build()
            .await
            .map_err(|e| AppError::Store(format!("Failed to open database: {}", e)))?;

        Self::from_database(db).await
    }

    /// Connects to a remote Turso database.
    #[cfg(feature = "turso")]
    pub async fn new_remote(url: String, auth_token: String) -> Result<Self> {
        let db = Builder::new_remote(url, auth_token)
            .build()
            .await
            .map_err(|e| AppError::Store(format!("Failed to connect to Turso: {}", e)))?;

        Self::from_database(db).await
    }

    async fn from_database(db: libsql::Database) -> Result<Self> {
        let conn = db
            .connect()
            .map_err(|e| AppError::Store(format!("Failed to get connection: {}", e)))?;

        let repo = Self { conn };
        repo.initialize_schema().await?;

        Ok(repo)
    }

    fn connection(&self) -> Connection {
        self.conn.clone()
    }

    async fn initialize_schema(&self) -> Result<()> {
        let conn = self.connection();

        // username is declared before email: when an insert violates both
        // constraints, SQLite reports the username one, which keeps the
        // conflict translation deterministic.
        conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                username TEXT UNIQUE NOT NULL,
                email TEXT UNIQUE NOT NULL,
                password_hash TEXT NOT NULL,
                full_name TEXT NOT NULL,
                is_active INTEGER NOT NULL DEFAULT 1,
                roles TEXT NOT NULL,
                created_at INTEGER NOT NULL
            )",
            (),
        )
        .await
        .map_err(|e| AppError::Store(format!("Failed to create users table: {}", e)))?;

        Ok(())
    }
}

/// Maps a failed user INSERT onto the error taxonomy. UNIQUE violations
/// become the matching conflict error, everything else stays a store error.
fn translate_create_error(e: libsql::Error) -> AppError {
    let msg = e.to_string();

    if msg.contains("UNIQUE constraint failed: users.username") {
        AppError::UsernameTaken
    } else if msg.contains("UNIQUE constraint failed: users.email") {
        AppError::EmailTaken
    } else {
        AppError::Store(format!("Failed to create user: {}", msg))
    }
}

fn row_to_user(row: &libsql::Row) -> Result<User> {
    let roles_json: String = row.get(6).map_err(|e| AppError::Store(e.to_string()))?;
    let roles: Vec<String> = serde_json::from_str(&roles_json)
        .map_err(|e| AppError::Store(format!("Corrupt roles column: {}", e)))?;

    Ok(User {
        id: row.get(0).map_err(|e| AppError::Store(e.to_string()))?,
        username: row.get(1).map_err(|e| AppError::Store(e.to_string()))?,
        email: row.get(2).map_err(|e| AppError::Store(e.to_string()))?,
        password_hash: row.get(3).map_err(|e| AppError::Store(e.to_string()))?,
        full_name: row.get(4).map_err(|e| AppError::Store(e.to_string()))?,
        is_active: row.get::<i64>(5).map_err(|e| AppError::Store(e.to_string()))? != 0,
        roles,
        created_at: row.get(7).map_err(|e| AppError::Store(e.to_string()))?,
    })
}

const USER_COLUMNS: &str =
    "id, username, email, password_hash, full_name, is_active, roles, created_at";

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn create(&self, new_user: NewUser) -> Result<User> {
        let conn = self.connection();

        let user = User {
            id: Uuid::new_v4().to_string(),
            username: new_user.username,
            email: new_user.email,
            password_hash: new_user.password_hash,
            full_name: new_user.full_name,
            is_active: true,
            roles: new_user.roles,
            created_at: Utc::now().timestamp(),
        };
        let roles_json = serde_json::to_string(&user.roles)
            .map_err(|e| AppError::Store(format!("Failed to encode roles: {}", e)))?;

        conn.execute(
            "INSERT INTO users (id, username, email, password_hash, full_name, is_active, roles, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            (
                user.id.as_str(),
                user.username.as_str(),
                user.email.as_str(),
                user.password_hash.as_str(),
                user.full_name.as_str(),
                1_i64,
                roles_json.as_str(),
                user.created_at,
            ),
        )
        .await
        .map_err(translate_create_error)?;

        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let conn = self.connection();

        let mut rows = conn
            .query(
                &format!("SELECT {} FROM users WHERE username = ?", USER_COLUMNS),
                [username],
            )
            .await
            .map_err(|e| AppError::Store(format!("Failed to query user: {}", e)))?;

        if let Some(row) = rows
            .next()
            .await
            .map_err(|e| AppError::Store(e.to_string()))?
        {
            Ok(Some(row_to_user(&row)?))
        } else {
            Ok(None)
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let conn = self.connection();

        let mut rows = conn
            .query(
                &format!("SELECT {} FROM users WHERE email = ?", USER_COLUMNS),
                [email],
            )
            .await
            .map_err(|e| AppError::Store(format!("Failed to query user: {}", e)))?;

        if let Some(row) = rows
            .next()
            .await
            .map_err(|e| AppError::Store(e.to_string()))?
        {
            Ok(Some(row_to_user(&row)?))
        } else {
            Ok(None)
        }
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        let conn = self.connection();

        let mut rows = conn
            .query(
                &format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS),
                [id],
            )
            .await
            .map_err(|e| AppError::Store(format!("Failed to query user: {}", e)))?;

        if let Some(row) = rows
            .next()
            .await
            .map_err(|e| AppError::Store(e.to_string()))?
        {
            Ok(Some(row_to_user(&row)?))
        } else {
            Ok(None)
        }
    }

    async fn find_all(&self) -> Result<Vec<User>> {
        let conn = self.connection();

        let mut rows = conn
            .query(
                &format!(
                    "SELECT {} FROM users ORDER BY created_at ASC, rowid ASC",
                    USER_COLUMNS
                ),
                (),
            )
            .await
            .map_err(|e| AppError::Store(format!("Failed to list users: {}", e)))?;

        let mut users = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| AppError::Store(e.to_string()))?
        {
            users.push(row_to_user(&row)?);
        }

        Ok(users)
    }
}
