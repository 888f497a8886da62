use tracing::error;

use crate::{
    db::Database,
    error::{AppError, Result},
    models::user::{DEFAULT_ROLE, NewUser, User, UserPatch},
};

/// User store for database operations
pub struct UserStore {
    db: Database,
}

impl UserStore {
    /// Create a new UserStore on top of an initialized database handle
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Get a list of all users, in storage order
    pub async fn get_all_users(&self) -> Result<Vec<User>> {
        self.db
            .all(sqlx::query_as::<_, User>("SELECT * FROM users"))
            .await
    }

    /// Insert a user with the default role and return its id
    pub async fn create_user(&self, user: &NewUser) -> Result<i64> {
        let result = self
            .db
            .run(
                sqlx::query("INSERT INTO users (username, password, role) VALUES (?, ?, ?)")
                    .bind(&user.username)
                    .bind(&user.password)
                    .bind(DEFAULT_ROLE),
            )
            .await;

        match result {
            Ok(done) => Ok(done.last_id),
            Err(e) => {
                error!("Create user error: {}", e);
                Err(e)
            }
        }
    }

    /// Find a user by ID, `None` if no row matches
    pub async fn find_user_by_id(&self, id: i64) -> Result<Option<User>> {
        let users = self
            .db
            .all(sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?").bind(id))
            .await
            .inspect_err(|e| error!("Find user by ID error: {}", e))?;

        Ok(users.into_iter().next())
    }

    /// Get a user by ID, failing with `UserNotFound` if no row matches
    pub async fn get_user(&self, id: i64) -> Result<User> {
        self.find_user_by_id(id).await?.ok_or(AppError::UserNotFound)
    }

    /// Overwrite username and password of a user.
    ///
    /// Fields missing from `patch` are written as empty strings. Returns `false`
    /// only when the statement failed; a missing row still counts as success.
    pub async fn update_user(&self, id: i64, patch: &UserPatch) -> bool {
        let result = self
            .db
            .run(
                sqlx::query(
                    r#"
                    UPDATE users
                    SET username = ?,
                        password = ?
                    WHERE id = ?
                    "#,
                )
                .bind(patch.username.clone().unwrap_or_default())
                .bind(patch.password.clone().unwrap_or_default())
                .bind(id),
            )
            .await;

        match result {
            Ok(_) => true,
            Err(e) => {
                error!("Update user error: {}", e);
                false
            }
        }
    }

    /// Delete a user by ID. Returns `false` only when the statement failed.
    pub async fn delete_user(&self, id: i64) -> bool {
        match self
            .db
            .run(sqlx::query("DELETE FROM users WHERE id = ?").bind(id))
            .await
        {
            Ok(_) => true,
            Err(e) => {
                error!("Delete user error: {}", e);
                false
            }
        }
    }

    /// Release the database handle
    pub async fn close(self) {
        self.db.close().await;
    }
}
