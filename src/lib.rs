pub mod config;
pub mod db;
pub mod error;
pub mod models;


pub use config::Config;
pub use db::{Database, RunResult, init_db, setup_database, user_store::UserStore};
pub use error::{AppError, Result};
pub use models::{NewUser, User, UserPatch};
