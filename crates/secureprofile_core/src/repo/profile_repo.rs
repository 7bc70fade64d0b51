//! Profile repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD and filtered listing over the session `profiles` table.
//! - Keep SQL details inside the repository boundary.
//!
//! # Invariants
//! - Write paths must call `Profile::validate()` before SQL mutations.
//! - Read paths reject invalid stored state instead of masking it.
//! - Listing order is `last_updated DESC, id ASC`.
//! - Search uses `Profile::matches_search`, so case folding is Unicode-aware.

use crate::db::DbError;
use crate::model::profile::{Gender, Profile, ProfileId, ProfileStatus, ProfileValidationError};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const PROFILE_SELECT_SQL: &str = "SELECT
    id,
    name,
    alias,
    gender,
    age,
    entry_point,
    entry_date,
    occupation,
    criminal_background,
    status,
    last_updated
FROM profiles";

pub type RepoResult<T> = Result<T, RepoError>;

#[derive(Debug)]
pub enum RepoError {
    Validation(ProfileValidationError),
    Db(DbError),
    NotFound(ProfileId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "profile not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid stored profile data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<ProfileValidationError> for RepoError {
    fn from(value: ProfileValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Filter and pagination options for listing profiles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileListQuery {
    /// Case-insensitive substring over name, alias, occupation, entry point.
    pub search: Option<String>,
    /// `None` means every status.
    pub status: Option<ProfileStatus>,
    pub limit: Option<u32>,
    pub offset: u32,
}

/// Repository interface for profile records.
pub trait ProfileRepository {
    fn create_profile(&self, profile: &Profile) -> RepoResult<ProfileId>;
    fn update_profile(&self, profile: &Profile) -> RepoResult<()>;
    fn get_profile(&self, id: ProfileId) -> RepoResult<Option<Profile>>;
    fn list_profiles(&self, query: &ProfileListQuery) -> RepoResult<Vec<Profile>>;
    fn count_profiles(&self) -> RepoResult<u64>;
}

/// SQLite-backed profile repository over the session connection.
pub struct SqliteProfileRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProfileRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ProfileRepository for SqliteProfileRepository<'_> {
    fn create_profile(&self, profile: &Profile) -> RepoResult<ProfileId> {
        profile.validate()?;

        self.conn.execute(
            "INSERT INTO profiles (
                id,
                name,
                alias,
                gender,
                age,
                entry_point,
                entry_date,
                occupation,
                criminal_background,
                status,
                last_updated
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11);",
            params![
                profile.id.to_string(),
                profile.name.as_str(),
                profile.alias.as_str(),
                profile.gender.as_str(),
                profile.age,
                profile.entry_point.as_str(),
                profile.entry_date.as_str(),
                profile.occupation.as_str(),
                profile.criminal_background,
                profile.status.as_str(),
                profile.last_updated_ms,
            ],
        )?;

        Ok(profile.id)
    }

    fn update_profile(&self, profile: &Profile) -> RepoResult<()> {
        profile.validate()?;

        let changed = self.conn.execute(
            "UPDATE profiles
             SET
                name = ?1,
                alias = ?2,
                gender = ?3,
                age = ?4,
                entry_point = ?5,
                entry_date = ?6,
                occupation = ?7,
                criminal_background = ?8,
                status = ?9,
                last_updated = ?10
             WHERE id = ?11;",
            params![
                profile.name.as_str(),
                profile.alias.as_str(),
                profile.gender.as_str(),
                profile.age,
                profile.entry_point.as_str(),
                profile.entry_date.as_str(),
                profile.occupation.as_str(),
                profile.criminal_background,
                profile.status.as_str(),
                profile.last_updated_ms,
                profile.id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(profile.id));
        }
        Ok(())
    }

    fn get_profile(&self, id: ProfileId) -> RepoResult<Option<Profile>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PROFILE_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_profile_row(row)?));
        }
        Ok(None)
    }

    fn list_profiles(&self, query: &ProfileListQuery) -> RepoResult<Vec<Profile>> {
        let mut sql = format!("{PROFILE_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(status) = query.status {
            sql.push_str(" AND status = ?");
            bind_values.push(Value::Text(status.as_str().to_string()));
        }
        sql.push_str(" ORDER BY last_updated DESC, id ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut matched = Vec::new();
        while let Some(row) = rows.next()? {
            let profile = parse_profile_row(row)?;
            // SQLite `lower()`/`LIKE` only fold ASCII; match in Rust instead.
            if query
                .search
                .as_deref()
                .map_or(true, |term| profile.matches_search(term))
            {
                matched.push(profile);
            }
        }

        let limit = query.limit.map_or(usize::MAX, |limit| limit as usize);
        Ok(matched
            .into_iter()
            .skip(query.offset as usize)
            .take(limit)
            .collect())
    }

    fn count_profiles(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM profiles;", [], |row| row.get(0))?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative profile count `{count}`")))
    }
}

fn parse_profile_row(row: &Row<'_>) -> RepoResult<Profile> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{id_text}` in profiles.id"))
    })?;

    let gender_text: String = row.get("gender")?;
    let gender = Gender::parse(&gender_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid gender `{gender_text}` in profiles.gender"))
    })?;

    let status_text: String = row.get("status")?;
    let status = ProfileStatus::parse(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid status `{status_text}` in profiles.status"))
    })?;

    let profile = Profile {
        id,
        name: row.get("name")?,
        alias: row.get("alias")?,
        gender,
        age: row.get("age")?,
        entry_point: row.get("entry_point")?,
        entry_date: row.get("entry_date")?,
        occupation: row.get("occupation")?,
        criminal_background: row.get("criminal_background")?,
        status,
        last_updated_ms: row.get("last_updated")?,
    };
    profile.validate()?;
    Ok(profile)
}
