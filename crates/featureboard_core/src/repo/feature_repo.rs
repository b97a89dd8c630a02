//! Feature repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD and aggregate APIs over the `features` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Every statement binds user values as parameters; column names in
//!   dynamic SQL come from a fixed set.
//! - Read paths reject invalid persisted state instead of masking it.
//! - `updated_at` is maintained by the schema trigger, never by this code.

use crate::db::migrations::{current_version, latest_version};
use crate::db::DbError;
use crate::model::feature::{
    Feature, FeatureId, FeatureListQuery, FeaturePatch, FeatureStats, FeatureStatus, NewFeature,
    MAX_PRIORITY, MIN_PRIORITY,
};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const FEATURE_SELECT_SQL: &str = "SELECT
    id,
    title,
    description,
    module,
    status,
    priority,
    created_at,
    updated_at
FROM features";

const REQUIRED_COLUMNS: &[&str] = &[
    "id",
    "title",
    "description",
    "module",
    "status",
    "priority",
    "created_at",
    "updated_at",
];

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for feature persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound(FeatureId),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "feature not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted feature data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
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

/// Repository interface for feature operations.
pub trait FeatureRepository {
    /// Lists matching features, most urgent and newest first.
    fn list_features(&self, query: &FeatureListQuery) -> RepoResult<Vec<Feature>>;
    fn get_feature(&self, id: FeatureId) -> RepoResult<Option<Feature>>;
    /// Inserts a feature and returns the stored record.
    fn create_feature(&self, feature: &NewFeature) -> RepoResult<Feature>;
    /// Applies the present patch fields and returns the stored record.
    fn update_feature(&self, id: FeatureId, patch: &FeaturePatch) -> RepoResult<Feature>;
    fn delete_feature(&self, id: FeatureId) -> RepoResult<()>;
    fn feature_stats(&self) -> RepoResult<FeatureStats>;
}

/// SQLite-backed feature repository.
pub struct SqliteFeatureRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteFeatureRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations have not been applied.
    /// - `MissingRequiredTable`/`MissingRequiredColumn` when the schema is
    ///   not the one this crate created.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let actual_version = current_version(conn)?;
        let expected_version = latest_version();
        if actual_version != expected_version {
            return Err(RepoError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }

        if !table_exists(conn, "features")? {
            return Err(RepoError::MissingRequiredTable("features"));
        }
        for &column in REQUIRED_COLUMNS {
            if !table_has_column(conn, "features", column)? {
                return Err(RepoError::MissingRequiredColumn {
                    table: "features",
                    column,
                });
            }
        }

        Ok(Self { conn })
    }
}

impl FeatureRepository for SqliteFeatureRepository<'_> {
    fn list_features(&self, query: &FeatureListQuery) -> RepoResult<Vec<Feature>> {
        let mut sql = format!("{FEATURE_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(status) = query.status {
            sql.push_str(" AND status = ?");
            bind_values.push(Value::Text(status.as_str().to_string()));
        }

        if let Some(module) = query.module.as_ref() {
            sql.push_str(" AND module = ?");
            bind_values.push(Value::Text(module.clone()));
        }

        // id breaks ties between rows created within the same millisecond.
        sql.push_str(" ORDER BY priority DESC, created_at DESC, id DESC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut features = Vec::new();

        while let Some(row) = rows.next()? {
            features.push(parse_feature_row(row)?);
        }

        Ok(features)
    }

    fn get_feature(&self, id: FeatureId) -> RepoResult<Option<Feature>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{FEATURE_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_feature_row(row)?));
        }

        Ok(None)
    }

    fn create_feature(&self, feature: &NewFeature) -> RepoResult<Feature> {
        self.conn.execute(
            "INSERT INTO features (
                title,
                description,
                module,
                status,
                priority
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                feature.title.as_str(),
                feature.description.as_deref(),
                feature.module.as_str(),
                feature.status.as_str(),
                i64::from(feature.priority),
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        self.get_feature(id)?.ok_or_else(|| {
            RepoError::InvalidData(format!("created feature {id} not found in read-back"))
        })
    }

    fn update_feature(&self, id: FeatureId, patch: &FeaturePatch) -> RepoResult<Feature> {
        let existing = self.get_feature(id)?.ok_or(RepoError::NotFound(id))?;
        if patch.is_empty() {
            return Ok(existing);
        }

        let mut assignments: Vec<&'static str> = Vec::new();
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(title) = patch.title.as_ref() {
            assignments.push("title = ?");
            bind_values.push(Value::Text(title.clone()));
        }
        if let Some(description) = patch.description.as_ref() {
            assignments.push("description = ?");
            bind_values.push(
                description
                    .as_ref()
                    .map_or(Value::Null, |text| Value::Text(text.clone())),
            );
        }
        if let Some(module) = patch.module.as_ref() {
            assignments.push("module = ?");
            bind_values.push(Value::Text(module.clone()));
        }
        if let Some(status) = patch.status {
            assignments.push("status = ?");
            bind_values.push(Value::Text(status.as_str().to_string()));
        }
        if let Some(priority) = patch.priority {
            assignments.push("priority = ?");
            bind_values.push(Value::Integer(i64::from(priority)));
        }
        bind_values.push(Value::Integer(id));

        let sql = format!("UPDATE features SET {} WHERE id = ?;", assignments.join(", "));
        let changed = self.conn.execute(&sql, params_from_iter(bind_values))?;

        // Only reachable if the row was deleted after the existence check.
        if changed == 0 {
            return Err(RepoError::InvalidData(format!(
                "feature {id} vanished during update"
            )));
        }

        self.get_feature(id)?.ok_or_else(|| {
            RepoError::InvalidData(format!("updated feature {id} not found in read-back"))
        })
    }

    fn delete_feature(&self, id: FeatureId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM features WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn feature_stats(&self) -> RepoResult<FeatureStats> {
        let mut stats = FeatureStats::default();

        let mut stmt = self.conn.prepare(
            "SELECT status, COUNT(*) AS count
             FROM features
             GROUP BY status;",
        )?;
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            let status_text: String = row.get("status")?;
            let status = FeatureStatus::parse(&status_text).ok_or_else(|| {
                RepoError::InvalidData(format!(
                    "invalid status `{status_text}` in features.status"
                ))
            })?;
            stats.by_status.set(status, parse_count(row)?);
        }

        let mut stmt = self.conn.prepare(
            "SELECT module, COUNT(*) AS count
             FROM features
             GROUP BY module
             ORDER BY module ASC;",
        )?;
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            let module: String = row.get("module")?;
            stats.by_module.insert(module, parse_count(row)?);
        }

        Ok(stats)
    }
}

fn parse_feature_row(row: &Row<'_>) -> RepoResult<Feature> {
    let status_text: String = row.get("status")?;
    let status = FeatureStatus::parse(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid status `{status_text}` in features.status"))
    })?;

    let raw_priority: i64 = row.get("priority")?;
    let priority = u8::try_from(raw_priority)
        .ok()
        .filter(|value| (MIN_PRIORITY..=MAX_PRIORITY).contains(value))
        .ok_or_else(|| {
            RepoError::InvalidData(format!(
                "invalid priority `{raw_priority}` in features.priority"
            ))
        })?;

    Ok(Feature {
        id: row.get("id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        module: row.get("module")?,
        status,
        priority,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn parse_count(row: &Row<'_>) -> RepoResult<u64> {
    let count: i64 = row.get("count")?;
    u64::try_from(count)
        .map_err(|_| RepoError::InvalidData(format!("negative group count `{count}`")))
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
