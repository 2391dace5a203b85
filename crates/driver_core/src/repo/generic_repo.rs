//! Generic repository over any `Entity` and its SQLite implementation.
//!
//! # Responsibility
//! - Provide insert/update/delete/get/count/exists over one entity table.
//! - Translate `Predicate`/`Sort`/skip/take into parameterized SQL.
//!
//! # Invariants
//! - Column names reach SQL only after being resolved against the entity's
//!   field descriptors; every literal is a bound parameter.
//! - Reads are totally ordered: the key column is always the last sort key.
//! - `skip`/`take` are offset semantics (`LIMIT take OFFSET skip`).
//! - A repository never outlives its unit of work's connection.

use super::entity::Entity;
use super::predicate::{FieldValue, GroupOperator, Operator, Predicate, Sort, SortDirection};
use crate::db::DbError;
use crate::model::EntityId;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, ErrorCode};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::marker::PhantomData;
use std::rc::{Rc, Weak};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// The store rejected a write, e.g. a unique column collision.
    ConstraintViolation(String),
    /// An update matched no row for the given identifier.
    UpdateFailed {
        entity: &'static str,
        id: EntityId,
    },
    /// More than one row matched a key expected to be unique.
    MultipleMatches {
        entity: &'static str,
        key: String,
    },
    /// A predicate or sort referenced a column the entity does not map.
    UnknownField {
        entity: &'static str,
        field: String,
    },
    InvalidData(String),
    /// The owning unit of work has been dropped.
    UnitOfWorkClosed,
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::ConstraintViolation(message) => write!(f, "constraint violation: {message}"),
            Self::UpdateFailed { entity, id } => {
                write!(f, "update of {entity} {id} affected no rows")
            }
            Self::MultipleMatches { entity, key } => {
                write!(f, "more than one {entity} matched unique key `{key}`")
            }
            Self::UnknownField { entity, field } => {
                write!(f, "{entity} has no mapped field `{field}`")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::UnitOfWorkClosed => write!(f, "unit of work is closed"),
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
        if let rusqlite::Error::SqliteFailure(err, message) = &value {
            if err.code == ErrorCode::ConstraintViolation {
                return Self::ConstraintViolation(
                    message.clone().unwrap_or_else(|| err.to_string()),
                );
            }
        }
        Self::Db(DbError::Sqlite(value))
    }
}

/// CRUD and filtered reads over the table of `T`.
///
/// Instances are handed out by `UnitOfWork::repository` and run every
/// statement on the unit of work's connection, so writes join whatever
/// transaction is active there.
pub struct GenericRepository<T: Entity> {
    conn: Weak<Connection>,
    _entity: PhantomData<fn() -> T>,
}

impl<T: Entity> GenericRepository<T> {
    pub(crate) fn new(conn: Weak<Connection>) -> Self {
        Self {
            conn,
            _entity: PhantomData,
        }
    }

    /// Persists a new row.
    ///
    /// Fails with `ConstraintViolation` on a key or unique-column collision.
    pub fn insert(&self, entity: &T) -> RepoResult<()> {
        let conn = self.connection()?;
        let columns: Vec<&str> = T::FIELDS.iter().map(|field| field.column).collect();
        let placeholders = vec!["?"; columns.len()].join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({placeholders});",
            T::TABLE,
            columns.join(", ")
        );
        let values = T::FIELDS
            .iter()
            .map(|field| to_sql_value((field.read)(entity)));

        conn.execute(&sql, params_from_iter(values))?;
        Ok(())
    }

    /// Replaces every mutable column of the row with the entity's id.
    pub fn update(&self, entity: &T) -> RepoResult<()> {
        let conn = self.connection()?;
        let mut assignments = Vec::new();
        let mut values = Vec::new();
        for field in T::FIELDS.iter().filter(|field| !field.immutable) {
            assignments.push(format!("{} = ?", field.column));
            values.push(to_sql_value((field.read)(entity)));
        }

        if assignments.is_empty() {
            return if self.exists(entity.id())? {
                Ok(())
            } else {
                Err(self.update_failed(entity.id()))
            };
        }

        values.push(Value::Text(entity.id().to_string()));
        let sql = format!(
            "UPDATE {} SET {} WHERE {} = ?;",
            T::TABLE,
            assignments.join(", "),
            T::KEY
        );

        let changed = conn.execute(&sql, params_from_iter(values))?;
        if changed == 0 {
            return Err(self.update_failed(entity.id()));
        }
        Ok(())
    }

    /// Removes the row with the entity's id. Returns whether a row was removed.
    pub fn delete(&self, entity: &T) -> RepoResult<bool> {
        let conn = self.connection()?;
        let changed = conn.execute(
            &format!("DELETE FROM {} WHERE {} = ?1;", T::TABLE, T::KEY),
            [entity.id().to_string()],
        )?;
        Ok(changed > 0)
    }

    /// Loads one entity by id; `None` when absent.
    pub fn get_by_id(&self, id: EntityId) -> RepoResult<Option<T>> {
        let conn = self.connection()?;
        let sql = format!("{} WHERE {} = ?;", select_sql::<T>(), T::KEY);
        let mut matches = query_entities::<T>(&conn, &sql, vec![Value::Text(id.to_string())])?;
        if matches.len() > 1 {
            return Err(RepoError::MultipleMatches {
                entity: T::NAME,
                key: id.to_string(),
            });
        }
        Ok(matches.pop())
    }

    /// True iff exactly one row carries `id`.
    pub fn exists(&self, id: EntityId) -> RepoResult<bool> {
        let conn = self.connection()?;
        let count: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM {} WHERE {} = ?1;", T::TABLE, T::KEY),
            [id.to_string()],
            |row| row.get(0),
        )?;
        Ok(count == 1)
    }

    /// Lists entities matching `predicate` (all rows when `None`).
    ///
    /// Rows are ordered by `sort`, then by key; `skip` rows are dropped and at
    /// most `take` returned.
    pub fn get_all(
        &self,
        predicate: Option<&Predicate>,
        sort: &[Sort],
        skip: Option<u32>,
        take: Option<u32>,
    ) -> RepoResult<Vec<T>> {
        let conn = self.connection()?;
        let (where_sql, mut bind_values) = where_clause::<T>(predicate)?;
        let mut sql = format!("{}{where_sql}", select_sql::<T>());
        sql.push_str(&order_by_clause::<T>(sort)?);

        match (take, skip) {
            (Some(take), skip) => {
                sql.push_str(" LIMIT ?");
                bind_values.push(Value::Integer(i64::from(take)));
                if let Some(skip) = skip.filter(|skip| *skip > 0) {
                    sql.push_str(" OFFSET ?");
                    bind_values.push(Value::Integer(i64::from(skip)));
                }
            }
            (None, Some(skip)) if skip > 0 => {
                sql.push_str(" LIMIT -1 OFFSET ?");
                bind_values.push(Value::Integer(i64::from(skip)));
            }
            (None, _) => {}
        }

        query_entities::<T>(&conn, &sql, bind_values)
    }

    /// First entity matching `predicate` under `sort`, if any.
    pub fn first_or_default(
        &self,
        predicate: Option<&Predicate>,
        sort: &[Sort],
    ) -> RepoResult<Option<T>> {
        let mut first = self.get_all(predicate, sort, None, Some(1))?;
        Ok(first.pop())
    }

    /// Number of rows matching `predicate`, ignoring order and paging.
    pub fn count(&self, predicate: Option<&Predicate>) -> RepoResult<u64> {
        let conn = self.connection()?;
        let (where_sql, bind_values) = where_clause::<T>(predicate)?;
        let sql = format!("SELECT COUNT(*) FROM {}{where_sql};", T::TABLE);
        let count: i64 = conn.query_row(&sql, params_from_iter(bind_values), |row| row.get(0))?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative row count {count}")))
    }

    fn connection(&self) -> RepoResult<Rc<Connection>> {
        self.conn.upgrade().ok_or(RepoError::UnitOfWorkClosed)
    }

    fn update_failed(&self, id: EntityId) -> RepoError {
        RepoError::UpdateFailed {
            entity: T::NAME,
            id,
        }
    }
}

fn select_sql<T: Entity>() -> String {
    let columns: Vec<&str> = T::FIELDS.iter().map(|field| field.column).collect();
    format!("SELECT {} FROM {}", columns.join(", "), T::TABLE)
}

fn query_entities<T: Entity>(
    conn: &Connection,
    sql: &str,
    bind_values: Vec<Value>,
) -> RepoResult<Vec<T>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(params_from_iter(bind_values))?;
    let mut items = Vec::new();
    while let Some(row) = rows.next()? {
        items.push(T::from_row(row)?);
    }
    Ok(items)
}

fn resolve_column<T: Entity>(name: &str) -> RepoResult<&'static str> {
    T::field(name)
        .map(|field| field.column)
        .ok_or_else(|| RepoError::UnknownField {
            entity: T::NAME,
            field: name.to_string(),
        })
}

/// Renders ` WHERE ...` (or nothing) plus its bind values.
fn where_clause<T: Entity>(predicate: Option<&Predicate>) -> RepoResult<(String, Vec<Value>)> {
    let mut bind_values = Vec::new();
    let Some(predicate) = predicate else {
        return Ok((String::new(), bind_values));
    };

    let mut sql = String::from(" WHERE ");
    render_predicate::<T>(predicate, &mut sql, &mut bind_values)?;
    Ok((sql, bind_values))
}

fn render_predicate<T: Entity>(
    predicate: &Predicate,
    sql: &mut String,
    bind_values: &mut Vec<Value>,
) -> RepoResult<()> {
    match predicate {
        Predicate::Field {
            field,
            operator,
            value,
        } => {
            let column = resolve_column::<T>(field)?;
            match (operator, value) {
                (Operator::Eq, FieldValue::Null) => {
                    sql.push_str(column);
                    sql.push_str(" IS NULL");
                }
                (Operator::Eq, value) => {
                    sql.push_str(column);
                    sql.push_str(" = ?");
                    bind_values.push(to_sql_value(value.clone()));
                }
                (Operator::Like, value) => {
                    sql.push_str(column);
                    sql.push_str(" LIKE ? ESCAPE '\\'");
                    bind_values.push(to_sql_value(value.clone()));
                }
            }
        }
        Predicate::Group {
            operator,
            predicates,
        } => {
            if predicates.is_empty() {
                sql.push_str(match operator {
                    GroupOperator::And => "1 = 1",
                    GroupOperator::Or => "1 = 0",
                });
                return Ok(());
            }

            let joiner = match operator {
                GroupOperator::And => " AND ",
                GroupOperator::Or => " OR ",
            };
            sql.push('(');
            for (index, child) in predicates.iter().enumerate() {
                if index > 0 {
                    sql.push_str(joiner);
                }
                render_predicate::<T>(child, sql, bind_values)?;
            }
            sql.push(')');
        }
    }
    Ok(())
}

fn order_by_clause<T: Entity>(sort: &[Sort]) -> RepoResult<String> {
    let mut keys = Vec::with_capacity(sort.len() + 1);
    let mut has_key = false;
    for key in sort {
        let column = resolve_column::<T>(&key.field)?;
        has_key |= column == T::KEY;
        let direction = match key.direction {
            SortDirection::Ascending => "ASC",
            SortDirection::Descending => "DESC",
        };
        keys.push(format!("{column} {direction}"));
    }
    if !has_key {
        keys.push(format!("{} ASC", T::KEY));
    }
    Ok(format!(" ORDER BY {}", keys.join(", ")))
}

fn to_sql_value(value: FieldValue) -> Value {
    match value {
        FieldValue::Text(text) => Value::Text(text),
        FieldValue::Integer(number) => Value::Integer(number),
        FieldValue::Null => Value::Null,
    }
}
