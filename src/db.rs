use crate::{
    error::{Error, Result},
    types::{Task, TaskId},
};
use chrono::NaiveDateTime;
use log::{debug, info};
use rusqlite::{params, Connection, Error as SQLiteError};
use std::path::Path;

impl From<SQLiteError> for Error {
    fn from(value: SQLiteError) -> Self {
        Error::Database(format!("There was a database error: {value}"))
    }
}

const INITIALIZE: &str = "
CREATE TABLE IF NOT EXISTS tasks (
    id INTEGER UNIQUE PRIMARY KEY AUTOINCREMENT,
    title VARCHAR(100) NOT NULL,
    body VARCHAR(1000) NOT NULL,
    datetime_due VARCHAR(100)
);
";
const ADD_DUE_COLUMN: &str = "ALTER TABLE tasks ADD COLUMN datetime_due VARCHAR(100)";
const TABLE_COLUMNS: &str = "SELECT name FROM pragma_table_info('tasks')";
const INSERT_TASK: &str = "INSERT INTO tasks(title, body, datetime_due) VALUES(?1, ?2, ?3)";
// Files written by the first release also require a creation date.
const INSERT_LEGACY_TASK: &str = "INSERT INTO tasks(title, body, datetime_due, date_created)
    VALUES(?1, ?2, ?3, date('now', 'localtime'))";
const SELECT_TASKS: &str = "SELECT id, title, body, datetime_due FROM tasks ORDER BY id";
const DELETE_TASK: &str = "DELETE FROM tasks WHERE id = ?1";
const COUNT_TASKS: &str = "SELECT COUNT(*) FROM tasks";

pub(crate) struct Db {
    conn: Connection,
    legacy_created_column: bool,
}

impl Db {
    pub(crate) fn open(path: &Path) -> Result<Db> {
        debug!("Opening database at {path:?}");
        Self::from_connection(Connection::open(path)?)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Db> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    pub(crate) fn from_connection(conn: Connection) -> Result<Db> {
        debug!("Database connection opened, initializing...");
        let legacy_created_column = Self::ensure_schema(&conn)?;
        debug!("Database initialized.");
        Ok(Db {
            conn,
            legacy_created_column,
        })
    }

    /// Creates the table when missing and adds `datetime_due` to tables from
    /// before due dates existed. Returns whether the table still carries the
    /// old mandatory `date_created` column.
    fn ensure_schema(conn: &Connection) -> Result<bool> {
        conn.execute_batch(INITIALIZE)?;
        let columns = conn
            .prepare(TABLE_COLUMNS)?
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        if !columns.iter().any(|c| c == "datetime_due") {
            info!("Adding datetime_due column to existing tasks table");
            conn.execute(ADD_DUE_COLUMN, [])?;
        }
        Ok(columns.iter().any(|c| c == "date_created"))
    }

    pub(crate) fn insert_task(
        &self,
        title: &str,
        body: &str,
        due: Option<NaiveDateTime>,
    ) -> Result<TaskId> {
        let statement = if self.legacy_created_column {
            INSERT_LEGACY_TASK
        } else {
            INSERT_TASK
        };
        self.conn.execute(statement, params![title, body, due])?;
        let task_id = self.conn.last_insert_rowid();
        debug!("Inserted task {task_id}");
        Ok(task_id)
    }

    pub(crate) fn fetch_all_tasks(&self) -> Result<Vec<Task>> {
        let mut stmt = self.conn.prepare(SELECT_TASKS)?;
        let tasks = stmt
            .query_map([], |row| {
                Ok(Task::new(row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(tasks)
    }

    /// Deleting an id that does not exist is not an error; the returned
    /// count is zero in that case.
    pub(crate) fn delete_task(&self, task_id: TaskId) -> Result<usize> {
        let removed = self.conn.execute(DELETE_TASK, params![task_id])?;
        debug!("Deleted {removed} row(s) for task {task_id}");
        Ok(removed)
    }

    pub(crate) fn count_tasks(&self) -> Result<usize> {
        let count: i64 = self.conn.query_row(COUNT_TASKS, [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn due() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 17)
            .and_then(|d| d.and_hms_opt(18, 30, 0))
            .unwrap()
    }

    #[test]
    fn ensure_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        Db::ensure_schema(&conn).unwrap();
        Db::ensure_schema(&conn).unwrap();
        let db = Db::from_connection(conn).unwrap();
        assert_eq!(db.count_tasks().unwrap(), 0);
    }

    #[test]
    fn insert_then_fetch_round_trips() {
        let db = Db::open_in_memory().unwrap();
        let first = db.insert_task("write report", "quarterly numbers", Some(due())).unwrap();
        let second = db.insert_task("call mom", "sunday", None).unwrap();
        assert_ne!(first, second);

        let tasks = db.fetch_all_tasks().unwrap();
        assert_eq!(
            tasks,
            vec![
                Task::new(first, "write report".into(), "quarterly numbers".into(), Some(due())),
                Task::new(second, "call mom".into(), "sunday".into(), None),
            ]
        );
    }

    #[test]
    fn delete_removes_only_the_given_id() {
        let db = Db::open_in_memory().unwrap();
        let keep = db.insert_task("keep", "me", None).unwrap();
        let drop = db.insert_task("drop", "me", None).unwrap();

        assert_eq!(db.delete_task(drop).unwrap(), 1);
        let ids: Vec<_> = db.fetch_all_tasks().unwrap().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![keep]);
    }

    #[test]
    fn delete_missing_id_is_a_no_op() {
        let db = Db::open_in_memory().unwrap();
        db.insert_task("only", "task", None).unwrap();
        assert_eq!(db.delete_task(9_999).unwrap(), 0);
        assert_eq!(db.count_tasks().unwrap(), 1);
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        let db = Db::open_in_memory().unwrap();
        let first = db.insert_task("a", "b", None).unwrap();
        db.delete_task(first).unwrap();
        let second = db.insert_task("c", "d", None).unwrap();
        assert!(second > first);
    }

    #[test]
    fn due_column_is_added_to_old_tables() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE tasks (
                id INTEGER UNIQUE PRIMARY KEY AUTOINCREMENT,
                title VARCHAR(100) NOT NULL,
                body VARCHAR(1000) NOT NULL,
                date_created VARCHAR(10) NOT NULL
            );
            INSERT INTO tasks(title, body, date_created) VALUES('old', 'row', '2020-01-01');",
        )
        .unwrap();

        let db = Db::from_connection(conn).unwrap();
        let id = db.insert_task("new", "row", Some(due())).unwrap();
        let tasks = db.fetch_all_tasks().unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].due, None);
        assert_eq!(tasks[1], Task::new(id, "new".into(), "row".into(), Some(due())));
    }

    #[test]
    fn database_errors_read_as_plain_text() {
        let err = Error::from(SQLiteError::QueryReturnedNoRows);
        assert_eq!(
            err.to_string(),
            "There was a database error: Query returned no rows"
        );
    }

    #[test]
    fn malformed_due_date_is_an_error() {
        let db = Db::open_in_memory().unwrap();
        db.conn
            .execute(
                "INSERT INTO tasks(title, body, datetime_due) VALUES('x', 'y', 'next tuesday')",
                [],
            )
            .unwrap();
        assert!(matches!(db.fetch_all_tasks(), Err(Error::Database(_))));
    }
}
