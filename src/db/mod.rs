mod schema;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use chrono::{NaiveDate, Utc};
use rusqlite::Connection;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::*;

/// The entity store: departments, people, and tasks plus the three
/// aggregate reporting queries.
///
/// Every public operation takes the connection lock exactly once and runs
/// its whole read-check-write sequence under that single guard, so the
/// existence/invariant checks and the resulting write are atomic relative
/// to every other operation. Lookups needed mid-operation go through the
/// `fetch_*` helpers that work on the already-locked connection.
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn open(path: PathBuf) -> anyhow::Result<Self> {
        let parent = path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("Database path has no parent directory"))?;
        std::fs::create_dir_all(parent)?;
        let conn = Connection::open(&path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn open_default() -> anyhow::Result<Self> {
        let dirs = directories::ProjectDirs::from("", "", "taskboard")
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
        let db_path = dirs.data_dir().join("taskboard.db");
        Self::open(db_path)
    }

    pub fn open_memory() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn migrate(&self) -> anyhow::Result<()> {
        let conn = self.conn.lock().expect("database lock poisoned");
        schema::run_migrations(&conn)
    }

    // ============================================================
    // Department operations
    // ============================================================

    pub fn create_department(&self, input: CreateDepartmentInput) -> Result<Department> {
        let conn = self.conn.lock().expect("database lock poisoned");

        if fetch_department_by_title(&conn, &input.title)?.is_some() {
            return Err(Error::conflict("department", &input.title));
        }

        let id = Uuid::new_v4();
        let now = Utc::now();

        conn.execute(
            "INSERT INTO departments (id, title, created_at, updated_at)
             VALUES (?, ?, ?, ?)",
            (id.to_string(), &input.title, now.to_rfc3339(), now.to_rfc3339()),
        )
        .map_err(|e| conflict_on_unique(e, "department", &input.title))?;

        Ok(Department {
            id,
            title: input.title,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn get_department(&self, id: Uuid) -> Result<Option<Department>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        fetch_department(&conn, id)
    }

    pub fn get_department_by_title(&self, title: &str) -> Result<Option<Department>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        fetch_department_by_title(&conn, title)
    }

    /// Aggregate view over departments with at least one person and at
    /// least one task. Inner joins on both relations: a department missing
    /// either never appears, with any count at all.
    pub fn department_summaries(&self) -> Result<Vec<DepartmentSummary>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT d.id, d.title, COUNT(DISTINCT p.id), COUNT(DISTINCT t.id)
             FROM departments d
             JOIN people p ON p.department_id = d.id
             JOIN tasks t ON t.department_id = d.id
             GROUP BY d.id, d.title
             ORDER BY d.title",
        )?;

        let summaries = stmt
            .query_map([], |row| {
                Ok(DepartmentSummary {
                    id: parse_uuid(row.get::<_, String>(0)?),
                    title: row.get(1)?,
                    person_count: row.get(2)?,
                    task_count: row.get(3)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(summaries)
    }

    pub fn update_department(&self, id: Uuid, input: UpdateDepartmentInput) -> Result<Department> {
        let conn = self.conn.lock().expect("database lock poisoned");

        let existing = fetch_department(&conn, id)?.ok_or(Error::not_found("department"))?;

        // Renaming onto another department's title would violate the unique
        // constraint anyway; report it as a conflict instead of a storage fault.
        if let Some(other) = fetch_department_by_title(&conn, &input.title)? {
            if other.id != id {
                return Err(Error::conflict("department", &input.title));
            }
        }

        let now = Utc::now();
        conn.execute(
            "UPDATE departments SET title = ?, updated_at = ? WHERE id = ?",
            (&input.title, now.to_rfc3339(), id.to_string()),
        )?;

        Ok(Department {
            id,
            title: input.title,
            created_at: existing.created_at,
            updated_at: now,
        })
    }

    /// Deletes a department. Restricted while people or tasks still
    /// reference it, so no dangling department ids are ever left behind.
    pub fn delete_department(&self, id: Uuid) -> Result<()> {
        let conn = self.conn.lock().expect("database lock poisoned");

        fetch_department(&conn, id)?.ok_or(Error::not_found("department"))?;

        let referenced: i64 = conn.query_row(
            "SELECT (SELECT COUNT(*) FROM people WHERE department_id = ?1)
                  + (SELECT COUNT(*) FROM tasks WHERE department_id = ?1)",
            [id.to_string()],
            |row| row.get(0),
        )?;
        if referenced > 0 {
            return Err(Error::in_use("department"));
        }

        conn.execute("DELETE FROM departments WHERE id = ?", [id.to_string()])?;
        Ok(())
    }

    // ============================================================
    // Person operations
    // ============================================================

    pub fn create_person(&self, input: CreatePersonInput) -> Result<Person> {
        let conn = self.conn.lock().expect("database lock poisoned");

        fetch_department(&conn, input.department_id)?.ok_or(Error::not_found("department"))?;

        let id = Uuid::new_v4();
        let now = Utc::now();

        conn.execute(
            "INSERT INTO people (id, name, department_id, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?)",
            (
                id.to_string(),
                &input.name,
                input.department_id.to_string(),
                now.to_rfc3339(),
                now.to_rfc3339(),
            ),
        )?;

        Ok(Person {
            id,
            name: input.name,
            department_id: input.department_id,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn get_person(&self, id: Uuid) -> Result<Option<Person>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        fetch_person(&conn, id)
    }

    /// Aggregate view over people with at least one allocated task,
    /// grouped by person and department title. People without tasks are
    /// absent, not listed with a zero sum.
    pub fn person_summaries(&self) -> Result<Vec<PersonSummary>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT p.id, p.name, d.title, SUM(t.duration)
             FROM people p
             JOIN departments d ON d.id = p.department_id
             JOIN tasks t ON t.person_id = p.id
             GROUP BY p.id, p.name, d.title
             ORDER BY p.name",
        )?;

        let summaries = stmt
            .query_map([], |row| {
                Ok(PersonSummary {
                    id: parse_uuid(row.get::<_, String>(0)?),
                    name: row.get(1)?,
                    department: row.get(2)?,
                    total_duration: row.get(3)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(summaries)
    }

    /// Expense view filtered by exact name: arithmetic mean of task
    /// durations per matching person with at least one task.
    pub fn person_expenses(&self, name: &str) -> Result<Vec<PersonExpense>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT p.id, p.name, AVG(t.duration)
             FROM people p
             JOIN tasks t ON t.person_id = p.id
             WHERE p.name = ?
             GROUP BY p.id, p.name",
        )?;

        let expenses = stmt
            .query_map([name], |row| {
                Ok(PersonExpense {
                    id: parse_uuid(row.get::<_, String>(0)?),
                    name: row.get(1)?,
                    avg_duration: row.get(2)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(expenses)
    }

    /// Overwrites a person's name and department. Moving the person to a
    /// different department returns their allocated tasks to the
    /// unassigned pool, so a task's person always stays within the task's
    /// department.
    pub fn update_person(&self, id: Uuid, input: UpdatePersonInput) -> Result<Person> {
        let conn = self.conn.lock().expect("database lock poisoned");

        let existing = fetch_person(&conn, id)?.ok_or(Error::not_found("person"))?;
        fetch_department(&conn, input.department_id)?.ok_or(Error::not_found("department"))?;

        let now = Utc::now();
        if input.department_id != existing.department_id {
            conn.execute(
                "UPDATE tasks SET person_id = NULL, updated_at = ? WHERE person_id = ?",
                (now.to_rfc3339(), id.to_string()),
            )?;
        }
        conn.execute(
            "UPDATE people SET name = ?, department_id = ?, updated_at = ? WHERE id = ?",
            (
                &input.name,
                input.department_id.to_string(),
                now.to_rfc3339(),
                id.to_string(),
            ),
        )?;

        Ok(Person {
            id,
            name: input.name,
            department_id: input.department_id,
            created_at: existing.created_at,
            updated_at: now,
        })
    }

    /// Deletes a person. Tasks allocated to them return to the unassigned
    /// pool rather than keeping a dangling reference.
    pub fn delete_person(&self, id: Uuid) -> Result<()> {
        let conn = self.conn.lock().expect("database lock poisoned");

        fetch_person(&conn, id)?.ok_or(Error::not_found("person"))?;

        let now = Utc::now();
        conn.execute(
            "UPDATE tasks SET person_id = NULL, updated_at = ? WHERE person_id = ?",
            (now.to_rfc3339(), id.to_string()),
        )?;
        conn.execute("DELETE FROM people WHERE id = ?", [id.to_string()])?;
        Ok(())
    }

    // ============================================================
    // Task operations
    // ============================================================

    /// Creates a task in the given department. New tasks always start
    /// unassigned; any `person_id` in the input is ignored and only
    /// [`Database::allocate_task`] may bind one.
    pub fn create_task(&self, input: CreateTaskInput) -> Result<Task> {
        let conn = self.conn.lock().expect("database lock poisoned");

        fetch_department(&conn, input.department_id)?.ok_or(Error::not_found("department"))?;

        let id = Uuid::new_v4();
        let now = Utc::now();

        conn.execute(
            "INSERT INTO tasks (id, title, description, deadline, duration, finished, department_id, person_id, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, NULL, ?, ?)",
            (
                id.to_string(),
                &input.title,
                &input.description,
                input.deadline.to_string(),
                input.duration,
                input.finished as i32,
                input.department_id.to_string(),
                now.to_rfc3339(),
                now.to_rfc3339(),
            ),
        )?;

        Ok(Task {
            id,
            title: input.title,
            description: input.description,
            deadline: input.deadline,
            duration: input.duration,
            finished: input.finished,
            department_id: input.department_id,
            person_id: None,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn get_all_tasks(&self) -> Result<Vec<Task>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks ORDER BY created_at"
        ))?;

        let tasks = stmt
            .query_map([], task_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(tasks)
    }

    /// The three oldest unassigned tasks: no person bound, ordered by
    /// deadline ascending. Ties on deadline fall back to creation order so
    /// the selection is deterministic.
    pub fn pending_tasks(&self) -> Result<Vec<Task>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks
             WHERE person_id IS NULL
             ORDER BY deadline ASC, created_at ASC
             LIMIT 3"
        ))?;

        let tasks = stmt
            .query_map([], task_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(tasks)
    }

    pub fn get_task(&self, id: Uuid) -> Result<Option<Task>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        fetch_task(&conn, id)
    }

    /// Binds a person to a task. The person must belong to the task's
    /// department; both lookups and the department check happen under the
    /// same lock as the write, so a concurrent delete or move cannot slip
    /// between check and commit. Reallocation (including of a finished
    /// task) is permitted and simply overwrites the binding.
    pub fn allocate_task(&self, task_id: Uuid, person_id: Uuid) -> Result<Task> {
        let conn = self.conn.lock().expect("database lock poisoned");

        let mut task = fetch_task(&conn, task_id)?.ok_or(Error::not_found("task"))?;
        let person = fetch_person(&conn, person_id)?.ok_or(Error::not_found("person"))?;

        if task.department_id != person.department_id {
            return Err(Error::DepartmentMismatch);
        }

        let now = Utc::now();
        conn.execute(
            "UPDATE tasks SET person_id = ?, updated_at = ? WHERE id = ?",
            (person_id.to_string(), now.to_rfc3339(), task_id.to_string()),
        )?;

        task.person_id = Some(person_id);
        task.updated_at = now;
        Ok(task)
    }

    /// Marks a task finished. Idempotent; permitted whether or not the
    /// task is assigned.
    pub fn finish_task(&self, id: Uuid) -> Result<Task> {
        let conn = self.conn.lock().expect("database lock poisoned");

        let mut task = fetch_task(&conn, id)?.ok_or(Error::not_found("task"))?;

        let now = Utc::now();
        conn.execute(
            "UPDATE tasks SET finished = 1, updated_at = ? WHERE id = ?",
            (now.to_rfc3339(), id.to_string()),
        )?;

        task.finished = true;
        task.updated_at = now;
        Ok(task)
    }

    pub fn delete_task(&self, id: Uuid) -> Result<()> {
        let conn = self.conn.lock().expect("database lock poisoned");

        fetch_task(&conn, id)?.ok_or(Error::not_found("task"))?;
        conn.execute("DELETE FROM tasks WHERE id = ?", [id.to_string()])?;
        Ok(())
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            conn: self.conn.clone(),
        }
    }
}

// ============================================================
// Row mapping and locked-connection lookups
// ============================================================

const TASK_COLUMNS: &str =
    "id, title, description, deadline, duration, finished, department_id, person_id, created_at, updated_at";

fn task_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Task> {
    Ok(Task {
        id: parse_uuid(row.get::<_, String>(0)?),
        title: row.get(1)?,
        description: row.get(2)?,
        deadline: parse_date(row.get::<_, String>(3)?),
        duration: row.get(4)?,
        finished: row.get::<_, i32>(5)? != 0,
        department_id: parse_uuid(row.get::<_, String>(6)?),
        person_id: row.get::<_, Option<String>>(7)?.map(parse_uuid),
        created_at: parse_datetime(row.get::<_, String>(8)?),
        updated_at: parse_datetime(row.get::<_, String>(9)?),
    })
}

fn department_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Department> {
    Ok(Department {
        id: parse_uuid(row.get::<_, String>(0)?),
        title: row.get(1)?,
        created_at: parse_datetime(row.get::<_, String>(2)?),
        updated_at: parse_datetime(row.get::<_, String>(3)?),
    })
}

fn person_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Person> {
    Ok(Person {
        id: parse_uuid(row.get::<_, String>(0)?),
        name: row.get(1)?,
        department_id: parse_uuid(row.get::<_, String>(2)?),
        created_at: parse_datetime(row.get::<_, String>(3)?),
        updated_at: parse_datetime(row.get::<_, String>(4)?),
    })
}

fn fetch_department(conn: &Connection, id: Uuid) -> Result<Option<Department>> {
    let mut stmt = conn.prepare(
        "SELECT id, title, created_at, updated_at FROM departments WHERE id = ?",
    )?;
    let mut rows = stmt.query([id.to_string()])?;
    match rows.next()? {
        Some(row) => Ok(Some(department_from_row(row)?)),
        None => Ok(None),
    }
}

fn fetch_department_by_title(conn: &Connection, title: &str) -> Result<Option<Department>> {
    let mut stmt = conn.prepare(
        "SELECT id, title, created_at, updated_at FROM departments WHERE title = ?",
    )?;
    let mut rows = stmt.query([title])?;
    match rows.next()? {
        Some(row) => Ok(Some(department_from_row(row)?)),
        None => Ok(None),
    }
}

fn fetch_person(conn: &Connection, id: Uuid) -> Result<Option<Person>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, department_id, created_at, updated_at FROM people WHERE id = ?",
    )?;
    let mut rows = stmt.query([id.to_string()])?;
    match rows.next()? {
        Some(row) => Ok(Some(person_from_row(row)?)),
        None => Ok(None),
    }
}

fn fetch_task(conn: &Connection, id: Uuid) -> Result<Option<Task>> {
    let mut stmt = conn.prepare(&format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?"))?;
    let mut rows = stmt.query([id.to_string()])?;
    match rows.next()? {
        Some(row) => Ok(Some(task_from_row(row)?)),
        None => Ok(None),
    }
}

/// Maps a unique-constraint violation to a typed conflict; every other
/// storage error passes through unchanged.
fn conflict_on_unique(e: rusqlite::Error, entity: &'static str, key: &str) -> Error {
    match e {
        rusqlite::Error::SqliteFailure(err, _)
            if err.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            Error::conflict(entity, key)
        }
        other => Error::Storage(other),
    }
}

fn parse_uuid(s: String) -> Uuid {
    Uuid::parse_str(&s).unwrap_or_else(|_| Uuid::nil())
}

fn parse_date(s: String) -> NaiveDate {
    s.parse().unwrap_or_default()
}

fn parse_datetime(s: String) -> chrono::DateTime<Utc> {
    chrono::DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}
