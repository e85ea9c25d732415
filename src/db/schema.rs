//! SQLite schema for Placetrack

use rusqlite::{Connection, Result};

/// Initialize the database with required tables
pub fn init_db(conn: &Connection) -> Result<()> {
    // `stipend` is declared BLOB so SQLite applies no type affinity: numeric
    // amounts and free-text stipends keep their storage class.
    conn.execute(
        "CREATE TABLE IF NOT EXISTS companies (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL CHECK (length(trim(name)) > 0),
            cgpa REAL,
            title TEXT,
            stipend BLOB,
            stipend_info TEXT,
            location TEXT,
            job_title TEXT,
            company_type TEXT,
            arrival_date TEXT,
            coordinator TEXT NOT NULL DEFAULT '',
            tracked BOOLEAN NOT NULL DEFAULT 0,
            invited BOOLEAN NOT NULL DEFAULT 0,
            called BOOLEAN NOT NULL DEFAULT 0
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_companies_coordinator ON companies(coordinator)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_companies_name ON companies(name)",
        [],
    )?;

    Ok(())
}
