//! Company store queries
//!
//! Each function performs one statement against the `companies` table.
//! Updates and inserts use `RETURNING` so callers get the stored row back
//! from the same statement that wrote it.

use crate::models::{
    Company, CompanyFilter, CompanySort, NewCompany, SortField, SortOrder, StatusField,
};
use rusqlite::{params, Connection, OptionalExtension, Result, Row};

const COLUMNS: &str = "id, name, cgpa, title, stipend, stipend_info, location, job_title,
     company_type, arrival_date, coordinator, tracked, invited, called";

fn row_to_company(row: &Row<'_>) -> Result<Company> {
    Ok(Company {
        id: row.get(0)?,
        name: row.get(1)?,
        cgpa: row.get(2)?,
        title: row.get(3)?,
        stipend: row.get(4)?,
        stipend_info: row.get(5)?,
        location: row.get(6)?,
        job_title: row.get(7)?,
        company_type: row.get(8)?,
        arrival_date: row.get(9)?,
        coordinator: row.get(10)?,
        tracked: row.get(11)?,
        invited: row.get(12)?,
        called: row.get(13)?,
    })
}

/// WHERE clause and its single optional parameter
fn where_clause(filter: &CompanyFilter) -> (&'static str, Option<&str>) {
    match filter.name_contains.as_deref() {
        Some(term) => ("WHERE instr(lower(name), lower(?1)) > 0", Some(term)),
        None => ("", None),
    }
}

/// ORDER BY clause; every ordering ends on `id` so paging is stable
fn order_by_clause(sort: CompanySort) -> String {
    let direction = match sort.order {
        SortOrder::Asc => "ASC",
        SortOrder::Desc => "DESC",
    };

    let column = match sort.field {
        SortField::Id => return "ORDER BY id ASC".to_string(),
        SortField::Coordinator if sort.order == SortOrder::Asc => {
            // Assigned coordinators first, unassigned ('') last
            return "ORDER BY coordinator = '' ASC, coordinator ASC, id ASC".to_string();
        }
        SortField::Coordinator => "coordinator",
        SortField::Name => "name",
        SortField::Cgpa => "cgpa",
        SortField::Stipend => "stipend",
        SortField::ArrivalDate => "arrival_date",
        SortField::Type => "company_type",
    };

    format!("ORDER BY {} {}, id ASC", column, direction)
}

/// Number of companies matching `filter`
pub fn count(conn: &Connection, filter: &CompanyFilter) -> Result<i64> {
    let (clause, term) = where_clause(filter);
    let sql = format!("SELECT COUNT(*) FROM companies {}", clause);
    match term {
        Some(term) => conn.query_row(&sql, [term], |row| row.get(0)),
        None => conn.query_row(&sql, [], |row| row.get(0)),
    }
}

/// Look up one company by id
pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<Company>> {
    let sql = format!("SELECT {} FROM companies WHERE id = ?1", COLUMNS);
    conn.query_row(&sql, [id], row_to_company).optional()
}

/// Filtered, sorted window of companies
pub fn find(
    conn: &Connection,
    filter: &CompanyFilter,
    sort: CompanySort,
    limit: i64,
    offset: i64,
) -> Result<Vec<Company>> {
    let (clause, term) = where_clause(filter);
    let sql = format!(
        "SELECT {} FROM companies {} {} LIMIT ?2 OFFSET ?3",
        COLUMNS,
        clause,
        order_by_clause(sort)
    );

    let mut stmt = conn.prepare(&sql)?;
    // ?1 is only referenced when a search term is present; bind it either way
    let rows = stmt.query_map(params![term.unwrap_or_default(), limit, offset], row_to_company)?;
    rows.collect()
}

/// Companies with a coordinator assigned, in id order
pub fn find_assigned(conn: &Connection) -> Result<Vec<Company>> {
    let sql = format!(
        "SELECT {} FROM companies WHERE coordinator != '' ORDER BY id ASC",
        COLUMNS
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], row_to_company)?;
    rows.collect()
}

/// Highest id in use, `None` when the table is empty
pub fn max_id(conn: &Connection) -> Result<Option<i64>> {
    conn.query_row("SELECT MAX(id) FROM companies", [], |row| row.get(0))
}

/// Insert a company, assigning `max(id) + 1` (or 1) within the same statement
pub fn create(conn: &Connection, company: &NewCompany) -> Result<Company> {
    let sql = format!(
        "INSERT INTO companies (id, name, cgpa, title, stipend, stipend_info, location,
                                job_title, company_type, arrival_date, coordinator,
                                tracked, invited, called)
         VALUES ((SELECT COALESCE(MAX(id), 0) + 1 FROM companies),
                 ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, '', 0, 0, 0)
         RETURNING {}",
        COLUMNS
    );

    conn.query_row(
        &sql,
        params![
            company.name.as_deref().unwrap_or_default(),
            company.cgpa,
            company.title,
            company.stipend,
            company.stipend_info,
            company.location,
            company.job_title,
            company.company_type,
            company.arrival_date,
        ],
        row_to_company,
    )
}

/// Set the coordinator, returning the updated row if `id` exists
pub fn update_coordinator(
    conn: &Connection,
    id: i64,
    coordinator: &str,
) -> Result<Option<Company>> {
    let sql = format!(
        "UPDATE companies SET coordinator = ?1 WHERE id = ?2 RETURNING {}",
        COLUMNS
    );
    conn.query_row(&sql, params![coordinator, id], row_to_company)
        .optional()
}

/// Set one status flag, returning the updated row if `id` exists
pub fn update_status(
    conn: &Connection,
    id: i64,
    field: StatusField,
    value: bool,
) -> Result<Option<Company>> {
    let sql = format!(
        "UPDATE companies SET {} = ?1 WHERE id = ?2 RETURNING {}",
        field.column(),
        COLUMNS
    );
    conn.query_row(&sql, params![value, id], row_to_company)
        .optional()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schema::init_db;
    use crate::models::Stipend;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        init_db(&conn).unwrap();
        conn
    }

    fn named(name: &str) -> NewCompany {
        NewCompany {
            name: Some(name.to_string()),
            ..Default::default()
        }
    }

    fn ids(companies: &[Company]) -> Vec<i64> {
        companies.iter().map(|c| c.id).collect()
    }

    #[test]
    fn test_create_assigns_sequential_ids() {
        let conn = setup();
        assert_eq!(max_id(&conn).unwrap(), None);

        let first = create(&conn, &named("Acme")).unwrap();
        let second = create(&conn, &named("Globex")).unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(max_id(&conn).unwrap(), Some(2));
        assert_eq!(second.coordinator, "");
        assert!(!second.tracked && !second.invited && !second.called);
    }

    #[test]
    fn test_create_continues_after_gap() {
        let conn = setup();
        conn.execute("INSERT INTO companies (id, name) VALUES (41, 'Legacy')", [])
            .unwrap();

        let created = create(&conn, &named("Fresh")).unwrap();
        assert_eq!(created.id, 42);
    }

    #[test]
    fn test_create_round_trips_fields() {
        let conn = setup();
        let company = NewCompany {
            name: Some("Initech".to_string()),
            cgpa: Some(7.25),
            stipend: Some(Stipend::Text("15k/month".to_string())),
            job_title: Some("Analyst".to_string()),
            arrival_date: Some("2024-09-10".to_string()),
            ..Default::default()
        };

        let created = create(&conn, &company).unwrap();
        let fetched = find_by_id(&conn, created.id).unwrap().unwrap();

        assert_eq!(created, fetched);
        assert_eq!(fetched.cgpa, Some(7.25));
        assert_eq!(fetched.stipend, Some(Stipend::Text("15k/month".to_string())));
        assert_eq!(fetched.job_title.as_deref(), Some("Analyst"));
    }

    #[test]
    fn test_find_by_id_missing() {
        let conn = setup();
        create(&conn, &named("Acme")).unwrap();
        assert!(find_by_id(&conn, 99).unwrap().is_none());
    }

    #[test]
    fn test_count_and_search_are_case_insensitive() {
        let conn = setup();
        for name in ["Acme Corp", "ACME Labs", "Globex"] {
            create(&conn, &named(name)).unwrap();
        }

        let filter = CompanyFilter {
            name_contains: Some("acme".to_string()),
        };
        assert_eq!(count(&conn, &CompanyFilter::default()).unwrap(), 3);
        assert_eq!(count(&conn, &filter).unwrap(), 2);

        let found = find(&conn, &filter, CompanySort::default(), 10, 0).unwrap();
        assert_eq!(ids(&found), vec![1, 2]);
    }

    #[test]
    fn test_search_treats_pattern_characters_literally() {
        let conn = setup();
        create(&conn, &named("100% Placement")).unwrap();
        create(&conn, &named("Other")).unwrap();

        let filter = CompanyFilter {
            name_contains: Some("%".to_string()),
        };
        assert_eq!(count(&conn, &filter).unwrap(), 1);
    }

    #[test]
    fn test_find_limit_and_offset() {
        let conn = setup();
        for name in ["A", "B", "C", "D", "E"] {
            create(&conn, &named(name)).unwrap();
        }

        let page = find(&conn, &CompanyFilter::default(), CompanySort::default(), 2, 2).unwrap();
        assert_eq!(ids(&page), vec![3, 4]);
    }

    #[test]
    fn test_coordinator_sort_ascending_puts_unassigned_last() {
        let conn = setup();
        for name in ["A", "B", "C", "D"] {
            create(&conn, &named(name)).unwrap();
        }
        update_coordinator(&conn, 2, "Zara").unwrap();
        update_coordinator(&conn, 4, "Arjun").unwrap();

        let asc = CompanySort {
            field: SortField::Coordinator,
            order: SortOrder::Asc,
        };
        let found = find(&conn, &CompanyFilter::default(), asc, 10, 0).unwrap();
        assert_eq!(ids(&found), vec![4, 2, 1, 3]);

        let desc = CompanySort {
            field: SortField::Coordinator,
            order: SortOrder::Desc,
        };
        let found = find(&conn, &CompanyFilter::default(), desc, 10, 0).unwrap();
        assert_eq!(ids(&found), vec![2, 4, 1, 3]);
    }

    #[test]
    fn test_sort_by_cgpa_puts_missing_first_ascending() {
        let conn = setup();
        for (name, cgpa) in [("A", Some(8.0)), ("B", None), ("C", Some(6.5))] {
            let company = NewCompany {
                cgpa,
                ..named(name)
            };
            create(&conn, &company).unwrap();
        }

        let asc = CompanySort {
            field: SortField::Cgpa,
            order: SortOrder::Asc,
        };
        let found = find(&conn, &CompanyFilter::default(), asc, 10, 0).unwrap();
        assert_eq!(ids(&found), vec![2, 3, 1]);

        let desc = CompanySort {
            field: SortField::Cgpa,
            order: SortOrder::Desc,
        };
        let found = find(&conn, &CompanyFilter::default(), desc, 10, 0).unwrap();
        assert_eq!(ids(&found), vec![1, 3, 2]);
    }

    #[test]
    fn test_update_coordinator_returns_updated_row() {
        let conn = setup();
        create(&conn, &named("Acme")).unwrap();

        let updated = update_coordinator(&conn, 1, "Priya").unwrap().unwrap();
        assert_eq!(updated.coordinator, "Priya");

        let cleared = update_coordinator(&conn, 1, "").unwrap().unwrap();
        assert_eq!(cleared.coordinator, "");

        assert!(update_coordinator(&conn, 2, "Priya").unwrap().is_none());
    }

    #[test]
    fn test_update_status_touches_one_flag() {
        let conn = setup();
        create(&conn, &named("Acme")).unwrap();

        let updated = update_status(&conn, 1, StatusField::Tracked, true)
            .unwrap()
            .unwrap();
        assert!(updated.tracked);
        assert!(!updated.invited);
        assert!(!updated.called);

        let updated = update_status(&conn, 1, StatusField::Called, true)
            .unwrap()
            .unwrap();
        assert!(updated.tracked && updated.called && !updated.invited);

        assert!(update_status(&conn, 5, StatusField::Invited, true)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_find_assigned_skips_unassigned() {
        let conn = setup();
        for name in ["A", "B", "C"] {
            create(&conn, &named(name)).unwrap();
        }
        update_coordinator(&conn, 3, "Priya").unwrap();
        update_coordinator(&conn, 1, "Rahul").unwrap();

        let assigned = find_assigned(&conn).unwrap();
        assert_eq!(ids(&assigned), vec![1, 3]);
    }
}
