//! Company handling logic

use super::stats::aggregate_coordinator_stats;
use crate::db::{companies, Database};
use crate::error::{CoreError, Result};
use crate::models::{
    Company, CompanyFilter, CompanyPage, CompanySort, CoordinatorStats, NewCompany, SortField,
    SortOrder, StatusField,
};
use serde::Deserialize;
use std::sync::Arc;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 20;

/// Raw `/companies` query string; every value arrives as text
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub search: Option<String>,
}

/// Listing request after coercion and defaults
#[derive(Debug, Clone, PartialEq)]
pub struct ListRequest {
    pub filter: CompanyFilter,
    pub sort: CompanySort,
    pub page: i64,
    pub limit: i64,
}

impl ListRequest {
    /// Non-numeric or non-positive `page`/`limit` fall back to the defaults
    pub fn from_params(params: ListParams) -> Self {
        let field = params
            .sort_by
            .as_deref()
            .map(SortField::from_param)
            .unwrap_or_default();
        let order = params
            .sort_order
            .as_deref()
            .map(SortOrder::from_param)
            .unwrap_or_default();

        ListRequest {
            filter: CompanyFilter {
                name_contains: params.search.filter(|s| !s.is_empty()),
            },
            sort: CompanySort { field, order },
            page: parse_positive(params.page.as_deref(), DEFAULT_PAGE),
            limit: parse_positive(params.limit.as_deref(), DEFAULT_LIMIT),
        }
    }

    /// Rows to skip before this page
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

fn parse_positive(value: Option<&str>, default: i64) -> i64 {
    value
        .and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(default)
}

/// `ceil(total / limit)`; zero when there is nothing to show
pub fn total_pages(total: i64, limit: i64) -> i64 {
    if total <= 0 || limit <= 0 {
        return 0;
    }
    total / limit + i64::from(total % limit != 0)
}

/// Company ids arrive as path or query text; anything non-numeric matches nothing
fn parse_id(raw: &str) -> Result<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| CoreError::NotFound("Company", raw.to_string()))
}

fn found(company: Option<Company>, id: i64) -> Result<Company> {
    company.ok_or_else(|| CoreError::NotFound("Company", id.to_string()))
}

/// Company handler for business logic
#[derive(Clone)]
pub struct CompanyHandler {
    db: Arc<Database>,
}

impl CompanyHandler {
    pub fn new(db: Arc<Database>) -> Self {
        CompanyHandler { db }
    }

    /// Total number of companies
    pub async fn count(&self) -> Result<i64> {
        self.db
            .with_conn(|conn| Ok(companies::count(conn, &CompanyFilter::default())?))
            .await
    }

    /// Fetch one company by its textual id
    pub async fn get(&self, raw_id: &str) -> Result<Company> {
        let id = parse_id(raw_id)?;
        let company = self
            .db
            .with_conn(move |conn| Ok(companies::find_by_id(conn, id)?))
            .await?;
        found(company, id)
    }

    /// Filtered, sorted page plus the filtered total
    pub async fn list(&self, request: ListRequest) -> Result<CompanyPage> {
        let ListRequest {
            filter,
            sort,
            page,
            limit,
        } = request.clone();
        let offset = request.offset();

        let (rows, total) = self
            .db
            .with_conn(move |conn| {
                let rows = companies::find(conn, &filter, sort, limit, offset)?;
                let total = companies::count(conn, &filter)?;
                Ok((rows, total))
            })
            .await?;

        Ok(CompanyPage {
            companies: rows,
            total_pages: total_pages(total, limit),
            current_page: page,
            total,
        })
    }

    /// Validate and insert a new company
    pub async fn create(&self, body: NewCompany) -> Result<Company> {
        let company = body
            .normalize()
            .ok_or_else(|| CoreError::Validation("Company name is required".to_string()))?;

        let created = self
            .db
            .with_conn(move |conn| Ok(companies::create(conn, &company)?))
            .await?;

        tracing::info!("Created company {} ({})", created.id, created.name);
        Ok(created)
    }

    /// Assign or clear (`""`) the coordinator of a company
    pub async fn update_coordinator(
        &self,
        raw_id: &str,
        coordinator: Option<String>,
    ) -> Result<Company> {
        let id = parse_id(raw_id)?;
        let coordinator = coordinator
            .ok_or_else(|| CoreError::Validation("Coordinator is required".to_string()))?;

        let updated = self
            .db
            .with_conn(move |conn| Ok(companies::update_coordinator(conn, id, &coordinator)?))
            .await?;
        let company = found(updated, id)?;

        tracing::info!(
            "Company {} coordinator set to '{}'",
            company.id,
            company.coordinator
        );
        Ok(company)
    }

    /// Set one of the Tracked/Invited/Called flags
    pub async fn update_status(
        &self,
        raw_id: &str,
        field: Option<String>,
        value: Option<bool>,
    ) -> Result<Company> {
        let id = parse_id(raw_id)?;
        let field: StatusField = field
            .ok_or_else(|| CoreError::Validation("Status field is required".to_string()))?
            .parse()
            .map_err(CoreError::Validation)?;
        let value =
            value.ok_or_else(|| CoreError::Validation("Status value is required".to_string()))?;

        let updated = self
            .db
            .with_conn(move |conn| Ok(companies::update_status(conn, id, field, value)?))
            .await?;
        let company = found(updated, id)?;

        tracing::info!("Company {} {} set to {}", company.id, field, value);
        Ok(company)
    }

    /// Roll-up of assigned companies per coordinator
    pub async fn coordinator_stats(&self) -> Result<Vec<CoordinatorStats>> {
        let assigned = self
            .db
            .with_conn(|conn| Ok(companies::find_assigned(conn)?))
            .await?;
        Ok(aggregate_coordinator_stats(&assigned))
    }
}
