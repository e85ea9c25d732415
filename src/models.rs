//! Company record and the query/response types built around it
//!
//! JSON field names follow the tracking frontend (`"Name"`, `"Stipend Info"`,
//! `"Arrival Date"`, ...), so every field carries an explicit rename.

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// A company visiting for placements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: i64,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "CGPA")]
    pub cgpa: Option<f64>,
    #[serde(rename = "Title")]
    pub title: Option<String>,
    #[serde(rename = "Stipend")]
    pub stipend: Option<Stipend>,
    #[serde(rename = "Stipend Info")]
    pub stipend_info: Option<String>,
    #[serde(rename = "Location")]
    pub location: Option<String>,
    #[serde(rename = "Job Title")]
    pub job_title: Option<String>,
    #[serde(rename = "Type")]
    pub company_type: Option<String>,
    #[serde(rename = "Arrival Date")]
    pub arrival_date: Option<String>,
    /// Empty string means unassigned
    #[serde(rename = "Coordinator")]
    pub coordinator: String,
    #[serde(rename = "Tracked")]
    pub tracked: bool,
    #[serde(rename = "Invited")]
    pub invited: bool,
    #[serde(rename = "Called")]
    pub called: bool,
}

/// Stipend as entered: either a plain amount or free text such as "15k/month"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Stipend {
    Amount(serde_json::Number),
    Text(String),
}

impl Stipend {
    /// Blank text and a zero amount both mean "not provided"
    fn is_unset(&self) -> bool {
        match self {
            Stipend::Amount(number) => number.as_f64() == Some(0.0),
            Stipend::Text(text) => text.trim().is_empty(),
        }
    }
}

impl ToSql for Stipend {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match self {
            Stipend::Amount(number) => {
                if let Some(n) = number.as_i64() {
                    Ok(ToSqlOutput::from(n))
                } else if let Some(n) = number.as_f64() {
                    Ok(ToSqlOutput::from(n))
                } else {
                    Ok(ToSqlOutput::from(number.to_string()))
                }
            }
            Stipend::Text(text) => Ok(ToSqlOutput::from(text.as_str())),
        }
    }
}

impl FromSql for Stipend {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value {
            ValueRef::Integer(n) => Ok(Stipend::Amount(n.into())),
            ValueRef::Real(n) => serde_json::Number::from_f64(n)
                .map(Stipend::Amount)
                .ok_or(FromSqlError::InvalidType),
            ValueRef::Text(_) => value.as_str().map(|s| Stipend::Text(s.to_string())),
            _ => Err(FromSqlError::InvalidType),
        }
    }
}

/// Body of `POST /company`; only `Name` is required
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewCompany {
    #[serde(rename = "Name")]
    pub name: Option<String>,
    #[serde(rename = "CGPA", deserialize_with = "deserialize_cgpa")]
    pub cgpa: Option<f64>,
    #[serde(rename = "Title")]
    pub title: Option<String>,
    #[serde(rename = "Stipend")]
    pub stipend: Option<Stipend>,
    #[serde(rename = "Stipend Info")]
    pub stipend_info: Option<String>,
    #[serde(rename = "Location")]
    pub location: Option<String>,
    #[serde(rename = "Job Title")]
    pub job_title: Option<String>,
    #[serde(rename = "Type")]
    pub company_type: Option<String>,
    #[serde(rename = "Arrival Date")]
    pub arrival_date: Option<String>,
}

/// CGPA arrives as a number or as numeric text ("7.5"); blank text is absent
fn deserialize_cgpa<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Number(n)) => Ok(Some(n)),
        Some(Raw::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(Raw::Text(text)) => text
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("CGPA must be a number, got '{}'", text))),
    }
}

impl NewCompany {
    /// Trim the name and drop unset optional fields: blank text, and a
    /// zero CGPA or stipend.
    ///
    /// Returns `None` when the name is missing or blank.
    pub fn normalize(self) -> Option<NewCompany> {
        let name = self.name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty())?;
        Some(NewCompany {
            name: Some(name),
            cgpa: self.cgpa.filter(|c| *c != 0.0),
            title: non_blank(self.title),
            stipend: self.stipend.filter(|s| !s.is_unset()),
            stipend_info: non_blank(self.stipend_info),
            location: non_blank(self.location),
            job_title: non_blank(self.job_title),
            company_type: non_blank(self.company_type),
            arrival_date: non_blank(self.arrival_date),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Boolean progress flags that can be toggled on a company
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusField {
    Tracked,
    Invited,
    Called,
}

impl StatusField {
    /// Column backing this flag
    pub fn column(self) -> &'static str {
        match self {
            StatusField::Tracked => "tracked",
            StatusField::Invited => "invited",
            StatusField::Called => "called",
        }
    }
}

impl FromStr for StatusField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Tracked" => Ok(StatusField::Tracked),
            "Invited" => Ok(StatusField::Invited),
            "Called" => Ok(StatusField::Called),
            other => Err(format!(
                "Unknown status field '{}', expected Tracked, Invited or Called",
                other
            )),
        }
    }
}

impl fmt::Display for StatusField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StatusField::Tracked => "Tracked",
            StatusField::Invited => "Invited",
            StatusField::Called => "Called",
        };
        f.write_str(name)
    }
}

/// Restriction applied before sorting and paging
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompanyFilter {
    /// Case-insensitive substring of the company name
    pub name_contains: Option<String>,
}

/// Sortable fields of the company listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    Id,
    Name,
    Cgpa,
    Stipend,
    ArrivalDate,
    Type,
    Coordinator,
}

impl SortField {
    /// Map a `sortBy` value; unknown names fall back to id order
    pub fn from_param(value: &str) -> SortField {
        match value {
            "Name" => SortField::Name,
            "CGPA" => SortField::Cgpa,
            "Stipend" => SortField::Stipend,
            "Arrival Date" => SortField::ArrivalDate,
            "Type" => SortField::Type,
            "Coordinator" => SortField::Coordinator,
            _ => SortField::Id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// Anything but `desc` sorts ascending
    pub fn from_param(value: &str) -> SortOrder {
        if value == "desc" {
            SortOrder::Desc
        } else {
            SortOrder::Asc
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompanySort {
    pub field: SortField,
    pub order: SortOrder,
}

/// One page of the company listing
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyPage {
    pub companies: Vec<Company>,
    pub total_pages: i64,
    pub current_page: i64,
    pub total: i64,
}

/// Per-coordinator roll-up returned by `/coordinator-stats`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoordinatorStats {
    pub coordinator: String,
    pub total: u64,
    pub tracked: u64,
    pub invited: u64,
    pub called: u64,
    pub companies: Vec<CompanySummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanySummary {
    pub id: i64,
    pub name: String,
    pub tracked: bool,
    pub invited: bool,
    pub called: bool,
}

impl From<&Company> for CompanySummary {
    fn from(company: &Company) -> Self {
        CompanySummary {
            id: company.id,
            name: company.name.clone(),
            tracked: company.tracked,
            invited: company.invited,
            called: company.called,
        }
    }
}
