//! Filter compilation for person list queries
//!
//! List parameters arrive as `operator:comparand` strings (`name=is:Ivan`,
//! `age=mt:30`) and are compiled into [`PersonFilter`], a closed description
//! of the query. Column names and operators are rendered into SQL from the
//! fixed sets below; comparands are always bound as parameters.

use crate::{config::SearchConfig, models::ListParams, Error, Result};

/// Comparison operator of a single filter clause.
///
/// The wire tags are `is`, `isnt`, `ls` (less than) and `mt` (more than).
/// Text columns accept only `is` and `isnt`; age accepts all four.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Ne,
    Lt,
    Gt,
}

impl FilterOp {
    fn parse(tag: &str) -> Option<Self> {
        match tag {
            "is" => Some(FilterOp::Eq),
            "isnt" => Some(FilterOp::Ne),
            "ls" => Some(FilterOp::Lt),
            "mt" => Some(FilterOp::Gt),
            _ => None,
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            FilterOp::Eq => "=",
            FilterOp::Ne => "!=",
            FilterOp::Lt => "<",
            FilterOp::Gt => ">",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Text(String),
    Int(i32),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterClause {
    pub column: &'static str,
    pub op: FilterOp,
    pub value: FilterValue,
}

/// A compiled list query: zero or more clauses ANDed together, plus paging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonFilter {
    pub clauses: Vec<FilterClause>,
    pub limit: i64,
    pub offset: i64,
}

/// Compile raw list parameters into a [`PersonFilter`].
///
/// A malformed parameter (missing colon, unknown operator, non-numeric age)
/// rejects the whole request. Out-of-range paging values are clamped rather
/// than rejected.
pub fn compile(params: &ListParams, config: &SearchConfig) -> Result<PersonFilter> {
    let mut clauses = Vec::new();

    push_text_clause(&mut clauses, "name", params.name.as_deref())?;
    push_text_clause(&mut clauses, "surname", params.surname.as_deref())?;
    push_text_clause(&mut clauses, "patronymic", params.patronymic.as_deref())?;
    push_age_clause(&mut clauses, params.age.as_deref())?;
    push_text_clause(&mut clauses, "gender", params.gender.as_deref())?;
    push_text_clause(&mut clauses, "nationality", params.nationality.as_deref())?;

    let limit = params
        .limit
        .unwrap_or(config.default_limit)
        .clamp(1, config.max_limit);
    let offset = params.offset.unwrap_or(0).max(0);

    Ok(PersonFilter {
        clauses,
        limit,
        offset,
    })
}

fn push_text_clause(
    clauses: &mut Vec<FilterClause>,
    column: &'static str,
    raw: Option<&str>,
) -> Result<()> {
    let Some(raw) = raw else { return Ok(()) };
    let (tag, comparand) = split_tagged(raw).ok_or_else(|| invalid(column))?;
    let op = FilterOp::parse(tag).ok_or_else(|| invalid(column))?;
    if !matches!(op, FilterOp::Eq | FilterOp::Ne) {
        return Err(invalid(column));
    }
    clauses.push(FilterClause {
        column,
        op,
        value: FilterValue::Text(comparand.to_string()),
    });
    Ok(())
}

fn push_age_clause(clauses: &mut Vec<FilterClause>, raw: Option<&str>) -> Result<()> {
    let Some(raw) = raw else { return Ok(()) };
    let (tag, comparand) = split_tagged(raw).ok_or_else(|| invalid("age"))?;
    let op = FilterOp::parse(tag).ok_or_else(|| invalid("age"))?;
    let value = comparand.parse::<i32>().map_err(|_| invalid("age"))?;
    clauses.push(FilterClause {
        column: "age",
        op,
        value: FilterValue::Int(value),
    });
    Ok(())
}

/// Split `operator:comparand` on the first colon. Later colons belong to the
/// comparand; an empty comparand is allowed.
fn split_tagged(raw: &str) -> Option<(&str, &str)> {
    raw.split_once(':')
}

fn invalid(column: &str) -> Error {
    Error::Validation(format!("invalid {column} param"))
}
