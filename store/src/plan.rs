//! Query plans: fully-specified query objects rendered to SQL.
//!
//! A [`SelectPlan`] carries an explicit projection, join list, predicate
//! list with bound parameter values, grouping, ordering, and pagination.
//! Filter values never reach the SQL text — they are bound as parameters
//! at execution time. Every plan names a stable ORDER BY so that
//! LIMIT/OFFSET pagination is reproducible against an unchanged store.

use rusqlite::ToSql;
use rusqlite::types::{ToSqlOutput, Value};

use vm_inventory_core::{Filters, QueryOptions};

/// A parameter value bound to a plan predicate. Every bound value is
/// text; the ingested schema stores every column as TEXT and numeric
/// comparisons CAST in the projection instead.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Text(String),
}

impl ToSql for SqlValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match self {
            Self::Text(s) => Ok(ToSqlOutput::Owned(Value::Text(s.clone()))),
        }
    }
}

/// A WHERE predicate with its bound values. The SQL fragment uses `?`
/// placeholders; fragments combine with AND in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    sql: String,
    values: Vec<SqlValue>,
}

impl Predicate {
    /// A predicate with no bound values (e.g. `col IS NOT NULL`).
    pub fn fixed(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            values: Vec::new(),
        }
    }

    /// `column = ?` with a bound text value.
    pub fn equals(column: &str, value: impl Into<String>) -> Self {
        Self {
            sql: format!("{column} = ?"),
            values: vec![SqlValue::Text(value.into())],
        }
    }

    /// `column LIKE ?` matching the value as a substring.
    pub fn contains(column: &str, value: &str) -> Self {
        Self {
            sql: format!("{column} LIKE ?"),
            values: vec![SqlValue::Text(format!("%{value}%"))],
        }
    }
}

/// Columns a filter set binds to for a given entity's plan.
#[derive(Debug, Clone, Copy)]
pub struct FilterColumns<'a> {
    pub cluster: &'a str,
    /// `None` when the entity has no guest-OS attribute; the OS filter
    /// is then ignored for that entity.
    pub os: Option<&'a str>,
    /// `None` when the entity has no power-state attribute.
    pub power_state: Option<&'a str>,
}

/// An explicit query object. Built per entity by the planner, rendered
/// once with [`to_sql`](Self::to_sql), executed with
/// [`params`](Self::params).
#[derive(Debug, Clone, Default)]
pub struct SelectPlan {
    projection: Vec<String>,
    from: String,
    joins: Vec<String>,
    predicates: Vec<Predicate>,
    group_by: Vec<String>,
    order_by: Vec<String>,
    limit: u64,
    offset: u64,
}

impl SelectPlan {
    pub fn from_table(from: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            ..Self::default()
        }
    }

    pub fn column(mut self, expr: impl Into<String>) -> Self {
        self.projection.push(expr.into());
        self
    }

    pub fn columns<I, S>(mut self, exprs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.projection.extend(exprs.into_iter().map(Into::into));
        self
    }

    /// Adds a join clause (rendered verbatim after FROM).
    pub fn join(mut self, clause: impl Into<String>) -> Self {
        self.joins.push(clause.into());
        self
    }

    pub fn predicate(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    /// Translates a filter set into predicates against the given columns.
    /// Absent filter fields emit no predicate at all.
    pub fn filters(mut self, filters: &Filters, columns: FilterColumns<'_>) -> Self {
        if let Some(cluster) = &filters.cluster {
            self.predicates
                .push(Predicate::equals(columns.cluster, cluster));
        }
        if let (Some(os), Some(column)) = (&filters.os, columns.os) {
            self.predicates.push(Predicate::contains(column, os));
        }
        if let (Some(state), Some(column)) = (&filters.power_state, columns.power_state) {
            self.predicates.push(Predicate::equals(column, state));
        }
        self
    }

    pub fn group_by(mut self, expr: impl Into<String>) -> Self {
        self.group_by.push(expr.into());
        self
    }

    pub fn order_by(mut self, expr: impl Into<String>) -> Self {
        self.order_by.push(expr.into());
        self
    }

    /// Applies pagination. A limit of 0 means unbounded — no LIMIT
    /// clause is rendered, not `LIMIT 0`.
    pub fn paginate(mut self, options: QueryOptions) -> Self {
        self.limit = options.limit;
        self.offset = options.offset;
        self
    }

    /// Renders the plan to SQL text. Deterministic for a given plan.
    pub fn to_sql(&self) -> String {
        let mut sql = String::from("SELECT ");
        sql.push_str(&self.projection.join(", "));
        sql.push_str("\nFROM ");
        sql.push_str(&self.from);

        for join in &self.joins {
            sql.push('\n');
            sql.push_str(join);
        }

        if !self.predicates.is_empty() {
            sql.push_str("\nWHERE ");
            let clauses: Vec<&str> = self.predicates.iter().map(|p| p.sql.as_str()).collect();
            sql.push_str(&clauses.join(" AND "));
        }

        if !self.group_by.is_empty() {
            sql.push_str("\nGROUP BY ");
            sql.push_str(&self.group_by.join(", "));
        }

        if !self.order_by.is_empty() {
            sql.push_str("\nORDER BY ");
            sql.push_str(&self.order_by.join(", "));
        }

        if self.limit > 0 {
            sql.push_str(&format!("\nLIMIT {}", self.limit));
            if self.offset > 0 {
                sql.push_str(&format!(" OFFSET {}", self.offset));
            }
        } else if self.offset > 0 {
            // SQLite requires a LIMIT clause before OFFSET; -1 is unbounded.
            sql.push_str(&format!("\nLIMIT -1 OFFSET {}", self.offset));
        }

        sql
    }

    /// The bound parameter values, in predicate declaration order.
    pub fn params(&self) -> Vec<&SqlValue> {
        self.predicates
            .iter()
            .flat_map(|p| p.values.iter())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vm_columns() -> FilterColumns<'static> {
        FilterColumns {
            cluster: "i.\"Cluster\"",
            os: Some("i.\"OS according to the configuration file\""),
            power_state: Some("i.\"Powerstate\""),
        }
    }

    #[test]
    fn empty_filters_emit_no_where_clause() {
        let plan = SelectPlan::from_table("vinfo i")
            .column("i.\"VM ID\"")
            .filters(&Filters::default(), vm_columns());
        let sql = plan.to_sql();
        assert!(!sql.contains("WHERE"));
        assert!(plan.params().is_empty());
    }

    #[test]
    fn present_filters_bind_parameters() {
        let filters = Filters::default()
            .with_cluster("Prod")
            .with_os("Windows")
            .with_power_state("poweredOn");
        let plan = SelectPlan::from_table("vinfo i")
            .column("i.\"VM ID\"")
            .filters(&filters, vm_columns());

        let sql = plan.to_sql();
        assert!(sql.contains("i.\"Cluster\" = ?"));
        assert!(sql.contains("LIKE ?"));
        assert!(sql.contains("i.\"Powerstate\" = ?"));
        assert_eq!(plan.params().len(), 3);
        assert_eq!(
            plan.params()[1],
            &SqlValue::Text("%Windows%".to_string())
        );
    }

    #[test]
    fn os_filter_is_ignored_without_an_os_column() {
        let filters = Filters::default().with_os("Linux");
        let plan = SelectPlan::from_table("vhost h").column("h.\"Object ID\"").filters(
            &filters,
            FilterColumns {
                cluster: "h.\"Cluster\"",
                os: None,
                power_state: None,
            },
        );
        assert!(!plan.to_sql().contains("WHERE"));
    }

    #[test]
    fn zero_limit_omits_limit_clause() {
        let plan = SelectPlan::from_table("vinfo i")
            .column("i.\"VM ID\"")
            .paginate(QueryOptions::default());
        assert!(!plan.to_sql().contains("LIMIT"));
    }

    #[test]
    fn limit_and_offset_render() {
        let plan = SelectPlan::from_table("vinfo i")
            .column("i.\"VM ID\"")
            .order_by("i.\"VM ID\"")
            .paginate(QueryOptions::page(10, 20));
        let sql = plan.to_sql();
        assert!(sql.ends_with("LIMIT 10 OFFSET 20"));
    }

    #[test]
    fn offset_without_limit_uses_unbounded_limit() {
        let plan = SelectPlan::from_table("vinfo i")
            .column("i.\"VM ID\"")
            .paginate(QueryOptions::page(0, 5));
        assert!(plan.to_sql().ends_with("LIMIT -1 OFFSET 5"));
    }

    #[test]
    fn clause_ordering_is_select_from_join_where_group_order() {
        let plan = SelectPlan::from_table("vnetwork n")
            .column("n.\"Cluster\"")
            .column("COUNT(*)")
            .join("LEFT JOIN dvport p ON n.\"Network\" = p.\"Port\"")
            .predicate(Predicate::fixed("n.\"Cluster\" IS NOT NULL"))
            .group_by("n.\"Cluster\"")
            .order_by("n.\"Cluster\"");
        let sql = plan.to_sql();
        let find = |needle: &str| sql.find(needle).unwrap();
        assert!(find("FROM") < find("LEFT JOIN"));
        assert!(find("LEFT JOIN") < find("WHERE"));
        assert!(find("WHERE") < find("GROUP BY"));
        assert!(find("GROUP BY") < find("ORDER BY"));
    }
}
