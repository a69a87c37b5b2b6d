//! Listing query construction: filter parameters in, one SQL predicate tree
//! plus ordering and pagination out. Semantics are AND across filter
//! categories and OR within the free-text category, independent of any
//! particular handler.

pub mod predicate;

use uuid::Uuid;

pub use predicate::{Predicate, SqlParam};

/// Default page size for public listings.
pub const DEFAULT_PAGE_SIZE: i64 = 12;

/// Sort keys for job listings. Unknown keys fall back to `Recent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JobSort {
    #[default]
    Recent,
    Views,
    Company,
}

impl JobSort {
    pub fn parse(key: Option<&str>) -> Self {
        match key {
            Some("views") => JobSort::Views,
            Some("company") => JobSort::Company,
            _ => JobSort::Recent,
        }
    }

    fn order_by(&self) -> &'static str {
        match self {
            JobSort::Recent => "j.\"created_at\" DESC",
            JobSort::Views => "j.\"views\" DESC",
            JobSort::Company => "j.\"job_author\" ASC",
        }
    }
}

/// 1-indexed pagination window. Out-of-range pages are not clamped; they
/// simply produce an empty result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub number: i64,
    pub size: i64,
}

impl Page {
    pub fn new(number: i64, size: i64) -> Self {
        Self { number: number.max(1), size }
    }

    pub fn offset(&self) -> i64 {
        (self.number - 1) * self.size
    }

    pub fn total_pages(&self, total_count: i64) -> i64 {
        if total_count <= 0 {
            0
        } else {
            (total_count + self.size - 1) / self.size
        }
    }
}

/// The complete set of optional listing filters plus sort and pagination.
#[derive(Debug, Clone)]
pub struct JobSearch {
    pub query: Option<String>,
    /// Raw job type literal, bound exactly as provided. A literal outside the
    /// supported set matches nothing rather than disabling the filter.
    pub job_type: Option<String>,
    pub location: Option<String>,
    pub remote_only: bool,
    pub active_only: bool,
    pub owner: Option<Uuid>,
    pub sort: JobSort,
    pub page: Option<Page>,
}

impl Default for JobSearch {
    fn default() -> Self {
        Self {
            query: None,
            job_type: None,
            location: None,
            remote_only: false,
            // Public listing views hide expired jobs unless asked otherwise
            active_only: true,
            owner: None,
            sort: JobSort::Recent,
            page: None,
        }
    }
}

/// A rendered query: SQL text with `$n` placeholders and the params to bind,
/// in order.
#[derive(Debug, Clone)]
pub struct SqlQuery {
    pub sql: String,
    pub params: Vec<SqlParam>,
}

const JOB_OWNER_SELECT: &str = "SELECT j.*, u.\"name\" AS owner_name, u.\"email\" AS owner_email \
     FROM jobs j JOIN users u ON u.id = j.\"user_id\"";

impl JobSearch {
    /// Deterministic predicate composition: one variant per filter category,
    /// combined with AND. Blank strings are treated as absent filters.
    pub fn predicates(&self) -> Vec<Predicate> {
        let mut out = Vec::new();
        if self.active_only {
            out.push(Predicate::Active);
        }
        if let Some(q) = self.query.as_deref().filter(|s| !s.is_empty()) {
            out.push(Predicate::Text(q.to_string()));
        }
        if let Some(jt) = self.job_type.as_deref().filter(|s| !s.is_empty()) {
            out.push(Predicate::JobType(jt.to_string()));
        }
        if let Some(loc) = self.location.as_deref().filter(|s| !s.is_empty()) {
            out.push(Predicate::Location(loc.to_string()));
        }
        if self.remote_only {
            out.push(Predicate::RemoteOnly);
        }
        if let Some(owner) = self.owner {
            out.push(Predicate::Owner(owner));
        }
        out
    }

    /// Page of jobs joined with their owner's public fields. Materializes no
    /// more rows than the requested page.
    pub fn to_sql(&self) -> SqlQuery {
        let (where_clause, params) = self.where_clause();
        let mut sql = JOB_OWNER_SELECT.to_string();
        if !where_clause.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&where_clause);
        }
        sql.push_str(" ORDER BY ");
        sql.push_str(self.sort.order_by());
        if let Some(page) = self.page {
            sql.push_str(&format!(" LIMIT {} OFFSET {}", page.size, page.offset()));
        }
        SqlQuery { sql, params }
    }

    /// Total matching count, sharing the predicate tree with `to_sql`.
    pub fn to_count_sql(&self) -> SqlQuery {
        let (where_clause, params) = self.where_clause();
        let mut sql = "SELECT COUNT(*) FROM jobs j".to_string();
        if !where_clause.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&where_clause);
        }
        SqlQuery { sql, params }
    }

    fn where_clause(&self) -> (String, Vec<SqlParam>) {
        let mut params = Vec::new();
        let conditions: Vec<String> =
            self.predicates().iter().map(|p| p.to_sql(&mut params)).collect();
        (conditions.join(" AND "), params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_active_only_recent() {
        let search = JobSearch::default();
        let query = search.to_sql();
        assert!(query.sql.contains("(j.\"expires_at\" IS NULL OR j.\"expires_at\" >= NOW())"));
        assert!(query.sql.ends_with("ORDER BY j.\"created_at\" DESC"));
        assert!(query.params.is_empty());
    }

    #[test]
    fn test_free_text_or_within_category() {
        let search = JobSearch { query: Some("rust".into()), ..Default::default() };
        let query = search.to_sql();
        // One OR group over the four text fields, sharing a single parameter
        assert!(query.sql.contains(
            "(j.\"title\" ILIKE $1 OR j.\"description\" ILIKE $1 \
             OR j.\"job_author\" ILIKE $1 OR j.\"location\" ILIKE $1)"
        ));
        assert_eq!(query.params, vec![SqlParam::Text("%rust%".into())]);
    }

    #[test]
    fn test_and_across_categories() {
        let search = JobSearch {
            query: Some("rust".into()),
            job_type: Some("Contract".into()),
            location: Some("berlin".into()),
            remote_only: true,
            ..Default::default()
        };
        let query = search.to_sql();
        let where_part = query.sql.split(" WHERE ").nth(1).unwrap();
        assert_eq!(where_part.matches(" AND ").count(), 4);
        assert!(where_part.contains("j.\"job_type\" = $2"));
        assert!(where_part.contains("j.\"location\" ILIKE $3"));
        assert!(where_part.contains("j.\"remote_ok\" = TRUE"));
        assert_eq!(
            query.params,
            vec![
                SqlParam::Text("%rust%".into()),
                SqlParam::Text("Contract".into()),
                SqlParam::Text("%berlin%".into()),
            ]
        );
    }

    #[test]
    fn test_blank_filters_ignored() {
        let search = JobSearch {
            query: Some("".into()),
            job_type: Some("".into()),
            location: Some("".into()),
            ..Default::default()
        };
        assert_eq!(search.predicates().len(), 1); // just the active window
    }

    #[test]
    fn test_unsupported_job_type_literal_still_filters() {
        let search = JobSearch {
            job_type: Some("Banana".into()),
            active_only: false,
            ..Default::default()
        };
        let query = search.to_sql();
        assert!(query.sql.contains("j.\"job_type\" = $1"));
        assert_eq!(query.params, vec![SqlParam::Text("Banana".into())]);
    }

    #[test]
    fn test_count_shares_predicates() {
        let search = JobSearch { job_type: Some("Full-time".into()), ..Default::default() };
        let count = search.to_count_sql();
        assert!(count.sql.starts_with("SELECT COUNT(*) FROM jobs j WHERE "));
        assert!(count.sql.contains("j.\"job_type\" = $1"));
        assert!(!count.sql.contains("ORDER BY"));
        assert!(!count.sql.contains("LIMIT"));
        assert_eq!(count.params, search.to_sql().params);
    }

    #[test]
    fn test_pagination_window() {
        let page = Page::new(3, DEFAULT_PAGE_SIZE);
        assert_eq!(page.offset(), 24);

        let search = JobSearch { page: Some(page), ..Default::default() };
        assert!(search.to_sql().sql.ends_with("LIMIT 12 OFFSET 24"));
    }

    #[test]
    fn test_total_pages_math() {
        let page = Page::new(1, 12);
        assert_eq!(page.total_pages(25), 3);
        assert_eq!(page.total_pages(24), 2);
        assert_eq!(page.total_pages(1), 1);
        assert_eq!(page.total_pages(0), 0);
    }

    #[test]
    fn test_page_number_floor_is_one() {
        assert_eq!(Page::new(0, 12).offset(), 0);
        assert_eq!(Page::new(-5, 12).offset(), 0);
    }

    #[test]
    fn test_sort_key_parse_and_fallback() {
        assert_eq!(JobSort::parse(Some("views")), JobSort::Views);
        assert_eq!(JobSort::parse(Some("company")), JobSort::Company);
        assert_eq!(JobSort::parse(Some("recent")), JobSort::Recent);
        assert_eq!(JobSort::parse(Some("salary")), JobSort::Recent);
        assert_eq!(JobSort::parse(None), JobSort::Recent);
    }

    #[test]
    fn test_sort_ordering_sql() {
        let views = JobSearch { sort: JobSort::Views, ..Default::default() };
        assert!(views.to_sql().sql.contains("ORDER BY j.\"views\" DESC"));

        let company = JobSearch { sort: JobSort::Company, ..Default::default() };
        assert!(company.to_sql().sql.contains("ORDER BY j.\"job_author\" ASC"));
    }

    #[test]
    fn test_owner_scope() {
        let owner = uuid::Uuid::new_v4();
        let search = JobSearch {
            owner: Some(owner),
            active_only: false,
            ..Default::default()
        };
        let query = search.to_sql();
        assert!(query.sql.contains("j.\"user_id\" = $1"));
        assert_eq!(query.params, vec![SqlParam::Uuid(owner)]);
    }
}
