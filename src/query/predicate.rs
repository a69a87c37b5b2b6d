use uuid::Uuid;

/// A bind parameter for a rendered query.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Text(String),
    Uuid(Uuid),
}

/// One tagged variant per filter category. Variants render independently and
/// are combined with AND by the caller; OR semantics live entirely inside the
/// variant that needs them (free text).
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Visibility window: not expired at evaluation time. Expiry is never a
    /// stored state transition.
    Active,
    /// Case-insensitive substring match across title, description, author,
    /// and location, any one of which qualifies.
    Text(String),
    /// Exact match on the stored job type literal. The value is bound as-is,
    /// so a literal no job carries simply matches nothing.
    JobType(String),
    /// Case-insensitive substring match on location only.
    Location(String),
    /// Remote-friendly listings only.
    RemoteOnly,
    /// Rows owned by one user (dashboard scope).
    Owner(Uuid),
}

impl Predicate {
    /// Render to a SQL fragment, appending any bind values to `params`.
    /// Placeholders are numbered after the params already collected.
    pub fn to_sql(&self, params: &mut Vec<SqlParam>) -> String {
        match self {
            Predicate::Active => {
                "(j.\"expires_at\" IS NULL OR j.\"expires_at\" >= NOW())".to_string()
            }
            Predicate::Text(needle) => {
                params.push(SqlParam::Text(like_pattern(needle)));
                let n = params.len();
                format!(
                    "(j.\"title\" ILIKE ${n} OR j.\"description\" ILIKE ${n} \
                     OR j.\"job_author\" ILIKE ${n} OR j.\"location\" ILIKE ${n})"
                )
            }
            Predicate::JobType(literal) => {
                params.push(SqlParam::Text(literal.clone()));
                format!("j.\"job_type\" = ${}", params.len())
            }
            Predicate::Location(needle) => {
                params.push(SqlParam::Text(like_pattern(needle)));
                format!("j.\"location\" ILIKE ${}", params.len())
            }
            Predicate::RemoteOnly => "j.\"remote_ok\" = TRUE".to_string(),
            Predicate::Owner(user_id) => {
                params.push(SqlParam::Uuid(*user_id));
                format!("j.\"user_id\" = ${}", params.len())
            }
        }
    }
}

/// Substring pattern with LIKE metacharacters escaped, so a user searching
/// for "100%" matches literally.
fn like_pattern(needle: &str) -> String {
    let escaped = needle.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_");
    format!("%{}%", escaped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_has_no_params() {
        let mut params = Vec::new();
        let sql = Predicate::Active.to_sql(&mut params);
        assert_eq!(sql, "(j.\"expires_at\" IS NULL OR j.\"expires_at\" >= NOW())");
        assert!(params.is_empty());
    }

    #[test]
    fn test_text_reuses_one_placeholder() {
        let mut params = Vec::new();
        let sql = Predicate::Text("rust".into()).to_sql(&mut params);
        assert_eq!(sql.matches("$1").count(), 4);
        assert_eq!(params, vec![SqlParam::Text("%rust%".into())]);
    }

    #[test]
    fn test_placeholder_numbering_continues() {
        let mut params = vec![SqlParam::Text("%existing%".into())];
        let sql = Predicate::JobType("Freelance".into()).to_sql(&mut params);
        assert_eq!(sql, "j.\"job_type\" = $2");
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_like_metacharacters_escaped() {
        assert_eq!(like_pattern("100%"), "%100\\%%");
        assert_eq!(like_pattern("a_b"), "%a\\_b%");
        assert_eq!(like_pattern("plain"), "%plain%");
    }
}
