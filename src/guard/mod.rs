//! Read-only safety gate for SQL statements.
//!
//! Every statement, generated or typed by hand, must pass [`inspect`] before
//! it is executed. Callers only learn pass/reject; the [`Rejection`] reason is
//! for logs.

use std::sync::LazyLock;

use regex::Regex;

use crate::config::TableIdent;

/// Placeholder hand-written SQL may use for the target table.
pub const TABLE_PLACEHOLDER: &str = "{FQTN}";

/// Statement verbs that are never allowed, matched as whole words.
pub const BANNED_KEYWORDS: &[&str] = &[
    "insert", "update", "delete", "merge", "drop", "alter", "grant", "revoke", "truncate",
    "call", "copy", "create", "replace", "refresh", "optimize", "vacuum", "set", "use",
    "comment", "analyze", "msck", "repair", "restore", "snapshot", "reorg",
];

static BANNED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)\b({})\b", BANNED_KEYWORDS.join("|"))).unwrap()
});

/// Why a statement was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("statement contains a semicolon")]
    Semicolon,

    #[error("statement contains a comment marker")]
    Comment,

    #[error("statement does not start with SELECT or WITH")]
    NotSelect,

    #[error("statement contains banned keyword '{0}'")]
    BannedKeyword(String),

    #[error("WITH statement has no SELECT")]
    CteWithoutSelect,
}

/// Check `sql` against the read-only rules.
///
/// The text is lowercased and whitespace-collapsed for the check only.
pub fn inspect(sql: &str) -> Result<(), Rejection> {
    let s = sql.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();

    if s.contains(';') {
        return Err(Rejection::Semicolon);
    }
    if ["--", "/*", "*/"].iter().any(|marker| s.contains(marker)) {
        return Err(Rejection::Comment);
    }
    if !(s.starts_with("select") || s.starts_with("with")) {
        return Err(Rejection::NotSelect);
    }
    if let Some(m) = BANNED.find(&s) {
        return Err(Rejection::BannedKeyword(m.as_str().to_string()));
    }
    if s.starts_with("with") && !format!(" {s} ").contains(" select ") {
        return Err(Rejection::CteWithoutSelect);
    }
    Ok(())
}

/// Whether `sql` is a single benign read query.
pub fn is_safe_select(sql: &str) -> bool {
    inspect(sql).is_ok()
}

/// Substitute [`TABLE_PLACEHOLDER`] with the fully-qualified table name.
pub fn expand_table_placeholder(sql: &str, table: &TableIdent) -> String {
    sql.replace(TABLE_PLACEHOLDER, &table.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_plain_select() {
        assert!(is_safe_select("SELECT * FROM t LIMIT 100"));
        assert!(is_safe_select("  select region,\n\tSUM(sales) from t group by region"));
    }

    #[test]
    fn test_accepts_cte() {
        assert!(is_safe_select(
            "WITH x AS (SELECT region FROM t) SELECT * FROM x"
        ));
    }

    #[test]
    fn test_rejection_reasons() {
        assert_eq!(inspect("SELECT 1; DROP TABLE t"), Err(Rejection::Semicolon));
        assert_eq!(inspect("SELECT 1 -- hi"), Err(Rejection::Comment));
        assert_eq!(inspect("SELECT /* x */ 1"), Err(Rejection::Comment));
        assert_eq!(inspect("SELECT 1 */"), Err(Rejection::Comment));
        assert_eq!(inspect("SHOW TABLES"), Err(Rejection::NotSelect));
        assert_eq!(inspect(""), Err(Rejection::NotSelect));
        assert_eq!(
            inspect("SELECT * FROM t WHERE x IN (DELETE FROM t)"),
            Err(Rejection::BannedKeyword("delete".into()))
        );
        assert_eq!(inspect("with"), Err(Rejection::CteWithoutSelect));
    }

    #[test]
    fn test_banned_keywords_whole_word_only() {
        assert!(is_safe_select("SELECT updated_at, created_by FROM t"));
        assert!(is_safe_select("SELECT offset FROM t"));
        assert!(!is_safe_select("SELECT * FROM t WHERE a = 1 UNION SELECT * FROM t SET x"));
        assert!(!is_safe_select("SeLeCt 1 FrOm t VaCuUm"));
    }

    #[test]
    fn test_expand_table_placeholder() {
        let table = TableIdent::parse("main.retail.sales").unwrap();
        assert_eq!(
            expand_table_placeholder("SELECT * FROM {FQTN} LIMIT 5", &table),
            "SELECT * FROM main.retail.sales LIMIT 5"
        );
        assert_eq!(expand_table_placeholder("SELECT 1", &table), "SELECT 1");
    }
}
