//! SQL Tokens - the atomic units of SQL output.
//!
//! Tokens are dialect-agnostic representations that serialize
//! to dialect-specific strings.

use super::dialect::SqlDialect;

/// SQL Token - every element the generator can emit.
///
/// Adding a new variant here will cause compile errors everywhere
/// it needs to be handled (exhaustive matching).
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // === Keywords ===
    Select,
    From,
    Where,
    And,
    As,
    GroupBy,
    OrderBy,
    Asc,
    Desc,
    NullsLast,
    Limit,
    Case,
    When,
    Then,
    Else,
    End,
    Between,
    Cast,

    // === Punctuation ===
    Comma,
    Dot,
    Star,
    LParen,
    RParen,

    // === Operators ===
    Eq,
    Div,

    // === Whitespace / Formatting ===
    Space,
    Newline,
    Indent(usize),

    // === Dynamic Content ===
    /// Simple identifier (column, alias)
    Ident(String),
    /// Qualified identifier: catalog.schema.table, schema.table or just table
    QualifiedIdent {
        catalog: Option<String>,
        schema: Option<String>,
        name: String,
    },
    /// Integer literal
    LitInt(i64),
    /// String literal
    LitString(String),
    /// Date literal (`YYYY-MM-DD`)
    LitDate(String),
    /// NULL literal
    LitNull,
    /// Type name inside CAST
    TypeName(&'static str),

    /// Function name, rendered exactly as written.
    FunctionName(String),
}

impl Token {
    /// Serialize this token to a string for the given dialect.
    pub fn serialize(&self, dialect: &dyn SqlDialect) -> String {
        match self {
            // Keywords
            Token::Select => "SELECT".into(),
            Token::From => "FROM".into(),
            Token::Where => "WHERE".into(),
            Token::And => "AND".into(),
            Token::As => "AS".into(),
            Token::GroupBy => "GROUP BY".into(),
            Token::OrderBy => "ORDER BY".into(),
            Token::Asc => "ASC".into(),
            Token::Desc => "DESC".into(),
            Token::NullsLast => "NULLS LAST".into(),
            Token::Limit => "LIMIT".into(),
            Token::Case => "CASE".into(),
            Token::When => "WHEN".into(),
            Token::Then => "THEN".into(),
            Token::Else => "ELSE".into(),
            Token::End => "END".into(),
            Token::Between => "BETWEEN".into(),
            Token::Cast => "CAST".into(),

            // Punctuation
            Token::Comma => ",".into(),
            Token::Dot => ".".into(),
            Token::Star => "*".into(),
            Token::LParen => "(".into(),
            Token::RParen => ")".into(),

            // Operators
            Token::Eq => "=".into(),
            Token::Div => "/".into(),

            // Whitespace
            Token::Space => " ".into(),
            Token::Newline => "\n".into(),
            Token::Indent(n) => "  ".repeat(*n),

            // Dynamic - dialect-specific formatting
            Token::Ident(name) => dialect.quote_identifier(name),
            Token::QualifiedIdent {
                catalog,
                schema,
                name,
            } => catalog
                .iter()
                .chain(schema.iter())
                .chain(std::iter::once(name))
                .map(|part| dialect.quote_identifier(part))
                .collect::<Vec<_>>()
                .join("."),
            Token::LitInt(n) => n.to_string(),
            Token::LitString(s) => dialect.quote_string(s),
            Token::LitDate(d) => dialect.format_date_literal(d),
            Token::LitNull => dialect.format_null().into(),
            Token::TypeName(name) => (*name).into(),

            Token::FunctionName(name) => name.clone(),
        }
    }
}

/// A stream of tokens that can be serialized to SQL.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    /// Create an empty token stream.
    pub fn new() -> Self {
        Self { tokens: vec![] }
    }

    /// Push a single token.
    pub fn push(&mut self, token: Token) -> &mut Self {
        self.tokens.push(token);
        self
    }

    /// Append another token stream.
    pub fn append(&mut self, other: &TokenStream) -> &mut Self {
        self.tokens.extend(other.tokens.iter().cloned());
        self
    }

    /// Serialize all tokens to a SQL string.
    pub fn serialize(&self, dialect: &dyn SqlDialect) -> String {
        self.tokens.iter().map(|t| t.serialize(dialect)).collect()
    }

    // Convenience methods for common tokens
    pub fn space(&mut self) -> &mut Self {
        self.push(Token::Space)
    }
    pub fn newline(&mut self) -> &mut Self {
        self.push(Token::Newline)
    }
    pub fn indent(&mut self, n: usize) -> &mut Self {
        self.push(Token::Indent(n))
    }
    pub fn comma(&mut self) -> &mut Self {
        self.push(Token::Comma)
    }
    pub fn lparen(&mut self) -> &mut Self {
        self.push(Token::LParen)
    }
    pub fn rparen(&mut self) -> &mut Self {
        self.push(Token::RParen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::dialect::Databricks;

    #[test]
    fn test_keyword_serialize() {
        assert_eq!(Token::Select.serialize(&Databricks), "SELECT");
        assert_eq!(Token::GroupBy.serialize(&Databricks), "GROUP BY");
        assert_eq!(Token::NullsLast.serialize(&Databricks), "NULLS LAST");
    }

    #[test]
    fn test_ident_serialize() {
        assert_eq!(Token::Ident("sales".into()).serialize(&Databricks), "sales");
        assert_eq!(
            Token::Ident("order date".into()).serialize(&Databricks),
            "`order date`"
        );
    }

    #[test]
    fn test_qualified_ident() {
        let tok = Token::QualifiedIdent {
            catalog: Some("main".into()),
            schema: Some("retail".into()),
            name: "sales".into(),
        };
        assert_eq!(tok.serialize(&Databricks), "main.retail.sales");

        let tok = Token::QualifiedIdent {
            catalog: None,
            schema: None,
            name: "sales".into(),
        };
        assert_eq!(tok.serialize(&Databricks), "sales");
    }

    #[test]
    fn test_literals() {
        assert_eq!(Token::LitInt(-6).serialize(&Databricks), "-6");
        assert_eq!(
            Token::LitString("Home Office".into()).serialize(&Databricks),
            "'Home Office'"
        );
        assert_eq!(
            Token::LitDate("2023-12-30".into()).serialize(&Databricks),
            "DATE '2023-12-30'"
        );
        assert_eq!(Token::LitNull.serialize(&Databricks), "NULL");
    }

    #[test]
    fn test_function_name_kept_verbatim() {
        assert_eq!(
            Token::FunctionName("date_trunc".into()).serialize(&Databricks),
            "date_trunc"
        );
        assert_eq!(Token::FunctionName("SUM".into()).serialize(&Databricks), "SUM");
    }

    #[test]
    fn test_token_stream() {
        let mut ts = TokenStream::new();
        ts.push(Token::Select)
            .space()
            .push(Token::Ident("region".into()))
            .space()
            .push(Token::From)
            .space()
            .push(Token::Ident("orders".into()));

        assert_eq!(ts.serialize(&Databricks), "SELECT region FROM orders");
    }
}
