//! Identifier quoting.

use shardwrite_config::Dialect;

/// How a dialect quotes identifiers.
///
/// Wrapping doesn't escape embedded quote characters: identifiers
/// reaching the rewriter come out of the parser already sanitized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum QuoteStyle {
    /// Bare identifier.
    #[default]
    None,
    /// `` `name` `` (MySQL).
    Backtick,
    /// `"name"` (SQL standard, PostgreSQL).
    DoubleQuote,
    /// `[name]` (SQL Server).
    Bracket,
}

impl QuoteStyle {
    const QUOTED: [QuoteStyle; 3] = [Self::Backtick, Self::DoubleQuote, Self::Bracket];

    /// Opening and closing characters.
    pub fn delimiters(&self) -> Option<(char, char)> {
        match self {
            Self::None => None,
            Self::Backtick => Some(('`', '`')),
            Self::DoubleQuote => Some(('"', '"')),
            Self::Bracket => Some(('[', ']')),
        }
    }

    /// Wrap identifier in this style's quotes.
    pub fn wrap(&self, identifier: &str) -> String {
        let mut out = String::with_capacity(identifier.len() + 2);
        self.write(identifier, &mut out);
        out
    }

    pub(crate) fn write(&self, identifier: &str, out: &mut String) {
        match self.delimiters() {
            Some((open, close)) => {
                out.push(open);
                out.push_str(identifier);
                out.push(close);
            }
            None => out.push_str(identifier),
        }
    }

    /// Style an identifier, as written in SQL, is quoted with.
    pub fn detect(identifier: &str) -> Self {
        Self::QUOTED
            .into_iter()
            .find(|style| style.strip(identifier).is_some())
            .unwrap_or_default()
    }

    /// Remove this style's quotes, if the identifier carries them.
    pub fn strip<'a>(&self, identifier: &'a str) -> Option<&'a str> {
        let (open, close) = self.delimiters()?;
        identifier
            .strip_prefix(open)
            .and_then(|rest| rest.strip_suffix(close))
    }

    /// Split a quoted identifier into its bare name and quote style.
    pub fn parse(identifier: &str) -> (&str, Self) {
        let style = Self::detect(identifier);
        (style.strip(identifier).unwrap_or(identifier), style)
    }
}

impl From<Dialect> for QuoteStyle {
    fn from(dialect: Dialect) -> Self {
        match dialect {
            Dialect::MySql => Self::Backtick,
            Dialect::PostgreSql | Dialect::Oracle | Dialect::H2 => Self::DoubleQuote,
            Dialect::SqlServer => Self::Bracket,
        }
    }
}
