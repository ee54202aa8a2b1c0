use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// SQL dialect spoken by the backing databases. Decides how
/// table identifiers are quoted when the parser doesn't say.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// MySQL and compatibles (default).
    #[default]
    MySql,
    /// PostgreSQL.
    #[serde(alias = "postgres")]
    PostgreSql,
    /// Microsoft SQL Server.
    SqlServer,
    Oracle,
    H2,
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            Dialect::MySql => "mysql",
            Dialect::PostgreSql => "postgresql",
            Dialect::SqlServer => "sqlserver",
            Dialect::Oracle => "oracle",
            Dialect::H2 => "h2",
        };
        f.write_str(value)
    }
}

impl FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['_', '-'], "").as_str() {
            "mysql" => Ok(Self::MySql),
            "postgresql" | "postgres" => Ok(Self::PostgreSql),
            "sqlserver" => Ok(Self::SqlServer),
            "oracle" => Ok(Self::Oracle),
            "h2" => Ok(Self::H2),
            _ => Err(format!("Invalid dialect: {}", s)),
        }
    }
}
