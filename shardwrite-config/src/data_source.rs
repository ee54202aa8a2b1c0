//! Physical data sources and the schema each one connects to.
use serde::{Deserialize, Serialize};
use url::Url;

use super::error::Error;

/// A configured physical database connection target.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct DataSource {
    /// Name used by table rules and routing, e.g. `ds0`.
    pub name: String,
    /// Connection URL, e.g. `jdbc:mysql://127.0.0.1:3306/actual_db`
    /// or `postgres://user@host:5432/actual_db`.
    pub url: String,
}

impl DataSource {
    pub fn new(name: impl ToString, url: impl ToString) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
        }
    }

    /// Actual schema (database) this data source connects to.
    ///
    /// Taken from the `database_name` query parameter if present, otherwise
    /// from the first path segment. Opaque URLs such as `jdbc:h2:mem:demo_ds;MODE=MySQL`
    /// use the last `:`-separated segment.
    pub fn schema_name(&self) -> Result<String, Error> {
        let url = Url::parse(self.url.strip_prefix("jdbc:").unwrap_or(&self.url))?;

        if let Some((_, database)) = url.query_pairs().find(|(key, _)| key == "database_name") {
            if !database.is_empty() {
                return Ok(database.to_string());
            }
        }

        let database = if url.cannot_be_a_base() {
            url.path()
                .rsplit(':')
                .next()
                .and_then(|segment| segment.split(';').next())
                .unwrap_or_default()
                .to_owned()
        } else {
            url.path_segments()
                .and_then(|mut segments| segments.next())
                .unwrap_or_default()
                .to_owned()
        };

        if database.is_empty() {
            Err(Error::NoDatabase {
                name: self.name.clone(),
                url: self.url.clone(),
            })
        } else {
            Ok(database)
        }
    }
}
