use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::read_to_string;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{info, warn};

use super::data_source::DataSource;
use super::dialect::Dialect;
use super::error::Error;
use super::sharding::{DataNode, TableRule};

/// Sharding topology: where physical tables live and
/// which database each data source connects to.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct Config {
    /// SQL dialect of the backing databases.
    #[serde(default)]
    pub dialect: Dialect,
    /// Data source owning tables not covered by any table rule.
    #[serde(default)]
    pub default_data_source: Option<String>,
    #[serde(default)]
    pub data_sources: Vec<DataSource>,
    #[serde(default)]
    pub tables: Vec<TableRule>,
}

impl Config {
    /// Load configuration from disk or use defaults, and validate it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let config = Self::read(path)?;
        config.check()?;

        info!(
            "{} data sources, {} table rules [{}]",
            config.data_sources.len(),
            config.tables.len(),
            config.dialect
        );

        Ok(config)
    }

    /// Read configuration from disk without validating it. A missing
    /// file yields defaults; any other read failure is an error.
    pub fn read(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();

        match read_to_string(path) {
            Ok(source) => {
                let config = Self::from_toml(&source)?;
                info!("loaded \"{}\"", path.display());
                Ok(config)
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {
                warn!(
                    "\"{}\" doesn't exist, loading defaults instead",
                    path.display()
                );
                Ok(Self::default())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Parse configuration from TOML.
    pub fn from_toml(source: &str) -> Result<Self, Error> {
        toml::from_str(source).map_err(|err| Error::config(source, err))
    }

    /// Validate data source names and every table rule's data nodes.
    pub fn check(&self) -> Result<(), Error> {
        self.data_nodes().map(|_| ())
    }

    /// Expand every table rule's data nodes, checking that each one
    /// names a configured data source. Data source names are checked first.
    pub fn data_nodes(&self) -> Result<Vec<(&TableRule, Vec<DataNode>)>, Error> {
        let mut names = HashSet::new();
        for data_source in &self.data_sources {
            if !names.insert(data_source.name.as_str()) {
                return Err(Error::DuplicateDataSource(data_source.name.clone()));
            }
        }

        if let Some(ref default) = self.default_data_source {
            if !names.contains(default.as_str()) {
                return Err(Error::UnknownDataSource {
                    table: "<default>".into(),
                    data_source: default.clone(),
                });
            }
        }

        let mut tables = Vec::with_capacity(self.tables.len());
        for table in &self.tables {
            let nodes = table.data_nodes(&self.data_sources)?;
            if let Some(node) = nodes
                .iter()
                .find(|node| !names.contains(node.data_source.as_str()))
            {
                return Err(Error::UnknownDataSource {
                    table: table.name.clone(),
                    data_source: node.data_source.clone(),
                });
            }
            tables.push((table, nodes));
        }

        Ok(tables)
    }

    /// Get data source by name.
    pub fn data_source(&self, name: &str) -> Option<&DataSource> {
        self.data_sources.iter().find(|ds| ds.name == name)
    }

    /// Get table rule by logical table name.
    pub fn table(&self, name: &str) -> Option<&TableRule> {
        self.tables.iter().find(|t| t.name.eq_ignore_ascii_case(name))
    }

    /// Data source used when no table rule matches: the configured
    /// default, or the only data source if there is just one.
    pub fn default_data_source(&self) -> Option<&str> {
        match self.default_data_source {
            Some(ref name) => Some(name.as_str()),
            None if self.data_sources.len() == 1 => {
                self.data_sources.first().map(|ds| ds.name.as_str())
            }
            None => None,
        }
    }
}
