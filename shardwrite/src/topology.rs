//! Configured sharding topology: implements both collaborators
//! schema references need.

use std::collections::HashMap;
use std::path::Path;

use shardwrite_config::{Config, DataNode, Dialect};
use tracing::debug;

use crate::error::Error;
use crate::quote::QuoteStyle;
use crate::route::RouteUnit;
use crate::rule::{DataSourceMetadata, ShardingRule};

#[derive(Debug, Clone, PartialEq, Eq)]
struct TableNodes {
    logical: String,
    nodes: Vec<DataNode>,
}

/// Data sources, their schemas, and where every
/// actual table lives.
#[derive(Debug, Clone, Default)]
pub struct Topology {
    dialect: Dialect,
    tables: Vec<TableNodes>,
    schemas: HashMap<String, String>,
    default_data_source: Option<String>,
}

impl Topology {
    /// Build from configuration, validating it on the way.
    pub fn new(config: &Config) -> Result<Self, Error> {
        let tables = config
            .data_nodes()?
            .into_iter()
            .map(|(table, nodes)| TableNodes {
                logical: table.name.clone(),
                nodes,
            })
            .collect();

        let schemas = config
            .data_sources
            .iter()
            .map(|ds| Ok((ds.name.clone(), ds.schema_name()?)))
            .collect::<Result<HashMap<_, _>, Error>>()?;

        let topology = Self {
            dialect: config.dialect,
            tables,
            schemas,
            default_data_source: config.default_data_source().map(String::from),
        };

        debug!(
            "topology: {} data sources, {} data nodes",
            topology.schemas.len(),
            topology.data_nodes().count()
        );

        Ok(topology)
    }

    /// Load configuration file and build topology from it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        Self::new(&Config::read(path)?)
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Quote style for table references in this dialect.
    pub fn quote_style(&self) -> QuoteStyle {
        self.dialect.into()
    }

    /// Every data node, in configuration order.
    pub fn data_nodes(&self) -> impl Iterator<Item = &DataNode> {
        self.tables.iter().flat_map(|table| table.nodes.iter())
    }

    /// Data nodes backing a logical table.
    pub fn actual_data_nodes(&self, logical: &str) -> &[DataNode] {
        self.tables
            .iter()
            .find(|table| table.logical.eq_ignore_ascii_case(logical))
            .map(|table| table.nodes.as_slice())
            .unwrap_or_default()
    }

    /// One route unit per data node of the logical table, for
    /// statements that must run against every shard.
    pub fn broadcast(&self, logical: &str) -> Vec<RouteUnit> {
        self.actual_data_nodes(logical)
            .iter()
            .map(|node| RouteUnit::new(&node.data_source).with_table(logical, &node.table))
            .collect()
    }
}

impl ShardingRule for Topology {
    fn owner_data_source(&self, actual_table: &str) -> Option<&str> {
        self.data_nodes()
            .find(|node| node.table.eq_ignore_ascii_case(actual_table))
            .map(|node| node.data_source.as_str())
            .or(self.default_data_source.as_deref())
    }
}

impl DataSourceMetadata for Topology {
    fn actual_schema_name(&self, data_source: &str) -> Option<&str> {
        self.schemas.get(data_source).map(String::as_str)
    }
}
