//! Collaborators consulted when resolving schema references.

use std::collections::HashMap;

/// Which physical data source owns a physical table.
///
/// Must be deterministic for a given configuration.
pub trait ShardingRule: Send + Sync {
    fn owner_data_source(&self, actual_table: &str) -> Option<&str>;
}

/// Actual schema (database) name behind a data source.
pub trait DataSourceMetadata: Send + Sync {
    fn actual_schema_name(&self, data_source: &str) -> Option<&str>;
}

/// Actual table -> data source.
impl ShardingRule for HashMap<String, String> {
    fn owner_data_source(&self, actual_table: &str) -> Option<&str> {
        self.get(actual_table).map(String::as_str)
    }
}

/// Data source -> schema.
impl DataSourceMetadata for HashMap<String, String> {
    fn actual_schema_name(&self, data_source: &str) -> Option<&str> {
        self.get(data_source).map(String::as_str)
    }
}
