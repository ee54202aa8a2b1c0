//! Context passed to every reference during rendering.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::rule::{DataSourceMetadata, ShardingRule};
use crate::topology::Topology;
use crate::value::Value;

static NO_TOKENS: Lazy<HashMap<String, String>> = Lazy::new(HashMap::new);

/// Everything a render call may consult. Borrowed for
/// the duration of one call, never retained.
#[derive(Clone, Copy)]
pub struct Context<'a> {
    /// Logical table -> actual table, chosen by routing.
    tokens: &'a HashMap<String, String>,
    /// Bound parameters, passed through.
    parameters: &'a [Value],
    rule: Option<&'a dyn ShardingRule>,
    metadata: Option<&'a dyn DataSourceMetadata>,
}

impl<'a> Context<'a> {
    /// Create context with table tokens only.
    pub fn new(tokens: &'a HashMap<String, String>) -> Self {
        Self {
            tokens,
            parameters: &[],
            rule: None,
            metadata: None,
        }
    }

    /// No renamed tables.
    pub fn empty() -> Context<'static> {
        Context::new(&NO_TOKENS)
    }

    pub fn with_parameters(mut self, parameters: &'a [Value]) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn with_rule(mut self, rule: &'a dyn ShardingRule) -> Self {
        self.rule = Some(rule);
        self
    }

    pub fn with_metadata(mut self, metadata: &'a dyn DataSourceMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Use a topology as both the sharding rule and the metadata.
    pub fn with_topology(self, topology: &'a Topology) -> Self {
        self.with_rule(topology).with_metadata(topology)
    }

    /// Same collaborators, different table tokens.
    pub fn rebind<'b>(&self, tokens: &'b HashMap<String, String>) -> Context<'b>
    where
        'a: 'b,
    {
        Context {
            tokens,
            parameters: self.parameters,
            rule: self.rule,
            metadata: self.metadata,
        }
    }

    pub fn tokens(&self) -> &'a HashMap<String, String> {
        self.tokens
    }

    /// Actual table, if routing renamed this logical table.
    pub fn renamed(&self, logical: &str) -> Option<&'a str> {
        self.tokens.get(logical).map(String::as_str)
    }

    /// Actual table name, falling back to the logical name.
    pub fn actual_table<'b>(&self, logical: &'b str) -> &'b str
    where
        'a: 'b,
    {
        self.renamed(logical).unwrap_or(logical)
    }

    pub fn parameters(&self) -> &'a [Value] {
        self.parameters
    }

    pub fn rule(&self) -> Option<&'a dyn ShardingRule> {
        self.rule
    }

    pub fn metadata(&self) -> Option<&'a dyn DataSourceMetadata> {
        self.metadata
    }
}

impl std::fmt::Debug for Context<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("tokens", &self.tokens)
            .field("parameters", &self.parameters)
            .field("rule", &self.rule.is_some())
            .field("metadata", &self.metadata.is_some())
            .finish()
    }
}
