use thiserror::Error;

use crate::reference::ReferenceKind;

#[derive(Debug, Error)]
pub enum Error {
    #[error("can't resolve schema of table \"{table}\" (hint \"{hint}\"): {reason}")]
    UnresolvableSchema {
        table: String,
        hint: String,
        reason: Unresolvable,
    },

    #[error("{kind} reference has an empty identifier")]
    MalformedReference { kind: ReferenceKind },

    #[error("config: {0}")]
    Config(#[from] shardwrite_config::Error),
}

/// Why a schema reference couldn't be resolved.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Unresolvable {
    #[error("no data source metadata")]
    NoMetadata,

    #[error("no sharding rule")]
    NoRule,

    #[error("no data source owns \"{0}\"")]
    NoOwner(String),

    #[error("data source \"{0}\" has no schema")]
    NoSchema(String),
}
