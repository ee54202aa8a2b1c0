//! SQL rewriting for sharded databases.
//!
//! A parser splits a statement into literal SQL and logical references
//! (tables, indexes, schemas) held by an [`Assembler`]. Routing decides
//! which actual table each logical table maps to. Rendering substitutes
//! the references and produces the SQL for one physical database.

pub mod assembler;
pub mod context;
pub mod error;
pub mod quote;
pub mod reference;
pub mod route;
pub mod rule;
pub mod topology;
pub mod value;

pub use assembler::{Assembler, Fragment, Rendered};
pub use context::Context;
pub use error::{Error, Unresolvable};
pub use quote::QuoteStyle;
pub use reference::{IndexReference, Reference, ReferenceKind, SchemaReference, TableReference};
pub use route::{ExecutionUnit, RouteUnit, TableUnit};
pub use rule::{DataSourceMetadata, ShardingRule};
pub use shardwrite_config as config;
pub use topology::Topology;
pub use value::Value;
