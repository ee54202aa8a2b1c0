//! Unresolved logical references inside a statement.

use std::fmt;

use tracing::trace;

use crate::context::Context;
use crate::error::{Error, Unresolvable};
use crate::quote::QuoteStyle;

/// Kind of reference, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceKind {
    Table,
    Index,
    Schema,
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            Self::Table => "table",
            Self::Index => "index",
            Self::Schema => "schema",
        };
        f.write_str(value)
    }
}

fn non_empty(value: String, kind: ReferenceKind) -> Result<String, Error> {
    if value.is_empty() {
        Err(Error::MalformedReference { kind })
    } else {
        Ok(value)
    }
}

/// One occurrence of a table identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableReference {
    name: String,
    quote: QuoteStyle,
}

impl TableReference {
    pub fn new(name: impl Into<String>, quote: QuoteStyle) -> Result<Self, Error> {
        Ok(Self {
            name: non_empty(name.into(), ReferenceKind::Table)?,
            quote,
        })
    }

    /// Logical table name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn quote(&self) -> QuoteStyle {
        self.quote
    }

    fn write(&self, context: &Context<'_>, out: &mut String) {
        let actual = context.actual_table(&self.name);
        trace!("table {} -> {}", self.name, actual);
        self.quote.write(actual, out);
    }
}

/// An index identifier. Shards of one logical table live side by side
/// and would collide on index names, so once the owning table is renamed
/// the index gets the actual table name as a suffix.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IndexReference {
    name: String,
    table: String,
}

impl IndexReference {
    /// `table` may equal `name` when no owning table was recorded.
    pub fn new(name: impl Into<String>, table: impl Into<String>) -> Result<Self, Error> {
        Ok(Self {
            name: non_empty(name.into(), ReferenceKind::Index)?,
            table: table.into(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Logical table owning the index.
    pub fn table(&self) -> &str {
        &self.table
    }

    fn write(&self, context: &Context<'_>, out: &mut String) {
        out.push_str(&self.name);

        if let Some(actual) = context.renamed(&self.table) {
            trace!("index {} on {} -> {}_{}", self.name, self.table, self.name, actual);
            out.push('_');
            out.push_str(actual);
        }
    }
}

/// Placeholder for the actual schema (database) holding a table.
///
/// The data source hint comes from parsing and is only used for
/// diagnostics. The owning data source is always looked up through
/// the sharding rule, from the actual table name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SchemaReference {
    hint: String,
    table: String,
}

impl SchemaReference {
    pub fn new(hint: impl Into<String>, table: impl Into<String>) -> Result<Self, Error> {
        Ok(Self {
            hint: hint.into(),
            table: non_empty(table.into(), ReferenceKind::Schema)?,
        })
    }

    pub fn hint(&self) -> &str {
        &self.hint
    }

    /// Logical table whose schema this is.
    pub fn table(&self) -> &str {
        &self.table
    }

    fn unresolvable(&self, reason: Unresolvable) -> Error {
        Error::UnresolvableSchema {
            table: self.table.clone(),
            hint: self.hint.clone(),
            reason,
        }
    }

    fn write(&self, context: &Context<'_>, out: &mut String) -> Result<(), Error> {
        let actual = context.actual_table(&self.table);

        let metadata = context
            .metadata()
            .ok_or_else(|| self.unresolvable(Unresolvable::NoMetadata))?;
        let rule = context
            .rule()
            .ok_or_else(|| self.unresolvable(Unresolvable::NoRule))?;

        let data_source = rule
            .owner_data_source(actual)
            .ok_or_else(|| self.unresolvable(Unresolvable::NoOwner(actual.to_owned())))?;
        let schema = metadata
            .actual_schema_name(data_source)
            .ok_or_else(|| self.unresolvable(Unresolvable::NoSchema(data_source.to_owned())))?;

        trace!(
            "schema of {} ({}) -> {} [{}]",
            self.table,
            actual,
            schema,
            data_source
        );

        out.push_str(schema);
        Ok(())
    }
}

/// Any reference an assembler can hold.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Reference {
    Table(TableReference),
    Index(IndexReference),
    Schema(SchemaReference),
}

impl Reference {
    pub fn table(name: impl Into<String>, quote: QuoteStyle) -> Result<Self, Error> {
        Ok(Self::Table(TableReference::new(name, quote)?))
    }

    pub fn index(name: impl Into<String>, table: impl Into<String>) -> Result<Self, Error> {
        Ok(Self::Index(IndexReference::new(name, table)?))
    }

    pub fn schema(hint: impl Into<String>, table: impl Into<String>) -> Result<Self, Error> {
        Ok(Self::Schema(SchemaReference::new(hint, table)?))
    }

    pub fn kind(&self) -> ReferenceKind {
        match self {
            Self::Table(_) => ReferenceKind::Table,
            Self::Index(_) => ReferenceKind::Index,
            Self::Schema(_) => ReferenceKind::Schema,
        }
    }

    /// Logical table this reference depends on.
    pub fn logical_table(&self) -> &str {
        match self {
            Self::Table(table) => table.name(),
            Self::Index(index) => index.table(),
            Self::Schema(schema) => schema.table(),
        }
    }

    /// Resolve to the text sent to the database.
    pub fn resolve(&self, context: &Context<'_>) -> Result<String, Error> {
        let mut out = String::new();
        self.write(context, &mut out)?;
        Ok(out)
    }

    pub(crate) fn write(&self, context: &Context<'_>, out: &mut String) -> Result<(), Error> {
        match self {
            Self::Table(table) => table.write(context, out),
            Self::Index(index) => index.write(context, out),
            Self::Schema(schema) => schema.write(context, out)?,
        }

        Ok(())
    }
}

impl From<TableReference> for Reference {
    fn from(value: TableReference) -> Self {
        Self::Table(value)
    }
}

impl From<IndexReference> for Reference {
    fn from(value: IndexReference) -> Self {
        Self::Index(value)
    }
}

impl From<SchemaReference> for Reference {
    fn from(value: SchemaReference) -> Self {
        Self::Schema(value)
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Table(table) => write!(f, "{{table:{}}}", table.quote.wrap(&table.name)),
            Self::Index(index) => write!(f, "{{index:{}@{}}}", index.name, index.table),
            Self::Schema(schema) => write!(f, "{{schema:{}}}", schema.table),
        }
    }
}
