//! Statement assembler: literal SQL interleaved with references,
//! rendered into the SQL sent to one physical database.

use std::fmt;

use tracing::debug;

use crate::context::Context;
use crate::error::Error;
use crate::reference::Reference;
use crate::value::Value;

/// Piece of a statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Fragment {
    /// Copied verbatim.
    Literal(String),
    /// Resolved at render time.
    Reference(Reference),
}

impl From<Reference> for Fragment {
    fn from(reference: Reference) -> Self {
        Self::Reference(reference)
    }
}

impl From<String> for Fragment {
    fn from(literal: String) -> Self {
        Self::Literal(literal)
    }
}

impl From<&str> for Fragment {
    fn from(literal: &str) -> Self {
        Self::Literal(literal.to_owned())
    }
}

/// Final SQL and the parameters to execute it with.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Rendered {
    sql: String,
    parameters: Vec<Value>,
}

impl Rendered {
    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn parameters(&self) -> &[Value] {
        &self.parameters
    }

    pub fn into_parts(self) -> (String, Vec<Value>) {
        (self.sql, self.parameters)
    }
}

/// Parsed statement shape. Built once by the parser, then rendered
/// any number of times, e.g. once per shard in a broadcast.
///
/// Rendering takes `&self`, so a finished assembler can be shared
/// between threads and rendered concurrently with different contexts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Assembler {
    fragments: Vec<Fragment>,
}

impl Assembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append literal SQL.
    pub fn append_literal(&mut self, literal: impl Into<String>) {
        self.fragments.push(Fragment::Literal(literal.into()));
    }

    /// Append a reference. Resolution waits until render.
    pub fn append_reference(&mut self, reference: impl Into<Reference>) {
        self.fragments.push(Fragment::Reference(reference.into()));
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn references(&self) -> impl Iterator<Item = &Reference> {
        self.fragments.iter().filter_map(|fragment| match fragment {
            Fragment::Reference(reference) => Some(reference),
            Fragment::Literal(_) => None,
        })
    }

    /// Distinct logical tables referenced, in order of first appearance.
    pub fn logical_tables(&self) -> Vec<&str> {
        let mut tables: Vec<&str> = vec![];
        for reference in self.references() {
            let table = reference.logical_table();
            if !table.is_empty() && !tables.contains(&table) {
                tables.push(table);
            }
        }
        tables
    }

    /// Render the statement. Any reference failing to resolve
    /// aborts the whole render.
    pub fn render(&self, context: &Context<'_>) -> Result<Rendered, Error> {
        let mut sql = String::with_capacity(self.capacity());

        for fragment in &self.fragments {
            match fragment {
                Fragment::Literal(literal) => sql.push_str(literal),
                Fragment::Reference(reference) => reference.write(context, &mut sql)?,
            }
        }

        debug!("rewritten: {}", sql);

        Ok(Rendered {
            sql,
            parameters: context.parameters().to_vec(),
        })
    }

    fn capacity(&self) -> usize {
        self.fragments
            .iter()
            .map(|fragment| match fragment {
                Fragment::Literal(literal) => literal.len(),
                // Room for a shard suffix and quotes.
                Fragment::Reference(reference) => reference.logical_table().len() + 8,
            })
            .sum()
    }
}

impl Extend<Fragment> for Assembler {
    fn extend<T: IntoIterator<Item = Fragment>>(&mut self, iter: T) {
        self.fragments.extend(iter);
    }
}

impl FromIterator<Fragment> for Assembler {
    fn from_iter<T: IntoIterator<Item = Fragment>>(iter: T) -> Self {
        Self {
            fragments: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Assembler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for fragment in &self.fragments {
            match fragment {
                Fragment::Literal(literal) => f.write_str(literal)?,
                Fragment::Reference(reference) => write!(f, "{}", reference)?,
            }
        }
        Ok(())
    }
}
