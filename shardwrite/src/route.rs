//! Rendering one statement for every physical target it was routed to.

use std::collections::HashMap;

use tracing::debug;

use crate::assembler::{Assembler, Rendered};
use crate::context::Context;
use crate::error::Error;
use crate::rule::ShardingRule;

/// Logical table and the actual table chosen for it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableUnit {
    pub logical: String,
    pub actual: String,
}

/// One physical target of a routed statement.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RouteUnit {
    pub data_source: String,
    pub tables: Vec<TableUnit>,
}

impl RouteUnit {
    pub fn new(data_source: impl ToString) -> Self {
        Self {
            data_source: data_source.to_string(),
            tables: vec![],
        }
    }

    /// Add a table mapping.
    pub fn with_table(mut self, logical: impl ToString, actual: impl ToString) -> Self {
        self.tables.push(TableUnit {
            logical: logical.to_string(),
            actual: actual.to_string(),
        });
        self
    }

    /// Table tokens for rendering.
    pub fn tokens(&self) -> HashMap<String, String> {
        self.tables
            .iter()
            .map(|table| (table.logical.clone(), table.actual.clone()))
            .collect()
    }
}

/// Rendered statement and where to send it.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionUnit {
    pub data_source: String,
    pub rendered: Rendered,
}

/// Owner lookup scoped to one route unit. Actual tables the unit
/// routes to belong to its data source; anything else is asked of
/// the caller's rule.
struct UnitRule<'a> {
    unit: &'a RouteUnit,
    fallback: Option<&'a dyn ShardingRule>,
}

impl ShardingRule for UnitRule<'_> {
    fn owner_data_source(&self, actual_table: &str) -> Option<&str> {
        if self
            .unit
            .tables
            .iter()
            .any(|table| table.actual.eq_ignore_ascii_case(actual_table))
        {
            Some(self.unit.data_source.as_str())
        } else {
            self.fallback
                .and_then(|rule| rule.owner_data_source(actual_table))
        }
    }
}

impl Assembler {
    /// Render for one route unit. The unit's tables replace
    /// whatever tokens the context carries, and schemas of those
    /// tables resolve against the unit's data source.
    pub fn render_unit(&self, unit: &RouteUnit, context: &Context<'_>) -> Result<Rendered, Error> {
        let tokens = unit.tokens();
        let rule = UnitRule {
            unit,
            fallback: context.rule(),
        };
        self.render(&context.rebind(&tokens).with_rule(&rule))
    }

    /// Render for every route unit, in order.
    pub fn render_units(
        &self,
        units: &[RouteUnit],
        context: &Context<'_>,
    ) -> Result<Vec<ExecutionUnit>, Error> {
        debug!("rendering statement for {} route units", units.len());

        units
            .iter()
            .map(|unit| {
                Ok(ExecutionUnit {
                    data_source: unit.data_source.clone(),
                    rendered: self.render_unit(unit, context)?,
                })
            })
            .collect()
    }
}
