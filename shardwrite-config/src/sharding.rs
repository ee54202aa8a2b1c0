use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::data_source::DataSource;
use super::error::Error;
use super::inline;

/// Logical table and the physical tables backing it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct TableRule {
    /// Logical table name, as written in client SQL.
    pub name: String,
    /// Inline expression listing `<data_source>.<table>` pairs,
    /// e.g. `ds${0..1}.t_order_${0..2}`. If not set, the table
    /// lives under its logical name in every data source.
    #[serde(default)]
    pub actual_data_nodes: Option<String>,
}

impl TableRule {
    pub fn new(name: impl ToString, actual_data_nodes: impl ToString) -> Self {
        Self {
            name: name.to_string(),
            actual_data_nodes: Some(actual_data_nodes.to_string()),
        }
    }

    /// Expand actual data nodes, in configuration order.
    pub fn data_nodes(&self, data_sources: &[DataSource]) -> Result<Vec<DataNode>, Error> {
        match self.actual_data_nodes {
            Some(ref expression) => inline::expand(expression)?
                .iter()
                .map(|node| node.parse::<DataNode>())
                .collect(),
            None => Ok(data_sources
                .iter()
                .map(|ds| DataNode::new(&ds.name, &self.name))
                .collect()),
        }
    }
}

/// One physical table in one data source.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct DataNode {
    pub data_source: String,
    pub table: String,
}

impl DataNode {
    pub fn new(data_source: impl ToString, table: impl ToString) -> Self {
        Self {
            data_source: data_source.to_string(),
            table: table.to_string(),
        }
    }
}

impl FromStr for DataNode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().split_once('.') {
            Some((data_source, table))
                if !data_source.is_empty() && !table.is_empty() && !table.contains('.') =>
            {
                Ok(Self::new(data_source, table))
            }
            _ => Err(Error::DataNode(s.to_string())),
        }
    }
}

impl fmt::Display for DataNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.data_source, self.table)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_data_node_from_str() {
        let node: DataNode = "ds0.table_1".parse().unwrap();
        assert_eq!(node, DataNode::new("ds0", "table_1"));
        assert_eq!(node.to_string(), "ds0.table_1");

        for bad in ["table_1", ".table_1", "ds0.", "ds0.a.b"] {
            assert!(matches!(bad.parse::<DataNode>(), Err(Error::DataNode(_))));
        }
    }

    #[test]
    fn test_table_rule_data_nodes() {
        let rule = TableRule::new("t_order", "ds${0..1}.t_order_${0..1}");
        let nodes = rule.data_nodes(&[]).unwrap();
        assert_eq!(
            nodes,
            vec![
                DataNode::new("ds0", "t_order_0"),
                DataNode::new("ds0", "t_order_1"),
                DataNode::new("ds1", "t_order_0"),
                DataNode::new("ds1", "t_order_1"),
            ]
        );
    }

    #[test]
    fn test_table_rule_without_data_nodes() {
        let rule = TableRule {
            name: "t_config".into(),
            actual_data_nodes: None,
        };
        let data_sources = [
            DataSource::new("ds0", "jdbc:mysql://127.0.0.1:3306/db_0"),
            DataSource::new("ds1", "jdbc:mysql://127.0.0.1:3306/db_1"),
        ];
        let nodes = rule.data_nodes(&data_sources).unwrap();
        assert_eq!(
            nodes,
            vec![
                DataNode::new("ds0", "t_config"),
                DataNode::new("ds1", "t_config")
            ]
        );
    }
}
