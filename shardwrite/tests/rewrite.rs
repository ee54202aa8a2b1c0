use std::collections::HashMap;
use std::io::Write;

use shardwrite::config::Config;
use shardwrite::{
    Assembler, Context, Error, QuoteStyle, Reference, Topology, Unresolvable, Value,
};
use tempfile::NamedTempFile;

const TOPOLOGY: &str = r#"
dialect = "mysql"

[[data_sources]]
name = "ds0"
url = "jdbc:mysql://127.0.0.1:3306/actual_db"

[[data_sources]]
name = "ds1"
url = "jdbc:mysql://127.0.0.1:3306/actual_db"

[[tables]]
name = "LOGIC_TABLE"
actual_data_nodes = "ds${0..1}.table_${0..2}"
"#;

fn topology() -> Topology {
    Topology::new(&Config::from_toml(TOPOLOGY).unwrap()).unwrap()
}

fn tokens(logical: &str, actual: &str) -> HashMap<String, String> {
    HashMap::from([(logical.to_string(), actual.to_string())])
}

fn select(quote: QuoteStyle) -> Assembler {
    let mut assembler = Assembler::new();
    assembler.append_literal("SELECT ");
    assembler.append_reference(Reference::table("table_x", quote).unwrap());
    assembler.append_literal(".id");
    assembler.append_literal(" FROM ");
    assembler.append_reference(Reference::table("table_x", quote).unwrap());
    assembler
}

fn create_index(index_table: &str, quote: QuoteStyle) -> Assembler {
    let mut assembler = Assembler::new();
    assembler.append_literal("CREATE INDEX ");
    assembler.append_reference(Reference::index("index_name", index_table).unwrap());
    assembler.append_literal(" ON ");
    assembler.append_reference(Reference::table("table_x", quote).unwrap());
    assembler.append_literal(" ('column')");
    assembler
}

fn show_create(quote: QuoteStyle) -> Assembler {
    let mut assembler = Assembler::new();
    assembler.append_literal("SHOW ");
    assembler.append_literal("CREATE TABLE ");
    assembler.append_reference(Reference::table("table_0", quote).unwrap());
    assembler.append_literal(" ON ");
    assembler.append_reference(Reference::schema("ds", "table_0").unwrap());
    assembler
}

#[test]
fn test_literals_only() {
    let mut assembler = Assembler::new();
    for literal in ["SELECT ", "table_x", ".id", " FROM ", "table_x"] {
        assembler.append_literal(literal);
    }

    let tokens = tokens("table_x", "table_x_1");
    assert_eq!(
        assembler.render(&Context::new(&tokens)).unwrap().sql(),
        "SELECT table_x.id FROM table_x"
    );
}

#[test]
fn test_table_rename_per_quote_style() {
    let renamed = tokens("table_x", "table_x_1");

    for (quote, without, with) in [
        (
            QuoteStyle::None,
            "SELECT table_x.id FROM table_x",
            "SELECT table_x_1.id FROM table_x_1",
        ),
        (
            QuoteStyle::Backtick,
            "SELECT `table_x`.id FROM `table_x`",
            "SELECT `table_x_1`.id FROM `table_x_1`",
        ),
        (
            QuoteStyle::DoubleQuote,
            "SELECT \"table_x\".id FROM \"table_x\"",
            "SELECT \"table_x_1\".id FROM \"table_x_1\"",
        ),
    ] {
        let assembler = select(quote);
        assert_eq!(assembler.render(&Context::empty()).unwrap().sql(), without);
        assert_eq!(
            assembler.render(&Context::new(&renamed)).unwrap().sql(),
            with
        );
    }
}

#[test]
fn test_index_disambiguation_per_quote_style() {
    let renamed = tokens("table_x", "table_x_1");

    for (quote, without, with) in [
        (
            QuoteStyle::None,
            "CREATE INDEX index_name ON table_x ('column')",
            "CREATE INDEX index_name_table_x_1 ON table_x_1 ('column')",
        ),
        (
            QuoteStyle::Backtick,
            "CREATE INDEX index_name ON `table_x` ('column')",
            "CREATE INDEX index_name_table_x_1 ON `table_x_1` ('column')",
        ),
        (
            QuoteStyle::DoubleQuote,
            "CREATE INDEX index_name ON \"table_x\" ('column')",
            "CREATE INDEX index_name_table_x_1 ON \"table_x_1\" ('column')",
        ),
    ] {
        let assembler = create_index("index_name", quote);
        assert_eq!(assembler.render(&Context::empty()).unwrap().sql(), without);

        let assembler = create_index("table_x", quote);
        assert_eq!(
            assembler.render(&Context::new(&renamed)).unwrap().sql(),
            with
        );
    }
}

#[test]
fn test_schema_without_metadata() {
    let topology = topology();
    let mut assembler = Assembler::new();
    assembler.append_literal("SHOW ");
    assembler.append_literal("CREATE TABLE ");
    assembler.append_reference(Reference::table("table_x", QuoteStyle::None).unwrap());
    assembler.append_literal("ON ");
    assembler.append_reference(Reference::schema("dx", "table_x").unwrap());

    let err = assembler
        .render(&Context::empty().with_rule(&topology))
        .unwrap_err();
    assert!(matches!(
        err,
        Error::UnresolvableSchema {
            reason: Unresolvable::NoMetadata,
            ..
        }
    ));
}

#[test]
fn test_schema_with_metadata_per_quote_style() {
    let topology = topology();
    let renamed = tokens("table_0", "table_1");
    let context = Context::new(&renamed).with_topology(&topology);

    for (quote, expected) in [
        (QuoteStyle::None, "SHOW CREATE TABLE table_1 ON actual_db"),
        (QuoteStyle::Backtick, "SHOW CREATE TABLE `table_1` ON actual_db"),
        (
            QuoteStyle::DoubleQuote,
            "SHOW CREATE TABLE \"table_1\" ON actual_db",
        ),
    ] {
        assert_eq!(show_create(quote).render(&context).unwrap().sql(), expected);
    }
}

#[test]
fn test_standalone_references() {
    let context = Context::empty();
    assert_eq!(
        Reference::index("index_name", "table_x")
            .unwrap()
            .resolve(&context)
            .unwrap(),
        "index_name"
    );
    assert_eq!(
        Reference::table("table_name", QuoteStyle::Backtick)
            .unwrap()
            .resolve(&context)
            .unwrap(),
        "`table_name`"
    );
}

#[test]
fn test_broadcast_over_topology() {
    let file = {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(TOPOLOGY.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    };
    let topology = Topology::load(file.path()).unwrap();

    let mut assembler = Assembler::new();
    assembler.append_literal("ALTER TABLE ");
    assembler.append_reference(Reference::table("logic_table", topology.quote_style()).unwrap());
    assembler.append_literal(" ADD INDEX ");
    assembler.append_reference(Reference::index("idx_status", "logic_table").unwrap());
    assembler.append_literal(" (status) -- ");
    assembler.append_reference(Reference::schema("", "logic_table").unwrap());

    let parameters = [Value::Null];
    let context = Context::empty()
        .with_topology(&topology)
        .with_parameters(&parameters);
    let units = topology.broadcast("logic_table");
    let executions = assembler.render_units(&units, &context).unwrap();

    assert_eq!(executions.len(), 6);
    assert_eq!(executions[0].data_source, "ds0");
    assert_eq!(
        executions[0].rendered.sql(),
        "ALTER TABLE `table_0` ADD INDEX idx_status_table_0 (status) -- actual_db"
    );
    assert_eq!(executions[5].data_source, "ds1");
    assert_eq!(
        executions[5].rendered.sql(),
        "ALTER TABLE `table_2` ADD INDEX idx_status_table_2 (status) -- actual_db"
    );
    assert!(executions
        .iter()
        .all(|execution| execution.rendered.parameters() == parameters));
}

#[test]
fn test_broadcast_names_each_data_source_schema() {
    let source = TOPOLOGY
        .replacen("actual_db", "db_0", 1)
        .replacen("actual_db", "db_1", 1);
    let topology = Topology::new(&Config::from_toml(&source).unwrap()).unwrap();

    let mut assembler = Assembler::new();
    assembler.append_literal("SHOW CREATE TABLE ");
    assembler.append_reference(Reference::table("logic_table", QuoteStyle::None).unwrap());
    assembler.append_literal(" FROM ");
    assembler.append_reference(Reference::schema("ds", "logic_table").unwrap());

    let context = Context::empty().with_topology(&topology);
    let executions = assembler
        .render_units(&topology.broadcast("logic_table"), &context)
        .unwrap();

    assert_eq!(executions.len(), 6);
    for execution in &executions {
        let schema = match execution.data_source.as_str() {
            "ds0" => "db_0",
            _ => "db_1",
        };
        assert!(
            execution.rendered.sql().ends_with(&format!(" FROM {}", schema)),
            "{} => {}",
            execution.data_source,
            execution.rendered.sql()
        );
    }
}
