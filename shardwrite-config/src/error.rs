use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Toml(String),

    #[error("url: {0}")]
    Url(#[from] url::ParseError),

    #[error("inline expression \"{expression}\": {reason}")]
    InlineExpression { expression: String, reason: String },

    #[error("data node \"{0}\" is not in the form <data_source>.<table>")]
    DataNode(String),

    #[error("table \"{table}\" references unknown data source \"{data_source}\"")]
    UnknownDataSource { table: String, data_source: String },

    #[error("data source \"{0}\" is configured more than once")]
    DuplicateDataSource(String),

    #[error("data source \"{name}\" has no database in \"{url}\"")]
    NoDatabase { name: String, url: String },
}

impl Error {
    /// Config file failed to parse. Points at the offending line.
    pub fn config(source: &str, err: toml::de::Error) -> Self {
        let line = err
            .span()
            .and_then(|span| source.get(..span.start))
            .map(|before| before.matches('\n').count() + 1);

        match line {
            Some(line) => Self::Toml(format!("line {}: {}", line, err.message())),
            None => Self::Toml(err.message().to_string()),
        }
    }

    pub(crate) fn inline(expression: &str, reason: impl ToString) -> Self {
        Self::InlineExpression {
            expression: expression.to_string(),
            reason: reason.to_string(),
        }
    }
}
