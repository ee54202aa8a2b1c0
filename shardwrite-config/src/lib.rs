// Submodules
pub mod core;
pub mod data_source;
pub mod dialect;
pub mod error;
pub mod inline;
pub mod sharding;

pub use self::core::Config;
pub use data_source::DataSource;
pub use dialect::Dialect;
pub use error::Error;
pub use sharding::{DataNode, TableRule};
