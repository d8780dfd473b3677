pub mod loader;
pub mod schema;

pub use loader::{
    load_for_project, load_from_path, load_from_str, ConfigError, ConfigOrigin, CONFIG_FILE_NAME,
};
pub use schema::{
    Append, DialectTemplates, InjectorConfig, Plugin, Target, TaskRegistration, Templates,
    ValidationError, ValidationIssue,
};
