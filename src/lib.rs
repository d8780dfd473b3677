//! Buildscript Injector: comment- and literal-aware edits to Gradle build scripts
//!
//! Adds a plugin classpath dependency and its repository to a build script
//! that may be arbitrarily formatted, without touching code that only looks
//! like the target because it is commented out or quoted.
//!
//! # Architecture
//!
//! - [`scan`] classifies text into code, comments and literals, strips
//!   comments line by line, and searches outside literals.
//! - [`inject`] uses those classifications to find the target block and
//!   splice the declaration in, or prepend a fresh block.
//! - [`config`] holds markers, templates and plugin coordinates.
//! - [`script`] and [`safety`] load, guard and atomically persist files.
//!
//! # Example
//!
//! ```
//! use buildscript_injector::{InjectionOutcome, Injector};
//!
//! let script = "// buildscript { commented out }\nbuildscript {\n}\n";
//! let injector = Injector::default();
//!
//! let injection = injector.inject_plugin(script);
//! assert_eq!(injection.outcome, InjectionOutcome::UpdatedBlock);
//!
//! // Idempotent: the plugin is now declared
//! let again = injector.inject_plugin(&injection.content);
//! assert_eq!(again.outcome, InjectionOutcome::AlreadyPresent);
//! ```

pub mod config;
pub mod inject;
pub mod safety;
pub mod scan;
pub mod script;

// Re-exports
pub use config::{load_for_project, load_from_path, load_from_str, ConfigError, InjectorConfig};
pub use inject::{
    append_to_top, has_dependency, ContentUpdate, Dependency, Dialect, InjectError, Injection,
    InjectionOutcome, Injector,
};
pub use safety::{ProjectGuard, SafetyError};
pub use scan::{
    find_literals, index_of_outside_literals, strip_comments, Classification, Lexicon, Range,
    ScanState,
};
pub use script::{discover_build_scripts, find_root_build_script, BuildScript, ScriptError, WriteResult};
