//! Comment- and literal-aware injection into Gradle build scripts.
//!
//! The engine never parses the script. It classifies the text once with the
//! scanner and only accepts marker matches that sit in code.

pub mod dependency;
pub mod dialect;
pub mod engine;
pub mod errors;

pub use dependency::{has_dependency, Dependency, DependencyParseError};
pub use dialect::Dialect;
pub use engine::{append_to_top, ContentUpdate, Injection, InjectionOutcome, Injector};
pub use errors::InjectError;
