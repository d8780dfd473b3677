use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InjectError {
    #[error("could not determine the build script dialect of {path}: expected a .gradle or .gradle.kts file")]
    UnsupportedDialect { path: PathBuf },
}
