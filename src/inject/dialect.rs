use crate::inject::errors::InjectError;
use std::fmt;
use std::path::Path;

pub const KOTLIN_SUFFIX: &str = ".gradle.kts";
pub const GROOVY_SUFFIX: &str = ".gradle";

/// Build-script syntax, inferred from the file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// Brace-based Groovy DSL (`build.gradle`)
    Groovy,
    /// Function-call Kotlin DSL (`build.gradle.kts`)
    Kotlin,
}

impl Dialect {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, InjectError> {
        let path = path.as_ref();
        let name = path.to_string_lossy();

        if name.ends_with(KOTLIN_SUFFIX) {
            Ok(Dialect::Kotlin)
        } else if name.ends_with(GROOVY_SUFFIX) {
            Ok(Dialect::Groovy)
        } else {
            Err(InjectError::UnsupportedDialect {
                path: path.to_path_buf(),
            })
        }
    }

    /// Root build script file name for this dialect.
    pub const fn build_file_name(self) -> &'static str {
        match self {
            Dialect::Groovy => "build.gradle",
            Dialect::Kotlin => "build.gradle.kts",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::Groovy => write!(f, "groovy"),
            Dialect::Kotlin => write!(f, "kotlin"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_path_groovy() {
        assert_eq!(Dialect::from_path("build.gradle").unwrap(), Dialect::Groovy);
        assert_eq!(
            Dialect::from_path("app/settings.gradle").unwrap(),
            Dialect::Groovy
        );
    }

    #[test]
    fn test_from_path_kotlin() {
        assert_eq!(Dialect::from_path("build.gradle.kts").unwrap(), Dialect::Kotlin);
        assert_eq!(
            Dialect::from_path("/tmp/project/app/build.gradle.kts").unwrap(),
            Dialect::Kotlin
        );
    }

    #[test]
    fn test_from_path_unsupported() {
        let err = Dialect::from_path("README.md").unwrap_err();
        assert_eq!(
            err,
            InjectError::UnsupportedDialect {
                path: "README.md".into()
            }
        );
        assert!(Dialect::from_path("build.gradle.bak").is_err());
        assert!(Dialect::from_path("build.kts").is_err());
    }

    #[test]
    fn test_build_file_name_round_trips() {
        for dialect in [Dialect::Groovy, Dialect::Kotlin] {
            assert_eq!(Dialect::from_path(dialect.build_file_name()).unwrap(), dialect);
        }
    }
}
