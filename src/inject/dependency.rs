use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A resolved dependency as reported by the build tool.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Dependency {
    /// Group can be absent, e.g. for file dependencies
    pub group: Option<String>,
    pub name: String,
    pub version: Option<String>,
}

impl Dependency {
    pub fn new(group: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            group: Some(group.into()),
            name: name.into(),
            version: None,
        }
    }

    pub fn matches(&self, name: &str, group: &str) -> bool {
        self.name == name && self.group.as_deref() == Some(group)
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(group) = &self.group {
            write!(f, "{group}:")?;
        }
        write!(f, "{}", self.name)?;
        if let Some(version) = &self.version {
            write!(f, ":{version}")?;
        }
        Ok(())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid dependency '{input}': expected group:name[:version]")]
pub struct DependencyParseError {
    pub input: String,
}

impl FromStr for Dependency {
    type Err = DependencyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DependencyParseError {
            input: s.to_string(),
        };
        let parts: Vec<&str> = s.trim().split(':').collect();
        if parts.iter().any(|part| part.is_empty()) {
            return Err(invalid());
        }
        match parts.as_slice() {
            [group, name] => Ok(Dependency::new(*group, *name)),
            [group, name, version] => Ok(Dependency {
                version: Some((*version).to_string()),
                ..Dependency::new(*group, *name)
            }),
            _ => Err(invalid()),
        }
    }
}

/// Whether `dependencies` contains an entry with both `name` and `group`.
pub fn has_dependency<'a, I>(dependencies: I, name: &str, group: &str) -> bool
where
    I: IntoIterator<Item = &'a Dependency>,
{
    dependencies
        .into_iter()
        .any(|dependency| dependency.matches(name, group))
}
