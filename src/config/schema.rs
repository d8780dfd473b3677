use crate::inject::Dialect;
use crate::scan::Lexicon;
use serde::Deserialize;
use std::fmt;

/// Placeholder substituted with `group:name:version` in the dependency template.
pub const COORDINATE_PLACEHOLDER: &str = "{coordinate}";
/// Placeholder substituted with the applied script path.
pub const SCRIPT_PLACEHOLDER: &str = "{script}";
/// Placeholders substituted in task registration templates.
pub const TASK_NAME_PLACEHOLDER: &str = "{name}";
pub const TASK_CLASS_PLACEHOLDER: &str = "{class}";

/// Everything the injection engine needs to know about its target scripts.
#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct InjectorConfig {
    pub target: Target,
    pub plugin: Plugin,
    pub templates: Templates,
    pub lexicon: Lexicon,
    pub append: Append,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Target {
    /// Text that opens the block the dependency is spliced into
    pub marker: String,
}

impl Default for Target {
    fn default() -> Self {
        Self {
            marker: "buildscript {".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Plugin {
    pub group: String,
    pub name: String,
    pub version: String,
}

impl Default for Plugin {
    fn default() -> Self {
        Self {
            group: "io.bitrise.trace.plugin".to_string(),
            name: "trace-gradle-plugin".to_string(),
            version: "0.0.8".to_string(),
        }
    }
}

impl Plugin {
    /// `group:name`, the part of the coordinate that identifies the plugin.
    pub fn module(&self) -> String {
        format!("{}:{}", self.group, self.name)
    }

    pub fn coordinate(&self) -> String {
        format!("{}:{}:{}", self.group, self.name, self.version)
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Templates {
    /// Plugin classpath declaration, spliced first
    pub dependency: String,
    /// Repository configuration, spliced after the dependency
    pub repository: String,
    pub groovy: DialectTemplates,
    pub kotlin: DialectTemplates,
}

impl Default for Templates {
    fn default() -> Self {
        Self {
            dependency: "\n    dependencies {\n        classpath(\"{coordinate}\")\n    }".to_string(),
            repository: "\n    repositories {\n        mavenCentral()\n    }".to_string(),
            groovy: DialectTemplates {
                apply: "\napply from: \"{script}\"".to_string(),
                task: "\n\ntask {name}(type: {class})".to_string(),
            },
            kotlin: DialectTemplates {
                apply: "\napply(\"{script}\")".to_string(),
                task: "\n\ntasks.register<{class}>(\"{name}\")".to_string(),
            },
        }
    }
}

impl Templates {
    pub fn for_dialect(&self, dialect: Dialect) -> &DialectTemplates {
        match dialect {
            Dialect::Groovy => &self.groovy,
            Dialect::Kotlin => &self.kotlin,
        }
    }
}

/// Statement templates that differ between the Groovy and Kotlin DSLs.
#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct DialectTemplates {
    pub apply: String,
    pub task: String,
}

/// Optional statements appended to the end of the root build script.
#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Append {
    /// Script applied with the dialect's apply statement
    pub script: Option<String>,
    pub task: Option<TaskRegistration>,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TaskRegistration {
    pub name: String,
    pub class: String,
}

impl InjectorConfig {
    /// Dependency declaration followed by repository configuration.
    pub fn plugin_declaration(&self) -> String {
        let dependency = self
            .templates
            .dependency
            .replace(COORDINATE_PLACEHOLDER, &self.plugin.coordinate());
        format!("{dependency}{}", self.templates.repository)
    }

    /// A complete target block holding the plugin declaration.
    pub fn standalone_block(&self) -> String {
        format!("{}{}\n}}\n", self.target.marker, self.plugin_declaration())
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = Vec::new();

        let required = [
            ("target.marker", &self.target.marker),
            ("plugin.group", &self.plugin.group),
            ("plugin.name", &self.plugin.name),
            ("plugin.version", &self.plugin.version),
            ("lexicon.line_comment", &self.lexicon.line_comment),
            ("lexicon.block_open", &self.lexicon.block_open),
            ("lexicon.block_close", &self.lexicon.block_close),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                issues.push(ValidationIssue::EmptyField { field });
            }
        }

        if !self.plugin.version.trim().is_empty() {
            if let Err(e) = semver::Version::parse(&self.plugin.version) {
                issues.push(ValidationIssue::InvalidVersion {
                    version: self.plugin.version.clone(),
                    message: e.to_string(),
                });
            }
        }

        let placeholders = [
            ("templates.dependency", &self.templates.dependency, COORDINATE_PLACEHOLDER),
            ("templates.groovy.apply", &self.templates.groovy.apply, SCRIPT_PLACEHOLDER),
            ("templates.kotlin.apply", &self.templates.kotlin.apply, SCRIPT_PLACEHOLDER),
            ("templates.groovy.task", &self.templates.groovy.task, TASK_NAME_PLACEHOLDER),
            ("templates.kotlin.task", &self.templates.kotlin.task, TASK_NAME_PLACEHOLDER),
        ];
        for (field, template, placeholder) in placeholders {
            if !template.contains(placeholder) {
                issues.push(ValidationIssue::MissingPlaceholder { field, placeholder });
            }
        }

        let lexicon = &self.lexicon;
        if !lexicon.line_comment.is_empty() && lexicon.line_comment == lexicon.block_open {
            issues.push(ValidationIssue::ConflictingMarkers {
                message: "line_comment and block_open must differ".to_string(),
            });
        }
        if lexicon.string_quote == lexicon.char_quote {
            issues.push(ValidationIssue::ConflictingMarkers {
                message: "string_quote and char_quote must differ".to_string(),
            });
        }

        if let Some(task) = &self.append.task {
            if task.name.trim().is_empty() {
                issues.push(ValidationIssue::EmptyField {
                    field: "append.task.name",
                });
            }
            if task.class.trim().is_empty() {
                issues.push(ValidationIssue::EmptyField {
                    field: "append.task.class",
                });
            }
        }
        if matches!(&self.append.script, Some(script) if script.trim().is_empty()) {
            issues.push(ValidationIssue::EmptyField {
                field: "append.script",
            });
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { issues })
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.issues.iter().map(ToString::to_string).collect();
        write!(f, "{}", rendered.join("; "))
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    EmptyField {
        field: &'static str,
    },
    MissingPlaceholder {
        field: &'static str,
        placeholder: &'static str,
    },
    InvalidVersion {
        version: String,
        message: String,
    },
    ConflictingMarkers {
        message: String,
    },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::EmptyField { field } => write!(f, "{field} must not be empty"),
            ValidationIssue::MissingPlaceholder { field, placeholder } => {
                write!(f, "{field} must contain {placeholder}")
            }
            ValidationIssue::InvalidVersion { version, message } => {
                write!(f, "plugin.version '{version}' is not a semantic version: {message}")
            }
            ValidationIssue::ConflictingMarkers { message } => write!(f, "lexicon: {message}"),
        }
    }
}
