use crate::config::schema::{
    InjectorConfig, SCRIPT_PLACEHOLDER, TASK_CLASS_PLACEHOLDER, TASK_NAME_PLACEHOLDER,
};
use crate::inject::dialect::Dialect;
use crate::inject::errors::InjectError;
use crate::scan::{find_in_code, find_uncommented, Classification};
use std::path::Path;

/// Result of splicing the plugin declaration into the target block.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "ContentUpdate holds the new content; the caller must persist it"]
pub struct ContentUpdate {
    pub content: String,
    /// The target block was found and the content changed
    pub found: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectionOutcome {
    /// The plugin is already declared outside comments
    AlreadyPresent,
    /// The declaration was spliced into the existing target block
    UpdatedBlock,
    /// No target block exists; a complete one was prepended
    PrependedBlock,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "Injection holds the new content; the caller must persist it"]
pub struct Injection {
    pub content: String,
    pub outcome: InjectionOutcome,
}

impl Injection {
    pub fn changed(&self) -> bool {
        self.outcome != InjectionOutcome::AlreadyPresent
    }
}

/// Prepend `prefix` to `content` without looking at either.
///
/// Calling this twice duplicates the prefix; callers guard it with
/// [`Injector::declares_plugin`].
pub fn append_to_top(content: &str, prefix: &str) -> String {
    let mut updated = String::with_capacity(prefix.len() + content.len());
    updated.push_str(prefix);
    updated.push_str(content);
    updated
}

/// Injection engine bound to one configuration.
///
/// All operations are pure: they take the current script text and return new
/// text. Offsets always refer to the original, unstripped content.
#[derive(Debug, Clone, Default)]
pub struct Injector {
    config: InjectorConfig,
}

impl Injector {
    pub fn new(config: InjectorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &InjectorConfig {
        &self.config
    }

    pub fn classify(&self, content: &str) -> Classification {
        Classification::of(content, &self.config.lexicon)
    }

    /// Start offset of the first `needle` that is neither commented out nor
    /// inside a literal.
    pub fn find_in_code(&self, content: &str, needle: &str) -> Option<usize> {
        find_in_code(&self.classify(content), content, needle)
    }

    /// Offset just past the first code occurrence of `marker`.
    ///
    /// `None` is the normal "nothing to update" outcome, not an error.
    pub fn locate_insertion_point(&self, content: &str, marker: &str) -> Option<usize> {
        let offset = self
            .find_in_code(content, marker)
            .map(|start| start + marker.len());
        tracing::debug!(marker, ?offset, "located insertion point");
        offset
    }

    /// Apply-statement template for the dialect of `file_name`.
    pub fn dialect_append_syntax(&self, file_name: impl AsRef<Path>) -> Result<&str, InjectError> {
        let dialect = Dialect::from_path(file_name)?;
        Ok(&self.config.templates.for_dialect(dialect).apply)
    }

    /// Apply statement for `script`, rendered for the dialect of `file_name`.
    pub fn content_to_append(
        &self,
        file_name: impl AsRef<Path>,
        script: &str,
    ) -> Result<String, InjectError> {
        Ok(self
            .dialect_append_syntax(file_name)?
            .replace(SCRIPT_PLACEHOLDER, script))
    }

    /// Task registration statement, rendered for the dialect of `file_name`.
    pub fn task_registration(
        &self,
        file_name: impl AsRef<Path>,
        name: &str,
        class: &str,
    ) -> Result<String, InjectError> {
        let dialect = Dialect::from_path(file_name)?;
        Ok(self
            .config
            .templates
            .for_dialect(dialect)
            .task
            .replace(TASK_NAME_PLACEHOLDER, name)
            .replace(TASK_CLASS_PLACEHOLDER, class))
    }

    /// Splice the dependency declaration and repository configuration right
    /// after the target marker.
    ///
    /// When the marker only appears in comments or literals, the content is
    /// returned unchanged with `found == false`.
    pub fn update_build_script_content(&self, content: &str) -> ContentUpdate {
        let Some(offset) = self.locate_insertion_point(content, &self.config.target.marker) else {
            return ContentUpdate {
                content: content.to_string(),
                found: false,
            };
        };

        let declaration = self.config.plugin_declaration();
        let mut updated = String::with_capacity(content.len() + declaration.len());
        updated.push_str(&content[..offset]);
        updated.push_str(&declaration);
        updated.push_str(&content[offset..]);

        ContentUpdate {
            content: updated,
            found: true,
        }
    }

    /// Whether the plugin's `group:name` appears outside comments.
    ///
    /// Literals are searched: the coordinate is normally written as a string.
    pub fn declares_plugin(&self, content: &str) -> bool {
        let module = self.config.plugin.module();
        find_uncommented(&self.classify(content), content, &module).is_some()
    }

    /// Declare the plugin exactly once.
    ///
    /// Running this on its own output is a no-op.
    pub fn inject_plugin(&self, content: &str) -> Injection {
        if self.declares_plugin(content) {
            tracing::info!(plugin = %self.config.plugin.module(), "plugin already declared");
            return Injection {
                content: content.to_string(),
                outcome: InjectionOutcome::AlreadyPresent,
            };
        }

        let update = self.update_build_script_content(content);
        if update.found {
            tracing::info!(marker = %self.config.target.marker, "updated existing block");
            return Injection {
                content: update.content,
                outcome: InjectionOutcome::UpdatedBlock,
            };
        }

        tracing::info!(marker = %self.config.target.marker, "no block found, prepending one");
        Injection {
            content: append_to_top(content, &self.config.standalone_block()),
            outcome: InjectionOutcome::PrependedBlock,
        }
    }

    /// Append `statement` unless its trimmed text already appears outside
    /// comments. Returns `None` when nothing has to change.
    pub fn ensure_statement(&self, content: &str, statement: &str) -> Option<String> {
        let needle = statement.trim();
        if needle.is_empty() {
            return None;
        }
        if find_uncommented(&self.classify(content), content, needle).is_some() {
            tracing::debug!(statement = needle, "statement already present");
            return None;
        }
        let mut updated = String::with_capacity(content.len() + statement.len());
        updated.push_str(content);
        updated.push_str(statement);
        Some(updated)
    }
}
