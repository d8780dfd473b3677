//! Integration tests for injector configuration
//!
//! Tests that settings loaded from TOML flow through to the injection engine.

use buildscript_injector::config::{
    load_for_project, load_from_str, ConfigError, ConfigOrigin, CONFIG_FILE_NAME,
};
use buildscript_injector::{InjectionOutcome, Injector};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_custom_plugin_and_templates() {
    let config = load_from_str(
        r#"
[plugin]
group = "com.example"
name = "metrics-plugin"
version = "2.1.0"

[templates]
dependency = "\n    dependencies { classpath '{coordinate}' }"
repository = "\n    repositories { gradlePluginPortal() }"
"#,
    )
    .unwrap();
    let injector = Injector::new(config);

    let injection = injector.inject_plugin("buildscript {\n}\n");
    assert_eq!(injection.outcome, InjectionOutcome::UpdatedBlock);
    assert_eq!(
        injection.content,
        "buildscript {\n    dependencies { classpath 'com.example:metrics-plugin:2.1.0' }\n    repositories { gradlePluginPortal() }\n}\n"
    );
    assert!(injector.declares_plugin(&injection.content));
}

#[test]
fn test_custom_marker() {
    let config = load_from_str("[target]\nmarker = \"pluginManagement {\"\n").unwrap();
    let injector = Injector::new(config);

    let script = "// pluginManagement {\npluginManagement {\n}\n";
    let injection = injector.inject_plugin(script);
    assert_eq!(injection.outcome, InjectionOutcome::UpdatedBlock);
    assert!(injection
        .content
        .starts_with("// pluginManagement {\npluginManagement {\n    dependencies {"));
}

#[test]
fn test_custom_lexicon_changes_comment_detection() {
    let config = load_from_str("[lexicon]\nline_comment = \"#\"\n").unwrap();
    let injector = Injector::new(config);

    // `//` is ordinary text under this lexicon, `#` starts a comment
    let script = "# buildscript {\n// buildscript {\n";
    assert_eq!(injector.find_in_code(script, "buildscript {"), Some(19));
}

#[test]
fn test_append_section() {
    let config = load_from_str(
        r#"
[append]
script = "gradle/trace.gradle"

[append.task]
name = "injectTrace"
class = "io.bitrise.trace.step.InjectTraceTask"
"#,
    )
    .unwrap();
    let task = config.append.task.clone().unwrap();
    let injector = Injector::new(config);

    assert_eq!(
        injector
            .content_to_append("build.gradle", "gradle/trace.gradle")
            .unwrap(),
        "\napply from: \"gradle/trace.gradle\""
    );
    assert_eq!(
        injector
            .task_registration("build.gradle.kts", &task.name, &task.class)
            .unwrap(),
        "\n\ntasks.register<io.bitrise.trace.step.InjectTraceTask>(\"injectTrace\")"
    );
}

#[test]
fn test_project_config_file_is_picked_up() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join(CONFIG_FILE_NAME),
        "[plugin]\nversion = \"0.1.0\"\n",
    )
    .unwrap();

    let config = load_for_project(dir.path(), None).unwrap();
    assert_eq!(
        config.plugin.coordinate(),
        "io.bitrise.trace.plugin:trace-gradle-plugin:0.1.0"
    );
}

#[test]
fn test_explicit_config_wins_over_project_file() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join(CONFIG_FILE_NAME),
        "[plugin]\nversion = \"0.1.0\"\n",
    )
    .unwrap();
    let explicit = dir.path().join("other.toml");
    fs::write(&explicit, "[plugin]\nversion = \"3.0.0\"\n").unwrap();

    let config = load_for_project(dir.path(), Some(&explicit)).unwrap();
    assert_eq!(config.plugin.version, "3.0.0");
}

#[test]
fn test_invalid_project_config_reports_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    fs::write(&path, "[templates]\ndependency = \"classpath\"\n").unwrap();

    let err = load_for_project(dir.path(), None).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::Validation {
            origin: ConfigOrigin::Project(_),
            ..
        }
    ));
    let message = err.to_string();
    assert!(message.starts_with("project config "));
    assert!(message.contains(CONFIG_FILE_NAME));
    assert!(message.contains("templates.dependency must contain {coordinate}"));
}
