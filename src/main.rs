use anyhow::{Context, Result};
use buildscript_injector::config::{load_for_project, load_from_path};
use buildscript_injector::scan::strip_comments_with;
use buildscript_injector::{
    discover_build_scripts, find_root_build_script, has_dependency, BuildScript, Dependency,
    InjectionOutcome, Injector, InjectorConfig, ProjectGuard, WriteResult,
};
use clap::{Parser, Subcommand};
use colored::Colorize;
use similar::{ChangeTag, TextDiff};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

const PROJECT_ENV: &str = "BUILDSCRIPT_INJECTOR_PROJECT";

#[derive(Parser)]
#[command(name = "buildscript-injector")]
#[command(about = "Inject a plugin dependency into Gradle build scripts", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Declare the plugin in the project's root build script
    Inject {
        /// Path to the Gradle project root (defaults to the current directory)
        #[arg(short, long, env = PROJECT_ENV)]
        project: Option<PathBuf>,

        /// Injector config file (defaults to <project>/buildscript-injector.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// A dependency already on the build classpath; repeatable
        #[arg(long = "resolved", value_name = "GROUP:NAME[:VERSION]")]
        resolved: Vec<Dependency>,

        /// Dry run - show what would be changed without modifying files
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Show unified diff of changes
        #[arg(short, long)]
        diff: bool,
    },

    /// Report whether each build script in the project declares the plugin
    Status {
        /// Path to the Gradle project root (defaults to the current directory)
        #[arg(short, long, env = PROJECT_ENV)]
        project: Option<PathBuf>,

        /// Injector config file (defaults to <project>/buildscript-injector.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Print a file with its comments removed
    Strip {
        file: PathBuf,

        /// Injector config file providing the comment markers
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Print the byte offset of NEEDLE outside comments and literals
    Locate {
        file: PathBuf,
        needle: String,

        /// Injector config file providing the comment markers
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Inject {
            project,
            config,
            resolved,
            dry_run,
            diff,
        } => cmd_inject(project, config, &resolved, dry_run, diff),

        Commands::Status { project, config } => cmd_status(project, config),

        Commands::Strip { file, config } => cmd_strip(&file, config),

        Commands::Locate {
            file,
            needle,
            config,
        } => cmd_locate(&file, &needle, config),
    }
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Resolve the project root: explicit flag or env var, else the current directory.
fn resolve_project(cli_project: Option<PathBuf>) -> Result<PathBuf> {
    let path = match cli_project {
        Some(path) => path,
        None => env::current_dir().context("cannot determine current directory")?,
    };
    path.canonicalize()
        .with_context(|| format!("project directory {} does not exist", path.display()))
}

fn load_config(explicit: Option<PathBuf>) -> Result<InjectorConfig> {
    match explicit {
        Some(path) => Ok(load_from_path(path)?),
        None => Ok(InjectorConfig::default()),
    }
}

fn read_source(file: &Path) -> Result<String> {
    fs::read_to_string(file).with_context(|| format!("failed to read {}", file.display()))
}

/// Helper: Show unified diff between original and modified content
fn display_diff(file: &Path, original: &str, modified: &str) {
    println!(
        "\n{}",
        format!("--- {} (original)", file.display()).dimmed()
    );
    println!("{}", format!("+++ {} (injected)", file.display()).dimmed());

    let diff = TextDiff::from_lines(original, modified);

    for change in diff.iter_all_changes() {
        let sign = match change.tag() {
            ChangeTag::Delete => format!("-{}", change).red(),
            ChangeTag::Insert => format!("+{}", change).green(),
            ChangeTag::Equal => format!(" {}", change).normal(),
        };
        print!("{}", sign);
    }
    println!();
}

fn cmd_inject(
    project: Option<PathBuf>,
    config: Option<PathBuf>,
    resolved: &[Dependency],
    dry_run: bool,
    show_diff: bool,
) -> Result<()> {
    // 1. Resolve project, config and the root build script
    let project = resolve_project(project)?;
    let config = load_for_project(&project, config.as_deref())?;
    let guard = ProjectGuard::new(&project)?;
    let path = guard.validate_path(find_root_build_script(&project)?)?;
    let script = BuildScript::load(&path)?;
    let injector = Injector::new(config);
    let plugin = &injector.config().plugin;

    println!("Project: {}", project.display());
    println!("Build script: {} ({})", path.display(), script.dialect());
    println!("Plugin: {}", plugin.coordinate());
    println!();

    // 2. Nothing to do when the build already resolves the plugin
    if has_dependency(resolved, &plugin.name, &plugin.group) {
        println!(
            "{} {} is already on the build classpath",
            "⊙".yellow(),
            plugin.module()
        );
        return Ok(());
    }

    // 3. Declare the plugin
    let injection = injector.inject_plugin(script.content());
    match injection.outcome {
        InjectionOutcome::AlreadyPresent => {
            println!("{} Plugin already declared", "⊙".yellow());
        }
        InjectionOutcome::UpdatedBlock => {
            println!(
                "{} Declared plugin in existing '{}' block",
                "✓".green(),
                injector.config().target.marker
            );
        }
        InjectionOutcome::PrependedBlock => {
            println!(
                "{} No '{}' block found, prepended a new one",
                "✓".green(),
                injector.config().target.marker
            );
        }
    }

    // 4. Optional trailing statements
    let mut content = injection.content;
    let mut statements = Vec::new();
    if let Some(applied) = &injector.config().append.script {
        statements.push(injector.content_to_append(script.path(), applied)?);
    }
    if let Some(task) = &injector.config().append.task {
        statements.push(injector.task_registration(script.path(), &task.name, &task.class)?);
    }
    for statement in statements {
        match injector.ensure_statement(&content, &statement) {
            Some(updated) => {
                println!("{} Appended: {}", "✓".green(), statement.trim());
                content = updated;
            }
            None => println!("{} Already present: {}", "⊙".yellow(), statement.trim()),
        }
    }

    // 5. Persist
    if dry_run {
        println!("{}", "[DRY RUN - no files were modified]".cyan());
    } else {
        match script.save(&content)? {
            WriteResult::Written { path, bytes } => {
                println!("{} Wrote {} ({} bytes)", "✓".green(), path.display(), bytes);
            }
            WriteResult::Unchanged { path } => {
                println!("{} {} is up to date", "⊙".yellow(), path.display());
            }
        }
    }

    if show_diff && content != script.content() {
        display_diff(script.path(), script.content(), &content);
    }

    Ok(())
}

fn cmd_status(project: Option<PathBuf>, config: Option<PathBuf>) -> Result<()> {
    let project = resolve_project(project)?;
    let config = load_for_project(&project, config.as_deref())?;
    let injector = Injector::new(config);
    let marker = &injector.config().target.marker;

    let scripts = discover_build_scripts(&project)?;
    if scripts.is_empty() {
        anyhow::bail!("No build scripts found under {}", project.display());
    }

    println!("{}", "Build Script Status Report".bold());
    println!("Project: {}", project.display());
    println!("Plugin: {}", injector.config().plugin.module());
    println!();

    let mut declared = 0;
    for path in &scripts {
        let script = BuildScript::load(path)?;
        let shown = path.strip_prefix(&project).unwrap_or(path);

        if injector.declares_plugin(script.content()) {
            println!("{} {} ({})", "✓".green(), shown.display(), "DECLARED".green());
            declared += 1;
        } else if injector
            .locate_insertion_point(script.content(), marker)
            .is_some()
        {
            println!(
                "{} {} ({})",
                "⊙".yellow(),
                shown.display(),
                format!("NOT DECLARED, '{marker}' block present").yellow()
            );
        } else {
            println!(
                "{} {} ({})",
                "⊘".cyan(),
                shown.display(),
                format!("NOT DECLARED, no '{marker}' block").cyan()
            );
        }
    }

    println!();
    println!("{}", "Summary:".bold());
    println!("  {} declared", format!("{}", declared).green());
    println!(
        "  {} not declared",
        format!("{}", scripts.len() - declared).yellow()
    );

    Ok(())
}

fn cmd_strip(file: &Path, config: Option<PathBuf>) -> Result<()> {
    let config = load_config(config)?;
    let content = read_source(file)?;
    print!("{}", strip_comments_with(content.lines(), &config.lexicon));
    Ok(())
}

fn cmd_locate(file: &Path, needle: &str, config: Option<PathBuf>) -> Result<()> {
    let injector = Injector::new(load_config(config)?);
    let content = read_source(file)?;

    match injector.find_in_code(&content, needle) {
        Some(offset) => {
            println!("{}", offset);
            Ok(())
        }
        None => {
            eprintln!(
                "{} '{}' not found outside comments and literals in {}",
                "✗".red(),
                needle,
                file.display()
            );
            std::process::exit(1);
        }
    }
}
