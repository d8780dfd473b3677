use std::path::{Path, PathBuf};
use thiserror::Error;

/// Project safety checks to prevent writing build scripts outside the target
/// project or into Gradle's own output and cache directories.
#[derive(Debug, Clone)]
pub struct ProjectGuard {
    /// Absolute path to project root
    project_root: PathBuf,
    /// Canonical paths to forbidden directories
    forbidden_paths: Vec<PathBuf>,
}

#[derive(Error, Debug)]
pub enum SafetyError {
    #[error("Path is outside project: {path} (project: {project})")]
    OutsideProject { path: PathBuf, project: PathBuf },

    #[error("Path is in forbidden directory: {path} (forbidden: {forbidden})")]
    ForbiddenPath { path: PathBuf, forbidden: PathBuf },

    #[error("Failed to canonicalize path: {0}")]
    Canonicalize(#[from] std::io::Error),
}

impl ProjectGuard {
    /// Create a new guard for the given project root.
    ///
    /// The root is canonicalized to handle symlinks correctly.
    pub fn new(project_root: impl AsRef<Path>) -> Result<Self, SafetyError> {
        let project_root = project_root.as_ref().canonicalize()?;
        let mut forbidden_paths = Vec::new();

        // ~/.gradle - wrapper distributions, caches, init scripts
        if let Some(home) = home::home_dir() {
            if let Ok(gradle_home) = home.join(".gradle").canonicalize() {
                forbidden_paths.push(gradle_home);
            }
        }

        // Project-local build output and Gradle state
        for dir in ["build", ".gradle"] {
            if let Ok(path) = project_root.join(dir).canonicalize() {
                forbidden_paths.push(path);
            }
        }

        Ok(Self {
            project_root,
            forbidden_paths,
        })
    }

    /// Check if a path is safe to write.
    ///
    /// Returns the canonicalized absolute path if safe.
    pub fn validate_path(&self, path: impl AsRef<Path>) -> Result<PathBuf, SafetyError> {
        let path = path.as_ref();

        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_root.join(path)
        };

        let canonical = absolute.canonicalize()?;

        if !canonical.starts_with(&self.project_root) {
            return Err(SafetyError::OutsideProject {
                path: canonical,
                project: self.project_root.clone(),
            });
        }

        if let Some(forbidden) = self
            .forbidden_paths
            .iter()
            .find(|forbidden| canonical.starts_with(forbidden))
        {
            return Err(SafetyError::ForbiddenPath {
                path: canonical,
                forbidden: forbidden.clone(),
            });
        }

        Ok(canonical)
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Create a guard with custom forbidden paths (for testing).
    #[cfg(test)]
    pub fn with_forbidden(
        project_root: impl AsRef<Path>,
        forbidden: Vec<PathBuf>,
    ) -> Result<Self, SafetyError> {
        let project_root = project_root.as_ref().canonicalize()?;
        Ok(Self {
            project_root,
            forbidden_paths: forbidden,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_validate_path_inside_project() {
        let temp_dir = tempfile::tempdir().unwrap();
        let project = temp_dir.path();
        let guard = ProjectGuard::new(project).unwrap();

        let file = project.join("app/build.gradle");
        fs::create_dir_all(file.parent().unwrap()).unwrap();
        fs::write(&file, b"").unwrap();

        assert!(guard.validate_path(&file).is_ok());
    }

    #[test]
    fn test_validate_path_outside_project() {
        let temp_dir = tempfile::tempdir().unwrap();
        let project = temp_dir.path().join("project");
        fs::create_dir_all(&project).unwrap();
        let guard = ProjectGuard::new(&project).unwrap();

        let outside = temp_dir.path().join("build.gradle");
        fs::write(&outside, b"").unwrap();

        let result = guard.validate_path(&outside);
        assert!(matches!(result, Err(SafetyError::OutsideProject { .. })));
    }

    #[test]
    fn test_validate_path_in_build_output() {
        let temp_dir = tempfile::tempdir().unwrap();
        let project = temp_dir.path();
        let generated = project.join("build/generated/build.gradle");
        fs::create_dir_all(generated.parent().unwrap()).unwrap();
        fs::write(&generated, b"").unwrap();

        let guard = ProjectGuard::new(project).unwrap();
        let result = guard.validate_path(&generated);
        assert!(matches!(result, Err(SafetyError::ForbiddenPath { .. })));
    }

    #[test]
    fn test_validate_path_custom_forbidden() {
        let temp_dir = tempfile::tempdir().unwrap();
        let project = temp_dir.path();
        let vendored = project.join("vendored");
        fs::create_dir_all(&vendored).unwrap();
        let file = vendored.join("build.gradle");
        fs::write(&file, b"").unwrap();

        let guard =
            ProjectGuard::with_forbidden(project, vec![vendored.canonicalize().unwrap()]).unwrap();
        let result = guard.validate_path(&file);
        assert!(matches!(result, Err(SafetyError::ForbiddenPath { .. })));
    }

    #[test]
    fn test_validate_relative_path() {
        let temp_dir = tempfile::tempdir().unwrap();
        let project = temp_dir.path();
        let guard = ProjectGuard::new(project).unwrap();

        fs::write(project.join("build.gradle.kts"), b"").unwrap();

        assert!(guard.validate_path("build.gradle.kts").is_ok());
    }

    #[test]
    #[cfg(unix)]
    fn test_validate_symlink_escape() {
        use std::os::unix::fs::symlink;

        let temp_dir = tempfile::tempdir().unwrap();
        let project = temp_dir.path().join("project");
        fs::create_dir_all(&project).unwrap();

        let outside = temp_dir.path().join("outside.gradle");
        fs::write(&outside, b"").unwrap();

        let link = project.join("build.gradle");
        symlink(&outside, &link).unwrap();

        let guard = ProjectGuard::new(&project).unwrap();
        let result = guard.validate_path(&link);

        assert!(matches!(result, Err(SafetyError::OutsideProject { .. })));
    }
}
