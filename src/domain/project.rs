//! Project entities: the requested working copies and the run request.

use std::path::{Path, PathBuf};

/// A project directory requested by name under a common root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSpec {
    /// Directory name as given on the command line
    pub name: String,
    /// Root all projects live under
    pub root_directory: PathBuf,
}

impl ProjectSpec {
    /// Create a new project spec
    pub fn new(name: impl Into<String>, root_directory: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            root_directory: root_directory.into(),
        }
    }

    /// Path of the working copy
    pub fn working_path(&self) -> PathBuf {
        self.root_directory.join(&self.name)
    }
}

/// Everything a single run needs, fixed before probing starts
#[derive(Debug, Clone)]
pub struct StatusRequest {
    /// Project root directory
    pub root: PathBuf,
    /// Projects in the order they were requested
    pub projects: Vec<ProjectSpec>,
    /// Fetch and compute ahead/behind against the remote
    pub include_divergence: bool,
}

impl StatusRequest {
    /// Build a request from project names under `root`
    pub fn new<I, S>(root: &Path, names: I, include_divergence: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let projects = names
            .into_iter()
            .map(|name| ProjectSpec::new(name, root))
            .collect();

        Self {
            root: root.to_path_buf(),
            projects,
            include_divergence,
        }
    }

    /// Check the root exists and is a directory
    pub fn root_exists(&self) -> bool {
        self.root.is_dir()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_working_path() {
        let spec = ProjectSpec::new("alpha", "/home/dev/projects");
        assert_eq!(
            spec.working_path(),
            PathBuf::from("/home/dev/projects/alpha")
        );
    }

    #[test]
    fn test_request_keeps_order() {
        let request = StatusRequest::new(Path::new("/tmp/root"), ["beta", "alpha"], true);

        let names: Vec<_> = request.projects.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["beta", "alpha"]);
        assert!(request.include_divergence);
        assert_eq!(request.projects[0].root_directory, PathBuf::from("/tmp/root"));
    }

    #[test]
    fn test_root_exists() {
        let temp = tempfile::TempDir::new().unwrap();
        let request = StatusRequest::new(temp.path(), Vec::<String>::new(), false);
        assert!(request.root_exists());

        let request = StatusRequest::new(&temp.path().join("missing"), ["x"], false);
        assert!(!request.root_exists());
    }
}
