//! Resolve user input (`.xcodeproj`, `.xcworkspace`, or a directory) to a
//! concrete Xcode project.

use std::fs;
use std::path::{Path, PathBuf};

use roxmltree::{Document, Node};
use tracing::debug;

use crate::domain::{AppError, ProjectIdentity};

const WORKSPACE_DATA: &str = "contents.xcworkspacedata";
const PROJECT_FILE: &str = "project.pbxproj";

/// A resolved `.xcodeproj`, remembering the container it was reached through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedProject {
    /// Path the caller supplied, canonicalized.
    pub input_path: PathBuf,
    pub xcodeproj_path: PathBuf,
    pub workspace_path: Option<PathBuf>,
}

impl LocatedProject {
    pub fn is_workspace(&self) -> bool {
        self.workspace_path.is_some()
    }

    pub fn pbxproj_path(&self) -> PathBuf {
        self.xcodeproj_path.join(PROJECT_FILE)
    }

    /// SRCROOT: the directory holding the `.xcodeproj`.
    pub fn project_root(&self) -> PathBuf {
        self.xcodeproj_path.parent().map(Path::to_path_buf).unwrap_or_default()
    }

    /// Project name (the `.xcodeproj` stem).
    pub fn project_name(&self) -> String {
        project_stem(&self.xcodeproj_path)
    }

    /// Store identity for `target`; the project name only takes part inside a workspace.
    pub fn identity(&self, target: &str) -> ProjectIdentity {
        let name = self.is_workspace().then(|| self.project_name());
        ProjectIdentity::new(&self.xcodeproj_path, name.as_deref(), target)
    }
}

/// Resolve `input` to a project, choosing `project_name` inside workspaces.
pub fn locate(input: &Path, project_name: Option<&str>) -> Result<LocatedProject, AppError> {
    let input_path = input
        .canonicalize()
        .map_err(|_| AppError::ProjectNotFound(input.display().to_string()))?;

    if has_extension(&input_path, "xcodeproj") {
        return Ok(LocatedProject {
            xcodeproj_path: input_path.clone(),
            input_path,
            workspace_path: None,
        });
    }

    if has_extension(&input_path, "xcworkspace") {
        let projects = workspace_projects(&input_path)?;
        let chosen = select_project(&projects, project_name).ok_or_else(|| {
            AppError::ProjectNotFound(format!(
                "{} (no matching project in workspace)",
                input_path.display()
            ))
        })?;
        debug!(
            workspace = %input_path.display(),
            project = %chosen.display(),
            "resolved workspace project"
        );
        return Ok(LocatedProject {
            xcodeproj_path: chosen,
            workspace_path: Some(input_path.clone()),
            input_path,
        });
    }

    if input_path.is_dir() {
        let projects = directory_projects(&input_path)?;
        let chosen = select_project(&projects, project_name)
            .ok_or_else(|| AppError::ProjectNotFound(input_path.display().to_string()))?;
        return Ok(LocatedProject { xcodeproj_path: chosen, input_path, workspace_path: None });
    }

    Err(AppError::ProjectNotFound(input_path.display().to_string()))
}

/// Names of the projects reachable from `input`.
pub fn list_projects(input: &Path) -> Result<Vec<String>, AppError> {
    let path = input
        .canonicalize()
        .map_err(|_| AppError::ProjectNotFound(input.display().to_string()))?;
    let projects = if has_extension(&path, "xcworkspace") {
        workspace_projects(&path)?
    } else if has_extension(&path, "xcodeproj") {
        vec![path]
    } else {
        directory_projects(&path)?
    };
    Ok(projects.iter().map(|project| project_stem(project)).collect())
}

/// Existing `.xcodeproj` bundles referenced by a workspace, in file order.
pub fn workspace_projects(workspace: &Path) -> Result<Vec<PathBuf>, AppError> {
    let data_path = workspace.join(WORKSPACE_DATA);
    let xml = fs::read_to_string(&data_path)
        .map_err(|_| AppError::ProjectNotFound(data_path.display().to_string()))?;
    let doc = Document::parse(&xml).map_err(|err| AppError::Parse {
        path: data_path.clone(),
        line: 0,
        column: 0,
        details: err.to_string(),
    })?;

    let base = workspace.parent().unwrap_or(Path::new("/"));
    let projects = doc
        .descendants()
        .filter(|node| node.has_tag_name("FileRef"))
        .filter_map(|node| resolve_file_ref(node, base, workspace))
        .filter(|path| has_extension(path, "xcodeproj") && path.is_dir())
        .collect();
    Ok(projects)
}

fn resolve_file_ref(node: Node<'_, '_>, base: &Path, workspace: &Path) -> Option<PathBuf> {
    let mut parts = Vec::new();
    let located = node.ancestors().filter(|n| n.has_tag_name("FileRef") || n.has_tag_name("Group"));
    for element in located {
        let Some(location) = element.attribute("location") else { continue };
        let (kind, path) = location.split_once(':')?;
        parts.push(path);
        match kind {
            "group" => continue,
            "container" => return Some(join_reversed(base, &parts)),
            "absolute" => return Some(join_reversed(Path::new("/"), &parts)),
            "self" => return Some(join_reversed(workspace, &parts)),
            _ => return None,
        }
    }
    Some(join_reversed(base, &parts))
}

fn join_reversed(base: &Path, parts: &[&str]) -> PathBuf {
    parts
        .iter()
        .rev()
        .filter(|part| !part.is_empty())
        .fold(base.to_path_buf(), |acc, part| acc.join(part))
}

fn directory_projects(dir: &Path) -> Result<Vec<PathBuf>, AppError> {
    let mut projects: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| has_extension(path, "xcodeproj") && path.is_dir())
        .collect();
    projects.sort();
    Ok(projects)
}

/// Named project, else the first that is not CocoaPods' `Pods`, else the first.
fn select_project(projects: &[PathBuf], name: Option<&str>) -> Option<PathBuf> {
    if let Some(name) = name.filter(|name| !name.is_empty()) {
        return projects.iter().find(|project| project_stem(project) == name).cloned();
    }
    projects
        .iter()
        .find(|project| project_stem(project) != "Pods")
        .or_else(|| projects.first())
        .cloned()
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension().is_some_and(|ext| ext == extension)
}

fn project_stem(path: &Path) -> String {
    path.file_stem().map(|stem| stem.to_string_lossy().into_owned()).unwrap_or_default()
}
