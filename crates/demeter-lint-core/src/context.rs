//! Context types for rule execution.

use std::path::{Component, Path, PathBuf};

/// Template extensions recognized for view files.
const TEMPLATE_EXTENSIONS: &[&str] = &["erb", "haml", "slim", "builder", "rhtml", "rxml"];

/// Context provided to reviews for one source file.
///
/// Contains metadata about the file being analyzed that reviews can use
/// to decide whether a file is of interest (e.g., only partial views).
#[derive(Debug, Clone)]
pub struct FileContext<'a> {
    /// Path of the source file, as declared by its AST document.
    pub path: &'a Path,
    /// Whether this file is a partial view (`app/views/**/_*.erb`).
    pub is_partial_view: bool,
    /// Path relative to the project root.
    pub relative_path: PathBuf,
}

impl<'a> FileContext<'a> {
    /// Creates a new file context.
    #[must_use]
    pub fn new(path: &'a Path, root: &Path) -> Self {
        let relative_path = path
            .strip_prefix(root)
            .map_or_else(|_| path.to_path_buf(), Path::to_path_buf);
        let is_partial_view = Self::detect_partial_view(&relative_path);

        Self {
            path,
            is_partial_view,
            relative_path,
        }
    }

    /// Detects a partial view: a template under `app/views/` whose file
    /// name starts with an underscore.
    fn detect_partial_view(path: &Path) -> bool {
        let names: Vec<&str> = path
            .components()
            .filter_map(|c| match c {
                Component::Normal(s) => s.to_str(),
                _ => None,
            })
            .collect();

        let in_views = names.windows(2).any(|w| w == ["app", "views"]);
        if !in_views {
            return false;
        }

        let Some(file_name) = names.last() else {
            return false;
        };
        file_name.starts_with('_') && Self::has_template_extension(file_name)
    }

    /// Checks the final extension, so `_form.html.erb` counts as `erb`.
    fn has_template_extension(file_name: &str) -> bool {
        file_name
            .rsplit_once('.')
            .is_some_and(|(_, ext)| TEMPLATE_EXTENSIONS.contains(&ext))
    }
}
