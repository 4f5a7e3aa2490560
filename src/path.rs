/// A slash-delimited relative path split into its display parts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathParts {
    /// Everything before the last `/`, empty at the root
    pub directory: String,
    pub full_filename: String,
    /// File name without its suffix
    pub filename: String,
    /// Extension after the last `.`, without the dot
    pub suffix: Option<String>,
}

impl PathParts {
    pub fn split(path: &str) -> Self {
        let (directory, full_filename) = match path.rfind('/') {
            Some(idx) => (&path[..idx], &path[idx + 1..]),
            None => ("", path),
        };

        // A leading dot marks a hidden file, not a suffix
        let (filename, suffix) = match full_filename.rfind('.') {
            Some(idx) if idx > 0 && idx + 1 < full_filename.len() => (
                &full_filename[..idx],
                Some(full_filename[idx + 1..].to_string()),
            ),
            _ => (full_filename, None),
        };

        Self {
            directory: directory.to_string(),
            full_filename: full_filename.to_string(),
            filename: filename.to_string(),
            suffix,
        }
    }
}

/// Join a directory and a relative path with a single `/`
pub fn join(directory: &str, path: &str) -> String {
    let directory = directory.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    if directory.is_empty() {
        path.to_string()
    } else {
        format!("{}/{}", directory, path)
    }
}

/// Whether `path` is `directory` itself or lies below it
pub fn is_within(path: &str, directory: &str) -> bool {
    let directory = directory.trim_end_matches('/');
    if directory.is_empty() {
        return true;
    }
    path == directory
        || path
            .strip_prefix(directory)
            .is_some_and(|rest| rest.starts_with('/'))
}
