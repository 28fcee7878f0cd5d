use std::path::{Path, PathBuf};

/// Where the mesh bytes come from.
///
/// Built from the host-supplied string: anything starting with `http://`
/// or `https://` is fetched over the network, everything else is treated
/// as a local path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MeshSource {
    Http(String),
    File(PathBuf),
}

impl MeshSource {
    #[must_use]
    pub fn parse(source: &str) -> Self {
        if source.starts_with("http://") || source.starts_with("https://") {
            Self::Http(source.to_string())
        } else {
            Self::File(PathBuf::from(source))
        }
    }

    /// The file-name part of the source, for labels and log lines.
    #[must_use]
    pub fn filename(&self) -> String {
        match self {
            Self::Http(url) => url
                .rsplit('/')
                .next()
                .filter(|s| !s.is_empty())
                .unwrap_or(url)
                .to_string(),
            Self::File(path) => path
                .file_name()
                .and_then(|s| s.to_str())
                .unwrap_or_default()
                .to_string(),
        }
    }
}

impl std::fmt::Display for MeshSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http(url) => write!(f, "{url}"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

impl From<&str> for MeshSource {
    fn from(source: &str) -> Self {
        Self::parse(source)
    }
}

impl From<&Path> for MeshSource {
    fn from(path: &Path) -> Self {
        Self::File(path.to_path_buf())
    }
}
