//! File discovery and destination planning.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::Config;
use crate::error::{PipelineError, PipelineResult};

/// Discovers image files in directories.
pub struct FileDiscovery {
    supported_formats: Vec<String>,
    output_dir: PathBuf,
}

/// Information about a discovered file.
#[derive(Debug, Clone)]
pub struct DiscoveredFile {
    /// Full path to the file
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
}

impl FileDiscovery {
    /// Create a new file discovery instance.
    pub fn new(config: &Config) -> Self {
        Self {
            supported_formats: config
                .processing
                .supported_formats
                .iter()
                .map(|f| f.to_lowercase())
                .collect(),
            output_dir: config.output_dir(),
        }
    }

    /// Discover all supported image files at a path.
    ///
    /// If path is a file, returns it if supported.
    /// If path is a directory, recursively finds all supported files, never
    /// descending into the output directory.
    pub fn discover(&self, path: &Path) -> PipelineResult<Vec<DiscoveredFile>> {
        if !path.exists() {
            return Err(PipelineError::FileNotFound(path.to_path_buf()));
        }

        if path.is_file() {
            if self.is_supported(path) {
                if let Ok(meta) = std::fs::metadata(path) {
                    return Ok(vec![DiscoveredFile {
                        path: path.to_path_buf(),
                        size: meta.len(),
                    }]);
                }
            }
            return Ok(vec![]);
        }

        let output_canonical = self.output_dir.canonicalize().ok();
        let mut files = Vec::new();

        let walker = WalkDir::new(path)
            .follow_links(true)
            .into_iter()
            .filter_entry(|e| {
                let is_output = e.file_type().is_dir()
                    && self.is_output_dir(e.path(), output_canonical.as_deref());
                !is_output
            });

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };
            let entry_path = entry.path();
            if entry.file_type().is_file() && self.is_supported(entry_path) {
                if let Ok(meta) = entry.metadata() {
                    files.push(DiscoveredFile {
                        path: entry_path.to_path_buf(),
                        size: meta.len(),
                    });
                }
            }
        }

        // Sort by path for deterministic ordering
        files.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(files)
    }

    fn is_output_dir(&self, dir: &Path, output_canonical: Option<&Path>) -> bool {
        if dir == self.output_dir {
            return true;
        }
        match (output_canonical, dir.canonicalize()) {
            (Some(output), Ok(dir)) => dir == output,
            _ => false,
        }
    }

    /// Check if a file has a supported extension.
    fn is_supported(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                let ext_lower = ext.to_lowercase();
                self.supported_formats.iter().any(|fmt| *fmt == ext_lower)
            })
            .unwrap_or(false)
    }

    /// Get total size of all discovered files.
    pub fn total_size(files: &[DiscoveredFile]) -> u64 {
        files.iter().map(|f| f.size).sum()
    }
}

/// Maps each source path to a unique destination under the output directory.
///
/// The source's directory relative to the input root is kept, so two
/// `photo.png` files in different subdirectories never collide.
#[derive(Debug, Clone)]
pub struct DestinationPlanner {
    input_root: PathBuf,
    output_dir: PathBuf,
}

impl DestinationPlanner {
    pub fn new(input_root: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_root: input_root.into(),
            output_dir: output_dir.into(),
        }
    }

    /// Planner for an input that may be a single file or a directory.
    pub fn for_input(input: &Path, output_dir: impl Into<PathBuf>) -> Self {
        let root = if input.is_file() {
            input.parent().unwrap_or(Path::new("")).to_path_buf()
        } else {
            input.to_path_buf()
        };
        Self::new(root, output_dir)
    }

    /// `<output>/<relative dir>/<stem>_final.png`
    pub fn destination_for(&self, source: &Path) -> PathBuf {
        self.with_suffix(source, "final", "png")
    }

    /// `<output>/<relative dir>/<stem>_blurred.jpg`
    pub fn blurred_destination_for(&self, source: &Path) -> PathBuf {
        self.with_suffix(source, "blurred", "jpg")
    }

    fn with_suffix(&self, source: &Path, suffix: &str, extension: &str) -> PathBuf {
        let stem = source
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("image");
        let relative_dir = source
            .strip_prefix(&self.input_root)
            .ok()
            .and_then(Path::parent)
            .unwrap_or(Path::new(""));
        self.output_dir
            .join(relative_dir)
            .join(format!("{stem}_{suffix}.{extension}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn discovery_for(output_dir: &Path) -> FileDiscovery {
        let mut config = Config::default();
        config.processing.output_dir = output_dir.to_path_buf();
        FileDiscovery::new(&config)
    }

    #[test]
    fn test_is_supported() {
        let discovery = FileDiscovery::new(&Config::default());

        assert!(discovery.is_supported(Path::new("test.jpg")));
        assert!(discovery.is_supported(Path::new("test.JPG")));
        assert!(discovery.is_supported(Path::new("test.jpeg")));
        assert!(discovery.is_supported(Path::new("test.png")));
        assert!(discovery.is_supported(Path::new("test.webp")));
        assert!(!discovery.is_supported(Path::new("test.txt")));
        assert!(!discovery.is_supported(Path::new("test.gif")));
    }

    #[test]
    fn test_discover_skips_output_dir_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let output = root.join("output");
        std::fs::create_dir_all(root.join("sub")).unwrap();
        std::fs::create_dir_all(&output).unwrap();
        for name in ["b.png", "a.jpg", "sub/c.webp", "notes.txt", "output/a_final.png"] {
            std::fs::write(root.join(name), b"x").unwrap();
        }

        let files = discovery_for(&output).discover(root).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|f| f.path.strip_prefix(root).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            names,
            [
                PathBuf::from("a.jpg"),
                PathBuf::from("b.png"),
                PathBuf::from("sub/c.webp")
            ]
        );
    }

    #[test]
    fn test_discover_missing_root_is_error() {
        let discovery = FileDiscovery::new(&Config::default());
        let err = discovery.discover(Path::new("/no/such/dir")).unwrap_err();
        assert!(matches!(err, PipelineError::FileNotFound(_)));
    }

    #[test]
    fn test_discover_single_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("one.png");
        std::fs::write(&file, b"12345").unwrap();

        let files = FileDiscovery::new(&Config::default()).discover(&file).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].size, 5);
    }

    #[test]
    fn test_total_size() {
        let files = vec![
            DiscoveredFile {
                path: PathBuf::from("a.jpg"),
                size: 100,
            },
            DiscoveredFile {
                path: PathBuf::from("b.jpg"),
                size: 200,
            },
        ];

        assert_eq!(FileDiscovery::total_size(&files), 300);
    }

    #[test]
    fn test_destination_keeps_relative_dirs() {
        let planner = DestinationPlanner::new("images", "images/output");
        assert_eq!(
            planner.destination_for(Path::new("images/cats/photo.jpg")),
            PathBuf::from("images/output/cats/photo_final.png")
        );
        assert_ne!(
            planner.destination_for(Path::new("images/cats/photo.jpg")),
            planner.destination_for(Path::new("images/dogs/photo.jpg"))
        );
    }

    #[test]
    fn test_destination_outside_root_uses_file_name() {
        let planner = DestinationPlanner::new("images", "out");
        assert_eq!(
            planner.destination_for(Path::new("/tmp/x/pic.webp")),
            PathBuf::from("out/pic_final.png")
        );
        assert_eq!(
            planner.blurred_destination_for(Path::new("/tmp/x/pic.webp")),
            PathBuf::from("out/pic_blurred.jpg")
        );
    }
}
