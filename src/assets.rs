//! Asset loading with embedded fallbacks
//!
//! Templates (HTML pages and the chart SVG) and the default config are
//! compiled into the binary. Each can be overridden from the filesystem:
//!
//! - env var NOT set: embedded assets only
//! - env var set, path empty or missing: seed it from the embedded copies, then use it
//! - env var set, path has files: filesystem first, embedded fallback per file

use rust_embed::RustEmbed;
use std::borrow::Cow;
use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(RustEmbed)]
#[folder = "templates/"]
#[include = "*.html"]
#[include = "*.svg"]
struct EmbeddedTemplates;

#[derive(RustEmbed)]
#[folder = "."]
#[include = "config.yaml"]
struct EmbeddedConfig;

const CONFIG_NAME: &str = "config.yaml";

/// Asset category for selective operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetCategory {
    Templates,
    Config,
}

#[derive(Debug, Default)]
pub struct SeedReport {
    pub templates_seeded: Vec<String>,
    pub config_seeded: bool,
}

impl SeedReport {
    pub fn is_empty(&self) -> bool {
        self.templates_seeded.is_empty() && !self.config_seeded
    }
}

/// Report of init (extraction) operations
#[derive(Debug, Default)]
pub struct InitReport {
    pub written: Vec<String>,
    pub skipped: Vec<String>,
}

/// Asset loader with optional filesystem override
#[derive(Debug, Clone, Default)]
pub struct AssetLoader {
    /// External templates directory (TEMPLATES_DIR)
    templates_dir: Option<PathBuf>,
    /// External config file (CONFIG_FILE)
    config_file: Option<PathBuf>,
}

impl AssetLoader {
    /// Paths should be `Some` only if the corresponding env var was set.
    pub fn new(templates_dir: Option<PathBuf>, config_file: Option<PathBuf>) -> Self {
        Self {
            templates_dir,
            config_file,
        }
    }

    /// Build a loader from `TEMPLATES_DIR` and `CONFIG_FILE`.
    pub fn from_env() -> Self {
        Self::new(
            std::env::var("TEMPLATES_DIR").ok().map(PathBuf::from),
            std::env::var("CONFIG_FILE").ok().map(PathBuf::from),
        )
    }

    pub fn templates_dir(&self) -> Option<&Path> {
        self.templates_dir.as_deref()
    }

    pub fn config_file(&self) -> Option<&Path> {
        self.config_file.as_deref()
    }

    /// Read a template by file name (e.g. `result.html`).
    pub fn read_template(&self, name: &str) -> io::Result<Cow<'static, [u8]>> {
        if let Some(ref dir) = self.templates_dir {
            let full_path = dir.join(name);
            if full_path.exists() {
                tracing::trace!(path = %full_path.display(), "Loading template from filesystem");
                return Ok(Cow::Owned(fs::read(&full_path)?));
            }
        }

        EmbeddedTemplates::get(name)
            .map(|f| {
                tracing::trace!(template = name, "Loading template from embedded assets");
                f.data
            })
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("Template not found: {name}"),
                )
            })
    }

    pub fn read_template_string(&self, name: &str) -> io::Result<String> {
        let bytes = self.read_template(name)?;
        String::from_utf8(bytes.into_owned())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Merged, sorted view of embedded and external template names.
    pub fn list_templates(&self) -> Vec<String> {
        let mut files: BTreeSet<String> =
            EmbeddedTemplates::iter().map(|s| s.to_string()).collect();

        if let Some(ref dir) = self.templates_dir {
            if let Ok(entries) = fs::read_dir(dir) {
                for entry in entries.flatten() {
                    if let Some(name) = entry.file_name().to_str() {
                        if name.ends_with(".html") || name.ends_with(".svg") {
                            files.insert(name.to_string());
                        }
                    }
                }
            }
        }

        files.into_iter().collect()
    }

    /// Read the config file, falling back to the embedded default.
    pub fn read_config(&self) -> io::Result<Cow<'static, [u8]>> {
        if let Some(ref path) = self.config_file {
            if path.exists() {
                tracing::trace!(path = %path.display(), "Loading config from filesystem");
                return Ok(Cow::Owned(fs::read(path)?));
            }
        }

        EmbeddedConfig::get(CONFIG_NAME)
            .map(|f| f.data)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "Embedded config.yaml not found"))
    }

    pub fn read_config_string(&self) -> io::Result<String> {
        let bytes = self.read_config()?;
        String::from_utf8(bytes.into_owned())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// True if the directory exists and holds nothing but a `.gitkeep`.
    fn is_empty_dir(path: &Path) -> bool {
        if !path.is_dir() {
            return false;
        }
        path.read_dir()
            .map(|mut entries| {
                entries.all(|e| {
                    e.map(|entry| entry.file_name() == ".gitkeep")
                        .unwrap_or(false)
                })
            })
            .unwrap_or(false)
    }

    /// Seed configured-but-empty locations with the embedded assets.
    pub fn seed_if_configured(&self) -> io::Result<SeedReport> {
        let mut report = SeedReport::default();

        if let Some(ref dir) = self.templates_dir {
            if !dir.exists() || Self::is_empty_dir(dir) {
                fs::create_dir_all(dir)?;
                for file in EmbeddedTemplates::iter() {
                    if let Some(data) = EmbeddedTemplates::get(&file) {
                        fs::write(dir.join(file.as_ref()), &*data.data)?;
                        report.templates_seeded.push(file.to_string());
                    }
                }
                tracing::info!(
                    dir = %dir.display(),
                    count = report.templates_seeded.len(),
                    "Seeded templates directory with embedded assets"
                );
            }
        }

        if let Some(ref path) = self.config_file {
            if !path.exists() {
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent)?;
                }
                if let Some(data) = EmbeddedConfig::get(CONFIG_NAME) {
                    fs::write(path, &*data.data)?;
                    report.config_seeded = true;
                    tracing::info!(path = %path.display(), "Seeded config file with embedded default");
                }
            }
        }

        Ok(report)
    }

    /// Extract embedded assets to the configured paths (or `./templates`,
    /// `./config.yaml`).
    pub fn init(&self, categories: &[AssetCategory], force: bool) -> io::Result<InitReport> {
        let mut report = InitReport::default();

        for category in categories {
            match category {
                AssetCategory::Templates => {
                    let dir = self
                        .templates_dir
                        .clone()
                        .unwrap_or_else(|| PathBuf::from("./templates"));
                    fs::create_dir_all(&dir)?;

                    for file in EmbeddedTemplates::iter() {
                        let path = dir.join(file.as_ref());
                        if !force && path.exists() {
                            report.skipped.push(path.display().to_string());
                            continue;
                        }
                        if let Some(data) = EmbeddedTemplates::get(&file) {
                            fs::write(&path, &*data.data)?;
                            report.written.push(path.display().to_string());
                        }
                    }
                }
                AssetCategory::Config => {
                    let path = self
                        .config_file
                        .clone()
                        .unwrap_or_else(|| PathBuf::from("./config.yaml"));

                    if !force && path.exists() {
                        report.skipped.push(path.display().to_string());
                        continue;
                    }
                    if let Some(parent) = path.parent() {
                        fs::create_dir_all(parent)?;
                    }
                    if let Some(data) = EmbeddedConfig::get(CONFIG_NAME) {
                        fs::write(&path, &*data.data)?;
                        report.written.push(path.display().to_string());
                    }
                }
            }
        }

        Ok(report)
    }

    pub fn list_embedded(category: AssetCategory) -> Vec<String> {
        match category {
            AssetCategory::Templates => EmbeddedTemplates::iter().map(|s| s.to_string()).collect(),
            AssetCategory::Config => vec![CONFIG_NAME.to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_embedded_templates_present() {
        let names = AssetLoader::list_embedded(AssetCategory::Templates);
        for expected in ["index.html", "result.html", "chart.svg"] {
            assert!(names.iter().any(|n| n == expected), "missing {expected}");
        }
    }

    #[test]
    fn test_read_embedded_template() {
        let loader = AssetLoader::default();
        let html = loader.read_template_string("index.html").unwrap();
        assert!(html.contains("<form"));
    }

    #[test]
    fn test_missing_template_is_not_found() {
        let loader = AssetLoader::default();
        let err = loader.read_template("nope.html").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_filesystem_override_wins() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("index.html"), "custom").unwrap();

        let loader = AssetLoader::new(Some(dir.path().to_path_buf()), None);
        assert_eq!(loader.read_template_string("index.html").unwrap(), "custom");
        // Not overridden, still embedded
        assert!(loader
            .read_template_string("chart.svg")
            .unwrap()
            .contains("<svg"));
    }

    #[test]
    fn test_seed_empty_templates_dir() {
        let dir = TempDir::new().unwrap();
        let templates = dir.path().join("templates");
        let config = dir.path().join("conf/config.yaml");

        let loader = AssetLoader::new(Some(templates.clone()), Some(config.clone()));
        let report = loader.seed_if_configured().unwrap();

        assert!(report.config_seeded);
        assert!(config.exists());
        assert!(templates.join("result.html").exists());
        assert_eq!(
            report.templates_seeded.len(),
            AssetLoader::list_embedded(AssetCategory::Templates).len()
        );

        // Second run leaves populated locations alone
        let again = loader.seed_if_configured().unwrap();
        assert!(again.is_empty());
    }

    #[test]
    fn test_init_skips_existing_without_force() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("config.yaml");
        fs::write(&config, "analysis: {}").unwrap();

        let loader = AssetLoader::new(None, Some(config.clone()));
        let report = loader.init(&[AssetCategory::Config], false).unwrap();
        assert_eq!(report.skipped.len(), 1);
        assert!(report.written.is_empty());

        let report = loader.init(&[AssetCategory::Config], true).unwrap();
        assert_eq!(report.written.len(), 1);
        assert!(fs::read_to_string(&config).unwrap().contains("cluster_count"));
    }
}
