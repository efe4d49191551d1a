//! Where locale resources come from

use crate::error::{I18nError, I18nResult};
use crate::locale::LocaleCatalog;
use crate::tree::LocaleTree;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// File name of the translations index.
pub const CATALOG_FILE: &str = "langs.json";

/// A store of locale resources addressed by file name
#[async_trait]
pub trait LocaleSource: Send + Sync {
    /// Load the translations index.
    async fn load_catalog(&self) -> I18nResult<LocaleCatalog>;

    /// Load one locale tree (`fr.json`).
    async fn load_tree(&self, file: &str) -> I18nResult<LocaleTree>;
}

/// Reads resources from a local directory
#[derive(Debug, Clone)]
pub struct DirectorySource {
    base_dir: PathBuf,
}

impl DirectorySource {
    /// Serve resources from `base_dir`.
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    /// The directory resources are read from.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    async fn read(&self, file: &str) -> I18nResult<String> {
        let path = self.base_dir.join(file);
        let display = path.to_string_lossy().to_string();

        if Path::new(file).file_name().and_then(|name| name.to_str()) != Some(file) {
            return Err(I18nError::load(
                display,
                io::Error::new(io::ErrorKind::InvalidInput, "resource name must be a plain file name"),
            ));
        }

        debug!("Loading resource file: {:?}", path);
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| I18nError::load(display, e))
    }
}

#[async_trait]
impl LocaleSource for DirectorySource {
    async fn load_catalog(&self) -> I18nResult<LocaleCatalog> {
        let raw = self.read(CATALOG_FILE).await?;
        LocaleCatalog::from_json(&raw).map_err(|source| I18nError::ResourceParse {
            path: CATALOG_FILE.to_string(),
            source,
        })
    }

    async fn load_tree(&self, file: &str) -> I18nResult<LocaleTree> {
        let raw = self.read(file).await?;
        let tree = LocaleTree::from_json(&raw).map_err(|source| I18nError::ResourceParse {
            path: file.to_string(),
            source,
        })?;
        info!("Loaded locale resource {} from {:?}", file, self.base_dir);
        Ok(tree)
    }
}

/// Fetches resources over HTTP relative to a base URL
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpSource {
    /// Fetch resources below `base_url` with a default client.
    pub fn new(base_url: Url, timeout: Duration) -> I18nResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| I18nError::load(base_url.as_str(), e))?;
        Ok(Self::with_client(client, base_url))
    }

    /// Fetch resources below `base_url` with an existing client.
    pub fn with_client(client: reqwest::Client, mut base_url: Url) -> Self {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self { client, base_url }
    }

    /// Base URL, always ending in `/`.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    async fn fetch(&self, file: &str) -> I18nResult<String> {
        let url = self
            .base_url
            .join(file)
            .map_err(|e| I18nError::load(file, e))?;

        debug!("Fetching resource: {}", url);
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| I18nError::load(url.as_str(), e))?;

        response
            .text()
            .await
            .map_err(|e| I18nError::load(url.as_str(), e))
    }
}

#[async_trait]
impl LocaleSource for HttpSource {
    async fn load_catalog(&self) -> I18nResult<LocaleCatalog> {
        let raw = self.fetch(CATALOG_FILE).await?;
        LocaleCatalog::from_json(&raw).map_err(|source| I18nError::ResourceParse {
            path: CATALOG_FILE.to_string(),
            source,
        })
    }

    async fn load_tree(&self, file: &str) -> I18nResult<LocaleTree> {
        let raw = self.fetch(file).await?;
        let tree = LocaleTree::from_json(&raw).map_err(|source| I18nError::ResourceParse {
            path: file.to_string(),
            source,
        })?;
        info!("Fetched locale resource {} from {}", file, self.base_url);
        Ok(tree)
    }
}

/// Serves resources held in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    trees: HashMap<String, LocaleTree>,
    catalog: Option<LocaleCatalog>,
}

impl MemorySource {
    /// An empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tree under `file`.
    #[must_use]
    pub fn with_tree(mut self, file: impl Into<String>, tree: LocaleTree) -> Self {
        self.trees.insert(file.into(), tree);
        self
    }

    /// Use an explicit catalog instead of one derived from the tree names.
    #[must_use]
    pub fn with_catalog(mut self, catalog: LocaleCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }
}

#[async_trait]
impl LocaleSource for MemorySource {
    async fn load_catalog(&self) -> I18nResult<LocaleCatalog> {
        if let Some(catalog) = &self.catalog {
            return Ok(catalog.clone());
        }
        let index: BTreeMap<String, Value> = self
            .trees
            .keys()
            .map(|file| (file.clone(), Value::Null))
            .collect();
        Ok(LocaleCatalog::from_index(index))
    }

    async fn load_tree(&self, file: &str) -> I18nResult<LocaleTree> {
        self.trees.get(file).cloned().ok_or_else(|| {
            I18nError::load(file, io::Error::new(io::ErrorKind::NotFound, "no such resource"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weft_common::test_utils::locale_fixtures::{EN_JSON, FR_JSON, LANGS_JSON};

    #[tokio::test]
    async fn test_directory_source_reads_catalog_and_trees() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CATALOG_FILE), LANGS_JSON).unwrap();
        std::fs::write(dir.path().join("en.json"), EN_JSON).unwrap();
        std::fs::write(dir.path().join("fr.json"), FR_JSON).unwrap();

        let source = DirectorySource::new(dir.path());
        let catalog = source.load_catalog().await.unwrap();
        assert_eq!(catalog.options(), vec!["en", "fr"]);

        let tree = source.load_tree("fr.json").await.unwrap();
        assert_eq!(tree.lookup("greeting"), Some("Bonjour, $1 !"));
    }

    #[tokio::test]
    async fn test_directory_source_errors() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bad.json"), "{ not json").unwrap();
        let source = DirectorySource::new(dir.path());

        assert!(matches!(
            source.load_tree("missing.json").await,
            Err(I18nError::ResourceLoad { .. })
        ));
        assert!(matches!(
            source.load_tree("bad.json").await,
            Err(I18nError::ResourceParse { path, .. }) if path == "bad.json"
        ));
        assert!(matches!(
            source.load_tree("../escape.json").await,
            Err(I18nError::ResourceLoad { .. })
        ));
    }

    #[tokio::test]
    async fn test_memory_source_derives_catalog() {
        let source = MemorySource::new()
            .with_tree("en.json", LocaleTree::from_json(EN_JSON).unwrap())
            .with_tree("fr.json", LocaleTree::from_json(FR_JSON).unwrap());

        let catalog = source.load_catalog().await.unwrap();
        assert_eq!(catalog.options(), vec!["en", "fr"]);
        assert!(source.load_tree("de.json").await.is_err());
    }

    #[test]
    fn test_http_source_base_url_gets_trailing_slash() {
        let source = HttpSource::with_client(
            reqwest::Client::new(),
            Url::parse("http://localhost:8080/translations").unwrap(),
        );
        assert_eq!(source.base_url().as_str(), "http://localhost:8080/translations/");
        assert_eq!(
            source.base_url().join("fr.json").unwrap().as_str(),
            "http://localhost:8080/translations/fr.json"
        );
    }
}
