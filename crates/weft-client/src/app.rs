//! Wiring configuration, localization, and components together.

use crate::error::{ClientError, ClientResult};
use std::env;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use url::Url;
use weft_components::{
    Components, Element, HttpInteractionSink, InteractionDispatcher, InteractionSink, Render,
    RenderContext, RenderEnv,
};
use weft_config::{Config, ConfigCache};
use weft_i18n::{
    DirectorySource, HttpSource, I18nManager, JsonFilePreferences, LocaleSource, PreferenceStore,
    ReadyLocale, SwitchOutcome,
};

/// Variable consulted for the environment locale when the configuration has none.
const LANG_VAR: &str = "LANG";

fn parse_url(raw: &str) -> ClientResult<Url> {
    Url::parse(raw).map_err(|source| ClientError::InvalidUrl {
        url: raw.to_string(),
        source,
    })
}

/// A running client core.
pub struct WeftApp {
    config: ConfigCache,
    i18n: Arc<I18nManager>,
    preferences: Arc<dyn PreferenceStore>,
    dispatcher: InteractionDispatcher,
}

impl WeftApp {
    /// Build every collaborator from `config`: a directory or HTTP locale
    /// source, the JSON preference file, and the HTTP interaction sink.
    pub async fn from_config(config: Config) -> ClientResult<Self> {
        let timeout = Duration::from_secs(config.api.request_timeout_seconds);

        let source: Arc<dyn LocaleSource> = match &config.i18n.translations_dir {
            Some(dir) => Arc::new(DirectorySource::new(dir)),
            None => Arc::new(HttpSource::new(parse_url(&config.i18n.translations_url)?, timeout)?),
        };
        let i18n = I18nManager::new(source, config.i18n.base_locale.clone()).await?;

        let preferences = Arc::new(JsonFilePreferences::new(&config.i18n.preferences_path));

        let token = Some(config.session.token.clone()).filter(|t| !t.is_empty());
        let sink = Arc::new(HttpInteractionSink::new(
            &parse_url(&config.api.url)?,
            token,
            timeout,
        )?);

        Ok(Self::with_parts(config, i18n, preferences, sink))
    }

    /// Assemble an app from prepared collaborators.
    pub fn with_parts(
        config: Config,
        i18n: I18nManager,
        preferences: Arc<dyn PreferenceStore>,
        sink: Arc<dyn InteractionSink>,
    ) -> Self {
        let dispatcher = InteractionDispatcher::new(sink, config.session.session_id.clone());
        Self {
            config: ConfigCache::new(config),
            i18n: Arc::new(i18n),
            preferences,
            dispatcher,
        }
    }

    /// Snapshot of the effective configuration.
    pub fn config(&self) -> Arc<Config> {
        self.config.snapshot()
    }

    /// Reload configuration from `path`.
    ///
    /// Settings read per call, such as the environment locale, follow the new
    /// file. Collaborators built at startup keep their values.
    pub fn reload_config(&self, path: &Path) -> ClientResult<Arc<Config>> {
        Ok(self.config.reload(path)?)
    }

    /// Locale manager.
    pub fn i18n(&self) -> &Arc<I18nManager> {
        &self.i18n
    }

    /// Interaction dispatcher for this session.
    pub const fn dispatcher(&self) -> &InteractionDispatcher {
        &self.dispatcher
    }

    /// Locale reported by the environment.
    pub fn environment_locale(&self) -> Option<String> {
        self.config
            .snapshot()
            .i18n
            .environment_locale
            .clone()
            .or_else(|| env::var(LANG_VAR).ok())
            .map(|lang| lang.split('.').next().unwrap_or_default().to_string())
            .filter(|lang| !lang.is_empty() && lang != "C" && lang != "POSIX")
    }

    /// Negotiate and load the startup locale, then wait until it is committed.
    pub async fn start(&self) -> ClientResult<Arc<ReadyLocale>> {
        let environment = self.environment_locale();
        self.i18n
            .startup(environment.as_deref(), self.preferences.as_ref())
            .await?;
        let ready = self.i18n.wait_ready().await?;
        info!("Weft ready in {}", ready.code());
        Ok(ready)
    }

    /// Explicit language change from the user.
    pub async fn set_language(&self, code: &str) -> ClientResult<SwitchOutcome> {
        Ok(self.i18n.set_language(code, self.preferences.as_ref()).await?)
    }

    /// Render decoded components in the current locale.
    pub fn render(&self, components: &Components) -> ClientResult<Element> {
        let messages = self.i18n.messages()?;
        Ok(components.render(&RenderEnv::new(&messages)))
    }

    /// Decode a component JSON file for `owner` and render it.
    pub async fn render_file(&self, path: &Path, owner: RenderContext) -> ClientResult<Element> {
        let raw = tokio::fs::read_to_string(path).await?;
        let components = Components::from_json(&raw, owner)?;
        info!("Decoded {} components from {}", components.len(), path.display());
        self.render(&components)
    }
}
