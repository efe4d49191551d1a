//! Locale manager
//!
//! Owns the current locale and serializes switches with a generation
//! counter: every switch takes the next generation, and a finished load only
//! commits when its generation is still the newest. The check and the commit
//! happen under one lock that is never held across an `.await`.

use crate::accessor::Messages;
use crate::error::{I18nError, I18nResult};
use crate::locale::{normalize_locale, primary_subtag, LocaleCatalog, Negotiation};
use crate::preferences::PreferenceStore;
use crate::resolver::ResolvedLocale;
use crate::resource::LocaleSource;
use crate::tree::LocaleTree;
use arc_swap::ArcSwapOption;
use parking_lot::{Mutex, RwLock};
use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};
use unic_langid::LanguageIdentifier;

/// A committed locale with its accessor
#[derive(Debug)]
pub struct ReadyLocale {
    generation: u64,
    resolved: Arc<ResolvedLocale>,
    messages: Messages,
}

impl ReadyLocale {
    fn new(generation: u64, resolved: ResolvedLocale) -> Self {
        let resolved = Arc::new(resolved);
        Self {
            generation,
            messages: Messages::new(Arc::clone(&resolved)),
            resolved,
        }
    }

    /// Generation of the switch that committed this locale.
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Locale code.
    pub fn code(&self) -> &str {
        self.resolved.code()
    }

    /// Primary and fallback trees.
    pub fn resolved(&self) -> &ResolvedLocale {
        &self.resolved
    }

    /// Base-tree-shaped accessor.
    pub fn messages(&self) -> &Messages {
        &self.messages
    }
}

/// Where the manager is in its load cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocaleState {
    /// Nothing loaded or loading
    Uninitialized,
    /// A load is in flight
    Loading {
        /// Generation of the newest switch
        generation: u64,
        /// Negotiated code being loaded
        requested: String,
    },
    /// A locale is committed and no newer load is pending
    Ready {
        /// Generation that committed
        generation: u64,
        /// Committed code
        code: String,
    },
}

/// Result of one switch
#[derive(Debug, Clone)]
pub enum SwitchOutcome {
    /// This switch committed
    Applied(Arc<ReadyLocale>),
    /// A newer switch started before this one finished; its result was dropped
    Superseded {
        /// Generation of the dropped load
        generation: u64,
    },
}

impl SwitchOutcome {
    /// Whether the switch committed.
    pub const fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }
}

type RefreshHook = Arc<dyn Fn(&ReadyLocale) + Send + Sync>;

#[derive(Debug)]
struct SwitchState {
    latest: u64,
    state: LocaleState,
}

#[derive(Debug, Clone, Default)]
struct Published {
    ready: Option<Arc<ReadyLocale>>,
    settled: bool,
}

/// Loads locales from a [`LocaleSource`] and tracks the current one
pub struct I18nManager {
    source: Arc<dyn LocaleSource>,
    catalog: LocaleCatalog,
    base_locale: String,
    switch: Mutex<SwitchState>,
    current: ArcSwapOption<ReadyLocale>,
    published: watch::Sender<Published>,
    hooks: RwLock<Vec<RefreshHook>>,
}

impl fmt::Debug for I18nManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("I18nManager")
            .field("base_locale", &self.base_locale)
            .field("catalog", &self.catalog)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl I18nManager {
    /// Create a manager, loading the catalog from `source`.
    ///
    /// Fails with [`I18nError::InvalidLanguageId`] when `base_locale` does not
    /// parse as a language identifier.
    pub async fn new(source: Arc<dyn LocaleSource>, base_locale: impl Into<String>) -> I18nResult<Self> {
        let base_locale = normalize_locale(&base_locale.into());
        if let Err(source) = base_locale.parse::<LanguageIdentifier>() {
            return Err(I18nError::InvalidLanguageId {
                code: base_locale,
                source,
            });
        }

        let catalog = source.load_catalog().await?;
        info!("Loaded locale catalog with {} entries", catalog.options().len());
        Ok(Self::with_catalog(source, catalog, base_locale))
    }

    /// Create a manager with an already known catalog.
    pub fn with_catalog(
        source: Arc<dyn LocaleSource>,
        catalog: LocaleCatalog,
        base_locale: impl Into<String>,
    ) -> Self {
        let (published, _) = watch::channel(Published::default());
        Self {
            source,
            catalog,
            base_locale: base_locale.into(),
            switch: Mutex::new(SwitchState {
                latest: 0,
                state: LocaleState::Uninitialized,
            }),
            current: ArcSwapOption::empty(),
            published,
            hooks: RwLock::new(Vec::new()),
        }
    }

    /// Available locales.
    pub fn catalog(&self) -> &LocaleCatalog {
        &self.catalog
    }

    /// Codes a user may pick.
    pub fn options(&self) -> Vec<&str> {
        self.catalog.options()
    }

    /// Language used as fallback for every other locale.
    pub fn base_locale(&self) -> &str {
        &self.base_locale
    }

    /// Snapshot of the load cycle.
    pub fn state(&self) -> LocaleState {
        self.switch.lock().state.clone()
    }

    /// The committed locale, if any.
    pub fn current(&self) -> Option<Arc<ReadyLocale>> {
        self.current.load_full()
    }

    /// The committed locale, or [`I18nError::NotReady`].
    pub fn require_ready(&self) -> I18nResult<Arc<ReadyLocale>> {
        self.current().ok_or(I18nError::NotReady)
    }

    /// Resolve `key` in the committed locale.
    pub fn resolve(&self, key: &str, args: &[&str]) -> I18nResult<String> {
        self.require_ready()?.resolved().resolve(key, args)
    }

    /// Accessor for the committed locale.
    pub fn messages(&self) -> I18nResult<Messages> {
        Ok(self.require_ready()?.messages().clone())
    }

    /// Wait until no switch is pending and return the committed locale.
    ///
    /// Waiters of a superseded switch observe the newer result. Fails with
    /// [`I18nError::NotReady`] when the newest load failed and nothing was
    /// ever committed.
    pub async fn wait_ready(&self) -> I18nResult<Arc<ReadyLocale>> {
        let mut rx = self.published.subscribe();
        loop {
            {
                let published = rx.borrow_and_update();
                if published.settled {
                    return published.ready.clone().ok_or(I18nError::NotReady);
                }
            }
            rx.changed().await.map_err(|_| I18nError::NotReady)?;
        }
    }

    /// Run `hook` after every commit.
    pub fn on_refresh<F>(&self, hook: F)
    where
        F: Fn(&ReadyLocale) + Send + Sync + 'static,
    {
        self.hooks.write().push(Arc::new(hook));
    }

    /// Negotiate `requested` against the catalog, load it, and commit it
    /// unless a newer switch started meanwhile.
    pub async fn switch_locale(&self, requested: &str) -> I18nResult<SwitchOutcome> {
        let negotiated = self.catalog.negotiate(requested, &self.base_locale);
        if negotiated.negotiation == Negotiation::Substituted {
            debug!("Substituted base language for {}", requested);
        }

        let generation = self.begin(&negotiated.code);
        debug!("Loading locale {} (generation {})", negotiated.code, generation);

        match self.load(&negotiated.code).await {
            Ok(resolved) => Ok(self.commit(generation, resolved)),
            Err(e) => {
                self.abandon(generation);
                Err(e)
            }
        }
    }

    /// Explicit user choice: only offered codes are accepted, and an applied
    /// switch is saved to `preferences`.
    pub async fn set_language(
        &self,
        code: &str,
        preferences: &dyn PreferenceStore,
    ) -> I18nResult<SwitchOutcome> {
        let code = normalize_locale(code);
        self.catalog.require(&code)?;

        let outcome = self.switch_locale(&code).await?;
        if outcome.is_applied() {
            let mut stored = preferences.get().await?;
            stored.locale = Some(code);
            preferences.set(&stored).await?;
        }
        Ok(outcome)
    }

    /// Pick the startup locale and switch to it.
    ///
    /// A stored preference wins. Otherwise the environment locale's language
    /// subtag is used when offered, else the base language, and the choice is
    /// stored.
    pub async fn startup(
        &self,
        environment_locale: Option<&str>,
        preferences: &dyn PreferenceStore,
    ) -> I18nResult<SwitchOutcome> {
        let mut stored = preferences.get().await?;

        let code = match stored.locale.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
            Some(code) => {
                debug!("Using stored locale preference {}", code);
                code.to_string()
            }
            None => {
                let code = self.environment_choice(environment_locale);
                stored.locale = Some(code.clone());
                preferences.set(&stored).await?;
                code
            }
        };

        info!("Starting with locale {}", code);
        self.switch_locale(&code).await
    }

    fn environment_choice(&self, environment_locale: Option<&str>) -> String {
        environment_locale
            .map(primary_subtag)
            .filter(|code| self.catalog.contains(code))
            .unwrap_or_else(|| self.base_locale.clone())
    }

    fn begin(&self, code: &str) -> u64 {
        let mut switch = self.switch.lock();
        switch.latest += 1;
        switch.state = LocaleState::Loading {
            generation: switch.latest,
            requested: code.to_string(),
        };
        self.published.send_modify(|published| published.settled = false);
        switch.latest
    }

    async fn load(&self, code: &str) -> I18nResult<ResolvedLocale> {
        let file = self.catalog.file_for(code);

        if code == self.base_locale {
            let tree = self.source.load_tree(&file).await?;
            check_metadata(&tree, code);
            return Ok(ResolvedLocale::new(code, Arc::new(tree), None));
        }

        let base_file = self.catalog.file_for(&self.base_locale);
        let (primary, fallback) = tokio::try_join!(
            self.source.load_tree(&file),
            self.source.load_tree(&base_file)
        )?;
        check_metadata(&primary, code);

        Ok(ResolvedLocale::new(code, Arc::new(primary), Some(Arc::new(fallback))))
    }

    fn commit(&self, generation: u64, resolved: ResolvedLocale) -> SwitchOutcome {
        let ready = Arc::new(ReadyLocale::new(generation, resolved));

        {
            let mut switch = self.switch.lock();
            if switch.latest != generation {
                debug!(
                    "Dropping locale {} from generation {}, newest is {}",
                    ready.code(),
                    generation,
                    switch.latest
                );
                return SwitchOutcome::Superseded { generation };
            }

            switch.state = LocaleState::Ready {
                generation,
                code: ready.code().to_string(),
            };
            self.current.store(Some(Arc::clone(&ready)));
            self.published.send_replace(Published {
                ready: Some(Arc::clone(&ready)),
                settled: true,
            });
        }

        info!("Switched locale to {} (generation {})", ready.code(), generation);

        let hooks: Vec<RefreshHook> = self.hooks.read().clone();
        for hook in hooks {
            hook(&ready);
        }

        SwitchOutcome::Applied(ready)
    }

    fn abandon(&self, generation: u64) {
        let mut switch = self.switch.lock();
        if switch.latest != generation {
            return;
        }

        warn!("Locale load for generation {} failed", generation);
        switch.state = self.current.load_full().map_or(LocaleState::Uninitialized, |ready| {
            LocaleState::Ready {
                generation: ready.generation(),
                code: ready.code().to_string(),
            }
        });
        self.published.send_modify(|published| published.settled = true);
    }
}

fn check_metadata(tree: &LocaleTree, code: &str) {
    if let Some(declared) = tree.metadata_locale() {
        if declared != code {
            warn!("Resource for {} declares locale {}", code, declared);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preferences::{MemoryPreferences, MockPreferenceStore, Preferences};
    use crate::resource::MemorySource;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;
    use weft_common::test_utils::locale_fixtures::{EN_JSON, FR_JSON};

    fn manager() -> I18nManager {
        let source = MemorySource::new()
            .with_tree("en.json", LocaleTree::from_json(EN_JSON).unwrap())
            .with_tree("fr.json", LocaleTree::from_json(FR_JSON).unwrap());
        I18nManager::with_catalog(
            Arc::new(source),
            LocaleCatalog::from_codes(["en", "fr"]),
            "en",
        )
    }

    /// Holds `fr.json` until the gate opens.
    struct SlowFrench {
        inner: MemorySource,
        gate: Arc<Notify>,
    }

    #[async_trait]
    impl LocaleSource for SlowFrench {
        async fn load_catalog(&self) -> I18nResult<LocaleCatalog> {
            self.inner.load_catalog().await
        }

        async fn load_tree(&self, file: &str) -> I18nResult<LocaleTree> {
            if file == "fr.json" {
                self.gate.notified().await;
            }
            self.inner.load_tree(file).await
        }
    }

    fn stored(locale: Option<&str>) -> Preferences {
        Preferences {
            locale: locale.map(str::to_string),
            ..Preferences::default()
        }
    }

    #[tokio::test]
    async fn test_new_rejects_invalid_base_language() {
        let source = Arc::new(MemorySource::new());
        let err = I18nManager::new(source, "not a locale!").await.unwrap_err();
        assert!(matches!(err, I18nError::InvalidLanguageId { ref code, .. } if code == "not a locale!"));

        let source = MemorySource::new().with_tree("en.json", LocaleTree::from_json(EN_JSON).unwrap());
        let manager = I18nManager::new(Arc::new(source), "en_US").await.unwrap();
        assert_eq!(manager.base_locale(), "en-US");
    }

    #[tokio::test]
    async fn test_uninitialized_until_first_switch() {
        let manager = manager();
        assert_eq!(manager.state(), LocaleState::Uninitialized);
        assert!(matches!(manager.resolve("greeting", &[]), Err(I18nError::NotReady)));
    }

    #[tokio::test]
    async fn test_switch_commits_with_fallback() {
        let manager = manager();
        let outcome = manager.switch_locale("fr-CA").await.unwrap();

        let SwitchOutcome::Applied(ready) = outcome else {
            panic!("switch should apply");
        };
        assert_eq!(ready.code(), "fr");
        assert!(ready.resolved().fallback().is_some());
        assert_eq!(
            manager.state(),
            LocaleState::Ready {
                generation: 1,
                code: "fr".to_string()
            }
        );
        assert_eq!(manager.resolve("greeting", &["Ada"]).unwrap(), "Bonjour, Ada !");
        assert_eq!(manager.resolve("onlyEnglish", &[]).unwrap(), "Only in English");
    }

    #[tokio::test]
    async fn test_base_locale_has_no_fallback() {
        let manager = manager();
        manager.switch_locale("en").await.unwrap();
        assert!(manager.require_ready().unwrap().resolved().fallback().is_none());
    }

    #[tokio::test]
    async fn test_unknown_code_substitutes_base() {
        let manager = manager();
        manager.switch_locale("de-DE").await.unwrap();
        assert_eq!(manager.require_ready().unwrap().code(), "en");
    }

    #[tokio::test]
    async fn test_failed_load_restores_previous_locale() {
        let source = MemorySource::new().with_tree("en.json", LocaleTree::from_json(EN_JSON).unwrap());
        let manager = I18nManager::with_catalog(
            Arc::new(source),
            LocaleCatalog::from_codes(["en", "fr"]),
            "en",
        );

        manager.switch_locale("en").await.unwrap();
        assert!(manager.switch_locale("fr").await.is_err());

        assert_eq!(
            manager.state(),
            LocaleState::Ready {
                generation: 1,
                code: "en".to_string()
            }
        );
        assert_eq!(manager.wait_ready().await.unwrap().code(), "en");
    }

    #[tokio::test]
    async fn test_failed_first_load_wakes_waiters_with_not_ready() {
        let manager = I18nManager::with_catalog(
            Arc::new(MemorySource::new()),
            LocaleCatalog::from_codes(["en"]),
            "en",
        );
        assert!(manager.switch_locale("en").await.is_err());
        assert_eq!(manager.state(), LocaleState::Uninitialized);
        assert!(matches!(manager.wait_ready().await, Err(I18nError::NotReady)));
    }

    #[tokio::test]
    async fn test_refresh_hooks_run_on_commit() {
        let manager = manager();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        manager.on_refresh(move |ready| {
            assert!(!ready.messages().table().is_empty());
            counter.fetch_add(1, Ordering::SeqCst);
        });

        manager.switch_locale("en").await.unwrap();
        manager.switch_locale("fr").await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_startup_prefers_stored_locale() {
        let manager = manager();
        let prefs = MemoryPreferences::new(Preferences {
            locale: Some("fr".to_string()),
            ..Preferences::default()
        });

        manager.startup(Some("en-US"), &prefs).await.unwrap();
        assert_eq!(manager.require_ready().unwrap().code(), "fr");
    }

    #[tokio::test]
    async fn test_startup_negotiates_and_stores() {
        let manager = manager();
        let prefs = MemoryPreferences::default();

        manager.startup(Some("fr_BE.UTF-8"), &prefs).await.unwrap();
        assert_eq!(manager.require_ready().unwrap().code(), "fr");
        assert_eq!(prefs.snapshot().locale.as_deref(), Some("fr"));

        let manager = self::manager();
        let prefs = MemoryPreferences::default();
        manager.startup(Some("ja-JP"), &prefs).await.unwrap();
        assert_eq!(prefs.snapshot().locale.as_deref(), Some("en"));
    }

    #[tokio::test]
    async fn test_set_language_rejects_unknown_codes() {
        let manager = manager();
        let prefs = MemoryPreferences::default();

        let err = manager.set_language("de", &prefs).await.unwrap_err();
        assert!(matches!(err, I18nError::UnknownLocale { code } if code == "de"));
        assert_eq!(prefs.snapshot().locale, None);

        manager.set_language("fr", &prefs).await.unwrap();
        assert_eq!(prefs.snapshot().locale.as_deref(), Some("fr"));
    }

    #[tokio::test]
    async fn test_startup_with_stored_locale_does_not_write() {
        let manager = manager();
        let mut prefs = MockPreferenceStore::new();
        prefs.expect_get().times(1).returning(|| Ok(stored(Some("fr"))));
        prefs.expect_set().times(0);

        manager.startup(Some("en-US"), &prefs).await.unwrap();
        assert_eq!(manager.require_ready().unwrap().code(), "fr");
    }

    #[tokio::test]
    async fn test_startup_writes_negotiated_code_once() {
        let manager = manager();
        let mut prefs = MockPreferenceStore::new();
        prefs.expect_get().times(1).returning(|| Ok(stored(None)));
        prefs
            .expect_set()
            .withf(|p: &Preferences| p.locale.as_deref() == Some("fr"))
            .times(1)
            .returning(|_| Ok(()));

        manager.startup(Some("fr_CA.UTF-8"), &prefs).await.unwrap();
        assert_eq!(manager.require_ready().unwrap().code(), "fr");
    }

    #[tokio::test]
    async fn test_superseded_set_language_does_not_write() {
        let gate = Arc::new(Notify::new());
        let source = SlowFrench {
            inner: MemorySource::new()
                .with_tree("en.json", LocaleTree::from_json(EN_JSON).unwrap())
                .with_tree("fr.json", LocaleTree::from_json(FR_JSON).unwrap()),
            gate: Arc::clone(&gate),
        };
        let manager = I18nManager::with_catalog(
            Arc::new(source),
            LocaleCatalog::from_codes(["en", "fr"]),
            "en",
        );
        let mut prefs = MockPreferenceStore::new();
        prefs.expect_get().times(0);
        prefs.expect_set().times(0);

        let (french, english) = tokio::join!(manager.set_language("fr", &prefs), async {
            let outcome = manager.switch_locale("en").await;
            gate.notify_one();
            outcome
        });

        assert!(english.unwrap().is_applied());
        assert!(matches!(french.unwrap(), SwitchOutcome::Superseded { generation: 1 }));
        assert_eq!(manager.require_ready().unwrap().code(), "en");
    }
}
