//! Integration tests for the weft-client wiring.

use async_trait::async_trait;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use weft_client::WeftApp;
use weft_common::test_utils::component_fixtures::MESSAGE_COMPONENTS_JSON;
use weft_common::test_utils::locale_fixtures::{EN_JSON, FR_JSON, LANGS_JSON};
use weft_common::{ChannelId, GuildId, MessageId, UserId};
use weft_components::{
    ComponentResult, Components, InteractionRequest, InteractionSink, MessageContext,
    RenderContext,
};
use weft_config::Config;
use weft_i18n::{DirectorySource, I18nManager, JsonFilePreferences, LocaleState, MemoryPreferences, Preferences};

#[derive(Default)]
struct RecordingSink {
    sent: Mutex<Vec<InteractionRequest>>,
}

#[async_trait]
impl InteractionSink for RecordingSink {
    async fn send(&self, request: &InteractionRequest) -> ComponentResult<()> {
        self.sent.lock().unwrap().push(request.clone());
        Ok(())
    }
}

fn write_translations(dir: &Path) {
    fs::write(dir.join("langs.json"), LANGS_JSON).unwrap();
    fs::write(dir.join("en.json"), EN_JSON).unwrap();
    fs::write(dir.join("fr.json"), FR_JSON).unwrap();
}

fn config_for(dir: &TempDir, environment_locale: Option<&str>) -> Config {
    let mut config = Config::default();
    config.i18n.translations_dir = Some(dir.path().to_path_buf());
    config.i18n.preferences_path = dir.path().join("prefs").join("preferences.json");
    config.i18n.environment_locale = environment_locale.map(str::to_string);
    config.session.session_id = "session-1".to_string();
    config
}

fn owner() -> RenderContext {
    RenderContext::channel(Some(GuildId(10)), ChannelId(20)).with_message(MessageContext {
        id: MessageId(30),
        flags: Some(0),
        author_id: UserId(40),
    })
}

#[tokio::test]
async fn test_from_config_starts_in_environment_locale() {
    let dir = TempDir::new().unwrap();
    write_translations(dir.path());
    let config = config_for(&dir, Some("fr_FR.UTF-8"));
    let preferences_path = config.i18n.preferences_path.clone();

    let app = WeftApp::from_config(config).await.unwrap();
    assert_eq!(app.environment_locale().as_deref(), Some("fr_FR"));

    let ready = app.start().await.unwrap();
    assert_eq!(ready.code(), "fr");
    assert!(matches!(app.i18n().state(), LocaleState::Ready { ref code, .. } if code == "fr"));

    let saved: Preferences =
        serde_json::from_str(&fs::read_to_string(&preferences_path).unwrap()).unwrap();
    assert_eq!(saved.locale.as_deref(), Some("fr"));
}

#[tokio::test]
async fn test_render_and_switch_language() {
    let dir = TempDir::new().unwrap();
    write_translations(dir.path());
    let config = config_for(&dir, None);

    let app = WeftApp::from_config(config).await.unwrap();
    assert_eq!(app.start().await.unwrap().code(), "en");

    let components = Components::from_json(MESSAGE_COMPONENTS_JSON, owner()).unwrap();
    let english = app.render(&components).unwrap();
    assert_eq!(
        english.children[3].text.as_deref(),
        Some("Component type 9999 does not exist")
    );

    let outcome = app.set_language("fr").await.unwrap();
    assert!(outcome.is_applied());

    let french = app.render(&components).unwrap();
    assert_eq!(
        french.children[3].text.as_deref(),
        Some("Le type de composant 9999 n'existe pas")
    );
}

#[tokio::test]
async fn test_render_file_and_dispatch() {
    let dir = TempDir::new().unwrap();
    write_translations(dir.path());
    let components_path = dir.path().join("components.json");
    fs::write(&components_path, MESSAGE_COMPONENTS_JSON).unwrap();

    let config = config_for(&dir, None);
    let i18n = I18nManager::new(Arc::new(DirectorySource::new(dir.path())), "en")
        .await
        .unwrap();
    let preferences = Arc::new(MemoryPreferences::new(Preferences {
        locale: Some("fr".to_string()),
        ..Preferences::default()
    }));
    let sink = Arc::new(RecordingSink::default());
    let app = WeftApp::with_parts(config, i18n, preferences.clone(), sink.clone());

    assert_eq!(app.start().await.unwrap().code(), "fr");

    let element = app.render_file(&components_path, owner()).await.unwrap();
    assert_eq!(element.children.len(), 4);

    let components = Components::from_json(MESSAGE_COMPONENTS_JSON, owner()).unwrap();
    let accept = components.find_button("accept").unwrap();
    let request = app
        .dispatcher()
        .click(accept, components.context())
        .await
        .unwrap();
    assert_eq!(request.session_id, "session-1");
    assert_eq!(request.application_id.get(), 40);

    let sent = sink.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].data.custom_id, "accept");
}

#[tokio::test]
async fn test_missing_component_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    write_translations(dir.path());
    let preferences_file = dir.path().join("prefs.json");
    let app = WeftApp::with_parts(
        config_for(&dir, None),
        I18nManager::new(Arc::new(DirectorySource::new(dir.path())), "en")
            .await
            .unwrap(),
        Arc::new(JsonFilePreferences::new(&preferences_file)),
        Arc::new(RecordingSink::default()),
    );
    app.start().await.unwrap();

    let err = app
        .render_file(&dir.path().join("absent.json"), owner())
        .await
        .unwrap_err();
    assert!(matches!(err, weft_client::ClientError::Io(_)));
}

#[tokio::test]
async fn test_reload_config_changes_environment_locale() {
    let dir = TempDir::new().unwrap();
    write_translations(dir.path());
    let app = WeftApp::from_config(config_for(&dir, Some("en_GB"))).await.unwrap();
    assert_eq!(app.environment_locale().as_deref(), Some("en_GB"));

    let path = dir.path().join("weft.yaml");
    fs::write(&path, "i18n:\n  environment_locale: \"fr\"\n").unwrap();
    let reloaded = app.reload_config(&path).unwrap();

    assert_eq!(reloaded.i18n.environment_locale.as_deref(), Some("fr"));
    assert_eq!(app.environment_locale().as_deref(), Some("fr"));
}
