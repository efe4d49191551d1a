//! Outbound interactions fired by buttons and selects

use crate::context::RenderContext;
use crate::error::{ComponentError, ComponentResult};
use crate::node::{Button, ButtonAction, Select};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;
use weft_common::{random_nonce, ApplicationId, ChannelId, GuildId, MessageId};

/// Interaction type for components on a message.
pub const MESSAGE_COMPONENT_INTERACTION: u8 = 3;
/// Interaction type for components owned by a channel.
pub const CHANNEL_COMPONENT_INTERACTION: u8 = 5;
/// `data.component_type` of buttons.
pub const BUTTON_COMPONENT_TYPE: u8 = 2;
/// `data.component_type` of string selects.
pub const SELECT_COMPONENT_TYPE: u8 = 3;

/// `data` of an interaction request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionData {
    /// 2 for buttons, 3 for selects
    pub component_type: u8,
    /// Custom id of the activated component
    pub custom_id: String,
    /// Chosen values, selects only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<String>>,
}

/// Body of `POST /interactions`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionRequest {
    /// 3 with a message, 5 without
    #[serde(rename = "type")]
    pub kind: u8,
    /// Correlates the request with the gateway acknowledgement
    pub nonce: String,
    /// Guild, null in direct messages
    pub guild_id: Option<GuildId>,
    /// Channel
    pub channel_id: ChannelId,
    /// Owning message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<MessageId>,
    /// Owning message's flags
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_flags: Option<u64>,
    /// Receiving application
    pub application_id: ApplicationId,
    /// Gateway session
    pub session_id: String,
    /// Component payload
    pub data: InteractionData,
}

impl InteractionRequest {
    fn new(
        ctx: &RenderContext,
        session_id: &str,
        nonce: String,
        data: InteractionData,
    ) -> ComponentResult<Self> {
        let application_id = ctx.application().ok_or(ComponentError::MissingApplication)?;
        let kind = if ctx.message.is_some() {
            MESSAGE_COMPONENT_INTERACTION
        } else {
            CHANNEL_COMPONENT_INTERACTION
        };

        Ok(Self {
            kind,
            nonce,
            guild_id: ctx.guild_id,
            channel_id: ctx.channel_id,
            message_id: ctx.message.as_ref().map(|m| m.id),
            message_flags: ctx.message.as_ref().and_then(|m| m.flags),
            application_id,
            session_id: session_id.to_string(),
            data,
        })
    }

    /// Request for a button click. Disabled and link buttons send nothing.
    pub fn for_button(
        button: &Button,
        ctx: &RenderContext,
        session_id: &str,
        nonce: String,
    ) -> ComponentResult<Self> {
        let custom_id = match button.action() {
            ButtonAction::Interact(custom_id) => custom_id,
            ButtonAction::OpenLink(url) => {
                return Err(ComponentError::LinkButton {
                    url: url.to_string(),
                })
            }
            ButtonAction::Disabled => {
                return Err(ComponentError::Disabled {
                    custom_id: button.custom_id.clone().unwrap_or_default(),
                })
            }
        };

        let data = InteractionData {
            component_type: BUTTON_COMPONENT_TYPE,
            custom_id: custom_id.to_string(),
            values: None,
        };
        Self::new(ctx, session_id, nonce, data)
    }

    /// Request for a select submission after checking `values` against the
    /// select's options and bounds.
    pub fn for_select(
        select: &Select,
        ctx: &RenderContext,
        session_id: &str,
        nonce: String,
        values: Vec<String>,
    ) -> ComponentResult<Self> {
        validate_selection(select, &values)?;

        let data = InteractionData {
            component_type: SELECT_COMPONENT_TYPE,
            custom_id: select.custom_id.clone(),
            values: Some(values),
        };
        Self::new(ctx, session_id, nonce, data)
    }
}

fn validate_selection(select: &Select, values: &[String]) -> ComponentResult<()> {
    if select.disabled {
        return Err(ComponentError::Disabled {
            custom_id: select.custom_id.clone(),
        });
    }

    let count = values.len();
    if count < select.min_values as usize || count > select.max_values as usize {
        return Err(ComponentError::invalid_selection(
            &select.custom_id,
            format!(
                "{count} values chosen, expected {} to {}",
                select.min_values, select.max_values
            ),
        ));
    }

    let mut seen = HashSet::new();
    for value in values {
        if !select.options.iter().any(|option| &option.value == value) {
            return Err(ComponentError::invalid_selection(
                &select.custom_id,
                format!("unknown value {value:?}"),
            ));
        }
        if !seen.insert(value.as_str()) {
            return Err(ComponentError::invalid_selection(
                &select.custom_id,
                format!("duplicate value {value:?}"),
            ));
        }
    }
    Ok(())
}

/// Unacknowledged nonces kept per dispatcher before the oldest are dropped.
pub const MAX_PENDING_NONCES: usize = 256;

#[derive(Debug, Default)]
struct Pending {
    by_nonce: HashMap<String, MessageId>,
    order: VecDeque<String>,
}

/// Pending nonces and the messages they were fired from
///
/// The gateway event acknowledging an interaction carries its nonce; its
/// handler calls [`NonceTracker::take`]. Nonces that are never acknowledged
/// are evicted oldest first once `capacity` is reached.
#[derive(Debug)]
pub struct NonceTracker {
    pending: Mutex<Pending>,
    capacity: usize,
}

impl Default for NonceTracker {
    fn default() -> Self {
        Self::with_capacity(MAX_PENDING_NONCES)
    }
}

impl NonceTracker {
    /// An empty tracker holding at most [`MAX_PENDING_NONCES`].
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty tracker holding at most `capacity` nonces (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            pending: Mutex::new(Pending::default()),
            capacity: capacity.max(1),
        }
    }

    /// Remember that `nonce` was fired from `message_id`.
    pub fn register(&self, nonce: &str, message_id: MessageId) {
        let mut pending = self.pending.lock();
        if pending.by_nonce.insert(nonce.to_string(), message_id).is_none() {
            pending.order.push_back(nonce.to_string());
        }
        while pending.by_nonce.len() > self.capacity {
            let Some(oldest) = pending.order.pop_front() else {
                break;
            };
            pending.by_nonce.remove(&oldest);
            debug!("Dropped unacknowledged nonce {}", oldest);
        }
    }

    /// Resolve an acknowledged nonce to its message, forgetting it.
    pub fn take(&self, nonce: &str) -> Option<MessageId> {
        let mut pending = self.pending.lock();
        let message_id = pending.by_nonce.remove(nonce)?;
        pending.order.retain(|n| n != nonce);
        Some(message_id)
    }

    /// Number of unacknowledged nonces.
    pub fn len(&self) -> usize {
        self.pending.lock().by_nonce.len()
    }

    /// Whether nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.pending.lock().by_nonce.is_empty()
    }
}

/// Delivers interaction requests
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InteractionSink: Send + Sync {
    /// Send one request; success means the API accepted it.
    async fn send(&self, request: &InteractionRequest) -> ComponentResult<()>;
}

/// Posts interactions to `{api}/interactions`
#[derive(Debug, Clone)]
pub struct HttpInteractionSink {
    client: reqwest::Client,
    endpoint: Url,
    token: Option<String>,
}

impl HttpInteractionSink {
    /// Build a sink for the API at `api_base`.
    pub fn new(api_base: &Url, token: Option<String>, timeout: Duration) -> ComponentResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Self::with_client(client, api_base, token)
    }

    /// Build a sink around an existing client.
    pub fn with_client(
        client: reqwest::Client,
        api_base: &Url,
        token: Option<String>,
    ) -> ComponentResult<Self> {
        let mut endpoint = api_base.clone();
        endpoint
            .path_segments_mut()
            .map_err(|()| ComponentError::InvalidEndpoint {
                url: api_base.to_string(),
            })?
            .pop_if_empty()
            .push("interactions");
        Ok(Self {
            client,
            endpoint,
            token,
        })
    }

    /// Target URL.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl InteractionSink for HttpInteractionSink {
    async fn send(&self, request: &InteractionRequest) -> ComponentResult<()> {
        let mut builder = self.client.post(self.endpoint.clone()).json(request);
        if let Some(token) = &self.token {
            builder = builder.header(reqwest::header::AUTHORIZATION, token);
        }

        builder.send().await?.error_for_status()?;
        debug!("Interaction {} accepted", request.nonce);
        Ok(())
    }
}

/// Builds, tracks, and sends interactions for one gateway session
pub struct InteractionDispatcher {
    sink: Arc<dyn InteractionSink>,
    nonces: NonceTracker,
    session_id: String,
}

impl InteractionDispatcher {
    /// Dispatch through `sink` on behalf of `session_id`.
    pub fn new(sink: Arc<dyn InteractionSink>, session_id: impl Into<String>) -> Self {
        Self {
            sink,
            nonces: NonceTracker::new(),
            session_id: session_id.into(),
        }
    }

    /// Nonces awaiting acknowledgement.
    pub const fn nonces(&self) -> &NonceTracker {
        &self.nonces
    }

    /// Fire a button.
    pub async fn click(
        &self,
        button: &Button,
        ctx: &RenderContext,
    ) -> ComponentResult<InteractionRequest> {
        let request =
            InteractionRequest::for_button(button, ctx, &self.session_id, random_nonce())?;
        self.dispatch(request).await
    }

    /// Submit a select.
    pub async fn submit(
        &self,
        select: &Select,
        ctx: &RenderContext,
        values: Vec<String>,
    ) -> ComponentResult<InteractionRequest> {
        let request =
            InteractionRequest::for_select(select, ctx, &self.session_id, random_nonce(), values)?;
        self.dispatch(request).await
    }

    async fn dispatch(&self, request: InteractionRequest) -> ComponentResult<InteractionRequest> {
        if let Some(message_id) = request.message_id {
            self.nonces.register(&request.nonce, message_id);
        }

        info!(
            "Sending interaction {} for {} in channel {}",
            request.nonce, request.data.custom_id, request.channel_id
        );
        if let Err(e) = self.sink.send(&request).await {
            warn!("Interaction {} failed: {}", request.nonce, e);
            self.nonces.take(&request.nonce);
            return Err(e);
        }
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::MessageContext;
    use crate::node::{ButtonStyle, SelectOption};
    use weft_common::UserId;

    fn on_message() -> RenderContext {
        RenderContext::channel(Some(GuildId(10)), ChannelId(20)).with_message(MessageContext {
            id: MessageId(30),
            flags: Some(32768),
            author_id: UserId(40),
        })
    }

    fn button(custom_id: &str) -> Button {
        Button {
            custom_id: Some(custom_id.to_string()),
            label: Some("Go".to_string()),
            url: None,
            style: ButtonStyle::Primary,
            disabled: false,
        }
    }

    fn select() -> Select {
        Select {
            custom_id: "colour".to_string(),
            placeholder: None,
            options: ["red", "green", "blue"]
                .into_iter()
                .map(|value| SelectOption {
                    label: value.to_uppercase(),
                    value: value.to_string(),
                    description: None,
                    default: false,
                })
                .collect(),
            min_values: 1,
            max_values: 2,
            disabled: false,
        }
    }

    #[test]
    fn test_button_payload_on_message() {
        let request = InteractionRequest::for_button(
            &button("go"),
            &on_message(),
            "session",
            "123".to_string(),
        )
        .unwrap();
        let body = serde_json::to_value(&request).unwrap();

        assert_eq!(
            body,
            serde_json::json!({
                "type": 3,
                "nonce": "123",
                "guild_id": "10",
                "channel_id": "20",
                "message_id": "30",
                "message_flags": 32768,
                "application_id": "40",
                "session_id": "session",
                "data": { "component_type": 2, "custom_id": "go" }
            })
        );
    }

    #[test]
    fn test_channel_owned_select_payload() {
        let ctx = RenderContext::channel(None, ChannelId(20)).with_application(ApplicationId(7));
        let request = InteractionRequest::for_select(
            &select(),
            &ctx,
            "session",
            "1".to_string(),
            vec!["red".to_string(), "blue".to_string()],
        )
        .unwrap();

        assert_eq!(request.kind, CHANNEL_COMPONENT_INTERACTION);
        assert_eq!(request.message_id, None);
        assert_eq!(request.data.component_type, SELECT_COMPONENT_TYPE);
        assert_eq!(request.data.values, Some(vec!["red".to_string(), "blue".to_string()]));

        let body = serde_json::to_value(&request).unwrap();
        assert!(body.get("message_id").is_none());
        assert_eq!(body["guild_id"], serde_json::Value::Null);
    }

    #[test]
    fn test_selection_validation() {
        let ctx = on_message();
        let submit = |values: &[&str]| {
            InteractionRequest::for_select(
                &select(),
                &ctx,
                "s",
                "1".to_string(),
                values.iter().map(|v| (*v).to_string()).collect(),
            )
        };

        assert!(submit(&["red"]).is_ok());
        assert!(matches!(submit(&[]), Err(ComponentError::InvalidSelection { .. })));
        assert!(matches!(
            submit(&["red", "green", "blue"]),
            Err(ComponentError::InvalidSelection { .. })
        ));
        assert!(matches!(submit(&["purple"]), Err(ComponentError::InvalidSelection { .. })));
        assert!(matches!(submit(&["red", "red"]), Err(ComponentError::InvalidSelection { .. })));
    }

    #[test]
    fn test_inert_buttons_and_missing_application() {
        let ctx = on_message();
        let mut disabled = button("x");
        disabled.disabled = true;
        assert!(matches!(
            InteractionRequest::for_button(&disabled, &ctx, "s", "1".to_string()),
            Err(ComponentError::Disabled { custom_id }) if custom_id == "x"
        ));

        let mut link = button("x");
        link.url = Some("https://docs.example".to_string());
        assert!(matches!(
            InteractionRequest::for_button(&link, &ctx, "s", "1".to_string()),
            Err(ComponentError::LinkButton { .. })
        ));

        let orphan = RenderContext::channel(None, ChannelId(1));
        assert!(matches!(
            InteractionRequest::for_button(&button("x"), &orphan, "s", "1".to_string()),
            Err(ComponentError::MissingApplication)
        ));
    }

    #[test]
    fn test_http_sink_endpoint() {
        let api = Url::parse("http://localhost:8080/api/v9").unwrap();
        let sink = HttpInteractionSink::with_client(reqwest::Client::new(), &api, None).unwrap();
        assert_eq!(sink.endpoint().as_str(), "http://localhost:8080/api/v9/interactions");

        let api = Url::parse("http://localhost:8080/api/v9/").unwrap();
        let sink = HttpInteractionSink::with_client(reqwest::Client::new(), &api, None).unwrap();
        assert_eq!(sink.endpoint().as_str(), "http://localhost:8080/api/v9/interactions");
    }

    #[test]
    fn test_nonce_tracker_evicts_oldest_when_full() {
        let tracker = NonceTracker::with_capacity(2);
        tracker.register("1", MessageId(10));
        tracker.register("2", MessageId(20));
        assert_eq!(tracker.take("1"), Some(MessageId(10)));

        tracker.register("3", MessageId(30));
        tracker.register("4", MessageId(40));
        assert_eq!(tracker.len(), 2);
        assert_eq!(tracker.take("2"), None);
        assert_eq!(tracker.take("3"), Some(MessageId(30)));
        assert_eq!(tracker.take("4"), Some(MessageId(40)));
        assert!(tracker.is_empty());
    }

    #[tokio::test]
    async fn test_dispatcher_tracks_nonces() {
        let mut sink = MockInteractionSink::new();
        sink.expect_send()
            .withf(|request: &InteractionRequest| request.data.custom_id == "go")
            .times(1)
            .returning(|_| Ok(()));

        let dispatcher = InteractionDispatcher::new(Arc::new(sink), "session");
        let request = dispatcher.click(&button("go"), &on_message()).await.unwrap();

        assert!(request.nonce.parse::<u64>().unwrap() < 1_000_000_000);
        assert_eq!(dispatcher.nonces().take(&request.nonce), Some(MessageId(30)));
        assert!(dispatcher.nonces().is_empty());
    }

    #[tokio::test]
    async fn test_dispatcher_forgets_nonce_on_failure() {
        let mut sink = MockInteractionSink::new();
        sink.expect_send()
            .returning(|_| Err(ComponentError::Rejected { status: 400 }));

        let dispatcher = InteractionDispatcher::new(Arc::new(sink), "session");
        let result = dispatcher
            .submit(&select(), &on_message(), vec!["green".to_string()])
            .await;

        assert!(matches!(result, Err(ComponentError::Rejected { status: 400 })));
        assert!(dispatcher.nonces().is_empty());
    }
}
