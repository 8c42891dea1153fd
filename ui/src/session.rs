//! Agent session controller
//!
//! Owns the selected agent, its schema, the saved and in-edit configuration
//! and the chat history. Views only ever read it; every change goes through
//! one of the methods below.
//!
//! The controller performs no I/O. Operations that need the transport return
//! a request ticket; the caller runs the transport call and hands the ticket
//! back together with the outcome. Tickets carry the selection generation
//! they were issued in, so a response belonging to a superseded selection is
//! discarded instead of overwriting newer state.

use crate::error::PlaygroundError;
use crate::types::{Agent, AgentConfig, ChatMessage, MessageId, ObjectSchema, ReplyEvent, Role};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No agent selected yet
    Idle,
    LoadingSchema,
    Ready,
}

/// Schema fetch issued by [`SessionController::select_agent`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaRequest {
    pub generation: u64,
    pub agent_id: String,
}

/// Save issued by [`SessionController::begin_save`]; `config` is exactly what gets sent
#[derive(Debug, Clone, PartialEq)]
pub struct SaveRequest {
    pub generation: u64,
    pub agent_id: String,
    pub config: AgentConfig,
}

/// Reply stream issued by [`SessionController::send_message`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyRequest {
    pub placeholder_id: MessageId,
    pub prompt: String,
}

#[derive(Debug, Clone)]
pub struct SessionController {
    agents: Vec<Agent>,
    selected: Option<Agent>,
    phase: SessionPhase,
    generation: u64,
    schema: Option<ObjectSchema>,
    saved_config: AgentConfig,
    config: AgentConfig,
    saving: bool,
    last_save_error: Option<PlaygroundError>,
    messages: Vec<ChatMessage>,
    // Never reset, so ids stay unique across agent switches
    next_message_id: MessageId,
    streaming: Option<MessageId>,
}

impl SessionController {
    /// Creates a controller over a fixed agent directory
    pub fn new(agents: Vec<Agent>) -> Self {
        Self {
            agents,
            selected: None,
            phase: SessionPhase::Idle,
            generation: 0,
            schema: None,
            saved_config: AgentConfig::default(),
            config: AgentConfig::default(),
            saving: false,
            last_save_error: None,
            messages: Vec::new(),
            next_message_id: 1,
            streaming: None,
        }
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn selected_agent(&self) -> Option<&Agent> {
        self.selected.as_ref()
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_loading_schema(&self) -> bool {
        self.phase == SessionPhase::LoadingSchema
    }

    pub fn schema(&self) -> Option<&ObjectSchema> {
        self.schema.as_ref()
    }

    /// In-edit configuration
    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn saved_config(&self) -> &AgentConfig {
        &self.saved_config
    }

    /// Whether the in-edit configuration differs from the last saved one
    pub fn is_dirty(&self) -> bool {
        self.config != self.saved_config
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    /// Error of the most recent save, cleared by the next successful one
    pub fn last_save_error(&self) -> Option<&PlaygroundError> {
        self.last_save_error.as_ref()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_streaming(&self) -> bool {
        self.streaming.is_some()
    }

    // ------------------------------------------------------------------------
    // Agent selection
    // ------------------------------------------------------------------------

    /// Selects an agent and resets the session.
    ///
    /// Returns `None` when the id is not part of the directory.
    pub fn select_agent(&mut self, agent_id: &str) -> Option<SchemaRequest> {
        let Some(agent) = self.agents.iter().find(|a| a.id == agent_id).cloned() else {
            log::warn!("Ignoring selection of unknown agent: {}", agent_id);
            return None;
        };

        self.generation += 1;
        self.selected = Some(agent);
        self.phase = SessionPhase::LoadingSchema;
        self.schema = None;
        self.messages.clear();
        self.config = AgentConfig::default();
        self.saved_config = AgentConfig::default();

        log::info!("Fetching schema for agent: {}", agent_id);
        Some(SchemaRequest {
            generation: self.generation,
            agent_id: agent_id.to_string(),
        })
    }

    /// Selects the first agent of the directory, if any
    pub fn select_first_agent(&mut self) -> Option<SchemaRequest> {
        let first = self.agents.first()?.id.clone();
        self.select_agent(&first)
    }

    /// Applies a schema response. Returns `false` when the response was stale.
    pub fn finish_schema_load(
        &mut self,
        request: &SchemaRequest,
        result: Result<ObjectSchema, PlaygroundError>,
    ) -> bool {
        if request.generation != self.generation {
            log::debug!(
                "Discarding stale schema response for agent: {}",
                request.agent_id
            );
            return false;
        }

        match result {
            Ok(schema) => {
                let defaults = AgentConfig::from_defaults(&schema);
                self.saved_config = defaults.clone();
                self.config = defaults;
                self.schema = Some(schema);
            }
            Err(e) => log::error!("Failed to load agent schema: {}", e),
        }
        self.phase = SessionPhase::Ready;
        true
    }

    // ------------------------------------------------------------------------
    // Configuration
    // ------------------------------------------------------------------------

    /// Replaces the in-edit configuration; nothing is persisted
    pub fn edit_config(&mut self, config: AgentConfig) {
        self.config = config;
    }

    /// Discards in-edit changes by restoring the last saved configuration
    pub fn reload(&mut self) {
        self.config = self.saved_config.clone();
    }

    /// Starts saving the in-edit configuration.
    ///
    /// Returns `None` while a save is in flight or when no agent is selected.
    pub fn begin_save(&mut self) -> Option<SaveRequest> {
        if self.saving {
            return None;
        }
        let agent_id = self.selected.as_ref()?.id.clone();

        self.saving = true;
        Some(SaveRequest {
            generation: self.generation,
            agent_id,
            config: self.config.clone(),
        })
    }

    /// Completes a save. On success the configuration that was sent becomes the saved one.
    pub fn finish_save(&mut self, request: SaveRequest, result: Result<(), PlaygroundError>) {
        self.saving = false;

        match result {
            Ok(()) if request.generation == self.generation => {
                self.saved_config = request.config;
                self.last_save_error = None;
            }
            Ok(()) => {
                log::debug!(
                    "Save for agent {} completed after selection changed",
                    request.agent_id
                );
            }
            Err(e) => {
                log::error!("Failed to save config: {}", e);
                self.last_save_error = Some(e);
            }
        }
    }

    // ------------------------------------------------------------------------
    // Chat
    // ------------------------------------------------------------------------

    /// Appends the user turn and an empty agent placeholder.
    ///
    /// Rejected (returns `None`) while a reply is streaming or when the text is blank.
    pub fn send_message(&mut self, text: &str) -> Option<ReplyRequest> {
        if self.streaming.is_some() {
            return None;
        }
        let prompt = text.trim();
        if prompt.is_empty() {
            return None;
        }

        let user_id = self.allocate_message_id();
        let placeholder_id = self.allocate_message_id();
        self.messages.push(ChatMessage {
            id: user_id,
            role: Role::User,
            content: prompt.to_string(),
        });
        self.messages.push(ChatMessage {
            id: placeholder_id,
            role: Role::Agent,
            content: String::new(),
        });
        self.streaming = Some(placeholder_id);

        Some(ReplyRequest {
            placeholder_id,
            prompt: prompt.to_string(),
        })
    }

    /// Appends a fragment to the agent message with the given id.
    ///
    /// Fragments for a message that no longer exists are dropped.
    pub fn apply_chunk(&mut self, placeholder_id: MessageId, chunk: &str) -> bool {
        let target = self
            .messages
            .iter_mut()
            .find(|m| m.id == placeholder_id && m.role == Role::Agent);

        match target {
            Some(message) => {
                message.content.push_str(chunk);
                true
            }
            None => {
                log::debug!("Dropping chunk for missing message {}", placeholder_id);
                false
            }
        }
    }

    /// Folds one stream event into the session. Returns `true` while more events are expected.
    pub fn apply_reply_event(&mut self, request: &ReplyRequest, event: ReplyEvent) -> bool {
        match event {
            ReplyEvent::Chunk { text } => {
                self.apply_chunk(request.placeholder_id, &text);
                true
            }
            ReplyEvent::Done => {
                self.finish_stream(request, Ok(()));
                false
            }
        }
    }

    /// Ends the streaming state, whatever the outcome
    pub fn finish_stream(&mut self, request: &ReplyRequest, result: Result<(), PlaygroundError>) {
        if let Err(e) = result {
            log::error!("Reply stream failed: {}", e);
        }
        if self.streaming == Some(request.placeholder_id) {
            self.streaming = None;
        }
    }

    fn allocate_message_id(&mut self) -> MessageId {
        let id = self.next_message_id;
        self.next_message_id += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ConfigValue, FieldSchema, FieldType};

    fn agents() -> Vec<Agent> {
        vec![
            Agent {
                id: "a".to_string(),
                name: "Agent A".to_string(),
            },
            Agent {
                id: "b".to_string(),
                name: "Agent B".to_string(),
            },
        ]
    }

    fn schema(title: &str) -> ObjectSchema {
        let mut genre = FieldSchema::new(FieldType::String);
        genre.default = Some(ConfigValue::from("Fantasy"));
        let mut creativity = FieldSchema::new(FieldType::Number);
        creativity.default = Some(ConfigValue::Number(0.8));
        let notes = FieldSchema::new(FieldType::String);

        ObjectSchema {
            title: Some(title.to_string()),
            properties: [
                ("genre".to_string(), genre),
                ("creativity".to_string(), creativity),
                ("notes".to_string(), notes),
            ]
            .into_iter()
            .collect(),
            ..ObjectSchema::default()
        }
    }

    /// Controller with agent "a" selected and its schema loaded
    fn ready() -> SessionController {
        let mut session = SessionController::new(agents());
        let request = session.select_agent("a").unwrap();
        assert!(session.finish_schema_load(&request, Ok(schema("A"))));
        session
    }

    #[test]
    fn test_starts_idle() {
        let session = SessionController::new(agents());
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert!(session.selected_agent().is_none());
        assert!(!session.is_streaming());
    }

    #[test]
    fn test_select_enters_loading_and_clears_state() {
        let mut session = ready();
        session.send_message("Hello").unwrap();

        let request = session.select_agent("b").unwrap();
        assert_eq!(request.agent_id, "b");
        assert!(session.is_loading_schema());
        assert!(session.schema().is_none());
        assert!(session.messages().is_empty());
        assert!(session.config().is_empty());
        assert_eq!(session.selected_agent().unwrap().name, "Agent B");
    }

    #[test]
    fn test_select_unknown_agent_is_ignored() {
        let mut session = ready();
        assert!(session.select_agent("zzz").is_none());
        assert_eq!(session.selected_agent().unwrap().id, "a");
        assert!(session.schema().is_some());
    }

    #[test]
    fn test_select_first_agent() {
        let mut session = SessionController::new(agents());
        let request = session.select_first_agent().unwrap();
        assert_eq!(request.agent_id, "a");
        assert!(SessionController::new(Vec::new()).select_first_agent().is_none());
    }

    #[test]
    fn test_schema_load_derives_defaults() {
        let session = ready();
        assert_eq!(session.phase(), SessionPhase::Ready);
        assert_eq!(session.config().get("genre"), &ConfigValue::from("Fantasy"));
        assert_eq!(session.config().get("creativity"), &ConfigValue::Number(0.8));
        assert!(session.config().contains_key("notes"));
        assert!(session.config().get("notes").is_undefined());
        assert_eq!(session.config(), session.saved_config());
        assert!(!session.is_dirty());
    }

    #[test]
    fn test_schema_not_found_leaves_no_schema() {
        let mut session = SessionController::new(agents());
        let request = session.select_agent("a").unwrap();
        let applied = session.finish_schema_load(
            &request,
            Err(PlaygroundError::SchemaNotFound("a".to_string())),
        );

        assert!(applied);
        assert!(!session.is_loading_schema());
        assert!(session.schema().is_none());
        assert!(session.config().is_empty());
    }

    #[test]
    fn test_stale_schema_response_is_discarded() {
        let mut session = SessionController::new(agents());
        let request_a = session.select_agent("a").unwrap();
        let request_b = session.select_agent("b").unwrap();

        // A resolves first while B is still pending
        assert!(!session.finish_schema_load(&request_a, Ok(schema("A"))));
        assert!(session.is_loading_schema());
        assert!(session.schema().is_none());

        assert!(session.finish_schema_load(&request_b, Ok(schema("B"))));
        session.send_message("hi").unwrap();

        // A resolving late must not touch B's state
        assert!(!session.finish_schema_load(&request_a, Ok(schema("A"))));
        assert_eq!(session.schema().unwrap().title.as_deref(), Some("B"));
        assert_eq!(session.messages().len(), 2);
        assert_eq!(session.selected_agent().unwrap().id, "b");
    }

    #[test]
    fn test_edit_only_touches_in_edit_copy() {
        let mut session = ready();
        let edited = session
            .config()
            .with_field("genre", ConfigValue::from("Horror"));
        session.edit_config(edited);

        assert_eq!(session.config().get("genre"), &ConfigValue::from("Horror"));
        assert_eq!(session.saved_config().get("genre"), &ConfigValue::from("Fantasy"));
        assert!(session.is_dirty());
    }

    #[test]
    fn test_reload_restores_saved_config() {
        let mut session = ready();
        let saved = session.saved_config().clone();
        let edited = session
            .config()
            .with_field("creativity", ConfigValue::Number(0.2))
            .with_field("notes", ConfigValue::from("draft"));
        session.edit_config(edited);

        session.reload();

        assert_eq!(session.config(), &saved);
        assert!(!session.is_dirty());
        assert!(!session.is_saving());
    }

    #[test]
    fn test_save_promotes_sent_config() {
        let mut session = ready();
        let edited = session
            .config()
            .with_field("genre", ConfigValue::from("Comedy"));
        session.edit_config(edited.clone());

        let request = session.begin_save().unwrap();
        assert!(session.is_saving());
        assert_eq!(request.agent_id, "a");
        assert_eq!(request.config, edited);
        assert!(session.begin_save().is_none());

        session.finish_save(request, Ok(()));
        assert!(!session.is_saving());
        assert_eq!(session.saved_config(), &edited);
        assert!(!session.is_dirty());
        assert!(session.last_save_error().is_none());
    }

    #[test]
    fn test_edits_during_save_stay_pending() {
        let mut session = ready();
        let request = session.begin_save().unwrap();
        let edited = session
            .config()
            .with_field("genre", ConfigValue::from("Mystery"));
        session.edit_config(edited);

        session.finish_save(request, Ok(()));
        assert!(session.is_dirty());
        assert_eq!(session.saved_config().get("genre"), &ConfigValue::from("Fantasy"));
    }

    #[test]
    fn test_failed_save_keeps_saved_config() {
        let mut session = ready();
        let saved = session.saved_config().clone();
        let edited = session
            .config()
            .with_field("genre", ConfigValue::from("Sci-Fi"));
        session.edit_config(edited);

        let request = session.begin_save().unwrap();
        session.finish_save(
            request,
            Err(PlaygroundError::SaveFailed("rejected".to_string())),
        );

        assert!(!session.is_saving());
        assert_eq!(session.saved_config(), &saved);
        assert!(session.is_dirty());
        assert!(matches!(
            session.last_save_error(),
            Some(PlaygroundError::SaveFailed(_))
        ));
    }

    #[test]
    fn test_save_after_agent_switch_is_not_promoted() {
        let mut session = ready();
        let request = session.begin_save().unwrap();

        let schema_request = session.select_agent("b").unwrap();
        session.finish_schema_load(&schema_request, Ok(schema("B")));
        let saved_b = session.saved_config().clone();

        session.finish_save(request, Ok(()));
        assert!(!session.is_saving());
        assert_eq!(session.saved_config(), &saved_b);
    }

    #[test]
    fn test_begin_save_without_agent() {
        let mut session = SessionController::new(agents());
        assert!(session.begin_save().is_none());
        assert!(!session.is_saving());
    }

    #[test]
    fn test_send_and_stream_reply() {
        let mut session = ready();
        let request = session.send_message("Hello").unwrap();
        assert_eq!(request.prompt, "Hello");
        assert!(session.is_streaming());

        let messages = session.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::User);
        assert_eq!(messages[0].content, "Hello");
        assert_eq!(messages[1].role, Role::Agent);
        assert_eq!(messages[1].content, "");
        assert_eq!(messages[1].id, request.placeholder_id);
        assert!(messages[0].id < messages[1].id);

        assert!(session.apply_reply_event(
            &request,
            ReplyEvent::Chunk {
                text: "Hi".to_string()
            }
        ));
        assert_eq!(session.messages()[1].content, "Hi");

        assert!(session.apply_reply_event(
            &request,
            ReplyEvent::Chunk {
                text: " there".to_string()
            }
        ));
        assert_eq!(session.messages()[1].content, "Hi there");
        assert!(session.is_streaming());

        assert!(!session.apply_reply_event(&request, ReplyEvent::Done));
        assert!(!session.is_streaming());
    }

    #[test]
    fn test_send_while_streaming_is_noop() {
        let mut session = ready();
        let request = session.send_message("first").unwrap();
        session.apply_chunk(request.placeholder_id, "partial");
        let before = session.messages().to_vec();

        assert!(session.send_message("second").is_none());
        assert_eq!(session.messages(), before.as_slice());
    }

    #[test]
    fn test_blank_message_is_rejected() {
        let mut session = ready();
        assert!(session.send_message("   \n\t").is_none());
        assert!(session.messages().is_empty());
        assert!(!session.is_streaming());
    }

    #[test]
    fn test_message_is_trimmed() {
        let mut session = ready();
        let request = session.send_message("  Hello  ").unwrap();
        assert_eq!(request.prompt, "Hello");
        assert_eq!(session.messages()[0].content, "Hello");
    }

    #[test]
    fn test_stream_failure_returns_to_ready() {
        let mut session = ready();
        let request = session.send_message("Hello").unwrap();
        session.finish_stream(
            &request,
            Err(PlaygroundError::Transport("closed".to_string())),
        );
        assert!(!session.is_streaming());
        assert!(session.send_message("again").is_some());
    }

    #[test]
    fn test_late_chunk_after_agent_switch_is_dropped() {
        let mut session = ready();
        let request = session.send_message("Hello").unwrap();

        let schema_request = session.select_agent("b").unwrap();
        session.finish_schema_load(&schema_request, Ok(schema("B")));

        assert!(!session.apply_chunk(request.placeholder_id, "stray"));
        assert!(session.messages().is_empty());

        // The old stream still blocks sending until it completes
        assert!(session.send_message("blocked").is_none());
        session.finish_stream(&request, Ok(()));

        let next = session.send_message("Hello B").unwrap();
        assert!(next.placeholder_id > request.placeholder_id);
        assert!(!session.apply_chunk(request.placeholder_id, "stray"));
        assert_eq!(session.messages()[1].content, "");
    }

    #[test]
    fn test_chunk_never_targets_user_message() {
        let mut session = ready();
        let request = session.send_message("Hello").unwrap();
        let user_id = session.messages()[0].id;

        assert!(!session.apply_chunk(user_id, "nope"));
        assert_eq!(session.messages()[0].content, "Hello");
        assert!(session.apply_chunk(request.placeholder_id, "ok"));
    }
}
