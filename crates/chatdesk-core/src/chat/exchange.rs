//! The chat exchange: one user message in, one assistant reply out.
//!
//! Flow for a single exchange:
//! 1. reject blank input
//! 2. resolve (owner-scoped) or create the conversation
//! 3. persist the user message
//! 4. build the context window: priming message, the 5 messages that
//!    preceded the new one, then the new message
//! 5. call the completion provider once
//! 6. persist the assistant reply and touch the conversation
//!
//! A failed completion leaves the user message in place and writes no
//! assistant message.

use chatdesk_types::chat::{ChatMessage, MessageRole};
use chatdesk_types::config::CompletionSettings;
use chatdesk_types::error::ChatError;
use chatdesk_types::llm::{CompletionRequest, Message};
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::chat::lock::ConversationLocks;
use crate::chat::repository::ConversationRepository;
use crate::chat::service::ConversationStore;
use crate::llm::provider::LlmProvider;

/// Number of prior messages sent along with a new one.
pub const CONTEXT_WINDOW: usize = 5;

/// Fixed assistant message that opens every context window.
pub const PRIMING_MESSAGE: &str = "I am a Deepseek assistant, I'm here to help you.";

/// Result of a successful exchange.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExchangeReply {
    pub response: String,
    pub conversation_id: Uuid,
}

/// Runs chat exchanges against a completion provider.
pub struct ChatExchange<R: ConversationRepository, P: LlmProvider> {
    store: ConversationStore<R>,
    provider: P,
    settings: CompletionSettings,
    locks: ConversationLocks,
}

impl<R: ConversationRepository, P: LlmProvider> ChatExchange<R, P> {
    pub fn new(repo: R, provider: P, settings: CompletionSettings) -> Self {
        Self {
            store: ConversationStore::new(repo),
            provider,
            settings,
            locks: ConversationLocks::new(),
        }
    }

    /// Access the conversation store used by this exchange.
    pub fn store(&self) -> &ConversationStore<R> {
        &self.store
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn settings(&self) -> &CompletionSettings {
        &self.settings
    }

    /// Send a user message and return the assistant's reply.
    #[tracing::instrument(
        name = "chat_exchange",
        skip(self, text),
        fields(provider = %self.provider.name(), model = %self.settings.model)
    )]
    pub async fn send(
        &self,
        owner_id: Uuid,
        text: &str,
        conversation_id: Option<Uuid>,
    ) -> Result<ExchangeReply, ChatError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        let conversation = match conversation_id {
            Some(id) => self.store.get(&id, &owner_id).await.inspect_err(|_| {
                warn!(conversation_id = %id, "Conversation not found for owner");
            })?,
            None => self.store.create(owner_id, text).await?,
        };

        let _guard = self.locks.acquire(conversation.id).await;

        let user_message = ChatMessage::new(conversation.id, MessageRole::User, text);
        self.store.repo().save_message(&user_message).await?;
        self.store.touch(&conversation.id).await?;
        debug!(message_id = %user_message.id, "User message saved");

        let recent = self
            .store
            .repo()
            .get_recent_messages(&conversation.id, (CONTEXT_WINDOW + 1) as u32)
            .await?;
        let request = self.build_request(build_context_window(&recent, &user_message));
        debug!(context_messages = request.messages.len(), "Context window built");

        let completion = self.provider.complete(&request).await.inspect_err(|e| {
            warn!(conversation_id = %conversation.id, error = %e, "Completion failed");
        })?;

        let reply = ChatMessage::new(conversation.id, MessageRole::Assistant, completion.content);
        self.store.repo().save_message(&reply).await.inspect_err(|e| {
            warn!(conversation_id = %conversation.id, error = %e, "Failed to save assistant reply");
        })?;
        self.store.touch(&conversation.id).await?;

        info!(
            conversation_id = %conversation.id,
            reply_chars = reply.content.chars().count(),
            "Exchange complete"
        );

        Ok(ExchangeReply {
            response: reply.content,
            conversation_id: conversation.id,
        })
    }

    fn build_request(&self, messages: Vec<Message>) -> CompletionRequest {
        CompletionRequest {
            model: self.settings.model.clone(),
            messages,
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
            top_p: self.settings.top_p,
            stream: false,
            presence_penalty: self.settings.presence_penalty,
            frequency_penalty: self.settings.frequency_penalty,
        }
    }
}

/// Assemble the messages sent to the provider.
///
/// `recent` is a chronological tail of the conversation that may include
/// `new_message` itself; it is excluded there and appended last.
pub fn build_context_window(recent: &[ChatMessage], new_message: &ChatMessage) -> Vec<Message> {
    let prior: Vec<&ChatMessage> = recent.iter().filter(|m| m.id != new_message.id).collect();
    let skip = prior.len().saturating_sub(CONTEXT_WINDOW);

    let mut messages = Vec::with_capacity(CONTEXT_WINDOW + 2);
    messages.push(Message::new(MessageRole::Assistant, PRIMING_MESSAGE));
    messages.extend(
        prior
            .into_iter()
            .skip(skip)
            .map(|m| Message::new(m.role, m.content.clone())),
    );
    messages.push(Message::new(new_message.role, new_message.content.clone()));
    messages
}
