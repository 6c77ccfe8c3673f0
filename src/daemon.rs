//! Daemon - wires the relay together and serves it

use std::sync::Arc;

use crate::api::{ApiServer, ApiState};
use crate::chat::{ChatService, ChatSettings};
use crate::links::LinkFormatter;
use crate::llm::{CompletionClient, OpenAiClient};
use crate::session::SessionStore;
use crate::{Config, Result, faq, prompt};

/// The relay daemon
pub struct Daemon {
    config: Config,
    state: Arc<ApiState>,
}

impl Daemon {
    /// Load the FAQ, build the system prompt, and set up the chat service
    ///
    /// # Errors
    ///
    /// Returns error if the completion client cannot be created
    pub fn new(config: Config) -> Result<Self> {
        let llm: Arc<dyn CompletionClient> = Arc::new(OpenAiClient::new(&config.llm)?);
        Ok(Self::with_client(config, llm))
    }

    /// Same as [`Daemon::new`] with an explicit completion client
    #[must_use]
    pub fn with_client(config: Config, llm: Arc<dyn CompletionClient>) -> Self {
        let faq = faq::load(&config.faq_path);
        let system_prompt = prompt::build_system_prompt(&faq);

        let sessions = Arc::new(SessionStore::new(&config.sessions));
        let chat = ChatService::new(
            sessions,
            llm,
            system_prompt,
            LinkFormatter::new(&config.links),
            ChatSettings {
                model: config.llm.model.clone(),
                temperature: config.llm.temperature,
                source_label: config.source_label.clone(),
            },
        );

        tracing::info!(
            model = %config.llm.model,
            faq_records = faq.len(),
            max_sessions = config.sessions.max_sessions,
            idle_ttl_secs = config.sessions.idle_ttl.as_secs(),
            "relay initialized"
        );

        Self {
            state: Arc::new(ApiState::new(chat)),
            config,
        }
    }

    /// Shared API state
    #[must_use]
    pub const fn state(&self) -> &Arc<ApiState> {
        &self.state
    }

    /// Run until interrupted
    ///
    /// # Errors
    ///
    /// Returns error if the server fails to bind or run
    pub async fn run(self) -> Result<()> {
        let sweeper = self
            .state
            .chat
            .sessions()
            .spawn_sweeper(self.config.sessions.sweep_interval);

        let shutdown = async {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("shutdown signal received");
            }
        };

        let result = ApiServer::new(self.state, self.config.port).run(shutdown).await;
        sweeper.abort();
        result
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use async_trait::async_trait;

    use super::*;
    use crate::llm::CompletionRequest;

    struct EchoClient;

    #[async_trait]
    impl CompletionClient for EchoClient {
        async fn complete(&self, request: &CompletionRequest) -> Result<String> {
            Ok(format!("{} chars", request.messages[0].content.len()))
        }

        fn name(&self) -> &'static str {
            "echo"
        }
    }

    fn config_for(faq_path: std::path::PathBuf) -> Config {
        Config::from_lookup(0, faq_path, |key| {
            (key == "OPENAI_API_KEY").then(|| "sk-test".to_string())
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_system_prompt_captures_faq_at_startup() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"[{"question": "Do you ship ice?", "answer": "Locally"}]"#)
            .unwrap();

        let daemon = Daemon::with_client(
            config_for(file.path().to_path_buf()),
            Arc::new(EchoClient),
        );
        let prompt = daemon.state().chat.system_prompt().to_string();
        assert!(prompt.contains("Do you ship ice?"));

        // Later edits are not picked up
        std::fs::write(file.path(), "[]").unwrap();
        assert_eq!(daemon.state().chat.system_prompt(), prompt);
    }

    #[tokio::test]
    async fn test_missing_faq_still_serves() {
        let daemon = Daemon::with_client(
            config_for("/nonexistent/faq.json".into()),
            Arc::new(EchoClient),
        );

        let reply = daemon.state().chat.respond(Some("s1"), Some("hi")).await.unwrap();
        assert!(reply.message.ends_with("chars"));
        assert_eq!(reply.source, "The Ice Butcher Expertise");
    }
}
