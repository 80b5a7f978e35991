//! # coursechat
//!
//! A course planning chat assistant that grounds its answers in program
//! requirements. Each turn takes the student's current selection (subjects
//! and programs of study) plus a free-text question, builds a system prompt
//! from the requirements corpora, and sends both to a chat completion
//! endpoint.
//!
//! ```no_run
//! use coursechat::{Advisor, AppConfig, SelectionContext};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::load()?;
//! let advisor = Advisor::from_config(&config);
//! advisor.initialize().await;
//!
//! let selection = SelectionContext::new(["6.1010", "18.06"], ["major6-3"]);
//! let answer = advisor.reply(&selection, "What should I take next term?").await;
//! println!("{answer}");
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use tracing::{debug, info, warn};

pub use coursechat_config::AppConfig;
pub use coursechat_context::{
    AssembledContext, ContextAssembler, CorpusSource, CorpusStore, DetailSource, LocatorSource,
    PromptBuilder, SectionExtractor, StaticSource, TRUNCATION_NOTE,
};
pub use coursechat_core::{ChatClient, ChatError, CorpusError, ProgramId, SelectionContext};
pub use coursechat_providers::OpenAiChatClient;

/// Owns the corpus cache, the prompt pipeline and the chat client, and runs
/// one chat turn at a time.
pub struct Advisor {
    store: CorpusStore,
    assembler: ContextAssembler,
    builder: PromptBuilder,
    client: Arc<dyn ChatClient>,
}

impl Advisor {
    pub fn new(
        store: CorpusStore,
        assembler: ContextAssembler,
        builder: PromptBuilder,
        client: Arc<dyn ChatClient>,
    ) -> Self {
        Self {
            store,
            assembler,
            builder,
            client,
        }
    }

    /// Wire everything from configuration: corpus locators, extraction
    /// rules, budgets, prompt wording and the OpenAI-compatible client.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            CorpusStore::from_config(&config.corpus),
            ContextAssembler::from_config(config),
            PromptBuilder::from_config(&config.prompt),
            Arc::new(OpenAiChatClient::from_config(config)),
        )
    }

    /// Start loading the corpora. Safe to call repeatedly and concurrently;
    /// returns `true` once both are available.
    pub async fn initialize(&self) -> bool {
        let loaded = self.store.initialize().await;
        if loaded {
            info!("Requirements corpora ready");
        } else {
            warn!("Requirements corpora unavailable, prompts will carry no requirements text");
        }
        loaded
    }

    pub fn store(&self) -> &CorpusStore {
        &self.store
    }

    /// Use `credential` for every later turn, e.g. a key the student pasted
    /// after startup.
    pub fn set_credential(&self, credential: &str) {
        self.client.set_credential(credential);
        info!("Chat credential updated");
    }

    /// The system prompt for `selection`, waiting for the corpora if needed.
    pub async fn system_prompt(&self, selection: &SelectionContext) -> String {
        let corpora = self.store.snapshot().await;
        let context = self.assembler.assemble(selection, &corpora);
        let targets = self.assembler.targets(selection);
        debug!(
            programs = selection.programs.len(),
            detail_source = ?context.detail_source,
            detail_chars = context.detail_text.chars().count(),
            "Assembled requirements context"
        );
        self.builder.render(selection, &context, &targets)
    }

    /// The detailed requirements section for one program, if it has one.
    pub async fn program_section(&self, program: &ProgramId) -> Option<String> {
        let detailed = self.store.detailed().await;
        self.assembler
            .extractor()
            .extract(detailed, program)
            .map(|section| section.text.to_string())
    }

    /// Run one chat turn and return the assistant's reply.
    pub async fn ask(
        &self,
        selection: &SelectionContext,
        message: &str,
    ) -> Result<String, ChatError> {
        if !self.client.has_credential() {
            return Err(ChatError::MissingCredential);
        }
        let system_prompt = self.system_prompt(selection).await;
        self.client.send(message, &system_prompt).await
    }

    /// Like [`ask`](Self::ask), but failures come back as the text to show
    /// the student instead of an error.
    pub async fn reply(&self, selection: &SelectionContext, message: &str) -> String {
        match self.ask(selection, message).await {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "Chat turn failed");
                e.user_message().to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    const SUMMARY: &str = "6-3: Computer Science and Engineering. 18: Mathematics.";
    const DETAILED: &str = "\
6-2 Electrical Engineering and Computer Science
EECS body
6-3 Computer Science and Engineering
CS body
";

    /// Records the system prompt it was given and answers with a fixed reply.
    struct RecordingClient {
        key: Mutex<Option<String>>,
        prompts: Mutex<Vec<String>>,
    }

    impl RecordingClient {
        fn new(key: bool) -> Self {
            Self {
                key: Mutex::new(key.then(|| "sk-test".to_string())),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait::async_trait]
    impl ChatClient for RecordingClient {
        fn has_credential(&self) -> bool {
            self.key.lock().unwrap().is_some()
        }

        fn set_credential(&self, credential: &str) {
            *self.key.lock().unwrap() = Some(credential.to_string());
        }

        async fn send(&self, user_message: &str, system_prompt: &str) -> Result<String, ChatError> {
            self.prompts.lock().unwrap().push(system_prompt.to_string());
            Ok(format!("echo: {user_message}"))
        }
    }

    fn advisor(client: Arc<RecordingClient>) -> Advisor {
        let source = StaticSource::new()
            .with("summary.txt", SUMMARY)
            .with("detailed.txt", DETAILED);
        Advisor::new(
            CorpusStore::new(Arc::new(source), "summary.txt", "detailed.txt"),
            ContextAssembler::default(),
            PromptBuilder::default(),
            client,
        )
    }

    #[tokio::test]
    async fn initialize_reports_loaded() {
        let advisor = advisor(Arc::new(RecordingClient::new(true)));
        assert!(!advisor.store().is_loaded());
        assert!(advisor.initialize().await);
        assert!(advisor.store().is_loaded());
    }

    #[tokio::test]
    async fn ask_sends_rendered_prompt() {
        let client = Arc::new(RecordingClient::new(true));
        let advisor = advisor(client.clone());
        let selection = SelectionContext::new(["6.1010"], ["major6-3"]);

        let reply = advisor.ask(&selection, "hello").await.unwrap();
        assert_eq!(reply, "echo: hello");

        let prompts = client.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("CS body"));
        assert!(!prompts[0].contains("EECS body"));
    }

    #[tokio::test]
    async fn missing_key_short_circuits() {
        let client = Arc::new(RecordingClient::new(false));
        let advisor = advisor(client.clone());

        let err = advisor
            .ask(&SelectionContext::default(), "hello")
            .await
            .unwrap_err();
        assert_eq!(err, ChatError::MissingCredential);
        assert!(client.prompts.lock().unwrap().is_empty());
        assert_eq!(
            advisor.reply(&SelectionContext::default(), "hello").await,
            ChatError::MissingCredential.user_message()
        );
    }

    #[tokio::test]
    async fn set_credential_unblocks_turns() {
        let client = Arc::new(RecordingClient::new(false));
        let advisor = advisor(client.clone());
        let selection = SelectionContext::default();

        assert_eq!(
            advisor.ask(&selection, "hello").await.unwrap_err(),
            ChatError::MissingCredential
        );

        advisor.set_credential("sk-pasted");
        assert_eq!(client.key.lock().unwrap().as_deref(), Some("sk-pasted"));
        assert_eq!(advisor.ask(&selection, "hello").await.unwrap(), "echo: hello");
    }

    #[tokio::test]
    async fn program_section_is_owned_text() {
        let advisor = advisor(Arc::new(RecordingClient::new(true)));
        let section = advisor.program_section(&ProgramId::from("major6-2")).await;
        assert_eq!(
            section.as_deref(),
            Some("6-2 Electrical Engineering and Computer Science\nEECS body\n")
        );
        assert!(advisor.program_section(&ProgramId::from("major18")).await.is_none());
    }
}
