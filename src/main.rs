//! Character Pilot - line-oriented harness.
//!
//! Reads user turns from stdin and prints the assistant's replies. Lines
//! starting with `/` are harness commands: `/new`, `/show`, `/quit`.

use std::error::Error;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use character_pilot::adapters::ai::OpenAIProvider;
use character_pilot::adapters::postgres::PostgresCharacterSink;
use character_pilot::adapters::reasoning::LlmCharacterReasoner;
use character_pilot::adapters::storage::InMemoryConversationStore;
use character_pilot::application::{
    GetConversationHandler, GetConversationQuery, SendTurnCommand, SendTurnError,
    SendTurnHandler, StartConversationCommand, StartConversationHandler, TurnWorkflow,
};
use character_pilot::config::{AppConfig, ValidationError};
use character_pilot::domain::foundation::ConversationId;
use character_pilot::ports::{AIProvider, Collaborators};

struct Harness {
    start: StartConversationHandler,
    send: SendTurnHandler,
    get: GetConversationHandler,
}

impl Harness {
    async fn open(&self) -> Result<ConversationId, Box<dyn Error>> {
        let started = self.start.handle(StartConversationCommand::default()).await?;
        Ok(started.conversation_id)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::load()?;
    config.logging.init()?;
    config.validate()?;

    let openai = config
        .ai
        .openai()
        .ok_or(ValidationError::MissingRequired("OPENAI_API_KEY"))?;
    let provider: Arc<dyn AIProvider> = Arc::new(OpenAIProvider::new(openai)?);
    let reasoner = Arc::new(LlmCharacterReasoner::new(provider, config.ai.reasoner()));

    let sink = Arc::new(PostgresCharacterSink::new(config.database.connect_lazy()?));
    let store = Arc::new(InMemoryConversationStore::new());

    let workflow = Arc::new(TurnWorkflow::new(
        Collaborators::from_shared(reasoner),
        sink,
        config.workflow.policy(),
    ));

    let harness = Harness {
        start: StartConversationHandler::new(store.clone()),
        send: SendTurnHandler::new(store.clone(), workflow),
        get: GetConversationHandler::new(store),
    };

    tracing::info!(model = %config.ai.model, "character pilot ready");

    let mut conversation_id = harness.open().await?;
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        let output = match line {
            "" => continue,
            "/quit" => break,
            "/new" => {
                conversation_id = harness.open().await?;
                format!("(new conversation {conversation_id})")
            }
            "/show" => {
                let state = harness
                    .get
                    .handle(GetConversationQuery { conversation_id })
                    .await?;
                serde_json::to_string_pretty(&state)?
            }
            content => {
                let sent = harness
                    .send
                    .handle(SendTurnCommand {
                        conversation_id,
                        content: content.to_string(),
                    })
                    .await;
                match sent {
                    Ok(result) => result.reply.content,
                    Err(e @ SendTurnError::Workflow(_)) => {
                        format!("(turn failed, nothing was saved: {e})")
                    }
                    Err(e) => return Err(e.into()),
                }
            }
        };

        stdout.write_all(output.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
    }

    Ok(())
}
