//! Two chat sessions sharing an in-memory store, with live translation.
//!
//! # Usage
//!
//! ```bash
//! export GEMINI_API_KEY="your-api-key-here"
//! export CHAT_APP_ID="demo-app"              # optional
//! export CHAT_INITIAL_AUTH_TOKEN="my-token"  # optional
//! cargo run --example chat_session
//! ```

use polyglot_chat::observability::{LogFormat, LoggingConfig};
use polyglot_chat::{
    create_translator_from_env, ChatConfig, ChatSession, InMemoryMessageStore,
    LocalIdentityProvider, MessageStore, SendOutcome,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    LoggingConfig::new().with_format(LogFormat::Compact).init()?;

    let config = ChatConfig::from_env();
    println!("=== Chat Session Example ({}) ===\n", config.collection_path());

    let store: Arc<dyn MessageStore> = Arc::new(InMemoryMessageStore::new());
    let translator = create_translator_from_env()?;
    let provider = LocalIdentityProvider::new();

    let me = ChatSession::connect(store.clone(), translator.clone(), &provider, &config).await;
    let guest_config = ChatConfig {
        initial_auth_token: None,
        default_target_language: "de".to_string(),
        ..config.clone()
    };
    let guest = ChatSession::connect(store, translator, &provider, &guest_config).await;

    println!("Signed in as {} ({:?})", me.identity().display_name(), me.identity().kind);
    println!("Guest is {}\n", guest.identity().display_name());

    for text in ["Hi! Is anyone around?", "   ", "Let's meet at noon tomorrow."] {
        match me.send_message(text).await {
            SendOutcome::Sent(id) => println!("sent {id}"),
            SendOutcome::Skipped => println!("skipped blank message"),
            SendOutcome::Failed(e) => println!("send failed: {e}"),
        }
    }

    guest.sync().await;
    for message in guest.messages() {
        println!(
            "[{}] {}: {}",
            message.display_time(),
            message.display_name,
            message.text
        );
        if let Some(translation) = guest.translate(&message).await {
            println!("    {} -> {}", translation.language, translation.text);
        }
    }

    guest.set_target_language("ko");
    println!("\nGuest switched to {}", guest.target_language_name());

    Ok(())
}
