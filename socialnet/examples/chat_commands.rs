//! A toy command loop showing how a server would wire socialnet in.
//!
//! Run with `cargo run --example chat_commands`.

use async_trait::async_trait;
use socialnet::prelude::*;
use std::sync::Arc;

/// Prints notifications instead of sending chat messages
struct ConsoleNotifier;

#[async_trait]
impl Notifier for ConsoleNotifier {
    async fn notify(
        &self,
        person: &PersonId,
        event: &SocialEvent,
    ) -> std::result::Result<(), PortError> {
        println!("  [to {}] {}", person, event);
        Ok(())
    }
}

async fn run(engine: &RelationshipEngine, line: &str) -> Result<()> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let (actor, command, args) = match words.as_slice() {
        [actor, command, args @ ..] => (PersonId::new(actor)?, *command, args),
        _ => return Err(SocialError::Configuration(format!("bad command: {}", line))),
    };

    match (command, args) {
        ("request", [kind, target]) => {
            engine
                .send_request(&actor, &PersonId::new(target)?, kind.parse()?)
                .await
        }
        ("accept", [kind, sender]) => {
            engine
                .accept_request(&actor, &PersonId::new(sender)?, kind.parse()?)
                .await
        }
        ("reject", [kind, sender]) => {
            engine
                .reject_request(&actor, &PersonId::new(sender)?, kind.parse()?)
                .await
        }
        ("remove", [kind, other]) => {
            engine
                .remove(&actor, &PersonId::new(other)?, kind.parse()?)
                .await
        }
        ("ignore", [other]) => engine.ignore(&actor, &PersonId::new(other)?).await,
        ("list", [kind]) => {
            let members = engine.members(&actor, kind.parse()?).await?;
            println!("  {} {}: {:?}", actor, kind, members);
            Ok(())
        }
        _ => Err(SocialError::Configuration(format!("bad command: {}", line))),
    }
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let config = ConfigBuilder::development()
        .with_maximum_friends(2)
        .with_log_level(LogLevel::Info)
        .build()?;
    let ports = Ports::detached().with_notifier(Arc::new(ConsoleNotifier));
    let network = SocialNetwork::start(config, ports).await?;
    let engine = network.engine();

    for name in ["Steve", "Alex", "Notch", "Jeb"] {
        engine.join(name).await?;
    }

    let script = [
        "steve request friend alex",
        "alex accept friend steve",
        "steve request friend notch",
        "notch reject friend steve",
        "jeb ignore steve",
        "steve request friend jeb",
        "steve request child jeb",
        "jeb request child notch",
        "notch accept child jeb",
        "notch request child jeb",
        "steve list friend",
        "jeb list child",
        "alex remove friend steve",
        "steve list friend",
    ];

    for line in script {
        println!("> {}", line);
        if let Err(e) = run(engine, line).await {
            println!("  error: {}", e);
        }
    }

    network.shutdown().await;
    Ok(())
}
