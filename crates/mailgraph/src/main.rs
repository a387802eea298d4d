//! `mailgraph` - network demonstration for the simulated mail system.
//!
//! Usage: `mailgraph [CONFIG.json]`

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod render;
mod settings;

use std::path::PathBuf;

use anyhow::{Context, bail};
use mailgraph_core::{INBOX, Mailer, NetworkConfig, PRIORITIZED, Priority, ServerGraph};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mailgraph=info,mailgraph_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting mailgraph");

    let explicit = std::env::args_os().nth(1).map(PathBuf::from);
    let config = settings::load(explicit.as_deref())?;
    let mut network = ServerGraph::from_config(&config).context("building server network")?;

    run_demo(&config, &mut network)
}

/// Sends one urgent message from the first server's first user to the last
/// server's first user and reports what happened on the way.
fn run_demo(config: &NetworkConfig, network: &mut ServerGraph) -> anyhow::Result<()> {
    let (Some(origin), Some(destination)) = (config.servers.first(), config.servers.last()) else {
        bail!("the network has no servers");
    };
    let (Some(sender), Some(recipient)) = (origin.users.first(), destination.users.first()) else {
        bail!(
            "the demo needs a user on {} and on {}",
            origin.name,
            destination.name
        );
    };

    println!("\n--- SERVER NETWORK DEMO ---");
    let message = network
        .server(&origin.name)
        .and_then(|server| server.user(&sender.email))
        .context("sender is not registered")?
        .compose(
            &recipient.email,
            "Network test urgent",
            "Message travelling across the network",
            Priority::High,
        )?;

    match network.deliver(message, &origin.name, &destination.name) {
        Ok(route) => println!("Chosen route (BFS): {}", render::route(&route)),
        Err(e) => println!("{e}"),
    }

    println!(
        "\nDFS traversal of the network from {}:\n{}",
        origin.name,
        render::route(&network.dfs(&origin.name))
    );

    let server = network
        .server_mut(&destination.name)
        .context("destination server vanished")?;

    println!("\n{} inbox of {}:", INBOX, recipient.email);
    print!("{}", render::message_list(&server.receive(&recipient.email)?, true));
    println!("\n{} of {}:", PRIORITIZED, recipient.email);
    print!(
        "{}",
        render::message_list(&server.list(&recipient.email, PRIORITIZED)?, true)
    );

    let user = server
        .user_mut(&recipient.email)
        .context("recipient is not registered")?;
    let tree = user.folder_tree();
    println!("\nSearching for \"urgent\":");
    print!("{}", render::search_hits(tree.arena(), &tree.search("urgent")));

    print!("{}", render::user_trees(network));

    for name in network.server_names().to_vec() {
        if let Some(server) = network.server_mut(&name) {
            let processed = server.process_priority_messages();
            if !processed.is_empty() {
                println!("\nProcessing messages by priority on {name}:");
                print!("{}", render::processed(&processed));
            }
        }
    }

    Ok(())
}
