//! Shortstack Demo Binary
//!
//! Boots the core engine standalone: seats a fixed table of players
//! straight into a tournament (no queue/matchmaking transport wired
//! up here) and plays it out hand by hand, printing each subscriber's
//! snapshot as the game progresses. A stand-in for the HTTP/WebSocket
//! front door the core is meant to sit behind.

use clap::Parser;
use shortstack::config::{Cli, Config};
use shortstack::events::InMemoryEventStore;
use shortstack::game::{Player, Snapshot};
use shortstack::supervisor::Supervisor;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    shortstack::init();

    let config = Cli::parse().overlay(Config::from_env()?)?;
    log::info!("starting shortstack demo with config: {config:?}");

    let event_store = Arc::new(InMemoryEventStore::new());
    let supervisor = Supervisor::new(event_store, config.small_blind, config.big_blind);

    let recovered = supervisor.recover_all().await?;
    if recovered > 0 {
        log::info!("recovered {recovered} game(s) from the event log");
    }

    let players: Vec<Player> = (0..config.players_per_game)
        .map(|seat| Player::new(format!("player-{seat}"), config.starting_chips, seat))
        .collect();
    let names: Vec<String> = players.iter().map(|p| p.id.clone()).collect();
    let game_id = supervisor.start_game(players).await?;
    let handle = supervisor.get_game(&game_id).await?;

    let mut feeds: Vec<(String, tokio::sync::mpsc::UnboundedReceiver<Snapshot>)> =
        names.iter().map(|name| (name.clone(), handle.subscribe(name.clone()).unwrap())).collect();

    handle.start_hand().await?;
    for (name, feed) in feeds.iter_mut() {
        if let Ok(snapshot) = feed.try_recv() {
            println!("[{name}] phase={} pot={}", snapshot.server_phase, snapshot.pot);
        }
    }

    // A real front end drives `handle.player_action(...)` from client
    // input from here on; the demo stops after dealing the first hand.
    Ok(())
}
