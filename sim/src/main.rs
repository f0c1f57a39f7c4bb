use football_sim::config::SimConfig;
use football_sim::game_loop::{run_game_loop, GameBroadcast, GameCommand};
use tokio::sync::{broadcast, mpsc};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = match std::env::args().nth(1) {
        Some(path) => match SimConfig::from_json_file(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{}", e);
                std::process::exit(1);
            }
        },
        None => SimConfig::default(),
    };

    // Validate configuration before starting
    if let Err(e) = config.validate() {
        eprintln!("Invalid simulation configuration: {}", e);
        std::process::exit(1);
    }

    let (game_tx, game_rx) = mpsc::channel::<GameCommand>(256);
    let (broadcast_tx, mut broadcast_rx) = broadcast::channel::<GameBroadcast>(256);

    let game = tokio::spawn(run_game_loop(game_rx, broadcast_tx, config));

    // Print match messages as JSON lines
    let printer = tokio::spawn(async move {
        loop {
            match broadcast_rx.recv().await {
                Ok(GameBroadcast::Match(msg)) => match serde_json::to_string(&msg) {
                    Ok(json) => println!("{}", json),
                    Err(e) => tracing::warn!("Failed to encode message: {}", e),
                },
                Ok(GameBroadcast::Ended { tick }) => {
                    tracing::info!("Match ended at tick {}", tick);
                    break;
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!("Output lagged, skipped {} messages", n);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Interrupted, shutting down");
            let _ = game_tx.send(GameCommand::Shutdown).await;
        }
        _ = printer => {}
    }

    if let Err(e) = game.await {
        tracing::error!("Game loop task failed: {}", e);
    }
}
