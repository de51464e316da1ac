use clap::Parser;
use log::info;
use server::connection::{self, AppState};
use server::game::MatchState;
use server::match_loop;
use tokio::net::TcpListener;

/// Main-method of the application.
/// Parses command-line arguments, spawns the match loop, and serves the
/// websocket endpoint until the process is stopped.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Command line arguments
    #[derive(Parser, Debug)]
    #[clap(author, version, about)]
    struct Args {
        /// Server IP address to bind to
        #[clap(short = 'H', long, default_value = "127.0.0.1")]
        host: String,
        /// Server port to listen on
        #[clap(short, long, default_value = "9898")]
        port: u16,
        /// Tick rate (simulation updates per second)
        #[clap(short, long, default_value_t = shared::TICK_RATE)]
        tick_rate: u32,
    }

    let args = Args::parse();

    let state = MatchState::new_shared();

    // The match loop starts with the process, not with the first connection.
    tokio::spawn(match_loop::run(state.clone(), args.tick_rate));

    let app = connection::router(AppState::new(state));
    let address = format!("{}:{}", args.host, args.port);
    let listener = TcpListener::bind(&address).await?;
    info!("Server listening on {}", address);

    axum::serve(listener, app).await?;

    Ok(())
}
