mod config;
mod demo;
mod wiring;

use std::error::Error;

use config::{Config, RunMode};
use runtime::logging::LineRunLogWriter;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = Config::from_env()?;

    match config.mode {
        RunMode::Demo => {
            let mut log = LineRunLogWriter::stderr();
            let result = demo::run_demo(&config, &mut log)?;
            print!("{}", demo::render_summary(&result));
        }
        RunMode::Serve => {
            let listener = TcpListener::bind(config.listen_addr).await?;
            eprintln!(
                "event=server_listening mode={} addr={}",
                config.mode.as_str(),
                config.listen_addr
            );
            axum::serve(listener, wiring::build_app()).await?;
        }
    }

    Ok(())
}
