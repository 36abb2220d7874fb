//! Serve command - HTTP catalog server.

use crate::config::Settings;

/// Run the serve command. `bind` overrides `server.bind` when given.
pub async fn run(bind: Option<String>, config: Settings) {
    let bind_address = bind.unwrap_or_else(|| config.server.bind.clone());

    if let Err(e) = crate::http::serve_http(config, bind_address).await {
        eprintln!("HTTP server error: {e}");
        std::process::exit(1);
    }
}
