use antirecommender::ResultEnvelope;
use serde::Serialize;

/// Tell the user where to authorize; JSON mode prints it as an event.
pub fn print_redirect(url: &str, json: bool) {
    if json {
        println!("{}", serde_json::json!({ "type": "Redirect", "url": url }));
        return;
    }
    println!();
    println!("Open this URL in your browser to log in with the music service:");
    println!("  {url}");
    println!();
    println!("Then run again with the address you were sent back to:");
    println!("  antirecommender recommend --callback \"<redirect url>\"");
}

/// Output an envelope as JSON to stdout
pub fn print_envelope<T: Serialize>(envelope: &ResultEnvelope<T>) {
    if let Ok(json) = serde_json::to_string(envelope) {
        println!("{json}");
    } else {
        log::error!("Failed to serialize result to JSON");
    }
}
