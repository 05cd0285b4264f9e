/// Entry point for the Creo Wavefront metrics forwarder.
///
/// This binary reads newline-delimited JSON stats events from stdin and forwards
/// them as Wavefront line protocol to a proxy.
///
/// # Errors
///
/// Returns an error if initialization fails (e.g., invalid environment variables
/// or an unreachable proxy).
///
/// # Examples
///
/// ```bash
/// WF_PROXY_ADDRESS=wavefront:2878 WF_INTERVAL=10 cargo run < stats.jsonl
/// ```
#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    creo_wavefront::run().await
}
