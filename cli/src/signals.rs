use framestream_core::transport::CancelToken;

/// Route SIGINT/SIGTERM into `token`. The handler runs on its own thread and
/// only flips the flag; repeated signals are no-ops.
pub fn install(token: CancelToken) -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(move || {
        if token.cancel() {
            tracing::info!(target: "signal", "interrupt received, shutting down");
        } else {
            tracing::debug!(target: "signal", "interrupt received, shutdown already in progress");
        }
    })
}
