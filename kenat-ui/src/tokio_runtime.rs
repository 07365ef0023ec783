use std::sync::OnceLock;

use tokio::runtime::{Builder, Runtime};

use crate::error::TickerError;

static RUNTIME: OnceLock<Runtime> = OnceLock::new();

/// Returns the process-wide runtime that drives [`TokioTicker`](crate::TokioTicker)
/// when the host does not supply a handle.
pub fn get() -> Result<&'static Runtime, TickerError> {
    if let Some(runtime) = RUNTIME.get() {
        return Ok(runtime);
    }
    let runtime = Builder::new_multi_thread()
        .worker_threads(1)
        .thread_name("kenat-ticker")
        .enable_all()
        .build()?;
    Ok(RUNTIME.get_or_init(|| runtime))
}
