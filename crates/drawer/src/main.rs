//! `remedy-drill`: run one simulated recovery end to end.
//!
//! ```text
//! remedy-drill '{"domain":"inventory","code":"STOCK_SHORTAGE","payload":{"item_id":"I1","required_amount":5}}' complete
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Context, bail};
use tracing::{error, info};

use remedy_core::{ActionKey, Outcome, StructuredError};
use remedy_drawer::{DrawerProtocol, InMemorySurface, Interceptor, RecoveryConfig, SurfaceScript};
use remedy_events::InMemorySignalBus;
use remedy_handlers::HandlerRegistry;

const USAGE: &str = "usage: remedy-drill <error-json> [complete|dismiss]";

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    remedy_observability::init();

    let mut args = std::env::args().skip(1);
    let raw = args.next().context(USAGE)?;
    let script = match args.next().as_deref() {
        None | Some("complete") => SurfaceScript::AutoComplete,
        Some("dismiss") => SurfaceScript::AutoDismiss,
        Some(other) => bail!("unknown mode `{other}`; {USAGE}"),
    };

    let body: serde_json::Value =
        serde_json::from_str(&raw).context("error argument is not valid JSON")?;
    let failure = StructuredError::from_body(&body)
        .context("JSON is not a structured error (needs `domain` or `code`)")?;

    let config = RecoveryConfig::from_env()?;
    let registry = Arc::new(HandlerRegistry::with_builtin_handlers()?);
    let bus = Arc::new(InMemorySignalBus::new());
    let surface = InMemorySurface::with_script(bus.clone(), script);
    let protocol = Arc::new(DrawerProtocol::new(registry, surface.clone(), bus, config));
    let interceptor = Interceptor::new(protocol);

    let attempts = AtomicUsize::new(0);
    let result = interceptor
        .execute_keyed(ActionKey::new("drill"), || {
            let attempt = attempts.fetch_add(1, Ordering::SeqCst);
            let failure = failure.clone();
            async move {
                if attempt == 0 {
                    Outcome::<&'static str, String>::Recoverable(failure)
                } else {
                    Outcome::Success("action completed")
                }
            }
        })
        .await;

    for opening in surface.openings() {
        println!(
            "opened {} (awaiting {})",
            opening.endpoint(),
            opening.completion_event().unwrap_or("nothing")
        );
    }

    let attempts = attempts.load(Ordering::SeqCst);
    match result {
        Ok(message) => {
            info!(attempts, "drill recovered");
            println!("{message} after {attempts} attempt(s)");
            Ok(())
        }
        Err(failure) => {
            error!(attempts, %failure, "drill failed");
            bail!("{failure}")
        }
    }
}
