//! `remedy-drawer`: the action/error-recovery protocol.
//!
//! ```text
//! caller ─▶ Interceptor ─▶ action ──ok / unrecoverable──────────────▶ caller
//!                             │
//!                             └─ recoverable ─▶ DrawerProtocol
//!                                                 ├─ HandlerRegistry → DomainHandler → CorrectiveRequest
//!                                                 ├─ CorrectiveSurface::open (drawer)
//!                                                 ├─ SignalBus: await completion event / dismissal
//!                                                 └─ replay the action once ─────────▶ caller
//! ```
//!
//! The caller never observes intermediate states: it gets the action's value
//! or a final [`RecoveryFailure`].

pub mod config;
pub mod failure;
pub mod in_memory_surface;
pub mod interceptor;
pub mod protocol;
pub mod session;
pub mod surface;

pub use config::{ConfigError, RecoveryConfig};
pub use failure::{RecoveryFailure, RouteError, UnroutableReason};
pub use in_memory_surface::{InMemorySurface, SurfaceScript};
pub use interceptor::Interceptor;
pub use protocol::DrawerProtocol;
pub use session::{InFlightRecovery, RecoveryState};
pub use surface::{CorrectiveSurface, DrawerOpening, SurfaceError};
