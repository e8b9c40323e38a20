//! Domain handlers and the registry that routes errors to them.
//!
//! A handler maps `(code, payload)` of its domain to a [`CorrectiveRequest`]
//! (which surface to open, which event means "resolved"). Handlers are pure:
//! no IO, no shared state, no retries. The orchestrator does the rest.
//!
//! [`CorrectiveRequest`]: remedy_core::CorrectiveRequest

pub mod batch;
pub mod conversion;
pub mod handler;
pub mod inventory;
pub mod payload;
pub mod product;
pub mod recipe;
pub mod registry;

pub use batch::BatchHandler;
pub use conversion::ConversionHandler;
pub use handler::{DomainHandler, NotHandled, Resolution};
pub use inventory::InventoryHandler;
pub use product::ProductHandler;
pub use recipe::RecipeHandler;
pub use registry::{HandlerRegistry, RegistryError};
