//! Signals emitted by corrective surfaces, and the bus that carries them.

pub mod bus;
pub mod in_memory_bus;
pub mod signal;

pub use bus::{SignalBus, Subscription};
pub use in_memory_bus::{InMemoryBusError, InMemorySignalBus};
pub use signal::{DrawerSignal, SignalKind};
