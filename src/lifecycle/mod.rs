//! Process lifecycle for the demo binary

mod shutdown;

pub use shutdown::ShutdownSignal;
