pub mod execute;

pub use execute::{execute, ExecutionOutcome};
