mod engine;
pub mod events;
pub mod fields;

pub use engine::{LifecycleEngine, LifecycleOutcome};
pub use events::{EventSink, TransitionEvent, TransitionKind};
pub use fields::{EmployeeFields, PayrollFields};
