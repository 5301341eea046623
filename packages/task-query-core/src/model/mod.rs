//! Variable and task model types.

mod task;
mod variable;

pub use task::{TaskFilter, TaskId};
pub use variable::{VariableRecord, VariableType};
