pub mod account;
pub mod task;

pub use account::{normalize_email, Account, NewAccount};
pub use task::{NewTask, Task, TaskChanges, TaskInput, TaskUpdateInput, TasksResponse};
