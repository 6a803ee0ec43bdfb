pub mod attachment;
pub mod error;
pub mod task;

pub use attachment::{Attachment, ImageType};
pub use error::CoreError;
pub use task::{CreateTask, Task, UpdateTask};
