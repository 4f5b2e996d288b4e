pub mod section;
pub mod user;

pub use section::{next_section_id, Section, Task};
pub use user::User;
