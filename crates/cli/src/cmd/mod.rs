mod add;
mod inspect;

pub use add::{AddArgs, cmd_add};
pub use inspect::cmd_inspect;
