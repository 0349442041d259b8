pub mod generate;
pub mod init;
pub mod inspect;
pub mod watch;

pub use generate::{GenerateOptions, generate_command};
pub use init::init_command;
pub use inspect::inspect_command;
pub use watch::watch_command;
