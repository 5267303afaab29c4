pub mod info;
pub mod pending;
pub mod show;
pub mod status;
pub mod watch;

pub use info::*;
pub use pending::*;
pub use show::*;
pub use status::*;
pub use watch::*;
