pub mod dispatch;
pub mod extract;
pub mod process;

pub use dispatch::*;
pub use extract::*;
pub use process::*;
