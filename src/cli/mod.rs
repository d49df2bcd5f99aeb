pub mod encode;
pub mod process;
pub mod rank;

pub use encode::*;
pub use process::*;
pub use rank::*;
