pub mod category;
pub mod change;
#[cfg(feature = "console_log")]
pub mod console;
pub mod core;
pub mod encoder;
pub mod error;
pub mod interaction;
pub mod layout;
pub mod options;
pub mod patterns;
pub mod pipeline;
pub mod span;
pub mod style;
pub mod styled;
pub mod wasm;


pub use self::core::*;
pub use category::*;
pub use change::*;
pub use encoder::*;
pub use error::*;
pub use interaction::*;
pub use layout::*;
pub use options::*;
pub use patterns::*;
pub use pipeline::*;
pub use span::*;
pub use style::*;
pub use styled::*;
pub use wasm::*;
