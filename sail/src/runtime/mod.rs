//! Runtime: options, host layout and the `SailRuntime` façade.

pub mod constants;
mod core;
pub mod layout;
pub mod options;

pub use self::core::SailRuntime;
pub use layout::SailLayout;
pub use options::SailOptions;
