//! Packages shipped with the crate.
//!
//! [`Base`] is always loaded. The others are opt-in through
//! [`ConfigurationBuilder::package`](crate::ConfigurationBuilder::package).

mod base;
mod bbm;
mod ieeemacros;

pub use base::Base;
pub(crate) use base::array_environment_style;
pub use bbm::Bbm;
pub use ieeemacros::IeeeMacros;
