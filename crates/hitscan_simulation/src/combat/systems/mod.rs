//! Combat systems (fire → resolve → deliver → death)

pub mod damage;
pub mod reload;
pub mod weapon;

#[cfg(test)]
mod reload_tests;
#[cfg(test)]
mod weapon_tests;

// Re-export all systems
pub use damage::*;
pub use reload::*;
pub use weapon::*;
