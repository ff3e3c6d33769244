// === PUBLIC CONTRACT ===
pub mod contract;
pub use contract::model;

// === MODULE DEFINITION ===
pub mod module;
pub use module::{UsersModule, BASE_PATH};

// === INTERNAL MODULES ===
// Exposed for tests and the server binary; `contract` is the stable surface.
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;
