//! Router Module Index
//!
//! Routing is split by access level so that the authentication layer is applied to a whole
//! module at once instead of route by route.

/// Routes accessible without a credential.
pub mod public;

/// Routes protected by the `AuthUser` extractor middleware.
pub mod authenticated;
