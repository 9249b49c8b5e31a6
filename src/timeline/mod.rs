//! Timeline data model: projects, lanes and assets.

/// Timeline assets and their optional capabilities.
pub mod asset;
/// Project aggregate and lane layout.
pub mod project;
/// Outgoing transitions.
pub mod transition;
