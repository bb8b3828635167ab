//! Topoview Core Types and Definitions
//!
//! This crate provides the foundational types for Topoview network topology
//! views. It includes:
//!
//! - **Identifiers**: Efficient string-interned identifiers ([`identifier::Id`])
//! - **Colors**: Color handling with CSS color support ([`color::Color`])
//! - **Geometry**: Basic geometric types and the zoom/pan transform ([`geometry`] module)
//! - **Topology**: The node/edge data model and its interchange format ([`topology`] module)
//! - **Draw**: Drawing primitives that render to layered SVG ([`draw`] module)

pub mod color;
pub mod draw;
pub mod geometry;
pub mod identifier;
pub mod topology;
