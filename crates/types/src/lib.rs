//! Core types for the black hole attack simulation.
//!
//! This crate provides the data model shared by the simulation core and any
//! presentation layer that renders it:
//!
//! - **Identifiers**: [`NodeId`], [`PacketId`]
//! - **Geometry**: [`Vec2`], [`Bounds`]
//! - **Nodes**: [`Node`], [`NodeMetrics`], [`Classification`], [`NodeColor`]
//! - **Packets**: [`Packet`], [`PacketColor`]
//! - **Input**: [`InputEvent`] delivered by the presentation layer
//!
//! # Design Philosophy
//!
//! This crate is self-contained with minimal dependencies. It does not depend on
//! any other workspace crates, making it the foundation layer. Nothing here
//! draws random numbers or mutates shared state; that is the runner's job.

mod geometry;
mod identifiers;
mod input;
mod node;
mod packet;

pub use geometry::{Bounds, Vec2};
pub use identifiers::{NodeId, PacketId};
pub use input::InputEvent;
pub use node::{Classification, Node, NodeColor, NodeMetrics, INITIAL_ENERGY, INITIAL_TRUST};
pub use packet::{Packet, PacketColor};
