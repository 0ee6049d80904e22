#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Province hover and selection for the mountain map.
//!
//! [`SelectionController`] owns which province is selected, which one is
//! under the pointer, and which mountains are on display. Each event it
//! handles yields [`MapCommand`](summit_map_selection_models::MapCommand)s
//! for a [`MapViewport`] to render.

pub mod controller;
pub mod state;
pub mod viewport;

pub use controller::{LoadTicket, SelectionController};
pub use state::{SelectionPhase, SelectionState, Transition, TransitionContext, transition};
pub use viewport::{HeadlessViewport, MapViewport};
