//! Coordinate picking and overlay placement engine.
//!
//! This crate owns the model behind the picker: a background image shown
//! letterboxed inside a display box, integer coordinates recorded on it, and
//! overlay images dragged into place relative to it. Everything here is
//! testable without a display surface. A host UI forwards raw pointer, key and
//! resize events to [`engine::EngineCore`], answers dialog requests through the
//! [`host::Host`] trait, and draws whatever [`render::plan`] hands back.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Interaction controller: event dispatch and the [`engine::Action`]s it emits |
//! | [`scene`] | Owned aggregate of background, overlays, points, mode and z-order |
//! | [`overlay`] | Overlay entities and their drag state machine |
//! | [`points`] | Point marker sequence and coordinate import parsing |
//! | [`viewport`] | Background ↔ display coordinate mapping |
//! | [`background`] | Background image loading and pixel readout |
//! | [`hit`] | Hit-testing overlays and the background rectangle |
//! | [`input`] | Input event types, modes and the gesture state |
//! | [`commands`] | Dialog-driven user commands routed through [`host::Host`] |
//! | [`host`] | Collaborator trait implemented by the UI layer |
//! | [`export`] | Text report and JSON snapshot of a session |
//! | [`render`] | Display-space render plan and PNG composition |
//! | [`error`] | Crate error type |
//! | [`consts`] | Shared numeric constants and UI strings |

pub mod background;
pub mod commands;
pub mod consts;
pub mod engine;
pub mod error;
pub mod export;
pub mod hit;
pub mod host;
pub mod input;
pub mod overlay;
pub mod points;
pub mod render;
pub mod scene;
pub mod viewport;
