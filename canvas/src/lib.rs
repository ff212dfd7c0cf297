//! Interactive canvas core: a rectangle editor whose simulation and renderer
//! can run in separate execution contexts.
//!
//! The simulation owns the canonical [`state::ProcessState`] and describes
//! every change as a list of [`patch::Patch`]es. The renderer keeps a mirror
//! built only from those patches and redraws it every frame. The pointer
//! position travels separately through a lock-free [`pointer::PointerChannel`]
//! that both sides read once per frame.
//!
//! Nothing here spawns threads or owns a clock; the host binary decides where
//! each piece runs and when a frame happens.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Render-side engine over the split and fused variants |
//! | [`sim`] | Interaction state machine and per-frame tick |
//! | [`patch`] | Patch operations, the recording [`patch::Draft`], replay |
//! | [`render`] | Mirror state and frame drawing |
//! | [`commander`] | Typed publish/subscribe over commands |
//! | [`message`] | Inbound commands and the outbound patch message |
//! | [`pointer`] | Shared pointer channel |
//! | [`surface`] | Drawing surface trait, raster and recording surfaces |
//! | [`element`] | Host canvas elements and offscreen handoff |
//! | [`doc`] | Shapes, scene, id allocation |
//! | [`state`] | The process state record |
//! | [`input`] | Interaction state |
//! | [`hit`] | Topmost-shape hit testing |
//! | [`geom`] | Points, rectangles, viewport |
//! | [`color`] | RGBA colors |
//! | [`consts`] | Sizes, colors and other fixed values |

pub mod color;
pub mod commander;
pub mod consts;
pub mod doc;
pub mod element;
pub mod engine;
pub mod geom;
pub mod hit;
pub mod input;
pub mod message;
pub mod patch;
pub mod pointer;
pub mod render;
pub mod sim;
pub mod state;
pub mod surface;
