//! Layout and editing engine for markdown picture cards.
//!
//! Content blocks from an external markdown lexer are laid out as a single
//! density-aware column of positioned elements, split into pages at heading
//! boundaries, and then edited by pointer: move with alignment snapping,
//! resize by eight handles, bounded undo/redo. The crate never produces
//! pixels; hosts draw from [`render::DisplayList`] and export through the
//! [`export::Rasterizer`] and [`export::Archiver`] traits.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | [`engine::EngineCore`]: scene, selection, gestures and history |
//! | [`blocks`] | Content block input and inline markup cleanup |
//! | [`layout`] | Blocks to a single positioned column |
//! | [`paginate`] | Heading-level page splitting and per-page relayout |
//! | [`snap`] | Alignment guides and magnetic snapping |
//! | [`history`] | Bounded undo/redo over scene snapshots |
//! | [`doc`] | Elements, pages and the document store |
//! | [`input`] | Input event types and the gesture state machine |
//! | [`hit`] | Hit-testing and resize handle geometry |
//! | [`click`] | Deferred single-click vs double-click timer |
//! | [`render`] | Display list for the external rasterizer |
//! | [`export`] | Single-page and batch export |
//! | [`geom`] | Points and rectangles |
//! | [`consts`] | Shared numeric constants (canvas size, minimum sizes, etc.) |

pub mod blocks;
pub mod click;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod export;
pub mod geom;
pub mod history;
pub mod hit;
pub mod input;
pub mod layout;
pub mod paginate;
pub mod render;
pub mod snap;
