//! Game objects: the positioned, rotatable, resizable entities living in
//! layers.
//!
//! A [`GameObject`] carries the shared transform state (position, signed
//! size, rotation angle, rotation center) and a closed [`ObjectKind`]
//! payload — [`SpriteData`] or [`LabelData`]. There is no subtype
//! dispatch: code that cares about the payload pattern-matches on the
//! kind.
//!
//! Geometry caches (transform, inverse, world vertices, bounding rect)
//! are recomputed eagerly on every mutation; queries never observe a
//! stale cache.

mod game_object;
mod types;

pub use game_object::GameObject;
pub use types::{Color, HorzAlign, LabelData, ObjectId, ObjectKind, SpriteData, VertAlign};
