//! Object payload types.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::resource::ResourceRef;

/// Document-unique object identifier.
///
/// Allocated by a post-incremented monotonic counter on the owning
/// document; never reused, even after deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObjectId(pub u64);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// RGBA color with components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Self = Self { r: 1.0, g: 1.0, b: 1.0, a: 1.0 };
    pub const BLACK: Self = Self { r: 0.0, g: 0.0, b: 0.0, a: 1.0 };

    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Horizontal text alignment for labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HorzAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Vertical text alignment for labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VertAlign {
    #[default]
    Top,
    Center,
    Bottom,
}

/// Payload of a sprite object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteData {
    /// Texture filename reference.
    pub texture: ResourceRef,
    /// Tint color, multiplied with the texture.
    pub color: Color,
    /// Per-language texture overrides, keyed by language code.
    /// `BTreeMap` keeps snapshot bytes deterministic.
    pub localized_textures: BTreeMap<String, ResourceRef>,
}

impl SpriteData {
    pub fn new(texture: ResourceRef) -> Self {
        Self {
            texture,
            color: Color::WHITE,
            localized_textures: BTreeMap::new(),
        }
    }
}

/// Payload of a text label object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelData {
    /// Displayed text.
    pub text: String,
    /// Font filename reference.
    pub font: ResourceRef,
    /// Font size in points.
    pub font_size: f32,
    pub horz_align: HorzAlign,
    pub vert_align: VertAlign,
    /// Extra spacing between lines, in pixels.
    pub line_spacing: f32,
    pub color: Color,
}

impl LabelData {
    pub fn new(text: impl Into<String>, font: ResourceRef, font_size: f32) -> Self {
        Self {
            text: text.into(),
            font,
            font_size,
            horz_align: HorzAlign::default(),
            vert_align: VertAlign::default(),
            line_spacing: 0.0,
            color: Color::BLACK,
        }
    }
}

/// Closed set of object payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ObjectKind {
    Sprite(SpriteData),
    Label(LabelData),
}

impl ObjectKind {
    /// Short type tag used by the script format and for naming.
    pub fn type_tag(&self) -> &'static str {
        match self {
            Self::Sprite(_) => "sprite",
            Self::Label(_) => "label",
        }
    }

    /// All resource references held by this payload.
    pub fn resource_refs(&self) -> Vec<&ResourceRef> {
        match self {
            Self::Sprite(sprite) => {
                let mut refs = vec![&sprite.texture];
                refs.extend(sprite.localized_textures.values());
                refs
            }
            Self::Label(label) => vec![&label.font],
        }
    }

    /// Mutable access to all resource references held by this payload.
    pub fn resource_refs_mut(&mut self) -> Vec<&mut ResourceRef> {
        match self {
            Self::Sprite(sprite) => {
                let mut refs = vec![&mut sprite.texture];
                refs.extend(sprite.localized_textures.values_mut());
                refs
            }
            Self::Label(label) => vec![&mut label.font],
        }
    }
}
