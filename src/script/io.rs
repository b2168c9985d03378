//! Writing a document into a script table and reading it back.
//!
//! Every field is named; nothing depends on enumeration order. Resource
//! references store their path only and are re-resolved on load through
//! the caller's [`ResourceResolver`].

use crate::document::Document;
use crate::layer::{LayerId, LayerTree, LockState, Visibility};
use crate::math::Vec2;
use crate::object::{
    Color, GameObject, HorzAlign, LabelData, ObjectId, ObjectKind, SpriteData, VertAlign,
};
use crate::resource::{ResourceRef, ResourceResolver};

use super::error::ScriptError;
use super::{ScriptReader, ScriptWriter};

/// Current script layout version.
pub const SCRIPT_VERSION: i64 = 1;

/// Writes the whole document into the writer's current table.
pub fn save_document(doc: &Document, writer: &mut dyn ScriptWriter) {
    writer.set_int("version", SCRIPT_VERSION);
    writer.set_int("max_depth", doc.tree().max_depth() as i64);
    writer.set_int("next_object_id", doc.next_object_id as i64);
    writer.set_int("layer_counter", doc.layer_counter as i64);
    writer.set_int("group_counter", doc.group_counter as i64);
    writer.set_int("sprite_counter", doc.sprite_counter as i64);
    writer.set_int("label_counter", doc.label_counter as i64);

    save_guides(&doc.horizontal_guides, "h_guides", writer);
    save_guides(&doc.vertical_guides, "v_guides", writer);

    writer.push_table("active_layer");
    for (slot, index) in active_layer_path(doc).into_iter().enumerate() {
        writer.push_index(slot);
        writer.set_int("index", index as i64);
        writer.pop_table();
    }
    writer.pop_table();

    writer.push_table("root");
    save_node(doc.tree(), doc.root(), writer);
    writer.pop_table();
}

/// Reads a document out of the reader's current table.
///
/// Loading is atomic: the document is built aside and only returned
/// once every field has been read successfully.
pub fn load_document(
    reader: &mut dyn ScriptReader,
    resolver: &dyn ResourceResolver,
) -> Result<Document, ScriptError> {
    let version = require_int(reader, "document", "version")?;
    if version != SCRIPT_VERSION {
        return Err(ScriptError::InvalidValue {
            field: "version".into(),
            value: version.to_string(),
        });
    }

    let max_depth = require_int(reader, "document", "max_depth")? as usize;
    let next_object_id = require_int(reader, "document", "next_object_id")? as u64;
    let layer_counter = require_int(reader, "document", "layer_counter")? as u64;
    let group_counter = require_int(reader, "document", "group_counter")? as u64;
    let sprite_counter = require_int(reader, "document", "sprite_counter")? as u64;
    let label_counter = require_int(reader, "document", "label_counter")? as u64;

    let horizontal_guides = load_guides(reader, "h_guides")?;
    let vertical_guides = load_guides(reader, "v_guides")?;

    let mut active_path = Vec::new();
    if !reader.enter_table("active_layer") {
        return Err(ScriptError::MissingTable {
            table: "active_layer".into(),
        });
    }
    for slot in 0..reader.len() {
        if !reader.enter_index(slot) {
            reader.exit_table();
            return Err(ScriptError::MissingTable {
                table: "active_layer".into(),
            });
        }
        active_path.push(require_int(reader, "active_layer", "index")? as usize);
        reader.exit_table();
    }
    reader.exit_table();

    let mut tree = LayerTree::new();
    tree.set_max_depth(max_depth);
    if !reader.enter_table("root") {
        return Err(ScriptError::MissingTable {
            table: "root".into(),
        });
    }
    let root = load_node(reader, resolver, &mut tree, None)?;
    reader.exit_table();

    if !tree.node(root).is_some_and(|n| n.is_group()) {
        return Err(ScriptError::InvalidValue {
            field: "root.type".into(),
            value: "layer".into(),
        });
    }
    let mut active = root;
    for index in active_path {
        active = *tree.children(active).get(index).ok_or_else(|| {
            ScriptError::InvalidValue {
                field: "active_layer".into(),
                value: index.to_string(),
            }
        })?;
    }
    if !tree.node(active).is_some_and(|n| n.is_layer()) {
        return Err(ScriptError::InvalidValue {
            field: "active_layer".into(),
            value: "not a layer".into(),
        });
    }

    Ok(Document {
        tree,
        root,
        active_layer: active,
        next_object_id,
        layer_counter,
        group_counter,
        sprite_counter,
        label_counter,
        horizontal_guides,
        vertical_guides,
    })
}

fn active_layer_path(doc: &Document) -> Vec<usize> {
    let mut path = Vec::new();
    let mut cursor = doc.active_layer();
    while cursor != doc.root() {
        if let Some(index) = doc.tree().index_of(cursor) {
            path.push(index);
        }
        match doc.tree().node(cursor).and_then(|n| n.parent()) {
            Some(parent) => cursor = parent,
            None => break,
        }
    }
    path.reverse();
    path
}

fn save_guides(guides: &[f32], key: &str, writer: &mut dyn ScriptWriter) {
    writer.push_table(key);
    for (slot, &position) in guides.iter().enumerate() {
        writer.push_index(slot);
        writer.set_real("pos", position as f64);
        writer.pop_table();
    }
    writer.pop_table();
}

fn load_guides(reader: &mut dyn ScriptReader, key: &str) -> Result<Vec<f32>, ScriptError> {
    if !reader.enter_table(key) {
        return Err(ScriptError::MissingTable { table: key.into() });
    }
    let mut guides = Vec::with_capacity(reader.len());
    for slot in 0..reader.len() {
        if !reader.enter_index(slot) {
            reader.exit_table();
            return Err(ScriptError::MissingTable { table: key.into() });
        }
        let position = require_real(reader, key, "pos")?;
        guides.push(position as f32);
        reader.exit_table();
    }
    reader.exit_table();
    Ok(guides)
}

fn save_node(tree: &LayerTree, id: LayerId, writer: &mut dyn ScriptWriter) {
    let Some(node) = tree.node(id) else { return };
    let type_tag = if node.is_group() { "group" } else { "layer" };
    writer.set_string("type", type_tag);
    writer.set_string("name", &node.name);
    writer.set_int("visible_state", visibility_tag(node.visibility()));
    writer.set_int("lock_state", lock_tag(node.lock()));
    writer.set_bool("expanded", node.expanded);

    if node.is_group() {
        writer.push_table("children");
        for (slot, &child) in tree.children(id).iter().enumerate() {
            writer.push_index(slot);
            save_node(tree, child, writer);
            writer.pop_table();
        }
        writer.pop_table();
    } else {
        writer.push_table("objects");
        if let Ok(objects) = tree.objects(id) {
            for (slot, object) in objects.iter().enumerate() {
                writer.push_index(slot);
                save_object(object, writer);
                writer.pop_table();
            }
        }
        writer.pop_table();
    }
}

fn load_node(
    reader: &mut dyn ScriptReader,
    resolver: &dyn ResourceResolver,
    tree: &mut LayerTree,
    parent: Option<LayerId>,
) -> Result<LayerId, ScriptError> {
    let type_tag = require_string(reader, "node", "type")?;
    let name = require_string(reader, "node", "name")?;
    let visibility = parse_visibility(require_int(reader, "node", "visible_state")?)?;
    let lock = parse_lock(require_int(reader, "node", "lock_state")?)?;
    let expanded = require_bool(reader, "node", "expanded")?;

    let is_group = match type_tag.as_str() {
        "group" => true,
        "layer" => false,
        other => {
            return Err(ScriptError::UnknownTypeTag {
                table: "node".into(),
                tag: other.to_string(),
            });
        }
    };

    let id = if is_group {
        tree.new_group(name)
    } else {
        tree.new_layer(name)
    };
    if let Some(parent) = parent {
        let index = tree.children(parent).len();
        // A file written under a higher nesting limit must still load,
        // so re-linking skips the depth gate.
        if tree.attach_unbounded(id, parent, index).is_err() {
            return Err(ScriptError::InvalidValue {
                field: "node".into(),
                value: "malformed node tree".into(),
            });
        }
    }
    tree.set_states(id, visibility, lock);
    if let Some(node) = tree.node_mut(id) {
        node.expanded = expanded;
    }

    let list = if is_group { "children" } else { "objects" };
    if !reader.enter_table(list) {
        return Err(ScriptError::MissingTable { table: list.into() });
    }
    for slot in 0..reader.len() {
        if !reader.enter_index(slot) {
            reader.exit_table();
            return Err(ScriptError::MissingTable { table: list.into() });
        }
        let result = if is_group {
            load_node(reader, resolver, tree, Some(id)).map(|_| ())
        } else {
            load_object(reader, resolver).and_then(|object| {
                tree.insert_object(id, slot, object)
                    .map_err(|_| ScriptError::MissingTable {
                        table: "objects".into(),
                    })
            })
        };
        reader.exit_table();
        result?;
    }
    reader.exit_table();
    Ok(id)
}

fn save_object(object: &GameObject, writer: &mut dyn ScriptWriter) {
    writer.set_string("type", object.kind().type_tag());
    writer.set_string("name", object.name());
    writer.set_int("id", object.id().0 as i64);
    writer.set_real("x", object.position().x as f64);
    writer.set_real("y", object.position().y as f64);
    writer.set_real("width", object.size().x as f64);
    writer.set_real("height", object.size().y as f64);
    writer.set_real("angle", object.angle() as f64);
    let center = object.rotation_center_local();
    writer.set_real("center_x", center.x as f64);
    writer.set_real("center_y", center.y as f64);

    match object.kind() {
        ObjectKind::Sprite(sprite) => {
            writer.set_string("texture", &sprite.texture.path);
            save_color("color", &sprite.color, writer);
            writer.push_table("localized");
            for (slot, (language, texture)) in sprite.localized_textures.iter().enumerate() {
                writer.push_index(slot);
                writer.set_string("language", language);
                writer.set_string("texture", &texture.path);
                writer.pop_table();
            }
            writer.pop_table();
        }
        ObjectKind::Label(label) => {
            writer.set_string("text", &label.text);
            writer.set_string("font", &label.font.path);
            writer.set_real("font_size", label.font_size as f64);
            writer.set_real("line_spacing", label.line_spacing as f64);
            writer.set_string("horz_align", horz_align_tag(label.horz_align));
            writer.set_string("vert_align", vert_align_tag(label.vert_align));
            save_color("color", &label.color, writer);
        }
    }
}

fn load_object(
    reader: &mut dyn ScriptReader,
    resolver: &dyn ResourceResolver,
) -> Result<GameObject, ScriptError> {
    let type_tag = require_string(reader, "object", "type")?;
    let name = require_string(reader, "object", "name")?;
    let id = ObjectId(require_int(reader, "object", "id")? as u64);
    let position = Vec2::new(
        require_real(reader, "object", "x")? as f32,
        require_real(reader, "object", "y")? as f32,
    );
    let size = Vec2::new(
        require_real(reader, "object", "width")? as f32,
        require_real(reader, "object", "height")? as f32,
    );
    let angle = require_real(reader, "object", "angle")? as f32;
    let center = Vec2::new(
        require_real(reader, "object", "center_x")? as f32,
        require_real(reader, "object", "center_y")? as f32,
    );

    let kind = match type_tag.as_str() {
        "sprite" => {
            let texture = require_string(reader, "object", "texture")?;
            let mut sprite = SpriteData::new(ResourceRef::resolve(&texture, resolver));
            sprite.color = load_color(reader, "color")?;
            if !reader.enter_table("localized") {
                return Err(ScriptError::MissingTable {
                    table: "localized".into(),
                });
            }
            for slot in 0..reader.len() {
                if !reader.enter_index(slot) {
                    reader.exit_table();
                    return Err(ScriptError::MissingTable {
                        table: "localized".into(),
                    });
                }
                let language = require_string(reader, "localized", "language")?;
                let texture = require_string(reader, "localized", "texture")?;
                sprite
                    .localized_textures
                    .insert(language, ResourceRef::resolve(&texture, resolver));
                reader.exit_table();
            }
            reader.exit_table();
            ObjectKind::Sprite(sprite)
        }
        "label" => {
            let text = require_string(reader, "object", "text")?;
            let font = require_string(reader, "object", "font")?;
            let font_size = require_real(reader, "object", "font_size")? as f32;
            let mut label = LabelData::new(text, ResourceRef::resolve(&font, resolver), font_size);
            label.line_spacing = require_real(reader, "object", "line_spacing")? as f32;
            label.horz_align = parse_horz_align(&require_string(reader, "object", "horz_align")?)?;
            label.vert_align = parse_vert_align(&require_string(reader, "object", "vert_align")?)?;
            label.color = load_color(reader, "color")?;
            ObjectKind::Label(label)
        }
        other => {
            return Err(ScriptError::UnknownTypeTag {
                table: "object".into(),
                tag: other.to_string(),
            });
        }
    };

    Ok(GameObject::from_parts(
        name, id, position, size, angle, center, kind,
    ))
}

fn save_color(key: &str, color: &Color, writer: &mut dyn ScriptWriter) {
    writer.push_table(key);
    writer.set_real("r", color.r as f64);
    writer.set_real("g", color.g as f64);
    writer.set_real("b", color.b as f64);
    writer.set_real("a", color.a as f64);
    writer.pop_table();
}

fn load_color(reader: &mut dyn ScriptReader, key: &str) -> Result<Color, ScriptError> {
    if !reader.enter_table(key) {
        return Err(ScriptError::MissingTable { table: key.into() });
    }
    let color = Color::new(
        require_real(reader, key, "r")? as f32,
        require_real(reader, key, "g")? as f32,
        require_real(reader, key, "b")? as f32,
        require_real(reader, key, "a")? as f32,
    );
    reader.exit_table();
    Ok(color)
}

// -- field helpers --

fn require_string(
    reader: &dyn ScriptReader,
    table: &str,
    field: &str,
) -> Result<String, ScriptError> {
    reader.get_string(field).ok_or_else(|| ScriptError::MissingField {
        table: table.into(),
        field: field.into(),
    })
}

fn require_int(reader: &dyn ScriptReader, table: &str, field: &str) -> Result<i64, ScriptError> {
    reader.get_int(field).ok_or_else(|| ScriptError::MissingField {
        table: table.into(),
        field: field.into(),
    })
}

fn require_real(reader: &dyn ScriptReader, table: &str, field: &str) -> Result<f64, ScriptError> {
    reader.get_real(field).ok_or_else(|| ScriptError::MissingField {
        table: table.into(),
        field: field.into(),
    })
}

fn require_bool(reader: &dyn ScriptReader, table: &str, field: &str) -> Result<bool, ScriptError> {
    reader.get_bool(field).ok_or_else(|| ScriptError::MissingField {
        table: table.into(),
        field: field.into(),
    })
}

// -- tag tables --

fn visibility_tag(visibility: Visibility) -> i64 {
    match visibility {
        Visibility::Visible => 0,
        Visibility::PartiallyVisible => 1,
        Visibility::Invisible => 2,
    }
}

fn parse_visibility(tag: i64) -> Result<Visibility, ScriptError> {
    match tag {
        0 => Ok(Visibility::Visible),
        1 => Ok(Visibility::PartiallyVisible),
        2 => Ok(Visibility::Invisible),
        other => Err(ScriptError::InvalidValue {
            field: "visible_state".into(),
            value: other.to_string(),
        }),
    }
}

fn lock_tag(lock: LockState) -> i64 {
    match lock {
        LockState::Unlocked => 0,
        LockState::PartiallyUnlocked => 1,
        LockState::Locked => 2,
    }
}

fn parse_lock(tag: i64) -> Result<LockState, ScriptError> {
    match tag {
        0 => Ok(LockState::Unlocked),
        1 => Ok(LockState::PartiallyUnlocked),
        2 => Ok(LockState::Locked),
        other => Err(ScriptError::InvalidValue {
            field: "lock_state".into(),
            value: other.to_string(),
        }),
    }
}

fn horz_align_tag(align: HorzAlign) -> &'static str {
    match align {
        HorzAlign::Left => "left",
        HorzAlign::Center => "center",
        HorzAlign::Right => "right",
    }
}

fn parse_horz_align(tag: &str) -> Result<HorzAlign, ScriptError> {
    match tag {
        "left" => Ok(HorzAlign::Left),
        "center" => Ok(HorzAlign::Center),
        "right" => Ok(HorzAlign::Right),
        other => Err(ScriptError::InvalidValue {
            field: "horz_align".into(),
            value: other.to_string(),
        }),
    }
}

fn vert_align_tag(align: VertAlign) -> &'static str {
    match align {
        VertAlign::Top => "top",
        VertAlign::Center => "center",
        VertAlign::Bottom => "bottom",
    }
}

fn parse_vert_align(tag: &str) -> Result<VertAlign, ScriptError> {
    match tag {
        "top" => Ok(VertAlign::Top),
        "center" => Ok(VertAlign::Center),
        "bottom" => Ok(VertAlign::Bottom),
        other => Err(ScriptError::InvalidValue {
            field: "vert_align".into(),
            value: other.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::GuideAxis;
    use crate::resource::{ResolveAll, ResourceStatus};
    use crate::script::ScriptTable;

    fn sample_document() -> Document {
        let mut doc = Document::new();
        let group = doc.create_group(None, 0).unwrap();
        let inner = doc.create_layer(Some(group), 0).unwrap();
        doc.set_active_layer(inner).unwrap();
        let sprite = doc
            .create_sprite(Vec2::new(10.0, 20.0), Vec2::new(32.0, 16.0), "hero.png", &ResolveAll)
            .unwrap();
        if let ObjectKind::Sprite(data) = doc.object_mut(sprite).unwrap().kind_mut() {
            data.localized_textures.insert(
                "de".to_string(),
                ResourceRef::resolve("hero_de.png", &ResolveAll),
            );
        }
        doc.create_label(Vec2::new(5.0, 5.0), Vec2::new(64.0, 12.0), "Hi", "main.ttf", 14.0, &ResolveAll)
            .unwrap();
        doc.add_guide(GuideAxis::Vertical, 42.0);
        doc.tree_mut().toggle_lock(group).unwrap();
        doc
    }

    #[test]
    fn save_load_round_trip() {
        let doc = sample_document();
        let mut table = ScriptTable::new();
        save_document(&doc, &mut table);

        let restored = load_document(&mut table, &ResolveAll).unwrap();
        assert_eq!(restored.next_object_id, doc.next_object_id);
        assert_eq!(restored.guides(GuideAxis::Vertical), doc.guides(GuideAxis::Vertical));

        let active = restored.tree().node(restored.active_layer()).unwrap();
        assert!(active.is_layer());
        assert_eq!(active.lock(), LockState::PartiallyUnlocked);

        let hero = restored.find_object_by_name("Sprite 1").unwrap();
        let hero = restored.tree().hit_object(hero).unwrap();
        assert_eq!(hero.position(), Vec2::new(10.0, 20.0));
        let ObjectKind::Sprite(data) = hero.kind() else {
            panic!("expected a sprite");
        };
        assert_eq!(data.localized_textures["de"].path, "hero_de.png");

        let label = restored.find_object_by_name("Label 1").unwrap();
        let label = restored.tree().hit_object(label).unwrap();
        let ObjectKind::Label(data) = label.kind() else {
            panic!("expected a label");
        };
        assert_eq!(data.text, "Hi");
        assert_eq!(data.font_size, 14.0);
    }

    #[test]
    fn load_re_resolves_resources() {
        let doc = sample_document();
        let mut table = ScriptTable::new();
        save_document(&doc, &mut table);

        let missing = |_: &str| ResourceStatus::Missing;
        let restored = load_document(&mut table, &missing).unwrap();
        let mut missed = restored.missed_files();
        missed.sort();
        assert_eq!(missed, vec!["hero.png", "hero_de.png", "main.ttf"]);
    }

    #[test]
    fn missing_field_is_reported() {
        let mut table = ScriptTable::new();
        table.set_int("version", SCRIPT_VERSION);
        let err = load_document(&mut table, &ResolveAll).unwrap_err();
        assert_eq!(
            err,
            ScriptError::MissingField {
                table: "document".into(),
                field: "max_depth".into(),
            }
        );
    }

    #[test]
    fn unknown_object_type_is_rejected() {
        let doc = sample_document();
        let mut table = ScriptTable::new();
        save_document(&doc, &mut table);

        // Corrupt the first object's type tag in place.
        table.enter_table("root");
        table.enter_table("children");
        table.enter_index(0);
        table.enter_table("children");
        table.enter_index(0);
        table.enter_table("objects");
        table.enter_index(0);
        table.set_string("type", "particles");
        for _ in 0..7 {
            table.exit_table();
        }

        let err = load_document(&mut table, &ResolveAll).unwrap_err();
        assert_eq!(
            err,
            ScriptError::UnknownTypeTag {
                table: "object".into(),
                tag: "particles".into(),
            }
        );
    }
}
