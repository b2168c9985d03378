//! Duplicate-name generation.

use super::document::Document;

/// Which names a duplicate-name search must not collide with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameScope {
    /// Names of all layers and groups in the document.
    Layers,
    /// Names of all game objects in the document.
    Objects,
}

/// Splits a name into its duplication base and the first candidate
/// suffix number: `"<base> copy <n>"` parses to `(base, n)`,
/// `"<base> copy"` to `(base, 1)`, anything else to `(name, 0)`.
/// A suffix of 0 renders as a bare `"<base> copy"`.
fn parse_copy_suffix(name: &str) -> (&str, u64) {
    if let Some(base) = name.strip_suffix(" copy") {
        return (base, 1);
    }
    if let Some((head, tail)) = name.rsplit_once(' ')
        && let Ok(n) = tail.parse::<u64>()
        && let Some(base) = head.strip_suffix(" copy")
    {
        return (base, n);
    }
    (name, 0)
}

fn render_candidate(base: &str, n: u64) -> String {
    if n == 0 {
        format!("{base} copy")
    } else {
        format!("{base} copy {n}")
    }
}

impl Document {
    /// Picks a free name for a duplicate of `name`.
    ///
    /// The trailing `"copy"` / `"copy <n>"` pattern is parsed off and the
    /// smallest unused suffix at or above the parsed one is chosen, so
    /// duplicating `"Sprite"` yields `"Sprite copy"`, duplicating that
    /// yields `"Sprite copy 1"` (or higher), and so on. Always
    /// terminates: the suffix search space is unbounded.
    pub fn generate_duplicate_name(&self, name: &str, scope: NameScope) -> String {
        let (base, mut n) = parse_copy_suffix(name);
        loop {
            let candidate = render_candidate(base, n);
            if !self.name_in_use(&candidate, scope) {
                return candidate;
            }
            n += 1;
        }
    }

    fn name_in_use(&self, candidate: &str, scope: NameScope) -> bool {
        let tree = self.tree();
        match scope {
            NameScope::Layers => tree
                .descendants(self.root())
                .iter()
                .filter_map(|&id| tree.node(id))
                .any(|node| node.name == candidate),
            NameScope::Objects => tree
                .descendants(self.root())
                .iter()
                .filter_map(|&id| tree.objects(id).ok())
                .flatten()
                .any(|object| object.name() == candidate),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec2;
    use crate::resource::ResolveAll;

    #[test]
    fn parse_suffixes() {
        assert_eq!(parse_copy_suffix("Sprite"), ("Sprite", 0));
        assert_eq!(parse_copy_suffix("Sprite copy"), ("Sprite", 1));
        assert_eq!(parse_copy_suffix("Sprite copy 7"), ("Sprite", 7));
        // "copy" must be a suffix word, not part of the base.
        assert_eq!(parse_copy_suffix("copycat"), ("copycat", 0));
        assert_eq!(parse_copy_suffix("a copy b"), ("a copy b", 0));
    }

    #[test]
    fn first_duplicate_gets_bare_copy() {
        let mut doc = Document::new();
        doc.create_sprite(Vec2::zeros(), Vec2::new(1.0, 1.0), "a.png", &ResolveAll)
            .unwrap();
        let name = doc.generate_duplicate_name("Sprite 1", NameScope::Objects);
        assert_eq!(name, "Sprite 1 copy");
    }

    #[test]
    fn suffix_counts_up_past_taken_names() {
        let mut doc = Document::new();
        let id = doc
            .create_sprite(Vec2::zeros(), Vec2::new(1.0, 1.0), "a.png", &ResolveAll)
            .unwrap();
        doc.object_mut(id).unwrap().set_name("Thing copy");
        // "Thing copy" exists, so duplicating it starts at 1.
        assert_eq!(
            doc.generate_duplicate_name("Thing copy", NameScope::Objects),
            "Thing copy 1"
        );
    }

    #[test]
    fn layer_scope_scans_layer_names() {
        let doc = Document::new();
        assert_eq!(
            doc.generate_duplicate_name("Layer 1", NameScope::Layers),
            "Layer 1 copy"
        );
    }
}
