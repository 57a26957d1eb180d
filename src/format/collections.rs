//! Collection tree listing.

use crate::types::Collection;
use std::collections::HashSet;

/// Returned when the library has no collections.
pub const NO_COLLECTIONS: &str = "No collections found in this library.";

/// Render collections as a nested markdown list.
///
/// Subcollections are indented under their parent. A collection whose parent
/// is missing from `collections` is listed at the top level, as is any
/// collection caught in a parent cycle.
pub fn render_collections(collections: &[Collection]) -> String {
    if collections.is_empty() {
        return NO_COLLECTIONS.to_string();
    }

    let known: HashSet<&str> = collections.iter().map(|c| c.key.as_str()).collect();
    let mut lines = vec![format!("# Collections ({})", collections.len()), String::new()];
    let mut seen = HashSet::new();

    for root in collections.iter().filter(|c| {
        c.parent_collection
            .as_deref()
            .map_or(true, |p| !known.contains(p))
    }) {
        push_subtree(collections, root, 0, &mut seen, &mut lines);
    }

    for rest in collections {
        push_subtree(collections, rest, 0, &mut seen, &mut lines);
    }

    lines.join("\n")
}

fn push_subtree<'a>(
    all: &'a [Collection],
    node: &'a Collection,
    depth: usize,
    seen: &mut HashSet<&'a str>,
    lines: &mut Vec<String>,
) {
    if !seen.insert(node.key.as_str()) {
        return;
    }

    let items = if node.num_items == 1 { "item" } else { "items" };
    lines.push(format!(
        "{}- **{}** (`{}`), {} {}",
        "  ".repeat(depth),
        node.name,
        node.key,
        node.num_items,
        items
    ));

    for child in all
        .iter()
        .filter(|c| c.parent_collection.as_deref() == Some(node.key.as_str()))
    {
        push_subtree(all, child, depth + 1, seen, lines);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collection(key: &str, name: &str, parent: Option<&str>, n: u32) -> Collection {
        Collection {
            key: key.into(),
            name: name.into(),
            parent_collection: parent.map(String::from),
            num_items: n,
        }
    }

    #[test]
    fn test_empty() {
        assert_eq!(render_collections(&[]), NO_COLLECTIONS);
    }

    #[test]
    fn test_nested_tree() {
        let collections = vec![
            collection("C2", "Chapter 1", Some("C1"), 1),
            collection("C1", "Thesis", None, 12),
            collection("C3", "Orphan", Some("GONE"), 0),
        ];
        assert_eq!(
            render_collections(&collections),
            concat!(
                "# Collections (3)\n\n",
                "- **Thesis** (`C1`), 12 items\n",
                "  - **Chapter 1** (`C2`), 1 item\n",
                "- **Orphan** (`C3`), 0 items",
            )
        );
    }

    #[test]
    fn test_parent_cycles_still_listed() {
        let collections = vec![
            collection("A", "Loop A", Some("B"), 1),
            collection("B", "Loop B", Some("A"), 2),
            collection("S", "Self", Some("S"), 0),
        ];
        assert_eq!(
            render_collections(&collections),
            concat!(
                "# Collections (3)\n\n",
                "- **Loop A** (`A`), 1 item\n",
                "  - **Loop B** (`B`), 2 items\n",
                "- **Self** (`S`), 0 items",
            )
        );
    }
}
