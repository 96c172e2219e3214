//! Cycle detection for folder reparenting.

use std::collections::HashMap;

use uuid::Uuid;

/// Returns `true` when attaching `folder_id` under `new_parent_id`
/// would create a cycle, i.e. the proposed parent is the folder itself
/// or one of its descendants.
///
/// Walks the ancestor chain of the proposed parent through `links`
/// (folder id → parent id). The walk is bounded by the number of links,
/// so a corrupted tree that already contains a cycle cannot loop
/// forever.
pub fn creates_cycle(
    folder_id: Uuid,
    new_parent_id: Uuid,
    links: &HashMap<Uuid, Option<Uuid>>,
) -> bool {
    if folder_id == new_parent_id {
        return true;
    }

    let mut current = new_parent_id;
    for _ in 0..links.len() {
        match links.get(&current) {
            Some(Some(parent)) => {
                if *parent == folder_id {
                    return true;
                }
                current = *parent;
            }
            _ => return false,
        }
    }

    // Walk exhausted the bound without reaching a root: the chain
    // already contains a cycle. Refuse the move.
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(
        links: &mut HashMap<Uuid, Option<Uuid>>,
        child: Uuid,
        parent: Option<Uuid>,
    ) {
        links.insert(child, parent);
    }

    #[test]
    fn test_move_into_self_is_a_cycle() {
        let folder = Uuid::new_v4();
        assert!(creates_cycle(folder, folder, &HashMap::new()));
    }

    #[test]
    fn test_move_into_own_child_is_a_cycle() {
        let mut links = HashMap::new();
        let parent = Uuid::new_v4();
        let child = Uuid::new_v4();
        link(&mut links, parent, None);
        link(&mut links, child, Some(parent));

        assert!(creates_cycle(parent, child, &links));
    }

    #[test]
    fn test_move_into_deep_descendant_is_a_cycle() {
        let mut links = HashMap::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let c = Uuid::new_v4();
        let d = Uuid::new_v4();
        link(&mut links, a, None);
        link(&mut links, b, Some(a));
        link(&mut links, c, Some(b));
        link(&mut links, d, Some(c));

        assert!(creates_cycle(a, d, &links));
    }

    #[test]
    fn test_move_into_sibling_is_allowed() {
        let mut links = HashMap::new();
        let root = Uuid::new_v4();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        link(&mut links, root, None);
        link(&mut links, a, Some(root));
        link(&mut links, b, Some(root));

        assert!(!creates_cycle(a, b, &links));
    }

    #[test]
    fn test_move_into_ancestor_is_allowed() {
        let mut links = HashMap::new();
        let root = Uuid::new_v4();
        let mid = Uuid::new_v4();
        let leaf = Uuid::new_v4();
        link(&mut links, root, None);
        link(&mut links, mid, Some(root));
        link(&mut links, leaf, Some(mid));

        // Flattening the tree upward is fine.
        assert!(!creates_cycle(leaf, root, &links));
    }

    #[test]
    fn test_unknown_parent_is_allowed() {
        let folder = Uuid::new_v4();
        let stranger = Uuid::new_v4();
        assert!(!creates_cycle(folder, stranger, &HashMap::new()));
    }

    #[test]
    fn test_pre_existing_cycle_refuses_the_move() {
        let mut links = HashMap::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        link(&mut links, a, Some(b));
        link(&mut links, b, Some(a));

        let folder = Uuid::new_v4();
        links.insert(folder, None);
        assert!(creates_cycle(folder, a, &links));
    }
}
