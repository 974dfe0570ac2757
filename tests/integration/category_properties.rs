use catalog_admin::category::{Category, CategoryTree, EditOutcome, Parent};
use proptest::prelude::*;
use proptest::sample::Index;

#[derive(Debug, Clone)]
struct Shape {
    name: String,
    children: Vec<Shape>,
}

fn arb_forest() -> impl Strategy<Value = Vec<Shape>> {
    let leaf = "[A-Za-z]{1,8}".prop_map(|name| Shape {
        name,
        children: Vec::new(),
    });
    let node = leaf.prop_recursive(4, 32, 4, |inner| {
        ("[A-Za-z]{1,8}", prop::collection::vec(inner, 0..4))
            .prop_map(|(name, children)| Shape { name, children })
    });
    prop::collection::vec(node, 0..5)
}

/// Materialize shapes with unique sequential ids.
fn build(shapes: &[Shape], next: &mut usize) -> Vec<Category> {
    let mut out = Vec::with_capacity(shapes.len());
    for shape in shapes {
        let id = format!("c{}", *next);
        *next += 1;
        let children = build(&shape.children, next);
        out.push(Category::new(id, shape.name.clone()).with_children(children));
    }
    out
}

fn arb_tree() -> impl Strategy<Value = CategoryTree> {
    arb_forest().prop_map(|shapes| CategoryTree::new(build(&shapes, &mut 0)))
}

fn ids(tree: &CategoryTree) -> Vec<String> {
    tree.walk().into_iter().map(|(_, c)| c.id.clone()).collect()
}

proptest! {
    #[test]
    fn delete_of_absent_id_is_identity(tree in arb_tree()) {
        let edit = tree.delete("not-in-tree");
        prop_assert_eq!(edit.outcome, EditOutcome::NotFound);
        prop_assert_eq!(edit.tree, tree);
    }

    #[test]
    fn insert_then_delete_round_trips(tree in arb_tree(), at in any::<Index>(), name in "[a-z]{1,8}") {
        let all = ids(&tree);
        let parent = if all.is_empty() {
            Parent::Root
        } else {
            Parent::Node(all[at.index(all.len())].clone())
        };
        let inserted = tree.insert(&parent, Category::new("fresh", name));
        prop_assert!(inserted.is_changed());
        prop_assert_eq!(inserted.tree.len(), tree.len() + 1);

        let crumbs = inserted.tree.find_by_id("fresh").unwrap();
        prop_assert_eq!(crumbs.last().map(String::as_str), Some("fresh"));
        if let Parent::Node(parent_id) = &parent {
            prop_assert_eq!(&crumbs[crumbs.len() - 2], parent_id);
        }

        let deleted = inserted.tree.delete("fresh");
        prop_assert_eq!(deleted.tree, tree);
    }

    #[test]
    fn delete_removes_exactly_the_subtree(tree in arb_tree(), at in any::<Index>()) {
        let all = ids(&tree);
        prop_assume!(!all.is_empty());
        let target = &all[at.index(all.len())];
        let removed: Vec<String> = tree
            .get(target)
            .unwrap()
            .subtree_ids()
            .into_iter()
            .map(str::to_string)
            .collect();
        let edit = tree.delete(target);
        prop_assert!(edit.is_changed());
        let remaining = ids(&edit.tree);
        prop_assert_eq!(remaining.len(), all.len() - removed.len());
        for id in &removed {
            prop_assert!(!remaining.contains(id));
        }
    }

    #[test]
    fn filter_keeps_matches_and_their_ancestors(tree in arb_tree(), query in "[a-z]{1,2}") {
        let filtered = tree.filter_by_query(&query);
        let needle = query.to_lowercase();
        for (_, node) in filtered.walk() {
            let original = tree.get(&node.id);
            prop_assert!(original.is_some());
            prop_assert_eq!(&original.unwrap().name, &node.name);
            prop_assert!(
                node.name.to_lowercase().contains(&needle) || !node.children.is_empty(),
                "{} survived without a match", node.name
            );
        }
        for (_, node) in tree.walk() {
            if node.name.to_lowercase().contains(&needle) {
                prop_assert!(filtered.contains(&node.id));
            }
        }
    }

    #[test]
    fn rename_keeps_ids_and_shape(tree in arb_tree(), at in any::<Index>(), name in "[a-z]{1,8}") {
        let all = ids(&tree);
        prop_assume!(!all.is_empty());
        let target = all[at.index(all.len())].clone();
        let edit = tree.rename(&target, &name, None);
        prop_assert!(edit.is_changed());
        prop_assert_eq!(ids(&edit.tree), all);
        prop_assert_eq!(&edit.tree.get(&target).unwrap().name, &name);
        prop_assert_eq!(
            &edit.tree.get(&target).unwrap().children,
            &tree.get(&target).unwrap().children
        );
    }
}
