//! Builds the nested category forest from a flat listing.
//!
//! The assembler indexes children by parent id in one pass and then walks the
//! forest breadth-first from the roots, so the whole build is O(n). Every record
//! is visited at most once. Records that cannot be reached from a root (members
//! of a parent cycle, self-parented rows, rows whose parent no longer exists)
//! are left out of the forest and reported in [`CategoryForest::unreachable`].
//!
//! Sibling order, and the order of roots, follows the order of the input.

use std::collections::{HashMap, HashSet, VecDeque};

use uuid::Uuid;

use crate::features::categories::dtos::CategoryTreeDto;
use crate::features::categories::models::Category;

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryForest {
    pub roots: Vec<CategoryTreeDto>,
    /// Ids of records not reachable from any root, in input order
    pub unreachable: Vec<Uuid>,
}

impl CategoryForest {
    pub fn node_count(&self) -> usize {
        self.roots.iter().map(CategoryTreeDto::node_count).sum()
    }
}

pub fn assemble(categories: Vec<Category>) -> CategoryForest {
    let total = categories.len();

    let mut roots: Vec<usize> = Vec::new();
    let mut children_of: HashMap<Uuid, Vec<usize>> = HashMap::new();
    for (idx, category) in categories.iter().enumerate() {
        match category.parent_id {
            None => roots.push(idx),
            Some(parent_id) => children_of.entry(parent_id).or_default().push(idx),
        }
    }

    // Breadth-first visit order; parents always precede their children.
    let mut visited = vec![false; total];
    let mut seen_ids: HashSet<Uuid> = HashSet::with_capacity(total);
    let mut order: Vec<usize> = Vec::with_capacity(total);
    let mut queue: VecDeque<usize> = roots.iter().copied().collect();
    while let Some(idx) = queue.pop_front() {
        if visited[idx] || !seen_ids.insert(categories[idx].id) {
            continue;
        }
        visited[idx] = true;
        order.push(idx);
        if let Some(children) = children_of.get(&categories[idx].id) {
            queue.extend(children.iter().copied());
        }
    }

    let unreachable: Vec<Uuid> = categories
        .iter()
        .enumerate()
        .filter(|(idx, _)| !visited[*idx])
        .map(|(_, c)| c.id)
        .collect();

    // Build bottom-up so each node's children are finished before the node itself.
    let mut records: Vec<Option<Category>> = categories.into_iter().map(Some).collect();
    let mut built: Vec<Option<CategoryTreeDto>> = (0..total).map(|_| None).collect();
    for &idx in order.iter().rev() {
        let Some(category) = records[idx].take() else {
            continue;
        };
        let children: Vec<CategoryTreeDto> = children_of
            .get(&category.id)
            .map(|positions| {
                positions
                    .iter()
                    .filter_map(|&child| built[child].take())
                    .collect()
            })
            .unwrap_or_default();
        built[idx] = Some(CategoryTreeDto::from_parts(category, children));
    }

    let roots = roots
        .into_iter()
        .filter_map(|idx| built[idx].take())
        .collect();

    CategoryForest { roots, unreachable }
}
