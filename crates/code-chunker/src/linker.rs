//! Cross-reference edges between chunks.
//!
//! Matching is name based and deliberately naive: an import edge only needs
//! the chunk name to appear somewhere in an import statement, and a call edge
//! matches either the full callee text or its last member segment
//! (`this.store.save` calls anything named `save`). Relationships are
//! recomputed from scratch on every call, so linking is idempotent.

use crate::types::{Chunk, Relationships};
use std::collections::{BTreeSet, HashMap};

/// Recompute `relationships` for every chunk in the slice
pub fn link_chunks(chunks: &mut [Chunk]) {
    let computed = compute_relationships(chunks);
    for (chunk, relationships) in chunks.iter_mut().zip(computed) {
        chunk.relationships = relationships;
    }
}

fn compute_relationships(chunks: &[Chunk]) -> Vec<Relationships> {
    // Chunks of one file share the same import list.
    let mut by_file: HashMap<&str, Vec<usize>> = HashMap::new();
    let mut by_parent: HashMap<(&str, Option<&str>), Vec<usize>> = HashMap::new();
    let mut by_call: HashMap<&str, BTreeSet<usize>> = HashMap::new();

    for (index, chunk) in chunks.iter().enumerate() {
        by_file.entry(&chunk.file_path).or_default().push(index);
        by_parent
            .entry((&chunk.file_path, chunk.parent_type.as_deref()))
            .or_default()
            .push(index);
        for target in &chunk.calls {
            by_call.entry(target).or_default().insert(index);
            if let Some((_, member)) = target.rsplit_once('.') {
                by_call.entry(member).or_default().insert(index);
            }
        }
    }

    let mut file_groups: Vec<(&[String], &[usize])> = by_file
        .values()
        .map(|indices| {
            (
                chunks[indices[0]].file_context.imports.as_slice(),
                indices.as_slice(),
            )
        })
        .collect();
    // Deterministic iteration regardless of hash order.
    file_groups.sort_by_key(|(_, indices)| indices[0]);

    chunks
        .iter()
        .enumerate()
        .map(|(index, chunk)| {
            let children = by_parent
                .get(&(chunk.file_path.as_str(), chunk.parent_type.as_deref()))
                .into_iter()
                .flatten()
                .copied()
                .filter(|other| *other != index && chunks[*other].depth > chunk.depth);

            if chunk.is_anonymous() {
                return Relationships {
                    children: ids_in_order(chunks, children),
                    ..Relationships::default()
                };
            }

            let name = chunk.name.as_str();
            let imported_by = file_groups
                .iter()
                .filter(|(imports, _)| imports.iter().any(|import| import.contains(name)))
                .flat_map(|(_, indices)| indices.iter().copied())
                .filter(|other| *other != index);

            let called_by = by_call
                .get(name)
                .into_iter()
                .flatten()
                .copied()
                .filter(|other| *other != index);

            Relationships {
                imported_by: ids_in_order(chunks, imported_by),
                called_by: ids_in_order(chunks, called_by),
                children: ids_in_order(chunks, children),
            }
        })
        .collect()
}

/// Ids of the given chunk indices, in chunk-list order, without duplicates
fn ids_in_order(chunks: &[Chunk], indices: impl Iterator<Item = usize>) -> Vec<String> {
    let ordered: BTreeSet<usize> = indices.collect();
    let mut seen = BTreeSet::new();
    ordered
        .into_iter()
        .map(|index| &chunks[index].id)
        .filter(|id| seen.insert(id.as_str()))
        .cloned()
        .collect()
}
