use std::collections::HashSet;

/// Apply a draft ordering to a baseline collection.
///
/// Entries named by `draft_order` come first, in draft order, with duplicates
/// and ids unknown to the baseline dropped. Every baseline entry the draft does
/// not mention follows in its original relative order.
pub fn order_by_draft<T, F>(baseline: &[T], draft_order: &[String], id_of: F) -> Vec<T>
where
    T: Clone,
    F: Fn(&T) -> &str,
{
    let mut placed: HashSet<&str> = HashSet::with_capacity(baseline.len());
    let mut ordered = Vec::with_capacity(baseline.len());

    for id in draft_order {
        if placed.contains(id.as_str()) {
            continue;
        }
        if let Some(entry) = baseline.iter().find(|entry| id_of(entry) == id) {
            placed.insert(id_of(entry));
            ordered.push(entry.clone());
        }
    }

    ordered.extend(
        baseline
            .iter()
            .filter(|entry| !placed.contains(id_of(entry)))
            .cloned(),
    );
    ordered
}
