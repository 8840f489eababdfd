/// List-splice-move reorder, shared by every ordered collection in the
/// builder (page placements, section content, the up/down affordance).
///
/// The destination index is interpreted against the post-removal list:
/// moving index 0 to index 2 in `[A,B,C,D]` yields `[B,C,A,D]`.
pub fn compute_reorder<T: Clone>(sequence: &[T], source: usize, dest: usize) -> Vec<T> {
    if is_noop_reorder(sequence.len(), source, dest) {
        return sequence.to_vec();
    }

    let mut reordered = sequence.to_vec();
    let moved = reordered.remove(source);
    reordered.insert(dest, moved);
    reordered
}

/// Guard shared with the sync controller: a no-op reorder must short-circuit
/// before any persistence call is issued.
pub fn is_noop_reorder(len: usize, source: usize, dest: usize) -> bool {
    source >= len || dest >= len || source == dest
}
