use multiclient_common::{Selection, SelectionPolicy};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::worker::Eligible;

/// Indices of workers eligible for a request, ascending.
///
/// A worker is a candidate when it is alive and, if the request requires
/// full history, archival.
pub fn candidates<W: Eligible>(workers: &[W], archival_required: bool) -> Vec<usize> {
    workers
        .iter()
        .enumerate()
        .filter(|(_, w)| w.is_alive())
        .filter(|(_, w)| !archival_required || w.is_archival())
        .map(|(index, _)| index)
        .collect()
}

/// Picks the workers a request is routed to.
///
/// Pure: reads `workers`, draws from `rng`, mutates nothing else. An empty
/// result means no eligible route; callers must fail the request rather than
/// treat it as success with zero workers.
///
/// - `Broadcast`: every candidate, ascending
/// - `Single(Some(i))`: `[i]` if `i` is a candidate, otherwise empty; a
///   pinned liteserver is never substituted
/// - `Single(None)`: one candidate, uniformly at random
/// - `MultipleIndices`: the requested indices that are candidates, ascending
/// - `MultipleCount(n)`: `min(n, candidates)` distinct random candidates
pub fn select_workers<W, R>(workers: &[W], selection: &Selection, rng: &mut R) -> Vec<usize>
where
    W: Eligible,
    R: Rng + ?Sized,
{
    let mut candidates = candidates(workers, selection.archival_required);
    if candidates.is_empty() {
        return candidates;
    }

    match &selection.policy {
        SelectionPolicy::Broadcast => candidates,
        SelectionPolicy::Single(Some(index)) => {
            if candidates.binary_search(index).is_ok() {
                vec![*index]
            } else {
                Vec::new()
            }
        }
        SelectionPolicy::Single(None) => candidates.choose(rng).copied().into_iter().collect(),
        SelectionPolicy::MultipleIndices(requested) => candidates
            .into_iter()
            .filter(|index| requested.contains(index))
            .collect(),
        SelectionPolicy::MultipleCount(count) => {
            candidates.shuffle(rng);
            candidates.truncate(*count);
            candidates
        }
    }
}
