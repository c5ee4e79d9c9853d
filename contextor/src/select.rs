//! Source-cap deduplication of ranked candidates.

use std::collections::{HashMap, HashSet};

use rag_store::SearchHit;

/// Picks up to `top_k` hits with at most `cap` per `source_reference`.
///
/// `hits` must be in rank order (best first). Pass 1 takes the best hit of each
/// distinct source; pass 2 backfills in rank order while the source is below
/// `cap`. The result is re-sorted by score, ties by store insertion order.
pub fn cap_per_source(hits: &[SearchHit], top_k: usize, cap: usize) -> Vec<SearchHit> {
    let cap = cap.max(1);
    let mut picked: Vec<&SearchHit> = Vec::with_capacity(top_k.min(hits.len()));
    let mut taken: HashSet<usize> = HashSet::new();
    let mut per_source: HashMap<&str, usize> = HashMap::new();

    for h in hits {
        if picked.len() >= top_k {
            break;
        }
        let src = h.passage.source_reference.as_str();
        if !per_source.contains_key(src) {
            per_source.insert(src, 1);
            taken.insert(h.position);
            picked.push(h);
        }
    }

    for h in hits {
        if picked.len() >= top_k {
            break;
        }
        if taken.contains(&h.position) {
            continue;
        }
        let n = per_source
            .entry(h.passage.source_reference.as_str())
            .or_insert(0);
        if *n < cap {
            *n += 1;
            taken.insert(h.position);
            picked.push(h);
        }
    }

    let mut out: Vec<SearchHit> = picked.into_iter().cloned().collect();
    out.sort_by(|a, b| b.score.total_cmp(&a.score).then(a.position.cmp(&b.position)));
    out
}
