//! Public API types re-used by external crates (e.g., the HTTP API layer).

use rag_store::SearchHit;
use serde::Serialize;

/// A passage that was selected as context, in rank order.
///
/// # Example
/// ```
/// use contextor::ContextPassage;
/// let c = ContextPassage {
///     id: "rel-12".into(),
///     text: "Deploy across multiple Availability Zones.".into(),
///     source_reference: "reliability-pillar.md".into(),
///     score: 0.91,
/// };
/// assert!(c.score > 0.0);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ContextPassage {
    pub id: String,
    pub text: String,
    pub source_reference: String,
    pub score: f32,
}

impl From<&SearchHit> for ContextPassage {
    fn from(h: &SearchHit) -> Self {
        Self {
            id: h.passage.id.clone(),
            text: h.passage.text.clone(),
            source_reference: h.passage.source_reference.clone(),
            score: h.score,
        }
    }
}

/// Final answer together with its cited sources and the exact context given to the model.
#[derive(Clone, Debug, Serialize)]
pub struct QaAnswer {
    pub answer: String,
    /// Distinct source references, in rank order.
    pub sources: Vec<String>,
    pub context: Vec<ContextPassage>,
}

/// Distinct `source_reference`s of `context`, first occurrence wins.
pub fn cited_sources(context: &[ContextPassage]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for c in context {
        if !out.iter().any(|s| s == &c.source_reference) {
            out.push(c.source_reference.clone());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cp(id: &str, src: &str) -> ContextPassage {
        ContextPassage {
            id: id.into(),
            text: "t".into(),
            source_reference: src.into(),
            score: 0.5,
        }
    }

    #[test]
    fn sources_are_deduplicated_in_rank_order() {
        let ctx = vec![cp("1", "b.md"), cp("2", "a.md"), cp("3", "b.md")];
        assert_eq!(cited_sources(&ctx), vec!["b.md", "a.md"]);
    }

    #[test]
    fn answer_serializes_expected_fields() {
        let qa = QaAnswer {
            answer: "Use Auto Scaling groups.".into(),
            sources: vec!["performance.md".into()],
            context: vec![cp("1", "performance.md")],
        };
        let v = serde_json::to_value(&qa).unwrap();
        assert_eq!(v["sources"][0], "performance.md");
        assert_eq!(v["context"][0]["source_reference"], "performance.md");
    }
}
