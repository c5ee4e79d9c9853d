//! Prompt builders: short system messages plus a compact, budgeted context block.

use crate::api_types::ContextPassage;

/// System instructions for answers grounded in Well-Architected Framework passages.
pub const DEFAULT_SYSTEM: &str = r#"
You are an AWS Well-Architected Framework advisor. Answer from the provided context,
cite the source documents you relied on, and say so when the context does not cover the question.
"#;

/// System instructions for the code generation endpoint.
pub const CODE_SYSTEM: &str = r#"
You are an expert Python programmer who has mastered the Diagrams library and AWS.
Return only code, with no explanation, as it will be run by a program.
"#;

/// Build the user prompt: question, then ranked context within `max_chars`.
///
/// Each passage gets a header with its rank, source and score. The passage that
/// crosses the budget is truncated on a char boundary and nothing follows it.
///
/// # Example
/// ```
/// use contextor::prompt::build_user_prompt;
/// let prompt = build_user_prompt("How do I design for high availability?", &[], 2000);
/// assert!(prompt.contains("Question:"));
/// ```
pub fn build_user_prompt(question: &str, context: &[ContextPassage], max_chars: usize) -> String {
    let mut out = String::new();
    out.push_str("Question:\n");
    out.push_str(question.trim());
    out.push_str("\n\n");

    if !context.is_empty() {
        out.push_str("Context (top-ranked):\n");
        let mut budget = max_chars;

        for (i, c) in context.iter().enumerate() {
            let header = format!(
                "==[{}]== {} (score {:.3})\n",
                i + 1,
                c.source_reference,
                c.score
            );
            let text = c.text.trim();

            if header.len() >= budget {
                break;
            }
            out.push_str(&header);
            budget -= header.len();

            let take = budget.saturating_sub(2);
            if text.len() > take {
                out.push_str(safe_truncate(text, take));
                out.push_str("\n...\n");
                break;
            }
            out.push_str(text);
            out.push('\n');
            budget -= text.len() + 1;
        }
        out.push('\n');
        out.push_str("Answer using only the context above when possible, and cite its sources.\n");
    }

    out
}

fn safe_truncate(s: &str, max: usize) -> &str {
    if s.len() <= max {
        s
    } else {
        let mut end = max;
        while end > 0 && !s.is_char_boundary(end) {
            end -= 1;
        }
        &s[..end]
    }
}
