

use serde_json::{json, Value};

use super::models::RankingCandidate;


pub const SYSTEM_PROMPT: &str = r#"You score how strongly two people's answers to the same open question resonate with each other.

Resonance means shared values, emotional tone and worldview, not shared wording.
Score every candidate from 0.0 (no resonance) to 1.0 (complete resonance).

Always respond with valid JSON."#;


pub fn build_ranking_prompt(user_answer: &str, candidates: &[RankingCandidate]) -> String {
    let candidates_str = candidates
        .iter()
        .map(|c| format!("ID: {} | Answer: {}", c.id, c.answer))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"USER ANSWER: "{user_answer}"

CANDIDATES:
{candidates_str}

Evaluate how much the USER ANSWER resonates with each CANDIDATE.
Return a JSON array with one entry per candidate ID:
[{{"id": "<candidate id>", "score": 0.0-1.0}}]"#
    )
}


pub fn response_schema() -> Value {
    json!({
        "type": "array",
        "items": {
            "type": "object",
            "properties": {
                "id": { "type": "string" },
                "score": { "type": "number" }
            },
            "required": ["id", "score"]
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_lists_each_candidate() {
        let prompt = build_ranking_prompt(
            "I value trust",
            &[
                RankingCandidate::new("u2", "Loyalty above all"),
                RankingCandidate::new("u3", "Adventure"),
            ],
        );
        assert!(prompt.contains(r#"USER ANSWER: "I value trust""#));
        assert!(prompt.contains("ID: u2 | Answer: Loyalty above all"));
        assert!(prompt.contains("ID: u3 | Answer: Adventure"));
    }

    #[test]
    fn test_schema_requires_id_and_score() {
        let schema = response_schema();
        assert_eq!(schema["type"], "array");
        assert_eq!(schema["items"]["required"], json!(["id", "score"]));
    }
}
