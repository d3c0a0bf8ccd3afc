use serde_json::{json, Value};


pub const SYSTEM_PROMPT: &str = r#"You run the Dating Frequency Experiment analysis protocol.
From a person's core truth and their answers to the protocol questions, profile
the kind of partner they are subconsciously seeking right now.

Always respond with valid JSON."#;


pub fn build_insight_prompt(answers: &[String], core_truth: &str) -> String {
    format!(
        r#"CORE TRUTH: "{core_truth}"

ANSWERS TO THE PROTOCOL QUESTIONS:
{answers}

Based on these semantic inputs, provide a psychological profile of what kind of
partner they are subconsciously seeking.

Respond with JSON:
{{
  "archetype": "2-3 word name for their current vibe (e.g. 'The Stoic Architect')",
  "summary": "1-sentence summary of their current frequency",
  "seeking": "who they are REALLY searching for right now",
  "shadow": "a trait they are likely suppressing but need in a partner"
}}"#,
        answers = answers.join("\n")
    )
}


pub fn response_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "archetype": { "type": "string" },
            "summary": { "type": "string" },
            "seeking": { "type": "string" },
            "shadow": { "type": "string" }
        },
        "required": ["archetype", "summary", "seeking", "shadow"]
    })
}
