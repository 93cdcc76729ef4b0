/// Build the flashcard prompt for a fact. The fact is embedded verbatim between double quotes.
pub fn build_flashcard_prompt(fact: &str) -> String {
    format!(
        r#"
You are a flashcard generator.

Return ONLY valid JSON in this exact format:
{{
  "front": "short question or cloze",
  "back": "clear, concise answer"
}}

No extra text. No markdown.

Fact:
"{}"
"#,
        fact
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_fact_in_quotes() {
        let prompt = build_flashcard_prompt("The mitochondria is the powerhouse of the cell");
        assert!(prompt.contains("Fact:\n\"The mitochondria is the powerhouse of the cell\"\n"));
        assert!(prompt.contains("You are a flashcard generator."));
        assert!(prompt.contains("No extra text. No markdown."));
    }

    #[test]
    fn test_prompt_describes_json_shape() {
        let prompt = build_flashcard_prompt("x");
        assert!(prompt.contains("\"front\": \"short question or cloze\""));
        assert!(prompt.contains("\"back\": \"clear, concise answer\""));
        assert!(prompt.contains("{\n  \"front\""));
    }

    #[test]
    fn test_prompt_is_deterministic() {
        assert_eq!(
            build_flashcard_prompt("Rust 1.0 shipped in 2015"),
            build_flashcard_prompt("Rust 1.0 shipped in 2015")
        );
    }

    #[test]
    fn test_fact_is_not_sanitized() {
        let fact = "He said \"hi\" {braces} and\nnewlines";
        let prompt = build_flashcard_prompt(fact);
        assert!(prompt.contains(&format!("\"{}\"", fact)));
    }
}
