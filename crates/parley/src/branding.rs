//! Reply branding and model-identity scrubbing.
//!
//! Every relayed reply gets the product signature footer, and any
//! vendor/model identifiers the upstream model leaks about itself are
//! rewritten to the product name. The relay's callers should never learn
//! which upstream model served a request from the reply text.

use std::sync::LazyLock;

use regex::Regex;

/// Signature footer appended to every relayed reply.
pub const SIGNATURE: &str = "\n\n---\n**@ParleyAI** - *Relayed and maintained by Parley*";

static MODEL_NAMES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:gpt|claude|gemini|deepseek|grok|pixtral|openai|anthropic|google|mistral|xai)\b")
        .expect("model-name pattern compiles")
});

static MODEL_DISCLOSURE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:model|api|provider|service)\s+(?:information|details|name)\b")
        .expect("disclosure pattern compiles")
});

/// Replace upstream vendor and model names with the product name.
pub fn scrub_model_info(text: &str) -> String {
    let scrubbed = MODEL_NAMES.replace_all(text, "Parley");
    MODEL_DISCLOSURE
        .replace_all(&scrubbed, "Parley AI capabilities")
        .into_owned()
}

/// Append the signature footer.
pub fn append_signature(text: &str) -> String {
    format!("{text}{SIGNATURE}")
}

/// Full branding pass: scrub first, then sign.
pub fn brand_reply(text: &str) -> String {
    append_signature(&scrub_model_info(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vendor_names_are_scrubbed_case_insensitively() {
        let scrubbed = scrub_model_info("I am Claude, built on GPT technology by OpenAI.");
        assert!(!scrubbed.contains("Claude"));
        assert!(!scrubbed.contains("GPT"));
        assert!(!scrubbed.contains("OpenAI"));
        assert_eq!(scrubbed.matches("Parley").count(), 3);
    }

    #[test]
    fn disclosure_phrases_are_rewritten() {
        let scrubbed = scrub_model_info("I cannot share my model name or provider details.");
        assert!(scrubbed.contains("Parley AI capabilities"));
        assert!(!scrubbed.contains("model name"));
    }

    #[test]
    fn unrelated_text_passes_through() {
        let text = "The gross domestic product grew by 2 percent.";
        assert_eq!(scrub_model_info(text), text);
    }

    #[test]
    fn word_boundaries_respected() {
        // "egptian" must not be mangled by the gpt pattern.
        let text = "An egptian artifact.";
        assert_eq!(scrub_model_info(text), text);
    }

    #[test]
    fn signature_appended_once_at_the_end() {
        let branded = brand_reply("Here is your answer.");
        assert!(branded.starts_with("Here is your answer."));
        assert!(branded.ends_with(SIGNATURE));
        assert_eq!(branded.matches("@ParleyAI").count(), 1);
    }
}
