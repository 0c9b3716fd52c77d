//! Conversation mode registry.
//!
//! Each mode is a data record — instructions, default model, prompt-budget
//! depth — looked up by name. Adding a mode means adding a table row, not a
//! branch.

/// Prompt budget tier: research/coding-style modes get a much larger
/// assembled-prompt budget than conversational ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptDepth {
    Standard,
    Deep,
}

impl PromptDepth {
    /// Maximum assembled-prompt length in characters for this tier.
    pub fn max_prompt_chars(self) -> usize {
        match self {
            PromptDepth::Standard => 8_000,
            PromptDepth::Deep => 50_000,
        }
    }
}

/// A conversation mode's static configuration.
#[derive(Debug, Clone, Copy)]
pub struct ModeSpec {
    /// Registry key.
    pub name: &'static str,
    /// Static instruction block injected at the top of every prompt.
    pub instructions: &'static str,
    /// Model used when the caller requests `"auto"`.
    pub default_model: &'static str,
    /// Prompt budget tier.
    pub depth: PromptDepth,
}

/// Model sentinel meaning "let the mode pick".
pub const AUTO_MODEL: &str = "auto";

/// Name of the fallback mode used for unknown mode strings.
pub const GENERAL_MODE: &str = "general";

/// The mode table. Order is presentation order only; lookup is by name.
pub const MODES: &[ModeSpec] = &[
    ModeSpec {
        name: "general",
        instructions: "You are Parley, a helpful and intelligent assistant.",
        default_model: "gpt-4o-mini",
        depth: PromptDepth::Standard,
    },
    ModeSpec {
        name: "friend",
        instructions: "You are a friendly, casual AI assistant. Respond in a warm, \
                       conversational tone with humor and empathy.",
        default_model: "claude-3.5-haiku",
        depth: PromptDepth::Standard,
    },
    ModeSpec {
        name: "search",
        instructions: "You are a research assistant with real-time web search \
                       capabilities. Provide detailed, well-researched information \
                       with sources and real-time data. When possible, include \
                       current events, latest updates, and fact-checked information.",
        default_model: "grok-3",
        depth: PromptDepth::Deep,
    },
    ModeSpec {
        name: "coding",
        instructions: "You are a programming expert. Provide code examples, \
                       explanations, debugging help, and best practices.",
        default_model: "deepseek-r1-0528",
        depth: PromptDepth::Deep,
    },
    ModeSpec {
        name: "math",
        instructions: "You are a mathematics expert. Solve problems step-by-step \
                       with clear explanations and show your work.",
        default_model: "o3-medium",
        depth: PromptDepth::Standard,
    },
    ModeSpec {
        name: "codesearch",
        instructions: "You are a specialized programming search assistant. Help find \
                       code solutions, libraries, frameworks, and programming resources.",
        default_model: "deepseek-r1-0528",
        depth: PromptDepth::Deep,
    },
    ModeSpec {
        name: "procoder",
        instructions: "You are Parley Pro Coder, an elite programming expert. Provide \
                       advanced solutions, optimizations, and enterprise-level coding \
                       practices.",
        default_model: "deepseek-r1-0528",
        depth: PromptDepth::Deep,
    },
    ModeSpec {
        name: "image",
        instructions: "You are an AI art creator. Help with image generation prompts, \
                       creative descriptions, and visual concepts.",
        default_model: "pixtral-12b",
        depth: PromptDepth::Standard,
    },
];

/// Look up a mode by name. Unknown names fall back to the `general` mode —
/// an unrecognized mode is a degraded request, not an error.
pub fn mode_spec(name: &str) -> &'static ModeSpec {
    MODES
        .iter()
        .find(|m| m.name == name)
        .or_else(|| MODES.iter().find(|m| m.name == GENERAL_MODE))
        .expect("mode table always contains the general mode")
}

/// Resolve the model to call: `"auto"` maps to the mode's default, anything
/// else passes through untouched.
pub fn resolve_model<'a>(requested: &'a str, mode: &ModeSpec) -> &'a str {
    if requested == AUTO_MODEL {
        mode.default_model
    } else {
        requested
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_modes_resolve() {
        assert_eq!(mode_spec("coding").name, "coding");
        assert_eq!(mode_spec("friend").default_model, "claude-3.5-haiku");
        assert_eq!(mode_spec("math").default_model, "o3-medium");
    }

    #[test]
    fn unknown_mode_falls_back_to_general() {
        let spec = mode_spec("hacker");
        assert_eq!(spec.name, GENERAL_MODE);
        assert_eq!(spec.default_model, "gpt-4o-mini");
    }

    #[test]
    fn deep_modes_get_larger_budget() {
        for name in ["search", "coding", "procoder", "codesearch"] {
            assert_eq!(mode_spec(name).depth, PromptDepth::Deep, "{name}");
        }
        for name in ["general", "friend", "math", "image"] {
            assert_eq!(mode_spec(name).depth, PromptDepth::Standard, "{name}");
        }
        assert_eq!(PromptDepth::Deep.max_prompt_chars(), 50_000);
        assert_eq!(PromptDepth::Standard.max_prompt_chars(), 8_000);
    }

    #[test]
    fn auto_model_uses_mode_default() {
        let coding = mode_spec("coding");
        assert_eq!(resolve_model("auto", coding), "deepseek-r1-0528");
        assert_eq!(resolve_model("grok-3", coding), "grok-3");
    }

    #[test]
    fn mode_names_unique() {
        for (i, a) in MODES.iter().enumerate() {
            for b in &MODES[i + 1..] {
                assert_ne!(a.name, b.name);
            }
        }
    }
}
