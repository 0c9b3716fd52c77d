//! Outbound prompt assembly.
//!
//! [`assemble`] composes the final upstream prompt from, in fixed order: the
//! mode's static instructions, the conversation-context block, optional
//! retrieved/auxiliary text, and the literal user input, separated by blank
//! lines with empty sections skipped.
//!
//! Under the character budget the user's input has inviolable priority: when
//! the assembled prompt is too long, the middle sections (context, then
//! retrieved text) are clipped and the truncation marker placed at the cut,
//! with the input intact at the end. Only when instructions plus input alone
//! exceed the budget does the whole string get cut to exactly `max_chars`
//! ending in the marker.

/// Marker placed wherever prompt content was cut.
pub const TRUNCATION_MARKER: &str = "[Message truncated for processing]";

/// Assemble the outbound prompt under a character budget.
///
/// `max_chars` comes from the mode's [`PromptDepth`](crate::modes::PromptDepth)
/// tier; the assembler takes it as a parameter and makes no tier decision of
/// its own.
pub fn assemble(
    mode_instructions: &str,
    context_block: &str,
    retrieved_text: &str,
    user_input: &str,
    max_chars: usize,
) -> String {
    let full = join_sections(&[mode_instructions, context_block, retrieved_text, user_input]);
    if full.chars().count() <= max_chars {
        return full;
    }

    // Over budget. The input is never the section that gets cut: reserve the
    // instructions, the marker, and the input, then clip the middle to
    // whatever room remains.
    let head_chars = if mode_instructions.is_empty() {
        0
    } else {
        mode_instructions.chars().count() + 2
    };
    let frame_chars =
        head_chars + TRUNCATION_MARKER.chars().count() + 2 + user_input.chars().count();
    let available = max_chars.saturating_sub(frame_chars);

    let middle = join_sections(&[context_block, retrieved_text]);
    let clipped: String = middle.chars().take(available).collect();

    let mut out = String::new();
    if !mode_instructions.is_empty() {
        out.push_str(mode_instructions);
        out.push_str("\n\n");
    }
    out.push_str(&clipped);
    out.push_str(TRUNCATION_MARKER);
    out.push_str("\n\n");
    out.push_str(user_input);

    if out.chars().count() > max_chars {
        // Even instructions + input overflow the budget; last resort is a
        // hard cut of the final string.
        let keep = max_chars.saturating_sub(TRUNCATION_MARKER.chars().count());
        let mut cut: String = out.chars().take(keep).collect();
        cut.push_str(TRUNCATION_MARKER);
        return cut;
    }
    out
}

/// Join non-empty sections with blank lines.
fn join_sections(sections: &[&str]) -> String {
    sections
        .iter()
        .filter(|s| !s.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("\n\n")
}
