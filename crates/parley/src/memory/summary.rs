//! Derived context summaries for prompt injection.
//!
//! [`build_summary`] folds the tail of a turn list into a bounded text block
//! that the prompt assembler injects ahead of the user's next message. It is
//! a pure function of its inputs — no clock, no store access — so identical
//! turn lists always render identically.

use crate::Turn;

/// Header line prefixed to every non-empty summary block.
pub const SUMMARY_HEADER: &str = "Previous conversation context:";

/// Per-turn content cap; longer content is cut and marked with an ellipsis.
pub const PER_TURN_MAX_CHARS: usize = 200;

/// Marker appended wherever content was cut.
pub const TRUNCATION_MARKER: &str = "...";

/// Render the last `window` turns into a summary block of at most
/// `max_chars` characters.
///
/// Each turn becomes a line `"<Role>: <content>"` in chronological order,
/// with content cut at [`PER_TURN_MAX_CHARS`] characters. If the assembled
/// block exceeds `max_chars`, it is cut at the block level — the tail of the
/// block, not a specific turn, loses out — to exactly `max_chars` characters
/// ending in [`TRUNCATION_MARKER`]. `max_chars` is assumed to exceed the
/// marker length.
///
/// Empty input yields the empty string, not the header alone.
pub fn build_summary(turns: &[Turn], window: usize, max_chars: usize) -> String {
    if turns.is_empty() {
        return String::new();
    }

    let start = turns.len().saturating_sub(window);
    let mut block = format!("{SUMMARY_HEADER}\n");
    for turn in &turns[start..] {
        block.push_str(&turn.role.to_string());
        block.push_str(": ");
        block.push_str(&clip(&turn.content, PER_TURN_MAX_CHARS));
        block.push('\n');
    }

    if block.chars().count() > max_chars {
        let keep = max_chars.saturating_sub(TRUNCATION_MARKER.chars().count());
        let mut cut: String = block.chars().take(keep).collect();
        cut.push_str(TRUNCATION_MARKER);
        cut
    } else {
        block
    }
}

/// Cut `content` to `max_chars` characters, appending the marker when it was
/// longer. Character-counted, never byte-indexed.
fn clip(content: &str, max_chars: usize) -> String {
    if content.chars().count() <= max_chars {
        content.to_string()
    } else {
        let mut cut: String = content.chars().take(max_chars).collect();
        cut.push_str(TRUNCATION_MARKER);
        cut
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_turns_yield_empty_string() {
        assert_eq!(build_summary(&[], 5, 8000), "");
    }

    #[test]
    fn renders_role_labeled_lines_in_order() {
        let turns = vec![
            Turn::user("What is borrowing?"),
            Turn::assistant("Borrowing lets you reference data without owning it."),
        ];
        let summary = build_summary(&turns, 5, 8000);

        assert!(summary.starts_with(SUMMARY_HEADER));
        assert!(summary.contains("User: What is borrowing?"));
        assert!(summary.contains("Assistant: Borrowing lets you"));
        let user_pos = summary.find("User:").unwrap();
        let assistant_pos = summary.find("Assistant:").unwrap();
        assert!(user_pos < assistant_pos);
    }

    #[test]
    fn only_last_window_turns_included() {
        let turns: Vec<Turn> = (0..8).map(|i| Turn::user(format!("message {i}"))).collect();
        let summary = build_summary(&turns, 5, 8000);

        assert!(!summary.contains("message 2"));
        assert!(summary.contains("message 3"));
        assert!(summary.contains("message 7"));
    }

    #[test]
    fn window_larger_than_input_takes_all() {
        let turns = vec![Turn::user("only one")];
        let summary = build_summary(&turns, 5, 8000);
        assert!(summary.contains("only one"));
    }

    #[test]
    fn long_turn_content_clipped_with_ellipsis() {
        let turns = vec![Turn::user("x".repeat(500))];
        let summary = build_summary(&turns, 5, 8000);

        let line = summary.lines().nth(1).unwrap();
        assert_eq!(line, format!("User: {}{TRUNCATION_MARKER}", "x".repeat(200)));
    }

    #[test]
    fn block_truncated_to_exactly_max_chars() {
        let turns: Vec<Turn> = (0..5).map(|_| Turn::user("y".repeat(200))).collect();
        let max = 300;
        let summary = build_summary(&turns, 5, max);

        assert_eq!(summary.chars().count(), max);
        assert!(summary.ends_with(TRUNCATION_MARKER));
        assert!(summary.starts_with(SUMMARY_HEADER));
    }

    #[test]
    fn block_under_budget_not_truncated() {
        let turns = vec![Turn::user("short")];
        let summary = build_summary(&turns, 5, 8000);
        assert!(!summary.ends_with(TRUNCATION_MARKER));
    }

    #[test]
    fn deterministic_for_identical_input() {
        let turns = vec![Turn::user("same"), Turn::assistant("input")];
        assert_eq!(
            build_summary(&turns, 5, 8000),
            build_summary(&turns, 5, 8000)
        );
    }

    #[test]
    fn multibyte_content_counted_in_chars() {
        // Each '日' is 3 bytes; a byte-indexed cut would panic or overshoot.
        let turns = vec![Turn::user("日".repeat(300))];
        let summary = build_summary(&turns, 5, 8000);
        let line = summary.lines().nth(1).unwrap();
        assert_eq!(
            line.chars().count(),
            "User: ".chars().count() + 200 + TRUNCATION_MARKER.chars().count()
        );
    }
}
