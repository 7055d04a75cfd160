use crate::analyzer::TextAnalysis;

/// Render an analysis as the plain-text block shown to the user.
///
/// Exactly two fact lines are always emitted; a missing fact leaves its
/// line empty and facts past the second are dropped.
pub fn format_analysis(analysis: &TextAnalysis) -> String {
    let fact = |index: usize| analysis.facts.get(index).map(String::as_str).unwrap_or("");

    format!(
        "{}\n\nKey Facts:\n1. {}\n2. {}\n\nSummary:\n{}",
        analysis.title,
        fact(0),
        fact(1),
        analysis.summary
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analysis(title: &str, facts: &[&str], summary: &str) -> TextAnalysis {
        TextAnalysis {
            title: title.to_string(),
            facts: facts.iter().map(|f| f.to_string()).collect(),
            summary: summary.to_string(),
        }
    }

    #[test]
    fn test_format_full_analysis() {
        let output = format_analysis(&analysis("T", &["F1", "F2"], "S"));
        assert_eq!(output, "T\n\nKey Facts:\n1. F1\n2. F2\n\nSummary:\nS");
    }

    #[test]
    fn test_missing_facts_leave_empty_slots() {
        assert_eq!(
            format_analysis(&analysis("T", &["F1"], "S")),
            "T\n\nKey Facts:\n1. F1\n2. \n\nSummary:\nS"
        );
        assert_eq!(
            format_analysis(&analysis("Untitled", &[], "")),
            "Untitled\n\nKey Facts:\n1. \n2. \n\nSummary:\n"
        );
    }

    #[test]
    fn test_extra_facts_are_dropped() {
        let output = format_analysis(&analysis("T", &["F1", "F2", "F3"], "S"));
        assert!(!output.contains("F3"));
    }
}
