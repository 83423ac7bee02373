//! Deciding whether a critique approves the draft.
//!
//! Two rules exist:
//! - **legacy**: the critique contains `APPROVE` (case-sensitive) and its
//!   lowercase form contains no `not` anywhere. "This is not bad, APPROVE"
//!   is therefore a rejection, and so is "APPROVE, nothing to add".
//! - **structured**: a `VERDICT: APPROVED` / `VERDICT: NEEDS_REVISION` line
//!   decides. A critique without such a line is judged by the legacy rule.

use scribeloop_core::ApprovalMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Approved,
    NeedsRevision,
}

impl Verdict {
    /// Judge a critique under `mode`.
    pub fn from_critique(critique: &str, mode: ApprovalMode) -> Self {
        let approved = match mode {
            ApprovalMode::Legacy => legacy_approves(critique),
            ApprovalMode::Structured => match Self::parse_line(critique) {
                Some(verdict) => verdict == Verdict::Approved,
                None => legacy_approves(critique),
            },
        };

        if approved {
            Verdict::Approved
        } else {
            Verdict::NeedsRevision
        }
    }

    /// Find the first well-formed `VERDICT:` line.
    ///
    /// Markdown emphasis around the line is tolerated (`**VERDICT: APPROVED**`).
    pub fn parse_line(critique: &str) -> Option<Self> {
        critique.lines().find_map(|line| {
            let line = line.trim().trim_matches(|c: char| c == '*' || c == '#' || c == '_' || c == ' ');
            let (key, value) = line.split_once(':')?;
            if !key.trim().eq_ignore_ascii_case("verdict") {
                return None;
            }

            let value = value
                .trim()
                .trim_matches(|c: char| c == '*' || c == '.' || c == '`')
                .to_ascii_uppercase()
                .replace([' ', '-'], "_");

            match value.as_str() {
                "APPROVED" | "APPROVE" => Some(Verdict::Approved),
                "NEEDS_REVISION" | "NEEDS_REVISIONS" => Some(Verdict::NeedsRevision),
                _ => None,
            }
        })
    }

    pub fn is_approved(&self) -> bool {
        *self == Verdict::Approved
    }
}

/// The substring rule: `APPROVE` present, `not` absent (case-insensitive).
pub fn legacy_approves(critique: &str) -> bool {
    critique.contains("APPROVE") && !critique.to_lowercase().contains("not")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_rule() {
        assert!(legacy_approves("APPROVE, great work"));
        assert!(legacy_approves("Looks good.\n\nAPPROVE"));
        assert!(!legacy_approves("needs more sources"));
        assert!(!legacy_approves("approve"));
        // Known false negatives of the substring rule.
        assert!(!legacy_approves("This is not bad, APPROVE"));
        assert!(!legacy_approves("APPROVE. Nothing else to add."));
    }

    #[test]
    fn parses_verdict_lines() {
        assert_eq!(Verdict::parse_line("VERDICT: APPROVED\nGreat."), Some(Verdict::Approved));
        assert_eq!(
            Verdict::parse_line("Verdict: needs revision\n- add sources"),
            Some(Verdict::NeedsRevision)
        );
        assert_eq!(Verdict::parse_line("**VERDICT: APPROVED**"), Some(Verdict::Approved));
        assert_eq!(
            Verdict::parse_line("Intro line\nVERDICT: NEEDS_REVISION"),
            Some(Verdict::NeedsRevision)
        );
        assert_eq!(Verdict::parse_line("VERDICT: maybe"), None);
        assert_eq!(Verdict::parse_line("APPROVE"), None);
    }

    #[test]
    fn structured_line_overrides_substring_rule() {
        let approved_with_not = "VERDICT: APPROVED\nNot much to change, nice work.";
        assert_eq!(
            Verdict::from_critique(approved_with_not, ApprovalMode::Structured),
            Verdict::Approved
        );
        assert_eq!(
            Verdict::from_critique(approved_with_not, ApprovalMode::Legacy),
            Verdict::NeedsRevision
        );

        let rejected_with_approve = "VERDICT: NEEDS_REVISION\nFix the intro, then I will APPROVE.";
        assert_eq!(
            Verdict::from_critique(rejected_with_approve, ApprovalMode::Structured),
            Verdict::NeedsRevision
        );
    }

    #[test]
    fn structured_falls_back_to_legacy_without_verdict_line() {
        assert!(Verdict::from_critique("APPROVE, great work", ApprovalMode::Structured).is_approved());
        assert!(!Verdict::from_critique("needs more sources", ApprovalMode::Structured).is_approved());
        assert!(
            !Verdict::from_critique("This is not bad, APPROVE", ApprovalMode::Structured)
                .is_approved()
        );
    }
}
