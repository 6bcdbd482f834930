//! Validation logic for weave drafts
//!
//! Provides advisory checks beyond structural construction: loom capacity
//! ceilings and draft completeness. Results are ordered, human-readable
//! violations; callers decide whether a non-empty result blocks an
//! operation. The drawdown engine itself never re-validates.

use crate::models::Draft;

/// Severity of a validation issue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Warning => write!(f, "WARNING"),
        }
    }
}

/// Type of validation issue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueType {
    /// Harness count exceeds loom capacity
    HarnessCapacity,
    /// Treadle count exceeds loom capacity
    TreadleCapacity,
    /// Warp count exceeds loom capacity
    WarpCapacity,
    /// Weft count exceeds loom capacity
    WeftCapacity,
    /// Tie-up has no set bits
    EmptyTieUp,
    /// Threading entry indexes a harness that doesn't exist
    ThreadingRange,
    /// Treadling entry indexes a treadle that doesn't exist
    TreadlingRange,
}

impl std::fmt::Display for IssueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IssueType::HarnessCapacity => write!(f, "harness_capacity"),
            IssueType::TreadleCapacity => write!(f, "treadle_capacity"),
            IssueType::WarpCapacity => write!(f, "warp_capacity"),
            IssueType::WeftCapacity => write!(f, "weft_capacity"),
            IssueType::EmptyTieUp => write!(f, "empty_tie_up"),
            IssueType::ThreadingRange => write!(f, "threading_range"),
            IssueType::TreadlingRange => write!(f, "treadling_range"),
        }
    }
}

/// A validation issue found in a draft
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Severity of the issue
    pub severity: Severity,
    /// Type of issue
    pub issue_type: IssueType,
    /// Human-readable message describing the issue
    pub message: String,
}

impl ValidationIssue {
    fn error(issue_type: IssueType, message: impl Into<String>) -> Self {
        Self { severity: Severity::Error, issue_type, message: message.into() }
    }

    fn warning(issue_type: IssueType, message: impl Into<String>) -> Self {
        Self { severity: Severity::Warning, issue_type, message: message.into() }
    }
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)
    }
}

/// Validate a draft against its loom capacity and completeness invariants.
///
/// Checks run in a fixed order: harness capacity, treadle capacity, warp
/// capacity, weft capacity, tie-up emptiness, threading range, treadling
/// range. The range checks report only the first offending position and
/// stop - they exist to make the draft rejectable, not to enumerate every
/// bad cell.
pub fn validate_draft(draft: &Draft) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if draft.harness_count > draft.loom.max_harnesses {
        issues.push(ValidationIssue::error(
            IssueType::HarnessCapacity,
            format!(
                "draft uses {} harnesses but the loom has {}",
                draft.harness_count, draft.loom.max_harnesses
            ),
        ));
    }

    if draft.treadle_count > draft.loom.max_treadles {
        issues.push(ValidationIssue::error(
            IssueType::TreadleCapacity,
            format!(
                "draft uses {} treadles but the loom has {}",
                draft.treadle_count, draft.loom.max_treadles
            ),
        ));
    }

    if draft.warp_count > draft.loom.max_warp {
        issues.push(ValidationIssue::error(
            IssueType::WarpCapacity,
            format!(
                "draft uses {} warp ends but the loom supports {}",
                draft.warp_count, draft.loom.max_warp
            ),
        ));
    }

    if draft.weft_count > draft.loom.max_weft {
        issues.push(ValidationIssue::error(
            IssueType::WeftCapacity,
            format!(
                "draft uses {} weft picks but the loom supports {}",
                draft.weft_count, draft.loom.max_weft
            ),
        ));
    }

    if !draft.has_lift() {
        issues.push(ValidationIssue::warning(
            IssueType::EmptyTieUp,
            "tie-up has no lifts; no pattern will be generated",
        ));
    }

    if let Some((pos, &harness)) = draft
        .threading
        .iter()
        .enumerate()
        .find(|(_, &h)| h as usize >= draft.harness_count)
    {
        issues.push(ValidationIssue::error(
            IssueType::ThreadingRange,
            format!(
                "threading at warp end {} references harness {} (draft has {})",
                pos, harness, draft.harness_count
            ),
        ));
    }

    if let Some((pos, &treadle)) = draft
        .treadling
        .iter()
        .enumerate()
        .find(|(_, &t)| t as usize >= draft.treadle_count)
    {
        issues.push(ValidationIssue::error(
            IssueType::TreadlingRange,
            format!(
                "treadling at weft pick {} references treadle {} (draft has {})",
                pos, treadle, draft.treadle_count
            ),
        ));
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns;

    fn valid_draft() -> Draft {
        let mut draft = Draft::new(8, 8, 4, 4);
        patterns::twill_2_2_tie_up(&mut draft);
        draft
    }

    #[test]
    fn test_valid_draft_has_no_issues() {
        assert!(validate_draft(&valid_draft()).is_empty());
    }

    #[test]
    fn test_capacity_violations_in_order() {
        let mut draft = valid_draft();
        draft.loom.max_harnesses = 2;
        draft.loom.max_treadles = 2;
        draft.loom.max_warp = 4;
        draft.loom.max_weft = 4;
        let issues = validate_draft(&draft);
        let types: Vec<IssueType> = issues.iter().map(|i| i.issue_type).collect();
        assert_eq!(
            types,
            vec![
                IssueType::HarnessCapacity,
                IssueType::TreadleCapacity,
                IssueType::WarpCapacity,
                IssueType::WeftCapacity,
            ]
        );
    }

    #[test]
    fn test_empty_tie_up_is_warning() {
        let draft = Draft::new(4, 4, 4, 4);
        let issues = validate_draft(&draft);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].issue_type, IssueType::EmptyTieUp);
        assert_eq!(issues[0].severity, Severity::Warning);
        assert!(issues[0].message.contains("no pattern will be generated"));
    }

    #[test]
    fn test_threading_range_reports_first_offender_only() {
        let mut draft = valid_draft();
        draft.threading[2] = 9;
        draft.threading[5] = 12;
        let issues = validate_draft(&draft);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].issue_type, IssueType::ThreadingRange);
        assert!(issues[0].message.contains("warp end 2"));
        assert!(issues[0].message.contains("harness 9"));
    }

    #[test]
    fn test_treadling_range_reports_first_offender_only() {
        let mut draft = valid_draft();
        draft.treadling[7] = 4;
        let issues = validate_draft(&draft);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].issue_type, IssueType::TreadlingRange);
        assert!(issues[0].message.contains("weft pick 7"));
    }

    #[test]
    fn test_issue_display() {
        let mut draft = valid_draft();
        draft.loom.max_harnesses = 2;
        let issues = validate_draft(&draft);
        let rendered = issues[0].to_string();
        assert!(rendered.starts_with("ERROR: "));
        assert!(rendered.contains("4 harnesses"));
    }
}
