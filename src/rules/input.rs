//! Documentation for the violations the linter reports on its own, outside
//! the rule catalog.

use crate::docs::RuleDoc;

pub static UNREADABLE_INPUT_DOC: RuleDoc = RuleDoc {
    name: "unreadable-input",
    category: "input",
    description: "Reported when a file cannot be read or is not valid UTF-8",
    severity: "error",
    why: r#"Documentation pages are UTF-8 text. A page that cannot be read or
decoded is not checked at all, so it is reported as a single error at the
first line that failed to decode. Other files are still validated."#,
    bad_example: "A page saved as Latin-1: Caf\\xe9 booking",
    good_example: "A page saved as UTF-8: Café booking",
    references: &[],
};

pub static VALIDATION_TIMED_OUT_DOC: RuleDoc = RuleDoc {
    name: "validation-timed-out",
    category: "input",
    description: "Reported when validating a file exceeds the configured time limit",
    severity: "error",
    why: r#"With a per-file time limit (--timeout-ms or lint.timeout_ms), a file
whose validation does not finish in time is reported as a single error
and any partial results are discarded."#,
    bad_example: "",
    good_example: "",
    references: &[],
};
