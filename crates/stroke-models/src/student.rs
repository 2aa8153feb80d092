//! Optional learner metadata attached to an upload.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::limits::{MAX_CONCERNS_CHARS, MAX_STUDENT_NAME_CHARS};

/// Student profile passed through to the coaching prompt.
///
/// Every field is independently optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct StudentContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    /// Free-form level such as "beginner" or "intermediate"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concerns: Option<String>,
}

/// Raw, unvalidated form values.
#[derive(Debug, Clone, Default)]
pub struct StudentForm {
    pub name: Option<String>,
    pub age: Option<String>,
    pub level: Option<String>,
    pub concerns: Option<String>,
}

impl StudentContext {
    /// Build a context from raw form values.
    ///
    /// Values are trimmed and empty ones dropped. Name and concerns are
    /// truncated to their character limits, and an age that is not an
    /// integer is ignored. Returns `None` when nothing usable remains.
    pub fn from_form(form: StudentForm) -> Option<Self> {
        let context = Self {
            name: non_empty(form.name).map(|n| truncate_chars(&n, MAX_STUDENT_NAME_CHARS)),
            age: non_empty(form.age).and_then(|a| a.parse().ok()),
            level: non_empty(form.level),
            concerns: non_empty(form.concerns).map(|c| truncate_chars(&c, MAX_CONCERNS_CHARS)),
        };

        if context.is_empty() {
            None
        } else {
            Some(context)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.age.is_none() && self.level.is_none() && self.concerns.is_none()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn truncate_chars(value: &str, max: usize) -> String {
    value.chars().take(max).collect::<String>().trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_form_yields_none() {
        assert!(StudentContext::from_form(StudentForm::default()).is_none());

        let blank = StudentForm {
            name: Some("   ".into()),
            concerns: Some(String::new()),
            ..Default::default()
        };
        assert!(StudentContext::from_form(blank).is_none());
    }

    #[test]
    fn test_limits_are_applied() {
        let form = StudentForm {
            name: Some(format!("  {}  ", "a".repeat(80))),
            age: Some("16".into()),
            level: Some("intermediate".into()),
            concerns: Some("x".repeat(900)),
        };
        let ctx = StudentContext::from_form(form).unwrap();

        assert_eq!(ctx.name.unwrap().chars().count(), MAX_STUDENT_NAME_CHARS);
        assert_eq!(ctx.age, Some(16));
        assert_eq!(ctx.level.as_deref(), Some("intermediate"));
        assert_eq!(ctx.concerns.unwrap().chars().count(), MAX_CONCERNS_CHARS);
    }

    #[test]
    fn test_unparseable_age_is_ignored() {
        let form = StudentForm {
            name: Some("Alex".into()),
            age: Some("sixteen".into()),
            ..Default::default()
        };
        let ctx = StudentContext::from_form(form).unwrap();
        assert_eq!(ctx.age, None);
        assert_eq!(ctx.name.as_deref(), Some("Alex"));
    }

    #[test]
    fn test_name_truncation_respects_char_boundaries() {
        let form = StudentForm {
            name: Some("é".repeat(60)),
            ..Default::default()
        };
        let ctx = StudentContext::from_form(form).unwrap();
        assert_eq!(ctx.name.unwrap().chars().count(), MAX_STUDENT_NAME_CHARS);
    }
}
