use std::fmt;

use convert_case::{Case, Casing};

/// Snake-case label for a flow, limited to `[a-z0-9_]`. Shown in logs and
/// tree dumps.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FlowName(String);

impl FlowName {
    /// Snake-case `label` and drop anything outside `[a-z0-9_]`. Falls back
    /// to `flow` when nothing is left.
    pub fn convert(label: &str) -> Self {
        let kept: String = label
            .to_case(Case::Snake)
            .chars()
            .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_')
            .collect();
        if kept.is_empty() {
            Self("flow".into())
        } else {
            Self(kept)
        }
    }

    /// Derive a name from a Rust type name, dropping the module path.
    pub fn of_type(type_name: &str) -> Self {
        let short = type_name
            .split('<')
            .next()
            .unwrap_or(type_name)
            .rsplit("::")
            .next()
            .unwrap_or(type_name);
        Self::convert(short)
    }
}

impl fmt::Display for FlowName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<&str> for FlowName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn convert() {
        assert_eq!(FlowName::convert("OnboardingFlow"), "onboarding_flow");
        assert_eq!(FlowName::convert("Settings Flow!"), "settings_flow");
        assert_eq!(FlowName::convert("???"), "flow");
    }

    #[test]
    fn of_type() {
        assert_eq!(
            FlowName::of_type("app::flows::CheckoutFlow"),
            "checkout_flow"
        );
        assert_eq!(
            FlowName::of_type("app::flows::Wrapper<app::Inner>"),
            "wrapper"
        );
    }
}
