use std::fmt;
use std::sync::LazyLock;

use regex::{NoExpand, Regex};

use crate::classify::BulletForm;
use crate::grammar::Grammar;

static BARE_LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"- \[TS\]").expect("valid bare label regex"));

static GENERAL_LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"- \[TS ([0-9]{1,2}\.[0-9]{1,2})").expect("valid general label regex")
});

static DOUBLE_BRACKET_LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[\[TS ([0-9]{1,2}\.[0-9]{1,2})").expect("valid double-bracket label regex")
});

static ANCHOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"ts-([0-9]{4})").expect("valid anchor regex"));

/// Section and bullet number assigned to one reference bullet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reference {
    pub section: i64,
    pub bullet: u32,
}

impl Reference {
    pub fn new(section: i64, bullet: u32) -> Self {
        Self { section, bullet }
    }

    /// `S.BB`, the numeric part of the label.
    pub fn number(&self) -> String {
        format!("{}.{:02}", self.section, self.bullet)
    }

    /// `TS S.BB`
    pub fn label(&self) -> String {
        format!("TS {}", self.number())
    }

    /// `ts-SSBB`
    pub fn anchor(&self) -> String {
        format!("ts-{:02}{:02}", self.section, self.bullet)
    }

    /// Rewrites a classified bullet line so its label and anchors carry this number.
    pub fn rewrite(&self, line: &str, form: BulletForm, grammar: Grammar) -> String {
        match form {
            BulletForm::Bare => self.expand_bare(line),
            BulletForm::Numbered => self.replace_numbers(line, grammar),
        }
    }

    fn expand_bare(&self, line: &str) -> String {
        let anchor = self.anchor();
        let expanded = format!(
            "- [{label}](#{anchor})<a name='{anchor}'></a> -",
            label = self.label()
        );
        BARE_LABEL_RE
            .replace(line, NoExpand(&expanded))
            .into_owned()
    }

    fn replace_numbers(&self, line: &str, grammar: Grammar) -> String {
        let (label_re, label) = match grammar {
            Grammar::General => (&*GENERAL_LABEL_RE, format!("- [{}", self.label())),
            Grammar::DoubleBracket => (&*DOUBLE_BRACKET_LABEL_RE, format!("[[{}", self.label())),
        };

        let relabelled = label_re.replace(line, NoExpand(&label));
        ANCHOR_RE
            .replace_all(&relabelled, NoExpand(&self.anchor()))
            .into_owned()
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn pads_bullet_everywhere_and_section_only_in_anchor() {
        let reference = Reference::new(3, 7);
        assert_eq!(reference.label(), "TS 3.07");
        assert_eq!(reference.anchor(), "ts-0307");

        let reference = Reference::new(11, 0);
        assert_eq!(reference.label(), "TS 11.00");
        assert_eq!(reference.anchor(), "ts-1100");
    }

    #[test]
    fn overflows_padding_past_two_digits() {
        let reference = Reference::new(100, 123);
        assert_eq!(reference.label(), "TS 100.123");
        assert_eq!(reference.anchor(), "ts-100123");
    }

    #[test]
    fn expands_bare_placeholder() {
        let line = Reference::new(0, 0).rewrite("  - [TS] some text", BulletForm::Bare, Grammar::General);
        assert_eq!(line, "  - [TS 0.00](#ts-0000)<a name='ts-0000'></a> - some text");
    }

    #[test]
    fn replaces_label_and_every_anchor() {
        let line = Reference::new(1, 4).rewrite(
            "  - [TS 5.03](#ts-0503)<a name='ts-0503'></a> - see also ts-9999",
            BulletForm::Numbered,
            Grammar::General,
        );
        assert_eq!(
            line,
            "  - [TS 1.04](#ts-0104)<a name='ts-0104'></a> - see also ts-0104"
        );
    }

    #[test]
    fn replaces_only_first_label() {
        let line = Reference::new(2, 1).rewrite(
            "  - [TS 5.03](#ts-0503) - [TS 6.01]",
            BulletForm::Numbered,
            Grammar::General,
        );
        assert_eq!(line, "  - [TS 2.01](#ts-0201) - [TS 6.01]");
    }

    #[test]
    fn double_bracket_rewrites_inner_label() {
        let line = Reference::new(4, 2).rewrite(
            "  - [[TS 1.1]](#ts-0101)<a name='ts-0101'></a> text",
            BulletForm::Numbered,
            Grammar::DoubleBracket,
        );
        assert_eq!(line, "  - [[TS 4.02]](#ts-0402)<a name='ts-0402'></a> text");
    }

    #[test]
    fn ignores_non_ascii_digits() {
        let original = "  - [TS \u{0665}.\u{0660}\u{0663}](#ts-\u{0660}\u{0665}\u{0660}\u{0663}) see ts-\u{ff11}\u{ff12}\u{ff13}\u{ff14} here";
        let line = Reference::new(0, 0).rewrite(original, BulletForm::Numbered, Grammar::General);
        assert_eq!(line, original);

        let original = "  - [[TS \u{0665}.\u{0663}]](#ts-0503)";
        let line = Reference::new(1, 2).rewrite(original, BulletForm::Numbered, Grammar::DoubleBracket);
        assert_eq!(line, "  - [[TS \u{0665}.\u{0663}]](#ts-0102)");
    }

    #[test]
    fn leaves_unrecognised_bullet_text_alone() {
        let original = "  - [link](https://example.com) and ts-12";
        let line = Reference::new(0, 0).rewrite(original, BulletForm::Numbered, Grammar::General);
        assert_eq!(line, original);
    }
}
