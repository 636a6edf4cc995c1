use crate::grammar::Grammar;

pub const SECTION_PREFIX: &str = "## ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulletForm {
    Bare,
    Numbered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Section,
    Bullet(BulletForm),
    Plain,
}

/// Classifies a line by literal prefix. Section headers win over bullets.
pub fn classify(line: &str, grammar: Grammar) -> LineKind {
    if line.starts_with(SECTION_PREFIX) {
        return LineKind::Section;
    }

    if !line.starts_with(grammar.bullet_prefix()) {
        return LineKind::Plain;
    }

    match grammar.bare_prefix() {
        Some(bare) if line.starts_with(bare) => LineKind::Bullet(BulletForm::Bare),
        _ => LineKind::Bullet(BulletForm::Numbered),
    }
}

/// Header text without the `## ` marker, for reporting.
pub fn section_title(line: &str) -> &str {
    line.strip_prefix(SECTION_PREFIX).unwrap_or(line).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_level_two_headers_open_sections() {
        assert_eq!(classify("## Rules", Grammar::General), LineKind::Section);
        assert_eq!(classify("### Rules", Grammar::General), LineKind::Plain);
        assert_eq!(classify("# Title", Grammar::General), LineKind::Plain);
        assert_eq!(classify(" ## Rules", Grammar::General), LineKind::Plain);
    }

    #[test]
    fn general_grammar_distinguishes_bare_bullets() {
        assert_eq!(
            classify("  - [TS] text", Grammar::General),
            LineKind::Bullet(BulletForm::Bare)
        );
        assert_eq!(
            classify("  - [TS 1.02](#ts-0102) text", Grammar::General),
            LineKind::Bullet(BulletForm::Numbered)
        );
        assert_eq!(
            classify("  - [link](http://x)", Grammar::General),
            LineKind::Bullet(BulletForm::Numbered)
        );
        assert_eq!(classify("- [TS] text", Grammar::General), LineKind::Plain);
    }

    #[test]
    fn double_bracket_grammar_requires_numbered_prefix() {
        assert_eq!(
            classify("  - [[TS 1.02]](#ts-0102)", Grammar::DoubleBracket),
            LineKind::Bullet(BulletForm::Numbered)
        );
        assert_eq!(classify("  - [TS] text", Grammar::DoubleBracket), LineKind::Plain);
        assert_eq!(
            classify("  - [TS 1.02](#ts-0102)", Grammar::DoubleBracket),
            LineKind::Plain
        );
    }

    #[test]
    fn strips_marker_from_title() {
        assert_eq!(section_title("## Naming  "), "Naming");
    }
}
