use crate::classify::{classify, section_title, LineKind};
use crate::error::{RenumberError, RenumberResult};
use crate::grammar::Grammar;
use crate::line::{split_lines, LineRecord};
use crate::reference::Reference;
use crate::state::Cursor;

/// Counter value before the first header; `-1` makes the first header section 0.
pub const DEFAULT_SECTION_START: i64 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenumberOptions {
    pub grammar: Grammar,
    pub section_start: i64,
}

impl Default for RenumberOptions {
    fn default() -> Self {
        Self {
            grammar: Grammar::General,
            section_start: DEFAULT_SECTION_START,
        }
    }
}

impl RenumberOptions {
    fn validate(&self) -> RenumberResult<()> {
        if self.section_start < DEFAULT_SECTION_START {
            return Err(RenumberError::InvalidOptions(format!(
                "section start must be at least {DEFAULT_SECTION_START} (received {})",
                self.section_start
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionSummary {
    pub number: i64,
    pub title: String,
    pub line: usize,
    pub bullets: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineChange {
    pub line: usize,
    pub reference: Reference,
    pub before: String,
    pub after: String,
}

#[derive(Debug, Clone)]
pub struct RenumberOutcome {
    pub text: String,
    pub sections: Vec<SectionSummary>,
    pub changes: Vec<LineChange>,
    pub bullets: usize,
}

impl RenumberOutcome {
    pub fn changed(&self) -> bool {
        !self.changes.is_empty()
    }

    /// The renumbered document as printed: leading and trailing whitespace trimmed.
    pub fn document(&self) -> &str {
        self.text.trim()
    }
}

/// Renumbers every reference bullet in `content`.
///
/// Pure function of the text: one forward fold over the lines with the
/// section and bullet counters as the accumulator.
pub fn renumber(content: &str, options: &RenumberOptions) -> RenumberResult<RenumberOutcome> {
    options.validate()?;

    let lines = split_lines(content);
    let pass = lines
        .iter()
        .fold(Pass::new(options, lines.len()), |pass, line| pass.step(line));

    Ok(pass.finish())
}

struct Pass {
    grammar: Grammar,
    cursor: Cursor,
    output: Vec<String>,
    sections: Vec<SectionSummary>,
    changes: Vec<LineChange>,
    bullets: usize,
}

impl Pass {
    fn new(options: &RenumberOptions, capacity: usize) -> Self {
        Self {
            grammar: options.grammar,
            cursor: Cursor::new(options.section_start),
            output: Vec::with_capacity(capacity),
            sections: Vec::new(),
            changes: Vec::new(),
            bullets: 0,
        }
    }

    fn step(mut self, line: &LineRecord<'_>) -> Self {
        match classify(line.text, self.grammar) {
            LineKind::Section => {
                self.cursor = self.cursor.enter_section();
                self.sections.push(SectionSummary {
                    number: self.cursor.section(),
                    title: section_title(line.text).to_string(),
                    line: line.number,
                    bullets: 0,
                });
                self.output.push(line.text.to_string());
            }
            LineKind::Bullet(form) => {
                let (reference, cursor) = self.cursor.next_bullet();
                self.cursor = cursor;

                let Some(reference) = reference else {
                    self.output.push(line.text.to_string());
                    return self;
                };

                self.bullets += 1;
                if let Some(section) = self.sections.last_mut() {
                    section.bullets += 1;
                }

                let rewritten = reference.rewrite(line.text, form, self.grammar);
                if rewritten != line.text {
                    self.changes.push(LineChange {
                        line: line.number,
                        reference,
                        before: line.text.to_string(),
                        after: rewritten.clone(),
                    });
                }
                self.output.push(rewritten);
            }
            LineKind::Plain => self.output.push(line.text.to_string()),
        }
        self
    }

    fn finish(self) -> RenumberOutcome {
        RenumberOutcome {
            text: self.output.join("\n"),
            sections: self.sections,
            changes: self.changes,
            bullets: self.bullets,
        }
    }
}
