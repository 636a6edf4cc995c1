use crate::reference::Reference;

/// Counter state threaded through the renumbering pass.
///
/// `bullets` is `None` until the first section header, so bullets in the
/// preamble are never numbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    section: i64,
    bullets: Option<u32>,
}

impl Cursor {
    pub fn new(section_start: i64) -> Self {
        Self {
            section: section_start,
            bullets: None,
        }
    }

    pub fn section(&self) -> i64 {
        self.section
    }

    pub fn enter_section(self) -> Self {
        Self {
            section: self.section + 1,
            bullets: Some(0),
        }
    }

    /// Numbers the next bullet of the current section.
    pub fn next_bullet(self) -> (Option<Reference>, Self) {
        match self.bullets {
            Some(seen) => (
                Some(Reference::new(self.section, seen)),
                Self {
                    bullets: Some(seen + 1),
                    ..self
                },
            ),
            None => (None, self),
        }
    }
}
