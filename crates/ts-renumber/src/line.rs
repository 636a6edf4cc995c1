/// A single line of the source document.
///
/// `text` excludes the `\n` terminator but keeps any `\r`, so joining the
/// records back with `\n` reproduces the input byte for byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRecord<'a> {
    pub number: usize,
    pub text: &'a str,
}

pub fn split_lines(content: &str) -> Vec<LineRecord<'_>> {
    content
        .split('\n')
        .enumerate()
        .map(|(idx, text)| LineRecord {
            number: idx + 1,
            text,
        })
        .collect()
}
