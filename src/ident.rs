//! Short variable names for generated statements.
//!
//! The first 26 names are `a`..`z`. Past that, every cycle of 26 prefixes the
//! letters with the name that opened the previous cycle: `aa`..`az`, then
//! `aaa`..`aaz`, and so on. Names are never reused within one allocator.

const LETTERS: [char; 26] = [
    'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r', 's',
    't', 'u', 'v', 'w', 'x', 'y', 'z',
];

#[derive(Debug, Default, Clone)]
pub struct IdentifierAllocator {
    issued: Vec<String>,
}

impl IdentifierAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&mut self) -> String {
        let count = self.issued.len();
        let base = LETTERS.len();

        let ident = if count >= base {
            let letter = LETTERS[count % base];
            let cycle = count / base;
            format!("{}{}", self.issued[(cycle - 1) * base], letter)
        } else {
            LETTERS[count].to_string()
        };

        self.issued.push(ident.clone());
        ident
    }

    /// Number of identifiers handed out so far.
    pub fn len(&self) -> usize {
        self.issued.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issued.is_empty()
    }
}
