/// Parsed search query.
///
/// - AND within a clause: all terms and phrases must match
/// - OR across clauses: the literal token `OR` starts a new clause
/// - phrases are double-quoted and matched as substrings
///
/// Examples:
/// ```text
/// hello world            -> one clause: terms ["hello", "world"]
/// hello OR "seed post"   -> two clauses
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub clauses: Vec<Clause>,
}

/// One AND-group of the query. Terms and phrases are stored lowercased.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Clause {
    pub terms: Vec<String>,
    pub phrases: Vec<String>,
}

impl Clause {
    fn is_empty(&self) -> bool {
        self.terms.is_empty() && self.phrases.is_empty()
    }
}

impl SearchQuery {
    /// Parse a raw query string. Unclosed quotes swallow the rest of the
    /// input as one phrase; an all-whitespace query yields no clauses.
    pub fn parse(raw: &str) -> Self {
        let mut clauses = Vec::new();
        let mut current = Clause::default();

        let mut rest = raw.trim();
        while !rest.is_empty() {
            if let Some(stripped) = rest.strip_prefix('"') {
                let (phrase, after) = match stripped.find('"') {
                    Some(end) => (&stripped[..end], &stripped[end + 1..]),
                    None => (stripped, ""),
                };
                let phrase = phrase.trim().to_lowercase();
                if !phrase.is_empty() {
                    current.phrases.push(phrase);
                }
                rest = after.trim_start();
                continue;
            }

            let end = rest.find([' ', '"']).unwrap_or(rest.len());
            let token = &rest[..end];
            // Keep a '"' that terminates a bare token for the next round.
            rest = rest[end..].trim_start_matches(' ');

            if token == "OR" {
                if !current.is_empty() {
                    clauses.push(std::mem::take(&mut current));
                }
            } else if !token.is_empty() {
                current.terms.push(token.to_lowercase());
            }
        }

        if !current.is_empty() {
            clauses.push(current);
        }
        Self { clauses }
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}
