/// An ordered multimap of header names to values.
///
/// Insertion order is preserved; names compare ASCII-case-insensitively.
/// A name may carry several values, kept as separate entries in the order
/// they were appended.
#[derive(Debug, Clone, Default)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Append a value for `name`, keeping any existing values.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), value.into()));
    }

    /// Replace every existing value for `name` with a single value.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.entries.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
        self.entries.push((name.to_string(), value.into()));
    }

    /// First value for `name`, if any.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Every value for `name`, in insertion order.
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> {
        self.entries
            .iter()
            .filter(move |(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n.eq_ignore_ascii_case(name))
    }

    /// True when any value for `name` contains `token`, compared
    /// case-insensitively. This is the loose match body framing negotiation
    /// uses (`Transfer-Encoding: chunked`, `Connection: close`, ...).
    pub fn contains_token(&self, name: &str, token: &str) -> bool {
        let token = token.to_ascii_lowercase();
        self.get_all(name).any(|v| v.to_ascii_lowercase().contains(&token))
    }

    /// All entries as `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_keeps_multiple_values() {
        let mut headers = Headers::new();
        headers.append("Set-Cookie", "a=1");
        headers.append("Set-Cookie", "b=2");
        assert_eq!(headers.get("set-cookie"), Some("a=1"));
        let all: Vec<_> = headers.get_all("SET-COOKIE").collect();
        assert_eq!(all, vec!["a=1", "b=2"]);
    }

    #[test]
    fn set_replaces_every_value() {
        let mut headers = Headers::new();
        headers.append("Accept", "text/html");
        headers.append("accept", "text/plain");
        headers.set("Accept", "*/*");
        let all: Vec<_> = headers.get_all("accept").collect();
        assert_eq!(all, vec!["*/*"]);
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let mut headers = Headers::new();
        headers.append("Content-Length", "42");
        assert!(headers.contains("content-length"));
        assert_eq!(headers.get("CONTENT-LENGTH"), Some("42"));
    }

    #[test]
    fn preserves_insertion_order() {
        let mut headers = Headers::new();
        headers.append("Host", "example.com");
        headers.append("Accept", "*/*");
        headers.append("User-Agent", "test");
        let names: Vec<_> = headers.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["Host", "Accept", "User-Agent"]);
    }

    #[test]
    fn token_match_is_substring_and_case_insensitive() {
        let mut headers = Headers::new();
        headers.append("Transfer-Encoding", "gzip, Chunked");
        headers.append("Connection", "Keep-Alive");
        assert!(headers.contains_token("transfer-encoding", "chunked"));
        assert!(!headers.contains_token("Connection", "close"));
    }
}
