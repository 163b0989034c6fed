//! First-match-wins keyword tables shared by the mock providers.

/// Predicate evaluated against a lower-cased, trimmed query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Matcher {
    /// The query contains any of the keys.
    QueryContains(&'static [&'static str]),
    /// The (lower-case) label contains the whole query.
    LabelContainsQuery(&'static str),
}

impl Matcher {
    fn matches(&self, query: &str) -> bool {
        match self {
            Matcher::QueryContains(keys) => keys.iter().any(|key| query.contains(key)),
            Matcher::LabelContainsQuery(label) => {
                !query.is_empty() && label.to_lowercase().contains(query)
            }
        }
    }
}

#[derive(Debug, Clone)]
struct Rule<T> {
    key: &'static str,
    matchers: Vec<Matcher>,
    payload: T,
}

/// Ordered `(predicate, payload)` rules with a documented default.
#[derive(Debug, Clone)]
pub struct KeywordTable<T> {
    rules: Vec<Rule<T>>,
    fallback: T,
}

/// Result of a table lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<'a, T> {
    Matched { key: &'static str, payload: &'a T },
    Fallback(&'a T),
}

impl<'a, T> Lookup<'a, T> {
    pub fn payload(&self) -> &'a T {
        match *self {
            Lookup::Matched { payload, .. } => payload,
            Lookup::Fallback(payload) => payload,
        }
    }

    pub fn key(&self) -> Option<&'static str> {
        match *self {
            Lookup::Matched { key, .. } => Some(key),
            Lookup::Fallback(_) => None,
        }
    }
}

impl<T> KeywordTable<T> {
    pub fn new(fallback: T) -> Self {
        Self {
            rules: Vec::new(),
            fallback,
        }
    }

    /// Append a rule; it matches when any of `matchers` does.
    pub fn rule(
        mut self,
        key: &'static str,
        matchers: impl IntoIterator<Item = Matcher>,
        payload: T,
    ) -> Self {
        self.rules.push(Rule {
            key,
            matchers: matchers.into_iter().collect(),
            payload,
        });
        self
    }

    pub fn lookup(&self, query: &str) -> Lookup<'_, T> {
        let query = query.trim().to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matchers.iter().any(|matcher| matcher.matches(&query)))
            .map(|rule| Lookup::Matched {
                key: rule.key,
                payload: &rule.payload,
            })
            .unwrap_or(Lookup::Fallback(&self.fallback))
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.rules
            .iter()
            .find(|rule| rule.key == key)
            .map(|rule| &rule.payload)
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().map(|rule| rule.key)
    }

    pub fn fallback(&self) -> &T {
        &self.fallback
    }
}
