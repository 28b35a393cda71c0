//! Protected scope and term eligibility.
//!
//! A scope names the terms a search must never remove. `drop_scope`
//! partitions a model's current terms into droppable and protected,
//! honoring factor marginality: a term that participates in a surviving
//! higher-order interaction (`"a"` under `"a:b"`) stays protected until
//! the interaction itself has been removed.

/// Terms that must survive every elimination step.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    protected: Vec<String>,
}

impl Scope {
    /// An empty scope: every term in the model is a removal candidate.
    pub fn none() -> Self {
        Self::default()
    }

    /// Protect the given terms from removal.
    pub fn protect<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            protected: terms.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether `term` is named by this scope.
    pub fn is_protected(&self, term: &str) -> bool {
        self.protected.iter().any(|t| t == term)
    }

    /// The protected term names.
    pub fn terms(&self) -> &[String] {
        &self.protected
    }
}

/// Partition of a model's terms into removal candidates and survivors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeTerms {
    /// Terms eligible for removal this step, in model order.
    pub droppable: Vec<String>,
    /// Terms held fixed, either by the scope or by marginality.
    pub protected: Vec<String>,
}

/// Split `terms` into droppable and protected with respect to `scope`.
///
/// Pure function over the term labels: interaction structure is read from
/// `:`-separated factor names, so `"a:b"` marks `"a"` and `"b"` as its
/// margins. Order of the input is preserved in both halves.
pub fn drop_scope(terms: &[String], scope: &Scope) -> ScopeTerms {
    let factored: Vec<Vec<&str>> = terms.iter().map(|t| factors(t)).collect();

    let mut droppable = Vec::new();
    let mut protected = Vec::new();

    for (i, term) in terms.iter().enumerate() {
        if scope.is_protected(term) || is_marginal(i, &factored) {
            protected.push(term.clone());
        } else {
            droppable.push(term.clone());
        }
    }

    ScopeTerms {
        droppable,
        protected,
    }
}

fn factors(term: &str) -> Vec<&str> {
    term.split(':').collect()
}

/// A term is marginal when its factor set is strictly contained in another
/// term's factor set.
fn is_marginal(index: usize, factored: &[Vec<&str>]) -> bool {
    let own = &factored[index];
    factored.iter().enumerate().any(|(j, other)| {
        j != index && other.len() > own.len() && own.iter().all(|f| other.contains(f))
    })
}
