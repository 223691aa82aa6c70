//! Fragment accumulation and package tracking.

use std::collections::BTreeSet;

/// Append-only, ordered log of already-formatted source fragments.
#[derive(Debug, Clone, Default)]
pub struct EmissionBuffer {
    fragments: Vec<String>,
}

impl EmissionBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, fragment: impl Into<String>) {
        self.fragments.push(fragment.into());
    }

    /// Move every fragment of `staged` onto the end of this buffer.
    pub fn commit(&mut self, staged: EmissionBuffer) {
        self.fragments.extend(staged.fragments);
    }

    /// Run `body` inside a `#pragma warning disable/restore` pair for `code`.
    ///
    /// With `code` of `None` the body runs unwrapped. Scopes nest; sentinels
    /// are written every time, never merged with an enclosing scope.
    pub fn scoped<T, E>(
        &mut self,
        code: Option<&str>,
        body: impl FnOnce(&mut Self) -> Result<T, E>,
    ) -> Result<T, E> {
        let Some(code) = code else {
            return body(self);
        };
        self.append(format!("\n#pragma warning disable {code}"));
        let out = body(self)?;
        self.append(format!("\n#pragma warning restore {code}"));
        Ok(out)
    }

    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Concatenate all fragments in order.
    pub fn linearize(&self) -> String {
        self.fragments.concat()
    }
}

/// Deduplicated set of package declarations.
#[derive(Debug, Clone, Default)]
pub struct DependencyTracker {
    packages: BTreeSet<String>,
}

impl DependencyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a declaration; returns false if it was already present.
    pub fn declare(&mut self, declaration: impl Into<String>) -> bool {
        self.packages.insert(declaration.into())
    }

    /// Declarations in lexicographic order.
    pub fn finalize(&self) -> Vec<String> {
        self.packages.iter().cloned().collect()
    }
}
