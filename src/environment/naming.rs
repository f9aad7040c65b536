//! Identifier allocation for a single build.
//!
//! Variables and parameters live in separate namespaces (`n` and `$n` never
//! clash in Cypher), so each class keeps its own counter and its own set of
//! names handed out so far.
//!
//! ## Naming Convention
//! Format: `{prefix}{tag}{counter}`
//! - `prefix` is the build prefix (often empty)
//! - `tag` depends on the identity: `this` for nodes and relationships, `var`
//!   for plain values, `p` for paths, `param` for parameters
//! - `counter` is shared by every tag of the same class
//!
//! Examples (empty prefix, in allocation order):
//! - node, relationship, node → `this0`, `this1`, `this2`
//! - value, node → `var0`, `this1`
//! - parameter, parameter → `param0`, `param1`
//!
//! Explicit names are returned verbatim and never prefixed.

use std::collections::HashSet;
use std::fmt;

use crate::errors::CypherBuildError;

/// Namespace an identifier belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NameClass {
    Variable,
    Parameter,
}

impl fmt::Display for NameClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameClass::Variable => write!(f, "variable"),
            NameClass::Parameter => write!(f, "parameter"),
        }
    }
}

#[derive(Debug, Default)]
struct ClassNames {
    /// Next suffix to try for a generated name
    counter: usize,
    /// Every name handed out in this class, explicit or generated
    taken: HashSet<String>,
}

/// Hands out identifiers for one build. Never shared between builds.
#[derive(Debug, Default)]
pub(crate) struct NameAllocator {
    prefix: String,
    variables: ClassNames,
    parameters: ClassNames,
}

impl NameAllocator {
    pub(crate) fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            ..Default::default()
        }
    }

    pub(crate) fn prefix(&self) -> &str {
        &self.prefix
    }

    fn names_mut(&mut self, class: NameClass) -> &mut ClassNames {
        match class {
            NameClass::Variable => &mut self.variables,
            NameClass::Parameter => &mut self.parameters,
        }
    }

    /// Claim a caller-supplied name.
    ///
    /// The caller has already checked that this identity has no name yet, so a
    /// name that is already taken belongs to someone else.
    pub(crate) fn allocate_explicit(
        &mut self,
        class: NameClass,
        name: &str,
    ) -> Result<String, CypherBuildError> {
        if !self.names_mut(class).taken.insert(name.to_string()) {
            return Err(CypherBuildError::NameCollision {
                name: name.to_string(),
                class,
            });
        }
        Ok(name.to_string())
    }

    /// Generate the next free `{prefix}{tag}{counter}` name.
    ///
    /// Names already claimed explicitly are skipped; the counter only moves
    /// forward.
    pub(crate) fn allocate_generated(&mut self, class: NameClass, tag: &str) -> String {
        let prefix = self.prefix.clone();
        let names = self.names_mut(class);
        loop {
            let candidate = format!("{}{}{}", prefix, tag, names.counter);
            names.counter += 1;
            if names.taken.insert(candidate.clone()) {
                return candidate;
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn is_taken(&self, class: NameClass, name: &str) -> bool {
        match class {
            NameClass::Variable => self.variables.taken.contains(name),
            NameClass::Parameter => self.parameters.taken.contains(name),
        }
    }
}
