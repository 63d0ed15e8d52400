//! Declared variables and parameters.

use std::collections::HashMap;

use crate::dcp::Sign;
use crate::expr::Expression;

/// Name to leaf mapping for one parser session.
///
/// Declaring a name again replaces the earlier leaf.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    symbols: HashMap<String, Expression>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare an affine variable of unknown sign.
    pub fn declare_variable(&mut self, name: &str) {
        self.symbols
            .insert(name.to_string(), Expression::variable(name));
    }

    /// Declare a constant parameter of the given sign.
    pub fn declare_parameter(&mut self, name: &str, sign: Sign) {
        self.symbols
            .insert(name.to_string(), Expression::parameter(name, sign));
    }

    pub fn get(&self, name: &str) -> Option<&Expression> {
        self.symbols.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Iterate over declarations in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Expression)> {
        self.symbols.iter().map(|(k, v)| (k.as_str(), v))
    }
}
