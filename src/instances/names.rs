//! # Variable Name Registry
//!
//! Bidirectional mapping between external string identifiers and variables.

use crate::types::{RsHashMap, Var};

use super::ManageVars;

/// Maps names to variables and back. Both directions are kept as mutual
/// inverses: every registered name has exactly one variable and every named
/// variable exactly one name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VarNameRegistry {
    name_to_var: RsHashMap<String, Var>,
    var_to_name: RsHashMap<Var, String>,
}

impl VarNameRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the variable registered for `name`, allocating a new one from
    /// `var_manager` if the name is seen for the first time
    pub fn new_var_name<VM: ManageVars>(&mut self, name: &str, var_manager: &mut VM) -> Var {
        if let Some(&var) = self.name_to_var.get(name) {
            return var;
        }
        let var = var_manager.new_var();
        self.name_to_var.insert(name.to_owned(), var);
        self.var_to_name.insert(var, name.to_owned());
        log::trace!("registered name {} as {}", name, var);
        var
    }

    /// Looks up the variable of a name without registering it
    pub fn var_id(&self, name: &str) -> Option<Var> {
        self.name_to_var.get(name).copied()
    }

    /// Looks up the name of a variable
    pub fn var_name(&self, var: Var) -> Option<&str> {
        self.var_to_name.get(&var).map(String::as_str)
    }

    /// Gets the number of registered names
    pub fn len(&self) -> usize {
        self.name_to_var.len()
    }

    /// Checks if no name is registered
    pub fn is_empty(&self) -> bool {
        self.name_to_var.is_empty()
    }

    /// Gets an iterator over all `(name, variable)` pairs in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = (&str, Var)> {
        self.name_to_var.iter().map(|(n, &v)| (n.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::VarNameRegistry;
    use crate::{
        instances::{BasicVarManager, ManageVars},
        var,
    };

    #[test]
    fn register_and_lookup() {
        let mut vm = BasicVarManager::default();
        let mut reg = VarNameRegistry::new();
        assert_eq!(reg.var_id("a"), None);
        let a = reg.new_var_name("a", &mut vm);
        let b = reg.new_var_name("b", &mut vm);
        assert_eq!(a, var![0]);
        assert_eq!(b, var![1]);
        assert_eq!(reg.new_var_name("a", &mut vm), a);
        assert_eq!(vm.n_used(), 2);
        assert_eq!(reg.var_id("a"), Some(a));
        assert_eq!(reg.var_name(b), Some("b"));
        assert_eq!(reg.var_name(var![7]), None);
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn maps_are_inverse() {
        let mut vm = BasicVarManager::default();
        let mut reg = VarNameRegistry::new();
        for name in ["x", "y", "x", "z", "y"] {
            reg.new_var_name(name, &mut vm);
        }
        assert_eq!(reg.len(), 3);
        for (name, var) in reg.iter() {
            assert_eq!(reg.var_name(var), Some(name));
        }
    }
}
