//! Declaration of indeterminates.

use std::fmt;
use std::fmt::Display;
use std::rc::Rc;
use std::cell::RefCell;

/// An indeterminate of a polynomial ring.
///
/// Two variables are equal iff they have the same declaration index in
/// the same [`Variables`] registry. They are ordered by declaration.
#[derive(Clone, Debug)]
pub struct Variable {
    id: usize,
    name: Rc<str>,
}

impl Variable {
    /// Declaration index of the variable.
    pub fn id(&self) -> usize {
        self.id
    }
    /// Name used for printing.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for Variable {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Variable {}

impl PartialOrd for Variable {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Variable {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.id.cmp(&other.id)
    }
}

impl std::hash::Hash for Variable {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state)
    }
}

impl Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Registry handing out fresh indeterminates.
///
/// Cloning the registry shares it, so fresh variables declared through a
/// clone never collide with the ones declared through the original.
#[derive(Clone, Debug, Default)]
pub struct Variables {
    names: Rc<RefCell<Vec<Rc<str>>>>,
}

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }
    /// Declare a new variable named `name`.
    pub fn declare(&self, name: &str) -> Variable {
        let mut names = self.names.borrow_mut();
        let name: Rc<str> = Rc::from(name);
        names.push(name.clone());
        Variable {
            id: names.len() - 1,
            name,
        }
    }
    /// Declare the vector `name[1]`, ..., `name[len]`.
    pub fn declare_vec(&self, name: &str, len: usize) -> Vec<Variable> {
        (1..=len)
            .map(|i| self.declare(&format!("{name}[{i}]")))
            .collect()
    }
    /// Number of variables declared so far.
    pub fn len(&self) -> usize {
        self.names.borrow().len()
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
    /// All declared variables, in declaration order.
    pub fn all(&self) -> Vec<Variable> {
        self.names
            .borrow()
            .iter()
            .enumerate()
            .map(|(id, name)| Variable {
                id,
                name: name.clone(),
            })
            .collect()
    }
}
