//! Element tree backing a stored document.

/// A named element with ordered children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub children: Vec<Element>,
}

impl Element {
    /// Create an element with no children.
    pub fn leaf(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
        }
    }

    /// Append a leaf child.
    pub fn push_leaf(&mut self, name: &str) {
        self.children.push(Element::leaf(name));
    }

    /// Remove the first child named `name`, returning whether one existed.
    pub fn remove_first(&mut self, name: &str) -> bool {
        match self.children.iter().position(|c| c.name == name) {
            Some(index) => {
                self.children.remove(index);
                true
            }
            None => false,
        }
    }

    /// Count the children named `name`.
    pub fn count_named(&self, name: &str) -> usize {
        self.children.iter().filter(|c| c.name == name).count()
    }
}
