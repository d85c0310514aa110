//! Persistent cons lists used for every child sequence of the host tree
//!
//! A [`NodeList`] is never edited in place. Replacing an element produces a
//! new list that shares the untouched tail with the old one, so every cell
//! after the last replaced element keeps its identity.

use super::tree::Tree;
use std::fmt;
use std::rc::Rc;

/// One element of a [`NodeList`]: a tree, or a nested list
#[derive(Clone)]
pub enum Element {
    Tree(Tree),
    List(NodeList),
}

impl Element {
    /// Identity comparison (never structural)
    pub fn same(&self, other: &Element) -> bool {
        match (self, other) {
            (Element::Tree(a), Element::Tree(b)) => Rc::ptr_eq(a, b),
            (Element::List(a), Element::List(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    pub fn as_tree(&self) -> Option<&Tree> {
        match self {
            Element::Tree(tree) => Some(tree),
            Element::List(_) => None,
        }
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Element::Tree(tree) => write!(f, "{}", tree.kind().name()),
            Element::List(list) => list.fmt(f),
        }
    }
}

struct Cons {
    elem: Element,
    next: NodeList,
}

/// Immutable singly linked list of host elements
#[derive(Clone, Default)]
pub struct NodeList {
    head: Option<Rc<Cons>>,
}

impl NodeList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a list of trees in the given order
    pub fn from_trees(trees: impl IntoIterator<Item = Tree>) -> Self {
        Self::from_elements(trees.into_iter().map(Element::Tree))
    }

    pub fn from_elements(elements: impl IntoIterator<Item = Element>) -> Self {
        let elements: Vec<Element> = elements.into_iter().collect();
        let mut list = NodeList::new();
        for elem in elements.into_iter().rev() {
            list = list.prepend(elem);
        }
        list
    }

    /// New list with `elem` in front; `self` becomes its tail
    pub fn prepend(&self, elem: Element) -> Self {
        NodeList {
            head: Some(Rc::new(Cons {
                elem,
                next: self.clone(),
            })),
        }
    }

    /// New list with `tree` appended; every cell is rebuilt
    pub fn append(&self, tree: Tree) -> Self {
        let mut elements: Vec<Element> = self.iter().cloned().collect();
        elements.push(Element::Tree(tree));
        Self::from_elements(elements)
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn head(&self) -> Option<&Element> {
        self.head.as_ref().map(|cell| &cell.elem)
    }

    pub fn tail(&self) -> Option<&NodeList> {
        self.head.as_ref().map(|cell| &cell.next)
    }

    /// Identity of the first cell; two empty lists are the same list
    pub fn ptr_eq(&self, other: &NodeList) -> bool {
        match (&self.head, &other.head) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter { cursor: self }
    }

    /// All trees, with nested lists flattened in order
    pub fn trees(&self) -> Vec<Tree> {
        let mut out = Vec::new();
        self.collect_trees(&mut out);
        out
    }

    fn collect_trees(&self, out: &mut Vec<Tree>) {
        for elem in self.iter() {
            match elem {
                Element::Tree(tree) => out.push(tree.clone()),
                Element::List(list) => list.collect_trees(out),
            }
        }
    }

    /// Direct tree elements only, skipping nested lists
    pub fn direct_trees(&self) -> impl Iterator<Item = &Tree> {
        self.iter().filter_map(Element::as_tree)
    }

    pub fn contains(&self, target: &Element) -> bool {
        self.iter().any(|elem| elem.same(target))
    }

    /// Replace every element identical to `old` with `new`
    ///
    /// Returns `None` when nothing matched. Cells after the last match are
    /// shared with `self`; cells up to and including it are fresh.
    pub fn replace(&self, old: &Element, new: &Element) -> Option<NodeList> {
        let mut prefix: Vec<&Cons> = Vec::new();
        let mut last_match = None;
        let mut cursor = &self.head;
        while let Some(cell) = cursor {
            if cell.elem.same(old) {
                last_match = Some(prefix.len());
            }
            prefix.push(cell);
            cursor = &cell.next.head;
        }

        let last = last_match?;
        let mut rebuilt = prefix[last].next.clone();
        for cell in prefix[..=last].iter().rev() {
            let elem = if cell.elem.same(old) {
                new.clone()
            } else {
                cell.elem.clone()
            };
            rebuilt = rebuilt.prepend(elem);
        }
        Some(rebuilt)
    }
}

impl fmt::Debug for NodeList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl FromIterator<Tree> for NodeList {
    fn from_iter<I: IntoIterator<Item = Tree>>(iter: I) -> Self {
        Self::from_trees(iter)
    }
}

/// Borrowing iterator over the elements of a [`NodeList`]
pub struct Iter<'a> {
    cursor: &'a NodeList,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let cell = self.cursor.head.as_ref()?;
        self.cursor = &cell.next;
        Some(&cell.elem)
    }
}

impl<'a> IntoIterator for &'a NodeList {
    type Item = &'a Element;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::TreeMaker;

    fn idents(names: &[&str]) -> Vec<Tree> {
        let maker = TreeMaker::new();
        names.iter().map(|name| maker.ident(name)).collect()
    }

    #[test]
    fn test_order_is_preserved() {
        let trees = idents(&["a", "b", "c"]);
        let list = NodeList::from_trees(trees.clone());
        assert_eq!(list.len(), 3);
        for (got, want) in list.trees().iter().zip(&trees) {
            assert!(Rc::ptr_eq(got, want));
        }
    }

    #[test]
    fn test_replace_shares_tail() {
        let trees = idents(&["a", "b", "c", "d"]);
        let list = NodeList::from_trees(trees.clone());
        let new = TreeMaker::new().ident("x");

        let rebuilt = list
            .replace(&Element::Tree(trees[1].clone()), &Element::Tree(new.clone()))
            .unwrap();

        let got = rebuilt.trees();
        assert!(Rc::ptr_eq(&got[0], &trees[0]));
        assert!(Rc::ptr_eq(&got[1], &new));
        assert!(Rc::ptr_eq(&got[2], &trees[2]));
        // the cell holding "c" is the old one
        let old_tail = list.tail().unwrap().tail().unwrap();
        let new_tail = rebuilt.tail().unwrap().tail().unwrap();
        assert!(old_tail.ptr_eq(new_tail));
        // original list untouched
        assert!(Rc::ptr_eq(&list.trees()[1], &trees[1]));
    }

    #[test]
    fn test_replace_every_occurrence() {
        let trees = idents(&["a", "b"]);
        let repeated = NodeList::from_trees(vec![
            trees[0].clone(),
            trees[1].clone(),
            trees[0].clone(),
        ]);
        let new = TreeMaker::new().ident("z");
        let rebuilt = repeated
            .replace(&Element::Tree(trees[0].clone()), &Element::Tree(new.clone()))
            .unwrap();
        let got = rebuilt.trees();
        assert!(Rc::ptr_eq(&got[0], &new));
        assert!(Rc::ptr_eq(&got[1], &trees[1]));
        assert!(Rc::ptr_eq(&got[2], &new));
    }

    #[test]
    fn test_replace_without_match_is_none() {
        let list = NodeList::from_trees(idents(&["a"]));
        let stranger = TreeMaker::new().ident("a");
        assert!(list.replace(&Element::Tree(stranger.clone()), &Element::Tree(stranger)).is_none());
    }

    #[test]
    fn test_nested_lists_flatten() {
        let trees = idents(&["a", "b", "c"]);
        let inner = NodeList::from_trees(vec![trees[1].clone(), trees[2].clone()]);
        let outer = NodeList::from_elements(vec![
            Element::Tree(trees[0].clone()),
            Element::List(inner),
        ]);
        assert_eq!(outer.len(), 2);
        assert_eq!(outer.trees().len(), 3);
        assert_eq!(outer.direct_trees().count(), 1);
    }
}
