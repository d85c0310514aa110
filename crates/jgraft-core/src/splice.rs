//! Subtree replacement inside the persistent host tree
//!
//! Host child sequences are immutable cons lists, so replacing one element
//! means rebuilding the list that holds it, then the list that holds that
//! list, and so on up to the field of the owning node. All of that happens
//! in locals; the single write to the holder's field is the only mutation.

use crate::error::JGraftError;
use crate::host::{Element, FieldValue, NodeList, Tree};
use crate::Result;
use std::rc::Rc;
use tracing::{debug, trace};

/// Where a host node sits: a field of `holder`, possibly inside nested lists
#[derive(Debug, Clone)]
pub struct SpliceSite {
    holder: Tree,
    field: &'static str,
    /// List containers from the one directly holding the target outward to
    /// the field value; empty for a plain tree-valued field
    chain: Vec<NodeList>,
}

impl SpliceSite {
    pub fn new(holder: Tree, field: &'static str, chain: Vec<NodeList>) -> Self {
        Self {
            holder,
            field,
            chain,
        }
    }

    /// Find the slot holding `target`, searching `holder` and then its descendants
    pub fn locate(holder: &Tree, target: &Tree) -> Option<SpliceSite> {
        if let Some(site) = Self::locate_direct(holder, target) {
            return Some(site);
        }
        let fields = holder.kind().fields();
        for field in fields {
            let children = match field.value {
                FieldValue::Tree(Some(child)) => vec![child],
                FieldValue::Tree(None) => continue,
                FieldValue::List(list) => list.trees(),
            };
            for child in &children {
                if let Some(site) = Self::locate(child, target) {
                    return Some(site);
                }
            }
        }
        None
    }

    fn locate_direct(holder: &Tree, target: &Tree) -> Option<SpliceSite> {
        let fields = holder.kind().fields();
        for field in fields {
            match &field.value {
                FieldValue::Tree(Some(child)) if Rc::ptr_eq(child, target) => {
                    return Some(SpliceSite::new(holder.clone(), field.name, Vec::new()));
                }
                FieldValue::List(list) => {
                    if let Some(chain) = containment_chain(list, target) {
                        return Some(SpliceSite::new(holder.clone(), field.name, chain));
                    }
                }
                _ => {}
            }
        }
        None
    }

    pub fn holder(&self) -> &Tree {
        &self.holder
    }

    pub fn field(&self) -> &'static str {
        self.field
    }

    pub fn chain(&self) -> &[NodeList] {
        &self.chain
    }
}

/// Lists leading from `list` down to the one that directly holds `target`,
/// innermost first
fn containment_chain(list: &NodeList, target: &Tree) -> Option<Vec<NodeList>> {
    for elem in list {
        match elem {
            Element::Tree(tree) if Rc::ptr_eq(tree, target) => return Some(vec![list.clone()]),
            Element::Tree(_) => {}
            Element::List(inner) => {
                if let Some(mut chain) = containment_chain(inner, target) {
                    chain.push(list.clone());
                    return Some(chain);
                }
            }
        }
    }
    None
}

/// Replace `old` with `new` at `site`
///
/// Returns `false` when `old` is not at the site; nothing is written then.
pub fn replace(site: &SpliceSite, old: &Tree, new: &Tree) -> Result<bool> {
    let Some((innermost, outer)) = site.chain.split_first() else {
        return replace_field(site, old, new);
    };

    let old_elem = Element::Tree(old.clone());
    let new_elem = Element::Tree(new.clone());
    let Some(mut rebuilt) = innermost.replace(&old_elem, &new_elem) else {
        trace!("No element to replace in '{}'", site.field);
        return Ok(false);
    };

    let mut previous = innermost.clone();
    for container in outer {
        let old_list = Element::List(previous);
        let new_list = Element::List(rebuilt);
        rebuilt = container.replace(&old_list, &new_list).ok_or_else(|| {
            JGraftError::splice_error(site.field, "nested list is no longer in its container")
        })?;
        previous = container.clone();
    }

    site.holder
        .kind_mut()
        .set_field(site.field, FieldValue::List(rebuilt))?;
    debug!(
        "Spliced {} into {}.{}",
        new.kind_name(),
        site.holder.kind_name(),
        site.field
    );
    Ok(true)
}

fn replace_field(site: &SpliceSite, old: &Tree, new: &Tree) -> Result<bool> {
    let current = site
        .holder
        .kind()
        .fields()
        .into_iter()
        .find(|field| field.name == site.field);
    let is_old = matches!(
        current,
        Some(crate::host::Field {
            value: FieldValue::Tree(Some(ref tree)),
            ..
        }) if Rc::ptr_eq(tree, old)
    );
    if !is_old {
        trace!("Field '{}' does not hold the node to replace", site.field);
        return Ok(false);
    }
    site.holder
        .kind_mut()
        .set_field(site.field, FieldValue::Tree(Some(new.clone())))?;
    debug!(
        "Spliced {} into {}.{}",
        new.kind_name(),
        site.holder.kind_name(),
        site.field
    );
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{TreeKind, TreeMaker};

    fn stats_of(block: &Tree) -> NodeList {
        match &*block.kind() {
            TreeKind::Block(block) => block.stats.clone(),
            other => panic!("expected a block, got {}", other.name()),
        }
    }

    #[test]
    fn test_replace_in_list_keeps_tail() {
        let maker = TreeMaker::new();
        let stats: Vec<Tree> = ["a", "b", "c"]
            .iter()
            .map(|name| maker.exec(maker.ident(name)))
            .collect();
        let block = maker.block(stats.clone());
        let before = stats_of(&block);

        let site = SpliceSite::locate(&block, &stats[0]).unwrap();
        assert_eq!(site.field(), "stats");
        let new = maker.exec(maker.ident("x"));
        assert!(replace(&site, &stats[0], &new).unwrap());

        let after = stats_of(&block);
        let trees = after.trees();
        assert!(Rc::ptr_eq(&trees[0], &new));
        assert!(Rc::ptr_eq(&trees[1], &stats[1]));
        assert!(before.tail().unwrap().ptr_eq(after.tail().unwrap()));
    }

    #[test]
    fn test_replace_direct_field() {
        let maker = TreeMaker::new();
        let cond = maker.ident("ready");
        let stat = maker.if_stat(cond.clone(), maker.block(vec![]), None);
        let site = SpliceSite::locate(&stat, &cond).unwrap();
        assert!(site.chain().is_empty());

        let new = maker.ident("done");
        assert!(replace(&site, &cond, &new).unwrap());
        let kind = stat.kind();
        let TreeKind::If(if_stat) = &*kind else {
            panic!("expected if");
        };
        assert!(Rc::ptr_eq(&if_stat.cond, &new));
    }

    #[test]
    fn test_replace_through_nested_lists() {
        let maker = TreeMaker::new();
        let a = maker.ident("a");
        let b = maker.ident("b");
        let inner = NodeList::from_trees(vec![a.clone(), b.clone()]);
        let outer = NodeList::from_elements(vec![
            Element::Tree(maker.ident("first")),
            Element::List(inner),
        ]);
        let holder = maker.block(vec![]);
        holder
            .kind_mut()
            .set_field("stats", FieldValue::List(outer))
            .unwrap();

        let site = SpliceSite::locate(&holder, &b).unwrap();
        assert_eq!(site.chain().len(), 2);
        let new = maker.ident("z");
        assert!(replace(&site, &b, &new).unwrap());

        let names: Vec<String> = stats_of(&holder)
            .trees()
            .iter()
            .map(|tree| match &*tree.kind() {
                TreeKind::Ident(ident) => ident.name.clone(),
                _ => String::new(),
            })
            .collect();
        assert_eq!(names, vec!["first", "a", "z"]);
    }

    #[test]
    fn test_missing_target_is_noop() {
        let maker = TreeMaker::new();
        let a = maker.exec(maker.ident("a"));
        let block = maker.block(vec![a.clone()]);
        let site = SpliceSite::locate(&block, &a).unwrap();
        let stranger = maker.exec(maker.ident("s"));
        let before = stats_of(&block);
        assert!(!replace(&site, &stranger, &a).unwrap());
        assert!(before.ptr_eq(&stats_of(&block)));
    }

    #[test]
    fn test_wrong_field_shape_is_splice_error() {
        let maker = TreeMaker::new();
        let a = maker.exec(maker.ident("a"));
        let block = maker.block(vec![a.clone()]);
        let bogus = SpliceSite::new(block.clone(), "label", vec![stats_of(&block)]);
        let err = replace(&bogus, &a, &maker.exec(maker.ident("b"))).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Splice);
    }
}
