use std::collections::BTreeMap;

/// Node of the nested display tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub name: String,
    /// Full path of the node from the root
    pub path: String,
    pub kind: NodeKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    File,
    Directory { children: Vec<TreeNode> },
}

impl TreeNode {
    pub fn is_directory(&self) -> bool {
        matches!(self.kind, NodeKind::Directory { .. })
    }

    pub fn children(&self) -> &[TreeNode] {
        match &self.kind {
            NodeKind::Directory { children } => children,
            NodeKind::File => &[],
        }
    }

    /// Find a descendant by its full path
    pub fn find(&self, path: &str) -> Option<&TreeNode> {
        if self.path == path {
            return Some(self);
        }
        self.children().iter().find_map(|child| child.find(path))
    }
}

#[derive(Default)]
struct Builder {
    is_dir: bool,
    children: BTreeMap<String, Builder>,
}

impl Builder {
    fn insert(&mut self, segments: &[&str], is_file: bool) {
        match segments.split_first() {
            Some((head, [])) => {
                let node = self.children.entry(head.to_string()).or_default();
                node.is_dir |= !is_file;
            }
            Some((head, rest)) => {
                let node = self.children.entry(head.to_string()).or_default();
                node.is_dir = true;
                node.insert(rest, is_file);
            }
            None => {}
        }
    }

    fn finish(self, prefix: &str) -> Vec<TreeNode> {
        // directories first, then files, each alphabetically
        let mut nodes: Vec<TreeNode> = self
            .children
            .into_iter()
            .map(|(name, node)| {
                let path = crate::path::join(prefix, &name);
                let kind = if node.is_dir {
                    NodeKind::Directory {
                        children: node.finish(&path),
                    }
                } else {
                    NodeKind::File
                };
                TreeNode { name, path, kind }
            })
            .collect();
        nodes.sort_by_key(|node| !node.is_directory());
        nodes
    }
}

/// Nest flat directory and file paths into a tree
///
/// Every path segment becomes a node. Directories without files stay as
/// childless directory nodes.
pub fn build_tree<'a, D, F>(directories: D, files: F) -> Vec<TreeNode>
where
    D: IntoIterator<Item = &'a str>,
    F: IntoIterator<Item = &'a str>,
{
    let mut root = Builder::default();
    for dir in directories {
        root.insert(&segments(dir), false);
    }
    for file in files {
        root.insert(&segments(file), true);
    }
    root.finish("")
}

fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nesting() {
        let tree = build_tree(["docs/empty"], ["docs/a.md", "docs/sub/b.md", "top.txt"]);

        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].name, "docs");
        assert_eq!(tree[1].name, "top.txt");
        assert!(!tree[1].is_directory());

        let docs = &tree[0];
        let names: Vec<_> = docs.children().iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["empty", "sub", "a.md"]);

        let b = docs.find("docs/sub/b.md").unwrap();
        assert_eq!(b.kind, NodeKind::File);
    }

    #[test]
    fn test_empty_directory_is_childless_node() {
        let tree = build_tree(["d/sub"], std::iter::empty());

        let sub = tree[0].find("d/sub").unwrap();
        assert!(sub.is_directory());
        assert!(sub.children().is_empty());
    }

    #[test]
    fn test_directory_wins_over_file_with_same_path() {
        let tree = build_tree(["x"], ["x", "x/y.txt"]);
        assert!(tree[0].is_directory());
        assert_eq!(tree[0].children().len(), 1);
    }
}
