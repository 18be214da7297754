use scraper::{ElementRef, Html, Node};

/// Position of a node inside a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
enum NodeData {
    Element {
        name: String,
        attributes: Vec<(String, String)>,
    },
    Text(String),
}

#[derive(Debug, Clone)]
struct NodeEntry {
    data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Mutable markup tree of a page.
///
/// Built once from the scraper parse of the response body. Nodes are never
/// removed; replacing content detaches the old children and appends new ones.
#[derive(Debug, Clone, Default)]
pub struct Document {
    nodes: Vec<NodeEntry>,
    root: Option<NodeId>,
}

impl Document {
    pub fn parse(markup: &str) -> Self {
        let html = Html::parse_document(markup);
        let mut document = Document::default();
        let root = document.append_element(html.root_element(), None);
        document.root = Some(root);
        document
    }

    fn append_element(&mut self, element: ElementRef<'_>, parent: Option<NodeId>) -> NodeId {
        let value = element.value();
        let id = self.push(
            NodeData::Element {
                name: value.name().to_ascii_lowercase(),
                attributes: value
                    .attrs()
                    .map(|(name, value)| (name.to_ascii_lowercase(), value.to_string()))
                    .collect(),
            },
            parent,
        );

        // the parser drops the line break after <textarea>; keep the tree in
        // the same shape set_text writes so readers strip exactly one
        if value.name().eq_ignore_ascii_case("textarea") {
            self.push(NodeData::Text("\n".to_string()), Some(id));
        }

        for child in element.children() {
            match child.value() {
                Node::Element(_) => {
                    if let Some(child) = ElementRef::wrap(child) {
                        self.append_element(child, Some(id));
                    }
                }
                Node::Text(text) => {
                    let text: &str = text;
                    self.push(NodeData::Text(text.to_string()), Some(id));
                }
                _ => {}
            }
        }

        id
    }

    fn push(&mut self, data: NodeData, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeEntry {
            data,
            parent,
            children: Vec::new(),
        });
        if let Some(parent) = parent {
            self.nodes[parent.0].children.push(id);
        }
        id
    }

    fn entry(&self, node: NodeId) -> Option<&NodeEntry> {
        self.nodes.get(node.0)
    }

    /// The `<html>` element.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn is_element(&self, node: NodeId) -> bool {
        matches!(
            self.entry(node).map(|e| &e.data),
            Some(NodeData::Element { .. })
        )
    }

    /// Lower-cased tag name, `None` for text nodes.
    pub fn tag_name(&self, node: NodeId) -> Option<&str> {
        match self.entry(node).map(|e| &e.data) {
            Some(NodeData::Element { name, .. }) => Some(name.as_str()),
            _ => None,
        }
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        match self.entry(node).map(|e| &e.data) {
            Some(NodeData::Element { attributes, .. }) => attributes
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, value)| value.as_str()),
            _ => None,
        }
    }

    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(NodeEntry {
            data: NodeData::Element { attributes, .. },
            ..
        }) = self.nodes.get_mut(node.0)
        {
            match attributes
                .iter_mut()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
            {
                Some((_, existing)) => *existing = value.to_string(),
                None => attributes.push((name.to_ascii_lowercase(), value.to_string())),
            }
        }
    }

    pub fn remove_attribute(&mut self, node: NodeId, name: &str) {
        if let Some(NodeEntry {
            data: NodeData::Element { attributes, .. },
            ..
        }) = self.nodes.get_mut(node.0)
        {
            attributes.retain(|(key, _)| !key.eq_ignore_ascii_case(name));
        }
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.entry(node).and_then(|e| e.parent)
    }

    /// Element children in document order.
    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.entry(node)
            .map(|e| {
                e.children
                    .iter()
                    .copied()
                    .filter(|child| self.is_element(*child))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Element descendants of `node` in document order, excluding `node`.
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut stack: Vec<NodeId> = self.children(node).into_iter().rev().collect();

        while let Some(current) = stack.pop() {
            found.push(current);
            stack.extend(self.children(current).into_iter().rev());
        }

        found
    }

    /// Every element in the document, root included.
    pub fn elements(&self) -> Vec<NodeId> {
        match self.root {
            Some(root) => {
                let mut all = vec![root];
                all.extend(self.descendants(root));
                all
            }
            None => Vec::new(),
        }
    }

    pub fn ancestor(&self, node: NodeId, tag: &str) -> Option<NodeId> {
        let mut current = self.parent(node);
        while let Some(candidate) = current {
            if self.tag_name(candidate) == Some(tag) {
                return Some(candidate);
            }
            current = self.parent(candidate);
        }
        None
    }

    /// Concatenated text of every text node below `node`.
    pub fn text(&self, node: NodeId) -> String {
        let mut text = String::new();
        self.collect_text(node, &mut text);
        text
    }

    fn collect_text(&self, node: NodeId, buffer: &mut String) {
        let Some(entry) = self.entry(node) else {
            return;
        };
        match &entry.data {
            NodeData::Text(value) => buffer.push_str(value),
            NodeData::Element { .. } => {
                for child in &entry.children {
                    self.collect_text(*child, buffer);
                }
            }
        }
    }

    /// Replace the content of `node` with a single text node.
    pub fn set_text(&mut self, node: NodeId, value: &str) {
        if !self.is_element(node) {
            return;
        }
        let detached = std::mem::take(&mut self.nodes[node.0].children);
        for child in detached {
            self.nodes[child.0].parent = None;
        }
        self.push(NodeData::Text(value.to_string()), Some(node));
    }
}
