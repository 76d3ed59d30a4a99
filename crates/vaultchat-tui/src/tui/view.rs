//! Retained view tree shared by the chat renderers.
//!
//! Renderers build an [`Element`] tree, the annotator rewrites it in place and
//! the lowering in [`crate::tui::widgets::lines`] turns it into terminal
//! lines. Interactivity is expressed as an [`Action`] attached to an element;
//! the owning renderer dispatches it when the element is activated.

/// Class names carried by rendered elements.
pub mod classes {
    pub const MESSAGE: &str = "vaultchat-message";
    pub const MESSAGE_ROLE: &str = "vaultchat-message-role";
    pub const MESSAGE_CONTENT: &str = "vaultchat-message-content";
    pub const REFERENCE: &str = "vaultchat-vault-link";
    pub const TOOL_CALLS: &str = "vaultchat-tool-calls";
    pub const TOOL_CALL: &str = "vaultchat-tool-call";
    pub const TOOL_CALL_HEADER: &str = "vaultchat-tool-call-header";
    pub const TOOL_CALL_ICON: &str = "vaultchat-tool-call-icon";
    pub const TOOL_CALL_NAME: &str = "vaultchat-tool-call-name";
    pub const TOOL_CALL_DESC: &str = "vaultchat-tool-call-desc";
    pub const TOOL_CALL_STATUS: &str = "vaultchat-tool-call-status";
    pub const TOOL_CALL_CONTENT: &str = "vaultchat-tool-call-content";
    pub const TOOL_CALL_ERROR: &str = "vaultchat-tool-call-error";
    pub const TOOL_CALL_TIMING: &str = "vaultchat-tool-call-timing";
    pub const COLLAPSED: &str = "collapsed";
    pub const STREAMING: &str = "vaultchat-streaming";
    pub const STREAMING_DOT: &str = "vaultchat-streaming-dot";
}

/// Behaviour attached to an activatable element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Open a document-store path, retrying with the default extension
    OpenReference { path: String },
    /// Flip a tool call inspector between collapsed and expanded
    ToggleToolCall { id: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tag {
    Block,
    Inline,
    Paragraph,
    Heading(u8),
    Strong,
    Emphasis,
    Strikethrough,
    /// Literal code, inline or inside a `Pre`
    Code,
    Pre,
    Link { href: String },
    List { start: Option<u64> },
    ListItem,
    BlockQuote,
    Rule,
    LineBreak,
    Label,
    Icon(String),
}

impl Tag {
    pub fn is_block(&self) -> bool {
        matches!(
            self,
            Tag::Block
                | Tag::Paragraph
                | Tag::Heading(_)
                | Tag::Pre
                | Tag::List { .. }
                | Tag::ListItem
                | Tag::BlockQuote
                | Tag::Rule
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewNode {
    Text(String),
    Element(Element),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: Tag,
    pub classes: Vec<String>,
    pub children: Vec<ViewNode>,
    pub action: Option<Action>,
    /// Kept in the tree but skipped when drawn
    pub hidden: bool,
}

impl Element {
    pub fn new(tag: Tag) -> Self {
        Self {
            tag,
            classes: Vec::new(),
            children: Vec::new(),
            action: None,
            hidden: false,
        }
    }

    pub fn block(class: &str) -> Self {
        Self::new(Tag::Block).with_class(class)
    }

    pub fn inline(class: &str) -> Self {
        Self::new(Tag::Inline).with_class(class)
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.add_class(class);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.push_text(text);
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.push(child);
        self
    }

    pub fn with_action(mut self, action: Action) -> Self {
        self.action = Some(action);
        self
    }

    pub fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.to_string());
        }
    }

    pub fn remove_class(&mut self, class: &str) {
        self.classes.retain(|c| c != class);
    }

    pub fn set_class(&mut self, class: &str, present: bool) {
        if present {
            self.add_class(class);
        } else {
            self.remove_class(class);
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn push(&mut self, child: Element) {
        self.children.push(ViewNode::Element(child));
    }

    /// Append text, merging with a trailing text node.
    pub fn push_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text.is_empty() {
            return;
        }
        if let Some(ViewNode::Text(last)) = self.children.last_mut() {
            last.push_str(&text);
        } else {
            self.children.push(ViewNode::Text(text));
        }
    }

    pub fn clear(&mut self) {
        self.children.clear();
    }

    /// Concatenated text of the whole subtree.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                ViewNode::Text(text) => out.push_str(text),
                ViewNode::Element(el) => el.collect_text(out),
            }
        }
    }

    /// Depth-first search including `self`.
    pub fn find(&self, pred: &dyn Fn(&Element) -> bool) -> Option<&Element> {
        if pred(self) {
            return Some(self);
        }
        self.child_elements().find_map(|child| child.find(pred))
    }

    pub fn find_mut(&mut self, pred: &dyn Fn(&Element) -> bool) -> Option<&mut Element> {
        if pred(self) {
            return Some(self);
        }
        for child in &mut self.children {
            if let ViewNode::Element(el) = child
                && let Some(found) = el.find_mut(pred)
            {
                return Some(found);
            }
        }
        None
    }

    /// Every matching element in document order, including `self`.
    pub fn find_all(&self, pred: &dyn Fn(&Element) -> bool) -> Vec<&Element> {
        let mut out = Vec::new();
        self.collect_matching(pred, &mut out);
        out
    }

    fn collect_matching<'a>(&'a self, pred: &dyn Fn(&Element) -> bool, out: &mut Vec<&'a Element>) {
        if pred(self) {
            out.push(self);
        }
        for child in self.child_elements() {
            child.collect_matching(pred, out);
        }
    }

    pub fn find_by_class(&self, class: &str) -> Option<&Element> {
        self.find(&|el| el.has_class(class))
    }

    pub fn find_all_by_class(&self, class: &str) -> Vec<&Element> {
        self.find_all(&|el| el.has_class(class))
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|child| match child {
            ViewNode::Element(el) => Some(el),
            ViewNode::Text(_) => None,
        })
    }

    /// Actions of all activatable elements in document order.
    pub fn actions(&self) -> Vec<&Action> {
        self.find_all(&|el| el.action.is_some())
            .into_iter()
            .filter_map(|el| el.action.as_ref())
            .collect()
    }
}
