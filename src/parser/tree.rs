//! Owned element tree for a single record scope (one room, class, constraint
//! or student). Built by the stream walker, read by the extractors, dropped
//! when the scope closes.

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    /// Local tag name, namespace prefix stripped.
    pub name: String,
    /// Attributes keyed by their raw (qualified) name, in document order.
    pub attrs: Vec<(String, String)>,
    /// Text before the first child element.
    pub text: Option<String>,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_attr(&self, key: &str) -> bool {
        self.attrs.iter().any(|(k, _)| k == key)
    }

    /// The `id` attribute, with an empty value treated as missing.
    pub fn id(&self) -> Option<&str> {
        self.attr("id").filter(|v| !v.is_empty())
    }

    /// Direct children with the given local name.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    pub fn first_child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Append character data. Text after the first child belongs to that
    /// child's tail and is not kept.
    pub fn push_text(&mut self, chunk: &str) {
        if !self.children.is_empty() {
            return;
        }
        self.text.get_or_insert_with(String::new).push_str(chunk);
    }

    /// Drop attributes, text and children, keeping only the tag name.
    pub fn clear(&mut self) {
        self.attrs.clear();
        self.text = None;
        self.children.clear();
    }
}

#[cfg(test)]
impl Element {
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((key.into(), value.into()));
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }
}
