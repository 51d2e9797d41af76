use serde::Serialize;

/// Renderable markup plus the stylesheets it needs.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Fragment {
    pub content: String,
    pub css_urls: Vec<String>,
}

impl Fragment {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            css_urls: Vec::new(),
        }
    }

    pub fn add_content(&mut self, content: &str) {
        self.content.push_str(content);
    }

    pub fn add_css_url(&mut self, url: impl Into<String>) {
        let url = url.into();
        if !self.css_urls.contains(&url) {
            self.css_urls.push(url);
        }
    }
}
