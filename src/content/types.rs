/// Generated post awaiting publication; `body` is an HTML fragment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentDraft {
    pub title: String,
    pub body: String,
}

impl ContentDraft {
    /// Both halves must be non-blank before anything is sent to the blog
    pub fn is_publishable(&self) -> bool {
        !self.title.trim().is_empty() && !self.body.trim().is_empty()
    }
}
