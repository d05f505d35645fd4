use std::fmt::Write as _;

/// Minimal append-only HTML builder. Text is always escaped; tags and class
/// lists come from the templates themselves.
#[derive(Debug, Default)]
pub struct Html {
    buf: String,
}

impl Html {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, tag: &str, class: &str) -> &mut Self {
        if class.is_empty() {
            let _ = write!(self.buf, "<{tag}>");
        } else {
            let _ = write!(self.buf, "<{tag} class=\"{class}\">");
        }
        self
    }

    pub fn open_with_id(&mut self, tag: &str, id: &str, class: &str) -> &mut Self {
        let _ = write!(self.buf, "<{tag} id=\"{id}\" class=\"{class}\">");
        self
    }

    pub fn close(&mut self, tag: &str) -> &mut Self {
        let _ = write!(self.buf, "</{tag}>");
        self
    }

    pub fn text(&mut self, text: &str) -> &mut Self {
        escape_into(&mut self.buf, text);
        self
    }

    /// `<tag class="…">text</tag>`
    pub fn element(&mut self, tag: &str, class: &str, text: &str) -> &mut Self {
        self.open(tag, class).text(text).close(tag)
    }

    pub fn image(&mut self, src: &str, alt: &str, class: &str) -> &mut Self {
        self.buf.push_str("<img src=\"");
        escape_into(&mut self.buf, src);
        self.buf.push_str("\" alt=\"");
        escape_into(&mut self.buf, alt);
        let _ = write!(self.buf, "\" class=\"{class}\">");
        self
    }

    /// Inline width style for level bars.
    pub fn bar(&mut self, class: &str, percent: u8) -> &mut Self {
        let _ = write!(
            self.buf,
            "<div class=\"{class}\" style=\"width: {percent}%\"></div>"
        );
        self
    }

    pub fn finish(self) -> String {
        self.buf
    }
}

fn escape_into(buf: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => buf.push_str("&amp;"),
            '<' => buf.push_str("&lt;"),
            '>' => buf.push_str("&gt;"),
            '"' => buf.push_str("&quot;"),
            '\'' => buf.push_str("&#39;"),
            _ => buf.push(c),
        }
    }
}
