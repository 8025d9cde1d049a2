// src/ui/page.rs
// =============================================================================
// Prints a viewer page to the terminal.
// =============================================================================

use crate::viewer::{Page, PageContent};
use std::io::{self, Write};

pub fn render<W: Write>(out: &mut W, page: &Page) -> io::Result<()> {
    let context = &page.context;
    writeln!(out, "--- {} @ {} ---", context.file_path(), context.branch())?;
    writeln!(out, "{}", page.url)?;
    writeln!(out)?;

    match &page.content {
        PageContent::Text { text } => {
            out.write_all(text.as_bytes())?;
            if !text.ends_with('\n') {
                writeln!(out)?;
            }
        }
        PageContent::Binary { bytes } => {
            writeln!(out, "Binary file, {} bytes; no preview available", bytes)?;
        }
        PageContent::NotLoaded => {}
    }

    writeln!(out, "--- end of {} ---", context.file_path())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browse::NavigationContext;

    fn page(content: PageContent) -> Page {
        let context = NavigationContext::new("https://github.com/acme/widget", "main", "README.md");
        Page {
            content,
            ..Page::unloaded(context).unwrap()
        }
    }

    #[test]
    fn test_text_page() {
        let mut out = Vec::new();
        render(
            &mut out,
            &page(PageContent::Text {
                text: "hello".to_string(),
            }),
        )
        .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "--- README.md @ main ---\n\
             https://raw.githubusercontent.com/acme/widget/main/README.md\n\
             \n\
             hello\n\
             --- end of README.md ---\n"
        );
    }

    #[test]
    fn test_binary_page() {
        let mut out = Vec::new();
        render(&mut out, &page(PageContent::Binary { bytes: 42 })).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Binary file, 42 bytes"));
    }
}
