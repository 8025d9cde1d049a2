// src/ui/prompt.rs
// =============================================================================
// Line-based prompts on a terminal.
//
// A dialog is printed as a numbered list; the user types a number.
//   - empty line or end of input   -> dismissed
//   - "0" when there is a Cancel   -> dismissed
//   - anything else out of range   -> asked again
// =============================================================================

use crate::browse::{Chooser, Dialog};
use futures::future::{BoxFuture, FutureExt};
use std::io::{self, Write};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Reads one line, trimmed. `None` at end of input.
pub async fn read_line<R>(input: &mut R) -> io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    let mut line = String::new();
    let read = input.read_line(&mut line).await?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// A [`Chooser`] that prints to `out` and reads answers from `input`.
pub struct PromptChooser<'a, R, W> {
    input: &'a mut R,
    out: &'a mut W,
}

impl<'a, R, W> PromptChooser<'a, R, W> {
    pub fn new(input: &'a mut R, out: &'a mut W) -> Self {
        Self { input, out }
    }
}

impl<'s, R, W> PromptChooser<'s, R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: Write + Send,
{
    fn print_dialog(&mut self, dialog: &Dialog<'_>) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "{}", dialog.title)?;
        for (i, item) in dialog.items.iter().enumerate() {
            writeln!(self.out, "{:>4}. {}", i + 1, item)?;
        }
        match dialog.cancel_label {
            Some(label) => writeln!(self.out, "{:>4}. {}", 0, label)?,
            None => writeln!(self.out, "      (empty line to dismiss)")?,
        }
        Ok(())
    }

    async fn ask(&mut self, dialog: Dialog<'_>) -> io::Result<Option<usize>> {
        self.print_dialog(&dialog)?;
        let len = dialog.items.len();

        loop {
            write!(self.out, "> ")?;
            self.out.flush()?;

            let Some(line) = read_line(self.input).await? else {
                return Ok(None);
            };
            if line.is_empty() {
                return Ok(None);
            }

            match line.parse::<usize>() {
                Ok(0) if dialog.cancel_label.is_some() => return Ok(None),
                Ok(n) if (1..=len).contains(&n) => return Ok(Some(n - 1)),
                _ => writeln!(self.out, "Please enter a number between 1 and {}", len)?,
            }
        }
    }
}

impl<'s, R, W> Chooser for PromptChooser<'s, R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: Write + Send,
{
    fn choose<'a>(&'a mut self, dialog: Dialog<'a>) -> BoxFuture<'a, io::Result<Option<usize>>> {
        self.ask(dialog).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    async fn answer(script: &str, dialog: Dialog<'_>) -> (Option<usize>, String) {
        let mut input = script.as_bytes();
        let mut out = Vec::new();
        let picked = PromptChooser::new(&mut input, &mut out)
            .choose(dialog)
            .await
            .unwrap();
        (picked, String::from_utf8(out).unwrap())
    }

    #[tokio::test]
    async fn test_pick_by_number() {
        let branches = items(&["main", "dev"]);
        let dialog = Dialog {
            title: "Choose a branch",
            items: &branches,
            cancel_label: None,
        };

        let (picked, out) = answer("2\n", dialog).await;
        assert_eq!(picked, Some(1));
        assert!(out.contains("Choose a branch"));
        assert!(out.contains("   1. main"));
        assert!(out.contains("   2. dev"));
    }

    #[tokio::test]
    async fn test_reprompt_on_bad_input() {
        let files = items(&["a.txt"]);
        let dialog = Dialog {
            title: "Choose a file to open",
            items: &files,
            cancel_label: Some("Cancel"),
        };

        let (picked, out) = answer("abc\n5\n1\n", dialog).await;
        assert_eq!(picked, Some(0));
        assert_eq!(out.matches("Please enter a number between 1 and 1").count(), 2);
    }

    #[tokio::test]
    async fn test_dismiss() {
        let files = items(&["a.txt", "b.txt"]);
        let with_cancel = Dialog {
            title: "Choose a file to open",
            items: &files,
            cancel_label: Some("Cancel"),
        };

        assert_eq!(answer("0\n", with_cancel).await.0, None);
        assert_eq!(answer("\n", with_cancel).await.0, None);
        assert_eq!(answer("", with_cancel).await.0, None);

        let without_cancel = Dialog {
            cancel_label: None,
            ..with_cancel
        };
        // "0" is just out of range when there is no Cancel entry
        assert_eq!(answer("0\n2\n", without_cancel).await.0, Some(1));
    }

    #[tokio::test]
    async fn test_read_line() {
        let mut input = "  hello \nworld".as_bytes();
        assert_eq!(read_line(&mut input).await.unwrap().as_deref(), Some("hello"));
        assert_eq!(read_line(&mut input).await.unwrap().as_deref(), Some("world"));
        assert_eq!(read_line(&mut input).await.unwrap(), None);
    }
}
