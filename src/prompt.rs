//! Interactive y/n confirmation.

use colored::Colorize;
use std::io::{BufRead, Write};

/// Ask `question` up to `tries` times and report whether the answer starts
/// with `y` (case insensitive).
///
/// Blank answers use up a try. End of input and running out of tries both
/// count as "no".
pub fn confirm<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
    question: &str,
    tries: usize,
) -> std::io::Result<bool> {
    for _ in 0..tries {
        write!(writer, "{} [y/n]: ", question.bold())?;
        writer.flush()?;

        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            log::debug!("confirm() end of input");
            return Ok(false);
        }

        let answer = line.trim().to_lowercase();
        match answer.chars().next() {
            Some(c) => return Ok(c == 'y'),
            None => continue,
        }
    }
    log::debug!("confirm() no answer after {tries} tries");
    Ok(false)
}

/// Run [`confirm`] on the blocking thread pool so a slow answer does not hold
/// a runtime worker.
pub async fn confirm_blocking<R, W>(
    mut reader: R,
    mut writer: W,
    question: String,
    tries: usize,
) -> std::io::Result<bool>
where
    R: BufRead + Send + 'static,
    W: Write + Send + 'static,
{
    tokio::task::spawn_blocking(move || confirm(&mut reader, &mut writer, &question, tries))
        .await
        .map_err(std::io::Error::other)?
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn ask(input: &str, tries: usize) -> (bool, String) {
        colored::control::set_override(false);
        let mut reader = Cursor::new(input.as_bytes().to_vec());
        let mut out = Vec::new();
        let answer = confirm(&mut reader, &mut out, "Delete?", tries).expect("io");
        (answer, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_confirm_yes() {
        assert!(ask("y\n", 3).0);
        assert!(ask("Yes\n", 3).0);
        assert!(ask("  YES please\n", 3).0);
    }

    #[test]
    fn test_confirm_no() {
        assert!(!ask("n\n", 3).0);
        assert!(!ask("maybe\n", 3).0);
    }

    #[test]
    fn test_confirm_end_of_input() {
        let (answer, out) = ask("", 3);
        assert!(!answer);
        assert_eq!(out, "Delete? [y/n]: ");
    }

    #[test]
    fn test_confirm_blank_retries() {
        let (answer, out) = ask("\n   \ny\n", 3);
        assert!(answer);
        assert_eq!(out.matches("[y/n]").count(), 3);
    }

    #[test]
    fn test_confirm_runs_out_of_tries() {
        let (answer, out) = ask("\n\n\ny\n", 3);
        assert!(!answer, "answer after the last try must be ignored");
        assert_eq!(out.matches("[y/n]").count(), 3);
    }

    #[test]
    fn test_confirm_without_newline() {
        assert!(ask("y", 3).0);
    }

    #[tokio::test]
    async fn test_confirm_blocking() {
        let yes = Cursor::new(b"\ny\n".to_vec());
        assert!(confirm_blocking(yes, std::io::sink(), "Delete?".into(), 3)
            .await
            .expect("io"));

        let eof = Cursor::new(Vec::new());
        assert!(!confirm_blocking(eof, std::io::sink(), "Delete?".into(), 3)
            .await
            .expect("io"));
    }
}
