use std::io::{self, Write};

use crate::convert::ConversionResult;

const FILENAME_WIDTH: usize = 30;
const SIZE_WIDTH: usize = 15;
const SAVED_WIDTH: usize = 10;
const STATUS_WIDTH: usize = 10;

/// Streaming fixed-width table writer. Rows are emitted as files
/// finish; nothing is buffered.
pub struct Report<W: Write> {
    out: W,
}

impl<W: Write> Report<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn header(&mut self) -> io::Result<()> {
        self.line("Filename", "Old Size", "New Size", "Saved", "Status")?;
        self.line(
            &"-".repeat(FILENAME_WIDTH),
            &"-".repeat(SIZE_WIDTH),
            &"-".repeat(SIZE_WIDTH),
            &"-".repeat(SAVED_WIDTH),
            &"-".repeat(STATUS_WIDTH),
        )
    }

    pub fn row(&mut self, result: &ConversionResult) -> io::Result<()> {
        self.line(
            &result.path.display().to_string(),
            &kib_cell(result.original_kib),
            &kib_cell(result.converted_kib),
            &saved_cell(result.saved_kib),
            result.status.as_str(),
        )
    }

    fn line(
        &mut self,
        filename: &str,
        old_size: &str,
        new_size: &str,
        saved: &str,
        status: &str,
    ) -> io::Result<()> {
        writeln!(
            self.out,
            "| {:<fw$} | {:<sw$} | {:<sw$} | {:<vw$} | {:<tw$} |",
            filename,
            old_size,
            new_size,
            saved,
            status,
            fw = FILENAME_WIDTH,
            sw = SIZE_WIDTH,
            vw = SAVED_WIDTH,
            tw = STATUS_WIDTH,
        )
    }
}

fn kib_cell(value: Option<u64>) -> String {
    match value {
        Some(kib) => format!("{} KB", kib),
        None => "N/A".to_string(),
    }
}

fn saved_cell(value: Option<i64>) -> String {
    match value {
        Some(kib) => format!("{} KB", kib),
        None => "N/A".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::{ConversionResult, ConversionStatus};
    use std::path::PathBuf;

    fn render(result: &ConversionResult) -> String {
        let mut out = Vec::new();
        Report::new(&mut out).row(result).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_header_layout() {
        let mut out = Vec::new();
        Report::new(&mut out).header().unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("| Filename"));
        assert!(lines[0].contains("| Old Size"));
        assert!(lines[0].contains("| New Size"));
        assert!(lines[0].contains("| Saved"));
        assert!(lines[0].contains("| Status"));
        assert!(lines[1].starts_with("| ------------------------------ |"));
        assert_eq!(lines[0].len(), lines[1].len());
    }

    #[test]
    fn test_success_row_renders_sizes() {
        let result = ConversionResult {
            path: PathBuf::from("photos/a.jpg"),
            original_kib: Some(50),
            converted_kib: Some(30),
            saved_kib: Some(20),
            status: ConversionStatus::Success,
        };
        let line = render(&result);
        assert!(line.contains("photos/a.jpg"));
        assert!(line.contains("| 50 KB"));
        assert!(line.contains("| 30 KB"));
        assert!(line.contains("| 20 KB"));
        assert!(line.contains("| Success"));
        assert!(!line.contains("N/A"));
    }

    #[test]
    fn test_skipped_row_renders_na() {
        let result = ConversionResult {
            path: PathBuf::from("photos/a.jpg"),
            original_kib: None,
            converted_kib: None,
            saved_kib: None,
            status: ConversionStatus::AlreadyExists,
        };
        let line = render(&result);
        assert_eq!(line.matches("N/A").count(), 3);
        assert!(line.contains("Already exists"));
    }

    #[test]
    fn test_negative_savings_render_signed() {
        let result = ConversionResult {
            path: PathBuf::from("a.png"),
            original_kib: Some(10),
            converted_kib: Some(12),
            saved_kib: Some(-2),
            status: ConversionStatus::Success,
        };
        let line = render(&result);
        assert!(line.contains("| -2 KB"));
    }
}
