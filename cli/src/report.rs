use std::path::PathBuf;

/// Result of processing a single file.
#[derive(Debug)]
pub struct FileResult {
    pub path: PathBuf,
    pub original_size: u64,
    pub output_size: u64,
    pub error: Option<String>,
}

impl FileResult {
    pub fn failed(path: PathBuf, error: String) -> Self {
        Self {
            path,
            original_size: 0,
            output_size: 0,
            error: Some(error),
        }
    }

    /// Output size relative to input, as a signed percentage.
    pub fn size_change_pct(&self) -> f64 {
        if self.original_size == 0 {
            return 0.0;
        }
        (self.output_size as f64 / self.original_size as f64 - 1.0) * 100.0
    }
}

/// Aggregate report for all processed files.
#[derive(Debug, Default)]
pub struct Report {
    pub results: Vec<FileResult>,
}

impl Report {
    fn succeeded(&self) -> impl Iterator<Item = &FileResult> {
        self.results.iter().filter(|r| r.error.is_none())
    }

    pub fn total_original(&self) -> u64 {
        self.succeeded().map(|r| r.original_size).sum()
    }

    pub fn total_output(&self) -> u64 {
        self.succeeded().map(|r| r.output_size).sum()
    }

    pub fn success_count(&self) -> usize {
        self.succeeded().count()
    }

    pub fn error_count(&self) -> usize {
        self.results.iter().filter(|r| r.error.is_some()).count()
    }

    pub fn print_summary(&self) {
        println!("\n--- Summary ---");
        println!(
            "Files processed: {} | Errors: {}",
            self.success_count(),
            self.error_count()
        );

        if self.success_count() > 0 {
            println!(
                "Total: {} → {}",
                format_size(self.total_original()),
                format_size(self.total_output()),
            );
        }

        for r in &self.results {
            if let Some(ref err) = r.error {
                println!("  ERROR {}: {}", r.path.display(), err);
            }
        }
    }
}

impl FromIterator<FileResult> for Report {
    fn from_iter<I: IntoIterator<Item = FileResult>>(iter: I) -> Self {
        Self {
            results: iter.into_iter().collect(),
        }
    }
}

fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * KB;
    if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
