//! Generate and query command report data structures.

use std::path::PathBuf;

use tablegen_core::Artifact;

use super::output::{Output, Report};

/// Report data from artifact generation.
#[derive(Debug)]
pub struct GenerateReport {
    /// Heading, e.g. `3 tables` or the query base name.
    pub subject: String,

    /// Format identifiers that ran.
    pub formats: Vec<String>,

    /// Files written or previewed.
    pub result: GenerationResult,
}

/// Result of generation.
#[derive(Debug)]
pub enum GenerationResult {
    /// Files were written to disk.
    Written(WrittenResult),
    /// Dry-run preview.
    Preview(PreviewResult),
}

/// Result when files were written to disk.
#[derive(Debug)]
pub struct WrittenResult {
    pub output_dir: PathBuf,
    pub written: Vec<String>,
    /// Existing files left untouched.
    pub skipped: Vec<String>,
}

/// Result of a dry-run preview.
#[derive(Debug)]
pub struct PreviewResult {
    /// Files that would be generated.
    pub files: Vec<Artifact>,
}

impl Report for GenerateReport {
    fn render(&self, out: &mut dyn Output) {
        match &self.result {
            GenerationResult::Written(written) => self.render_written(out, written),
            GenerationResult::Preview(preview) => self.render_preview(out, preview),
        }
    }
}

impl GenerateReport {
    fn render_written(&self, out: &mut dyn Output, written: &WrittenResult) {
        out.preformatted(&self.subject);
        out.key_value("Formats", &self.formats.join(", "));
        out.newline();

        out.section(&format!("Generated ({})", written.written.len()));
        for path in &written.written {
            out.added_item(path);
        }

        if !written.skipped.is_empty() {
            out.newline();
            out.section("Kept existing");
            for path in &written.skipped {
                out.skipped_item(path);
            }
        }

        out.newline();
        out.key_value("Output", &written.output_dir.display().to_string());
    }

    fn render_preview(&self, out: &mut dyn Output, preview: &PreviewResult) {
        for file in &preview.files {
            out.divider(&file.path);
            out.preformatted(&file.content);
        }

        out.divider("Summary");
        out.preformatted(&format!("{} files would be generated", preview.files.len()));
    }
}
