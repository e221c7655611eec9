//! PDF confirmation generator via HTML-to-PDF conversion
//!
//! Generates the PDF by first writing the HTML confirmation and then
//! converting it with headless Chrome/Chromium or a configured converter.

use super::html::HtmlReporter;
use crate::core::report::{ConfirmationContext, ReportGenerator};
use crate::debug;
use std::error::Error;
use std::path::Path;
use std::process::{Command, Stdio};

/// PDF confirmation generator using HTML-to-PDF conversion
pub struct PdfReporter {
    /// Optional custom PDF converter command
    converter: Option<String>,
}

impl PdfReporter {
    /// Create a new PDF reporter
    #[must_use]
    pub const fn new() -> Self {
        Self { converter: None }
    }

    /// Create a PDF reporter with a custom converter
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn with_converter(converter: &str) -> Self {
        Self {
            converter: Some(converter.to_owned()),
        }
    }

    /// Detect available Chrome/Chromium browser
    fn detect_chrome() -> Option<String> {
        let candidates = [
            "google-chrome",
            "chrome",
            "chromium",
            "chromium-browser",
            "google-chrome-stable",
            "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome", // macOS
            "C:\\Program Files\\Google\\Chrome\\Application\\chrome.exe",   // Windows
            "C:\\Program Files (x86)\\Google\\Chrome\\Application\\chrome.exe",
        ];

        candidates
            .into_iter()
            .find(|candidate| {
                Command::new(candidate)
                    .arg("--version")
                    .output()
                    .is_ok_and(|output| output.status.success())
            })
            .map(str::to_owned)
    }

    fn html_to_pdf_chrome(
        chrome_cmd: &str,
        html_path: &Path,
        pdf_path: &Path,
    ) -> Result<(), Box<dyn Error>> {
        debug!("Converting {} with {chrome_cmd}", html_path.display());
        let status = Command::new(chrome_cmd)
            .arg("--headless=new")
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--no-pdf-header-footer")
            .arg("--run-all-compositor-stages-before-draw")
            .arg(format!("--print-to-pdf={}", pdf_path.display()))
            .arg(format!("file://{}", html_path.canonicalize()?.display()))
            .stderr(Stdio::null())
            .stdout(Stdio::null())
            .status()?;

        if !status.success() {
            return Err("Chrome PDF conversion failed".into());
        }

        Ok(())
    }

    fn convert_html_to_pdf(&self, html_path: &Path, pdf_path: &Path) -> Result<(), Box<dyn Error>> {
        if let Some(converter) = &self.converter {
            return Self::html_to_pdf_chrome(converter, html_path, pdf_path);
        }

        if let Some(chrome) = Self::detect_chrome() {
            return Self::html_to_pdf_chrome(&chrome, html_path, pdf_path);
        }

        Err("PDF conversion failed: Chrome/Chromium not found.\n\
            \n\
            To export PDF confirmations, install Chrome or Chromium:\n\
            \n\
            • Ubuntu/Debian:  sudo apt install chromium-browser\n\
            • Fedora/RHEL:    sudo dnf install chromium\n\
            • macOS:          brew install --cask google-chrome\n\
            • Windows:        Download from https://www.google.com/chrome/\n\
            \n\
            Alternatively, set a converter:\n\
              courseselect config set pdf_converter /path/to/chrome\n\
            \n\
            or export HTML instead with --format html\n\
            "
        .into())
    }
}

impl Default for PdfReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for PdfReporter {
    /// Write the HTML confirmation to a temporary file, then convert it
    fn generate(
        &self,
        ctx: &ConfirmationContext,
        output_path: &Path,
    ) -> Result<(), Box<dyn Error>> {
        let html_path = std::env::temp_dir().join(format!(
            "course_selection_{}.html",
            std::process::id()
        ));
        HtmlReporter::new().generate(ctx, &html_path)?;

        let result = self.convert_html_to_pdf(&html_path, output_path);
        let _ = std::fs::remove_file(&html_path);
        result
    }

    fn render(&self, _ctx: &ConfirmationContext) -> Result<String, Box<dyn Error>> {
        Ok(String::from(
            "PDF confirmations are generated via HTML-to-PDF conversion.",
        ))
    }
}
