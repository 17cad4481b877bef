pub mod latex;

use std::path::Path;
use std::time::Duration;

use clap::ValueEnum;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::errors::ExportError;
use crate::export::latex::LatexResumeAssembler;
use crate::models::document::MarkupDocument;
use crate::render::tree::VisualTree;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// A4 portrait PDF compiled with an embedded TeX engine
    #[default]
    Pdf,
    /// Standalone print-ready HTML
    Html,
}

/// What can be written out: a locally rendered tree, or markup the model wrote.
#[derive(Debug, Clone, Copy)]
pub enum Exportable<'a> {
    Tree(&'a VisualTree),
    Markup(&'a MarkupDocument),
}

pub trait ExportAdapter {
    fn export(&self, item: Exportable<'_>) -> Result<Vec<u8>, ExportError>;
}

pub struct HtmlExporter;

impl ExportAdapter for HtmlExporter {
    fn export(&self, item: Exportable<'_>) -> Result<Vec<u8>, ExportError> {
        Ok(match item {
            Exportable::Tree(tree) => tree.to_html().into_bytes(),
            Exportable::Markup(markup) => markup.html().as_bytes().to_vec(),
        })
    }
}

pub struct PdfExporter;

impl PdfExporter {
    pub fn assemble(&self, item: Exportable<'_>) -> Result<String, ExportError> {
        match item {
            Exportable::Tree(tree) => Ok(LatexResumeAssembler::new(tree).assemble()),
            Exportable::Markup(_) => Err(ExportError::Unsupported(
                "PDF export needs a structured resume; use --format html for markup output"
                    .to_string(),
            )),
        }
    }

    pub fn compile(latex: &str) -> Result<Vec<u8>, ExportError> {
        tectonic::latex_to_pdf(latex).map_err(|e| ExportError::Compile(e.to_string()))
    }
}

impl ExportAdapter for PdfExporter {
    fn export(&self, item: Exportable<'_>) -> Result<Vec<u8>, ExportError> {
        Self::compile(&self.assemble(item)?)
    }
}

/// Exports `item` to `path`. PDF compilation runs off the async runtime and is
/// abandoned after `pdf_timeout`.
pub async fn export_to_file(
    format: ExportFormat,
    item: Exportable<'_>,
    path: &Path,
    pdf_timeout: Duration,
) -> Result<usize, ExportError> {
    let bytes = match format {
        ExportFormat::Html => HtmlExporter.export(item)?,
        ExportFormat::Pdf => {
            let latex = PdfExporter.assemble(item)?;
            debug!("assembled LaTeX document ({} bytes)", latex.len());

            info!("compiling LaTeX to PDF");
            let job = tokio::task::spawn_blocking(move || PdfExporter::compile(&latex));
            tokio::time::timeout(pdf_timeout, job)
                .await
                .map_err(|_| ExportError::Timeout(pdf_timeout.as_secs()))???
        }
    };

    tokio::fs::write(path, &bytes).await?;
    info!("wrote {} bytes to {}", bytes.len(), path.display());

    Ok(bytes.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::schema::RESUME_SCHEMA;
    use crate::chat::validator::{validate_markup, validate_structured};
    use crate::models::fixtures::ADA_RESPONSE;
    use crate::render::render;

    fn sample_markup() -> MarkupDocument {
        let html = format!(
            "<!DOCTYPE html><html><head><style>body {{}}</style></head><body>{}</body></html>",
            "<p>Ada Lovelace</p>".repeat(20)
        );
        validate_markup(&html).unwrap()
    }

    #[test]
    fn test_html_exporter_writes_tree_and_markup() {
        let doc = validate_structured(ADA_RESPONSE, &RESUME_SCHEMA).unwrap();
        let tree = render(&doc);
        let bytes = HtmlExporter.export(Exportable::Tree(&tree)).unwrap();
        assert_eq!(bytes, tree.to_html().into_bytes());

        let markup = sample_markup();
        let bytes = HtmlExporter.export(Exportable::Markup(&markup)).unwrap();
        assert_eq!(bytes, markup.html().as_bytes());
    }

    #[test]
    fn test_pdf_exporter_refuses_markup() {
        let markup = sample_markup();
        assert!(matches!(
            PdfExporter.export(Exportable::Markup(&markup)),
            Err(ExportError::Unsupported(_))
        ));
    }

    #[tokio::test]
    async fn test_export_to_file_writes_html() {
        let doc = validate_structured(ADA_RESPONSE, &RESUME_SCHEMA).unwrap();
        let tree = render(&doc);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.html");

        let written = export_to_file(
            ExportFormat::Html,
            Exportable::Tree(&tree),
            &path,
            Duration::from_secs(5),
        )
        .await
        .unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, contents.len());
        assert!(contents.contains("Ada Lovelace"));
    }

    #[tokio::test]
    async fn test_failed_export_leaves_no_file() {
        let markup = sample_markup();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.pdf");

        let result = export_to_file(
            ExportFormat::Pdf,
            Exportable::Markup(&markup),
            &path,
            Duration::from_secs(5),
        )
        .await;

        assert!(matches!(result, Err(ExportError::Unsupported(_))));
        assert!(!path.exists());
    }
}
