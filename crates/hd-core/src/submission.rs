//! Submission aggregation: tables plus top-level metadata.
//!
//! The assembler is an explicitly owned builder with a one-shot lifecycle:
//! construct, accumulate tables/resources/links, finalize into an immutable
//! [`Submission`] handed to the exporter. No global accumulation state.

use serde::{Deserialize, Serialize};

use crate::error::{HdError, Result};
use crate::table::Table;

/// An auxiliary file referenced (and optionally copied) by the submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    /// Human-readable description.
    pub description: String,
    /// Path or URL of the resource.
    pub location: String,
    /// Whether the exporter should copy the file into the output package.
    pub copy_file: bool,
    /// Optional resource type tag.
    pub file_type: Option<String>,
}

/// An external hyperlink attached to the submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    /// Link text.
    pub description: String,
    /// Target URL.
    pub location: String,
}

/// A fully assembled, read-only submission graph ready for export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    abstract_text: String,
    tables: Vec<Table>,
    resources: Vec<Resource>,
    links: Vec<Link>,
}

impl Submission {
    /// Abstract text (may be empty; never absent once assembled).
    pub fn abstract_text(&self) -> &str {
        &self.abstract_text
    }

    /// Tables in insertion order.
    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    /// Auxiliary file references.
    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    /// External links.
    pub fn links(&self) -> &[Link] {
        &self.links
    }
}

/// Builder for a [`Submission`]; one instance per conversion run.
#[derive(Debug, Default)]
pub struct SubmissionAssembler {
    abstract_text: Option<String>,
    tables: Vec<Table>,
    resources: Vec<Resource>,
    links: Vec<Link>,
}

impl SubmissionAssembler {
    /// An empty assembler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the abstract. An empty string is accepted; only never calling
    /// this at all makes [`Self::finalize`] fail.
    pub fn abstract_text(&mut self, text: impl Into<String>) -> &mut Self {
        self.abstract_text = Some(text.into());
        self
    }

    /// Append a table.
    pub fn add_table(&mut self, table: Table) -> &mut Self {
        self.tables.push(table);
        self
    }

    /// Attach an auxiliary file reference. Content copying happens at
    /// export time; only the path and description are recorded here.
    pub fn add_resource(
        &mut self,
        description: impl Into<String>,
        location: impl Into<String>,
        copy_file: bool,
        file_type: Option<String>,
    ) -> &mut Self {
        self.resources.push(Resource {
            description: description.into(),
            location: location.into(),
            copy_file,
            file_type,
        });
        self
    }

    /// Attach an external hyperlink.
    pub fn add_link(
        &mut self,
        description: impl Into<String>,
        location: impl Into<String>,
    ) -> &mut Self {
        self.links.push(Link { description: description.into(), location: location.into() });
        self
    }

    /// Consume the builder, producing the immutable submission graph.
    ///
    /// Fails with [`HdError::MissingAbstract`] if no abstract was supplied.
    pub fn finalize(self) -> Result<Submission> {
        let abstract_text = self.abstract_text.ok_or(HdError::MissingAbstract)?;
        tracing::debug!(
            tables = self.tables.len(),
            resources = self.resources.len(),
            "submission assembled"
        );
        Ok(Submission {
            abstract_text,
            tables: self.tables,
            resources: self.resources,
            links: self.links,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finalize_requires_abstract() {
        let mut asm = SubmissionAssembler::new();
        asm.add_table(Table::new("t"));
        let err = asm.finalize().unwrap_err();
        assert!(matches!(err, HdError::MissingAbstract));
    }

    #[test]
    fn empty_abstract_is_accepted() {
        let mut asm = SubmissionAssembler::new();
        asm.abstract_text("");
        let sub = asm.finalize().unwrap();
        assert_eq!(sub.abstract_text(), "");
    }

    #[test]
    fn tables_and_metadata_preserve_order() {
        let mut asm = SubmissionAssembler::new();
        asm.abstract_text("A measurement.")
            .add_table(Table::new("cross_section-pn"))
            .add_table(Table::new("covariance-pn"))
            .add_resource("binning scheme", "BinScheme.txt", true, None)
            .add_link("pre-print", "https://doi.org/10.48550/arXiv.2310.06082");
        let sub = asm.finalize().unwrap();
        let names: Vec<&str> = sub.tables().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["cross_section-pn", "covariance-pn"]);
        assert_eq!(sub.resources()[0].location, "BinScheme.txt");
        assert_eq!(sub.links()[0].description, "pre-print");
    }
}
