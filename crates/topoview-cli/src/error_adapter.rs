//! Error adapter for converting TopoviewError to miette diagnostics.
//!
//! Parse errors carry the source text and a span, so they render with a
//! labelled snippet. Every other variant renders as a plain error with a code.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceSpan};

use topoview::{
    TopoviewError,
    topology::{ParseError, Span},
};

/// Adapter for a topology parse error with its source text.
pub struct ParseDiagnostic<'a> {
    err: &'a ParseError,
    src: &'a str,
}

impl<'a> ParseDiagnostic<'a> {
    pub fn new(err: &'a ParseError, src: &'a str) -> Self {
        Self { err, src }
    }
}

impl fmt::Debug for ParseDiagnostic<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParseDiagnostic")
            .field("err", &self.err)
            .finish()
    }
}

impl fmt::Display for ParseDiagnostic<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.err.message())
    }
}

impl std::error::Error for ParseDiagnostic<'_> {}

impl MietteDiagnostic for ParseDiagnostic<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new("topoview::parse"))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.err
            .help()
            .map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let span = self.err.span()?;
        Some(Box::new(std::iter::once(LabeledSpan::new_primary_with_span(
            Some("here".to_string()),
            span_to_miette(span, self.src.len()),
        ))))
    }
}

/// Adapter for [`TopoviewError`] variants without source information.
pub struct ErrorAdapter<'a>(pub &'a TopoviewError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            TopoviewError::Io(_) => "topoview::io",
            TopoviewError::Parse { .. } => "topoview::parse",
            TopoviewError::Topology(_) => "topoview::topology",
            TopoviewError::Layout(_) => "topoview::layout",
            TopoviewError::Export(_) => "topoview::export",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match &self.0 {
            TopoviewError::Topology(_) => Some(Box::new(
                "collapse targets must be nodes reachable from the root",
            )),
            _ => None,
        }
    }
}

/// A reportable error that can be rendered by miette.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// A parse error with source location information.
    Diagnostic(ParseDiagnostic<'a>),
    /// A simple error without source location.
    Error(ErrorAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Diagnostic(d) => fmt::Display::fmt(d, f),
            Reportable::Error(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Diagnostic(_) => None,
            Reportable::Error(e) => e.source(),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.code(),
            Reportable::Error(e) => e.code(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.help(),
            Reportable::Error(e) => e.help(),
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self {
            Reportable::Diagnostic(d) => d.source_code(),
            Reportable::Error(e) => e.source_code(),
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        match self {
            Reportable::Diagnostic(d) => d.labels(),
            Reportable::Error(e) => e.labels(),
        }
    }
}

/// Convert a topology [`Span`] to a miette [`SourceSpan`], clamped to the
/// source length.
fn span_to_miette(span: Span, src_len: usize) -> SourceSpan {
    let offset = span.offset().min(src_len);
    let len = span.len().min(src_len - offset);
    SourceSpan::new(offset.into(), len)
}

/// Convert a [`TopoviewError`] into a list of reportable errors.
pub fn to_reportables(err: &TopoviewError) -> Vec<Reportable<'_>> {
    match err {
        TopoviewError::Parse { err: parse_err, src } => {
            vec![Reportable::Diagnostic(ParseDiagnostic::new(parse_err, src))]
        }
        _ => vec![Reportable::Error(ErrorAdapter(err))],
    }
}

#[cfg(test)]
mod tests {
    use topoview::{identifier::Id, topology::Topology, tree::TreeError};

    use super::*;

    fn parse_error(source: &str) -> TopoviewError {
        let err = Topology::from_json(source).unwrap_err();
        TopoviewError::new_parse_error(err, source)
    }

    #[test]
    fn test_parse_error_has_label() {
        let source = r#"{"nodes": [{"id": "a", "label": "A"}, {"id": "a", "label": "B"}]}"#;
        let err = parse_error(source);

        let reportables = to_reportables(&err);
        assert_eq!(reportables.len(), 1);

        let reportable = &reportables[0];
        assert!(matches!(reportable, Reportable::Diagnostic(_)));
        assert!(reportable.to_string().contains("duplicate node id"));
        assert!(reportable.help().is_some());
        assert!(reportable.source_code().is_some());

        let labels: Vec<_> = reportable.labels().unwrap().collect();
        assert_eq!(labels.len(), 1);
        assert!(labels[0].offset() + labels[0].len() <= source.len());
    }

    #[test]
    fn test_malformed_json_span_in_bounds() {
        let source = "{\"nodes\": [";
        let err = parse_error(source);

        let reportables = to_reportables(&err);
        let labels: Vec<_> = reportables[0].labels().unwrap().collect();
        assert!(labels[0].offset() <= source.len());
    }

    #[test]
    fn test_error_codes() {
        let io_err = TopoviewError::Io(std::io::Error::other("disk"));
        let reportables = to_reportables(&io_err);
        assert_eq!(reportables[0].code().unwrap().to_string(), "topoview::io");
        assert!(reportables[0].labels().is_none());

        let tree_err = TopoviewError::Topology(TreeError::UnknownNode(Id::new("x")));
        let reportables = to_reportables(&tree_err);
        assert_eq!(
            reportables[0].code().unwrap().to_string(),
            "topoview::topology"
        );
        assert!(reportables[0].help().is_some());

        let layout_err = TopoviewError::Layout("bad".to_string());
        let reportables = to_reportables(&layout_err);
        assert_eq!(reportables[0].code().unwrap().to_string(), "topoview::layout");
        assert!(reportables[0].help().is_none());
    }

    #[test]
    fn test_span_clamped() {
        let span = span_to_miette(Span::new(10, 5), 12);
        assert_eq!(span.offset(), 10);
        assert_eq!(span.len(), 2);
    }
}
