//! Annotation pipeline: options -> StyledText
//!
//! text → PatternLibrary::scan (per category, evaluation order)
//!      → MatchEncoder::merge
//!      → AnnotatedTextBuilder::render
//!
//! Stateless apart from the pattern cache; the same options always give the
//! same `StyledText`.

use crate::label::category::EnabledTypes;
use crate::label::encoder::MatchEncoder;
use crate::label::error::LabelResult;
use crate::label::options::LabelOptions;
use crate::label::patterns::{MatchResult, PatternLibrary};
use crate::label::span::AnnotatedSpan;
use crate::label::styled::{AnnotatedTextBuilder, StyledText};

/// Scan every enabled category, concatenating matches in evaluation order
pub fn scan_all(library: &mut PatternLibrary, text: &str, enabled: &EnabledTypes) -> LabelResult<Vec<MatchResult>> {
    let mut matches = Vec::new();
    for category in enabled.evaluation_order() {
        matches.extend(library.scan(category, text)?);
    }
    Ok(matches)
}

/// Spans for `options.text`, in application order
pub fn annotate(library: &mut PatternLibrary, options: &LabelOptions) -> LabelResult<Vec<AnnotatedSpan>> {
    let matches = scan_all(library, &options.text, &options.enabled_types)?;
    let encoder = MatchEncoder::new(options.default_image_bounds());
    Ok(encoder.merge(&options.text, &matches))
}

/// Build the styled artifact, reusing `library`'s compiled patterns
pub fn configure_with(library: &mut PatternLibrary, options: &LabelOptions) -> LabelResult<StyledText> {
    let spans = annotate(library, options)?;
    let builder = AnnotatedTextBuilder::new(options.text_style(), options.link_style());
    let styled = builder.render(&options.text, &spans);
    tracing::debug!(spans = spans.len(), runs = styled.runs().len(), "rendered label text");
    Ok(styled)
}

/// Build the styled artifact from scratch
pub fn configure(options: &LabelOptions) -> LabelResult<StyledText> {
    configure_with(&mut PatternLibrary::new(), options)
}
