//! tabnav HTML Parser
//!
//! HTML5 parser built on html5ever, producing a `tabnav_dom::Document`.
//! Declarative shadow roots (`<template shadowrootmode>`) are attached to
//! their parent element so fixtures can describe shadow trees inline.

mod parser;

pub use parser::HtmlParser;

use tabnav_dom::Document;

/// Parse an HTML string into a document
pub fn parse(html: &str) -> Result<Document, ParseError> {
    HtmlParser::new().parse(html)
}

/// Parse error
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("failed to read HTML input: {0}")]
    Io(#[from] std::io::Error),

    #[error("DOM construction failed: {0}")]
    Dom(#[from] tabnav_dom::DomError),
}
