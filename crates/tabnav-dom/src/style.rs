//! Inline style
//!
//! Only the declarations the focus engine consults are understood:
//! `display` and `visibility`. Everything else in the `style` attribute is
//! ignored.

use crate::{DomTree, NodeId};

/// `display` as far as rendering boxes are concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Display {
    #[default]
    Normal,
    None,
}

/// `visibility` (inherited property)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Hidden,
    Collapse,
}

impl Visibility {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "visible" => Some(Self::Visible),
            "hidden" => Some(Self::Hidden),
            "collapse" => Some(Self::Collapse),
            _ => None,
        }
    }
}

/// Parsed `style` attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InlineStyle {
    pub display: Display,
    /// `None` means inherit from the parent
    pub visibility: Option<Visibility>,
}

impl InlineStyle {
    /// Parse a `style` attribute value
    pub fn parse(css: &str) -> Self {
        let mut style = Self::default();
        for decl in css.split(';') {
            let Some((prop, value)) = decl.split_once(':') else {
                continue;
            };
            let prop = prop.trim().to_ascii_lowercase();
            let value = value
                .trim()
                .trim_end_matches("!important")
                .trim()
                .to_ascii_lowercase();
            match prop.as_str() {
                "display" => {
                    style.display = if value == "none" {
                        Display::None
                    } else {
                        Display::Normal
                    };
                }
                "visibility" => style.visibility = Visibility::parse(&value),
                _ => {}
            }
        }
        style
    }
}

impl DomTree {
    /// Inline style of an element (`hidden` implies `display: none`)
    pub fn inline_style(&self, id: NodeId) -> InlineStyle {
        let Some(elem) = self.element(id) else {
            return InlineStyle::default();
        };
        let mut style = elem
            .get_attr("style")
            .map(InlineStyle::parse)
            .unwrap_or_default();
        if elem.has_attr("hidden") {
            style.display = Display::None;
        }
        style
    }
}
