//! Article list shown next to the editor

use std::fmt::Write;

use crate::core::catalog::DocumentCatalog;
use crate::core::document::DocumentId;

/// Catalog listing with the open article marked `*` and hand-named
/// articles marked `?`
pub struct Sidebar;

impl Sidebar {
    pub fn render(catalog: &DocumentCatalog, active: Option<&DocumentId>) -> String {
        if catalog.is_empty() {
            return "No documents. Use `new <title>` to create one.\n".to_string();
        }

        let mut out = String::new();
        for (index, id) in catalog.list().iter().enumerate() {
            let marker = if Some(id) == active {
                '*'
            } else if !id.is_canonical() {
                '?'
            } else {
                ' '
            };
            let _ = writeln!(out, "{marker} {index:>3}  {id}");
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marks_active() {
        let catalog = DocumentCatalog::initialize(["00-a.xml", "01-b.xml"]);
        let active = DocumentId::new("01-b.xml").unwrap();
        assert_eq!(
            Sidebar::render(&catalog, Some(&active)),
            "    0  00-a.xml\n*   1  01-b.xml\n"
        );
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = DocumentCatalog::initialize(Vec::<String>::new());
        assert!(Sidebar::render(&catalog, None).starts_with("No documents"));
    }

    #[test]
    fn test_marks_hand_named() {
        let catalog = DocumentCatalog::initialize(["00-a.xml", "About Me.xml"]);
        assert_eq!(
            Sidebar::render(&catalog, None),
            "    0  00-a.xml\n?   1  About Me.xml\n"
        );
    }
}
