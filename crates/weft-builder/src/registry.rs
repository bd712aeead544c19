//! Fragments spliced into a template, with where their text landed

use rowan::{GreenNode, TextRange};
use weft_syntax::{SyntaxKind, green_kind};

/// One spliced fragment: the (possibly re-indented) tree and the byte range
/// of its text in the template source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentRecord {
    pub green: GreenNode,
    pub range: TextRange,
}

impl FragmentRecord {
    /// Kind of the fragment's root
    pub fn kind(&self) -> SyntaxKind {
        green_kind(&self.green)
    }
}

/// Fragment records in append order
///
/// Ranges never overlap and strictly increase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FragmentRegistry {
    records: Vec<FragmentRecord>,
}

impl FragmentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, green: GreenNode, range: TextRange) {
        debug_assert!(
            self.records
                .last()
                .is_none_or(|last| last.range.end() <= range.start()),
            "fragment ranges must be appended in order"
        );
        debug_assert_eq!(range.len(), green.text_len());
        self.records.push(FragmentRecord { green, range });
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FragmentRecord> {
        self.records.iter()
    }

    pub fn as_slice(&self) -> &[FragmentRecord] {
        &self.records
    }
}

impl<'a> IntoIterator for &'a FragmentRegistry {
    type Item = &'a FragmentRecord;
    type IntoIter = std::slice::Iter<'a, FragmentRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weft_syntax::{EntryPoint, parse, text_range};

    #[test]
    fn test_records_keep_order_and_kind() {
        let call = parse("f()", EntryPoint::Expr).green;
        let name = parse("x", EntryPoint::Expr).green;

        let mut registry = FragmentRegistry::with_capacity(2);
        registry.push(call, text_range(4..7));
        registry.push(name, text_range(10..11));

        let kinds: Vec<_> = registry.iter().map(FragmentRecord::kind).collect();
        assert_eq!(
            kinds,
            vec![SyntaxKind::FunctionCallExpr, SyntaxKind::DeclReferenceExpr]
        );
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.as_slice()[1].range, text_range(10..11));
    }
}
