//! Memory categories: named, independently configured allocator partitions.

use std::fmt;

/// Number of memory categories.
pub const CATEGORY_COUNT: usize = 4;

/// A named partition of allocator state.
///
/// Each category owns its own arena pool with its own capacity and reset
/// policy. The partitioning is by lifetime, not by subsystem:
///
/// - [`Permanent`](Category::Permanent): lives for the whole process.
/// - [`Transient`](Category::Transient): hard-reset every tick by
///   `Memory::post` — per-tick scratch data only.
/// - [`Debug`](Category::Debug): diagnostics overlays, soft-reset between
///   logical passes by the owner.
/// - [`Math`](Category::Math): intermediate math buffers, soft-reset
///   between logical passes by the owner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// Process-lifetime allocations.
    Permanent,
    /// Per-tick allocations, hard-reset on every `post`.
    Transient,
    /// Diagnostics and tooling allocations.
    Debug,
    /// Intermediate math buffers.
    Math,
}

impl Category {
    /// All categories, in declaration order.
    pub const ALL: [Category; CATEGORY_COUNT] = [
        Category::Permanent,
        Category::Transient,
        Category::Debug,
        Category::Math,
    ];

    /// Index of this category into per-category arrays.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Human-readable name used in diagnostics.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Permanent => "Permanent Arena",
            Category::Transient => "Transient Arena",
            Category::Debug => "Debug Arena",
            Category::Math => "Math Arena",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_match_declaration_order() {
        for (i, category) in Category::ALL.iter().enumerate() {
            assert_eq!(category.index(), i);
        }
    }

    #[test]
    fn display_names_are_distinct() {
        let names: Vec<_> = Category::ALL.iter().map(|c| c.to_string()).collect();
        for (i, a) in names.iter().enumerate() {
            for b in &names[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
