//! Allocator setup parameters.

use crate::category::{Category, CATEGORY_COUNT};

/// Per-category setup: pool capacity and verbose-logging flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CategorySetup {
    /// Capacity in bytes of every arena in this category's pool.
    ///
    /// Must be at least 1. No single allocation may exceed this size.
    pub capacity: usize,
    /// When set, every allocation in this category emits a trace line
    /// with its call site.
    pub verbose: bool,
}

impl CategorySetup {
    /// Setup with the given capacity and verbose logging disabled.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            verbose: false,
        }
    }
}

/// Setup for the whole memory core.
///
/// Validated by `Memory::new`; all values are immutable after creation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MemorySetup {
    /// Global allocation alignment in bytes.
    ///
    /// Every allocation size is rounded up to a multiple of this value,
    /// so allocation offsets stay aligned within their arena. Must be a
    /// nonzero power of two.
    pub alignment: usize,
    /// Per-category setup, indexed by [`Category::index`].
    pub categories: [CategorySetup; CATEGORY_COUNT],
}

impl MemorySetup {
    /// Default allocation alignment.
    pub const DEFAULT_ALIGNMENT: usize = 16;

    /// Setup with the same capacity for every category, default alignment
    /// and verbose logging disabled.
    pub fn uniform(capacity: usize) -> Self {
        Self {
            alignment: Self::DEFAULT_ALIGNMENT,
            categories: [CategorySetup::with_capacity(capacity); CATEGORY_COUNT],
        }
    }

    /// The setup for one category.
    pub fn category(&self, category: Category) -> &CategorySetup {
        &self.categories[category.index()]
    }
}
