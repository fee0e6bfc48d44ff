//! Open-addressing hash maps backed by Loam arena categories.
//!
//! [`ArenaMap`] stores its slot data inside arena blocks of a
//! caller-chosen [`Category`](loam_core::Category), so a map's whole
//! lifetime is governed by its backing category: it survives any number
//! of rehashes, and it is invalidated the moment the category is reset.
//! Collaborators build name-keyed registries (assets, strings, entities)
//! directly on this primitive.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod map;

pub use map::{ArenaMap, Iter, MIN_CAPACITY};
