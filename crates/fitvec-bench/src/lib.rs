//! Benchmark workloads for the fitvec dynamic array.
//!
//! - [`filled`]: a vector of `0..len` built with a single up-front reserve
//! - [`filled_strings`]: the same with heap-owning elements
//! - [`insert_positions`]: deterministic insertion indices that spread
//!   inserts over the whole vector

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use fitvec::Vector;

/// Element counts the benchmarks sweep over.
pub const SIZES: [usize; 3] = [16, 256, 4096];

/// A vector holding `0..len` in exactly `len` slots.
pub fn filled(len: usize) -> Vector<u64> {
    let mut v = Vector::new();
    v.reserve(len);
    for i in 0..len as u64 {
        v.push_back(i);
    }
    v
}

/// A vector of `len` short strings in exactly `len` slots.
///
/// Exercises the element-wise copy path and per-element drop glue.
pub fn filled_strings(len: usize) -> Vector<String> {
    let mut v = Vector::new();
    v.reserve(len);
    for i in 0..len {
        v.push_back(format!("item-{i}"));
    }
    v
}

/// `count` insertion indices for a vector that starts at `start_len` and
/// grows by one per insert.
///
/// Uses a fixed linear congruential sequence so every run inserts at the
/// same places.
pub fn insert_positions(start_len: usize, count: usize, seed: u64) -> Vec<usize> {
    let mut state = seed;
    (0..count)
        .map(|i| {
            state = state
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);
            (state >> 33) as usize % (start_len + i + 1)
        })
        .collect()
}
