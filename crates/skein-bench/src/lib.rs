//! Benchmark workloads for skein rings and hubs.
//!
//! - [`random_ops`]: a seeded, reproducible mix of ring edits.
//! - [`apply_ops`]: replay such a mix against a ring.
//! - [`filled_ring`] / [`hub_weave`]: prebuilt fixtures of a given size.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use rand_chacha::rand_core::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use skein::{HubConfig, Weave};
use skein_core::RingId;
use skein_pool::NodePool;
use skein_ring::{Item, Position, Ring, RingConfig, Target};

/// One step of a generated workload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BenchOp {
    /// Append a fresh node.
    Append(i64),
    /// Prepend a fresh node.
    Prepend(i64),
    /// Splice a fresh node in at a (possibly negative) index.
    Insert(isize, i64),
    /// Pop the member at a (possibly negative) index.
    Pop(isize),
    /// Look up every index holding a value.
    IndexOf(i64),
    /// Reverse the ring.
    Reverse,
}

/// Generate `count` ops from `seed`. Indices fall in `-span..span` and
/// values in `0..span`, so lookups hit often on small rings.
pub fn random_ops(seed: u64, count: usize, span: usize) -> Vec<BenchOp> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let span = span.max(1) as u64;
    let index = |rng: &mut ChaCha8Rng| (rng.next_u64() % (2 * span)) as isize - span as isize;
    (0..count)
        .map(|_| {
            let value = (rng.next_u64() % span) as i64;
            match rng.next_u64() % 10 {
                0..=2 => BenchOp::Append(value),
                3 => BenchOp::Prepend(value),
                4 | 5 => BenchOp::Insert(index(&mut rng), value),
                6 | 7 => BenchOp::Pop(index(&mut rng)),
                8 => BenchOp::IndexOf(value),
                _ => BenchOp::Reverse,
            }
        })
        .collect()
}

/// Replay `ops` against `ring`. Out-of-range steps are refused by the ring
/// and counted. Returns how many steps were refused.
pub fn apply_ops(ring: &mut Ring, pool: &mut NodePool<i64>, ops: &[BenchOp]) -> usize {
    let mut refused = 0;
    for op in ops {
        let ok = match *op {
            BenchOp::Append(v) => ring.append(pool, Item::Value(v)).is_ok(),
            BenchOp::Prepend(v) => ring.prepend(pool, Item::Value(v)).is_ok(),
            BenchOp::Insert(i, v) => ring.insert(pool, Item::Value(v), Position::Index(i), false).is_ok(),
            BenchOp::Pop(i) => ring.pop(pool, Target::Index(i)).is_ok(),
            BenchOp::IndexOf(v) => ring.index_of(pool, &v).is_ok(),
            BenchOp::Reverse => ring.reverse(pool).is_ok(),
        };
        if !ok {
            refused += 1;
        }
    }
    refused
}

/// A ring holding `0..len`.
pub fn filled_ring(pool: &mut NodePool<i64>, id: &str, len: usize) -> Ring {
    let mut ring = Ring::new(id);
    for v in 0..len as i64 {
        if ring.append(pool, Item::Value(v)).is_err() {
            break;
        }
    }
    ring
}

/// A weave with one hub and `rings` subscribers of `len` members each.
/// Returns the weave and the id of the first subscriber.
pub fn hub_weave(rings: usize, len: usize) -> (Weave<i64>, RingId) {
    let mut weave = Weave::new();
    let mut first = None;
    if let Ok(hub) = weave.create_hub(HubConfig::named("bench")) {
        for n in 0..rings {
            let config = RingConfig::named(format!("r{n}")).with_hub(hub.clone());
            if let Ok(id) = weave.create_ring_from_values(config, 0..len as i64) {
                first.get_or_insert(id);
            }
        }
    }
    (weave, first.unwrap_or_else(|| RingId::named("r0")))
}
