//! # Coverage Properties
//!
//! Whatever the chunk layout, every key must be matched by exactly one split:
//! no gaps, no overlaps, in both split modes.

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::{Rng, SeedableRng};
    use serde_json::json;
    use std::collections::BTreeSet;
    use splitter_core::{
        max_key, min_key, CollectionSplitter, InMemoryCluster, InputSplit, SplitterApi,
    };

    use super::super::fixtures::{
        chunk_chain, doc, orders, orders_config, sharded_cluster, split_matches,
    };

    const KEY_SPACE: i64 = 1_000;
    const ROUNDS: u64 = 25;

    fn random_cuts(rng: &mut StdRng) -> Vec<i64> {
        let count = rng.gen_range(0..16);
        let cuts: BTreeSet<i64> = (0..count).map(|_| rng.gen_range(0..KEY_SPACE)).collect();
        cuts.into_iter().collect()
    }

    fn assert_exact_cover(splits: &[InputSplit]) {
        for value in -10..KEY_SPACE + 10 {
            let hits = splits.iter().filter(|s| split_matches(s, value)).count();
            assert_eq!(hits, 1, "key {} matched by {} splits", value, hits);
        }
    }

    #[tokio::test]
    async fn test_shard_chunks_cover_key_space() {
        splitter_telemetry::init_for_tests();

        for seed in 0..ROUNDS {
            let mut rng = StdRng::seed_from_u64(seed);
            let cuts = random_cuts(&mut rng);
            let mut chunks = chunk_chain(&orders(), &cuts, &["s0", "s1", "s2"]);
            chunks.shuffle(&mut rng);

            let cluster = sharded_cluster(&orders(), chunks);
            let config = orders_config("r1:27017,r2:27017")
                .with_use_range_query(rng.gen_bool(0.5))
                .with_read_from_shards(rng.gen_bool(0.5));

            let splitter = CollectionSplitter::init(config, &cluster).await.unwrap();
            let splits = splitter.calculate_splits().await.unwrap();

            assert_eq!(splits.len(), cuts.len() + 1, "seed {}", seed);
            assert_exact_cover(&splits);
        }
    }

    #[tokio::test]
    async fn test_split_vector_covers_key_space() {
        splitter_telemetry::init_for_tests();

        for seed in 0..ROUNDS {
            let mut rng = StdRng::seed_from_u64(seed);
            let cuts = random_cuts(&mut rng);

            let cluster = InMemoryCluster::new();
            cluster.set_split_keys(
                "shop",
                cuts.iter().map(|c| doc(json!({"_id": c}))).collect(),
            );
            let config = orders_config("router:27017").with_use_range_query(rng.gen_bool(0.5));

            let splitter = CollectionSplitter::init(config, &cluster).await.unwrap();
            let splits = splitter.calculate_splits().await.unwrap();

            assert_eq!(splits.len(), cuts.len() + 1, "seed {}", seed);
            assert_exact_cover(&splits);
        }
    }

    #[tokio::test]
    async fn test_sentinel_bounds_equal_open_bounds() {
        splitter_telemetry::init_for_tests();
        let cluster = InMemoryCluster::new();

        for range_mode in [false, true] {
            let splitter = CollectionSplitter::init(
                orders_config("router:27017").with_use_range_query(range_mode),
                &cluster,
            )
            .await
            .unwrap();

            let sentinels = splitter
                .create_split_from_bounds(
                    Some(&doc(json!({"_id": min_key()}))),
                    Some(&doc(json!({"_id": max_key()}))),
                )
                .unwrap();
            let open = splitter.create_split_from_bounds(None, None).unwrap();

            assert_eq!(sentinels, open, "range mode {}", range_mode);
            assert_exact_cover(std::slice::from_ref(&open));
        }
    }
}
