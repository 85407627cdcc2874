//! # Split Flows
//!
//! `CollectionSplitter::init` followed by `calculate_splits` against an
//! in-memory cluster, for each strategy and descriptor shape.

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};
    use splitter_core::{
        max_key, rewrite_uri, CollectionSplitter, Document, InMemoryCluster, InputSplit,
        SplitBounds, SplitError, SplitStrategy, SplitterApi,
    };

    use super::super::fixtures::{chunk_chain, doc, orders, orders_config, sharded_cluster, uri};

    // =============================================================================
    // SHARDED COLLECTIONS
    // =============================================================================

    #[tokio::test]
    async fn test_chunks_read_straight_from_owning_shard() {
        splitter_telemetry::init_for_tests();
        let cluster = sharded_cluster(
            &orders(),
            chunk_chain(&orders(), &[100, 200], &["s0", "s1", "s2"]),
        );
        let config = orders_config("router:27017").with_read_from_shards(true);

        let splitter = CollectionSplitter::init(config, &cluster).await.unwrap();
        let splits = splitter.calculate_splits().await.unwrap();

        let targets: Vec<&str> = splits.iter().map(|s| s.input_uri.as_str()).collect();
        assert_eq!(
            targets,
            vec![
                "mongodb://s0a:27018,s0b:27018/shop.orders?readPreference=secondary",
                "mongodb://s1a:27018/shop.orders?readPreference=secondary",
                "mongodb://s2a:27018/shop.orders?readPreference=secondary",
            ]
        );

        assert!(splits[0].min().is_none());
        assert_eq!(splits[0].max(), Some(&doc(json!({"_id": 100}))));
        assert_eq!(splits[1].min(), Some(&doc(json!({"_id": 100}))));
        assert_eq!(splits[2].min(), Some(&doc(json!({"_id": 200}))));
        assert!(splits[2].max().is_none());
    }

    #[tokio::test]
    async fn test_chunks_spread_over_routers() {
        splitter_telemetry::init_for_tests();
        let cluster = sharded_cluster(
            &orders(),
            chunk_chain(&orders(), &[10, 20, 30], &["s0"]),
        );
        let config = orders_config("r1:27017,r2:27017");

        let splitter = CollectionSplitter::init(config, &cluster).await.unwrap();
        let splits = splitter.calculate_splits().await.unwrap();

        let hosts: Vec<&str> = splits.iter().map(|s| s.input_uri.host_list()).collect();
        assert_eq!(hosts, vec!["r1:27017", "r2:27017", "r1:27017", "r2:27017"]);
        for split in &splits {
            assert_eq!(split.input_uri.database(), Some("shop"));
            assert_eq!(split.input_uri.collection(), Some("orders"));
        }
    }

    #[tokio::test]
    async fn test_range_mode_rejects_conflicting_filter() {
        splitter_telemetry::init_for_tests();
        let cluster = sharded_cluster(&orders(), chunk_chain(&orders(), &[50], &["s0"]));
        let config = orders_config("router:27017")
            .with_use_range_query(true)
            .with_query(Some(doc(json!({"_id": {"$in": [1, 2, 3]}}))));

        let splitter = CollectionSplitter::init(config, &cluster).await.unwrap();
        let err = splitter.calculate_splits().await.unwrap_err();

        assert!(matches!(err, SplitError::SplitFailed { .. }));
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_shards_map_strips_replica_set_names() {
        splitter_telemetry::init_for_tests();
        let cluster = sharded_cluster(&orders(), chunk_chain(&orders(), &[], &["s0"]));
        let splitter = CollectionSplitter::init(orders_config("router:27017"), &cluster)
            .await
            .unwrap();

        let map = splitter.get_shards_map().await.unwrap();
        assert_eq!(map.len(), 3);
        assert_eq!(map["s0"], "s0a:27018,s0b:27018");
        assert_eq!(map["s1"], "s1a:27018");
        assert_eq!(map["s2"], "s2a:27018");
    }

    // =============================================================================
    // UNSHARDED COLLECTIONS
    // =============================================================================

    #[tokio::test]
    async fn test_split_vector_merges_user_filter() {
        splitter_telemetry::init_for_tests();
        let cluster = InMemoryCluster::new();
        cluster.set_split_keys("shop", vec![doc(json!({"_id": 10}))]);
        let config = orders_config("router:27017")
            .with_use_range_query(true)
            .with_query(Some(doc(json!({"status": "A"}))));

        let splitter = CollectionSplitter::init(config, &cluster).await.unwrap();
        let splits = splitter.calculate_splits().await.unwrap();

        assert_eq!(splits.len(), 2);
        assert_eq!(
            Value::Object(splits[0].query.clone()),
            json!({"status": "A", "_id": {"$lt": 10}})
        );
        assert_eq!(
            Value::Object(splits[1].query.clone()),
            json!({"status": "A", "_id": {"$gte": 10}})
        );
        assert!(splits.iter().all(|s| s.bounds == SplitBounds::RangeQuery));
    }

    #[tokio::test]
    async fn test_single_split_keeps_scan_options() {
        splitter_telemetry::init_for_tests();
        let cluster = InMemoryCluster::new();
        let config = orders_config("router:27017")
            .with_strategy(SplitStrategy::Single)
            .with_fields(Some(doc(json!({"total": 1}))))
            .with_sort(Some(doc(json!({"total": -1}))))
            .with_no_timeout(true);

        let splitter = CollectionSplitter::init(config, &cluster).await.unwrap();
        let splits = splitter.calculate_splits().await.unwrap();

        assert_eq!(splits.len(), 1);
        assert_eq!(splits[0].fields, Some(doc(json!({"total": 1}))));
        assert_eq!(splits[0].sort, Some(doc(json!({"total": -1}))));
        assert!(splits[0].no_timeout);
        assert!(splits[0].query.is_empty());
    }

    // =============================================================================
    // SPLIT CONSTRUCTION
    // =============================================================================

    #[tokio::test]
    async fn test_age_range_query() {
        splitter_telemetry::init_for_tests();
        let cluster = InMemoryCluster::new();
        let splitter = CollectionSplitter::init(
            orders_config("router:27017").with_use_range_query(true),
            &cluster,
        )
        .await
        .unwrap();

        let split = splitter
            .create_range_query_split(
                Some(&doc(json!({"age": 18}))),
                Some(&doc(json!({"age": 30}))),
                &Document::new(),
            )
            .unwrap();
        assert_eq!(
            Value::Object(split.query),
            json!({"age": {"$gte": 18, "$lt": 30}})
        );

        let open_top = splitter
            .create_range_query_split(
                Some(&doc(json!({"age": 18}))),
                Some(&doc(json!({"age": max_key()}))),
                &Document::new(),
            )
            .unwrap();
        assert_eq!(Value::Object(open_top.query), json!({"age": {"$gte": 18}}));

        let conflict = splitter.create_range_query_split(
            Some(&doc(json!({"age": 18}))),
            Some(&doc(json!({"age": 30}))),
            &doc(json!({"age": 5})),
        );
        assert!(matches!(conflict, Err(SplitError::QueryConflict { .. })));
    }

    #[tokio::test]
    async fn test_splits_survive_serialization() {
        splitter_telemetry::init_for_tests();
        let cluster =
            sharded_cluster(&orders(), chunk_chain(&orders(), &[7, 42], &["s0", "s1"]));
        let config = orders_config("router:27017")
            .with_read_from_shards(true)
            .with_auth_uri(Some(uri("mongodb://reader:pw@router:27017/admin")));
        cluster.add_user("admin", "reader", "pw");

        let splitter = CollectionSplitter::init(config, &cluster).await.unwrap();
        for split in splitter.calculate_splits().await.unwrap() {
            let text = split.to_json().unwrap();
            assert_eq!(InputSplit::from_json(&text).unwrap(), split);
        }
        assert_eq!(cluster.auth_attempts(), 1);
    }

    #[test]
    fn test_rewrite_round_trip() {
        let original = uri("mongodb://user:pw@r1:27017,r2:27017/shop.orders?ssl=true");

        let moved = rewrite_uri(&original, "s0a:27018").unwrap();
        assert_eq!(
            moved.as_str(),
            "mongodb://user:pw@s0a:27018/shop.orders?ssl=true"
        );
        assert_eq!(moved.username(), Some("user"));

        let back = rewrite_uri(&moved, "r1:27017,r2:27017").unwrap();
        assert_eq!(back, original);
    }
}
