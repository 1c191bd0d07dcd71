// Lykos Miner - Free and Open Source Software Statement
//
// This project, lykos-miner, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: tests/engine_test.rs
// Version: 1.0.1
//
// This file contains tests for the compute domain of the Lykos miner,
// located in the tests directory. It verifies prehash table construction,
// per-nonce candidate derivation, the parallel nonce sweep against a forced
// bound, and the full engine loop against a synthetic puzzle.
//
// Tree Location:
// - tests/engine_test.rs (prehash, aggregation and sweep tests)
// - Depends on: lykos-miner, tokio

#[cfg(test)]
mod tests {
    use lykos_miner::core::bound::{meets_bound, U256};
    use lykos_miner::core::state::{PuzzleState, PuzzleUpdate};
    use lykos_miner::core::types::PuzzleInstance;
    use lykos_miner::miner::aggregate::{candidate_value, derive_indices, pk_salt};
    use lykos_miner::miner::search::{SearchBackend, SearchContext};
    use lykos_miner::miner::{EngineStats, MiningEngine, PrehashTable, ThreadPoolBackend};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    const TEST_PK: [u8; 33] = [2u8; 33];
    const TABLE_LEN: usize = 512;

    fn test_table() -> PrehashTable {
        PrehashTable::build(&TEST_PK, TABLE_LEN, 2).expect("table build should succeed")
    }

    #[test]
    fn test_prehash_build_is_deterministic() {
        let a = PrehashTable::build(&TEST_PK, TABLE_LEN, 1).unwrap();
        let b = PrehashTable::build(&TEST_PK, TABLE_LEN, 4).unwrap();
        assert_eq!(a.len(), TABLE_LEN);
        for i in 0..TABLE_LEN {
            assert_eq!(
                a.get(i),
                b.get(i),
                "Entry {} should not depend on worker count",
                i
            );
        }
    }

    #[test]
    fn test_prehash_key_sensitivity() {
        let mut other_pk = TEST_PK;
        other_pk[32] ^= 1;

        let a = test_table();
        let b = PrehashTable::build(&other_pk, TABLE_LEN, 2).unwrap();

        assert!(a.matches_key(&TEST_PK));
        assert!(!a.matches_key(&other_pk), "Fingerprint should track the key");
        assert_ne!(
            a.get(0),
            b.get(0),
            "A single-bit key change should change the entries"
        );
    }

    #[test]
    fn test_index_derivation_is_pure() {
        let message = [9u8; 32];
        let salt = pk_salt(&TEST_PK);

        let a = derive_indices(&message, 42, &salt, TABLE_LEN);
        let b = derive_indices(&message, 42, &salt, TABLE_LEN);
        assert_eq!(a, b, "Same inputs should derive the same indices");

        for idx in a {
            assert!((idx as usize) < TABLE_LEN, "Index should be reduced modulo the table length");
        }

        let c = derive_indices(&message, 43, &salt, TABLE_LEN);
        assert_ne!(a, c, "Adjacent nonces should derive different indices");
    }

    #[test]
    fn test_candidate_value_matches_manual_aggregation() {
        let table = test_table();
        let message = [1u8; 32];
        let salt = pk_salt(&TEST_PK);

        let indices = derive_indices(&message, 7, &salt, table.len());
        let mut expected = U256::zero();
        for idx in indices {
            expected = expected.overflowing_add(table.get(idx as usize)).0;
        }

        assert_eq!(
            candidate_value(&table, &message, 7, &salt),
            expected,
            "Candidate value should be the modular sum of the addressed entries"
        );
    }

    #[test]
    fn test_sweep_finds_forced_solution() {
        let table = Arc::new(test_table());
        let message = [5u8; 32];
        let salt = pk_salt(&TEST_PK);
        let base: u64 = 1_000;
        let count: u64 = 200;

        // pick the bound so exactly the minimal candidate in the batch passes
        let mut best_nonce = base;
        let mut best_value = candidate_value(&table, &message, base, &salt);
        for nonce in base..base + count {
            let value = candidate_value(&table, &message, nonce, &salt);
            if value < best_value {
                best_value = value;
                best_nonce = nonce;
            }
        }
        let bound = best_value.overflowing_add(U256::one()).0;

        let ctx = SearchContext {
            message,
            bound,
            w: TEST_PK,
            salt,
            table,
        };
        let stats = EngineStats::new(3);
        let backend = ThreadPoolBackend::new(3);
        let solutions = backend.search(&ctx, base, count, &stats);

        assert!(!solutions.is_empty(), "The forced minimum should be found");
        let nonces: Vec<u64> = solutions
            .iter()
            .map(|s| u64::from_le_bytes(s.nonce))
            .collect();
        assert!(
            nonces.contains(&best_nonce),
            "The minimal-value nonce should be among the solutions"
        );
        for solution in &solutions {
            assert!(
                meets_bound(&solution.d, &ctx.bound),
                "Every reported solution must beat the bound"
            );
            assert_eq!(solution.w, TEST_PK, "Solutions should carry the w material");
        }
        assert_eq!(
            stats.total_hashes(),
            count,
            "Every nonce in the batch should be counted exactly once"
        );
        let recorded: u64 = (0..stats.worker_count())
            .map(|i| stats.worker(i).solutions_found.load(Ordering::Relaxed))
            .sum();
        assert_eq!(
            recorded as usize,
            solutions.len(),
            "Every found solution should be recorded in the worker counters"
        );
    }

    #[test]
    fn test_sweep_with_more_workers_than_nonces() {
        // batch smaller than the worker count: trailing workers get empty
        // sub-ranges and every nonce must still be swept exactly once
        let table = Arc::new(test_table());
        let base: u64 = 50;
        let count: u64 = 10;
        let ctx = SearchContext {
            message: [8u8; 32],
            bound: U256::max_value(),
            w: TEST_PK,
            salt: pk_salt(&TEST_PK),
            table,
        };

        let stats = EngineStats::new(7);
        let solutions = ThreadPoolBackend::new(7).search(&ctx, base, count, &stats);

        let mut nonces: Vec<u64> = solutions
            .iter()
            .map(|s| u64::from_le_bytes(s.nonce))
            .collect();
        nonces.sort_unstable();
        let expected: Vec<u64> = (base..base + count).collect();
        assert_eq!(nonces, expected, "All 10 nonces should be reported");
        assert_eq!(
            stats.total_hashes(),
            count,
            "No nonce may be swept twice or skipped"
        );
    }

    #[test]
    fn test_sweep_zero_bound_finds_nothing() {
        let table = Arc::new(test_table());
        let ctx = SearchContext {
            message: [5u8; 32],
            bound: U256::zero(),
            w: TEST_PK,
            salt: pk_salt(&TEST_PK),
            table,
        };
        let stats = EngineStats::new(2);
        let solutions = ThreadPoolBackend::new(2).search(&ctx, 0, 100, &stats);
        assert!(solutions.is_empty(), "Nothing is strictly below zero");
    }

    #[test]
    fn test_engine_loop_end_to_end() {
        let instance = PuzzleInstance {
            message: [0u8; 32],
            bound: U256::zero(),
            secret_key: [1u8; 32],
            public_key: TEST_PK,
            w: TEST_PK,
        };
        let state = Arc::new(PuzzleState::new(instance));
        let stats = Arc::new(EngineStats::new(2));
        let interrupt = Arc::new(AtomicBool::new(false));

        // maximal bound: every candidate except the maximum passes
        state.apply_update(&PuzzleUpdate {
            message: [3u8; 32],
            bound: U256::max_value(),
            public_key: None,
            w: None,
        });

        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let handle = {
            let state = Arc::clone(&state);
            let stats = Arc::clone(&stats);
            let interrupt = Arc::clone(&interrupt);
            std::thread::spawn(move || {
                let engine = MiningEngine::new(
                    state,
                    ThreadPoolBackend::new(2),
                    stats,
                    interrupt,
                    false,
                    TABLE_LEN,
                    64,
                    2,
                );
                engine.run(tx)
            })
        };

        let solution = rx.blocking_recv().expect("engine should report a solution");
        assert!(
            meets_bound(&solution.d, &U256::max_value()),
            "Reported value must beat the active bound"
        );
        assert_eq!(solution.w, TEST_PK);

        interrupt.store(true, Ordering::Relaxed);
        // rx stays alive until the engine observes the interrupt
        let result = handle.join().expect("engine thread should not panic");
        assert!(result.is_ok(), "Engine should stop cleanly on interrupt");
        assert!(
            stats.table_rebuilds.load(Ordering::Relaxed) >= 1,
            "First pass must build the prehash table"
        );
        assert!(
            stats.batches_completed.load(Ordering::Relaxed) >= 1,
            "At least one batch should have completed"
        );
    }
}

// Changelog:
// - v1.0.1: Added small-batch sweep with more workers than nonces and the
//   per-worker solution counter assertion.
// - v1.0.0: Initial compute-domain tests: deterministic parallel table
//   build, key sensitivity, index derivation purity, forced-solution sweep
//   and the full engine loop with a synthetic puzzle.
