// Lykos Miner - Free and Open Source Software Statement
//
// This project, lykos-miner, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: tests/controller_test.rs
// Version: 1.0.0
//
// This file contains tests for the puzzle controller state machine and the
// shared puzzle state of the Lykos miner, located in the tests directory. It
// verifies the Keygen/Rehash/Continue/Interrupt transitions and that readers
// can never observe a message paired with a stale bound.
//
// Tree Location:
// - tests/controller_test.rs (state machine + shared state tests)
// - Depends on: lykos-miner

#[cfg(test)]
mod tests {
    use lykos_miner::core::bound::U256;
    use lykos_miner::core::state::{PuzzleState, PuzzleUpdate};
    use lykos_miner::core::types::PuzzleInstance;
    use lykos_miner::miner::{MiningState, PuzzleController};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    fn initial_instance(pk_byte: u8) -> PuzzleInstance {
        PuzzleInstance {
            message: [0u8; 32],
            bound: U256::zero(),
            secret_key: [1u8; 32],
            public_key: [pk_byte; 33],
            w: [pk_byte; 33],
        }
    }

    fn new_block(message_byte: u8, bound: u64) -> PuzzleUpdate {
        PuzzleUpdate {
            message: [message_byte; 32],
            bound: U256::from(bound),
            public_key: None,
            w: None,
        }
    }

    #[test]
    fn test_first_evaluation_builds_then_rehashes() {
        let state = PuzzleState::new(initial_instance(2));
        let interrupt = Arc::new(AtomicBool::new(false));
        let mut controller = PuzzleController::new(interrupt);

        // first pass always builds the table, then restarts the sweep
        assert_eq!(controller.evaluate(&state), MiningState::Keygen);
        assert_eq!(controller.evaluate(&state), MiningState::Rehash);
        assert_eq!(controller.evaluate(&state), MiningState::Continue);
        assert!(controller.instance().is_some(), "Snapshot must be cached after Keygen");
    }

    #[test]
    fn test_new_block_same_key_rehashes_only() {
        let state = PuzzleState::new(initial_instance(2));
        let interrupt = Arc::new(AtomicBool::new(false));
        let mut controller = PuzzleController::new(interrupt);
        controller.evaluate(&state); // Keygen
        controller.evaluate(&state); // Rehash

        state.apply_update(&new_block(7, 1000));

        assert_eq!(
            controller.evaluate(&state),
            MiningState::Rehash,
            "A new block with the same key must not rebuild the table"
        );
        assert_eq!(controller.evaluate(&state), MiningState::Continue);
        let instance = controller.instance().unwrap();
        assert_eq!(instance.message, [7u8; 32], "Snapshot should carry the new message");
        assert_eq!(instance.bound, U256::from(1000u64), "Snapshot should carry the new bound");
    }

    #[test]
    fn test_key_change_forces_keygen_then_rehash() {
        let state = PuzzleState::new(initial_instance(2));
        let interrupt = Arc::new(AtomicBool::new(false));
        let mut controller = PuzzleController::new(interrupt);
        controller.evaluate(&state); // Keygen
        controller.evaluate(&state); // Rehash

        state.apply_update(&PuzzleUpdate {
            message: [9u8; 32],
            bound: U256::from(500u64),
            public_key: Some([3u8; 33]),
            w: None,
        });

        // the rebuild never skips the sweep restart
        assert_eq!(controller.evaluate(&state), MiningState::Keygen);
        assert_eq!(controller.evaluate(&state), MiningState::Rehash);
        assert_eq!(controller.evaluate(&state), MiningState::Continue);
    }

    #[test]
    fn test_interrupt_wins_over_pending_work() {
        let state = PuzzleState::new(initial_instance(2));
        let interrupt = Arc::new(AtomicBool::new(false));
        let mut controller = PuzzleController::new(Arc::clone(&interrupt));
        controller.evaluate(&state); // Keygen, latches a pending Rehash

        state.apply_update(&new_block(4, 42));
        interrupt.store(true, Ordering::Relaxed);

        assert_eq!(
            controller.evaluate(&state),
            MiningState::Interrupt,
            "Interrupt must preempt both the pending Rehash and the new block"
        );
    }

    #[test]
    fn test_update_without_key_keeps_key_material() {
        let state = PuzzleState::new(initial_instance(2));
        state.apply_update(&new_block(1, 10));

        let (_, instance) = state.snapshot();
        assert_eq!(instance.public_key, [2u8; 33], "Key must survive a plain block update");
        assert_eq!(instance.w, [2u8; 33]);
    }

    #[test]
    fn test_block_id_increments_once_per_update() {
        let state = PuzzleState::new(initial_instance(2));
        assert_eq!(state.block_id(), 0);
        assert_eq!(state.apply_update(&new_block(1, 10)), 1);
        assert_eq!(state.apply_update(&new_block(2, 20)), 2);
        assert_eq!(state.block_id(), 2);
    }

    #[test]
    fn test_snapshot_never_tears_message_bound_pair() {
        // message byte and bound are written as a matched pair; a reader
        // must never observe one without the other
        let state = Arc::new(PuzzleState::new(initial_instance(2)));
        let writer = {
            let state = Arc::clone(&state);
            std::thread::spawn(move || {
                for i in 1..=2000u64 {
                    state.apply_update(&new_block((i % 251) as u8, i % 251));
                }
            })
        };

        let mut last_id = 0;
        while last_id < 2000 {
            let (id, instance) = state.snapshot();
            assert_eq!(
                u64::from(instance.message[0]),
                instance.bound.low_u64(),
                "Observed message from one update paired with bound from another"
            );
            last_id = id;
        }

        writer.join().expect("writer thread should not panic");
    }
}

// Changelog:
// - v1.0.0: Initial transition tests (first-pass Keygen, block Rehash, key
//   rotation, interrupt precedence) and shared-state pairing stress test.
