//! Concurrent session stress tests

use banker_rs::{GameService, COMPLETION_BONUS, PROCESS_POINTS};
use std::sync::Arc;
use std::thread;

fn conservation_holds(service: &GameService, session_id: &str) -> bool {
    let snap = service.state(session_id).unwrap();
    (0..snap.resources.len()).all(|j| {
        let allocated: u32 = snap.allocation.iter().map(|row| row[j]).sum();
        allocated + snap.available[j] == snap.total_resources[j]
    })
}

#[test]
fn test_same_session_operations_serialize() {
    let service = Arc::new(GameService::new());
    service.initialize("shared");

    let threads = 8;
    let ops_per_thread = 100;

    let handles: Vec<_> = (0..threads)
        .map(|_| {
            let service = Arc::clone(&service);
            thread::spawn(move || {
                for _ in 0..ops_per_thread {
                    let process = rand::random::<usize>() % 5;
                    let request = vec![
                        rand::random::<u32>() % 3,
                        rand::random::<u32>() % 3,
                        rand::random::<u32>() % 3,
                    ];
                    // Valid shape, so every attempt lands in the audit trail
                    // whether granted or denied.
                    service.request_resources("shared", process, &request).unwrap();
                    service.release_resources("shared", process).unwrap();
                }
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }

    // The per-session lock serialized everything: no attempt was lost or
    // interleaved, and the conservation law survived.
    let snap = service.state("shared").unwrap();
    assert_eq!(snap.history.len(), threads * ops_per_thread * 2);
    assert!(conservation_holds(&service, "shared"));
    assert!(service.check_safety("shared").unwrap().safe);
}

#[test]
fn test_distinct_sessions_run_independently() {
    let service = Arc::new(GameService::new());
    let threads = 8;

    let handles: Vec<_> = (0..threads)
        .map(|t| {
            let service = Arc::clone(&service);
            thread::spawn(move || {
                let session = format!("session-{}", t);
                service.initialize(&session);

                // Play the whole round: finish processes in safety order.
                let count = service.state(&session).unwrap().processes.len();
                let mut done = vec![false; count];
                while done.iter().any(|&d| !d) {
                    let state = service.state(&session).unwrap();
                    let verdict = service.check_safety(&session).unwrap();
                    let next = verdict
                        .sequence
                        .iter()
                        .copied()
                        .find(|&i| !done[i])
                        .unwrap();

                    let need = state.need[next].clone();
                    assert!(service
                        .request_resources(&session, next, &need)
                        .unwrap()
                        .granted);
                    service.release_resources(&session, next).unwrap();
                    done[next] = true;
                }
                session
            })
        })
        .collect();

    for h in handles {
        let session = h.join().unwrap();
        let snap = service.state(&session).unwrap();
        assert!(snap.completed);
        assert_eq!(snap.score, 5 * PROCESS_POINTS + COMPLETION_BONUS);
        assert!(conservation_holds(&service, &session));
    }

    assert_eq!(service.session_count(), threads);
}

#[test]
fn test_readers_alongside_writer() {
    let service = Arc::new(GameService::new());
    service.initialize("busy");

    let writer = {
        let service = Arc::clone(&service);
        thread::spawn(move || {
            for i in 0..200 {
                let process = i % 5;
                service
                    .request_resources("busy", process, &[1, 0, 0])
                    .unwrap();
                service.release_resources("busy", process).unwrap();
            }
        })
    };

    let readers: Vec<_> = (0..6)
        .map(|_| {
            let service = Arc::clone(&service);
            thread::spawn(move || {
                for _ in 0..300 {
                    // Every observable snapshot satisfies conservation: the
                    // speculate-then-swap discipline never exposes a half
                    // applied request.
                    assert!(conservation_holds(&service, "busy"));
                    let _ = service.check_safety("busy").unwrap();
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for r in readers {
        r.join().unwrap();
    }
}

#[test]
fn test_concurrent_initialize_same_session() {
    let service = Arc::new(GameService::new());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let service = Arc::clone(&service);
            thread::spawn(move || service.initialize("raced"))
        })
        .collect();

    for h in handles {
        // Every racer sees a coherent snapshot of the same session.
        let response = h.join().unwrap();
        assert_eq!(response.state.available, vec![3, 3, 2]);
    }
    assert_eq!(service.session_count(), 1);
}
