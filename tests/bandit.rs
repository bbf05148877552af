//! `MultiArmedBandit` selection/update behavior, boundary scenarios E5–E6.

use bushy_breaker::bandit::MultiArmedBandit;

#[test]
fn warmup_is_round_robin() {
    let mut bandit = MultiArmedBandit::new(vec![0.0; 3]);
    let picks: Vec<usize> = (0..12).map(|_| bandit.select_arm()).collect();
    assert_eq!(picks, vec![0, 1, 2, 0, 1, 2, 0, 1, 2, 0, 1, 2]);
}

/// Invariant 3: after N concurrent update_arm calls, per-arm counts sum
/// to N.
#[test]
fn update_counts_sum_to_total() {
    let mut bandit = MultiArmedBandit::new(vec![0.0; 4]);
    for i in 0..100 {
        bandit.update_arm(i % 4, 1.0);
    }
    let sum: u64 = bandit.update_counts().iter().sum();
    assert_eq!(sum, 100);
    assert_eq!(bandit.total_updates(), 100);
}

#[test]
#[should_panic]
fn update_arm_out_of_range_panics() {
    let mut bandit = MultiArmedBandit::new(vec![0.0; 2]);
    bandit.update_arm(5, 1.0);
}

/// E5: K=4, arms seeded with distinct means, the dominant arm wins the
/// overwhelming majority of pulls over many iterations.
#[test]
fn e5_converges_to_best_arm() {
    use rand::rngs::StdRng;
    use rand::Rng;
    use rand::SeedableRng;

    let mut bandit = MultiArmedBandit::new(vec![0.0; 4]);
    let means = [0.0_f64, 0.0, 1.0, 0.0];
    let mut rng = StdRng::seed_from_u64(42);
    let mut picks = vec![0u64; 4];

    for _ in 0..10_000 {
        let arm = bandit.select_arm();
        picks[arm] += 1;
        let reward = means[arm] + rng.gen_range(-1.0..1.0);
        bandit.update_arm(arm, reward);
    }

    let share = picks[2] as f64 / 10_000.0;
    assert!(share > 0.7, "arm 2 share was {share}");
}

/// E6: a reward sequence that doubles the last-updated arm's mean past
/// step 512 triggers a reset on the next heartbeat.
#[test]
fn e6_drift_triggers_reset() {
    let mut bandit = MultiArmedBandit::new(vec![0.0]);

    // First 256 selections: reward 1.0, establishing a ~1.0 snapshot at
    // the first heartbeat.
    for _ in 0..256 {
        let arm = bandit.select_arm();
        bandit.update_arm(arm, 1.0);
    }
    assert!(bandit.total_updates() > 0);

    // Next 255 selections: reward 4.0, pushing the mean toward 4x the
    // snapshotted value by the time the second heartbeat fires at 512.
    for _ in 0..255 {
        let arm = bandit.select_arm();
        bandit.update_arm(arm, 4.0);
    }

    // The 512th selection triggers the heartbeat that detects drift.
    bandit.select_arm();

    assert_eq!(bandit.total_updates(), 0, "reset should zero total updates");
    assert_eq!(
        bandit.update_counts()[0],
        0,
        "reset should zero per-arm update counts"
    );
}
