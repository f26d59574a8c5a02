//! # Replay Attacks
//!
//! Attacker captures a valid envelope and re-sends it later.
//!
//! ## Attack Vectors
//!
//! 1. Replay after the window closes
//! 2. Pre-dated envelope from a sender whose clock runs ahead
//! 3. Replay inside the window (only a `ReplayGuard` catches this)

#[cfg(test)]
mod tests {
    use ipc_auth::{
        AuthenticatorConfigBuilder, FixedTimeSource, MessageAuthenticator, ReplayGuard,
        VerifyError,
    };
    use serde_json::json;
    use std::sync::Arc;

    use crate::fixtures::{frozen, frozen_on, payload, NOW};

    #[test]
    fn test_replay_after_window_rejected() {
        let (auth, clock) = frozen("k");
        let captured = auth.sign(payload(json!({"action": "unlock"}))).unwrap();

        clock.set(NOW + 299);
        assert!(auth.verify(&captured).is_ok());

        clock.set(NOW + 301);
        assert_eq!(
            auth.verify(&captured),
            Err(VerifyError::MessageExpired {
                age_secs: 301,
                window_secs: 300
            })
        );
    }

    #[test]
    fn test_sender_clock_ahead_within_tolerance() {
        let sender_clock = Arc::new(FixedTimeSource::new(NOW + 59));
        let receiver_clock = Arc::new(FixedTimeSource::new(NOW));
        let sender = frozen_on("k", sender_clock.clone());
        let receiver = frozen_on("k", receiver_clock);

        let envelope = sender.sign(payload(json!({"n": 1}))).unwrap();
        assert!(receiver.verify(&envelope).is_ok());

        sender_clock.set(NOW + 61);
        let envelope = sender.sign(payload(json!({"n": 2}))).unwrap();
        assert_eq!(
            receiver.verify(&envelope),
            Err(VerifyError::TimestampInFuture {
                ahead_secs: 61,
                tolerance_secs: 60
            })
        );
    }

    #[test]
    fn test_tight_window_configuration() {
        let clock = Arc::new(FixedTimeSource::new(NOW));
        let config = AuthenticatorConfigBuilder::new()
            .secret("k")
            .replay_window_secs(5)
            .clock_skew_tolerance_secs(0)
            .build()
            .unwrap();
        let auth = MessageAuthenticator::with_time_source(config, Arc::clone(&clock)).unwrap();

        let envelope = auth.sign(payload(json!({}))).unwrap();
        clock.set(NOW + 5);
        assert!(auth.verify(&envelope).is_ok());
        clock.set(NOW + 6);
        assert!(matches!(
            auth.verify(&envelope),
            Err(VerifyError::MessageExpired { .. })
        ));
        clock.set(NOW - 1);
        assert!(matches!(
            auth.verify(&envelope),
            Err(VerifyError::TimestampInFuture { .. })
        ));
    }

    #[test]
    fn test_replay_inside_window_needs_guard() {
        let (auth, clock) = frozen("k");
        let captured = auth.sign(payload(json!({"action": "unlock"}))).unwrap();

        // Timestamp check alone accepts a re-delivery inside the window.
        assert!(auth.verify(&captured).is_ok());
        assert!(auth.verify(&captured).is_ok());

        let guard = auth.replay_guard();
        assert!(auth.verify_once(&captured, &guard).is_ok());
        for offset in [1, 60, 300] {
            clock.set(NOW + offset);
            assert_eq!(
                auth.verify_once(&captured, &guard),
                Err(VerifyError::Replayed)
            );
        }

        // Past the window the timestamp check takes over again.
        clock.set(NOW + 301);
        assert!(matches!(
            auth.verify_once(&captured, &guard),
            Err(VerifyError::MessageExpired { .. })
        ));
    }

    #[test]
    fn test_guard_distinguishes_messages_signed_same_second() {
        let (auth, _) = frozen("k");
        let guard = auth.replay_guard();

        let a = auth.sign(payload(json!({"n": 1}))).unwrap();
        let b = auth.sign(payload(json!({"n": 2}))).unwrap();
        assert!(auth.verify_once(&a, &guard).is_ok());
        assert!(auth.verify_once(&b, &guard).is_ok());
        assert_eq!(guard.len(), 2);
    }

    #[test]
    fn test_guard_shared_between_receivers() {
        let clock = Arc::new(FixedTimeSource::new(NOW));
        let a = frozen_on("k", Arc::clone(&clock));
        let b = frozen_on("k", Arc::clone(&clock));
        let guard = ReplayGuard::new(360);

        let envelope = a.sign(payload(json!({"op": "once"}))).unwrap();
        assert!(a.verify_once(&envelope, &guard).is_ok());
        assert_eq!(b.verify_once(&envelope, &guard), Err(VerifyError::Replayed));
    }
}
