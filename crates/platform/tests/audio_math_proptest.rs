//! Property-based tests for audio domain math.
//! Verifies invariants hold for ALL valid inputs, not just fixed examples.

use platform::audio_types::{
    RateFamily, SampleRateHz, MAX_SYSCLK_44K1_FAMILY_HZ, MAX_SYSCLK_48K_FAMILY_HZ,
};

proptest::proptest! {
    /// The 48 kHz ceiling is chosen iff the rate is a multiple of 4000 Hz.
    #[test]
    fn family_ceiling_tracks_modulo_4000(hz in 0u32..=u32::MAX) {
        let ceiling = RateFamily::of(hz).max_sysclk_hz();
        if hz % 4000 == 0 {
            assert_eq!(ceiling, MAX_SYSCLK_48K_FAMILY_HZ);
        } else {
            assert_eq!(ceiling, MAX_SYSCLK_44K1_FAMILY_HZ);
        }
    }

    /// SampleRateHz::new never panics for any u32 input.
    #[test]
    fn sample_rate_hz_new_never_panics(hz in 0u32..=u32::MAX) {
        // May return Err but must not panic
        let _ = SampleRateHz::new(hz);
    }

    /// SampleRateHz valid range [8000, 192000] always succeeds.
    #[test]
    fn sample_rate_hz_valid_range_always_ok(hz in 8000u32..=192_000u32) {
        assert!(SampleRateHz::new(hz).is_ok(),
            "SampleRateHz::new({}) should be Ok within [8000, 192000]", hz);
    }

    /// SampleRateHz out of range always fails.
    #[test]
    fn sample_rate_hz_out_of_range_always_err(hz in 192_001u32..=u32::MAX) {
        assert!(SampleRateHz::new(hz).is_err(),
            "SampleRateHz::new({}) should be Err above 192000", hz);
    }

    /// MCLK at 256 fs never overflows and is exactly 256 × rate.
    #[test]
    fn mclk_multiplier_is_exact(hz in 8000u32..=192_000u32) {
        let rate = SampleRateHz::new(hz).unwrap();
        assert_eq!(u64::from(rate.times(256)), u64::from(hz) * 256);
    }

    /// Family derived through the newtype matches the raw classification.
    #[test]
    fn newtype_family_matches_raw(hz in 8000u32..=192_000u32) {
        let rate = SampleRateHz::new(hz).unwrap();
        assert_eq!(rate.family(), RateFamily::of(hz));
    }
}
