// [tests/mirror/libs/core/decimal/scaled_properties.test.rs]
use ledgercore_decimal::ScaledDecimal;
use num_bigint::BigInt;
use proptest::prelude::*;
use std::str::FromStr;

#[test]
fn certify_display_roundtrip_simple_values() {
    let cases = ["0", "100", "-100", "105.00", "0.5", "-0.5", "1234567890123456789012.34"];
    for raw in cases {
        let parsed = ScaledDecimal::from_str(raw).expect("valid literal");
        let rendered = parsed.to_string();
        let reparsed = ScaledDecimal::from_str(&rendered).expect("valid re-literal");
        assert_eq!(parsed, reparsed, "roundtrip mismatch for {raw}");
    }
}

#[test]
fn certify_scale_widening_is_exact() {
    let value = ScaledDecimal::new(BigInt::from(100), 0);
    let widened = value.rescale(2);
    assert_eq!(widened.to_string(), "100.00");
    assert_eq!(widened.scale(), 2);
}

#[test]
fn certify_credit_amount_at_wider_scale_matches_scenario_e() {
    // Scenario E: available = 100 at scale 0; CREDIT amount = 5.00 (scale 2).
    let available = ScaledDecimal::new(BigInt::from(100), 0);
    let credit = ScaledDecimal::from_str("5.00").unwrap();
    let post = available.checked_add(&credit);
    assert_eq!(post.to_string(), "105.00");
    assert_eq!(post.scale(), 2);
}

#[test]
fn certify_narrowing_truncates_toward_zero() {
    let positive = ScaledDecimal::from_str("1.29").unwrap();
    assert_eq!(positive.rescale(0).to_string(), "1");

    let negative = ScaledDecimal::from_str("-1.29").unwrap();
    assert_eq!(negative.rescale(0).to_string(), "-1");
}

proptest! {
    #[test]
    fn certify_addition_commutes(a in -1_000_000i64..1_000_000, b in -1_000_000i64..1_000_000, scale in 0u32..6) {
        let x = ScaledDecimal::new(BigInt::from(a), scale);
        let y = ScaledDecimal::new(BigInt::from(b), scale);
        prop_assert_eq!(x.checked_add(&y), y.checked_add(&x));
    }

    #[test]
    fn certify_add_then_sub_is_identity(a in -1_000_000i64..1_000_000, b in -1_000_000i64..1_000_000, scale in 0u32..6) {
        let x = ScaledDecimal::new(BigInt::from(a), scale);
        let y = ScaledDecimal::new(BigInt::from(b), scale);
        let roundtripped = x.checked_add(&y).checked_sub(&y);
        prop_assert_eq!(roundtripped, x);
    }

    #[test]
    fn certify_rescale_widen_then_narrow_is_identity(a in -1_000_000i64..1_000_000, scale in 0u32..4, widen_by in 0u32..4) {
        let x = ScaledDecimal::new(BigInt::from(a), scale);
        let widened = x.rescale(scale + widen_by);
        let narrowed = widened.rescale(scale);
        prop_assert_eq!(narrowed, x);
    }
}
