use std::collections::HashSet;

use apiware::ids::{fill_random, RandomError, ReferenceId, MAX_RANDOM_BYTES};

#[test]
fn generated_ids_are_distinct_and_v4_shaped() {
    let mut seen = HashSet::new();
    for _ in 0..10_000 {
        let id = ReferenceId::new().unwrap().to_string();

        assert_eq!(id.len(), 36);
        for (i, c) in id.chars().enumerate() {
            if matches!(i, 8 | 13 | 18 | 23) {
                assert_eq!(c, '-', "hyphen expected at {i} in {id}");
            } else {
                assert!(c.is_ascii_hexdigit() && !c.is_ascii_uppercase());
            }
        }
        // version nibble is the first hex digit of the third group
        assert_eq!(&id[14..15], "4", "version nibble in {id}");
        // variant nibble is the first hex digit of the fourth group
        let variant = id.as_bytes()[19];
        assert!(
            matches!(variant, b'8' | b'9' | b'a' | b'b'),
            "variant nibble in {id}"
        );

        assert!(seen.insert(id));
    }
    assert_eq!(seen.len(), 10_000);
}

#[test]
fn fill_random_enforces_the_byte_quota() {
    let mut at_limit = vec![0u8; MAX_RANDOM_BYTES];
    fill_random(&mut at_limit).unwrap();

    let mut over = vec![0u8; MAX_RANDOM_BYTES + 1];
    match fill_random(&mut over) {
        Err(RandomError::QuotaExceeded { requested }) => {
            assert_eq!(requested, MAX_RANDOM_BYTES + 1)
        }
        other => panic!("expected quota error, got {other:?}"),
    }
}

#[test]
fn quota_error_message_names_the_request() {
    let err = RandomError::QuotaExceeded { requested: 70_000 };
    let msg = err.to_string();
    assert!(msg.contains("70000"));
    assert!(msg.contains("65536"));
}

#[test]
fn display_parse_round_trip() {
    let id = ReferenceId::new().unwrap();
    let parsed: ReferenceId = id.to_string().parse().unwrap();
    assert_eq!(parsed, id);
}

#[test]
fn parse_rejects_malformed_input() {
    assert!("".parse::<ReferenceId>().is_err());
    assert!("not-a-uuid".parse::<ReferenceId>().is_err());
    // right length, hyphens misplaced
    assert!(
        "123456789-123-4123-8123-123456789012".parse::<ReferenceId>().is_err()
    );
    // right shape, non-hex content
    assert!(
        "zzzzzzzz-zzzz-zzzz-zzzz-zzzzzzzzzzzz".parse::<ReferenceId>().is_err()
    );
}

#[test]
fn serde_round_trips_as_a_string() {
    let id = ReferenceId::new().unwrap();
    let serialized = serde_json::to_string(&id).unwrap();
    assert_eq!(serialized, format!("\"{id}\""));
    let back: ReferenceId = serde_json::from_str(&serialized).unwrap();
    assert_eq!(back, id);
}
