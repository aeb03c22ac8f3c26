//! Tests for signed byte marshalling.

use super::*;

#[test]
fn test_to_foreign_boundaries() {
    assert_eq!(to_foreign(&[0, 127, 128, 255]), vec![0i8, 127, -128, -1]);
}

#[test]
fn test_from_foreign_boundaries() {
    assert_eq!(from_foreign(&[0, 127, -128, -1], 4), vec![0u8, 127, 128, 255]);
}

#[test]
fn test_every_byte_value_round_trips() {
    for b in 0u8..=255 {
        let foreign = to_foreign(&[b]);
        let expected = if b <= 127 { b as i16 } else { b as i16 - 256 };
        assert_eq!(foreign[0] as i16, expected, "byte {}", b);
        assert_eq!(from_foreign(&[foreign[0]], 1), vec![b], "byte {}", b);
    }
}

#[test]
fn test_every_signed_value_round_trips() {
    for v in i8::MIN..=i8::MAX {
        let native = from_foreign(&[v], 1);
        let expected = if v >= 0 { v as i16 } else { v as i16 + 256 };
        assert_eq!(native[0] as i16, expected, "value {}", v);
        assert_eq!(to_foreign(&native), vec![v], "value {}", v);
    }
}

#[test]
fn test_full_range_sequence() {
    let all: Vec<u8> = (0u8..=255).collect();
    let foreign = to_foreign(&all);
    assert_eq!(foreign.len(), 256);
    assert_eq!(from_foreign(&foreign, foreign.len()), all);
}

#[test]
fn test_from_foreign_respects_count() {
    let values = [1i8, -1, 5, 6];
    assert_eq!(from_foreign(&values, 2), vec![1u8, 255]);
    assert_eq!(from_foreign(&values, 0), Vec::<u8>::new());
}

#[test]
fn test_from_foreign_clamps_count() {
    assert_eq!(from_foreign(&[-2i8], 10), vec![254u8]);
}

#[test]
fn test_from_foreign_into_appends() {
    let mut out = vec![9u8];
    let n = from_foreign_into(&[-128i8, 0, 1], 2, &mut out);
    assert_eq!(n, 2);
    assert_eq!(out, vec![9u8, 128, 0]);
}

#[test]
fn test_empty_input() {
    assert!(to_foreign(&[]).is_empty());
    assert!(from_foreign(&[], 0).is_empty());
}
