#![cfg(feature = "serde")]

use bitvector_arith::{BitVector, BitVectorBe, BitVectorLe};

#[static_init::constructor(0)]
extern "C" fn _log_init() {
    log_init::init();
}

#[test]
fn test_json_round_trip() {
    let v = BitVectorLe::from_twos(&[1, 0, 0, 1]).unwrap();
    let json = serde_json::to_string(&v).unwrap();
    assert_eq!(json, r#"{"bits":[1,0,0],"len":3,"signum":-1,"complement":1}"#);
    let back: BitVectorLe = serde_json::from_str(&json).unwrap();
    assert_eq!(back, v);
    assert_eq!(back.to_byte_array(), v.to_byte_array());

    // capacity past the stored length survives
    let mut w = BitVectorBe::with_capacity(-1, 8).unwrap();
    w.prepend(1).unwrap().prepend(1).unwrap();
    let back: BitVectorBe = serde_json::from_str(&serde_json::to_string(&w).unwrap()).unwrap();
    assert_eq!(back.capacity(), 8);
    assert_eq!(back.to_i64(), Ok(-3));
}

#[test]
fn test_json_rejects_invalid() {
    let bad = [
        r#"{"bits":[2],"len":1,"signum":1,"complement":0}"#,
        r#"{"bits":[1],"len":1,"signum":1,"complement":3}"#,
        r#"{"bits":[1],"len":1,"signum":5,"complement":0}"#,
        r#"{"bits":[1],"len":2,"signum":1,"complement":0}"#,
        r#"{"bits":[1,1],"len":1,"signum":1,"complement":0}"#,
    ];
    for json in bad.iter() {
        assert!(serde_json::from_str::<BitVectorLe>(json).is_err(), "{}", json);
        assert!(serde_json::from_str::<BitVectorBe>(json).is_err(), "{}", json);
    }
}

#[test]
fn test_json_spare_slots_stay_clear() {
    let json = r#"{"bits":[1,0],"len":1,"signum":1,"complement":0}"#;
    let mut v: BitVectorBe = serde_json::from_str(json).unwrap();
    v.shl(1).unwrap();
    assert_eq!(v.to_i64(), Ok(2));
}
