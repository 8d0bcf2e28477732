//! Arithmetic, comparison and bitwise behaviour of both layouts checked
//! against `i64`, plus the fixed scenarios.

use std::iter::once;

use bitvector_arith::{BitVector, BitVectorBe, BitVectorLe, Error};
use log::trace;
use proptest::prelude::*;

#[static_init::constructor(0)]
extern "C" fn _log_init() {
    log_init::init();
}

const WIDTH: usize = 24;
const VALUES: std::ops::Range<i64> = -(1 << 20)..(1 << 20);

fn le(v: i64) -> BitVectorLe {
    BitVectorLe::from_i64(v)
}

fn be(v: i64) -> BitVectorBe {
    BitVectorBe::from_i64(v)
}

/// `v` as a WIDTH bit two's complement pattern, lowest bit first, followed
/// by the extension bit.
fn twos_bits(v: i64) -> Vec<u8> {
    (0..WIDTH)
        .map(|i| ((v >> i) & 1) as u8)
        .chain(once((v < 0) as u8))
        .collect()
}

fn le_twos(v: i64) -> BitVectorLe {
    BitVectorLe::from_twos(&twos_bits(v)).unwrap()
}

fn be_twos(v: i64) -> BitVectorBe {
    let mut bits = twos_bits(v);
    bits.reverse();
    BitVectorBe::from_twos(&bits).unwrap()
}

fn quotient(a: i64, b: i64) -> Result<i64, Error> {
    match (a, b) {
        (0, 0) => Err(Error::Indeterminate),
        (_, 0) => Err(Error::DivisionByZero),
        _ => Ok(a / b),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_add(a in VALUES, b in VALUES) {
        prop_assert_eq!(le(a).add(&le(b)).to_i64(), Ok(a + b));
        prop_assert_eq!(be(a).add(&be(b)).to_i64(), Ok(a + b));
        prop_assert_eq!(le_twos(a).add(&be_twos(b)).to_i64(), Ok(a + b));
        prop_assert_eq!(be_twos(a).add(&le(b)).to_i64(), Ok(a + b));
    }

    #[test]
    fn prop_subtract(a in VALUES, b in VALUES) {
        prop_assert_eq!(le(a).subtract(&le(b)).to_i64(), Ok(a - b));
        prop_assert_eq!(be(a).subtract(&be(b)).to_i64(), Ok(a - b));
        prop_assert_eq!(le_twos(a).subtract(&be_twos(b)).to_i64(), Ok(a - b));
        prop_assert_eq!(be_twos(a).subtract(&le(b)).to_i64(), Ok(a - b));
    }

    #[test]
    fn prop_multiply(a in VALUES, b in VALUES) {
        prop_assert_eq!(le(a).multiply(&le(b)).to_i64(), Ok(a * b));
        prop_assert_eq!(be(a).multiply(&be(b)).to_i64(), Ok(a * b));
        prop_assert_eq!(le_twos(a).multiply(&be_twos(b)).to_i64(), Ok(a * b));
        prop_assert_eq!(be_twos(a).multiply(&le(b)).to_i64(), Ok(a * b));
    }

    #[test]
    fn prop_divide(a in VALUES, b in -300i64..300) {
        let expected = quotient(a, b);
        prop_assert_eq!(le(a).divide(&le(b)).and_then(|q| q.to_i64()), expected.clone());
        prop_assert_eq!(be(a).divide(&be(b)).and_then(|q| q.to_i64()), expected.clone());
        prop_assert_eq!(le_twos(a).divide(&be_twos(b)).and_then(|q| q.to_i64()), expected.clone());
        prop_assert_eq!(be_twos(a).divide(&le(b)).and_then(|q| q.to_i64()), expected);
    }

    #[test]
    fn prop_divide_wide_divisor(a in VALUES, b in VALUES) {
        prop_assert_eq!(le(a).divide(&be(b)).and_then(|q| q.to_i64()), quotient(a, b));
        prop_assert_eq!(be_twos(a).divide(&be(b)).and_then(|q| q.to_i64()), quotient(a, b));
    }

    #[test]
    fn prop_operands_untouched(a in VALUES, b in VALUES) {
        let x = le_twos(a);
        let y = be_twos(b);
        let _ = x.add(&y);
        let _ = x.multiply(&y);
        let _ = y.subtract(&x);
        let _ = y.divide(&x);
        prop_assert_eq!(x.to_byte_array(), le_twos(a).to_byte_array());
        prop_assert_eq!(y.to_byte_array(), be_twos(b).to_byte_array());
        prop_assert_eq!(x.to_i64(), Ok(a));
        prop_assert_eq!(y.to_i64(), Ok(b));
    }

    #[test]
    fn prop_ordering(a in VALUES, b in VALUES) {
        prop_assert_eq!(le(a).compare_to(&le(b)), a.cmp(&b));
        prop_assert_eq!(be(a).compare_to(&le_twos(b)), a.cmp(&b));
        prop_assert_eq!(le_twos(a).compare_to(&be_twos(b)), a.cmp(&b));
        prop_assert_eq!(le(a) == be_twos(b), a == b);
        prop_assert_eq!(be_twos(a) < le(b), a < b);
        prop_assert_eq!(le_twos(a).compare_magnitudes(&be(b)), a.abs().cmp(&b.abs()));
        prop_assert_eq!(be_twos(a).compare_magnitudes(&be_twos(b)), a.abs().cmp(&b.abs()));
        prop_assert_eq!(le_twos(a).sign(), (a < 0) as u8);
        prop_assert_eq!(be(a).sign(), (a < 0) as u8);
    }

    #[test]
    fn prop_twos_involution(a in VALUES) {
        for mut v in vec![le(a), le_twos(a), be(a).to_le(), be_twos(a).to_le()] {
            if a == 0 {
                prop_assert!(v.twos_complement().is_err());
                continue;
            }
            v.twos_complement().unwrap();
            prop_assert_eq!(v.to_i64(), Ok(-a));
            v.twos_complement().unwrap();
            prop_assert_eq!(v.to_i64(), Ok(a));
        }
        let mut v = be_twos(a);
        if a != 0 {
            v.twos_complement().unwrap().twos_complement().unwrap();
            prop_assert!(v == be_twos(a));
        }
    }

    #[test]
    fn prop_sign_extension(a in VALUES, extra in 0isize..128) {
        let v = le_twos(a);
        let w = be_twos(a);
        let ext = (a < 0) as u8;
        prop_assert_eq!(v.get(WIDTH as isize + extra), Ok(ext));
        prop_assert_eq!(w.get(WIDTH as isize + extra), Ok(ext));
        for i in 0..WIDTH {
            let bit = ((a >> i) & 1) as u8;
            prop_assert_eq!(v.get(i as isize), Ok(bit));
            prop_assert_eq!(w[i], bit);
        }
    }

    #[test]
    fn prop_layout_round_trip(a in VALUES) {
        let v = le_twos(a);
        let back = v.to_be().to_le();
        prop_assert_eq!(back.logical_bits(), v.logical_bits());
        prop_assert_eq!(back.complement(), v.complement());
        prop_assert!(back == v);
        let copy = v.clone();
        prop_assert_eq!(copy.to_byte_array(), v.to_byte_array());
        prop_assert_eq!(copy.signum(), v.signum());
    }

    #[test]
    fn prop_render(a in VALUES) {
        let expected = if a < 0 {
            format!("-{:b}", a.unsigned_abs())
        } else {
            format!("{:b}", a)
        };
        prop_assert_eq!(le(a).to_string(), expected.clone());
        prop_assert_eq!(be(a).to_string(), expected);
    }

    #[test]
    fn prop_bitwise(a in VALUES, b in VALUES) {
        let mut v = le_twos(a);
        v.and(&be_twos(b));
        prop_assert_eq!(v.to_i64(), Ok(a & b));
        prop_assert_eq!((&be_twos(a) | &le_twos(b)).to_i64(), Ok(a | b));
        prop_assert_eq!((le_twos(a) ^ &le_twos(b)).to_i64(), Ok(a ^ b));
        prop_assert_eq!((!&le(a)).to_i64(), Ok(!a));
        prop_assert_eq!((!be_twos(a)).to_i64(), Ok(!a));
    }

    #[test]
    fn prop_shift(a in VALUES, n in 0isize..40) {
        let mut v = le_twos(a);
        v.shl(n).unwrap();
        prop_assert_eq!(v.to_i64(), Ok(a << n));
        let mut w = be(a);
        w.shl(n).unwrap();
        prop_assert_eq!(w.to_i64(), Ok(a << n));

        let mut v = le_twos(a);
        v.shr(n).unwrap();
        prop_assert_eq!(v.to_i64(), Ok(a >> n));
        let mut w = be_twos(a);
        w.shr(n).unwrap();
        prop_assert_eq!(w.to_i64(), Ok(a >> n));
    }
}

#[test]
fn test_identities() {
    for &x in &[1i64, -1, 2, -2, 3, 77, -1024, 65535] {
        trace!("identities for {}", x);
        for v in vec![le(x), le_twos(x)] {
            assert_eq!(v.divide(&v).unwrap().to_i64(), Ok(1));
            assert_eq!(v.divide(&be(1)).unwrap().to_i64(), Ok(x));
            assert_eq!(be(0).divide(&v).unwrap().to_i64(), Ok(0));
            assert!(v.multiply(&be(0)).is_zero());
            assert!(v.add(&-&v).is_zero());
            assert_eq!(v.add(&-&v).signum(), 0);
        }
    }
}

#[test]
fn test_scenario_small() {
    let a = be(5);
    let b = le(3);
    assert_eq!(a.add(&b).to_i64(), Ok(8));
    assert_eq!(a.subtract(&b).to_i64(), Ok(2));
    assert_eq!(a.multiply(&b).to_i64(), Ok(15));
    assert_eq!(a.divide(&b).unwrap().to_i64(), Ok(1));
}

#[test]
fn test_scenario_negative() {
    // ...11001
    let a = BitVectorLe::from_twos(&[1, 0, 0, 1]).unwrap();
    let b = BitVectorBe::from_twos(&[0, 1, 1]).unwrap();
    assert_eq!(a.to_i64(), Ok(-7));
    assert_eq!(b.to_i64(), Ok(3));
    assert_eq!(a.add(&b).to_i64(), Ok(-4));
    assert_eq!(a.divide(&b).unwrap().to_i64(), Ok(-2));
    assert_eq!(le(7).divide(&be(-3)).unwrap().to_i64(), Ok(-2));
    assert_eq!(be(-7).divide(&le(-3)).unwrap().to_i64(), Ok(2));
}

#[test]
fn test_scenario_zero() {
    assert_eq!(BitVectorLe::new().to_string(), "0");
    assert_eq!(BitVectorBe::new().to_string(), "0");
    assert_eq!(le(0).to_string(), "0");
    assert_eq!(be(5).subtract(&be(5)).to_string(), "0");
}

#[test]
fn test_scenario_append() {
    let mut v = BitVectorLe::new();
    v.append(1).unwrap().append(0).unwrap();
    assert_eq!(v.to_string(), "01");
    let mut w = BitVectorBe::new();
    w.append(1).unwrap().append(0).unwrap();
    assert_eq!(w.to_string(), "01");
    assert_eq!(v, w);
}

#[test]
fn test_errors() {
    assert_eq!(le(5).divide(&be(0)).unwrap_err(), Error::DivisionByZero);
    assert_eq!(be(0).divide(&le(0)).unwrap_err(), Error::Indeterminate);
    assert!(Error::DivisionByZero.is_arithmetic());

    let mut v = be(9);
    assert_eq!(v.shl(-1).unwrap_err(), Error::NegativeShift(-1));
    assert_eq!(v.get(-5), Err(Error::IllegalAccess(-5)));
    assert_eq!(v.append(3).unwrap_err(), Error::InvalidBit(3));
    // failed mutations leave the vector alone
    assert_eq!(v.to_i64(), Ok(9));

    let mut zero = le(0);
    assert!(matches!(zero.flip_sign(), Err(Error::IllegalOperation(_))));
    assert!(matches!(zero.ones_complement(), Err(Error::IllegalOperation(_))));

    let mut wide = le(1);
    wide.shl(70).unwrap();
    assert_eq!(wide.to_i64(), Err(Error::Overflow));
    assert_eq!(le(i64::MIN).to_i64(), Ok(i64::MIN));
    assert_eq!(be(i64::MAX).to_i64(), Ok(i64::MAX));
}
