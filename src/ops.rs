use std::{
    cmp::Ordering,
    convert::TryFrom,
    fmt::{self, Display},
    ops::{Add, BitAnd, BitOr, BitXor, Index, Mul, Neg, Not, Sub},
};

use crate::{
    bitvector::BitVector,
    error::{Error, Result},
    BitVectorBe, BitVectorLe,
};

/// Operator overloads shared by both layouts.
/// Arithmetic and comparison accept either layout on the right hand side.
macro_rules! impl_traits {
    ($t:ty) => {
        impl Display for $t {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "{}", self.render())
            }
        }

        impl<O: BitVector> PartialEq<O> for $t {
            fn eq(&self, other: &O) -> bool {
                self.equals(other)
            }
        }

        impl Eq for $t {}

        impl<O: BitVector> PartialOrd<O> for $t {
            fn partial_cmp(&self, other: &O) -> Option<Ordering> {
                Some(self.compare_to(other))
            }
        }

        impl Ord for $t {
            fn cmp(&self, other: &Self) -> Ordering {
                self.compare_to(other)
            }
        }

        /// Reads past the stored region return the extension bit.
        impl Index<usize> for $t {
            type Output = u8;
            fn index(&self, index: usize) -> &Self::Output {
                if self.bit(index) == 1 {
                    &1
                } else {
                    &0
                }
            }
        }

        impl From<i64> for $t {
            fn from(value: i64) -> Self {
                <$t as BitVector>::from_i64(value)
            }
        }

        impl TryFrom<&$t> for i64 {
            type Error = Error;
            fn try_from(value: &$t) -> Result<i64> {
                value.to_i64()
            }
        }

        impl<O: BitVector> Add<&O> for &$t {
            type Output = $t;
            fn add(self, rhs: &O) -> $t {
                <$t as BitVector>::add(self, rhs)
            }
        }

        impl<O: BitVector> Sub<&O> for &$t {
            type Output = $t;
            fn sub(self, rhs: &O) -> $t {
                self.subtract(rhs)
            }
        }

        impl<O: BitVector> Mul<&O> for &$t {
            type Output = $t;
            fn mul(self, rhs: &O) -> $t {
                self.multiply(rhs)
            }
        }

        impl Neg for &$t {
            type Output = $t;
            fn neg(self) -> $t {
                self.negated()
            }
        }

        impl Neg for $t {
            type Output = $t;
            fn neg(self) -> $t {
                self.negated()
            }
        }

        impl<O: BitVector> BitAnd<&O> for $t {
            type Output = $t;
            fn bitand(mut self, rhs: &O) -> $t {
                self.and(rhs);
                self
            }
        }

        impl<O: BitVector> BitAnd<&O> for &$t {
            type Output = $t;
            fn bitand(self, rhs: &O) -> $t {
                self.clone() & rhs
            }
        }

        impl<O: BitVector> BitOr<&O> for $t {
            type Output = $t;
            fn bitor(mut self, rhs: &O) -> $t {
                self.or(rhs);
                self
            }
        }

        impl<O: BitVector> BitOr<&O> for &$t {
            type Output = $t;
            fn bitor(self, rhs: &O) -> $t {
                self.clone() | rhs
            }
        }

        impl<O: BitVector> BitXor<&O> for $t {
            type Output = $t;
            fn bitxor(mut self, rhs: &O) -> $t {
                self.xor(rhs);
                self
            }
        }

        impl<O: BitVector> BitXor<&O> for &$t {
            type Output = $t;
            fn bitxor(self, rhs: &O) -> $t {
                self.clone() ^ rhs
            }
        }

        impl Not for $t {
            type Output = $t;
            fn not(self) -> $t {
                self.bitwise_not()
            }
        }

        impl Not for &$t {
            type Output = $t;
            fn not(self) -> $t {
                self.bitwise_not()
            }
        }
    };
}

impl_traits!(BitVectorLe);
impl_traits!(BitVectorBe);

impl From<&BitVectorLe> for BitVectorBe {
    fn from(v: &BitVectorLe) -> Self {
        BitVectorBe::convert(v)
    }
}

impl From<&BitVectorBe> for BitVectorLe {
    fn from(v: &BitVectorBe) -> Self {
        BitVectorLe::convert(v)
    }
}

#[test]
fn test_display() {
    assert_eq!(BitVectorLe::new().to_string(), "0");
    assert_eq!(BitVectorBe::from_i64(-6).to_string(), "-110");
    assert_eq!(format!("{}", BitVectorLe::from_i64(9)), "1001");
}

#[test]
fn test_eq_across_layouts() {
    let le = BitVectorLe::from_i64(-13);
    let be = BitVectorBe::from(&le);
    assert_eq!(le, be);
    assert_eq!(be, le);
    assert_eq!(BitVectorLe::from(&be), le);

    // stored leading zeros and capacity are not part of the value
    let mut wide = BitVectorBe::with_capacity(1, 16).unwrap();
    wide.append(1).unwrap().append(1).unwrap().append(0).unwrap();
    assert_eq!(wide, BitVectorLe::from_i64(3));
    assert_ne!(wide, BitVectorLe::from_i64(-3));

    // the same value in two's complement and in sign and magnitude form
    let twos = BitVectorLe::from_twos(&[1, 1, 0, 1]).unwrap();
    assert_eq!(twos, BitVectorBe::from_i64(-5));
}

#[test]
fn test_ordering() {
    let mut values: Vec<BitVectorLe> = [7i64, -2, 0, 3, -9, 1]
        .iter()
        .map(|&v| BitVectorLe::from(v))
        .collect();
    values.sort();
    let sorted: Vec<i64> = values.iter().map(|v| i64::try_from(v).unwrap()).collect();
    assert_eq!(sorted, vec![-9, -2, 0, 1, 3, 7]);
    assert!(BitVectorBe::from_i64(-1) < BitVectorLe::from_i64(1));
    assert!(BitVectorBe::from_i64(4) > BitVectorLe::from_i64(3));
}

#[test]
fn test_index() {
    let v = BitVectorLe::from_twos(&[1, 0, 1]).unwrap();
    assert_eq!(v[0], 1);
    assert_eq!(v[1], 0);
    assert_eq!(v[100], 1);
    let v = BitVectorBe::from_i64(0b100);
    assert_eq!((v[0], v[1], v[2], v[3]), (0, 0, 1, 0));
}

#[test]
fn test_operators() {
    let a = BitVectorLe::from_i64(12);
    let b = BitVectorBe::from_i64(-5);
    assert_eq!(i64::try_from(&(&a + &b)), Ok(7));
    assert_eq!(i64::try_from(&(&a - &b)), Ok(17));
    assert_eq!(i64::try_from(&(&a * &b)), Ok(-60));
    assert_eq!(i64::try_from(&-&a), Ok(-12));
    assert_eq!(i64::try_from(&!&a), Ok(-13));
    assert_eq!(i64::try_from(&!b.clone()), Ok(4));

    let c = BitVectorLe::from_i64(0b1010);
    let d = BitVectorBe::from_i64(0b0110);
    assert_eq!(i64::try_from(&(&c & &d)), Ok(0b0010));
    assert_eq!(i64::try_from(&(&c | &d)), Ok(0b1110));
    assert_eq!(i64::try_from(&(c ^ &d)), Ok(0b1100));
}
