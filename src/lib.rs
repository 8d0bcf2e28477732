//! Arbitrary precision signed integers kept as mutable vectors of bits.
//!
//! Every vector is a two's complement pattern of unbounded width: reads past
//! the stored bits return a sign extension bit. Addition, subtraction,
//! multiplication and division are carried out bit by bit (ripple carry,
//! shift and add, restoring division), never through machine integers.
//!
//! Two storage layouts implement the same [`BitVector`] contract and can be
//! mixed freely as operands:
//!
//! * [`BitVectorLe`] stores logical bit `i` at index `i`, so the most
//!   significant end grows cheaply.
//! * [`BitVectorBe`] stores the bits reversed, so the least significant end
//!   grows cheaply and a left shift is a push.
//!
//! ```
//! use bitvector_arith::{BitVector, BitVectorBe, BitVectorLe};
//!
//! let a = BitVectorLe::from_twos(&[1, 0, 0, 1]).unwrap(); // ...11001, -7
//! let b = BitVectorBe::from_magnitude(1, &[1, 1]).unwrap(); // 3
//! assert_eq!(a.add(&b).to_i64(), Ok(-4));
//! assert_eq!(a.divide(&b).unwrap().to_i64(), Ok(-2));
//! ```

use lazy_static::lazy_static;

mod arith;
pub mod be;
mod bitvector;
mod error;
pub mod le;
mod ops;

pub use crate::{
    be::BitVectorBe,
    bitvector::{BitVector, Fields},
    error::{Error, Result},
    le::BitVectorLe,
};

lazy_static! {
    pub static ref ZERO: BitVectorLe = BitVectorLe::new();
    pub static ref ONE: BitVectorLe = BitVectorLe::from_i64(1);
}

#[test]
fn test_constants() {
    assert!(ZERO.is_zero());
    assert_eq!(ZERO.signum(), 0);
    assert_eq!(ONE.to_i64(), Ok(1));
    assert_eq!(le::TWO.to_i64(), Ok(2));
    assert_eq!(be::TWO.to_i64(), Ok(2));
    assert_eq!(*le::TWO, *be::TWO);
    // arithmetic never writes through its operands
    let three = ONE.add(&*le::TWO);
    assert_eq!(three.to_i64(), Ok(3));
    assert_eq!(ONE.to_i64(), Ok(1));
    assert_eq!(le::TWO.to_i64(), Ok(2));
}
