//! Direct storage: logical bit `i` lives at `bits[i]`. Growing the most
//! significant end is a push; growing the least significant end moves every
//! stored bit.

use std::cmp::Ordering;

use lazy_static::lazy_static;

use crate::{
    bitvector::{check_bits, check_sign, BitVector, Fields},
    error::Result,
};

lazy_static! {
    /// Two in direct storage.
    pub static ref TWO: BitVectorLe = BitVectorLe::from_i64(2);
}

#[derive(Debug, Clone, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct BitVectorLe {
    fields: Fields,
}

impl BitVectorLe {
    /// Zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty vector whose bits, once written, carry the given sign.
    pub fn with_sign(signum: i64) -> Result<Self> {
        Self::with_capacity(signum, 0)
    }

    pub fn with_capacity(signum: i64, nbits: usize) -> Result<Self> {
        let signum = check_sign(signum)?;
        Ok(Self {
            fields: Fields {
                bits: vec![0; nbits],
                len: 0,
                signum,
                complement: 0,
            },
        })
    }

    /// Sign and magnitude, the magnitude least significant bit first.
    pub fn from_magnitude(signum: i64, bits: &[u8]) -> Result<Self> {
        let signum = check_sign(signum)?;
        check_bits(bits)?;
        Ok(Self::from_logical(bits.to_vec(), signum, 0))
    }

    /// Two's complement bits, least significant first; the last element is
    /// the sign extension bit.
    pub fn from_twos(val: &[u8]) -> Result<Self> {
        check_bits(val)?;
        match val.split_last() {
            Some((&complement, bits)) => {
                let signum = if complement == 1 { -1 } else { 1 };
                Ok(Self::from_logical(bits.to_vec(), signum, complement))
            }
            None => Ok(Self::new()),
        }
    }
}

impl BitVector for BitVectorLe {
    fn fields(&self) -> &Fields {
        &self.fields
    }

    fn fields_mut(&mut self) -> &mut Fields {
        &mut self.fields
    }

    fn from_logical(bits: Vec<u8>, signum: i8, complement: u8) -> Self {
        let len = bits.len();
        Self {
            fields: Fields {
                bits,
                len,
                signum,
                complement,
            },
        }
    }

    fn two() -> &'static Self {
        &*TWO
    }

    #[inline]
    fn bit(&self, index: usize) -> u8 {
        if index < self.fields.len {
            self.fields.bits[index]
        } else {
            self.fields.complement
        }
    }

    #[inline]
    fn put(&mut self, index: usize, value: u8) {
        self.fields.bits[index] = value;
    }

    fn extend_to(&mut self, to: usize) {
        let f = &mut self.fields;
        if to <= f.len {
            return;
        }
        if to > f.bits.len() {
            f.bits.resize(to, 0);
        }
        let c = f.complement;
        f.bits[f.len..to].iter_mut().for_each(|b| *b = c);
        f.len = to;
    }

    fn trim(&mut self) {
        let n = self.length();
        let f = &mut self.fields;
        f.bits[n..f.len].iter_mut().for_each(|b| *b = 0);
        f.len = n;
    }

    fn push_msb(&mut self, bit: u8) {
        let f = &mut self.fields;
        if f.len == f.bits.len() {
            f.bits.push(bit);
        } else {
            f.bits[f.len] = bit;
        }
        f.len += 1;
    }

    fn push_lsb(&mut self, bit: u8) {
        let f = &mut self.fields;
        let size = f.bits.len();
        f.bits.insert(0, bit);
        // a spare zero slot fell off the end
        if f.len < size {
            f.bits.truncate(size);
        }
        f.len += 1;
    }

    fn pop(&mut self) -> Option<u8> {
        let f = &mut self.fields;
        if f.len == 0 {
            return None;
        }
        f.len -= 1;
        Some(std::mem::replace(&mut f.bits[f.len], 0))
    }

    fn remove(&mut self, index: usize) -> u8 {
        let f = &mut self.fields;
        let bit = f.bits.remove(index);
        f.bits.push(0);
        f.len -= 1;
        bit
    }

    fn shift_left(&mut self, n: usize) {
        if n == 0 {
            return;
        }
        let f = &mut self.fields;
        let mut grown = vec![0; n];
        grown.extend_from_slice(&f.bits);
        f.bits = grown;
        f.len += n;
    }

    fn shift_right(&mut self, n: usize) {
        let f = &mut self.fields;
        let n = n.min(f.len);
        f.bits.drain(..n);
        f.bits.resize(f.bits.len() + n, 0);
        f.len -= n;
    }

    fn complement_bits(&mut self) {
        if self.is_zero() {
            return;
        }
        let len = self.fields.len;
        match self.fields.bits[..len].iter().position(|&b| b == 1) {
            Some(k) => self.fields.bits[k + 1..len].iter_mut().for_each(|b| *b ^= 1),
            // ...1110..0 negates to a single bit just above the stored run
            None => self.extend_to(len + 1),
        }
        self.fields.complement ^= 1;
    }

    fn invert_bits(&mut self) {
        let f = &mut self.fields;
        f.bits[..f.len].iter_mut().for_each(|b| *b ^= 1);
        f.complement ^= 1;
    }

    fn addition(mut a: Self, mut b: Self) -> Self {
        let width = a.width().max(b.width()) + 1;
        let (sa, sb) = (a.signum(), b.signum());
        let mut recomplement = false;
        if sa != sb {
            let (neg, pos) = if sa < 0 { (&mut a, &b) } else { (&mut b, &a) };
            recomplement = neg.compare_magnitudes(pos) == Ordering::Greater;
            neg.complement_bits();
        }

        let mut sum = Self::from_logical(Vec::with_capacity(width), 1, 0);
        let mut carry = 0;
        for i in 0..width {
            let c = a.bit(i) + b.bit(i) + carry;
            sum.push_msb(c & 1);
            carry = c >> 1;
        }

        sum.fields.signum = if recomplement {
            sum.fields.complement = 1;
            sum.complement_bits();
            -1
        } else if sa == sb {
            sa
        } else {
            1
        };
        sum.trim();
        sum
    }

    fn multiplication(a: Self, b: Self) -> Self {
        let mut product = Self::new();
        for i in 0..b.width() {
            let bi = b.bit(i);
            if bi == 0 {
                continue;
            }
            // A masked by b_i, built upward from i zero bits
            let mut partial = Self::from_logical(Vec::with_capacity(i + a.width()), 1, 0);
            (0..i).for_each(|_| partial.push_msb(0));
            (0..a.width()).for_each(|j| partial.push_msb(a.bit(j) & bi));
            product = product.add(&partial);
        }
        product
    }

    fn division(a: Self, b: Self) -> Self {
        let mut divisor = b;
        divisor.fields.signum = 1;
        let n = a.width();
        let mut quotient = Self::from_logical(vec![0; n], 1, 0);
        let mut remainder = Self::from_logical(Vec::with_capacity(n + 1), 1, 0);
        for i in (0..n).rev() {
            remainder.shift_left(1);
            remainder.put(0, a.bit(i));
            if remainder.compare_to(&divisor) != Ordering::Less {
                remainder = remainder.subtract(&divisor);
                quotient.put(i, 1);
            }
        }
        quotient
    }
}

#[test]
fn test_le_from_twos() {
    // ...11001 is -7
    let v = BitVectorLe::from_twos(&[1, 0, 0, 1]).unwrap();
    assert_eq!(v.signum(), -1);
    assert_eq!(v.complement(), 1);
    assert_eq!(v.to_i64(), Ok(-7));
    assert_eq!(v.to_string(), "-111");
    assert_eq!(v.get(0), Ok(1));
    assert_eq!(v.get(2), Ok(0));
    assert_eq!(v.get(40), Ok(1));
    assert_eq!(
        BitVectorLe::from_twos(&[1, 2]).unwrap_err(),
        crate::Error::InvalidBit(2)
    );
    assert!(BitVectorLe::from_twos(&[0, 0, 0]).unwrap().is_zero());
    assert!(BitVectorLe::from_twos(&[]).unwrap().is_zero());
    // an all ones pattern is -1
    assert_eq!(BitVectorLe::from_twos(&[1, 1, 1]).unwrap().to_i64(), Ok(-1));
}

#[test]
fn test_le_from_magnitude() {
    let v = BitVectorLe::from_magnitude(-1, &[1, 0, 1, 0]).unwrap();
    assert_eq!(v.to_i64(), Ok(-5));
    assert_eq!(v.to_string(), "-0101");
    assert_eq!(v.width(), 4);
    assert_eq!(v.length(), 3);
    assert_eq!(v.to_byte_array(), vec![1, 0, 1, 0]);
    assert_eq!(
        BitVectorLe::from_magnitude(2, &[1]).unwrap_err(),
        crate::Error::InvalidSign(2)
    );
    assert_eq!(
        BitVectorLe::from_magnitude(1, &[3]).unwrap_err(),
        crate::Error::InvalidBit(3)
    );
}

#[test]
fn test_le_append_prepend_pop() {
    let mut v = BitVectorLe::new();
    v.append(1).unwrap().append(0).unwrap();
    assert_eq!(v.to_string(), "01");
    assert_eq!(v.to_byte_array(), vec![1, 0]);
    v.prepend(1).unwrap();
    assert_eq!(v.to_string(), "011");
    assert_eq!(v.pop(), Some(0));
    assert_eq!(v.to_string(), "11");
    assert_eq!(v.pop(), Some(1));
    assert_eq!(v.pop(), Some(1));
    assert_eq!(v.pop(), None);
    assert_eq!(v.append(2).unwrap_err(), crate::Error::InvalidBit(2));

    let mut v = BitVectorLe::with_capacity(1, 8).unwrap();
    v.prepend(1).unwrap();
    v.prepend(0).unwrap();
    assert_eq!(v.capacity(), 8);
    assert_eq!(v.to_string(), "10");
}

#[test]
fn test_le_pop_at() {
    let mut v = BitVectorLe::from_i64(0b1101);
    assert_eq!(v.pop_at(1), Ok(0));
    assert_eq!(v.to_i64(), Ok(0b111));
    assert_eq!(v.pop_at(10), Ok(0));
    assert_eq!(v.pop_at(-1), Err(crate::Error::IllegalAccess(-1)));
}

#[test]
fn test_le_set_clear_flip() {
    let mut v = BitVectorLe::new();
    v.set(2, 5).unwrap();
    assert_eq!(v.to_i64(), Ok(0b11100));
    v.clear_bit(3).unwrap();
    assert_eq!(v.to_i64(), Ok(0b10100));
    v.flip(0, 3).unwrap();
    assert_eq!(v.to_i64(), Ok(0b10011));
    v.flip_bit(7).unwrap();
    assert_eq!(v.to_i64(), Ok(0b1001_0011));
    assert_eq!(v.set(-1, 2).unwrap_err(), crate::Error::IllegalAccess(-1));
    assert!(matches!(
        v.clear(4, 2).unwrap_err(),
        crate::Error::IllegalOperation(_)
    ));
    // failed calls leave the vector alone
    assert_eq!(v.to_i64(), Ok(0b1001_0011));
}

#[test]
fn test_le_shift() {
    let mut v = BitVectorLe::from_i64(0b1011);
    v.shl(3).unwrap();
    assert_eq!(v.to_i64(), Ok(0b1011000));
    v.shr(5).unwrap();
    assert_eq!(v.to_i64(), Ok(0b10));
    v.shr(9).unwrap();
    assert!(v.is_zero());
    assert_eq!(v.shl(-2).unwrap_err(), crate::Error::NegativeShift(-2));
}

#[test]
fn test_le_complements() {
    let mut v = BitVectorLe::from_i64(5);
    v.twos_complement().unwrap();
    assert_eq!(v.complement(), 1);
    assert_eq!(v.logical_bits(), vec![1, 1, 0]);
    assert_eq!(v.to_i64(), Ok(-5));
    v.twos_complement().unwrap();
    assert_eq!(v.to_i64(), Ok(5));

    let mut v = BitVectorLe::from_i64(5);
    v.ones_complement().unwrap();
    assert_eq!(v.to_i64(), Ok(-6));

    let mut zero = BitVectorLe::new();
    assert!(zero.twos_complement().is_err());
    assert!(zero.ones_complement().is_err());
    assert!(zero.flip_sign().is_err());
}

#[test]
fn test_le_arithmetic() {
    let a = BitVectorLe::from_i64(5);
    let b = BitVectorLe::from_i64(3);
    assert_eq!(a.add(&b).to_i64(), Ok(8));
    assert_eq!(a.subtract(&b).to_i64(), Ok(2));
    assert_eq!(a.multiply(&b).to_i64(), Ok(15));
    assert_eq!(a.divide(&b).unwrap().to_i64(), Ok(1));
    assert_eq!(a.to_i64(), Ok(5));
    assert_eq!(b.to_i64(), Ok(3));
}

#[test]
fn test_le_inverse_sign_reset() {
    let mut v = BitVectorLe::from_i64(5);
    v.inverse();
    assert_eq!(v.to_i64(), Ok(2));
    assert_eq!(v.complement(), 0);

    let mut v = BitVectorLe::from_i64(5);
    assert_eq!(v.sign(), 0);
    v.flip_sign().unwrap();
    assert_eq!(v.sign(), 1);
    assert_eq!(v.to_i64(), Ok(-5));
    v.flip_sign().unwrap();
    assert_eq!(v.sign(), 0);

    assert!(!v.is_empty());
    v.reset();
    assert_eq!(v.width(), 0);
    assert_eq!(v.capacity(), 0);
    assert!(v.is_empty());
    assert!(v.is_zero());
    assert!(BitVectorLe::with_capacity(-1, 8).unwrap().is_empty());
}

#[test]
fn test_le_pop_negative() {
    // ...1110
    let mut v = BitVectorLe::from_twos(&[0, 1, 1]).unwrap();
    assert_eq!(v.to_i64(), Ok(-2));
    assert_eq!(v.pop(), Some(1));
    assert_eq!(v.to_i64(), Ok(-2));
    assert_eq!(v.pop(), Some(0));
    assert_eq!(v.to_i64(), Ok(-1));
    assert_eq!(v.pop(), None);
    assert_eq!(v.get(5), Ok(1));
}

#[test]
fn test_le_compare_magnitudes() {
    use crate::BitVectorBe;
    let minus_seven = BitVectorLe::from_i64(-7);
    assert_eq!(minus_seven.compare_magnitudes(&BitVectorBe::from_i64(3)), Ordering::Greater);
    assert_eq!(minus_seven.compare_magnitudes(&BitVectorBe::from_i64(7)), Ordering::Equal);
    assert_eq!(minus_seven.compare_magnitudes(&BitVectorBe::from_i64(-8)), Ordering::Less);

    // both in two's complement form
    let twos = BitVectorLe::from_twos(&[1, 0, 0, 1]).unwrap();
    let minus_eight = BitVectorBe::from_twos(&[1, 0, 0, 0]).unwrap();
    assert_eq!(twos.compare_magnitudes(&minus_eight), Ordering::Less);
    assert_eq!(twos.compare_magnitudes(&BitVectorBe::from_i64(3)), Ordering::Greater);
    assert_eq!(twos.compare_magnitudes(&minus_seven), Ordering::Equal);
}
