//! Reversed storage: the stored region of `bits` is kept most significant bit
//! first, so logical bit `i` lives at `bits[len - 1 - i]`. Growing the least
//! significant end is a push, which makes left shifts and bit-serial division
//! cheap; the left and right shifts are exact inverses.

use std::cmp::Ordering;

use lazy_static::lazy_static;

use crate::{
    bitvector::{check_bits, check_sign, BitVector, Fields},
    error::Result,
};

lazy_static! {
    /// Two in reversed storage.
    pub static ref TWO: BitVectorBe = BitVectorBe::from_i64(2);
}

#[derive(Debug, Clone, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct BitVectorBe {
    fields: Fields,
}

impl BitVectorBe {
    /// Zero.
    pub fn new() -> Self {
        Self::default()
    }

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

    /// Sign and magnitude, the magnitude most significant bit first.
    pub fn from_magnitude(signum: i64, bits: &[u8]) -> Result<Self> {
        let signum = check_sign(signum)?;
        check_bits(bits)?;
        Ok(Self::from_physical(bits.to_vec(), signum, 0))
    }

    /// Two's complement bits, most significant first; the first element is
    /// the sign extension bit.
    pub fn from_twos(val: &[u8]) -> Result<Self> {
        check_bits(val)?;
        match val.split_first() {
            Some((&complement, bits)) => {
                let signum = if complement == 1 { -1 } else { 1 };
                Ok(Self::from_physical(bits.to_vec(), signum, complement))
            }
            None => Ok(Self::new()),
        }
    }

    fn from_physical(bits: Vec<u8>, signum: i8, complement: u8) -> Self {
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

    #[inline]
    fn slot(&self, index: usize) -> usize {
        self.fields.len - 1 - index
    }
}

impl BitVector for BitVectorBe {
    fn fields(&self) -> &Fields {
        &self.fields
    }

    fn fields_mut(&mut self) -> &mut Fields {
        &mut self.fields
    }

    fn from_logical(mut bits: Vec<u8>, signum: i8, complement: u8) -> Self {
        bits.reverse();
        Self::from_physical(bits, signum, complement)
    }

    fn two() -> &'static Self {
        &*TWO
    }

    #[inline]
    fn bit(&self, index: usize) -> u8 {
        if index < self.fields.len {
            self.fields.bits[self.slot(index)]
        } else {
            self.fields.complement
        }
    }

    #[inline]
    fn put(&mut self, index: usize, value: u8) {
        let slot = self.slot(index);
        self.fields.bits[slot] = value;
    }

    fn extend_to(&mut self, to: usize) {
        let f = &mut self.fields;
        if to <= f.len {
            return;
        }
        if to > f.bits.len() {
            f.bits.resize(to, 0);
        }
        let grow = to - f.len;
        f.bits.copy_within(..f.len, grow);
        let c = f.complement;
        f.bits[..grow].iter_mut().for_each(|b| *b = c);
        f.len = to;
    }

    fn trim(&mut self) {
        let n = self.length();
        let f = &mut self.fields;
        let drop = f.len - n;
        f.bits.copy_within(drop..f.len, 0);
        f.bits[n..f.len].iter_mut().for_each(|b| *b = 0);
        f.len = n;
    }

    fn push_msb(&mut self, bit: u8) {
        let len = self.fields.len;
        self.extend_to(len + 1);
        self.fields.bits[0] = bit;
    }

    fn push_lsb(&mut self, bit: u8) {
        let f = &mut self.fields;
        if f.len == f.bits.len() {
            f.bits.push(bit);
        } else {
            f.bits[f.len] = bit;
        }
        f.len += 1;
    }

    fn pop(&mut self) -> Option<u8> {
        let f = &mut self.fields;
        if f.len == 0 {
            return None;
        }
        let bit = f.bits[0];
        f.bits.copy_within(1..f.len, 0);
        f.len -= 1;
        f.bits[f.len] = 0;
        Some(bit)
    }

    fn remove(&mut self, index: usize) -> u8 {
        let slot = self.slot(index);
        let f = &mut self.fields;
        let bit = f.bits.remove(slot);
        f.bits.push(0);
        f.len -= 1;
        bit
    }

    fn shift_left(&mut self, n: usize) {
        let f = &mut self.fields;
        if f.len + n > f.bits.len() {
            f.bits.resize(f.len + n, 0);
        }
        // slots past the stored region are already zero
        f.len += n;
    }

    fn shift_right(&mut self, n: usize) {
        let f = &mut self.fields;
        let n = n.min(f.len);
        f.bits[f.len - n..f.len].iter_mut().for_each(|b| *b = 0);
        f.len -= n;
    }

    fn complement_bits(&mut self) {
        if self.is_zero() {
            return;
        }
        let len = self.fields.len;
        match self.fields.bits[..len].iter().rposition(|&b| b == 1) {
            // slots before the lowest set bit hold the higher positions
            Some(slot) => self.fields.bits[..slot].iter_mut().for_each(|b| *b ^= 1),
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

        // written straight into place, lowest position at the end
        let mut bits = vec![0; width];
        let mut carry = 0;
        for i in 0..width {
            let c = a.bit(i) + b.bit(i) + carry;
            bits[width - 1 - i] = c & 1;
            carry = c >> 1;
        }

        let mut sum = Self::from_physical(bits, 1, 0);
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
            if b.bit(i) == 0 {
                continue;
            }
            let mut partial = a.clone();
            partial.fields.signum = 1;
            partial.shift_left(i);
            product = product.add(&partial);
        }
        product
    }

    fn division(a: Self, b: Self) -> Self {
        let mut divisor = b;
        divisor.fields.signum = 1;
        let n = a.width();
        let mut quotient = Self::from_physical(Vec::with_capacity(n), 1, 0);
        let mut remainder = Self::from_physical(Vec::with_capacity(n + 1), 1, 0);
        for i in (0..n).rev() {
            remainder.push_lsb(a.bit(i));
            if remainder.compare_to(&divisor) != Ordering::Less {
                remainder = remainder.subtract(&divisor);
                quotient.push_lsb(1);
            } else {
                quotient.push_lsb(0);
            }
        }
        quotient
    }
}

#[test]
fn test_be_from_twos() {
    // ...11001 is -7
    let v = BitVectorBe::from_twos(&[1, 0, 0, 1]).unwrap();
    assert_eq!(v.signum(), -1);
    assert_eq!(v.to_i64(), Ok(-7));
    assert_eq!(v.to_string(), "-111");
    assert_eq!(v.to_byte_array(), vec![0, 0, 1]);
    assert_eq!(v.get(0), Ok(1));
    assert_eq!(v.get(1), Ok(0));
    assert_eq!(v.get(64), Ok(1));
    assert_eq!(v.get(-1), Err(crate::Error::IllegalAccess(-1)));
    assert!(BitVectorBe::from_twos(&[0, 0]).unwrap().is_zero());
}

#[test]
fn test_be_from_magnitude() {
    let v = BitVectorBe::from_magnitude(1, &[0, 1, 1, 0]).unwrap();
    assert_eq!(v.to_i64(), Ok(6));
    assert_eq!(v.to_string(), "0110");
    assert_eq!(v.length(), 3);
    assert_eq!(
        BitVectorBe::from_magnitude(0, &[1]).unwrap_err(),
        crate::Error::InvalidSign(0)
    );
}

#[test]
fn test_be_append_prepend_pop() {
    let mut v = BitVectorBe::new();
    v.append(1).unwrap().append(0).unwrap();
    assert_eq!(v.to_string(), "01");
    assert_eq!(v.to_byte_array(), vec![0, 1]);
    v.prepend(1).unwrap();
    assert_eq!(v.to_string(), "011");
    assert_eq!(v.pop(), Some(0));
    assert_eq!(v.to_string(), "11");
    assert_eq!(v.pop(), Some(1));
    assert_eq!(v.pop(), Some(1));
    assert_eq!(v.pop(), None);
}

#[test]
fn test_be_pop_at() {
    let mut v = BitVectorBe::from_i64(0b1101);
    assert_eq!(v.pop_at(1), Ok(0));
    assert_eq!(v.to_i64(), Ok(0b111));
    assert_eq!(v.pop_at(0), Ok(1));
    assert_eq!(v.to_i64(), Ok(0b11));
}

#[test]
fn test_be_shift_inverse() {
    let mut v = BitVectorBe::from_i64(0b1011);
    let capacity = v.capacity();
    v.shl(4).unwrap();
    assert_eq!(v.to_i64(), Ok(0b1011_0000));
    assert!(v.capacity() >= capacity + 4);
    v.shr(4).unwrap();
    assert_eq!(v.to_i64(), Ok(0b1011));
    v.shr(2).unwrap();
    assert_eq!(v.to_i64(), Ok(0b10));
    assert_eq!(v.shr(-1).unwrap_err(), crate::Error::NegativeShift(-1));
}

#[test]
fn test_be_set_clear_flip() {
    let mut v = BitVectorBe::from_i64(0b1);
    v.set(3, 5).unwrap();
    assert_eq!(v.to_i64(), Ok(0b11001));
    assert_eq!(v.to_byte_array(), vec![1, 1, 0, 0, 1]);
    v.clear(0, 4).unwrap();
    assert_eq!(v.to_i64(), Ok(0b10000));
    v.flip(0, 2).unwrap();
    assert_eq!(v.to_i64(), Ok(0b10011));
}

#[test]
fn test_be_complements() {
    let mut v = BitVectorBe::from_i64(12);
    v.twos_complement().unwrap();
    // ...110100
    assert_eq!(v.logical_bits(), vec![0, 0, 1, 0]);
    assert_eq!(v.to_i64(), Ok(-12));
    v.twos_complement().unwrap();
    assert_eq!(v.to_i64(), Ok(12));

    // ...1000 negates to a bit above the stored run
    let mut v = BitVectorBe::from_twos(&[1, 0, 0, 0]).unwrap();
    assert_eq!(v.to_i64(), Ok(-8));
    v.twos_complement().unwrap();
    assert_eq!(v.to_i64(), Ok(8));
    assert_eq!(v.to_string(), "1000");
}

#[test]
fn test_be_arithmetic() {
    let a = BitVectorBe::from_i64(5);
    let b = BitVectorBe::from_i64(3);
    assert_eq!(a.add(&b).to_i64(), Ok(8));
    assert_eq!(a.subtract(&b).to_i64(), Ok(2));
    assert_eq!(a.multiply(&b).to_i64(), Ok(15));
    assert_eq!(a.divide(&b).unwrap().to_i64(), Ok(1));
    assert_eq!(
        BitVectorBe::from_i64(1000).divide(&b).unwrap().to_i64(),
        Ok(333)
    );
}

#[test]
fn test_be_inverse_sign_reset() {
    let mut v = BitVectorBe::from_i64(5);
    v.inverse();
    assert_eq!(v.to_i64(), Ok(2));

    let mut v = BitVectorBe::from_i64(12);
    v.flip_sign().unwrap();
    assert_eq!(v.sign(), 1);
    assert_eq!(v.to_i64(), Ok(-12));

    v.reset();
    assert_eq!(v.width(), 0);
    assert_eq!(v.capacity(), 0);
    assert!(v.is_empty());
    assert!(v.is_zero());
    assert_eq!(v.sign(), 0);
}

#[test]
fn test_be_pop_negative() {
    // ...1110
    let mut v = BitVectorBe::from_twos(&[1, 1, 0]).unwrap();
    assert_eq!(v.to_i64(), Ok(-2));
    assert_eq!(v.pop(), Some(1));
    assert_eq!(v.to_i64(), Ok(-2));
    assert_eq!(v.pop(), Some(0));
    assert_eq!(v.to_i64(), Ok(-1));
    assert_eq!(v.pop(), None);
    assert!(v.is_empty());
}

#[test]
fn test_be_compare_magnitudes() {
    use crate::BitVectorLe;
    let minus_seven = BitVectorBe::from_i64(-7);
    assert_eq!(minus_seven.compare_magnitudes(&BitVectorLe::from_i64(3)), Ordering::Greater);
    assert_eq!(minus_seven.compare_magnitudes(&BitVectorLe::from_i64(7)), Ordering::Equal);
    assert_eq!(minus_seven.compare_magnitudes(&BitVectorLe::from_i64(-8)), Ordering::Less);
}
