#![allow(missing_docs)]
use dynhash_inthash::HashPair;

/// Hash functions given as plain function pointers, for engineering specific collisions.
#[derive(Clone, Copy, Debug)]
pub struct FnHash(pub fn(u64) -> u32, pub fn(u64) -> u32);

impl HashPair for FnHash {
    fn h1(&self, key: u64) -> u32 {
        (self.0)(key)
    }

    fn h2(&self, key: u64) -> u32 {
        (self.1)(key)
    }
}

/// `h1(key) = key`, `h2(key) = key >> 1`.
pub const IDENTITY: FnHash = FnHash(|key| key as u32, |key| (key >> 1) as u32);

/// Every key collides with every other key on both sides.
pub const CONSTANT: FnHash = FnHash(|_| 0, |_| 0);
