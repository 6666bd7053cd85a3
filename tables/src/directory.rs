//! Extendible hashing directory of single-key buckets.
//!
//! A directory of depth `d` has `2^d` entries, indexed by the low `d` bits of a key's hash. Each
//! entry refers to a bucket, and a bucket of local depth `l <= d` is referred to by all `2^(d - l)`
//! entries that share its low `l` address bits. Buckets are stored in an arena and entries hold
//! arena indices, so a split rewrites all aliasing entries without any shared ownership.
use std::fmt;

use dynhash_inthash::MAX_TABLE_SIZE;

use crate::error::CapacityError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct BucketId(usize);

/// A bucket holding at most one key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bucket {
    first_address: usize,
    depth: u32,
    key: Option<u64>,
}

impl Bucket {
    fn new(first_address: usize, depth: u32) -> Self {
        Bucket {
            first_address,
            depth,
            key: None,
        }
    }

    /// The lowest directory address referring to this bucket, which also serves as its id.
    pub fn first_address(&self) -> usize {
        self.first_address
    }

    /// The number of hash bits shared by all addresses referring to this bucket.
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// The stored key, if any.
    pub fn key(&self) -> Option<u64> {
        self.key
    }
}

/// Extendible hashing directory of single-key buckets.
#[derive(Clone, Debug)]
pub struct Directory {
    buckets: Vec<Bucket>,
    entries: Vec<BucketId>,
    depth: u32,
    len: usize,
    limit: usize,
    splits: u64,
    doublings: u64,
}

impl Default for Directory {
    fn default() -> Self {
        Self::new()
    }
}

impl Directory {
    /// Creates a directory of depth 0 with a single empty bucket.
    pub fn new() -> Self {
        Directory {
            buckets: vec![Bucket::new(0, 0)],
            entries: vec![BucketId(0)],
            depth: 0,
            len: 0,
            limit: MAX_TABLE_SIZE,
            splits: 0,
            doublings: 0,
        }
    }

    /// Lowers the number of entries the directory must stay below from [`MAX_TABLE_SIZE`] to
    /// `limit`.
    ///
    /// # Panics
    /// Panics if `limit` exceeds [`MAX_TABLE_SIZE`] or does not exceed the current size.
    pub fn set_size_limit(&mut self, limit: usize) {
        assert!(limit <= MAX_TABLE_SIZE, "size limit must not exceed {MAX_TABLE_SIZE}");
        assert!(self.entries.len() < limit, "size limit must exceed the current size");
        self.limit = limit;
    }

    /// Number of hash bits used for addressing.
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Number of directory entries, `2^depth`.
    pub fn size(&self) -> usize {
        self.entries.len()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no key is stored.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of distinct buckets.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Number of bucket splits performed so far.
    pub fn splits(&self) -> u64 {
        self.splits
    }

    /// Number of directory doublings performed so far.
    pub fn doublings(&self) -> u64 {
        self.doublings
    }

    /// Returns the directory address for `hash`, i.e. its low `depth` bits.
    #[inline]
    pub fn address(&self, hash: u32) -> usize {
        hash as usize & (self.entries.len() - 1)
    }

    /// Returns the bucket referred to by `address`.
    #[inline]
    pub fn bucket(&self, address: usize) -> &Bucket {
        &self.buckets[self.entries[address].0]
    }

    /// Returns `true` if the bucket at `address` holds `key`.
    #[inline]
    pub fn holds(&self, address: usize, key: u64) -> bool {
        self.bucket(address).key == Some(key)
    }

    /// Iterates over all addresses together with the bucket they refer to.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Bucket)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .map(|(address, id)| (address, &self.buckets[id.0]))
    }

    /// Iterates over the stored keys, each exactly once.
    pub fn keys(&self) -> impl Iterator<Item = u64> + '_ {
        self.buckets.iter().filter_map(|bucket| bucket.key)
    }

    /// Stores `key` in the bucket at `address`, returning the key it held before.
    pub(crate) fn replace(&mut self, address: usize, key: u64) -> Option<u64> {
        let id = self.entries[address];
        let previous = self.buckets[id.0].key.replace(key);
        if previous.is_none() {
            self.len += 1;
        }
        previous
    }

    /// Removes and returns the key stored in the bucket at `address`.
    pub(crate) fn take(&mut self, address: usize) -> Option<u64> {
        let id = self.entries[address];
        let previous = self.buckets[id.0].key.take();
        if previous.is_some() {
            self.len -= 1;
        }
        previous
    }

    fn double(&mut self) -> Result<(), CapacityError> {
        let size = self.entries.len() * 2;
        CapacityError::check(size, self.limit)?;
        log::debug!("doubling directory to {size} entries");
        self.entries.extend_from_within(..);
        self.depth += 1;
        self.doublings += 1;
        Ok(())
    }

    /// Splits the bucket at `address`, doubling the directory first if the bucket's local depth
    /// has reached the directory depth.
    ///
    /// The new sibling bucket takes over every second group of addresses that referred to the old
    /// bucket. The old bucket's key is then reinserted using `hash`, so it ends up in whichever of
    /// the two buckets it now addresses. No keys are moved if an error is returned.
    pub(crate) fn split(
        &mut self,
        address: usize,
        hash: impl Fn(u64) -> u32,
    ) -> Result<(), CapacityError> {
        let id = self.entries[address];
        if self.buckets[id.0].depth == self.depth {
            self.double()?;
        }

        let bucket = &mut self.buckets[id.0];
        let depth = bucket.depth;
        let new_depth = depth + 1;
        bucket.depth = new_depth;

        // the sibling's address is the old bucket's address with one more high bit set
        let sibling_address = (1 << depth) | bucket.first_address;
        let sibling = BucketId(self.buckets.len());
        self.buckets.push(Bucket::new(sibling_address, new_depth));
        log::trace!(
            "splitting bucket {} at depth {depth} into {sibling_address}",
            self.buckets[id.0].first_address
        );

        for prefix in 0..1usize << (self.depth - new_depth) {
            self.entries[(prefix << new_depth) | sibling_address] = sibling;
        }
        self.splits += 1;

        if let Some(key) = self.buckets[id.0].key.take() {
            let target = self.entries[self.address(hash(key))];
            self.buckets[target.0].key = Some(key);
        }
        Ok(())
    }

    /// Writes the `address | bucketid` layout, printing each bucket at its first address.
    pub fn fmt_layout(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  table:               buckets:")?;
        writeln!(f, "  address | bucketid   bucketid [key]")?;
        for (address, bucket) in self.iter() {
            write!(f, "{address:9} | {:<9} ", bucket.first_address)?;
            if bucket.first_address == address {
                write!(f, "{:9} ", bucket.first_address)?;
                match bucket.key {
                    Some(key) => write!(f, "[{key}]")?,
                    None => write!(f, "[ ]")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn check(&self, hash: impl Fn(u64) -> u32) {
        assert_eq!(self.entries.len(), 1 << self.depth);

        let mut references = vec![0usize; self.buckets.len()];
        for (address, id) in self.entries.iter().enumerate() {
            let bucket = &self.buckets[id.0];
            assert!(bucket.depth <= self.depth);
            let mask = (1usize << bucket.depth) - 1;
            assert_eq!(address & mask, bucket.first_address);
            assert_eq!(self.entries[bucket.first_address], *id);
            references[id.0] += 1;
        }
        for (bucket, count) in self.buckets.iter().zip(references) {
            assert_eq!(count, 1 << (self.depth - bucket.depth), "unreachable or misaliased bucket");
            if let Some(key) = bucket.key {
                let address = self.address(hash(key));
                assert_eq!(self.bucket(address), bucket, "key {key} not at its address");
            }
        }
        assert_eq!(self.keys().count(), self.len);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_without_doubling() {
        let mut directory = Directory::new();
        let identity = |key: u64| key as u32;
        directory.split(0, identity).unwrap();
        directory.split(0, identity).unwrap();
        assert_eq!(directory.depth(), 2);
        assert_eq!(directory.bucket_count(), 3);

        // bucket 1 still has depth 1 and is aliased by addresses 1 and 3
        directory.replace(3, 7);
        assert!(directory.holds(1, 7));
        assert_eq!(directory.bucket(1).first_address(), 1);

        // splitting it needs no doubling, and key 7 (binary 111) moves to the sibling at 3
        directory.split(1, identity).unwrap();
        assert_eq!(directory.depth(), 2);
        assert_eq!(directory.doublings(), 2);
        assert_eq!(directory.splits(), 3);
        assert!(directory.holds(3, 7));
        assert_eq!(directory.bucket(1).key(), None);
        assert_eq!(directory.bucket(3).first_address(), 3);
        directory.check(identity);
    }

    #[test]
    fn key_may_stay_in_old_bucket() {
        let mut directory = Directory::new();
        let identity = |key: u64| key as u32;
        directory.replace(0, 4);
        directory.split(0, identity).unwrap();
        assert!(directory.holds(0, 4));
        assert_eq!(directory.bucket(1).key(), None);
        directory.check(identity);
    }

    #[test]
    fn split_respects_size_limit() {
        let mut directory = Directory::new();
        directory.set_size_limit(4);
        let identity = |key: u64| key as u32;
        directory.replace(0, 8);
        directory.split(0, identity).unwrap();
        let err = directory.split(0, identity).unwrap_err();
        assert_eq!(err.requested, 4);
        assert_eq!(err.limit, 4);
        assert_eq!(directory.depth(), 1);
        assert_eq!(directory.splits(), 1);
        assert!(directory.holds(0, 8));
        directory.check(identity);
    }

    #[test]
    fn take_and_replace_track_len() {
        let mut directory = Directory::new();
        assert_eq!(directory.replace(0, 1), None);
        assert_eq!(directory.replace(0, 2), Some(1));
        assert_eq!(directory.len(), 1);
        assert_eq!(directory.take(0), Some(2));
        assert_eq!(directory.take(0), None);
        assert!(directory.is_empty());
    }
}
