//! Key/value payload carried by every list node.

use tracing::error;

use crate::data_structures::checksum::checksum;
use crate::error::{ListError, Result};

/// An owned key/value pair plus the checksum of the value.
///
/// INVARIANT: `checksum == checksum(value)` for the value currently stored.
/// Every constructor and [`Entry::replace_value`] keep it; readers check it
/// with [`Entry::verify`] or [`Entry::copy_value_into`].
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    key: Box<str>,
    value: Box<str>,
    checksum: u64,
}

impl Entry {
    /// Create an entry owning copies of `key` and `value`.
    ///
    pub fn new(key: &str, value: &str) -> Result<Self> {
        validate("key", key)?;
        validate("value", value)?;

        Ok(Entry {
            key: key.into(),
            value: value.into(),
            checksum: checksum(value.as_bytes()),
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn checksum(&self) -> u64 {
        self.checksum
    }

    /// Replace the value in place and return the previous one.
    ///
    /// Only the lock disciplines call this, while holding write access.
    /// `value` must already be validated.
    ///
    pub(crate) fn replace_value(&mut self, value: Box<str>) -> Box<str> {
        self.checksum = checksum(value.as_bytes());
        std::mem::replace(&mut self.value, value)
    }

    /// Recompute the checksum of the stored value and compare it.
    ///
    pub fn verify(&self) -> Result<()> {
        self.check(checksum(self.value.as_bytes()))
    }

    /// Copy the value into `buf` as a NUL-terminated byte string.
    ///
    /// At most `buf.len() - 1` bytes are copied. When the whole value fits,
    /// the checksum of the copied bytes is compared with the stored one. When
    /// the copy is truncated, the full stored value is verified instead, since
    /// a partial sum can never match.
    ///
    /// Returns the number of value bytes copied (terminator excluded).
    ///
    pub fn copy_value_into(&self, buf: &mut [u8]) -> Result<usize> {
        let Some(capacity) = buf.len().checked_sub(1) else {
            return Err(ListError::invalid_argument(
                "output buffer must hold at least the terminator",
            ));
        };

        let bytes = self.value.as_bytes();
        let len = bytes.len().min(capacity);

        buf[..len].copy_from_slice(&bytes[..len]);
        buf[len] = 0;

        if len == bytes.len() {
            self.check(checksum(&buf[..len]))?;
        } else {
            self.verify()?;
        }

        Ok(len)
    }

    fn check(&self, computed: u64) -> Result<()> {
        if computed == self.checksum {
            return Ok(());
        }

        error!(
            key = %self.key,
            stored = self.checksum,
            computed,
            "value failed integrity check"
        );

        Err(ListError::ChecksumMismatch {
            key: self.key.to_string(),
            stored: self.checksum,
            computed,
        })
    }
}

/// Reject strings that cannot be represented in a terminated buffer.
///
pub(crate) fn validate(field: &str, s: &str) -> Result<()> {
    match s.bytes().position(|b| b == 0) {
        Some(offset) => Err(ListError::invalid_argument(format!(
            "{field} contains a NUL byte at offset {offset}"
        ))),
        None => Ok(()),
    }
}

/// The bytes of `buf` up to (not including) the first NUL terminator.
///
/// ```
/// use kvlist_core::data_structures::terminated;
///
/// assert_eq!(terminated(b"99\0xyz"), b"99");
/// assert_eq!(terminated(b"abc"), b"abc");
/// ```
pub fn terminated(buf: &[u8]) -> &[u8] {
    let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
    &buf[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_computes_checksum() {
        let entry = Entry::new("a", "99").unwrap();
        assert_eq!(entry.key(), "a");
        assert_eq!(entry.value(), "99");
        assert_eq!(entry.checksum(), checksum(b"99"));
        assert!(entry.verify().is_ok());
    }

    #[test]
    fn test_rejects_nul() {
        let err = Entry::new("a\0b", "v").unwrap_err();
        assert_eq!(
            err,
            ListError::invalid_argument("key contains a NUL byte at offset 1")
        );
        assert!(Entry::new("a", "\0").is_err());
        assert!(Entry::new("", "").is_ok());
    }

    #[test]
    fn test_replace_value_keeps_invariant() {
        let mut entry = Entry::new("a", "1").unwrap();
        let old = entry.replace_value("12345".into());
        assert_eq!(&*old, "1");
        assert_eq!(entry.value(), "12345");
        assert_eq!(entry.checksum(), checksum(b"12345"));
    }

    #[test]
    fn test_copy_fits() {
        let entry = Entry::new("a", "99").unwrap();
        let mut buf = [0xaa_u8; 8];
        assert_eq!(entry.copy_value_into(&mut buf).unwrap(), 2);
        assert_eq!(&buf[..3], b"99\0");
        assert_eq!(terminated(&buf), b"99");
    }

    #[test]
    fn test_copy_exact_fit() {
        let entry = Entry::new("a", "1234567").unwrap();
        let mut buf = [0u8; 8];
        assert_eq!(entry.copy_value_into(&mut buf).unwrap(), 7);
        assert_eq!(terminated(&buf), b"1234567");
    }

    #[test]
    fn test_copy_truncates_without_mismatch() {
        let value: String = ('a'..='z').cycle().take(50).collect();
        let entry = Entry::new("k", &value).unwrap();
        let mut buf = [0u8; 8];
        assert_eq!(entry.copy_value_into(&mut buf).unwrap(), 7);
        assert_eq!(terminated(&buf), b"abcdefg");
        assert_eq!(buf[7], 0);
    }

    #[test]
    fn test_copy_single_byte_buffer() {
        let entry = Entry::new("k", "value").unwrap();
        let mut buf = [0xaa_u8; 1];
        assert_eq!(entry.copy_value_into(&mut buf).unwrap(), 0);
        assert_eq!(buf, [0]);
    }

    #[test]
    fn test_copy_empty_buffer() {
        let entry = Entry::new("k", "value").unwrap();
        let err = entry.copy_value_into(&mut []).unwrap_err();
        assert!(matches!(err, ListError::InvalidArgument(_)));
    }

    #[test]
    fn test_corruption_detected() {
        let mut entry = Entry::new("k", "value").unwrap();
        entry.checksum += 1;

        let stored = entry.checksum();
        let computed = checksum(b"value");
        let expected = ListError::ChecksumMismatch {
            key: "k".to_string(),
            stored,
            computed,
        };

        assert_eq!(entry.verify().unwrap_err(), expected);

        let mut buf = [0u8; 16];
        assert_eq!(entry.copy_value_into(&mut buf).unwrap_err(), expected);

        // Truncated copies still verify the full value.
        let mut small = [0u8; 3];
        assert!(entry.copy_value_into(&mut small).unwrap_err().is_fatal());
    }
}
