//! Conditional request mediation: `If-None-Match` on reads, `If-Match`
//! on writes, both judged against the stored content fingerprint.
//!
//! A missing client token or a legacy record without a fingerprint always
//! passes. That is best-effort optimistic concurrency: a client that
//! never read the resource is not blocked, and the check remains
//! check-then-act rather than an atomic compare-and-swap at the store.

/// Outcome of the read flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadDisposition {
    /// Client already holds the current representation; answer 304 with
    /// an empty body.
    NotModified,
    /// Return the full resource with its fingerprint as the response tag.
    Fresh,
}

/// Outcome of the write flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteDisposition {
    Proceed,
    /// Token and stored fingerprint are both present and differ; abort
    /// with 412 before any mutation.
    PreconditionFailed,
}

pub fn read_disposition(stored: Option<&str>, if_none_match: Option<&str>) -> ReadDisposition {
    match (stored, if_none_match) {
        (Some(stored), Some(token)) if stored == token => ReadDisposition::NotModified,
        _ => ReadDisposition::Fresh,
    }
}

pub fn write_disposition(stored: Option<&str>, if_match: Option<&str>) -> WriteDisposition {
    match (stored, if_match) {
        (Some(stored), Some(token)) if stored != token => WriteDisposition::PreconditionFailed,
        _ => WriteDisposition::Proceed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_read_token_is_not_modified() {
        assert_eq!(
            read_disposition(Some("book_1"), Some("book_1")),
            ReadDisposition::NotModified
        );
    }

    #[test]
    fn mismatched_or_absent_read_token_is_fresh() {
        assert_eq!(
            read_disposition(Some("book_1"), Some("book_99")),
            ReadDisposition::Fresh
        );
        assert_eq!(read_disposition(Some("book_1"), None), ReadDisposition::Fresh);
        assert_eq!(
            read_disposition(None, Some("book_1")),
            ReadDisposition::Fresh
        );
    }

    #[test]
    fn matching_write_token_proceeds() {
        assert_eq!(
            write_disposition(Some("book_1"), Some("book_1")),
            WriteDisposition::Proceed
        );
    }

    #[test]
    fn mismatched_write_token_fails_the_precondition() {
        assert_eq!(
            write_disposition(Some("book_1"), Some("book_99")),
            WriteDisposition::PreconditionFailed
        );
    }

    #[test]
    fn absent_token_or_legacy_record_writes_unconditionally() {
        assert_eq!(
            write_disposition(Some("book_1"), None),
            WriteDisposition::Proceed
        );
        assert_eq!(
            write_disposition(None, Some("book_1")),
            WriteDisposition::Proceed
        );
        assert_eq!(write_disposition(None, None), WriteDisposition::Proceed);
    }
}
