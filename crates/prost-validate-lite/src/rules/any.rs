//! `google.protobuf.Any` rules look only at the type URL; the payload is
//! never decoded.

/// The type URL is one of `urls`.
#[inline]
#[must_use]
pub fn in_set(type_url: &str, urls: &[&str]) -> bool {
    urls.contains(&type_url)
}

/// The type URL is none of `urls`.
#[inline]
#[must_use]
pub fn not_in_set(type_url: &str, urls: &[&str]) -> bool {
    !urls.contains(&type_url)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DURATION: &str = "type.googleapis.com/google.protobuf.Duration";
    const TIMESTAMP: &str = "type.googleapis.com/google.protobuf.Timestamp";

    #[test]
    fn type_url_membership() {
        assert!(in_set(DURATION, &[DURATION]));
        assert!(!in_set(TIMESTAMP, &[DURATION]));
        assert!(not_in_set(TIMESTAMP, &[DURATION]));
        assert!(!not_in_set(DURATION, &[DURATION, TIMESTAMP]));
    }
}
