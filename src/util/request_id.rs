use rand::Rng;

/// Mints a fresh correlation identifier: 128 random bits rendered as 32
/// lowercase hex characters.
///
/// Identifiers are never reused within a process, so a response carrying a
/// stale identifier can only ever be dropped, never misdelivered.
pub fn next_request_id() -> String {
    let value: u128 = rand::thread_rng().gen();
    format!("{value:032x}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn identifiers_are_pairwise_distinct() {
        let ids: HashSet<String> = (0..1000).map(|_| next_request_id()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn identifiers_are_fixed_width_hex() {
        let id = next_request_id();
        assert_eq!(id.len(), 32);
        assert!(id.chars().all(|ch| ch.is_ascii_hexdigit()));
    }
}
