use rand::Rng;

const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Short, shareable id composed of random uppercase letters.
pub fn make_easy_id(length: usize) -> String {
    let mut rng = rand::rng();
    (0..length)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn easy_ids_are_uppercase_alpha() {
        let id = make_easy_id(4);
        assert_eq!(id.len(), 4);
        assert!(id.chars().all(|c| c.is_ascii_uppercase()));
    }

    #[test]
    fn easy_ids_vary() {
        let ids: std::collections::HashSet<String> = (0..64).map(|_| make_easy_id(10)).collect();
        assert!(ids.len() > 1);
    }
}
