/// Categories seeded when none are stored.
pub const DEFAULT_CATEGORIES: [&str; 4] = ["surveillance", "networking", "ai", "itsm"];

/// Append a category unless it is already listed. Returns whether it was added.
pub fn add_category(categories: &mut Vec<String>, name: &str) -> bool {
    let name = name.trim();
    if name.is_empty() || categories.iter().any(|c| c == name) {
        return false;
    }
    categories.push(name.to_string());
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_is_idempotent() {
        let mut cats: Vec<String> = DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect();
        assert!(add_category(&mut cats, "voice"));
        assert!(!add_category(&mut cats, "voice"));
        assert!(!add_category(&mut cats, "ai"));
        assert!(!add_category(&mut cats, "  "));
        assert_eq!(cats.len(), 5);
    }
}
